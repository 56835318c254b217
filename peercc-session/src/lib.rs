pub mod command;
pub mod error;
pub mod events;
pub mod media;
pub mod roster;
pub mod session;
pub mod settings;
pub mod signaling;

pub use command::*;
pub use error::*;
pub use events::*;
pub use media::*;
pub use roster::*;
pub use session::*;
pub use settings::*;
pub use signaling::*;
