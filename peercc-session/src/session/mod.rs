mod machine;
mod presenter;
mod session;
mod snapshot;
mod user_action;

pub use presenter::*;
pub use session::*;
pub use snapshot::*;
pub use user_action::*;
