mod session_settings;
mod settings_store;

pub use session_settings::*;
pub use settings_store::*;
