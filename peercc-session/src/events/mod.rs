mod observers;
mod session_events;

pub use observers::*;
pub use session_events::*;
