mod media_config;
mod media_session;
mod media_track;
mod track_slots;

pub use media_config::*;
pub use media_session::*;
pub use media_track::*;
pub use track_slots::*;
