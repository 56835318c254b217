mod controls;
mod ice;
mod peer;
mod session_state;
mod track;

pub use controls::{ButtonLabels, ControlStates};
pub use ice::{IceServerConfig, default_ice_servers};
pub use peer::{Peer, PeerId};
pub use session_state::SessionState;
pub use track::{TrackKind, TrackOrigin};
