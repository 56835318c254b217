pub use peercc_core::model::{Peer, PeerId, SessionState};

pub mod model {
    pub use peercc_core::model::*;
}

#[cfg(feature = "session")]
pub mod session {
    pub use peercc_session::*;
}
