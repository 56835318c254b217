use crate::media::MediaTrack;
use peercc_core::{Peer, PeerId, TrackOrigin};
use std::sync::Arc;

/// Work items for the session's single consumer.
///
/// Produced from any thread (UI handlers, signaling and media callbacks),
/// consumed exactly once and in order by [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub enum Command {
    /// Sentinel, applying it has no effect.
    Empty,

    /// Refresh presentation after entering `Connected`.
    EnterConnected,
    /// Refresh presentation after entering `InCall`.
    EnterInCall,
    /// Refresh presentation after entering `Disconnected`.
    EnterNotConnected,

    /// A peer signed in to the rendezvous server.
    PeerAdded(Peer),
    /// A peer signed out of the rendezvous server.
    PeerRemoved(PeerId),

    SignedIn,
    ServerConnectionFailure,
    ServerDisconnected,

    PeerConnectionCreated,
    PeerConnectionClosed,
    /// The connect-to-peer attempt returned an error.
    CallFailed,

    TrackAdded {
        origin: TrackOrigin,
        track: Arc<dyn MediaTrack>,
    },
    TrackRemoved {
        origin: TrackOrigin,
        track: Arc<dyn MediaTrack>,
    },

    HealthStats(String),
}
