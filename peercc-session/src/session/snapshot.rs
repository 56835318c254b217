use peercc_core::{ButtonLabels, ControlStates, Peer, SessionState, TrackKind, TrackOrigin};
use serde::Serialize;

/// Latched capability flags. Only the session consumer writes them; other
/// threads see them through a [`SessionSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionFlags {
    pub connected: bool,
    pub connecting: bool,
    pub disconnecting: bool,
    pub connected_to_peer: bool,
    /// A remote track has arrived, so there is something to hang up.
    pub ready_to_disconnect: bool,
    pub microphone_enabled: bool,
    pub camera_enabled: bool,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self {
            connected: false,
            connecting: false,
            disconnecting: false,
            connected_to_peer: false,
            ready_to_disconnect: false,
            microphone_enabled: true,
            camera_enabled: true,
        }
    }
}

/// Whether the user wants local capture on. Applied to local tracks as they
/// arrive and whenever the preference changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaPreferences {
    pub camera_on: bool,
    pub microphone_on: bool,
}

impl Default for MediaPreferences {
    fn default() -> Self {
        Self {
            camera_on: true,
            microphone_on: true,
        }
    }
}

/// Immutable copy of session state published after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub flags: SessionFlags,
    pub preferences: MediaPreferences,
    pub labels: ButtonLabels,
    pub controls: ControlStates,
    pub server_address: String,
    pub peers: Vec<Peer>,
    pub selected: Option<usize>,
    pub tracks: Vec<(TrackOrigin, TrackKind)>,
    pub health_stats: Option<String>,
}

impl SessionSnapshot {
    pub fn selected_peer(&self) -> Option<&Peer> {
        self.selected.and_then(|index| self.peers.get(index))
    }
}
