use crate::session::UserAction;
use peercc_core::{PeerId, SessionState};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The action is not valid in the current state. Nothing was changed.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: UserAction,
        state: SessionState,
    },

    #[error("peer index {index} is out of range (roster has {len} peers)")]
    PeerIndexOutOfRange { index: usize, len: usize },

    /// No tokio runtime to hand the operation to. Nothing was changed.
    #[error("no async runtime available to {0}")]
    DispatchUnavailable(UserAction),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("peer {0} is already in the roster")]
    DuplicatePeer(PeerId),

    #[error("peer index {index} is out of range (roster has {len} peers)")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings document must be a JSON object")]
    NotAnObject,
}
