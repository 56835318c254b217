use crate::model::controls::ControlStates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the local client stands with respect to the rendezvous server and
/// the (single) peer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Disconnecting,
    Connected,
    Calling,
    EndingCall,
    InCall,
}

impl SessionState {
    /// Signed in to the server, whatever the call status.
    pub fn is_signed_in(self) -> bool {
        matches!(
            self,
            Self::Connected | Self::Calling | Self::EndingCall | Self::InCall
        )
    }

    /// An asynchronous operation is in flight and the user has to wait for it.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            Self::Connecting | Self::Disconnecting | Self::Calling | Self::EndingCall
        )
    }

    pub fn controls(self) -> ControlStates {
        match self {
            Self::Disconnected => ControlStates {
                server_address_editable: true,
                connect_enabled: true,
                call_enabled: false,
            },
            Self::Connected => ControlStates {
                server_address_editable: false,
                connect_enabled: true,
                call_enabled: true,
            },
            Self::InCall => ControlStates {
                server_address_editable: false,
                connect_enabled: false,
                call_enabled: true,
            },
            Self::Connecting | Self::Disconnecting | Self::Calling | Self::EndingCall => {
                ControlStates::default()
            }
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Disconnecting => "disconnecting",
            Self::Connected => "connected",
            Self::Calling => "calling",
            Self::EndingCall => "ending call",
            Self::InCall => "in call",
        };
        f.write_str(name)
    }
}
