use serde::{Deserialize, Serialize};

/// Which inputs the presentation layer should accept in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlStates {
    pub server_address_editable: bool,
    pub connect_enabled: bool,
    pub call_enabled: bool,
}

/// Captions of the connect/disconnect and call/hang-up toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonLabels {
    pub connect: &'static str,
    pub call: &'static str,
}

impl ButtonLabels {
    pub const NOT_CONNECTED: Self = Self {
        connect: "Connect",
        call: "Call",
    };

    pub const CONNECTED: Self = Self {
        connect: "Disconnect",
        call: "Call",
    };

    pub const IN_CALL: Self = Self {
        connect: "Disconnect",
        call: "Hang Up",
    };
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self::NOT_CONNECTED
    }
}
