use std::fmt;

/// Something the user asked for through the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Connect,
    Disconnect,
    Call,
    HangUp,
    EditServerAddress,
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::Call => "call",
            Self::HangUp => "hang up",
            Self::EditServerAddress => "edit the server address",
        };
        f.write_str(text)
    }
}
