mod peer_roster;

pub use peer_roster::*;
