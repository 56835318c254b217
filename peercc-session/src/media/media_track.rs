use peercc_core::TrackKind;
use std::fmt;

/// Handle to a single audio or video track owned by the media layer.
///
/// Once handed to the session, the session decides when the track is
/// unbound from its render surface and dropped.
pub trait MediaTrack: fmt::Debug + Send + Sync {
    fn id(&self) -> &str;

    fn kind(&self) -> TrackKind;

    fn set_enabled(&self, enabled: bool);

    /// Detach the track from whatever surface is rendering or playing it.
    fn unbind(&self);
}
