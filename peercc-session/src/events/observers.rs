use crate::media::MediaTrack;
use peercc_core::PeerId;
use std::sync::Arc;

/// Events raised by a [`SignalingClient`](crate::SignalingClient).
///
/// May be called from any thread.
pub trait SignalingObserver: Send + Sync {
    fn on_peer_connected(&self, id: PeerId, name: &str);

    fn on_peer_disconnected(&self, id: PeerId);

    fn on_signed_in(&self);

    fn on_server_connection_failure(&self);

    fn on_disconnected(&self);
}

/// Events raised by a [`MediaSession`](crate::MediaSession).
///
/// May be called from any thread. Tracks passed in become the receiver's
/// responsibility to unbind.
pub trait MediaObserver: Send + Sync {
    fn on_add_remote_track(&self, track: Arc<dyn MediaTrack>);

    fn on_remove_remote_track(&self, track: Arc<dyn MediaTrack>);

    fn on_add_local_track(&self, track: Arc<dyn MediaTrack>);

    fn on_peer_connection_created(&self);

    fn on_peer_connection_closed(&self);

    fn on_connection_health_stats(&self, stats: &str);
}
