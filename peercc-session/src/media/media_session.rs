use crate::media::MediaConfig;
use async_trait::async_trait;
use peercc_core::Peer;

/// The peer-connection layer: handshake, track negotiation, teardown.
///
/// Completion of `connect_to_peer` / `disconnect_from_peer` is reported
/// through [`MediaObserver`](crate::MediaObserver) events; the returned
/// `Result` only covers failure to start or finish the operation.
#[async_trait]
pub trait MediaSession: Send + Sync {
    fn configure(&self, config: &MediaConfig);

    async fn connect_to_peer(&self, peer: Peer) -> anyhow::Result<()>;

    async fn disconnect_from_peer(&self) -> anyhow::Result<()>;

    /// Abort an in-flight `connect_to_peer`, if any.
    fn cancel_connecting_to_peer(&self);
}
