use async_trait::async_trait;

/// Connection to the rendezvous server.
///
/// Both operations only start or finish the exchange with the server; the
/// outcome arrives later through [`SignalingObserver`](crate::SignalingObserver)
/// events (`signed_in`, `server_connection_failure`, `disconnected`).
#[async_trait]
pub trait SignalingClient: Send + Sync {
    async fn login(&self, server: &str, port: &str) -> anyhow::Result<()>;

    async fn disconnect_from_server(&self) -> anyhow::Result<()>;
}
