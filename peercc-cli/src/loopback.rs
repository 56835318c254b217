use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use peercc_core::{Peer, TrackKind};
use peercc_session::{
    MediaConfig, MediaObserver, MediaSession, MediaTrack, SessionEvents, SignalingClient,
    SignalingObserver,
};

const ROUND_TRIP: Duration = Duration::from_millis(300);

/// Rendezvous server simulated in-process. Signs in every login and
/// announces a fixed set of peers.
pub struct LoopbackSignaling {
    events: SessionEvents,
    name: String,
    peers: Vec<Peer>,
}

impl LoopbackSignaling {
    pub fn new(events: SessionEvents, name: impl Into<String>) -> Self {
        Self {
            events,
            name: name.into(),
            peers: vec![
                Peer::new(101, "living-room"),
                Peer::new(102, "office-desk"),
                Peer::new(103, "hololens"),
            ],
        }
    }
}

#[async_trait]
impl SignalingClient for LoopbackSignaling {
    async fn login(&self, server: &str, port: &str) -> anyhow::Result<()> {
        info!("[Loopback] {} logging in to {}:{}", self.name, server, port);
        tokio::time::sleep(ROUND_TRIP).await;

        self.events.on_signed_in();
        for peer in &self.peers {
            self.events.on_peer_connected(peer.id, &peer.name);
        }
        Ok(())
    }

    async fn disconnect_from_server(&self) -> anyhow::Result<()> {
        tokio::time::sleep(ROUND_TRIP).await;
        self.events.on_disconnected();
        Ok(())
    }
}

/// Media track that only logs what happens to it.
#[derive(Debug)]
pub struct LoopbackTrack {
    id: String,
    kind: TrackKind,
    enabled: AtomicBool,
}

impl LoopbackTrack {
    fn new(id: String, kind: TrackKind) -> Arc<Self> {
        Arc::new(Self {
            id,
            kind,
            enabled: AtomicBool::new(true),
        })
    }
}

impl MediaTrack for LoopbackTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn set_enabled(&self, enabled: bool) {
        if self.enabled.swap(enabled, Ordering::SeqCst) != enabled {
            debug!("[Loopback] track {} enabled={}", self.id, enabled);
        }
    }

    fn unbind(&self) {
        debug!("[Loopback] track {} unbound", self.id);
    }
}

/// Peer connection simulated in-process. Every call is answered, unless
/// cancelled while ringing.
pub struct LoopbackMedia {
    events: SessionEvents,
    cancelled: AtomicBool,
}

impl LoopbackMedia {
    pub fn new(events: SessionEvents) -> Self {
        Self {
            events,
            cancelled: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl MediaSession for LoopbackMedia {
    fn configure(&self, config: &MediaConfig) {
        info!(
            "[Loopback] media configured with {} ICE servers",
            config.ice_servers.len()
        );
    }

    async fn connect_to_peer(&self, peer: Peer) -> anyhow::Result<()> {
        self.cancelled.store(false, Ordering::SeqCst);
        tokio::time::sleep(ROUND_TRIP).await;

        if self.cancelled.load(Ordering::SeqCst) {
            anyhow::bail!("call to {} cancelled", peer);
        }

        for kind in [TrackKind::Video, TrackKind::Audio] {
            self.events
                .on_add_local_track(LoopbackTrack::new(format!("self-{kind}"), kind));
        }
        self.events.on_peer_connection_created();
        for kind in [TrackKind::Video, TrackKind::Audio] {
            self.events
                .on_add_remote_track(LoopbackTrack::new(format!("{}-{kind}", peer.id), kind));
        }
        self.events
            .on_connection_health_stats(&format!("peer={} rtt={}ms", peer.id, ROUND_TRIP.as_millis()));
        Ok(())
    }

    async fn disconnect_from_peer(&self) -> anyhow::Result<()> {
        tokio::time::sleep(ROUND_TRIP).await;
        self.events.on_peer_connection_closed();
        Ok(())
    }

    fn cancel_connecting_to_peer(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
