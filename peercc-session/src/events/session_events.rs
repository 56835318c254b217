use crate::command::{Command, CommandQueue};
use crate::events::{MediaObserver, SignalingObserver};
use crate::media::MediaTrack;
use peercc_core::{Peer, PeerId, TrackOrigin};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns collaborator callbacks into [`Command`]s on the session queue.
///
/// This is the only path by which signaling and media events reach session
/// state. Cheap to clone, one clone per collaborator.
#[derive(Clone)]
pub struct SessionEvents {
    queue: Arc<CommandQueue>,
}

impl SessionEvents {
    pub fn new(queue: Arc<CommandQueue>) -> Self {
        Self { queue }
    }

    pub fn push(&self, command: Command) {
        if let Err(closed) = self.queue.enqueue(command) {
            warn!("Session is shut down, dropping {:?}", closed.0);
        }
    }
}

impl SignalingObserver for SessionEvents {
    fn on_peer_connected(&self, id: PeerId, name: &str) {
        debug!("Peer connected: {} ({})", name, id);
        self.push(Command::PeerAdded(Peer::new(id, name)));
    }

    fn on_peer_disconnected(&self, id: PeerId) {
        debug!("Peer disconnected: {}", id);
        self.push(Command::PeerRemoved(id));
    }

    fn on_signed_in(&self) {
        self.push(Command::SignedIn);
    }

    fn on_server_connection_failure(&self) {
        self.push(Command::ServerConnectionFailure);
    }

    fn on_disconnected(&self) {
        self.push(Command::ServerDisconnected);
    }
}

impl MediaObserver for SessionEvents {
    fn on_add_remote_track(&self, track: Arc<dyn MediaTrack>) {
        self.push(Command::TrackAdded {
            origin: TrackOrigin::Remote,
            track,
        });
    }

    fn on_remove_remote_track(&self, track: Arc<dyn MediaTrack>) {
        self.push(Command::TrackRemoved {
            origin: TrackOrigin::Remote,
            track,
        });
    }

    fn on_add_local_track(&self, track: Arc<dyn MediaTrack>) {
        self.push(Command::TrackAdded {
            origin: TrackOrigin::Local,
            track,
        });
    }

    fn on_peer_connection_created(&self) {
        self.push(Command::PeerConnectionCreated);
    }

    fn on_peer_connection_closed(&self) {
        self.push(Command::PeerConnectionClosed);
    }

    fn on_connection_health_stats(&self, stats: &str) {
        self.push(Command::HealthStats(stats.to_owned()));
    }
}
