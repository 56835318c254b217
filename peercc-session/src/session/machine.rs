use crate::command::Command;
use crate::media::{MediaTrack, TrackSlots};
use crate::roster::PeerRoster;
use crate::session::{MediaPreferences, Presenter, SessionFlags, SessionSnapshot};
use peercc_core::{ButtonLabels, Peer, PeerId, SessionState, TrackKind, TrackOrigin};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything guarded by the session lock: state, roster, track handles and
/// flags. Only ever touched by one thread at a time.
pub(crate) struct SessionCore {
    pub(crate) state: SessionState,
    pub(crate) flags: SessionFlags,
    pub(crate) preferences: MediaPreferences,
    pub(crate) roster: PeerRoster,
    pub(crate) tracks: TrackSlots,
    pub(crate) labels: ButtonLabels,
    pub(crate) server_address: String,
    pub(crate) health_stats: Option<String>,
    presenter: Arc<dyn Presenter>,
}

impl SessionCore {
    pub(crate) fn new(presenter: Arc<dyn Presenter>, server_address: String) -> Self {
        Self {
            state: SessionState::Disconnected,
            flags: SessionFlags::default(),
            preferences: MediaPreferences::default(),
            roster: PeerRoster::new(),
            tracks: TrackSlots::new(),
            labels: ButtonLabels::NOT_CONNECTED,
            server_address,
            health_stats: None,
            presenter,
        }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            flags: self.flags,
            preferences: self.preferences,
            labels: self.labels,
            controls: self.state.controls(),
            server_address: self.server_address.clone(),
            peers: self.roster.peers().to_vec(),
            selected: self.roster.selected_index(),
            tracks: self.tracks.occupied(),
            health_stats: self.health_stats.clone(),
        }
    }

    pub(crate) fn set_state(&mut self, next: SessionState) {
        if self.state == next {
            return;
        }
        info!("Session state: {} -> {}", self.state, next);
        self.state = next;
        self.presenter.controls_changed(next.controls());
    }

    // --- user initiated transitions, decided by `Session` ---

    pub(crate) fn begin_connect(&mut self) {
        self.flags.connecting = true;
        self.set_state(SessionState::Connecting);
    }

    pub(crate) fn begin_disconnect(&mut self) {
        self.flags.disconnecting = true;
        self.set_state(SessionState::Disconnecting);
        self.clear_roster();
    }

    pub(crate) fn select(&mut self, index: usize) -> Option<Peer> {
        let before = self.roster.selected_index();
        let peer = self.roster.select(index).ok()?.clone();
        if before != Some(index) {
            self.presenter.selection_changed(Some(index));
        }
        Some(peer)
    }

    pub(crate) fn set_camera(&mut self, on: bool) {
        self.preferences.camera_on = on;
        if let Some(track) = self.tracks.get(TrackOrigin::Local, TrackKind::Video) {
            track.set_enabled(on);
        }
    }

    pub(crate) fn set_microphone(&mut self, on: bool) {
        self.preferences.microphone_on = on;
        if let Some(track) = self.tracks.get(TrackOrigin::Local, TrackKind::Audio) {
            track.set_enabled(on);
        }
    }

    fn selection(&self) -> (Option<PeerId>, Option<usize>) {
        (
            self.roster.selected().map(|peer| peer.id),
            self.roster.selected_index(),
        )
    }

    fn clear_roster(&mut self) {
        let had_selection = self.roster.selected_index().is_some();
        self.roster.clear();
        self.presenter.roster_cleared();
        if had_selection {
            self.presenter.selection_changed(None);
        }
    }

    // --- queued commands ---

    /// Apply one command. Returns the presentation refresh to queue for the
    /// next tick, if the command caused a transition that needs one.
    pub(crate) fn apply(&mut self, command: Command) -> Option<Command> {
        match command {
            Command::Empty => None,

            Command::EnterConnected => {
                self.refresh_labels(SessionState::Connected, ButtonLabels::CONNECTED)
            }
            Command::EnterInCall => self.refresh_labels(SessionState::InCall, ButtonLabels::IN_CALL),
            Command::EnterNotConnected => {
                self.refresh_labels(SessionState::Disconnected, ButtonLabels::NOT_CONNECTED)
            }

            Command::PeerAdded(peer) => self.peer_added(peer),
            Command::PeerRemoved(id) => self.peer_removed(id),

            Command::SignedIn => self.signed_in(),
            Command::ServerConnectionFailure => self.server_connection_failure(),
            Command::ServerDisconnected => self.server_disconnected(),

            Command::PeerConnectionCreated => self.peer_connection_created(),
            Command::PeerConnectionClosed => self.peer_connection_closed(),
            Command::CallFailed => self.call_failed(),

            Command::TrackAdded { origin, track } => self.track_added(origin, track),
            Command::TrackRemoved { origin, track } => {
                if !self.tracks.detach(origin, track.as_ref()) {
                    debug!("{:?} {} track {} was not held", origin, track.kind(), track.id());
                }
                None
            }

            Command::HealthStats(stats) => {
                self.presenter.health_stats(&stats);
                self.health_stats = Some(stats);
                None
            }
        }
    }

    fn stale(&self, what: &str) -> Option<Command> {
        debug!("Discarding stale {} in state {}", what, self.state);
        None
    }

    fn refresh_labels(&mut self, expected: SessionState, labels: ButtonLabels) -> Option<Command> {
        if self.state != expected {
            return self.stale("label refresh");
        }
        self.labels = labels;
        self.presenter.labels_changed(labels);
        None
    }

    fn peer_added(&mut self, peer: Peer) -> Option<Command> {
        if matches!(
            self.state,
            SessionState::Disconnected | SessionState::Disconnecting
        ) {
            return self.stale("peer announcement");
        }

        let had_selection = self.roster.selected_index().is_some();
        match self.roster.add(peer.clone()) {
            Ok(()) => {
                info!("Peers.Add: {}", peer);
                self.presenter.peer_listed(&peer);
                if !had_selection {
                    self.presenter.selection_changed(self.roster.selected_index());
                }
            }
            Err(e) => warn!("Ignoring peer announcement: {}", e),
        }
        None
    }

    fn peer_removed(&mut self, id: PeerId) -> Option<Command> {
        let selected_before = self.selection();
        let Some(peer) = self.roster.remove(id) else {
            debug!("Peer {} left but was not listed", id);
            return None;
        };

        info!("Peers.Remove: {}", peer);
        self.presenter.peer_unlisted(&peer);
        let selected_after = self.selection();
        if selected_before != selected_after {
            self.presenter.selection_changed(selected_after.1);
        }
        None
    }

    fn signed_in(&mut self) -> Option<Command> {
        if self.state != SessionState::Connecting {
            return self.stale("sign-in");
        }
        self.flags.connected = true;
        self.flags.connecting = false;
        self.flags.microphone_enabled = true;
        self.flags.camera_enabled = true;
        self.set_state(SessionState::Connected);
        Some(Command::EnterConnected)
    }

    fn server_connection_failure(&mut self) -> Option<Command> {
        if self.state != SessionState::Connecting {
            return self.stale("connection failure");
        }
        warn!("Failed to connect to server {}", self.server_address);
        self.flags.connecting = false;
        if !self.roster.is_empty() {
            self.clear_roster();
        }
        self.set_state(SessionState::Disconnected);
        Some(Command::EnterNotConnected)
    }

    fn server_disconnected(&mut self) -> Option<Command> {
        if self.state != SessionState::Disconnecting {
            return self.stale("server disconnect");
        }
        self.flags.connected = false;
        self.flags.disconnecting = false;
        self.flags.microphone_enabled = false;
        self.flags.camera_enabled = false;
        if !self.roster.is_empty() {
            self.clear_roster();
        }
        self.set_state(SessionState::Disconnected);
        Some(Command::EnterNotConnected)
    }

    fn peer_connection_created(&mut self) -> Option<Command> {
        if self.state != SessionState::Calling {
            return self.stale("peer connection");
        }
        self.flags.connected_to_peer = true;
        self.set_state(SessionState::InCall);
        Some(Command::EnterInCall)
    }

    fn peer_connection_closed(&mut self) -> Option<Command> {
        // Track handles are ours whatever state we are in.
        self.tracks.release_all();
        self.flags.connected_to_peer = false;
        self.flags.ready_to_disconnect = false;

        if !matches!(
            self.state,
            SessionState::Calling | SessionState::InCall | SessionState::EndingCall
        ) {
            return self.stale("peer connection close");
        }
        self.flags.microphone_enabled = true;
        self.flags.camera_enabled = true;
        self.set_state(SessionState::Connected);
        Some(Command::EnterConnected)
    }

    fn call_failed(&mut self) -> Option<Command> {
        if self.state != SessionState::Calling {
            return self.stale("call failure");
        }
        warn!("Call attempt failed");
        self.set_state(SessionState::Connected);
        Some(Command::EnterConnected)
    }

    fn track_added(&mut self, origin: TrackOrigin, track: Arc<dyn MediaTrack>) -> Option<Command> {
        if !matches!(self.state, SessionState::Calling | SessionState::InCall) {
            debug!(
                "Releasing {:?} {} track {} that arrived while {}",
                origin,
                track.kind(),
                track.id(),
                self.state
            );
            track.unbind();
            return None;
        }

        match origin {
            TrackOrigin::Remote => self.flags.ready_to_disconnect = true,
            TrackOrigin::Local => track.set_enabled(match track.kind() {
                TrackKind::Video => self.preferences.camera_on,
                TrackKind::Audio => self.preferences.microphone_on,
            }),
        }
        debug!("Attached {:?} {} track {}", origin, track.kind(), track.id());
        self.tracks.attach(origin, track);
        None
    }
}
