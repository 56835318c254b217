use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

// Internal imports
use crate::command::{Command, CommandQueue};
use crate::error::SessionError;
use crate::events::SessionEvents;
use crate::media::MediaSession;
use crate::session::machine::SessionCore;
use crate::session::{Presenter, SessionSnapshot, UserAction};
use crate::settings::SessionSettings;
use crate::signaling::SignalingClient;
use peercc_core::{Peer, SessionState};

/// Signaling and call session: one rendezvous server connection, at most one
/// peer call.
///
/// User actions (`toggle_connection`, `toggle_call`, `select_peer`) run on
/// the caller's thread under the session lock and hand the network or media
/// work to the tokio runtime. Collaborator events arrive as [`Command`]s and
/// are applied by whoever drives [`run`](Self::run) or
/// [`process_pending`](Self::process_pending).
pub struct Session {
    /// State, roster and track handles. Held only while a command or user
    /// action is applied, never across an `.await`.
    core: Mutex<SessionCore>,

    queue: Arc<CommandQueue>,

    /// Feeds completions of dispatched operations back into the queue.
    events: SessionEvents,

    signaling: Arc<dyn SignalingClient>,
    media: Arc<dyn MediaSession>,

    snapshot_tx: watch::Sender<SessionSnapshot>,

    server_port: u16,

    /// Runtime that dispatched operations are spawned on. Captured at
    /// construction so UI threads outside the runtime can still dispatch.
    runtime: Option<Handle>,
}

impl Session {
    pub fn new(
        queue: Arc<CommandQueue>,
        signaling: Arc<dyn SignalingClient>,
        media: Arc<dyn MediaSession>,
        presenter: Arc<dyn Presenter>,
        settings: &SessionSettings,
    ) -> Self {
        media.configure(&settings.media_config());

        let core = SessionCore::new(presenter, settings.server.address.clone());
        let (snapshot_tx, _) = watch::channel(core.snapshot());
        info!("Session created for rendezvous server {}", settings.server);

        Self {
            core: Mutex::new(core),
            events: SessionEvents::new(Arc::clone(&queue)),
            queue,
            signaling,
            media,
            snapshot_tx,
            server_port: settings.server.port,
            runtime: Handle::try_current().ok(),
        }
    }

    /// Spawn dispatched operations on `handle` instead of the runtime the
    /// session was created in.
    ///
    /// If that runtime shuts down, operations it drops unfinished are
    /// reported as failed, so a pending state is never left without its
    /// completion event.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Event sink to hand to signaling and media collaborators.
    pub fn events(&self) -> SessionEvents {
        self.events.clone()
    }

    pub fn state(&self) -> SessionState {
        self.snapshot_tx.borrow().state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, SessionCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, core: &SessionCore) {
        self.snapshot_tx.send_replace(core.snapshot());
    }

    fn runtime(&self, action: UserAction) -> Result<Handle, SessionError> {
        self.runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
            .ok_or(SessionError::DispatchUnavailable(action))
    }

    fn reject(&self, action: UserAction, state: SessionState) -> SessionError {
        warn!("Rejected {}: wrong status {}", action, state);
        SessionError::InvalidTransition { action, state }
    }

    /// Connect when disconnected, disconnect when connected (and not in a
    /// call). Returns the state entered.
    pub fn toggle_connection(&self) -> Result<SessionState, SessionError> {
        let mut core = self.lock();

        match core.state {
            SessionState::Disconnected => {
                let runtime = self.runtime(UserAction::Connect)?;
                core.begin_connect();

                let signaling = Arc::clone(&self.signaling);
                let server = core.server_address.clone();
                let port = self.server_port.to_string();
                let guard = DispatchGuard::new(self.events.clone(), Command::ServerConnectionFailure);
                runtime.spawn(async move {
                    info!("Logging in to {}:{}", server, port);
                    match signaling.login(&server, &port).await {
                        Ok(()) => guard.complete(),
                        Err(e) => {
                            error!("Login to {}:{} failed: {:#}", server, port, e);
                            guard.fail();
                        }
                    }
                });
            }

            SessionState::Connected => {
                let runtime = self.runtime(UserAction::Disconnect)?;
                core.begin_disconnect();

                let signaling = Arc::clone(&self.signaling);
                let guard = DispatchGuard::new(self.events.clone(), Command::ServerDisconnected);
                runtime.spawn(async move {
                    match signaling.disconnect_from_server().await {
                        Ok(()) => guard.complete(),
                        Err(e) => {
                            error!("Disconnect from server failed: {:#}", e);
                            guard.fail();
                        }
                    }
                });
            }

            state if state.is_signed_in() || state == SessionState::Disconnecting => {
                return Err(self.reject(UserAction::Disconnect, state));
            }
            state => return Err(self.reject(UserAction::Connect, state)),
        }

        self.publish(&core);
        Ok(core.state)
    }

    /// Call the selected peer when connected, hang up when in a call.
    /// Calling with nobody selected does nothing.
    pub fn toggle_call(&self) -> Result<SessionState, SessionError> {
        let mut core = self.lock();

        match core.state {
            SessionState::Connected => {
                let Some(peer) = core.roster.selected().cloned() else {
                    debug!("Call requested with no peer selected");
                    return Ok(SessionState::Connected);
                };
                let runtime = self.runtime(UserAction::Call)?;
                core.set_state(SessionState::Calling);

                let media = Arc::clone(&self.media);
                let guard = DispatchGuard::new(self.events.clone(), Command::CallFailed);
                runtime.spawn(async move {
                    info!("Connecting to peer {}", peer);
                    match media.connect_to_peer(peer).await {
                        Ok(()) => guard.complete(),
                        Err(e) => {
                            warn!("Connect to peer failed: {:#}", e);
                            guard.fail();
                        }
                    }
                });
            }

            SessionState::InCall => {
                let runtime = self.runtime(UserAction::HangUp)?;
                core.set_state(SessionState::EndingCall);

                let media = Arc::clone(&self.media);
                let guard = DispatchGuard::new(self.events.clone(), Command::PeerConnectionClosed);
                runtime.spawn(async move {
                    match media.disconnect_from_peer().await {
                        Ok(()) => guard.complete(),
                        Err(e) => {
                            warn!("Disconnect from peer failed: {:#}", e);
                            guard.fail();
                        }
                    }
                });
            }

            state @ (SessionState::Calling | SessionState::EndingCall) => {
                return Err(self.reject(UserAction::HangUp, state));
            }
            state => return Err(self.reject(UserAction::Call, state)),
        }

        self.publish(&core);
        Ok(core.state)
    }

    /// Select the peer at `index` in roster order as the one to call.
    pub fn select_peer(&self, index: usize) -> Result<Peer, SessionError> {
        let mut core = self.lock();
        let len = core.roster.len();
        let peer = core
            .select(index)
            .ok_or(SessionError::PeerIndexOutOfRange { index, len })?;

        self.publish(&core);
        Ok(peer)
    }

    /// Change the server to log in to. Only possible while disconnected.
    pub fn set_server_address(&self, address: impl Into<String>) -> Result<(), SessionError> {
        let mut core = self.lock();
        if !core.state.controls().server_address_editable {
            return Err(self.reject(UserAction::EditServerAddress, core.state));
        }
        core.server_address = address.into();

        self.publish(&core);
        Ok(())
    }

    pub fn set_camera_enabled(&self, on: bool) {
        let mut core = self.lock();
        core.set_camera(on);
        self.publish(&core);
    }

    pub fn set_microphone_enabled(&self, on: bool) {
        let mut core = self.lock();
        core.set_microphone(on);
        self.publish(&core);
    }

    /// Apply everything queued so far. Commands queued while applying (label
    /// refreshes included) wait for the next call. Returns how many
    /// commands were applied.
    pub fn process_pending(&self) -> usize {
        let batch = self.queue.drain_all();
        let count = batch.len();
        self.apply_batch(batch);
        count
    }

    fn apply_batch(&self, batch: Vec<Command>) {
        for command in batch {
            let follow_up = {
                let mut core = self.lock();
                let follow_up = core.apply(command);
                self.publish(&core);
                follow_up
            };

            if let Some(follow_up) = follow_up {
                self.events.push(follow_up);
            }
        }
    }

    /// Consume the command queue until [`shutdown`](Self::shutdown).
    pub async fn run(&self) {
        info!("Session event loop started");

        while let Some(batch) = self.queue.next_batch().await {
            self.apply_batch(batch);
        }

        info!("Session event loop finished");
    }

    /// Stop accepting commands. [`run`](Self::run) returns once the
    /// remaining backlog is applied.
    pub fn shutdown(&self) {
        self.queue.close();
    }

    /// Tear the session down before the process is suspended.
    ///
    /// Cancels a pending call attempt, then waits for the peer connection to
    /// close (if in a call), then for the server to disconnect (if signed
    /// in). A failed step is logged and its closing event queued locally, and
    /// the remaining steps still run.
    pub async fn on_app_suspending(&self) {
        info!("App suspending, tearing down session");
        self.media.cancel_connecting_to_peer();

        let (in_call, connected) = {
            let core = self.lock();
            (core.flags.connected_to_peer, core.flags.connected)
        };

        if in_call {
            {
                let mut core = self.lock();
                if core.state == SessionState::InCall {
                    core.set_state(SessionState::EndingCall);
                }
                self.publish(&core);
            }
            if let Err(e) = self.media.disconnect_from_peer().await {
                warn!("Disconnect from peer during suspend failed: {:#}", e);
                self.events.push(Command::PeerConnectionClosed);
            }
        }

        if connected {
            {
                let mut core = self.lock();
                if core.state.is_signed_in() {
                    core.begin_disconnect();
                } else {
                    core.flags.disconnecting = true;
                }
                self.publish(&core);
            }
            if let Err(e) = self.signaling.disconnect_from_server().await {
                warn!("Disconnect from server during suspend failed: {:#}", e);
                self.events.push(Command::ServerDisconnected);
            }
        }

        info!("Session ready to suspend");
    }
}

/// Queues the failure event of a dispatched operation unless the operation
/// completes. Dropping the guard unfinished (the runtime shut down and
/// dropped the task) counts as a failure.
struct DispatchGuard {
    events: SessionEvents,
    on_failure: Option<Command>,
}

impl DispatchGuard {
    fn new(events: SessionEvents, on_failure: Command) -> Self {
        Self {
            events,
            on_failure: Some(on_failure),
        }
    }

    fn complete(mut self) {
        self.on_failure = None;
    }

    fn fail(mut self) {
        if let Some(command) = self.on_failure.take() {
            self.events.push(command);
        }
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        if let Some(command) = self.on_failure.take() {
            warn!("Dispatched operation dropped before completing, queueing {:?}", command);
            self.events.push(command);
        }
    }
}
