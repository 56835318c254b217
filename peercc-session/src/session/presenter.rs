use peercc_core::{ButtonLabels, ControlStates, Peer};

/// Presentation side of the session (widgets, peer list).
///
/// Called while the session lock is held, right after the state change it
/// reflects, so implementations must return quickly and must not call back
/// into the [`Session`](crate::Session).
pub trait Presenter: Send + Sync {
    fn labels_changed(&self, _labels: ButtonLabels) {}

    fn controls_changed(&self, _controls: ControlStates) {}

    fn peer_listed(&self, _peer: &Peer) {}

    fn peer_unlisted(&self, _peer: &Peer) {}

    fn roster_cleared(&self) {}

    fn selection_changed(&self, _selected: Option<usize>) {}

    fn health_stats(&self, _stats: &str) {}
}

/// Presenter for headless sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}
