use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;

use peercc_core::SessionState;
use peercc_session::{Session, SessionSnapshot};

/// Timeout for a state the session should reach on its own (ms).
pub const STATE_TIMEOUT_MS: u64 = 2000;

/// Timeout for a collaborator call to show up in the journal (ms).
pub const CALL_TIMEOUT_MS: u64 = 2000;

/// Wait until a published snapshot satisfies `predicate` and return it.
pub async fn wait_for_snapshot(
    rx: &mut watch::Receiver<SessionSnapshot>,
    timeout_ms: u64,
    predicate: impl FnMut(&SessionSnapshot) -> bool,
) -> Result<SessionSnapshot> {
    let snapshot = tokio::time::timeout(Duration::from_millis(timeout_ms), rx.wait_for(predicate))
        .await
        .context("Timed out waiting for session snapshot")?
        .context("Session dropped while waiting")?
        .clone();
    tracing::debug!("[SessionHelper] Reached {}", snapshot.state);
    Ok(snapshot)
}

/// Wait until the session enters `state`.
pub async fn wait_for_state(
    rx: &mut watch::Receiver<SessionSnapshot>,
    state: SessionState,
) -> Result<SessionSnapshot> {
    wait_for_snapshot(rx, STATE_TIMEOUT_MS, |snapshot| snapshot.state == state)
        .await
        .with_context(|| format!("Session never reached {state}"))
}

/// Wait until the session shows `count` peers.
pub async fn wait_for_peers(
    rx: &mut watch::Receiver<SessionSnapshot>,
    count: usize,
) -> Result<SessionSnapshot> {
    wait_for_snapshot(rx, STATE_TIMEOUT_MS, |snapshot| snapshot.peers.len() == count)
        .await
        .with_context(|| format!("Session never listed {count} peers"))
}

/// Apply queued commands by hand until the session enters `state`. For
/// sessions built without a consumer loop.
pub async fn drive_until(session: &Session, state: SessionState) -> Result<SessionSnapshot> {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(STATE_TIMEOUT_MS);

    loop {
        session.process_pending();
        if session.state() == state {
            // One more pass picks up the label refresh queued by the transition.
            session.process_pending();
            return Ok(session.snapshot());
        }
        if tokio::time::Instant::now() > deadline {
            anyhow::bail!("Session stuck in {} waiting for {}", session.state(), state);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
