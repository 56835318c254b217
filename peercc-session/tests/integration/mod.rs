pub mod call_tests;

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::Level;

use peercc_session::{CommandQueue, Session, SessionSettings};

use crate::utils::{
    CallJournal, MediaScript, MockMediaSession, MockSignalingClient, RecordingPresenter,
    SignalingScript,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A session wired to scripted collaborators.
pub struct TestSession {
    pub session: Arc<Session>,
    pub journal: CallJournal,
    pub media: MockMediaSession,
    pub presenter: RecordingPresenter,
}

/// Build a session without starting its consumer loop. Tests drive it with
/// `process_pending`.
pub fn build_test_session(signaling: SignalingScript, media: MediaScript) -> TestSession {
    assemble(signaling, media, None)
}

/// Like [`build_test_session`], dispatching on `runtime`.
pub fn build_test_session_on(
    runtime: Handle,
    signaling: SignalingScript,
    media: MediaScript,
) -> TestSession {
    assemble(signaling, media, Some(runtime))
}

fn assemble(signaling: SignalingScript, media: MediaScript, runtime: Option<Handle>) -> TestSession {
    let queue = Arc::new(CommandQueue::new());
    let events = peercc_session::SessionEvents::new(Arc::clone(&queue));
    let journal = CallJournal::new();
    let presenter = RecordingPresenter::new();

    let signaling = MockSignalingClient::new(events.clone(), journal.clone(), signaling);
    let media = MockMediaSession::new(events, journal.clone(), media);

    let mut session = Session::new(
        queue,
        Arc::new(signaling),
        Arc::new(media.clone()),
        Arc::new(presenter.clone()),
        &SessionSettings::default(),
    );
    if let Some(runtime) = runtime {
        session = session.with_runtime(runtime);
    }

    TestSession {
        session: Arc::new(session),
        journal,
        media,
        presenter,
    }
}

/// Build a session and spawn its consumer loop.
pub fn create_test_session(signaling: SignalingScript, media: MediaScript) -> TestSession {
    let test = build_test_session(signaling, media);

    let session = Arc::clone(&test.session);
    tokio::spawn(async move {
        session.run().await;
    });

    test
}
