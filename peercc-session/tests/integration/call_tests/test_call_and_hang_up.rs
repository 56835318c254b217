use peercc_core::{ButtonLabels, SessionState, TrackKind, TrackOrigin};
use peercc_session::MediaTrack;

use crate::integration::{TestSession, create_test_session, init_tracing};
use crate::utils::{
    CALL_TIMEOUT_MS, MediaScript, SignalingScript, wait_for_peers, wait_for_snapshot,
    wait_for_state,
};

async fn connected_session() -> TestSession {
    let test = create_test_session(
        SignalingScript::with_peers(&[(1, "alice"), (2, "bob")]),
        MediaScript::default(),
    );
    let mut rx = test.session.subscribe();

    test.session.toggle_connection().expect("connect accepted");
    wait_for_peers(&mut rx, 2).await.expect("Peers not listed");
    test
}

#[tokio::test]
async fn test_call_then_hang_up_releases_tracks() {
    init_tracing();

    let test = connected_session().await;
    let mut rx = test.session.subscribe();

    let entered = test.session.toggle_call().expect("call accepted");
    assert_eq!(entered, SessionState::Calling);
    assert!(!test.session.snapshot().controls.call_enabled);

    let snapshot = wait_for_snapshot(&mut rx, CALL_TIMEOUT_MS, |s| {
        s.state == SessionState::InCall && s.tracks.len() == 4 && s.labels == ButtonLabels::IN_CALL
    })
    .await
    .expect("Call never established");
    assert!(snapshot.flags.connected_to_peer);
    assert!(snapshot.flags.ready_to_disconnect);
    assert!(snapshot.tracks.contains(&(TrackOrigin::Remote, TrackKind::Video)));
    assert_eq!(snapshot.labels.call, "Hang Up");
    assert!(!snapshot.controls.connect_enabled);
    assert_eq!(test.journal.count("connect_to_peer 1"), 1);

    wait_for_snapshot(&mut rx, CALL_TIMEOUT_MS, |s| s.health_stats.is_some())
        .await
        .expect("Health stats not stored");

    let entered = test.session.toggle_call().expect("hang up accepted");
    assert_eq!(entered, SessionState::EndingCall);

    let snapshot = wait_for_state(&mut rx, SessionState::Connected)
        .await
        .expect("Hang up never completed");
    assert!(!snapshot.flags.connected_to_peer);
    assert!(!snapshot.flags.ready_to_disconnect);
    assert!(snapshot.tracks.is_empty());
    assert_eq!(snapshot.peers.len(), 2);

    let tracks = test.media.tracks();
    assert_eq!(tracks.len(), 4);
    assert!(tracks.iter().all(|track| !track.is_bound()));

    wait_for_snapshot(&mut rx, CALL_TIMEOUT_MS, |s| {
        s.labels == ButtonLabels::CONNECTED
    })
    .await
    .expect("Labels not restored");

    test.session.shutdown();
}

#[tokio::test]
async fn test_local_tracks_follow_capture_preferences() {
    init_tracing();

    let test = connected_session().await;
    let mut rx = test.session.subscribe();

    test.session.set_camera_enabled(false);
    test.session.toggle_call().expect("call accepted");
    wait_for_snapshot(&mut rx, CALL_TIMEOUT_MS, |s| s.tracks.len() == 4)
        .await
        .expect("Tracks not attached");

    let local = |kind: TrackKind| {
        test.media
            .tracks()
            .into_iter()
            .find(|track| track.id() == format!("local-{kind}-1"))
            .expect("local track")
    };
    assert!(!local(TrackKind::Video).is_enabled());
    assert!(local(TrackKind::Audio).is_enabled());

    test.session.set_microphone_enabled(false);
    assert!(!local(TrackKind::Audio).is_enabled());
    test.session.set_camera_enabled(true);
    assert!(local(TrackKind::Video).is_enabled());

    test.session.shutdown();
}

#[tokio::test]
async fn test_call_with_no_peers_does_nothing() {
    init_tracing();

    let test = create_test_session(SignalingScript::default(), MediaScript::default());
    let mut rx = test.session.subscribe();

    test.session.toggle_connection().expect("connect accepted");
    wait_for_state(&mut rx, SessionState::Connected)
        .await
        .expect("Sign-in never completed");

    let state = test.session.toggle_call().expect("no-op call accepted");
    assert_eq!(state, SessionState::Connected);
    assert_eq!(test.session.state(), SessionState::Connected);
    assert_eq!(test.journal.count("connect_to_peer"), 0);

    test.session.shutdown();
}
