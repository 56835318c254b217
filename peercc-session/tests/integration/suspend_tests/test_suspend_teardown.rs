use peercc_core::SessionState;

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{
    CALL_TIMEOUT_MS, MediaScript, SignalingScript, wait_for_peers, wait_for_snapshot,
    wait_for_state,
};

#[tokio::test]
async fn test_suspend_in_call_tears_down_in_order() {
    init_tracing();

    let test = create_test_session(
        SignalingScript::with_peers(&[(1, "alice")]),
        MediaScript::default(),
    );
    let mut rx = test.session.subscribe();

    test.session.toggle_connection().expect("connect accepted");
    wait_for_peers(&mut rx, 1).await.expect("Peer not listed");
    test.session.toggle_call().expect("call accepted");
    wait_for_snapshot(&mut rx, CALL_TIMEOUT_MS, |s| {
        s.state == SessionState::InCall && s.tracks.len() == 4
    })
    .await
    .expect("Call never established");

    test.session.on_app_suspending().await;

    let teardown: Vec<String> = test
        .journal
        .entries()
        .into_iter()
        .skip_while(|entry| entry != "cancel_connecting_to_peer")
        .collect();
    assert_eq!(
        teardown,
        vec![
            "cancel_connecting_to_peer",
            "disconnect_from_peer:start",
            "disconnect_from_peer:done",
            "disconnect_from_server:start",
            "disconnect_from_server:done",
        ]
    );

    let snapshot = wait_for_state(&mut rx, SessionState::Disconnected)
        .await
        .expect("Session not torn down");
    assert!(!snapshot.flags.connected);
    assert!(!snapshot.flags.connected_to_peer);
    assert!(snapshot.tracks.is_empty());
    assert!(snapshot.peers.is_empty());
    assert!(test.media.tracks().iter().all(|track| !track.is_bound()));

    test.session.shutdown();
}

#[tokio::test]
async fn test_suspend_while_disconnected_only_cancels() {
    init_tracing();

    let test = create_test_session(SignalingScript::default(), MediaScript::default());

    test.session.on_app_suspending().await;

    assert_eq!(
        test.journal.entries(),
        vec!["configure", "cancel_connecting_to_peer"]
    );
    assert_eq!(test.session.state(), SessionState::Disconnected);

    test.session.shutdown();
}

#[tokio::test]
async fn test_suspend_while_connected_disconnects_server() {
    init_tracing();

    let test = create_test_session(SignalingScript::default(), MediaScript::default());
    let mut rx = test.session.subscribe();

    test.session.toggle_connection().expect("connect accepted");
    wait_for_state(&mut rx, SessionState::Connected)
        .await
        .expect("Sign-in never completed");

    test.session.on_app_suspending().await;

    assert_eq!(test.journal.count("disconnect_from_peer"), 0);
    assert_eq!(test.journal.count("disconnect_from_server:done"), 1);
    wait_for_state(&mut rx, SessionState::Disconnected)
        .await
        .expect("Server disconnect never applied");

    test.session.shutdown();
}

#[tokio::test]
async fn test_suspend_releases_call_when_peer_disconnect_fails() {
    init_tracing();

    let test = create_test_session(
        SignalingScript::with_peers(&[(1, "alice")]),
        MediaScript {
            fail_disconnect: true,
            ..MediaScript::default()
        },
    );
    let mut rx = test.session.subscribe();

    test.session.toggle_connection().expect("connect accepted");
    wait_for_peers(&mut rx, 1).await.expect("Peer not listed");
    test.session.toggle_call().expect("call accepted");
    wait_for_snapshot(&mut rx, CALL_TIMEOUT_MS, |s| {
        s.state == SessionState::InCall && s.tracks.len() == 4
    })
    .await
    .expect("Call never established");

    test.session.on_app_suspending().await;
    assert_eq!(test.journal.count("disconnect_from_peer:failed"), 1);
    assert_eq!(test.journal.count("disconnect_from_server:done"), 1);

    let snapshot = wait_for_snapshot(&mut rx, CALL_TIMEOUT_MS, |s| {
        s.state == SessionState::Disconnected && s.tracks.is_empty()
    })
    .await
    .expect("Call not released locally");
    assert!(!snapshot.flags.connected_to_peer);
    assert!(!snapshot.flags.ready_to_disconnect);
    assert!(test.media.tracks().iter().all(|track| !track.is_bound()));

    test.session.shutdown();
}
