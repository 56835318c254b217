use peercc_core::{ButtonLabels, SessionState};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{
    CALL_TIMEOUT_MS, MediaScript, SignalingScript, wait_for_peers, wait_for_snapshot,
    wait_for_state,
};

#[tokio::test]
async fn test_connect_signs_in_and_lists_peers() {
    init_tracing();

    let test = create_test_session(
        SignalingScript::with_peers(&[(1, "alice"), (2, "bob")]),
        MediaScript::default(),
    );
    let mut rx = test.session.subscribe();

    let entered = test.session.toggle_connection().expect("connect accepted");
    assert_eq!(entered, SessionState::Connecting);
    assert!(test.session.snapshot().flags.connecting);

    let snapshot = wait_for_state(&mut rx, SessionState::Connected)
        .await
        .expect("Sign-in never completed");
    assert!(snapshot.flags.connected);
    assert!(!snapshot.flags.connecting);
    assert!(!snapshot.controls.server_address_editable);

    let snapshot = wait_for_peers(&mut rx, 2).await.expect("Peers not listed");
    assert_eq!(snapshot.selected, Some(0));
    assert_eq!(snapshot.selected_peer().map(|p| p.name.as_str()), Some("alice"));
    assert_eq!(test.presenter.listed_names(), vec!["alice", "bob"]);

    let snapshot = wait_for_snapshot(&mut rx, CALL_TIMEOUT_MS, |s| {
        s.labels == ButtonLabels::CONNECTED
    })
    .await
    .expect("Labels not refreshed");
    assert_eq!(snapshot.labels.connect, "Disconnect");
    assert!(test.presenter.controls().last().is_some_and(|c| c.call_enabled));

    assert_eq!(test.journal.count("login"), 1);
    assert_eq!(test.journal.entries()[1], "login 192.168.11.132:8888");

    test.session.shutdown();
}

#[tokio::test]
async fn test_media_layer_configured_at_startup() {
    init_tracing();

    let test = create_test_session(SignalingScript::default(), MediaScript::default());

    let config = test.media.config().expect("configure not called");
    assert_eq!(config.ice_servers.len(), 5);
    assert_eq!(config.audio_codec, None);
    assert_eq!(test.journal.entries()[0], "configure");

    test.session.shutdown();
}

#[tokio::test]
async fn test_server_address_editable_only_while_disconnected() {
    init_tracing();

    let test = create_test_session(SignalingScript::default(), MediaScript::default());
    let mut rx = test.session.subscribe();

    test.session
        .set_server_address("10.0.0.5")
        .expect("editable while disconnected");
    test.session.toggle_connection().expect("connect accepted");
    wait_for_state(&mut rx, SessionState::Connected)
        .await
        .expect("Sign-in never completed");

    assert!(test.session.set_server_address("10.0.0.6").is_err());
    assert_eq!(test.session.snapshot().server_address, "10.0.0.5");
    assert_eq!(test.journal.count("login 10.0.0.5:8888"), 1);

    test.session.shutdown();
}
