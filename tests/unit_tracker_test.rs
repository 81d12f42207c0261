use examsock::config::Config;
use examsock::connection::{ConnectionTracker, WebSocketError};
use examsock::core::{
    ConnectionEvent, ConnectionEventKind, ConnectionListener, ConnectionRegistry, EventDispatcher,
    ExamSockError, Principal,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every delivered event as (kind, session, path, principal name).
#[derive(Default)]
struct CollectingListener {
    seen: Mutex<Vec<(ConnectionEventKind, String, String, String)>>,
}

impl ConnectionListener for CollectingListener {
    fn on_event(&self, event: &ConnectionEvent) -> Result<(), ExamSockError> {
        self.seen.lock().push((
            event.kind,
            event.session_id.clone(),
            event.path.clone(),
            event.principal.name().to_string(),
        ));
        Ok(())
    }
}

fn setup() -> (ConnectionTracker, Arc<ConnectionRegistry>, Arc<CollectingListener>) {
    let registry = Arc::new(ConnectionRegistry::new());
    let dispatcher = Arc::new(EventDispatcher::new());
    let listener = Arc::new(CollectingListener::default());
    dispatcher.subscribe(Arc::clone(&listener) as Arc<dyn ConnectionListener>);
    let tracker = ConnectionTracker::new(Arc::clone(&registry), dispatcher);
    (tracker, registry, listener)
}

fn alice() -> Arc<dyn Principal> {
    Arc::new("alice".to_string())
}

#[tokio::test]
async fn test_connect_reconnect_disconnect_scenario() {
    let (tracker, registry, listener) = setup();

    let first = tracker
        .on_connect("S1", "/topic/exam/5", Some(alice()))
        .unwrap();
    assert_eq!(first.kind, ConnectionEventKind::NewUserPathConnection);

    let second = tracker
        .on_connect("S1", "/topic/exam/5", Some(alice()))
        .unwrap();
    assert_eq!(second.kind, ConnectionEventKind::ExistingUserPathConnection);

    let closed = tracker.on_disconnect("S1", "/topic/exam/5").unwrap();
    assert_eq!(closed.kind, ConnectionEventKind::UserPathConnectionClosed);
    assert_eq!(closed.principal.name(), "alice");
    assert_eq!(registry.session_count(), 0);

    // A second disconnect for the same pair: no event, no error.
    assert!(tracker.on_disconnect("S1", "/topic/exam/5").is_none());

    let seen = listener.seen.lock();
    assert_eq!(
        seen.iter().map(|(k, ..)| *k).collect::<Vec<_>>(),
        vec![
            ConnectionEventKind::NewUserPathConnection,
            ConnectionEventKind::ExistingUserPathConnection,
            ConnectionEventKind::UserPathConnectionClosed,
        ]
    );
    for (_, session, path, name) in seen.iter() {
        assert_eq!(session, "S1");
        assert_eq!(path, "/topic/exam/5");
        assert_eq!(name, "alice");
    }
}

#[tokio::test]
async fn test_missing_principal_is_rejected_with_unauthorized() {
    let (tracker, registry, listener) = setup();

    let err = tracker.on_connect("S1", "/topic/exam/5", None).unwrap_err();
    assert!(matches!(err, ExamSockError::MissingPrincipal(_)));

    // The rejection payload the transport sends before closing.
    let payload = WebSocketError::from(&err);
    assert_eq!(payload.status_code, 401);
    assert_eq!(payload.error_code, "UNAUTHORIZED");

    // Nothing was recorded or published.
    assert_eq!(registry.session_count(), 0);
    assert!(listener.seen.lock().is_empty());
}

#[tokio::test]
async fn test_distinct_paths_are_new_per_binding() {
    let (tracker, registry, _listener) = setup();

    let first = tracker
        .on_connect("S1", "/topic/exam/5", Some(alice()))
        .unwrap();
    let other_path = tracker
        .on_connect("S1", "/topic/exam/6", Some(alice()))
        .unwrap();
    assert_eq!(first.kind, ConnectionEventKind::NewUserPathConnection);
    assert_eq!(other_path.kind, ConnectionEventKind::NewUserPathConnection);

    tracker.on_disconnect("S1", "/topic/exam/5");
    assert_eq!(registry.paths_of("S1"), vec!["/topic/exam/6".to_string()]);
}

#[tokio::test]
async fn test_configured_session_limit_rejects_extra_paths() {
    let registry = Arc::new(ConnectionRegistry::new());
    let dispatcher = Arc::new(EventDispatcher::new());
    let config = Config {
        max_paths_per_session: 1,
        ..Config::default()
    };
    let tracker = ConnectionTracker::from_config(Arc::clone(&registry), dispatcher, &config);

    tracker
        .on_connect("S1", "/topic/exam/5", Some(alice()))
        .unwrap();
    let err = tracker
        .on_connect("S1", "/topic/exam/6", Some(alice()))
        .unwrap_err();
    assert!(matches!(err, ExamSockError::SessionLimitExceeded { .. }));

    // Rebinding the held path is still an Existing connection, not a limit hit.
    let rebind = tracker
        .on_connect("S1", "/topic/exam/5", Some(alice()))
        .unwrap();
    assert_eq!(rebind.kind, ConnectionEventKind::ExistingUserPathConnection);
}

/// Fails every delivery, for exercising fail-fast dispatch.
struct RejectingListener;

impl ConnectionListener for RejectingListener {
    fn on_event(&self, _event: &ConnectionEvent) -> Result<(), ExamSockError> {
        Err(ExamSockError::Internal("handler down".to_string()))
    }
}

#[tokio::test]
async fn test_binding_survives_fail_fast_dispatch_error() {
    let registry = Arc::new(ConnectionRegistry::new());
    let config = Config {
        fail_fast_dispatch: true,
        ..Config::default()
    };
    let dispatcher = Arc::new(EventDispatcher::from_config(&config));
    let rejecting: Arc<dyn ConnectionListener> = Arc::new(RejectingListener);
    dispatcher.subscribe(Arc::clone(&rejecting));
    let tracker =
        ConnectionTracker::from_config(Arc::clone(&registry), Arc::clone(&dispatcher), &config);

    let err = tracker
        .on_connect("S1", "/topic/exam/5", Some(alice()))
        .unwrap_err();
    assert!(matches!(err, ExamSockError::ListenerFailure(_)));

    // The binding was recorded before dispatch failed and is still held.
    assert_eq!(registry.binding_count(), 1);
    assert!(registry.principal_of("S1", "/topic/exam/5").is_some());

    // Once the failing listener is gone, the same pair classifies as Existing.
    dispatcher.unsubscribe(&rejecting);
    let rebind = tracker
        .on_connect("S1", "/topic/exam/5", Some(alice()))
        .unwrap();
    assert_eq!(rebind.kind, ConnectionEventKind::ExistingUserPathConnection);
}

#[tokio::test]
async fn test_event_source_comes_from_config() {
    let registry = Arc::new(ConnectionRegistry::new());
    let dispatcher = Arc::new(EventDispatcher::new());
    let config = Config {
        event_source: "exam-gateway".to_string(),
        ..Config::default()
    };
    let tracker = ConnectionTracker::from_config(registry, dispatcher, &config);

    let event = tracker
        .on_connect("S1", "/topic/exam/5", Some(alice()))
        .unwrap();
    assert_eq!(event.source.label(), "exam-gateway");
}
