use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{extract::State, http::StatusCode, routing::post, Router};
use event_api_client::{global, ClientConfig, ClientOptions, EventsClient, ResultRecord};
use serde_json::json;

async fn spawn_echo_server() -> (String, Arc<AtomicUsize>, tokio::task::JoinHandle<()>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route(
            "/events",
            post(|State(hits): State<Arc<AtomicUsize>>, body: String| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (StatusCode::OK, body)
            }),
        )
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    (format!("http://{address}"), hits, task)
}

// The facade is process-wide state, so its scenarios run in one test.
#[tokio::test]
async fn shared_client_lifecycle() {
    std::env::remove_var("EVENTS_BASE_URL");
    std::env::remove_var("PROJECT_KEY");
    std::env::remove_var("ACCESS_TOKEN");
    global::reset();

    let result = global::track(&json!({"name": "signup"})).await;
    match result {
        ResultRecord::Failed(failure) => {
            assert_eq!(failure.code, 0);
            assert_eq!(failure.message, "Project key cannot be empty");
        }
        other => panic!("expected configuration failure, got {other:?}"),
    }

    let (base_url, hits, task) = spawn_echo_server().await;

    let client = EventsClient::new(&base_url, "proj", "token").expect("valid client");
    global::using(client);
    let result = global::track(&json!({"name": "signup"})).await;
    assert_eq!(result.into_json()["name"], "signup");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let config = ClientConfig::new(
        &base_url,
        "other-proj",
        "other-token",
        ClientOptions::default().with_max_retries(0),
    )
    .expect("valid config");
    global::configure(config).expect("configure must succeed");
    let shared = global::shared().expect("configured client");
    assert_eq!(shared.config().project_key(), "other-proj");
    assert!(global::track(&json!({"name": "login"})).await.is_success());
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    std::env::set_var("PROJECT_KEY", "env-proj");
    let config = ClientConfig::from_env_or(
        Some(base_url.clone()),
        None,
        Some("explicit-token".to_owned()),
        ClientOptions::default(),
    )
    .expect("missing key must come from the environment");
    assert_eq!(config.project_key(), "env-proj");
    assert_eq!(config.access_token(), "explicit-token");
    std::env::remove_var("PROJECT_KEY");

    global::configure(config).expect("configure must succeed");
    let result = global::track_event(&json!({"name": "logout"})).await;
    assert_eq!(result.into_json()["name"], "logout");
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    global::reset();
    task.abort();
}
