use event_api_client::{ClientOptions, EventPayload, EventsClient, ResultRecord};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let events = EventsClient::new_with_options(
        std::env::var("EVENTS_BASE_URL")?,
        std::env::var("PROJECT_KEY")?,
        std::env::var("ACCESS_TOKEN")?,
        ClientOptions::default().with_max_retries(5),
    )?;

    let mut payload = EventPayload::new();
    payload.insert("name".to_owned(), json!("signup"));
    payload.insert("user_id".to_owned(), json!(42));
    payload.insert(
        "properties".to_owned(),
        json!({ "plan": "pro", "referrer": "https://example.com/pricing" }),
    );

    let result = events.submit_event(&payload).await;

    match &result {
        ResultRecord::Success(body) => println!("accepted: {body}"),
        ResultRecord::ServerError { status, body } => {
            println!("rejected with {status}: {}", serde_json::Value::Object(body.clone()))
        }
        ResultRecord::Failed(failure) => {
            println!("failed ({}): {}", failure.code, failure.message)
        }
    }

    Ok(())
}
