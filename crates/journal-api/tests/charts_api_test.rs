//! HTTP tests for the chart and strategy endpoints.
//!
//! Each test binds the full router, middleware included, to an ephemeral port
//! over the in-memory store and drives it with reqwest.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use journal_api::services::AttachmentLifecycle;
use journal_api::{router, AppState};
use journal_core::{AttachmentStore, Error, Result};

/// Attachment host that records every key and fails every deletion.
#[derive(Default)]
struct UnreachableHost {
    attempts: Mutex<Vec<String>>,
}

#[async_trait]
impl AttachmentStore for UnreachableHost {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn delete_file(&self, key: &str) -> Result<()> {
        self.attempts.lock().unwrap().push(key.to_string());
        Err(Error::Storage("connection refused".into()))
    }
}

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    host: Arc<UnreachableHost>,
}

impl TestApp {
    async fn spawn() -> Self {
        let host = Arc::new(UnreachableHost::default());
        let state = AppState::in_memory(AttachmentLifecycle::new(host.clone()));
        let app = router(state, &["http://localhost:3000".to_string()]);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server");
        });

        Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            host,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/charts"))
            .json(&body)
            .send()
            .await
            .expect("create request")
    }
}

fn chart(id: &str, name: &str, symbol: &str, date: &str) -> Value {
    json!({
        "id": id,
        "chartName": name,
        "stockSymbol": symbol,
        "date": date,
        "imageUrls": [format!("https://utfs.io/f/{}-a", id), format!("https://utfs.io/f/{}-b", id)],
        "strategy": "breakout",
        "execution": "executed",
        "marketCap": "small_cap",
        "tags": ["earnings"],
    })
}

async fn body(response: reqwest::Response) -> Value {
    response.json().await.expect("json body")
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = TestApp::spawn().await;
    let response = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_create_then_fetch_by_id() {
    let app = TestApp::spawn().await;

    let response = app
        .create(chart("lx1", "Gap and go", "TSLA", "2024-03-15T23:30:00-05:00"))
        .await;
    assert_eq!(response.status(), 201);
    let created = body(response).await;
    assert_eq!(created["acknowledged"], true);
    assert_eq!(created["insertedId"], "lx1");
    assert_eq!(created["chart"]["date"], "2024-03-15");

    let response = app
        .client
        .get(app.url("/api/charts?id=lx1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let fetched = body(response).await;
    assert_eq!(fetched["chartName"], "Gap and go");
    assert_eq!(fetched["imageUrls"][0], "https://utfs.io/f/lx1-a");
    assert_eq!(fetched["createdAt"], created["chart"]["createdAt"]);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = TestApp::spawn().await;

    let mut no_images = chart("x", "n", "S", "2024-01-01");
    no_images["imageUrls"] = json!([]);
    let response = app.create(no_images).await;
    assert_eq!(response.status(), 400);
    assert!(body(response).await["error"]
        .as_str()
        .unwrap()
        .contains("imageUrls"));

    let response = app.create(chart("y", "n", "S", "someday")).await;
    assert_eq!(response.status(), 400);

    let response = app
        .client
        .post(app.url("/api/charts"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(body(response).await.get("error").is_some());

    app.create(chart("dup", "n", "S", "2024-01-01")).await;
    let response = app.create(chart("dup", "n", "S", "2024-01-01")).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_list_filters_and_ordering() {
    let app = TestApp::spawn().await;
    app.create(chart("m1", "March pullback", "NVDA", "2024-03-15"))
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    app.create(chart("a1", "April reclaim", "AAPL", "2024-04-01"))
        .await;

    let all = body(
        app.client
            .get(app.url("/api/charts?search=&strategy=all&marketCap=all&execution=all"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    let ids: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a1", "m1"]);

    let march = body(
        app.client
            .get(app.url("/api/charts?startDate=2024-03-01&endDate=2024-03-31"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(march.as_array().unwrap().len(), 1);
    assert_eq!(march[0]["id"], "m1");

    let by_symbol = body(
        app.client
            .get(app.url("/api/charts?search=aap"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(by_symbol.as_array().unwrap().len(), 1);
    assert_eq!(by_symbol[0]["id"], "a1");

    let malformed_range = body(
        app.client
            .get(app.url("/api/charts?startDate=garbage&endDate=2024-03-31"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(malformed_range.as_array().unwrap().len(), 2);

    let none = body(
        app.client
            .get(app.url("/api/charts?execution=not_executed"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_chart() {
    let app = TestApp::spawn().await;
    app.create(chart("u1", "Flag", "AMD", "2024-02-01")).await;

    let response = app
        .client
        .put(app.url("/api/charts?id=u1"))
        .json(&json!({
            "notes": "took partials",
            "imageUrls": ["https://utfs.io/f/u1-b", "https://utfs.io/f/u1-a"],
            "id": "ignored",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated = body(response).await;
    assert_eq!(updated["matchedCount"], 1);
    assert_eq!(updated["chart"]["id"], "u1");
    assert_eq!(updated["chart"]["notes"], "took partials");
    assert_eq!(updated["chart"]["imageUrls"][0], "https://utfs.io/f/u1-b");

    let missing_id = app
        .client
        .put(app.url("/api/charts"))
        .json(&json!({"notes": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_id.status(), 400);
    assert_eq!(body(missing_id).await["error"], "Chart ID is required");

    let unknown = app
        .client
        .put(app.url("/api/charts?id=nope"))
        .json(&json!({"notes": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 404);
    assert_eq!(body(unknown).await["error"], "Chart not found");
}

#[tokio::test]
async fn test_delete_succeeds_when_every_attachment_deletion_fails() {
    let app = TestApp::spawn().await;
    app.create(chart("d1", "Doomed", "GME", "2024-05-05")).await;

    let response = app
        .client
        .delete(app.url("/api/charts?id=d1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(body(response).await, json!({"success": true}));

    assert_eq!(
        *app.host.attempts.lock().unwrap(),
        vec!["d1-a".to_string(), "d1-b".to_string()]
    );

    let gone = app
        .client
        .get(app.url("/api/charts?id=d1"))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), 404);

    let again = app
        .client
        .delete(app.url("/api/charts?id=d1"))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), 404);

    let no_id = app
        .client
        .delete(app.url("/api/charts"))
        .send()
        .await
        .unwrap();
    assert_eq!(no_id.status(), 400);
}

#[tokio::test]
async fn test_strategy_crud() {
    let app = TestApp::spawn().await;

    let listed = body(
        app.client
            .get(app.url("/api/strategies"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 12);
    assert_eq!(listed[0]["value"], "momentum");

    let created = app
        .client
        .post(app.url("/api/strategies"))
        .json(&json!({"value": "orb", "label": "Opening Range"}))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 200);
    let created = body(created).await;
    let id = created["id"].as_str().unwrap().to_string();

    let duplicate = app
        .client
        .post(app.url("/api/strategies"))
        .json(&json!({"value": " orb ", "label": "Again"}))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), 400);

    let after = body(
        app.client
            .get(app.url("/api/strategies"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    let after = after.as_array().unwrap();
    assert_eq!(after.len(), 13);
    let orb: Vec<&Value> = after.iter().filter(|s| s["value"] == "orb").collect();
    assert_eq!(orb.len(), 1);
    assert_eq!(orb[0]["label"], "Opening Range");

    let missing = app
        .client
        .post(app.url("/api/strategies"))
        .json(&json!({"value": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 400);
    assert_eq!(body(missing).await["error"], "Value and label are required");

    let updated = app
        .client
        .put(app.url("/api/strategies"))
        .json(&json!({"id": id, "value": "orb", "label": "Opening Range Breakout"}))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status(), 200);
    assert_eq!(
        body(updated).await,
        json!({"id": id, "value": "orb", "label": "Opening Range Breakout"})
    );

    let bad_id = app
        .client
        .delete(app.url("/api/strategies?id=not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_id.status(), 400);

    let deleted = app
        .client
        .delete(app.url(&format!("/api/strategies?id={}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 200);
    assert_eq!(body(deleted).await, json!({"id": id}));

    let again = app
        .client
        .delete(app.url(&format!("/api/strategies?id={}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), 404);
}
