//! End-to-end REST flow over a real socket.

#![allow(clippy::panic, missing_docs)]

mod common;

use serde_json::{Value, json};

async fn post(client: &reqwest::Client, url: String, body: Value) -> (u16, Value) {
    let Ok(response) = client.post(url).json(&body).send().await else {
        panic!("request failed");
    };
    let status = response.status().as_u16();
    (status, response.json().await.unwrap_or(Value::Null))
}

async fn get(client: &reqwest::Client, url: String) -> (u16, Value) {
    let Ok(response) = client.get(url).send().await else {
        panic!("request failed");
    };
    let status = response.status().as_u16();
    (status, response.json().await.unwrap_or(Value::Null))
}

#[tokio::test]
async fn record_stop_preview_publish() {
    let Ok(dir) = tempfile::tempdir() else {
        panic!("tempdir");
    };
    let outbox = dir.path().join("outbox");
    let addr = common::spawn_hub(&outbox).await;
    let base = format!("http://{addr}/api/v1");
    let client = reqwest::Client::new();

    let (status, _) = post(
        &client,
        format!("{base}/metadata"),
        json!({ "key": "title", "value": "Rust hacking" }),
    )
    .await;
    assert_eq!(status, 201);
    let _ = post(
        &client,
        format!("{base}/metadata"),
        json!({ "key": "tags", "value": "rust, axum" }),
    )
    .await;

    let (status, recording) = post(
        &client,
        format!("{base}/recordings"),
        json!({
            "file_base_name": "session",
            "file_extension": "mkv",
            "directory": dir.path().display().to_string(),
        }),
    )
    .await;
    assert_eq!(status, 201);
    let id = recording["id"].as_i64().unwrap_or_default();
    let _ = std::fs::write(dir.path().join("session.mkv"), b"video");

    let (status, _) = get(&client, format!("{base}/recordings/{id}/preview")).await;
    assert_eq!(status, 409);

    let (status, stopped) = post(&client, format!("{base}/recordings/stop"), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(stopped["ended"], 1);

    let (status, preview) = get(&client, format!("{base}/recordings/{id}/preview")).await;
    assert_eq!(status, 200);
    assert_eq!(preview["title"], "Rust hacking");
    assert_eq!(preview["tags"], json!(["rust", "axum"]));
    assert_eq!(preview["category_id"], "20");
    let description = preview["description"].as_str().unwrap_or_default();
    assert!(description.contains("Timestamps:\n00:00:00 Starting stream\n"));
    assert!(description.contains("#rust #axum\n"));

    let (status, outcome) =
        post(&client, format!("{base}/recordings/{id}/publish"), json!({})).await;
    assert_eq!(status, 200);
    let video_id = outcome["video_id"].as_str().unwrap_or_default();
    assert!(outbox.join(video_id).join("manifest.json").exists());
    assert!(outbox.join(video_id).join("session.mkv").exists());

    let (_, pending) = get(&client, format!("{base}/recordings/pending")).await;
    assert_eq!(pending, json!([]));
}

#[tokio::test]
async fn unknown_recording_is_not_found() {
    let Ok(dir) = tempfile::tempdir() else {
        panic!("tempdir");
    };
    let addr = common::spawn_hub(dir.path()).await;
    let client = reqwest::Client::new();
    let (status, body) = get(&client, format!("http://{addr}/api/v1/recordings/42")).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn negative_caption_duration_rejected() {
    let Ok(dir) = tempfile::tempdir() else {
        panic!("tempdir");
    };
    let addr = common::spawn_hub(dir.path()).await;
    let client = reqwest::Client::new();
    let (status, _) = post(
        &client,
        format!("http://{addr}/api/v1/captions"),
        json!({ "text": "oops", "duration_seconds": -1.0 }),
    )
    .await;
    assert_eq!(status, 400);
}
