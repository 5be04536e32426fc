mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_get_list_delete() -> Result<()> {
    let server = common::spawn_api().await?;
    let token = server.token_for("John", "john@example.com").await?;
    let profile: Value = server
        .client
        .get(server.url("/api/auth/profile"))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;

    let note = server.create_note(&token, "  Groceries  ", "milk\neggs").await?;
    assert_eq!(note["title"], "Groceries");
    assert_eq!(note["content"], "milk\neggs");
    assert_eq!(note["userId"], profile["_id"]);
    assert!(note["createdAt"].is_string());
    assert!(note["updatedAt"].is_string());

    let id = note["_id"].as_str().unwrap_or_default().to_string();
    let fetched: Value = server
        .client
        .get(server.url(&format!("/api/notes/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched, note);

    let res = server
        .client
        .delete(server.url(&format!("/api/notes/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Note deleted successfully");

    let res = server
        .client
        .get(server.url(&format!("/api/notes/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let list: Value = server
        .client
        .get(server.url("/api/notes"))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn list_is_newest_first() -> Result<()> {
    let server = common::spawn_api().await?;
    let token = server.token_for("John", "john@example.com").await?;

    for title in ["first", "second", "third"] {
        server.create_note(&token, title, "body").await?;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let list: Vec<Value> = server
        .client
        .get(server.url("/api/notes"))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    let titles: Vec<&str> = list.iter().filter_map(|n| n["title"].as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_absent_fields() -> Result<()> {
    let server = common::spawn_api().await?;
    let token = server.token_for("John", "john@example.com").await?;
    let note = server.create_note(&token, "T", "C").await?;
    let id = note["_id"].as_str().unwrap_or_default();

    let res = server
        .client
        .put(server.url(&format!("/api/notes/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "title": "X" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["title"], "X");
    assert_eq!(updated["content"], "C");
    assert_eq!(updated["createdAt"], note["createdAt"]);

    let res = server
        .client
        .put(server.url(&format!("/api/notes/{}", id)))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let unchanged: Value = res.json().await?;
    assert_eq!(unchanged["title"], "X");
    assert_eq!(unchanged["content"], "C");
    Ok(())
}

#[tokio::test]
async fn validation_and_invalid_ids() -> Result<()> {
    let server = common::spawn_api().await?;
    let token = server.token_for("John", "john@example.com").await?;

    let res = server
        .client
        .post(server.url("/api/notes"))
        .bearer_auth(&token)
        .json(&json!({ "title": "   ", "content": "C" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(server.url("/api/notes"))
        .bearer_auth(&token)
        .json(&json!({ "title": "T" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .get(server.url("/api/notes/not-a-valid-id"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INVALID_ID");

    let note = server.create_note(&token, "T", "C").await?;
    let res = server
        .client
        .put(server.url(&format!("/api/notes/{}", note["_id"].as_str().unwrap_or_default())))
        .bearer_auth(&token)
        .json(&json!({ "content": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
