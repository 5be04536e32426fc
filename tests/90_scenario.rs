mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// register → login → create → list → another user cannot read it
#[tokio::test]
async fn two_users_end_to_end() -> Result<()> {
    let server = common::spawn_api().await?;

    let registered = server.register("John", "JOHN@X.com", "secret12").await?;
    assert_eq!(registered["email"], "john@x.com");

    let login: Value = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "email": "john@x.com", "password": "secret12" }))
        .send()
        .await?
        .json()
        .await?;
    let john = login["token"].as_str().unwrap_or_default().to_string();

    let note = server.create_note(&john, "T", "C").await?;
    assert_eq!(login["_id"], registered["_id"]);
    assert_eq!(note["userId"], registered["_id"]);

    let list: Vec<Value> = server
        .client
        .get(server.url("/api/notes"))
        .bearer_auth(&john)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["_id"], note["_id"]);

    let jane = server.token_for("Jane", "jane@x.com").await?;
    let res = server
        .client
        .get(server.url(&format!("/api/notes/{}", note["_id"].as_str().unwrap_or_default())))
        .bearer_auth(&jane)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
