mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

fn session_cookie(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

#[tokio::test]
async fn login_moves_token_into_cookie() -> Result<()> {
    let api = common::spawn_api().await?;
    let proxy = common::spawn_proxy(&api).await?;

    let res = proxy
        .client
        .post(proxy.url("/api/auth/register"))
        .json(&json!({ "name": "John", "email": "john@example.com", "password": "secret123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = proxy
        .client
        .post(proxy.url("/api/auth/login"))
        .json(&json!({ "email": "john@example.com", "password": "secret123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).unwrap_or_default();
    assert!(cookie.starts_with("token=") && cookie.len() > "token=".len());
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "message": "Login successful" }));

    let res = proxy
        .client
        .post(proxy.url("/api/notes"))
        .header(header::COOKIE, &cookie)
        .json(&json!({ "title": "Via proxy", "content": "hello" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let note: Value = res.json().await?;

    let list: Vec<Value> = proxy
        .client
        .get(proxy.url("/api/notes"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["_id"], note["_id"]);
    Ok(())
}

#[tokio::test]
async fn requests_without_cookie_are_rejected_locally() -> Result<()> {
    let api = common::spawn_api().await?;
    let proxy = common::spawn_proxy(&api).await?;

    let res = proxy.client.get(proxy.url("/api/notes")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Not authenticated - No token found");
    Ok(())
}

#[tokio::test]
async fn failed_login_is_relayed_and_logout_clears_cookie() -> Result<()> {
    let api = common::spawn_api().await?;
    let proxy = common::spawn_proxy(&api).await?;

    let res = proxy
        .client
        .post(proxy.url("/api/auth/login"))
        .json(&json!({ "email": "nobody@example.com", "password": "whatever" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&res).is_none());
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Invalid credentials");

    let res = proxy.client.post(proxy.url("/api/auth/logout")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let raw = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(raw.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn ping_reports_upstream_message() -> Result<()> {
    let api = common::spawn_api().await?;
    let proxy = common::spawn_proxy(&api).await?;

    let body: Value = proxy.client.get(proxy.url("/ping")).send().await?.json().await?;
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.starts_with("Ping received from http://127.0.0.1:"));
    assert!(message.ends_with("with message Ping!"));
    Ok(())
}

/// Register and log in through the proxy, returning the `token=...` cookie pair
async fn proxy_login(proxy: &common::TestServer, name: &str, email: &str) -> Result<String> {
    proxy
        .client
        .post(proxy.url("/api/auth/register"))
        .json(&json!({ "name": name, "email": email, "password": "secret123" }))
        .send()
        .await?;
    let res = proxy
        .client
        .post(proxy.url("/api/auth/login"))
        .json(&json!({ "email": email, "password": "secret123" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "proxy login failed: {}", res.status());
    session_cookie(&res).ok_or_else(|| anyhow::anyhow!("proxy login set no cookie"))
}

#[tokio::test]
async fn single_note_routes_are_relayed() -> Result<()> {
    let api = common::spawn_api().await?;
    let proxy = common::spawn_proxy(&api).await?;
    let cookie = proxy_login(&proxy, "John", "john@example.com").await?;

    let note: Value = proxy
        .client
        .post(proxy.url("/api/notes"))
        .header(header::COOKIE, &cookie)
        .json(&json!({ "title": "T", "content": "C" }))
        .send()
        .await?
        .json()
        .await?;
    let url = proxy.url(&format!("/api/notes/{}", note["_id"].as_str().unwrap_or_default()));

    let res = proxy.client.get(&url).header(header::COOKIE, &cookie).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await?;
    assert_eq!(fetched, note);

    let res = proxy
        .client
        .put(&url)
        .header(header::COOKIE, &cookie)
        .json(&json!({ "title": "X" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["title"], "X");
    assert_eq!(updated["content"], "C");

    let res = proxy.client.delete(&url).header(header::COOKIE, &cookie).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Note deleted successfully");

    let res = proxy.client.get(&url).header(header::COOKIE, &cookie).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn encoded_path_ids_cannot_reach_other_routes() -> Result<()> {
    let api = common::spawn_api().await?;
    let proxy = common::spawn_proxy(&api).await?;
    let cookie = proxy_login(&proxy, "Victim", "victim@example.com").await?;

    let res = proxy
        .client
        .get(proxy.url("/api/notes/..%2Fauth%2Fprofile"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body.get("email").is_none());
    assert!(body["message"].as_str().unwrap_or_default().starts_with("Invalid id"));

    for method in [reqwest::Method::DELETE, reqwest::Method::PUT] {
        let res = proxy
            .client
            .request(method, proxy.url("/api/notes/..%2Fauth%2Fdelete"))
            .header(header::COOKIE, &cookie)
            .json(&json!({}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    // The account is still there
    let token = cookie.trim_start_matches("token=");
    let res = api
        .client
        .get(api.url("/api/auth/profile"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn foreign_note_through_proxy_is_not_found_and_untouched() -> Result<()> {
    let api = common::spawn_api().await?;
    let proxy = common::spawn_proxy(&api).await?;
    let owner = proxy_login(&proxy, "Alice", "alice@example.com").await?;
    let stranger = proxy_login(&proxy, "Bob", "bob@example.com").await?;

    let note: Value = proxy
        .client
        .post(proxy.url("/api/notes"))
        .header(header::COOKIE, &owner)
        .json(&json!({ "title": "Private", "content": "C" }))
        .send()
        .await?
        .json()
        .await?;
    let url = proxy.url(&format!("/api/notes/{}", note["_id"].as_str().unwrap_or_default()));

    let res = proxy.client.delete(&url).header(header::COOKIE, &stranger).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = proxy
        .client
        .put(&url)
        .header(header::COOKIE, &stranger)
        .json(&json!({ "title": "hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let intact: Value = proxy
        .client
        .get(&url)
        .header(header::COOKIE, &owner)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(intact["title"], "Private");
    Ok(())
}

#[tokio::test]
async fn malformed_body_gets_json_error() -> Result<()> {
    let api = common::spawn_api().await?;
    let proxy = common::spawn_proxy(&api).await?;

    let res = proxy
        .client
        .post(proxy.url("/api/auth/login"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["message"].as_str().unwrap_or_default().starts_with("Invalid JSON body"));
    Ok(())
}
