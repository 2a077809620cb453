mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn login_requires_email_and_password() -> Result<()> {
    let server = common::spawn_default().await?;
    let client = common::client();
    let url = format!("{}/login", server.base_url);

    for body in [
        json!({}),
        json!({ "email": "admin@mywine.info" }),
        json!({ "passwordHash": "abc" }),
        json!({ "email": "", "password": "abc" }),
    ] {
        let res = client.post(&url).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", body);
        let payload = res.json::<Value>().await?;
        assert_eq!(payload["message"], "Email and password are required");
    }
    Ok(())
}

#[tokio::test]
async fn login_rejects_non_json() -> Result<()> {
    let server = common::spawn_default().await?;
    let res = common::client()
        .post(format!("{}/login", server.base_url))
        .header("Content-Type", "application/json")
        .body("email=admin")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn login_with_database_down_does_not_leak_detail() -> Result<()> {
    let server = common::spawn_default().await?;
    let res = common::client()
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": "admin@mywine.info", "password": "abc" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers().get("set-cookie").is_none());
    assert_eq!(res.json::<Value>().await?["message"], "Database error occurred");
    Ok(())
}

#[tokio::test]
async fn logout_clears_the_session_cookie() -> Result<()> {
    let server = common::spawn_default().await?;
    let res = common::client().post(format!("{}/logout", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res.headers()["set-cookie"].to_str()?.to_string();
    assert!(cookie.starts_with("auth_token=;"), "{}", cookie);
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("HttpOnly"));
    assert_eq!(res.json::<Value>().await?, json!({ "success": true }));
    Ok(())
}
