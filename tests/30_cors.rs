mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn foreign_origin_is_forbidden_before_auth() -> Result<()> {
    let server = common::spawn_default().await?;
    let client = common::client();

    // Even with a valid token.
    let res = client
        .get(format!("{}/stats/images", server.base_url))
        .header("Origin", "https://evil.example.com")
        .bearer_auth(common::token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.json::<serde_json::Value>().await?["code"], "FORBIDDEN");

    // Public routes too.
    let res = client
        .get(format!("{}/", server.base_url))
        .header("Origin", "https://evil.example.com")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn allowed_origin_gets_cors_headers() -> Result<()> {
    let server = common::spawn_default().await?;

    let res = common::client()
        .get(format!("{}/", server.base_url))
        .header("Origin", common::ALLOWED_ORIGIN)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], common::ALLOWED_ORIGIN);
    assert_eq!(res.headers()["access-control-allow-credentials"], "true");
    Ok(())
}

#[tokio::test]
async fn preflight_is_answered_without_a_token() -> Result<()> {
    let server = common::spawn_default().await?;

    let res = common::client()
        .request(Method::OPTIONS, format!("{}/lists/users", server.base_url))
        .header("Origin", common::ALLOWED_ORIGIN)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization,content-type")
        .send()
        .await?;
    assert!(res.status().is_success(), "status {}", res.status());
    assert_eq!(res.headers()["access-control-allow-origin"], common::ALLOWED_ORIGIN);
    let methods = res.headers()["access-control-allow-methods"].to_str()?.to_string();
    assert!(methods.contains("POST"), "{}", methods);
    Ok(())
}

#[tokio::test]
async fn requests_without_origin_pass_through() -> Result<()> {
    let server = common::spawn_default().await?;
    let res = common::client().get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("access-control-allow-origin").is_none());
    Ok(())
}
