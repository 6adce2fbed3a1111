mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_rejects_malformed_input() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Bad email and short password fail schema validation before any lookup
    let res = client
        .post(format!("{}/customers", server.base_url))
        .json(&json!({
            "customer_name": "Ann",
            "email": "not-an-email",
            "password": "short"
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body.get("detail").is_some(), "missing detail: {}", body);
    Ok(())
}

#[tokio::test]
async fn me_requires_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/customers/me", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.headers()
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/customers/me", server.base_url))
        .bearer_auth("not.a.token")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn customer_lifecycle() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await? {
        eprintln!("skipping: no database behind test server");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let email = common::unique_email("ann");
    let res = client
        .post(format!("{}/customers", server.base_url))
        .json(&json!({
            "customer_name": "Ann",
            "email": email,
            "password": "longenough"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<serde_json::Value>().await?;
    let id = body["id"].as_str().expect("generated id").to_string();
    assert_eq!(body["customer_name"], "Ann");
    assert!(
        body.get("password").is_none(),
        "password must never serialize: {}",
        body
    );

    // Same email again -> AlreadyExists
    let res = client
        .post(format!("{}/customers", server.base_url))
        .json(&json!({
            "customer_name": "Ann",
            "email": email,
            "password": "longenough"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["detail"], "Customer already exists");

    // Login and read own record back
    let token = common::login(server, &email, "longenough").await?;
    let res = client
        .get(format!("{}/customers/me", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["id"], id.as_str());

    // Partial update: name only, email untouched
    let res = client
        .patch(format!("{}/customers/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "customer_name": "Ann Lee" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["customer_name"], "Ann Lee");
    assert_eq!(body["email"], email.as_str());

    // Listed publicly
    let res = client
        .get(format!("{}/customers/all", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let list = res.json::<serde_json::Value>().await?;
    assert!(
        list.as_array()
            .expect("array body")
            .iter()
            .any(|c| c["id"] == id.as_str()),
        "created customer missing from listing"
    );

    // Delete own account
    let res = client
        .delete(format!("{}/customers/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn non_owner_cannot_modify() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await? {
        eprintln!("skipping: no database behind test server");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let victim_email = common::unique_email("victim");
    let victim_id =
        common::register_customer(server, "Victim", &victim_email, "longenough").await?;

    let attacker_email = common::unique_email("attacker");
    common::register_customer(server, "Attacker", &attacker_email, "longenough").await?;
    let attacker_token = common::login(server, &attacker_email, "longenough").await?;

    // Wrong owner fails with 403 regardless of resource existence
    let res = client
        .patch(format!("{}/customers/{}", server.base_url, victim_id))
        .bearer_auth(&attacker_token)
        .json(&json!({ "customer_name": "pwned" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/customers/{}", server.base_url, victim_id))
        .bearer_auth(&attacker_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Same answer for an id that does not exist
    let res = client
        .delete(format!(
            "{}/customers/00000000-0000-0000-0000-000000000000",
            server.base_url
        ))
        .bearer_auth(&attacker_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}
