mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bankledger::api::http::{MAX_BODY_BYTES, router};
use bankledger::domain::Account;
use common::{assert_close, dec, test_dispatcher};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Send one request through a fresh copy of the router.
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(&value)?),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)?;

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=UTF-8"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

async fn open(app: &axum::Router, owner: &str, account_type: &str) -> Result<Account> {
    let (status, body) = send(
        app,
        "POST",
        "/accounts",
        Some(json!({ "ownerName": owner, "accountType": account_type })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(serde_json::from_value(body)?)
}

#[tokio::test]
async fn test_open_account() -> Result<()> {
    let app = router(test_dispatcher());

    let account = open(&app, "Nguyen Van A", "SAVINGS").await?;
    assert!(account.account_number.starts_with("AC"));
    assert_eq!(account.owner_name, "Nguyen Van A");
    assert_eq!(account.account_type.as_str(), "SAVINGS");
    assert_eq!(account.balance, Decimal::ZERO);

    Ok(())
}

#[tokio::test]
async fn test_get_account() -> Result<()> {
    let app = router(test_dispatcher());
    let account = open(&app, "Tran Thi B", "CHECKING").await?;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/accounts/{}", account.account_number),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accountNumber"], account.account_number.as_str());
    assert_eq!(body["accountType"], "CHECKING");
    assert_eq!(body["balance"], 0.0);

    Ok(())
}

#[tokio::test]
async fn test_get_unknown_account() -> Result<()> {
    let app = router(test_dispatcher());

    let (status, body) = send(&app, "GET", "/accounts/AC-unknown", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Account does not exist"));

    Ok(())
}

#[tokio::test]
async fn test_unknown_route() -> Result<()> {
    let app = router(test_dispatcher());

    let (status, body) = send(&app, "GET", "/nonexistent-route", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("API does not exist"));

    let (status, _) = send(&app, "GET", "/accounts/transfer", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/accounts", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_deposit_withdraw_and_errors() -> Result<()> {
    let app = router(test_dispatcher());
    let account = open(&app, "Nguyen Van A", "SAVINGS").await?;
    let deposit = format!("/accounts/{}/deposit", account.account_number);
    let withdraw = format!("/accounts/{}/withdraw", account.account_number);

    let (status, body) = send(&app, "POST", &deposit, Some(json!({ "amount": 500.0 }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Deposit successful"));

    let (status, body) = send(&app, "POST", &withdraw, Some(json!({ "amount": 200 }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Withdrawal successful"));

    let (status, body) = send(&app, "POST", &withdraw, Some(json!({ "amount": 1000 }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Insufficient funds"));

    let (status, body) = send(&app, "POST", &deposit, Some(json!({ "amount": -5 }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Deposit amount must be greater than 0"));

    let (_, body) = send(
        &app,
        "GET",
        &format!("/accounts/{}", account.account_number),
        None,
    )
    .await?;
    assert_eq!(body["balance"], 300.0);

    Ok(())
}

#[tokio::test]
async fn test_query_string_is_ignored() -> Result<()> {
    let app = router(test_dispatcher());
    let account = open(&app, "A", "SAVINGS").await?;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/accounts/{}?verbose=1", account.account_number),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_malformed_and_incomplete_bodies_are_internal_errors() -> Result<()> {
    let app = router(test_dispatcher());
    let account = open(&app, "A", "SAVINGS").await?;
    let deposit = format!("/accounts/{}/deposit", account.account_number);

    let (status, body) = send(&app, "POST", &deposit, Some(json!({}))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!("Internal server error"));

    let request = Request::builder()
        .method("POST")
        .uri(&deposit)
        .body(Body::from("{amount:"))?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, "POST", "/accounts", Some(json!({ "ownerName": "A" }))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

#[tokio::test]
async fn test_oversized_body_is_rejected() -> Result<()> {
    let app = router(test_dispatcher());

    let request = Request::builder()
        .method("POST")
        .uri("/accounts")
        .body(Body::from(vec![b' '; MAX_BODY_BYTES + 1]))?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_scenario() -> Result<()> {
    let app = router(test_dispatcher());

    let a = open(&app, "Nguyen Van A", "SAVINGS").await?;
    let a_path = format!("/accounts/{}", a.account_number);
    send(&app, "POST", &format!("{a_path}/deposit"), Some(json!({ "amount": 500 }))).await?;
    send(&app, "POST", &format!("{a_path}/withdraw"), Some(json!({ "amount": 200 }))).await?;

    let b = open(&app, "Tran Thi B", "CHECKING").await?;
    let b_path = format!("/accounts/{}", b.account_number);
    let (status, body) = send(
        &app,
        "POST",
        "/accounts/transfer",
        Some(json!({
            "fromAccount": a.account_number,
            "toAccount": b.account_number,
            "amount": 200
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Transfer successful"));

    let (status, body) = send(&app, "POST", &format!("{b_path}/applyInterest"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Interest applied successfully"));

    let (_, body) = send(&app, "GET", &a_path, None).await?;
    let a: Account = serde_json::from_value(body)?;
    assert_eq!(a.balance, dec(100));

    let (_, body) = send(&app, "GET", &b_path, None).await?;
    let b: Account = serde_json::from_value(body)?;
    assert_close(b.balance, Decimal::new(2001667, 4));

    Ok(())
}
