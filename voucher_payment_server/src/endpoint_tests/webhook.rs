use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use chrono::Utc;
use serde_json::json;
use vpg_common::{Cents, Secret};
use voucher_payment_engine::{
    db_types::{Payment, PaymentConfirmation, PaymentStatus},
    WebhookFlowApi,
};

use crate::{
    config::StripeConfig,
    endpoint_tests::mocks::{MockDatabaseError, MockPaymentGateway},
    integrations::stripe::{signature_header, STRIPE_SIGNATURE_HEADER},
    routes::stripe_webhook,
};

const TEST_SECRET: &str = "whsec_endpoint_test_1a2b3c";
const ACK: &str = r#"{"ok":true}"#;

#[actix_web::test]
async fn valid_success_event_is_acknowledged() {
    let _ = env_logger::try_init();
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_complete_payment()
        .withf(|txid, channel| txid == "pi_3MtwBwLkdIwHu7ix28a3tqPa" && channel == "card")
        .once()
        .returning(|_, _| {
            Ok(Some(PaymentConfirmation { payment: sample_payment(PaymentStatus::Completed), voucher: None }))
        });
    let body = success_event(json!({})).to_string();
    let (status, response) = post_webhook(gateway, body.clone(), signed(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ACK);
}

#[actix_web::test]
async fn channel_metadata_is_passed_through_to_the_engine() {
    let _ = env_logger::try_init();
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_complete_payment()
        .withf(|_, channel| channel == "oxxo")
        .once()
        .returning(|_, _| {
            Ok(Some(PaymentConfirmation { payment: sample_payment(PaymentStatus::Completed), voucher: None }))
        });
    let body = success_event(json!({"channel": "oxxo"})).to_string();
    let (status, _) = post_webhook(gateway, body.clone(), signed(&body)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn missing_signature_header_is_rejected_without_touching_the_database() {
    let _ = env_logger::try_init();
    // No expectations: any call into the gateway panics the test.
    let gateway = MockPaymentGateway::new();
    let body = success_event(json!({})).to_string();
    let (status, response) = post_webhook(gateway, body, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("signature"), "Unexpected body: {response}");
}

#[actix_web::test]
async fn incorrect_signature_is_rejected_without_touching_the_database() {
    let _ = env_logger::try_init();
    let gateway = MockPaymentGateway::new();
    let body = success_event(json!({})).to_string();
    let forged = signature_header("whsec_not_the_secret", Utc::now().timestamp(), body.as_bytes());
    let (status, response) = post_webhook(gateway, body, Some(forged)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("signature"), "Unexpected body: {response}");
}

#[actix_web::test]
async fn unparseable_body_with_a_valid_signature_is_rejected() {
    let _ = env_logger::try_init();
    let gateway = MockPaymentGateway::new();
    let body = "this is not an event".to_string();
    let (status, response) = post_webhook(gateway, body.clone(), signed(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("deserialization"), "Unexpected body: {response}");
}

#[actix_web::test]
async fn unrecognized_event_types_are_acknowledged_without_any_handler() {
    let _ = env_logger::try_init();
    let gateway = MockPaymentGateway::new();
    let body = json!({
        "id": "evt_1NG8Du2eZvKYlo2C",
        "type": "customer.created",
        "data": {"object": {"id": "cus_123"}}
    })
    .to_string();
    let (status, response) = post_webhook(gateway, body.clone(), signed(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ACK);
}

#[actix_web::test]
async fn success_event_for_an_unknown_record_is_still_acknowledged() {
    let _ = env_logger::try_init();
    let mut gateway = MockPaymentGateway::new();
    gateway.expect_complete_payment().once().returning(|_, _| Ok(None));
    let body = success_event(json!({})).to_string();
    let (status, response) = post_webhook(gateway, body.clone(), signed(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ACK);
}

#[actix_web::test]
async fn failed_event_stores_the_nested_error_text() {
    let _ = env_logger::try_init();
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_fail_payment()
        .withf(|txid, message| txid == "pi_3MtwBwLkdIwHu7ix28a3tqPa" && message == "Your card was declined.")
        .once()
        .returning(|_, _| Ok(Some(sample_payment(PaymentStatus::Failed))));
    let body = json!({
        "type": "payment_intent.payment_failed",
        "data": {"object": {
            "id": "pi_3MtwBwLkdIwHu7ix28a3tqPa",
            "amount": 15000,
            "currency": "usd",
            "last_payment_error": {"message": "Your card was declined."}
        }}
    })
    .to_string();
    let (status, response) = post_webhook(gateway, body.clone(), signed(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ACK);
}

#[actix_web::test]
async fn failed_event_without_error_details_uses_the_default_message() {
    let _ = env_logger::try_init();
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_fail_payment()
        .withf(|_, message| message == "Unknown error")
        .once()
        .returning(|_, _| Ok(Some(sample_payment(PaymentStatus::Failed))));
    let body = json!({
        "type": "payment_intent.payment_failed",
        "data": {"object": {"id": "pi_3MtwBwLkdIwHu7ix28a3tqPa", "amount": 15000, "currency": "usd"}}
    })
    .to_string();
    let (status, _) = post_webhook(gateway, body.clone(), signed(&body)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn refund_event_passes_the_minor_unit_amount_to_the_engine() {
    let _ = env_logger::try_init();
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_refund_payment()
        .withf(|charge_id, amount| charge_id == "ch_3MtwBwLkdIwHu7ix0OSzZTIs" && *amount == Cents::new(5000))
        .once()
        .returning(|_, _| Ok(Some(sample_payment(PaymentStatus::Refunded))));
    let body = json!({
        "type": "charge.refunded",
        "data": {"object": {"id": "ch_3MtwBwLkdIwHu7ix0OSzZTIs", "amount_refunded": 5000}}
    })
    .to_string();
    let (status, response) = post_webhook(gateway, body.clone(), signed(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ACK);
}

#[actix_web::test]
async fn a_backend_fault_surfaces_as_an_internal_error() {
    let _ = env_logger::try_init();
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_complete_payment()
        .once()
        .returning(|_, _| Err(MockDatabaseError("connection lost".to_string())));
    let body = success_event(json!({})).to_string();
    let (status, response) = post_webhook(gateway, body.clone(), signed(&body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.contains("error"), "Unexpected body: {response}");
}

//-------------------------------------------------  Helpers  ---------------------------------------------------------

fn success_event(metadata: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "evt_1NG8Du2eZvKYlo2C",
        "type": "payment_intent.succeeded",
        "data": {"object": {
            "id": "pi_3MtwBwLkdIwHu7ix28a3tqPa",
            "amount": 9999,
            "currency": "usd",
            "metadata": metadata
        }}
    })
}

fn signed(body: &str) -> Option<String> {
    Some(signature_header(TEST_SECRET, Utc::now().timestamp(), body.as_bytes()))
}

fn test_stripe_config() -> StripeConfig {
    StripeConfig {
        secret_key: Secret::new("sk_test_abc123".to_string()),
        webhook_secret: Secret::new(TEST_SECRET.to_string()),
        signature_tolerance: chrono::Duration::seconds(300),
    }
}

fn sample_payment(status: PaymentStatus) -> Payment {
    let now = Utc::now();
    Payment {
        id: 1,
        stripe_payment_intent_id: "pi_3MtwBwLkdIwHu7ix28a3tqPa".to_string(),
        stripe_charge_id: Some("ch_3MtwBwLkdIwHu7ix0OSzZTIs".to_string()),
        user_wallet: "wallet_9f8e7d".to_string(),
        week_id: None,
        property_id: None,
        amount: 150.0,
        currency: "usd".to_string(),
        status,
        metadata: None,
        refund_amount: None,
        voucher_id: None,
        succeeded_at: None,
        failed_at: None,
        created_at: now,
        updated_at: now,
    }
}

async fn post_webhook(
    gateway: MockPaymentGateway,
    body: String,
    header: Option<String>,
) -> (StatusCode, String) {
    let api = WebhookFlowApi::new(gateway);
    let app = App::new()
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(test_stripe_config()))
        .service(web::resource("/api/webhooks/stripe").route(web::post().to(stripe_webhook::<MockPaymentGateway>)));
    let service = test::init_service(app).await;
    let mut req = TestRequest::post().uri("/api/webhooks/stripe").set_payload(body);
    if let Some(value) = header {
        req = req.insert_header((STRIPE_SIGNATURE_HEADER, value));
    }
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    (status, body)
}
