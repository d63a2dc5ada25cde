//! Stripe REST client tests against a mock server.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paygate_core::{CustomerId, InvoiceId, PaymentMethodId, PlanId, SubscriptionId, SubscriptionItemId};
use paygate_service::stripe::{CustomerParams, SubscriptionParams, SubscriptionUpdate};
use paygate_service::{BillingProvider, StripeClient, StripeError};

/// `Basic base64("sk_test_paygate:")`
const AUTHORIZATION: &str = "Basic c2tfdGVzdF9wYXlnYXRlOg==";

async fn client_for(server: &MockServer) -> StripeClient {
    StripeClient::with_base_url("sk_test_paygate", server.uri()).unwrap()
}

#[tokio::test]
async fn create_customer_posts_form_with_default_payment_method() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/customers"))
        .and(header("authorization", AUTHORIZATION))
        .and(body_string_contains("payment_method=pm_card_visa"))
        .and(body_string_contains("email=jenny%40example.com"))
        .and(body_string_contains(
            "invoice_settings%5Bdefault_payment_method%5D=pm_card_visa",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "cus_1", "object": "customer" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let params = CustomerParams {
        payment_method: PaymentMethodId::new("pm_card_visa").unwrap(),
        email: "jenny@example.com".into(),
    };
    let customer = client_for(&server).await.create_customer(&params).await.unwrap();

    assert_eq!(customer["id"], "cus_1");
}

#[tokio::test]
async fn create_subscription_expands_payment_intent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscriptions"))
        .and(body_string_contains("customer=cus_1"))
        .and(body_string_contains("items%5B0%5D%5Bplan%5D=plan_one_day"))
        .and(body_string_contains(
            "expand%5B%5D=latest_invoice.payment_intent",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sub_1",
            "object": "subscription",
            "latest_invoice": { "payment_intent": { "id": "pi_1" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = SubscriptionParams::new(
        CustomerId::new("cus_1").unwrap(),
        PlanId::new("plan_one_day").unwrap(),
    );
    let subscription = client_for(&server)
        .await
        .create_subscription(&params)
        .await
        .unwrap();

    assert_eq!(subscription["latest_invoice"]["payment_intent"]["id"], "pi_1");
}

#[tokio::test]
async fn error_body_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/cus_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "message": "No such customer: 'cus_missing'",
                "code": "resource_missing",
                "param": "id"
            }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .retrieve_customer(&CustomerId::new("cus_missing").unwrap())
        .await
        .unwrap_err();

    match err {
        StripeError::Api {
            status,
            error_type,
            code,
            param,
            ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(error_type, "invalid_request_error");
            assert_eq!(code.as_deref(), Some("resource_missing"));
            assert_eq!(param.as_deref(), Some("id"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_error_body_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/invoices/in_1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .retrieve_invoice(&InvoiceId::new("in_1").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, StripeError::Api { status: 503, .. }));
}

#[tokio::test]
async fn upcoming_invoice_queries_by_customer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/invoices/upcoming"))
        .and(query_param("customer", "cus_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "object": "invoice" })))
        .expect(1)
        .mount(&server)
        .await;

    let invoice = client_for(&server)
        .await
        .upcoming_invoice(&CustomerId::new("cus_1").unwrap())
        .await
        .unwrap();

    assert_eq!(invoice["object"], "invoice");
}

#[tokio::test]
async fn delete_subscription_uses_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/subscriptions/sub_1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "sub_1", "status": "canceled" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let deleted = client_for(&server)
        .await
        .delete_subscription(&SubscriptionId::new("sub_1").unwrap())
        .await
        .unwrap();

    assert_eq!(deleted["status"], "canceled");
}

#[tokio::test]
async fn reactivate_update_resubmits_item_plan() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscriptions/sub_1"))
        .and(body_string_contains("cancel_at_period_end=false"))
        .and(body_string_contains("items%5B0%5D%5Bid%5D=si_1"))
        .and(body_string_contains("items%5B0%5D%5Bplan%5D=P"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "sub_1", "cancel_at_period_end": false })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let update = SubscriptionUpdate::reactivate(
        SubscriptionItemId::new("si_1").unwrap(),
        PlanId::new("P").unwrap(),
    );
    let updated = client_for(&server)
        .await
        .update_subscription(&SubscriptionId::new("sub_1").unwrap(), &update)
        .await
        .unwrap();

    assert_eq!(updated["cancel_at_period_end"], false);
}

#[tokio::test]
async fn identifiers_stay_inside_their_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "object": "balance" })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/v1/customers/[^/]+$"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "type": "invalid_request_error", "message": "No such customer" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = StripeClient::with_base_url("sk_test_paygate", format!("{}/v1", server.uri())).unwrap();

    for id in ["../balance", "a?x=y"] {
        let err = client
            .retrieve_customer(&CustomerId::new(id).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StripeError::Api { status: 404, .. }), "{id}: {err:?}");
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/v1/customers/..%2Fbalance");
    assert_eq!(requests[1].url.path(), "/v1/customers/a%3Fx=y");
    assert!(requests[1].url.query().is_none());
}

#[tokio::test]
async fn dot_identifiers_never_reach_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "object": "list" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .retrieve_customer(&CustomerId::new("..").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, StripeError::InvalidIdentifier(_)));
}
