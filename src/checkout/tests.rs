use super::*;
use crate::error::StoreErrorKind;
use crate::request::{HttpMethod, MockHttpClient};
use serde_json::json;
use std::cell::RefCell;

const BASE: &str = "http://api.test";
const PLACE_URL: &str = "http://api.test/api/orders/place";
const CREATE_URL: &str = "http://api.test/api/payment/create-order";
const VERIFY_URL: &str = "http://api.test/api/payment/verify";

// Mock 收银台组件
struct MockWidget {
    loaded: bool,
    outcome: WidgetOutcome,
    opened: RefCell<Vec<CheckoutOptions>>,
}

impl MockWidget {
    fn paying() -> Self {
        Self {
            loaded: true,
            outcome: WidgetOutcome::Paid(PaymentReceipt {
                razorpay_order_id: "order_P1".into(),
                razorpay_payment_id: "pay_P1".into(),
                razorpay_signature: "sig".into(),
            }),
            opened: RefCell::new(Vec::new()),
        }
    }

    fn dismissing() -> Self {
        Self {
            outcome: WidgetOutcome::Dismissed,
            ..Self::paying()
        }
    }
}

#[async_trait::async_trait(?Send)]
impl PaymentWidget for MockWidget {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    async fn open(&self, options: CheckoutOptions) -> StoreResult<WidgetOutcome> {
        self.opened.borrow_mut().push(options);
        Ok(self.outcome.clone())
    }
}

fn mock_place(mock: &MockHttpClient, id: i64) {
    mock.mock_response(
        HttpMethod::Post,
        PLACE_URL,
        200,
        json!({ "id": id, "status": "PLACED", "totalAmount": 118 }),
    );
}

fn mock_provider(mock: &MockHttpClient, body: serde_json::Value) {
    mock.mock_response(HttpMethod::Post, CREATE_URL, 200, body);
}

#[tokio::test]
async fn cod_places_single_order() {
    let mock = MockHttpClient::new();
    mock_place(&mock, 31);
    let api = ApiClient::new(&mock, BASE);
    let widget = MockWidget::paying();

    let svc = CheckoutService::new(&api, &widget, "ElectroShop", None);
    let outcome = svc.pay(PaymentMethod::Cod, Decimal::from(118)).await.unwrap();

    assert_eq!(outcome, CheckoutOutcome::Confirmed(31));
    assert_eq!(mock.request_count(), 1);
    assert_eq!(
        mock.requests_to(HttpMethod::Post, PLACE_URL)[0].json_body(),
        json!({ "paymentMethod": "COD" })
    );
    assert!(widget.opened.borrow().is_empty());
}

#[tokio::test]
async fn online_payment_runs_full_bridge() {
    let mock = MockHttpClient::new();
    mock_place(&mock, 77);
    mock_provider(
        &mock,
        json!({ "orderId": "order_P1", "amount": 29500, "currency": "INR", "keyId": "rzp_live" }),
    );
    mock.mock_response(HttpMethod::Post, VERIFY_URL, 200, json!({ "status": "success" }));

    let api = ApiClient::new(&mock, BASE);
    let widget = MockWidget::paying();
    let svc = CheckoutService::new(&api, &widget, "ElectroShop", Some("rzp_fallback".into()));

    let outcome = svc
        .pay(PaymentMethod::Razorpay, "294.999".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(outcome, CheckoutOutcome::Confirmed(77));

    let create = &mock.requests_to(HttpMethod::Post, CREATE_URL)[0];
    assert_eq!(create.json_body(), json!({ "amount": 295.0 }));

    let opened = widget.opened.borrow();
    assert_eq!(opened[0].key, "rzp_live");
    assert_eq!(opened[0].amount, 29500);
    assert_eq!(opened[0].provider_order_id, "order_P1");
    assert_eq!(opened[0].name, "ElectroShop");

    let verify = &mock.requests_to(HttpMethod::Post, VERIFY_URL)[0];
    assert_eq!(
        verify.json_body(),
        json!({
            "orderId": "77",
            "razorpayOrderId": "order_P1",
            "razorpayPaymentId": "pay_P1",
            "razorpaySignature": "sig"
        })
    );
}

#[tokio::test]
async fn fallback_key_is_used_when_backend_omits_it() {
    let mock = MockHttpClient::new();
    mock_place(&mock, 5);
    mock_provider(&mock, json!({ "orderId": "order_X", "amount": 100, "currency": "INR" }));
    mock.mock_response(HttpMethod::Post, VERIFY_URL, 200, json!({ "status": "success" }));

    let api = ApiClient::new(&mock, BASE);
    let widget = MockWidget::paying();
    let svc = CheckoutService::new(&api, &widget, "ElectroShop", Some("rzp_fallback".into()));
    svc.pay_online(Decimal::ONE).await.unwrap();

    assert_eq!(widget.opened.borrow()[0].key, "rzp_fallback");
}

#[tokio::test]
async fn missing_key_everywhere_is_a_config_error() {
    let mock = MockHttpClient::new();
    mock_place(&mock, 5);
    mock_provider(&mock, json!({ "orderId": "order_X", "amount": 100 }));

    let api = ApiClient::new(&mock, BASE);
    let widget = MockWidget::paying();
    let svc = CheckoutService::new(&api, &widget, "ElectroShop", None);
    let err = svc.pay_online(Decimal::ONE).await.unwrap_err();

    assert_eq!(err.kind, StoreErrorKind::Config);
    assert!(widget.opened.borrow().is_empty());
}

#[tokio::test]
async fn missing_provider_order_id_fails() {
    let mock = MockHttpClient::new();
    mock_place(&mock, 5);
    mock_provider(&mock, json!({ "amount": 100, "keyId": "k" }));

    let api = ApiClient::new(&mock, BASE);
    let widget = MockWidget::paying();
    let svc = CheckoutService::new(&api, &widget, "ElectroShop", None);
    let err = svc.pay_online(Decimal::ONE).await.unwrap_err();

    assert_eq!(err.kind, StoreErrorKind::Payment);
    assert!(err.message().contains("missing orderId"));
}

#[tokio::test]
async fn unloaded_widget_fails_before_opening() {
    let mock = MockHttpClient::new();
    mock_place(&mock, 5);
    mock_provider(&mock, json!({ "orderId": "o", "amount": 100, "keyId": "k" }));

    let api = ApiClient::new(&mock, BASE);
    let widget = MockWidget {
        loaded: false,
        ..MockWidget::paying()
    };
    let svc = CheckoutService::new(&api, &widget, "ElectroShop", None);
    assert!(svc.pay_online(Decimal::ONE).await.is_err());
    assert!(widget.opened.borrow().is_empty());
}

#[tokio::test]
async fn dismissing_the_widget_skips_verification() {
    let mock = MockHttpClient::new();
    mock_place(&mock, 5);
    mock_provider(&mock, json!({ "orderId": "o", "amount": 100, "keyId": "k" }));

    let api = ApiClient::new(&mock, BASE);
    let widget = MockWidget::dismissing();
    let svc = CheckoutService::new(&api, &widget, "ElectroShop", None);

    assert_eq!(svc.pay_online(Decimal::ONE).await.unwrap(), CheckoutOutcome::Dismissed);
    assert!(mock.requests_to(HttpMethod::Post, VERIFY_URL).is_empty());
}

#[tokio::test]
async fn non_success_verification_is_reported() {
    let mock = MockHttpClient::new();
    mock_place(&mock, 5);
    mock_provider(&mock, json!({ "orderId": "o", "amount": 100, "keyId": "k" }));
    mock.mock_response(HttpMethod::Post, VERIFY_URL, 200, json!({ "status": "failed" }));

    let api = ApiClient::new(&mock, BASE);
    let widget = MockWidget::paying();
    let svc = CheckoutService::new(&api, &widget, "ElectroShop", None);

    let err = svc.pay_online(Decimal::ONE).await.unwrap_err();
    assert_eq!(err.user_message(), "Payment verification failed");
}

#[tokio::test]
async fn empty_cart_redirects() {
    let mock = MockHttpClient::new();
    mock.mock_response(HttpMethod::Get, "http://api.test/api/cart", 200, json!([]));
    let api = ApiClient::new(&mock, BASE);
    let widget = MockWidget::paying();
    let svc = CheckoutService::new(&api, &widget, "ElectroShop", None);

    assert_eq!(svc.enter().await.unwrap(), CheckoutEntry::EmptyCart);
}

#[test]
fn submit_button_rules() {
    let paid = CartTotals {
        subtotal: Decimal::from(100),
        tax: Decimal::from(18),
        total: Decimal::from(118),
    };
    let free = CartTotals::default();

    assert!(can_submit(PaymentMethod::Cod, &paid, false, false));
    assert!(!can_submit(PaymentMethod::Cod, &paid, false, true));
    assert!(!can_submit(PaymentMethod::Cod, &free, true, false));
    assert!(!can_submit(PaymentMethod::Razorpay, &paid, false, false));
    assert!(can_submit(PaymentMethod::Razorpay, &paid, true, false));
    assert_eq!(confirmation_path(9), "/order-confirmation/9");
}
