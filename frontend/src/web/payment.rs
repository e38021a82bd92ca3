//! 托管收银台桥接
//!
//! 收银台脚本向 window 注入全局构造函数 `Razorpay`。
//! 成功回调与关闭回调谁先触发就由谁把结果送进 oneshot 通道。

use std::cell::RefCell;
use std::rc::Rc;

use electroshop::checkout::{CheckoutOptions, PaymentReceipt, PaymentWidget, WidgetOutcome};
use electroshop::error::{StoreError, StoreResult};
use futures::channel::oneshot;
use js_sys::{Object, Reflect};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub const CHECKOUT_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";
const THEME_COLOR: &str = "#667eea";

#[wasm_bindgen]
extern "C" {
    type Razorpay;

    #[wasm_bindgen(constructor, catch)]
    fn new(options: &JsValue) -> Result<Razorpay, JsValue>;

    #[wasm_bindgen(method)]
    fn open(this: &Razorpay);
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Payment script not loaded")]
    NotLoaded,
    #[error("failed to build checkout options: {0}")]
    Options(String),
    #[error("failed to open checkout: {0}")]
    Open(String),
    #[error("checkout closed without a result")]
    Interrupted,
    #[error("invalid payment response: missing {0}")]
    MissingField(&'static str),
}

impl From<WidgetError> for StoreError {
    fn from(e: WidgetError) -> Self {
        StoreError::payment(e.to_string()).with_source(e)
    }
}

/// 收银台脚本是否已加载
pub fn is_script_loaded() -> bool {
    web_sys::window()
        .and_then(|w| Reflect::has(&w, &JsValue::from_str("Razorpay")).ok())
        .unwrap_or(false)
}

/// 注入收银台脚本；已加载时立即回调 `true`，加载失败回调 `false`
pub fn load_script(on_ready: impl Fn(bool) + 'static) {
    if is_script_loaded() {
        on_ready(true);
        return;
    }

    let script = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| {
            let body = d.body()?;
            let script = d
                .create_element("script")
                .ok()?
                .dyn_into::<web_sys::HtmlScriptElement>()
                .ok()?;
            Some((body, script))
        });

    let Some((body, script)) = script else {
        tracing::warn!("document unavailable, payment script not injected");
        on_ready(false);
        return;
    };

    script.set_src(CHECKOUT_SCRIPT_URL);
    script.set_async(true);

    let on_ready = Rc::new(on_ready);
    let loaded = on_ready.clone();
    let onload = Closure::<dyn Fn()>::new(move || loaded(true));
    let onerror = Closure::<dyn Fn()>::new(move || {
        tracing::warn!(src = CHECKOUT_SCRIPT_URL, "payment script failed to load");
        on_ready(false)
    });
    script.set_onload(Some(onload.as_ref().unchecked_ref()));
    script.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    // 脚本元素常驻页面，回调随之常驻
    onload.forget();
    onerror.forget();

    if let Err(e) = body.append_child(&script) {
        tracing::warn!(error = ?e, "failed to append payment script");
    }
}

fn set(obj: &Object, key: &str, value: &JsValue) -> Result<(), WidgetError> {
    Reflect::set(obj, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| WidgetError::Options(format!("{:?}", e)))
}

fn field(response: &JsValue, name: &'static str) -> Result<String, WidgetError> {
    Reflect::get(response, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.as_string())
        .ok_or(WidgetError::MissingField(name))
}

fn receipt_from(response: &JsValue) -> Result<PaymentReceipt, WidgetError> {
    Ok(PaymentReceipt {
        razorpay_order_id: field(response, "razorpay_order_id")?,
        razorpay_payment_id: field(response, "razorpay_payment_id")?,
        razorpay_signature: field(response, "razorpay_signature")?,
    })
}

fn build_options(options: &CheckoutOptions, handler: &JsValue, ondismiss: &JsValue) -> Result<Object, WidgetError> {
    let obj = Object::new();
    set(&obj, "key", &JsValue::from_str(&options.key))?;
    set(&obj, "amount", &JsValue::from_f64(options.amount as f64))?;
    set(&obj, "currency", &JsValue::from_str(&options.currency))?;
    set(&obj, "name", &JsValue::from_str(&options.name))?;
    set(&obj, "description", &JsValue::from_str(&options.description))?;
    set(&obj, "order_id", &JsValue::from_str(&options.provider_order_id))?;
    set(&obj, "handler", handler)?;

    let theme = Object::new();
    set(&theme, "color", &JsValue::from_str(THEME_COLOR))?;
    set(&obj, "theme", &theme)?;

    let modal = Object::new();
    set(&modal, "ondismiss", ondismiss)?;
    set(&obj, "modal", &modal)?;
    Ok(obj)
}

async fn open_checkout(options: CheckoutOptions) -> Result<WidgetOutcome, WidgetError> {
    if !is_script_loaded() {
        return Err(WidgetError::NotLoaded);
    }

    let (tx, rx) = oneshot::channel::<Result<WidgetOutcome, WidgetError>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let paid = tx.clone();
    let handler = Closure::once_into_js(move |response: JsValue| {
        let outcome = receipt_from(&response).map(WidgetOutcome::Paid);
        if let Some(tx) = paid.borrow_mut().take() {
            let _ = tx.send(outcome);
        }
    });

    let dismissed = tx;
    let ondismiss = Closure::once_into_js(move || {
        if let Some(tx) = dismissed.borrow_mut().take() {
            let _ = tx.send(Ok(WidgetOutcome::Dismissed));
        }
    });

    let js_options = build_options(&options, &handler, &ondismiss)?;
    let checkout = Razorpay::new(&js_options).map_err(|e| WidgetError::Open(format!("{:?}", e)))?;
    tracing::debug!(provider_order_id = %options.provider_order_id, "opening payment widget");
    checkout.open();

    rx.await.map_err(|_| WidgetError::Interrupted)?
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RazorpayWidget;

#[async_trait::async_trait(?Send)]
impl PaymentWidget for RazorpayWidget {
    fn is_loaded(&self) -> bool {
        is_script_loaded()
    }

    async fn open(&self, options: CheckoutOptions) -> StoreResult<WidgetOutcome> {
        open_checkout(options).await.map_err(StoreError::from)
    }
}
