//! 结账页
//!
//! 进入时检查购物车并预加载收银台脚本，提交逻辑全部交给 `CheckoutService`。

use electroshop::cart::CartTotals;
use electroshop::checkout::{CheckoutEntry, CheckoutOutcome, CheckoutService, can_submit, confirmation_path};
use electroshop::currency::format_inr;
use electroshop::error::StoreError;
use electroshop::shared::{CartItem, PaymentMethod};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::config;
use crate::auth::{AuthContext, use_auth};
use crate::components::cart::CartSummary;
use crate::web::payment::{RazorpayWidget, load_script};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 结账失败以阻塞式弹窗提示
fn alert_failure(auth: &AuthContext, err: &StoreError) {
    tracing::warn!(error = %err, "checkout failed");
    auth.handle_error(err);
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(&err.user_message());
    }
}

#[component]
fn PaymentOption(
    method: PaymentMethod,
    selected: RwSignal<PaymentMethod>,
    title: &'static str,
    hint: &'static str,
) -> impl IntoView {
    view! {
        <label class="flex items-start gap-3 p-4 border border-base-300 rounded-box cursor-pointer hover:bg-base-200">
            <input
                type="radio"
                name="payment-method"
                class="radio radio-primary mt-1"
                prop:checked=move || selected.get() == method
                on:change=move |_| selected.set(method)
            />
            <div>
                <p class="font-semibold">{title}</p>
                <p class="text-sm text-base-content/70">{hint}</p>
            </div>
        </label>
    }
}

#[component]
pub fn CheckoutPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let items = RwSignal::new(Vec::<CartItem>::new());
    let (entering, set_entering) = signal(true);
    let (loading, set_loading) = signal(false);
    let (widget_loaded, set_widget_loaded) = signal(false);
    let method = RwSignal::new(PaymentMethod::Cod);

    load_script(move |ok| set_widget_loaded.set(ok));

    spawn_local(async move {
        let api = auth.api();
        let widget = RazorpayWidget;
        let service = CheckoutService::new(&api, &widget, &config().brand, config().payment_key_id.clone());
        match service.enter().await {
            Ok(CheckoutEntry::EmptyCart) => {
                tracing::info!("checkout entered with an empty cart");
                router.replace(AppRoute::Cart);
            }
            Ok(CheckoutEntry::Ready(list)) => items.set(list),
            Err(e) => alert_failure(&auth, &e),
        }
        set_entering.set(false);
    });

    let totals = Signal::derive(move || items.with(|list| CartTotals::compute(list, config().tax_rate)));
    let submittable =
        move || can_submit(method.get(), &totals.get(), widget_loaded.get(), loading.get());

    let on_submit = move |_| {
        if !submittable() {
            return;
        }
        set_loading.set(true);
        let chosen = method.get_untracked();
        let total = totals.get_untracked().total;

        spawn_local(async move {
            let api = auth.api();
            let widget = RazorpayWidget;
            let service = CheckoutService::new(&api, &widget, &config().brand, config().payment_key_id.clone());
            match service.pay(chosen, total).await {
                Ok(CheckoutOutcome::Confirmed(order_id)) => {
                    router.navigate(&confirmation_path(order_id));
                }
                Ok(CheckoutOutcome::Dismissed) => set_loading.set(false),
                Err(e) => {
                    alert_failure(&auth, &e);
                    set_loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="max-w-6xl mx-auto px-4 py-8">
            <h1 class="text-3xl font-bold mb-6">"Checkout"</h1>
            <Show
                when=move || !entering.get()
                fallback=|| view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <div class="grid grid-cols-1 lg:grid-cols-3 gap-8">
                    <div class="lg:col-span-2 space-y-6">
                        <div class="card bg-base-100 shadow-sm">
                            <div class="card-body">
                                <h2 class="card-title">"Items"</h2>
                                <For
                                    each=move || items.get()
                                    key=|item| item.product.id
                                    children=|item: CartItem| view! {
                                        <div class="flex justify-between py-1">
                                            <span>{format!("{} × {}", item.product.name, item.quantity)}</span>
                                            <span>{format_inr(item.line_total())}</span>
                                        </div>
                                    }
                                />
                            </div>
                        </div>

                        <div class="card bg-base-100 shadow-sm">
                            <div class="card-body space-y-3">
                                <h2 class="card-title">"Payment Method"</h2>
                                <PaymentOption
                                    method=PaymentMethod::Cod
                                    selected=method
                                    title="Cash on Delivery"
                                    hint="Pay when your order arrives"
                                />
                                <PaymentOption
                                    method=PaymentMethod::Razorpay
                                    selected=method
                                    title="Pay Online"
                                    hint="Cards, UPI, net banking and wallets"
                                />
                                <Show when=move || method.get() == PaymentMethod::Razorpay && !widget_loaded.get()>
                                    <p class="text-sm text-warning">"Loading secure payment gateway..."</p>
                                </Show>
                            </div>
                        </div>
                    </div>

                    <CartSummary totals=totals>
                        <button
                            class="btn btn-primary w-full mt-4"
                            disabled=move || !submittable()
                            on:click=on_submit
                        >
                            {move || if loading.get() {
                                view! { <span class="loading loading-spinner"></span> "Processing..." }.into_any()
                            } else {
                                "Place Order".into_any()
                            }}
                        </button>
                    </CartSummary>
                </div>
            </Show>
        </div>
    }
}
