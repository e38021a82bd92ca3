use electroshop::currency::format_inr;
use electroshop::error::StoreResult;
use electroshop::orders::{OrderService, tracking_steps};
use electroshop::shared::date::{format_order_date, format_order_datetime};
use electroshop::shared::{Order, OrderId, OrderStatus, PaymentMethod};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::CheckIcon;
use crate::web::route::AppRoute;
use crate::web::router::Link;

fn status_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Placed => "badge badge-info",
        OrderStatus::Paid => "badge badge-primary",
        OrderStatus::Shipped => "badge badge-warning",
        OrderStatus::Delivered => "badge badge-success",
        OrderStatus::Canceled => "badge badge-error",
        OrderStatus::Unknown => "badge badge-ghost",
    }
}

fn payment_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cod => "Cash on Delivery",
        PaymentMethod::Razorpay => "Online",
        PaymentMethod::Other => "Other",
    }
}

#[component]
pub fn StatusBadge(status: OrderStatus) -> impl IntoView {
    view! { <span class=status_class(status)>{status.label()}</span> }
}

#[component]
fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-16">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

#[component]
fn OrderItems(order: Order) -> impl IntoView {
    view! {
        <div class="divide-y divide-base-300">
            {order
                .items
                .into_iter()
                .map(|item| {
                    view! {
                        <div class="flex justify-between py-2">
                            <span>{format!("{} × {}", item.product.name, item.quantity)}</span>
                            <span>{format_inr(item.line_total())}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// 单个订单的加载状态，追踪页与确认页共用
fn load_order(id: OrderId, tracking: bool) -> (ReadSignal<Option<Order>>, ReadSignal<bool>, ReadSignal<Option<String>>) {
    let auth = use_auth();
    let (order, set_order) = signal(Option::<Order>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    spawn_local(async move {
        let api = auth.api();
        let service = OrderService::new(&api);
        let result: StoreResult<Order> = if tracking {
            service.track(id).await
        } else {
            service.get(id).await
        };
        match result {
            Ok(o) => set_order.set(Some(o)),
            Err(e) => {
                auth.handle_error(&e);
                set_error_msg.set(Some(e.user_message()));
            }
        }
        set_loading.set(false);
    });

    (order, loading, error_msg)
}

// ============================================================================
// 订单列表
// ============================================================================

#[component]
pub fn OrdersPage() -> impl IntoView {
    let auth = use_auth();
    let (orders, set_orders) = signal(Vec::<Order>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    spawn_local(async move {
        let api = auth.api();
        match OrderService::new(&api).list().await {
            Ok(list) => set_orders.set(list),
            Err(e) => {
                auth.handle_error(&e);
                set_error_msg.set(Some(e.user_message()));
            }
        }
        set_loading.set(false);
    });

    view! {
        <div class="max-w-5xl mx-auto px-4 py-8 space-y-6">
            <h1 class="text-3xl font-bold">"My Orders"</h1>
            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>
            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <Show
                    when=move || orders.with(|o| !o.is_empty())
                    fallback=|| view! {
                        <div class="text-center py-16 space-y-4">
                            <p class="text-xl">"You haven't placed any orders yet"</p>
                            <Link to="/shop" class="btn btn-primary">"Start Shopping"</Link>
                        </div>
                    }
                >
                    <For
                        each=move || orders.get()
                        key=|o| o.id
                        children=|order: Order| {
                            let href = AppRoute::OrderTracking(order.id).to_path();
                            view! {
                                <div class="card bg-base-100 shadow-sm">
                                    <div class="card-body">
                                        <div class="flex flex-wrap items-center justify-between gap-2">
                                            <div>
                                                <h2 class="font-bold">{format!("Order #{}", order.id)}</h2>
                                                <p class="text-sm text-base-content/70">
                                                    {format_order_date(order.created_at.as_deref())}
                                                </p>
                                            </div>
                                            <StatusBadge status=order.status />
                                        </div>
                                        <div class="flex flex-wrap items-center justify-between gap-2 mt-2">
                                            <span class="text-sm">
                                                {format!("{} items · {}", order.item_count(), payment_label(order.payment_method))}
                                            </span>
                                            <span class="font-bold text-primary">{format_inr(order.total_amount)}</span>
                                        </div>
                                        <div class="card-actions justify-end">
                                            <Link to=href class="btn btn-outline btn-sm">"Track Order"</Link>
                                        </div>
                                    </div>
                                </div>
                            }
                        }
                    />
                </Show>
            </Show>
        </div>
    }
}

// ============================================================================
// 订单追踪
// ============================================================================

#[component]
pub fn OrderTrackingPage(id: OrderId) -> impl IntoView {
    let (order, loading, error_msg) = load_order(id, true);

    view! {
        <div class="max-w-4xl mx-auto px-4 py-8 space-y-6">
            <Link to="/orders" class="link link-hover text-sm">"← Back to orders"</Link>
            <h1 class="text-3xl font-bold">{format!("Track Order #{}", id)}</h1>
            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>
            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                {move || {
                    order
                        .get()
                        .map(|order| {
                            let canceled = order.status == OrderStatus::Canceled;
                            view! {
                                <div class="card bg-base-100 shadow-sm">
                                    <div class="card-body space-y-4">
                                        <div class="flex items-center justify-between">
                                            <span class="text-sm text-base-content/70">
                                                {format!("Placed {}", format_order_datetime(order.created_at.as_deref()))}
                                            </span>
                                            <StatusBadge status=order.status />
                                        </div>
                                        <Show when=move || canceled>
                                            <div role="alert" class="alert alert-error">"This order has been canceled."</div>
                                        </Show>
                                        <ul class="steps steps-vertical md:steps-horizontal w-full">
                                            {tracking_steps(order.status)
                                                .into_iter()
                                                .map(|step| {
                                                    let class = if step.completed { "step step-primary" } else { "step" };
                                                    let label = if step.current {
                                                        format!("{} (current)", step.label)
                                                    } else {
                                                        step.label.to_string()
                                                    };
                                                    view! { <li class=class>{label}</li> }
                                                })
                                                .collect_view()}
                                        </ul>
                                        <OrderItems order=order.clone() />
                                        <div class="flex justify-between font-bold text-lg">
                                            <span>"Total"</span>
                                            <span class="text-primary">{format_inr(order.total_amount)}</span>
                                        </div>
                                    </div>
                                </div>
                            }
                        })
                }}
            </Show>
        </div>
    }
}

// ============================================================================
// 下单成功
// ============================================================================

#[component]
pub fn OrderConfirmationPage(id: OrderId) -> impl IntoView {
    let (order, loading, error_msg) = load_order(id, false);
    let tracking_href = AppRoute::OrderTracking(id).to_path();

    view! {
        <div class="max-w-3xl mx-auto px-4 py-12 space-y-6">
            <div class="text-center space-y-3">
                <div class="inline-flex p-4 rounded-full bg-success/15 text-success">
                    <CheckIcon class="h-12 w-12" />
                </div>
                <h1 class="text-3xl font-bold">"Order Confirmed!"</h1>
                <p class="text-base-content/70">{format!("Thank you. Your order #{} has been placed.", id)}</p>
            </div>
            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-warning">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>
            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                {move || {
                    order
                        .get()
                        .map(|order| {
                            view! {
                                <div class="card bg-base-100 shadow-sm">
                                    <div class="card-body">
                                        <div class="flex justify-between text-sm">
                                            <span>{payment_label(order.payment_method)}</span>
                                            <StatusBadge status=order.status />
                                        </div>
                                        <OrderItems order=order.clone() />
                                        <div class="flex justify-between font-bold text-lg">
                                            <span>"Total"</span>
                                            <span class="text-primary">{format_inr(order.total_amount)}</span>
                                        </div>
                                    </div>
                                </div>
                            }
                        })
                }}
            </Show>
            <div class="flex justify-center gap-3">
                <Link to=tracking_href class="btn btn-primary">"Track Order"</Link>
                <Link to="/shop" class="btn btn-outline">"Continue Shopping"</Link>
            </div>
        </div>
    }
}
