//! 管理后台
//!
//! 首次进入时并发拉取四个集合；之后每次变更先把返回的实体写入本地，
//! 再只刷新被判定为过期的集合。

mod form_state;
mod product_dialog;

use electroshop::admin::{AdminData, AdminPatch, AdminService, AdminSummary, ProductDraft, REVENUE_DAYS};
use electroshop::currency::format_inr;
use electroshop::error::{StoreError, StoreResult};
use electroshop::shared::date::format_order_date;
use electroshop::shared::{Order, OrderId, OrderStatus, Product, ProductId, ProductSales, Role, User, UserId};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{AuthContext, use_auth};
use crate::components::icons::{RefreshIcon, TrashIcon};
use crate::components::orders::StatusBadge;
use form_state::FormState;
use product_dialog::ProductDialog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Products,
    Orders,
    Users,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Overview, Tab::Products, Tab::Orders, Tab::Users];

    fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Products => "Products",
            Tab::Orders => "Orders",
            Tab::Users => "Users",
        }
    }
}

/// 后台操作失败以阻塞式弹窗提示
fn alert_failure(auth: &AuthContext, err: &StoreError) {
    tracing::warn!(error = %err, "admin operation failed");
    auth.handle_error(err);
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(&err.user_message());
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// 写入变更结果并在后台刷新过期集合，返回是否成功
fn commit(auth: AuthContext, data: RwSignal<AdminData>, result: StoreResult<AdminPatch>) -> bool {
    let patch = match result {
        Ok(patch) => patch,
        Err(e) => {
            alert_failure(&auth, &e);
            return false;
        }
    };

    let Some(stale) = data.try_update(|d| d.apply(patch)) else {
        return true;
    };
    if stale.is_empty() {
        return true;
    }

    spawn_local(async move {
        let api = auth.api();
        match AdminService::new(&api).refresh(stale).await {
            Ok(refreshed) => data.update(|d| d.merge(refreshed)),
            Err(e) => {
                tracing::warn!(error = %e, ?stale, "admin refresh failed");
                auth.handle_error(&e);
            }
        }
    });
    true
}

// ============================================================================
// 概览
// ============================================================================

#[component]
fn SummaryStat(title: &'static str, value: String, #[prop(optional)] hint: Option<String>) -> impl IntoView {
    view! {
        <div class="stat bg-base-100 rounded-box shadow-sm">
            <div class="stat-title">{title}</div>
            <div class="stat-value text-2xl">{value}</div>
            {hint.map(|h| view! { <div class="stat-desc">{h}</div> })}
        </div>
    }
}

#[component]
fn Overview(summary: AdminSummary, top_sellers: Vec<ProductSales>) -> impl IntoView {
    let distribution = summary.status_distribution.clone();

    view! {
        <div class="space-y-6">
            <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4">
                <SummaryStat
                    title="Total Revenue"
                    value=format_inr(summary.total_revenue)
                    hint=format!("avg {} / day over {} days", format_inr(summary.avg_daily_revenue), REVENUE_DAYS)
                />
                <SummaryStat
                    title="Orders"
                    value=summary.total_orders.to_string()
                    hint=format!(
                        "{} completed · {} pending · {} processing",
                        summary.completed_orders,
                        summary.pending_orders,
                        summary.processing_orders,
                    )
                />
                <SummaryStat title="Products" value=summary.total_products.to_string() />
                <SummaryStat
                    title="Users"
                    value=summary.total_users.to_string()
                    hint=format!("{} top sellers", summary.top_seller_count)
                />
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body">
                        <h3 class="card-title">"Order Status"</h3>
                        {if distribution.is_empty() {
                            view! { <p class="text-base-content/60">"No orders yet"</p> }.into_any()
                        } else {
                            distribution
                                .into_iter()
                                .map(|(status, count)| {
                                    view! {
                                        <div class="flex justify-between py-1">
                                            <span>{status}</span>
                                            <span class="font-semibold">{count}</span>
                                        </div>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </div>
                </div>
                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body">
                        <h3 class="card-title">"Top Selling Products"</h3>
                        {top_sellers
                            .into_iter()
                            .map(|p| {
                                view! {
                                    <div class="flex justify-between py-1">
                                        <span>{p.product_name}</span>
                                        <span class="text-sm">
                                            {format!("{} sold · {}", p.quantity_sold, format_inr(p.revenue))}
                                        </span>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <h3 class="card-title">"Recent Orders"</h3>
                    <div class="overflow-x-auto">
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Order"</th>
                                    <th>"Customer"</th>
                                    <th>"Date"</th>
                                    <th>"Total"</th>
                                    <th>"Status"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {summary
                                    .recent_orders
                                    .into_iter()
                                    .map(|o| {
                                        view! {
                                            <tr>
                                                <td>{format!("#{}", o.id)}</td>
                                                <td>{o.customer_name().to_string()}</td>
                                                <td>{format_order_date(o.created_at.as_deref())}</td>
                                                <td>{format_inr(o.total_amount)}</td>
                                                <td><StatusBadge status=o.status /></td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}

// ============================================================================
// 管理表格
// ============================================================================

#[component]
fn ProductsTable(
    products: Signal<Vec<Product>>,
    #[prop(into)] on_add: Callback<()>,
    #[prop(into)] on_edit: Callback<Product>,
    #[prop(into)] on_delete: Callback<ProductId>,
) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"Products"</h3>
                    <button class="btn btn-primary btn-sm" on:click=move |_| on_add.run(())>"Add Product"</button>
                </div>
                <div class="overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Name"</th>
                                <th>"Price"</th>
                                <th>"Stock"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || products.get()
                                key=|p| (p.id, p.name.clone(), p.price, p.stock)
                                children=move |product: Product| {
                                    let id = product.id;
                                    let editable = product.clone();
                                    view! {
                                        <tr>
                                            <td>{id}</td>
                                            <td>{product.name.clone()}</td>
                                            <td>{format_inr(product.price)}</td>
                                            <td>{product.stock}</td>
                                            <td class="flex gap-2 justify-end">
                                                <button
                                                    class="btn btn-ghost btn-xs"
                                                    on:click=move |_| on_edit.run(editable.clone())
                                                >
                                                    "Edit"
                                                </button>
                                                <button
                                                    class="btn btn-ghost btn-xs text-error"
                                                    on:click=move |_| on_delete.run(id)
                                                    aria-label="Delete"
                                                >
                                                    <TrashIcon class="h-4 w-4" />
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
fn OrdersTable(
    orders: Signal<Vec<Order>>,
    #[prop(into)] on_status: Callback<(OrderId, OrderStatus)>,
) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <h3 class="card-title">"Orders"</h3>
                <div class="overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Order"</th>
                                <th>"Customer"</th>
                                <th>"Date"</th>
                                <th>"Items"</th>
                                <th>"Total"</th>
                                <th>"Status"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || orders.get()
                                key=|o| (o.id, o.status)
                                children=move |order: Order| {
                                    let id = order.id;
                                    view! {
                                        <tr>
                                            <td>{format!("#{}", id)}</td>
                                            <td>{order.customer_name().to_string()}</td>
                                            <td>{format_order_date(order.created_at.as_deref())}</td>
                                            <td>{order.item_count()}</td>
                                            <td>{format_inr(order.total_amount)}</td>
                                            <td>
                                                <select
                                                    class="select select-bordered select-xs"
                                                    on:change=move |ev| {
                                                        if let Some(status) = OrderStatus::parse(&event_target_value(&ev)) {
                                                            on_status.run((id, status));
                                                        }
                                                    }
                                                >
                                                    {OrderStatus::ALL
                                                        .into_iter()
                                                        .map(|s| {
                                                            view! {
                                                                <option value=s.as_str() selected=s == order.status>
                                                                    {s.label()}
                                                                </option>
                                                            }
                                                        })
                                                        .collect_view()}
                                                </select>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
fn UsersTable(users: Signal<Vec<User>>, #[prop(into)] on_role: Callback<(UserId, Role)>) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <h3 class="card-title">"Users"</h3>
                <div class="overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Name"</th>
                                <th>"Email"</th>
                                <th>"Joined"</th>
                                <th>"Role"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || users.get()
                                key=|u| (u.id, u.role)
                                children=move |user: User| {
                                    let id = user.id;
                                    view! {
                                        <tr>
                                            <td>{id}</td>
                                            <td>{user.name.clone()}</td>
                                            <td>{user.email.clone()}</td>
                                            <td>{format_order_date(user.created_at.as_deref())}</td>
                                            <td>
                                                <select
                                                    class="select select-bordered select-xs"
                                                    on:change=move |ev| {
                                                        let role = Role::from_claim(&event_target_value(&ev));
                                                        if role != Role::Unknown {
                                                            on_role.run((id, role));
                                                        }
                                                    }
                                                >
                                                    {[Role::User, Role::Admin]
                                                        .into_iter()
                                                        .map(|r| {
                                                            view! {
                                                                <option value=r.as_str() selected=r == user.role>
                                                                    {r.label()}
                                                                </option>
                                                            }
                                                        })
                                                        .collect_view()}
                                                </select>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

// ============================================================================
// 页面
// ============================================================================

#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = use_auth();

    let data = RwSignal::new(AdminData::default());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let tab = RwSignal::new(Tab::Overview);

    let form = FormState::new();
    let dialog_open = RwSignal::new(false);
    let (saving, set_saving) = signal(false);

    let load = move || {
        set_loading.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            let api = auth.api();
            match AdminService::new(&api).load().await {
                Ok(loaded) => {
                    tracing::debug!(
                        users = loaded.users.len(),
                        products = loaded.products.len(),
                        orders = loaded.orders.len(),
                        "admin data loaded"
                    );
                    data.set(loaded);
                }
                Err(e) => {
                    auth.handle_error(&e);
                    set_error_msg.set(Some(e.user_message()));
                }
            }
            set_loading.set(false);
        });
    };
    load();

    let summary = Memo::new(move |_| data.with(AdminData::summary));
    let top_sellers = Memo::new(move |_| data.with(|d| d.analytics.top_selling_products.clone()));
    let products = Signal::derive(move || data.with(|d| d.products.clone()));
    let orders = Signal::derive(move || data.with(|d| d.orders.clone()));
    let users = Signal::derive(move || data.with(|d| d.users.clone()));

    let on_add = Callback::new(move |_: ()| {
        form.reset();
        dialog_open.set(true);
    });

    let on_edit = Callback::new(move |product: Product| {
        form.load(&product);
        dialog_open.set(true);
    });

    let on_save = Callback::new(move |draft: ProductDraft| {
        set_saving.set(true);
        spawn_local(async move {
            let api = auth.api();
            let result = AdminService::new(&api).save_product(&draft).await;
            if commit(auth, data, result) {
                dialog_open.set(false);
                form.reset();
            }
            set_saving.set(false);
        });
    });

    let on_delete = Callback::new(move |id: ProductId| {
        if !confirm("Delete this product?") {
            return;
        }
        spawn_local(async move {
            let api = auth.api();
            let result = AdminService::new(&api).delete_product(id).await;
            commit(auth, data, result);
        });
    });

    let on_status = Callback::new(move |(id, status): (OrderId, OrderStatus)| {
        spawn_local(async move {
            let api = auth.api();
            let result = AdminService::new(&api).change_order_status(id, status).await;
            commit(auth, data, result);
        });
    });

    let on_role = Callback::new(move |(id, role): (UserId, Role)| {
        spawn_local(async move {
            let api = auth.api();
            let result = AdminService::new(&api).change_role(id, role).await;
            commit(auth, data, result);
        });
    });

    view! {
        <div class="max-w-7xl mx-auto px-4 py-8 space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Admin Dashboard"</h1>
                <button class="btn btn-ghost btn-sm gap-2" disabled=move || loading.get() on:click=move |_| load()>
                    <RefreshIcon class="h-4 w-4" />
                    "Reload"
                </button>
            </div>

            <div role="tablist" class="tabs tabs-boxed w-fit">
                {Tab::ALL
                    .into_iter()
                    .map(|t| {
                        view! {
                            <a
                                role="tab"
                                class=move || if tab.get() == t { "tab tab-active" } else { "tab" }
                                on:click=move |_| tab.set(t)
                            >
                                {t.label()}
                            </a>
                        }
                    })
                    .collect_view()}
            </div>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                {move || match tab.get() {
                    Tab::Overview => view! {
                        <Overview summary=summary.get() top_sellers=top_sellers.get() />
                    }
                    .into_any(),
                    Tab::Products => view! {
                        <ProductsTable products=products on_add=on_add on_edit=on_edit on_delete=on_delete />
                    }
                    .into_any(),
                    Tab::Orders => view! { <OrdersTable orders=orders on_status=on_status /> }.into_any(),
                    Tab::Users => view! { <UsersTable users=users on_role=on_role /> }.into_any(),
                }}
            </Show>

            <ProductDialog form=form open=dialog_open saving=saving on_save=on_save />
        </div>
    }
}
