use electroshop::cart::{CartService, CartTotals, item_count};
use electroshop::currency::format_inr;
use electroshop::shared::{CartItem, ProductId};
use leptos::prelude::*;
use leptos::task::spawn_local;
use rust_decimal::Decimal;

use crate::api::config;
use crate::auth::use_auth;
use crate::components::icons::TrashIcon;
use crate::components::notice::{Notice, NoticeToast};
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 金额汇总卡片，结账页复用
#[component]
pub fn CartSummary(#[prop(into)] totals: Signal<CartTotals>, children: Children) -> impl IntoView {
    let tax_label = format!("Tax ({}%)", (config().tax_rate * Decimal::ONE_HUNDRED).normalize());

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body space-y-2">
                <h2 class="card-title">"Order Summary"</h2>
                <div class="flex justify-between">
                    <span>"Subtotal"</span>
                    <span>{move || format_inr(totals.get().subtotal)}</span>
                </div>
                <div class="flex justify-between">
                    <span>{tax_label}</span>
                    <span>{move || format_inr(totals.get().tax)}</span>
                </div>
                <div class="flex justify-between">
                    <span>"Shipping"</span>
                    <span class="text-success">"Free"</span>
                </div>
                <div class="divider my-1"></div>
                <div class="flex justify-between text-lg font-bold">
                    <span>"Total"</span>
                    <span class="text-primary">{move || format_inr(totals.get().total)}</span>
                </div>
                {children()}
            </div>
        </div>
    }
}

#[component]
pub fn CartPage() -> impl IntoView {
    let auth = use_auth();

    let items = RwSignal::new(Vec::<CartItem>::new());
    let (loading, set_loading) = signal(true);
    let (busy, set_busy) = signal(false);
    let notice = RwSignal::new(Option::<Notice>::None);

    spawn_local(async move {
        let api = auth.api();
        match CartService::new(&api).items().await {
            Ok(list) => items.set(list),
            Err(e) => {
                auth.handle_error(&e);
                notice.set(Some(Notice::error(e.user_message())));
            }
        }
        set_loading.set(false);
    });

    let totals = Signal::derive(move || items.with(|list| CartTotals::compute(list, config().tax_rate)));

    let on_remove = move |product_id: ProductId| {
        set_busy.set(true);
        spawn_local(async move {
            let api = auth.api();
            match CartService::new(&api).remove(product_id).await {
                Ok(list) => {
                    items.set(list);
                    notice.set(Some(Notice::success("Item removed")));
                }
                Err(e) => {
                    auth.handle_error(&e);
                    notice.set(Some(Notice::error(e.user_message())));
                }
            }
            set_busy.set(false);
        });
    };

    let on_clear = move |_| {
        set_busy.set(true);
        spawn_local(async move {
            let api = auth.api();
            match CartService::new(&api).clear().await {
                Ok(()) => items.set(Vec::new()),
                Err(e) => {
                    auth.handle_error(&e);
                    notice.set(Some(Notice::error(e.user_message())));
                }
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="max-w-6xl mx-auto px-4 py-8">
            <NoticeToast notice=notice />
            <h1 class="text-3xl font-bold mb-6">
                "Shopping Cart"
                <span class="text-base font-normal text-base-content/60 ml-2">
                    {move || format!("({} items)", items.with(|list| item_count(list)))}
                </span>
            </h1>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <Show
                    when=move || items.with(|list| !list.is_empty())
                    fallback=|| view! {
                        <div class="text-center py-16 space-y-4">
                            <p class="text-xl">"Your cart is empty"</p>
                            <Link to="/shop" class="btn btn-primary">"Continue Shopping"</Link>
                        </div>
                    }
                >
                    <div class="grid grid-cols-1 lg:grid-cols-3 gap-8">
                        <div class="lg:col-span-2 space-y-4">
                            <For
                                each=move || items.get()
                                key=|item| (item.product.id, item.quantity)
                                children=move |item: CartItem| {
                                    let product_id = item.product.id;
                                    let href = AppRoute::Product(product_id).to_path();
                                    let name = item.product.name.clone();
                                    view! {
                                        <div class="card card-side bg-base-100 shadow-sm">
                                            <div class="card-body flex-row items-center gap-4 py-4">
                                                <div class="flex-1">
                                                    <Link to=href class="font-semibold link link-hover">
                                                        {name}
                                                    </Link>
                                                    <p class="text-sm text-base-content/70">
                                                        {format!("{} × {}", format_inr(item.product.price), item.quantity)}
                                                    </p>
                                                </div>
                                                <span class="font-bold">{format_inr(item.line_total())}</span>
                                                <button
                                                    class="btn btn-ghost btn-sm btn-square text-error"
                                                    disabled=move || busy.get()
                                                    on:click=move |_| on_remove(product_id)
                                                    aria-label="Remove"
                                                >
                                                    <TrashIcon />
                                                </button>
                                            </div>
                                        </div>
                                    }
                                }
                            />
                            <button class="btn btn-ghost btn-sm text-error" disabled=move || busy.get() on:click=on_clear>
                                "Clear cart"
                            </button>
                        </div>
                        <CartSummary totals=totals>
                            <Link to="/checkout" class="btn btn-primary w-full mt-4">"Proceed to Checkout"</Link>
                        </CartSummary>
                    </div>
                </Show>
            </Show>
        </div>
    }
}
