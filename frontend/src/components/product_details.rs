use electroshop::auth::needs_sign_in;
use electroshop::cart::CartService;
use electroshop::catalog::{clamp_quantity, load_product};
use electroshop::currency::format_inr;
use electroshop::shared::{Product, ProductId};
use electroshop::wishlist::WishlistService;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{AuthState, use_auth};
use crate::components::icons::{CartIcon, HeartIcon};
use crate::components::notice::{Notice, NoticeToast};
use crate::components::product_card::StockBadge;
use crate::web::BrowserStorage;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn ProductDetailsPage(id: ProductId) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let product = RwSignal::new(Option::<Product>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let quantity = RwSignal::new(1i64);
    let (adding, set_adding) = signal(false);
    let notice = RwSignal::new(Option::<Notice>::None);

    spawn_local(async move {
        match load_product(&auth.api(), id).await {
            Ok(p) => product.set(Some(p)),
            Err(e) => {
                auth.handle_error(&e);
                set_error_msg.set(Some(e.user_message()));
            }
        }
        set_loading.set(false);
    });

    let stock = move || product.with(|p| p.as_ref().map_or(0, |p| p.stock));
    let set_quantity = move |requested: i64| quantity.set(clamp_quantity(requested, stock()));

    let on_add_to_cart = move |_| {
        let qty = quantity.get_untracked();
        let signed_in = auth.state.with_untracked(AuthState::is_authenticated);
        set_adding.set(true);
        spawn_local(async move {
            let api = auth.api();
            match CartService::new(&api).add(id, qty).await {
                Ok(_) => notice.set(Some(Notice::success("Added to cart"))),
                Err(e) if needs_sign_in(signed_in, &e) => {
                    tracing::info!(product_id = id, error = %e, "add to cart needs sign-in");
                    auth.handle_error(&e);
                    router.navigate_to(AppRoute::Login);
                }
                Err(e) => {
                    tracing::warn!(product_id = id, error = %e, "add to cart failed");
                    notice.set(Some(Notice::error(e.user_message())));
                }
            }
            set_adding.set(false);
        });
    };

    let on_add_to_wishlist = move |_| {
        let Some(p) = product.get_untracked() else {
            return;
        };
        let message = match WishlistService::new(BrowserStorage).add(&p) {
            Ok(true) => Notice::success("Added to wishlist"),
            Ok(false) => Notice::info("Already in your wishlist"),
            Err(e) => Notice::error(e.user_message()),
        };
        notice.set(Some(message));
    };

    view! {
        <div class="max-w-6xl mx-auto px-4 py-8">
            <NoticeToast notice=notice />
            <Link to="/shop" class="link link-hover text-sm">"← Back to shop"</Link>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error mt-4">
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
                {move || {
                    product
                        .get()
                        .map(|p| {
                            let in_stock = p.in_stock();
                            view! {
                                <div class="grid grid-cols-1 md:grid-cols-2 gap-10 mt-6">
                                    <div class="bg-base-100 rounded-box shadow-sm overflow-hidden">
                                        {match p.image_url.clone() {
                                            Some(url) => view! {
                                                <img src=url alt=p.name.clone() class="w-full h-96 object-cover" />
                                            }
                                            .into_any(),
                                            None => view! {
                                                <div class="h-96 flex items-center justify-center text-8xl bg-base-300">"📦"</div>
                                            }
                                            .into_any(),
                                        }}
                                    </div>
                                    <div class="space-y-5">
                                        <h1 class="text-3xl font-bold">{p.name.clone()}</h1>
                                        <p class="text-3xl font-bold text-primary">{format_inr(p.price)}</p>
                                        <StockBadge stock=p.stock />
                                        <p class="text-base-content/80 whitespace-pre-line">{p.description.clone()}</p>

                                        <div class="flex items-center gap-3">
                                            <span class="font-semibold">"Quantity"</span>
                                            <div class="join">
                                                <button
                                                    class="btn btn-sm join-item"
                                                    disabled=move || quantity.get() <= 1
                                                    on:click=move |_| set_quantity(quantity.get_untracked() - 1)
                                                >
                                                    "−"
                                                </button>
                                                <span class="btn btn-sm join-item no-animation">{move || quantity.get()}</span>
                                                <button
                                                    class="btn btn-sm join-item"
                                                    disabled=move || quantity.get() >= stock()
                                                    on:click=move |_| set_quantity(quantity.get_untracked() + 1)
                                                >
                                                    "+"
                                                </button>
                                            </div>
                                        </div>

                                        <div class="flex gap-3">
                                            <button
                                                class="btn btn-primary flex-1"
                                                disabled=move || !in_stock || adding.get()
                                                on:click=on_add_to_cart
                                            >
                                                {move || if adding.get() {
                                                    view! { <span class="loading loading-spinner"></span> "Adding..." }.into_any()
                                                } else {
                                                    view! { <CartIcon /> "Add to Cart" }.into_any()
                                                }}
                                            </button>
                                            <button class="btn btn-outline" on:click=on_add_to_wishlist>
                                                <HeartIcon />
                                                "Wishlist"
                                            </button>
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
