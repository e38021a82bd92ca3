use electroshop::cart::CartService;
use electroshop::currency::format_inr;
use electroshop::shared::{Product, ProductId};
use electroshop::wishlist::WishlistService;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{AuthState, use_auth};
use crate::components::icons::{CartIcon, TrashIcon};
use crate::components::notice::{Notice, NoticeToast};
use crate::components::product_card::StockBadge;
use crate::web::BrowserStorage;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

fn wishlist() -> WishlistService<BrowserStorage> {
    WishlistService::new(BrowserStorage)
}

/// 心愿单只存在本地，未登录也可浏览
#[component]
pub fn WishlistPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let entries = RwSignal::new(wishlist().load().entries().to_vec());
    let notice = RwSignal::new(Option::<Notice>::None);

    let on_remove = move |id: ProductId| match wishlist().remove(id) {
        Ok(list) => entries.set(list.entries().to_vec()),
        Err(e) => notice.set(Some(Notice::error(e.user_message()))),
    };

    let on_move_to_cart = move |id: ProductId| {
        if !auth.state.with_untracked(AuthState::is_authenticated) {
            router.navigate_to(AppRoute::Login);
            return;
        }
        spawn_local(async move {
            let api = auth.api();
            match CartService::new(&api).add(id, 1).await {
                Ok(_) => {
                    on_remove(id);
                    notice.set(Some(Notice::success("Moved to cart")));
                }
                Err(e) => {
                    auth.handle_error(&e);
                    notice.set(Some(Notice::error(e.user_message())));
                }
            }
        });
    };

    view! {
        <div class="max-w-6xl mx-auto px-4 py-8">
            <NoticeToast notice=notice />
            <h1 class="text-3xl font-bold mb-6">"My Wishlist"</h1>
            <Show
                when=move || entries.with(|e| !e.is_empty())
                fallback=|| view! {
                    <div class="text-center py-16 space-y-4">
                        <p class="text-xl">"Your wishlist is empty"</p>
                        <Link to="/shop" class="btn btn-primary">"Browse Products"</Link>
                    </div>
                }
            >
                <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6">
                    <For
                        each=move || entries.get()
                        key=|p| p.id
                        children=move |product: Product| {
                            let id = product.id;
                            let in_stock = product.in_stock();
                            let href = AppRoute::Product(id).to_path();
                            view! {
                                <div class="card bg-base-100 shadow-sm">
                                    <div class="card-body">
                                        <Link to=href class="card-title link link-hover">{product.name.clone()}</Link>
                                        <div class="flex items-center justify-between">
                                            <span class="text-lg font-bold text-primary">{format_inr(product.price)}</span>
                                            <StockBadge stock=product.stock />
                                        </div>
                                        <div class="card-actions justify-end mt-2">
                                            <button
                                                class="btn btn-ghost btn-sm text-error"
                                                on:click=move |_| on_remove(id)
                                                aria-label="Remove"
                                            >
                                                <TrashIcon class="h-4 w-4" />
                                            </button>
                                            <button
                                                class="btn btn-primary btn-sm"
                                                disabled=!in_stock
                                                on:click=move |_| on_move_to_cart(id)
                                            >
                                                <CartIcon class="h-4 w-4" />
                                                "Move to Cart"
                                            </button>
                                        </div>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </Show>
        </div>
    }
}
