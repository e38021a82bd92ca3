use electroshop::catalog::{CatalogView, ProductFilter, catalog_view, load_products};
use electroshop::shared::Product;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::config;
use crate::auth::use_auth;
use crate::components::filters::{Filters, Pagination};
use crate::components::icons::{GridIcon, ListIcon};
use crate::components::product_card::ProductCard;

#[component]
pub fn ProductListPage(q: Option<String>) -> impl IntoView {
    let auth = use_auth();

    let products = RwSignal::new(Vec::<Product>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 搜索词来自地址栏，其余条件只在本页有效
    let filter = RwSignal::new(ProductFilter::with_query(q.unwrap_or_default()));
    let page = RwSignal::new(1usize);
    let grid = RwSignal::new(true);

    spawn_local(async move {
        match load_products(&auth.api()).await {
            Ok(list) => {
                tracing::debug!(count = list.len(), "catalog loaded");
                products.set(list);
            }
            Err(e) => {
                auth.handle_error(&e);
                set_error_msg.set(Some(e.user_message()));
            }
        }
        set_loading.set(false);
    });

    let view_state: Memo<CatalogView> = Memo::new(move |_| {
        let page = page.get();
        filter.with(|f| products.with(|list| catalog_view(list, f, page, config().page_size)))
    });

    let matched = move || view_state.with(|v| v.matched);
    let current_page = Signal::derive(move || view_state.with(|v| v.page.page));
    let total_pages = Signal::derive(move || view_state.with(|v| v.page.total_pages));

    let on_filter_change = Callback::new(move |_: ()| page.set(1));
    let on_page = Callback::new(move |n: usize| {
        page.set(n);
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    });

    view! {
        <div class="max-w-7xl mx-auto px-4 py-8 space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"All Products"</h1>
                    <p class="text-sm text-base-content/70">
                        {move || format!("{} products found", matched())}
                    </p>
                </div>
                <div class="join">
                    <button
                        class=move || if grid.get() { "join-item btn btn-sm btn-active" } else { "join-item btn btn-sm" }
                        on:click=move |_| grid.set(true)
                        aria-label="Grid view"
                    >
                        <GridIcon class="h-4 w-4" />
                    </button>
                    <button
                        class=move || if grid.get() { "join-item btn btn-sm" } else { "join-item btn btn-sm btn-active" }
                        on:click=move |_| grid.set(false)
                        aria-label="List view"
                    >
                        <ListIcon class="h-4 w-4" />
                    </button>
                </div>
            </div>

            <Filters filter=filter on_change=on_filter_change />

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
                <Show
                    when=move || { matched() > 0 }
                    fallback=|| view! {
                        <div class="text-center py-16 text-base-content/60">"No products match your filters."</div>
                    }
                >
                    {move || {
                        // 切换视图时整体重建卡片
                        let compact = !grid.get();
                        let class = if compact {
                            "flex flex-col gap-4"
                        } else {
                            "grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4 gap-6"
                        };
                        view! {
                            <div class=class>
                                <For
                                    each=move || view_state.with(|v| v.page.items.clone())
                                    key=|p| p.id
                                    children=move |product: Product| {
                                        view! { <ProductCard product=product compact=compact /> }
                                    }
                                />
                            </div>
                        }
                    }}
                </Show>
                <Pagination current=current_page total=total_pages on_select=on_page />
            </Show>
        </div>
    }
}
