use electroshop::currency::format_inr;
use electroshop::shared::Product;
use leptos::prelude::*;

use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 库存徽标
#[component]
pub fn StockBadge(stock: i64) -> impl IntoView {
    if stock > 0 {
        view! { <span class="badge badge-success badge-sm">{format!("In stock ({})", stock)}</span> }.into_any()
    } else {
        view! { <span class="badge badge-error badge-sm">"Out of stock"</span> }.into_any()
    }
}

#[component]
fn ProductImage(product: Product, #[prop(into)] class: String) -> impl IntoView {
    match product.image_url {
        Some(url) => view! { <img src=url alt=product.name class=class /> }.into_any(),
        None => view! {
            <div class=format!("{} bg-base-300 flex items-center justify-center text-4xl", class)>"📦"</div>
        }
        .into_any(),
    }
}

/// 商品卡片，`compact` 为列表视图的横向布局
#[component]
pub fn ProductCard(product: Product, #[prop(optional)] compact: bool) -> impl IntoView {
    let href = AppRoute::Product(product.id).to_path();
    let price = format_inr(product.price);
    let stock = product.stock;
    let name = product.name.clone();

    if compact {
        view! {
            <Link to=href class="card card-side bg-base-100 shadow-sm hover:shadow-md transition-shadow">
                <figure class="w-32 shrink-0">
                    <ProductImage product=product class="h-32 w-32 object-cover" />
                </figure>
                <div class="card-body py-4">
                    <h3 class="card-title text-base">{name}</h3>
                    <div class="flex items-center gap-3">
                        <span class="text-lg font-bold text-primary">{price}</span>
                        <StockBadge stock=stock />
                    </div>
                </div>
            </Link>
        }
        .into_any()
    } else {
        view! {
            <Link to=href class="card bg-base-100 shadow-sm hover:shadow-lg transition-shadow">
                <figure class="h-48">
                    <ProductImage product=product class="h-48 w-full object-cover" />
                </figure>
                <div class="card-body p-4">
                    <h3 class="card-title text-base line-clamp-2">{name}</h3>
                    <div class="flex items-center justify-between">
                        <span class="text-lg font-bold text-primary">{price}</span>
                        <StockBadge stock=stock />
                    </div>
                </div>
            </Link>
        }
        .into_any()
    }
}
