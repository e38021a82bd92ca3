use electroshop::catalog::{featured, load_products};
use electroshop::shared::Product;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::product_card::ProductCard;
use crate::components::sections::{CategoryGrid, Testimonials, TrustBadges};
use crate::web::router::Link;

#[component]
pub fn LandingPage() -> impl IntoView {
    let auth = use_auth();
    let (products, set_products) = signal(Vec::<Product>::new());
    let (loading, set_loading) = signal(true);

    spawn_local(async move {
        match load_products(&auth.api()).await {
            Ok(list) => set_products.set(featured(&list)),
            Err(e) => {
                // 首页失败不打断浏览，精选区域留空即可
                tracing::warn!(error = %e, "failed to load featured products");
            }
        }
        set_loading.set(false);
    });

    view! {
        <div class="max-w-7xl mx-auto px-4">
            <section class="hero min-h-[50vh] rounded-box mt-6 bg-gradient-to-r from-primary to-secondary text-primary-content">
                <div class="hero-content text-center">
                    <div class="max-w-xl space-y-6">
                        <h1 class="text-5xl font-bold">"Electronics you'll love"</h1>
                        <p class="text-lg">
                            "Phones, laptops, audio and more at honest prices, delivered to your door."
                        </p>
                        <Link to="/shop" class="btn btn-lg bg-base-100 text-primary border-none">
                            "Shop Now"
                        </Link>
                    </div>
                </div>
            </section>

            <CategoryGrid />

            <section class="py-12">
                <div class="flex items-center justify-between mb-6">
                    <h2 class="text-2xl font-bold">"Featured Products"</h2>
                    <Link to="/shop" class="link link-primary">"View all"</Link>
                </div>
                <Show
                    when=move || !loading.get()
                    fallback=|| view! {
                        <div class="flex justify-center py-12">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                >
                    <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-6">
                        <For
                            each=move || products.get()
                            key=|p| p.id
                            children=|product: Product| view! { <ProductCard product=product /> }
                        />
                    </div>
                </Show>
            </section>

            <TrustBadges />
            <Testimonials />
        </div>
    }
}
