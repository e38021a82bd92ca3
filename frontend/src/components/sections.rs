//! 首页静态区块，只负责渲染

use leptos::prelude::*;

use crate::components::icons::{RefreshIcon, ShieldCheck, StarIcon, TruckIcon};
use crate::web::route::AppRoute;
use crate::web::router::Link;

const CATEGORIES: [(&str, &str); 6] = [
    ("Phones", "📱"),
    ("Laptops", "💻"),
    ("Audio", "🎧"),
    ("Cameras", "📷"),
    ("Wearables", "⌚"),
    ("Gaming", "🎮"),
];

const TESTIMONIALS: [(&str, &str, &str); 3] = [
    ("Priya S.", "Bengaluru", "Delivery was faster than promised and the packaging was perfect."),
    ("Rahul M.", "Pune", "Great prices on audio gear. Checkout took less than a minute."),
    ("Ananya K.", "Delhi", "Tracking my order step by step made the wait easy."),
];

/// 分类入口，点击后按分类名搜索
#[component]
pub fn CategoryGrid() -> impl IntoView {
    view! {
        <section class="py-12">
            <h2 class="text-2xl font-bold mb-6 text-center">"Shop by Category"</h2>
            <div class="grid grid-cols-2 md:grid-cols-3 lg:grid-cols-6 gap-4">
                {CATEGORIES
                    .into_iter()
                    .map(|(name, emoji)| {
                        let href = AppRoute::Shop { q: Some(name.to_string()) }.to_path();
                        view! {
                            <Link to=href class="card bg-base-100 shadow-sm hover:shadow-md transition-shadow">
                                <div class="card-body items-center p-6">
                                    <span class="text-4xl">{emoji}</span>
                                    <span class="font-semibold">{name}</span>
                                </div>
                            </Link>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
pub fn TrustBadges() -> impl IntoView {
    view! {
        <section class="py-10 grid grid-cols-1 md:grid-cols-3 gap-6">
            <div class="flex items-center gap-4 p-6 bg-base-100 rounded-box shadow-sm">
                <TruckIcon class="h-10 w-10 text-primary" />
                <div>
                    <h3 class="font-bold">"Free Shipping"</h3>
                    <p class="text-sm text-base-content/70">"On every order across India"</p>
                </div>
            </div>
            <div class="flex items-center gap-4 p-6 bg-base-100 rounded-box shadow-sm">
                <ShieldCheck class="h-10 w-10 text-primary" />
                <div>
                    <h3 class="font-bold">"Secure Payments"</h3>
                    <p class="text-sm text-base-content/70">"Cash on delivery or online checkout"</p>
                </div>
            </div>
            <div class="flex items-center gap-4 p-6 bg-base-100 rounded-box shadow-sm">
                <RefreshIcon class="h-10 w-10 text-primary" />
                <div>
                    <h3 class="font-bold">"Easy Returns"</h3>
                    <p class="text-sm text-base-content/70">"7-day hassle-free returns"</p>
                </div>
            </div>
        </section>
    }
}

#[component]
pub fn Testimonials() -> impl IntoView {
    view! {
        <section class="py-12">
            <h2 class="text-2xl font-bold mb-6 text-center">"What Our Customers Say"</h2>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                {TESTIMONIALS
                    .into_iter()
                    .map(|(name, city, quote)| {
                        view! {
                            <div class="card bg-base-100 shadow-sm">
                                <div class="card-body">
                                    <div class="flex text-warning">
                                        <StarIcon class="h-4 w-4 fill-current" />
                                        <StarIcon class="h-4 w-4 fill-current" />
                                        <StarIcon class="h-4 w-4 fill-current" />
                                        <StarIcon class="h-4 w-4 fill-current" />
                                        <StarIcon class="h-4 w-4 fill-current" />
                                    </div>
                                    <p class="italic">{format!("\u{201c}{}\u{201d}", quote)}</p>
                                    <p class="text-sm font-semibold">{name}</p>
                                    <p class="text-xs text-base-content/60">{city}</p>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
