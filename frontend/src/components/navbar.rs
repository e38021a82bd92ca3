use crate::api::config;
use crate::auth::{AuthState, logout, use_auth};
use crate::components::icons::{CartIcon, HeartIcon, LogoutIcon, SearchIcon, UserIcon};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

/// 搜索框，提交后跳转到 `/shop?q=`
#[component]
pub fn SearchBar() -> impl IntoView {
    let router = use_router();
    let (query, set_query) = signal(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let q = query.get_untracked().trim().to_string();
        let q = if q.is_empty() { None } else { Some(q) };
        router.navigate_to(AppRoute::Shop { q });
    };

    view! {
        <form class="join w-full max-w-md" on:submit=on_submit>
            <input
                type="search"
                class="input input-bordered input-sm join-item w-full"
                placeholder="Search products..."
                prop:value=query
                on:input=move |ev| set_query.set(event_target_value(&ev))
            />
            <button type="submit" class="btn btn-primary btn-sm join-item" aria-label="Search">
                <SearchIcon class="h-4 w-4" />
            </button>
        </form>
    }
}

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let is_authenticated = move || auth.state.with(AuthState::is_authenticated);
    let is_admin = move || auth.state.with(|s| s.session.as_ref().is_some_and(|s| s.is_admin()));
    let user_name = move || {
        auth.state
            .with(|s| s.user().map(|u| u.name.clone()).unwrap_or_default())
    };

    let on_logout = move |_| {
        logout(&auth);
        router.navigate_to(AppRoute::Landing);
    };

    view! {
        <div class="navbar bg-base-100 shadow-sm sticky top-0 z-40 px-4 gap-4">
            <div class="flex-none">
                <Link to="/" class="btn btn-ghost text-xl font-bold text-primary">
                    {config().brand.clone()}
                </Link>
            </div>
            <div class="flex-1 hidden md:flex justify-center">
                <SearchBar />
            </div>
            <div class="flex-none flex items-center gap-1">
                <Link to="/shop" class="btn btn-ghost btn-sm">"Shop"</Link>
                <Link to="/wishlist" class="btn btn-ghost btn-sm btn-square">
                    <HeartIcon />
                </Link>
                <Show
                    when=is_authenticated
                    fallback=|| {
                        view! {
                            <Link to="/login" class="btn btn-ghost btn-sm">"Login"</Link>
                            <Link to="/signup" class="btn btn-primary btn-sm">"Sign Up"</Link>
                        }
                    }
                >
                    <Link to="/cart" class="btn btn-ghost btn-sm btn-square">
                        <CartIcon />
                    </Link>
                    <Link to="/orders" class="btn btn-ghost btn-sm">"Orders"</Link>
                    <Show when=is_admin>
                        <Link to="/admin" class="btn btn-ghost btn-sm text-secondary">"Admin"</Link>
                    </Show>
                    <Link to="/profile" class="btn btn-ghost btn-sm gap-1">
                        <UserIcon class="h-4 w-4" />
                        <span class="hidden lg:inline">{user_name}</span>
                    </Link>
                    <button class="btn btn-ghost btn-sm btn-square" on:click=on_logout title="Logout">
                        <LogoutIcon />
                    </button>
                </Show>
            </div>
        </div>
    }
}
