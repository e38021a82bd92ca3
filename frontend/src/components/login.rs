use electroshop::guard::Landing;
use electroshop::{Session, StoreResult};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{login, signup, use_auth};
use crate::components::icons::ShieldCheck;
use crate::web::router::{Link, RouterService, use_router};

/// 认证成功后按角色跳转到落地页
fn land(router: RouterService, result: StoreResult<Session>, set_error_msg: WriteSignal<Option<String>>) {
    match result {
        Ok(session) => router.navigate(Landing::for_role(session.role()).path()),
        Err(e) => {
            tracing::info!(error = %e, "authentication failed");
            set_error_msg.set(Some(e.user_message()));
        }
    }
}

#[component]
fn AuthCard(title: &'static str, subtitle: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">{title}</h1>
                        <p class="text-base-content/70">{subtitle}</p>
                    </div>
                </div>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">{children()}</div>
            </div>
        </div>
    }
}

#[component]
fn ErrorAlert(error_msg: ReadSignal<Option<String>>) -> impl IntoView {
    move || {
        error_msg.get().map(|msg| {
            view! {
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{msg}</span>
                </div>
            }
        })
    }
}

#[component]
fn SubmitButton(submitting: ReadSignal<bool>, idle: &'static str, busy: &'static str) -> impl IntoView {
    view! {
        <div class="form-control mt-6">
            <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                {move || if submitting.get() {
                    view! { <span class="loading loading-spinner"></span> {busy} }.into_any()
                } else {
                    idle.into_any()
                }}
            </button>
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get_untracked(), password.get_untracked());
        if email.trim().is_empty() || password.is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let result = login(&auth, email.trim(), &password).await;
            set_is_submitting.set(false);
            land(router, result, set_error_msg);
        });
    };

    view! {
        <AuthCard title="Welcome back" subtitle="Sign in to continue shopping">
            <form class="card-body" on:submit=on_submit>
                <ErrorAlert error_msg=error_msg />
                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">"Email"</span>
                    </label>
                    <input
                        id="email"
                        type="email"
                        placeholder="you@example.com"
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        prop:value=email
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">"Password"</span>
                    </label>
                    <input
                        id="password"
                        type="password"
                        placeholder="••••••••"
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        prop:value=password
                        class="input input-bordered"
                        required
                    />
                </div>
                <SubmitButton submitting=is_submitting idle="Login" busy="Signing in..." />
                <p class="text-sm text-center mt-2">
                    "Don't have an account? "
                    <Link to="/signup" class="link link-primary">"Sign up"</Link>
                </p>
            </form>
        </AuthCard>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (name, email, password) = (name.get_untracked(), email.get_untracked(), password.get_untracked());
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let result = signup(&auth, name.trim(), email.trim(), &password).await;
            set_is_submitting.set(false);
            land(router, result, set_error_msg);
        });
    };

    view! {
        <AuthCard title="Create your account" subtitle="Join to track orders and save favourites">
            <form class="card-body" on:submit=on_submit>
                <ErrorAlert error_msg=error_msg />
                <div class="form-control">
                    <label class="label" for="name">
                        <span class="label-text">"Name"</span>
                    </label>
                    <input
                        id="name"
                        type="text"
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                        prop:value=name
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">"Email"</span>
                    </label>
                    <input
                        id="email"
                        type="email"
                        placeholder="you@example.com"
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        prop:value=email
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">"Password"</span>
                    </label>
                    <input
                        id="password"
                        type="password"
                        placeholder="••••••••"
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        prop:value=password
                        class="input input-bordered"
                        required
                    />
                </div>
                <SubmitButton submitting=is_submitting idle="Sign Up" busy="Creating account..." />
                <p class="text-sm text-center mt-2">
                    "Already have an account? "
                    <Link to="/login" class="link link-primary">"Login"</Link>
                </p>
            </form>
        </AuthCard>
    }
}
