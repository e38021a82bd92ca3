use electroshop::currency::format_inr;
use electroshop::profile::{MIN_PASSWORD_LEN, PasswordChange, ProfileService, ProfileStats, initials};
use electroshop::shared::date::format_order_date;
use electroshop::shared::User;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::notice::{Notice, NoticeToast};

/// 资料页的提示停留更久
const PROFILE_NOTICE_MS: u32 = 5_000;

#[component]
fn StatCard(title: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div class="stat bg-base-100 rounded-box shadow-sm">
            <div class="stat-title">{title}</div>
            <div class="stat-value text-2xl">{move || value.get()}</div>
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();

    let user = RwSignal::new(User::default());
    let stats = RwSignal::new(ProfileStats::default());
    let (loading, set_loading) = signal(true);
    let notice = RwSignal::new(Option::<Notice>::None);

    // 资料表单
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let editing = RwSignal::new(false);
    let (saving, set_saving) = signal(false);

    // 修改密码表单
    let current_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let (changing, set_changing) = signal(false);

    spawn_local(async move {
        let api = auth.api();
        let service = ProfileService::new(&api);
        match futures::try_join!(service.me(), service.stats()) {
            Ok((me, (_, computed))) => {
                name.set(me.name.clone());
                email.set(me.email.clone());
                user.set(me);
                stats.set(computed);
            }
            Err(e) => {
                auth.handle_error(&e);
                notice.set(Some(Notice::error(e.user_message())));
            }
        }
        set_loading.set(false);
    });

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_saving.set(true);
        spawn_local(async move {
            let api = auth.api();
            match ProfileService::new(&api).update(&name.get_untracked(), &email.get_untracked()).await {
                Ok(updated) => {
                    // 会话中的用户就地替换，导航栏随之刷新
                    auth.update_user(updated.clone());
                    user.set(updated);
                    editing.set(false);
                    notice.set(Some(Notice::success("Profile updated")));
                }
                Err(e) => {
                    auth.handle_error(&e);
                    notice.set(Some(Notice::error(e.user_message())));
                }
            }
            set_saving.set(false);
        });
    };

    let on_cancel = move |_| {
        user.with_untracked(|u| {
            name.set(u.name.clone());
            email.set(u.email.clone());
        });
        editing.set(false);
    };

    let on_change_password = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = PasswordChange {
            current_password: current_password.get_untracked(),
            new_password: new_password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };
        set_changing.set(true);
        spawn_local(async move {
            let api = auth.api();
            match ProfileService::new(&api).change_password(&form).await {
                Ok(reply) => {
                    current_password.set(String::new());
                    new_password.set(String::new());
                    confirm_password.set(String::new());
                    let text = reply.message.unwrap_or_else(|| "Password changed successfully".to_string());
                    notice.set(Some(Notice::success(text)));
                }
                Err(e) => {
                    auth.handle_error(&e);
                    notice.set(Some(Notice::error(e.user_message())));
                }
            }
            set_changing.set(false);
        });
    };

    let avatar = move || user.with(|u| initials(&u.name));
    let member_since = move || user.with(|u| format_order_date(u.created_at.as_deref()));

    view! {
        <div class="max-w-5xl mx-auto px-4 py-8 space-y-6">
            <NoticeToast notice=notice duration_ms=PROFILE_NOTICE_MS />
            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body flex-row items-center gap-6">
                        <div class="avatar placeholder">
                            <div class="bg-primary text-primary-content rounded-full w-20">
                                <span class="text-2xl">{avatar}</span>
                            </div>
                        </div>
                        <div>
                            <h1 class="text-2xl font-bold">{move || user.with(|u| u.name.clone())}</h1>
                            <p class="text-base-content/70">{move || user.with(|u| u.email.clone())}</p>
                            <p class="text-sm text-base-content/60">
                                {move || format!("{} · member since {}", user.with(|u| u.role.label()), member_since())}
                            </p>
                        </div>
                    </div>
                </div>

                <div class="stats stats-vertical md:stats-horizontal w-full gap-4 bg-transparent">
                    <StatCard
                        title="Total Orders"
                        value=Signal::derive(move || stats.get().total_orders.to_string())
                    />
                    <StatCard
                        title="Total Spent"
                        value=Signal::derive(move || format_inr(stats.get().total_spent))
                    />
                    <StatCard
                        title="Cart Items"
                        value=Signal::derive(move || stats.get().cart_items.to_string())
                    />
                </div>

                <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                    <form class="card bg-base-100 shadow-sm" on:submit=on_save>
                        <div class="card-body space-y-3">
                            <div class="flex items-center justify-between">
                                <h2 class="card-title">"Profile"</h2>
                                <Show when=move || !editing.get()>
                                    <button type="button" class="btn btn-ghost btn-sm" on:click=move |_| editing.set(true)>
                                        "Edit"
                                    </button>
                                </Show>
                            </div>
                            <label class="form-control">
                                <span class="label-text">"Name"</span>
                                <input
                                    type="text"
                                    class="input input-bordered"
                                    disabled=move || !editing.get()
                                    prop:value=name
                                    on:input=move |ev| name.set(event_target_value(&ev))
                                />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Email"</span>
                                <input
                                    type="email"
                                    class="input input-bordered"
                                    disabled=move || !editing.get()
                                    prop:value=email
                                    on:input=move |ev| email.set(event_target_value(&ev))
                                />
                            </label>
                            <Show when=move || editing.get()>
                                <div class="card-actions justify-end">
                                    <button type="button" class="btn btn-ghost" on:click=on_cancel>"Cancel"</button>
                                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                        "Save"
                                    </button>
                                </div>
                            </Show>
                        </div>
                    </form>

                    <form class="card bg-base-100 shadow-sm" on:submit=on_change_password>
                        <div class="card-body space-y-3">
                            <h2 class="card-title">"Change Password"</h2>
                            <input
                                type="password"
                                class="input input-bordered"
                                placeholder="Current password"
                                prop:value=current_password
                                on:input=move |ev| current_password.set(event_target_value(&ev))
                            />
                            <input
                                type="password"
                                class="input input-bordered"
                                placeholder=format!("New password (min {} characters)", MIN_PASSWORD_LEN)
                                prop:value=new_password
                                on:input=move |ev| new_password.set(event_target_value(&ev))
                            />
                            <input
                                type="password"
                                class="input input-bordered"
                                placeholder="Confirm new password"
                                prop:value=confirm_password
                                on:input=move |ev| confirm_password.set(event_target_value(&ev))
                            />
                            <div class="card-actions justify-end">
                                <button type="submit" class="btn btn-primary" disabled=move || changing.get()>
                                    "Update Password"
                                </button>
                            </div>
                        </div>
                    </form>
                </div>
            </Show>
        </div>
    }
}
