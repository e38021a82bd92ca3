//! 商品列表的筛选栏与分页器

use electroshop::catalog::{ProductFilter, SortKey};
use leptos::prelude::*;

/// 筛选栏
///
/// 任一条件变化都会通过 `on_change` 通知父组件回到第一页。
#[component]
pub fn Filters(filter: RwSignal<ProductFilter>, #[prop(into)] on_change: Callback<()>) -> impl IntoView {
    let edit = move |f: fn(&mut ProductFilter, String), value: String| {
        filter.update(|current| f(current, value));
        on_change.run(());
    };

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body p-4 grid grid-cols-1 md:grid-cols-4 gap-3">
                <label class="form-control">
                    <span class="label-text text-xs">"Search"</span>
                    <input
                        type="text"
                        class="input input-bordered input-sm"
                        placeholder="Product name"
                        prop:value=move || filter.with(|f| f.q.clone())
                        on:input=move |ev| edit(|f, v| f.q = v, event_target_value(&ev))
                    />
                </label>
                <label class="form-control">
                    <span class="label-text text-xs">"Min price"</span>
                    <input
                        type="number"
                        min="0"
                        class="input input-bordered input-sm"
                        prop:value=move || filter.with(|f| f.min.clone())
                        on:input=move |ev| edit(|f, v| f.min = v, event_target_value(&ev))
                    />
                </label>
                <label class="form-control">
                    <span class="label-text text-xs">"Max price"</span>
                    <input
                        type="number"
                        min="0"
                        class="input input-bordered input-sm"
                        prop:value=move || filter.with(|f| f.max.clone())
                        on:input=move |ev| edit(|f, v| f.max = v, event_target_value(&ev))
                    />
                </label>
                <label class="form-control">
                    <span class="label-text text-xs">"Sort by"</span>
                    <select
                        class="select select-bordered select-sm"
                        prop:value=move || filter.with(|f| f.sort.as_str())
                        on:change=move |ev| edit(|f, v| f.sort = SortKey::parse(&v), event_target_value(&ev))
                    >
                        {SortKey::ALL
                            .into_iter()
                            .map(|key| view! { <option value=key.as_str()>{key.label()}</option> })
                            .collect_view()}
                    </select>
                </label>
            </div>
        </div>
    }
}

/// 分页器，页码从 1 开始
#[component]
pub fn Pagination(
    #[prop(into)] current: Signal<usize>,
    #[prop(into)] total: Signal<usize>,
    #[prop(into)] on_select: Callback<usize>,
) -> impl IntoView {
    view! {
        <Show when=move || { total.get() > 1 }>
            <div class="join flex justify-center mt-8">
                <button
                    class="join-item btn btn-sm"
                    disabled=move || current.get() <= 1
                    on:click=move |_| on_select.run(current.get_untracked().saturating_sub(1).max(1))
                >
                    "«"
                </button>
                {move || {
                    (1..=total.get())
                        .map(|n| {
                            let class = if n == current.get() {
                                "join-item btn btn-sm btn-active"
                            } else {
                                "join-item btn btn-sm"
                            };
                            view! {
                                <button class=class on:click=move |_| on_select.run(n)>
                                    {n}
                                </button>
                            }
                        })
                        .collect_view()
                }}
                <button
                    class="join-item btn btn-sm"
                    disabled=move || current.get() >= total.get()
                    on:click=move |_| on_select.run((current.get_untracked() + 1).min(total.get_untracked()))
                >
                    "»"
                </button>
            </div>
        </Show>
    }
}
