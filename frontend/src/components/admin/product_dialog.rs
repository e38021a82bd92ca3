use electroshop::admin::ProductDraft;
use leptos::prelude::*;

use super::form_state::FormState;

/// 新建 / 编辑商品的模态框
///
/// 打开状态由父组件持有；提交只负责交出草稿，保存成功后由父组件关闭。
#[component]
pub fn ProductDialog(
    form: FormState,
    open: RwSignal<bool>,
    #[prop(into)] saving: Signal<bool>,
    #[prop(into)] on_save: Callback<ProductDraft>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        let Some(dialog) = dialog_ref.get() else {
            return;
        };
        if open.get() {
            if !dialog.open() {
                let _ = dialog.show_modal();
            }
        } else if dialog.open() {
            dialog.close();
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        on_save.run(form.to_draft());
    };

    let title = move || if form.is_editing() { "Edit Product" } else { "Add Product" };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box max-w-2xl">
                <h3 class="font-bold text-lg">{title}</h3>

                <form on:submit=on_submit class="space-y-4 mt-4">
                    <div class="form-control">
                        <label for="p_name" class="label">
                            <span class="label-text">"Name"</span>
                        </label>
                        <input
                            id="p_name"
                            required
                            type="text"
                            on:input=move |ev| form.name.set(event_target_value(&ev))
                            prop:value=form.name
                            class="input input-bordered w-full"
                        />
                    </div>

                    <div class="form-control">
                        <label for="p_desc" class="label">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea
                            id="p_desc"
                            rows="3"
                            on:input=move |ev| form.description.set(event_target_value(&ev))
                            prop:value=form.description
                            class="textarea textarea-bordered w-full"
                        ></textarea>
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="p_price" class="label">
                                <span class="label-text">"Price (₹)"</span>
                            </label>
                            <input
                                id="p_price"
                                required
                                type="number"
                                min="0"
                                step="0.01"
                                on:input=move |ev| form.price.set(event_target_value(&ev))
                                prop:value=form.price
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label for="p_stock" class="label">
                                <span class="label-text">"Stock"</span>
                            </label>
                            <input
                                id="p_stock"
                                required
                                type="number"
                                min="0"
                                step="1"
                                on:input=move |ev| form.stock.set(event_target_value(&ev))
                                prop:value=form.stock
                                class="input input-bordered w-full"
                            />
                        </div>
                    </div>

                    <div class="form-control">
                        <label for="p_image" class="label">
                            <span class="label-text">"Image URL"</span>
                        </label>
                        <input
                            id="p_image"
                            type="url"
                            placeholder="https://"
                            on:input=move |ev| form.image_url.set(event_target_value(&ev))
                            prop:value=form.image_url
                            class="input input-bordered w-full"
                        />
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            {move || if saving.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
