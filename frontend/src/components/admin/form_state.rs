//! 商品表单状态
//!
//! 将零散的 signal 整合为 `FormState`，负责：
//! - 数据的持有
//! - 编辑已有商品时的回填
//! - 转换为核心库的 `ProductDraft`，校验交给核心库

use electroshop::admin::ProductDraft;
use electroshop::shared::{Product, ProductId};
use leptos::prelude::*;

/// 使用 `RwSignal` 以便作为 Props 在组件间传递
#[derive(Clone, Copy)]
pub struct FormState {
    /// 编辑已有商品时为其 id，新建时为 `None`
    pub editing: RwSignal<Option<ProductId>>,
    pub name: RwSignal<String>,
    pub description: RwSignal<String>,
    pub price: RwSignal<String>,
    pub stock: RwSignal<String>,
    pub image_url: RwSignal<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            editing: RwSignal::new(None),
            name: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            price: RwSignal::new(String::new()),
            stock: RwSignal::new(String::new()),
            image_url: RwSignal::new(String::new()),
        }
    }

    fn fill(&self, draft: ProductDraft) {
        self.editing.set(draft.editing);
        self.name.set(draft.name);
        self.description.set(draft.description);
        self.price.set(draft.price);
        self.stock.set(draft.stock);
        self.image_url.set(draft.image_url);
    }

    pub fn reset(&self) {
        self.fill(ProductDraft::default());
    }

    pub fn load(&self, product: &Product) {
        self.fill(ProductDraft::edit(product));
    }

    pub fn is_editing(&self) -> bool {
        self.editing.with(Option::is_some)
    }

    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            editing: self.editing.get_untracked(),
            name: self.name.get_untracked(),
            description: self.description.get_untracked(),
            price: self.price.get_untracked(),
            stock: self.stock.get_untracked(),
            image_url: self.image_url.get_untracked(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
