//! 通知提示框
//!
//! 页面持有一个 `RwSignal<Option<Notice>>`，写入后由本组件渲染并在到期后清除。
//! 新消息会取消上一条消息的定时器。

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// 默认显示时长
pub const NOTICE_MS: u32 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Info,
        }
    }

    fn alert_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "alert alert-success shadow-lg",
            NoticeKind::Error => "alert alert-error shadow-lg",
            NoticeKind::Info => "alert alert-info shadow-lg",
        }
    }
}

#[component]
pub fn NoticeToast(
    notice: RwSignal<Option<Notice>>,
    #[prop(default = NOTICE_MS)] duration_ms: u32,
) -> impl IntoView {
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

    Effect::new(move |_| {
        if notice.with(Option::is_some) {
            // 替换即 drop 旧定时器，旧定时器随之取消
            let timeout = Timeout::new(duration_ms, move || notice.set(None));
            pending.borrow_mut().replace(timeout);
        }
    });

    move || {
        notice.get().map(|n| {
            let class = n.alert_class();
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{n.text}</span>
                        <button class="btn btn-ghost btn-xs" on:click=move |_| notice.set(None)>
                            "✕"
                        </button>
                    </div>
                </div>
            }
        })
    }
}
