//! 操作结果提示（3 秒后自动消失）

use cn19::ApiError;
use leptos::prelude::*;
use std::time::Duration;

const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

#[derive(Clone, Copy)]
pub struct Notifier {
    notice: ReadSignal<Option<Notice>>,
    set_notice: WriteSignal<Option<Notice>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (notice, set_notice) = signal(Option::<Notice>::None);

        Effect::new(move |_| {
            if let Some(current) = notice.get() {
                set_timeout(
                    move || {
                        // 期间若已换成新的提示则保留
                        if notice.get_untracked().as_ref() == Some(&current) {
                            set_notice.set(None);
                        }
                    },
                    NOTICE_TTL,
                );
            }
        });

        Self { notice, set_notice }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.set_notice.set(Some(Notice {
            message: message.into(),
            is_error: false,
        }));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.set_notice.set(Some(Notice {
            message: message.into(),
            is_error: true,
        }));
    }

    /// 服务端有 detail 时展示它，否则展示调用方的兜底文案
    pub fn api_error(&self, err: &ApiError, fallback: &str) {
        self.error(err.detail_or(fallback));
    }

    pub fn current(&self) -> ReadSignal<Option<Notice>> {
        self.notice
    }
}

#[component]
pub fn Toast(notifier: Notifier) -> impl IntoView {
    let notice = notifier.current();

    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    if notice.with(|n| n.as_ref().is_some_and(|n| n.is_error)) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notice.with(|n| n.as_ref().map(|n| n.message.clone()).unwrap_or_default())}</span>
                </div>
            </div>
        </Show>
    }
}
