use crate::search::saved::Notice;
use maud::{html, Markup};

pub fn notice_banner(notice: Option<Notice>) -> Markup {
    html! {
        @if let Some(n) = notice {
            div class="notice" role="status" { (n.message()) }
        }
    }
}

pub fn error_banner(message: Option<&str>) -> Markup {
    html! {
        @if let Some(msg) = message {
            div class="alert alert-error" role="alert" { (msg) }
        }
    }
}
