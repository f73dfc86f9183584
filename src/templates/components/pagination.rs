use crate::search::query::QueryRepresentation;
use crate::search::ui::{search_href, UiParams};
use maud::{html, Markup};

/// Pages shown on each side of the current one.
const WINDOW: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u64),
    Gap,
}

/// First, last and a window around `current`, with gaps between.
pub fn page_items(current: u64, total_pages: u64) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let lo = current.saturating_sub(WINDOW).max(1);
    let hi = (current + WINDOW).min(total_pages);

    let mut items = Vec::new();
    if lo > 1 {
        items.push(PageItem::Page(1));
        if lo > 2 {
            items.push(PageItem::Gap);
        }
    }
    items.extend((lo..=hi).map(PageItem::Page));
    if hi < total_pages {
        if hi + 1 < total_pages {
            items.push(PageItem::Gap);
        }
        items.push(PageItem::Page(total_pages));
    }
    items
}

pub fn pagination(query: &QueryRepresentation, ui: UiParams, current: u32, total_pages: u64) -> Markup {
    let ui = ui.persistent();
    let href = |page: u64| search_href(&query.with_page(u32::try_from(page).unwrap_or(u32::MAX)), ui);
    let current = u64::from(current);

    html! {
        @if total_pages > 1 {
            nav class="pagination" aria-label="Pagination" {
                @if current > 1 {
                    a class="page-link" href=(href(current - 1)) rel="prev" { "‹" }
                }
                @for item in page_items(current, total_pages) {
                    @match item {
                        PageItem::Page(n) if n == current => {
                            span class="page-link current" aria-current="page" { (n) }
                        }
                        PageItem::Page(n) => {
                            a class="page-link" href=(href(n)) { (n) }
                        }
                        PageItem::Gap => {
                            span class="page-gap" { "…" }
                        }
                    }
                }
                @if current < total_pages {
                    a class="page-link" href=(href(current + 1)) rel="next" { "›" }
                }
            }
        }
    }
}
