use crate::search::query::QueryRepresentation;
use crate::search::saved::SavedSearch;
use crate::search::ui::{search_href, UiParams};
use crate::templates::components::carried_state;
use maud::{html, Markup};

/// Drawer listing the visitor's saved searches, newest first.
pub fn saved_searches_drawer(query: &QueryRepresentation, ui: UiParams, saved: &[SavedSearch]) -> Markup {
    let ui = ui.persistent();
    html! {
        aside class="drawer" aria-label="Saved searches" {
            div class="drawer-title" {
                h2 { "Saved Searches" }
                a class="btn link" href=(search_href(query, ui)) { "✕" }
            }
            @if saved.is_empty() {
                p class="muted" { "No saved searches yet." }
            } @else {
                ul class="saved-list" {
                    @for s in saved {
                        li class="saved-item" {
                            a class="saved-apply" href=(format!("/saved-searches/{}", s.id)) {
                                strong { (s.name) }
                                span class="muted" {
                                    (s.filters) @if s.filters == 1 { " filter" } @else { " filters" }
                                    @if let Some(at) = s.created_at() {
                                        " · " (at.format("%d %b %Y").to_string())
                                    }
                                }
                            }
                            form method="post" action=(format!("/saved-searches/{}/delete", s.id)) class="inline" {
                                (carried_state(query, ui))
                                button type="submit" class="btn link" aria-label="Delete saved search" { "Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}
