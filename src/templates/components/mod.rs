use crate::forms::CURRENT_QUERY_FIELD;
use crate::search::query::QueryRepresentation;
use crate::search::ui::{UiParams, ViewMode, VIEW_KEY};
use maud::{html, Markup};

pub mod filters_panel;
pub mod notice;
pub mod pagination;
pub mod property_card;
pub mod saved_searches;
pub mod search_header;
pub mod sort_menu;

/// Hidden fields every action form posts: the committed query and the
/// view mode to come back to.
pub fn carried_state(query: &QueryRepresentation, ui: UiParams) -> Markup {
    html! {
        input type="hidden" name=(CURRENT_QUERY_FIELD) value=(query.to_query_string());
        @if ui.view == ViewMode::List {
            input type="hidden" name=(VIEW_KEY) value=(ui.view.as_str());
        }
    }
}
