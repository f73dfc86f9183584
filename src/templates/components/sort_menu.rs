use crate::search::query::QueryRepresentation;
use crate::search::sort::SortOption;
use crate::search::ui::UiParams;
use crate::templates::components::carried_state;
use maud::{html, Markup};

pub fn sort_menu(query: &QueryRepresentation, ui: UiParams, current: &str, label: &str) -> Markup {
    html! {
        details class="sort-menu" {
            summary class="btn" { (label) }
            form method="post" action="/sort" class="menu" {
                (carried_state(query, ui))
                @for option in SortOption::ALL {
                    button.selected[option.as_str() == current] type="submit" name="sort" value=(option.as_str()) {
                        (option.label())
                    }
                }
            }
        }
    }
}
