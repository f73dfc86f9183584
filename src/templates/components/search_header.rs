use crate::search::filter::{bedroom_label, Section};
use crate::search::ui::{search_href, FacetEditor};
use crate::templates::components::carried_state;
use crate::templates::pages::search::SearchPageVm;
use maud::{html, Markup};

pub const BEDROOM_CHOICES: [u32; 6] = [0, 1, 2, 3, 4, 5];
pub const BATHROOM_CHOICES: [u32; 5] = [1, 2, 3, 4, 5];

pub fn search_header(vm: &SearchPageVm) -> Markup {
    let ui = vm.ui.persistent();
    let open = |editor| search_href(vm.query, ui.with_editor(Some(editor)));

    html! {
        section class="search-header" {
            form class="search-bar" method="post" action="/search" {
                (carried_state(vm.query, ui))
                input type="search" name="term" value=(vm.search_text)
                    placeholder="Search by location, property name or price";
                button type="submit" class="btn primary" { "Search" }
            }
            @if !vm.search_text.is_empty() {
                form method="post" action="/search/clear" class="inline" {
                    (carried_state(vm.query, ui))
                    button type="submit" class="btn link" { "Clear" }
                }
            }

            div class="facet-bar" {
                a.btn.active[vm.filter_count > 0] href=(open(FacetEditor::Filters)) {
                    "Filters"
                    @if vm.filter_count > 0 {
                        span class="badge" { (vm.filter_count) }
                    }
                }

                a.btn.active[vm.price_label.is_some()] href=(open(FacetEditor::Price)) {
                    (vm.price_label.as_deref().unwrap_or("Price"))
                }

                a.btn.active[vm.beds_baths_count > 0] href=(open(FacetEditor::BedsBaths)) {
                    (vm.beds_baths_label)
                    @if vm.beds_baths_count > 0 {
                        span class="badge" { (vm.beds_baths_count) }
                    }
                }

                form method="post" action="/section" class="segmented" {
                    (carried_state(vm.query, ui))
                    @for section in [Section::Sale, Section::Rent] {
                        button.selected[section == vm.filter.section] type="submit" name="section"
                            value=(section.as_str()) { (section.label()) }
                    }
                }

                form method="post" action="/saved-searches" class="inline" {
                    (carried_state(vm.query, ui))
                    button type="submit" class="btn" { "Save Search" }
                }

                a class="btn" href=(search_href(vm.query, ui.with_saved_open(true))) {
                    "Saved Searches"
                    span class="badge" { (vm.saved.len()) }
                }
            }

            @match vm.ui.editor {
                Some(FacetEditor::Price) => { (price_popover(vm)) }
                Some(FacetEditor::BedsBaths) => { (beds_baths_popover(vm)) }
                _ => {}
            }
        }
    }
}

fn close_href(vm: &SearchPageVm) -> String {
    search_href(vm.query, vm.ui.persistent())
}

fn price_popover(vm: &SearchPageVm) -> Markup {
    let ui = vm.ui.persistent();
    html! {
        div class="popover" id="price-popover" {
            form method="post" action="/filters/price" {
                (carried_state(vm.query, ui))
                label {
                    "Min price"
                    input type="text" name="minPrice" value=(vm.price_draft.min)
                        placeholder="Select min price" inputmode="numeric";
                }
                label {
                    "Max price"
                    input type="text" name="maxPrice" value=(vm.price_draft.max)
                        placeholder="Select max price" inputmode="numeric";
                }
                button type="submit" class="btn primary" { "Apply" }
            }
            form method="post" action="/filters/price/clear" class="inline" {
                (carried_state(vm.query, ui))
                button type="submit" class="btn link" { "Clear" }
            }
            a class="btn link" href=(close_href(vm)) { "Close" }
        }
    }
}

fn beds_baths_popover(vm: &SearchPageVm) -> Markup {
    let ui = vm.ui.persistent();
    html! {
        div class="popover" id="beds-baths-popover" {
            form method="post" action="/filters/beds-baths" {
                (carried_state(vm.query, ui))
                fieldset {
                    legend { "Bedrooms" }
                    @for n in BEDROOM_CHOICES {
                        label class="chip" {
                            input type="checkbox" name="bedRooms" value=(n)
                                checked[vm.beds_baths_draft.beds.contains(&n)];
                            (bedroom_label(n))
                        }
                    }
                }
                fieldset {
                    legend { "Bathrooms" }
                    @for n in BATHROOM_CHOICES {
                        label class="chip" {
                            input type="checkbox" name="bathRooms" value=(n)
                                checked[vm.beds_baths_draft.baths.contains(&n)];
                            (bedroom_label(n))
                        }
                    }
                }
                button type="submit" class="btn primary" { "Apply" }
            }
            form method="post" action="/filters/beds-baths/clear" class="inline" {
                (carried_state(vm.query, ui))
                button type="submit" class="btn link" { "Clear" }
            }
            a class="btn link" href=(close_href(vm)) { "Close" }
        }
    }
}
