use crate::api::models::group_thousands;
use crate::api::PropertyTypeOption;
use crate::search::controller::{BedsBathsDraft, PriceDraft};
use crate::search::filter::{Filter, Section};
use crate::search::query::QueryRepresentation;
use crate::search::results::SearchResults;
use crate::search::saved::SavedSearch;
use crate::search::ui::{search_href, FacetEditor, UiParams, ViewMode};
use crate::templates::components::filters_panel::filters_panel;
use crate::templates::components::notice::{error_banner, notice_banner};
use crate::templates::components::pagination::pagination;
use crate::templates::components::property_card::property_card;
use crate::templates::components::saved_searches::saved_searches_drawer;
use crate::templates::components::search_header::search_header;
use crate::templates::components::sort_menu::sort_menu;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct SearchPageVm<'a> {
    pub query: &'a QueryRepresentation,
    pub ui: UiParams,
    pub filter: &'a Filter,
    /// Seeds the full filter panel.
    pub filters_draft: &'a Filter,
    pub search_text: &'a str,
    pub results: &'a SearchResults,
    pub filter_count: usize,
    pub beds_baths_count: usize,
    pub beds_baths_label: String,
    pub price_label: Option<String>,
    pub sort_label: &'static str,
    pub current_sort: &'a str,
    pub beds_baths_draft: &'a BedsBathsDraft,
    pub price_draft: &'a PriceDraft,
    pub saved: &'a [SavedSearch],
    pub property_types: &'a [PropertyTypeOption],
}

pub fn search_page(vm: &SearchPageVm) -> Markup {
    let section = vm.filter.section.label();
    let results = vm.results;
    let persistent = vm.ui.persistent();

    desktop_layout(
        &format!("Properties for {section} | Property Search"),
        html! {
            main class="container" {
                nav class="breadcrumbs" aria-label="Breadcrumb" {
                    a href="/" { "Home" }
                    span class="sep" { "›" }
                    span class="current" { "Properties for " (section) }
                }

                (notice_banner(vm.ui.notice))
                (search_header(vm))

                div class="layout" {
                    div class="results" {
                        div class="results-toolbar" {
                            h1 class="results-heading" {
                                (group_thousands(results.total as f64)) " Properties for " (section) " in Malaysia"
                            }
                            div class="toolbar-actions" {
                                (sort_menu(vm.query, persistent, vm.current_sort, vm.sort_label))
                                div class="view-toggle" {
                                    a.selected[vm.ui.view == ViewMode::Grid]
                                        href=(search_href(vm.query, persistent.with_view(ViewMode::Grid)))
                                        title="Grid View" { "Grid" }
                                    a.selected[vm.ui.view == ViewMode::List]
                                        href=(search_href(vm.query, persistent.with_view(ViewMode::List)))
                                        title="List View" { "List" }
                                }
                            }
                        }

                        (error_banner(results.error.as_deref()))

                        @if results.items.is_empty() {
                            @if results.error.is_none() {
                                div class="alert alert-info" {
                                    "No properties found matching your criteria. Try adjusting your filters."
                                }
                            }
                        } @else {
                            div class={ "cards " (vm.ui.view.as_str()) } {
                                @for p in &results.items {
                                    (property_card(p, vm.ui.view))
                                }
                            }
                            (pagination(vm.query, vm.ui, results.page, results.total_pages))
                        }
                    }

                    (sidebar(results.total, vm.filter.section))
                }

                @if vm.ui.editor == Some(FacetEditor::Filters) {
                    (filters_panel(vm))
                }
                @if vm.ui.saved_open {
                    (saved_searches_drawer(vm.query, vm.ui, vm.saved))
                }
            }
        },
    )
}

fn sidebar(total: u64, section: Section) -> Markup {
    let total = group_thousands(total as f64);
    let word = section.label();
    html! {
        aside class="sidebar" {
            section {
                h2 { "Property Discovery & Resources" }
                p {
                    "There are " (total) " Properties for " (word) " in Malaysia. "
                    "Use the search filters to find the right landed homes, condominium, "
                    "bungalow or residential land in this area."
                }
            }
            section class="card" {
                h3 { "Explore on Map" }
                p {
                    "View all " (total) " Properties for " (word)
                    " in Malaysia on an interactive map."
                }
            }
        }
    }
}
