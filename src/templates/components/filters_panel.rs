use crate::search::filter::{bedroom_label, Furnishing, Tenure};
use crate::search::ui::search_href;
use crate::templates::components::carried_state;
use crate::templates::components::search_header::{BATHROOM_CHOICES, BEDROOM_CHOICES};
use crate::templates::pages::search::SearchPageVm;
use maud::{html, Markup};

pub const CATEGORIES: [(&str, &str); 6] = [
    ("all", "All Properties"),
    ("residential", "Residential"),
    ("commercial", "Commercial"),
    ("agricultural", "Agricultural"),
    ("industrial", "Industrial"),
    ("others", "Others"),
];

/// The full filter dialog. Inputs are seeded from the panel draft; the
/// whole form replaces every facet on submit.
pub fn filters_panel(vm: &SearchPageVm) -> Markup {
    let ui = vm.ui.persistent();
    let f = vm.filters_draft;
    let category = f.categories.iter().next().map_or("all", String::as_str);
    let min = f.min_price.map(|p| p.to_string()).unwrap_or_default();
    let max = f.max_price.map(|p| p.to_string()).unwrap_or_default();

    html! {
        div class="dialog-backdrop" {
            div class="dialog" role="dialog" aria-labelledby="filters-title" {
                div class="dialog-title" {
                    h2 id="filters-title" { "Filter Properties" }
                    a class="btn link" href=(search_href(vm.query, ui)) { "✕" }
                }
                form method="post" action="/filters" class="dialog-body" {
                    (carried_state(vm.query, ui))

                    fieldset {
                        legend { "Price Range" }
                        input type="text" name="minPrice" value=(min) placeholder="Select min price";
                        input type="text" name="maxPrice" value=(max) placeholder="Select max price";
                    }

                    fieldset {
                        legend { "Property Category" }
                        @for (value, label) in CATEGORIES {
                            label class="chip" {
                                input type="radio" name="categories" value=(value) checked[value == category];
                                (label)
                            }
                        }
                    }

                    @if !vm.property_types.is_empty() {
                        fieldset {
                            legend { "Select Property Types" }
                            @for opt in vm.property_types {
                                label class="check" {
                                    input type="checkbox" name="types" value=(opt.value)
                                        checked[f.types.contains(&opt.value)];
                                    (opt.label)
                                }
                            }
                        }
                    }

                    fieldset {
                        legend { "Bedrooms" }
                        @for n in BEDROOM_CHOICES {
                            label class="chip" {
                                input type="checkbox" name="bedRooms" value=(n) checked[f.bed_rooms.contains(&n)];
                                (bedroom_label(n))
                            }
                        }
                    }

                    fieldset {
                        legend { "Bathrooms" }
                        @for n in BATHROOM_CHOICES {
                            label class="chip" {
                                input type="checkbox" name="bathRooms" value=(n) checked[f.bath_rooms.contains(&n)];
                                (bedroom_label(n))
                            }
                        }
                    }

                    fieldset {
                        legend { "Tenure" }
                        @for t in Tenure::ALL {
                            label class="check" {
                                input type="checkbox" name="tenure" value=(t.as_str()) checked[f.tenure.contains(&t)];
                                (t.label())
                            }
                        }
                    }

                    fieldset {
                        legend { "Furnishing" }
                        @for fu in Furnishing::ALL {
                            label class="check" {
                                input type="checkbox" name="furnishings" value=(fu.ui_code())
                                    checked[f.furnishings.contains(&fu)];
                                (fu.label())
                            }
                        }
                    }

                    fieldset {
                        legend { "Other" }
                        label class="check" {
                            input type="checkbox" name="isAuction" value="true" checked[f.is_auction];
                            "Auction properties only"
                        }
                    }

                    div class="dialog-actions" {
                        button type="submit" class="btn primary" { "Apply Filters" }
                    }
                }
                form method="post" action="/filters/clear" class="dialog-actions" {
                    (carried_state(vm.query, ui))
                    button type="submit" class="btn" { "Clear All" }
                }
            }
        }
    }
}
