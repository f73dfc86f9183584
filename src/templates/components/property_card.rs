use crate::api::PropertyResult;
use crate::search::filter::bedroom_label;
use crate::search::ui::ViewMode;
use maud::{html, Markup};

pub fn property_card(p: &PropertyResult, view: ViewMode) -> Markup {
    html! {
        article class={ "property-card " (view.as_str()) } {
            div class="card-media" {
                img src=(p.image_url()) alt=(p.name) loading="lazy";
                span class="price-pill" { (p.price_label()) }
                @if p.is_auction {
                    span class="auction-badge" { "Auction" }
                }
            }
            div class="card-body" {
                h3 class="card-title" { (p.name) }
                @let location = p.location_line();
                @if !location.is_empty() {
                    p class="card-location" { (location) }
                }
                ul class="card-specs" {
                    @if let Some(beds) = p.bed_rooms {
                        li { (bedroom_label(beds)) " beds" }
                    }
                    @if let Some(baths) = p.bath_rooms {
                        li { (baths) " baths" }
                    }
                    @if let Some(area) = &p.floor_size {
                        li { (area) " sqft" }
                    }
                    li class="psf" { (p.psf_label()) }
                }
                div class="card-agent" {
                    span class="agent-name" { (p.agent_name()) }
                    @if p.account.verified {
                        span class="verified" title="Verified agent" { "✔" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fallbacks() {
        let p = PropertyResult {
            name: "Sunway Tower".into(),
            price: 450000.0,
            ..PropertyResult::default()
        };
        let html = property_card(&p, ViewMode::Grid).into_string();
        assert!(html.contains("RM 450,000"));
        assert!(html.contains("Authorized Agent"));
        assert!(html.contains("images.unsplash.com"));
        assert!(!html.contains("Auction"));
    }

    #[test]
    fn renders_auction_and_psf() {
        let p = PropertyResult {
            price: 1000000.0,
            floor_size: Some("1000".into()),
            is_auction: true,
            ..PropertyResult::default()
        };
        let html = property_card(&p, ViewMode::List).into_string();
        assert!(html.contains("Auction"));
        assert!(html.contains("RM 1,000 psf"));
        assert!(html.contains("property-card list"));
    }
}
