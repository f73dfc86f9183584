/// Token sent for anything we do not recognise, and for `default`:
/// earliest created first.
pub const DEFAULT_SORT_TOKEN: &str = "createdAt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOption {
    #[default]
    Default,
    PriceLowToHigh,
    PriceHighToLow,
    FloorSizeLowToHigh,
    FloorSizeHighToLow,
    PsfLowToHigh,
    PsfHighToLow,
    Newest,
    Oldest,
}

impl SortOption {
    pub const ALL: [SortOption; 9] = [
        SortOption::Default,
        SortOption::PriceLowToHigh,
        SortOption::PriceHighToLow,
        SortOption::FloorSizeLowToHigh,
        SortOption::FloorSizeHighToLow,
        SortOption::PsfLowToHigh,
        SortOption::PsfHighToLow,
        SortOption::Newest,
        SortOption::Oldest,
    ];

    /// Value carried in the `sort` URL parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::Default => "default",
            SortOption::PriceLowToHigh => "priceLowToHigh",
            SortOption::PriceHighToLow => "priceHighToLow",
            SortOption::FloorSizeLowToHigh => "floorSizeLowToHigh",
            SortOption::FloorSizeHighToLow => "floorSizeHighToLow",
            SortOption::PsfLowToHigh => "psfLowToHigh",
            SortOption::PsfHighToLow => "psfHighToLow",
            SortOption::Newest => "newest",
            SortOption::Oldest => "oldest",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.as_str() == raw)
    }

    /// Sort field understood by the properties API; `-` means descending.
    pub fn api_token(self) -> &'static str {
        match self {
            SortOption::Default => DEFAULT_SORT_TOKEN,
            SortOption::PriceLowToHigh => "price",
            SortOption::PriceHighToLow => "-price",
            SortOption::FloorSizeLowToHigh => "floorSize",
            SortOption::FloorSizeHighToLow => "-floorSize",
            SortOption::PsfLowToHigh => "psf",
            SortOption::PsfHighToLow => "-psf",
            SortOption::Newest => "-createdAt",
            SortOption::Oldest => "createdAt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOption::Default => "Recommended",
            SortOption::PriceLowToHigh => "Price: Low to High",
            SortOption::PriceHighToLow => "Price: High to Low",
            SortOption::FloorSizeLowToHigh => "Floor Size: Low to High",
            SortOption::FloorSizeHighToLow => "Floor Size: High to Low",
            SortOption::PsfLowToHigh => "PSF: Low to High",
            SortOption::PsfHighToLow => "PSF: High to Low",
            SortOption::Newest => "Newest Listings",
            SortOption::Oldest => "Oldest Listings",
        }
    }
}

pub fn resolve(option: &str) -> &'static str {
    SortOption::parse(option)
        .map(SortOption::api_token)
        .unwrap_or(DEFAULT_SORT_TOKEN)
}

pub fn sort_label(option: &str) -> &'static str {
    SortOption::parse(option)
        .map(SortOption::label)
        .unwrap_or("Sort By")
}
