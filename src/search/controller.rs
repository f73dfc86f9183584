// src/search/controller.rs

use crate::errors::ServerError;
use crate::search::codec;
use crate::search::filter::{bedroom_label, Filter, Section};
use crate::search::query::{keys, QueryRepresentation};
use crate::search::saved::{PersistentStore, SaveOutcome, SavedSearch, SavedSearchStore};
use crate::search::sort::{self, SortOption};
use crate::search::ui::{FacetEditor, ViewMode};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Where the committed search lives (the URL, in the web app).
pub trait NavigationPort {
    fn current_query(&self) -> QueryRepresentation;
    /// Commit `target`. Loading listings for it is the caller's next step.
    fn navigate(&mut self, target: QueryRepresentation);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BedsBathsDraft {
    pub beds: BTreeSet<u32>,
    pub baths: BTreeSet<u32>,
}

/// Price bounds as typed, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceDraft {
    pub min: String,
    pub max: String,
}

/// Issued per listing fetch; only the newest ticket's result is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Turns discrete UI events into new navigation targets.
///
/// Every commit goes through [`SearchController::commit`], which navigates
/// exactly once and supersedes any outstanding fetch.
pub struct SearchController<N, S> {
    nav: N,
    saved: SavedSearchStore<S>,
    committed: QueryRepresentation,
    location_text: String,
    name_text: String,
    listing_type: Section,
    view_mode: ViewMode,
    open_editor: Option<FacetEditor>,
    beds_baths_draft: BedsBathsDraft,
    price_draft: PriceDraft,
    filters_draft: Filter,
    fetch_seq: u64,
}

impl<N: NavigationPort, S: PersistentStore> SearchController<N, S> {
    pub fn new(nav: N, store: S) -> Self {
        let committed = nav.current_query();
        let filter = codec::decode(&committed);
        let name_text = filter.name.clone().unwrap_or_default();
        let location_text = filter
            .location
            .clone()
            .or_else(|| filter.name.clone())
            .unwrap_or_default();

        let mut controller = Self {
            nav,
            saved: SavedSearchStore::load(store),
            committed,
            location_text,
            name_text,
            listing_type: filter.section,
            view_mode: ViewMode::default(),
            open_editor: None,
            beds_baths_draft: BedsBathsDraft::default(),
            price_draft: PriceDraft::default(),
            filters_draft: Filter::default(),
            fetch_seq: 0,
        };
        controller.reset_drafts();
        controller
    }

    // ---- committed state -------------------------------------------------

    pub fn committed(&self) -> &QueryRepresentation {
        &self.committed
    }

    pub fn filter(&self) -> Filter {
        codec::decode(&self.committed)
    }

    pub fn current_sort(&self) -> &str {
        self.committed.sort()
    }

    pub fn current_page(&self) -> u32 {
        self.committed.page()
    }

    pub fn listing_type(&self) -> Section {
        self.listing_type
    }

    pub fn location_text(&self) -> &str {
        &self.location_text
    }

    /// What the user typed into the search box; it feeds both `location`
    /// and `name`.
    pub fn set_search_text(&mut self, text: &str) {
        self.location_text = text.to_string();
        self.name_text = text.to_string();
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn navigator(&self) -> &N {
        &self.nav
    }

    pub fn into_navigator(self) -> N {
        self.nav
    }

    // ---- search box --------------------------------------------------------

    /// Commits the search box text as both `location` and `name`.
    pub fn search(&mut self) {
        let term = [self.location_text.trim(), self.name_text.trim()]
            .into_iter()
            .find(|t| !t.is_empty())
            .map(str::to_string);

        let mut q = self.committed.with_page(1);
        q.set_or_remove(keys::LOCATION, term.clone());
        q.set_or_remove(keys::NAME, term.clone());

        let term = term.unwrap_or_default();
        self.location_text = term.clone();
        self.name_text = term;
        self.commit(q);
    }

    pub fn clear_search_term(&mut self) {
        self.location_text.clear();
        self.name_text.clear();
        let mut q = self.committed.with_page(1);
        q.remove(keys::LOCATION);
        q.remove(keys::NAME);
        self.commit(q);
    }

    // ---- facet editors -----------------------------------------------------

    pub fn editor(&self) -> Option<FacetEditor> {
        self.open_editor
    }

    /// Opens `editor` with its draft seeded from the committed search.
    pub fn open_editor(&mut self, editor: FacetEditor) {
        self.reset_drafts();
        self.open_editor = Some(editor);
    }

    /// Closes without applying; the draft is thrown away.
    pub fn close_editor(&mut self) {
        self.reset_drafts();
        self.open_editor = None;
    }

    pub fn beds_baths_draft(&self) -> &BedsBathsDraft {
        &self.beds_baths_draft
    }

    pub fn price_draft(&self) -> &PriceDraft {
        &self.price_draft
    }

    pub fn filters_draft(&self) -> &Filter {
        &self.filters_draft
    }

    pub fn toggle_bed(&mut self, rooms: u32) {
        toggle(&mut self.beds_baths_draft.beds, rooms);
    }

    pub fn toggle_bath(&mut self, rooms: u32) {
        toggle(&mut self.beds_baths_draft.baths, rooms);
    }

    pub fn set_beds_baths_draft(&mut self, draft: BedsBathsDraft) {
        self.beds_baths_draft = draft;
    }

    pub fn apply_beds_baths(&mut self) {
        let draft = self.beds_baths_draft.clone();
        let mut q = self.committed.with_page(1);
        q.set(keys::BED_ROOMS, codec::encode_rooms(&draft.beds));
        q.set(keys::BATH_ROOMS, codec::encode_rooms(&draft.baths));
        self.commit(q);
    }

    pub fn clear_beds_baths(&mut self) {
        self.beds_baths_draft = BedsBathsDraft::default();
        let mut q = self.committed.with_page(1);
        q.remove(keys::BED_ROOMS);
        q.remove(keys::BATH_ROOMS);
        self.commit(q);
    }

    pub fn set_price_draft(&mut self, min: &str, max: &str) {
        self.price_draft = PriceDraft {
            min: min.to_string(),
            max: max.to_string(),
        };
    }

    /// Bounds that do not parse are removed rather than kept stale.
    pub fn apply_price(&mut self) {
        let min = codec::parse_price_input(&self.price_draft.min);
        let max = codec::parse_price_input(&self.price_draft.max);
        let mut q = self.committed.with_page(1);
        q.set_or_remove(keys::MIN_PRICE, min.map(|p| p.to_string()));
        q.set_or_remove(keys::MAX_PRICE, max.map(|p| p.to_string()));
        self.commit(q);
    }

    pub fn clear_price(&mut self) {
        self.price_draft = PriceDraft::default();
        let mut q = self.committed.with_page(1);
        q.remove(keys::MIN_PRICE);
        q.remove(keys::MAX_PRICE);
        self.commit(q);
    }

    /// Applies the full filter panel. The query is rebuilt from scratch:
    /// page 1, the current sort, the search box text, `filter`'s facets and
    /// the current listing type.
    pub fn apply_filters(&mut self, filter: Filter) {
        let f = Filter {
            section: self.listing_type,
            location: non_blank(&self.location_text),
            name: non_blank(&self.name_text),
            ..filter
        };
        let mut q = codec::encode(&f);
        q.set(keys::PAGE, "1");
        q.set(keys::SORT, self.current_sort().to_string());
        self.commit(q);
    }

    /// Removes every facet. Search term, sort and listing type stay.
    pub fn clear_filters(&mut self) {
        self.apply_filters(Filter::default());
    }

    // ---- listing type, sort, paging -------------------------------------

    pub fn change_section(&mut self, section: Section) {
        self.listing_type = section;
        let mut q = self.committed.with_page(1);
        q.set(keys::SECTION, section.as_str());
        self.commit(q);
    }

    pub fn change_sort(&mut self, option: SortOption) {
        let mut q = self.committed.with_page(1);
        q.set(keys::SORT, option.as_str());
        self.commit(q);
    }

    /// Target for a pagination link; nothing else changes.
    pub fn page_query(&self, page: u32) -> QueryRepresentation {
        self.committed.with_page(page)
    }

    pub fn change_page(&mut self, page: u32) {
        let q = self.page_query(page);
        self.commit(q);
    }

    // ---- saved searches ----------------------------------------------------

    pub fn saved_searches(&self) -> &[SavedSearch] {
        self.saved.list()
    }

    /// Saves the committed search together with the search box text.
    pub fn save_search(&mut self, now: DateTime<Utc>) -> Result<SaveOutcome, ServerError> {
        let mut q = self.committed.clone();
        q.set(keys::LOCATION, self.location_text.trim());
        q.set(keys::NAME, self.name_text.trim());

        let display_name = [self.name_text.trim(), self.location_text.trim()]
            .into_iter()
            .find(|t| !t.is_empty());

        self.saved.save(&q, display_name, now)
    }

    pub fn delete_saved_search(&mut self, id: i64) -> Result<(), ServerError> {
        self.saved.delete(id)
    }

    /// Navigates to a saved search. `false` when `id` is unknown.
    pub fn apply_saved_search(&mut self, id: i64) -> bool {
        let Some(q) = self.saved.apply(id) else {
            return false;
        };
        let filter = codec::decode(&q);
        self.location_text = filter.location.unwrap_or_default();
        self.name_text = filter.name.unwrap_or_default();
        self.listing_type = filter.section;
        self.commit(q);
        true
    }

    // ---- fetch sequencing -----------------------------------------------

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_seq += 1;
        FetchTicket(self.fetch_seq)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.fetch_seq
    }

    /// Hands back `outcome` only if no newer fetch or navigation happened
    /// since `ticket` was issued.
    pub fn complete_fetch<T>(&self, ticket: FetchTicket, outcome: T) -> Option<T> {
        self.is_current(ticket).then_some(outcome)
    }

    // ---- derived display state -------------------------------------------

    pub fn filter_count(&self) -> usize {
        self.filter().facet_count()
    }

    pub fn beds_baths_count(&self) -> usize {
        self.filter().beds_baths_count()
    }

    pub fn beds_baths_label(&self) -> String {
        let f = self.filter();
        let mut parts = Vec::new();

        match f.bed_rooms.len() {
            0 => {}
            1 => {
                let n = f.bed_rooms.iter().next().copied().unwrap_or_default();
                parts.push(match n {
                    0 => "Studio".to_string(),
                    n => format!("{} bed", bedroom_label(n)),
                });
            }
            len => parts.push(format!("{len} beds")),
        }

        match f.bath_rooms.len() {
            0 => {}
            1 => {
                let n = f.bath_rooms.iter().next().copied().unwrap_or_default();
                parts.push(format!("{} bath", bedroom_label(n.max(1))));
            }
            len => parts.push(format!("{len} baths")),
        }

        if parts.is_empty() {
            "Beds & Baths".to_string()
        } else {
            parts.join(" & ")
        }
    }

    /// Label for the quick price button; `None` when no bound is set.
    pub fn price_label(&self) -> Option<String> {
        let f = self.filter();
        match (f.min_price, f.max_price) {
            (Some(min), Some(max)) => Some(format!("RM {min} - {max}")),
            (Some(min), None) => Some(format!("Min RM {min}")),
            (None, Some(max)) => Some(format!("Under RM {max}")),
            (None, None) => None,
        }
    }

    pub fn sort_label(&self) -> &'static str {
        sort::sort_label(self.current_sort())
    }

    // ---- internals -------------------------------------------------------

    fn commit(&mut self, target: QueryRepresentation) {
        self.committed = target.clone();
        self.open_editor = None;
        // supersedes whatever fetch was in flight
        self.fetch_seq += 1;
        self.reset_drafts();
        self.nav.navigate(target);
    }

    fn reset_drafts(&mut self) {
        let f = self.filter();
        self.beds_baths_draft = BedsBathsDraft {
            beds: f.bed_rooms.clone(),
            baths: f.bath_rooms.clone(),
        };
        self.price_draft = PriceDraft {
            min: f.min_price.map(|p| p.to_string()).unwrap_or_default(),
            max: f.max_price.map(|p| p.to_string()).unwrap_or_default(),
        };
        self.filters_draft = f;
    }
}

fn toggle(set: &mut BTreeSet<u32>, value: u32) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

fn non_blank(text: &str) -> Option<String> {
    let t = text.trim();
    (!t.is_empty()).then(|| t.to_string())
}
