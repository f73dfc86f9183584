// src/router.rs
use crate::api::ListingSource;
use crate::auth::Visitor;
use crate::db::{Database, VisitorStore};
use crate::errors::{ResultResp, ServerError};
use crate::forms::{beds_baths_from_form, filter_from_form, request_query, FormData};
use crate::responses::{css_response, html_response, redirect_response, with_cookie};
use crate::search::codec;
use crate::search::filter::Section;
use crate::search::query::{keys, QueryRepresentation};
use crate::search::results::{load_results, property_type_options};
use crate::search::sort::SortOption;
use crate::search::ui::{search_href, FacetEditor, UiParams, ViewMode, VIEW_KEY};
use crate::search::{NavigationPort, SearchController};
use crate::templates::pages::{search_page, SearchPageVm};
use astra::Request;
use chrono::Utc;
use tracing::debug;

const MAIN_CSS: &str = include_str!("../static/main.css");

/// Everything a request handler needs. `L` is the properties API.
pub struct App<L> {
    pub db: Database,
    pub source: L,
}

impl<L: ListingSource> App<L> {
    pub fn new(db: Database, source: L) -> Self {
        Self { db, source }
    }
}

/// The browser URL as seen from one request. Navigating records where the
/// 303 should point.
#[derive(Debug, Default)]
pub struct RedirectNavigator {
    current: QueryRepresentation,
    target: Option<QueryRepresentation>,
}

impl RedirectNavigator {
    pub fn new(current: QueryRepresentation) -> Self {
        Self {
            current,
            target: None,
        }
    }

    /// Where to send the browser: the last navigation, or back where it was.
    pub fn destination(self) -> QueryRepresentation {
        self.target.unwrap_or(self.current)
    }
}

impl NavigationPort for RedirectNavigator {
    fn current_query(&self) -> QueryRepresentation {
        self.current.clone()
    }

    fn navigate(&mut self, target: QueryRepresentation) {
        self.target = Some(target);
    }
}

type Controller<'a> = SearchController<RedirectNavigator, VisitorStore<'a>>;

pub fn handle<L: ListingSource>(mut req: Request, app: &App<L>) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let visitor = Visitor::from_request(&req);

    let result = route(&mut req, &method, &path, app, &visitor)
        .map(|resp| with_cookie(resp, visitor.set_cookie_header()));

    let status = match &result {
        Ok(resp) => resp.status().as_u16(),
        Err(e) => e.status(),
    };
    debug!(%method, %path, status, "handled request");
    result
}

fn route<L: ListingSource>(
    req: &mut Request,
    method: &str,
    path: &str,
    app: &App<L>,
    visitor: &Visitor,
) -> ResultResp {
    match (method, path) {
        ("GET", "/") => search(req, app, visitor),
        ("GET", "/static/main.css") => css_response(MAIN_CSS),

        ("POST", "/search") => action(req, app, visitor, |ctl, form, ui| {
            ctl.set_search_text(form.get("term").unwrap_or_default());
            ctl.search();
            Ok(ui)
        }),
        ("POST", "/search/clear") => action(req, app, visitor, |ctl, _, ui| {
            ctl.clear_search_term();
            Ok(ui)
        }),

        ("POST", "/filters/price") => action(req, app, visitor, |ctl, form, ui| {
            ctl.set_price_draft(
                form.get(keys::MIN_PRICE).unwrap_or_default(),
                form.get(keys::MAX_PRICE).unwrap_or_default(),
            );
            ctl.apply_price();
            Ok(ui)
        }),
        ("POST", "/filters/price/clear") => action(req, app, visitor, |ctl, _, ui| {
            ctl.clear_price();
            Ok(ui)
        }),

        ("POST", "/filters/beds-baths") => action(req, app, visitor, |ctl, form, ui| {
            ctl.set_beds_baths_draft(beds_baths_from_form(form));
            ctl.apply_beds_baths();
            Ok(ui)
        }),
        ("POST", "/filters/beds-baths/clear") => action(req, app, visitor, |ctl, _, ui| {
            ctl.clear_beds_baths();
            Ok(ui)
        }),

        ("POST", "/filters") => action(req, app, visitor, |ctl, form, ui| {
            ctl.apply_filters(filter_from_form(form));
            Ok(ui)
        }),
        ("POST", "/filters/clear") => action(req, app, visitor, |ctl, _, ui| {
            ctl.clear_filters();
            Ok(ui)
        }),

        ("POST", "/section") => action(req, app, visitor, |ctl, form, ui| {
            let raw = form.get(keys::SECTION).unwrap_or_default();
            let section = Section::parse(raw)
                .ok_or_else(|| ServerError::BadRequest(format!("unknown section {raw:?}")))?;
            ctl.change_section(section);
            Ok(ui)
        }),
        ("POST", "/sort") => action(req, app, visitor, |ctl, form, ui| {
            let raw = form.get(keys::SORT).unwrap_or_default();
            let option = SortOption::parse(raw)
                .ok_or_else(|| ServerError::BadRequest(format!("unknown sort {raw:?}")))?;
            ctl.change_sort(option);
            Ok(ui)
        }),

        ("POST", "/saved-searches") => action(req, app, visitor, |ctl, _, ui| {
            let outcome = ctl.save_search(Utc::now())?;
            Ok(ui.with_notice(outcome.notice()))
        }),

        (method, path) => match (method, saved_search_path(path)) {
            ("POST", Some((id, true))) => action(req, app, visitor, move |ctl, _, ui| {
                ctl.delete_saved_search(id)?;
                Ok(ui.with_saved_open(true))
            }),
            ("GET", Some((id, false))) => apply_saved(app, visitor, id),
            _ => Err(ServerError::NotFound),
        },
    }
}

/// `/saved-searches/{id}` and `/saved-searches/{id}/delete`.
fn saved_search_path(path: &str) -> Option<(i64, bool)> {
    let rest = path.strip_prefix("/saved-searches/")?;
    let (id, delete) = match rest.strip_suffix("/delete") {
        Some(id) => (id, true),
        None => (rest, false),
    };
    id.parse().ok().map(|id| (id, delete))
}

fn controller<'a, L>(app: &'a App<L>, visitor: &Visitor, current: QueryRepresentation) -> Controller<'a> {
    SearchController::new(
        RedirectNavigator::new(current),
        VisitorStore::new(&app.db, visitor.owner_hash()),
    )
}

fn search<L: ListingSource>(req: &Request, app: &App<L>, visitor: &Visitor) -> ResultResp {
    let raw = request_query(req);
    let ui = UiParams::parse(raw);

    let mut ctl = controller(app, visitor, QueryRepresentation::parse(raw));
    ctl.set_view_mode(ui.view);
    if let Some(editor) = ui.editor {
        ctl.open_editor(editor);
    }

    let ticket = ctl.begin_fetch();
    let loaded = load_results(&app.source, ctl.committed());
    let results = ctl.complete_fetch(ticket, loaded).unwrap_or_default();

    let filter = ctl.filter();
    let property_types = if ctl.editor() == Some(FacetEditor::Filters) {
        property_type_options(&app.source, codec::first_category(ctl.committed()))
    } else {
        Vec::new()
    };

    let vm = SearchPageVm {
        query: ctl.committed(),
        ui: ui.with_view(ctl.view_mode()),
        filter: &filter,
        filters_draft: ctl.filters_draft(),
        search_text: ctl.location_text(),
        results: &results,
        filter_count: ctl.filter_count(),
        beds_baths_count: ctl.beds_baths_count(),
        beds_baths_label: ctl.beds_baths_label(),
        price_label: ctl.price_label(),
        sort_label: ctl.sort_label(),
        current_sort: ctl.current_sort(),
        beds_baths_draft: ctl.beds_baths_draft(),
        price_draft: ctl.price_draft(),
        saved: ctl.saved_searches(),
        property_types: &property_types,
    };
    html_response(search_page(&vm))
}

/// Runs one form action against the query carried in the form and answers
/// with a redirect to wherever the controller navigated.
fn action<'a, L, F>(req: &mut Request, app: &'a App<L>, visitor: &Visitor, f: F) -> ResultResp
where
    F: FnOnce(&mut Controller<'a>, &FormData, UiParams) -> Result<UiParams, ServerError>,
{
    let form = FormData::read(req)?;
    let view = form
        .get(VIEW_KEY)
        .and_then(ViewMode::parse)
        .unwrap_or_default();

    let mut ctl = controller(app, visitor, form.current_query());
    let ui = f(&mut ctl, &form, UiParams::default().with_view(view))?;
    let target = ctl.into_navigator().destination();
    redirect_response(&search_href(&target, ui))
}

fn apply_saved<L>(app: &App<L>, visitor: &Visitor, id: i64) -> ResultResp {
    let mut ctl = controller(app, visitor, QueryRepresentation::new());
    if !ctl.apply_saved_search(id) {
        return Err(ServerError::NotFound);
    }
    let target = ctl.into_navigator().destination();
    redirect_response(&search_href(&target, UiParams::default()))
}
