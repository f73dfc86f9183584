//! Presentation state that rides along on the URL but is not part of the
//! search: card/list view, which facet editor is open, whether the saved
//! searches drawer is showing, and a one-shot notice.

use crate::search::query::QueryRepresentation;
use crate::search::saved::Notice;
use url::form_urlencoded;

pub const VIEW_KEY: &str = "view";
pub const EDIT_KEY: &str = "edit";
pub const SAVED_KEY: &str = "saved";
pub const NOTICE_KEY: &str = "notice";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "grid" => Some(ViewMode::Grid),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }
}

/// A popover or panel that holds an uncommitted draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetEditor {
    Price,
    BedsBaths,
    Filters,
}

impl FacetEditor {
    pub fn as_str(self) -> &'static str {
        match self {
            FacetEditor::Price => "price",
            FacetEditor::BedsBaths => "beds-baths",
            FacetEditor::Filters => "filters",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "price" => Some(FacetEditor::Price),
            "beds-baths" => Some(FacetEditor::BedsBaths),
            "filters" => Some(FacetEditor::Filters),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiParams {
    pub view: ViewMode,
    pub editor: Option<FacetEditor>,
    pub saved_open: bool,
    pub notice: Option<Notice>,
}

impl UiParams {
    pub fn parse(raw: &str) -> Self {
        let mut ui = UiParams::default();
        for (k, v) in form_urlencoded::parse(raw.as_bytes()) {
            match &*k {
                VIEW_KEY => ui.view = ViewMode::parse(&v).unwrap_or_default(),
                EDIT_KEY => ui.editor = FacetEditor::parse(&v),
                SAVED_KEY => ui.saved_open = v == "open",
                NOTICE_KEY => ui.notice = Notice::parse(&v),
                _ => {}
            }
        }
        ui
    }

    /// Only the view mode survives navigation; editors, the drawer and
    /// notices are one-shot.
    pub fn persistent(self) -> Self {
        UiParams {
            view: self.view,
            ..UiParams::default()
        }
    }

    pub fn with_editor(self, editor: Option<FacetEditor>) -> Self {
        UiParams { editor, ..self }
    }

    pub fn with_view(self, view: ViewMode) -> Self {
        UiParams { view, ..self }
    }

    pub fn with_saved_open(self, saved_open: bool) -> Self {
        UiParams { saved_open, ..self }
    }

    pub fn with_notice(self, notice: Option<Notice>) -> Self {
        UiParams { notice, ..self }
    }

    fn append_to(self, ser: &mut form_urlencoded::Serializer<'_, String>) {
        if self.view != ViewMode::Grid {
            ser.append_pair(VIEW_KEY, self.view.as_str());
        }
        if let Some(editor) = self.editor {
            ser.append_pair(EDIT_KEY, editor.as_str());
        }
        if self.saved_open {
            ser.append_pair(SAVED_KEY, "open");
        }
        if let Some(notice) = self.notice {
            ser.append_pair(NOTICE_KEY, notice.as_str());
        }
    }
}

/// Link to the search page for `query` with `ui` layered on top.
pub fn search_href(query: &QueryRepresentation, ui: UiParams) -> String {
    let mut ser = form_urlencoded::Serializer::new(String::new());
    for (k, v) in query.iter() {
        ser.append_pair(k, v);
    }
    ui.append_to(&mut ser);
    let qs = ser.finish();
    if qs.is_empty() {
        "/".to_string()
    } else {
        format!("/?{qs}")
    }
}
