//! Page composition: which screen is showing and which overlays are open.
//!
//! The cart overlay is the checkout wizard itself and lives in
//! [`crate::checkout::CheckoutFlow`]; this module tracks the rest.

use serde::Serialize;

/// The two top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "screen")]
pub enum View {
    /// Hero plus trending items.
    #[default]
    Landing,
    /// Full catalog with search. `focus_search` is a one-shot request to
    /// focus the search box on arrival.
    Catalog { focus_search: bool },
}

/// Overlay panels other than the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    History,
    MyStickers,
}

/// View mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Go to the catalog, optionally focusing the search box.
    ViewAll { focus_search: bool },
    /// Return to the landing screen; the search query is kept.
    BackToLanding,
    /// The host focused the search box; drop the pending request.
    SearchFocused,
    /// Replace the search query.
    SetQuery(String),
    Open(Overlay),
    Close(Overlay),
    Toggle(Overlay),
}

/// Screen, overlay and search-box state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    view: View,
    query: String,
    history_open: bool,
    my_stickers_open: bool,
}

impl ViewState {
    /// The landing screen with no overlays.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action. Returns true if anything changed.
    pub fn apply(&mut self, action: ViewAction) -> bool {
        let before = self.clone();
        match action {
            ViewAction::ViewAll { focus_search } => self.view = View::Catalog { focus_search },
            ViewAction::BackToLanding => self.view = View::Landing,
            ViewAction::SearchFocused => {
                if let View::Catalog { focus_search } = &mut self.view {
                    *focus_search = false;
                }
            }
            ViewAction::SetQuery(query) => self.query = query,
            ViewAction::Open(overlay) => *self.overlay_mut(overlay) = true,
            ViewAction::Close(overlay) => *self.overlay_mut(overlay) = false,
            ViewAction::Toggle(overlay) => {
                let open = self.overlay_mut(overlay);
                *open = !*open;
            }
        }
        let changed = *self != before;
        if changed {
            tracing::debug!(view = ?self.view, "view changed");
        }
        changed
    }

    /// The current screen.
    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    /// The current search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns true if the search box should take focus now.
    ///
    /// The request is consumed: later calls return false until another
    /// "view all" asks for focus again.
    pub fn search_focused(&mut self) -> bool {
        match &mut self.view {
            View::Catalog { focus_search } if *focus_search => {
                *focus_search = false;
                true
            }
            _ => false,
        }
    }

    /// Whether an overlay is open.
    #[must_use]
    pub const fn is_open(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::History => self.history_open,
            Overlay::MyStickers => self.my_stickers_open,
        }
    }

    fn overlay_mut(&mut self, overlay: Overlay) -> &mut bool {
        match overlay {
            Overlay::History => &mut self.history_open,
            Overlay::MyStickers => &mut self.my_stickers_open,
        }
    }
}
