//! The page view model.
//!
//! Everything the page shows lives in [`PageState`]; the HTML template only
//! reads from it. Mutations go through the methods below so that request
//! tokens and tab invariants are kept in one place.

use crate::dom::Node;
use crate::models::Stats;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    Fetch,
    Search,
    Ask,
}

impl PanelId {
    pub const ALL: [PanelId; 3] = [PanelId::Fetch, PanelId::Search, PanelId::Ask];

    /// Tab name used in `?tab=`.
    pub fn name(self) -> &'static str {
        match self {
            PanelId::Fetch => "fetch",
            PanelId::Search => "search",
            PanelId::Ask => "ask",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|panel| panel.name() == name)
    }

    pub fn results_id(self) -> &'static str {
        match self {
            PanelId::Fetch => "fetchResults",
            PanelId::Search => "searchResults",
            PanelId::Ask => "askResults",
        }
    }

    pub fn tab_id(self) -> &'static str {
        match self {
            PanelId::Fetch => "fetchTab",
            PanelId::Search => "searchTab",
            PanelId::Ask => "askTab",
        }
    }

    pub fn button_id(self) -> &'static str {
        match self {
            PanelId::Fetch => "fetchTabButton",
            PanelId::Search => "searchTabButton",
            PanelId::Ask => "askTabButton",
        }
    }

    fn index(self) -> usize {
        match self {
            PanelId::Fetch => 0,
            PanelId::Search => 1,
            PanelId::Ask => 2,
        }
    }
}

/// Identifies one submission on one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub panel: PanelId,
    seq: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultsPanel {
    pub loading: bool,
    pub content: Vec<Node>,
    #[serde(skip)]
    seq: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabView {
    pub panel: PanelId,
    pub panel_active: bool,
    pub button_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsView {
    pub total_articles_stored: u64,
    pub total_articles_in_vectordb: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageState {
    pub tabs: Vec<TabView>,
    pub panels: [ResultsPanel; 3],
    pub stats: StatsView,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            tabs: PanelId::ALL
                .into_iter()
                .map(|panel| TabView {
                    panel,
                    panel_active: panel == PanelId::Fetch,
                    button_active: panel == PanelId::Fetch,
                })
                .collect(),
            panels: Default::default(),
            stats: StatsView::default(),
        }
    }
}

impl PageState {
    pub fn panel(&self, panel: PanelId) -> &ResultsPanel {
        &self.panels[panel.index()]
    }

    fn panel_mut(&mut self, panel: PanelId) -> &mut ResultsPanel {
        &mut self.panels[panel.index()]
    }

    pub fn active_tab(&self) -> Option<PanelId> {
        self.tabs.iter().find(|tab| tab.panel_active).map(|tab| tab.panel)
    }

    /// Activates the panel called `name` and the button whose id is `trigger`.
    ///
    /// Returns `false` and leaves everything untouched when no panel is called `name`.
    pub fn show_tab(&mut self, name: &str, trigger: &str) -> bool {
        let Some(target) = PanelId::from_name(name) else {
            return false;
        };
        for tab in &mut self.tabs {
            tab.panel_active = tab.panel == target;
            tab.button_active = tab.panel.button_id() == trigger;
        }
        true
    }

    /// Starts a submission: shows the loading indicator and clears the container.
    pub fn begin_request(&mut self, panel: PanelId) -> RequestToken {
        let slot = self.panel_mut(panel);
        slot.seq += 1;
        slot.loading = true;
        slot.content.clear();
        RequestToken {
            panel,
            seq: slot.seq,
        }
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.panel(token.panel).seq == token.seq
    }

    /// Replaces the container's content, unless a newer submission superseded `token`.
    pub fn render(&mut self, token: RequestToken, content: Vec<Node>) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.panel_mut(token.panel).content = content;
        true
    }

    /// Hides the loading indicator, unless a newer submission owns it.
    pub fn end_request(&mut self, token: RequestToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        let slot = self.panel_mut(token.panel);
        let was_loading = slot.loading;
        slot.loading = false;
        was_loading
    }

    pub fn set_stats(&mut self, stats: Stats, at: DateTime<Utc>) {
        self.stats = StatsView {
            total_articles_stored: stats.total_articles_stored,
            total_articles_in_vectordb: stats.total_articles_in_vectordb,
            updated_at: Some(at),
        };
    }
}
