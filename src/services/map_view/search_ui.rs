use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchUiVisibility {
    #[default]
    Hidden,
    Shown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
}

/// Visibility of the search box.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchUiToggle {
    visibility: SearchUiVisibility,
}

impl SearchUiToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> SearchUiVisibility {
        self.visibility
    }

    pub fn on_open_tap(&mut self) {
        debug!("Search box opened");
        self.visibility = SearchUiVisibility::Shown;
    }

    /// Hides the box and hands back the search to run.
    pub fn on_submit_tap(&mut self, query: &str) -> SearchRequest {
        debug!("Search submitted: {}", query);
        self.visibility = SearchUiVisibility::Hidden;
        SearchRequest {
            query: query.to_string(),
        }
    }

    pub fn on_map_tap(&mut self) {
        self.visibility = SearchUiVisibility::Hidden;
    }
}
