// src/document.rs
use crate::render::ResultsView;
use crate::state::{Section, UiState};
use crate::toast::Toast;
use serde::Serialize;

/// Everything a host needs to draw the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub state: UiState,
    pub upload: UploadView,
    /// Error banner text, set while in [`UiState::Error`].
    pub error_message: Option<String>,
    pub results: Option<ResultsView>,
    pub toasts: Vec<Toast>,
    /// Most recent scroll the host should perform.
    pub scroll: Option<ScrollRequest>,
}

impl Document {
    pub fn visible_section(&self) -> Section {
        self.state.visible_section()
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.state.is_visible(section)
    }
}

/// Upload panel. Prompt and preview are mutually exclusive by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadView {
    pub preview_src: Option<String>,
    pub drag_over: bool,
}

impl UploadView {
    pub fn prompt_visible(&self) -> bool {
        self.preview_src.is_none()
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_src.is_some()
    }

    /// The Analyze action is offered once a preview is on screen.
    pub fn analyze_visible(&self) -> bool {
        self.preview_visible()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollTarget {
    /// Top edge of the results section.
    ResultsTop,
    PageTop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Smooth,
}

/// One scroll the host should perform. `seq` grows with every request so
/// that repeating the same target still counts as a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    pub target: ScrollTarget,
    pub behavior: ScrollBehavior,
    pub seq: u64,
}

impl ScrollRequest {
    pub fn results_top(seq: u64) -> Self {
        Self {
            target: ScrollTarget::ResultsTop,
            behavior: ScrollBehavior::Smooth,
            seq,
        }
    }

    pub fn page_top(seq: u64) -> Self {
        Self {
            target: ScrollTarget::PageTop,
            behavior: ScrollBehavior::Smooth,
            seq,
        }
    }
}
