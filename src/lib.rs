// src/lib.rs
//! Color Studio: upload a room photo, send it to the analysis service and
//! show the suggested palette.
//!
//! The page is modelled headlessly. A host forwards user intents to a
//! [`Controller`] and draws the [`Document`] it publishes, either itself or
//! through [`render::render_page`].

pub mod controller;
pub mod document;
pub mod errors;
pub mod models;
pub mod render;
pub mod services;
pub mod state;
pub mod toast;

pub use controller::{Controller, DispatchOutcome, PreviewTicket, Selection};
pub use document::{Document, ScrollBehavior, ScrollRequest, ScrollTarget, UploadView};
pub use errors::StudioError;
pub use models::{AnalysisResponse, EffectiveColor, ParsedData, SelectedFile};
pub use render::{Card, ResultsView, render_page, render_results};
pub use state::{Section, UiState};
pub use toast::{Toast, ToastPhase};
