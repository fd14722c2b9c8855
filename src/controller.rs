// src/controller.rs
//! Upload, analyze and render flow of the studio page.
//!
//! [`Controller`] is a cheap handle over shared session state. Every
//! operation works on a draft of the session and commits it in one step, then
//! publishes the new [`Document`] to subscribers. Locks are never held across
//! an await.
//!
//! Selections, resets and dispatches bump a generation counter. Preview and
//! analysis completions carry the generation they started with and are
//! dropped when it no longer matches.

use crate::document::{Document, ScrollRequest};
use crate::errors::{NO_IMAGE_MESSAGE, StudioError};
use crate::models::SelectedFile;
use crate::render::render_results;
use crate::services::{AnalysisBackend, Clipboard, ImageProcessor};
use crate::state::UiState;
use crate::toast::{TOAST_EXIT, TOAST_VISIBLE, Toast, ToastPhase, copied_message};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Semaphore, watch};
use uuid::Uuid;

/// Result of handing a file to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Preview is on screen and Analyze is offered.
    Previewed,
    /// A newer selection or a reset happened before the preview was ready.
    Superseded,
    /// Dropped file was not an image.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Rendered,
    /// The error banner now shows this message.
    Failed(String),
    /// The reply arrived after a reset and was ignored.
    Discarded,
}

/// A registered file whose preview is still being produced.
#[derive(Debug)]
pub struct PreviewTicket {
    generation: u64,
    file: SelectedFile,
}

impl PreviewTicket {
    pub fn file(&self) -> &SelectedFile {
        &self.file
    }
}

#[derive(Debug, Clone, Default)]
struct Session {
    document: Document,
    selected: Option<SelectedFile>,
    generation: u64,
    scroll_seq: u64,
}

impl Session {
    fn enter(&mut self, next: UiState) -> Result<(), StudioError> {
        let from = self.document.state;
        self.document.state = from.transition(next)?;
        if next != UiState::Error {
            self.document.error_message = None;
        }
        if from != next {
            debug!("UI state {:?} -> {:?}", from, next);
        }
        Ok(())
    }

    fn clear_selection(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.document.upload.preview_src = None;
    }

    fn scroll_to(&mut self, request: fn(u64) -> ScrollRequest) {
        self.scroll_seq += 1;
        self.document.scroll = Some(request(self.scroll_seq));
    }
}

struct Shared {
    session: Mutex<Session>,
    updates: watch::Sender<Document>,
    backend: Arc<dyn AnalysisBackend>,
    clipboard: Arc<dyn Clipboard>,
    image_processor: ImageProcessor,
    flight: Semaphore,
}

impl Shared {
    /// Runs `f` on a draft; commits and publishes only if it succeeds.
    fn update<T>(
        &self,
        f: impl FnOnce(&mut Session) -> Result<T, StudioError>,
    ) -> Result<T, StudioError> {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let mut draft = session.clone();
        let out = f(&mut draft)?;
        if draft.document != session.document {
            self.updates.send_replace(draft.document.clone());
        }
        *session = draft;
        Ok(out)
    }

    fn modify(&self, f: impl FnOnce(&mut Session)) {
        let _ = self.update(|session| {
            f(session);
            Ok(())
        });
    }

    fn document(&self) -> Document {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .document
            .clone()
    }
}

#[derive(Clone)]
pub struct Controller {
    shared: Arc<Shared>,
}

impl Controller {
    pub fn new(backend: Arc<dyn AnalysisBackend>, clipboard: Arc<dyn Clipboard>) -> Self {
        let (updates, _) = watch::channel(Document::default());
        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(Session::default()),
                updates,
                backend,
                clipboard,
                image_processor: ImageProcessor::new(),
                flight: Semaphore::new(1),
            }),
        }
    }

    /// Current document.
    pub fn snapshot(&self) -> Document {
        self.shared.document()
    }

    /// Receives every committed document change.
    pub fn subscribe(&self) -> watch::Receiver<Document> {
        self.shared.updates.subscribe()
    }

    pub fn drag_enter(&self) {
        self.shared.modify(|s| {
            if s.document.state.accepts_input() {
                s.document.upload.drag_over = true;
            }
        });
    }

    pub fn drag_leave(&self) {
        self.shared.modify(|s| s.document.upload.drag_over = false);
    }

    /// File-picker path.
    pub async fn select_file(&self, file: SelectedFile) -> Result<Selection, StudioError> {
        let ticket = self.register_file(file)?;

        let shared = Arc::clone(&self.shared);
        let file = ticket.file.clone();
        let preview_src =
            tokio::task::spawn_blocking(move || shared.image_processor.preview_data_uri(&file))
                .await
                .map_err(|e| StudioError::Preview(e.to_string()))?;

        self.apply_preview(ticket, preview_src)
    }

    /// Drop path. Files whose declared type is not `image/*` are ignored.
    pub async fn drop_file(&self, file: SelectedFile) -> Result<Selection, StudioError> {
        self.drag_leave();

        if !file.is_image() {
            debug!(
                "Ignoring dropped file {} of type {:?}",
                file.filename, file.content_type
            );
            return Ok(Selection::Rejected);
        }

        self.select_file(file).await
    }

    /// Holds `file` as the selection. Hosts that read files themselves call
    /// [`Controller::apply_preview`] once the preview source is ready.
    pub fn register_file(&self, file: SelectedFile) -> Result<PreviewTicket, StudioError> {
        let generation = self.shared.update(|s| {
            if !s.document.state.accepts_input() {
                return Err(StudioError::InvalidTransition {
                    from: s.document.state,
                    to: UiState::Previewing,
                });
            }
            s.generation += 1;
            s.selected = Some(file.clone());
            Ok(s.generation)
        })?;

        info!(
            "Selected {} ({}, {} bytes)",
            file.filename,
            file.content_type,
            file.size()
        );

        Ok(PreviewTicket { generation, file })
    }

    pub fn apply_preview(
        &self,
        ticket: PreviewTicket,
        preview_src: String,
    ) -> Result<Selection, StudioError> {
        self.shared.update(|s| {
            if s.generation != ticket.generation {
                debug!("Discarding stale preview of {}", ticket.file.filename);
                return Ok(Selection::Superseded);
            }
            s.enter(UiState::Previewing)?;
            s.document.upload.preview_src = Some(preview_src);
            Ok(Selection::Previewed)
        })
    }

    /// Drops the selection and brings back the upload prompt.
    pub fn clear_preview(&self) {
        self.shared.modify(|s| {
            if !s.document.state.accepts_input() {
                return;
            }
            s.clear_selection();
            if s.document.state == UiState::Previewing {
                let _ = s.enter(UiState::Idle);
            }
        });
    }

    /// Start over: back to the empty upload screen, scrolled to the top.
    pub fn reset(&self) {
        self.shared.modify(|s| {
            s.clear_selection();
            s.document.upload.drag_over = false;
            s.document.results = None;
            let _ = s.enter(UiState::Idle);
            s.scroll_to(ScrollRequest::page_top);
        });
        info!("Studio reset");
    }

    /// Sends the selected image for analysis and shows the outcome.
    pub async fn dispatch(&self) -> Result<DispatchOutcome, StudioError> {
        let Ok(_permit) = self.shared.flight.try_acquire() else {
            return self.refuse_while_in_flight();
        };

        let started = self.shared.update(|s| match s.selected.take() {
            None => {
                s.enter(UiState::Error)?;
                s.document.error_message = Some(NO_IMAGE_MESSAGE.to_string());
                Ok(None)
            }
            Some(file) => {
                s.enter(UiState::Loading)?;
                s.generation += 1;
                Ok(Some((file, s.generation)))
            }
        })?;

        let Some((file, generation)) = started else {
            warn!("Analyze requested without an image");
            return Ok(DispatchOutcome::Failed(NO_IMAGE_MESSAGE.to_string()));
        };

        let result = self.shared.backend.analyze(&file).await;

        self.shared.update(|s| {
            if s.generation != generation {
                info!("Discarding analysis of {} finished after a reset", file.filename);
                return Ok(DispatchOutcome::Discarded);
            }

            match result {
                Ok(response) => {
                    s.enter(UiState::ResultsShown)?;
                    s.document.results = Some(render_results(&response));
                    s.scroll_to(ScrollRequest::results_top);
                    info!("Rendered analysis of {}", file.filename);
                    Ok(DispatchOutcome::Rendered)
                }
                Err(err) => {
                    warn!("Analysis of {} failed: {}", file.filename, err);
                    let message = err.user_message();
                    s.enter(UiState::Error)?;
                    s.document.error_message = Some(message.clone());
                    // keep the file so Analyze can be retried as is
                    s.selected = Some(file);
                    Ok(DispatchOutcome::Failed(message))
                }
            }
        })
    }

    /// A reset during Loading leaves the earlier request running. Until it
    /// returns, a new Analyze press gets the banner instead of a request.
    fn refuse_while_in_flight(&self) -> Result<DispatchOutcome, StudioError> {
        let message = StudioError::AnalysisInFlight.user_message();
        self.shared.update(|s| {
            if s.document.state == UiState::Loading {
                return Err(StudioError::AnalysisInFlight);
            }
            s.enter(UiState::Error)?;
            s.document.error_message = Some(message.clone());
            Ok(())
        })?;
        warn!("Analyze refused: an earlier request is still running");
        Ok(DispatchOutcome::Failed(message))
    }

    /// Copies `value` and confirms with a toast. Denied writes stay silent.
    pub async fn copy_to_clipboard(&self, value: &str) -> Result<(), StudioError> {
        match self.shared.clipboard.write_text(value).await {
            Ok(()) => {
                self.show_toast(copied_message(value));
                Ok(())
            }
            Err(err) => {
                warn!("Clipboard write of {} failed: {}", value, err);
                Err(err)
            }
        }
    }

    /// Shows a toast that removes itself after [`Toast::lifetime`]. Must be
    /// called from within a tokio runtime.
    pub fn show_toast(&self, message: impl Into<String>) -> Uuid {
        let toast = Toast::success(message);
        let id = toast.id;
        self.shared.modify(|s| s.document.toasts.push(toast));

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep(TOAST_VISIBLE).await;
            shared.modify(|s| {
                if let Some(toast) = s.document.toasts.iter_mut().find(|t| t.id == id) {
                    toast.phase = ToastPhase::Leaving;
                }
            });
            tokio::time::sleep(TOAST_EXIT).await;
            shared.modify(|s| s.document.toasts.retain(|t| t.id != id));
        });

        id
    }
}
