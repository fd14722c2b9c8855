// src/toast.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// How long a toast stays fully visible.
pub const TOAST_VISIBLE: Duration = Duration::from_millis(2500);
/// Length of the exit animation before removal.
pub const TOAST_EXIT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
}

impl ToastKind {
    pub fn css_class(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastPhase {
    Visible,
    /// Exit animation is playing.
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
    pub phase: ToastPhase,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind: ToastKind::Success,
            phase: ToastPhase::Visible,
            created_at: Utc::now(),
        }
    }

    pub fn lifetime() -> Duration {
        TOAST_VISIBLE + TOAST_EXIT
    }
}

pub fn copied_message(value: &str) -> String {
    format!("Copied: {}", value)
}
