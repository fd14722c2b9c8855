// src/state.rs
use crate::errors::StudioError;
use serde::{Deserialize, Serialize};

/// Screen state of the studio. Exactly one [`Section`] is visible per state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    #[default]
    Idle,
    Previewing,
    Loading,
    ResultsShown,
    Error,
}

/// The four mutually exclusive page sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Upload,
    Loading,
    Results,
    Error,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Upload,
        Section::Loading,
        Section::Results,
        Section::Error,
    ];

    /// Element id of the section in the rendered page.
    pub fn element_id(self) -> &'static str {
        match self {
            Section::Upload => "uploadSection",
            Section::Loading => "loadingSection",
            Section::Results => "resultsSection",
            Section::Error => "errorSection",
        }
    }
}

impl UiState {
    pub fn visible_section(self) -> Section {
        match self {
            UiState::Idle | UiState::Previewing => Section::Upload,
            UiState::Loading => Section::Loading,
            UiState::ResultsShown => Section::Results,
            UiState::Error => Section::Error,
        }
    }

    pub fn is_visible(self, section: Section) -> bool {
        self.visible_section() == section
    }

    /// Whether a file may be picked or dropped. The error banner keeps the
    /// upload controls reachable so the user can retry.
    pub fn accepts_input(self) -> bool {
        matches!(self, UiState::Idle | UiState::Previewing | UiState::Error)
    }

    pub fn can_transition_to(self, next: UiState) -> bool {
        use UiState::*;

        match (self, next) {
            // reset is always allowed
            (_, Idle) => true,
            (Idle | Previewing | Error, Previewing) => true,
            (Previewing | Error, Loading) => true,
            (Loading, ResultsShown) => true,
            (Idle | Previewing | Loading | Error, Error) => true,
            _ => false,
        }
    }

    /// Validates and returns the next state.
    pub fn transition(self, next: UiState) -> Result<UiState, StudioError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StudioError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: [UiState; 5] = [
        UiState::Idle,
        UiState::Previewing,
        UiState::Loading,
        UiState::ResultsShown,
        UiState::Error,
    ];

    #[test]
    fn exactly_one_section_visible_in_every_state() {
        for state in STATES {
            let visible = Section::ALL
                .iter()
                .filter(|section| state.is_visible(**section))
                .count();
            assert_eq!(visible, 1, "{state:?}");
        }
    }

    #[test]
    fn reset_is_legal_from_everywhere() {
        for state in STATES {
            assert_eq!(state.transition(UiState::Idle).ok(), Some(UiState::Idle));
        }
    }

    #[test]
    fn loading_only_from_upload_states() {
        assert!(UiState::Previewing.can_transition_to(UiState::Loading));
        assert!(UiState::Error.can_transition_to(UiState::Loading));
        assert!(!UiState::Idle.can_transition_to(UiState::Loading));
        assert!(!UiState::Loading.can_transition_to(UiState::Loading));
        assert!(!UiState::ResultsShown.can_transition_to(UiState::Loading));
    }

    #[test]
    fn results_only_after_loading() {
        for state in STATES {
            assert_eq!(
                state.can_transition_to(UiState::ResultsShown),
                state == UiState::Loading
            );
        }
    }

    #[test]
    fn illegal_transition_reports_both_ends() {
        let err = UiState::ResultsShown
            .transition(UiState::Previewing)
            .unwrap_err();
        assert!(matches!(
            err,
            StudioError::InvalidTransition {
                from: UiState::ResultsShown,
                to: UiState::Previewing
            }
        ));
    }

    #[test]
    fn upload_reachable_from_error() {
        assert!(UiState::Error.accepts_input());
        assert!(!UiState::Loading.accepts_input());
        assert!(!UiState::ResultsShown.accepts_input());
    }
}
