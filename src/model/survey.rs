use std::rc::Rc;

use anyhow::Result;
use serde_json::Value;

use super::element::ElementRef;
use crate::render::QuestionNumbers;

pub type SurveyRef = Rc<dyn Survey>;

/// Lifecycle state reported by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyState {
    Loading,
    Running,
    Completed,
    Empty,
}

/// Where the navigation bar renders relative to the question list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavButtonsLocation {
    Top,
    #[default]
    Bottom,
    TopBottom,
}

/// Model change notifications the root container subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ValueChanged,
    CurrentPageChanged,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// The external survey model, reduced to the operations this UI needs.
///
/// Mutation goes exclusively through [`Survey::set_value`] and the navigation
/// methods so the model's own change propagation and re-validation fire.
pub trait Survey {
    fn title(&self) -> Option<String> {
        None
    }

    fn pages(&self) -> Vec<ElementRef>;

    fn current_page(&self) -> Option<ElementRef>;

    /// 0-based index of the current page.
    fn current_page_no(&self) -> usize;

    fn is_first_page(&self) -> bool;

    fn is_last_page(&self) -> bool;

    fn state(&self) -> SurveyState;

    /// The response data accumulated so far.
    fn data(&self) -> Value;

    /// Canonical name-addressed setter. Triggers the model's change
    /// notification and re-validation on its own schedule.
    fn set_value(&self, name: &str, value: Option<Value>);

    /// Runs the model's per-page validation, populating per-question error
    /// lists. `Ok(true)` means the page may advance. An `Err` (a malformed
    /// conditional expression, say) is the model throwing mid-validation;
    /// callers treat it as a failed validation, never as a crash.
    fn validate_current_page(&self) -> Result<bool>;

    fn next_page(&self);

    fn prev_page(&self);

    /// Completion transition; the model flips to [`SurveyState::Completed`]
    /// and emits its completion event.
    fn try_complete(&self);

    // Read-only policy switches.

    fn show_navigation_buttons(&self) -> bool {
        true
    }

    fn show_prev_button(&self) -> bool {
        true
    }

    fn navigation_buttons_location(&self) -> NavButtonsLocation {
        NavButtonsLocation::default()
    }

    fn show_question_numbers(&self) -> QuestionNumbers {
        QuestionNumbers::default()
    }

    fn show_page_titles(&self) -> bool {
        true
    }

    fn show_page_numbers(&self) -> bool {
        false
    }

    /// Branding banner text, if any.
    fn logo(&self) -> Option<String> {
        None
    }

    /// Custom text for the terminal "completed" view.
    fn completed_html(&self) -> Option<String> {
        None
    }

    /// Custom text shown while the model reports [`SurveyState::Loading`].
    fn loading_html(&self) -> Option<String> {
        None
    }

    /// Registers a change callback; the returned id must stay valid until
    /// [`Survey::unsubscribe`] is called with it.
    fn subscribe(&self, kind: EventKind, callback: Rc<dyn Fn()>) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}
