//! Validation-gated page navigation.
//!
//! `go_next` and `try_complete` only proceed when the model's page validation
//! passes. A model that throws mid-validation (a malformed conditional
//! expression, say) blocks the advance exactly like an ordinary failure:
//! conservative-fail, logged, never propagated into the view.

use tracing::{debug, warn};

use super::validation::ValidationCoordinator;
use crate::model::{SurveyRef, flatten_questions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Advanced,
    Completed,
    Blocked,
}

pub fn go_next(survey: &SurveyRef, coordinator: &mut ValidationCoordinator) -> NavOutcome {
    if !page_is_valid(survey) {
        record_failure(survey, coordinator);
        return NavOutcome::Blocked;
    }
    survey.next_page();
    if let Some(page) = survey.current_page() {
        coordinator.set_page(&page.name());
    }
    debug!(page = survey.current_page_no(), "advanced to next page");
    NavOutcome::Advanced
}

/// Moving backward never requires the current page to be valid.
pub fn go_prev(survey: &SurveyRef, coordinator: &mut ValidationCoordinator) {
    if survey.is_first_page() {
        return;
    }
    survey.prev_page();
    if let Some(page) = survey.current_page() {
        coordinator.set_page(&page.name());
    }
}

pub fn try_complete(survey: &SurveyRef, coordinator: &mut ValidationCoordinator) -> NavOutcome {
    if !page_is_valid(survey) {
        record_failure(survey, coordinator);
        return NavOutcome::Blocked;
    }
    survey.try_complete();
    NavOutcome::Completed
}

fn page_is_valid(survey: &SurveyRef) -> bool {
    match survey.validate_current_page() {
        Ok(valid) => valid,
        Err(err) => {
            warn!(%err, "model threw during validation; treating as failed");
            false
        }
    }
}

/// The first question in page order currently reporting errors becomes the
/// pending focus target for the coordinator.
fn record_failure(survey: &SurveyRef, coordinator: &mut ValidationCoordinator) {
    let Some(page) = survey.current_page() else {
        return;
    };
    let focus = flatten_questions(&page)
        .into_iter()
        .find(|q| !q.errors().is_empty())
        .map(|q| q.name());
    coordinator.record_failure(&page.name(), focus);
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use anyhow::anyhow;
    use serde_json::{Value, json};

    use super::*;
    use crate::model::{
        Element, ElementRef, EventKind, Survey, SurveyState, SubscriptionId,
    };

    struct StubQuestion {
        name: &'static str,
        failing: Rc<Cell<bool>>,
    }

    impl Element for StubQuestion {
        fn element_type(&self) -> String {
            "text".into()
        }
        fn name(&self) -> String {
            self.name.into()
        }
        fn errors(&self) -> Vec<String> {
            if self.failing.get() {
                vec!["Response required.".into()]
            } else {
                Vec::new()
            }
        }
        fn set_value_direct(&self, _value: Option<Value>) {}
    }

    struct StubPage {
        name: &'static str,
        questions: Vec<ElementRef>,
    }

    impl Element for StubPage {
        fn element_type(&self) -> String {
            "page".into()
        }
        fn name(&self) -> String {
            self.name.into()
        }
        fn is_question(&self) -> bool {
            false
        }
        fn children(&self) -> Vec<ElementRef> {
            self.questions.clone()
        }
        fn set_value_direct(&self, _value: Option<Value>) {}
    }

    struct StubSurvey {
        pages: Vec<ElementRef>,
        page_no: Cell<usize>,
        valid: Rc<Cell<bool>>,
        throws: Cell<bool>,
        completed: Cell<bool>,
    }

    impl Survey for StubSurvey {
        fn pages(&self) -> Vec<ElementRef> {
            self.pages.clone()
        }
        fn current_page(&self) -> Option<ElementRef> {
            self.pages.get(self.page_no.get()).cloned()
        }
        fn current_page_no(&self) -> usize {
            self.page_no.get()
        }
        fn is_first_page(&self) -> bool {
            self.page_no.get() == 0
        }
        fn is_last_page(&self) -> bool {
            self.page_no.get() + 1 >= self.pages.len()
        }
        fn state(&self) -> SurveyState {
            if self.completed.get() {
                SurveyState::Completed
            } else {
                SurveyState::Running
            }
        }
        fn data(&self) -> Value {
            json!({})
        }
        fn set_value(&self, _name: &str, _value: Option<Value>) {}
        fn validate_current_page(&self) -> anyhow::Result<bool> {
            if self.throws.get() {
                return Err(anyhow!("expression evaluation failed"));
            }
            Ok(self.valid.get())
        }
        fn next_page(&self) {
            self.page_no.set(self.page_no.get() + 1);
        }
        fn prev_page(&self) {
            self.page_no.set(self.page_no.get().saturating_sub(1));
        }
        fn try_complete(&self) {
            self.completed.set(true);
        }
        fn subscribe(&self, _kind: EventKind, _callback: Rc<dyn Fn()>) -> SubscriptionId {
            SubscriptionId(0)
        }
        fn unsubscribe(&self, _id: SubscriptionId) {}
    }

    fn fixture() -> (Rc<StubSurvey>, Rc<Cell<bool>>, Rc<Cell<bool>>) {
        let valid = Rc::new(Cell::new(true));
        let failing = Rc::new(Cell::new(false));
        let page = |name, qname| {
            Rc::new(StubPage {
                name,
                questions: vec![Rc::new(StubQuestion {
                    name: qname,
                    failing: failing.clone(),
                })],
            }) as ElementRef
        };
        let survey = Rc::new(StubSurvey {
            pages: vec![page("p1", "q1"), page("p2", "q2")],
            page_no: Cell::new(0),
            valid: valid.clone(),
            throws: Cell::new(false),
            completed: Cell::new(false),
        });
        (survey, valid, failing)
    }

    #[test]
    fn blocked_advance_counts_the_attempt_and_targets_the_failed_question() {
        let (stub, valid, failing) = fixture();
        let survey: SurveyRef = stub.clone();
        valid.set(false);
        failing.set(true);
        let mut coordinator = ValidationCoordinator::new();

        assert_eq!(go_next(&survey, &mut coordinator), NavOutcome::Blocked);
        assert_eq!(stub.current_page_no(), 0);
        assert_eq!(coordinator.seq(), 1);
        assert_eq!(coordinator.take_focus().as_deref(), Some("q1"));

        assert_eq!(go_next(&survey, &mut coordinator), NavOutcome::Blocked);
        assert_eq!(coordinator.seq(), 2);
    }

    #[test]
    fn successful_advance_moves_and_resets_the_attempt_counter() {
        let (stub, valid, failing) = fixture();
        let survey: SurveyRef = stub.clone();
        valid.set(false);
        failing.set(true);
        let mut coordinator = ValidationCoordinator::new();
        go_next(&survey, &mut coordinator);

        valid.set(true);
        failing.set(false);
        assert_eq!(go_next(&survey, &mut coordinator), NavOutcome::Advanced);
        assert_eq!(stub.current_page_no(), 1);
        assert_eq!(coordinator.seq(), 0);
        assert_eq!(coordinator.take_focus(), None);
    }

    #[test]
    fn model_error_during_validation_blocks_like_a_failure() {
        let (stub, _, _) = fixture();
        let survey: SurveyRef = stub.clone();
        stub.throws.set(true);
        let mut coordinator = ValidationCoordinator::new();

        assert_eq!(go_next(&survey, &mut coordinator), NavOutcome::Blocked);
        assert_eq!(stub.current_page_no(), 0);
        assert_eq!(coordinator.seq(), 1);
    }

    #[test]
    fn backward_navigation_skips_validation() {
        let (stub, valid, failing) = fixture();
        let survey: SurveyRef = stub.clone();
        let mut coordinator = ValidationCoordinator::new();
        go_next(&survey, &mut coordinator);
        assert_eq!(stub.current_page_no(), 1);

        valid.set(false);
        failing.set(true);
        go_prev(&survey, &mut coordinator);
        assert_eq!(stub.current_page_no(), 0);
        assert_eq!(coordinator.seq(), 0);
    }

    #[test]
    fn completion_only_after_the_last_page_validates() {
        let (stub, valid, failing) = fixture();
        let survey: SurveyRef = stub.clone();
        let mut coordinator = ValidationCoordinator::new();
        go_next(&survey, &mut coordinator);

        valid.set(false);
        failing.set(true);
        assert_eq!(try_complete(&survey, &mut coordinator), NavOutcome::Blocked);
        assert_eq!(stub.state(), SurveyState::Running);

        valid.set(true);
        failing.set(false);
        assert_eq!(
            try_complete(&survey, &mut coordinator),
            NavOutcome::Completed
        );
        assert_eq!(stub.state(), SurveyState::Completed);
    }
}
