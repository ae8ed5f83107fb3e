//! The capability interface this UI depends on.
//!
//! The survey engine (schema parsing, validation rules, expressions,
//! conditional visibility) is owned by the embedding application. This crate
//! only ever talks to it through the narrow [`Survey`] and [`Element`] traits,
//! so any engine — or a hand-rolled test double — can sit behind them.

pub mod adapter;
mod element;
mod survey;

pub use element::{Choice, Element, ElementRef, TextItem};
pub use survey::{
    EventKind, NavButtonsLocation, Survey, SurveyRef, SurveyState, SubscriptionId,
};

/// Depth-first list of the question elements under `element`, containers
/// included transparently. Dynamic panel instances contribute their children.
pub fn flatten_questions(element: &ElementRef) -> Vec<ElementRef> {
    let mut out = Vec::new();
    collect_questions(element, &mut out);
    out
}

fn collect_questions(element: &ElementRef, out: &mut Vec<ElementRef>) {
    if element.is_question() {
        out.push(element.clone());
    }
    for child in element.children() {
        collect_questions(&child, out);
    }
    for panel in element.panels() {
        collect_questions(&panel, out);
    }
}
