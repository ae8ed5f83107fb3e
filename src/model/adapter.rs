//! Thin read/write accessors between widgets and the survey model.
//!
//! Widgets never touch element fields directly: reads are live (no caching),
//! and writes route through the owning survey's canonical name-addressed
//! setter so the model's change propagation and re-validation fire. Direct
//! assignment is the fallback for detached elements only.

use serde_json::Value;

use super::element::{Element, value_label};
use crate::render::{QuestionNumbers, RenderOptions};

/// Live value of `question`; `None` when unanswered.
pub fn value_of(question: &dyn Element) -> Option<Value> {
    question.value()
}

/// The model's current error messages for `question`, in model order.
///
/// No gating happens here — widgets decide visibility from the validation
/// attempt counter. Empty strings are dropped.
pub fn errors_of(question: &dyn Element) -> Vec<String> {
    question
        .errors()
        .into_iter()
        .filter(|text| !text.is_empty())
        .collect()
}

/// Writes `value` back into the model.
pub fn set_value(question: &dyn Element, value: Option<Value>) {
    match question.survey() {
        Some(survey) => survey.set_value(&question.name(), value),
        None => question.set_value_direct(value),
    }
}

/// Display title with the numbering policy applied.
///
/// A negative index means the position was not computable; the bare title is
/// used rather than a broken "0." prefix. A missing title falls back to the
/// element's internal name.
pub fn display_title(question: &dyn Element, opts: &RenderOptions) -> String {
    let base = match question.title() {
        Some(title) if !title.is_empty() => title,
        _ => question.name(),
    };

    let index = match opts.numbering {
        QuestionNumbers::Off => return base,
        QuestionNumbers::On => opts.global_question_index,
        QuestionNumbers::OnPage => opts.question_index,
    };
    if index < 0 {
        return base;
    }
    format!("{}. {base}", index + 1)
}

/// Convenience used across the widget catalog when a raw value needs showing.
pub fn value_text(value: &Value) -> String {
    value_label(value)
}
