use std::time::Duration;

/// SurveyJS-style numbering policy: `off` | `on` (survey-global) | `onPage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionNumbers {
    Off,
    On,
    #[default]
    OnPage,
}

impl QuestionNumbers {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "off" => QuestionNumbers::Off,
            "on" => QuestionNumbers::On,
            _ => QuestionNumbers::OnPage,
        }
    }
}

/// Read-only bag threaded through the widget tree on every render pass.
///
/// The shape is identical for all widget types so the dispatcher can pass it
/// along unchanged; containers only override the per-question indices.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub animate: bool,
    pub duration: Duration,
    /// Increments on each failed advance attempt for the current page.
    /// Widgets show their error list only while this is nonzero.
    pub validation_seq: u32,
    /// 0-based index within the current page; -1 when not computable.
    pub question_index: i32,
    /// 0-based index across the whole survey; -1 when not computable.
    pub global_question_index: i32,
    pub numbering: QuestionNumbers,
}

impl RenderOptions {
    pub fn new(animate: bool, duration: Duration, numbering: QuestionNumbers) -> Self {
        Self {
            animate,
            duration,
            validation_seq: 0,
            question_index: -1,
            global_question_index: -1,
            numbering,
        }
    }

    pub fn with_validation_seq(mut self, seq: u32) -> Self {
        self.validation_seq = seq;
        self
    }

    pub fn with_indices(&self, question_index: i32, global_question_index: i32) -> Self {
        let mut opts = self.clone();
        opts.question_index = question_index;
        opts.global_question_index = global_question_index;
        opts
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(true, Duration::from_millis(180), QuestionNumbers::default())
    }
}
