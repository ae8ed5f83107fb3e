use std::rc::Rc;

use serde_json::Value;

use super::survey::SurveyRef;

/// Borrowed handle into the survey model's element tree.
pub type ElementRef = Rc<dyn Element>;

/// One entry of a choice-bearing question (`visibleChoices`, `rateValues`).
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub value: Value,
    pub text: Option<String>,
    /// Image picker choices carry a link to the image they stand for.
    pub image_link: Option<String>,
}

impl Choice {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            text: None,
            image_link: None,
        }
    }

    pub fn with_text(value: impl Into<Value>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: Some(text.into()),
            image_link: None,
        }
    }

    pub fn with_image(mut self, link: impl Into<String>) -> Self {
        self.image_link = Some(link.into());
        self
    }

    pub fn label(&self) -> String {
        self.text
            .clone()
            .unwrap_or_else(|| value_label(&self.value))
    }
}

/// One sub-field of a `multipletext` question.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub name: String,
    pub title: Option<String>,
}

impl TextItem {
    pub fn label(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.name.clone())
    }
}

/// A node in the survey model's tree: either a leaf input (question) or a
/// container (panel, page). The UI never copies its state; every accessor is a
/// live read against the model.
///
/// Accessors that only apply to some question types default to empty so a
/// minimally-populated element never makes a widget crash.
pub trait Element {
    /// Type tag driving widget dispatch (`"text"`, `"boolean"`, …). Unknown
    /// tags fall back to the text widget.
    fn element_type(&self) -> String;

    fn name(&self) -> String;

    fn title(&self) -> Option<String> {
        None
    }

    fn is_required(&self) -> bool {
        false
    }

    /// `false` for pure containers (pages, panels).
    fn is_question(&self) -> bool {
        true
    }

    fn value(&self) -> Option<Value> {
        None
    }

    /// Current validation messages. The model owns these; widgets gate their
    /// display on the validation-attempt counter, not here.
    fn errors(&self) -> Vec<String> {
        Vec::new()
    }

    fn visible_choices(&self) -> Vec<Choice> {
        Vec::new()
    }

    fn items(&self) -> Vec<TextItem> {
        Vec::new()
    }

    fn rate_values(&self) -> Vec<Choice> {
        Vec::new()
    }

    /// Matrix row headers.
    fn visible_rows(&self) -> Vec<Choice> {
        Vec::new()
    }

    /// Matrix column choices, shared by every row.
    fn visible_columns(&self) -> Vec<Choice> {
        Vec::new()
    }

    /// Dynamic panel instances (each a container element).
    fn panels(&self) -> Vec<ElementRef> {
        Vec::new()
    }

    fn can_add_panel(&self) -> bool {
        false
    }

    fn add_panel(&self) {}

    fn remove_panel(&self, _index: usize) {}

    /// Child elements of a container.
    fn children(&self) -> Vec<ElementRef> {
        Vec::new()
    }

    /// The owning survey, when attached. Detached elements (bare fixtures in
    /// tests) return `None` and take the direct-assignment write path.
    fn survey(&self) -> Option<SurveyRef> {
        None
    }

    /// Direct property write. Only the adapter calls this, and only when no
    /// owning survey exists to route the write through.
    fn set_value_direct(&self, value: Option<Value>);

    /// Type-specific attributes the narrow interface does not spell out
    /// (`labelTrue`, `maxWordCount`, `swapOrder`, `allowMultiple`,
    /// `selectToRankEnabled`, `html`, `imageLink`, `rateMin`, …).
    fn property(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Human-readable rendering of a JSON value (strings unquoted).
pub(crate) fn value_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
