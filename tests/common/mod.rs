#![allow(dead_code)]

//! Shared fixtures: a detached fake question and a widget harness that owns
//! the borrowed halves of a render context.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;
use serde_json::{Map, Value};

use surveyui::model::{Choice, Element, ElementRef, TextItem};
use surveyui::widget::{WidgetCtx, WidgetLocals};
use surveyui::{RenderOptions, Theme, Translator};

pub struct FakeQuestion {
    pub kind: String,
    pub name: String,
    pub title: Option<String>,
    pub required: bool,
    pub choices: Vec<Choice>,
    pub items: Vec<TextItem>,
    pub rows: Vec<Choice>,
    pub columns: Vec<Choice>,
    pub errors: Vec<String>,
    pub props: Map<String, Value>,
    pub value: RefCell<Option<Value>>,
}

impl FakeQuestion {
    pub fn new(kind: &str, name: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            title: None,
            required: false,
            choices: Vec::new(),
            items: Vec::new(),
            rows: Vec::new(),
            columns: Vec::new(),
            errors: Vec::new(),
            props: Map::new(),
            value: RefCell::new(None),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_choices(mut self, values: &[&str]) -> Self {
        self.choices = values.iter().map(|v| Choice::new(*v)).collect();
        self
    }

    pub fn with_rows(mut self, values: &[&str]) -> Self {
        self.rows = values.iter().map(|v| Choice::new(*v)).collect();
        self
    }

    pub fn with_columns(mut self, values: &[&str]) -> Self {
        self.columns = values.iter().map(|v| Choice::new(*v)).collect();
        self
    }

    pub fn with_items(mut self, names: &[&str]) -> Self {
        self.items = names
            .iter()
            .map(|name| TextItem {
                name: name.to_string(),
                title: None,
            })
            .collect();
        self
    }

    pub fn with_errors(mut self, messages: &[&str]) -> Self {
        self.errors = messages.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_prop(mut self, name: &str, value: Value) -> Self {
        self.props.insert(name.to_string(), value);
        self
    }

    pub fn with_value(self, value: Value) -> Self {
        *self.value.borrow_mut() = Some(value);
        self
    }

    pub fn build(self) -> Rc<FakeQuestion> {
        Rc::new(self)
    }
}

impl Element for FakeQuestion {
    fn element_type(&self) -> String {
        self.kind.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn value(&self) -> Option<Value> {
        self.value.borrow().clone()
    }

    fn errors(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn visible_choices(&self) -> Vec<Choice> {
        self.choices.clone()
    }

    fn items(&self) -> Vec<TextItem> {
        self.items.clone()
    }

    fn visible_rows(&self) -> Vec<Choice> {
        self.rows.clone()
    }

    fn visible_columns(&self) -> Vec<Choice> {
        self.columns.clone()
    }

    fn set_value_direct(&self, value: Option<Value>) {
        *self.value.borrow_mut() = value;
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.props.get(name).cloned()
    }
}

pub fn element(question: &Rc<FakeQuestion>) -> ElementRef {
    question.clone()
}

/// Detached stand-in for a dynamic panel: the instance count lives in a
/// `Cell`, every instance an empty container.
pub struct FakePanel {
    pub name: String,
    pub count: Cell<usize>,
}

impl FakePanel {
    pub fn new(name: &str, count: usize) -> Rc<FakePanel> {
        Rc::new(Self {
            name: name.to_string(),
            count: Cell::new(count),
        })
    }
}

struct FakePanelInstance {
    name: String,
}

impl Element for FakePanelInstance {
    fn element_type(&self) -> String {
        "panel".to_string()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_question(&self) -> bool {
        false
    }

    fn set_value_direct(&self, _value: Option<Value>) {}
}

impl Element for FakePanel {
    fn element_type(&self) -> String {
        "paneldynamic".to_string()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn panels(&self) -> Vec<ElementRef> {
        (0..self.count.get())
            .map(|index| {
                Rc::new(FakePanelInstance {
                    name: format!("{}[{index}]", self.name),
                }) as ElementRef
            })
            .collect()
    }

    fn can_add_panel(&self) -> bool {
        true
    }

    fn add_panel(&self) {
        self.count.set(self.count.get() + 1);
    }

    fn remove_panel(&self, index: usize) {
        if index < self.count.get() {
            self.count.set(self.count.get() - 1);
        }
    }

    fn set_value_direct(&self, _value: Option<Value>) {}
}

/// Owns everything a `WidgetCtx` borrows so tests can mint contexts at will.
pub struct Harness {
    pub translator: Translator,
    pub locals: WidgetLocals,
    pub indices: HashMap<String, (i32, i32)>,
    pub base: RenderOptions,
    pub focused: Option<String>,
}

impl Harness {
    pub fn focused_on(question: &Rc<FakeQuestion>) -> Self {
        Self {
            translator: Translator::new(),
            locals: WidgetLocals::default(),
            indices: HashMap::new(),
            base: RenderOptions::default(),
            focused: Some(question.name.clone()),
        }
    }

    pub fn unfocused() -> Self {
        Self {
            translator: Translator::new(),
            locals: WidgetLocals::default(),
            indices: HashMap::new(),
            base: RenderOptions::default(),
            focused: None,
        }
    }

    pub fn ctx(&mut self) -> WidgetCtx<'_> {
        WidgetCtx {
            base: self.base.clone(),
            translator: &self.translator,
            palette: Theme::default().palette(),
            width: 80,
            focused: self.focused.clone(),
            locals: &mut self.locals,
            indices: &self.indices,
        }
    }
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn press(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

/// Collapses rendered lines to their plain text for assertions.
pub fn rendered_text(lines: &[Line<'_>]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect()
}
