//! Self-contained survey model for the CLI.
//!
//! The library renders whatever sits behind its `Survey`/`Element` traits; it
//! ships no engine of its own. This module is a small single-threaded engine
//! over a SurveyJS-style JSON definition: enough to store answers, run
//! required-field validation, page through, and emit change events.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use color_eyre::eyre::{Result, eyre};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use surveyui::QuestionNumbers;
use surveyui::model::{
    Choice, Element, ElementRef, EventKind, Survey, SurveyRef, SurveyState, SubscriptionId,
    TextItem,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDef {
    pub title: Option<String>,
    pub logo: Option<String>,
    #[serde(default)]
    pages: Vec<PageDef>,
    /// Single implicit page, the shorthand SurveyJS also accepts.
    #[serde(default)]
    elements: Vec<Rc<ElementDef>>,
    show_question_numbers: Option<Value>,
    #[serde(default)]
    show_page_titles: Option<bool>,
    #[serde(default)]
    show_page_numbers: Option<bool>,
    completed_html: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageDef {
    name: Option<String>,
    title: Option<String>,
    #[serde(default)]
    elements: Vec<Rc<ElementDef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementDef {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    title: Option<String>,
    #[serde(default)]
    is_required: bool,
    #[serde(default)]
    choices: Vec<Value>,
    #[serde(default)]
    rate_values: Vec<Value>,
    #[serde(default)]
    items: Vec<Value>,
    #[serde(default)]
    rows: Vec<Value>,
    #[serde(default)]
    columns: Vec<Value>,
    #[serde(default)]
    elements: Vec<Rc<ElementDef>>,
    #[serde(default)]
    template_elements: Vec<Rc<ElementDef>>,
    /// Everything the struct does not spell out stays reachable through
    /// `Element::property` (labelTrue, maxWordCount, html, rateMax, …).
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl SurveyDef {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| eyre!("invalid survey definition: {err}"))
    }
}

type Listener = (SubscriptionId, Rc<dyn Fn()>);

struct Core {
    def: SurveyDef,
    pages: Vec<Rc<PageDef>>,
    state: Cell<SurveyState>,
    page_no: Cell<usize>,
    data: RefCell<Map<String, Value>>,
    errors: RefCell<HashMap<String, Vec<String>>>,
    listeners: RefCell<HashMap<&'static str, Vec<Listener>>>,
    next_subscription: Cell<u64>,
}

impl Core {
    fn emit(&self, kind: EventKind) {
        // Snapshot before calling out so a callback may (un)subscribe.
        let callbacks: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .get(event_slot(kind))
            .map(|entries| entries.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default();
        for callback in callbacks {
            callback();
        }
    }
}

fn event_slot(kind: EventKind) -> &'static str {
    match kind {
        EventKind::ValueChanged => "value",
        EventKind::CurrentPageChanged => "page",
        EventKind::Completed => "completed",
    }
}

/// Cheap cloneable handle; every element holds one back to its survey.
#[derive(Clone)]
pub struct DemoSurvey {
    core: Rc<Core>,
}

impl DemoSurvey {
    pub fn new(mut def: SurveyDef) -> Self {
        if def.pages.is_empty() && !def.elements.is_empty() {
            def.pages.push(PageDef {
                name: Some("page1".to_string()),
                title: None,
                elements: std::mem::take(&mut def.elements),
            });
        }
        let pages = std::mem::take(&mut def.pages).into_iter().map(Rc::new).collect();
        let core = Rc::new(Core {
            def,
            pages,
            state: Cell::new(SurveyState::Running),
            page_no: Cell::new(0),
            data: RefCell::new(Map::new()),
            errors: RefCell::new(HashMap::new()),
            listeners: RefCell::new(HashMap::new()),
            next_subscription: Cell::new(1),
        });
        let survey = Self { core };
        survey.seed_panels();
        survey
    }

    pub fn handle(&self) -> SurveyRef {
        Rc::new(self.clone())
    }

    /// Dynamic panels start with one empty instance so the page is editable
    /// before the first add.
    fn seed_panels(&self) {
        for page in &self.core.pages {
            for def in &page.elements {
                seed_panels_in(def, &self.core);
            }
        }
    }

    fn validate_questions(&self, questions: &[ElementRef]) -> bool {
        let mut clear = true;
        let mut errors = self.core.errors.borrow_mut();
        for question in questions {
            let name = question.name();
            errors.remove(&name);
            if question.is_required() && is_blank(&question.value()) {
                errors.insert(name, vec!["Response required.".to_string()]);
                clear = false;
            }
        }
        clear
    }
}

fn seed_panels_in(def: &ElementDef, core: &Rc<Core>) {
    if def.kind == "paneldynamic" {
        let count = def
            .extra
            .get("panelCount")
            .and_then(Value::as_u64)
            .unwrap_or(1) as usize;
        let instances: Vec<Value> = (0..count.max(1)).map(|_| json!({})).collect();
        core.data
            .borrow_mut()
            .insert(def.name.clone(), Value::Array(instances));
    }
    for child in def.elements.iter().chain(def.template_elements.iter()) {
        seed_panels_in(child, core);
    }
}

fn is_blank(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

impl Survey for DemoSurvey {
    fn title(&self) -> Option<String> {
        self.core.def.title.clone()
    }

    fn pages(&self) -> Vec<ElementRef> {
        self.core
            .pages
            .iter()
            .map(|page| {
                Rc::new(DemoElement {
                    core: self.core.clone(),
                    node: Node::Page(page.clone()),
                }) as ElementRef
            })
            .collect()
    }

    fn current_page(&self) -> Option<ElementRef> {
        self.pages().get(self.core.page_no.get()).cloned()
    }

    fn current_page_no(&self) -> usize {
        self.core.page_no.get()
    }

    fn is_first_page(&self) -> bool {
        self.core.page_no.get() == 0
    }

    fn is_last_page(&self) -> bool {
        self.core.page_no.get() + 1 >= self.core.pages.len()
    }

    fn state(&self) -> SurveyState {
        if self.core.pages.is_empty() {
            return SurveyState::Empty;
        }
        self.core.state.get()
    }

    fn data(&self) -> Value {
        Value::Object(self.core.data.borrow().clone())
    }

    fn set_value(&self, name: &str, value: Option<Value>) {
        match value {
            Some(value) => {
                self.core.data.borrow_mut().insert(name.to_string(), value);
            }
            None => {
                self.core.data.borrow_mut().remove(name);
            }
        }
        self.core.emit(EventKind::ValueChanged);
    }

    fn validate_current_page(&self) -> Result<bool, anyhow::Error> {
        let Some(page) = self.current_page() else {
            return Ok(true);
        };
        let questions = surveyui::model::flatten_questions(&page);
        Ok(self.validate_questions(&questions))
    }

    fn next_page(&self) {
        if self.is_last_page() {
            return;
        }
        self.core.page_no.set(self.core.page_no.get() + 1);
        self.core.emit(EventKind::CurrentPageChanged);
    }

    fn prev_page(&self) {
        if self.is_first_page() {
            return;
        }
        self.core.page_no.set(self.core.page_no.get() - 1);
        self.core.emit(EventKind::CurrentPageChanged);
    }

    fn try_complete(&self) {
        self.core.state.set(SurveyState::Completed);
        self.core.emit(EventKind::Completed);
    }

    fn show_question_numbers(&self) -> QuestionNumbers {
        match self.core.def.show_question_numbers.as_ref() {
            Some(Value::String(tag)) => QuestionNumbers::from_tag(tag),
            Some(Value::Bool(true)) => QuestionNumbers::On,
            Some(Value::Bool(false)) => QuestionNumbers::Off,
            _ => QuestionNumbers::default(),
        }
    }

    fn show_page_titles(&self) -> bool {
        self.core.def.show_page_titles.unwrap_or(true)
    }

    fn show_page_numbers(&self) -> bool {
        self.core.def.show_page_numbers.unwrap_or(self.core.pages.len() > 1)
    }

    fn logo(&self) -> Option<String> {
        self.core.def.logo.clone()
    }

    fn completed_html(&self) -> Option<String> {
        self.core.def.completed_html.clone()
    }

    fn subscribe(&self, kind: EventKind, callback: Rc<dyn Fn()>) -> SubscriptionId {
        let id = SubscriptionId(self.core.next_subscription.get());
        self.core.next_subscription.set(id.0 + 1);
        self.core
            .listeners
            .borrow_mut()
            .entry(event_slot(kind))
            .or_default()
            .push((id, callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        for entries in self.core.listeners.borrow_mut().values_mut() {
            entries.retain(|(entry, _)| *entry != id);
        }
    }
}

/// Where in the tree a handle points. Dynamic panel instances and their
/// questions are synthetic nodes addressing slots of the panel's array value.
enum Node {
    Page(Rc<PageDef>),
    Plain(Rc<ElementDef>),
    PanelInstance { panel: Rc<ElementDef>, index: usize },
    Nested {
        panel: Rc<ElementDef>,
        index: usize,
        def: Rc<ElementDef>,
    },
}

struct DemoElement {
    core: Rc<Core>,
    node: Node,
}

impl DemoElement {
    fn def(&self) -> Option<&Rc<ElementDef>> {
        match &self.node {
            Node::Plain(def) | Node::Nested { def, .. } => Some(def),
            Node::PanelInstance { panel, .. } => Some(panel),
            Node::Page(_) => None,
        }
    }

    fn wrap(&self, node: Node) -> ElementRef {
        Rc::new(DemoElement {
            core: self.core.clone(),
            node,
        })
    }

    fn instance_count(&self, panel: &ElementDef) -> usize {
        self.core
            .data
            .borrow()
            .get(&panel.name)
            .and_then(Value::as_array)
            .map(|items| items.len())
            .unwrap_or(0)
    }
}

fn parse_choice(raw: &Value) -> Choice {
    match raw {
        Value::Object(map) => {
            let value = map.get("value").cloned().unwrap_or(Value::Null);
            let mut choice = Choice::new(value);
            choice.text = map
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_string);
            choice.image_link = map
                .get("imageLink")
                .and_then(Value::as_str)
                .map(str::to_string);
            choice
        }
        other => Choice::new(other.clone()),
    }
}

fn parse_item(raw: &Value) -> TextItem {
    match raw {
        Value::Object(map) => TextItem {
            name: map
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            title: map
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        Value::String(name) => TextItem {
            name: name.clone(),
            title: None,
        },
        _ => TextItem {
            name: String::new(),
            title: None,
        },
    }
}

impl Element for DemoElement {
    fn element_type(&self) -> String {
        match &self.node {
            Node::Page(_) => "page".to_string(),
            Node::PanelInstance { .. } => "panel".to_string(),
            Node::Plain(def) | Node::Nested { def, .. } => def.kind.clone(),
        }
    }

    fn name(&self) -> String {
        match &self.node {
            Node::Page(page) => page.name.clone().unwrap_or_else(|| "page".to_string()),
            Node::Plain(def) => def.name.clone(),
            Node::PanelInstance { panel, index } => format!("{}[{index}]", panel.name),
            Node::Nested { panel, index, def } => {
                format!("{}[{index}].{}", panel.name, def.name)
            }
        }
    }

    fn title(&self) -> Option<String> {
        match &self.node {
            Node::Page(page) => page.title.clone(),
            Node::PanelInstance { .. } => None,
            Node::Plain(def) | Node::Nested { def, .. } => def.title.clone(),
        }
    }

    fn is_required(&self) -> bool {
        self.def().map(|def| def.is_required).unwrap_or(false)
    }

    fn is_question(&self) -> bool {
        !matches!(
            self.element_type().as_str(),
            "page" | "panel" | "flowpanel"
        )
    }

    fn value(&self) -> Option<Value> {
        match &self.node {
            Node::Plain(def) => self.core.data.borrow().get(&def.name).cloned(),
            Node::Nested { panel, index, def } => self
                .core
                .data
                .borrow()
                .get(&panel.name)
                .and_then(Value::as_array)
                .and_then(|items| items.get(*index))
                .and_then(|slot| slot.get(&def.name))
                .cloned(),
            _ => None,
        }
    }

    fn errors(&self) -> Vec<String> {
        self.core
            .errors
            .borrow()
            .get(&self.name())
            .cloned()
            .unwrap_or_default()
    }

    fn visible_choices(&self) -> Vec<Choice> {
        self.def()
            .map(|def| def.choices.iter().map(parse_choice).collect())
            .unwrap_or_default()
    }

    fn items(&self) -> Vec<TextItem> {
        self.def()
            .map(|def| def.items.iter().map(parse_item).collect())
            .unwrap_or_default()
    }

    fn rate_values(&self) -> Vec<Choice> {
        self.def()
            .map(|def| def.rate_values.iter().map(parse_choice).collect())
            .unwrap_or_default()
    }

    fn visible_rows(&self) -> Vec<Choice> {
        self.def()
            .map(|def| def.rows.iter().map(parse_choice).collect())
            .unwrap_or_default()
    }

    fn visible_columns(&self) -> Vec<Choice> {
        self.def()
            .map(|def| def.columns.iter().map(parse_choice).collect())
            .unwrap_or_default()
    }

    fn panels(&self) -> Vec<ElementRef> {
        let Node::Plain(def) = &self.node else {
            return Vec::new();
        };
        if def.kind != "paneldynamic" {
            return Vec::new();
        }
        (0..self.instance_count(def))
            .map(|index| {
                self.wrap(Node::PanelInstance {
                    panel: def.clone(),
                    index,
                })
            })
            .collect()
    }

    fn can_add_panel(&self) -> bool {
        let Node::Plain(def) = &self.node else {
            return false;
        };
        if def.kind != "paneldynamic" {
            return false;
        }
        let max = def
            .extra
            .get("maxPanelCount")
            .and_then(Value::as_u64)
            .unwrap_or(u64::MAX) as usize;
        self.instance_count(def) < max
    }

    fn add_panel(&self) {
        let Node::Plain(def) = &self.node else {
            return;
        };
        if let Some(Value::Array(items)) = self.core.data.borrow_mut().get_mut(&def.name) {
            items.push(json!({}));
        }
        self.core.emit(EventKind::ValueChanged);
    }

    fn remove_panel(&self, index: usize) {
        let Node::Plain(def) = &self.node else {
            return;
        };
        if let Some(Value::Array(items)) = self.core.data.borrow_mut().get_mut(&def.name) {
            if index < items.len() {
                items.remove(index);
            }
        }
        self.core.emit(EventKind::ValueChanged);
    }

    fn children(&self) -> Vec<ElementRef> {
        match &self.node {
            Node::Page(page) => page
                .elements
                .iter()
                .map(|def| self.wrap(Node::Plain(def.clone())))
                .collect(),
            Node::Plain(def) if def.kind == "panel" || def.kind == "flowpanel" => def
                .elements
                .iter()
                .map(|child| self.wrap(Node::Plain(child.clone())))
                .collect(),
            Node::PanelInstance { panel, index } => panel
                .template_elements
                .iter()
                .map(|child| {
                    self.wrap(Node::Nested {
                        panel: panel.clone(),
                        index: *index,
                        def: child.clone(),
                    })
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn survey(&self) -> Option<SurveyRef> {
        // Nested questions address an array slot the flat setter cannot
        // reach, so they stay on the direct path.
        match &self.node {
            Node::Plain(_) => Some(Rc::new(DemoSurvey {
                core: self.core.clone(),
            }) as SurveyRef),
            _ => None,
        }
    }

    fn set_value_direct(&self, value: Option<Value>) {
        match &self.node {
            Node::Plain(def) => {
                let survey = DemoSurvey {
                    core: self.core.clone(),
                };
                survey.set_value(&def.name, value);
                return;
            }
            Node::Nested { panel, index, def } => {
                if let Some(Value::Array(items)) =
                    self.core.data.borrow_mut().get_mut(&panel.name)
                {
                    if let Some(Value::Object(slot)) = items.get_mut(*index) {
                        match value {
                            Some(value) => {
                                slot.insert(def.name.clone(), value);
                            }
                            None => {
                                slot.remove(&def.name);
                            }
                        }
                    }
                }
            }
            _ => return,
        }
        self.core.emit(EventKind::ValueChanged);
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.def().and_then(|def| def.extra.get(name).cloned())
    }
}
