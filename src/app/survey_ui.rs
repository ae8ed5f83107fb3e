//! Root container: owns the subscription lifecycle, the UI-local state, and
//! the terminal event loop. The survey model stays the single source of
//! truth; every frame is a fresh projection of it.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use serde_json::Value;
use tracing::debug;

use crate::i18n::Translator;
use crate::model::{
    ElementRef, EventKind, Survey, SurveyRef, SurveyState, SubscriptionId, flatten_questions,
};
use crate::presentation::{self, UiContext};
use crate::render::RenderOptions;
use crate::widget::{self, ElementKind, WidgetCtx, WidgetLocals};

use super::navigation::{self, NavOutcome};
use super::options::UiOptions;
use super::terminal::TerminalGuard;
use super::validation::ValidationCoordinator;

const HELP_TEXT: &str =
    "Tab/Shift+Tab move • Ctrl+N next • Ctrl+P back • Ctrl+Q quit without finishing";

pub type CompleteCallback = Box<dyn FnMut(Value, &dyn Survey)>;

/// Entry point: wraps an externally-constructed survey model and runs the
/// terminal UI against it.
pub struct SurveyUI {
    survey: SurveyRef,
    options: UiOptions,
    on_complete: Option<CompleteCallback>,
}

impl SurveyUI {
    pub fn new(survey: SurveyRef) -> Self {
        Self {
            survey,
            options: UiOptions::default(),
            on_complete: None,
        }
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Called once with the final response data when the model completes.
    pub fn on_complete(mut self, callback: impl FnMut(Value, &dyn Survey) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Runs until completion or abandonment. Returns the response data when
    /// the survey completed, `None` when the user quit early.
    pub fn run(self) -> Result<Option<Value>> {
        let SurveyUI {
            survey,
            options,
            on_complete,
        } = self;

        let mut app = App::new(survey, options, on_complete);
        app.run()
    }
}

/// Model change flags flipped by subscription callbacks; drained once per
/// loop iteration.
#[derive(Clone, Default)]
struct Signals {
    redraw: Rc<Cell<bool>>,
    page_changed: Rc<Cell<bool>>,
    completed: Rc<Cell<bool>>,
}

/// Holds the subscription ids for the mounted lifetime; dropping it removes
/// every listener so no callback outlives the component.
struct Subscriptions {
    survey: SurveyRef,
    ids: Vec<SubscriptionId>,
}

impl Subscriptions {
    fn attach(survey: &SurveyRef, signals: &Signals) -> Self {
        let mut ids = Vec::new();

        let redraw = signals.redraw.clone();
        ids.push(survey.subscribe(
            EventKind::ValueChanged,
            Rc::new(move || redraw.set(true)),
        ));

        let redraw = signals.redraw.clone();
        let page_changed = signals.page_changed.clone();
        ids.push(survey.subscribe(
            EventKind::CurrentPageChanged,
            Rc::new(move || {
                page_changed.set(true);
                redraw.set(true);
            }),
        ));

        let redraw = signals.redraw.clone();
        let completed = signals.completed.clone();
        ids.push(survey.subscribe(
            EventKind::Completed,
            Rc::new(move || {
                completed.set(true);
                redraw.set(true);
            }),
        ));

        Self {
            survey: survey.clone(),
            ids,
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            self.survey.unsubscribe(id);
        }
    }
}

struct FocusTarget {
    element: ElementRef,
    /// Index of the top-level page element the target lives under.
    item: usize,
}

struct App {
    survey: SurveyRef,
    options: UiOptions,
    translator: Translator,
    coordinator: ValidationCoordinator,
    locals: WidgetLocals,
    signals: Signals,
    focus: usize,
    scroll_offset: usize,
    page_entered_at: Instant,
    completed_fired: bool,
    should_quit: bool,
    on_complete: Option<CompleteCallback>,
}

impl App {
    fn new(survey: SurveyRef, options: UiOptions, on_complete: Option<CompleteCallback>) -> Self {
        let translator = Translator::with_overrides(options.messages.clone());
        Self {
            survey,
            options,
            translator,
            coordinator: ValidationCoordinator::new(),
            locals: WidgetLocals::default(),
            signals: Signals::default(),
            focus: 0,
            scroll_offset: 0,
            page_entered_at: Instant::now(),
            completed_fired: false,
            should_quit: false,
            on_complete,
        }
    }

    fn run(&mut self) -> Result<Option<Value>> {
        let _subscriptions = Subscriptions::attach(&self.survey, &self.signals);
        if let Some(page) = self.survey.current_page() {
            self.coordinator.set_page(&page.name());
        }

        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            self.drain_signals();
            terminal.draw(|frame| self.draw(frame))?;

            let timeout = if self.animating() {
                Duration::from_millis(33)
            } else {
                self.options.tick_rate
            };
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        if self.completed_fired {
            Ok(Some(self.survey.data()))
        } else {
            Ok(None)
        }
    }

    fn drain_signals(&mut self) {
        self.signals.redraw.set(false);

        if self.signals.page_changed.replace(false) {
            if let Some(page) = self.survey.current_page() {
                self.coordinator.set_page(&page.name());
            }
            // Everything UI-local is page-scoped.
            self.locals.clear();
            self.focus = 0;
            self.scroll_offset = 0;
            self.page_entered_at = Instant::now();
        }

        if self.signals.completed.replace(false) && !self.completed_fired {
            self.completed_fired = true;
            debug!("survey completed");
            if let Some(callback) = self.on_complete.as_mut() {
                callback(self.survey.data(), self.survey.as_ref());
            }
        }
    }

    fn animating(&self) -> bool {
        self.options.animate
            && self.page_entered_at.elapsed() < self.options.animation_duration
            && self.survey.state() == SurveyState::Running
    }

    fn top_elements(&self) -> Vec<ElementRef> {
        self.survey
            .current_page()
            .map(|page| page.children())
            .unwrap_or_default()
    }

    /// Flat keyboard-focus order over the current page: every question,
    /// nested ones included, in page order.
    fn focus_targets(&self) -> Vec<FocusTarget> {
        let mut targets = Vec::new();
        for (item, element) in self.top_elements().iter().enumerate() {
            for question in flatten_questions(element) {
                targets.push(FocusTarget {
                    element: question,
                    item,
                });
            }
        }
        targets
    }

    fn base_options(&self) -> RenderOptions {
        RenderOptions::new(
            self.options.animate,
            self.options.animation_duration,
            self.survey.show_question_numbers(),
        )
        .with_validation_seq(self.coordinator.seq())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let palette = self.options.theme.palette();
        let targets = self.focus_targets();

        // Consume the pending focus target exactly once: the failed-attempt
        // scroll must not repeat on unrelated re-renders.
        if let Some(name) = self.coordinator.take_focus() {
            if let Some(pos) = targets
                .iter()
                .position(|target| target.element.name() == name)
            {
                self.focus = pos;
            }
        }
        if !targets.is_empty() {
            self.focus = self.focus.min(targets.len() - 1);
        }

        let focused_name = targets
            .get(self.focus)
            .map(|target| target.element.name());
        let selected_item = targets.get(self.focus).map(|target| target.item).unwrap_or(0);

        let indices = numbering_indices(&self.survey);
        let top = self.top_elements();
        let mut ctx = WidgetCtx {
            base: self.base_options(),
            translator: &self.translator,
            palette,
            width: frame.area().width,
            focused: focused_name,
            locals: &mut self.locals,
            indices: &indices,
        };
        let items = top
            .iter()
            .map(|element| widget::render_element(element, &mut ctx))
            .collect();

        let animating = self.animating();
        presentation::draw(
            frame,
            UiContext {
                survey: &self.survey,
                translator: &self.translator,
                palette,
                help: self.options.show_help.then_some(HELP_TEXT),
                animating,
                selected_item,
                scroll_offset: &mut self.scroll_offset,
                items,
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.survey.state() == SurveyState::Completed {
            if matches!(
                key.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')
            ) {
                self.should_quit = true;
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('n') => {
                    self.advance();
                    return;
                }
                KeyCode::Char('p') => {
                    navigation::go_prev(&self.survey, &mut self.coordinator);
                    return;
                }
                _ => {}
            }
        }

        // Focused widget gets first refusal on every other key.
        let targets = self.focus_targets();
        if let Some(target) = targets.get(self.focus) {
            let indices = HashMap::new();
            let mut ctx = WidgetCtx {
                base: self.base_options(),
                translator: &self.translator,
                palette: self.options.theme.palette(),
                width: 80,
                focused: Some(target.element.name()),
                locals: &mut self.locals,
                indices: &indices,
            };
            if widget::handle_key(&target.element, &key, &mut ctx) {
                return;
            }
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                if !targets.is_empty() {
                    self.focus = (self.focus + 1) % targets.len();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if !targets.is_empty() {
                    self.focus = self.focus.checked_sub(1).unwrap_or(targets.len() - 1);
                }
            }
            _ => {}
        }
    }

    /// Forward navigation: the last page completes, every other page
    /// advances. Both share the same validation gate.
    fn advance(&mut self) {
        let outcome = if self.survey.is_last_page() {
            navigation::try_complete(&self.survey, &mut self.coordinator)
        } else {
            navigation::go_next(&self.survey, &mut self.coordinator)
        };
        if outcome == NavOutcome::Blocked {
            debug!(seq = self.coordinator.seq(), "advance blocked by validation");
        }
    }
}

/// Page-local and survey-global numbering positions for every numbered
/// question. Dynamic panel templates repeat per instance and are display
/// artifacts, so their nested questions carry no number of their own.
fn numbering_indices(survey: &SurveyRef) -> HashMap<String, (i32, i32)> {
    let mut map = HashMap::new();
    let mut global = 0i32;
    for page in survey.pages() {
        let mut local = 0i32;
        for element in page.children() {
            collect_numbered(&element, &mut map, &mut local, &mut global);
        }
    }
    map
}

fn collect_numbered(
    element: &ElementRef,
    map: &mut HashMap<String, (i32, i32)>,
    local: &mut i32,
    global: &mut i32,
) {
    if element.is_question() {
        let kind = ElementKind::from_tag(&element.element_type());
        if kind.is_numbered() {
            map.insert(element.name(), (*local, *global));
            *local += 1;
            *global += 1;
        }
    }
    for child in element.children() {
        collect_numbered(&child, map, local, global);
    }
}
