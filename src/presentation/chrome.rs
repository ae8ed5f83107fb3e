//! Top-level frame: survey title and branding, page header, the question
//! list with scroll management, navigation bar, and the terminal views for
//! the loading and completed states.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::i18n::{MessageKey, Translator};
use crate::model::{NavButtonsLocation, SurveyRef, SurveyState};
use crate::presentation::Palette;

pub struct UiContext<'a> {
    pub survey: &'a SurveyRef,
    pub translator: &'a Translator,
    pub palette: Palette,
    pub help: Option<&'a str>,
    /// Fade-in still running after a page change; content renders dimmed.
    pub animating: bool,
    /// Top-level element owning the focused question, for list selection.
    pub selected_item: usize,
    pub scroll_offset: &'a mut usize,
    /// Pre-rendered widget lines, one entry per top-level page element.
    pub items: Vec<Vec<Line<'static>>>,
}

pub fn draw(frame: &mut Frame<'_>, mut ctx: UiContext<'_>) {
    let area = frame.area();

    match ctx.survey.state() {
        SurveyState::Completed => {
            draw_terminal_card(
                frame,
                area,
                ctx.palette,
                ctx.survey
                    .completed_html()
                    .unwrap_or_else(|| ctx.translator.text(MessageKey::ThanksTitle)),
                ctx.survey
                    .completed_html()
                    .map(|_| String::new())
                    .unwrap_or_else(|| ctx.translator.text(MessageKey::ThanksHint)),
            );
            return;
        }
        SurveyState::Loading => {
            let text = ctx
                .survey
                .loading_html()
                .unwrap_or_else(|| "Loading…".to_string());
            draw_terminal_card(frame, area, ctx.palette, text, String::new());
            return;
        }
        SurveyState::Running | SurveyState::Empty => {}
    }

    let location = ctx.survey.navigation_buttons_location();
    let show_nav = ctx.survey.show_navigation_buttons();
    let nav_top = show_nav
        && matches!(
            location,
            NavButtonsLocation::Top | NavButtonsLocation::TopBottom
        );
    let nav_bottom = show_nav
        && matches!(
            location,
            NavButtonsLocation::Bottom | NavButtonsLocation::TopBottom
        );

    let header_lines = header(&ctx);
    let mut constraints = vec![Constraint::Length(header_lines.len() as u16)];
    if nav_top {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(3));
    if nav_bottom {
        constraints.push(Constraint::Length(1));
    }
    if ctx.help.is_some() {
        constraints.push(Constraint::Length(1));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut slot = 0;
    frame.render_widget(Paragraph::new(header_lines), chunks[slot]);
    slot += 1;

    if nav_top {
        frame.render_widget(Paragraph::new(nav_bar(&ctx)), chunks[slot]);
        slot += 1;
    }

    draw_questions(frame, chunks[slot], &mut ctx);
    slot += 1;

    if nav_bottom {
        frame.render_widget(Paragraph::new(nav_bar(&ctx)), chunks[slot]);
        slot += 1;
    }

    if let Some(help) = ctx.help {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                help,
                Style::default().fg(ctx.palette.muted),
            ))),
            chunks[slot],
        );
    }
}

fn header(ctx: &UiContext<'_>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(logo) = ctx.survey.logo() {
        lines.push(Line::from(Span::styled(
            logo,
            Style::default().fg(ctx.palette.chrome),
        )));
    }
    if let Some(title) = ctx.survey.title() {
        lines.push(Line::from(Span::styled(
            title,
            Style::default()
                .fg(ctx.palette.chrome)
                .add_modifier(Modifier::BOLD),
        )));
    }

    let page = ctx.survey.current_page();
    if ctx.survey.show_page_titles() {
        if let Some(title) = page.as_ref().and_then(|p| p.title()) {
            if !title.is_empty() {
                lines.push(Line::from(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                )));
            }
        }
    }
    if ctx.survey.show_page_numbers() {
        let text = ctx.translator.format(
            MessageKey::PageOf,
            &[
                ("page", (ctx.survey.current_page_no() + 1).to_string()),
                ("total", ctx.survey.pages().len().to_string()),
            ],
        );
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(ctx.palette.muted),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines
}

fn nav_bar(ctx: &UiContext<'_>) -> Line<'static> {
    let mut spans = Vec::new();

    if ctx.survey.show_prev_button() {
        let back_style = if ctx.survey.is_first_page() {
            Style::default().fg(ctx.palette.muted)
        } else {
            Style::default().fg(ctx.palette.accent)
        };
        spans.push(Span::styled(
            format!("[ {} ]", ctx.translator.text(MessageKey::Back)),
            back_style,
        ));
        spans.push(Span::raw("  "));
    }

    let forward = if ctx.survey.is_last_page() {
        ctx.translator.text(MessageKey::Complete)
    } else {
        ctx.translator.text(MessageKey::Next)
    };
    spans.push(Span::styled(
        format!("[ {forward} ]"),
        Style::default()
            .fg(ctx.palette.accent)
            .add_modifier(Modifier::BOLD),
    ));

    Line::from(spans)
}

fn draw_questions(frame: &mut Frame<'_>, area: Rect, ctx: &mut UiContext<'_>) {
    if ctx.items.is_empty() {
        let placeholder = Paragraph::new("This page has no questions")
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    let mut items = Vec::with_capacity(ctx.items.len());
    for lines in &ctx.items {
        let mut lines = lines.clone();
        lines.push(Line::from(""));
        items.push(ListItem::new(lines));
    }

    let mut content_style = Style::default();
    if ctx.animating {
        // Page fade-in: dimmed until the transition window elapses.
        content_style = content_style.add_modifier(Modifier::DIM);
    }

    let mut offset = *ctx.scroll_offset;
    adjust_scroll_offset(&mut offset, ctx.selected_item, ctx.items.len(), area.height);
    *ctx.scroll_offset = offset;

    let mut state = ListState::default();
    state.select(Some(ctx.selected_item.min(ctx.items.len() - 1)));
    *state.offset_mut() = offset;

    let list = List::new(items)
        .style(content_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Keep the selected item inside the visible window, scrolling the smallest
/// amount needed (the focused question is what "scroll into view" targets).
fn adjust_scroll_offset(offset: &mut usize, selected: usize, len: usize, height: u16) {
    let window = height.saturating_sub(2).max(1) as usize;
    if len == 0 {
        *offset = 0;
        return;
    }
    let selected = selected.min(len - 1);
    if selected < *offset {
        *offset = selected;
    } else if selected >= *offset + window {
        *offset = selected + 1 - window;
    }
}

fn draw_terminal_card(
    frame: &mut Frame<'_>,
    area: Rect,
    palette: Palette,
    title: String,
    hint: String,
) {
    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    ))];
    if !hint.is_empty() {
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(palette.muted),
        )));
    }
    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::{Value, json};

    use super::*;
    use crate::model::{Element, ElementRef, EventKind, Survey, SubscriptionId};
    use crate::presentation::Theme;

    #[test]
    fn scrolls_only_when_selection_leaves_window() {
        let mut offset = 0;
        adjust_scroll_offset(&mut offset, 1, 10, 6);
        assert_eq!(offset, 0);
        adjust_scroll_offset(&mut offset, 7, 10, 6);
        assert_eq!(offset, 4);
        adjust_scroll_offset(&mut offset, 2, 10, 6);
        assert_eq!(offset, 2);
    }

    struct StubPage;

    impl Element for StubPage {
        fn element_type(&self) -> String {
            "page".into()
        }
        fn name(&self) -> String {
            "p1".into()
        }
        fn is_question(&self) -> bool {
            false
        }
        fn set_value_direct(&self, _value: Option<Value>) {}
    }

    struct StubSurvey;

    impl Survey for StubSurvey {
        fn pages(&self) -> Vec<ElementRef> {
            vec![Rc::new(StubPage) as ElementRef]
        }
        fn current_page(&self) -> Option<ElementRef> {
            self.pages().first().cloned()
        }
        fn current_page_no(&self) -> usize {
            0
        }
        fn is_first_page(&self) -> bool {
            true
        }
        fn is_last_page(&self) -> bool {
            true
        }
        fn state(&self) -> SurveyState {
            SurveyState::Running
        }
        fn data(&self) -> Value {
            json!({})
        }
        fn set_value(&self, _name: &str, _value: Option<Value>) {}
        fn validate_current_page(&self) -> anyhow::Result<bool> {
            Ok(true)
        }
        fn next_page(&self) {}
        fn prev_page(&self) {}
        fn try_complete(&self) {}
        fn subscribe(&self, _kind: EventKind, _callback: Rc<dyn Fn()>) -> SubscriptionId {
            SubscriptionId(0)
        }
        fn unsubscribe(&self, _id: SubscriptionId) {}
    }

    #[test]
    fn draw_advances_the_scroll_offset_for_offscreen_selections() {
        let survey: SurveyRef = Rc::new(StubSurvey);
        let translator = Translator::new();
        let items: Vec<Vec<Line<'static>>> = (0..10)
            .map(|i| vec![Line::from(format!("question {i}"))])
            .collect();
        let mut offset = 0usize;

        let mut terminal = Terminal::new(TestBackend::new(40, 12)).expect("terminal");
        terminal
            .draw(|frame| {
                draw(
                    frame,
                    UiContext {
                        survey: &survey,
                        translator: &translator,
                        palette: Theme::default().palette(),
                        help: None,
                        animating: false,
                        selected_item: 9,
                        scroll_offset: &mut offset,
                        items: items.clone(),
                    },
                )
            })
            .expect("draw");
        assert!(offset > 0);

        terminal
            .draw(|frame| {
                draw(
                    frame,
                    UiContext {
                        survey: &survey,
                        translator: &translator,
                        palette: Theme::default().palette(),
                        help: None,
                        animating: false,
                        selected_item: 0,
                        scroll_offset: &mut offset,
                        items: items.clone(),
                    },
                )
            })
            .expect("draw");
        assert_eq!(offset, 0);
    }
}
