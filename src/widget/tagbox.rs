//! Tag selection: every choice is a toggleable chip, the value is the set of
//! selected choice values.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;

use crate::i18n::MessageKey;
use crate::model::{ElementRef, adapter};

use super::{WidgetCtx, choice::selected_set, cycle, error_lines, hint_line, title_line};

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let choices = element.visible_choices();
    let focused = ctx.is_focused(element);
    let cursor = ctx.locals.entry(&element.name()).cursor;
    let selected = selected_set(&adapter::value_of(element.as_ref()));

    let mut lines = vec![title_line(element, ctx)];
    if choices.is_empty() {
        lines.push(hint_line(ctx.translator.text(MessageKey::NoChoices), ctx));
        lines.extend(error_lines(element, ctx));
        return lines;
    }

    let mut spans = vec![Span::raw("  ")];
    for (idx, choice) in choices.iter().enumerate() {
        let active = selected.contains(&choice.value);
        let under_cursor = focused && idx == cursor;
        let mut style = if active {
            Style::default()
                .fg(ctx.palette.accent)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(ctx.palette.muted)
        };
        if under_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!(" {} ", choice.label()), style));
        spans.push(Span::raw(" "));
    }
    lines.push(Line::from(spans));

    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let choices = element.visible_choices();
    if choices.is_empty() {
        return false;
    }
    let local = ctx.locals.entry(&element.name());

    match key.code {
        KeyCode::Left => {
            local.cursor = cycle(local.cursor, choices.len(), -1);
            true
        }
        KeyCode::Right => {
            local.cursor = cycle(local.cursor, choices.len(), 1);
            true
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            let Some(choice) = choices.get(local.cursor.min(choices.len() - 1)) else {
                return false;
            };
            let mut set = selected_set(&adapter::value_of(element.as_ref()));
            if let Some(pos) = set.iter().position(|v| *v == choice.value) {
                set.remove(pos);
            } else {
                set.push(choice.value.clone());
            }
            adapter::set_value(element.as_ref(), Some(Value::Array(set)));
            true
        }
        _ => false,
    }
}
