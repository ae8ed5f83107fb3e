//! Rating scale. Uses the model's `rateValues` when present, otherwise a
//! numeric scale derived from `rateMin`/`rateMax`/`rateStep`.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::json;

use crate::model::{Choice, ElementRef, adapter};

use super::{WidgetCtx, cycle, error_lines, title_line};

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let values = scale(element);
    let focused = ctx.is_focused(element);
    let cursor = ctx.locals.entry(&element.name()).cursor;
    let current = adapter::value_of(element.as_ref());

    let mut spans = vec![Span::raw("  ")];
    for (idx, choice) in values.iter().enumerate() {
        let selected = current.as_ref() == Some(&choice.value);
        let mut style = if selected {
            Style::default()
                .fg(ctx.palette.accent)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(ctx.palette.muted)
        };
        if focused && idx == cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!("⟨{}⟩", choice.label()), style));
        spans.push(Span::raw(" "));
    }

    let mut lines = vec![title_line(element, ctx), Line::from(spans)];
    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let values = scale(element);
    if values.is_empty() {
        return false;
    }
    let local = ctx.locals.entry(&element.name());

    match key.code {
        KeyCode::Left => {
            local.cursor = cycle(local.cursor, values.len(), -1);
            true
        }
        KeyCode::Right => {
            local.cursor = cycle(local.cursor, values.len(), 1);
            true
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(choice) = values.get(local.cursor.min(values.len() - 1)) {
                adapter::set_value(element.as_ref(), Some(choice.value.clone()));
            }
            true
        }
        _ => false,
    }
}

fn scale(element: &ElementRef) -> Vec<Choice> {
    let explicit = element.rate_values();
    if !explicit.is_empty() {
        return explicit;
    }

    let int_prop = |name: &str, fallback: i64| {
        element
            .property(name)
            .and_then(|v| v.as_i64())
            .unwrap_or(fallback)
    };
    let min = int_prop("rateMin", 1);
    let max = int_prop("rateMax", 5);
    let step = int_prop("rateStep", 1).max(1);

    let mut out = Vec::new();
    let mut value = min;
    while value <= max {
        out.push(Choice::new(json!(value)));
        value += step;
    }
    out
}
