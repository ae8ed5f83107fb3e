//! Two-state toggle with optional custom labels, values, and display order.
//!
//! `swapOrder` rearranges the layout only: the "true" option always commits
//! the `valueTrue` equivalent no matter which side it renders on.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;

use crate::model::{ElementRef, adapter};

use super::{WidgetCtx, error_lines, title_line};

struct Toggle {
    label_true: String,
    label_false: String,
    value_true: Value,
    value_false: Value,
    swap_order: bool,
}

impl Toggle {
    fn of(element: &ElementRef) -> Self {
        let text_prop = |name: &str| {
            element
                .property(name)
                .and_then(|v| v.as_str().map(str::to_string))
        };
        Self {
            label_true: text_prop("labelTrue").unwrap_or_else(|| "Yes".to_string()),
            label_false: text_prop("labelFalse").unwrap_or_else(|| "No".to_string()),
            value_true: element.property("valueTrue").unwrap_or(Value::Bool(true)),
            value_false: element.property("valueFalse").unwrap_or(Value::Bool(false)),
            swap_order: element
                .property("swapOrder")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        }
    }

    /// `Some(true)` when the model currently holds the true-equivalent.
    fn selection(&self, current: Option<&Value>) -> Option<bool> {
        match current {
            Some(v) if *v == self.value_true => Some(true),
            Some(v) if *v == self.value_false => Some(false),
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let toggle = Toggle::of(element);
    let current = adapter::value_of(element.as_ref());
    let selection = toggle.selection(current.as_ref());

    // Layout order is display-only.
    let (left, right) = if toggle.swap_order {
        ((true, &toggle.label_true), (false, &toggle.label_false))
    } else {
        ((false, &toggle.label_false), (true, &toggle.label_true))
    };

    let mut spans = vec![Span::raw("  ")];
    for (truthy, label) in [left, right] {
        let chosen = selection == Some(truthy);
        let style = if chosen {
            Style::default()
                .fg(ctx.palette.accent)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(ctx.palette.muted)
        };
        spans.push(Span::styled(format!("[ {label} ]"), style));
        spans.push(Span::raw(" "));
    }

    let mut lines = vec![title_line(element, ctx), Line::from(spans)];
    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent) -> bool {
    let toggle = Toggle::of(element);
    let current = adapter::value_of(element.as_ref());
    let selection = toggle.selection(current.as_ref());

    let pick = |truthy: bool| {
        let value = if truthy {
            toggle.value_true.clone()
        } else {
            toggle.value_false.clone()
        };
        adapter::set_value(element.as_ref(), Some(value));
    };

    match key.code {
        // Left/Right address the displayed side; swap changes sides, not values.
        KeyCode::Left => {
            pick(toggle.swap_order);
            true
        }
        KeyCode::Right => {
            pick(!toggle.swap_order);
            true
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            pick(!selection.unwrap_or(false));
            true
        }
        _ => false,
    }
}
