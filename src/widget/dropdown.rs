//! Dropdown with UI-local open/closed state. The expanded list renders inline
//! under the field; while open, Up/Down and Enter belong to the widget.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::i18n::MessageKey;
use crate::model::{ElementRef, adapter};

use super::{WidgetCtx, cycle, error_lines, title_line};

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let choices = element.visible_choices();
    let focused = ctx.is_focused(element);
    let placeholder = ctx.translator.text(MessageKey::SelectPlaceholder);
    let current = adapter::value_of(element.as_ref());
    let local = ctx.locals.entry(&element.name());
    let open = local.open && focused;
    let cursor = local.cursor;

    let label = current
        .as_ref()
        .and_then(|value| {
            choices
                .iter()
                .find(|choice| choice.value == *value)
                .map(|choice| choice.label())
                .or_else(|| Some(adapter::value_text(value)))
        })
        .unwrap_or_else(|| placeholder.clone());

    let arrow = if open { "▴" } else { "▾" };
    let style = if focused {
        Style::default().fg(ctx.palette.accent)
    } else {
        Style::default()
    };

    let mut lines = vec![
        title_line(element, ctx),
        Line::from(Span::styled(format!("  {arrow} {label}"), style)),
    ];

    if open {
        // Row 0 clears the value, mirroring the placeholder entry.
        let mut rows = vec![placeholder];
        rows.extend(choices.iter().map(|choice| choice.label()));
        for (idx, row) in rows.into_iter().enumerate() {
            let style = if idx == cursor {
                Style::default()
                    .fg(ctx.palette.accent)
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(ctx.palette.muted)
            };
            lines.push(Line::from(Span::styled(format!("    {row}"), style)));
        }
    }

    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let choices = element.visible_choices();
    let current = adapter::value_of(element.as_ref());
    let local = ctx.locals.entry(&element.name());
    let rows = choices.len() + 1;

    if !local.open {
        return match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                local.open = true;
                local.cursor = current
                    .as_ref()
                    .and_then(|value| choices.iter().position(|c| c.value == *value))
                    .map(|idx| idx + 1)
                    .unwrap_or(0);
                true
            }
            _ => false,
        };
    }

    match key.code {
        KeyCode::Up => {
            local.cursor = cycle(local.cursor, rows, -1);
            true
        }
        KeyCode::Down => {
            local.cursor = cycle(local.cursor, rows, 1);
            true
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let picked = local.cursor;
            local.open = false;
            if picked == 0 {
                adapter::set_value(element.as_ref(), None);
            } else if let Some(choice) = choices.get(picked - 1) {
                adapter::set_value(element.as_ref(), Some(choice.value.clone()));
            }
            true
        }
        KeyCode::Esc => {
            local.open = false;
            true
        }
        _ => false,
    }
}
