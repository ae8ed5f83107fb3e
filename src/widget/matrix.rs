//! Single-choice matrix: one radio cell per (row, column), the value an
//! object keyed by row value. The cursor walks the grid as a flat index so
//! Up/Down change the row and Left/Right the column.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::{Map, Value};

use crate::i18n::MessageKey;
use crate::model::{Choice, ElementRef, adapter};

use super::{WidgetCtx, cycle, error_lines, hint_line, title_line};

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let rows = element.visible_rows();
    let columns = element.visible_columns();
    let focused = ctx.is_focused(element);
    let cursor = ctx.locals.entry(&element.name()).cursor;
    let current = object_value(element);

    let mut lines = vec![title_line(element, ctx)];
    if rows.is_empty() || columns.is_empty() {
        lines.push(hint_line(ctx.translator.text(MessageKey::NoChoices), ctx));
        lines.extend(error_lines(element, ctx));
        return lines;
    }

    let (active_row, active_col) = split_cursor(cursor, rows.len(), columns.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let picked = current.get(&row_key(row)).cloned();
        let pointer = if focused && row_idx == active_row {
            "»"
        } else {
            " "
        };
        let mut spans = vec![Span::styled(
            format!(" {pointer} {}: ", row.label()),
            Style::default(),
        )];
        for (col_idx, column) in columns.iter().enumerate() {
            let selected = picked.as_ref() == Some(&column.value);
            let mark = if selected { "(•)" } else { "( )" };
            let mut style = if selected {
                Style::default()
                    .fg(ctx.palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(ctx.palette.muted)
            };
            if focused && row_idx == active_row && col_idx == active_col {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(format!("{mark} {}", column.label()), style));
            spans.push(Span::raw("  "));
        }
        lines.push(Line::from(spans));
    }

    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let rows = element.visible_rows();
    let columns = element.visible_columns();
    if rows.is_empty() || columns.is_empty() {
        return false;
    }
    let local = ctx.locals.entry(&element.name());
    local.cursor = local.cursor.min(rows.len() * columns.len() - 1);
    let (row, col) = split_cursor(local.cursor, rows.len(), columns.len());

    match key.code {
        KeyCode::Left => {
            local.cursor = row * columns.len() + cycle(col, columns.len(), -1);
            true
        }
        KeyCode::Right => {
            local.cursor = row * columns.len() + cycle(col, columns.len(), 1);
            true
        }
        KeyCode::Up => {
            local.cursor = cycle(row, rows.len(), -1) * columns.len() + col;
            true
        }
        KeyCode::Down => {
            local.cursor = cycle(row, rows.len(), 1) * columns.len() + col;
            true
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            let mut map = object_value(element);
            map.insert(row_key(&rows[row]), columns[col].value.clone());
            adapter::set_value(element.as_ref(), Some(Value::Object(map)));
            true
        }
        _ => false,
    }
}

fn split_cursor(cursor: usize, rows: usize, columns: usize) -> (usize, usize) {
    let cursor = cursor.min(rows * columns - 1);
    (cursor / columns, cursor % columns)
}

/// Object keys are the row values, stringified the way the model stores them.
fn row_key(row: &Choice) -> String {
    adapter::value_text(&row.value)
}

fn object_value(element: &ElementRef) -> Map<String, Value> {
    match adapter::value_of(element.as_ref()) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
