//! Multiple single-line inputs under one question; the value is an object
//! keyed by item name. Left/Right pick the active row, typing edits it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use serde_json::{Map, Value};

use crate::model::{ElementRef, adapter};

use super::{WidgetCtx, cycle, error_lines, title_line};

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let items = element.items();
    let focused = ctx.is_focused(element);
    let cursor = ctx.locals.entry(&element.name()).cursor;
    let current = object_value(element);

    let mut lines = vec![title_line(element, ctx)];
    for (idx, item) in items.iter().enumerate() {
        let text = current
            .get(&item.name)
            .and_then(|v| v.as_str())
            .unwrap_or("");
        let active = focused && idx == cursor;
        let mut row = format!("  {}: ▏{text}", item.label());
        if active {
            row.push('▁');
        }
        let style = if active {
            Style::default().fg(ctx.palette.accent)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(row, style)));
    }

    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let items = element.items();
    if items.is_empty() {
        return false;
    }
    let local = ctx.locals.entry(&element.name());
    local.cursor = local.cursor.min(items.len() - 1);
    let item = &items[local.cursor];

    match key.code {
        KeyCode::Left => {
            local.cursor = cycle(local.cursor, items.len(), -1);
            true
        }
        KeyCode::Right => {
            local.cursor = cycle(local.cursor, items.len(), 1);
            true
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return false;
            }
            let mut text = item_text(element, &item.name);
            text.push(c);
            commit_item(element, &item.name, text);
            true
        }
        KeyCode::Backspace => {
            let mut text = item_text(element, &item.name);
            text.pop();
            commit_item(element, &item.name, text);
            true
        }
        KeyCode::Delete => {
            commit_item(element, &item.name, String::new());
            true
        }
        _ => false,
    }
}

fn object_value(element: &ElementRef) -> Map<String, Value> {
    match adapter::value_of(element.as_ref()) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn item_text(element: &ElementRef, name: &str) -> String {
    object_value(element)
        .get(name)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn commit_item(element: &ElementRef, name: &str, text: String) {
    let mut map = object_value(element);
    if text.is_empty() {
        map.remove(name);
    } else {
        map.insert(name.to_string(), Value::String(text));
    }
    let value = if map.is_empty() {
        None
    } else {
        Some(Value::Object(map))
    };
    adapter::set_value(element.as_ref(), value);
}
