//! Single-line text input. Also the deliberate fallback for unknown element
//! types, so it has to tolerate any value shape the model hands it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::model::{ElementRef, adapter};

use super::{WidgetCtx, error_lines, title_line};

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let current = current_text(element);
    let focused = ctx.is_focused(element);

    // Long values scroll horizontally: the tail is where the caret is.
    let visible = visible_tail(&current, ctx.width.saturating_sub(8) as usize);
    let mut field = format!("  ▏{visible}");
    if focused {
        field.push('▁');
    }
    let style = if focused {
        Style::default().fg(ctx.palette.accent)
    } else {
        Style::default()
    };

    let mut lines = vec![title_line(element, ctx), Line::from(Span::styled(field, style))];
    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent) -> bool {
    let mut text = current_text(element);
    match key.code {
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return false;
            }
            text.push(c);
        }
        KeyCode::Backspace => {
            text.pop();
        }
        KeyCode::Delete => text.clear(),
        _ => return false,
    }
    commit(element, text);
    true
}

pub(super) fn current_text(element: &ElementRef) -> String {
    match adapter::value_of(element.as_ref()) {
        Some(Value::String(text)) => text,
        Some(other) => adapter::value_text(&other),
        None => String::new(),
    }
}

pub(super) fn commit(element: &ElementRef, text: String) {
    let value = if text.is_empty() {
        None
    } else {
        Some(Value::String(text))
    };
    adapter::set_value(element.as_ref(), value);
}

/// Longest suffix of `text` that fits in `max` display columns.
fn visible_tail(text: &str, max: usize) -> &str {
    let max = max.max(4);
    if text.width() <= max {
        return text;
    }
    let mut start = 0;
    for (idx, _) in text.char_indices() {
        if text[idx..].width() <= max {
            start = idx;
            break;
        }
    }
    &text[start..]
}

#[cfg(test)]
mod tests {
    use super::visible_tail;

    #[test]
    fn tail_keeps_short_values_whole() {
        assert_eq!(visible_tail("hello", 20), "hello");
    }

    #[test]
    fn tail_trims_from_the_front() {
        assert_eq!(visible_tail("abcdefgh", 4), "efgh");
        // Wide glyphs count double.
        assert_eq!(visible_tail("日本語のテキスト", 6), "キスト");
    }
}
