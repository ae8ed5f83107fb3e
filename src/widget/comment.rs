//! Long-text input with a word budget.
//!
//! The limit clamps on input: when an edit would exceed `maxWordCount`, the
//! committed value is the first N whitespace-tokenized words joined by single
//! spaces plus a trailing space — never the full typed content.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::i18n::MessageKey;
use crate::model::ElementRef;

use super::{WidgetCtx, error_lines, text, title_line};

const DEFAULT_MAX_WORDS: usize = 200;

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let raw = text::current_text(element);
    let focused = ctx.is_focused(element);
    let style = if focused {
        Style::default().fg(ctx.palette.accent)
    } else {
        Style::default()
    };

    let mut lines = vec![title_line(element, ctx)];
    let rows: Vec<&str> = if raw.is_empty() {
        vec![""]
    } else {
        raw.split('\n').collect()
    };
    for (idx, row) in rows.iter().enumerate() {
        let mut body = format!("  ▏{row}");
        if focused && idx == rows.len() - 1 {
            body.push('▁');
        }
        lines.push(Line::from(Span::styled(body, style)));
    }

    let max = max_words(element);
    let count = word_count(&raw);
    let near_limit = count * 10 >= max * 9;
    let counter_style = if near_limit {
        Style::default().fg(ctx.palette.error)
    } else {
        Style::default().fg(ctx.palette.muted)
    };
    lines.push(Line::from(Span::styled(
        format!(
            "  {}",
            ctx.translator.format(
                MessageKey::WordCount,
                &[("count", count.to_string()), ("max", max.to_string())],
            )
        ),
        counter_style,
    )));

    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent, _ctx: &mut WidgetCtx<'_>) -> bool {
    let mut next = text::current_text(element);
    match key.code {
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return false;
            }
            next.push(c);
        }
        KeyCode::Enter => next.push('\n'),
        KeyCode::Backspace => {
            next.pop();
        }
        KeyCode::Delete => next.clear(),
        _ => return false,
    }
    text::commit(element, clamp_words(&next, max_words(element)));
    true
}

fn max_words(element: &ElementRef) -> usize {
    element
        .property("maxWordCount")
        .or_else(|| element.property("maxWords"))
        .and_then(|value| value.as_u64())
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_MAX_WORDS)
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First `max` words plus a trailing space when the input overflows;
/// the input unchanged otherwise.
pub(crate) fn clamp_words(text: &str, max: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max {
        return text.to_string();
    }
    let mut clamped = words[..max].join(" ");
    clamped.push(' ');
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_limit_passes_through_untouched() {
        assert_eq!(clamp_words("one  two\nthree", 5), "one  two\nthree");
    }

    #[test]
    fn over_limit_keeps_first_n_words_with_trailing_space() {
        assert_eq!(clamp_words("a b c d", 2), "a b ");
    }

    #[test]
    fn clamped_output_never_exceeds_limit() {
        for input in ["", "x", "a b c d e f g", "  lots\t of   gaps  here  "] {
            for max in [0usize, 1, 3, 10] {
                let out = clamp_words(input, max);
                if word_count(input) <= max {
                    assert_eq!(out, input);
                } else {
                    assert_eq!(word_count(&out), max);
                }
            }
        }
    }
}
