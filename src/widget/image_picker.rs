//! Image picker, rendered as a labelled tile per choice. Terminals cannot
//! show the image itself, so the tile carries the label and the link.
//! `multiSelect` switches the committed value between a scalar and a set.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;

use crate::i18n::MessageKey;
use crate::model::{ElementRef, adapter};

use super::{WidgetCtx, choice::selected_set, cycle, error_lines, hint_line, title_line};

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let choices = element.visible_choices();
    let multi = is_multi(element);
    let focused = ctx.is_focused(element);
    let cursor = ctx.locals.entry(&element.name()).cursor;
    let current = adapter::value_of(element.as_ref());

    let mut lines = vec![title_line(element, ctx)];
    if choices.is_empty() {
        lines.push(hint_line(ctx.translator.text(MessageKey::NoChoices), ctx));
        lines.extend(error_lines(element, ctx));
        return lines;
    }

    for (idx, choice) in choices.iter().enumerate() {
        let selected = if multi {
            selected_set(&current).contains(&choice.value)
        } else {
            current.as_ref() == Some(&choice.value)
        };
        let pointer = if focused && idx == cursor { "»" } else { " " };
        let mark = if selected { "▣" } else { "▢" };
        let style = if selected {
            Style::default()
                .fg(ctx.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut text = format!(" {pointer} {mark} {}", choice.label());
        if let Some(link) = &choice.image_link {
            text.push_str(&format!("  ({link})"));
        }
        lines.push(Line::from(Span::styled(text, style)));
    }

    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let choices = element.visible_choices();
    if choices.is_empty() {
        return false;
    }
    let multi = is_multi(element);
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
            if multi {
                let mut set = selected_set(&adapter::value_of(element.as_ref()));
                if let Some(pos) = set.iter().position(|v| *v == choice.value) {
                    set.remove(pos);
                } else {
                    set.push(choice.value.clone());
                }
                adapter::set_value(element.as_ref(), Some(Value::Array(set)));
            } else {
                adapter::set_value(element.as_ref(), Some(choice.value.clone()));
            }
            true
        }
        _ => false,
    }
}

fn is_multi(element: &ElementRef) -> bool {
    element
        .property("multiSelect")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}
