//! File upload. The terminal equivalent of the picker is a path prompt: the
//! user types one path (or several, `;`-separated, when `allowMultiple`) and
//! Enter runs every path through the same conversion pipeline, committing
//! `{name, type, content}` records with a base64 data URI as content.
//!
//! Unreadable paths silently drop out of the commit; when nothing could be
//! read the value is left untouched.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use serde_json::{Value, json};

use crate::i18n::MessageKey;
use crate::model::{ElementRef, adapter};

use super::{WidgetCtx, error_lines, hint_line, title_line};

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let focused = ctx.is_focused(element);
    let buffer = ctx.locals.entry(&element.name()).buffer.clone();

    let mut lines = vec![title_line(element, ctx)];

    for name in stored_names(element) {
        lines.push(Line::from(Span::styled(
            format!("  ⎙ {name}"),
            Style::default().fg(ctx.palette.accent),
        )));
    }

    let mut prompt = format!("  ▏{buffer}");
    if focused {
        prompt.push('▁');
    }
    let style = if focused {
        Style::default().fg(ctx.palette.accent)
    } else {
        Style::default()
    };
    lines.push(Line::from(Span::styled(prompt, style)));
    lines.push(hint_line(ctx.translator.text(MessageKey::FilePrompt), ctx));

    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let allow_multiple = element
        .property("allowMultiple")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let local = ctx.locals.entry(&element.name());

    match key.code {
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return false;
            }
            local.buffer.push(c);
            true
        }
        KeyCode::Backspace => {
            local.buffer.pop();
            true
        }
        KeyCode::Delete => {
            local.buffer.clear();
            adapter::set_value(element.as_ref(), None);
            true
        }
        KeyCode::Enter => {
            let paths: Vec<String> = local
                .buffer
                .split(';')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            local.buffer.clear();
            if paths.is_empty() {
                return true;
            }

            let records: Vec<Value> = paths.iter().filter_map(|p| read_record(p)).collect();
            if records.is_empty() {
                // All reads failed; degrade silently, value stays as-is.
                return true;
            }
            let value = if allow_multiple {
                Value::Array(records)
            } else {
                records.into_iter().next().unwrap_or(Value::Null)
            };
            adapter::set_value(element.as_ref(), Some(value));
            true
        }
        _ => false,
    }
}

/// One selected file as the survey-file record shape.
fn read_record(path: &str) -> Option<Value> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(path, %err, "file read failed; skipping");
            return None;
        }
    };
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let mime = mime_for(&name);
    Some(json!({
        "name": name,
        "type": mime,
        "content": format!("data:{mime};base64,{}", BASE64.encode(&bytes)),
    }))
}

fn mime_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.to_string_lossy().as_ref() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

fn stored_names(element: &ElementRef) -> Vec<String> {
    let name_of = |record: &Value| {
        record
            .get("name")
            .and_then(|n| n.as_str())
            .map(str::to_string)
    };
    match adapter::value_of(element.as_ref()) {
        Some(Value::Array(records)) => records.iter().filter_map(name_of).collect(),
        Some(record) => name_of(&record).into_iter().collect(),
        None => Vec::new(),
    }
}
