//! Non-interactive elements: html blocks, images, and read-only expression
//! values. None of them take keys; html and image skip numbering entirely.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::{ElementRef, adapter};

use super::{WidgetCtx, error_lines, title_line};

pub fn render_html(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let html = element
        .property("html")
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    let width = ctx.width.saturating_sub(4).max(16) as usize;
    let text = strip_tags(&html);
    if text.trim().is_empty() {
        return vec![Line::from("")];
    }
    text.lines()
        .flat_map(|row| {
            if row.is_empty() {
                return vec![Line::from("")];
            }
            textwrap::wrap(row, width)
                .into_iter()
                .map(|part| Line::from(format!("  {part}")))
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn render_image(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let link = element
        .property("imageLink")
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    vec![Line::from(Span::styled(
        format!("  ▦ {link}"),
        Style::default().fg(ctx.palette.muted),
    ))]
}

pub fn render_expression(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let value = adapter::value_of(element.as_ref())
        .map(|v| adapter::value_text(&v))
        .unwrap_or_default();
    let mut lines = vec![
        title_line(element, ctx),
        Line::from(Span::styled(
            format!("  {value}"),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];
    lines.extend(error_lines(element, ctx));
    lines
}

/// Good-enough tag removal for the text-only terminal rendering of html
/// content; entities other than the common three are left alone.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
