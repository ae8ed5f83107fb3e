//! Containers. Flow panels (and defensively pages) recurse straight back into
//! the dispatcher for each child; dynamic panels render N repeated sub-forms
//! with add/remove and display-only sequential numbering.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::i18n::MessageKey;
use crate::model::ElementRef;

use super::{WidgetCtx, cycle, error_lines, hint_line, render_element, title_line};

pub fn render_container(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(title) = element.title() {
        if !title.is_empty() {
            lines.push(Line::from(Span::styled(
                title,
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
    }
    for child in element.children() {
        // Same opts all the way down; only numbering indices differ per child
        // and those resolve from the shared index map.
        lines.extend(render_element(&child, ctx));
    }
    lines
}

pub fn render_dynamic(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let panels = element.panels();
    let focused = ctx.is_focused(element);
    let active = ctx.locals.entry(&element.name()).cursor.min(
        panels.len().saturating_sub(1),
    );

    let mut lines = vec![title_line(element, ctx)];

    for (idx, panel) in panels.iter().enumerate() {
        // Numbering is a display artifact: always sequential 1..N, re-numbered
        // after removals. Panel identity lives in the model, not here.
        let header = ctx
            .translator
            .format(MessageKey::Item, &[("index", (idx + 1).to_string())]);
        let marker = if focused && idx == active { "»" } else { " " };
        lines.push(Line::from(Span::styled(
            format!(" {marker} {header}"),
            Style::default()
                .fg(ctx.palette.accent)
                .add_modifier(Modifier::BOLD),
        )));
        for child in panel.children() {
            lines.extend(render_element(&child, ctx));
        }
    }

    if element.can_add_panel() {
        let add = ctx.translator.text(MessageKey::AddItem);
        let remove = ctx.translator.text(MessageKey::RemoveItem);
        lines.push(hint_line(format!("a: {add} • x: {remove}"), ctx));
    }

    lines.extend(error_lines(element, ctx));
    lines
}

/// Keys for the dynamic panel element itself (child questions receive their
/// own focus and never route here).
pub fn on_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let panels = element.panels();
    let local = ctx.locals.entry(&element.name());

    match key.code {
        KeyCode::Char('a') => {
            if element.can_add_panel() {
                element.add_panel();
            }
            true
        }
        KeyCode::Char('x') | KeyCode::Char('d') => {
            if !panels.is_empty() {
                let index = local.cursor.min(panels.len() - 1);
                element.remove_panel(index);
                local.cursor = local.cursor.min(panels.len().saturating_sub(2));
            }
            true
        }
        KeyCode::Left => {
            local.cursor = cycle(local.cursor, panels.len(), -1);
            true
        }
        KeyCode::Right => {
            local.cursor = cycle(local.cursor, panels.len(), 1);
            true
        }
        _ => false,
    }
}
