//! Reorderable ranking list.
//!
//! Simple mode: the display order *is* the value — an array of every choice
//! value in rank order, written back on each reorder. Select-to-rank mode
//! splits choices into an unranked pool and a ranked list; only the ranked
//! list is ever written.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;

use crate::i18n::MessageKey;
use crate::model::{Choice, ElementRef, adapter};

use super::{WidgetCtx, cycle, error_lines, hint_line, title_line};

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let choices = element.visible_choices();
    let focused = ctx.is_focused(element);
    let local = ctx.locals.entry(&element.name());
    let cursor = local.cursor;
    let grabbed = local.grabbed && focused;

    let mut lines = vec![title_line(element, ctx)];

    if select_to_rank(element) {
        let ranked = ranked_values(element);
        let unranked = unranked_values(&choices, &ranked);

        lines.push(hint_line(ctx.translator.text(MessageKey::UnrankedArea), ctx));
        if unranked.is_empty() {
            lines.push(hint_line(ctx.translator.text(MessageKey::EmptyUnranked), ctx));
        }
        for (idx, value) in unranked.iter().enumerate() {
            lines.push(item_line(idx, cursor, focused, false, None, value, &choices, ctx));
        }

        lines.push(hint_line(ctx.translator.text(MessageKey::RankedArea), ctx));
        if ranked.is_empty() {
            lines.push(hint_line(ctx.translator.text(MessageKey::EmptyRanked), ctx));
        }
        for (idx, value) in ranked.iter().enumerate() {
            let slot = unranked.len() + idx;
            lines.push(item_line(
                slot,
                cursor,
                focused,
                grabbed && slot == cursor,
                Some(idx + 1),
                value,
                &choices,
                ctx,
            ));
        }
    } else {
        for (idx, value) in display_order(element, &choices).iter().enumerate() {
            lines.push(item_line(
                idx,
                cursor,
                focused,
                grabbed && idx == cursor,
                Some(idx + 1),
                value,
                &choices,
                ctx,
            ));
        }
    }

    lines.extend(error_lines(element, ctx));
    lines
}

#[allow(clippy::too_many_arguments)]
fn item_line(
    slot: usize,
    cursor: usize,
    focused: bool,
    grabbed: bool,
    rank: Option<usize>,
    value: &Value,
    choices: &[Choice],
    ctx: &WidgetCtx<'_>,
) -> Line<'static> {
    let label = choices
        .iter()
        .find(|c| c.value == *value)
        .map(|c| c.label())
        .unwrap_or_else(|| adapter::value_text(value));
    let pointer = if focused && slot == cursor { "»" } else { " " };
    let prefix = match rank {
        Some(n) => format!("{n}."),
        None => "·".to_string(),
    };
    let mut style = Style::default();
    if grabbed {
        style = style
            .fg(ctx.palette.accent)
            .add_modifier(Modifier::REVERSED);
    } else if focused && slot == cursor {
        style = style.fg(ctx.palette.accent);
    }
    Line::from(Span::styled(format!(" {pointer} {prefix} {label}"), style))
}

pub fn on_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    if select_to_rank(element) {
        on_key_select_to_rank(element, key, ctx)
    } else {
        on_key_simple(element, key, ctx)
    }
}

fn on_key_simple(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let choices = element.visible_choices();
    let order = display_order(element, &choices);
    if order.is_empty() {
        return false;
    }
    let local = ctx.locals.entry(&element.name());
    local.cursor = local.cursor.min(order.len() - 1);

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => {
            local.grabbed = !local.grabbed;
            true
        }
        KeyCode::Left | KeyCode::Right => {
            let delta = if key.code == KeyCode::Left { -1 } else { 1 };
            if local.grabbed {
                let from = local.cursor;
                let to = cycle(from, order.len(), delta);
                let mut next = order.clone();
                let item = next.remove(from);
                next.insert(to, item);
                local.cursor = to;
                adapter::set_value(element.as_ref(), Some(Value::Array(next)));
            } else {
                local.cursor = cycle(local.cursor, order.len(), delta);
            }
            true
        }
        _ => false,
    }
}

fn on_key_select_to_rank(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let choices = element.visible_choices();
    let ranked = ranked_values(element);
    let unranked = unranked_values(&choices, &ranked);
    let total = ranked.len() + unranked.len();
    if total == 0 {
        return false;
    }
    let local = ctx.locals.entry(&element.name());
    local.cursor = local.cursor.min(total - 1);
    let in_ranked = local.cursor >= unranked.len();

    match key.code {
        KeyCode::Char(' ') => {
            if in_ranked {
                // Click on a ranked item moves it back to the pool.
                let idx = local.cursor - unranked.len();
                let mut next = ranked.clone();
                next.remove(idx);
                local.grabbed = false;
                adapter::set_value(element.as_ref(), Some(Value::Array(next)));
            } else {
                let mut next = ranked.clone();
                next.push(unranked[local.cursor].clone());
                adapter::set_value(element.as_ref(), Some(Value::Array(next)));
            }
            true
        }
        KeyCode::Enter => {
            if in_ranked {
                local.grabbed = !local.grabbed;
            }
            true
        }
        KeyCode::Left | KeyCode::Right => {
            let delta = if key.code == KeyCode::Left { -1 } else { 1 };
            if local.grabbed && in_ranked {
                let from = local.cursor - unranked.len();
                let to = cycle(from, ranked.len(), delta);
                let mut next = ranked.clone();
                let item = next.remove(from);
                next.insert(to, item);
                local.cursor = unranked.len() + to;
                adapter::set_value(element.as_ref(), Some(Value::Array(next)));
            } else {
                local.cursor = cycle(local.cursor, total, delta);
            }
            true
        }
        _ => false,
    }
}

fn select_to_rank(element: &ElementRef) -> bool {
    element
        .property("selectToRankEnabled")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

fn ranked_values(element: &ElementRef) -> Vec<Value> {
    match adapter::value_of(element.as_ref()) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Simple mode authoritative order: current value first, then any choices the
/// value does not mention yet (deduplicated, choice order preserved).
fn display_order(element: &ElementRef, choices: &[Choice]) -> Vec<Value> {
    let mut order = ranked_values(element);
    for choice in choices {
        if !order.contains(&choice.value) {
            order.push(choice.value.clone());
        }
    }
    order
}

fn unranked_values(choices: &[Choice], ranked: &[Value]) -> Vec<Value> {
    choices
        .iter()
        .filter(|c| !ranked.contains(&c.value))
        .map(|c| c.value.clone())
        .collect()
}
