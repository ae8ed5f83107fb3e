//! Widget catalog and the type-tag dispatch table.
//!
//! Every widget receives the same `(element, ctx)` pair: it re-reads live
//! model state through the adapter on each render, writes edits back through
//! the adapter's setter, and keeps anything UI-only (cursors, open flags, the
//! signature pen) in [`WidgetLocals`] owned by the root container.

mod boolean;
mod button_group;
mod choice;
mod comment;
mod dropdown;
mod file;
mod image_picker;
mod matrix;
mod multiple_text;
mod panel;
mod ranking;
mod rating;
mod signature;
mod statics;
mod tagbox;
mod text;

use std::collections::HashMap;

use crossterm::event::KeyEvent;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::i18n::Translator;
use crate::model::{ElementRef, adapter};
use crate::presentation::Palette;
use crate::render::RenderOptions;

pub use signature::Pad;

/// Closed enumeration of the element type tags this catalog understands.
///
/// Unrecognized tags map to [`ElementKind::Unknown`] and render through the
/// text widget: unknown schema must never crash the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Comment,
    Boolean,
    RadioGroup,
    Checkbox,
    Dropdown,
    Tagbox,
    ButtonGroup,
    Rating,
    ImagePicker,
    Matrix,
    Ranking,
    File,
    Signature,
    MultipleText,
    Html,
    Image,
    Expression,
    FlowPanel,
    PanelDynamic,
    Page,
    Unknown,
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => ElementKind::Text,
            "comment" => ElementKind::Comment,
            "boolean" => ElementKind::Boolean,
            "radiogroup" => ElementKind::RadioGroup,
            "checkbox" => ElementKind::Checkbox,
            "dropdown" => ElementKind::Dropdown,
            "tagbox" => ElementKind::Tagbox,
            "buttongroup" => ElementKind::ButtonGroup,
            "rating" => ElementKind::Rating,
            "imagepicker" => ElementKind::ImagePicker,
            "matrix" => ElementKind::Matrix,
            "ranking" => ElementKind::Ranking,
            "file" => ElementKind::File,
            "signaturepad" => ElementKind::Signature,
            "multipletext" => ElementKind::MultipleText,
            "html" => ElementKind::Html,
            "image" => ElementKind::Image,
            "expression" => ElementKind::Expression,
            "flowpanel" | "panel" => ElementKind::FlowPanel,
            "paneldynamic" => ElementKind::PanelDynamic,
            "page" => ElementKind::Page,
            _ => ElementKind::Unknown,
        }
    }

    /// Whether elements of this kind take part in question numbering.
    /// Static html/image blocks are presentation-only and skip it.
    pub fn is_numbered(self) -> bool {
        !matches!(self, ElementKind::Html | ElementKind::Image)
    }
}

/// Transient per-element UI state. Never persisted, never visible to the
/// model.
#[derive(Debug, Default)]
pub struct WidgetLocal {
    /// Choice cursor, active panel instance, or active sub-field.
    pub cursor: usize,
    /// Dropdown expanded.
    pub open: bool,
    /// Ranking item picked up for reordering.
    pub grabbed: bool,
    /// File widget path entry buffer.
    pub buffer: String,
    /// Signature drawing surface.
    pub pad: Option<Pad>,
}

#[derive(Debug, Default)]
pub struct WidgetLocals {
    map: HashMap<String, WidgetLocal>,
}

impl WidgetLocals {
    pub fn entry(&mut self, name: &str) -> &mut WidgetLocal {
        self.map.entry(name.to_string()).or_default()
    }

    /// Dropped wholesale on page change; nothing in here outlives a page.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

/// Everything a widget needs for one render pass or key event.
pub struct WidgetCtx<'a> {
    pub base: RenderOptions,
    pub translator: &'a Translator,
    pub palette: Palette,
    pub width: u16,
    /// Name of the element that currently owns keyboard focus.
    pub focused: Option<String>,
    pub locals: &'a mut WidgetLocals,
    /// Page-local and survey-global numbering indices per question name.
    pub indices: &'a HashMap<String, (i32, i32)>,
}

impl WidgetCtx<'_> {
    pub fn opts_for(&self, element: &ElementRef) -> RenderOptions {
        let (page, global) = self
            .indices
            .get(&element.name())
            .copied()
            .unwrap_or((-1, -1));
        self.base.with_indices(page, global)
    }

    pub fn is_focused(&self, element: &ElementRef) -> bool {
        self.focused.as_deref() == Some(element.name().as_str())
    }
}

/// Dispatch: type tag to widget. Deterministic, no hidden state; containers
/// recurse back into this function for their children.
pub fn render_element(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    // Containers can reach us without a question-ish tag; recurse defensively.
    if !element.is_question() {
        return panel::render_container(element, ctx);
    }

    match ElementKind::from_tag(&element.element_type()) {
        ElementKind::Comment => comment::render(element, ctx),
        ElementKind::Boolean => boolean::render(element, ctx),
        ElementKind::RadioGroup => choice::render(element, ctx, false),
        ElementKind::Checkbox => choice::render(element, ctx, true),
        ElementKind::Dropdown => dropdown::render(element, ctx),
        ElementKind::Tagbox => tagbox::render(element, ctx),
        ElementKind::ButtonGroup => button_group::render(element, ctx),
        ElementKind::Rating => rating::render(element, ctx),
        ElementKind::ImagePicker => image_picker::render(element, ctx),
        ElementKind::Matrix => matrix::render(element, ctx),
        ElementKind::Ranking => ranking::render(element, ctx),
        ElementKind::File => file::render(element, ctx),
        ElementKind::Signature => signature::render(element, ctx),
        ElementKind::MultipleText => multiple_text::render(element, ctx),
        ElementKind::Html => statics::render_html(element, ctx),
        ElementKind::Image => statics::render_image(element, ctx),
        ElementKind::Expression => statics::render_expression(element, ctx),
        ElementKind::FlowPanel | ElementKind::Page => panel::render_container(element, ctx),
        ElementKind::PanelDynamic => panel::render_dynamic(element, ctx),
        ElementKind::Text | ElementKind::Unknown => text::render(element, ctx),
    }
}

/// Key dispatch for the focused element. Returns `true` when the widget
/// consumed the key; unconsumed keys fall through to form navigation.
pub fn handle_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    if !element.is_question() {
        return false;
    }

    match ElementKind::from_tag(&element.element_type()) {
        ElementKind::Comment => comment::on_key(element, key, ctx),
        ElementKind::Boolean => boolean::on_key(element, key),
        ElementKind::RadioGroup => choice::on_key(element, key, ctx, false),
        ElementKind::Checkbox => choice::on_key(element, key, ctx, true),
        ElementKind::Dropdown => dropdown::on_key(element, key, ctx),
        ElementKind::Tagbox => tagbox::on_key(element, key, ctx),
        ElementKind::ButtonGroup => button_group::on_key(element, key, ctx),
        ElementKind::Rating => rating::on_key(element, key, ctx),
        ElementKind::ImagePicker => image_picker::on_key(element, key, ctx),
        ElementKind::Matrix => matrix::on_key(element, key, ctx),
        ElementKind::Ranking => ranking::on_key(element, key, ctx),
        ElementKind::File => file::on_key(element, key, ctx),
        ElementKind::Signature => signature::on_key(element, key, ctx),
        ElementKind::MultipleText => multiple_text::on_key(element, key, ctx),
        ElementKind::Html | ElementKind::Image | ElementKind::Expression => false,
        ElementKind::FlowPanel | ElementKind::Page => false,
        ElementKind::PanelDynamic => panel::on_key(element, key, ctx),
        ElementKind::Text | ElementKind::Unknown => text::on_key(element, key),
    }
}

// Shared building blocks for the catalog.

pub(crate) fn title_line(element: &ElementRef, ctx: &WidgetCtx<'_>) -> Line<'static> {
    let opts = ctx.opts_for(element);
    let mut title = adapter::display_title(element.as_ref(), &opts);
    if element.is_required() {
        title.push_str(" *");
    }
    let style = if ctx.is_focused(element) {
        Style::default()
            .fg(ctx.palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(title, style))
}

/// Error messages, shown only after a failed advance attempt on this page.
pub(crate) fn error_lines(element: &ElementRef, ctx: &WidgetCtx<'_>) -> Vec<Line<'static>> {
    if ctx.base.validation_seq == 0 {
        return Vec::new();
    }
    let width = ctx.width.saturating_sub(6).max(16) as usize;
    adapter::errors_of(element.as_ref())
        .into_iter()
        .flat_map(|message| {
            textwrap::wrap(&message, width)
                .into_iter()
                .map(|part| {
                    Line::from(Span::styled(
                        format!("  ✖ {part}"),
                        Style::default().fg(ctx.palette.error),
                    ))
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub(crate) fn hint_line(text: String, ctx: &WidgetCtx<'_>) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {text}"),
        Style::default().fg(ctx.palette.muted),
    ))
}

/// Wrapping cursor movement over a list of `len` entries.
pub(crate) fn cycle(current: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i32;
    let next = (current as i32 + delta).rem_euclid(len);
    next as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_fall_back_to_text() {
        assert_eq!(ElementKind::from_tag("holographic"), ElementKind::Unknown);
        assert_eq!(ElementKind::from_tag(""), ElementKind::Unknown);
        assert_eq!(ElementKind::from_tag("signaturepad"), ElementKind::Signature);
    }

    #[test]
    fn statics_are_not_numbered() {
        assert!(!ElementKind::Html.is_numbered());
        assert!(!ElementKind::Image.is_numbered());
        assert!(ElementKind::Expression.is_numbered());
        assert!(ElementKind::Rating.is_numbered());
    }

    #[test]
    fn cycle_wraps_both_directions() {
        assert_eq!(cycle(0, 3, -1), 2);
        assert_eq!(cycle(2, 3, 1), 0);
        assert_eq!(cycle(0, 0, 1), 0);
    }
}
