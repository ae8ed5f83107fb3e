//! Signature capture on a cell grid.
//!
//! The pen moves with the arrow keys and paints while lowered; Space lifts or
//! lowers it. The value is committed only on pen-up — a rasterized data URI of
//! the surface — never continuously while drawing. Clear resets both the
//! surface and the value.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use serde_json::Value;

use crate::i18n::MessageKey;
use crate::model::{ElementRef, adapter};

use super::{WidgetCtx, error_lines, hint_line, title_line};

const PAD_WIDTH: usize = 48;
const PAD_HEIGHT: usize = 8;
const MIN_WIDTH: usize = 8;

/// The drawing surface. UI-local; the model only ever sees the rasterized
/// data URI committed on pen-up.
#[derive(Debug, Clone)]
pub struct Pad {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    pen: (usize, usize),
    pen_down: bool,
}

impl Pad {
    pub fn new(width: usize, height: usize) -> Option<Self> {
        if width < MIN_WIDTH || height == 0 {
            // Surface unavailable; drawing is disabled rather than failing.
            return None;
        }
        Some(Self {
            width,
            height,
            cells: vec![false; width * height],
            pen: (width / 2, height / 2),
            pen_down: false,
        })
    }

    fn plot(&mut self) {
        let (x, y) = self.pen;
        self.cells[y * self.width + x] = true;
    }

    fn step(&mut self, dx: i32, dy: i32) {
        let x = (self.pen.0 as i32 + dx).clamp(0, self.width as i32 - 1) as usize;
        let y = (self.pen.1 as i32 + dy).clamp(0, self.height as i32 - 1) as usize;
        self.pen = (x, y);
        if self.pen_down {
            self.plot();
        }
    }

    fn clear(&mut self) {
        self.cells.fill(false);
        self.pen_down = false;
    }

    fn is_blank(&self) -> bool {
        !self.cells.iter().any(|c| *c)
    }

    /// Plain-text PBM raster wrapped in a data URI.
    fn to_data_uri(&self) -> String {
        let mut pbm = format!("P1\n{} {}\n", self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                pbm.push(if self.cells[y * self.width + x] { '1' } else { '0' });
                pbm.push(if x + 1 == self.width { '\n' } else { ' ' });
            }
        }
        format!(
            "data:image/x-portable-bitmap;base64,{}",
            BASE64.encode(pbm.as_bytes())
        )
    }
}

pub fn render(element: &ElementRef, ctx: &mut WidgetCtx<'_>) -> Vec<Line<'static>> {
    let focused = ctx.is_focused(element);
    let width = (ctx.width.saturating_sub(6) as usize).min(PAD_WIDTH);
    let accent = ctx.palette.accent;
    let muted = ctx.palette.muted;
    let hint = ctx.translator.text(MessageKey::SignatureHint);
    let clear_label = ctx.translator.text(MessageKey::ClearSignature);
    let local = ctx.locals.entry(&element.name());
    if local.pad.is_none() {
        local.pad = Pad::new(width, PAD_HEIGHT);
    }

    let mut lines = vec![title_line(element, ctx)];
    let pad_view = ctx.locals.entry(&element.name()).pad.clone();
    match &pad_view {
        Some(pad) => {
            for y in 0..pad.height {
                let mut row = String::from("  ");
                for x in 0..pad.width {
                    let here = pad.pen == (x, y) && focused;
                    let inked = pad.cells[y * pad.width + x];
                    row.push(match (here, inked) {
                        (true, _) if pad.pen_down => '█',
                        (true, _) => '┼',
                        (false, true) => '▪',
                        (false, false) => '·',
                    });
                }
                lines.push(Line::from(Span::styled(
                    row,
                    Style::default().fg(if focused { accent } else { muted }),
                )));
            }
            lines.push(hint_line(format!("{hint} • c: {clear_label}"), ctx));
        }
        // Too narrow to draw; the widget stays visible but inert.
        None => lines.push(hint_line(clear_label, ctx)),
    }

    lines.extend(error_lines(element, ctx));
    lines
}

pub fn on_key(element: &ElementRef, key: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
    let local = ctx.locals.entry(&element.name());
    let Some(pad) = local.pad.as_mut() else {
        return false;
    };

    match key.code {
        KeyCode::Left => {
            pad.step(-1, 0);
            true
        }
        KeyCode::Right => {
            pad.step(1, 0);
            true
        }
        KeyCode::Up => {
            pad.step(0, -1);
            true
        }
        KeyCode::Down => {
            pad.step(0, 1);
            true
        }
        KeyCode::Char(' ') => {
            if pad.pen_down {
                // Pointer release: commit the raster once.
                pad.pen_down = false;
                if !pad.is_blank() {
                    let uri = pad.to_data_uri();
                    adapter::set_value(element.as_ref(), Some(Value::String(uri)));
                }
            } else {
                pad.pen_down = true;
                pad.plot();
            }
            true
        }
        KeyCode::Char('c') => {
            pad.clear();
            adapter::set_value(element.as_ref(), None);
            true
        }
        _ => false,
    }
}
