//! Rasterizes row draw operations into a ratatui [`Buffer`].
//!
//! One terminal cell stands for a [`CELL_WIDTH_PX`] by [`CELL_HEIGHT_PX`]
//! block of row pixels. A cell is painted when its center lies inside the
//! primitive (and its clip). Text and icons below a visibility threshold
//! are skipped since a cell cannot be partially transparent.

use crate::layout::{Point, Rect};
use crate::model::SwipeActionKind;
use crate::render::{Canvas, Color, DrawOp, IconKind, TextAlign};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::style::Color as CellColor;
use unicode_width::UnicodeWidthChar;

/// Row pixels per terminal column.
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Row pixels per terminal line.
pub const CELL_HEIGHT_PX: f32 = 18.0;

const MIN_VISIBLE_ALPHA: f32 = 0.35;
const MIN_VISIBLE_SCALE: f32 = 0.5;

const CALL_WAVE_GLYPHS: [char; 4] = ['▂', '▄', '▆', '█'];

/// Terminal cell glyph for `kind`.
pub fn icon_glyph(kind: IconKind) -> char {
    match kind {
        IconKind::Lock => '⚷',
        IconKind::Verified => '✔',
        IconKind::Premium => '★',
        IconKind::Scam => '⚠',
        IconKind::Mute => '∅',
        IconKind::Pin => '⊙',
        IconKind::Clock => '◷',
        IconKind::Check | IconKind::SecondCheck => '✓',
        IconKind::Error => '!',
        IconKind::Mention => '@',
        IconKind::Reaction => '♥',
        IconKind::CallWave(stage) => CALL_WAVE_GLYPHS[usize::from(stage) % CALL_WAVE_GLYPHS.len()],
        IconKind::SwipeAction(action) => match action {
            SwipeActionKind::Archive | SwipeActionKind::HideFolder => '▼',
            SwipeActionKind::Unarchive => '▲',
            SwipeActionKind::Mute => '∅',
            SwipeActionKind::Unmute => '♪',
            SwipeActionKind::Read => '✓',
            SwipeActionKind::Unread => '●',
            SwipeActionKind::Pin | SwipeActionKind::Unpin => '⊙',
            SwipeActionKind::Delete => '✗',
            SwipeActionKind::HidePromo => '×',
        },
    }
}

/// Stable placeholder color for an avatar image key.
pub fn avatar_color(key: &str) -> Color {
    const PALETTE: [Color; 6] = [
        Color::rgb(0xe5, 0x6a, 0x54),
        Color::rgb(0xf2, 0x8c, 0x48),
        Color::rgb(0x8e, 0x85, 0xee),
        Color::rgb(0x76, 0xc8, 0x4d),
        Color::rgb(0x5f, 0xbe, 0xd5),
        Color::rgb(0x54, 0x9c, 0xdd),
    ];
    let hash = key
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)));
    PALETTE[hash % PALETTE.len()]
}

/// [`Canvas`] writing into a region of a terminal buffer.
///
/// Pixel `(0, 0)` maps to the top-left cell of `area`; anything outside
/// `area` is dropped.
#[derive(Debug)]
pub struct TerminalCanvas<'a> {
    buf: &'a mut Buffer,
    area: CellRect,
}

impl<'a> TerminalCanvas<'a> {
    /// Canvas covering `area` of `buf`.
    pub fn new(buf: &'a mut Buffer, area: CellRect) -> Self {
        let area = area.intersection(buf.area);
        Self { buf, area }
    }

    /// Width of the region in row pixels.
    pub fn width_px(&self) -> f32 {
        f32::from(self.area.width) * CELL_WIDTH_PX
    }

    fn cell_center(&self, col: u16, line: u16) -> Point {
        Point::new(
            (f32::from(col - self.area.x) + 0.5) * CELL_WIDTH_PX,
            (f32::from(line - self.area.y) + 0.5) * CELL_HEIGHT_PX,
        )
    }

    fn cell_at(&self, p: Point) -> Option<(u16, u16)> {
        if !(p.x.is_finite() && p.y.is_finite()) || p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = (p.x / CELL_WIDTH_PX).floor();
        let line = (p.y / CELL_HEIGHT_PX).floor();
        if col >= f32::from(self.area.width) || line >= f32::from(self.area.height) {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + line as u16))
    }

    fn paint(&mut self, color: Color, alpha: f32, covers: impl Fn(Point) -> bool) {
        let area = self.area;
        for line in area.top()..area.bottom() {
            for col in area.left()..area.right() {
                if !covers(self.cell_center(col, line)) {
                    continue;
                }
                if let Some(cell) = self.buf.cell_mut((col, line)) {
                    let under = cell.bg;
                    if let Some(bg) = blend(color, alpha, under) {
                        cell.set_bg(bg);
                        cell.set_symbol(" ");
                    }
                }
            }
        }
    }

    fn put_char(&mut self, at: Point, ch: char, color: Color, clip: Option<&Rect>) {
        if clip.is_some_and(|c| !c.contains(at)) {
            return;
        }
        let Some(pos) = self.cell_at(at) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut(pos) {
            let mut utf8 = [0u8; 4];
            cell.set_symbol(ch.encode_utf8(&mut utf8));
            cell.set_fg(to_cell_color(color));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        rect: &Rect,
        text: &str,
        color: Color,
        alpha: f32,
        scale: f32,
        align: TextAlign,
        clip: Option<&Rect>,
    ) {
        if !visible(color, alpha, scale) {
            return;
        }
        let columns: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
        let width = columns as f32 * CELL_WIDTH_PX;
        let start = match align {
            TextAlign::Left => rect.x,
            TextAlign::Center => rect.center().x - width / 2.0,
            TextAlign::Right => rect.right() - width,
        };
        // Snap to a column boundary so glyphs don't straddle cells.
        let mut x = (start / CELL_WIDTH_PX).round() * CELL_WIDTH_PX;
        let y = rect.center().y;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            self.put_char(Point::new(x + CELL_WIDTH_PX / 2.0, y), ch, color, clip);
            x += w as f32 * CELL_WIDTH_PX;
        }
    }
}

impl Canvas for TerminalCanvas<'_> {
    fn draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::FillRect {
                rect, color, clip, ..
            } => {
                let bounds = clip.as_ref().map_or(*rect, |c| rect.intersect(c));
                if !bounds.is_empty() {
                    self.paint(*color, 1.0, |p| bounds.contains(p));
                }
            }
            DrawOp::FillCircle {
                center,
                radius,
                color,
                clip,
            } => {
                let (center, radius) = (*center, *radius);
                let clip = *clip;
                self.paint(*color, 1.0, |p| {
                    p.distance_to(center) <= radius && clip.is_none_or(|c| c.contains(p))
                });
            }
            DrawOp::Text {
                rect,
                text,
                color,
                alpha,
                scale,
                align,
                clip,
                ..
            } => self.text(rect, text, *color, *alpha, *scale, *align, clip.as_ref()),
            DrawOp::Icon {
                kind,
                rect,
                color,
                alpha,
                scale,
                clip,
            } => {
                if visible(*color, *alpha, *scale) {
                    self.put_char(rect.center(), icon_glyph(*kind), *color, clip.as_ref());
                }
            }
            DrawOp::Image { key, rect } => {
                let center = rect.center();
                let radius = rect.width.min(rect.height) / 2.0;
                self.paint(avatar_color(key), 1.0, |p| p.distance_to(center) <= radius);
            }
        }
    }
}

fn visible(color: Color, alpha: f32, scale: f32) -> bool {
    f32::from(color.a) / 255.0 * alpha >= MIN_VISIBLE_ALPHA && scale >= MIN_VISIBLE_SCALE
}

fn to_cell_color(color: Color) -> CellColor {
    CellColor::Rgb(color.r, color.g, color.b)
}

/// Composites `color` over the cell background. `None` when the result
/// would not change the cell.
fn blend(color: Color, alpha: f32, under: CellColor) -> Option<CellColor> {
    let a = f32::from(color.a) / 255.0 * alpha.clamp(0.0, 1.0);
    if a <= 0.01 {
        return None;
    }
    match under {
        CellColor::Rgb(r, g, b) => {
            let mix = |top: u8, bottom: u8| {
                (f32::from(top) * a + f32::from(bottom) * (1.0 - a)).round() as u8
            };
            Some(CellColor::Rgb(mix(color.r, r), mix(color.g, g), mix(color.b, b)))
        }
        _ if a >= 0.5 => Some(to_cell_color(color)),
        _ => None,
    }
}
