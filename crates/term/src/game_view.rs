//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! Pure (no I/O), so layouts can be checked in tests.
//!
//! ```text
//! ┌────────────────────┐  SCORE
//! │                    │  00001234
//! │      board         │  LEVEL ...
//! └────────────────────┘
//! HOW TO PLAY
//! CONTROLS:                   SCORING:
//! ```

use crate::core::{color_of, GameSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, LINES_PER_LEVEL, LINE_SCORES};

/// Columns between the board frame and the score panel
const PANEL_GAP: u16 = 2;
/// Narrowest score panel worth drawing
const PANEL_MIN_W: u16 = 10;
/// Rows between the board frame and the help panel
const HELP_GAP: u16 = 1;
/// Title row, section headings, five entries
const HELP_ROWS: u16 = 7;
/// Offset of the SCORING column within the help panel
const HELP_SCORING_X: u16 = 28;
/// Digits shown for the score
const SCORE_DIGITS: usize = 8;

const CONTROLS: [&str; 5] = [
    "←/→ h/l a/d  move",
    "↑ k w        rotate",
    "↓ j s        soft drop +1",
    "SPACE        hard drop +2",
    "R restart    Q quit",
];

const BOARD_BG: Rgb = Rgb::new(20, 20, 28);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Screen positions of the view's parts for one viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Top-left corner of the board frame
    pub frame_x: u16,
    pub frame_y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
    /// Left edge of the score panel
    pub panel_x: u16,
    /// First row of the help panel
    pub help_y: u16,
}

/// Game-oriented terminal view.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
    show_help: bool,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 roughly squares up a cell on common terminal fonts.
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
            show_help: true,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn with_help(mut self, show_help: bool) -> Self {
        self.show_help = show_help;
        self
    }

    /// Where each part lands in `viewport`.
    pub fn layout(&self, viewport: Viewport) -> Layout {
        let frame_w = (BOARD_WIDTH as u16) * self.cell_w + 2;
        let frame_h = (BOARD_HEIGHT as u16) * self.cell_h + 2;

        let content_w = frame_w + PANEL_GAP + PANEL_MIN_W;
        let content_h = if self.show_help {
            frame_h + HELP_GAP + HELP_ROWS
        } else {
            frame_h
        };

        let frame_x = viewport.width.saturating_sub(content_w) / 2;
        let frame_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(content_h) / 2,
            AnchorY::Top => 0,
        };

        Layout {
            frame_x,
            frame_y,
            frame_w,
            frame_h,
            panel_x: frame_x + frame_w + PANEL_GAP,
            help_y: frame_y + frame_h + HELP_GAP,
        }
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Allocation-free; callers reuse one framebuffer across frames.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_banner(snap, None, viewport, fb);
    }

    /// Render, then draw `banner` centred over the board.
    pub fn render_into_with_banner(
        &self,
        snap: &GameSnapshot,
        banner: Option<&str>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let layout = self.layout(viewport);
        let (ox, oy) = (layout.frame_x, layout.frame_y);

        fb.fill_rect(
            ox + 1,
            oy + 1,
            layout.frame_w - 2,
            layout.frame_h - 2,
            ' ',
            CellStyle::new(BOARD_BG, BOARD_BG),
        );
        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        draw_border(fb, ox, oy, layout.frame_w, layout.frame_h, border);

        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let (x, y) = (x as u16, y as u16);
                match cell.kind() {
                    Some(kind) => self.draw_block(fb, ox, oy, x, y, kind),
                    None => self.draw_empty_cell(fb, ox, oy, x, y),
                }
            }
        }

        let ghost_style = CellStyle::new(color_of(snap.active.kind).fill, BOARD_BG).dim();
        for (x, y) in snap.ghost_cells() {
            if let Some((x, y)) = visible(x, y) {
                self.fill_cell_rect(fb, ox, oy, x, y, '░', ghost_style);
            }
        }

        for (x, y) in snap.active_cells() {
            if let Some((x, y)) = visible(x, y) {
                self.draw_block(fb, ox, oy, x, y, snap.active.kind);
            }
        }

        self.draw_score_panel(fb, snap, viewport, layout.panel_x, oy);
        if self.show_help {
            draw_help_panel(fb, ox, layout.help_y);
        }

        if let Some(text) = banner {
            draw_banner(fb, &layout, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        self.render_with_banner(snap, None, viewport)
    }

    pub fn render_with_banner(
        &self,
        snap: &GameSnapshot,
        banner: Option<&str>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with_banner(snap, banner, viewport, &mut fb);
        fb
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, ox: u16, oy: u16, x: u16, y: u16) {
        let style = CellStyle::new(Rgb::new(70, 70, 80), BOARD_BG).dim();
        self.fill_cell_rect(fb, ox, oy, x, y, '·', style);
    }

    /// Settled and falling cells share one look: fill shaded over border.
    fn draw_block(&self, fb: &mut FrameBuffer, ox: u16, oy: u16, x: u16, y: u16, kind: PieceKind) {
        let colors = color_of(kind);
        let style = CellStyle::new(colors.fill, colors.border).bold();
        self.fill_cell_rect(fb, ox, oy, x, y, '▓', style);
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        ox: u16,
        oy: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = ox + 1 + cell_x * self.cell_w;
        let py = oy + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_score_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        panel_x: u16,
        top: u16,
    ) {
        if viewport.width.saturating_sub(panel_x) < PANEL_MIN_W {
            return;
        }

        let label = CellStyle::new(Rgb::new(230, 230, 230), PANEL_BG).bold();
        let value = |fg: Rgb| CellStyle::new(fg, PANEL_BG);

        let mut y = top;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32_padded(
            panel_x,
            y + 1,
            snap.score,
            SCORE_DIGITS,
            value(Rgb::new(240, 220, 60)).bold(),
        );
        y += 3;

        fb.put_str(panel_x, y, "LEVEL", label);
        fb.put_u32(panel_x, y + 1, snap.level, value(Rgb::new(60, 220, 230)));
        y += 3;

        fb.put_str(panel_x, y, "LINES", label);
        fb.put_u32(panel_x, y + 1, snap.lines, value(Rgb::new(80, 220, 90)));
        y += 3;

        let info = value(Rgb::new(170, 170, 170));
        fb.put_str(panel_x, y, "PIECES", label);
        fb.put_u32(panel_x, y + 1, snap.pieces, info);
        y += 3;

        fb.put_str(panel_x, y, "SPEED", label);
        let end = fb.put_u32(panel_x, y + 1, snap.fall_interval_ms, info);
        fb.put_str(end, y + 1, "ms", info);
    }
}

fn visible(x: i8, y: i8) -> Option<(u16, u16)> {
    let on_board = (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y);
    on_board.then_some((x as u16, y as u16))
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Controls on the left, the scoring table on the right.
fn draw_help_panel(fb: &mut FrameBuffer, x: u16, top: u16) {
    let title = CellStyle::new(Rgb::new(240, 220, 60), PANEL_BG).bold();
    let heading = CellStyle::new(Rgb::new(230, 230, 230), PANEL_BG);
    let text = CellStyle::new(Rgb::new(170, 170, 170), PANEL_BG);

    fb.put_str(x, top, "HOW TO PLAY", title);
    fb.put_str(x, top + 1, "CONTROLS:", heading);
    for (i, line) in CONTROLS.iter().enumerate() {
        fb.put_str(x, top + 2 + i as u16, line, text);
    }

    let sx = x + HELP_SCORING_X;
    fb.put_str(sx, top + 1, "SCORING:", heading);
    for (lines, &base) in LINE_SCORES.iter().enumerate().skip(1) {
        let y = top + 1 + lines as u16;
        let mut cx = fb.put_u32(sx, y, lines as u32, text);
        cx = fb.put_str(cx, y, if lines == 1 { " line  " } else { " lines " }, text);
        cx = fb.put_u32(cx, y, base, text);
        fb.put_str(cx, y, " x (level+1)", text);
    }
    let y = top + 2 + (LINE_SCORES.len() - 1) as u16;
    let cx = fb.put_str(sx, y, "level up every ", text);
    let cx = fb.put_u32(cx, y, LINES_PER_LEVEL, text);
    fb.put_str(cx, y, " lines", text);
}

fn draw_banner(fb: &mut FrameBuffer, layout: &Layout, text: &str) {
    let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(150, 25, 25)).bold();
    let text_w = text.chars().count() as u16 + 2;
    let x = layout.frame_x + layout.frame_w.saturating_sub(text_w) / 2;
    let y = layout.frame_y + layout.frame_h / 2;

    fb.put_char(x, y, ' ', style);
    let end = fb.put_str(x + 1, y, text, style);
    fb.put_char(end, y, ' ', style);
}
