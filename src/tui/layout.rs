//! # Layout Manager
//!
//! Computes window geometry from the terminal size. The screen is two
//! bordered regions stacked vertically — output on top, a fixed three-row
//! input strip below — each with a content rect inset one cell from its
//! border. All four rects are rebuilt as a unit on every geometry change;
//! there is no incremental resize, so stale geometry cannot survive a
//! resize event.
//!
//! Below the 40×10 minimum the layout is [`LayoutState::TooSmall`]: not an
//! error, just a state the caller renders a diagnostic for until the
//! terminal grows back.

use log::info;
use ratatui::layout::Rect;

pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;
pub const INPUT_HEIGHT: u16 = 3;

/// The four drawing regions, never partially valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surfaces {
    pub output_border: Rect,
    pub output: Rect,
    pub input_border: Rect,
    pub input: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    Ready(Surfaces),
    TooSmall,
}

#[derive(Debug)]
pub struct Layout {
    width: u16,
    height: u16,
    state: LayoutState,
}

impl Layout {
    pub fn new(width: u16, height: u16) -> Self {
        let state = compute(width, height);
        if matches!(state, LayoutState::TooSmall) {
            info!("initial terminal {width}x{height} below minimum {MIN_WIDTH}x{MIN_HEIGHT}");
        }
        Self {
            width,
            height,
            state,
        }
    }

    /// Rebuild the surface set for the new dimensions.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.state = compute(width, height);
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn surfaces(&self) -> Option<Surfaces> {
        match self.state {
            LayoutState::Ready(surfaces) => Some(surfaces),
            LayoutState::TooSmall => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LayoutState::Ready(_))
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }
}

fn compute(width: u16, height: u16) -> LayoutState {
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return LayoutState::TooSmall;
    }

    let output_height = height - INPUT_HEIGHT;
    let output_border = Rect::new(0, 0, width, output_height);
    let input_border = Rect::new(0, output_height, width, INPUT_HEIGHT);

    LayoutState::Ready(Surfaces {
        output_border,
        output: inset(output_border),
        input_border,
        input: inset(input_border),
    })
}

/// Content rect one cell inside the border rect. Zero-sized (and skipped
/// when drawing) when the outer region is too thin to hold content.
fn inset(outer: Rect) -> Rect {
    Rect::new(
        outer.x + 1,
        outer.y + 1,
        outer.width.saturating_sub(2),
        outer.height.saturating_sub(2),
    )
}
