//! Progress spinner widget
//!
//! Advanced by the UI tick, so it animates at the tick rate.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// A single-line spinner with an optional label, centered in its area
pub struct Spinner<'a> {
    tick: usize,
    label: Option<&'a str>,
    style: Style,
}

impl<'a> Spinner<'a> {
    pub fn new(tick: usize) -> Self {
        Self {
            tick,
            label: None,
            style: Style::default().fg(Color::LightBlue),
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }
}

/// Spinner glyph for a tick
pub fn frame(tick: usize) -> char {
    FRAMES[tick % FRAMES.len()]
}

impl<'a> Widget for Spinner<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let text = match self.label {
            Some(label) => format!("{} {}", frame(self.tick), label),
            None => frame(self.tick).to_string(),
        };
        let width = text.chars().count().min(area.width as usize) as u16;
        let x = area.x + (area.width - width) / 2;
        buf.set_stringn(x, area.y, &text, area.width as usize, self.style);
    }
}
