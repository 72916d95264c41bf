//! Terminal Renderer
//!
//! Draws an engine `Snapshot` as a bar chart. The renderer only reads
//! snapshots; it never touches the engine's live state.
//!
//! Layout, top to bottom:
//! - status line (`Algorithm: <name> | Time: <t> | Running`, or the mean
//!   once finished)
//! - one line per completed run duration
//! - the array, one bar per column, scaled between 10% and 90% of the
//!   chart height

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::engine::Snapshot;

pub const BACKGROUND: Color = Color::Rgb(22, 22, 22);
pub const FOREGROUND: Color = Color::Rgb(250, 185, 45);
pub const TEXT: Color = Color::Rgb(45, 180, 250);
pub const FAULT: Color = Color::Rgb(230, 70, 70);

/// Bar height bounds as fractions of the chart height
const MIN_BAR: f64 = 0.1;
const MAX_BAR: f64 = 0.8;

/// Partial block glyphs, 1/8 to 7/8 of a cell
const PARTIAL_BLOCKS: [&str; 7] = ["▁", "▂", "▃", "▄", "▅", "▆", "▇"];
const FULL_BLOCK: &str = "█";

/// Bar chart of an engine snapshot.
pub struct ArrayChart<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> ArrayChart<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }
}

impl Widget for ArrayChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(BACKGROUND));

        // Header takes at most a third of the area
        let lines = status_lines(self.snapshot);
        let header_rows = (lines.len() as u16).min(area.height / 3);
        for (i, line) in lines.iter().take(header_rows as usize).enumerate() {
            let style = if line.starts_with("Fault:") {
                Style::default().fg(FAULT)
            } else {
                Style::default().fg(TEXT)
            };
            let text: String = line.chars().take(area.width as usize).collect();
            buf.set_string(area.x, area.y + i as u16, &text, style);
        }

        let chart = Rect::new(
            area.x,
            area.y + header_rows,
            area.width,
            area.height - header_rows,
        );
        draw_bars(&self.snapshot.array, chart, buf);
    }
}

/// Header text for a snapshot.
pub fn status_lines(snapshot: &Snapshot) -> Vec<String> {
    let mut lines = Vec::with_capacity(snapshot.history.len() + 2);
    if snapshot.running {
        lines.push(format!(
            "Algorithm: {} | Time: {:.2} | Running",
            snapshot.display_name,
            snapshot.elapsed.as_secs_f64()
        ));
    } else {
        let mean = snapshot
            .mean_duration()
            .map_or_else(|| "-".to_string(), |mean| format!("{:.2}", mean));
        lines.push(format!(
            "Algorithm: {} | Mean: {}",
            snapshot.display_name, mean
        ));
    }
    if let Some(fault) = &snapshot.fault {
        lines.push(format!("Fault: {}", fault));
    }
    lines.extend(snapshot.durations().iter().map(|t| format!("{:.2}", t)));
    lines
}

/// Every `ceil(len / columns)`-th element, so the result fits `columns`.
pub fn downsample(values: &[u32], columns: usize) -> Vec<u32> {
    if columns == 0 || values.is_empty() {
        return Vec::new();
    }
    let step = values.len().div_ceil(columns);
    values.iter().step_by(step).copied().collect()
}

/// Bar height in eighths of a cell for a chart `rows` tall.
fn bar_eighths(value: u32, max: u32, rows: u16) -> usize {
    let fraction = (value as f64 / max as f64) * MAX_BAR + MIN_BAR;
    (fraction * rows as f64 * 8.0).round() as usize
}

fn draw_bars(values: &[u32], area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let bars = downsample(values, area.width as usize);
    let Some(&max) = bars.iter().max() else {
        return;
    };
    let max = max.max(1);
    let bar_width = (area.width as usize / bars.len()).max(1);
    let style = Style::default().fg(FOREGROUND).bg(BACKGROUND);
    let bottom = area.y + area.height - 1;

    for (i, &value) in bars.iter().enumerate() {
        let mut eighths = bar_eighths(value, max, area.height);
        let mut row = 0u16;
        while eighths > 0 && row < area.height {
            let glyph = if eighths >= 8 {
                FULL_BLOCK
            } else {
                PARTIAL_BLOCKS[eighths - 1]
            };
            for dx in 0..bar_width {
                let x = area.x + (i * bar_width + dx) as u16;
                if x < area.x + area.width {
                    buf.set_string(x, bottom - row, glyph, style);
                }
            }
            eighths = eighths.saturating_sub(8);
            row += 1;
        }
    }
}

/// Clamp a requested viewport to the terminal, anchored top-left.
pub fn viewport(area: Rect, width: Option<u16>, height: Option<u16>) -> Rect {
    Rect::new(
        area.x,
        area.y,
        width.map_or(area.width, |w| w.min(area.width)),
        height.map_or(area.height, |h| h.min(area.height)),
    )
}
