//! Bar-chart panels for the ranked table.
//!
//! A [`Chart`] holds one [`Panel`] per character, built from contiguous
//! `top_n` blocks of a [`ResultTable`]. It renders to a standalone SVG
//! document laid out on a grid; the CLI also draws it in the terminal.

use std::fmt::Write;

use serde::Serialize;

use crate::config::{
    DEFAULT_PALETTE, DEFAULT_PANEL_COLS, DEFAULT_PANEL_ROWS, DEFAULT_TOP_N, DEFAULT_Y_AXIS_MAX,
};
use crate::table::ResultTable;

const PANEL_WIDTH: u32 = 480;
const PANEL_HEIGHT: u32 = 360;
const MARGIN_LEFT: u32 = 64;
const MARGIN_RIGHT: u32 = 24;
const MARGIN_TOP: u32 = 48;
const MARGIN_BOTTOM: u32 = 64;
/// Fraction of each category slot covered by its bar.
const BAR_FILL: f64 = 0.5;

/// Chart appearance settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    /// Upper bound of the frequency axis.
    pub y_axis_max: u32,
    /// Minimum rows of panels.
    pub rows: usize,
    /// Panels per row.
    pub cols: usize,
    /// Colors cycled per panel.
    pub palette: Vec<String>,
    /// Bars per panel.
    pub top_n: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            y_axis_max: DEFAULT_Y_AXIS_MAX,
            rows: DEFAULT_PANEL_ROWS,
            cols: DEFAULT_PANEL_COLS,
            palette: DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// One bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    /// Category label.
    pub word: String,
    /// Bar height.
    pub freq: usize,
}

/// One character's bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    /// Character name, also the legend label.
    pub character: String,
    /// Panel title.
    pub title: String,
    /// Bar color.
    pub color: String,
    /// Bars in rank order.
    pub bars: Vec<Bar>,
}

/// Color for the `index`-th panel, falling back to the default palette
/// when none is configured.
fn panel_color(palette: &[String], index: usize) -> String {
    if palette.is_empty() {
        DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].to_string()
    } else {
        palette[index % palette.len()].clone()
    }
}

/// All panels plus the style they are drawn with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    style: ChartStyle,
    panels: Vec<Panel>,
}

impl Chart {
    /// Split `table` into per-character panels.
    pub fn from_table(table: &ResultTable, style: ChartStyle) -> Self {
        let panels = table
            .blocks(style.top_n)
            .enumerate()
            .map(|(i, block)| {
                let character = block[0].role.clone();
                Panel {
                    title: format!("Top {} words used by {character}", style.top_n),
                    color: panel_color(&style.palette, i),
                    bars: block
                        .iter()
                        .map(|row| Bar {
                            word: row.word.clone(),
                            freq: row.freq,
                        })
                        .collect(),
                    character,
                }
            })
            .collect();
        Self { style, panels }
    }

    /// Panels in table order.
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// The style in use.
    pub const fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Grid size as `(rows, cols)`.
    ///
    /// Grows past the configured rows when there are more panels than cells.
    pub fn grid(&self) -> (usize, usize) {
        let cols = self.style.cols.max(1);
        let needed = self.panels.len().div_ceil(cols);
        (self.style.rows.max(needed).max(1), cols)
    }

    /// Render every panel into one SVG document.
    #[tracing::instrument(skip(self), fields(panels = self.panels.len()))]
    pub fn to_svg(&self) -> String {
        let (rows, cols) = self.grid();
        let width = PANEL_WIDTH * cols as u32;
        let height = PANEL_HEIGHT * rows as u32;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        for (i, panel) in self.panels.iter().enumerate() {
            let x = PANEL_WIDTH * (i % cols) as u32;
            let y = PANEL_HEIGHT * (i / cols) as u32;
            self.write_panel(&mut svg, panel, x, y);
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn write_panel(&self, svg: &mut String, panel: &Panel, x0: u32, y0: u32) {
        let plot_w = f64::from(PANEL_WIDTH - MARGIN_LEFT - MARGIN_RIGHT);
        let plot_h = f64::from(PANEL_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM);
        let left = f64::from(x0 + MARGIN_LEFT);
        let top = f64::from(y0 + MARGIN_TOP);
        let bottom = top + plot_h;
        let y_max = f64::from(self.style.y_axis_max);
        let scale = |v: f64| bottom - v.min(y_max) / y_max * plot_h;

        let _ = writeln!(svg, r#"<g class="panel">"#);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{}" text-anchor="middle" font-size="16">{}</text>"#,
            left + plot_w / 2.0,
            y0 + MARGIN_TOP / 2,
            escape(&panel.title),
        );

        // grid and y ticks
        let step = tick_step(self.style.y_axis_max);
        let mut tick = 0;
        while tick <= self.style.y_axis_max {
            let ty = scale(f64::from(tick));
            let _ = writeln!(
                svg,
                r##"<line x1="{left:.1}" y1="{ty:.1}" x2="{:.1}" y2="{ty:.1}" stroke="#dddddd"/>"##,
                left + plot_w,
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{tick}</text>"#,
                left - 6.0,
                ty + 4.0,
            );
            tick += step;
        }

        // bars
        let slot = plot_w / panel.bars.len().max(1) as f64;
        for (i, bar) in panel.bars.iter().enumerate() {
            let center = left + slot * (i as f64 + 0.5);
            let bar_w = slot * BAR_FILL;
            let bar_top = scale(bar.freq as f64);
            let _ = writeln!(
                svg,
                r#"<rect x="{:.1}" y="{bar_top:.1}" width="{bar_w:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>"#,
                center - bar_w / 2.0,
                bottom - bar_top,
                escape(&panel.color),
                escape(&bar.word),
                bar.freq,
            );
            let _ = writeln!(
                svg,
                r#"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
                bottom + 16.0,
                escape(&bar.word),
            );
        }

        // axes and labels
        let _ = writeln!(
            svg,
            r#"<polyline points="{left:.1},{top:.1} {left:.1},{bottom:.1} {:.1},{bottom:.1}" fill="none" stroke="black"/>"#,
            left + plot_w,
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="15">Word</text>"#,
            left + plot_w / 2.0,
            bottom + 40.0,
        );
        let _ = writeln!(
            svg,
            r#"<text transform="translate({:.1},{:.1}) rotate(-90)" text-anchor="middle" font-size="15">Frequency</text>"#,
            f64::from(x0) + 18.0,
            top + plot_h / 2.0,
        );

        // legend
        let legend_x = left + plot_w - 110.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{legend_x:.1}" y="{:.1}" width="14" height="10" fill="{}"/><text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
            top + 6.0,
            escape(&panel.color),
            legend_x + 20.0,
            top + 15.0,
            escape(&panel.character),
        );
        let _ = writeln!(svg, "</g>");
    }
}

/// Spacing between y-axis ticks, aiming for about seven intervals.
fn tick_step(y_max: u32) -> u32 {
    y_max.div_ceil(7).max(1)
}

/// Escape text for SVG/XML content and attributes.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// RGB value of a palette entry.
///
/// Accepts `#rrggbb` and the CSS color names used by the default palette
/// plus a few common ones; unknown names yield `None`.
pub fn palette_rgb(color: &str) -> Option<(u8, u8, u8)> {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some((channel(0)?, channel(2)?, channel(4)?));
    }

    let rgb = match color.to_ascii_lowercase().as_str() {
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "slateblue" => (106, 90, 205),
        "yellow" => (255, 255, 0),
        "violet" => (238, 130, 238),
        "brown" => (165, 42, 42),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "teal" => (0, 128, 128),
        "gray" | "grey" => (128, 128, 128),
        "black" => (0, 0, 0),
        _ => return None,
    };
    Some(rgb)
}
