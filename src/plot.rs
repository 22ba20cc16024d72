//! Frame composition: turns the sample history into renderer calls.
//!
//! Layout, for a viewport of `rows` x `cols`:
//!
//! | Row          | Content                                              |
//! |--------------|------------------------------------------------------|
//! | `0`          | title (centered), status message (right)             |
//! | `1..rows-3`  | plot area, `rows-4` rows high, columns `3..cols-1`   |
//! | `rows-3`     | horizontal axis                                      |
//! | `rows-2`     | series 1 statistics, clock (right)                   |
//! | `rows-1`     | series 2 statistics, version (right)                 |

use std::io;
use std::time::Duration;

use crate::config::PlotConfig;
use crate::data::{AxisWindow, Classification, Extent, SampleStore, Series, Statistics};
use crate::render::{AxisSpec, CellStyle, Renderer, Viewport};

/// Smallest viewport the chart is drawn in.
pub const MIN_ROWS: u16 = 8;
pub const MIN_COLS: u16 = 24;

/// Columns taken by the axis and its margins.
pub const MARGIN_COLS: u16 = 4;
/// Rows taken by the title, axis and statistics lines.
pub const MARGIN_ROWS: u16 = 4;

/// First column of the plot area.
const PLOT_COL: u16 = 3;
const AXIS_COL: u16 = 2;
const LABEL_COL: u16 = 4;
const LEGEND_COL: u16 = 5;
const STATS_COL: u16 = 7;

pub const VERSION_STRING: &str = concat!("ttyplot ", env!("CARGO_PKG_VERSION"));

const WAITING_MESSAGE: &str = "waiting for data from stdin";
const TOO_SMALL_MESSAGE: &str = "window too small";

/// History columns needed for a viewport.
pub fn plot_capacity(viewport: Viewport) -> usize {
    viewport.cols.saturating_sub(MARGIN_COLS) as usize
}

pub fn is_too_small(viewport: Viewport) -> bool {
    viewport.rows < MIN_ROWS || viewport.cols < MIN_COLS
}

/// Everything that ends up on screen, borrowed from the event loop.
pub struct FrameInfo<'a> {
    pub config: &'a PlotConfig,
    pub store: &'a SampleStore,
    pub rate_mode: bool,
    /// Sampling interval shown in rate mode.
    pub interval: Option<Duration>,
    /// Persistent status such as "input closed".
    pub status: Option<&'a str>,
    /// Pre-formatted wall clock.
    pub clock: &'a str,
}

/// Draw one complete frame and flush it.
pub fn draw_frame<R: Renderer>(
    r: &mut R,
    viewport: Viewport,
    frame: &FrameInfo<'_>,
) -> io::Result<()> {
    r.clear()?;
    if is_too_small(viewport) {
        draw_centered(r, viewport, viewport.rows / 2, TOO_SMALL_MESSAGE)?;
        return r.flush();
    }

    if frame.store.total_written() == 0 {
        draw_centered(r, viewport, viewport.rows / 2, WAITING_MESSAGE)?;
    } else {
        draw_chart(r, viewport, frame)?;
    }
    draw_header(r, viewport, frame)?;
    r.flush()
}

fn draw_chart<R: Renderer>(r: &mut R, vp: Viewport, frame: &FrameInfo<'_>) -> io::Result<()> {
    let cfg = frame.config;
    let plot_height = vp.rows - MARGIN_ROWS;
    let columns = plot_capacity(vp).min(frame.store.capacity());
    let window = cfg.limits.window(frame.store.observed_range());

    draw_series(r, plot_height, columns, &window, frame)?;

    r.draw_axis(&AxisSpec {
        origin_row: vp.rows - 3,
        origin_col: AXIS_COL,
        width: columns as u16,
        height: plot_height,
    })?;
    if labels_fit(&window) {
        draw_labels(r, plot_height, &window, &cfg.unit)?;
    }

    let plot_char = cfg.effective_plot_char();
    r.draw_vertical_run(vp.rows - 2, LEGEND_COL, 1, plot_char, CellStyle::NORMAL)?;
    let mut line = stats_line(
        frame.store.value_at(Series::First, 0),
        frame.store.statistics(Series::First),
        &cfg.unit,
    );
    if frame.rate_mode {
        if let Some(dt) = frame.interval {
            line.push_str(&format!(" interval={:.3}s", dt.as_secs_f64()));
        }
    }
    r.draw_text(vp.rows - 2, STATS_COL, &line)?;

    if frame.store.is_two_series() {
        r.draw_vertical_run(vp.rows - 1, LEGEND_COL, 1, ' ', CellStyle::REVERSE)?;
        let line = stats_line(
            frame.store.value_at(Series::Second, 0),
            frame.store.statistics(Series::Second),
            &cfg.unit,
        );
        r.draw_text(vp.rows - 1, STATS_COL, &line)?;
    }

    draw_right(r, vp, vp.rows - 2, frame.clock)?;
    draw_right(r, vp, vp.rows - 1, VERSION_STRING)
}

fn draw_series<R: Renderer>(
    r: &mut R,
    plot_height: u16,
    columns: usize,
    window: &AxisWindow,
    frame: &FrameInfo<'_>,
) -> io::Result<()> {
    let limits = &frame.config.limits;
    let ph = plot_height as usize;
    let map = |which: Series| -> Vec<Extent> {
        match frame.store.series(which) {
            Some(ring) => {
                // Newest samples sit at the right edge; when the viewport is
                // narrower than the ring, the oldest columns are cut.
                let skip = ring.capacity() - columns;
                ring.iter_chronological()
                    .skip(skip)
                    .map(|v| limits.map(v, window, ph))
                    .collect()
            }
            None => Vec::new(),
        }
    };
    let first = map(Series::First);
    let second = map(Series::Second);

    for (i, e1) in first.iter().enumerate() {
        let col = PLOT_COL + i as u16;
        match second.get(i) {
            Some(e2) => draw_column_pair(r, plot_height, col, e1, e2, frame.config)?,
            None => {
                let (glyph, style) = glyph_for(e1, frame.config);
                run(r, plot_height, col, e1.rows, e1.rows, glyph, style)?;
            }
        }
    }
    Ok(())
}

/// Two overlapping bars in one column: series 1 in normal video on top of
/// series 2 in reverse video.
fn draw_column_pair<R: Renderer>(
    r: &mut R,
    plot_height: u16,
    col: u16,
    e1: &Extent,
    e2: &Extent,
    cfg: &PlotConfig,
) -> io::Result<()> {
    let (g1, s1) = glyph_for(e1, cfg);
    let (g2, s2) = glyph_for(e2, cfg);
    let (l1, l2) = (e1.rows, e2.rows);
    if l1 > l2 {
        run(r, plot_height, col, l1, l1 - l2, g1, s1)?;
        run(r, plot_height, col, l2, l2, g2, s2 | CellStyle::REVERSE)
    } else if l1 < l2 {
        let top = if e2.is_out_of_range() { g2 } else { ' ' };
        run(r, plot_height, col, l2, l2 - l1, top, s2 | CellStyle::REVERSE)?;
        run(r, plot_height, col, l1, l1, g1, s1 | CellStyle::REVERSE)
    } else {
        run(r, plot_height, col, l2, l2, g2, s2 | CellStyle::REVERSE)
    }
}

/// Draw `len` cells starting where a bar of height `top` begins.
fn run<R: Renderer>(
    r: &mut R,
    plot_height: u16,
    col: u16,
    top: usize,
    len: usize,
    glyph: char,
    style: CellStyle,
) -> io::Result<()> {
    if len == 0 {
        return Ok(());
    }
    let row = plot_height + 1 - top as u16;
    r.draw_vertical_run(row, col, len as u16, glyph, style)
}

fn glyph_for(extent: &Extent, cfg: &PlotConfig) -> (char, CellStyle) {
    match extent.class {
        Classification::AboveHardMax => (cfg.error_char, CellStyle::ALERT),
        Classification::BelowHardMin => (cfg.error_char_min, CellStyle::ALERT),
        Classification::Normal | Classification::Unset => {
            (cfg.effective_plot_char(), CellStyle::NORMAL)
        }
    }
}

/// Axis maximum on the top row, then three quarter marks below it.
fn draw_labels<R: Renderer>(
    r: &mut R,
    plot_height: u16,
    window: &AxisWindow,
    unit: &str,
) -> io::Result<()> {
    let ph = plot_height;
    let span = window.span();
    let marks = [
        (1, window.max),
        (ph / 4 + 1, window.min + span * 0.75),
        (ph / 2 + 1, window.min + span * 0.5),
        (ph * 3 / 4 + 1, window.min + span * 0.25),
    ];
    for (row, value) in marks {
        r.draw_text(row, LABEL_COL, &format_value(value, unit))?;
    }
    Ok(())
}

fn draw_header<R: Renderer>(r: &mut R, vp: Viewport, frame: &FrameInfo<'_>) -> io::Result<()> {
    let title = if frame.rate_mode {
        format!("{} [rate]", frame.config.title)
    } else {
        frame.config.title.clone()
    };
    draw_centered(r, vp, 0, &title)?;
    if let Some(status) = frame.status {
        draw_right(r, vp, 0, status)?;
    }
    Ok(())
}

/// Half of the last digit [`format_value`] prints.
pub const LABEL_RESOLUTION: f64 = 0.05;

/// Whether the four axis labels, a quarter span apart, print distinct values.
pub fn labels_fit(window: &AxisWindow) -> bool {
    window.span() / 4.0 >= LABEL_RESOLUTION
}

/// `"12.3 unit"`, or just the number without a unit.
pub fn format_value(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        format!("{:.1}", value)
    } else {
        format!("{:.1} {}", value, unit)
    }
}

pub fn stats_line(last: Option<f64>, stats: Option<Statistics>, unit: &str) -> String {
    match (last, stats) {
        (Some(last), Some(s)) => format!(
            "last={:.1} min={:.1} max={:.1} avg={:.1} {}",
            last, s.min, s.max, s.avg, unit
        )
        .trim_end()
        .to_string(),
        _ => "no data".to_string(),
    }
}

fn text_width(text: &str) -> u16 {
    text.chars().count().min(u16::MAX as usize) as u16
}

fn draw_centered<R: Renderer>(r: &mut R, vp: Viewport, row: u16, text: &str) -> io::Result<()> {
    let col = (vp.cols / 2).saturating_sub(text_width(text) / 2);
    r.draw_text(row, col, text)
}

fn draw_right<R: Renderer>(r: &mut R, vp: Viewport, row: u16, text: &str) -> io::Result<()> {
    let col = vp.cols.saturating_sub(text_width(text));
    r.draw_text(row, col, text)
}
