//! Timeline bar-chart primitive
//!
//! Turns bars into an SVG timeline. The output is styled by class only and
//! carries no `viewBox`; layers are emitted in drawing order
//! `date`, `grid`, `bar`, `arrow`. The render corrector fixes all of that
//! after mounting, so callers must treat this markup as raw material.

use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use svg::node::element::{Group, Line, Path, Polygon, Rectangle, Text};
use svg::Document;

use schedview_core::{BarRepresentation, RenderError, StyleClass, ViewMode};

/// Portuguese month abbreviations for the date header
const MONTHS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// A renderer that turns bars into SVG markup.
///
/// Implementations are opaque to the rest of the view: nothing downstream
/// relies on their layer order or styling.
pub trait BarChartPrimitive {
    fn render(&self, bars: &[BarRepresentation], options: &ChartOptions)
        -> Result<String, RenderError>;
}

/// Layout options shared by the timeline and the table pane
#[derive(Clone, Debug, PartialEq)]
pub struct ChartOptions {
    pub view_mode: ViewMode,
    /// Height of a bar in pixels
    pub bar_height: u32,
    /// Vertical space between bars in pixels
    pub padding: u32,
    /// Height of the date header in pixels
    pub header_height: u32,
    /// Override of the per-mode column width
    pub column_width: Option<u32>,
    pub corner_radius: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::default(),
            bar_height: 20,
            padding: 18,
            header_height: 50,
            column_width: None,
            corner_radius: 3,
        }
    }
}

impl ChartOptions {
    pub fn new(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            ..Self::default()
        }
    }

    /// Height of one task row; the table pane uses the same value
    pub fn row_height(&self) -> u32 {
        self.bar_height + self.padding
    }

    /// Width of one timeline column in pixels
    pub fn column_width(&self) -> u32 {
        self.column_width
            .unwrap_or_else(|| default_column_width(self.view_mode))
    }

    /// Total chart height for `rows` tasks
    pub fn chart_height(&self, rows: usize) -> u32 {
        self.header_height + rows as u32 * self.row_height()
    }
}

/// Default column width per view mode
pub fn default_column_width(mode: ViewMode) -> u32 {
    match mode {
        ViewMode::Day => 38,
        ViewMode::Week => 140,
        ViewMode::Month => 120,
    }
}

/// The built-in SVG timeline
#[derive(Clone, Copy, Debug, Default)]
pub struct TimelineChart;

impl TimelineChart {
    pub fn new() -> Self {
        Self
    }
}

impl BarChartPrimitive for TimelineChart {
    fn render(
        &self,
        bars: &[BarRepresentation],
        options: &ChartOptions,
    ) -> Result<String, RenderError> {
        let spans = bars
            .iter()
            .map(|bar| match (bar.start_date(), bar.end_date()) {
                (Some(start), Some(end)) if start <= end => Ok((start, end)),
                _ => Err(RenderError::InvalidData(format!(
                    "bar '{}' has an invalid date range ({} .. {})",
                    bar.id, bar.start, bar.end
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let scale = Scale::fit(&spans, options);
        let width = scale.width();
        let height = options.chart_height(bars.len());

        let rows: HashMap<&str, usize> = bars
            .iter()
            .enumerate()
            .map(|(row, bar)| (bar.id.as_str(), row))
            .collect();

        let mut bar_layer = Group::new().set("class", "bar");
        for (row, (bar, span)) in bars.iter().zip(&spans).enumerate() {
            bar_layer = bar_layer.add(render_bar(bar, *span, row, &scale, options));
        }

        let document = Document::new()
            .set("class", "gantt")
            .set("width", width)
            .set("height", height)
            .add(render_dates(&scale, options))
            .add(render_grid(&scale, bars.len(), width, height, options))
            .add(bar_layer)
            .add(render_arrows(bars, &spans, &rows, &scale, options));

        Ok(document.to_string())
    }
}

// ============================================================================
// Scale
// ============================================================================

/// Maps dates to x positions for one view mode
#[derive(Clone, Debug)]
struct Scale {
    mode: ViewMode,
    start: NaiveDate,
    columns: Vec<NaiveDate>,
    column_width: f64,
}

impl Scale {
    fn fit(spans: &[(NaiveDate, NaiveDate)], options: &ChartOptions) -> Self {
        let mode = options.view_mode;
        let first = spans.iter().map(|s| s.0).min();
        let last = spans.iter().map(|s| s.1).max();

        let (start, end) = match (first, last) {
            (Some(first), Some(last)) => (
                step_back(align(first, mode), mode),
                step_forward(align(last + Duration::days(1), mode), mode),
            ),
            _ => (NaiveDate::default(), NaiveDate::default()),
        };

        let mut columns = vec![start];
        let mut cursor = step_forward(start, mode);
        while cursor < end {
            columns.push(cursor);
            cursor = step_forward(cursor, mode);
        }

        Self {
            mode,
            start,
            columns,
            column_width: f64::from(options.column_width()),
        }
    }

    fn width(&self) -> f64 {
        self.columns.len() as f64 * self.column_width
    }

    fn x(&self, date: NaiveDate) -> f64 {
        match self.mode {
            ViewMode::Day => (date - self.start).num_days() as f64 * self.column_width,
            ViewMode::Week => (date - self.start).num_days() as f64 * self.column_width / 7.0,
            ViewMode::Month => {
                let months = (date.year() - self.start.year()) * 12 + date.month0() as i32
                    - self.start.month0() as i32;
                let fraction = f64::from(date.day0()) / f64::from(days_in_month(date));
                (f64::from(months) + fraction) * self.column_width
            }
        }
    }
}

fn align(date: NaiveDate, mode: ViewMode) -> NaiveDate {
    match mode {
        ViewMode::Day => date,
        ViewMode::Week => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
        ViewMode::Month => date.with_day(1).unwrap_or(date),
    }
}

fn step_forward(date: NaiveDate, mode: ViewMode) -> NaiveDate {
    match mode {
        ViewMode::Day => date + Duration::days(1),
        ViewMode::Week => date + Duration::days(7),
        ViewMode::Month => date
            .checked_add_months(Months::new(1))
            .unwrap_or(date + Duration::days(31)),
    }
}

fn step_back(date: NaiveDate, mode: ViewMode) -> NaiveDate {
    match mode {
        ViewMode::Day => date - Duration::days(1),
        ViewMode::Week => date - Duration::days(7),
        ViewMode::Month => date
            .checked_sub_months(Months::new(1))
            .unwrap_or(date - Duration::days(31)),
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        None => 31,
    }
}

fn month_abbrev(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

// ============================================================================
// Layers
// ============================================================================

fn row_top(row: usize, options: &ChartOptions) -> f64 {
    f64::from(options.header_height) + row as f64 * f64::from(options.row_height())
}

fn bar_top(row: usize, options: &ChartOptions) -> f64 {
    row_top(row, options) + f64::from(options.padding) / 2.0
}

fn render_grid(
    scale: &Scale,
    rows: usize,
    width: f64,
    height: u32,
    options: &ChartOptions,
) -> Group {
    let mut group = Group::new().set("class", "grid");

    group = group.add(
        Rectangle::new()
            .set("class", "grid-background")
            .set("x", 0)
            .set("y", 0)
            .set("width", width)
            .set("height", height),
    );

    let mut row_group = Group::new().set("class", "rows");
    let mut line_group = Group::new().set("class", "lines");
    for row in 0..rows {
        let y = row_top(row, options);
        row_group = row_group.add(
            Rectangle::new()
                .set("class", "grid-row")
                .set("x", 0)
                .set("y", y)
                .set("width", width)
                .set("height", options.row_height()),
        );
        let bottom = y + f64::from(options.row_height());
        line_group = line_group.add(
            Line::new()
                .set("class", "row-line")
                .set("x1", 0)
                .set("y1", bottom)
                .set("x2", width)
                .set("y2", bottom),
        );
    }

    let mut tick_group = Group::new().set("class", "ticks");
    for column in &scale.columns {
        let x = scale.x(*column);
        let class = if starts_group(*column, scale.mode) {
            "tick thick"
        } else {
            "tick"
        };
        tick_group = tick_group.add(
            Line::new()
                .set("class", class)
                .set("x1", x)
                .set("y1", options.header_height)
                .set("x2", x)
                .set("y2", height),
        );
    }

    group.add(row_group).add(line_group).add(tick_group)
}

/// Whether a column opens a new upper-header group (month or year)
fn starts_group(column: NaiveDate, mode: ViewMode) -> bool {
    match mode {
        ViewMode::Day => column.day() == 1,
        ViewMode::Week => column.day() <= 7,
        ViewMode::Month => column.month() == 1,
    }
}

fn render_dates(scale: &Scale, options: &ChartOptions) -> Group {
    let mut group = Group::new().set("class", "date");
    let lower_y = f64::from(options.header_height) - 10.0;
    let upper_y = f64::from(options.header_height) / 2.0 - 5.0;

    for (i, column) in scale.columns.iter().enumerate() {
        let x = scale.x(*column);
        let label = match scale.mode {
            ViewMode::Day => column.format("%d").to_string(),
            ViewMode::Week => format!("{} {}", column.format("%d"), month_abbrev(*column)),
            ViewMode::Month => month_abbrev(*column).to_string(),
        };
        group = group.add(
            Text::new(label)
                .set("class", "lower-text")
                .set("x", x + scale.column_width / 2.0)
                .set("y", lower_y)
                .set("text-anchor", "middle"),
        );

        if i == 0 || starts_group(*column, scale.mode) {
            let upper = match scale.mode {
                ViewMode::Day | ViewMode::Week => {
                    format!("{} {}", month_abbrev(*column), column.year())
                }
                ViewMode::Month => column.year().to_string(),
            };
            group = group.add(
                Text::new(upper)
                    .set("class", "upper-text")
                    .set("x", x + 4.0)
                    .set("y", upper_y),
            );
        }
    }
    group
}

fn render_bar(
    bar: &BarRepresentation,
    (start, end): (NaiveDate, NaiveDate),
    row: usize,
    scale: &Scale,
    options: &ChartOptions,
) -> Group {
    let x = scale.x(start);
    let y = bar_top(row, options);
    let height = f64::from(options.bar_height);

    let mut bar_group = Group::new().set("class", "bar-group");

    if bar.style_class == StyleClass::Milestone {
        let size = height / 2.0;
        let cy = y + size;
        let points = format!(
            "{},{} {},{} {},{} {},{}",
            x,
            cy - size,
            x + size,
            cy,
            x,
            cy + size,
            x - size,
            cy
        );
        bar_group = bar_group.add(
            Polygon::new()
                .set("class", "bar bar-diamond")
                .set("points", points),
        );
    } else {
        let end_x = scale.x(end + Duration::days(1));
        let width = (end_x - x).max(2.0);
        bar_group = bar_group
            .add(
                Rectangle::new()
                    .set("class", "bar")
                    .set("x", x)
                    .set("y", y)
                    .set("width", width)
                    .set("height", height)
                    .set("rx", options.corner_radius)
                    .set("ry", options.corner_radius),
            )
            .add(
                Rectangle::new()
                    .set("class", "bar-progress")
                    .set("x", x)
                    .set("y", y)
                    .set("width", width * bar.progress.clamp(0.0, 1.0))
                    .set("height", height)
                    .set("rx", options.corner_radius)
                    .set("ry", options.corner_radius),
            );
    }

    Group::new()
        .set(
            "class",
            format!("bar-wrapper {}", bar.style_class.class_name()),
        )
        .set("data-id", bar.id.as_str())
        .set("data-row", row)
        .add(bar_group)
}

fn render_arrows(
    bars: &[BarRepresentation],
    spans: &[(NaiveDate, NaiveDate)],
    rows: &HashMap<&str, usize>,
    scale: &Scale,
    options: &ChartOptions,
) -> Group {
    let mut group = Group::new().set("class", "arrow");
    let half = f64::from(options.bar_height) / 2.0;

    for (to_row, bar) in bars.iter().enumerate() {
        let to_x = scale.x(spans[to_row].0);
        let to_y = bar_top(to_row, options) + half;

        for dep in bar.dependency_ids() {
            let Some(&from_row) = rows.get(dep) else {
                continue;
            };
            let from_x = scale.x(spans[from_row].1 + Duration::days(1));
            let from_y = bar_top(from_row, options) + half;
            let elbow = from_x + 10.0;
            let d = format!(
                "M {from_x} {from_y} H {elbow} V {to_y} H {to_x} m -5 -5 l 5 5 l -5 5"
            );
            group = group.add(
                Path::new()
                    .set("class", "arrow-path")
                    .set("d", d)
                    .set("data-from", dep)
                    .set("data-to", bar.id.as_str()),
            );
        }
    }
    group
}
