//! # schedview-render
//!
//! Rendering for the schedview dual-pane Gantt view.
//!
//! This crate provides:
//! - The SVG timeline primitive (`TimelineChart`) behind `BarChartPrimitive`
//! - An in-memory SVG tree the render corrector can operate on (`SvgTree`)
//! - The render corrector (`correct`) over any `CorrectableSvg`
//! - The render pipeline with deferred, cancellable corrections
//! - The table pane, the column configuration panel and the full HTML page
//! - The `GanttView` controller tying it all together
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use schedview_core::{MemoryStore, ScheduleTask, ViewMode};
//! use schedview_render::GanttView;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
//! let mut view = GanttView::new(MemoryStore::new()).view_mode(ViewMode::Day);
//! view.set_tasks(vec![
//!     ScheduleTask::new("fundacao").dates(day(3), day(14)).status("em_andamento"),
//! ]);
//!
//! let html = view.render_page();
//! assert!(html.contains("bar-in-progress"));
//! ```

pub mod correct;
pub mod dom;
pub mod page;
pub mod pipeline;
pub mod table;
pub mod theme;
pub mod timeline;
pub mod view;

pub use correct::{correct, CorrectableSvg, CorrectionOutcome, CorrectionReport, SkipReason};
pub use dom::{NodeId, SvgTree};
pub use page::{HtmlPageRenderer, PageContent, PaneLayout};
pub use pipeline::{CorrectionTicket, RenderOutcome, TimelineView};
pub use table::{render_cell_html, render_column_panel, render_table, Controls};
pub use theme::{BarColors, GanttTheme};
pub use timeline::{default_column_width, BarChartPrimitive, ChartOptions, TimelineChart};
pub use view::GanttView;

/// Escape text for HTML content and attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escape_works() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape(r#"say "hi""#), "say &quot;hi&quot;");
    }
}
