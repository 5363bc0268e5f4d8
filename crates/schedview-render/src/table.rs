//! Table pane and column configuration panel
//!
//! Rows share the timeline's header and row heights so that row N of the
//! table lines up with bar N of the timeline.

use std::fmt::Write as _;

use schedview_core::columns::{self, CATALOG};
use schedview_core::{CellContent, ScheduleTask, VisibleColumns};

use crate::html_escape;
use crate::timeline::ChartOptions;

/// Whether the markup is driven by a live host or shown as a static report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Controls {
    /// Draggable headers and working checkboxes
    #[default]
    Live,
    /// No drag handles; the panel is shown read-only
    Static,
}

impl Controls {
    fn draggable(self) -> &'static str {
        match self {
            Controls::Live => r#" draggable="true""#,
            Controls::Static => "",
        }
    }
}

/// Render the table pane for `tasks` with the visible columns in order
pub fn render_table(
    tasks: &[ScheduleTask],
    visible: &VisibleColumns,
    options: &ChartOptions,
    selected: Option<&str>,
    controls: Controls,
) -> String {
    let definitions = visible.definitions();
    let mut html = String::new();

    let _ = writeln!(
        html,
        r#"<table class="gantt-table" style="width:{}px">"#,
        visible.total_width()
    );

    let _ = writeln!(
        html,
        r#"<thead><tr style="height:{}px">"#,
        options.header_height
    );
    for (index, column) in definitions.iter().enumerate() {
        let _ = writeln!(
            html,
            r#"<th{draggable} data-index="{index}" data-column="{id}" style="width:{width}px;text-align:{align}">{label}</th>"#,
            draggable = controls.draggable(),
            id = column.id,
            width = column.width,
            align = column.align.as_css(),
            label = html_escape(column.label),
        );
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for (row, task) in tasks.iter().enumerate() {
        let class = if selected == Some(task.id.as_str()) {
            "task-row selected"
        } else {
            "task-row"
        };
        let _ = writeln!(
            html,
            r#"<tr class="{class}" data-task-id="{id}" data-row="{row}" style="height:{height}px">"#,
            id = html_escape(&task.id),
            height = options.row_height(),
        );
        for column in &definitions {
            let _ = writeln!(
                html,
                r#"<td data-column="{id}" style="text-align:{align}">{cell}</td>"#,
                id = column.id,
                align = column.align.as_css(),
                cell = render_cell_html(&column.render_cell(task, row)),
            );
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}

/// HTML for one cell value
pub fn render_cell_html(cell: &CellContent) -> String {
    match cell {
        CellContent::Text(text) => html_escape(text),
        CellContent::Badge { label, tone } => format!(
            r#"<span class="badge badge-{}">{}</span>"#,
            tone.as_str(),
            html_escape(label)
        ),
        CellContent::Progress(percent) => format!(
            r#"<div class="progress"><div class="progress-fill" style="width:{percent}%"></div><span class="progress-label">{percent}%</span></div>"#
        ),
        CellContent::Link { label, target } => format!(
            r#"<a href="{}">{}</a>"#,
            html_escape(target),
            html_escape(label)
        ),
    }
}

/// Column configuration panel: the visible columns in order (draggable,
/// indexed like the header), then the catalog columns that are switched off.
pub fn render_column_panel(visible: &VisibleColumns, controls: Controls) -> String {
    let mut html = match controls {
        Controls::Live => String::from(r#"<div class="column-panel"><ul class="column-list">"#),
        Controls::Static => String::from(
            r#"<div class="column-panel read-only" title="Somente leitura"><ul class="column-list">"#,
        ),
    };
    html.push('\n');
    let read_only = controls == Controls::Static;

    for (index, id) in visible.iter().enumerate() {
        let Some(column) = columns::get(id) else {
            continue;
        };
        let locked = read_only || columns::is_mandatory(id);
        let _ = writeln!(
            html,
            r#"<li class="column-item visible"{draggable} data-index="{index}" data-column="{id}"><label><input type="checkbox" checked{disabled}> {label}</label></li>"#,
            draggable = controls.draggable(),
            disabled = if locked { " disabled" } else { "" },
            label = html_escape(column.label),
        );
    }

    for column in CATALOG.iter().filter(|c| !visible.contains(c.id)) {
        let _ = writeln!(
            html,
            r#"<li class="column-item off" data-column="{id}"><label><input type="checkbox"{disabled}> {label}</label></li>"#,
            id = column.id,
            disabled = if read_only { " disabled" } else { "" },
            label = html_escape(column.label),
        );
    }

    html.push_str("</ul></div>");
    html
}
