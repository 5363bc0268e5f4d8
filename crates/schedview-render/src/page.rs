//! Standalone dual-pane HTML page
//!
//! Toolbar, column configuration panel, table pane, timeline pane, legend
//! and a small script that keeps the two panes scrolled together.

use schedview_core::{ScheduleTask, StyleClass, Toolbar, ViewMode, VisibleColumns};

use crate::html_escape;
use crate::table::{render_column_panel, render_table, Controls};
use crate::theme::GanttTheme;
use crate::timeline::ChartOptions;

/// Horizontal split between the two panes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaneLayout {
    /// Width available to both panes in pixels
    pub viewport_width: u32,
    /// Fixed height of the pane container in pixels
    pub container_height: u32,
    pub table_min_width: u32,
    /// Upper bound of the table pane as a percentage of the viewport
    pub table_max_percent: u32,
}

impl Default for PaneLayout {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            container_height: 600,
            table_min_width: 300,
            table_max_percent: 60,
        }
    }
}

impl PaneLayout {
    /// Table width for the given sum of visible column widths
    pub fn table_width(&self, columns_width: u32) -> u32 {
        let max = u64::from(self.viewport_width) * u64::from(self.table_max_percent) / 100;
        let max = u32::try_from(max).unwrap_or(u32::MAX);
        columns_width.clamp(self.table_min_width, max.max(self.table_min_width))
    }

    /// Whatever the table leaves over
    pub fn timeline_width(&self, columns_width: u32) -> u32 {
        self.viewport_width
            .saturating_sub(self.table_width(columns_width))
    }
}

/// Everything one page render shows
#[derive(Clone, Copy, Debug)]
pub struct PageContent<'a> {
    pub tasks: &'a [ScheduleTask],
    pub columns: &'a VisibleColumns,
    pub toolbar: Toolbar,
    pub options: &'a ChartOptions,
    /// Corrected timeline markup; `None` shows the table alone
    pub timeline: Option<&'a str>,
    pub selected: Option<&'a str>,
}

/// Dual-pane page renderer configuration
#[derive(Clone, Debug)]
pub struct HtmlPageRenderer {
    pub title: String,
    pub layout: PaneLayout,
    pub theme: GanttTheme,
}

impl Default for HtmlPageRenderer {
    fn default() -> Self {
        Self {
            title: "Cronograma".into(),
            layout: PaneLayout::default(),
            theme: GanttTheme::default(),
        }
    }
}

impl HtmlPageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn layout(mut self, layout: PaneLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn theme(mut self, theme: GanttTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Complete standalone document
    pub fn render(&self, page: &PageContent<'_>) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
{body}
    <script>
{js}
    </script>
</body>
</html>"#,
            title = html_escape(&self.title),
            css = self.stylesheet(),
            body = self.body(page, Controls::Static),
            js = generate_js(),
        )
    }

    /// The view markup alone, for hosts that mount it into an existing page
    /// and wire its drag and checkbox events
    pub fn render_body(&self, page: &PageContent<'_>) -> String {
        self.body(page, Controls::Live)
    }

    fn body(&self, page: &PageContent<'_>, controls: Controls) -> String {
        let table_width = self.layout.table_width(page.columns.total_width());
        let table = render_table(
            page.tasks,
            page.columns,
            page.options,
            page.selected,
            controls,
        );
        let panel = render_column_panel(page.columns, controls);
        let toolbar = render_toolbar(&page.toolbar);
        let legend = if page.toolbar.legend_visible {
            self.render_legend()
        } else {
            String::new()
        };
        let timeline = match page.timeline {
            Some(svg) => svg.to_string(),
            None => r#"<div class="timeline-unavailable">Cronograma indisponível</div>"#.into(),
        };

        format!(
            r#"    <div class="gantt-view" data-mode="{mode}">
        <div class="gantt-toolbar">
{toolbar}
        </div>
{panel}
        <div class="gantt-panes">
            <div class="table-pane" id="table-pane" style="width:{table_width}px">
{table}
            </div>
            <div class="timeline-pane" id="timeline-pane">
{timeline}
            </div>
        </div>
{legend}
    </div>"#,
            mode = page.toolbar.mode,
        )
    }

    fn render_legend(&self) -> String {
        let items: String = StyleClass::ALL
            .iter()
            .map(|style| {
                let colors = self.theme.bar_colors(*style);
                let shape = if *style == StyleClass::Milestone {
                    "legend-diamond"
                } else {
                    "legend-box"
                };
                format!(
                    r#"            <span class="legend-item"><span class="{shape}" style="background:{fill};border-color:{stroke}"></span>{label}</span>
"#,
                    fill = colors.fill,
                    stroke = colors.stroke,
                    label = html_escape(style.label()),
                )
            })
            .collect();
        format!("        <div class=\"gantt-legend\" id=\"legend\">\n{items}        </div>")
    }

    /// Theme-derived CSS for the view markup
    pub fn stylesheet(&self) -> String {
        let theme = &self.theme;
        format!(
            r#"        :root {{
            --bg-color: {bg};
            --grid-color: {grid};
            --row-alt-color: {row_alt};
            --text-color: {text};
            --header-bg: {header};
            --highlight-color: {highlight};
        }}
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: system-ui, -apple-system, sans-serif;
            background: var(--bg-color);
            color: var(--text-color);
            padding: 20px;
        }}
        .gantt-toolbar {{ display: flex; gap: 8px; margin-bottom: 12px; }}
        .gantt-toolbar button {{
            padding: 6px 14px;
            border: 1px solid var(--text-color);
            background: transparent;
            color: var(--text-color);
            cursor: pointer;
            border-radius: 4px;
        }}
        .gantt-toolbar button.active {{ background: var(--header-bg); font-weight: 600; }}
        .gantt-toolbar button:disabled {{ opacity: 0.4; cursor: default; }}
        .column-panel {{ margin-bottom: 12px; }}
        .column-list {{ list-style: none; display: flex; flex-wrap: wrap; gap: 6px 16px; }}
        .column-item.visible[draggable] {{ cursor: grab; }}
        .column-item.off {{ opacity: 0.6; }}
        .column-panel.read-only {{ opacity: 0.8; }}
        .gantt-panes {{
            display: flex;
            height: {height}px;
            border: 1px solid var(--grid-color);
            border-radius: 8px;
            overflow: hidden;
        }}
        .table-pane, .timeline-pane {{ overflow-y: auto; height: 100%; }}
        .table-pane {{ flex: none; overflow-x: auto; border-right: 1px solid var(--grid-color); }}
        .timeline-pane {{ flex: 1; overflow-x: auto; }}
        .gantt-table {{ border-collapse: collapse; table-layout: fixed; font-size: 13px; }}
        .gantt-table th {{
            position: sticky;
            top: 0;
            background: var(--header-bg);
            white-space: nowrap;
            padding: 0 8px;
        }}
        .gantt-table th[draggable] {{ cursor: grab; }}
        .gantt-table td {{
            padding: 0 8px;
            white-space: nowrap;
            overflow: hidden;
            text-overflow: ellipsis;
            border-bottom: 1px solid var(--grid-color);
        }}
        .task-row:nth-child(even) {{ background: var(--row-alt-color); }}
        .task-row.selected {{ background: var(--highlight-color); }}
        .badge {{ padding: 2px 8px; border-radius: 10px; font-size: 11px; }}
        .badge-neutral {{ background: #ecf0f1; color: #2c3e50; }}
        .badge-info {{ background: #d6eaf8; color: #1f618d; }}
        .badge-success {{ background: #d5f5e3; color: #196f3d; }}
        .badge-warning {{ background: #fdebd0; color: #9c640c; }}
        .badge-danger {{ background: #fadbd8; color: #922b21; }}
        .badge-muted {{ background: #f2f3f4; color: #7f8c8d; }}
        .progress {{ position: relative; height: 14px; background: var(--grid-color); border-radius: 7px; }}
        .progress-fill {{ height: 100%; background: {progress}; border-radius: 7px; }}
        .progress-label {{ position: absolute; inset: 0; font-size: 10px; text-align: center; }}
        .timeline-unavailable {{ padding: 24px; opacity: 0.7; }}
        .gantt-legend {{ display: flex; gap: 20px; margin-top: 12px; font-size: 13px; }}
        .legend-item {{ display: flex; align-items: center; gap: 6px; }}
        .legend-box {{ width: 18px; height: 12px; border: 1px solid; border-radius: 2px; }}
        .legend-diamond {{ width: 10px; height: 10px; border: 1px solid; transform: rotate(45deg); }}
        .gantt-legend.hidden {{ display: none; }}"#,
            bg = theme.background_color,
            grid = theme.grid_color,
            row_alt = theme.row_alt_color,
            text = theme.text_color,
            header = theme.header_bg,
            highlight = theme.highlight_color,
            height = self.layout.container_height,
            progress = theme.in_progress.fill,
        )
    }
}

fn render_toolbar(toolbar: &Toolbar) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "            <button data-action=\"zoom-in\" title=\"Aproximar\"{}>+</button>\n",
        disabled(!toolbar.can_zoom_in())
    ));
    html.push_str(&format!(
        "            <button data-action=\"zoom-out\" title=\"Afastar\"{}>−</button>\n",
        disabled(!toolbar.can_zoom_out())
    ));
    for mode in ViewMode::ALL {
        let class = if mode == toolbar.mode { " class=\"active\"" } else { "" };
        html.push_str(&format!(
            "            <button data-mode=\"{mode}\"{class}>{}</button>\n",
            mode.label()
        ));
    }
    html.push_str(&format!(
        "            <button id=\"legend-toggle\" aria-pressed=\"{}\">Legenda</button>",
        toolbar.legend_visible
    ));
    html
}

fn disabled(flag: bool) -> &'static str {
    if flag {
        " disabled"
    } else {
        ""
    }
}

/// Scroll sync with a one-shot echo guard per pane, plus the legend toggle
fn generate_js() -> String {
    r#"        const tablePane = document.getElementById('table-pane');
        const timelinePane = document.getElementById('timeline-pane');
        const pendingEcho = new Map();

        function mirror(source, target) {
            const expected = pendingEcho.get(source);
            pendingEcho.delete(source);
            if (expected !== undefined && Math.abs(expected - source.scrollTop) < 0.5) {
                return;
            }
            if (Math.abs(target.scrollTop - source.scrollTop) < 0.5) {
                return;
            }
            target.scrollTop = source.scrollTop;
            pendingEcho.set(target, target.scrollTop);
        }

        tablePane.addEventListener('scroll', () => mirror(tablePane, timelinePane));
        timelinePane.addEventListener('scroll', () => mirror(timelinePane, tablePane));

        const legendToggle = document.getElementById('legend-toggle');
        const legend = document.getElementById('legend');
        if (legendToggle && legend) {
            legendToggle.addEventListener('click', () => {
                const hidden = legend.classList.toggle('hidden');
                legendToggle.setAttribute('aria-pressed', String(!hidden));
            });
        }

        document.querySelectorAll('.task-row').forEach((row) => {
            row.addEventListener('click', () => {
                document.querySelectorAll('.task-row.selected')
                    .forEach((r) => r.classList.remove('selected'));
                row.classList.add('selected');
            });
        });"#
        .to_string()
}
