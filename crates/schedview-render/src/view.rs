//! Gantt view controller
//!
//! `GanttView` ties the pieces together: it owns the task list, the toolbar
//! state, the column preferences, the scroll guard and the timeline
//! pipeline. Any change that affects the timeline (tasks, view mode, pane
//! size, visible columns) re-runs adapter, primitive and correction from
//! scratch.

use tracing::{debug, info};

use schedview_core::{
    ColumnPreferences, DragEnd, KeyValueStore, Pane, ScheduleTask, ScrollSurface, ScrollSync,
    TaskId, TaskStatus, Toolbar, ViewMode, VisibleColumns,
};

use crate::correct::CorrectionOutcome;
use crate::page::{HtmlPageRenderer, PageContent, PaneLayout};
use crate::pipeline::{CorrectionTicket, RenderOutcome, TimelineView};
use crate::theme::GanttTheme;
use crate::timeline::{BarChartPrimitive, ChartOptions, TimelineChart};

/// Called with the task a row or bar activated, or the task an edit changed
pub type TaskCallback = Box<dyn FnMut(&ScheduleTask)>;

/// Called after the view mode changed
pub type ViewModeCallback = Box<dyn FnMut(ViewMode)>;

/// Dual-pane Gantt view state
pub struct GanttView<S: KeyValueStore, P = TimelineChart> {
    tasks: Vec<ScheduleTask>,
    toolbar: Toolbar,
    preferences: ColumnPreferences<S>,
    scroll: ScrollSync,
    timeline: TimelineView<P>,
    chart: ChartOptions,
    page: HtmlPageRenderer,
    selected: Option<TaskId>,
    last_outcome: Option<RenderOutcome>,
    on_task_activated: Option<TaskCallback>,
    on_view_mode_change: Option<ViewModeCallback>,
    on_task_updated: Option<TaskCallback>,
}

impl<S: KeyValueStore> GanttView<S, TimelineChart> {
    /// View over the built-in timeline, columns restored from `store`
    pub fn new(store: S) -> Self {
        Self::with_primitive(store, TimelineChart::new())
    }
}

impl<S: KeyValueStore, P: BarChartPrimitive> GanttView<S, P> {
    pub fn with_primitive(store: S, primitive: P) -> Self {
        let page = HtmlPageRenderer::default();
        Self {
            tasks: Vec::new(),
            toolbar: Toolbar::default(),
            preferences: ColumnPreferences::open(store),
            scroll: ScrollSync::new(),
            timeline: TimelineView::new(primitive).theme(page.theme.clone()),
            chart: ChartOptions::default(),
            page,
            selected: None,
            last_outcome: None,
            on_task_activated: None,
            on_view_mode_change: None,
            on_task_updated: None,
        }
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    pub fn view_mode(mut self, mode: ViewMode) -> Self {
        self.toolbar.set_mode(mode);
        self
    }

    pub fn legend(mut self, visible: bool) -> Self {
        self.toolbar.legend_visible = visible;
        self
    }

    pub fn layout(mut self, layout: PaneLayout) -> Self {
        self.page.layout = layout;
        self
    }

    pub fn theme(mut self, theme: GanttTheme) -> Self {
        self.timeline.set_theme(theme.clone());
        self.page.theme = theme;
        self
    }

    /// Switch themes on a live view; the timeline is corrected again
    pub fn set_theme(&mut self, theme: GanttTheme) {
        self.timeline.set_theme(theme.clone());
        self.page.theme = theme;
        self.rerender();
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.page.title = title.into();
        self
    }

    /// Bar geometry; the view mode always comes from the toolbar
    pub fn chart_options(mut self, options: ChartOptions) -> Self {
        self.chart = options;
        self
    }

    pub fn on_task_activated(&mut self, callback: impl FnMut(&ScheduleTask) + 'static) {
        self.on_task_activated = Some(Box::new(callback));
    }

    pub fn on_view_mode_change(&mut self, callback: impl FnMut(ViewMode) + 'static) {
        self.on_view_mode_change = Some(Box::new(callback));
    }

    pub fn on_task_updated(&mut self, callback: impl FnMut(&ScheduleTask) + 'static) {
        self.on_task_updated = Some(Box::new(callback));
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    pub fn tasks(&self) -> &[ScheduleTask] {
        &self.tasks
    }

    pub fn toolbar(&self) -> Toolbar {
        self.toolbar
    }

    pub fn columns(&self) -> &VisibleColumns {
        self.preferences.columns()
    }

    pub fn preferences(&self) -> &ColumnPreferences<S> {
        &self.preferences
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn layout_config(&self) -> PaneLayout {
        self.page.layout
    }

    /// Chart options for the current view mode
    pub fn options(&self) -> ChartOptions {
        ChartOptions {
            view_mode: self.toolbar.mode,
            ..self.chart.clone()
        }
    }

    /// Whether the last render fell back to the table alone
    pub fn is_degraded(&self) -> bool {
        self.last_outcome
            .as_ref()
            .is_some_and(RenderOutcome::is_table_only)
    }

    pub fn last_outcome(&self) -> Option<&RenderOutcome> {
        self.last_outcome.as_ref()
    }

    /// Current timeline markup, corrected once the pending correction ran
    pub fn timeline_markup(&self) -> Option<String> {
        self.timeline.markup()
    }

    pub fn timeline(&self) -> &TimelineView<P> {
        &self.timeline
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Replace the task list and re-render
    pub fn set_tasks(&mut self, tasks: Vec<ScheduleTask>) {
        self.tasks = tasks;
        if let Some(id) = &self.selected {
            if !self.tasks.iter().any(|t| &t.id == id) {
                self.selected = None;
            }
        }
        self.rerender();
    }

    /// Returns whether the mode changed
    pub fn set_view_mode(&mut self, mode: ViewMode) -> bool {
        let changed = self.toolbar.set_mode(mode);
        self.after_mode_change(changed)
    }

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.toolbar.zoom_in();
        self.after_mode_change(changed)
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.toolbar.zoom_out();
        self.after_mode_change(changed)
    }

    /// Returns the new legend visibility
    pub fn toggle_legend(&mut self) -> bool {
        self.toolbar.toggle_legend()
    }

    /// Show or hide a column; returns whether the list changed
    pub fn toggle_column(&mut self, id: &str) -> bool {
        let changed = self.preferences.toggle(id);
        if changed {
            self.rerender();
        }
        changed
    }

    /// Finish a drag from the header or the configuration panel
    pub fn apply_drag(&mut self, drag: &DragEnd) -> bool {
        let changed = self.preferences.apply_drag(drag);
        if changed {
            self.rerender();
        }
        changed
    }

    /// Restore the default column set
    pub fn reset_columns(&mut self) -> bool {
        let changed = self.preferences.reset();
        if changed {
            self.rerender();
        }
        changed
    }

    /// The host resized the view
    pub fn resize(&mut self, viewport_width: u32, container_height: u32) {
        self.page.layout.viewport_width = viewport_width;
        self.page.layout.container_height = container_height;
        self.rerender();
    }

    /// A table row was clicked
    pub fn activate_row(&mut self, row: usize) -> Option<&ScheduleTask> {
        let id = self.tasks.get(row)?.id.clone();
        self.activate(&id)
    }

    /// A timeline bar was clicked
    pub fn activate_bar(&mut self, id: &str) -> Option<&ScheduleTask> {
        self.activate(id)
    }

    /// Optimistically set a task's progress (percent)
    pub fn update_progress(&mut self, id: &str, percent: f64) -> bool {
        self.update_task(id, |task| task.progress = percent.clamp(0.0, 100.0))
    }

    /// Optimistically set a task's status
    pub fn update_status(&mut self, id: &str, status: TaskStatus) -> bool {
        self.update_task(id, |task| task.status = status.code().to_string())
    }

    /// Forward a scroll event from one pane to the other
    pub fn on_scroll<T>(&mut self, source: Pane, table: &mut T, timeline: &mut T) -> Option<f64>
    where
        T: ScrollSurface + ?Sized,
    {
        self.scroll.on_scroll(source, table, timeline)
    }

    /// Run the correction for `ticket` once the host laid out the timeline
    pub fn run_correction(&mut self, ticket: CorrectionTicket) -> CorrectionOutcome {
        self.timeline.run_correction(ticket)
    }

    /// Run the pending correction now
    pub fn flush(&mut self) -> Option<CorrectionOutcome> {
        self.timeline.flush()
    }

    /// Ticket of the pending correction
    pub fn pending_ticket(&self) -> Option<CorrectionTicket> {
        if self.timeline.is_pending() {
            self.last_outcome.as_ref().and_then(RenderOutcome::ticket)
        } else {
            None
        }
    }

    /// Drop the mounted timeline and any pending correction
    pub fn unmount(&mut self) {
        self.timeline.teardown();
        self.scroll.reset();
        self.last_outcome = None;
    }

    /// Standalone dual-pane page for the current state
    pub fn render_page(&mut self) -> String {
        if self.last_outcome.is_none() {
            self.rerender();
        }
        self.flush();
        self.with_content(|page, content| page.render(content))
    }

    /// View markup for a live host. A pending correction stays pending; the
    /// host runs it once the markup is laid out.
    pub fn render_body(&mut self) -> String {
        if self.last_outcome.is_none() {
            self.rerender();
        }
        self.with_content(|page, content| page.render_body(content))
    }

    pub fn stylesheet(&self) -> String {
        self.page.stylesheet()
    }

    pub fn theme_config(&self) -> &GanttTheme {
        &self.page.theme
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn with_content<R>(&self, f: impl FnOnce(&HtmlPageRenderer, &PageContent<'_>) -> R) -> R {
        let markup = self.timeline.markup();
        let options = self.options();
        let content = PageContent {
            tasks: &self.tasks,
            columns: self.preferences.columns(),
            toolbar: self.toolbar,
            options: &options,
            timeline: markup.as_deref(),
            selected: self.selected.as_deref(),
        };
        f(&self.page, &content)
    }

    fn after_mode_change(&mut self, changed: bool) -> bool {
        if changed {
            info!(mode = %self.toolbar.mode, "view mode changed");
            self.rerender();
            let mode = self.toolbar.mode;
            if let Some(callback) = self.on_view_mode_change.as_mut() {
                callback(mode);
            }
        }
        changed
    }

    fn activate(&mut self, id: &str) -> Option<&ScheduleTask> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        self.selected = Some(id.to_string());
        let task = &self.tasks[index];
        if let Some(callback) = self.on_task_activated.as_mut() {
            callback(task);
        }
        Some(task)
    }

    fn update_task(&mut self, id: &str, edit: impl FnOnce(&mut ScheduleTask)) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            debug!(id, "edit for unknown task ignored");
            return false;
        };
        edit(&mut self.tasks[index]);
        self.rerender();
        if let Some(callback) = self.on_task_updated.as_mut() {
            callback(&self.tasks[index]);
        }
        true
    }

    fn rerender(&mut self) {
        let layout = self.page.layout;
        let timeline_width = layout.timeline_width(self.preferences.columns().total_width());
        self.timeline.set_viewport(
            f64::from(timeline_width),
            f64::from(layout.container_height),
        );
        self.scroll.reset();
        let options = self.options();
        self.last_outcome = Some(self.timeline.render(&self.tasks, &options));
    }
}

impl<S, P> std::fmt::Debug for GanttView<S, P>
where
    S: KeyValueStore + std::fmt::Debug,
    P: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GanttView")
            .field("tasks", &self.tasks.len())
            .field("toolbar", &self.toolbar)
            .field("columns", self.preferences.columns())
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}
