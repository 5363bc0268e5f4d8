//! Integration tests for the dual-pane Gantt view

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use schedview_core::columns::{DURACAO, RESPONSAVEL};
use schedview_core::prefs::{self, PREFERENCE_KEY};
use schedview_core::{
    BarRepresentation, DragEnd, DragSurface, MemoryStore, Pane, RenderError, ScheduleTask,
    ScrollSurface, ViewMode,
};
use schedview_render::{
    correct, BarChartPrimitive, ChartOptions, CorrectableSvg, GanttTheme, GanttView, SvgTree,
    TimelineChart,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn project() -> Vec<ScheduleTask> {
    vec![
        ScheduleTask::new("mobilizacao")
            .name("Mobilização do canteiro")
            .dates(date(2025, 2, 3), date(2025, 2, 7))
            .status("concluida")
            .progress(100.0)
            .assign("u1", "Carla Souza"),
        ScheduleTask::new("fundacao")
            .name("Fundação")
            .dates(date(2025, 2, 10), date(2025, 2, 28))
            .status("em_andamento")
            .progress(35.0)
            .depends_on("mobilizacao"),
        ScheduleTask::new("estrutura")
            .name("Estrutura")
            .dates(date(2025, 3, 3), date(2025, 4, 11))
            .status("planejada")
            .depends_on("fundacao"),
        ScheduleTask::new("laje")
            .name("Laje concluída")
            .dates(date(2025, 4, 11), date(2025, 4, 11))
            .status("planejada")
            .milestone()
            .depends_on("estrutura"),
    ]
}

#[test]
fn primitive_output_is_fixed_by_correction() {
    let bars = schedview_core::to_bars(&project());
    let markup = TimelineChart::new()
        .render(&bars, &ChartOptions::new(ViewMode::Week))
        .unwrap();

    let mut tree = SvgTree::parse(&markup).unwrap();
    tree.mount(900.0, 202.0);
    let theme = GanttTheme::light();
    assert!(correct(&mut tree, &theme).is_corrected());

    let root = tree.root().unwrap();
    let children = tree.children(root);
    assert!(tree.has_class(children[0], "grid"));
    let tail: Vec<_> = children[children.len() - 4..]
        .iter()
        .map(|c| tree.attr(*c, "data-id").unwrap_or_default().to_string())
        .collect();
    assert_eq!(tail, vec!["mobilizacao", "fundacao", "estrutura", "laje"]);

    let laje = children[children.len() - 1];
    let diamond = tree.descendants_with_class(laje, "bar")[0];
    assert_eq!(tree.attr(diamond, "fill"), Some(theme.milestone.fill.as_str()));
    assert_eq!(tree.attr(root, "viewBox"), Some("0 0 900 202"));
}

#[test]
fn full_page_for_a_project() {
    let mut view = GanttView::new(MemoryStore::new())
        .view_mode(ViewMode::Month)
        .title("Edifício Aurora");
    view.set_tasks(project());
    let html = view.render_page();

    assert!(html.contains("Edifício Aurora"));
    for id in ["mobilizacao", "fundacao", "estrutura", "laje"] {
        assert!(html.contains(&format!(r#"data-task-id="{id}""#)), "row {id}");
        assert!(html.contains(&format!(r#"data-id="{id}""#)), "bar {id}");
    }
    assert!(html.contains("bar-completed"));
    assert!(html.contains("bar-milestone"));
    assert!(html.contains(r#"/usuarios/u1"#));
    assert!(html.contains("Carla Souza"));
}

#[test]
fn column_scenario_survives_reload() {
    let mut view = GanttView::new(MemoryStore::new());
    view.set_tasks(project());

    assert!(view.toggle_column(DURACAO));
    let from = view.columns().position(RESPONSAVEL).unwrap();
    let to = view.columns().position("progresso").unwrap();
    assert!(view.apply_drag(&DragEnd::new(DragSurface::ConfigPanel, from, Some(to))));

    let expected = ["numero", "nome", "inicio", "termino", "responsavel", "progresso"];
    assert_eq!(view.columns().ids(), &expected);

    let reloaded = GanttView::new(view.preferences().store().clone());
    assert_eq!(reloaded.columns().ids(), &expected);
}

#[test]
fn corrupt_preferences_fall_back_to_default() {
    let view = GanttView::new(MemoryStore::with_entry(PREFERENCE_KEY, "[\"numero\","));
    let fresh = GanttView::new(MemoryStore::new());
    assert_eq!(view.columns(), fresh.columns());
    // the unreadable value is replaced by the default on open
    assert_eq!(
        prefs::load(view.preferences().store()),
        Some(fresh.columns().clone())
    );
}

struct Panel(f64);

impl ScrollSurface for Panel {
    fn scroll_top(&self) -> f64 {
        self.0
    }

    fn set_scroll_top(&mut self, offset: f64) {
        self.0 = offset;
    }
}

#[test]
fn panes_scroll_together() {
    let mut view = GanttView::new(MemoryStore::new());
    view.set_tasks(project());
    let mut table = Panel(0.0);
    let mut timeline = Panel(0.0);

    table.0 = 240.0;
    assert_eq!(view.on_scroll(Pane::Table, &mut table, &mut timeline), Some(240.0));
    assert_eq!(timeline.0, 240.0);
    // the echo from the programmatic write is swallowed
    assert_eq!(view.on_scroll(Pane::Timeline, &mut table, &mut timeline), None);

    timeline.0 = 76.0;
    assert_eq!(view.on_scroll(Pane::Timeline, &mut table, &mut timeline), Some(76.0));
    assert_eq!(table.0, 76.0);
}

struct Unavailable;

impl BarChartPrimitive for Unavailable {
    fn render(
        &self,
        _bars: &[BarRepresentation],
        _options: &ChartOptions,
    ) -> Result<String, RenderError> {
        Err(RenderError::Primitive("not loaded".into()))
    }
}

#[test]
fn failing_primitive_leaves_the_table() {
    let mut view = GanttView::with_primitive(MemoryStore::new(), Unavailable);
    view.set_tasks(project());
    assert!(view.is_degraded());
    assert!(view.flush().is_none());

    let html = view.render_page();
    assert!(html.contains("timeline-unavailable"));
    assert!(html.contains(r#"data-task-id="laje""#));

    // view operations keep working
    assert!(view.zoom_out());
    assert!(view.is_degraded());
}

#[test]
fn correcting_twice_matches_correcting_once() {
    let bars = schedview_core::to_bars(&project());
    let markup = TimelineChart::new()
        .render(&bars, &ChartOptions::new(ViewMode::Day))
        .unwrap();
    let mut tree = SvgTree::parse(&markup).unwrap();
    tree.mount(1200.0, 202.0);
    let theme = GanttTheme::dark();

    correct(&mut tree, &theme);
    let once = tree.to_markup();
    correct(&mut tree, &theme);
    assert_eq!(tree.to_markup(), once);
    assert_eq!(CorrectableSvg::client_size(&tree), (1200.0, 202.0));
}
