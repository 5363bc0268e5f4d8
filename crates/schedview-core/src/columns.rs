//! Column catalog for the table pane
//!
//! The catalog is fixed at compile time. Each column carries a pure cell
//! renderer over a closed content model, so the table pane never has to deal
//! with free-form markup.

use serde::{Deserialize, Serialize};

use crate::{ScheduleTask, StyleClass, TaskStatus};

// ============================================================================
// Cell Content
// ============================================================================

/// Horizontal alignment of a column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Color family of a badge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
    Muted,
}

impl Tone {
    /// Tone used for a bar style's badge
    pub fn for_style(style: StyleClass) -> Self {
        match style {
            StyleClass::Planned => Tone::Neutral,
            StyleClass::InProgress => Tone::Info,
            StyleClass::Completed => Tone::Success,
            StyleClass::Delayed => Tone::Warning,
            StyleClass::Blocked => Tone::Danger,
            StyleClass::Cancelled => Tone::Muted,
            StyleClass::Milestone => Tone::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Neutral => "neutral",
            Tone::Info => "info",
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
            Tone::Muted => "muted",
        }
    }
}

/// Content of one table cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CellContent {
    Text(String),
    Badge { label: String, tone: Tone },
    /// Completion percentage, 0-100
    Progress(u8),
    Link { label: String, target: String },
}

impl CellContent {
    /// Plain-text rendering, used for sorting and text output
    pub fn plain_text(&self) -> String {
        match self {
            CellContent::Text(s) => s.clone(),
            CellContent::Badge { label, .. } | CellContent::Link { label, .. } => label.clone(),
            CellContent::Progress(p) => format!("{p}%"),
        }
    }
}

// ============================================================================
// Column Definitions
// ============================================================================

/// Renders one cell from a task and its zero-based row index
pub type CellRenderer = fn(&ScheduleTask, usize) -> CellContent;

/// A selectable table column
#[derive(Clone, Copy)]
pub struct ColumnDefinition {
    pub id: &'static str,
    pub label: &'static str,
    /// Width in pixels
    pub width: u32,
    pub align: Alignment,
    pub render: CellRenderer,
}

impl std::fmt::Debug for ColumnDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDefinition")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("align", &self.align)
            .finish_non_exhaustive()
    }
}

impl ColumnDefinition {
    pub fn render_cell(&self, task: &ScheduleTask, row_index: usize) -> CellContent {
        (self.render)(task, row_index)
    }
}

pub const NUMERO: &str = "numero";
pub const NOME: &str = "nome";
pub const DURACAO: &str = "duracao";
pub const INICIO: &str = "inicio";
pub const TERMINO: &str = "termino";
pub const PROGRESSO: &str = "progresso";
pub const RESPONSAVEL: &str = "responsavel";
pub const STATUS: &str = "status";
pub const PREDECESSORAS: &str = "predecessoras";
pub const TIPO: &str = "tipo";
pub const EQUIPE: &str = "equipe";
pub const PRIORIDADE: &str = "prioridade";
pub const OBSERVACOES: &str = "observacoes";

/// Columns that can never be hidden
pub const MANDATORY: [&str; 2] = [NUMERO, NOME];

/// Visible columns when nothing has been persisted yet
pub const DEFAULT_VISIBLE: [&str; 7] = [
    NUMERO,
    NOME,
    DURACAO,
    INICIO,
    TERMINO,
    PROGRESSO,
    RESPONSAVEL,
];

/// The full catalog, in panel order
pub static CATALOG: [ColumnDefinition; 13] = [
    ColumnDefinition {
        id: NUMERO,
        label: "Nº",
        width: 50,
        align: Alignment::Center,
        render: render_row_number,
    },
    ColumnDefinition {
        id: NOME,
        label: "Nome da Tarefa",
        width: 250,
        align: Alignment::Left,
        render: render_name,
    },
    ColumnDefinition {
        id: DURACAO,
        label: "Duração",
        width: 90,
        align: Alignment::Center,
        render: render_duration,
    },
    ColumnDefinition {
        id: INICIO,
        label: "Início",
        width: 100,
        align: Alignment::Center,
        render: render_start,
    },
    ColumnDefinition {
        id: TERMINO,
        label: "Término",
        width: 100,
        align: Alignment::Center,
        render: render_end,
    },
    ColumnDefinition {
        id: PROGRESSO,
        label: "Progresso",
        width: 120,
        align: Alignment::Center,
        render: render_progress,
    },
    ColumnDefinition {
        id: RESPONSAVEL,
        label: "Responsável",
        width: 150,
        align: Alignment::Left,
        render: render_assignee,
    },
    ColumnDefinition {
        id: STATUS,
        label: "Status",
        width: 120,
        align: Alignment::Center,
        render: render_status,
    },
    ColumnDefinition {
        id: PREDECESSORAS,
        label: "Predecessoras",
        width: 120,
        align: Alignment::Left,
        render: render_predecessors,
    },
    ColumnDefinition {
        id: TIPO,
        label: "Tipo",
        width: 110,
        align: Alignment::Left,
        render: render_type,
    },
    ColumnDefinition {
        id: EQUIPE,
        label: "Equipe",
        width: 120,
        align: Alignment::Left,
        render: render_team,
    },
    ColumnDefinition {
        id: PRIORIDADE,
        label: "Prioridade",
        width: 100,
        align: Alignment::Center,
        render: render_priority,
    },
    ColumnDefinition {
        id: OBSERVACOES,
        label: "Observações",
        width: 200,
        align: Alignment::Left,
        render: render_notes,
    },
];

/// Look up a column by id
pub fn get(id: &str) -> Option<&'static ColumnDefinition> {
    CATALOG.iter().find(|c| c.id == id)
}

pub fn is_known(id: &str) -> bool {
    get(id).is_some()
}

pub fn is_mandatory(id: &str) -> bool {
    MANDATORY.contains(&id)
}

/// Width of a column, `None` for unknown ids
pub fn width_of(id: &str) -> Option<u32> {
    get(id).map(|c| c.width)
}

/// Render one cell, `None` for unknown ids
pub fn render_cell(id: &str, task: &ScheduleTask, row_index: usize) -> Option<CellContent> {
    get(id).map(|c| c.render_cell(task, row_index))
}

/// Resolve ids to definitions, silently dropping unknown ones
pub fn resolve<'a, I>(ids: I) -> Vec<&'static ColumnDefinition>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter().filter_map(get).collect()
}

/// Sum of the widths of the given columns; unknown ids count as zero
pub fn total_width<'a, I>(ids: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    resolve(ids).iter().map(|c| c.width).sum()
}

// ============================================================================
// Cell Renderers
// ============================================================================

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn text_or_dash(value: Option<&str>) -> CellContent {
    match value {
        Some(v) if !v.trim().is_empty() => CellContent::Text(v.to_string()),
        _ => CellContent::Text("-".to_string()),
    }
}

fn render_row_number(_task: &ScheduleTask, row: usize) -> CellContent {
    CellContent::Text((row + 1).to_string())
}

fn render_name(task: &ScheduleTask, _row: usize) -> CellContent {
    CellContent::Text(task.name.clone())
}

fn render_start(task: &ScheduleTask, _row: usize) -> CellContent {
    CellContent::Text(format_date(task.start))
}

fn render_end(task: &ScheduleTask, _row: usize) -> CellContent {
    CellContent::Text(format_date(task.end))
}

fn render_progress(task: &ScheduleTask, _row: usize) -> CellContent {
    CellContent::Progress(task.clamped_progress().round() as u8)
}

fn render_predecessors(task: &ScheduleTask, _row: usize) -> CellContent {
    if task.predecessors.is_empty() {
        return CellContent::Text("-".to_string());
    }
    CellContent::Text(task.predecessors.join(", "))
}

fn render_type(task: &ScheduleTask, _row: usize) -> CellContent {
    text_or_dash(task.task_type.as_deref())
}

fn render_team(task: &ScheduleTask, _row: usize) -> CellContent {
    text_or_dash(task.team.as_deref())
}

fn render_notes(task: &ScheduleTask, _row: usize) -> CellContent {
    text_or_dash(task.notes.as_deref())
}

fn render_duration(task: &ScheduleTask, _row: usize) -> CellContent {
    let days = task.duration_days();
    let label = if days == 1 {
        "1 dia".to_string()
    } else {
        format!("{days} dias")
    };
    CellContent::Text(label)
}

fn render_assignee(task: &ScheduleTask, _row: usize) -> CellContent {
    match &task.assignee {
        Some(a) if !a.id.is_empty() => CellContent::Link {
            label: a.name.clone(),
            target: format!("/usuarios/{}", a.id),
        },
        Some(a) if !a.name.is_empty() => CellContent::Text(a.name.clone()),
        _ => CellContent::Text("-".to_string()),
    }
}

fn render_status(task: &ScheduleTask, _row: usize) -> CellContent {
    let style = StyleClass::for_task(task);
    let label = match style {
        StyleClass::Milestone => style.label(),
        _ => task.known_status().unwrap_or_default().label(),
    };
    CellContent::Badge {
        label: label.to_string(),
        tone: Tone::for_style(style),
    }
}

fn render_priority(task: &ScheduleTask, _row: usize) -> CellContent {
    let Some(raw) = task.priority.as_deref().filter(|p| !p.trim().is_empty()) else {
        return CellContent::Text("-".to_string());
    };
    let tone = match raw.trim().to_lowercase().as_str() {
        "alta" | "high" | "critica" | "crítica" => Tone::Danger,
        "media" | "média" | "medium" => Tone::Warning,
        "baixa" | "low" => Tone::Success,
        _ => Tone::Neutral,
    };
    CellContent::Badge {
        label: raw.to_string(),
        tone,
    }
}

/// Status of a task as a badge, exposed for the legend and tooltips
pub fn status_badge(status: TaskStatus) -> CellContent {
    let style = StyleClass::from_status(status);
    CellContent::Badge {
        label: status.label().to_string(),
        tone: Tone::for_style(style),
    }
}
