//! # schedview-core
//!
//! Core domain model and view state for the schedview dual-pane Gantt view.
//!
//! This crate provides:
//! - Domain types: `ScheduleTask`, `TaskStatus`, `StyleClass`, `BarRepresentation`
//! - The task model adapter (`adapter::to_bars`)
//! - The column catalog and the visible column list (`columns`, `layout`)
//! - Column preference persistence over a key-value slot (`prefs`)
//! - Scroll synchronization between the table and timeline panes (`scroll`)
//! - Toolbar state: view mode and legend visibility (`toolbar`)
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use schedview_core::{adapter::to_bars, ScheduleTask, StyleClass};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
//! let tasks = vec![
//!     ScheduleTask::new("fundacao")
//!         .name("Fundação")
//!         .dates(day(3), day(14))
//!         .status("em_andamento")
//!         .progress(40.0),
//!     ScheduleTask::new("entrega")
//!         .name("Entrega da estrutura")
//!         .dates(day(14), day(14))
//!         .milestone()
//!         .depends_on("fundacao"),
//! ];
//!
//! let bars = to_bars(&tasks);
//! assert_eq!(bars[0].style_class, StyleClass::InProgress);
//! assert_eq!(bars[1].style_class, StyleClass::Milestone);
//! assert_eq!(bars[1].dependencies.as_deref(), Some("fundacao"));
//! ```

pub mod adapter;
pub mod columns;
pub mod layout;
pub mod prefs;
pub mod scroll;
pub mod toolbar;

pub use adapter::to_bars;
pub use columns::{Alignment, CellContent, ColumnDefinition, Tone};
pub use layout::{DragEnd, DragSurface, VisibleColumns};
pub use prefs::{ColumnPreferences, KeyValueStore, MemoryStore};
pub use scroll::{Pane, ScrollSurface, ScrollSync};
pub use toolbar::{Toolbar, ViewMode};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a schedule task
pub type TaskId = String;

// ============================================================================
// Schedule Task
// ============================================================================

/// A task record as supplied by the data service.
///
/// Field names follow the service's JSON (`isMilestone`, `type`, ...).
/// Every field except `id` is optional on input so that partially filled
/// records still load; the adapter defaults whatever is missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTask {
    /// Unique identifier; numeric ids are read as their decimal text
    #[serde(deserialize_with = "lenient::id")]
    pub id: TaskId,
    /// Human-readable name
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Planned start date
    #[serde(default, with = "lenient::date")]
    pub start: Option<NaiveDate>,
    /// Planned end date
    #[serde(default, with = "lenient::date")]
    pub end: Option<NaiveDate>,
    /// Completion percentage (0-100)
    #[serde(default, deserialize_with = "lenient::number")]
    pub progress: f64,
    /// Raw status value, see [`TaskStatus::parse`]
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    /// Zero-duration marker task
    #[serde(default, rename = "isMilestone", deserialize_with = "lenient::flag")]
    pub milestone: bool,
    /// Predecessor task ids, in order
    #[serde(default, deserialize_with = "lenient::ids")]
    pub predecessors: Vec<TaskId>,
    /// Person responsible for the task
    #[serde(default)]
    pub assignee: Option<Assignee>,
    /// Free-text task type
    #[serde(default, rename = "type", deserialize_with = "lenient::opt_string")]
    pub task_type: Option<String>,
    /// Free-text team
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub team: Option<String>,
    /// Free-text priority
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub priority: Option<String>,
    /// Free-text notes
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
}

impl ScheduleTask {
    /// Create a new task with the given ID
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Self::default()
        }
    }

    /// Set the task name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set planned start and end dates
    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set the raw status value
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set completion percentage
    pub fn progress(mut self, percent: f64) -> Self {
        self.progress = percent;
        self
    }

    /// Mark as milestone
    pub fn milestone(mut self) -> Self {
        self.milestone = true;
        self
    }

    /// Add a predecessor
    pub fn depends_on(mut self, predecessor: impl Into<String>) -> Self {
        self.predecessors.push(predecessor.into());
        self
    }

    /// Assign a responsible person
    pub fn assign(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.assignee = Some(Assignee {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Parsed status, `None` when the raw value is not recognized
    pub fn known_status(&self) -> Option<TaskStatus> {
        TaskStatus::parse(&self.status)
    }

    /// Completion percentage clamped to 0-100 (NaN counts as 0)
    pub fn clamped_progress(&self) -> f64 {
        if self.progress.is_nan() {
            0.0
        } else {
            self.progress.clamp(0.0, 100.0)
        }
    }

    /// Planned duration in calendar days, inclusive of both ends.
    ///
    /// Milestones and tasks without dates have a duration of zero.
    pub fn duration_days(&self) -> i64 {
        if self.milestone {
            return 0;
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => (end - start).num_days().abs() + 1,
            _ => 0,
        }
    }
}

/// Reference to the person responsible for a task
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
}

// ============================================================================
// Status and Style
// ============================================================================

/// Task status as understood by the view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Delayed,
    Blocked,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Planned,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Delayed,
        TaskStatus::Blocked,
        TaskStatus::Cancelled,
    ];

    /// Parse a raw status value.
    ///
    /// Accepts the dashboard's Portuguese values (`planejada`, `em_andamento`,
    /// `concluída`, ...) and their English equivalents. Case, accents and the
    /// separator (`_`, `-`, space) are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .trim()
            .chars()
            .map(fold_char)
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect();

        match key.as_str() {
            "planejada" | "planejado" | "planned" | "notstarted" => Some(TaskStatus::Planned),
            "emandamento" | "andamento" | "inprogress" => Some(TaskStatus::InProgress),
            "concluida" | "concluido" | "completed" | "done" => Some(TaskStatus::Completed),
            "atrasada" | "atrasado" | "delayed" | "late" => Some(TaskStatus::Delayed),
            "bloqueada" | "bloqueado" | "blocked" => Some(TaskStatus::Blocked),
            "cancelada" | "cancelado" | "cancelled" | "canceled" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }

    /// Raw value written back to a task on edit
    pub fn code(&self) -> &'static str {
        match self {
            TaskStatus::Planned => "planejada",
            TaskStatus::InProgress => "em_andamento",
            TaskStatus::Completed => "concluida",
            TaskStatus::Delayed => "atrasada",
            TaskStatus::Blocked => "bloqueada",
            TaskStatus::Cancelled => "cancelada",
        }
    }

    /// Display label used in badges and the legend
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Planned => "Planejada",
            TaskStatus::InProgress => "Em andamento",
            TaskStatus::Completed => "Concluída",
            TaskStatus::Delayed => "Atrasada",
            TaskStatus::Blocked => "Bloqueada",
            TaskStatus::Cancelled => "Cancelada",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn fold_char(c: char) -> char {
    match c.to_ascii_lowercase() {
        'á' | 'à' | 'â' | 'ã' | 'Á' | 'À' | 'Â' | 'Ã' => 'a',
        'é' | 'ê' | 'É' | 'Ê' => 'e',
        'í' | 'Í' => 'i',
        'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => 'o',
        'ú' | 'Ú' => 'u',
        'ç' | 'Ç' => 'c',
        other => other,
    }
}

/// Style tag attached to a bar; the corrector keys bar colors on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleClass {
    #[serde(rename = "bar-planned")]
    Planned,
    #[serde(rename = "bar-in-progress")]
    InProgress,
    #[serde(rename = "bar-completed")]
    Completed,
    #[serde(rename = "bar-delayed")]
    Delayed,
    #[serde(rename = "bar-blocked")]
    Blocked,
    #[serde(rename = "bar-cancelled")]
    Cancelled,
    #[serde(rename = "bar-milestone")]
    Milestone,
}

impl StyleClass {
    pub const ALL: [StyleClass; 7] = [
        StyleClass::Planned,
        StyleClass::InProgress,
        StyleClass::Completed,
        StyleClass::Delayed,
        StyleClass::Blocked,
        StyleClass::Cancelled,
        StyleClass::Milestone,
    ];

    /// Style for a status; total over all statuses
    pub fn from_status(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Planned => StyleClass::Planned,
            TaskStatus::InProgress => StyleClass::InProgress,
            TaskStatus::Completed => StyleClass::Completed,
            TaskStatus::Delayed => StyleClass::Delayed,
            TaskStatus::Blocked => StyleClass::Blocked,
            TaskStatus::Cancelled => StyleClass::Cancelled,
        }
    }

    /// Resolve the style for a task. Milestone wins over status, unknown
    /// statuses fall back to planned.
    pub fn for_task(task: &ScheduleTask) -> Self {
        if task.milestone {
            return StyleClass::Milestone;
        }
        Self::from_status(task.known_status().unwrap_or_default())
    }

    /// CSS class name carried by the bar wrapper
    pub fn class_name(&self) -> &'static str {
        match self {
            StyleClass::Planned => "bar-planned",
            StyleClass::InProgress => "bar-in-progress",
            StyleClass::Completed => "bar-completed",
            StyleClass::Delayed => "bar-delayed",
            StyleClass::Blocked => "bar-blocked",
            StyleClass::Cancelled => "bar-cancelled",
            StyleClass::Milestone => "bar-milestone",
        }
    }

    pub fn from_class_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.class_name() == name)
    }

    /// Legend label
    pub fn label(&self) -> &'static str {
        match self {
            StyleClass::Milestone => "Marco",
            StyleClass::Planned => TaskStatus::Planned.label(),
            StyleClass::InProgress => TaskStatus::InProgress.label(),
            StyleClass::Completed => TaskStatus::Completed.label(),
            StyleClass::Delayed => TaskStatus::Delayed.label(),
            StyleClass::Blocked => TaskStatus::Blocked.label(),
            StyleClass::Cancelled => TaskStatus::Cancelled.label(),
        }
    }
}

impl std::fmt::Display for StyleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.class_name())
    }
}

// ============================================================================
// Bar Representation
// ============================================================================

/// What the bar-chart primitive consumes for one task.
///
/// Labels are drawn by the table pane, so `name` is always empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarRepresentation {
    pub id: TaskId,
    pub name: String,
    /// `YYYY-MM-DD`
    pub start: String,
    /// `YYYY-MM-DD`
    pub end: String,
    /// Completion ratio (0.0-1.0)
    pub progress: f64,
    /// Predecessor ids joined with `", "`; absent when there are none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<String>,
    #[serde(rename = "custom_class")]
    pub style_class: StyleClass,
}

impl BarRepresentation {
    /// Start date parsed back from its primitive string
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_bar_date(&self.start)
    }

    /// End date parsed back from its primitive string
    pub fn end_date(&self) -> Option<NaiveDate> {
        parse_bar_date(&self.end)
    }

    /// Predecessor ids split back out of the joined string
    pub fn dependency_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Date format shared by bars and the timeline primitive
pub const BAR_DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_bar_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, BAR_DATE_FORMAT).ok()
}

/// Field deserializers for service records.
///
/// Services send `null` for unset fields, numbers for ids and the odd
/// comma-separated list. A field that cannot be read falls back to its
/// default instead of failing the whole record.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// String or number; anything else is a hard error
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected a string or number id, got {other}"
            ))),
        }
    }

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_to_string(Value::deserialize(deserializer)?))
    }

    /// Numbers and numeric strings; `null` and garbage read as zero
    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        Ok(value.unwrap_or(0.0))
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => matches!(s.trim(), "true" | "1"),
            _ => false,
        })
    }

    /// An array of ids, a comma-separated string, or `null`
    pub fn ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(scalar_to_string)
                .filter(|id| !id.is_empty())
                .collect(),
            Value::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
            Value::Number(n) => vec![n.to_string()],
            _ => Vec::new(),
        })
    }

    /// Accepts `YYYY-MM-DD`, full ISO timestamps, null or garbage (as `None`)
    pub mod date {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};
        use serde_json::Value;

        pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(d) => {
                    serializer.serialize_str(&d.format(crate::BAR_DATE_FORMAT).to_string())
                }
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let Value::String(s) = Value::deserialize(deserializer)? else {
                return Ok(None);
            };
            let day = s.get(..10).unwrap_or(&s);
            Ok(NaiveDate::parse_from_str(day, crate::BAR_DATE_FORMAT).ok())
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Key-value store error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed store contents: {0}")]
    Malformed(String),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Chart primitive failed: {0}")]
    Primitive(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn task_builder() {
        let task = ScheduleTask::new("alvenaria")
            .name("Alvenaria")
            .dates(date(2025, 2, 3), date(2025, 2, 7))
            .status("atrasada")
            .progress(30.0)
            .depends_on("fundacao")
            .assign("u7", "Marina Costa");

        assert_eq!(task.id, "alvenaria");
        assert_eq!(task.name, "Alvenaria");
        assert_eq!(task.known_status(), Some(TaskStatus::Delayed));
        assert_eq!(task.predecessors, vec!["fundacao"]);
        assert_eq!(task.duration_days(), 5);
        assert_eq!(task.assignee.unwrap().name, "Marina Costa");
    }

    #[test]
    fn status_parse_accepts_both_vocabularies() {
        assert_eq!(TaskStatus::parse("em_andamento"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("Em Andamento"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("in-progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("concluída"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::parse("CANCELED"), Some(TaskStatus::Cancelled));
        assert_eq!(TaskStatus::parse("arquivada"), None);
        assert_eq!(TaskStatus::parse(""), None);
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.code()), Some(status));
        }
    }

    #[test]
    fn style_class_round_trips_through_class_name() {
        for style in StyleClass::ALL {
            assert_eq!(StyleClass::from_class_name(style.class_name()), Some(style));
        }
        assert_eq!(StyleClass::from_class_name("bar-wrapper"), None);
    }

    #[test]
    fn progress_clamping() {
        assert_eq!(ScheduleTask::new("a").progress(140.0).clamped_progress(), 100.0);
        assert_eq!(ScheduleTask::new("a").progress(-3.0).clamped_progress(), 0.0);
        assert_eq!(ScheduleTask::new("a").progress(f64::NAN).clamped_progress(), 0.0);
    }

    #[test]
    fn milestone_has_zero_duration() {
        let task = ScheduleTask::new("m")
            .dates(date(2025, 1, 1), date(2025, 1, 9))
            .milestone();
        assert_eq!(task.duration_days(), 0);
    }

    #[test]
    fn deserialize_service_record() {
        let json = r#"{
            "id": "t1",
            "name": "Concretagem",
            "start": "2025-04-01T00:00:00.000Z",
            "end": "2025-04-10",
            "progress": 55,
            "status": "em_andamento",
            "isMilestone": false,
            "predecessors": ["t0"],
            "assignee": { "id": "42", "name": "João" },
            "type": "Execução",
            "team": "Estrutura"
        }"#;
        let task: ScheduleTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.start, Some(date(2025, 4, 1)));
        assert_eq!(task.end, Some(date(2025, 4, 10)));
        assert_eq!(task.progress, 55.0);
        assert_eq!(task.task_type.as_deref(), Some("Execução"));
        assert!(task.notes.is_none());
    }

    #[test]
    fn deserialize_tolerates_bad_dates() {
        let json = r#"{ "id": "t1", "start": "not a date", "end": null }"#;
        let task: ScheduleTask = serde_json::from_str(json).unwrap();
        assert!(task.start.is_none());
        assert!(task.end.is_none());
        assert_eq!(task.status, "");
    }

    #[test]
    fn deserialize_tolerates_nulls() {
        let json = r#"{
            "id": "t1",
            "name": null,
            "status": null,
            "progress": null,
            "isMilestone": null,
            "predecessors": null,
            "assignee": null,
            "type": null,
            "notes": null
        }"#;
        let task: ScheduleTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.name, "");
        assert_eq!(task.status, "");
        assert_eq!(task.progress, 0.0);
        assert!(!task.milestone);
        assert!(task.predecessors.is_empty());
        assert!(task.assignee.is_none());
        assert!(task.task_type.is_none());
    }

    #[test]
    fn deserialize_numeric_ids_and_loose_scalars() {
        let json = r#"{
            "id": 17,
            "progress": "42.5",
            "isMilestone": 1,
            "predecessors": [15, "16", null],
            "assignee": { "id": 7, "name": "Ana" },
            "priority": 2
        }"#;
        let task: ScheduleTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "17");
        assert_eq!(task.progress, 42.5);
        assert!(task.milestone);
        assert_eq!(task.predecessors, vec!["15", "16"]);
        assert_eq!(task.assignee.unwrap().id, "7");
        assert_eq!(task.priority.as_deref(), Some("2"));

        let listed: ScheduleTask =
            serde_json::from_str(r#"{ "id": "x", "predecessors": "a, b,," }"#).unwrap();
        assert_eq!(listed.predecessors, vec!["a", "b"]);
    }

    #[test]
    fn deserialize_requires_an_id() {
        assert!(serde_json::from_str::<ScheduleTask>(r#"{ "name": "x" }"#).is_err());
        assert!(serde_json::from_str::<ScheduleTask>(r#"{ "id": null }"#).is_err());
    }

    #[test]
    fn one_odd_record_does_not_sink_the_list() {
        let json = r#"[
            { "id": 1, "status": null, "start": "2025-01-06", "end": "2025-01-10" },
            { "id": "2", "progress": null, "predecessors": null, "start": 20250113 }
        ]"#;
        let tasks: Vec<ScheduleTask> = serde_json::from_str(json).unwrap();
        let bars = to_bars(&tasks);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].style_class, StyleClass::Planned);
        assert_eq!(bars[1].progress, 0.0);
    }

    #[test]
    fn bar_dependency_ids_split() {
        let bar = BarRepresentation {
            id: "c".into(),
            name: String::new(),
            start: "2025-01-01".into(),
            end: "2025-01-02".into(),
            progress: 0.0,
            dependencies: Some("a, b".into()),
            style_class: StyleClass::Planned,
        };
        assert_eq!(bar.dependency_ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(bar.start_date(), Some(date(2025, 1, 1)));
    }

    #[test]
    fn bar_serializes_primitive_field_names() {
        let bar = BarRepresentation {
            id: "a".into(),
            name: String::new(),
            start: "2025-01-01".into(),
            end: "2025-01-02".into(),
            progress: 0.5,
            dependencies: None,
            style_class: StyleClass::Milestone,
        };
        let json = serde_json::to_value(&bar).unwrap();
        assert_eq!(json["custom_class"], "bar-milestone");
        assert!(json.get("dependencies").is_none());
    }
}
