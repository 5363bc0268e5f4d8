//! Task model adapter
//!
//! Converts schedule tasks into the bar representation consumed by the
//! timeline primitive. Pure: identical input yields identical field values,
//! so callers can compare outputs to skip redundant renders.

use chrono::NaiveDate;

use crate::{BarRepresentation, ScheduleTask, StyleClass, BAR_DATE_FORMAT};

/// Separator used when joining predecessor ids
pub const DEPENDENCY_SEPARATOR: &str = ", ";

/// Convert tasks into bars, one per task, in input order.
pub fn to_bars(tasks: &[ScheduleTask]) -> Vec<BarRepresentation> {
    let anchor = earliest_known_date(tasks).unwrap_or_default();
    tasks.iter().map(|task| to_bar(task, anchor)).collect()
}

/// Convert a single task. `anchor` places tasks that carry no dates at all.
pub fn to_bar(task: &ScheduleTask, anchor: NaiveDate) -> BarRepresentation {
    let (start, end) = resolve_dates(task, anchor);

    BarRepresentation {
        id: task.id.clone(),
        name: String::new(),
        start: start.format(BAR_DATE_FORMAT).to_string(),
        end: end.format(BAR_DATE_FORMAT).to_string(),
        progress: task.clamped_progress() / 100.0,
        dependencies: join_dependencies(&task.predecessors),
        style_class: StyleClass::for_task(task),
    }
}

/// Join predecessor ids; an empty list means "no dependency edges".
pub fn join_dependencies(predecessors: &[String]) -> Option<String> {
    if predecessors.is_empty() {
        None
    } else {
        Some(predecessors.join(DEPENDENCY_SEPARATOR))
    }
}

fn resolve_dates(task: &ScheduleTask, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (start, end) = match (task.start, task.end) {
        (Some(s), Some(e)) => (s, e),
        (Some(s), None) => (s, s),
        (None, Some(e)) => (e, e),
        (None, None) => (anchor, anchor),
    };
    if end < start {
        (end, start)
    } else {
        (start, end)
    }
}

fn earliest_known_date(tasks: &[ScheduleTask]) -> Option<NaiveDate> {
    tasks
        .iter()
        .flat_map(|t| [t.start, t.end])
        .flatten()
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskStatus;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<ScheduleTask> {
        vec![
            ScheduleTask::new("a")
                .dates(date(2025, 5, 5), date(2025, 5, 9))
                .status("em_andamento")
                .progress(50.0),
            ScheduleTask::new("b")
                .dates(date(2025, 5, 12), date(2025, 5, 12))
                .status("planejada")
                .milestone()
                .depends_on("a"),
            ScheduleTask::new("c")
                .dates(date(2025, 5, 12), date(2025, 5, 20))
                .status("sem status")
                .depends_on("a")
                .depends_on("b"),
        ]
    }

    #[test]
    fn one_bar_per_task_in_order() {
        let tasks = sample();
        let bars = to_bars(&tasks);
        assert_eq!(bars.len(), tasks.len());
        let ids: Vec<_> = bars.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn in_progress_and_milestone_scenario() {
        let bars = to_bars(&sample());
        assert_eq!(bars[0].style_class, StyleClass::InProgress);
        assert_eq!(bars[1].style_class, StyleClass::Milestone);
    }

    #[test]
    fn unknown_status_defaults_to_planned() {
        for raw in ["sem status", "", "ARQUIVADA", "??"] {
            let bar = to_bar(&ScheduleTask::new("x").status(raw), date(2025, 1, 1));
            assert_eq!(bar.style_class, StyleClass::Planned, "status {raw:?}");
        }
    }

    #[test]
    fn milestone_overrides_every_status() {
        let raws = [
            "planejada",
            "em_andamento",
            "concluida",
            "atrasada",
            "bloqueada",
            "cancelada",
            "unknown",
        ];
        for raw in raws {
            let plain = to_bar(&ScheduleTask::new("x").status(raw), date(2025, 1, 1));
            let milestone = to_bar(
                &ScheduleTask::new("x").status(raw).milestone(),
                date(2025, 1, 1),
            );
            assert_eq!(milestone.style_class, StyleClass::Milestone);
            assert_ne!(plain.style_class, StyleClass::Milestone);
        }
    }

    #[test]
    fn status_mapping_is_total() {
        for status in TaskStatus::ALL {
            let style = StyleClass::from_status(status);
            assert_ne!(style, StyleClass::Milestone);
        }
    }

    #[test]
    fn dependencies_joined_or_absent() {
        let bars = to_bars(&sample());
        assert_eq!(bars[0].dependencies, None);
        assert_eq!(bars[1].dependencies.as_deref(), Some("a"));
        assert_eq!(bars[2].dependencies.as_deref(), Some("a, b"));
    }

    #[test]
    fn labels_are_empty_and_progress_is_a_ratio() {
        let bars = to_bars(&sample());
        assert!(bars.iter().all(|b| b.name.is_empty()));
        assert_eq!(bars[0].progress, 0.5);
        assert_eq!(bars[1].progress, 0.0);
    }

    #[test]
    fn stable_for_identical_input() {
        let tasks = sample();
        assert_eq!(to_bars(&tasks), to_bars(&tasks.clone()));
    }

    #[test]
    fn missing_dates_are_defaulted() {
        let tasks = vec![
            ScheduleTask::new("only-start"),
            ScheduleTask::new("dated").dates(date(2025, 3, 10), date(2025, 3, 14)),
            ScheduleTask::new("inverted").dates(date(2025, 3, 20), date(2025, 3, 18)),
        ];
        let mut tasks = tasks;
        tasks[0].start = Some(date(2025, 3, 12));
        tasks.push(ScheduleTask::new("undated"));

        let bars = to_bars(&tasks);
        assert_eq!((bars[0].start.as_str(), bars[0].end.as_str()), ("2025-03-12", "2025-03-12"));
        assert_eq!((bars[2].start.as_str(), bars[2].end.as_str()), ("2025-03-18", "2025-03-20"));
        assert_eq!((bars[3].start.as_str(), bars[3].end.as_str()), ("2025-03-10", "2025-03-10"));
    }

    #[test]
    fn undated_list_anchors_at_epoch() {
        let bars = to_bars(&[ScheduleTask::new("x")]);
        assert_eq!(bars[0].start, "1970-01-01");
    }

    #[test]
    fn empty_input_yields_no_bars() {
        assert!(to_bars(&[]).is_empty());
    }
}
