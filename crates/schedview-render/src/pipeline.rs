//! Render pipeline for the timeline pane
//!
//! One render cycle is adapter, then primitive, then a deferred correction.
//! Every render bumps a generation counter and tears down the previous
//! mount, so a correction ticket issued before a newer render is ignored.

use tracing::{debug, error};

use schedview_core::{to_bars, RenderError, ScheduleTask};

use crate::correct::{correct, CorrectionOutcome, SkipReason};
use crate::dom::SvgTree;
use crate::theme::GanttTheme;
use crate::timeline::{BarChartPrimitive, ChartOptions, TimelineChart};

/// Permission to run the correction for one render generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorrectionTicket {
    generation: u64,
}

impl CorrectionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of starting a render cycle
#[derive(Debug)]
pub enum RenderOutcome {
    /// The timeline is mounted; run the ticket once the host has laid it out
    Scheduled(CorrectionTicket),
    /// The primitive failed; only the table pane is shown
    TableOnly { error: RenderError },
}

impl RenderOutcome {
    pub fn ticket(&self) -> Option<CorrectionTicket> {
        match self {
            RenderOutcome::Scheduled(ticket) => Some(*ticket),
            RenderOutcome::TableOnly { .. } => None,
        }
    }

    pub fn is_table_only(&self) -> bool {
        matches!(self, RenderOutcome::TableOnly { .. })
    }
}

/// Owns the primitive and the currently mounted timeline
#[derive(Debug)]
pub struct TimelineView<P = TimelineChart> {
    primitive: P,
    theme: GanttTheme,
    viewport: (f64, f64),
    generation: u64,
    pending: Option<CorrectionTicket>,
    mounted: Option<SvgTree>,
    last_correction: Option<CorrectionOutcome>,
}

impl Default for TimelineView<TimelineChart> {
    fn default() -> Self {
        Self::new(TimelineChart::new())
    }
}

impl<P: BarChartPrimitive> TimelineView<P> {
    pub fn new(primitive: P) -> Self {
        Self {
            primitive,
            theme: GanttTheme::default(),
            viewport: (0.0, 0.0),
            generation: 0,
            pending: None,
            mounted: None,
            last_correction: None,
        }
    }

    /// Set the theme used by corrections
    pub fn theme(mut self, theme: GanttTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn set_theme(&mut self, theme: GanttTheme) {
        self.theme = theme;
    }

    pub fn current_theme(&self) -> &GanttTheme {
        &self.theme
    }

    /// Size of the timeline pane the next mount measures
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// Start a render cycle from scratch
    pub fn render(&mut self, tasks: &[ScheduleTask], options: &ChartOptions) -> RenderOutcome {
        self.teardown();
        self.generation += 1;

        let bars = to_bars(tasks);
        debug!(
            generation = self.generation,
            bars = bars.len(),
            mode = %options.view_mode,
            "rendering timeline"
        );

        let mounted = self
            .primitive
            .render(&bars, options)
            .and_then(|markup| SvgTree::parse(&markup));

        match mounted {
            Ok(mut tree) => {
                tree.mount(self.viewport.0, self.viewport.1);
                self.mounted = Some(tree);
                let ticket = CorrectionTicket {
                    generation: self.generation,
                };
                self.pending = Some(ticket);
                RenderOutcome::Scheduled(ticket)
            }
            Err(error) => {
                error!(%error, "timeline primitive failed; showing table only");
                RenderOutcome::TableOnly { error }
            }
        }
    }

    /// Run the deferred correction for `ticket`
    pub fn run_correction(&mut self, ticket: CorrectionTicket) -> CorrectionOutcome {
        if self.pending != Some(ticket) {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "ignoring stale correction"
            );
            return CorrectionOutcome::Skipped(SkipReason::Stale);
        }
        self.pending = None;

        let outcome = match self.mounted.as_mut() {
            Some(tree) => correct(tree, &self.theme),
            None => CorrectionOutcome::Skipped(SkipReason::Detached),
        };
        self.last_correction = Some(outcome.clone());
        outcome
    }

    /// Run the pending correction, if any
    pub fn flush(&mut self) -> Option<CorrectionOutcome> {
        let ticket = self.pending?;
        Some(self.run_correction(ticket))
    }

    /// Drop the mounted timeline and any pending correction
    pub fn teardown(&mut self) {
        self.pending = None;
        self.mounted = None;
        self.last_correction = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tree(&self) -> Option<&SvgTree> {
        self.mounted.as_ref()
    }

    /// Current timeline markup; `None` when degraded or torn down
    pub fn markup(&self) -> Option<String> {
        self.mounted.as_ref().map(SvgTree::to_markup)
    }

    pub fn last_correction(&self) -> Option<&CorrectionOutcome> {
        self.last_correction.as_ref()
    }
}
