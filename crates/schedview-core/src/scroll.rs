//! Vertical scroll synchronization between the table and timeline panes
//!
//! Writing a pane's scroll offset makes the host fire a scroll event on
//! that pane. `ScrollSync` remembers the offset it wrote and swallows
//! exactly that one echo, so the panes never ping-pong.

use tracing::trace;

/// Offsets closer than this are considered equal (fractional device pixels)
const EPSILON: f64 = 0.5;

/// One of the two panes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pane {
    Table,
    Timeline,
}

impl Pane {
    pub fn other(self) -> Self {
        match self {
            Pane::Table => Pane::Timeline,
            Pane::Timeline => Pane::Table,
        }
    }

    fn index(self) -> usize {
        match self {
            Pane::Table => 0,
            Pane::Timeline => 1,
        }
    }
}

/// Something with a vertical scroll offset
pub trait ScrollSurface {
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&mut self, offset: f64);
}

/// Last-writer guard for the pair of panes
#[derive(Clone, Debug, Default)]
pub struct ScrollSync {
    /// Offset written to each pane whose echo event is still outstanding
    pending_echo: [Option<f64>; 2],
    writes: u64,
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a scroll event fired by `source`.
    ///
    /// Returns the offset both panes now share, or `None` when the event
    /// was our own echo or the panes were already aligned.
    pub fn on_scroll<S>(&mut self, source: Pane, table: &mut S, timeline: &mut S) -> Option<f64>
    where
        S: ScrollSurface + ?Sized,
    {
        let (src, dst) = match source {
            Pane::Table => (table, timeline),
            Pane::Timeline => (timeline, table),
        };
        let offset = src.scroll_top();

        if let Some(expected) = self.pending_echo[source.index()].take() {
            if same(expected, offset) {
                trace!(?source, offset, "scroll echo suppressed");
                return None;
            }
        }

        if same(dst.scroll_top(), offset) {
            return None;
        }

        dst.set_scroll_top(offset);
        self.writes += 1;

        // The host may clamp the write; expect the echo at whatever it
        // settled on and pull the source back to the same offset.
        let settled = dst.scroll_top();
        self.pending_echo[source.other().index()] = Some(settled);
        if !same(settled, offset) {
            src.set_scroll_top(settled);
            self.pending_echo[source.index()] = Some(src.scroll_top());
            self.writes += 1;
        }
        Some(settled)
    }

    /// Whether an echo is outstanding for `pane`
    pub fn is_pending(&self, pane: Pane) -> bool {
        self.pending_echo[pane.index()].is_some()
    }

    /// Number of programmatic writes performed so far
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Forget outstanding echoes (after a re-render replaced the panes)
    pub fn reset(&mut self) {
        self.pending_echo = [None, None];
    }
}

fn same(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// A pane that queues an echo event whenever it is written to, the way
    /// a browser fires `scroll` after a programmatic `scrollTop` write.
    #[derive(Debug, Default)]
    struct FakePane {
        offset: f64,
        max: Option<f64>,
        echoes: usize,
    }

    impl ScrollSurface for FakePane {
        fn scroll_top(&self) -> f64 {
            self.offset
        }

        fn set_scroll_top(&mut self, offset: f64) {
            let clamped = self.max.map_or(offset, |m| offset.min(m));
            if clamped != self.offset {
                self.offset = clamped;
                self.echoes += 1;
            }
        }
    }

    struct Harness {
        sync: ScrollSync,
        table: FakePane,
        timeline: FakePane,
        queue: VecDeque<Pane>,
        handled: usize,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                sync: ScrollSync::new(),
                table: FakePane::default(),
                timeline: FakePane::default(),
                queue: VecDeque::new(),
                handled: 0,
            }
        }

        fn user_scroll(&mut self, pane: Pane, offset: f64) {
            match pane {
                Pane::Table => self.table.offset = offset,
                Pane::Timeline => self.timeline.offset = offset,
            }
            self.queue.push_back(pane);
            self.drain();
        }

        fn drain(&mut self) {
            while let Some(pane) = self.queue.pop_front() {
                self.handled += 1;
                assert!(self.handled < 1_000, "scroll events never settled");
                self.sync.on_scroll(pane, &mut self.table, &mut self.timeline);
                for (p, surface) in [(Pane::Table, &mut self.table), (Pane::Timeline, &mut self.timeline)] {
                    for _ in 0..std::mem::take(&mut surface.echoes) {
                        self.queue.push_back(p);
                    }
                }
            }
        }
    }

    #[test]
    fn table_scroll_is_mirrored() {
        let mut h = Harness::new();
        h.user_scroll(Pane::Table, 240.0);
        assert_eq!(h.timeline.offset, 240.0);
        assert_eq!(h.table.offset, 240.0);
    }

    #[test]
    fn timeline_scroll_is_mirrored() {
        let mut h = Harness::new();
        h.user_scroll(Pane::Timeline, 240.0);
        assert_eq!(h.table.offset, 240.0);
    }

    #[test]
    fn echo_is_suppressed_exactly_once() {
        let mut h = Harness::new();
        h.user_scroll(Pane::Table, 100.0);
        // user event + one echo
        assert_eq!(h.handled, 2);
        assert_eq!(h.sync.writes(), 1);
        assert!(!h.sync.is_pending(Pane::Timeline));
    }

    #[test]
    fn no_oscillation_after_back_and_forth() {
        let mut h = Harness::new();
        for i in 0..10 {
            let pane = if i % 2 == 0 { Pane::Table } else { Pane::Timeline };
            let offset = 24.0 * (i + 1) as f64;
            h.user_scroll(pane, offset);
            assert_eq!(h.table.offset, offset);
            assert_eq!(h.timeline.offset, offset);
        }
        assert_eq!(h.sync.writes(), 10);
        assert_eq!(h.handled, 20);
    }

    #[test]
    fn aligned_panes_do_not_write() {
        let mut table = FakePane { offset: 60.0, ..FakePane::default() };
        let mut timeline = FakePane { offset: 60.0, ..FakePane::default() };
        let mut sync = ScrollSync::new();
        assert_eq!(sync.on_scroll(Pane::Table, &mut table, &mut timeline), None);
        assert_eq!(sync.writes(), 0);
    }

    #[test]
    fn user_scroll_during_pending_echo_still_syncs() {
        let mut table = FakePane::default();
        let mut timeline = FakePane::default();
        let mut sync = ScrollSync::new();

        table.offset = 80.0;
        sync.on_scroll(Pane::Table, &mut table, &mut timeline);
        assert!(sync.is_pending(Pane::Timeline));

        // The user moves the timeline before its echo arrives.
        timeline.offset = 300.0;
        assert_eq!(sync.on_scroll(Pane::Timeline, &mut table, &mut timeline), Some(300.0));
        assert_eq!(table.offset, 300.0);
    }

    #[test]
    fn clamped_target_settles() {
        let mut h = Harness::new();
        h.timeline.max = Some(150.0);
        h.user_scroll(Pane::Table, 400.0);
        assert_eq!(h.timeline.offset, 150.0);
        // The table is pulled back to where the timeline could go.
        assert_eq!(h.table.offset, 150.0);
        assert_eq!(h.sync.writes(), 2);
        assert_eq!(h.handled, 3);
    }
}
