//! Toolbar state: timeline zoom level and legend visibility

use serde::{Deserialize, Serialize};

/// Timeline granularity. Ordered from most to least granular.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    #[default]
    Week,
    Month,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Day, ViewMode::Week, ViewMode::Month];

    /// One step more granular; `None` at `Day`
    pub fn zoomed_in(self) -> Option<Self> {
        match self {
            ViewMode::Day => None,
            ViewMode::Week => Some(ViewMode::Day),
            ViewMode::Month => Some(ViewMode::Week),
        }
    }

    /// One step less granular; `None` at `Month`
    pub fn zoomed_out(self) -> Option<Self> {
        match self {
            ViewMode::Day => Some(ViewMode::Week),
            ViewMode::Week => Some(ViewMode::Month),
            ViewMode::Month => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
        }
    }

    /// Toolbar button label
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Day => "Dia",
            ViewMode::Week => "Semana",
            ViewMode::Month => "Mês",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "dia" => Ok(ViewMode::Day),
            "week" | "semana" => Ok(ViewMode::Week),
            "month" | "mes" | "mês" => Ok(ViewMode::Month),
            other => Err(format!("unknown view mode '{other}' (expected day, week or month)")),
        }
    }
}

/// Zoom level plus legend visibility
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolbar {
    pub mode: ViewMode,
    pub legend_visible: bool,
}

impl Default for Toolbar {
    fn default() -> Self {
        Self {
            mode: ViewMode::default(),
            legend_visible: true,
        }
    }
}

impl Toolbar {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Returns whether the mode changed
    pub fn zoom_in(&mut self) -> bool {
        match self.mode.zoomed_in() {
            Some(next) => {
                self.mode = next;
                true
            }
            None => false,
        }
    }

    /// Returns whether the mode changed
    pub fn zoom_out(&mut self) -> bool {
        match self.mode.zoomed_out() {
            Some(next) => {
                self.mode = next;
                true
            }
            None => false,
        }
    }

    /// Returns whether the mode changed
    pub fn set_mode(&mut self, mode: ViewMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub fn toggle_legend(&mut self) -> bool {
        self.legend_visible = !self.legend_visible;
        self.legend_visible
    }

    pub fn can_zoom_in(&self) -> bool {
        self.mode.zoomed_in().is_some()
    }

    pub fn can_zoom_out(&self) -> bool {
        self.mode.zoomed_out().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_in_from_month_stops_at_day() {
        let mut toolbar = Toolbar::new(ViewMode::Month);
        assert!(toolbar.zoom_in());
        assert_eq!(toolbar.mode, ViewMode::Week);
        assert!(toolbar.zoom_in());
        assert_eq!(toolbar.mode, ViewMode::Day);
        assert!(!toolbar.zoom_in());
        assert_eq!(toolbar.mode, ViewMode::Day);
    }

    #[test]
    fn zoom_out_from_day_stops_at_month() {
        let mut toolbar = Toolbar::new(ViewMode::Day);
        assert!(toolbar.zoom_out());
        assert!(toolbar.zoom_out());
        assert!(!toolbar.zoom_out());
        assert_eq!(toolbar.mode, ViewMode::Month);
        assert!(!toolbar.can_zoom_out());
        assert!(toolbar.can_zoom_in());
    }

    #[test]
    fn transitions_are_adjacent_only() {
        for mode in ViewMode::ALL {
            if let Some(next) = mode.zoomed_in() {
                assert!(next < mode);
                assert_eq!(next.zoomed_out(), Some(mode));
            }
        }
    }

    #[test]
    fn legend_toggle_is_independent_of_mode() {
        let mut toolbar = Toolbar::default();
        assert!(toolbar.legend_visible);
        assert!(!toolbar.toggle_legend());
        toolbar.zoom_in();
        assert!(!toolbar.legend_visible);
        assert!(toolbar.toggle_legend());
    }

    #[test]
    fn set_mode_reports_change() {
        let mut toolbar = Toolbar::default();
        assert!(!toolbar.set_mode(ViewMode::Week));
        assert!(toolbar.set_mode(ViewMode::Month));
    }

    #[test]
    fn parse_view_mode() {
        assert_eq!("Month".parse::<ViewMode>(), Ok(ViewMode::Month));
        assert_eq!("dia".parse::<ViewMode>(), Ok(ViewMode::Day));
        assert!("year".parse::<ViewMode>().is_err());
    }
}
