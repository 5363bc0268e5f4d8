//! Color themes for the timeline and the table pane

use schedview_core::StyleClass;

/// Explicit colors for one bar style
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BarColors {
    pub fill: String,
    pub stroke: String,
    pub progress: String,
}

impl BarColors {
    fn new(fill: &str, stroke: &str, progress: &str) -> Self {
        Self {
            fill: fill.into(),
            stroke: stroke.into(),
            progress: progress.into(),
        }
    }
}

/// Color theme for the Gantt view
#[derive(Clone, Debug)]
pub struct GanttTheme {
    pub planned: BarColors,
    pub in_progress: BarColors,
    pub completed: BarColors,
    pub delayed: BarColors,
    pub blocked: BarColors,
    pub cancelled: BarColors,
    pub milestone: BarColors,
    pub background_color: String,
    pub grid_color: String,
    pub row_alt_color: String,
    pub text_color: String,
    pub header_bg: String,
    pub arrow_color: String,
    pub highlight_color: String,
}

impl Default for GanttTheme {
    fn default() -> Self {
        Self::light()
    }
}

impl GanttTheme {
    pub fn light() -> Self {
        Self {
            planned: BarColors::new("#95a5a6", "#7f8c8d", "#6c7a7b"),
            in_progress: BarColors::new("#3498db", "#2980b9", "#1f6391"),
            completed: BarColors::new("#27ae60", "#1e8449", "#196f3d"),
            delayed: BarColors::new("#f39c12", "#d68910", "#b9770e"),
            blocked: BarColors::new("#e74c3c", "#c0392b", "#922b21"),
            cancelled: BarColors::new("#d5d8dc", "#aab0b6", "#aab0b6"),
            milestone: BarColors::new("#9b59b6", "#7d3c98", "#7d3c98"),
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            row_alt_color: "#f8f9fa".into(),
            text_color: "#2c3e50".into(),
            header_bg: "#f8f9fa".into(),
            arrow_color: "#7f8c8d".into(),
            highlight_color: "#fef5e7".into(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background_color: "#1a1a2e".into(),
            grid_color: "#2d2d44".into(),
            row_alt_color: "#20203a".into(),
            text_color: "#eaeaea".into(),
            header_bg: "#16213e".into(),
            arrow_color: "#95a5a6".into(),
            highlight_color: "#3d3d5c".into(),
            cancelled: BarColors::new("#566573", "#424949", "#424949"),
            ..Self::light()
        }
    }

    /// Look up a theme by name (`light` or `dark`)
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "light" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }

    pub fn bar_colors(&self, style: StyleClass) -> &BarColors {
        match style {
            StyleClass::Planned => &self.planned,
            StyleClass::InProgress => &self.in_progress,
            StyleClass::Completed => &self.completed,
            StyleClass::Delayed => &self.delayed,
            StyleClass::Blocked => &self.blocked,
            StyleClass::Cancelled => &self.cancelled,
            StyleClass::Milestone => &self.milestone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_style_has_distinct_fill() {
        let theme = GanttTheme::light();
        let mut fills: Vec<_> = StyleClass::ALL
            .iter()
            .map(|s| theme.bar_colors(*s).fill.clone())
            .collect();
        fills.sort();
        fills.dedup();
        assert_eq!(fills.len(), StyleClass::ALL.len());
    }

    #[test]
    fn named_themes() {
        assert_eq!(GanttTheme::named("Dark").unwrap().background_color, "#1a1a2e");
        assert!(GanttTheme::named("solarized").is_none());
    }
}
