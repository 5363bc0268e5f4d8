//! Render corrector
//!
//! The timeline primitive styles its bars by class only and leaves layer
//! order and the `viewBox` to a stylesheet and to layout. Hosts that do not
//! ship that stylesheet get invisible bars, arrows painted over bars and an
//! unscaled chart. [`correct`] repairs the mounted SVG in place:
//!
//! 1. explicit fill/stroke on every bar, keyed by the wrapper's style class
//! 2. the grid group becomes the first child of the root
//! 3. every bar wrapper is appended after everything else
//! 4. `viewBox` is set from the measured client size
//! 5. a synchronous reflow is forced (display off and on)
//!
//! Every step is idempotent. A container that measures zero is skipped.

use schedview_core::StyleClass;
use tracing::{debug, trace};

use crate::theme::GanttTheme;

/// A mounted SVG the corrector can inspect and mutate.
///
/// Implemented by [`crate::SvgTree`] and by the live browser DOM.
pub trait CorrectableSvg {
    type Node: Clone;

    /// Measured width and height of the mounted SVG; zero when hidden or
    /// detached
    fn client_size(&self) -> (f64, f64);

    fn root(&self) -> Option<Self::Node>;

    /// Element descendants of `scope` carrying `class`, in document order
    fn descendants_by_class(&self, scope: &Self::Node, class: &str) -> Vec<Self::Node>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Move `node` to be the first child of the root
    fn prepend_to_root(&mut self, node: &Self::Node);

    /// Move `node` to be the last child of the root
    fn append_to_root(&mut self, node: &Self::Node);

    fn set_display(&mut self, node: &Self::Node, visible: bool);

    /// Read back layout so the host recomputes it synchronously
    fn force_layout(&mut self, node: &Self::Node);

    /// First element under the root carrying `class`
    fn find_by_class(&self, class: &str) -> Option<Self::Node> {
        let root = self.root()?;
        self.descendants_by_class(&root, class).into_iter().next()
    }
}

/// Why a correction pass did nothing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The container measured zero width or height
    ZeroSize,
    /// No SVG is mounted
    Detached,
    /// A newer render superseded the ticket
    Stale,
}

/// What a correction pass changed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorrectionReport {
    pub bars_styled: usize,
    pub wrappers_moved: usize,
    pub arrows_styled: usize,
    pub grid_moved: bool,
    pub view_box: (f64, f64),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CorrectionOutcome {
    Corrected(CorrectionReport),
    Skipped(SkipReason),
}

impl CorrectionOutcome {
    pub fn is_corrected(&self) -> bool {
        matches!(self, CorrectionOutcome::Corrected(_))
    }
}

/// Run one correction pass over a mounted SVG
pub fn correct<H>(svg: &mut H, theme: &GanttTheme) -> CorrectionOutcome
where
    H: CorrectableSvg + ?Sized,
{
    let Some(root) = svg.root() else {
        debug!("correction skipped: nothing mounted");
        return CorrectionOutcome::Skipped(SkipReason::Detached);
    };

    let (width, height) = svg.client_size();
    if width <= 0.0 || height <= 0.0 {
        debug!(width, height, "correction skipped: container not measurable");
        return CorrectionOutcome::Skipped(SkipReason::ZeroSize);
    }

    let mut report = CorrectionReport::default();
    let wrappers = svg.descendants_by_class(&root, "bar-wrapper");

    for wrapper in &wrappers {
        let style = style_of(svg, wrapper);
        let colors = theme.bar_colors(style);
        for bar in svg.descendants_by_class(wrapper, "bar") {
            svg.set_attribute(&bar, "fill", &colors.fill);
            svg.set_attribute(&bar, "stroke", &colors.stroke);
            report.bars_styled += 1;
        }
        for progress in svg.descendants_by_class(wrapper, "bar-progress") {
            svg.set_attribute(&progress, "fill", &colors.progress);
        }
    }

    for arrow in svg.descendants_by_class(&root, "arrow-path") {
        svg.set_attribute(&arrow, "fill", "none");
        svg.set_attribute(&arrow, "stroke", &theme.arrow_color);
        report.arrows_styled += 1;
    }

    if let Some(grid) = svg.find_by_class("grid") {
        for background in svg.descendants_by_class(&grid, "grid-background") {
            svg.set_attribute(&background, "fill", &theme.background_color);
        }
        svg.prepend_to_root(&grid);
        report.grid_moved = true;
    }

    for wrapper in &wrappers {
        svg.append_to_root(wrapper);
        report.wrappers_moved += 1;
    }

    svg.set_attribute(&root, "viewBox", &format!("0 0 {width} {height}"));
    report.view_box = (width, height);

    svg.set_display(&root, false);
    svg.force_layout(&root);
    svg.set_display(&root, true);

    trace!(?report, "correction applied");
    CorrectionOutcome::Corrected(report)
}

/// Style tag of a wrapper; unknown or missing tags color as planned
fn style_of<H>(svg: &H, wrapper: &H::Node) -> StyleClass
where
    H: CorrectableSvg + ?Sized,
{
    StyleClass::ALL
        .into_iter()
        .find(|style| svg.has_class(wrapper, style.class_name()))
        .unwrap_or(StyleClass::Planned)
}
