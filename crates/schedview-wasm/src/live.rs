//! Live DOM adapters: the mounted timeline SVG for the render corrector and
//! the two scrollable panes for the scroll guard.

use web_sys::Element;

use schedview_core::ScrollSurface;
use schedview_render::CorrectableSvg;

/// The `<svg>` inside a mounted timeline pane
#[derive(Clone, Debug)]
pub struct LiveSvg {
    svg: Option<Element>,
}

impl LiveSvg {
    pub fn find_in(container: &Element) -> Self {
        let svg = container.query_selector("#timeline-pane svg").ok().flatten();
        Self { svg }
    }
}

impl CorrectableSvg for LiveSvg {
    type Node = Element;

    fn client_size(&self) -> (f64, f64) {
        match &self.svg {
            Some(svg) if svg.is_connected() => {
                (f64::from(svg.client_width()), f64::from(svg.client_height()))
            }
            _ => (0.0, 0.0),
        }
    }

    fn root(&self) -> Option<Element> {
        self.svg.clone().filter(|svg| svg.is_connected())
    }

    fn descendants_by_class(&self, scope: &Element, class: &str) -> Vec<Element> {
        // the collection is live; snapshot it before anything moves
        let found = scope.get_elements_by_class_name(class);
        (0..found.length()).filter_map(|i| found.item(i)).collect()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(e) = node.set_attribute(name, value) {
            web_sys::console::warn_2(&format!("schedview: cannot set {name}").into(), &e);
        }
    }

    fn prepend_to_root(&mut self, node: &Element) {
        if let Some(root) = &self.svg {
            let first = root.first_child();
            if let Err(e) = root.insert_before(node, first.as_ref()) {
                web_sys::console::warn_2(&"schedview: cannot move node".into(), &e);
            }
        }
    }

    fn append_to_root(&mut self, node: &Element) {
        if let Some(root) = &self.svg {
            if let Err(e) = root.append_child(node) {
                web_sys::console::warn_2(&"schedview: cannot move node".into(), &e);
            }
        }
    }

    fn set_display(&mut self, node: &Element, visible: bool) {
        let result = if visible {
            node.remove_attribute("display")
        } else {
            node.set_attribute("display", "none")
        };
        if let Err(e) = result {
            web_sys::console::warn_2(&"schedview: cannot toggle display".into(), &e);
        }
    }

    fn force_layout(&mut self, node: &Element) {
        let _ = node.get_bounding_client_rect();
    }
}

/// One of the two scrollable panes
#[derive(Clone, Debug)]
pub struct PaneElement(Element);

impl PaneElement {
    pub fn find(container: &Element, id: &str) -> Option<Self> {
        container
            .query_selector(&format!("#{id}"))
            .ok()
            .flatten()
            .map(Self)
    }

    pub fn element(&self) -> &Element {
        &self.0
    }
}

impl ScrollSurface for PaneElement {
    fn scroll_top(&self) -> f64 {
        f64::from(self.0.scroll_top())
    }

    fn set_scroll_top(&mut self, offset: f64) {
        self.0.set_scroll_top(offset.round() as i32);
    }
}
