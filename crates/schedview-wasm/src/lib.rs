//! WebAssembly bindings for the schedview dual-pane Gantt view
//!
//! `GanttWidget` mounts the view into a host element and wires the toolbar,
//! the column panel, header drags, row and bar clicks and pane scrolling.
//! After every timeline render the correction runs on the next animation
//! frame, once the browser laid the SVG out; a newer render cancels it.

mod live;
mod storage;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Element, Event};

use schedview_core::{
    DragEnd, DragSurface, Pane, ScheduleTask, ScrollSurface, TaskStatus, ViewMode,
};
use schedview_render::{correct, CorrectionOutcome, GanttTheme, GanttView};

pub use live::{LiveSvg, PaneElement};
pub use storage::LocalStorage;

/// Initialize panic hook for better error messages in console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Convert a task list to the bar representation the timeline consumes
#[wasm_bindgen]
pub fn to_bars(tasks: JsValue) -> Result<JsValue, JsValue> {
    let tasks: Vec<ScheduleTask> = serde_wasm_bindgen::from_value(tasks)?;
    Ok(serde_wasm_bindgen::to_value(&schedview_core::to_bars(&tasks))?)
}

// ============================================================================
// Widget
// ============================================================================

/// Dual-pane Gantt view mounted into a page
#[wasm_bindgen]
pub struct GanttWidget {
    controller: Controller,
}

#[wasm_bindgen]
impl GanttWidget {
    /// New view; visible columns are restored from `localStorage`
    #[wasm_bindgen(constructor)]
    pub fn new() -> GanttWidget {
        let state = State {
            view: GanttView::new(LocalStorage::open()),
            host: None,
            frame: None,
            drag: None,
            callbacks: Callbacks::default(),
        };
        GanttWidget {
            controller: Controller(Rc::new(RefCell::new(state))),
        }
    }

    /// Mount into the element with id `container_id`, replacing its content
    pub fn mount(&self, container_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{container_id}'")))?;
        self.controller.mount(container)
    }

    /// Remove the view from the page and cancel any pending correction
    pub fn unmount(&self) {
        self.controller.unmount();
    }

    /// Replace the task list (an array of task records)
    pub fn set_tasks(&self, tasks: JsValue) -> Result<(), JsValue> {
        let tasks: Vec<ScheduleTask> = serde_wasm_bindgen::from_value(tasks)?;
        self.controller.update(|view| view.set_tasks(tasks));
        Ok(())
    }

    pub fn tasks(&self) -> Result<JsValue, JsValue> {
        let state = self.controller.0.borrow();
        Ok(serde_wasm_bindgen::to_value(state.view.tasks())?)
    }

    pub fn view_mode(&self) -> String {
        self.controller.0.borrow().view.toolbar().mode.to_string()
    }

    /// Returns whether the mode changed
    pub fn set_view_mode(&self, mode: &str) -> Result<bool, JsValue> {
        let mode: ViewMode = mode.parse().map_err(|e: String| JsValue::from_str(&e))?;
        Ok(self.controller.change_mode(|view| view.set_view_mode(mode)))
    }

    pub fn zoom_in(&self) -> bool {
        self.controller.change_mode(|view| view.zoom_in())
    }

    pub fn zoom_out(&self) -> bool {
        self.controller.change_mode(|view| view.zoom_out())
    }

    /// Returns the new legend visibility
    pub fn toggle_legend(&self) -> bool {
        self.controller.update(|view| view.toggle_legend())
    }

    /// Visible column ids in display order
    pub fn visible_columns(&self) -> Result<JsValue, JsValue> {
        let state = self.controller.0.borrow();
        Ok(serde_wasm_bindgen::to_value(state.view.columns().ids())?)
    }

    pub fn toggle_column(&self, id: &str) -> bool {
        self.controller.update(|view| view.toggle_column(id))
    }

    /// Finish a drag from `"header"` or `"panel"`; `to` is `undefined` when
    /// the drag was cancelled
    pub fn move_column(
        &self,
        surface: &str,
        from: usize,
        to: Option<usize>,
    ) -> Result<bool, JsValue> {
        let surface = parse_surface(surface)
            .ok_or_else(|| JsValue::from_str(&format!("unknown drag surface '{surface}'")))?;
        let drag = DragEnd::new(surface, from, to);
        Ok(self.controller.update(|view| view.apply_drag(&drag)))
    }

    pub fn reset_columns(&self) -> bool {
        self.controller.update(|view| view.reset_columns())
    }

    /// The host resized; widths and heights in CSS pixels
    pub fn resize(&self, viewport_width: u32, container_height: u32) {
        self.controller
            .update(|view| view.resize(viewport_width, container_height));
    }

    /// Switch to the `light` or `dark` theme
    pub fn set_theme(&self, name: &str) -> Result<(), JsValue> {
        let theme = GanttTheme::named(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown theme '{name}'")))?;
        self.controller.update(|view| view.set_theme(theme));
        Ok(())
    }

    /// Optimistically set a task's progress (percent)
    pub fn update_progress(&self, id: &str, percent: f64) -> bool {
        self.controller
            .edit_task(id, |view| view.update_progress(id, percent))
    }

    /// Optimistically set a task's status
    pub fn update_status(&self, id: &str, status: &str) -> Result<bool, JsValue> {
        let status = TaskStatus::parse(status)
            .ok_or_else(|| JsValue::from_str(&format!("unknown status '{status}'")))?;
        Ok(self
            .controller
            .edit_task(id, |view| view.update_status(id, status)))
    }

    pub fn selected(&self) -> Option<String> {
        self.controller.0.borrow().view.selected().map(str::to_string)
    }

    /// Whether the timeline failed and only the table is shown
    pub fn is_degraded(&self) -> bool {
        self.controller.0.borrow().view.is_degraded()
    }

    /// Standalone HTML document for the current state
    pub fn render_page(&self) -> String {
        self.controller.0.borrow_mut().view.render_page()
    }

    /// `callback(task)` when a row or bar is clicked
    pub fn on_task_activated(&self, callback: js_sys::Function) {
        self.controller.0.borrow_mut().callbacks.task_activated = Some(callback);
    }

    /// `callback(mode)` after the zoom level changed
    pub fn on_view_mode_change(&self, callback: js_sys::Function) {
        self.controller.0.borrow_mut().callbacks.view_mode_change = Some(callback);
    }

    /// `callback(task)` after an optimistic edit, for the host to persist
    pub fn on_task_updated(&self, callback: js_sys::Function) {
        self.controller.0.borrow_mut().callbacks.task_updated = Some(callback);
    }
}

impl Default for GanttWidget {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// State
// ============================================================================

struct State {
    view: GanttView<LocalStorage>,
    host: Option<Host>,
    frame: Option<PendingFrame>,
    /// Surface and visible index of the column being dragged
    drag: Option<(DragSurface, usize)>,
    callbacks: Callbacks,
}

impl State {
    fn cancel_frame(&mut self) {
        if let Some(frame) = self.frame.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(frame.id);
            }
        }
    }
}

impl Drop for State {
    fn drop(&mut self) {
        self.cancel_frame();
    }
}

#[derive(Default)]
struct Callbacks {
    task_activated: Option<js_sys::Function>,
    view_mode_change: Option<js_sys::Function>,
    task_updated: Option<js_sys::Function>,
}

struct Host {
    container: Element,
    /// Delegated listeners on the container, kept for the whole mount
    listeners: Vec<Listener>,
    /// Scroll listeners on the panes, replaced on every refresh
    panes: Vec<Listener>,
}

/// A registered event listener, removed on drop
struct Listener {
    target: Element,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &Element,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// A requested animation frame and the closure it will call
struct PendingFrame {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

// ============================================================================
// Controller
// ============================================================================

/// Shared handle used by the exported methods and the DOM listeners.
///
/// JS callbacks are invoked only after the state borrow is released, so a
/// callback may call back into the widget.
#[derive(Clone)]
struct Controller(Rc<RefCell<State>>);

impl Controller {
    fn weak(&self) -> Weak<RefCell<State>> {
        Rc::downgrade(&self.0)
    }

    fn mount(&self, container: Element) -> Result<(), JsValue> {
        self.unmount();

        let mut listeners = Vec::new();
        for event in ["click", "change", "dragstart", "dragover", "drop", "dragend"] {
            let weak = self.weak();
            let closure = Closure::wrap(Box::new(move |event: Event| {
                if let Some(shared) = weak.upgrade() {
                    Controller(shared).handle(&event);
                }
            }) as Box<dyn FnMut(Event)>);
            listeners.push(Listener::attach(&container, event, closure)?);
        }

        self.0.borrow_mut().host = Some(Host {
            container,
            listeners,
            panes: Vec::new(),
        });
        self.refresh();
        Ok(())
    }

    fn unmount(&self) {
        let mut state = self.0.borrow_mut();
        state.cancel_frame();
        if let Some(host) = state.host.take() {
            host.container.set_inner_html("");
        }
        state.view.unmount();
    }

    /// Apply `f` to the view, then redraw
    fn update<R>(&self, f: impl FnOnce(&mut GanttView<LocalStorage>) -> R) -> R {
        let result = f(&mut self.0.borrow_mut().view);
        self.refresh();
        result
    }

    fn change_mode(&self, f: impl FnOnce(&mut GanttView<LocalStorage>) -> bool) -> bool {
        let changed = self.update(f);
        if changed {
            let (callback, mode) = {
                let state = self.0.borrow();
                (
                    state.callbacks.view_mode_change.clone(),
                    state.view.toolbar().mode,
                )
            };
            emit(callback.as_ref(), &JsValue::from_str(mode.as_str()));
        }
        changed
    }

    fn edit_task(&self, id: &str, f: impl FnOnce(&mut GanttView<LocalStorage>) -> bool) -> bool {
        let changed = self.update(f);
        if changed {
            let (callback, task) = {
                let state = self.0.borrow();
                let task = state.view.tasks().iter().find(|t| t.id == id).cloned();
                (state.callbacks.task_updated.clone(), task)
            };
            if let Some(task) = task {
                emit_task(callback.as_ref(), &task);
            }
        }
        changed
    }

    fn activate(&self, f: impl FnOnce(&mut GanttView<LocalStorage>) -> Option<ScheduleTask>) {
        let task = self.update(f);
        if let Some(task) = task {
            let callback = self.0.borrow().callbacks.task_activated.clone();
            emit_task(callback.as_ref(), &task);
        }
    }

    /// Redraw the mounted view and schedule its correction
    fn refresh(&self) {
        let mut state = self.0.borrow_mut();
        let Some(container) = state.host.as_ref().map(|h| h.container.clone()) else {
            return;
        };
        state.cancel_frame();

        let offset = PaneElement::find(&container, "table-pane")
            .map(|pane| pane.scroll_top());
        let body = state.view.render_body();
        container.set_inner_html(&format!(
            "<style>\n{}\n</style>\n{body}",
            state.view.stylesheet()
        ));

        let mut panes = Vec::new();
        for (id, pane) in [("table-pane", Pane::Table), ("timeline-pane", Pane::Timeline)] {
            let Some(mut element) = PaneElement::find(&container, id) else {
                continue;
            };
            if let Some(offset) = offset {
                element.set_scroll_top(offset);
            }
            let weak = self.weak();
            let closure = Closure::wrap(Box::new(move |_: Event| {
                if let Some(shared) = weak.upgrade() {
                    Controller(shared).scroll(pane);
                }
            }) as Box<dyn FnMut(Event)>);
            match Listener::attach(element.element(), "scroll", closure) {
                Ok(listener) => panes.push(listener),
                Err(e) => web_sys::console::error_2(&"schedview: scroll listener".into(), &e),
            }
        }
        if let Some(host) = state.host.as_mut() {
            host.panes = panes;
        }

        let generation = state.view.timeline().generation();
        drop(state);
        self.schedule_correction(generation);
    }

    fn schedule_correction(&self, generation: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let weak = self.weak();
        let callback = Closure::wrap(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Controller(shared).run_frame(generation);
            }
        }) as Box<dyn FnMut()>);

        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => {
                self.0.borrow_mut().frame = Some(PendingFrame {
                    id,
                    _callback: callback,
                });
            }
            Err(e) => web_sys::console::error_2(&"schedview: requestAnimationFrame".into(), &e),
        }
    }

    fn run_frame(&self, generation: u64) {
        let Ok(mut state) = self.0.try_borrow_mut() else {
            return;
        };
        let _spent = state.frame.take();
        if state.view.timeline().generation() != generation {
            return;
        }
        if let Some(ticket) = state.view.pending_ticket() {
            state.view.run_correction(ticket);
        }
        let Some(container) = state.host.as_ref().map(|h| h.container.clone()) else {
            return;
        };
        if state.view.is_degraded() {
            return;
        }

        let theme = state.view.theme_config().clone();
        let mut svg = LiveSvg::find_in(&container);
        if let CorrectionOutcome::Skipped(reason) = correct(&mut svg, &theme) {
            web_sys::console::debug_1(&format!("schedview: correction skipped ({reason:?})").into());
        }
    }

    fn scroll(&self, source: Pane) {
        let Ok(mut state) = self.0.try_borrow_mut() else {
            return;
        };
        let Some(container) = state.host.as_ref().map(|h| h.container.clone()) else {
            return;
        };
        let (Some(mut table), Some(mut timeline)) = (
            PaneElement::find(&container, "table-pane"),
            PaneElement::find(&container, "timeline-pane"),
        ) else {
            return;
        };
        state.view.on_scroll(source, &mut table, &mut timeline);
    }

    // ------------------------------------------------------------------------
    // Delegated DOM events
    // ------------------------------------------------------------------------

    fn handle(&self, event: &Event) {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        match event.type_().as_str() {
            "click" => self.click(&target),
            "change" => {
                if let Some(id) = closest(&target, "li.column-item")
                    .and_then(|item| item.get_attribute("data-column"))
                {
                    // a refused toggle still redraws, restoring the checkbox
                    self.update(|view| view.toggle_column(&id));
                }
            }
            "dragstart" => {
                if let Some((surface, index)) = drag_target(&target) {
                    let transfer = event.dyn_ref::<DragEvent>().and_then(|e| e.data_transfer());
                    if let Some(transfer) = transfer {
                        let _ = transfer.set_data("text/plain", &index.to_string());
                    }
                    self.0.borrow_mut().drag = Some((surface, index));
                }
            }
            "dragover" => {
                if self.0.borrow().drag.is_some() {
                    event.prevent_default();
                }
            }
            "drop" => {
                event.prevent_default();
                let started = self.0.borrow_mut().drag.take();
                if let Some((surface, source)) = started {
                    let destination = drag_target(&target)
                        .filter(|(s, _)| *s == surface)
                        .map(|(_, index)| index);
                    let drag = DragEnd::new(surface, source, destination);
                    self.update(|view| view.apply_drag(&drag));
                }
            }
            "dragend" => {
                // dropped outside any target
                self.0.borrow_mut().drag = None;
            }
            _ => {}
        }
    }

    fn click(&self, target: &Element) {
        if let Some(button) = closest(target, "button[data-action]") {
            match button.get_attribute("data-action").as_deref() {
                Some("zoom-in") => {
                    self.change_mode(|view| view.zoom_in());
                }
                Some("zoom-out") => {
                    self.change_mode(|view| view.zoom_out());
                }
                _ => {}
            }
        } else if let Some(button) = closest(target, "button[data-mode]") {
            if let Some(mode) = button
                .get_attribute("data-mode")
                .and_then(|m| m.parse::<ViewMode>().ok())
            {
                self.change_mode(|view| view.set_view_mode(mode));
            }
        } else if closest(target, "#legend-toggle").is_some() {
            self.update(|view| view.toggle_legend());
        } else if let Some(row) = closest(target, "tr[data-row]") {
            if let Some(index) = row.get_attribute("data-row").and_then(|r| r.parse().ok()) {
                self.activate(|view| view.activate_row(index).cloned());
            }
        } else if let Some(bar) = closest(target, ".bar-wrapper") {
            if let Some(id) = bar.get_attribute("data-id") {
                self.activate(|view| view.activate_bar(&id).cloned());
            }
        }
    }
}

fn closest(target: &Element, selector: &str) -> Option<Element> {
    target.closest(selector).ok().flatten()
}

/// Drag surface and visible index under `target`
fn drag_target(target: &Element) -> Option<(DragSurface, usize)> {
    let (surface, element) = if let Some(th) = closest(target, "th[data-index]") {
        (DragSurface::TableHeader, th)
    } else {
        (
            DragSurface::ConfigPanel,
            closest(target, "li.column-item.visible[data-index]")?,
        )
    };
    let index = element.get_attribute("data-index")?.parse().ok()?;
    Some((surface, index))
}

fn parse_surface(name: &str) -> Option<DragSurface> {
    match name.trim().to_lowercase().as_str() {
        "header" | "table_header" | "table-header" => Some(DragSurface::TableHeader),
        "panel" | "config_panel" | "config-panel" => Some(DragSurface::ConfigPanel),
        _ => None,
    }
}

fn emit(callback: Option<&js_sys::Function>, value: &JsValue) {
    if let Some(callback) = callback {
        if let Err(e) = callback.call1(&JsValue::NULL, value) {
            web_sys::console::error_2(&"schedview: callback failed".into(), &e);
        }
    }
}

fn emit_task(callback: Option<&js_sys::Function>, task: &ScheduleTask) {
    if callback.is_none() {
        return;
    }
    match serde_wasm_bindgen::to_value(task) {
        Ok(value) => emit(callback, &value),
        Err(e) => web_sys::console::error_1(&format!("schedview: {e}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_names() {
        assert_eq!(parse_surface("header"), Some(DragSurface::TableHeader));
        assert_eq!(parse_surface(" Panel "), Some(DragSurface::ConfigPanel));
        assert_eq!(parse_surface("config-panel"), Some(DragSurface::ConfigPanel));
        assert_eq!(parse_surface("sidebar"), None);
    }
}
