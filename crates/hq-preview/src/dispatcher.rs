//! Document-level hover listener spawning one preview handler per matched element.

use crate::handler::PreviewEnv;
use crate::handler::PreviewHandler;
use hq_dom::Event;
use hq_dom::EventKind;
use hq_dom::EventTarget;
use hq_dom::ListenerId;
use hq_dom::NodeId;
use hq_dom::Selector;
use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
struct DispatcherInner {
    env: Rc<PreviewEnv>,
    selector: Selector,
    handlers: RefCell<HashMap<NodeId, Vec<PreviewHandler>>>,
}

impl DispatcherInner {
    fn handle_mouse_over(&self, event: &mut Event) -> Option<PreviewHandler> {
        let matched = self
            .env
            .document()
            .borrow()
            .matches(event.target, &self.selector);
        if !matched {
            return None;
        }

        event.prevent_default();
        let handler = PreviewHandler::new(Rc::clone(&self.env), event.target);
        handler.attach();

        let mut handlers = self.handlers.borrow_mut();
        handlers.retain(|_, spawned| {
            spawned.retain(|handler| !handler.is_settled_without_preview());
            !spawned.is_empty()
        });
        handlers
            .entry(event.target)
            .or_default()
            .push(handler.clone());
        Some(handler)
    }
}

/// Explicitly started hover listener.
///
/// The dispatcher never listens for mouse-out. Page wiring collects the
/// handlers of an element with [`HoverDispatcher::take_handlers`] and detaches
/// them itself.
#[derive(Debug)]
pub struct HoverDispatcher {
    inner: Rc<DispatcherInner>,
    registration: Cell<Option<ListenerId>>,
}

impl HoverDispatcher {
    pub fn new(env: Rc<PreviewEnv>, selector: Selector) -> Self {
        Self {
            inner: Rc::new(DispatcherInner {
                env,
                selector,
                handlers: RefCell::new(HashMap::new()),
            }),
            registration: Cell::new(None),
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.inner.selector
    }

    /// Registers the mouse-over listener. Returns false when already running.
    pub fn start(&self, target: &EventTarget) -> bool {
        if self.is_running() {
            return false;
        }

        let inner = Rc::clone(&self.inner);
        let id = target.add_event_listener(
            EventKind::MouseOver,
            Rc::new(move |event: &mut Event| {
                inner.handle_mouse_over(event);
            }),
        );
        self.registration.set(Some(id));
        tracing::debug!(selector = self.inner.selector.as_str(), "hover dispatcher started");
        true
    }

    /// Removes the listener. Handlers already spawned keep running.
    pub fn stop(&self, target: &EventTarget) -> bool {
        let Some(id) = self.registration.take() else {
            return false;
        };
        let removed = target.remove_event_listener(id);
        tracing::debug!(removed, "hover dispatcher stopped");
        removed
    }

    pub fn is_running(&self) -> bool {
        self.registration.get().is_some()
    }

    /// Handles one mouse-over event directly, as the registered listener does.
    ///
    /// Returns the spawned handler when the target matched the selector.
    pub fn handle_mouse_over(&self, event: &mut Event) -> Option<PreviewHandler> {
        self.inner.handle_mouse_over(event)
    }

    /// Hands over every live handler spawned for `element`.
    pub fn take_handlers(&self, element: NodeId) -> Vec<PreviewHandler> {
        self.inner
            .handlers
            .borrow_mut()
            .remove(&element)
            .unwrap_or_default()
    }

    pub fn active_handlers(&self) -> usize {
        self.inner.handlers.borrow().values().map(Vec::len).sum()
    }
}
