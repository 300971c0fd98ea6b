//! Event listener registry and mouse events.

use crate::NodeId;
use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseOver,
    MouseOut,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
        }
    }
}

/// Event delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub target: NodeId,
    default_prevented: bool,
}

impl Event {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            default_prevented: false,
        }
    }

    pub fn mouse_over(target: NodeId) -> Self {
        Self::new(EventKind::MouseOver, target)
    }

    pub fn mouse_out(target: NodeId) -> Self {
        Self::new(EventKind::MouseOut, target)
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Rc<dyn Fn(&mut Event)>;

struct Registration {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

/// Document-level listener registry.
#[derive(Default)]
pub struct EventTarget {
    next_id: Cell<u64>,
    registrations: RefCell<Vec<Registration>>,
}

impl std::fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTarget")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get().saturating_add(1));
        self.next_id.set(id.0);
        self.registrations.borrow_mut().push(Registration { id, kind, listener });
        tracing::trace!(kind = kind.as_str(), listener = id.0, "listener registered");
        id
    }

    /// Returns false when the listener was not registered.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut registrations = self.registrations.borrow_mut();
        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        let removed = registrations.len() != before;
        if removed {
            tracing::trace!(listener = id.0, "listener removed");
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.registrations.borrow().len()
    }

    /// Runs every listener registered for the event kind, in registration order.
    ///
    /// The listener set is snapshotted first, so listeners may add or remove
    /// registrations while the event is being delivered. Returns false when a
    /// listener prevented the default action.
    pub fn dispatch_event(&self, event: &mut Event) -> bool {
        let listeners: Vec<Listener> = self
            .registrations
            .borrow()
            .iter()
            .filter(|registration| registration.kind == event.kind)
            .map(|registration| Rc::clone(&registration.listener))
            .collect();

        for listener in listeners {
            listener(event);
        }

        !event.default_prevented()
    }
}
