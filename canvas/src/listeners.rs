//! Scoped host-event subscriptions.
//!
//! Hosts forward raw input into a [`ListenerRegistry`]. Every subscription
//! is an RAII [`Subscription`] guard, and [`mount`] wires an engine with
//! exactly one listener per event kind, returning a [`Mount`] guard that
//! removes all of them when dropped. Re-mounting after a drop never leaves
//! stale listeners behind.

#[cfg(test)]
#[path = "listeners_test.rs"]
mod listeners_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::doc::BoardStore;
use crate::engine::{Action, EngineCore};
use crate::geom::Point;
use crate::input::{Button, Focus, Key, Modifiers, WheelDelta};

/// A raw input event from the host.
#[derive(Debug, Clone)]
pub enum HostEvent {
    PointerDown { point: Point, button: Button, modifiers: Modifiers },
    PointerMove { point: Point, modifiers: Modifiers },
    PointerUp { point: Point, button: Button, modifiers: Modifiers },
    Wheel { point: Point, delta: WheelDelta, modifiers: Modifiers },
    KeyDown { key: Key, modifiers: Modifiers, focus: Focus },
}

/// Which listener list an event goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
    KeyDown,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [Self::PointerDown, Self::PointerMove, Self::PointerUp, Self::Wheel, Self::KeyDown];
}

impl HostEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerDown { .. } => EventKind::PointerDown,
            Self::PointerMove { .. } => EventKind::PointerMove,
            Self::PointerUp { .. } => EventKind::PointerUp,
            Self::Wheel { .. } => EventKind::Wheel,
            Self::KeyDown { .. } => EventKind::KeyDown,
        }
    }
}

type Handler = Rc<RefCell<dyn FnMut(&HostEvent)>>;

struct Entry {
    id: u64,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Listener lists keyed by event kind.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Listeners>>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`. It stays registered until the guard drops.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(&self, kind: EventKind, handler: impl FnMut(&HostEvent) + 'static) -> Subscription {
        let mut listeners = self.inner.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push(Entry { id, kind, handler: Rc::new(RefCell::new(handler)) });
        Subscription { registry: Rc::downgrade(&self.inner), id }
    }

    /// Deliver `event` to every listener for its kind, in registration order.
    ///
    /// The listener list is snapshotted first, so handlers may subscribe or
    /// drop subscriptions while running. A handler that is already running
    /// (a re-entrant dispatch) is skipped. Returns how many handlers ran.
    pub fn dispatch(&self, event: &HostEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<Handler> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| Rc::clone(&e.handler))
            .collect();

        let mut ran = 0;
        for handler in handlers {
            if let Ok(mut f) = handler.try_borrow_mut() {
                f(event);
                ran += 1;
            } else {
                warn!(?kind, "skipping re-entrant listener");
            }
        }
        ran
    }

    /// Number of live listeners for `kind`.
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.inner.borrow().entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Number of live listeners overall.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RAII guard for one listener.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct Subscription {
    registry: Weak<RefCell<Listeners>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().entries.retain(|e| e.id != self.id);
        }
    }
}

/// Every listener an engine mount registered. Dropping it unmounts.
#[must_use = "dropping the mount removes its listeners"]
pub struct Mount {
    subscriptions: Vec<Subscription>,
}

impl Mount {
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }
}

/// Wire `engine` to `registry`: one listener per event kind.
///
/// Each listener forwards to the matching engine handler and passes the
/// resulting actions to `sink`. The engine borrow is released before the
/// sink runs, so the sink may call back into the engine.
pub fn mount<S: BoardStore + 'static>(
    registry: &ListenerRegistry,
    engine: Rc<RefCell<EngineCore<S>>>,
    sink: impl FnMut(Vec<Action>) + 'static,
) -> Mount {
    let sink: Rc<RefCell<dyn FnMut(Vec<Action>)>> = Rc::new(RefCell::new(sink));
    let subscriptions = EventKind::ALL
        .into_iter()
        .map(|kind| {
            let engine = Rc::clone(&engine);
            let sink = Rc::clone(&sink);
            registry.subscribe(kind, move |event| {
                let actions = match engine.try_borrow_mut() {
                    Ok(mut core) => forward(&mut core, event),
                    Err(_) => {
                        warn!(?kind, "engine busy; dropping event");
                        return;
                    }
                };
                if actions.is_empty() {
                    return;
                }
                if let Ok(mut f) = sink.try_borrow_mut() {
                    f(actions);
                }
            })
        })
        .collect::<Vec<_>>();
    debug!(listeners = subscriptions.len(), "engine mounted");
    Mount { subscriptions }
}

fn forward<S: BoardStore>(core: &mut EngineCore<S>, event: &HostEvent) -> Vec<Action> {
    match event {
        HostEvent::PointerDown { point, button, modifiers } => core.on_pointer_down(*point, *button, *modifiers),
        HostEvent::PointerMove { point, modifiers } => core.on_pointer_move(*point, *modifiers),
        HostEvent::PointerUp { point, button, modifiers } => core.on_pointer_up(*point, *button, *modifiers),
        HostEvent::Wheel { point, delta, modifiers } => core.on_wheel(*point, *delta, *modifiers),
        HostEvent::KeyDown { key, modifiers, focus } => core.on_key_down(key, *modifiers, *focus),
    }
}
