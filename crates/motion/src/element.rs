//! A measurable element with pointer listeners.
//!
//! `Element` is the in-process stand-in for a rendered node: it knows its
//! current layout and delivers pointer events to registered listeners.
//! Handles are cheap clones sharing one node.
//!
//! Move events are hit-tested against the current layout. Listeners only
//! see moves over the element; the move that takes the pointer off it, or a
//! relayout that slides the element out from under a resting pointer, is
//! delivered as a single leave. An element without measurable area cannot
//! be hit-tested, so moves pass through to listeners unchanged.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use lodestone_model::{PointerSample, Region};

/// Which events a listener receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    PointerLeave,
}

/// A pointer event delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(PointerSample),
    Leave,
}

impl PointerEvent {
    pub fn kind(&self) -> ListenerKind {
        match self {
            PointerEvent::Move(_) => ListenerKind::PointerMove,
            PointerEvent::Leave => ListenerKind::PointerLeave,
        }
    }
}

/// Listener callback. Receives the event and the element's bounding
/// rectangle measured at delivery time.
pub type Handler = Box<dyn FnMut(&PointerEvent, &Region)>;

type ListenerId = u64;

enum Slot {
    Idle(Handler),
    /// The handler is checked out while it runs.
    Running,
}

struct Entry {
    kind: ListenerKind,
    slot: Slot,
}

#[derive(Default)]
struct Node {
    layout: Region,
    /// Last pointer position seen by this element, cleared on leave.
    pointer: Option<PointerSample>,
    hovered: bool,
    next_id: ListenerId,
    listeners: BTreeMap<ListenerId, Entry>,
}

impl Node {
    /// Resolve a raw pointer event into what listeners should see, updating
    /// the hover state. `None` means nothing to deliver.
    fn hit_test(&mut self, event: PointerEvent) -> Option<PointerEvent> {
        match event {
            PointerEvent::Move(sample) => {
                self.pointer = Some(sample);
                if !self.layout.has_area() {
                    return Some(event);
                }
                if self.layout.contains(sample) {
                    self.hovered = true;
                    Some(event)
                } else {
                    self.exit()
                }
            }
            PointerEvent::Leave => {
                self.pointer = None;
                self.hovered = false;
                Some(PointerEvent::Leave)
            }
        }
    }

    /// Leave on the hovered to outside transition only.
    fn exit(&mut self) -> Option<PointerEvent> {
        std::mem::take(&mut self.hovered).then_some(PointerEvent::Leave)
    }
}

/// Handle to a shared element node.
#[derive(Clone, Default)]
pub struct Element {
    node: Rc<RefCell<Node>>,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (layout, hovered, listeners) = {
            let node = self.node.borrow();
            (node.layout, node.hovered, node.listeners.len())
        };
        f.debug_struct("Element")
            .field("layout", &layout)
            .field("hovered", &hovered)
            .field("listeners", &listeners)
            .finish()
    }
}

impl Element {
    /// Create an element that has not been laid out yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element with an initial layout.
    pub fn with_layout(layout: Region) -> Self {
        let element = Self::new();
        element.set_layout(layout);
        element
    }

    /// Lay the element out again. If it moves out from under the last
    /// known pointer position, leave listeners run.
    pub fn set_layout(&self, layout: Region) {
        let left = {
            let mut node = self.node.borrow_mut();
            node.layout = layout;
            let pointer = node.pointer;
            let left = match pointer {
                Some(sample) if layout.has_area() && !layout.contains(sample) => node.exit(),
                _ => None,
            };
            left
        };
        if let Some(event) = left {
            tracing::trace!(?layout, "Element moved out from under the pointer");
            self.deliver(event);
        }
    }

    /// Current bounding rectangle.
    pub fn bounding_client_rect(&self) -> Region {
        self.node.borrow().layout
    }

    /// Register a listener. It stays registered until the returned guard
    /// is dropped or removed.
    #[must_use = "dropping the guard removes the listener immediately"]
    pub fn add_listener(
        &self,
        kind: ListenerKind,
        handler: impl FnMut(&PointerEvent, &Region) + 'static,
    ) -> Listener {
        let mut node = self.node.borrow_mut();
        let id = node.next_id;
        node.next_id += 1;
        node.listeners.insert(
            id,
            Entry {
                kind,
                slot: Slot::Idle(Box::new(handler)),
            },
        );
        Listener {
            node: Rc::downgrade(&self.node),
            id,
            kind,
        }
    }

    /// Whether the last move landed on the element.
    pub fn is_hovered(&self) -> bool {
        self.node.borrow().hovered
    }

    /// Number of registered listeners of a kind.
    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.node
            .borrow()
            .listeners
            .values()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    /// Deliver a pointer event. Moves off the element become a leave (once);
    /// further moves outside it reach no one. Returns how many handlers ran.
    pub fn dispatch(&self, event: PointerEvent) -> usize {
        let resolved = self.node.borrow_mut().hit_test(event);
        match resolved {
            Some(event) => self.deliver(event),
            None => 0,
        }
    }

    /// Run every listener of the event's kind, in registration order.
    ///
    /// A listener removed before its turn comes is skipped, even if the
    /// removal happened inside an earlier handler of this same delivery.
    fn deliver(&self, event: PointerEvent) -> usize {
        let kind = event.kind();
        let ids: Vec<ListenerId> = self
            .node
            .borrow()
            .listeners
            .iter()
            .filter(|(_, entry)| entry.kind == kind)
            .map(|(id, _)| *id)
            .collect();

        let mut delivered = 0;
        for id in ids {
            let checked_out = {
                let mut node = self.node.borrow_mut();
                let layout = node.layout;
                let handler = match node.listeners.get_mut(&id) {
                    Some(entry) => match std::mem::replace(&mut entry.slot, Slot::Running) {
                        Slot::Idle(handler) => Some(handler),
                        // Re-entrant dispatch while this handler is running.
                        Slot::Running => None,
                    },
                    None => None,
                };
                handler.map(|handler| (handler, layout))
            };
            let Some((mut handler, layout)) = checked_out else {
                continue;
            };

            handler(&event, &layout);
            delivered += 1;

            let released = {
                let mut node = self.node.borrow_mut();
                let released = match node.listeners.get_mut(&id) {
                    Some(entry) => {
                        entry.slot = Slot::Idle(handler);
                        None
                    }
                    None => Some(handler),
                };
                released
            };
            // Removed while running: drop outside the borrow.
            drop(released);
        }
        delivered
    }
}

/// Registration guard. Dropping it removes the listener.
pub struct Listener {
    node: Weak<RefCell<Node>>,
    id: ListenerId,
    kind: ListenerKind,
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Listener {
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    /// Whether the element is still alive and the listener still registered.
    pub fn is_active(&self) -> bool {
        match self.node.upgrade() {
            Some(node) => {
                let active = node.borrow().listeners.contains_key(&self.id);
                active
            }
            None => false,
        }
    }

    /// Remove the listener now.
    pub fn remove(self) {}
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(node) = self.node.upgrade() {
            let removed = node.borrow_mut().listeners.remove(&self.id);
            drop(removed);
        }
    }
}
