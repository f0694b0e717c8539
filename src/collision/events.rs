//! Contact events and the table of their managers.

use crate::dynamics::EntityHandle;
use core::fmt;
use slab::Slab;

/// Maximum number of parents visited when an event bubbles up.
const MAX_EVENT_DEPTH: usize = 16;

/// The handle of a [`ContactEventManager`] stored in a [`ContactEventManagers`] table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct EventManagerHandle(pub usize);

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
/// The kinds of contact events.
pub struct ContactEventKinds(u8);

bitflags::bitflags! {
    impl ContactEventKinds: u8 {
        /// A pair of collidables started overlapping.
        const PAIR_CREATED = 1;
        /// A pair of collidables stopped overlapping.
        const PAIR_REMOVED = 1 << 1;
        /// A pair of collidables started touching.
        const INITIAL_COLLISION = 1 << 2;
        /// A pair of collidables stopped touching.
        const COLLISION_ENDED = 1 << 3;
        /// A contact point was created.
        const CONTACT_CREATED = 1 << 4;
        /// A contact point was removed.
        const CONTACT_REMOVED = 1 << 5;
    }
}

/// A contact event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    /// What happened. Exactly one bit is set.
    pub kind: ContactEventKinds,
    /// The manager the event was originally raised on.
    pub source: EventManagerHandle,
    /// The entity owning the other collidable of the pair, if any.
    pub other: Option<EntityHandle>,
}

type EventHandler = Box<dyn FnMut(&ContactEvent) + Send + Sync>;

/// Collects the contact events of a collidable and forwards them to its parent.
///
/// The manager of a compound child has the manager of the compound as parent: events raised
/// on the child are dispatched to the handlers of the child, then to those of the compound.
#[derive(Default)]
pub struct ContactEventManager {
    parent: Option<EventManagerHandle>,
    deferred: Vec<ContactEvent>,
    handlers: Vec<(ContactEventKinds, EventHandler)>,
}

impl fmt::Debug for ContactEventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactEventManager")
            .field("parent", &self.parent)
            .field("deferred", &self.deferred)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl ContactEventManager {
    /// The manager events are forwarded to.
    pub fn parent(&self) -> Option<EventManagerHandle> {
        self.parent
    }

    /// Events waiting for the next [`ContactEventManagers::dispatch_events`].
    pub fn deferred_events(&self) -> &[ContactEvent] {
        &self.deferred
    }

    /// Adds a handler called for events of the given kinds.
    pub fn add_handler(
        &mut self,
        kinds: ContactEventKinds,
        handler: impl FnMut(&ContactEvent) + Send + Sync + 'static,
    ) {
        self.handlers.push((kinds, Box::new(handler)));
    }

    fn handle(&mut self, event: &ContactEvent) {
        for (kinds, handler) in &mut self.handlers {
            if kinds.intersects(event.kind) {
                handler(event);
            }
        }
    }
}

/// The table owning every contact event manager.
///
/// Collidables refer to their manager by handle, and managers refer to their parent by handle.
#[derive(Debug, Default)]
pub struct ContactEventManagers {
    managers: Slab<ContactEventManager>,
}

impl ContactEventManagers {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new manager without parent.
    pub fn create(&mut self) -> EventManagerHandle {
        EventManagerHandle(self.managers.insert(ContactEventManager::default()))
    }

    /// Removes a manager. Managers using it as parent lose their parent.
    pub fn remove(&mut self, handle: EventManagerHandle) -> Option<ContactEventManager> {
        let removed = self.managers.try_remove(handle.0)?;
        for (_, manager) in self.managers.iter_mut() {
            if manager.parent == Some(handle) {
                manager.parent = None;
            }
        }
        Some(removed)
    }

    /// The manager with the given handle.
    pub fn get(&self, handle: EventManagerHandle) -> Option<&ContactEventManager> {
        self.managers.get(handle.0)
    }

    /// The manager with the given handle.
    pub fn get_mut(&mut self, handle: EventManagerHandle) -> Option<&mut ContactEventManager> {
        self.managers.get_mut(handle.0)
    }

    /// Sets the parent of a manager.
    pub fn set_parent(&mut self, handle: EventManagerHandle, parent: Option<EventManagerHandle>) {
        if let Some(manager) = self.managers.get_mut(handle.0) {
            manager.parent = parent;
        }
    }

    /// The parent of a manager.
    pub fn parent(&self, handle: EventManagerHandle) -> Option<EventManagerHandle> {
        self.managers.get(handle.0).and_then(|m| m.parent)
    }

    /// Queues an event on a manager until the next call to [`Self::dispatch_events`].
    pub fn defer(&mut self, handle: EventManagerHandle, kind: ContactEventKinds, other: Option<EntityHandle>) {
        if let Some(manager) = self.managers.get_mut(handle.0) {
            manager.deferred.push(ContactEvent {
                kind,
                source: handle,
                other,
            });
        }
    }

    /// Dispatches every deferred event to the handlers of its manager and of its ancestors.
    ///
    /// Returns the number of dispatched events.
    pub fn dispatch_events(&mut self) -> usize {
        let mut pending = Vec::new();
        for (id, manager) in self.managers.iter_mut() {
            pending.extend(manager.deferred.drain(..).map(|e| (EventManagerHandle(id), e)));
        }

        for (origin, event) in &pending {
            let mut current = Some(*origin);
            let mut depth = 0;

            while let Some(handle) = current {
                if depth == MAX_EVENT_DEPTH {
                    log::warn!("Contact event dropped: the parents of {:?} form a cycle.", origin);
                    break;
                }

                let Some(manager) = self.managers.get_mut(handle.0) else {
                    break;
                };
                manager.handle(event);
                current = manager.parent;
                depth += 1;
            }
        }

        pending.len()
    }
}
