//! In-process publish-subscribe channel.
//!
//! # Responsibility
//! - Register and remove listener callbacks by handle.
//! - Fan a payload out to every registered listener synchronously.
//!
//! # Invariants
//! - Listeners run in registration order.
//! - Payloads reach every listener in the order `notify` was called, even
//!   when a listener calls `notify` again: nested payloads are queued and
//!   delivered after the running fan-out completes.
//! - A listener removed during a fan-out is not called again, including for
//!   the payload currently being delivered.
//! - A listener added during a fan-out starts with the next payload.

use log::debug;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

/// Stable handle id, unique per registry.
pub type SubscriptionId = u64;

type Listener<T> = Rc<dyn Fn(&T)>;

struct RegistryState<T> {
    next_id: SubscriptionId,
    listeners: BTreeMap<SubscriptionId, Listener<T>>,
    dispatching: bool,
    pending: VecDeque<T>,
}

/// Named broadcast channel carrying payloads of type `T`.
pub struct ListenerRegistry<T> {
    name: &'static str,
    state: Rc<RefCell<RegistryState<T>>>,
}

impl<T> ListenerRegistry<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Rc::new(RefCell::new(RegistryState {
                next_id: 0,
                listeners: BTreeMap::new(),
                dispatching: false,
                pending: VecDeque::new(),
            })),
        }
    }

    /// Channel name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registers `listener` for every future notification.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription<T> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.insert(id, Rc::new(listener));
        debug!(
            "event=listener_add module=broadcast channel={} id={} listeners={}",
            self.name,
            id,
            state.listeners.len()
        );

        Subscription {
            id,
            channel: self.name,
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn len(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().listeners.is_empty()
    }

    fn deliver(&self, payload: &T) -> usize {
        let snapshot: Vec<(SubscriptionId, Listener<T>)> = self
            .state
            .borrow()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in snapshot {
            if !self.state.borrow().listeners.contains_key(&id) {
                continue;
            }
            listener(payload);
            delivered += 1;
        }
        delivered
    }
}

impl<T: Clone> ListenerRegistry<T> {
    /// Delivers `payload` to every registered listener.
    ///
    /// Called from inside a listener, the payload is queued behind the
    /// running fan-out and `0` is returned. Otherwise returns the number of
    /// listener invocations made, queued payloads included.
    pub fn notify(&self, payload: &T) -> usize {
        {
            let mut state = self.state.borrow_mut();
            if state.dispatching {
                state.pending.push_back(payload.clone());
                debug!(
                    "event=broadcast module=broadcast channel={} status=queued pending={}",
                    self.name,
                    state.pending.len()
                );
                return 0;
            }
            state.dispatching = true;
        }
        let _dispatch = DispatchGuard {
            state: &self.state,
        };

        let mut delivered = self.deliver(payload);
        loop {
            let next = self.state.borrow_mut().pending.pop_front();
            let Some(queued) = next else {
                break;
            };
            delivered += self.deliver(&queued);
        }

        debug!(
            "event=broadcast module=broadcast channel={} status=ok delivered={}",
            self.name, delivered
        );
        delivered
    }
}

/// Clears the dispatch flag even when a listener panics.
struct DispatchGuard<'a, T> {
    state: &'a RefCell<RegistryState<T>>,
}

impl<T> Drop for DispatchGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.dispatching = false;
        state.pending.clear();
    }
}

impl<T> Debug for ListenerRegistry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("name", &self.name)
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle returned by [`ListenerRegistry::subscribe`].
///
/// Dropping the handle does not remove the listener; call
/// [`Subscription::unsubscribe`].
pub struct Subscription<T> {
    id: SubscriptionId,
    channel: &'static str,
    state: Weak<RefCell<RegistryState<T>>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.state
            .upgrade()
            .is_some_and(|state| state.borrow().listeners.contains_key(&self.id))
    }

    /// Removes the listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let removed = state.borrow_mut().listeners.remove(&self.id).is_some();
        if removed {
            debug!(
                "event=listener_remove module=broadcast channel={} id={}",
                self.channel, self.id
            );
        }
        removed
    }
}

impl<T> Debug for Subscription<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("channel", &self.channel)
            .finish()
    }
}
