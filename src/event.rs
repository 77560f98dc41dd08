//! Key listener registration and dispatch.
//!
//! A display surface owns one [`KeyListeners`] registry. Its event source
//! calls [`KeyListeners::dispatch`] for every key press, and each registered
//! [`KeyListener`] sees the press in registration order.
//!
//! # Event Flow
//!
//! ```text
//! native key press → surface event source → KeyListeners::dispatch
//!                                                 │
//!                                                 ├─ user listeners
//!                                                 └─ console line reader → LineQueue
//! ```
//!
//! The registry lock is released before listeners run, so a listener may read
//! the surface, register further listeners, or remove itself without
//! deadlocking.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::mpsc::channel;
//! use console_pane::event::KeyListeners;
//! use console_pane::input::KeyEvent;
//!
//! let (tx, rx) = channel();
//! let listeners = KeyListeners::new();
//! listeners.add(Arc::new(move |event: &KeyEvent| {
//!     let _ = tx.send(*event);
//! }));
//!
//! listeners.dispatch(&KeyEvent::enter());
//! assert_eq!(rx.recv().unwrap(), KeyEvent::enter());
//! ```

use crate::input::KeyEvent;
use parking_lot::Mutex;
use std::sync::Arc;

/// Callback invoked for every key press on a surface.
///
/// Listeners run on the surface's event-dispatch context and must be
/// `Send + Sync`.
pub type KeyListener = Arc<dyn Fn(&KeyEvent) + Send + Sync>;

/// Handle returned when a listener is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(ListenerId, KeyListener)>,
}

/// Ordered set of key listeners.
#[derive(Default)]
pub struct KeyListeners {
    registry: Mutex<Registry>,
}

impl KeyListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: KeyListener) -> ListenerId {
        let mut registry = self.registry.lock();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut registry = self.registry.lock();
        let before = registry.entries.len();
        registry.entries.retain(|(entry_id, _)| *entry_id != id);
        registry.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.registry.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers an event to every listener registered at the time of the call.
    pub fn dispatch(&self, event: &KeyEvent) {
        let snapshot: Vec<KeyListener> = self
            .registry
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }
}

impl std::fmt::Debug for KeyListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyListeners")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_dispatch_in_registration_order() {
        let (tx, rx) = channel();
        let listeners = KeyListeners::new();
        for tag in 0..3 {
            let tx = tx.clone();
            listeners.add(Arc::new(move |_event: &KeyEvent| {
                let _ = tx.send(tag);
            }));
        }

        listeners.dispatch(&KeyEvent::char('x'));

        let order: Vec<i32> = rx.try_iter().collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_remove() {
        let (tx, rx) = channel();
        let listeners = KeyListeners::new();
        let id = listeners.add(Arc::new(move |event: &KeyEvent| {
            let _ = tx.send(*event);
        }));

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        assert!(listeners.is_empty());

        listeners.dispatch(&KeyEvent::enter());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_listener_can_register_during_dispatch() {
        let listeners = Arc::new(KeyListeners::new());
        let inner = Arc::clone(&listeners);
        listeners.add(Arc::new(move |_event: &KeyEvent| {
            inner.add(Arc::new(|_event: &KeyEvent| {}));
        }));

        listeners.dispatch(&KeyEvent::enter());
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn test_dispatch_without_listeners() {
        KeyListeners::new().dispatch(&KeyEvent::enter());
    }
}
