//! Multi-listener notification channel.
//!
//! Listeners are zero-argument callbacks keyed by a `ListenerId`, fired
//! synchronously in registration order. `delivery` snapshots the list so
//! the owner can be released before any listener runs.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

/// Handle for removing a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<RefCell<dyn FnMut()>>;

/// A named observer list.
pub struct Notifier {
    name: &'static str,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

/// Listeners captured for one notification.
///
/// Adding or removing listeners after the capture affects the next
/// notification, not this one.
#[must_use = "a delivery does nothing until run"]
pub struct Delivery {
    name: &'static str,
    listeners: Vec<(ListenerId, Listener)>,
}

impl Delivery {
    /// Call every captured listener once, in registration order.
    pub fn run(self) {
        for (id, listener) in self.listeners {
            match listener.try_borrow_mut() {
                Ok(mut listener) => (*listener)(),
                Err(_) => warn!("{}: listener {} is already running, skipped", self.name, id.0),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Notifier {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a listener. The same closure may be added more than once.
    pub fn add(&mut self, listener: impl FnMut() + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        self.listeners.push((id, listener));
        debug!("{}: listener {} added", self.name, id.0);
        id
    }

    /// Remove a listener. Returns true if it was registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        let removed = self.listeners.len() < before;
        if removed {
            debug!("{}: listener {} removed", self.name, id.0);
        }
        removed
    }

    /// Capture the current listeners for a later `Delivery::run`.
    pub fn delivery(&self) -> Delivery {
        Delivery {
            name: self.name,
            listeners: self.listeners.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_delivery() {
        let n = Notifier::new("test");
        assert!(n.is_empty());
        assert!(n.delivery().is_empty());
        n.delivery().run();
    }

    #[test]
    fn test_fan_out_in_registration_order() {
        let mut n = Notifier::new("test");
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            n.add(move || log.borrow_mut().push(i));
        }
        n.delivery().run();
        n.delivery().run();
        assert_eq!(*log.borrow(), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_remove_listener() {
        let mut n = Notifier::new("test");
        let hits = Rc::new(RefCell::new(0));
        let a = {
            let hits = hits.clone();
            n.add(move || *hits.borrow_mut() += 1)
        };
        let _b = {
            let hits = hits.clone();
            n.add(move || *hits.borrow_mut() += 10)
        };

        assert!(n.remove(a));
        assert!(!n.remove(a));
        assert_eq!(n.len(), 1);

        n.delivery().run();
        assert_eq!(*hits.borrow(), 10);
    }

    #[test]
    fn test_delivery_is_a_snapshot() {
        let mut n = Notifier::new("test");
        let hits = Rc::new(RefCell::new(0));
        let a = {
            let hits = hits.clone();
            n.add(move || *hits.borrow_mut() += 1)
        };

        let delivery = n.delivery();
        assert_eq!(delivery.len(), 1);
        n.remove(a);
        {
            let hits = hits.clone();
            n.add(move || *hits.borrow_mut() += 100);
        }

        // Runs the captured list; the owner can be released first.
        drop(n);
        delivery.run();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_running_listener_is_not_reentered() {
        let n = Rc::new(RefCell::new(Notifier::new("test")));
        let hits = Rc::new(RefCell::new(0));
        {
            let hits = hits.clone();
            let weak = Rc::downgrade(&n);
            n.borrow_mut().add(move || {
                *hits.borrow_mut() += 1;
                if let Some(n) = weak.upgrade() {
                    let delivery = n.borrow().delivery();
                    delivery.run();
                }
            });
        }

        let delivery = n.borrow().delivery();
        delivery.run();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_ids_not_reused() {
        let mut n = Notifier::new("test");
        let a = n.add(|| {});
        n.remove(a);
        let b = n.add(|| {});
        assert_ne!(a, b);
    }
}
