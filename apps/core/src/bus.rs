use std::collections::HashMap;

/// Event published once per entry that reached its final position.
pub const LINKED_EVENT: &str = "linked";

/// Receiver of "entry linked" signals, in final chain order.
pub trait LinkSink<N> {
    fn linked(&mut self, node: &N);
}

impl<N: Clone> LinkSink<N> for Vec<N> {
    fn linked(&mut self, node: &N) {
        self.push(node.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<N> = Box<dyn FnMut(&N)>;

/// Synchronous named-event publish/subscribe channel.
///
/// Listeners for one event run in subscription order on every `signal`.
pub struct NotificationBus<N> {
    listeners: HashMap<String, Vec<(SubscriptionId, Listener<N>)>>,
    next_id: u64,
}

impl<N> Default for NotificationBus<N> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<N> NotificationBus<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, event: &str, listener: F) -> SubscriptionId
    where
        F: FnMut(&N) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(event.to_string())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Unknown or already removed ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        for listeners in self.listeners.values_mut() {
            listeners.retain(|(existing, _)| *existing != id);
        }
        self.listeners.retain(|_, listeners| !listeners.is_empty());
    }

    pub fn signal(&mut self, event: &str, node: &N) {
        let Some(listeners) = self.listeners.get_mut(event) else {
            return;
        };
        for (_, listener) in listeners.iter_mut() {
            listener(node);
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }
}

impl<N> LinkSink<N> for NotificationBus<N> {
    fn linked(&mut self, node: &N) {
        self.signal(LINKED_EVENT, node);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{NotificationBus, LINKED_EVENT};

    #[test]
    fn signal_without_listeners_is_a_no_op() {
        let mut bus: NotificationBus<u32> = NotificationBus::new();
        bus.signal(LINKED_EVENT, &1);
        assert_eq!(bus.listener_count(LINKED_EVENT), 0);
    }

    #[test]
    fn other_event_names_do_not_fire_linked_listeners() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus: NotificationBus<u32> = NotificationBus::new();
        let sink = Rc::clone(&seen);
        bus.subscribe(LINKED_EVENT, move |node: &u32| sink.borrow_mut().push(*node));

        bus.signal("rendered", &7);
        bus.signal(LINKED_EVENT, &8);

        assert_eq!(*seen.borrow(), vec![8]);
    }
}
