//! Synchronous publish/subscribe channel
//!
//! Every handler receives the bus itself (so it can emit or unsubscribe while
//! running) and a mutable borrow of the shared context. Delivery is
//! synchronous, in registration order, at most once.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::event::{Event, Topic};

/// Token returned by [`EventBus::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler<C> = dyn Fn(&EventBus<C>, &mut C, &Event);

struct Subscription<C> {
    id: HandlerId,
    /// Cleared by `off`; checked before every invocation
    live: Cell<bool>,
    handler: Box<Handler<C>>,
}

/// Event bus over a context type `C`
pub struct EventBus<C> {
    topics: RefCell<HashMap<Topic, Vec<Rc<Subscription<C>>>>>,
    next_id: Cell<u64>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self {
            topics: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    /// Register a handler for `topic`. Handlers added while an emission of the
    /// same topic is running first fire on the next emission.
    pub fn on<F>(&self, topic: Topic, handler: F) -> HandlerId
    where
        F: Fn(&EventBus<C>, &mut C, &Event) + 'static,
    {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let subscription = Rc::new(Subscription {
            id,
            live: Cell::new(true),
            handler: Box::new(handler),
        });
        self.topics
            .borrow_mut()
            .entry(topic)
            .or_default()
            .push(subscription);
        id
    }

    /// Remove a handler. Takes effect immediately, including for an emission
    /// of `topic` that is currently running. Returns false if `id` was not
    /// registered for `topic`.
    pub fn off(&self, topic: Topic, id: HandlerId) -> bool {
        let mut topics = self.topics.borrow_mut();
        let Some(subscriptions) = topics.get_mut(&topic) else {
            return false;
        };
        let Some(index) = subscriptions.iter().position(|s| s.id == id) else {
            return false;
        };
        let removed = subscriptions.remove(index);
        removed.live.set(false);
        true
    }

    /// Deliver `event` to every handler currently registered for its topic
    pub fn emit(&self, ctx: &mut C, event: Event) {
        let topic = event.topic();
        let snapshot: Vec<Rc<Subscription<C>>> = self
            .topics
            .borrow()
            .get(&topic)
            .cloned()
            .unwrap_or_default();

        if topic != Topic::Update {
            log::trace!("emit {} -> {} handlers", topic.as_str(), snapshot.len());
        }

        for subscription in snapshot {
            if subscription.live.get() {
                (subscription.handler)(self, ctx, &event);
            }
        }
    }

    /// Number of handlers registered for `topic`
    pub fn handler_count(&self, topic: Topic) -> usize {
        self.topics.borrow().get(&topic).map_or(0, Vec::len)
    }

    pub fn is_subscribed(&self, topic: Topic, id: HandlerId) -> bool {
        self.topics
            .borrow()
            .get(&topic)
            .is_some_and(|subs| subs.iter().any(|s| s.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Vec<&'static str>;

    #[test]
    fn test_fifo_order_within_topic() {
        let bus: EventBus<Log> = EventBus::new();
        bus.on(Topic::Update, |_, log, _| log.push("a"));
        bus.on(Topic::Update, |_, log, _| log.push("b"));
        bus.on(Topic::Update, |_, log, _| log.push("c"));

        let mut log = Log::new();
        bus.emit(&mut log, Event::Update);
        assert_eq!(log, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_off_removes_only_that_handler() {
        let bus: EventBus<Log> = EventBus::new();
        bus.on(Topic::Update, |_, log, _| log.push("a"));
        let b = bus.on(Topic::Update, |_, log, _| log.push("b"));

        assert!(bus.off(Topic::Update, b));
        assert!(!bus.off(Topic::Update, b));
        assert!(!bus.off(Topic::Start, b));

        let mut log = Log::new();
        bus.emit(&mut log, Event::Update);
        assert_eq!(log, vec!["a"]);
    }

    #[test]
    fn test_self_unsubscribe_during_emit() {
        let bus: EventBus<Log> = EventBus::new();
        let id = Rc::new(Cell::new(None));
        let own = id.clone();
        bus.on(Topic::Update, |_, log, _| log.push("first"));
        id.set(Some(bus.on(Topic::Update, move |bus, log, _| {
            log.push("once");
            if let Some(me) = own.get() {
                bus.off(Topic::Update, me);
            }
        })));
        bus.on(Topic::Update, |_, log, _| log.push("last"));

        let mut log = Log::new();
        bus.emit(&mut log, Event::Update);
        bus.emit(&mut log, Event::Update);
        assert_eq!(log, vec!["first", "once", "last", "first", "last"]);
    }

    #[test]
    fn test_off_later_handler_skips_it_in_current_emission() {
        let bus: EventBus<Log> = EventBus::new();
        let victim = Rc::new(Cell::new(None));
        let target = victim.clone();
        bus.on(Topic::Update, move |bus, log, _| {
            log.push("killer");
            if let Some(id) = target.get() {
                bus.off(Topic::Update, id);
            }
        });
        victim.set(Some(bus.on(Topic::Update, |_, log, _| log.push("victim"))));
        bus.on(Topic::Update, |_, log, _| log.push("bystander"));

        let mut log = Log::new();
        bus.emit(&mut log, Event::Update);
        assert_eq!(log, vec!["killer", "bystander"]);
    }

    #[test]
    fn test_handler_added_during_emit_waits_for_next() {
        let bus: EventBus<Log> = EventBus::new();
        bus.on(Topic::StartGame, |bus, log, _| {
            log.push("gate");
            bus.on(Topic::StartGame, |_, log, _| log.push("late"));
        });

        let mut log = Log::new();
        bus.emit(&mut log, Event::StartGame);
        assert_eq!(log, vec!["gate"]);
        assert_eq!(bus.handler_count(Topic::StartGame), 2);
    }

    #[test]
    fn test_reentrant_emit_other_topic() {
        let bus: EventBus<Log> = EventBus::new();
        bus.on(Topic::Update, |bus, log, _| {
            log.push("tick");
            bus.emit(log, Event::EnemyDown);
            log.push("tick-end");
        });
        bus.on(Topic::EnemyDown, |_, log, _| log.push("down"));

        let mut log = Log::new();
        bus.emit(&mut log, Event::Update);
        assert_eq!(log, vec!["tick", "down", "tick-end"]);
    }

    #[test]
    fn test_payload_passed_through() {
        let bus: EventBus<Vec<String>> = EventBus::new();
        bus.on(Topic::GameOver, |_, log, event| {
            if let Event::GameOver(cause) = event {
                log.push(cause.clone());
            }
        });

        let mut log = Vec::new();
        bus.emit(&mut log, Event::GameOver("boom".into()));
        assert_eq!(log, vec!["boom".to_string()]);
    }
}
