//! Explicit publish/subscribe channel for store writes.
//!
//! Stores publish a [`StoreChange`] after every successful write; subscribers
//! register a callback keyed by the day they display and are invoked only for
//! changes that touch that day.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Local};

use crate::utils::date::DayBounds;

/// What a successful write touched
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    /// Schedule intervals affected by the write, both before and after it
    Schedules(Vec<(DateTime<Local>, DateTime<Local>)>),
    /// Any context write; relevant to every view
    Contexts,
}

impl StoreChange {
    /// Whether a subscriber watching `day` must hear about this change
    pub fn touches(&self, day: &DayBounds) -> bool {
        match self {
            StoreChange::Schedules(intervals) => intervals
                .iter()
                .any(|(start, end)| day.overlaps(*start, *end)),
            StoreChange::Contexts => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<dyn Fn(&StoreChange)>;

struct Subscriber {
    id: SubscriptionId,
    day: Option<DayBounds>,
    callback: Callback,
}

/// Registry of change subscribers. Single-threaded by construction.
#[derive(Default)]
pub struct ChangeFeed {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<Subscriber>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. `day = None` receives every change.
    pub fn subscribe(
        &self,
        day: Option<DayBounds>,
        callback: impl Fn(&StoreChange) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            day,
            callback: Rc::new(callback),
        });
        id
    }

    /// Returns false when the subscription was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Deliver a change to every matching subscriber.
    ///
    /// Callbacks run after the registry borrow is released, so a callback may
    /// subscribe or unsubscribe.
    pub fn publish(&self, change: &StoreChange) {
        let targets: Vec<Callback> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.day.map_or(true, |day| change.touches(&day)))
            .map(|s| Rc::clone(&s.callback))
            .collect();

        log::debug!("Publishing {:?} to {} subscriber(s)", change, targets.len());
        for callback in targets {
            callback(change);
        }
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
