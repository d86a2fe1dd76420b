//! Live, self-invalidating layout of one day.
//!
//! A [`LiveDayQuery`] subscribes to the [`ChangeFeed`] for the day it shows.
//! Any store write touching that day flips its stale flag; the owner calls
//! [`LiveDayQuery::sync`] (typically once per frame) to recompute when needed.
//! Until the first successful read the query is [`QueryState::Loading`],
//! which is distinct from a ready day with no blocks.

use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::models::settings::TimelineConfig;
use crate::services::store::{ContextStore, ScheduleStore, StoreResult};
use crate::services::timeline::{compute_day_layout, DayLayout};
use crate::utils::date::DayBounds;

mod feed;

pub use feed::{ChangeFeed, StoreChange, SubscriptionId};

#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    Loading,
    Ready(DayLayout),
}

pub struct LiveDayQuery<'a, S: ScheduleStore, C: ContextStore> {
    schedules: &'a S,
    contexts: &'a C,
    feed: &'a ChangeFeed,
    config: TimelineConfig,
    day: DayBounds,
    subscription: SubscriptionId,
    stale: Rc<Cell<bool>>,
    state: QueryState,
}

impl<'a, S: ScheduleStore, C: ContextStore> LiveDayQuery<'a, S, C> {
    pub fn new(
        schedules: &'a S,
        contexts: &'a C,
        feed: &'a ChangeFeed,
        date: NaiveDate,
        config: TimelineConfig,
    ) -> Self {
        let day = DayBounds::for_date(date);
        let stale = Rc::new(Cell::new(true));
        let subscription = watch(feed, day, &stale);

        Self {
            schedules,
            contexts,
            feed,
            config,
            day,
            subscription,
            stale,
            state: QueryState::Loading,
        }
    }

    pub fn day(&self) -> DayBounds {
        self.day
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// The last computed layout, `None` while loading
    pub fn layout(&self) -> Option<&DayLayout> {
        match &self.state {
            QueryState::Ready(layout) => Some(layout),
            QueryState::Loading => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, QueryState::Loading)
    }

    /// Whether a write touched the day since the last refresh
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    /// Re-read the day and recompute the layout unconditionally.
    ///
    /// On error the previous state is kept and the query stays stale.
    pub fn refresh(&mut self) -> StoreResult<()> {
        let schedules = self
            .schedules
            .find_overlapping(self.day.start, self.day.end)
            .inspect_err(|e| log::warn!("Failed to load schedules for {}: {}", self.day.date(), e))?;
        let contexts = self
            .contexts
            .list_ordered()
            .inspect_err(|e| log::warn!("Failed to load contexts for {}: {}", self.day.date(), e))?;

        let layout = compute_day_layout(&schedules, &contexts, self.day, &self.config);
        log::debug!(
            "Recomputed layout for {}: {} block(s) in {} group(s)",
            self.day.date(),
            layout.blocks.len(),
            layout.groups.len()
        );

        self.stale.set(false);
        self.state = QueryState::Ready(layout);
        Ok(())
    }

    /// Refresh only when stale. Returns whether a recompute happened.
    pub fn sync(&mut self) -> StoreResult<bool> {
        if !self.stale.get() {
            return Ok(false);
        }
        self.refresh()?;
        Ok(true)
    }

    /// Switch to another day; the query returns to loading
    pub fn set_day(&mut self, date: NaiveDate) {
        if date == self.day.date() {
            return;
        }

        self.feed.unsubscribe(self.subscription);
        self.day = DayBounds::for_date(date);
        self.stale.set(true);
        self.subscription = watch(self.feed, self.day, &self.stale);
        self.state = QueryState::Loading;
    }

    pub fn set_config(&mut self, config: TimelineConfig) {
        self.config = config;
        self.stale.set(true);
    }
}

impl<S: ScheduleStore, C: ContextStore> Drop for LiveDayQuery<'_, S, C> {
    fn drop(&mut self) {
        self.feed.unsubscribe(self.subscription);
    }
}

fn watch(feed: &ChangeFeed, day: DayBounds, stale: &Rc<Cell<bool>>) -> SubscriptionId {
    let flag = Rc::clone(stale);
    feed.subscribe(Some(day), move |_| flag.set(true))
}

/// Whether any schedule overlaps the given local date
pub fn day_has_schedules<S: ScheduleStore + ?Sized>(store: &S, date: NaiveDate) -> StoreResult<bool> {
    let day = DayBounds::for_date(date);
    Ok(!store.find_overlapping(day.start, day.end)?.is_empty())
}
