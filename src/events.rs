// ABOUTME: Typed meal event channel connecting loggers to intake recomputation
// ABOUTME: Broadcasts logged, deleted, reset, and profile-changed events to subscribers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use nutrilens_core::models::MealRecord;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Default number of buffered events per subscriber
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Something that invalidates a day's intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MealEvent {
    /// A meal was recorded
    Logged {
        /// The new record
        meal: MealRecord,
    },
    /// One meal was removed
    Deleted {
        /// Removed meal id
        id: String,
        /// Day the meal counted towards
        day: NaiveDate,
    },
    /// Every meal of a day was removed
    DayReset {
        /// Day reset
        day: NaiveDate,
        /// Meals removed
        removed: u64,
    },
    /// The profile (and therefore the targets) changed
    ProfileChanged,
}

impl MealEvent {
    /// Day whose intake the event invalidates, or `None` when every day is affected
    #[must_use]
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            Self::Logged { meal } => Some(meal.day),
            Self::Deleted { day, .. } | Self::DayReset { day, .. } => Some(*day),
            Self::ProfileChanged => None,
        }
    }
}

/// Broadcast channel for [`MealEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MealEvent>,
}

impl EventBus {
    /// Create a bus buffering `capacity` events per subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to future events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MealEvent> {
        self.sender.subscribe()
    }

    /// Publish an event, returning how many subscribers received it
    pub fn publish(&self, event: MealEvent) -> usize {
        // A send error only means nobody is listening
        let delivered = self.sender.send(event).unwrap_or(0);
        debug!(delivered, "Meal event published");
        delivered
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER)
    }
}
