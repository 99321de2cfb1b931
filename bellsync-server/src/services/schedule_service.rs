use std::sync::{Arc, RwLock};

use bellsync_api::models::{DayOfWeek, RingTime, WeeklySchedule};
use time::OffsetDateTime;
use tokio::sync::Notify;

use crate::repositories::ScheduleRepository;

/// Owns the weekly ring template: an in-memory snapshot for readers, the
/// repository for persistence, and a change signal for the scheduler.
pub struct ScheduleService {
    repository: Arc<ScheduleRepository>,
    current: RwLock<WeeklySchedule>,
    changed: Arc<Notify>,
}

impl ScheduleService {
    /// Restores the persisted template into the in-memory snapshot.
    pub async fn load(repository: Arc<ScheduleRepository>) -> Result<Self, sqlx::Error> {
        let current = repository.load().await?;

        Ok(Self {
            repository,
            current: RwLock::new(current),
            changed: Arc::new(Notify::new()),
        })
    }

    /// Signal fired after every successful replace. `notify_one` stores a
    /// permit, so a change landing while the scheduler is recomputing is
    /// picked up on its next wait instead of being lost.
    pub fn change_signal(&self) -> Arc<Notify> {
        self.changed.clone()
    }

    /// Full consistent snapshot; never a partially-applied template.
    pub fn snapshot(&self) -> WeeklySchedule {
        self.current.read().expect("schedule lock poisoned").clone()
    }

    /// Replaces the template wholesale: persists first, then swaps the
    /// snapshot and wakes the scheduler. On persistence failure the prior
    /// template stays in place.
    pub async fn replace(&self, schedule: WeeklySchedule) -> Result<(), sqlx::Error> {
        self.repository.replace_all(&schedule).await?;

        *self.current.write().expect("schedule lock poisoned") = schedule;
        self.changed.notify_one();

        Ok(())
    }

    pub async fn clear(&self) -> Result<(), sqlx::Error> {
        self.replace(WeeklySchedule::new()).await
    }

    /// Today's ring times still ahead of `now`, sorted. Feeds the dashboard
    /// countdown.
    pub fn remaining_today(&self, now: OffsetDateTime) -> Vec<RingTime> {
        let today = DayOfWeek::from(now.date().weekday());

        self.current
            .read()
            .expect("schedule lock poisoned")
            .times_for(today)
            .into_iter()
            .filter(|ring| ring.time() > now.time())
            .collect()
    }
}
