use std::sync::Arc;

use bellsync_api::models::{DayOfWeek, RingTime, WeeklySchedule};
use sqlx::Error;

use crate::configs::Storage;
use crate::models::ScheduleTime;

pub struct ScheduleRepository {
    storage: Arc<Storage>,
}

impl ScheduleRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn find_all(&self) -> Result<Vec<ScheduleTime>, Error> {
        let rows: Vec<ScheduleTime> =
            sqlx::query_as("SELECT * FROM schedule_times ORDER BY weekday, ring_time")
                .fetch_all(self.storage.get_pool())
                .await?;

        Ok(rows)
    }

    /// Assembles the weekly template from the stored rows. Rows that no
    /// longer parse are dropped with a warning instead of poisoning the load.
    pub async fn load(&self) -> Result<WeeklySchedule, Error> {
        let mut schedule = WeeklySchedule::new();

        for row in self.find_all().await? {
            match (DayOfWeek::parse(&row.weekday), RingTime::parse(&row.ring_time)) {
                (Some(day), Some(time)) => schedule.insert(day, time),
                _ => tracing::warn!(
                    "dropping unreadable schedule row: {} {}",
                    row.weekday,
                    row.ring_time
                ),
            }
        }

        Ok(schedule)
    }

    /// Replaces the stored template wholesale. Delete and reinsert run in
    /// one transaction, so concurrent readers see old-or-new, never a mix.
    pub async fn replace_all(&self, schedule: &WeeklySchedule) -> Result<(), Error> {
        let mut tx = self.storage.get_pool().begin().await?;

        sqlx::query("DELETE FROM schedule_times")
            .execute(&mut *tx)
            .await?;

        for (day, times) in schedule.iter_days() {
            for time in times {
                sqlx::query("INSERT INTO schedule_times (weekday, ring_time) VALUES ($1, $2)")
                    .bind(day.name())
                    .bind(time.to_string())
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }
}
