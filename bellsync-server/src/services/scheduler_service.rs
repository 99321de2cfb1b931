use std::sync::Arc;

use bellsync_api::models::{DayOfWeek, WeeklySchedule};
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::services::clock::Clock;
use crate::services::message_service::MessageService;
use crate::services::relay_service::RelayService;
use crate::services::schedule_service::ScheduleService;
use crate::services::settings_service::SettingsService;

/// Engine states. `ArmedForNext` carries the target ring instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    IdleWaiting,
    ArmedForNext(OffsetDateTime),
    Firing(OffsetDateTime),
}

/// The ring engine: one background task that arms for the next scheduled
/// instant, waits, fires the relay, and re-arms. A schedule change preempts
/// the wait and discards the stale target.
pub struct SchedulerService {
    schedule_service: Arc<ScheduleService>,
    settings_service: Arc<SettingsService>,
    relay_service: Arc<RelayService>,
    message_service: Arc<MessageService>,
    clock: Arc<dyn Clock>,
    changed: Arc<Notify>,
}

impl SchedulerService {
    pub fn new(
        schedule_service: Arc<ScheduleService>,
        settings_service: Arc<SettingsService>,
        relay_service: Arc<RelayService>,
        message_service: Arc<MessageService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let changed = schedule_service.change_signal();

        Self {
            schedule_service,
            settings_service,
            relay_service,
            message_service,
            clock,
            changed,
        }
    }

    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(&self) {
        let mut state = self.arm();

        loop {
            state = match state {
                EngineState::IdleWaiting => {
                    self.changed.notified().await;
                    self.arm()
                }
                EngineState::ArmedForNext(at) => {
                    let now = self.clock.now();
                    if now >= at {
                        EngineState::Firing(at)
                    } else {
                        let wait = (at - now).unsigned_abs();
                        tokio::select! {
                            // re-enter to re-check the wall clock before firing
                            _ = tokio::time::sleep(wait) => EngineState::ArmedForNext(at),
                            _ = self.changed.notified() => self.arm(),
                        }
                    }
                }
                EngineState::Firing(at) => {
                    self.fire(at).await;
                    self.arm()
                }
            };
        }
    }

    fn arm(&self) -> EngineState {
        let schedule = self.schedule_service.snapshot();

        match next_ring_instant(&schedule, self.clock.now()) {
            Some(at) => {
                tracing::debug!(
                    "armed for next ring: {} {:02}:{:02}",
                    DayOfWeek::from(at.date().weekday()),
                    at.hour(),
                    at.minute()
                );
                EngineState::ArmedForNext(at)
            }
            None => {
                tracing::debug!("schedule empty, engine idle");
                EngineState::IdleWaiting
            }
        }
    }

    async fn fire(&self, at: OffsetDateTime) {
        let duration = self.settings_service.ring_duration();

        match self.relay_service.pulse(duration).await {
            Ok(()) => {
                self.message_service
                    .push(format!("Ring fired at {:02}:{:02}", at.hour(), at.minute()));
            }
            Err(e) => {
                // a missed ring is not retried; the engine re-arms regardless
                tracing::error!("relay activation failed: {e}");
                self.message_service.push(format!(
                    "Ring at {:02}:{:02} failed: {e}",
                    at.hour(),
                    at.minute()
                ));
            }
        }
    }
}

/// Earliest ring instant strictly after `now`: scans today's remaining
/// times, then each following day, wrapping to the same weekday next week
/// once today's times are spent. None when the template is empty.
pub fn next_ring_instant(schedule: &WeeklySchedule, now: OffsetDateTime) -> Option<OffsetDateTime> {
    if schedule.is_empty() {
        return None;
    }

    for day_offset in 0..=7 {
        let date = now.date().checked_add(Duration::days(day_offset))?;
        let day = DayOfWeek::from(date.weekday());

        for ring in schedule.times_for(day) {
            if day_offset == 0 && ring.time() <= now.time() {
                continue;
            }

            let instant = PrimitiveDateTime::new(date, ring.time()).assume_offset(now.offset());
            return Some(instant);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration as StdDuration;

    use bellsync_api::models::RingTime;
    use time::macros::datetime;
    use tokio::time::Instant;

    use crate::configs::settings::Device;
    use crate::configs::{Database, SchemaManager, Storage};
    use crate::errors::RelayError;
    use crate::repositories::{ScheduleRepository, SettingsRepository};
    use crate::services::relay_service::RelayLine;

    use super::*;

    fn schedule(entries: &[(DayOfWeek, (u8, u8))]) -> WeeklySchedule {
        let mut schedule = WeeklySchedule::new();
        for (day, (hour, minute)) in entries {
            schedule.insert(*day, RingTime::new(*hour, *minute).unwrap());
        }
        schedule
    }

    // 2024-04-01 is a Monday
    const MONDAY: time::Date = time::macros::date!(2024 - 04 - 01);

    #[test]
    fn test_next_ring_same_day() {
        let schedule = schedule(&[
            (DayOfWeek::Monday, (8, 0)),
            (DayOfWeek::Monday, (15, 30)),
        ]);

        let next = next_ring_instant(&schedule, datetime!(2024-04-01 07:00 UTC)).unwrap();
        assert_eq!(next, datetime!(2024-04-01 08:00 UTC));
    }

    #[test]
    fn test_next_ring_skips_elapsed_and_exact_times() {
        let schedule = schedule(&[
            (DayOfWeek::Monday, (8, 0)),
            (DayOfWeek::Monday, (15, 30)),
        ]);

        // at 08:00 exactly the 08:00 slot no longer qualifies
        let next = next_ring_instant(&schedule, datetime!(2024-04-01 08:00 UTC)).unwrap();
        assert_eq!(next, datetime!(2024-04-01 15:30 UTC));
    }

    #[test]
    fn test_next_ring_wraps_a_full_week() {
        let schedule = schedule(&[
            (DayOfWeek::Monday, (8, 0)),
            (DayOfWeek::Monday, (15, 30)),
        ]);

        // all of Monday's times are spent and no other day is populated
        let next = next_ring_instant(&schedule, datetime!(2024-04-01 16:00 UTC)).unwrap();
        assert_eq!(next, datetime!(2024-04-08 08:00 UTC));
    }

    #[test]
    fn test_next_ring_rolls_over_midnight() {
        let schedule = schedule(&[(DayOfWeek::Monday, (8, 0))]);

        // Sunday night rolls over to Monday morning
        let next = next_ring_instant(&schedule, datetime!(2024-03-31 23:30 UTC)).unwrap();
        assert_eq!(next, datetime!(2024-04-01 08:00 UTC));
        assert_eq!(MONDAY, next.date());
    }

    #[test]
    fn test_next_ring_empty_schedule() {
        assert!(next_ring_instant(&WeeklySchedule::new(), datetime!(2024-04-01 07:00 UTC)).is_none());
    }

    #[test]
    fn test_next_ring_picks_earliest_across_days() {
        let schedule = schedule(&[
            (DayOfWeek::Wednesday, (6, 15)),
            (DayOfWeek::Tuesday, (19, 0)),
        ]);

        let next = next_ring_instant(&schedule, datetime!(2024-04-01 12:00 UTC)).unwrap();
        assert_eq!(next, datetime!(2024-04-02 19:00 UTC));
    }

    /// Wall clock that tracks the paused tokio runtime, so virtual sleeps
    /// advance it deterministically.
    struct TestClock {
        base: OffsetDateTime,
        started: Instant,
    }

    impl TestClock {
        fn new(base: OffsetDateTime) -> Self {
            Self {
                base,
                started: Instant::now(),
            }
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> OffsetDateTime {
            self.base + (Instant::now() - self.started)
        }
    }

    #[derive(Clone, Default)]
    struct CountingLine {
        activations: Arc<StdMutex<Vec<Instant>>>,
    }

    impl RelayLine for CountingLine {
        fn write_state(&mut self, energized: bool) -> Result<(), RelayError> {
            if energized {
                self.activations.lock().unwrap().push(Instant::now());
            }
            Ok(())
        }
    }

    struct TestEngine {
        scheduler: Arc<SchedulerService>,
        schedule_service: Arc<ScheduleService>,
        line: CountingLine,
    }

    async fn setup_engine(base: OffsetDateTime) -> TestEngine {
        // The sqlite connect and initial loads ride on non-runtime threads;
        // with the clock paused, auto-advance could leap to the pool acquire
        // timeout before the blocking connect completes. Let real time flow
        // through setup, matching `replace_realtime`.
        tokio::time::resume();
        let storage = Arc::new(
            Storage::new(
                Database {
                    clean_start: true,
                    url: String::from("sqlite::memory:"),
                },
                SchemaManager::default(),
            )
            .await
            .unwrap(),
        );

        let defaults = Device {
            name: String::from("bellsystem"),
            unique_url: String::from("bellsystem"),
            ring_duration_secs: 2,
        };
        let schedule_service = Arc::new(
            ScheduleService::load(Arc::new(ScheduleRepository::new(storage.clone())))
                .await
                .unwrap(),
        );
        let settings_service = Arc::new(
            SettingsService::load(Arc::new(SettingsRepository::new(storage)), &defaults)
                .await
                .unwrap(),
        );
        tokio::time::pause();

        let line = CountingLine::default();
        let relay_service = Arc::new(RelayService::new(Box::new(line.clone())));
        let message_service = Arc::new(MessageService::new(8));
        let clock: Arc<dyn Clock> = Arc::new(TestClock::new(base));

        let scheduler = Arc::new(SchedulerService::new(
            schedule_service.clone(),
            settings_service,
            relay_service,
            message_service,
            clock,
        ));

        TestEngine {
            scheduler,
            schedule_service,
            line,
        }
    }

    /// Runs a schedule mutation with real time flowing. The sqlite work
    /// rides on non-runtime threads; with the clock paused, auto-advance
    /// could otherwise leap past a pending engine deadline mid-write.
    async fn replace_realtime(service: &ScheduleService, schedule: WeeklySchedule) {
        tokio::time::resume();
        service.replace(schedule).await.unwrap();
        tokio::time::pause();
    }

    fn assert_fired_near(activation: Instant, start: Instant, expected_secs: u64) {
        let offset = activation - start;
        assert!(
            offset >= StdDuration::from_secs(expected_secs)
                && offset < StdDuration::from_secs(expected_secs + 2),
            "expected a ring around {expected_secs}s, got {offset:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_idles_on_empty_schedule() {
        let engine = setup_engine(datetime!(2024-04-01 07:00 UTC)).await;
        engine.scheduler.clone().start();

        tokio::time::sleep(StdDuration::from_secs(3 * 24 * 3600)).await;

        assert!(engine.line.activations.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_fires_at_scheduled_instant() {
        let engine = setup_engine(datetime!(2024-04-01 07:59 UTC)).await;
        engine.scheduler.clone().start();

        let start = Instant::now();
        replace_realtime(
            &engine.schedule_service,
            schedule(&[(DayOfWeek::Monday, (8, 0))]),
        )
        .await;

        tokio::time::sleep(StdDuration::from_secs(300)).await;

        let activations = engine.line.activations.lock().unwrap();
        assert_eq!(activations.len(), 1, "exactly one ring for one slot");
        assert_fired_near(activations[0], start, 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_fires_consecutive_slots_in_order() {
        let engine = setup_engine(datetime!(2024-04-01 07:00 UTC)).await;
        engine.scheduler.clone().start();

        let start = Instant::now();
        replace_realtime(
            &engine.schedule_service,
            schedule(&[(DayOfWeek::Monday, (8, 0)), (DayOfWeek::Monday, (15, 30))]),
        )
        .await;

        tokio::time::sleep(StdDuration::from_secs(24 * 3600)).await;

        let activations = engine.line.activations.lock().unwrap();
        assert_eq!(activations.len(), 2);
        assert_fired_near(activations[0], start, 3600);
        assert_fired_near(activations[1], start, 8 * 3600 + 30 * 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_change_preempts_armed_wait() {
        let engine = setup_engine(datetime!(2024-04-01 07:00 UTC)).await;
        engine.scheduler.clone().start();

        let start = Instant::now();
        replace_realtime(
            &engine.schedule_service,
            schedule(&[(DayOfWeek::Monday, (8, 0))]),
        )
        .await;

        // let the engine arm for 08:00, then move the slot to 07:45
        tokio::time::sleep(StdDuration::from_secs(60)).await;
        replace_realtime(
            &engine.schedule_service,
            schedule(&[(DayOfWeek::Monday, (7, 45))]),
        )
        .await;

        tokio::time::sleep(StdDuration::from_secs(3600)).await;

        let activations = engine.line.activations.lock().unwrap();
        assert_eq!(activations.len(), 1, "the stale 08:00 target was discarded");
        assert_fired_near(activations[0], start, 45 * 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_schedule_returns_engine_to_idle() {
        let engine = setup_engine(datetime!(2024-04-01 07:00 UTC)).await;
        engine.scheduler.clone().start();

        replace_realtime(
            &engine.schedule_service,
            schedule(&[(DayOfWeek::Monday, (8, 0))]),
        )
        .await;

        tokio::time::sleep(StdDuration::from_secs(60)).await;
        replace_realtime(&engine.schedule_service, WeeklySchedule::new()).await;

        tokio::time::sleep(StdDuration::from_secs(7 * 24 * 3600)).await;

        assert!(engine.line.activations.lock().unwrap().is_empty());
    }
}
