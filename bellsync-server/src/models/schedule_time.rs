use crate::models::Table;

/// One row per (weekday, ring time) pair of the weekly template.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScheduleTime {
    pub id: i32,
    pub weekday: String,
    pub ring_time: String,
}

pub struct ScheduleTimeTable;

impl Table for ScheduleTimeTable {
    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS schedule_times (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                weekday TEXT NOT NULL,
                ring_time TEXT NOT NULL,
                UNIQUE (weekday, ring_time)
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS schedule_times;")
    }
}
