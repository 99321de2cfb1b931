use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize, de};
use time::{Time, Weekday};

/// Wire form of the weekly schedule: lowercase day name -> "HH:MM" strings,
/// exactly as the schedule editor posts it.
pub type ScheduleEntries = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleParseError {
    UnknownDay(String),
    InvalidTime(String),
}

impl fmt::Display for ScheduleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleParseError::UnknownDay(day) => write!(f, "unrecognized day key: {day}"),
            ScheduleParseError::InvalidTime(time) => write!(f, "invalid ring time: {time}"),
        }
    }
}

impl std::error::Error for ScheduleParseError {}

/// Days keyed the way the schedule editor keys them. Ordering is
/// monday-first, which fixes the iteration order of the weekly template.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => DayOfWeek::Monday,
            Weekday::Tuesday => DayOfWeek::Tuesday,
            Weekday::Wednesday => DayOfWeek::Wednesday,
            Weekday::Thursday => DayOfWeek::Thursday,
            Weekday::Friday => DayOfWeek::Friday,
            Weekday::Saturday => DayOfWeek::Saturday,
            Weekday::Sunday => DayOfWeek::Sunday,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => Weekday::Monday,
            DayOfWeek::Tuesday => Weekday::Tuesday,
            DayOfWeek::Wednesday => Weekday::Wednesday,
            DayOfWeek::Thursday => Weekday::Thursday,
            DayOfWeek::Friday => Weekday::Friday,
            DayOfWeek::Saturday => Weekday::Saturday,
            DayOfWeek::Sunday => Weekday::Sunday,
        }
    }
}

/// A ring time of day at minute granularity. No date, no timezone; the
/// scheduler interprets it in device-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RingTime(Time);

impl RingTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        Time::from_hms(hour, minute, 0).ok().map(Self)
    }

    /// Parses "HH:MM" (leading zero optional). Anything else is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        let (hour, minute) = value.split_once(':')?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return None;
        }
        if !hour.bytes().all(|b| b.is_ascii_digit())
            || !minute.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        Self::new(hour.parse().ok()?, minute.parse().ok()?)
    }

    pub fn time(self) -> Time {
        self.0
    }

    pub fn hour(self) -> u8 {
        self.0.hour()
    }

    pub fn minute(self) -> u8 {
        self.0.minute()
    }
}

impl fmt::Display for RingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for RingTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RingTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid ring time: {value}")))
    }
}

/// The weekly ring template: for each day, an ordered duplicate-free set of
/// ring times. Days without any times are not stored, so reads always come
/// back sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    days: BTreeMap<DayOfWeek, BTreeSet<RingTime>>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: DayOfWeek, time: RingTime) {
        self.days.entry(day).or_default().insert(time);
    }

    /// True when no day has any ring time.
    pub fn is_empty(&self) -> bool {
        self.days.values().all(BTreeSet::is_empty)
    }

    pub fn times_for(&self, day: DayOfWeek) -> Vec<RingTime> {
        self.days
            .get(&day)
            .map(|times| times.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn iter_days(&self) -> impl Iterator<Item = (DayOfWeek, &BTreeSet<RingTime>)> {
        self.days.iter().map(|(day, times)| (*day, times))
    }

    /// Builds a schedule from the raw wire map, rejecting unknown day keys
    /// and malformed times without partially applying anything.
    pub fn from_entries(entries: &ScheduleEntries) -> Result<Self, ScheduleParseError> {
        let mut schedule = Self::new();
        for (day_name, times) in entries {
            let day = DayOfWeek::parse(day_name)
                .ok_or_else(|| ScheduleParseError::UnknownDay(day_name.clone()))?;
            for value in times {
                let time = RingTime::parse(value)
                    .ok_or_else(|| ScheduleParseError::InvalidTime(value.clone()))?;
                schedule.insert(day, time);
            }
        }
        Ok(schedule)
    }

    /// Wire map of the populated days, times sorted and de-duplicated.
    pub fn to_entries(&self) -> ScheduleEntries {
        self.days
            .iter()
            .filter(|(_, times)| !times.is_empty())
            .map(|(day, times)| {
                (
                    day.name().to_string(),
                    times.iter().map(RingTime::to_string).collect(),
                )
            })
            .collect()
    }
}
