use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Anything that falls on a calendar day in local time.
pub trait CalendarDay {
    fn local_date(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn local_date(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn local_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn local_date(&self) -> NaiveDate {
        self.with_timezone(&Local).date_naive()
    }
}

/// Day-granular comparison key: equal iff both values fall on the same local
/// calendar day, ordered like the days themselves.
pub fn normalize(date: &impl CalendarDay) -> i64 {
    i64::from(date.local_date().num_days_from_ce())
}

/// Source of "today" for every date rule.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
