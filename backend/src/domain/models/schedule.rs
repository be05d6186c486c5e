//! # Periodical Schedule
//!
//! Tracks when a recurring money flow is next due.
//!
//! A schedule is either *pending* (never checked, due on its starting date)
//! or *checked* at some date, in which case it is next due one period after
//! that date. Checking a due schedule advances it by exactly one period, no
//! matter how many periods have elapsed since it was last checked: a flow
//! that missed several occurrences catches up one occurrence per check and
//! never back-fills a burst of entries at once.

use chrono::{Days, NaiveDate};

use super::Period;
use crate::clock::Clock;
use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicalSchedule {
    starting_date: NaiveDate,
    last_checked_date: Option<NaiveDate>,
    period: Period,
}

impl PeriodicalSchedule {
    /// Create a pending schedule. The starting date must be tomorrow or later.
    pub fn new(starting_date: NaiveDate, period: Period, clock: &dyn Clock) -> Result<Self, DomainError> {
        let earliest = clock
            .today_utc()
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX);

        if starting_date < earliest {
            return Err(DomainError::StartsTooEarly { starting_date, earliest });
        }

        Ok(Self {
            starting_date,
            last_checked_date: None,
            period,
        })
    }

    /// Rebuild a schedule from stored fields.
    ///
    /// A last checked date must lie between the starting date and today and
    /// sit a whole number of periods after the starting date.
    pub fn existing(
        starting_date: NaiveDate,
        last_checked_date: Option<NaiveDate>,
        period: Period,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let Some(last_checked) = last_checked_date else {
            return Ok(Self {
                starting_date,
                last_checked_date: None,
                period,
            });
        };

        if last_checked < starting_date {
            return Err(DomainError::CheckedBeforeStart {
                starting_date,
                last_checked,
            });
        }

        let today = clock.today_utc();
        if last_checked > today {
            return Err(DomainError::CheckedInFuture { last_checked, today });
        }

        let elapsed = (last_checked - starting_date).num_days();
        if elapsed % i64::from(period.days()) != 0 {
            return Err(DomainError::OffCadence {
                starting_date,
                last_checked,
                period_days: period.days(),
            });
        }

        Ok(Self {
            starting_date,
            last_checked_date: Some(last_checked),
            period,
        })
    }

    pub fn starting_date(&self) -> NaiveDate {
        self.starting_date
    }

    pub fn last_checked_date(&self) -> Option<NaiveDate> {
        self.last_checked_date
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Date the schedule is next due on
    pub fn next_check_date(&self) -> NaiveDate {
        match self.last_checked_date {
            None => self.starting_date,
            Some(last_checked) => last_checked
                .checked_add_days(self.period.as_days())
                .unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn is_on_time(&self, clock: &dyn Clock) -> bool {
        clock.today_utc() >= self.next_check_date()
    }

    /// Advance the schedule by one period if it is due.
    ///
    /// Returns `None` and leaves the schedule untouched when it is not due.
    /// The new last checked date is the previous next check date, not today.
    #[must_use]
    pub fn try_mark_checked(&self, clock: &dyn Clock) -> Option<Self> {
        if !self.is_on_time(clock) {
            return None;
        }

        Some(Self {
            last_checked_date: Some(self.next_check_date()),
            ..*self
        })
    }
}
