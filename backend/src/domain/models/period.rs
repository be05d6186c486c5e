//! Whole-day cadence of a recurring money flow.

use chrono::Days;
use shared::PeriodType;

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    days: i32,
}

impl Period {
    pub const DAY: i32 = 1;
    pub const WEEK: i32 = 7;
    pub const MONTH: i32 = 30;

    pub fn daily() -> Self {
        Self { days: Self::DAY }
    }

    pub fn weekly() -> Self {
        Self { days: Self::WEEK }
    }

    pub fn monthly() -> Self {
        Self { days: Self::MONTH }
    }

    /// Only daily, weekly and monthly (30 day) periods are supported
    pub fn from_days(days: i32) -> Result<Self, DomainError> {
        match days {
            Self::DAY => Ok(Self::daily()),
            Self::WEEK => Ok(Self::weekly()),
            Self::MONTH => Ok(Self::monthly()),
            other => Err(DomainError::UnsupportedPeriod(other)),
        }
    }

    pub fn days(&self) -> i32 {
        self.days
    }

    pub(crate) fn as_days(&self) -> Days {
        // days is one of the positive constants above
        Days::new(self.days as u64)
    }
}

impl From<PeriodType> for Period {
    fn from(period_type: PeriodType) -> Self {
        match period_type {
            PeriodType::Daily => Period::daily(),
            PeriodType::Weekly => Period::weekly(),
            PeriodType::Monthly => Period::monthly(),
        }
    }
}

impl TryFrom<i32> for Period {
    type Error = DomainError;

    fn try_from(days: i32) -> Result<Self, Self::Error> {
        Period::from_days(days)
    }
}
