//! Month buckets and the derived month-total aggregate.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar (year, month) bucket.
///
/// `month_index` is zero based (0 = January). The storage key renders the
/// month one based and zero padded: `2024-01`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawMonthKey")]
pub struct MonthKey {
    year: i32,
    month_index: u32,
}

#[derive(Deserialize)]
struct RawMonthKey {
    year: i32,
    month_index: u32,
}

impl TryFrom<RawMonthKey> for MonthKey {
    type Error = EngineError;

    fn try_from(raw: RawMonthKey) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month_index)
    }
}

impl MonthKey {
    pub fn new(year: i32, month_index: u32) -> ResultEngine<Self> {
        validate_month_index(month_index)?;
        Ok(Self { year, month_index })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month_index: date.month0(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month_index(self) -> u32 {
        self.month_index
    }

    pub fn month_name(self) -> &'static str {
        MONTH_NAMES
            .get(self.month_index as usize)
            .copied()
            .unwrap_or("Unknown month")
    }

    /// First calendar day of the month.
    pub fn first_day(self) -> ResultEngine<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month_index + 1, 1)
            .ok_or_else(|| out_of_range(self))
    }

    /// Last calendar day of the month.
    pub fn last_day(self) -> ResultEngine<NaiveDate> {
        let (year, month) = if self.month_index == 11 {
            (self.year.checked_add(1).ok_or_else(|| out_of_range(self))?, 1)
        } else {
            (self.year, self.month_index + 2)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| out_of_range(self))
    }

    /// Inclusive `[first_day, last_day]` range of the month.
    pub fn bounds(self) -> ResultEngine<(NaiveDate, NaiveDate)> {
        Ok((self.first_day()?, self.last_day()?))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month_index + 1)
    }
}

pub(crate) fn validate_month_index(month_index: u32) -> ResultEngine<()> {
    if month_index > 11 {
        return Err(EngineError::Validation(format!(
            "month index must be between 0 and 11, got {month_index}"
        )));
    }
    Ok(())
}

fn out_of_range(key: MonthKey) -> EngineError {
    EngineError::Validation(format!("month {key} is out of the supported date range"))
}

/// Derived total spend of one calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAggregate {
    key: MonthKey,
    pub total: Money,
}

impl MonthAggregate {
    pub fn new(key: MonthKey, total: Money) -> Self {
        Self { key, total }
    }

    pub fn key(&self) -> MonthKey {
        self.key
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "month_totals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub month_key: String,
    pub total_minor: i64,
    pub month_index: i32,
    pub year: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&MonthAggregate> for ActiveModel {
    fn from(aggregate: &MonthAggregate) -> Self {
        Self {
            month_key: ActiveValue::Set(aggregate.key().to_string()),
            total_minor: ActiveValue::Set(aggregate.total.minor()),
            month_index: ActiveValue::Set(aggregate.key.month_index as i32),
            year: ActiveValue::Set(aggregate.key.year),
        }
    }
}

impl TryFrom<Model> for MonthAggregate {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let month_index = u32::try_from(model.month_index)
            .map_err(|_| EngineError::InvalidId(format!("invalid month key {}", model.month_key)))?;
        let key = MonthKey::new(model.year, month_index)?;
        Ok(Self::new(key, Money::new(model.total_minor)))
    }
}
