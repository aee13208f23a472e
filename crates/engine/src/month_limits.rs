//! Per-calendar-month ceilings.
//!
//! A month limit is keyed **only** by the month index (0 = January, 11 =
//! December). The same cap applies to that month of every year: a January
//! limit constrains January 2024 and January 2025 alike, each against its own
//! month total.

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::Money;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "month_limits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub month_index: i32,
    pub limit_minor: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn limit(&self) -> Option<Money> {
        self.limit_minor.map(Money::new)
    }
}

pub(crate) fn active_model(month_index: u32, limit: Option<Money>) -> ActiveModel {
    ActiveModel {
        month_index: ActiveValue::Set(month_index as i32),
        limit_minor: ActiveValue::Set(limit.map(Money::minor)),
    }
}
