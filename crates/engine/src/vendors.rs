//! The module contains the `Vendor` record and its spending ceiling.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::Money;

/// A vendor invoices are issued by.
///
/// `limit` is the ceiling on the vendor's total spend. `None` or zero means
/// the vendor is unlimited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub limit: Option<Money>,
    pub created_at: DateTime<Utc>,
}

impl Vendor {
    /// Returns the ceiling only when it actually constrains spend.
    pub fn effective_limit(&self) -> Option<Money> {
        self.limit.filter(|limit| limit.is_positive())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub limit_minor: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Vendor> for ActiveModel {
    fn from(vendor: &Vendor) -> Self {
        Self {
            id: ActiveValue::Set(vendor.id.clone()),
            name: ActiveValue::Set(vendor.name.clone()),
            limit_minor: ActiveValue::Set(vendor.limit.map(Money::minor)),
            created_at: ActiveValue::Set(vendor.created_at),
        }
    }
}

impl From<Model> for Vendor {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            limit: model.limit_minor.map(Money::new),
            created_at: model.created_at,
        }
    }
}
