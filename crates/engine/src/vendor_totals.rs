//! The derived vendor-total aggregate.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::Money;

/// Derived total spend of one vendor across all of its invoices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorAggregate {
    pub vendor_id: String,
    pub total: Money,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vendor_totals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub vendor_id: String,
    pub total_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&VendorAggregate> for ActiveModel {
    fn from(aggregate: &VendorAggregate) -> Self {
        Self {
            vendor_id: ActiveValue::Set(aggregate.vendor_id.clone()),
            total_minor: ActiveValue::Set(aggregate.total.minor()),
        }
    }
}

impl From<Model> for VendorAggregate {
    fn from(model: Model) -> Self {
        Self {
            vendor_id: model.vendor_id,
            total: Money::new(model.total_minor),
        }
    }
}
