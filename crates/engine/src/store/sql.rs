use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    Invoice, Money, MonthAggregate, MonthKey, ResultEngine, Vendor, VendorAggregate, invoices,
    month_limits, month_totals, vendor_totals, vendors,
};

use super::{AggregateStore, InvoiceStore, LimitRegistry, WriteMode};

/// sea-orm backed store. One instance serves every trait of the engine.
#[derive(Clone, Debug, Default)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }
}

fn into_invoices(models: Vec<invoices::Model>) -> ResultEngine<Vec<Invoice>> {
    models.into_iter().map(Invoice::try_from).collect()
}

#[async_trait]
impl InvoiceStore for SqlStore {
    async fn create_invoice(&self, invoice: &Invoice) -> ResultEngine<Uuid> {
        invoices::ActiveModel::from(invoice)
            .insert(&self.database)
            .await?;
        Ok(invoice.id)
    }

    async fn invoice(&self, id: Uuid) -> ResultEngine<Option<Invoice>> {
        invoices::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .map(Invoice::try_from)
            .transpose()
    }

    async fn invoices_for_vendor(&self, vendor_id: &str) -> ResultEngine<Vec<Invoice>> {
        let models = invoices::Entity::find()
            .filter(invoices::Column::VendorId.eq(vendor_id))
            .order_by_asc(invoices::Column::InvoiceDate)
            .order_by_asc(invoices::Column::CreatedAt)
            .all(&self.database)
            .await?;
        into_invoices(models)
    }

    async fn invoices_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ResultEngine<Vec<Invoice>> {
        let models = invoices::Entity::find()
            .filter(invoices::Column::InvoiceDate.between(from, to))
            .order_by_asc(invoices::Column::InvoiceDate)
            .order_by_asc(invoices::Column::CreatedAt)
            .all(&self.database)
            .await?;
        into_invoices(models)
    }

    async fn delete_invoice(&self, id: Uuid) -> ResultEngine<bool> {
        let result = invoices::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl AggregateStore for SqlStore {
    async fn vendor_aggregate(&self, vendor_id: &str) -> ResultEngine<Option<VendorAggregate>> {
        Ok(vendor_totals::Entity::find_by_id(vendor_id.to_string())
            .one(&self.database)
            .await?
            .map(VendorAggregate::from))
    }

    async fn month_aggregate(&self, key: MonthKey) -> ResultEngine<Option<MonthAggregate>> {
        month_totals::Entity::find_by_id(key.to_string())
            .one(&self.database)
            .await?
            .map(MonthAggregate::try_from)
            .transpose()
    }

    async fn put_vendor_aggregate(
        &self,
        aggregate: &VendorAggregate,
        mode: WriteMode,
    ) -> ResultEngine<()> {
        let model = vendor_totals::ActiveModel::from(aggregate);
        match mode {
            WriteMode::Overwrite => {
                let db_tx = self.database.begin().await?;
                vendor_totals::Entity::delete_by_id(aggregate.vendor_id.clone())
                    .exec(&db_tx)
                    .await?;
                vendor_totals::Entity::insert(model)
                    .exec_without_returning(&db_tx)
                    .await?;
                db_tx.commit().await?;
            }
            WriteMode::Merge => {
                vendor_totals::Entity::insert(model)
                    .on_conflict(
                        OnConflict::column(vendor_totals::Column::VendorId)
                            .update_column(vendor_totals::Column::TotalMinor)
                            .to_owned(),
                    )
                    .exec_without_returning(&self.database)
                    .await?;
            }
        }
        Ok(())
    }

    async fn put_month_aggregate(
        &self,
        aggregate: &MonthAggregate,
        mode: WriteMode,
    ) -> ResultEngine<()> {
        let model = month_totals::ActiveModel::from(aggregate);
        match mode {
            WriteMode::Overwrite => {
                let db_tx = self.database.begin().await?;
                month_totals::Entity::delete_by_id(aggregate.key().to_string())
                    .exec(&db_tx)
                    .await?;
                month_totals::Entity::insert(model)
                    .exec_without_returning(&db_tx)
                    .await?;
                db_tx.commit().await?;
            }
            WriteMode::Merge => {
                month_totals::Entity::insert(model)
                    .on_conflict(
                        OnConflict::column(month_totals::Column::MonthKey)
                            .update_columns([
                                month_totals::Column::TotalMinor,
                                month_totals::Column::MonthIndex,
                                month_totals::Column::Year,
                            ])
                            .to_owned(),
                    )
                    .exec_without_returning(&self.database)
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LimitRegistry for SqlStore {
    async fn vendor(&self, vendor_id: &str) -> ResultEngine<Option<Vendor>> {
        Ok(vendors::Entity::find_by_id(vendor_id.to_string())
            .one(&self.database)
            .await?
            .map(Vendor::from))
    }

    async fn put_vendor(&self, vendor: &Vendor) -> ResultEngine<()> {
        vendors::Entity::insert(vendors::ActiveModel::from(vendor))
            .on_conflict(
                OnConflict::column(vendors::Column::Id)
                    .update_columns([vendors::Column::Name, vendors::Column::LimitMinor])
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }

    async fn month_limit(&self, month_index: u32) -> ResultEngine<Option<Money>> {
        Ok(month_limits::Entity::find_by_id(month_index as i32)
            .one(&self.database)
            .await?
            .and_then(|model| model.limit()))
    }

    async fn set_month_limit(&self, month_index: u32, limit: Option<Money>) -> ResultEngine<()> {
        month_limits::Entity::insert(month_limits::active_model(month_index, limit))
            .on_conflict(
                OnConflict::column(month_limits::Column::MonthIndex)
                    .update_column(month_limits::Column::LimitMinor)
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }
}
