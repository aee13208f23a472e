//! Initial schema migration.
//!
//! It creates the complete schema for Tally:
//!
//! - `vendors`: invoice issuers, with an optional spending ceiling
//! - `invoices`: the ledger, source of truth for every total
//! - `month_limits`: ceilings per calendar month, shared across years
//! - `vendor_totals`: derived spend per vendor
//! - `month_totals`: derived spend per (year, month)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Vendors {
    Table,
    Id,
    Name,
    LimitMinor,
    CreatedAt,
}

#[derive(Iden)]
enum Invoices {
    Table,
    Id,
    VendorId,
    InvoiceNumber,
    AmountMinor,
    InvoiceDate,
    Status,
    PaymentMethod,
    Description,
    PaymentDate,
    CreatedAt,
}

#[derive(Iden)]
enum MonthLimits {
    Table,
    MonthIndex,
    LimitMinor,
}

#[derive(Iden)]
enum VendorTotals {
    Table,
    VendorId,
    TotalMinor,
}

#[derive(Iden)]
enum MonthTotals {
    Table,
    MonthKey,
    TotalMinor,
    MonthIndex,
    Year,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Vendors
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vendors::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Vendors::Name).string().not_null())
                    .col(ColumnDef::new(Vendors::LimitMinor).big_integer())
                    .col(ColumnDef::new(Vendors::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Invoices
        // ───────────────────────────────────────────────────────────────────
        // No FK on vendor_id: invoices of unregistered vendors are accepted
        // and simply have no vendor ceiling.
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invoices::VendorId).string().not_null())
                    .col(ColumnDef::new(Invoices::InvoiceNumber).string().not_null())
                    .col(
                        ColumnDef::new(Invoices::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::InvoiceDate).date().not_null())
                    .col(ColumnDef::new(Invoices::Status).string().not_null())
                    .col(ColumnDef::new(Invoices::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Invoices::Description).string())
                    .col(ColumnDef::new(Invoices::PaymentDate).date())
                    .col(ColumnDef::new(Invoices::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoices-vendor_id")
                    .table(Invoices::Table)
                    .col(Invoices::VendorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoices-invoice_date")
                    .table(Invoices::Table)
                    .col(Invoices::InvoiceDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Month limits
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MonthLimits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthLimits::MonthIndex)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonthLimits::LimitMinor).big_integer())
                    .check(Expr::col(MonthLimits::MonthIndex).between(0, 11))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Aggregates
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(VendorTotals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorTotals::VendorId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VendorTotals::TotalMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthTotals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthTotals::MonthKey)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MonthTotals::TotalMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MonthTotals::MonthIndex).integer().not_null())
                    .col(ColumnDef::new(MonthTotals::Year).integer().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthTotals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VendorTotals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthLimits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await?;
        Ok(())
    }
}
