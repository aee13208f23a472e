use std::{error::Error, str::FromStr};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{Engine, Money};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "tally_admin")]
#[command(about = "Admin utilities for Tally (vendors, limits, total repairs)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./tally.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Vendor(Vendor),
    MonthLimit(MonthLimit),
    Repair(Repair),
}

#[derive(Args, Debug)]
struct Vendor {
    #[command(subcommand)]
    command: VendorCommand,
}

#[derive(Subcommand, Debug)]
enum VendorCommand {
    Create(VendorCreateArgs),
    Limit(VendorLimitArgs),
}

#[derive(Args, Debug)]
struct VendorCreateArgs {
    #[arg(long)]
    name: String,
    /// Ceiling such as `1500.00`. Omit or 0 for unlimited.
    #[arg(long, value_parser = parse_money)]
    limit: Option<Money>,
}

#[derive(Args, Debug)]
struct VendorLimitArgs {
    #[arg(long)]
    id: String,
    #[arg(long, value_parser = parse_money)]
    limit: Option<Money>,
}

#[derive(Args, Debug)]
struct MonthLimit {
    #[command(subcommand)]
    command: MonthLimitCommand,
}

#[derive(Subcommand, Debug)]
enum MonthLimitCommand {
    Set(MonthLimitSetArgs),
}

#[derive(Args, Debug)]
struct MonthLimitSetArgs {
    /// 0 = January, 11 = December.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..12))]
    month: u32,
    #[arg(long, value_parser = parse_money)]
    limit: Option<Money>,
}

#[derive(Args, Debug)]
struct Repair {
    #[command(subcommand)]
    command: RepairCommand,
}

#[derive(Subcommand, Debug)]
enum RepairCommand {
    Vendor(RepairVendorArgs),
    Month(RepairMonthArgs),
}

#[derive(Args, Debug)]
struct RepairVendorArgs {
    #[arg(long)]
    id: String,
}

#[derive(Args, Debug)]
struct RepairMonthArgs {
    /// Any day of the month, `YYYY-MM-DD`.
    #[arg(long)]
    date: NaiveDate,
}

fn parse_money(raw: &str) -> Result<Money, String> {
    Money::from_str(raw).map_err(|err| err.to_string())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Vendor(Vendor {
            command: VendorCommand::Create(args),
        }) => {
            let id = engine.register_vendor(&args.name, args.limit).await?;
            println!("created vendor: {} ({id})", args.name);
        }
        Command::Vendor(Vendor {
            command: VendorCommand::Limit(args),
        }) => {
            let vendor = engine.set_vendor_limit(&args.id, args.limit).await?;
            match vendor.effective_limit() {
                Some(limit) => println!("vendor {}: limit {limit}", vendor.name),
                None => println!("vendor {}: unlimited", vendor.name),
            }
        }
        Command::MonthLimit(MonthLimit {
            command: MonthLimitCommand::Set(args),
        }) => {
            engine.set_month_limit(args.month, args.limit).await?;
            println!("month {} limit updated", args.month);
        }
        Command::Repair(Repair {
            command: RepairCommand::Vendor(args),
        }) => {
            let aggregate = engine.repair_vendor_total(&args.id).await?;
            println!("vendor {}: total {}", aggregate.vendor_id, aggregate.total);
        }
        Command::Repair(Repair {
            command: RepairCommand::Month(args),
        }) => {
            let aggregate = engine.repair_month_total(args.date).await?;
            println!("month {}: total {}", aggregate.key(), aggregate.total);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_vendor_create_with_limit() {
        let cli = Cli::try_parse_from([
            "tally_admin",
            "--database-url",
            "sqlite::memory:",
            "vendor",
            "create",
            "--name",
            "Acme",
            "--limit",
            "1500.50",
        ])
        .unwrap();
        let Command::Vendor(Vendor {
            command: VendorCommand::Create(args),
        }) = cli.command
        else {
            panic!("expected vendor create");
        };
        assert_eq!(args.name, "Acme");
        assert_eq!(args.limit, Some(Money::new(1500_50)));
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!(
            Cli::try_parse_from(["tally_admin", "month-limit", "set", "--month", "12"]).is_err()
        );
    }

    #[test]
    fn rejects_malformed_money() {
        assert!(parse_money("12.345").is_err());
        assert!(parse_money("abc").is_err());
    }
}
