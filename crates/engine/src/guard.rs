//! Budget guard: decides whether a prospective invoice fits its ceilings.
//!
//! The guard is a pure function. It never touches a store; callers fetch the
//! limits and the current aggregate totals and hand them over in a
//! [`BudgetCheck`].
//!
//! Two dimensions are checked, independently of each other:
//!
//! - the vendor ceiling against the vendor's projected total;
//! - the month ceiling against the projected total of the invoice's month.
//!
//! A dimension with no limit (or a zero limit) never blocks nor warns. A
//! projection strictly above the limit blocks. A projection inside
//! `[95% of limit, limit]` warns. Any block wins over every warning.

use serde::{Deserialize, Serialize};

use crate::{Money, MonthKey};

/// Lower edge of the warning band, in percent of the limit.
pub const WARN_THRESHOLD_PERCENT: i128 = 95;

/// Inputs of a single guard evaluation.
#[derive(Clone, Debug)]
pub struct BudgetCheck<'a> {
    pub amount: Money,
    /// Display name used in messages about the vendor ceiling.
    pub vendor_name: &'a str,
    pub vendor_limit: Option<Money>,
    pub vendor_total: Money,
    pub month: MonthKey,
    pub month_limit: Option<Money>,
    pub month_total: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "messages", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Block(Vec<String>),
    Warn(Vec<String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Level {
    Clear,
    Near,
    Over,
}

fn classify(limit: Option<Money>, projected: Option<Money>) -> Level {
    let Some(limit) = limit.filter(|l| l.is_positive()) else {
        return Level::Clear;
    };
    // An overflowing projection is over any representable limit.
    let Some(projected) = projected else {
        return Level::Over;
    };
    if projected > limit {
        return Level::Over;
    }
    if i128::from(projected.minor()) * 100 >= i128::from(limit.minor()) * WARN_THRESHOLD_PERCENT {
        Level::Near
    } else {
        Level::Clear
    }
}

fn percent_of(projected: Money, limit: Money) -> i128 {
    i128::from(projected.minor()) * 100 / i128::from(limit.minor())
}

/// Classify a prospective invoice against vendor and month ceilings.
pub fn evaluate(check: &BudgetCheck<'_>) -> Decision {
    let projected_vendor = check.vendor_total.checked_add(check.amount);
    let projected_month = check.month_total.checked_add(check.amount);
    let month_label = format!("{} {}", check.month.month_name(), check.month.year());

    let mut blocks = Vec::new();
    let mut warnings = Vec::new();

    match (
        classify(check.vendor_limit, projected_vendor),
        check.vendor_limit,
        projected_vendor,
    ) {
        (Level::Over, Some(limit), projected) => blocks.push(match projected {
            Some(projected) => format!(
                "vendor '{}' would exceed its limit: {projected} > {limit}",
                check.vendor_name
            ),
            None => format!("vendor '{}' would exceed its limit of {limit}", check.vendor_name),
        }),
        (Level::Near, Some(limit), Some(projected)) => warnings.push(format!(
            "vendor '{}' would reach {}% of its limit: {projected} of {limit}",
            check.vendor_name,
            percent_of(projected, limit)
        )),
        _ => {}
    }

    match (
        classify(check.month_limit, projected_month),
        check.month_limit,
        projected_month,
    ) {
        (Level::Over, Some(limit), projected) => blocks.push(match projected {
            Some(projected) => {
                format!("{month_label} would exceed its monthly limit: {projected} > {limit}")
            }
            None => format!("{month_label} would exceed its monthly limit of {limit}"),
        }),
        (Level::Near, Some(limit), Some(projected)) => warnings.push(format!(
            "{month_label} would reach {}% of its monthly limit: {projected} of {limit}",
            percent_of(projected, limit)
        )),
        _ => {}
    }

    if !blocks.is_empty() {
        Decision::Block(blocks)
    } else if !warnings.is_empty() {
        Decision::Warn(warnings)
    } else {
        Decision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn january_2024() -> MonthKey {
        MonthKey::new(2024, 0).unwrap()
    }

    fn check(amount: i64, vendor_limit: Option<i64>, vendor_total: i64) -> BudgetCheck<'static> {
        BudgetCheck {
            amount: Money::new(amount),
            vendor_name: "ACME",
            vendor_limit: vendor_limit.map(Money::new),
            vendor_total: Money::new(vendor_total),
            month: january_2024(),
            month_limit: None,
            month_total: Money::ZERO,
        }
    }

    #[test]
    fn no_limits_always_allow() {
        assert_eq!(evaluate(&check(1_000_000, None, 999_999_999)), Decision::Allow);
        assert_eq!(evaluate(&check(1_000_000, Some(0), 999_999_999)), Decision::Allow);
    }

    #[test]
    fn warns_at_ninety_five_percent() {
        let Decision::Warn(messages) = evaluate(&check(950, Some(1000), 0)) else {
            panic!("expected a warning");
        };
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("ACME"));
        assert!(messages[0].contains("95%"));
    }

    #[test]
    fn just_below_band_allows() {
        assert_eq!(evaluate(&check(949, Some(1000), 0)), Decision::Allow);
    }

    #[test]
    fn exactly_at_limit_warns_one_cent_over_blocks() {
        assert!(matches!(
            evaluate(&check(1000, Some(1000), 0)),
            Decision::Warn(_)
        ));
        let Decision::Block(reasons) = evaluate(&check(51, Some(1000), 950)) else {
            panic!("expected a block");
        };
        assert_eq!(reasons, vec!["vendor 'ACME' would exceed its limit: 10.01 > 10.00"]);
    }

    #[test]
    fn block_wins_over_other_dimension_warning() {
        let mut input = check(100, Some(500), 450);
        input.month_limit = Some(Money::new(10_000));
        input.month_total = Money::new(9_400);
        let Decision::Block(reasons) = evaluate(&input) else {
            panic!("expected a block");
        };
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].starts_with("vendor 'ACME'"));
    }

    #[test]
    fn both_dimensions_can_block() {
        let mut input = check(200, Some(100), 0);
        input.month_limit = Some(Money::new(150));
        let Decision::Block(reasons) = evaluate(&input) else {
            panic!("expected a block");
        };
        assert_eq!(reasons.len(), 2);
        assert!(reasons[1].starts_with("January 2024"));
    }

    #[test]
    fn both_dimensions_can_warn() {
        let mut input = check(100, Some(1000), 880);
        input.month_limit = Some(Money::new(2000));
        input.month_total = Money::new(1850);
        let Decision::Warn(messages) = evaluate(&input) else {
            panic!("expected warnings");
        };
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn overflowing_projection_blocks() {
        let input = check(i64::MAX, Some(1000), 1);
        assert!(matches!(evaluate(&input), Decision::Block(_)));
    }

    #[test]
    fn block_and_warn_match_their_definitions() {
        for limit in [0i64, 1, 20, 100, 1000, 1001] {
            for total in [0i64, 1, 19, 50, 94, 95, 500, 949, 950, 999, 1000] {
                for amount in [1i64, 5, 50, 51] {
                    let projected = i128::from(total + amount);
                    let limit_wide = i128::from(limit);
                    let over = limit > 0 && projected > limit_wide;
                    let near = limit > 0 && !over && projected * 100 >= limit_wide * 95;

                    let decision = evaluate(&check(amount, Some(limit), total));
                    match decision {
                        Decision::Block(_) => assert!(over, "{limit} {total} {amount}"),
                        Decision::Warn(_) => assert!(near, "{limit} {total} {amount}"),
                        Decision::Allow => assert!(!over && !near, "{limit} {total} {amount}"),
                    }
                }
            }
        }
    }

    #[test]
    fn month_limit_ignores_year() {
        // Same January cap applies whatever the year, against that year's total.
        for year in [2023, 2024, 2031] {
            let input = BudgetCheck {
                amount: Money::new(1200),
                vendor_name: "ACME",
                vendor_limit: None,
                vendor_total: Money::ZERO,
                month: MonthKey::new(year, 0).unwrap(),
                month_limit: Some(Money::new(10_000)),
                month_total: Money::new(9_000),
            };
            let Decision::Block(reasons) = evaluate(&input) else {
                panic!("expected a block for {year}");
            };
            assert_eq!(
                reasons,
                vec![format!(
                    "January {year} would exceed its monthly limit: 102.00 > 100.00"
                )]
            );
        }
    }
}
