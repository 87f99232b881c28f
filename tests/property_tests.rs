use brigade_engine::services::{
    payments::{attributed_tip, bill_total},
    timeclock::{overtime_split, split_earnings, week_bounds},
};
use chrono::{Datelike, NaiveDate, Weekday};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn quarter_hours() -> impl Strategy<Value = Decimal> {
    // 0.00 to 16.00 hours in quarter-hour steps.
    (0i64..=64).prop_map(|q| Decimal::new(q * 25, 2))
}

fn week_hours() -> impl Strategy<Value = Decimal> {
    (0i64..=240).prop_map(|q| Decimal::new(q * 25, 2))
}

fn percent() -> impl Strategy<Value = Decimal> {
    (0i64..=3000).prop_map(|p| Decimal::new(p, 2))
}

fn money() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000).prop_map(|c| Decimal::new(c, 2))
}

proptest! {
    #[test]
    fn overtime_split_conserves_hours(
        hours in quarter_hours(),
        before in week_hours(),
    ) {
        let threshold = dec!(40);
        let (regular, overtime) = overtime_split(hours, before, threshold);
        prop_assert_eq!(regular + overtime, hours);
        prop_assert!(regular >= Decimal::ZERO);
        prop_assert!(overtime >= Decimal::ZERO);
    }

    #[test]
    fn regular_hours_never_exceed_the_remaining_threshold(
        hours in quarter_hours(),
        before in week_hours(),
    ) {
        let threshold = dec!(40);
        let (regular, overtime) = overtime_split(hours, before, threshold);
        let remaining = (threshold - before).max(Decimal::ZERO);
        prop_assert!(regular <= remaining);
        if before >= threshold {
            prop_assert_eq!(overtime, hours);
        }
    }

    #[test]
    fn overtime_pays_at_least_the_straight_rate(
        hours in quarter_hours(),
        before in week_hours(),
    ) {
        let wage = dec!(20);
        let (regular, overtime) = overtime_split(hours, before, dec!(40));
        let earnings = split_earnings(regular, overtime, wage);
        prop_assert!(earnings >= (hours * wage).round_dp(2));
    }

    #[test]
    fn bill_total_never_discounts_the_subtotal(
        subtotal in money(),
        tip in percent(),
        service in percent(),
    ) {
        prop_assert!(bill_total(subtotal, tip, service) >= subtotal);
    }

    #[test]
    fn attributed_tip_is_symmetric_and_nonnegative(
        subtotal in money(),
        tip in percent(),
        service in percent(),
    ) {
        let forward = attributed_tip(subtotal, tip, service);
        prop_assert_eq!(forward, attributed_tip(subtotal, service, tip));
        prop_assert!(forward >= Decimal::ZERO);
    }

    #[test]
    fn week_bounds_cover_every_date(
        days in 0i64..=3650,
    ) {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
            + chrono::Duration::days(days);
        let (start, end) = week_bounds(date);
        prop_assert!(start <= date && date <= end);
        prop_assert_eq!((end - start).num_days(), 6);
        prop_assert_eq!(start.weekday(), Weekday::Mon);
        prop_assert_eq!(end.weekday(), Weekday::Sun);
    }
}

#[rstest]
#[case(dec!(5), dec!(30), dec!(5), dec!(0))]
#[case(dec!(5), dec!(38), dec!(2), dec!(3))]
#[case(dec!(5), dec!(40), dec!(0), dec!(5))]
#[case(dec!(5), dec!(45), dec!(0), dec!(5))]
fn overtime_split_cases(
    #[case] hours: Decimal,
    #[case] before: Decimal,
    #[case] regular: Decimal,
    #[case] overtime: Decimal,
) {
    assert_eq!(overtime_split(hours, before, dec!(40)), (regular, overtime));
}

#[rstest]
#[case(dec!(100), dec!(15), dec!(5), dec!(120.75))]
#[case(dec!(100), dec!(0), dec!(0), dec!(100))]
#[case(dec!(80), dec!(10), dec!(0), dec!(88))]
fn bill_total_cases(
    #[case] subtotal: Decimal,
    #[case] tip: Decimal,
    #[case] service: Decimal,
    #[case] expected: Decimal,
) {
    assert_eq!(bill_total(subtotal, tip, service), expected);
}
