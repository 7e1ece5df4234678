//! End-to-end normalization scenarios through the facade crate.

use period::{
    PeriodConfig, PeriodError, PeriodResolver, PeriodType, QuarterSet, Selection, StatementType,
    YearBounds, format_period,
};

fn resolver() -> PeriodResolver {
    PeriodResolver::default()
}

#[test]
fn cash_flow_quarterly_becomes_annual() {
    let resolved = resolver()
        .normalize(StatementType::CashFlow, 2024, Some(PeriodType::Quarterly), Some(2))
        .unwrap();

    assert_eq!(
        resolved.selection,
        Selection::new(StatementType::CashFlow, 2024, PeriodType::Annual, 4)
    );
    assert!(resolved.mask.enabled_quarters().is_empty());
    assert!(!resolved.mask.is_period_type_enabled(PeriodType::Quarterly));
    assert!(resolved.mask.is_period_type_enabled(PeriodType::Accumulated));
}

#[test]
fn partial_year_accumulated_falls_back_to_first_quarter() {
    let resolved = resolver()
        .normalize(
            StatementType::IncomeStatement,
            2025,
            Some(PeriodType::Accumulated),
            Some(3),
        )
        .unwrap();

    assert_eq!(resolved.selection.period_type, PeriodType::Accumulated);
    assert_eq!(resolved.selection.quarter, 1);
    assert_eq!(resolved.mask.enabled_quarters(), QuarterSet::only(1));
}

#[test]
fn balance_sheet_is_always_quarterly() {
    let resolved = resolver()
        .normalize(StatementType::BalanceSheet, 2023, Some(PeriodType::Annual), Some(4))
        .unwrap();

    assert_eq!(resolved.selection.period_type, PeriodType::Quarterly);
    assert_eq!(resolved.selection.quarter, 1);
    assert_eq!(resolved.mask.enabled_quarters(), QuarterSet::ALL);
    assert!(!resolved.mask.is_period_type_enabled(PeriodType::Annual));
    assert!(!resolved.mask.is_period_type_enabled(PeriodType::Accumulated));
}

#[test]
fn legal_selection_is_unchanged() {
    let selection = Selection::new(StatementType::IncomeStatement, 2023, PeriodType::Quarterly, 4);
    let resolved = resolver().normalize_selection(&selection).unwrap();

    assert_eq!(resolved.selection, selection);
    assert!(resolver().is_valid(&selection));
}

#[test]
fn labels() {
    assert_eq!(format_period(PeriodType::Quarterly, Some(4)), "Q4");
    assert_eq!(format_period(PeriodType::Annual, Some(1)), "年報");
    assert_eq!(format_period(PeriodType::Accumulated, Some(2)), "Q2累計");
    assert_eq!(format_period(PeriodType::Quarterly, None), "");
}

#[test]
fn normalizing_twice_is_byte_identical() {
    let resolver = resolver();
    let first = resolver
        .normalize(
            StatementType::IncomeStatement,
            2025,
            Some(PeriodType::Accumulated),
            Some(3),
        )
        .unwrap();
    let second = resolver.normalize_selection(&first.selection).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn raw_input_is_parsed_before_normalizing() {
    let resolved = resolver()
        .normalize_raw("balance_sheet", 2020, Some("annual"), Some(2))
        .unwrap();
    assert_eq!(resolved.selection.period_type, PeriodType::Quarterly);
    assert_eq!(resolved.selection.quarter, 2);

    assert!(matches!(
        resolver().normalize_raw("equity", 2020, None, None),
        Err(PeriodError::InvalidStatementType(_))
    ));
    assert!(matches!(
        resolver().normalize_raw("cash_flow", 2020, Some("monthly"), None),
        Err(PeriodError::InvalidPeriodType(_))
    ));
}

#[test]
fn years_outside_bounds_are_rejected() {
    let err = resolver()
        .normalize(StatementType::CashFlow, 2015, None, None)
        .unwrap_err();
    assert!(matches!(
        err,
        PeriodError::YearOutOfRange {
            statement: StatementType::CashFlow,
            year: 2015,
            ..
        }
    ));
    assert!(err.is_input_error());

    // The same year is available for the income statement.
    assert!(resolver()
        .normalize(StatementType::IncomeStatement, 2015, None, None)
        .is_ok());
}

#[test]
fn custom_config_moves_the_partial_year() {
    let config = PeriodConfig::default()
        .with_current_partial_year(2026)
        .with_latest_published_quarter(2)
        .with_bounds(StatementType::CashFlow, YearBounds::new(2016, 2026))
        .with_bounds(StatementType::IncomeStatement, YearBounds::new(2015, 2026))
        .with_bounds(StatementType::BalanceSheet, YearBounds::new(2015, 2026));
    let resolver = PeriodResolver::from_config(config).unwrap();

    let resolved = resolver
        .normalize(StatementType::IncomeStatement, 2026, Some(PeriodType::Quarterly), Some(4))
        .unwrap();
    assert_eq!(resolved.selection.quarter, 1);
    assert_eq!(resolved.mask.enabled_quarters(), QuarterSet::through(2));

    // 2025 is now a complete year.
    let resolved = resolver
        .normalize(StatementType::IncomeStatement, 2025, Some(PeriodType::Quarterly), Some(4))
        .unwrap();
    assert_eq!(resolved.selection.quarter, 4);
}
