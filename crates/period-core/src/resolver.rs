//! Selection normalization.
//!
//! [`PeriodResolver::normalize`] turns any proposed (statement, year, period type,
//! quarter) combination into a valid [`Selection`] plus the [`EnablementMask`]
//! the period and quarter menus should show. Malformed input (an unknown
//! statement or period name, an out-of-range year) is rejected; an illegal
//! combination of well-formed values is repaired.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PeriodConfig;
use crate::error::Result;
use crate::label::PeriodLabel;
use crate::period::{ANNUAL_QUARTER, PeriodType, QuarterSet};
use crate::rules::PeriodRules;
use crate::statement::StatementType;

/// A complete statement-period selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// Statement type.
    pub statement_type: StatementType,
    /// Fiscal year.
    pub year: i32,
    /// Reporting convention.
    pub period_type: PeriodType,
    /// Fiscal quarter (4 for annual selections).
    pub quarter: u8,
}

impl Selection {
    /// Creates a selection without validating it.
    #[must_use]
    pub const fn new(
        statement_type: StatementType,
        year: i32,
        period_type: PeriodType,
        quarter: u8,
    ) -> Self {
        Self {
            statement_type,
            year,
            period_type,
            quarter,
        }
    }

    /// Returns the display label of the selection's period.
    #[must_use]
    pub const fn period_label(&self) -> PeriodLabel {
        PeriodLabel::new(self.period_type, Some(self.quarter))
    }
}

/// A menu option and whether it can be picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionState<T> {
    /// The option value.
    pub value: T,
    /// Whether the option is selectable.
    pub enabled: bool,
}

/// Selectable period-type and quarter options for a resolved selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnablementMask {
    /// Period-type options in menu order.
    pub period_types: [OptionState<PeriodType>; 3],
    /// Quarter options 1 through 4.
    pub quarters: [OptionState<u8>; 4],
}

impl EnablementMask {
    fn build(statement: StatementType, selectable: QuarterSet) -> Self {
        Self {
            period_types: PeriodType::ALL.map(|pt| OptionState {
                value: pt,
                enabled: PeriodRules::is_period_type_legal(statement, pt),
            }),
            quarters: [1, 2, 3, 4].map(|q| OptionState {
                value: q,
                enabled: selectable.contains(q),
            }),
        }
    }

    /// Returns true if the period-type option is selectable.
    #[must_use]
    pub fn is_period_type_enabled(&self, period_type: PeriodType) -> bool {
        self.period_types
            .iter()
            .any(|opt| opt.value == period_type && opt.enabled)
    }

    /// Returns true if the quarter option is selectable.
    #[must_use]
    pub fn is_quarter_enabled(&self, quarter: u8) -> bool {
        self.quarters
            .iter()
            .any(|opt| opt.value == quarter && opt.enabled)
    }

    /// Returns the selectable quarters as a set.
    #[must_use]
    pub fn enabled_quarters(&self) -> QuarterSet {
        self.quarters
            .iter()
            .filter(|opt| opt.enabled)
            .map(|opt| opt.value)
            .collect()
    }
}

/// The output of normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolved {
    /// The normalized, valid selection.
    pub selection: Selection,
    /// Menu enablement for the selection.
    pub mask: EnablementMask,
}

/// Normalizes proposed selections against the period rules.
///
/// The resolver is stateless; all inputs are explicit and every call computes
/// a fresh result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodResolver {
    rules: PeriodRules,
}

impl PeriodResolver {
    /// Creates a resolver over the given rules.
    #[must_use]
    pub const fn new(rules: PeriodRules) -> Self {
        Self { rules }
    }

    /// Creates a resolver from a configuration, validating it first.
    pub fn from_config(config: PeriodConfig) -> Result<Self> {
        Ok(Self::new(PeriodRules::new(config)?))
    }

    /// Returns the rules this resolver applies.
    #[must_use]
    pub const fn rules(&self) -> &PeriodRules {
        &self.rules
    }

    /// Normalizes a proposed selection.
    ///
    /// A period type the statement does not offer, or none at all, falls back to
    /// the statement's default. Annual selections are forced to quarter 4; any
    /// other missing or illegal quarter becomes the smallest legal quarter.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::YearOutOfRange`](crate::PeriodError::YearOutOfRange)
    /// if `year` is outside the statement's configured bounds.
    pub fn normalize(
        &self,
        statement: StatementType,
        year: i32,
        period_type: Option<PeriodType>,
        quarter: Option<u8>,
    ) -> Result<Resolved> {
        self.rules.check_year(statement, year)?;

        let period_type = match period_type {
            Some(pt) if PeriodRules::is_period_type_legal(statement, pt) => pt,
            proposed => {
                let fallback = PeriodRules::default_period_type(statement);
                debug!(
                    statement = %statement,
                    proposed = ?proposed,
                    fallback = %fallback,
                    "Period type not offered, using default"
                );
                fallback
            }
        };

        let selectable = self.rules.selectable_quarters(statement, period_type, year);
        let quarter = if period_type == PeriodType::Annual {
            ANNUAL_QUARTER
        } else {
            match quarter {
                Some(q) if selectable.contains(q) => q,
                proposed => {
                    // Every non-annual period type has quarter 1 published.
                    let smallest = selectable.first().unwrap_or(1);
                    debug!(
                        statement = %statement,
                        year,
                        period_type = %period_type,
                        proposed = ?proposed,
                        quarter = smallest,
                        "Quarter not selectable, using smallest legal quarter"
                    );
                    smallest
                }
            }
        };

        Ok(Resolved {
            selection: Selection::new(statement, year, period_type, quarter),
            mask: EnablementMask::build(statement, selectable),
        })
    }

    /// Normalizes an existing selection.
    pub fn normalize_selection(&self, selection: &Selection) -> Result<Resolved> {
        self.normalize(
            selection.statement_type,
            selection.year,
            Some(selection.period_type),
            Some(selection.quarter),
        )
    }

    /// Normalizes a selection given by wire names, as received from a UI or URL.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::InvalidStatementType`](crate::PeriodError::InvalidStatementType)
    /// or [`PeriodError::InvalidPeriodType`](crate::PeriodError::InvalidPeriodType)
    /// for unknown names, and `YearOutOfRange` as [`normalize`](Self::normalize).
    pub fn normalize_raw(
        &self,
        statement: &str,
        year: i32,
        period_type: Option<&str>,
        quarter: Option<u8>,
    ) -> Result<Resolved> {
        let statement: StatementType = statement.parse()?;
        let period_type = period_type.map(str::parse::<PeriodType>).transpose()?;
        self.normalize(statement, year, period_type, quarter)
    }

    /// Returns true if the selection is valid as given.
    ///
    /// Out-of-range years are not valid.
    #[must_use]
    pub fn is_valid(&self, selection: &Selection) -> bool {
        self.rules
            .check_year(selection.statement_type, selection.year)
            .is_ok()
            && self
                .rules
                .legal_quarters(selection.statement_type, selection.period_type, selection.year)
                .contains(selection.quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PeriodError;

    fn resolver() -> PeriodResolver {
        PeriodResolver::default()
    }

    fn enabled_quarters(resolved: &Resolved) -> Vec<u8> {
        resolved.mask.enabled_quarters().iter().collect()
    }

    #[test]
    fn test_cash_flow_quarterly_falls_back_to_annual() {
        let resolved = resolver()
            .normalize(StatementType::CashFlow, 2024, Some(PeriodType::Quarterly), Some(2))
            .unwrap();
        assert_eq!(resolved.selection.period_type, PeriodType::Annual);
        assert_eq!(resolved.selection.quarter, 4);
        assert!(enabled_quarters(&resolved).is_empty());
        assert!(!resolved.mask.is_period_type_enabled(PeriodType::Quarterly));
        assert!(resolved.mask.is_period_type_enabled(PeriodType::Accumulated));
    }

    #[test]
    fn test_partial_year_accumulated_resets_to_q1() {
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
        assert_eq!(enabled_quarters(&resolved), vec![1]);
    }

    #[test]
    fn test_balance_sheet_forced_to_quarterly() {
        let resolved = resolver()
            .normalize(StatementType::BalanceSheet, 2023, Some(PeriodType::Annual), Some(4))
            .unwrap();
        assert_eq!(resolved.selection.period_type, PeriodType::Quarterly);
        assert_eq!(resolved.selection.quarter, 1);
        assert_eq!(enabled_quarters(&resolved), vec![1, 2, 3, 4]);
        assert!(!resolved.mask.is_period_type_enabled(PeriodType::Annual));
        assert!(!resolved.mask.is_period_type_enabled(PeriodType::Accumulated));
    }

    #[test]
    fn test_valid_selection_unchanged() {
        let resolved = resolver()
            .normalize(
                StatementType::IncomeStatement,
                2023,
                Some(PeriodType::Quarterly),
                Some(4),
            )
            .unwrap();
        assert_eq!(
            resolved.selection,
            Selection::new(StatementType::IncomeStatement, 2023, PeriodType::Quarterly, 4)
        );
    }

    #[test]
    fn test_missing_inputs_use_defaults() {
        let resolved = resolver()
            .normalize(StatementType::IncomeStatement, 2020, None, None)
            .unwrap();
        assert_eq!(resolved.selection.period_type, PeriodType::Annual);
        assert_eq!(resolved.selection.quarter, 4);

        let resolved = resolver()
            .normalize(StatementType::BalanceSheet, 2020, None, None)
            .unwrap();
        assert_eq!(resolved.selection.period_type, PeriodType::Quarterly);
        assert_eq!(resolved.selection.quarter, 1);
    }

    #[test]
    fn test_out_of_range_quarter_is_repaired() {
        for q in [0, 5, 9] {
            let resolved = resolver()
                .normalize(
                    StatementType::IncomeStatement,
                    2022,
                    Some(PeriodType::Quarterly),
                    Some(q),
                )
                .unwrap();
            assert_eq!(resolved.selection.quarter, 1);
        }
    }

    #[test]
    fn test_accumulated_q4_is_repaired() {
        let resolved = resolver()
            .normalize(StatementType::CashFlow, 2022, Some(PeriodType::Accumulated), Some(4))
            .unwrap();
        assert_eq!(resolved.selection.quarter, 1);
        assert_eq!(enabled_quarters(&resolved), vec![1, 2, 3]);
    }

    #[test]
    fn test_year_out_of_range_is_rejected() {
        let err = resolver()
            .normalize(StatementType::CashFlow, 2015, Some(PeriodType::Annual), None)
            .unwrap_err();
        assert!(matches!(
            err,
            PeriodError::YearOutOfRange { year: 2015, min: 2016, .. }
        ));
        assert!(resolver()
            .normalize(StatementType::IncomeStatement, 2026, None, None)
            .is_err());
    }

    #[test]
    fn test_normalize_raw() {
        let resolved = resolver()
            .normalize_raw("income_statement", 2024, Some("accumulated"), Some(2))
            .unwrap();
        assert_eq!(
            resolved.selection,
            Selection::new(StatementType::IncomeStatement, 2024, PeriodType::Accumulated, 2)
        );

        assert!(matches!(
            resolver().normalize_raw("cashflow", 2024, None, None),
            Err(PeriodError::InvalidStatementType(_))
        ));
        assert!(matches!(
            resolver().normalize_raw("cash_flow", 2024, Some("yearly"), None),
            Err(PeriodError::InvalidPeriodType(_))
        ));
    }

    #[test]
    fn test_normalize_is_idempotent_everywhere() {
        let resolver = resolver();
        for statement in StatementType::ALL {
            let bounds = resolver.rules().year_bounds(statement);
            for year in bounds.min..=bounds.max {
                for period_type in PeriodType::ALL.map(Some).into_iter().chain([None]) {
                    for quarter in [None, Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)] {
                        let first = resolver
                            .normalize(statement, year, period_type, quarter)
                            .unwrap();
                        assert!(resolver.is_valid(&first.selection));
                        assert!(PeriodRules::is_period_type_legal(
                            statement,
                            first.selection.period_type
                        ));
                        let second = resolver.normalize_selection(&first.selection).unwrap();
                        assert_eq!(first, second);
                    }
                }
            }
        }
    }

    #[test]
    fn test_is_valid() {
        let resolver = resolver();
        assert!(resolver.is_valid(&Selection::new(
            StatementType::CashFlow,
            2020,
            PeriodType::Annual,
            4
        )));
        assert!(!resolver.is_valid(&Selection::new(
            StatementType::CashFlow,
            2020,
            PeriodType::Annual,
            2
        )));
        assert!(!resolver.is_valid(&Selection::new(
            StatementType::BalanceSheet,
            2025,
            PeriodType::Quarterly,
            2
        )));
        assert!(!resolver.is_valid(&Selection::new(
            StatementType::CashFlow,
            2010,
            PeriodType::Annual,
            4
        )));
    }
}
