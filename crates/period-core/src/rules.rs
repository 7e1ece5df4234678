//! Period legality rules per statement type.
//!
//! The rules live in a single table, [`STATEMENT_RULES`], with one row per
//! statement type. Quarter legality is derived from the row, the period type's
//! base quarter set, and the configured partial-year cutoff.

use serde::{Deserialize, Serialize};

use crate::config::{PeriodConfig, YearBounds};
use crate::error::{PeriodError, Result};
use crate::period::{ANNUAL_QUARTER, PeriodType, QuarterSet};
use crate::statement::StatementType;

/// One row of the rules table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatementRule {
    /// Statement type this row describes.
    pub statement: StatementType,
    /// Period types offered for the statement, in menu order.
    pub period_types: &'static [PeriodType],
    /// Period type used when the proposed one is not offered.
    pub default_period_type: PeriodType,
}

/// Period types offered per statement type.
pub static STATEMENT_RULES: [StatementRule; 3] = [
    StatementRule {
        statement: StatementType::CashFlow,
        period_types: &[PeriodType::Annual, PeriodType::Accumulated],
        default_period_type: PeriodType::Annual,
    },
    StatementRule {
        statement: StatementType::IncomeStatement,
        period_types: &[
            PeriodType::Annual,
            PeriodType::Quarterly,
            PeriodType::Accumulated,
        ],
        default_period_type: PeriodType::Annual,
    },
    StatementRule {
        statement: StatementType::BalanceSheet,
        period_types: &[PeriodType::Quarterly],
        default_period_type: PeriodType::Quarterly,
    },
];

/// A year menu entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearOption {
    /// Fiscal year.
    pub year: i32,
    /// Whether the year can be selected.
    pub enabled: bool,
}

/// The rule engine: the rules table bound to a data-availability configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodRules {
    config: PeriodConfig,
}

impl PeriodRules {
    /// Creates rules from a validated configuration.
    pub fn new(config: PeriodConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the underlying configuration.
    #[must_use]
    pub const fn config(&self) -> &PeriodConfig {
        &self.config
    }

    /// Returns the current partial year.
    #[must_use]
    pub const fn current_partial_year(&self) -> i32 {
        self.config.current_partial_year
    }

    /// Returns the rules-table row for a statement type.
    #[must_use]
    pub fn rule(statement: StatementType) -> &'static StatementRule {
        match statement {
            StatementType::CashFlow => &STATEMENT_RULES[0],
            StatementType::IncomeStatement => &STATEMENT_RULES[1],
            StatementType::BalanceSheet => &STATEMENT_RULES[2],
        }
    }

    /// Returns the period types offered for a statement type.
    #[must_use]
    pub fn legal_period_types(statement: StatementType) -> &'static [PeriodType] {
        Self::rule(statement).period_types
    }

    /// Returns true if `period_type` is offered for `statement`.
    #[must_use]
    pub fn is_period_type_legal(statement: StatementType, period_type: PeriodType) -> bool {
        Self::legal_period_types(statement).contains(&period_type)
    }

    /// Returns the canonical default period type for a statement type.
    #[must_use]
    pub fn default_period_type(statement: StatementType) -> PeriodType {
        Self::rule(statement).default_period_type
    }

    /// Returns the configured year bounds for a statement type.
    #[must_use]
    pub const fn year_bounds(&self, statement: StatementType) -> YearBounds {
        self.config.bounds(statement)
    }

    /// Fails with [`PeriodError::YearOutOfRange`] if `year` is outside the bounds.
    pub fn check_year(&self, statement: StatementType, year: i32) -> Result<()> {
        let bounds = self.year_bounds(statement);
        if bounds.contains(year) {
            Ok(())
        } else {
            Err(PeriodError::YearOutOfRange {
                statement,
                year,
                min: bounds.min,
                max: bounds.max,
            })
        }
    }

    /// Returns the quarters a selection may carry.
    ///
    /// Annual selections always carry quarter 4. An unoffered period type has no
    /// legal quarter.
    #[must_use]
    pub fn legal_quarters(
        &self,
        statement: StatementType,
        period_type: PeriodType,
        year: i32,
    ) -> QuarterSet {
        if !Self::is_period_type_legal(statement, period_type) {
            return QuarterSet::EMPTY;
        }
        match period_type {
            PeriodType::Annual => QuarterSet::only(ANNUAL_QUARTER),
            PeriodType::Quarterly | PeriodType::Accumulated => {
                self.selectable_quarters(statement, period_type, year)
            }
        }
    }

    /// Returns the quarters a user may pick in the quarter menu.
    ///
    /// Empty for annual selections, whose quarter is forced.
    #[must_use]
    pub fn selectable_quarters(
        &self,
        statement: StatementType,
        period_type: PeriodType,
        year: i32,
    ) -> QuarterSet {
        if !Self::is_period_type_legal(statement, period_type) {
            return QuarterSet::EMPTY;
        }
        let base = period_type.base_quarters();
        if year == self.config.current_partial_year {
            base.intersect(QuarterSet::through(self.config.latest_published_quarter))
        } else {
            base
        }
    }

    /// Lists the year menu for a statement and period type, latest year first.
    ///
    /// The current partial year is disabled for annual selections since its
    /// full-year figures are not published yet.
    #[must_use]
    pub fn year_options(
        &self,
        statement: StatementType,
        period_type: PeriodType,
    ) -> Vec<YearOption> {
        let partial = self.config.current_partial_year;
        self.year_bounds(statement)
            .years_descending()
            .map(|year| YearOption {
                year,
                enabled: !(period_type == PeriodType::Annual && year == partial),
            })
            .collect()
    }
}
