//! Externally supplied data-availability configuration.
//!
//! The period rules depend on two facts about the dataset that change over time:
//! the current partial year (the latest fiscal year with only early quarters
//! published) and the range of years each statement type covers. Both are loaded
//! from configuration rather than compiled in, so the cutoff can advance without
//! code changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PeriodError, Result};
use crate::statement::StatementType;

/// Inclusive range of fiscal years with data for a statement type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearBounds {
    /// Earliest year.
    pub min: i32,
    /// Latest year.
    pub max: i32,
}

impl YearBounds {
    /// Creates new year bounds.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Returns true if `year` lies within the bounds.
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Moves `year` to the nearest year within the bounds.
    #[must_use]
    pub const fn clamp(&self, year: i32) -> i32 {
        if year < self.min {
            self.min
        } else if year > self.max {
            self.max
        } else {
            year
        }
    }

    /// Returns the years in descending order, the way year menus list them.
    pub fn years_descending(&self) -> impl Iterator<Item = i32> {
        (self.min..=self.max).rev()
    }
}

/// Data-availability configuration for the period rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodConfig {
    /// Latest fiscal year, for which only early quarters are published.
    pub current_partial_year: i32,
    /// Last quarter published for the current partial year.
    pub latest_published_quarter: u8,
    /// Years covered by cash-flow statements.
    pub cash_flow: YearBounds,
    /// Years covered by income statements.
    pub income_statement: YearBounds,
    /// Years covered by balance sheets.
    pub balance_sheet: YearBounds,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            current_partial_year: 2025,
            latest_published_quarter: 1,
            cash_flow: YearBounds::new(2016, 2025),
            income_statement: YearBounds::new(2015, 2025),
            balance_sheet: YearBounds::new(2015, 2025),
        }
    }
}

impl PeriodConfig {
    /// Parses a configuration from a JSON document and validates it.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PeriodError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PeriodError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Sets the current partial year.
    #[must_use]
    pub const fn with_current_partial_year(mut self, year: i32) -> Self {
        self.current_partial_year = year;
        self
    }

    /// Sets the last published quarter of the current partial year.
    #[must_use]
    pub const fn with_latest_published_quarter(mut self, quarter: u8) -> Self {
        self.latest_published_quarter = quarter;
        self
    }

    /// Sets the year bounds for a statement type.
    #[must_use]
    pub const fn with_bounds(mut self, statement: StatementType, bounds: YearBounds) -> Self {
        match statement {
            StatementType::CashFlow => self.cash_flow = bounds,
            StatementType::IncomeStatement => self.income_statement = bounds,
            StatementType::BalanceSheet => self.balance_sheet = bounds,
        }
        self
    }

    /// Returns the year bounds for a statement type.
    #[must_use]
    pub const fn bounds(&self, statement: StatementType) -> YearBounds {
        match statement {
            StatementType::CashFlow => self.cash_flow,
            StatementType::IncomeStatement => self.income_statement,
            StatementType::BalanceSheet => self.balance_sheet,
        }
    }

    /// Checks that the configuration is internally consistent.
    ///
    /// Every statement's bounds must be ordered and must end at the current
    /// partial year, and the published quarter must be 1-3 (a year with all four
    /// quarters published is no longer partial).
    pub fn validate(&self) -> Result<()> {
        if !(1..=3).contains(&self.latest_published_quarter) {
            return Err(PeriodError::InvalidConfig(format!(
                "latest_published_quarter must be 1..=3, got {}",
                self.latest_published_quarter
            )));
        }
        for statement in StatementType::ALL {
            let bounds = self.bounds(statement);
            if bounds.min > bounds.max {
                return Err(PeriodError::InvalidConfig(format!(
                    "{statement}: min year {} is after max year {}",
                    bounds.min, bounds.max
                )));
            }
            if bounds.max != self.current_partial_year {
                return Err(PeriodError::InvalidConfig(format!(
                    "{statement}: max year {} does not match current partial year {}",
                    bounds.max, self.current_partial_year
                )));
            }
        }
        Ok(())
    }
}
