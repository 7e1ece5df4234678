//! Financial statement types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PeriodError;

/// The financial statement a selection refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    /// Cash-flow statement.
    CashFlow,
    /// Income statement.
    IncomeStatement,
    /// Balance sheet.
    BalanceSheet,
}

impl StatementType {
    /// All statement types, in menu order.
    pub const ALL: [Self; 3] = [Self::CashFlow, Self::IncomeStatement, Self::BalanceSheet];

    /// Returns the wire name used by the ranking API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CashFlow => "cash_flow",
            Self::IncomeStatement => "income_statement",
            Self::BalanceSheet => "balance_sheet",
        }
    }

    /// Returns the caption shown in statement menus.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::CashFlow => "現金流量表",
            Self::IncomeStatement => "損益表",
            Self::BalanceSheet => "資產負債表",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementType {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s.trim())
            .ok_or_else(|| PeriodError::InvalidStatementType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_names() {
        for st in StatementType::ALL {
            assert_eq!(st.as_str().parse::<StatementType>().unwrap(), st);
        }
        assert_eq!(
            " balance_sheet ".parse::<StatementType>().unwrap(),
            StatementType::BalanceSheet
        );
    }

    #[test]
    fn test_parse_unknown_statement() {
        let err = "cash_flows".parse::<StatementType>().unwrap_err();
        assert!(matches!(err, PeriodError::InvalidStatementType(ref s) if s == "cash_flows"));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&StatementType::IncomeStatement).unwrap();
        assert_eq!(json, "\"income_statement\"");
        let back: StatementType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StatementType::IncomeStatement);
    }
}
