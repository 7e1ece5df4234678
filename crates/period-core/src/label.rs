//! Period labels for tables, rankings and charts.

use std::fmt;

use crate::period::PeriodType;

/// Display label for a (period type, quarter) pair.
///
/// Annual periods read `年報` regardless of quarter, accumulated periods
/// `Q{n}累計`, quarterly periods `Q{n}`. A non-annual period without a quarter
/// renders as an empty string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PeriodLabel {
    period_type: PeriodType,
    quarter: Option<u8>,
}

impl PeriodLabel {
    /// Creates a label.
    #[must_use]
    pub const fn new(period_type: PeriodType, quarter: Option<u8>) -> Self {
        Self {
            period_type,
            quarter,
        }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.period_type, self.quarter) {
            (PeriodType::Annual, _) => f.write_str("年報"),
            (PeriodType::Accumulated, Some(q)) => write!(f, "Q{q}累計"),
            (PeriodType::Quarterly, Some(q)) => write!(f, "Q{q}"),
            (_, None) => Ok(()),
        }
    }
}

/// Formats the label for a period type and optional quarter.
#[must_use]
pub fn format_period(period_type: PeriodType, quarter: Option<u8>) -> String {
    PeriodLabel::new(period_type, quarter).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_ignores_quarter() {
        assert_eq!(format_period(PeriodType::Annual, Some(1)), "年報");
        assert_eq!(format_period(PeriodType::Annual, Some(4)), "年報");
        assert_eq!(format_period(PeriodType::Annual, None), "年報");
    }

    #[test]
    fn test_quarter_labels() {
        assert_eq!(format_period(PeriodType::Accumulated, Some(2)), "Q2累計");
        assert_eq!(format_period(PeriodType::Quarterly, Some(3)), "Q3");
        assert_eq!(format_period(PeriodType::Quarterly, Some(4)), "Q4");
    }

    #[test]
    fn test_missing_quarter_is_empty() {
        assert_eq!(format_period(PeriodType::Quarterly, None), "");
        assert_eq!(format_period(PeriodType::Accumulated, None), "");
    }
}
