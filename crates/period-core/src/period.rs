//! Period type and quarter set definitions.
//!
//! This module defines [`PeriodType`] for the reporting convention of a selection
//! and [`QuarterSet`], a compact set of fiscal quarters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PeriodError;

/// Quarter under which full-year (annual) figures are stored.
pub const ANNUAL_QUARTER: u8 = 4;

/// Reporting convention for fundamental data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Full fiscal year.
    Annual,
    /// A single fiscal quarter.
    Quarterly,
    /// Year to date, through the selected quarter.
    Accumulated,
}

impl PeriodType {
    /// All period types, in menu order.
    pub const ALL: [Self; 3] = [Self::Annual, Self::Quarterly, Self::Accumulated];

    /// Returns the wire name used by the ranking API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
            Self::Accumulated => "accumulated",
        }
    }

    /// Returns the caption shown in period-type menus.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Annual => "年報",
            Self::Quarterly => "季報",
            Self::Accumulated => "累計",
        }
    }

    /// Quarters selectable under this period type in a fully published year.
    ///
    /// Annual has no selectable quarter. Accumulated stops at Q3 because a
    /// Q4 accumulation is the annual figure.
    #[must_use]
    pub const fn base_quarters(&self) -> QuarterSet {
        match self {
            Self::Annual => QuarterSet::EMPTY,
            Self::Quarterly => QuarterSet::ALL,
            Self::Accumulated => QuarterSet::through(3),
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pt| pt.as_str() == s.trim())
            .ok_or_else(|| PeriodError::InvalidPeriodType(s.to_string()))
    }
}

/// A set of fiscal quarters (1-4).
///
/// Iterates in ascending order and serializes as a list of quarter numbers.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QuarterSet(u8);

impl QuarterSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);
    /// Quarters 1 through 4.
    pub const ALL: Self = Self(0b1111);

    /// Returns the set `{1..=last}`; `last` above 4 is capped.
    #[must_use]
    pub const fn through(last: u8) -> Self {
        let last = if last > 4 { 4 } else { last };
        Self(((1u16 << last) - 1) as u8)
    }

    /// Returns the set containing only `quarter`, or the empty set if it is not 1-4.
    #[must_use]
    pub const fn only(quarter: u8) -> Self {
        if quarter >= 1 && quarter <= 4 {
            Self(1 << (quarter - 1))
        } else {
            Self::EMPTY
        }
    }

    /// Returns true if `quarter` is in the set.
    #[must_use]
    pub const fn contains(&self, quarter: u8) -> bool {
        quarter >= 1 && quarter <= 4 && self.0 & (1 << (quarter - 1)) != 0
    }

    /// Returns the intersection of two sets.
    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Returns the smallest quarter in the set.
    #[must_use]
    pub const fn first(&self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as u8 + 1)
        }
    }

    /// Returns the number of quarters in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns an iterator over the quarters in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=4).filter(move |q| self.contains(*q))
    }
}

impl fmt::Debug for QuarterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<u8> for QuarterSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::EMPTY, |set, q| Self(set.0 | Self::only(q).0))
    }
}

impl Serialize for QuarterSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for QuarterSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let quarters = Vec::<u8>::deserialize(deserializer)?;
        if let Some(bad) = quarters.iter().find(|q| !(1..=4).contains(*q)) {
            return Err(serde::de::Error::custom(format!(
                "quarter {bad} outside 1..=4"
            )));
        }
        Ok(quarters.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_quarters() {
        assert!(PeriodType::Annual.base_quarters().is_empty());
        assert_eq!(PeriodType::Quarterly.base_quarters(), QuarterSet::ALL);
        assert_eq!(
            PeriodType::Accumulated.base_quarters().iter().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_quarter_set_bounds() {
        assert_eq!(QuarterSet::through(0), QuarterSet::EMPTY);
        assert_eq!(QuarterSet::through(9), QuarterSet::ALL);
        assert!(QuarterSet::only(0).is_empty());
        assert!(QuarterSet::only(5).is_empty());
        assert!(!QuarterSet::ALL.contains(0));
        assert!(!QuarterSet::ALL.contains(5));
        assert_eq!(QuarterSet::through(3).first(), Some(1));
        assert_eq!(QuarterSet::only(4).first(), Some(4));
        assert_eq!(QuarterSet::EMPTY.first(), None);
    }

    #[test]
    fn test_quarter_set_intersect() {
        let set = QuarterSet::through(3).intersect(QuarterSet::only(1));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_quarter_set_serde() {
        let set: QuarterSet = [3, 1].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,3]");
        let back: QuarterSet = serde_json::from_str("[1,3]").unwrap();
        assert_eq!(back, set);
        assert!(serde_json::from_str::<QuarterSet>("[5]").is_err());
        assert_eq!(format!("{set:?}"), "{1, 3}");
    }

    #[test]
    fn test_period_type_parse() {
        assert_eq!("accumulated".parse::<PeriodType>().unwrap(), PeriodType::Accumulated);
        assert!(matches!(
            "yearly".parse::<PeriodType>(),
            Err(PeriodError::InvalidPeriodType(_))
        ));
    }
}
