//! Report identity: the composite key that addresses every
//! status-related request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The kind of report being addressed.
///
/// Daily, payroll, and monthly reports share a `(school, year, month)`
/// path shape. Liquidation reports additionally carry a category code
/// discriminator. Matching on this enum is exhaustive on purpose: adding
/// a report kind must be a compile-time-checked exercise, not a
/// string-keyed branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Daily,
    Payroll,
    Monthly,
    Liquidation,
}

impl ReportKind {
    /// URL path segment for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Daily => "daily",
            ReportKind::Payroll => "payroll",
            ReportKind::Monthly => "monthly",
            ReportKind::Liquidation => "liquidation",
        }
    }

    /// Whether this kind requires a category code in its identity.
    pub fn requires_category(&self) -> bool {
        matches!(self, ReportKind::Liquidation)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(ReportKind::Daily),
            "payroll" => Ok(ReportKind::Payroll),
            "monthly" => Ok(ReportKind::Monthly),
            "liquidation" => Ok(ReportKind::Liquidation),
            other => Err(CoreError::UnknownKind {
                value: other.to_string(),
            }),
        }
    }
}

/// Composite key addressing one report on the Central Server.
///
/// Immutable once the report exists. `category` is meaningful only for
/// [`ReportKind::Liquidation`]; for every other kind it is ignored when
/// building paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportId {
    pub kind: ReportKind,
    pub school_id: u32,
    pub year: i32,
    pub month: u8,
    pub category: Option<String>,
}

impl ReportId {
    pub fn new(kind: ReportKind, school_id: u32, year: i32, month: u8) -> Self {
        ReportId {
            kind,
            school_id,
            year,
            month,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check the local preconditions that must hold before any request
    /// for this identity is built.
    ///
    /// For liquidation reports a missing or empty category short-circuits
    /// with [`CoreError::MissingCategory`] before any network call.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(1..=12).contains(&self.month) {
            return Err(CoreError::InvalidMonth { month: self.month });
        }
        if self.kind.requires_category() {
            match self.category.as_deref() {
                Some(c) if !c.trim().is_empty() => {}
                _ => return Err(CoreError::MissingCategory),
            }
        }
        Ok(())
    }

    /// Build the identity path segments, e.g. `daily/12/2025/6` or
    /// `liquidation/12/2025/6/MOOE`.
    ///
    /// Validates first, so a liquidation identity without a category
    /// never produces a path.
    pub fn path_segments(&self) -> Result<String, CoreError> {
        self.validate()?;
        let base = format!(
            "{}/{}/{}/{}",
            self.kind.as_str(),
            self.school_id,
            self.year,
            self.month
        );
        Ok(match self.kind {
            ReportKind::Daily | ReportKind::Payroll | ReportKind::Monthly => base,
            ReportKind::Liquidation => {
                // validate() guarantees the category is present here
                let category = self.category.as_deref().unwrap_or_default();
                format!("{}/{}", base, category.trim())
            }
        })
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} report, school {}, {}-{:02}",
            self.kind, self.school_id, self.year, self.month
        )?;
        if let Some(category) = &self.category {
            write!(f, ", category {}", category)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_path_has_no_category_segment() {
        let id = ReportId::new(ReportKind::Daily, 12, 2025, 6);
        assert_eq!(id.path_segments().unwrap(), "daily/12/2025/6");
    }

    #[test]
    fn liquidation_path_appends_category() {
        let id = ReportId::new(ReportKind::Liquidation, 7, 2024, 11).with_category("MOOE");
        assert_eq!(id.path_segments().unwrap(), "liquidation/7/2024/11/MOOE");
    }

    #[test]
    fn liquidation_without_category_is_a_local_error() {
        let id = ReportId::new(ReportKind::Liquidation, 7, 2024, 11);
        assert_eq!(id.path_segments().unwrap_err(), CoreError::MissingCategory);
    }

    #[test]
    fn liquidation_with_blank_category_is_a_local_error() {
        let id = ReportId::new(ReportKind::Liquidation, 7, 2024, 11).with_category("  ");
        assert_eq!(id.validate().unwrap_err(), CoreError::MissingCategory);
    }

    #[test]
    fn category_is_ignored_for_non_liquidation_paths() {
        let id = ReportId::new(ReportKind::Payroll, 3, 2025, 1).with_category("MOOE");
        assert_eq!(id.path_segments().unwrap(), "payroll/3/2025/1");
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        let id = ReportId::new(ReportKind::Monthly, 3, 2025, 13);
        assert_eq!(
            id.validate().unwrap_err(),
            CoreError::InvalidMonth { month: 13 }
        );
    }

    #[test]
    fn kind_parses_from_cli_strings() {
        assert_eq!("daily".parse::<ReportKind>().unwrap(), ReportKind::Daily);
        assert_eq!(
            "Liquidation".parse::<ReportKind>().unwrap(),
            ReportKind::Liquidation
        );
        assert!("weekly".parse::<ReportKind>().is_err());
    }
}
