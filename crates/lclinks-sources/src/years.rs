//! Year availability and nearest-year snapping.

/// Which years a source publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearAvailability {
    /// Any requested year is passed through unchanged.
    Any,
    /// Only these years exist.
    Listed(&'static [u16]),
    /// Every year in `start..=end` exists.
    Range {
        /// First published year.
        start: u16,
        /// Last published year.
        end: u16,
    },
}

impl YearAvailability {
    /// Whether `year` is published as is.
    pub fn contains(&self, year: u16) -> bool {
        match self {
            YearAvailability::Any => true,
            YearAvailability::Listed(years) => years.contains(&year),
            YearAvailability::Range { start, end } => (*start..=*end).contains(&year),
        }
    }

    /// Snap a requested year onto the available set.
    ///
    /// For a contiguous range the nearest year is the clamped one.
    pub fn resolve(&self, requested: u16) -> u16 {
        match self {
            YearAvailability::Any => requested,
            YearAvailability::Listed(years) => resolve_year(requested, years),
            YearAvailability::Range { start, end } => requested.clamp(*start, *end),
        }
    }
}

/// Pick the available year closest to `requested`.
///
/// An empty list accepts any year. Ties go to the more recent year, so
/// `2005` against `[2000, 2010]` resolves to `2010`.
pub fn resolve_year(requested: u16, available: &[u16]) -> u16 {
    if available.is_empty() || available.contains(&requested) {
        return requested;
    }

    available
        .iter()
        .copied()
        .min_by_key(|&year| (year.abs_diff(requested), std::cmp::Reverse(year)))
        .unwrap_or(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_prefers_recent_year() {
        assert_eq!(resolve_year(2005, &[2000, 2010]), 2010);
        assert_eq!(resolve_year(2005, &[2010, 2000]), 2010);
    }

    #[test]
    fn test_nearest_year() {
        assert_eq!(resolve_year(2003, &[2000, 2010]), 2000);
        assert_eq!(resolve_year(2030, &[2015, 2019]), 2019);
        assert_eq!(resolve_year(1990, &[2015, 2019]), 2015);
    }

    #[test]
    fn test_member_and_empty_pass_through() {
        assert_eq!(resolve_year(2019, &[2015, 2019]), 2019);
        assert_eq!(resolve_year(1999, &[]), 1999);
    }

    #[test]
    fn test_availability_variants() {
        assert_eq!(YearAvailability::Any.resolve(1901), 1901);
        assert_eq!(YearAvailability::Listed(&[2018]).resolve(2023), 2018);

        let range = YearAvailability::Range { start: 1985, end: 2020 };
        assert_eq!(range.resolve(2022), 2020);
        assert_eq!(range.resolve(1980), 1985);
        assert_eq!(range.resolve(2001), 2001);
        assert!(range.contains(1985));
        assert!(!range.contains(2021));
    }
}
