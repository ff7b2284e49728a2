//! Locale-aware artist sorting
//!
//! Name orderings are not left to the media index, whose byte-wise keys put
//! accented and non-Latin names in odd places. Instead the loaded list is
//! grouped into section buckets (the letters shown by a fast-scroll index) and
//! sorted with a Unicode collator inside and across buckets.

use crate::error::{LibraryError, Result};
use crate::models::ArtistSummary;
use crate::sort_order::{ArtistSortOrder, SortDirection};
use icu_collator::options::{CaseLevel, CollatorOptions, Strength};
use icu_collator::preferences::CollationNumericOrdering;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use std::cmp::Ordering;

/// Section label for names that do not start with a letter
pub const OTHER_SECTION: &str = "#";

/// Locale-aware list sorting
#[cfg_attr(test, mockall::automock)]
pub trait LocaleSort: Send + Sync {
    /// Reorder `items` for `order`.
    ///
    /// Must be stable and must return every input item exactly once.
    fn localize_sort(
        &self,
        items: Vec<ArtistSummary>,
        order: ArtistSortOrder,
    ) -> Result<Vec<ArtistSummary>>;
}

/// [`LocaleSort`] backed by `icu_collator`
///
/// Comparison runs at primary strength, so case and accents only matter when
/// nothing else differs, and digit runs compare numerically when
/// `numeric_ordering` is enabled ("Area 7" before "Area 11").
#[derive(Debug, Clone)]
pub struct IcuLocaleSort {
    numeric_ordering: bool,
}

impl Default for IcuLocaleSort {
    fn default() -> Self {
        Self {
            numeric_ordering: true,
        }
    }
}

impl IcuLocaleSort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_numeric_ordering(mut self, enabled: bool) -> Self {
        self.numeric_ordering = enabled;
        self
    }

    fn collator(&self) -> Result<CollatorBorrowed<'static>> {
        let mut preferences = CollatorPreferences::default();
        if self.numeric_ordering {
            preferences.numeric_ordering = Some(CollationNumericOrdering::True);
        }

        let mut options = CollatorOptions::default();
        options.strength = Some(Strength::Primary);
        options.case_level = Some(CaseLevel::Off);

        Collator::try_new(preferences, options)
            .map_err(|e| LibraryError::Collation(format!("Failed to load collator: {}", e)))
    }

    /// Section header a name is listed under
    pub fn section_label(&self, name: &str) -> Result<String> {
        let collator = self.collator()?;
        Ok(section_label_with(&collator, name))
    }
}

impl LocaleSort for IcuLocaleSort {
    fn localize_sort(
        &self,
        items: Vec<ArtistSummary>,
        order: ArtistSortOrder,
    ) -> Result<Vec<ArtistSummary>> {
        let collator = self.collator()?;

        let mut labelled: Vec<(String, ArtistSummary)> = items
            .into_iter()
            .map(|item| (section_label_with(&collator, &item.name), item))
            .collect();

        let descending = order.direction() == SortDirection::Descending;

        // sort_by is stable, so equal names keep their input order
        labelled.sort_by(|(label_a, a), (label_b, b)| {
            let ordering = compare_sections(&collator, label_a, label_b)
                .then_with(|| collator.compare(&a.name, &b.name));
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        Ok(labelled.into_iter().map(|(_, item)| item).collect())
    }
}

fn compare_sections(collator: &CollatorBorrowed<'_>, a: &str, b: &str) -> Ordering {
    match (a == OTHER_SECTION, b == OTHER_SECTION) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => collator.compare(a, b),
    }
}

/// Fold the first letter of `name` onto A-Z when the collator treats them as
/// the same base letter ("Émile" lands under "E"). Letters whose uppercase
/// form expands ("ß", "ﬁ") are folded by the first uppercase char. Other
/// scripts keep their own uppercased initial.
fn section_label_with(collator: &CollatorBorrowed<'_>, name: &str) -> String {
    let Some(initial) = name.chars().find(|c| c.is_alphanumeric()) else {
        return OTHER_SECTION.to_string();
    };

    if !initial.is_alphabetic() {
        return OTHER_SECTION.to_string();
    }

    let upper = initial.to_uppercase().next().unwrap_or(initial);

    fold_to_latin(collator, initial)
        .or_else(|| fold_to_latin(collator, upper))
        .unwrap_or(upper)
        .to_string()
}

fn fold_to_latin(collator: &CollatorBorrowed<'_>, c: char) -> Option<char> {
    let mut buf = [0u8; 4];
    let c = c.encode_utf8(&mut buf);

    ('A'..='Z').find(|letter| {
        let mut letter_buf = [0u8; 4];
        collator.compare(c, letter.encode_utf8(&mut letter_buf)) == Ordering::Equal
    })
}
