use crate::service::Item;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::fmt;

/// Filters that remove items from classification. Excluded items still
/// contribute to the identity index.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPolicy {
    pub exclude_tags: HashSet<String>,
    pub exclude_categories: HashSet<String>,
    /// Allow-list; empty means every category is allowed.
    pub include_categories: HashSet<String>,
    pub min_age: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    Tag(String),
    ExcludedCategory,
    NotIncludedCategory,
    TooRecent,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Tag(tag) => write!(f, "tagged '{}'", tag),
            ExclusionReason::ExcludedCategory => write!(f, "category excluded"),
            ExclusionReason::NotIncludedCategory => write!(f, "category not included"),
            ExclusionReason::TooRecent => write!(f, "below minimum age"),
        }
    }
}

impl ExclusionPolicy {
    pub fn with_min_age_days(mut self, days: u32) -> Self {
        self.min_age = (days > 0).then(|| Duration::days(i64::from(days)));
        self
    }

    /// First matching reason to exclude `item`, checked in order: tags,
    /// excluded categories, the include allow-list, then minimum age.
    pub fn exclusion_reason(&self, item: &Item, now: DateTime<Utc>) -> Option<ExclusionReason> {
        if let Some(tag) = item.tags.iter().find(|t| self.exclude_tags.contains(*t)) {
            return Some(ExclusionReason::Tag(tag.clone()));
        }

        if !self.exclude_categories.is_empty() && self.exclude_categories.contains(&item.category) {
            return Some(ExclusionReason::ExcludedCategory);
        }

        if !self.include_categories.is_empty()
            && !self.include_categories.contains(&item.category)
        {
            return Some(ExclusionReason::NotIncludedCategory);
        }

        if let Some(min_age) = self.min_age {
            if now - item.added_at < min_age {
                return Some(ExclusionReason::TooRecent);
            }
        }

        None
    }

    pub fn is_excluded(&self, item: &Item, now: DateTime<Utc>) -> bool {
        self.exclusion_reason(item, now).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn item(tags: &[&str], category: &str, age_days: i64, now: DateTime<Utc>) -> Item {
        Item {
            hash: "h".to_string(),
            name: "n".to_string(),
            save_path: PathBuf::from("/data"),
            size: 0,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: category.to_string(),
            added_at: now - Duration::days(age_days),
        }
    }

    fn set(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_policy_excludes_nothing() {
        let now = Utc::now();
        let policy = ExclusionPolicy::default();
        assert!(!policy.is_excluded(&item(&["x"], "movies", 0, now), now));
    }

    #[test]
    fn test_exclude_by_tag() {
        let now = Utc::now();
        let policy = ExclusionPolicy {
            exclude_tags: set(&["pinned", "keep"]),
            ..Default::default()
        };
        assert_eq!(
            policy.exclusion_reason(&item(&["seed", "pinned"], "", 30, now), now),
            Some(ExclusionReason::Tag("pinned".to_string()))
        );
        assert!(!policy.is_excluded(&item(&["seed"], "", 30, now), now));
    }

    #[test]
    fn test_exclude_and_include_categories() {
        let now = Utc::now();
        let policy = ExclusionPolicy {
            exclude_categories: set(&["music"]),
            include_categories: set(&["movies", "music"]),
            ..Default::default()
        };
        assert_eq!(
            policy.exclusion_reason(&item(&[], "music", 30, now), now),
            Some(ExclusionReason::ExcludedCategory)
        );
        assert_eq!(
            policy.exclusion_reason(&item(&[], "tv", 30, now), now),
            Some(ExclusionReason::NotIncludedCategory)
        );
        assert_eq!(policy.exclusion_reason(&item(&[], "movies", 30, now), now), None);
    }

    #[test]
    fn test_include_allow_list_rejects_uncategorized() {
        let now = Utc::now();
        let policy = ExclusionPolicy {
            include_categories: set(&["movies"]),
            ..Default::default()
        };
        assert!(policy.is_excluded(&item(&[], "", 30, now), now));
    }

    #[test]
    fn test_min_age() {
        let now = Utc::now();
        let policy = ExclusionPolicy::default().with_min_age_days(7);
        assert_eq!(
            policy.exclusion_reason(&item(&[], "", 3, now), now),
            Some(ExclusionReason::TooRecent)
        );
        assert!(!policy.is_excluded(&item(&[], "", 8, now), now));

        let disabled = ExclusionPolicy::default().with_min_age_days(0);
        assert!(disabled.min_age.is_none());
    }

    #[test]
    fn test_tag_checked_before_category() {
        let now = Utc::now();
        let policy = ExclusionPolicy {
            exclude_tags: set(&["keep"]),
            exclude_categories: set(&["tv"]),
            ..Default::default()
        };
        assert_eq!(
            policy.exclusion_reason(&item(&["keep"], "tv", 30, now), now),
            Some(ExclusionReason::Tag("keep".to_string()))
        );
    }
}
