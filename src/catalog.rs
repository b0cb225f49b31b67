//! Selecting labels before they are rendered.
//!
//! The renderer draws whatever it is given. Deciding *which* labels a user
//! may export (their own, still active, matching a search box) happens here,
//! on an in-memory slice, so the CLI and any web layer apply the same rules.

use crate::error::LabelPdfError;
use crate::label::Label;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Filter applied by [`select_labels`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelQuery {
    /// Keep only labels owned by this user. `None` keeps every owner.
    pub owner_id: Option<u64>,
    /// Case-insensitive substring matched against name, code and category.
    pub term: Option<String>,
    /// Keep soft-deleted labels too.
    pub include_inactive: bool,
}

impl LabelQuery {
    pub fn owned_by(owner_id: u64) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn include_inactive(mut self, yes: bool) -> Self {
        self.include_inactive = yes;
        self
    }

    /// Whether `label` passes every filter.
    pub fn matches(&self, label: &Label) -> bool {
        if !self.include_inactive && !label.active {
            return false;
        }
        if let Some(owner) = self.owner_id {
            if label.owner_id != Some(owner) {
                return false;
            }
        }
        match self.term.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let needle = term.to_lowercase();
                let hit = |s: &str| s.to_lowercase().contains(&needle);
                hit(&label.name)
                    || hit(&label.code)
                    || label.category.as_deref().is_some_and(hit)
            }
        }
    }
}

/// Labels from `labels` that pass `query`, in their original order.
pub fn select_labels(labels: &[Label], query: &LabelQuery) -> Vec<Label> {
    let selected: Vec<Label> = labels
        .iter()
        .filter(|l| query.matches(l))
        .cloned()
        .collect();
    debug!("Selected {} of {} labels", selected.len(), labels.len());
    selected
}

/// Sort by name, ignoring case. Stable, so equal names keep their order.
pub fn sort_by_name(labels: &mut [Label]) {
    labels.sort_by(|a, b| compare_names(&a.name, &b.name));
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Look up label `id`, checking ownership when `owner_id` is given.
///
/// A label owned by someone else is reported exactly like a missing one so
/// callers cannot probe for other users' ids.
pub fn find_label<'a>(
    labels: &'a [Label],
    id: u64,
    owner_id: Option<u64>,
) -> Result<&'a Label, LabelPdfError> {
    labels
        .iter()
        .find(|l| l.id == id && owner_id.map_or(true, |o| l.owner_id == Some(o)))
        .ok_or(LabelPdfError::LabelNotFound { id })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Label> {
        let mut retired = Label::new(3, "Old Hammer", "H-OLD").with_owner(7);
        retired.active = false;
        vec![
            Label::new(1, "widget", "W-001")
                .with_category("Tools")
                .with_owner(7),
            Label::new(2, "Bolt", "B-200")
                .with_category("Fasteners")
                .with_owner(7),
            retired,
            Label::new(4, "Anvil", "A-1").with_owner(9),
        ]
    }

    fn ids(labels: &[Label]) -> Vec<u64> {
        labels.iter().map(|l| l.id).collect()
    }

    #[test]
    fn default_query_drops_inactive_only() {
        assert_eq!(ids(&select_labels(&sample(), &LabelQuery::default())), [1, 2, 4]);
    }

    #[test]
    fn owner_filter_excludes_foreign_labels() {
        let picked = select_labels(&sample(), &LabelQuery::owned_by(7));
        assert_eq!(ids(&picked), [1, 2]);
    }

    #[test]
    fn inactive_can_be_included() {
        let query = LabelQuery::owned_by(7).include_inactive(true);
        assert_eq!(ids(&select_labels(&sample(), &query)), [1, 2, 3]);
    }

    #[test]
    fn term_matches_name_code_and_category_case_insensitively() {
        let labels = sample();
        let by = |t: &str| ids(&select_labels(&labels, &LabelQuery::default().with_term(t)));
        assert_eq!(by("WIDGET"), [1]);
        assert_eq!(by("b-2"), [2]);
        assert_eq!(by("fasten"), [2]);
        assert_eq!(by("   "), [1, 2, 4]);
        assert!(by("nothing").is_empty());
    }

    #[test]
    fn sort_ignores_case_and_is_stable() {
        let mut labels = vec![
            Label::new(1, "beta", "1"),
            Label::new(2, "Alpha", "2"),
            Label::new(3, "BETA", "3"),
        ];
        sort_by_name(&mut labels);
        assert_eq!(ids(&labels), [2, 1, 3]);
    }

    #[test]
    fn find_label_checks_ownership() {
        let labels = sample();
        assert_eq!(find_label(&labels, 1, Some(7)).unwrap().code, "W-001");
        assert_eq!(find_label(&labels, 4, None).unwrap().code, "A-1");
        assert!(matches!(
            find_label(&labels, 4, Some(7)),
            Err(LabelPdfError::LabelNotFound { id: 4 })
        ));
        assert!(matches!(
            find_label(&labels, 99, None),
            Err(LabelPdfError::LabelNotFound { id: 99 })
        ));
    }
}
