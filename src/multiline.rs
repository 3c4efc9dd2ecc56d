//! Tracking of features declared across multiple lines.
//!
//! A transcript or alignment may arrive as many physical records sharing
//! a grouping id. The registry maps each grouping id to the unique ids of
//! the features assembled under it, so a record whose id was seen before
//! finds its logical feature without rescanning everything parsed so far.

use std::collections::HashMap;

use crate::feature;

/// An error related to the [`Groups`] registry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A feature was added under a grouping id that was never registered.
    ///
    /// Registration is an explicit step ([`Groups::add_group`]); skipping
    /// it is a caller bug, reported rather than silently repaired.
    UnknownGroup(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownGroup(id) => write!(f, "unknown feature group: `{id}`"),
        }
    }
}

impl std::error::Error for Error {}

/// The registry of multi-line feature groups.
///
/// Group sets are kept as order-preserving vectors with set semantics
/// (duplicates are dropped on insert); group sizes are small, so the
/// linear membership scan costs less than hashing would.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Groups {
    /// Grouping id → unique ids of the features assembled under it.
    groups: HashMap<String, Vec<feature::Id>>,

    /// Grouping ids in insertion order.
    order: Vec<String>,
}

impl Groups {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a grouping id, creating its empty feature set.
    ///
    /// Returns `false` if the id was already registered; re-registering
    /// is an idempotence check, not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use featurefile::multiline::Groups;
    ///
    /// let mut groups = Groups::new();
    /// assert!(groups.add_group("mRNA1"));
    /// assert!(!groups.add_group("mRNA1"));
    /// assert_eq!(groups.len(), 1);
    /// ```
    pub fn add_group(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();

        if self.groups.contains_key(&id) {
            return false;
        }

        self.order.push(id.clone());
        self.groups.insert(id, Vec::new());

        true
    }

    /// Returns whether a grouping id is registered.
    pub fn contains_group(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    /// Returns the number of registered grouping ids.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the number of features under a grouping id, or [`None`]
    /// for an unregistered id.
    pub fn group_len(&self, id: &str) -> Option<usize> {
        self.groups.get(id).map(Vec::len)
    }

    /// Adds a feature's unique id under a grouping id.
    ///
    /// Returns `Ok(false)` if the feature was already present. Adding
    /// under an unregistered grouping id is an [`Error::UnknownGroup`]:
    /// the caller must [`add_group`](Groups::add_group) first.
    pub fn add_feature(&mut self, id: &str, feature: &feature::Id) -> Result<bool, Error> {
        let group = self
            .groups
            .get_mut(id)
            .ok_or_else(|| Error::UnknownGroup(id.to_string()))?;

        if group.contains(feature) {
            return Ok(false);
        }

        group.push(feature.clone());
        Ok(true)
    }

    /// Returns whether a feature is present under a grouping id.
    pub fn contains_feature(&self, id: &str, feature: &feature::Id) -> bool {
        self.groups
            .get(id)
            .map(|group| group.contains(feature))
            .unwrap_or(false)
    }

    /// Returns the feature ids under a grouping id, in insertion order.
    pub fn features(&self, id: &str) -> &[feature::Id] {
        self.groups.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Removes a feature from a grouping id's set. Returns whether it
    /// was present.
    pub fn remove_feature(&mut self, id: &str, feature: &feature::Id) -> bool {
        match self.groups.get_mut(id) {
            Some(group) => match group.iter().position(|present| present == feature) {
                Some(index) => {
                    group.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Removes a grouping id and all of its feature associations.
    /// Returns whether the id was registered.
    pub fn remove_group(&mut self, id: &str) -> bool {
        if self.groups.remove(id).is_none() {
            return false;
        }

        self.order.retain(|present| present != id);
        true
    }

    /// Iterates over `(grouping id, feature ids)` pairs in the order the
    /// grouping ids were first registered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[feature::Id])> {
        self.order.iter().filter_map(|id| {
            self.groups
                .get(id)
                .map(|group| (id.as_str(), group.as_slice()))
        })
    }

    /// Drops every group and association.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_id(n: u64) -> feature::Id {
        feature::Id::derive("feature", "test", n, n + 10)
    }

    #[test]
    fn test_add_group_idempotence() {
        let mut groups = Groups::new();

        assert!(groups.add_group("a"));
        assert!(!groups.add_group("a"));
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_add_feature_requires_group() {
        let mut groups = Groups::new();

        let err = groups.add_feature("missing", &feature_id(1)).unwrap_err();
        assert_eq!(err, Error::UnknownGroup("missing".to_string()));
        assert_eq!(err.to_string(), "unknown feature group: `missing`");
    }

    #[test]
    fn test_add_feature_set_semantics() -> Result<(), Box<dyn std::error::Error>> {
        let mut groups = Groups::new();
        groups.add_group("a");

        assert!(groups.add_feature("a", &feature_id(1))?);
        assert!(!groups.add_feature("a", &feature_id(1))?);
        assert!(groups.add_feature("a", &feature_id(2))?);

        assert_eq!(groups.group_len("a"), Some(2));
        assert!(groups.contains_feature("a", &feature_id(1)));

        Ok(())
    }

    #[test]
    fn test_remove() -> Result<(), Box<dyn std::error::Error>> {
        let mut groups = Groups::new();
        groups.add_group("a");
        groups.add_feature("a", &feature_id(1))?;

        assert!(groups.remove_feature("a", &feature_id(1)));
        assert!(!groups.remove_feature("a", &feature_id(1)));

        assert!(groups.remove_group("a"));
        assert!(!groups.remove_group("a"));
        assert!(!groups.contains_group("a"));

        Ok(())
    }

    #[test]
    fn test_iteration_order_is_insertion_order() -> Result<(), Box<dyn std::error::Error>> {
        let mut groups = Groups::new();

        groups.add_group("c");
        groups.add_group("a");
        groups.add_group("b");
        groups.add_feature("a", &feature_id(1))?;

        let ids = groups.iter().map(|(id, _)| id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["c", "a", "b"]);

        Ok(())
    }
}
