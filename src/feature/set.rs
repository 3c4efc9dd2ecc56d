//! A set of features sharing one source.

use std::collections::HashMap;

use crate::feature::Feature;
use crate::feature::Id;

/// The features of one source, keyed by unique id.
///
/// An order vector is kept beside the map so iteration reproduces
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Set {
    /// The source the features share.
    source: String,

    /// Features keyed by unique id.
    features: HashMap<Id, Feature>,

    /// Unique ids in insertion order.
    order: Vec<Id>,
}

impl Set {
    /// Creates an empty [`Set`] for a source.
    pub fn new(source: impl Into<String>) -> Self {
        Set {
            source: source.into(),
            features: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Returns the source the features share.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Inserts a feature, returning the previous feature with the same
    /// unique id, if any.
    pub fn insert(&mut self, feature: Feature) -> Option<Feature> {
        let id = feature.id().clone();
        let previous = self.features.insert(id.clone(), feature);

        if previous.is_none() {
            self.order.push(id);
        }

        previous
    }

    /// Gets a feature by unique id.
    pub fn get(&self, id: &Id) -> Option<&Feature> {
        self.features.get(id)
    }

    /// Gets a feature by unique id, mutably.
    pub fn get_mut(&mut self, id: &Id) -> Option<&mut Feature> {
        self.features.get_mut(id)
    }

    /// Returns whether a feature with this unique id is present.
    pub fn contains(&self, id: &Id) -> bool {
        self.features.contains_key(id)
    }

    /// Returns the number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns whether the set holds no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates over the features in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.order.iter().filter_map(|id| self.features.get(id))
    }

    /// Absorbs every feature of another set.
    pub fn absorb(&mut self, other: Set) {
        let Set {
            features, order, ..
        } = other;

        let mut features = features;
        for id in order {
            if let Some(feature) = features.remove(&id) {
                self.insert(feature);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Strand;
    use crate::feature::Kind;
    use crate::feature::Span;

    fn feature(name: &str, start: u64, end: u64) -> Feature {
        Feature::new(
            name,
            "test",
            "region",
            Kind::Basic,
            Span::try_new(start, end).unwrap(),
            None,
            Strand::Unstranded,
            None,
        )
    }

    #[test]
    fn test_insert_and_iterate_in_order() {
        let mut set = Set::new("test");

        set.insert(feature("b", 50, 60));
        set.insert(feature("a", 10, 20));
        set.insert(feature("c", 90, 95));

        let names = set.iter().map(Feature::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut set = Set::new("test");

        assert!(set.insert(feature("a", 10, 20)).is_none());
        assert!(set.insert(feature("a", 10, 20)).is_some());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_absorb() {
        let mut target = Set::new("test");
        target.insert(feature("a", 10, 20));

        let mut source = Set::new("test");
        source.insert(feature("b", 30, 40));

        target.absorb(source);

        let names = target.iter().map(Feature::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b"]);
    }
}
