//! A block of features for one sequence region.

use std::collections::HashMap;

use crate::feature::Feature;
use crate::feature::Id;
use crate::feature::Set;
use crate::feature::Span;

/// The features of one sequence region, grouped into [`Set`]s by source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    /// The name of the sequence region.
    sequence_name: String,

    /// The bounds of the region, when declared or requested.
    region: Option<Span>,

    /// Feature sets keyed by source.
    sets: HashMap<String, Set>,

    /// Sources in insertion order.
    order: Vec<String>,

    /// Sequence assembled from an embedded DNA or FASTA block.
    dna: Option<String>,
}

impl Block {
    /// Creates an empty [`Block`] for a sequence region.
    pub fn new(sequence_name: impl Into<String>) -> Self {
        Block {
            sequence_name: sequence_name.into(),
            ..Default::default()
        }
    }

    /// Creates an empty [`Block`] with known region bounds.
    pub fn with_region(sequence_name: impl Into<String>, region: Span) -> Self {
        Block {
            sequence_name: sequence_name.into(),
            region: Some(region),
            ..Default::default()
        }
    }

    /// Returns the name of the sequence region.
    pub fn sequence_name(&self) -> &str {
        &self.sequence_name
    }

    /// Returns the bounds of the region, if known.
    pub fn region(&self) -> Option<Span> {
        self.region
    }

    /// Sets the bounds of the region.
    pub fn set_region(&mut self, region: Span) {
        self.region = Some(region);
    }

    /// Returns the sequence assembled from an embedded DNA or FASTA
    /// block, if one was present.
    pub fn dna(&self) -> Option<&str> {
        self.dna.as_deref()
    }

    /// Stores assembled sequence.
    pub fn set_dna(&mut self, dna: impl Into<String>) {
        self.dna = Some(dna.into());
    }

    /// Gets the feature set of a source.
    pub fn set(&self, source: &str) -> Option<&Set> {
        self.sets.get(source)
    }

    /// Gets the feature set of a source, creating it on first use.
    pub fn set_mut(&mut self, source: &str) -> &mut Set {
        if !self.sets.contains_key(source) {
            self.order.push(source.to_string());
        }

        self.sets
            .entry(source.to_string())
            .or_insert_with(|| Set::new(source))
    }

    /// Inserts a feature into its source's set, returning the previous
    /// feature with the same unique id, if any.
    pub fn insert(&mut self, feature: Feature) -> Option<Feature> {
        let source = feature.source().to_string();
        self.set_mut(&source).insert(feature)
    }

    /// Finds a feature by unique id across all sets.
    pub fn find(&self, id: &Id) -> Option<&Feature> {
        self.sets.values().find_map(|set| set.get(id))
    }

    /// Finds a feature by unique id across all sets, mutably.
    pub fn find_mut(&mut self, id: &Id) -> Option<&mut Feature> {
        self.sets.values_mut().find_map(|set| set.get_mut(id))
    }

    /// Returns the number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Returns the total number of features across all sets.
    pub fn len(&self) -> usize {
        self.sets.values().map(Set::len).sum()
    }

    /// Returns whether the block holds no features.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the feature sets in source insertion order.
    pub fn sets(&self) -> impl Iterator<Item = &Set> {
        self.order.iter().filter_map(|source| self.sets.get(source))
    }

    /// Absorbs every set of another block, merging sets that share a
    /// source; region bounds and assembled sequence transfer when this
    /// block has none of its own.
    pub fn absorb(&mut self, other: Block) {
        let Block {
            region,
            sets,
            order,
            dna,
            ..
        } = other;

        if self.region.is_none() {
            self.region = region;
        }

        if self.dna.is_none() {
            self.dna = dna;
        }

        let mut sets = sets;
        for source in order {
            if let Some(set) = sets.remove(&source) {
                self.set_mut(&source).absorb(set);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Strand;
    use crate::feature::Kind;

    fn feature(name: &str, source: &str, start: u64, end: u64) -> Feature {
        Feature::new(
            name,
            source,
            "region",
            Kind::Basic,
            Span::try_new(start, end).unwrap(),
            None,
            Strand::Unstranded,
            None,
        )
    }

    #[test]
    fn test_sets_created_lazily() {
        let mut block = Block::new("chr1");
        assert_eq!(block.num_sets(), 0);

        block.insert(feature("a", "source_one", 1, 10));
        block.insert(feature("b", "source_two", 5, 15));
        block.insert(feature("c", "source_one", 20, 30));

        assert_eq!(block.num_sets(), 2);
        assert_eq!(block.len(), 3);

        let sources = block.sets().map(Set::source).collect::<Vec<_>>();
        assert_eq!(sources, vec!["source_one", "source_two"]);
    }

    #[test]
    fn test_find_across_sets() {
        let mut block = Block::new("chr1");

        let wanted = feature("a", "source_one", 1, 10);
        let id = wanted.id().clone();
        block.insert(wanted);
        block.insert(feature("b", "source_two", 5, 15));

        assert_eq!(block.find(&id).map(Feature::name), Some("a"));
    }

    #[test]
    fn test_absorb() -> Result<(), Box<dyn std::error::Error>> {
        let mut target = Block::new("chr1");
        target.insert(feature("a", "source_one", 1, 10));

        let mut other = Block::with_region("chr1", Span::try_new(1, 1000)?);
        other.insert(feature("b", "source_one", 20, 30));
        other.insert(feature("c", "source_two", 40, 50));

        target.absorb(other);

        assert_eq!(target.len(), 3);
        assert_eq!(target.num_sets(), 2);
        assert_eq!(target.region(), Some(Span::try_new(1, 1000)?));

        Ok(())
    }
}
