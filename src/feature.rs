//! Features and the aggregate they accumulate into.
//!
//! A [`Feature`] is the logical annotation a body record (or several
//! records sharing a grouping id) describes. Features live in a
//! [`Set`] (one per source), sets live in a [`Block`] (one per sequence
//! region), and blocks live in a [`Context`], the caller-owned aggregate.

pub mod block;
pub mod context;
pub mod set;
pub mod span;

pub use block::Block;
pub use context::Context;
pub use set::Set;
pub use span::Span;

use crate::core::Phase;
use crate::core::Strand;

/// The unique id of a feature, derived from its display name, source and
/// coordinates so that re-encounters of the same logical feature resolve
/// to the same key.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Id(String);

impl Id {
    /// Derives the unique id for a feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use featurefile::feature::Id;
    ///
    /// let id = Id::derive("mRNA1", "havana", 100, 200);
    /// assert_eq!(id.as_str(), "mrna1_havana_100_200");
    /// ```
    pub fn derive(name: &str, source: &str, start: u64, end: u64) -> Self {
        let mut inner = format!("{name}_{source}_{start}_{end}").to_lowercase();

        // Ids are used as single tokens downstream; whitespace inside a
        // display name must not split them.
        inner = inner.replace(char::is_whitespace, "_");

        Id(inner)
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered sub-part contributed to a feature by one body record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Part {
    /// An exon of a transcript.
    Exon(Span),

    /// An intron of a transcript.
    Intron(Span),

    /// A coding region of a transcript.
    CodingRegion(Span),

    /// An aligned block of an alignment.
    Block(Span),
}

impl Part {
    /// Returns the span of the sub-part.
    pub fn span(&self) -> Span {
        match self {
            Part::Exon(span) | Part::Intron(span) | Part::CodingRegion(span) | Part::Block(span) => {
                *span
            }
        }
    }
}

/// The sub-structure of a transcript feature.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Transcript {
    /// Exon spans, ascending by start.
    exons: Vec<Span>,

    /// Intron spans, ascending by start.
    introns: Vec<Span>,

    /// The coding region, widened as records contribute to it.
    coding_region: Option<Span>,
}

impl Transcript {
    /// Returns the exon spans, ascending by start.
    pub fn exons(&self) -> &[Span] {
        &self.exons
    }

    /// Returns the intron spans, ascending by start.
    pub fn introns(&self) -> &[Span] {
        &self.introns
    }

    /// Returns the coding region, if any records declared one.
    pub fn coding_region(&self) -> Option<Span> {
        self.coding_region
    }
}

/// The sub-structure of an alignment feature.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Alignment {
    /// Aligned block spans, ascending by start.
    blocks: Vec<Span>,
}

impl Alignment {
    /// Returns the aligned block spans, ascending by start.
    pub fn blocks(&self) -> &[Span] {
        &self.blocks
    }
}

/// The shape of a feature, chosen from its type classification at
/// creation time.
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    /// A feature with no sub-structure.
    Basic,

    /// A transcript assembled from exon/intron/coding records.
    Transcript(Transcript),

    /// An alignment assembled from match records.
    Alignment(Alignment),
}

/// A logical feature, possibly backed by several physical records.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// The unique id.
    id: Id,

    /// The original display name.
    name: String,

    /// The source (column two) the feature came from.
    source: String,

    /// The ontology term of the feature type.
    term: String,

    /// The shape and sub-structure.
    kind: Kind,

    /// The overall span, widened as sub-parts arrive.
    span: Span,

    /// The score, if the record carried one.
    score: Option<f64>,

    /// The strand.
    strand: Strand,

    /// The coding phase, if the record carried one.
    phase: Option<Phase>,
}

impl Feature {
    /// Creates a new [`Feature`].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        term: impl Into<String>,
        kind: Kind,
        span: Span,
        score: Option<f64>,
        strand: Strand,
        phase: Option<Phase>,
    ) -> Self {
        let name = name.into();
        let source = source.into();
        let id = Id::derive(&name, &source, span.start(), span.end());

        Feature {
            id,
            name,
            source,
            term: term.into(),
            kind,
            span,
            score,
            strand,
            phase,
        }
    }

    /// Returns the unique id.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the ontology term of the feature type.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns the shape and sub-structure.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Returns the overall span.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the score, if any.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Returns the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns the coding phase, if any.
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Replaces the ontology term.
    ///
    /// Used when the record that names the assembled feature (e.g. the
    /// mRNA record of a transcript) arrives after a sub-part record
    /// already created it.
    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    /// Widens the overall span so that it also covers `span`, without
    /// contributing sub-structure.
    ///
    /// Used when the record that names an assembled feature arrives after
    /// sub-parts already established it.
    pub fn widen(&mut self, span: Span) {
        self.span.extend(span);
    }

    /// Merges one sub-part into the feature, keeping sub-part lists in
    /// ascending start order and widening the overall span.
    ///
    /// A sub-part that does not fit the feature's shape (e.g. an exon
    /// arriving for a basic feature) still widens the span; nothing is
    /// lost, it is just not tracked as sub-structure.
    ///
    /// # Examples
    ///
    /// ```
    /// use featurefile::core::Strand;
    /// use featurefile::feature::Feature;
    /// use featurefile::feature::Kind;
    /// use featurefile::feature::Part;
    /// use featurefile::feature::Span;
    /// use featurefile::feature::Transcript;
    ///
    /// let mut feature = Feature::new(
    ///     "mRNA1",
    ///     "havana",
    ///     "mRNA",
    ///     Kind::Transcript(Transcript::default()),
    ///     Span::try_new(100, 200)?,
    ///     None,
    ///     Strand::Forward,
    ///     None,
    /// );
    ///
    /// feature.merge_part(Part::Exon(Span::try_new(150, 250)?));
    /// feature.merge_part(Part::Exon(Span::try_new(100, 120)?));
    ///
    /// assert_eq!(feature.span(), Span::try_new(100, 250)?);
    /// match feature.kind() {
    ///     Kind::Transcript(transcript) => assert_eq!(transcript.exons().len(), 2),
    ///     _ => unreachable!(),
    /// }
    /// # Ok::<(), featurefile::feature::span::Error>(())
    /// ```
    pub fn merge_part(&mut self, part: Part) {
        let span = part.span();

        match (&mut self.kind, part) {
            (Kind::Transcript(transcript), Part::Exon(span)) => {
                span::insert_ordered(&mut transcript.exons, span);
            }
            (Kind::Transcript(transcript), Part::Intron(span)) => {
                span::insert_ordered(&mut transcript.introns, span);
            }
            (Kind::Transcript(transcript), Part::CodingRegion(span)) => {
                match &mut transcript.coding_region {
                    Some(coding_region) => coding_region.extend(span),
                    None => transcript.coding_region = Some(span),
                }
            }
            (Kind::Alignment(alignment), part) => {
                span::insert_ordered(&mut alignment.blocks, part.span());
            }
            _ => {}
        }

        self.span.extend(span);
    }
}
