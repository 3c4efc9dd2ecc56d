//! The header of a feature file.

use tracing::debug;

use crate::core::version;
use crate::core::Version;
use crate::directive::Directive;
use crate::directive::Kind;
use crate::feature::span;
use crate::feature::Span;

/// An error related to applying a directive to the header.
#[derive(Clone, Debug)]
pub enum Error {
    /// The `##gff-version` payload named a version this crate does not
    /// support.
    Version(version::ParseError),

    /// The `##sequence-region` bounds were invalid.
    Region(RegionError),

    /// The `##sequence-region` named a different sequence than the one
    /// the parse was requested for.
    SequenceMismatch {
        /// The requested sequence name.
        expected: String,

        /// The name the directive carried.
        found: String,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Version(err) => write!(f, "{err}"),
            Error::Region(err) => write!(f, "invalid sequence region: {err}"),
            Error::SequenceMismatch { expected, found } => write!(
                f,
                "sequence region mismatch: requested `{expected}`, found `{found}`"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// An error related to the bounds of a `##sequence-region` directive.
#[derive(Clone, Debug)]
pub enum RegionError {
    /// A bound was negative.
    Negative(i64),

    /// The start bound exceeded the end bound.
    Inverted(span::Error),
}

impl std::fmt::Display for RegionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionError::Negative(n) => write!(f, "negative bound ({n})"),
            RegionError::Inverted(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RegionError {}

/// The state of the header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// No header line has been seen yet.
    New,

    /// Directives are being collected, but the minimal set is not yet
    /// present.
    Collecting,

    /// The minimal directive set (version plus sequence region) has been
    /// seen; body lines may begin.
    MinimalComplete,

    /// Body parsing has begun; the header is frozen.
    Done,
}

/// Which directives have been seen so far.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flags {
    /// A `##gff-version` directive has been seen.
    pub version: bool,

    /// A `##sequence-region` directive has been seen.
    pub sequence_region: bool,

    /// A `##DNA` directive has been seen.
    pub dna: bool,

    /// A `##FASTA` directive has been seen.
    pub fasta: bool,
}

/// A side effect of applying a directive that the parser must act on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    /// Nothing beyond the header bookkeeping.
    None,

    /// An embedded DNA block opens on the next line.
    BeginDna,

    /// The embedded DNA block is closed.
    EndDna,

    /// An embedded FASTA block opens on the next line.
    BeginFasta,
}

/// The header of a feature file: the directives seen before the first
/// body record, and the state of their collection.
#[derive(Clone, Debug)]
pub struct Header {
    /// The sequence name the parse was requested for, if any.
    requested_sequence: Option<String>,

    /// The sequence name, once a `##sequence-region` declares it.
    sequence_name: Option<String>,

    /// The feature region, once a `##sequence-region` declares it.
    region: Option<Span>,

    /// The format version, once a `##gff-version` declares it.
    version: Option<Version>,

    /// The state of collection.
    state: State,

    /// Which directives have been seen.
    flags: Flags,

    /// Every directive applied, in order of appearance.
    directives: Vec<Directive>,
}

impl Header {
    /// Creates a new [`Header`], optionally bound to a requested sequence
    /// name that `##sequence-region` directives are checked against.
    pub fn new(requested_sequence: Option<String>) -> Self {
        Header {
            requested_sequence,
            sequence_name: None,
            region: None,
            version: None,
            state: State::New,
            flags: Flags::default(),
            directives: Vec::new(),
        }
    }

    /// Returns the declared sequence name, if any.
    pub fn sequence_name(&self) -> Option<&str> {
        self.sequence_name.as_deref()
    }

    /// Returns the declared feature region, if any.
    pub fn region(&self) -> Option<Span> {
        self.region
    }

    /// Returns the declared format version, if any.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// Returns the state of collection.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns which directives have been seen.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Returns every directive applied so far, in order of appearance.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Returns whether body lines may begin.
    pub fn is_minimally_complete(&self) -> bool {
        matches!(self.state, State::MinimalComplete | State::Done)
    }

    /// Returns whether the header is frozen.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Applies one parsed directive, updating flags and state and
    /// returning the side effect the parser must act on.
    pub fn apply(&mut self, directive: Directive) -> Result<Event, Error> {
        if self.state == State::New {
            self.state = State::Collecting;
        }

        let event = match directive.kind() {
            Kind::GffVersion => {
                // The first occurrence wins; later, conflicting version
                // directives are ignored.
                if self.version.is_none() {
                    let version = Version::from_number(directive.integers()[0])
                        .map_err(Error::Version)?;
                    self.version = Some(version);
                } else {
                    debug!("ignoring repeated ##gff-version directive");
                }

                self.flags.version = true;
                Event::None
            }

            Kind::SequenceRegion => {
                let region = region_from_bounds(
                    directive.integers()[0],
                    directive.integers()[1],
                )
                .map_err(Error::Region)?;

                let name = directive.strings()[0].clone();

                if let Some(requested) = &self.requested_sequence {
                    if requested != &name {
                        return Err(Error::SequenceMismatch {
                            expected: requested.clone(),
                            found: name,
                        });
                    }
                }

                self.sequence_name = Some(name);
                self.region = Some(region);
                self.flags.sequence_region = true;
                Event::None
            }

            Kind::Dna => {
                self.flags.dna = true;
                Event::BeginDna
            }

            Kind::DnaEnd => Event::EndDna,

            Kind::Fasta => {
                self.flags.fasta = true;
                Event::BeginFasta
            }

            _ => Event::None,
        };

        self.directives.push(directive);
        self.refresh_state();

        Ok(event)
    }

    /// Marks the header minimally complete without its mandatory
    /// directives, defaulting the version when none was declared.
    ///
    /// This is the tolerant path for files that open directly with body
    /// records.
    pub fn assume_minimal(&mut self, default_version: Version) {
        if self.version.is_none() {
            self.version = Some(default_version);
        }

        if !matches!(self.state, State::Done) {
            self.state = State::MinimalComplete;
        }
    }

    /// Freezes the header; body parsing begins.
    pub fn finish(&mut self) {
        self.state = State::Done;
    }

    /// Moves to [`State::MinimalComplete`] once the minimal directive set
    /// is present.
    fn refresh_state(&mut self) {
        if self.state == State::Collecting && self.flags.version && self.flags.sequence_region {
            self.state = State::MinimalComplete;
        }
    }
}

/// Builds a [`Span`] from the signed bounds a directive carries.
fn region_from_bounds(start: i64, end: i64) -> Result<Span, RegionError> {
    let start = u64::try_from(start).map_err(|_| RegionError::Negative(start))?;
    let end = u64::try_from(end).map_err(|_| RegionError::Negative(end))?;

    Span::try_new(start, end).map_err(RegionError::Inverted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(s: &str) -> Directive {
        s.parse().unwrap()
    }

    #[test]
    fn test_minimal_completion() -> Result<(), Box<dyn std::error::Error>> {
        let mut header = Header::new(None);
        assert_eq!(header.state(), State::New);

        header.apply(directive("##gff-version 3"))?;
        assert_eq!(header.state(), State::Collecting);
        assert_eq!(header.version(), Some(Version::V3));

        header.apply(directive("##sequence-region chr1 1 1000"))?;
        assert_eq!(header.state(), State::MinimalComplete);
        assert_eq!(header.sequence_name(), Some("chr1"));
        assert_eq!(header.region(), Some(Span::try_new(1, 1000)?));

        header.finish();
        assert!(header.is_done());

        Ok(())
    }

    #[test]
    fn test_first_version_wins() -> Result<(), Box<dyn std::error::Error>> {
        let mut header = Header::new(None);

        header.apply(directive("##gff-version 2"))?;
        header.apply(directive("##gff-version 3"))?;

        assert_eq!(header.version(), Some(Version::V2));

        Ok(())
    }

    #[test]
    fn test_unsupported_version() {
        let mut header = Header::new(None);

        let err = header.apply(directive("##gff-version 4")).unwrap_err();
        assert_eq!(err.to_string(), "unsupported format version: `4`");
    }

    #[test]
    fn test_inverted_region() {
        let mut header = Header::new(None);

        let err = header
            .apply(directive("##sequence-region chr1 1000 1"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid sequence region: inverted span: start (1000) is greater than end (1)"
        );
    }

    #[test]
    fn test_sequence_mismatch() {
        let mut header = Header::new(Some("chr1".to_string()));

        let err = header
            .apply(directive("##sequence-region chr2 1 1000"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "sequence region mismatch: requested `chr1`, found `chr2`"
        );
    }

    #[test]
    fn test_sequence_sub_mode_events() -> Result<(), Box<dyn std::error::Error>> {
        let mut header = Header::new(None);

        assert_eq!(header.apply(directive("##DNA"))?, Event::BeginDna);
        assert_eq!(header.apply(directive("##end-DNA"))?, Event::EndDna);
        assert_eq!(header.apply(directive("##FASTA"))?, Event::BeginFasta);

        let flags = header.flags();
        assert!(flags.dna);
        assert!(flags.fasta);

        Ok(())
    }

    #[test]
    fn test_assume_minimal_defaults_version() {
        let mut header = Header::new(None);
        header.assume_minimal(Version::V3);

        assert!(header.is_minimally_complete());
        assert_eq!(header.version(), Some(Version::V3));
    }
}
