//! An incremental feature-file parser.
//!
//! The [`Parser`] is fed one complete text line at a time, in file order,
//! from whatever line source the caller has (the parser performs no I/O
//! of its own). Internally it dispatches each line to the header, body or
//! embedded-sequence state machine, accumulating features until the
//! caller transfers them out with [`Parser::take_features`].

pub mod error;

mod v2;
mod v3;

pub use error::Error;
pub use error::ErrorKind;
pub use error::ErrorRecord;
pub use error::Severity;

use std::collections::HashSet;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::core::Version;
use crate::directive;
use crate::directive::Directive;
use crate::feature;
use crate::feature::Block;
use crate::feature::Span;
use crate::header::Event;
use crate::header::Header;
use crate::line::Line;
use crate::multiline::Groups;
use crate::ontology;
use crate::ontology::Category;
use crate::record::Attributes;
use crate::record::Fields;

////////////////////////////////////////////////////////////////////////////////////////
// State
////////////////////////////////////////////////////////////////////////////////////////

/// Which embedded sequence dialect is being collected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SequenceKind {
    /// A `##DNA` block, closed by `##end-DNA`.
    Dna,

    /// A `##FASTA` block, closed by `###` or end of input.
    Fasta,
}

/// Where parsing resumes once a sequence block closes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Resume {
    /// The block opened while the header was being collected.
    Header,

    /// The block opened after body parsing began.
    Body,
}

/// The state of the parser.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// Collecting header lines.
    Header,

    /// Parsing body records.
    Body,

    /// Collecting an embedded sequence block.
    Sequence {
        /// The dialect of the block.
        kind: SequenceKind,

        /// Where parsing resumes once the block closes.
        resume: Resume,
    },

    /// End of input was signalled; nothing more is accepted.
    Done,

    /// The parse halted on a fatal record; nothing more is accepted.
    Failed,
}

////////////////////////////////////////////////////////////////////////////////////////
// Builder
////////////////////////////////////////////////////////////////////////////////////////

/// A builder for a [`Parser`].
#[derive(Clone, Debug)]
pub struct Builder {
    /// The sequence name the parse is bound to, if any.
    sequence: Option<String>,

    /// The coordinate range features are clipped against, if any.
    region: Option<Span>,

    /// The sources to retain; unlisted sources are skipped cheaply.
    sources: Option<HashSet<String>>,

    /// The version assumed when no `##gff-version` directive appears.
    version: Version,

    /// Validate syntax only, building no features.
    parse_only: bool,

    /// Halt on the first error instead of recording and skipping.
    stop_on_error: bool,

    /// Validate the type column against the ontology table.
    so_compliant: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            sequence: None,
            region: None,
            sources: None,
            version: Version::V3,
            parse_only: false,
            stop_on_error: false,
            so_compliant: false,
        }
    }
}

impl Builder {
    /// Binds the parse to a sequence name: `##sequence-region`
    /// directives are checked against it and records on other sequences
    /// are skipped.
    pub fn sequence(mut self, name: impl Into<String>) -> Self {
        self.sequence = Some(name.into());
        self
    }

    /// Restricts the parse to records overlapping a coordinate range.
    /// Overlapping features are kept untrimmed.
    pub fn region(mut self, region: Span) -> Self {
        self.region = Some(region);
        self
    }

    /// Restricts the parse to records from the named sources; records
    /// from other sources are dropped after the cheap column split.
    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = Some(sources.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the version assumed when no `##gff-version` directive
    /// appears before the first body record.
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Validates syntax without building features.
    pub fn parse_only(mut self, parse_only: bool) -> Self {
        self.parse_only = parse_only;
        self
    }

    /// Halts on the first error instead of recording and skipping. This
    /// also makes header collection strict: a body record before the
    /// minimal header is fatal rather than implicitly completing it.
    pub fn stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    /// Validates the type column against the ontology table.
    pub fn so_compliant(mut self, so_compliant: bool) -> Self {
        self.so_compliant = so_compliant;
        self
    }

    /// Consumes `self` to build a [`Parser`].
    pub fn build(self) -> Parser {
        let mut block = Block::new(self.sequence.clone().unwrap_or_default());

        if let Some(region) = self.region {
            block.set_region(region);
        }

        Parser {
            sources: self.sources,
            region: self.region,
            default_version: self.version,
            parse_only: self.parse_only,
            stop_on_error: self.stop_on_error,
            so_compliant: self.so_compliant,
            state: State::Header,
            header: Header::new(self.sequence),
            groups: Groups::new(),
            block,
            version: None,
            dna: String::new(),
            line_number: 0,
            filtered: 0,
            errors: Vec::new(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Parser
////////////////////////////////////////////////////////////////////////////////////////

/// An incremental feature-file parser.
///
/// # Examples
///
/// ```
/// use featurefile::feature::Block;
/// use featurefile::parser::Parser;
///
/// let mut parser = Parser::builder().build();
///
/// parser.parse_line("##gff-version 3")?;
/// parser.parse_line("##sequence-region chr1 1 1000")?;
/// parser.parse_line("chr1\thavana\texon\t10\t20\t.\t+\t.\tID=exon1")?;
/// parser.finish()?;
///
/// let mut block = Block::new("chr1");
/// assert_eq!(parser.take_features(&mut block)?, 1);
/// assert_eq!(block.len(), 1);
///
/// # Ok::<(), featurefile::parser::Error>(())
/// ```
#[derive(Debug)]
pub struct Parser {
    /// The sources to retain, if restricted.
    sources: Option<HashSet<String>>,

    /// The coordinate range features are clipped against, if any.
    region: Option<Span>,

    /// The version assumed when the file declares none.
    default_version: Version,

    /// Validate syntax only, building no features.
    parse_only: bool,

    /// Halt on the first error instead of recording and skipping.
    stop_on_error: bool,

    /// Validate the type column against the ontology table.
    so_compliant: bool,

    /// The state of the parse.
    state: State,

    /// The header being collected, frozen once body parsing begins.
    header: Header,

    /// The multi-line feature registry.
    groups: Groups,

    /// The block features accumulate into until transferred.
    block: Block,

    /// The version in force, resolved when the header freezes.
    version: Option<Version>,

    /// Sequence assembled from embedded DNA or FASTA blocks.
    dna: String,

    /// The number of lines fed so far, counting failed ones.
    line_number: usize,

    /// The number of records dropped by the sequence, source and region
    /// filters.
    filtered: usize,

    /// Every problem recorded so far, in order of occurrence.
    errors: Vec<ErrorRecord>,
}

impl Parser {
    /// Creates a [`Builder`] for a [`Parser`].
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Feeds one complete text line (newline already stripped) to the
    /// parser.
    ///
    /// The line number increments on every call, including failed ones,
    /// so recorded errors always carry accurate positions. Recoverable
    /// problems are recorded and skipped; `Err` is returned exactly when
    /// this line halted the parse (or when the parser had already
    /// terminated, which is a caller bug).
    pub fn parse_line(&mut self, line: &str) -> Result<(), Error> {
        self.line_number += 1;

        match self.state {
            State::Done | State::Failed => Err(Error::Terminated),
            State::Sequence { kind, resume } => self.sequence_line(kind, resume, line),
            State::Header => self.header_line(line),
            State::Body => self.body_line(line),
        }
    }

    /// Signals end of input: closes an open FASTA block, freezes a
    /// minimally complete header, and refuses further lines.
    ///
    /// A `##DNA` block left open is recorded as an error (the closing
    /// `##end-DNA` is part of that dialect), recoverable unless the
    /// parser is configured to halt on errors.
    pub fn finish(&mut self) -> Result<(), Error> {
        match self.state {
            State::Done | State::Failed => Ok(()),
            State::Sequence { kind, .. } => {
                if kind == SequenceKind::Dna {
                    self.recover(Severity::Error, ErrorKind::UnclosedSequenceBlock)?;
                }

                self.flush_dna();
                self.state = State::Done;
                Ok(())
            }
            State::Header => {
                if self.header.is_minimally_complete() {
                    self.finish_header();
                }

                self.state = State::Done;
                Ok(())
            }
            State::Body => {
                self.flush_dna();
                self.state = State::Done;
                Ok(())
            }
        }
    }

    /// Transfers every accumulated feature set into the caller's block,
    /// returning the number of features moved.
    ///
    /// Fails while the header is still being collected, and after a
    /// halted parse. A history of recoverable errors does not prevent
    /// the transfer: everything parsed before and after a skipped line
    /// is kept.
    pub fn take_features(&mut self, target: &mut Block) -> Result<usize, Error> {
        match self.state {
            State::Header
            | State::Sequence {
                resume: Resume::Header,
                ..
            } => return Err(Error::MidHeader),
            State::Failed => {
                let record = self
                    .errors
                    .iter()
                    .rev()
                    .find(|record| record.severity() == Severity::Fatal)
                    .cloned();

                return Err(match record {
                    Some(record) => Error::Halted(record),
                    None => Error::Terminated,
                });
            }
            State::Body | State::Done | State::Sequence { .. } => {}
        }

        self.flush_dna();

        let name = self.block.sequence_name().to_string();
        let region = self.block.region();

        let mut replacement = Block::new(name);
        if let Some(region) = region {
            replacement.set_region(region);
        }

        let block = std::mem::replace(&mut self.block, replacement);
        let count = block.len();

        target.absorb(block);

        // Registered ids refer to features that have just moved out, so
        // the registry must not outlive them.
        self.groups.clear();

        debug!(count, "transferred features");
        Ok(count)
    }

    /// Returns the first problem recorded, if any.
    pub fn error(&self) -> Option<&ErrorRecord> {
        self.errors.first()
    }

    /// Returns every problem recorded so far, in order of occurrence.
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Returns the number of lines fed so far, counting failed ones.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the number of records dropped by the sequence, source and
    /// region filters.
    pub fn filtered(&self) -> usize {
        self.filtered
    }

    /// Returns the version in force: the resolved version once the
    /// header freezes, or the declared version while it is still being
    /// collected.
    pub fn version(&self) -> Option<Version> {
        self.version.or_else(|| self.header.version())
    }

    /// Returns the header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the sequence assembled from embedded DNA or FASTA blocks,
    /// if any was present.
    pub fn sequence(&self) -> Option<&str> {
        if self.dna.is_empty() {
            None
        } else {
            Some(&self.dna)
        }
    }

    /// Returns whether the parser accepts no further input.
    pub fn terminated(&self) -> bool {
        matches!(self.state, State::Done | State::Failed)
    }

    /// Switches halting on the first error on or off mid-parse.
    pub fn set_stop_on_error(&mut self, stop_on_error: bool) {
        self.stop_on_error = stop_on_error;
    }

    /// Switches ontology validation of the type column on or off
    /// mid-parse.
    pub fn set_so_compliance(&mut self, so_compliant: bool) {
        self.so_compliant = so_compliant;
    }

    ////////////////////////////////////////////////////////////////////////////////////
    // Line handling
    ////////////////////////////////////////////////////////////////////////////////////

    /// Handles a line while the header is being collected.
    fn header_line(&mut self, line: &str) -> Result<(), Error> {
        match Line::classify(line) {
            Line::Blank | Line::Comment(_) => {
                trace!("skipping blank or comment line");
                Ok(())
            }
            Line::Directive(raw) => match raw.parse::<Directive>() {
                Ok(parsed) => match self.header.apply(parsed) {
                    Ok(Event::BeginDna) => {
                        self.state = State::Sequence {
                            kind: SequenceKind::Dna,
                            resume: Resume::Header,
                        };
                        Ok(())
                    }
                    Ok(Event::BeginFasta) => {
                        self.state = State::Sequence {
                            kind: SequenceKind::Fasta,
                            resume: Resume::Header,
                        };
                        Ok(())
                    }
                    Ok(Event::EndDna) => {
                        // A close with no open block is odd but harmless.
                        debug!("ignoring ##end-DNA outside a DNA block");
                        Ok(())
                    }
                    Ok(Event::None) => Ok(()),
                    Err(err) => self.recover(Severity::Error, ErrorKind::Header(err)),
                },
                Err(err) => {
                    // Unknown directives are tolerated; malformed known
                    // ones are structural errors.
                    let severity = match &err {
                        directive::ParseError::Unrecognized(_) => Severity::Warning,
                        _ => Severity::Error,
                    };

                    self.recover(severity, ErrorKind::Directive(err))
                }
            },
            Line::Body(_) => {
                if !self.header.is_minimally_complete() {
                    if self.stop_on_error {
                        return Err(self.fail(ErrorKind::BodyBeforeHeader));
                    }

                    debug!("body record before directives; completing header implicitly");
                    self.header.assume_minimal(self.default_version);
                }

                self.finish_header();

                // The record that ended the header is not lost.
                self.body_line(line)
            }
        }
    }

    /// Handles a line once body parsing has begun.
    fn body_line(&mut self, line: &str) -> Result<(), Error> {
        match Line::classify(line) {
            Line::Blank | Line::Comment(_) => {
                trace!("skipping blank or comment line");
                Ok(())
            }
            Line::Directive(raw) => match directive::Kind::detect(raw) {
                Some(directive::Kind::ForwardReferencesResolved) => {
                    // Later records reusing a grouping id start afresh.
                    debug!("forward references resolved; clearing feature groups");
                    self.groups.clear();
                    Ok(())
                }
                Some(directive::Kind::Fasta) => {
                    self.state = State::Sequence {
                        kind: SequenceKind::Fasta,
                        resume: Resume::Body,
                    };
                    Ok(())
                }
                Some(directive::Kind::Dna) => {
                    self.state = State::Sequence {
                        kind: SequenceKind::Dna,
                        resume: Resume::Body,
                    };
                    Ok(())
                }
                Some(_) => self.recover(
                    Severity::Error,
                    ErrorKind::DirectiveAfterHeader(raw.to_string()),
                ),
                None => self.recover(
                    Severity::Warning,
                    ErrorKind::Directive(directive::ParseError::Unrecognized(raw.to_string())),
                ),
            },
            Line::Body(raw) => {
                let version = self.version.unwrap_or(self.default_version);

                let result = match version {
                    Version::V2 => v2::parse(self, raw),
                    Version::V3 => v3::parse(self, raw),
                };

                match result {
                    Ok(()) => Ok(()),
                    Err(kind) => self.recover(Severity::Error, kind),
                }
            }
        }
    }

    /// Handles a line inside an embedded sequence block.
    fn sequence_line(
        &mut self,
        kind: SequenceKind,
        resume: Resume,
        line: &str,
    ) -> Result<(), Error> {
        match Line::classify(line) {
            Line::Blank => Ok(()),
            Line::Comment(_) => {
                trace!("skipping comment inside sequence block");
                Ok(())
            }
            Line::Directive(raw) => match (kind, directive::Kind::detect(raw)) {
                (SequenceKind::Dna, Some(directive::Kind::DnaEnd))
                | (_, Some(directive::Kind::ForwardReferencesResolved)) => {
                    self.close_sequence_block(resume);
                    Ok(())
                }
                // Embedded DNA data lines carry the directive prefix
                // themselves; anything unrecognized in a DNA block is
                // sequence.
                (SequenceKind::Dna, None) => {
                    self.dna.push_str(raw.trim_start_matches('#').trim());
                    Ok(())
                }
                _ => self.recover(
                    Severity::Error,
                    ErrorKind::UnexpectedInSequenceBlock(raw.to_string()),
                ),
            },
            Line::Body(raw) => match kind {
                SequenceKind::Fasta if raw.starts_with('>') => {
                    trace!("skipping FASTA definition line");
                    Ok(())
                }
                SequenceKind::Fasta => {
                    self.dna.push_str(raw.trim());
                    Ok(())
                }
                SequenceKind::Dna => self.recover(
                    Severity::Error,
                    ErrorKind::UnexpectedInSequenceBlock(raw.to_string()),
                ),
            },
        }
    }

    /// Closes the open sequence block and resumes where it opened.
    fn close_sequence_block(&mut self, resume: Resume) {
        self.flush_dna();

        self.state = match resume {
            Resume::Header => State::Header,
            Resume::Body => State::Body,
        };
    }

    /// Freezes the header, resolves the version, and rebinds the
    /// accumulating block to the declared sequence region.
    fn finish_header(&mut self) {
        self.header.finish();

        let version = self.header.version().unwrap_or(self.default_version);
        self.version = Some(version);

        if self.block.sequence_name().is_empty() {
            if let Some(name) = self.header.sequence_name() {
                self.block = Block::new(name);
            }
        }

        if self.block.region().is_none() {
            if let Some(region) = self.region.or_else(|| self.header.region()) {
                self.block.set_region(region);
            }
        }

        debug!(%version, "header complete; parsing body");
        self.state = State::Body;
    }

    /// Stores assembled sequence on the block.
    fn flush_dna(&mut self) {
        if !self.dna.is_empty() {
            self.block.set_dna(self.dna.clone());
        }
    }

    ////////////////////////////////////////////////////////////////////////////////////
    // Error policy
    ////////////////////////////////////////////////////////////////////////////////////

    /// Records a recoverable problem and skips the line, or halts when
    /// the parser is configured to stop on errors.
    fn recover(&mut self, severity: Severity, kind: ErrorKind) -> Result<(), Error> {
        if self.stop_on_error {
            return Err(self.fail(kind));
        }

        let record = ErrorRecord::new(self.line_number, severity, kind);
        warn!(%record, "skipping line");
        self.errors.push(record);

        Ok(())
    }

    /// Records a fatal problem and halts the parse.
    fn fail(&mut self, kind: ErrorKind) -> Error {
        let record = ErrorRecord::new(self.line_number, Severity::Fatal, kind);
        warn!(%record, "parse halted");

        self.errors.push(record.clone());
        self.state = State::Failed;

        Error::Halted(record)
    }

    ////////////////////////////////////////////////////////////////////////////////////
    // Record assembly (shared by both dialects)
    ////////////////////////////////////////////////////////////////////////////////////

    /// Applies the sequence, source and region filters. Filtered records
    /// are dropped here, after the cheap column split and before
    /// attribute parsing or feature construction.
    fn wanted(&mut self, fields: &Fields) -> bool {
        let bound = self.block.sequence_name();
        if !bound.is_empty() && fields.seqid() != bound {
            trace!(seqid = fields.seqid(), "dropping record on other sequence");
            self.filtered += 1;
            return false;
        }

        if let Some(sources) = &self.sources {
            if !sources.contains(fields.source()) {
                trace!(source = fields.source(), "dropping record from unrequested source");
                self.filtered += 1;
                return false;
            }
        }

        if let Some(region) = self.region {
            if !region.overlaps(&fields.span()) {
                trace!(span = %fields.span(), "dropping record outside requested region");
                self.filtered += 1;
                return false;
            }
        }

        true
    }

    /// Merges a record into the feature its grouping key names, or
    /// creates (and registers) a new feature.
    fn assemble(&mut self, fields: &Fields, attributes: &Attributes, version: Version) {
        let category = ontology::category(fields.term());
        let span = fields.span();
        let key = group_key(attributes, category, version).map(str::to_string);

        if let Some(key) = key.as_deref() {
            if self.groups.contains_group(key) {
                let target = self
                    .groups
                    .features(key)
                    .iter()
                    .find(|&id| self.block.find(id).is_some())
                    .cloned();

                if let Some(id) = target {
                    let part = part_for(fields.term(), category, span);

                    if let Some(feature) = self.block.find_mut(&id) {
                        match part {
                            Some(part) => feature.merge_part(part),
                            None => feature.widen(span),
                        }

                        // The record that names the group refines the
                        // placeholder an earlier sub-part created.
                        if category == Category::Transcript {
                            feature.set_term(fields.term());
                        }

                        trace!(group = key, "merged record into feature");
                        return;
                    }
                }
            }
        }

        let name = attributes
            .name()
            .or(key.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}:{}", fields.seqid(), span));

        let kind = match category {
            Category::Transcript | Category::TranscriptPart => {
                feature::Kind::Transcript(feature::Transcript::default())
            }
            Category::Alignment => feature::Kind::Alignment(feature::Alignment::default()),
            Category::Variant | Category::Basic => feature::Kind::Basic,
        };

        let mut feature = feature::Feature::new(
            name,
            fields.source(),
            fields.term(),
            kind,
            span,
            fields.score(),
            fields.strand(),
            fields.phase(),
        );

        if let Some(part) = part_for(fields.term(), category, span) {
            feature.merge_part(part);
        }

        let id = feature.id().clone();
        self.block.insert(feature);

        if let Some(key) = key {
            self.groups.add_group(key.as_str());
            self.groups
                .add_feature(&key, &id)
                .unwrap_or_else(|_| unreachable!("group `{key}` was registered above"));
        }
    }
}

/// The grouping key of a record: sub-parts prefer their parent's id, so
/// they assemble under the feature that spans them; other records prefer
/// their own id.
fn group_key<'a>(
    attributes: &'a Attributes,
    category: Category,
    version: Version,
) -> Option<&'a str> {
    match version {
        Version::V2 => attributes.group_key(Version::V2),
        Version::V3 => match category {
            Category::TranscriptPart | Category::Alignment => {
                attributes.parent().or_else(|| attributes.id())
            }
            _ => attributes.id().or_else(|| attributes.parent()),
        },
    }
}

/// Resolves a type column to a term name for sub-part selection.
fn term_name(type_column: &str) -> &str {
    if ontology::is_accession(type_column) {
        ontology::term(type_column).unwrap_or(type_column)
    } else {
        type_column
    }
}

/// Chooses the sub-part a record contributes to an assembled feature,
/// or [`None`] for records that only widen the feature's span.
fn part_for(type_column: &str, category: Category, span: Span) -> Option<feature::Part> {
    match category {
        Category::TranscriptPart => Some(match term_name(type_column) {
            "intron" => feature::Part::Intron(span),
            "CDS" => feature::Part::CodingRegion(span),
            _ => feature::Part::Exon(span),
        }),
        Category::Alignment => Some(feature::Part::Block(span)),
        _ => None,
    }
}
