//! `featurefile` is a crate for parsing GFF2 and GFF3 genome feature
//! files.
//!
//! The crate provides two main points of entry:
//!
//! - An incremental, line-at-a-time [`Parser`] for callers that already
//!   have a line source (a pipe, a socket, an event-loop callback).
//! - A [`Reader`] adapter that drives the parser over any
//!   [`BufRead`](std::io::BufRead).
//!
//! The parser performs no I/O of its own: it is fed one complete text
//! line at a time, in file order, and accumulates typed features until
//! they are transferred out. This makes it embeddable in any loop
//! (blocking file reads, asynchronous pipe callbacks, event-loop ticks)
//! without adaptation. Malformed input never panics: every
//! problem is recorded as a [`parser::ErrorRecord`] with its line
//! number, and (by default) the offending line is skipped while
//! everything else is kept.
//!
//! ## Feeding lines incrementally
//!
//! When lines arrive one at a time, feed them to a [`Parser`] directly.
//! The parser tracks the header (`##` directives) until the first body
//! record, then builds [`Feature`](feature::Feature)s grouped into
//! per-source [`Set`](feature::Set)s within a per-region
//! [`Block`](feature::Block). Records spanning several physical lines
//! (a spliced transcript and its exons, say) are reassembled through
//! their `ID`/`Parent` attributes.
//!
//! ```
//! use featurefile::feature::Block;
//! use featurefile::parser::Parser;
//!
//! let mut parser = Parser::builder().build();
//!
//! parser.parse_line("##gff-version 3")?;
//! parser.parse_line("##sequence-region chr1 1 1000")?;
//! parser.parse_line("chr1\thavana\tmRNA\t100\t500\t.\t+\t.\tID=mRNA1")?;
//! parser.parse_line("chr1\thavana\texon\t100\t200\t.\t+\t.\tParent=mRNA1")?;
//! parser.parse_line("chr1\thavana\texon\t400\t500\t.\t+\t.\tParent=mRNA1")?;
//! parser.finish()?;
//!
//! let mut block = Block::new("chr1");
//! assert_eq!(parser.take_features(&mut block)?, 1);
//!
//! # Ok::<(), featurefile::parser::Error>(())
//! ```
//!
//! ## Reading whole files
//!
//! When the input is an ordinary file (possibly gzip-compressed), use
//! [`reader::open`] and [`Reader::feed`]:
//!
//! ```no_run
//! use featurefile::feature::Block;
//! use featurefile::parser::Parser;
//!
//! let mut reader = featurefile::reader::open("annotations.gff3")?;
//! let mut parser = Parser::builder().sources(["havana"]).build();
//!
//! reader.feed(&mut parser)?;
//!
//! let mut block = Block::new("chr1");
//! parser.take_features(&mut block)?;
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! A parser instance is single-threaded: lines must be fed in file
//! order from one thread at a time. Independent instances share nothing
//! but the read-only ontology table, so files can be parsed in parallel
//! with one parser each.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod core;
pub mod directive;
pub mod escape;
pub mod feature;
pub mod header;
pub mod line;
pub mod multiline;
pub mod ontology;
pub mod parser;
pub mod reader;
pub mod record;

pub use line::Line;

pub use self::parser::Parser;
pub use self::reader::Reader;
