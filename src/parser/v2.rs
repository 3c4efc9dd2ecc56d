//! The version 2 body dialect.
//!
//! Eight mandatory columns with an optional attribute column; `tag value`
//! attributes with double-quoted values; grouping driven by the
//! conventional `Sequence`/`Transcript`/`Gene`/`Class` tags.

use tracing::trace;

use crate::core::Version;
use crate::ontology;
use crate::record::Attributes;
use crate::record::Fields;

use super::ErrorKind;
use super::Parser;

/// Parses one version 2 body record into the accumulating block.
pub(super) fn parse(parser: &mut Parser, line: &str) -> Result<(), ErrorKind> {
    let fields = Fields::parse(line, Version::V2).map_err(ErrorKind::Fields)?;

    if !parser.wanted(&fields) {
        return Ok(());
    }

    // Version 2 type columns predate the ontology, but strict files can
    // still opt in to validation.
    if parser.so_compliant && !ontology::is_known(fields.term()) {
        return Err(ErrorKind::UnknownTerm(fields.term().to_string()));
    }

    if parser.parse_only {
        trace!("record validated in parse-only mode");
        return Ok(());
    }

    let attributes =
        Attributes::parse(fields.attributes(), Version::V2).map_err(ErrorKind::Attributes)?;

    parser.assemble(&fields, &attributes, Version::V2);

    Ok(())
}
