//! The version 3 body dialect.
//!
//! Nine mandatory columns; `tag=value,value` attributes with percent
//! escaping; grouping driven by the `ID` and `Parent` tags.

use tracing::trace;

use crate::core::Version;
use crate::ontology;
use crate::record::Attributes;
use crate::record::Fields;

use super::ErrorKind;
use super::Parser;

/// Parses one version 3 body record into the accumulating block.
pub(super) fn parse(parser: &mut Parser, line: &str) -> Result<(), ErrorKind> {
    let fields = Fields::parse(line, Version::V3).map_err(ErrorKind::Fields)?;

    if !parser.wanted(&fields) {
        return Ok(());
    }

    if parser.so_compliant && !ontology::is_known(fields.term()) {
        return Err(ErrorKind::UnknownTerm(fields.term().to_string()));
    }

    if parser.parse_only {
        trace!("record validated in parse-only mode");
        return Ok(());
    }

    let attributes =
        Attributes::parse(fields.attributes(), Version::V3).map_err(ErrorKind::Attributes)?;

    parser.assemble(&fields, &attributes, Version::V3);

    Ok(())
}
