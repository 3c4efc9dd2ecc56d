//! Sequence Ontology lookups.
//!
//! A fixed, process-wide table mapping SO accessions to term names (and
//! back), loaded once behind [`LazyLock`] and read-only thereafter, so no
//! synchronization is needed between parser instances.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// The accession of the generic `sequence_alteration` term, the fallback
/// for variation types this table does not recognize.
pub const SEQUENCE_ALTERATION: &str = "SO:0001059";

/// Accession/term pairs known to the crate.
///
/// A working subset of the ontology: the feature, transcript, alignment
/// and variation terms that annotation sources actually emit.
static TERMS: &[(&str, &str)] = &[
    ("SO:0000001", "region"),
    ("SO:0000039", "match_part"),
    ("SO:0000102", "expressed_sequence_match"),
    ("SO:0000110", "sequence_feature"),
    ("SO:0000147", "exon"),
    ("SO:0000159", "deletion"),
    ("SO:0000181", "translated_nucleotide_match"),
    ("SO:0000188", "intron"),
    ("SO:0000204", "five_prime_UTR"),
    ("SO:0000205", "three_prime_UTR"),
    ("SO:0000233", "mature_transcript"),
    ("SO:0000234", "mRNA"),
    ("SO:0000252", "rRNA"),
    ("SO:0000253", "tRNA"),
    ("SO:0000274", "snRNA"),
    ("SO:0000275", "snoRNA"),
    ("SO:0000276", "miRNA"),
    ("SO:0000316", "CDS"),
    ("SO:0000336", "pseudogene"),
    ("SO:0000340", "chromosome"),
    ("SO:0000343", "match"),
    ("SO:0000347", "nucleotide_match"),
    ("SO:0000349", "protein_match"),
    ("SO:0000409", "binding_site"),
    ("SO:0000655", "ncRNA"),
    ("SO:0000667", "insertion"),
    ("SO:0000668", "EST_match"),
    ("SO:0000673", "transcript"),
    ("SO:0000689", "cDNA_match"),
    ("SO:0000694", "SNP"),
    ("SO:0000704", "gene"),
    ("SO:0000705", "tandem_repeat"),
    ("SO:0000714", "nucleotide_motif"),
    ("SO:0001019", "copy_number_variation"),
    ("SO:0001059", "sequence_alteration"),
    ("SO:0001483", "SNV"),
    ("SO:0001537", "structural_variant"),
    ("SO:0005836", "regulatory_region"),
    ("SO:1000002", "substitution"),
    ("SO:1000008", "point_mutation"),
    ("SO:1000032", "indel"),
    ("SO:1000035", "duplication"),
    ("SO:1000036", "inversion"),
];

/// Accession-to-term lookup.
static ACCESSION_TO_TERM: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| TERMS.iter().copied().collect());

/// Term-to-accession lookup.
static TERM_TO_ACCESSION: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| TERMS.iter().map(|(acc, term)| (*term, *acc)).collect());

/// The accession syntax: `SO:` followed by exactly seven digits.
static ACCESSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SO:\d{7}$").unwrap());

/// Looks up the term name for an accession.
///
/// # Examples
///
/// ```
/// assert_eq!(featurefile::ontology::term("SO:0000694"), Some("SNP"));
/// assert_eq!(featurefile::ontology::term("SO:9999999"), None);
/// ```
pub fn term(accession: &str) -> Option<&'static str> {
    ACCESSION_TO_TERM.get(accession).copied()
}

/// Looks up the accession for a term name.
///
/// # Examples
///
/// ```
/// assert_eq!(featurefile::ontology::accession("exon"), Some("SO:0000147"));
/// assert_eq!(featurefile::ontology::accession("widget"), None);
/// ```
pub fn accession(term: &str) -> Option<&'static str> {
    TERM_TO_ACCESSION.get(term).copied()
}

/// Returns whether a string is syntactically an SO accession
/// (`SO:` followed by seven digits).
pub fn is_accession(s: &str) -> bool {
    ACCESSION_REGEX.is_match(s)
}

/// Returns whether a string is a term or accession known to the table.
pub fn is_known(s: &str) -> bool {
    if is_accession(s) {
        term(s).is_some()
    } else {
        accession(s).is_some()
    }
}

/// Maps a variation type to its accession.
///
/// Upstream sources frequently emit non-standard variation terms, so an
/// unrecognized type maps to the generic [`SEQUENCE_ALTERATION`] accession
/// rather than failing.
///
/// # Examples
///
/// ```
/// use featurefile::ontology;
///
/// assert_eq!(ontology::alteration_accession("SNP"), "SO:0000694");
/// assert_eq!(ontology::alteration_accession("weird_variant"), "SO:0001059");
/// ```
pub fn alteration_accession(term: &str) -> &'static str {
    match term {
        "SNP" => "SO:0000694",
        "SNV" => "SO:0001483",
        "deletion" => "SO:0000159",
        "insertion" => "SO:0000667",
        "substitution" => "SO:1000002",
        "point_mutation" => "SO:1000008",
        "indel" => "SO:1000032",
        "CNV" | "copy_number_variation" => "SO:0001019",
        "duplication" => "SO:1000035",
        "inversion" => "SO:1000036",
        "structural_variant" => "SO:0001537",
        _ => SEQUENCE_ALTERATION,
    }
}

/// A coarse classification of a feature type, selecting the shape of the
/// feature that a body line produces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Category {
    /// A primary transcript (mRNA, tRNA, ncRNA, ...).
    Transcript,

    /// A component of a transcript (exon, intron, CDS, UTR).
    TranscriptPart,

    /// An alignment of external sequence (the `match` family).
    Alignment,

    /// A sequence alteration.
    Variant,

    /// Anything else.
    Basic,
}

/// Classifies a type-column value (term name or accession).
pub fn category(type_column: &str) -> Category {
    let name = if is_accession(type_column) {
        match term(type_column) {
            Some(name) => name,
            None => return Category::Basic,
        }
    } else {
        type_column
    };

    match name {
        "mRNA" | "transcript" | "mature_transcript" | "ncRNA" | "rRNA" | "tRNA" | "snRNA"
        | "snoRNA" | "miRNA" | "pseudogene" => Category::Transcript,
        "exon" | "intron" | "CDS" | "five_prime_UTR" | "three_prime_UTR" => {
            Category::TranscriptPart
        }
        "match" | "match_part" | "nucleotide_match" | "protein_match" | "cDNA_match"
        | "EST_match" | "expressed_sequence_match" | "translated_nucleotide_match" => {
            Category::Alignment
        }
        "SNP" | "SNV" | "deletion" | "insertion" | "substitution" | "point_mutation" | "indel"
        | "copy_number_variation" | "duplication" | "inversion" | "structural_variant"
        | "sequence_alteration" => Category::Variant,
        _ => Category::Basic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accession_to_term() {
        assert_eq!(term("SO:0000694"), Some("SNP"));
        assert_eq!(term("SO:0000234"), Some("mRNA"));
        assert_eq!(term("SO:0009999"), None);
    }

    #[test]
    fn test_term_to_accession() {
        assert_eq!(accession("SNP"), Some("SO:0000694"));
        assert_eq!(accession("exon"), Some("SO:0000147"));
        assert_eq!(accession("no_such_term"), None);
    }

    #[test]
    fn test_is_accession() {
        assert!(is_accession("SO:0000694"));
        assert!(!is_accession("SO:694"));
        assert!(!is_accession("so:0000694"));
        assert!(!is_accession("SO:00006940"));
        assert!(!is_accession("SNP"));
    }

    #[test]
    fn test_alteration_fallback() {
        assert_eq!(alteration_accession("deletion"), "SO:0000159");
        assert_eq!(alteration_accession("CNV"), "SO:0001019");
        assert_eq!(alteration_accession("something_else"), SEQUENCE_ALTERATION);
    }

    #[test]
    fn test_category() {
        assert_eq!(category("mRNA"), Category::Transcript);
        assert_eq!(category("exon"), Category::TranscriptPart);
        assert_eq!(category("SO:0000147"), Category::TranscriptPart);
        assert_eq!(category("cDNA_match"), Category::Alignment);
        assert_eq!(category("SNP"), Category::Variant);
        assert_eq!(category("misc_feature"), Category::Basic);
        assert_eq!(category("SO:9999999"), Category::Basic);
    }
}
