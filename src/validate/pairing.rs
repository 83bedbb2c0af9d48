//! Input file format and read-pair naming checks.

/// Format family of a submission's input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Aligned reads (`.bam`, `.sam`); files are independent.
    Alignment,
    /// Paired-end reads (`.fq`, `.fastq`, optionally `.gz`); files come in pairs.
    PairedReads,
}

const ALIGNMENT_SUFFIXES: &[&str] = &[".bam", ".sam"];
const PAIRED_READ_SUFFIXES: &[&str] = &[".fq", ".fastq", ".fq.gz", ".fastq.gz"];

fn has_suffix(name: &str, suffixes: &[&str]) -> bool {
    let lower = name.to_ascii_lowercase();
    suffixes
        .iter()
        .any(|suffix| lower.len() > suffix.len() && lower.ends_with(suffix))
}

/// Classify a single blob name by its extension.
pub fn classify(name: &str) -> Option<InputFormat> {
    if has_suffix(name, ALIGNMENT_SUFFIXES) {
        Some(InputFormat::Alignment)
    } else if has_suffix(name, PAIRED_READ_SUFFIXES) {
        Some(InputFormat::PairedReads)
    } else {
        None
    }
}

/// Determine the common format of a set of blob names.
///
/// Fails when both families are present or when neither is recognized.
pub fn detect_format<'a, I>(names: I) -> Result<InputFormat, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut alignment = false;
    let mut paired = false;
    for name in names {
        match classify(name) {
            Some(InputFormat::Alignment) => alignment = true,
            Some(InputFormat::PairedReads) => paired = true,
            None => {}
        }
    }

    match (alignment, paired) {
        (true, true) => Err("cannot mix both FASTQ and BAM/SAM files in inputs".to_string()),
        (true, false) => Ok(InputFormat::Alignment),
        (false, true) => Ok(InputFormat::PairedReads),
        (false, false) => {
            Err("neither FASTQ nor BAM/SAM files were provided as inputs".to_string())
        }
    }
}

/// Check whether two names differ by at most one character.
///
/// Equal lengths allow one substitution. When lengths differ by one, the
/// longer name skips one character at the first mismatch while the shorter
/// one stays in place.
pub fn differ_in_at_most_one(first: &str, second: &str) -> bool {
    let first: Vec<char> = first.chars().collect();
    let second: Vec<char> = second.chars().collect();

    if first.len().abs_diff(second.len()) > 1 {
        return false;
    }

    let (longer, shorter) = if first.len() > second.len() {
        (first, second)
    } else {
        (second, first)
    };
    let same_length = longer.len() == shorter.len();

    let mut one_found = false;
    let (mut l, mut s) = (0, 0);
    while l < longer.len() && s < shorter.len() {
        if longer[l] == shorter[s] {
            l += 1;
            s += 1;
            continue;
        }
        if one_found {
            return false;
        }
        one_found = true;
        l += 1;
        if same_length {
            s += 1;
        }
    }
    true
}
