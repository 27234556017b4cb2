//! Decoded variant and genotype data model

use std::collections::HashMap;
use std::fmt;

/// Allele sentinel for a missing call.
///
/// Distinct from allele 0 (the reference allele). Valid allele indices are
/// 0..=254; 255 is reserved for this sentinel and never produced by
/// wraparound.
pub const MISSING_ALLELE: u8 = u8::MAX;

/// Genotype information of a single sample at a variant site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genotype {
    /// First allele index
    pub a1: u8,
    /// Second allele index
    pub a2: u8,
    /// True if the allele order corresponds to parental origin
    pub phased: bool,
}

impl Genotype {
    /// Build a genotype, normalizing the phased flag: two identical alleles
    /// are indistinguishable as phased or unphased and are stored phased.
    pub fn new(a1: u8, a2: u8, phased: bool) -> Self {
        Self {
            a1,
            a2,
            phased: phased || a1 == a2,
        }
    }

    /// The missing-call genotype (`.`, `./.` or `.|.`).
    pub fn no_call() -> Self {
        Self {
            a1: MISSING_ALLELE,
            a2: MISSING_ALLELE,
            phased: false,
        }
    }

    /// Check whether this is a missing call.
    pub fn is_missing(&self) -> bool {
        self.a1 == MISSING_ALLELE && self.a2 == MISSING_ALLELE
    }
}

impl Default for Genotype {
    fn default() -> Self {
        Self::no_call()
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.phased { '|' } else { '/' };
        if self.is_missing() {
            write!(f, ".{}.", sep)
        } else {
            write!(f, "{}{}{}", self.a1, sep, self.a2)
        }
    }
}

/// One decoded VCF record line.
#[derive(Debug, Clone)]
pub struct Variant {
    /// Chromosome name
    pub chrom: String,
    /// 0-based position (text POS minus one)
    pub pos: u64,
    /// Identifier (`.` when absent)
    pub id: String,
    /// Reference allele
    pub ref_allele: String,
    /// Alternate alleles in column order, symbolic (`<...>`) entries excluded
    pub alts: Vec<String>,
    /// Phred-scaled quality; `None` when the source is `.` or non-numeric
    pub qual: Option<f32>,
    /// Filter status (`.` when absent, `PASS` or `;`-joined names otherwise)
    pub filter: String,
    /// INFO key/value pairs; presence flags map to an empty value
    pub info: HashMap<String, String>,
    /// Genotypes, pre-sized to the declared sample count and filled
    /// positionally through `gti`
    genotypes: Vec<Genotype>,
    /// Fill counter: how many genotypes have been stored
    gti: usize,
}

impl Variant {
    /// Create an empty variant with its genotype vector pre-sized to the
    /// declared sample count.
    pub fn new(n_samples: usize) -> Self {
        Self {
            chrom: String::new(),
            pos: 0,
            id: String::new(),
            ref_allele: String::new(),
            alts: Vec::new(),
            qual: None,
            filter: String::new(),
            info: HashMap::new(),
            genotypes: vec![Genotype::no_call(); n_samples],
            gti: 0,
        }
    }

    /// Store the next genotype at the current fill position.
    ///
    /// Returns false when the vector is already full.
    pub(crate) fn push_genotype(&mut self, gt: Genotype) -> bool {
        if self.gti >= self.genotypes.len() {
            return false;
        }
        self.genotypes[self.gti] = gt;
        self.gti += 1;
        true
    }

    /// Rewind the fill counter so the genotype vector can be rewritten.
    pub(crate) fn reset_genotypes(&mut self) {
        self.gti = 0;
    }

    /// Drop the genotype section entirely (records without a FORMAT column).
    pub(crate) fn clear_genotypes(&mut self) {
        self.genotypes.clear();
        self.gti = 0;
    }

    /// Number of genotypes stored so far.
    pub(crate) fn filled_genotypes(&self) -> usize {
        self.gti
    }

    /// Decoded genotypes in sample column order.
    pub fn genotypes(&self) -> &[Genotype] {
        &self.genotypes
    }

    /// Genotype of one sample by 0-based column index.
    pub fn genotype(&self, sample: usize) -> Option<&Genotype> {
        self.genotypes.get(sample)
    }

    /// INFO value for a key; presence flags yield an empty string.
    pub fn info_value(&self, key: &str) -> Option<&str> {
        self.info.get(key).map(String::as_str)
    }
}
