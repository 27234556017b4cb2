//! VCF record model and per-line parsers
//!
//! The decoded data model ([`Variant`], [`Genotype`]) plus the two line
//! stages: fixed-column splitting and genotype decoding.

pub mod fields;
pub mod genotype;
mod variant;

pub use fields::{parse_fixed_fields, FIXED_FIELDS};
pub use genotype::decode_genotypes;
pub use variant::{Genotype, Variant, MISSING_ALLELE};
