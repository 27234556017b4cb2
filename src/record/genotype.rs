//! Genotype decoding
//!
//! Decodes the FORMAT+samples suffix of a record line into the variant's
//! positional genotype vector. Only the mandatory GT subfield is decoded;
//! any further `:`-delimited subfields are skipped.
//!
//! Each call reads exactly one slot buffer and writes exactly one variant,
//! so a block of calls can run on worker threads without synchronization.

use crate::core::{GenotypeError, GenotypeResult};
use crate::record::variant::{Genotype, Variant, MISSING_ALLELE};
use memchr::{memchr, memchr2};

/// Decode every sample genotype in `suffix` into `variant`.
///
/// `suffix` starts at the FORMAT column and carries no line terminator. The
/// expected sample count is the length the variant's genotype vector was
/// pre-sized to; a token count mismatch in either direction is an error.
pub fn decode_genotypes(suffix: &[u8], variant: &mut Variant) -> GenotypeResult<()> {
    let expected = variant.genotypes().len();
    variant.reset_genotypes();

    // A record may legally stop after INFO; such lines carry no genotypes.
    if suffix.is_empty() {
        variant.clear_genotypes();
        return Ok(());
    }

    let samples = match split_samples(suffix, expected)? {
        Some(samples) => samples,
        None => return Ok(()),
    };

    for token in samples.split(|&b| b == b'\t') {
        let gt = decode_token(token)?;
        if !variant.push_genotype(gt) {
            return Err(GenotypeError::SampleCount {
                expected,
                found: samples.split(|&b| b == b'\t').count(),
            });
        }
    }

    let filled = variant.filled_genotypes();
    if filled != expected {
        return Err(GenotypeError::SampleCount {
            expected,
            found: filled,
        });
    }
    Ok(())
}

/// Locate the start of the per-sample data.
///
/// The VCF format requires GT, when present, to be the first FORMAT
/// subfield. Returns `None` for a FORMAT column with no sample columns.
fn split_samples(suffix: &[u8], expected: usize) -> GenotypeResult<Option<&[u8]>> {
    let gt_first =
        suffix.starts_with(b"GT") && matches!(suffix.get(2), None | Some(&b'\t') | Some(&b':'));
    if !gt_first {
        return Err(GenotypeError::GtNotFirst);
    }
    match memchr(b'\t', suffix) {
        Some(tab) => Ok(Some(&suffix[tab + 1..])),
        None if expected == 0 => Ok(None),
        None => Err(GenotypeError::SampleCount { expected, found: 0 }),
    }
}

/// Decode one sample token into a [`Genotype`].
///
/// The token is truncated at its first `:`; the remaining subfields are not
/// GT and are ignored.
fn decode_token(token: &[u8]) -> GenotypeResult<Genotype> {
    let gt = match memchr(b':', token) {
        Some(colon) => &token[..colon],
        None => token,
    };

    if matches!(gt, b"." | b"./." | b".|.") {
        return Ok(Genotype::no_call());
    }

    match memchr2(b'/', b'|', gt) {
        Some(sep) => {
            let phased = gt[sep] == b'|';
            let a1 = parse_allele(&gt[..sep])?;
            let a2 = parse_allele(&gt[sep + 1..])?;
            Ok(Genotype::new(a1, a2, phased))
        }
        // Haploid call: one allele filling both slots
        None => {
            let a = parse_allele(gt)?;
            Ok(Genotype::new(a, a, true))
        }
    }
}

/// Parse a decimal allele index. 255 is reserved for the missing sentinel.
fn parse_allele(digits: &[u8]) -> GenotypeResult<u8> {
    if digits.is_empty() {
        return Err(invalid_allele(digits));
    }
    let mut value: u64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(invalid_allele(digits));
        }
        value = value * 10 + u64::from(b - b'0');
        if value >= u64::from(MISSING_ALLELE) {
            return Err(GenotypeError::AlleleOverflow { value });
        }
    }
    Ok(value as u8)
}

fn invalid_allele(token: &[u8]) -> GenotypeError {
    GenotypeError::InvalidAllele {
        token: String::from_utf8_lossy(token).into_owned(),
    }
}
