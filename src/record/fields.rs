//! Fixed-column parsing for VCF record lines
//!
//! Splits the 8 leading tab-delimited columns of a record line into a
//! [`Variant`] and hands back the FORMAT+samples remainder untouched for the
//! genotype decoding stage.

use crate::core::RecordError;
use crate::record::variant::Variant;
use memchr::memchr;
use std::collections::HashMap;

/// Number of fixed columns preceding FORMAT
pub const FIXED_FIELDS: usize = 8;

/// Split the 8 fixed fields of `line` into a fresh [`Variant`] and return it
/// together with the remainder slice: the first byte after the 8th tab, or
/// an empty slice for genotype-free records.
///
/// `line` carries no trailing terminator. `line_number` is 1-based and used
/// for error context only.
pub fn parse_fixed_fields<'a>(
    line: &'a [u8],
    n_samples: usize,
    line_number: u64,
) -> Result<(Variant, &'a [u8]), RecordError> {
    let mut fields: [&[u8]; FIXED_FIELDS] = [&[]; FIXED_FIELDS];
    let mut rest = line;
    for (i, field) in fields.iter_mut().enumerate() {
        match memchr(b'\t', rest) {
            Some(tab) => {
                *field = &rest[..tab];
                rest = &rest[tab + 1..];
            }
            // INFO may be the final column of a genotype-free record
            None if i == FIXED_FIELDS - 1 => {
                *field = rest;
                rest = &[];
            }
            None => {
                return Err(RecordError::FieldCount {
                    line: line_number,
                    found: i + 1,
                });
            }
        }
    }

    let pos_text = field_str(fields[1], "POS", line_number)?;
    let pos = pos_text
        .parse::<u64>()
        .ok()
        .and_then(|p| p.checked_sub(1))
        .ok_or_else(|| RecordError::InvalidPosition {
            line: line_number,
            value: pos_text.to_owned(),
        })?;

    let mut variant = Variant::new(n_samples);
    variant.chrom = field_str(fields[0], "CHROM", line_number)?.to_owned();
    variant.pos = pos;
    variant.id = field_str(fields[2], "ID", line_number)?.to_owned();
    variant.ref_allele = field_str(fields[3], "REF", line_number)?.to_owned();
    variant.alts = parse_alts(field_str(fields[4], "ALT", line_number)?);
    variant.qual = parse_qual(field_str(fields[5], "QUAL", line_number)?);
    variant.filter = field_str(fields[6], "FILTER", line_number)?.to_owned();
    variant.info = parse_info(field_str(fields[7], "INFO", line_number)?);

    Ok((variant, rest))
}

fn field_str<'a>(
    field: &'a [u8],
    name: &'static str,
    line: u64,
) -> Result<&'a str, RecordError> {
    std::str::from_utf8(field).map_err(|_| RecordError::InvalidUtf8 { line, field: name })
}

/// Split ALT on commas, dropping symbolic alleles (`<DEL>`, `<DUP>`, ...).
fn parse_alts(alt: &str) -> Vec<String> {
    if alt == "." {
        return Vec::new();
    }
    alt.split(',')
        .filter(|a| !a.starts_with('<'))
        .map(str::to_owned)
        .collect()
}

/// QUAL is numeric or missing; `.`, unparsable text and NaN all map to
/// missing.
fn parse_qual(qual: &str) -> Option<f32> {
    qual.parse::<f32>().ok().filter(|q| !q.is_nan())
}

fn parse_info(info: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    if info != "." {
        for token in info.split(';') {
            match token.split_once('=') {
                Some((key, value)) => {
                    map.insert(key.to_owned(), value.to_owned());
                }
                None => {
                    // Presence flag without a value
                    map.insert(token.to_owned(), String::new());
                }
            }
        }
    }
    map
}
