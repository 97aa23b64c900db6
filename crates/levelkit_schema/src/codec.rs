//! Dot-delimited textual forms of composite values.
//!
//! On the wire, group sets, remap tables, and event/sequence lists are
//! strings such as `1.2.3` or `10.20.11.21`. These functions translate
//! between those strings and the typed collections, rejecting forms that
//! cannot round-trip (duplicate groups, ambiguous or redundant remaps).

use levelkit_foundation::{Error, LkMap, LkSet, LkVec, Result};

fn parse_part(input: &str, part: &str) -> Result<i64> {
    part.parse::<i64>()
        .map_err(|_| Error::malformed(input, format!("{part:?} is not an integer")))
}

fn join<'a>(items: impl Iterator<Item = &'a i64>) -> String {
    items.map(i64::to_string).collect::<Vec<_>>().join(".")
}

/// Parses a group-membership string such as `1.2.3`.
///
/// An empty string is the empty set.
///
/// # Errors
///
/// Returns an error if a part is not an integer or a group repeats.
pub fn parse_group_set(input: &str) -> Result<LkSet<i64>> {
    let mut groups = LkSet::new();
    if input.is_empty() {
        return Ok(groups);
    }
    for part in input.split('.') {
        let group = parse_part(input, part)?;
        if groups.contains(&group) {
            return Err(Error::malformed(
                input,
                format!("group {group} appears more than once"),
            ));
        }
        groups = groups.insert(group);
    }
    Ok(groups)
}

/// Formats a group set in ascending order.
#[must_use]
pub fn format_group_set(groups: &LkSet<i64>) -> String {
    join(groups.iter())
}

/// Parses a remap string of `source.target` pairs such as `1.2.3.4`.
///
/// # Errors
///
/// Returns an error if the string is empty, has an odd number of parts,
/// maps a source to itself, or repeats a source.
pub fn parse_remap(input: &str) -> Result<LkMap<i64, i64>> {
    if input.is_empty() {
        return Err(Error::malformed(input, "remap string is empty"));
    }
    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() % 2 != 0 {
        return Err(Error::malformed(
            input,
            "remap string needs an even number of parts",
        ));
    }

    let mut pairs = LkMap::new();
    for pair in parts.chunks_exact(2) {
        let source = parse_part(input, pair[0])?;
        let target = parse_part(input, pair[1])?;
        if pairs.contains_key(&source) {
            return Err(Error::malformed(
                input,
                format!("source {source} is remapped more than once"),
            ));
        }
        if source == target {
            return Err(Error::malformed(
                input,
                format!("redundant remap {source} -> {target}"),
            ));
        }
        pairs = pairs.insert(source, target);
    }
    Ok(pairs)
}

/// Formats a remap table in ascending source order.
#[must_use]
pub fn format_remap(remap: &LkMap<i64, i64>) -> String {
    remap
        .iter()
        .map(|(source, target)| format!("{source}.{target}"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Parses a plain integer list such as `4.4.1`. Order and repeats are kept.
///
/// # Errors
///
/// Returns an error if a part is not an integer.
pub fn parse_int_list(input: &str) -> Result<LkVec<i64>> {
    if input.is_empty() {
        return Ok(LkVec::new());
    }
    input.split('.').map(|part| parse_part(input, part)).collect()
}

/// Formats an integer list in order.
#[must_use]
pub fn format_int_list<'a>(items: impl IntoIterator<Item = &'a i64>) -> String {
    join(items.into_iter())
}
