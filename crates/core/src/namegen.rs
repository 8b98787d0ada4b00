// SPDX-License-Identifier: MIT

//! Name generation for conflicts (spec.md §4.6).
//!
//! Deterministic and total: it never overwrites an existing file. The
//! existence check is injected so the algorithm is unit-testable without
//! touching a real file system; the production caller passes a closure
//! backed by `Path::exists`.

use std::path::{Path, PathBuf};

/// Produce a fresh file name for `base_name` (e.g. `"notes.kml"`),
/// optionally tagging it with `device`, recursing until `exists` reports
/// no collision.
///
/// Algorithm (spec.md §4.6, ordered per §4.7's "a name suffixed by
/// `_<device>_<n>`"):
/// 1. Optionally append `_<device>` (used for initial-collision only).
/// 2. Parse a trailing `_<n>` suffix from the resulting stem. If present,
///    increment `n`; else append `_1`.
/// 3. Reassemble `<newstem>.<ext>`. If the candidate exists, recurse.
pub fn fresh_name(
    base_name: &str,
    device: Option<&str>,
    exists: impl Fn(&str) -> bool,
) -> String {
    let (stem, ext) = split_ext(base_name);
    let tagged_stem = match device {
        Some(device) => format!("{stem}_{device}"),
        None => stem.to_string(),
    };
    let candidate_stem = bump_suffix(&tagged_stem);
    let candidate = reassemble(&candidate_stem, ext);

    if exists(&candidate) {
        // Recurse on the newly-built name (not the original) so repeated
        // collisions keep incrementing instead of looping forever.
        fresh_name(&candidate, None, exists)
    } else {
        candidate
    }
}

/// Same as [`fresh_name`] but operating on a real file-system path: the
/// existence predicate is `Path::exists` against the candidate built in
/// the same parent directory as `base_url`.
pub fn fresh_url(base_url: &Path, device: Option<&str>) -> PathBuf {
    let parent = base_url.parent().unwrap_or_else(|| Path::new(""));
    let base_name = base_url
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let name = fresh_name(base_name, device, |candidate| parent.join(candidate).exists());
    parent.join(name)
}

fn split_ext(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (name, ""),
    }
}

fn reassemble(stem: &str, ext: &str) -> String {
    if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{ext}")
    }
}

/// Increment a trailing `_<n>` suffix, or append `_1` if there is none.
fn bump_suffix(stem: &str) -> String {
    if let Some((prefix, digits)) = stem.rsplit_once('_') {
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = digits.parse::<u64>() {
                return format!("{prefix}_{}", n + 1);
            }
        }
    }
    format!("{stem}_1")
}
