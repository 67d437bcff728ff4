//! Pair selector resolving configured comparison-pair codes
//!
//! A pair code is the concatenation of two registered source codes (e.g.
//! "o2x2"). Resolution tries every split point against the source registry
//! and requires exactly one split where both halves are registered. Order
//! within a pair is significant: the downstream statistics driver treats
//! the left side as the reference and the right side as the candidate.

use tracing::debug;

use crate::app::models::SourcePair;
use crate::app::services::source_registry::SourceRegistry;
use crate::{Error, Result};

/// Resolve one concatenated pair code against the source registry
///
/// Fails with `UnknownSourceCode` when no split yields two registered
/// codes, and with a configuration error when more than one does.
pub fn resolve_pair(registry: &SourceRegistry, pair_code: &str) -> Result<SourcePair> {
    let mut splits = Vec::new();

    for at in 1..pair_code.len() {
        let (left, right) = pair_code.split_at(at);
        if registry.contains_code(left) && registry.contains_code(right) {
            splits.push((left, right));
        }
    }

    match splits.as_slice() {
        [] => Err(Error::unknown_source_code(pair_code)),
        [(left, right)] => {
            let reference = registry.lookup(left)?.code.clone();
            let candidate = registry.lookup(right)?.code.clone();
            debug!(
                "Resolved pair code '{}' as reference '{}', candidate '{}'",
                pair_code, reference, candidate
            );
            Ok(SourcePair::new(reference, candidate))
        }
        _ => Err(Error::configuration(format!(
            "Pair code '{}' is ambiguous: {} registered splits",
            pair_code,
            splits.len()
        ))),
    }
}

/// Resolve every configured pair code, preserving configuration order
///
/// Any unresolvable code aborts the whole resolution, so a bad pair list
/// fails at validation time rather than mid-run.
pub fn resolve_pairs(registry: &SourceRegistry, pair_codes: &[String]) -> Result<Vec<SourcePair>> {
    pair_codes
        .iter()
        .map(|code| resolve_pair(registry, code))
        .collect()
}
