#![forbid(unsafe_code)]

//! Completion planning.
//!
//! Given the partial token under the cursor and the candidates proposed by
//! a [`Completer`](crate::Completer), decide what to insert:
//!
//! - one candidate: the rest of it plus a trailing space;
//! - several: the rest of their longest common prefix, no space, and the
//!   candidates get listed.

use crate::error::Error;

/// What a completion request should do to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion<'c> {
    /// Text to insert at the cursor.
    pub insert: &'c str,
    /// Whether a space follows the insertion (single, unambiguous match).
    pub trailing_space: bool,
    /// Whether the candidate list should be shown.
    pub list: bool,
}

/// Length in bytes of the longest prefix shared by every candidate.
///
/// The result always falls on a `char` boundary of each candidate.
#[must_use]
pub fn common_prefix_len(candidates: &[&str]) -> usize {
    let Some(shortest) = candidates.iter().min_by_key(|c| c.len()) else {
        return 0;
    };
    let shortest = shortest.as_bytes();
    let mut len = shortest.len();
    for candidate in candidates {
        let matching = shortest
            .iter()
            .zip(candidate.as_bytes())
            .take_while(|(a, b)| a == b)
            .count();
        len = len.min(matching);
        if len == 0 {
            return 0;
        }
    }
    // The shared prefix is byte-identical across candidates, so one
    // boundary check covers them all.
    let first = candidates[0];
    while !first.is_char_boundary(len) {
        len -= 1;
    }
    len
}

/// Plan the completion of `prefix` against `candidates`.
///
/// # Errors
///
/// Returns [`Error::Completion`] when there are no candidates.
pub fn plan<'c>(prefix: &str, candidates: &[&'c str]) -> Result<Completion<'c>, Error> {
    match candidates {
        [] => Err(Error::Completion),
        [only] => Ok(Completion {
            insert: only.get(prefix.len()..).unwrap_or(""),
            trailing_space: true,
            list: false,
        }),
        [first, ..] => {
            let common = common_prefix_len(candidates);
            Ok(Completion {
                insert: first.get(prefix.len()..common).unwrap_or(""),
                trailing_space: false,
                list: true,
            })
        }
    }
}
