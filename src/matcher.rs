//! Byte-sequence match primitives for the scanner hot loop.
//!
//! Every predicate is total: out-of-range indices and candidates longer
//! than the remaining input simply fail to match. All of them short-circuit
//! on the first byte before touching the rest of the candidate.

use crate::language::OpenClose;

/// Whitespace as the scanner sees it: space, tab, LF, CR.
#[inline]
#[must_use]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// True when `byte` could begin any transition out of the current state.
///
/// This is the fast-reject filter applied while in the code state; the
/// overwhelming majority of bytes fail it and skip all delimiter checks.
#[inline]
#[must_use]
pub fn should_process(byte: u8, process_bytes: &[u8]) -> bool {
    process_bytes.contains(&byte)
}

fn sequence_matches(index: usize, end: usize, candidate: &[u8], content: &[u8]) -> bool {
    if candidate.is_empty() || index + candidate.len() > end + 1 {
        return false;
    }
    content
        .get(index..index + candidate.len())
        .is_some_and(|window| window == candidate)
}

/// Does any sequence in `candidates` match at `index`?
#[must_use]
pub fn matches_any(
    current: u8,
    index: usize,
    end: usize,
    candidates: &[Vec<u8>],
    content: &[u8],
) -> bool {
    for candidate in candidates {
        if candidate.first() == Some(&current)
            && sequence_matches(index, end, candidate, content)
        {
            return true;
        }
    }
    false
}

/// Does the one specific `candidate` sequence match at `index`?
#[must_use]
pub fn matches_single(
    current: u8,
    index: usize,
    end: usize,
    candidate: &[u8],
    content: &[u8],
) -> bool {
    candidate.first() == Some(&current) && sequence_matches(index, end, candidate, content)
}

/// Like [`matches_any`] over open/close pairs, returning the matched open
/// length together with the close sequence the caller must later look for.
#[must_use]
pub fn matches_open_close<'a>(
    current: u8,
    index: usize,
    end: usize,
    candidates: &'a [OpenClose],
    content: &[u8],
) -> Option<(usize, &'a [u8])> {
    for candidate in candidates {
        if candidate.open.first() == Some(&current)
            && sequence_matches(index, end, &candidate.open, content)
        {
            return Some((candidate.open.len(), &candidate.close));
        }
    }
    None
}

/// Length of the complexity token matching at `index`, or 0.
///
/// A token only counts on a left word boundary: anywhere but the first byte
/// of the file, the preceding byte must be whitespace.
#[must_use]
pub fn complexity_match(
    current: u8,
    index: usize,
    end: usize,
    candidates: &[Vec<u8>],
    complexity_bytes: &[u8],
    content: &[u8],
) -> usize {
    if index != 0 {
        match content.get(index - 1) {
            Some(&previous) if is_whitespace(previous) => {}
            _ => return 0,
        }
    }

    if !complexity_bytes.contains(&current) {
        return 0;
    }

    for candidate in candidates {
        if candidate.first() == Some(&current)
            && sequence_matches(index, end, candidate, content)
        {
            return candidate.len();
        }
    }
    0
}
