//! Stable per-entry fingerprints.
//!
//! A fingerprint is the 32-bit FNV-1a hash of a canonical line built from the
//! entry's position, raw name and modification time:
//!
//! ```text
//! IIII:<raw name, left-justified to 60 chars>:YYYY-MM-DDTHH:MM:SS
//! ```
//!
//! The recipe is fixed so that a fingerprint printed by `list-zip -s` can be
//! handed back to `pick-zip -H` in a later run.

use std::fmt;

use crate::dostime::Timestamp;

const FNV_OFFSET_BASIS: u32 = 2166136261;
const FNV_PRIME: u32 = 16777619;
const NAME_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub u32);

impl Fingerprint {
    pub fn compute(index: usize, raw_name: &[u8], modified: &Timestamp) -> Self {
        Self(fnv1a(&canonical(index, raw_name, modified)))
    }

    /// Compare against user input such as `1A2B3C4D`.
    pub fn matches(&self, hash: &str) -> bool {
        self.to_string() == hash.trim().to_ascii_lowercase()
    }
}

/// Eight lowercase hex digits.
impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ b as u32).wrapping_mul(FNV_PRIME)
    })
}

/// Raw name bytes are copied as-is; padding counts one column per UTF-8
/// character and one per byte that is not part of a valid sequence.
/// Names wider than the field are kept whole.
fn canonical(index: usize, raw_name: &[u8], modified: &Timestamp) -> Vec<u8> {
    let mut line = format!("{index:04}:").into_bytes();
    line.extend_from_slice(raw_name);
    let width = display_width(raw_name);
    line.resize(line.len() + NAME_WIDTH.saturating_sub(width), b' ');
    line.push(b':');
    line.extend_from_slice(modified.to_string().as_bytes());
    line
}

fn display_width(bytes: &[u8]) -> usize {
    bytes
        .utf8_chunks()
        .map(|chunk| chunk.valid().chars().count() + chunk.invalid().len())
        .sum()
}
