use std::fmt;

/// A byte sequence that has no Shift-JIS mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub bytes: Vec<u8>,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid Shift_JIS sequence in ")?;
        for b in &self.bytes {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeError {}

/// Converts raw file name bytes to a UTF-8 string.
pub trait NameDecoder {
    fn decode(&self, raw: &[u8]) -> Result<String, DecodeError>;
}

/// Shift-JIS (Windows-31J) decoder backed by `encoding_rs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShiftJis;

impl NameDecoder for ShiftJis {
    fn decode(&self, raw: &[u8]) -> Result<String, DecodeError> {
        sjis_to_utf8(raw)
    }
}

/// Convert Shift-JIS encoded bytes to a UTF-8 string.
/// Unmappable or truncated sequences are an error, never U+FFFD.
pub fn sjis_to_utf8(bytes: &[u8]) -> Result<String, DecodeError> {
    encoding_rs::SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|cow| cow.into_owned())
        .ok_or_else(|| DecodeError {
            bytes: bytes.to_vec(),
        })
}
