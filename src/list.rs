use std::io::Write;
use std::path::Path;

use crate::archive::{ArchiveEntry, ShiftJisZip};
use crate::encoding::{DecodeError, NameDecoder, ShiftJis};
use crate::error::{EntryDecodeError, SjisResult, SjisZipError};

/// How raw entry names are turned into display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    /// Names are already UTF-8; print them as stored.
    RawBytes,
    /// Trust the entry's UTF-8 flag, decode Shift-JIS otherwise.
    AutoDetect,
    /// Always decode Shift-JIS.
    #[default]
    ForceShiftJis,
}

impl NamingPolicy {
    pub fn from_flags(raw_string: bool, auto_detect: bool) -> SjisResult<Self> {
        match (raw_string, auto_detect) {
            (true, true) => Err(SjisZipError::ConflictingPolicies),
            (true, false) => Ok(Self::RawBytes),
            (false, true) => Ok(Self::AutoDetect),
            (false, false) => Ok(Self::ForceShiftJis),
        }
    }

    /// Display bytes for an entry name. Passthrough names are returned
    /// exactly as stored, even when they are not valid UTF-8.
    pub fn entry_name<D: NameDecoder>(
        &self,
        raw: &[u8],
        is_utf8: bool,
        decoder: &D,
    ) -> Result<Vec<u8>, DecodeError> {
        match self {
            Self::RawBytes => Ok(raw.to_vec()),
            Self::AutoDetect if is_utf8 => Ok(raw.to_vec()),
            Self::AutoDetect | Self::ForceShiftJis => decoder.decode(raw).map(String::into_bytes),
        }
    }
}

/// `[<fingerprint> non-utf-8:<bool> ]<name>`
pub fn render_line(entry: &ArchiveEntry, name: &[u8], show_hash: bool) -> Vec<u8> {
    let mut line = Vec::with_capacity(name.len() + 26);
    if show_hash {
        line.extend_from_slice(
            format!("{} non-utf-8:{} ", entry.fingerprint(), !entry.name_is_utf8).as_bytes(),
        );
    }
    line.extend_from_slice(name);
    line
}

/// Rendered listing lines in archive order.
///
/// Entries whose names fail to decode are skipped and remembered; call
/// [`Lines::finish`] once the iterator is exhausted to surface them.
pub struct Lines<'a, D: NameDecoder> {
    entries: std::slice::Iter<'a, ArchiveEntry>,
    policy: NamingPolicy,
    show_hash: bool,
    decoder: D,
    failures: Vec<EntryDecodeError>,
}

impl<'a, D: NameDecoder> Lines<'a, D> {
    pub fn new(
        entries: &'a [ArchiveEntry],
        policy: NamingPolicy,
        show_hash: bool,
        decoder: D,
    ) -> Self {
        Self {
            entries: entries.iter(),
            policy,
            show_hash,
            decoder,
            failures: Vec::new(),
        }
    }

    pub fn finish(self) -> SjisResult<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(SjisZipError::DecodeFailures(self.failures))
        }
    }
}

impl<D: NameDecoder> Iterator for Lines<'_, D> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        for entry in self.entries.by_ref() {
            match self
                .policy
                .entry_name(&entry.raw_name, entry.name_is_utf8, &self.decoder)
            {
                Ok(name) => return Some(render_line(entry, &name, self.show_hash)),
                Err(e) => self.failures.push(EntryDecodeError {
                    index: entry.index,
                    message: e.to_string(),
                }),
            }
        }
        None
    }
}

/// Write one line per entry to `out`, then report any decode failures.
pub fn write_listing<W: Write, D: NameDecoder>(
    entries: &[ArchiveEntry],
    policy: NamingPolicy,
    show_hash: bool,
    decoder: D,
    out: &mut W,
) -> SjisResult<()> {
    let mut lines = Lines::new(entries, policy, show_hash, decoder);
    for line in lines.by_ref() {
        out.write_all(&line)?;
        out.write_all(b"\n")?;
    }
    lines.finish()
}

pub fn list_archive<W: Write>(
    path: &Path,
    policy: NamingPolicy,
    show_hash: bool,
    out: &mut W,
) -> SjisResult<()> {
    let archive = ShiftJisZip::open(path)?;
    write_listing(&archive.entries, policy, show_hash, ShiftJis, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dostime::Timestamp;

    const SJIS_NAME: &[u8] = b"ShiftJIS\x95\xb6\x8e\x9a\x97\xf1";

    fn entry(index: usize, raw_name: &[u8], name_is_utf8: bool) -> ArchiveEntry {
        ArchiveEntry {
            index,
            raw_name: raw_name.to_vec(),
            name_is_utf8,
            modified: Timestamp::default(),
            mode: 0o644,
        }
    }

    #[test]
    fn test_policy_from_flags() {
        assert_eq!(NamingPolicy::from_flags(false, false).unwrap(), NamingPolicy::ForceShiftJis);
        assert_eq!(NamingPolicy::from_flags(true, false).unwrap(), NamingPolicy::RawBytes);
        assert_eq!(NamingPolicy::from_flags(false, true).unwrap(), NamingPolicy::AutoDetect);
        assert!(matches!(
            NamingPolicy::from_flags(true, true),
            Err(SjisZipError::ConflictingPolicies)
        ));
    }

    #[test]
    fn test_raw_string() {
        let name = NamingPolicy::RawBytes
            .entry_name("UTF8文字列".as_bytes(), false, &ShiftJis)
            .unwrap();
        assert_eq!(name, "UTF8文字列".as_bytes());
    }

    #[test]
    fn test_raw_string_keeps_sjis_bytes() {
        let name = NamingPolicy::RawBytes
            .entry_name(SJIS_NAME, false, &ShiftJis)
            .unwrap();
        assert_eq!(name, SJIS_NAME);
    }

    #[test]
    fn test_auto_detect_on_utf8() {
        let name = NamingPolicy::AutoDetect
            .entry_name("UTF8文字列".as_bytes(), true, &ShiftJis)
            .unwrap();
        assert_eq!(name, "UTF8文字列".as_bytes());
    }

    #[test]
    fn test_forced_on_sjis() {
        let name = NamingPolicy::ForceShiftJis
            .entry_name(SJIS_NAME, false, &ShiftJis)
            .unwrap();
        assert_eq!(name, "ShiftJIS文字列".as_bytes());
    }

    #[test]
    fn test_auto_detect_on_sjis() {
        let name = NamingPolicy::AutoDetect
            .entry_name(SJIS_NAME, false, &ShiftJis)
            .unwrap();
        assert_eq!(name, "ShiftJIS文字列".as_bytes());
    }

    #[test]
    fn test_forced_ignores_utf8_flag() {
        // UTF-8 "文" is e6 96 87, which is not a complete Shift-JIS sequence.
        assert!(NamingPolicy::ForceShiftJis
            .entry_name("文".as_bytes(), true, &ShiftJis)
            .is_err());
    }

    #[test]
    fn test_render_line() {
        let e = entry(0, b"a.txt", true);
        assert_eq!(render_line(&e, b"a.txt", false), b"a.txt");
        assert_eq!(
            render_line(&e, b"a.txt", true),
            format!("{} non-utf-8:false a.txt", e.fingerprint()).into_bytes()
        );
    }

    #[test]
    fn test_failures_do_not_stop_listing() {
        let entries = vec![
            entry(0, b"a.txt", false),
            entry(1, b"bad\x81", false),
            entry(2, SJIS_NAME, false),
        ];
        let mut out = Vec::new();
        let err = write_listing(&entries, NamingPolicy::ForceShiftJis, false, ShiftJis, &mut out)
            .unwrap_err();
        assert_eq!(String::from_utf8(out).unwrap(), "a.txt\nShiftJIS文字列\n");
        match err {
            SjisZipError::DecodeFailures(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lines_are_lazy() {
        let entries = vec![entry(0, b"bad\x81", false), entry(1, b"b.txt", false)];
        let mut lines = Lines::new(&entries, NamingPolicy::ForceShiftJis, false, ShiftJis);
        assert_eq!(lines.next().as_deref(), Some(&b"b.txt"[..]));
        assert_eq!(lines.next(), None);
        match lines.finish() {
            Err(SjisZipError::DecodeFailures(failures)) => assert_eq!(failures[0].index, 0),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
