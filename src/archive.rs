use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use zip::ZipArchive;

use crate::dostime::Timestamp;
use crate::error::{SjisResult, SjisZipError};
use crate::fingerprint::Fingerprint;

// General purpose bit 11: file name and comment are UTF-8.
const FLAG_LANGUAGE_ENCODING: u16 = 1 << 11;
// Offset of the general purpose flags inside a central directory header.
const CENTRAL_FLAGS_OFFSET: u64 = 8;

pub const DEFAULT_MODE: u32 = 0o644;

/// One central directory record, snapshotted when the archive is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Zero-based position in central directory order.
    pub index: usize,
    pub raw_name: Vec<u8>,
    pub name_is_utf8: bool,
    pub modified: Timestamp,
    pub mode: u32,
}

impl ArchiveEntry {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(self.index, &self.raw_name, &self.modified)
    }
}

/// A zip archive whose entry names are kept as raw bytes.
pub struct ShiftJisZip {
    archive: ZipArchive<BufReader<File>>,
    pub entries: Vec<ArchiveEntry>,
}

impl ShiftJisZip {
    pub fn open(path: impl AsRef<Path>) -> SjisResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(SjisZipError::CantOpenArchive)?;
        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(SjisZipError::InvalidArchive)?;

        // The zip reader does not expose the raw flags, so read them from the
        // central headers through a second handle.
        let mut headers = File::open(path).map_err(SjisZipError::CantOpenArchive)?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive
                .by_index_raw(index)
                .map_err(SjisZipError::InvalidArchive)?;
            let flags = read_flags(&mut headers, file.central_header_start())
                .map_err(SjisZipError::CantOpenArchive)?;
            entries.push(ArchiveEntry {
                index,
                raw_name: file.name_raw().to_vec(),
                name_is_utf8: flags & FLAG_LANGUAGE_ENCODING != 0,
                modified: file.last_modified().map(Timestamp::from).unwrap_or_default(),
                mode: file.unix_mode().unwrap_or(DEFAULT_MODE),
            });
        }

        Ok(Self { archive, entries })
    }

    /// Decompressed contents of the entry at `index`.
    pub fn reader(&mut self, index: usize) -> zip::result::ZipResult<impl Read + '_> {
        self.archive.by_index(index)
    }
}

fn read_flags(headers: &mut File, central_header_start: u64) -> io::Result<u16> {
    headers.seek(SeekFrom::Start(central_header_start + CENTRAL_FLAGS_OFFSET))?;
    let mut buf = [0u8; 2];
    headers.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}
