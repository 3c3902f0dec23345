use std::path::PathBuf;

use crate::archive::ArchiveEntry;
use crate::encoding::NameDecoder;
use crate::error::{EntryDecodeError, SjisResult, SjisZipError};

/// Source of the output name used when nothing else names the file.
pub type Clock = fn() -> String;

/// Local time as `YYYY-MM-DDTHHMM±HH`.
pub fn local_clock() -> String {
    let now = chrono::Local::now();
    clock_stamp(now.naive_local(), now.offset().local_minus_utc())
}

/// Minutes of the zone offset are dropped: +05:30 is `+05`, -00:30 is `-00`.
fn clock_stamp(local: chrono::NaiveDateTime, offset_secs: i32) -> String {
    let sign = if offset_secs < 0 { '-' } else { '+' };
    let hours = offset_secs.unsigned_abs() / 3600;
    format!("{}{sign}{hours:02}", local.format("%Y-%m-%dT%H%M"))
}

/// Which single entry to pick, by name or by fingerprint.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    pub archive_name: Option<String>,
    pub archive_hash: Option<String>,
    pub extract_name: Option<String>,
    pub clock: Clock,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            archive_name: None,
            archive_hash: None,
            extract_name: None,
            clock: local_clock,
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl TargetSpec {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            archive_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_hash(hash: impl Into<String>, extract_name: impl Into<String>) -> Self {
        Self {
            archive_hash: Some(hash.into()),
            extract_name: Some(extract_name.into()),
            ..Self::default()
        }
    }

    /// Empty strings count as absent.
    pub fn validate(&self) -> SjisResult<()> {
        match (
            present(&self.archive_name),
            present(&self.archive_hash),
            present(&self.extract_name),
        ) {
            (Some(_), _, _) | (None, Some(_), Some(_)) => Ok(()),
            (None, Some(_), None) => Err(SjisZipError::InvalidTarget(
                "a hash needs an output name".to_string(),
            )),
            (None, None, _) => Err(SjisZipError::InvalidTarget(
                "either a file name or a hash is required".to_string(),
            )),
        }
    }

    /// Name of the file written to the destination directory.
    pub fn output_name(&self) -> String {
        if let Some(name) = present(&self.extract_name) {
            return name.to_string();
        }
        if let Some(name) = present(&self.archive_name) {
            return name.rsplit('/').next().unwrap_or(name).to_string();
        }
        (self.clock)()
    }
}

impl std::fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (present(&self.archive_name), present(&self.archive_hash)) {
            (Some(name), _) => write!(f, "{name}"),
            (None, Some(hash)) => write!(f, "hash {hash}"),
            (None, None) => write!(f, "<none>"),
        }
    }
}

/// Find the first entry matching `target` in archive order.
///
/// Duplicates are not an error; the earliest entry wins. Names flagged as
/// UTF-8 are only compared as stored. Any other name that fails to decode
/// aborts the search unless its raw bytes already match.
pub fn resolve<'a, D: NameDecoder>(
    entries: &'a [ArchiveEntry],
    target: &TargetSpec,
    decoder: &D,
) -> SjisResult<(&'a ArchiveEntry, String)> {
    target.validate()?;

    let found = match present(&target.archive_name) {
        Some(name) => find_by_name(entries, name, decoder)?,
        None => {
            let hash = present(&target.archive_hash).unwrap_or_default();
            entries.iter().find(|e| e.fingerprint().matches(hash))
        }
    };

    match found {
        Some(entry) => Ok((entry, target.output_name())),
        None => Err(SjisZipError::NotFound(target.to_string())),
    }
}

fn find_by_name<'a, D: NameDecoder>(
    entries: &'a [ArchiveEntry],
    name: &str,
    decoder: &D,
) -> SjisResult<Option<&'a ArchiveEntry>> {
    for entry in entries {
        if entry.raw_name == name.as_bytes() {
            return Ok(Some(entry));
        }
        if entry.name_is_utf8 {
            continue;
        }
        let decoded = decoder.decode(&entry.raw_name).map_err(|e| {
            SjisZipError::Decode(EntryDecodeError {
                index: entry.index,
                message: e.to_string(),
            })
        })?;
        if decoded == name {
            return Ok(Some(entry));
        }
    }
    Ok(None)
}

/// Everything `pick-zip` needs for one run.
#[derive(Debug, Clone)]
pub struct PickRequest {
    pub zip_path: PathBuf,
    pub target: TargetSpec,
    pub dest_dir: PathBuf,
}

impl PickRequest {
    pub fn validate(&self) -> SjisResult<()> {
        if self.zip_path.as_os_str().is_empty() {
            return Err(SjisZipError::MissingArgument("-i <zip file>"));
        }
        if self.dest_dir.as_os_str().is_empty() {
            return Err(SjisZipError::MissingArgument("-d <extract directory>"));
        }
        self.target.validate()
    }
}
