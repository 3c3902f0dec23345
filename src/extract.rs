use std::fs;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use filetime::FileTime;

use crate::archive::{ArchiveEntry, ShiftJisZip};
use crate::encoding::ShiftJis;
use crate::error::{ExtractStep, SjisResult, SjisZipError};
use crate::resolve::{PickRequest, resolve};

/// What a successful extraction wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub path: PathBuf,
    pub bytes: u64,
    pub mode: u32,
}

fn step(step: ExtractStep) -> impl FnOnce(io::Error) -> SjisZipError {
    move |source| SjisZipError::Extract { step, source }
}

/// Create `dir` (recursively) when it is missing; reject anything that
/// exists but is not a directory.
pub fn ensure_dest_dir(dir: &Path) -> SjisResult<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(SjisZipError::DestinationNotDirectory(dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(SjisZipError::CantCreateDestination)
        }
        Err(e) => Err(SjisZipError::CantCreateDestination(e)),
    }
}

/// Reject output names that are not a single plain file name.
fn check_output_name(name: &str) -> SjisResult<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SjisZipError::PathTraversal(name.to_string())),
    }
}

/// Copy `entry` into `dest_dir/output_name`, then restore its mode bits
/// and modification time.
pub fn extract_entry(
    archive: &mut ShiftJisZip,
    entry: &ArchiveEntry,
    dest_dir: &Path,
    output_name: &str,
) -> SjisResult<ExtractionResult> {
    check_output_name(output_name)?;

    let mut reader = archive
        .reader(entry.index)
        .map_err(|e| SjisZipError::Extract {
            step: ExtractStep::Open,
            source: io::Error::other(e),
        })?;

    let dest_path = dest_dir.join(output_name);
    let mut file = fs::File::create(&dest_path).map_err(step(ExtractStep::Create))?;
    let bytes = match copy_all(&mut reader, &mut file) {
        Ok(n) => n,
        Err(e) => {
            // Incomplete data is never left behind.
            drop(file);
            let _ = fs::remove_file(&dest_path);
            return Err(step(ExtractStep::Copy)(e));
        }
    };
    drop(file);

    let mode = entry.mode & 0o7777;
    set_mode(&dest_path, mode).map_err(step(ExtractStep::SetPermissions))?;

    if let Some(systime) = entry.modified.to_systime() {
        filetime::set_file_mtime(&dest_path, FileTime::from_system_time(systime))
            .map_err(step(ExtractStep::SetModified))?;
    }

    Ok(ExtractionResult {
        path: dest_path,
        bytes,
        mode,
    })
}

fn copy_all<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let n = io::copy(reader, writer)?;
    writer.flush()?;
    Ok(n)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, perms)
}

/// Validate, open, resolve and extract: one full `pick-zip` run.
pub fn pick(request: &PickRequest) -> SjisResult<ExtractionResult> {
    request.validate()?;
    ensure_dest_dir(&request.dest_dir)?;

    let mut archive = ShiftJisZip::open(&request.zip_path)?;
    let entries = std::mem::take(&mut archive.entries);
    let (entry, output_name) = resolve(&entries, &request.target, &ShiftJis)?;
    extract_entry(&mut archive, entry, &request.dest_dir, &output_name)
}
