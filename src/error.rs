use std::fmt;
use std::path::PathBuf;

/// Which step of writing an extracted entry failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStep {
    Open,
    Create,
    Copy,
    SetPermissions,
    SetModified,
}

impl fmt::Display for ExtractStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open entry"),
            Self::Create => write!(f, "create dest file"),
            Self::Copy => write!(f, "copy entry data"),
            Self::SetPermissions => write!(f, "set permissions"),
            Self::SetModified => write!(f, "set modification time"),
        }
    }
}

/// A file name that could not be decoded, with the entry it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDecodeError {
    pub index: usize,
    pub message: String,
}

impl fmt::Display for EntryDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry #{}: {}", self.index, self.message)
    }
}

#[derive(Debug)]
pub enum SjisZipError {
    ConflictingPolicies,
    MissingArgument(&'static str),
    InvalidTarget(String),
    CantOpenArchive(std::io::Error),
    InvalidArchive(zip::result::ZipError),
    Decode(EntryDecodeError),
    DecodeFailures(Vec<EntryDecodeError>),
    NotFound(String),
    DestinationNotDirectory(PathBuf),
    CantCreateDestination(std::io::Error),
    PathTraversal(String),
    Extract {
        step: ExtractStep,
        source: std::io::Error,
    },
    Io(std::io::Error),
}

impl SjisZipError {
    /// Process exit code used by the command-line front ends.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConflictingPolicies | Self::MissingArgument(_) | Self::InvalidTarget(_) => 1,
            Self::DestinationNotDirectory(_) | Self::CantCreateDestination(_) => 2,
            Self::CantOpenArchive(_) | Self::InvalidArchive(_) => 3,
            Self::Decode(_) | Self::DecodeFailures(_) | Self::NotFound(_) => 10,
            Self::PathTraversal(_) | Self::Extract { .. } | Self::Io(_) => 11,
        }
    }
}

impl fmt::Display for SjisZipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConflictingPolicies => write!(
                f,
                "--raw-string and --auto-detect cannot be selected simultaneously"
            ),
            Self::MissingArgument(arg) => write!(f, "missing required argument: {arg}"),
            Self::InvalidTarget(s) => write!(f, "invalid target: {s}"),
            Self::CantOpenArchive(e) => write!(f, "can't open archive file: {e}"),
            Self::InvalidArchive(e) => write!(f, "invalid zip archive: {e}"),
            Self::Decode(e) => write!(f, "can't decode file name at {e}"),
            Self::DecodeFailures(errors) => {
                write!(f, "errors occurred during conversion:")?;
                for e in errors {
                    write!(f, "\n    {e}")?;
                }
                Ok(())
            }
            Self::NotFound(target) => write!(f, "file not found: {target}"),
            Self::DestinationNotDirectory(p) => {
                write!(f, "destination {} is not a directory", p.display())
            }
            Self::CantCreateDestination(e) => write!(f, "can't create destination: {e}"),
            Self::PathTraversal(p) => write!(f, "path traversal blocked: {p}"),
            Self::Extract { step, source } => write!(f, "can't {step}: {source}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SjisZipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CantOpenArchive(e) | Self::CantCreateDestination(e) | Self::Io(e) => Some(e),
            Self::Extract { source, .. } => Some(source),
            Self::InvalidArchive(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SjisZipError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type SjisResult<T> = Result<T, SjisZipError>;
