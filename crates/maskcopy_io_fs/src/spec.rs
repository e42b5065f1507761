//! Copy request models and top-level error types.

use std::fmt;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for the file mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyPatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern (unanchored search).
    Regex,
    /// Exact string match against the whole name.
    Literal,
}

/// Case handling for mask matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyCaseMode {
    /// Follow host conventions: insensitive on Windows, sensitive elsewhere.
    Native,
    /// Always compare case-sensitively.
    Sensitive,
    /// Always compare case-insensitively.
    Insensitive,
}

impl EnumCopyCaseMode {
    /// Whether matching should ignore case on the current host.
    pub fn is_case_insensitive(self) -> bool {
        match self {
            Self::Native => cfg!(windows),
            Self::Sensitive => false,
            Self::Insensitive => true,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Tunables shared by directory and archive mode.
#[derive(Debug, Clone)]
pub struct SpecCopyOptions {
    /// Mask interpretation mode.
    pub rule_pattern: EnumCopyPatternMode,
    /// Mask case handling.
    pub rule_case: EnumCopyCaseMode,
    /// Replace destination files that already exist.
    pub if_overwrite: bool,
    /// Do not mutate filesystem; print matches and run collision checks only.
    pub if_dry_run: bool,
}

impl Default for SpecCopyOptions {
    fn default() -> Self {
        Self {
            rule_pattern: EnumCopyPatternMode::Glob,
            rule_case: EnumCopyCaseMode::Native,
            if_overwrite: false,
            if_dry_run: false,
        }
    }
}

/// Parameters of one `copy_matching` run. Not mutated after construction.
#[derive(Debug, Clone)]
pub struct SpecCopyRequest {
    /// Source directory or zip archive.
    pub path_source: PathBuf,
    /// Mask applied to file basenames (directory mode) or member names (archive mode).
    pub file_mask: String,
    /// Destination root; created with parents when missing.
    pub path_dir_dst: PathBuf,
    /// Behavior switches.
    pub spec_cp_options: SpecCopyOptions,
}

impl SpecCopyRequest {
    pub fn new(
        path_source: impl Into<PathBuf>,
        file_mask: impl Into<String>,
        path_dir_dst: impl Into<PathBuf>,
    ) -> Self {
        Self {
            path_source: path_source.into(),
            file_mask: file_mask.into(),
            path_dir_dst: path_dir_dst.into(),
            spec_cp_options: SpecCopyOptions::default(),
        }
    }

    pub fn with_options(mut self, spec_cp_options: SpecCopyOptions) -> Self {
        self.spec_cp_options = spec_cp_options;
        self
    }
}

/// Errors that abort a `copy_matching` run. Every variant is fatal.
#[derive(Debug)]
pub enum CopyMaskError {
    /// File mask failed to compile.
    InvalidPattern(String),
    /// Destination file exists and overwrite was not requested.
    DestinationExists(PathBuf),
    /// Destination is unusable (existing directory, symlinked component, escapes root).
    UnsafeDestination {
        /// Offending destination path.
        path: PathBuf,
        /// Reason text.
        message: String,
    },
    /// Archive member name is absolute or climbs out of the destination.
    UnsafeArchiveMember(String),
    /// Source is missing, unreadable, or not a valid zip archive.
    SourceUnreadable {
        /// Source path.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },
    /// Destination root could not be created.
    DestinationInitFailed {
        /// Destination path that failed initialization.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Filesystem failure while creating directories or transferring bytes.
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

impl fmt::Display for CopyMaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern(msg) => write!(f, "{msg}"),
            Self::DestinationExists(path) => write!(
                f,
                "File '{}' exists. Use --overwrite to force copying",
                path.display()
            ),
            Self::UnsafeDestination { path, message } => {
                write!(f, "Unsafe destination {}: {message}", path.display())
            }
            Self::UnsafeArchiveMember(name) => {
                write!(f, "Archive member escapes destination root: {name}")
            }
            Self::SourceUnreadable { path, message } => {
                write!(f, "Failed to read source {}: {message}", path.display())
            }
            Self::DestinationInitFailed { path, message } => {
                write!(
                    f,
                    "Failed to initialize destination {}: {message}",
                    path.display()
                )
            }
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
        }
    }
}

impl std::error::Error for CopyMaskError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{CopyMaskError, EnumCopyCaseMode};

    #[test]
    fn destination_exists_message_names_overwrite_flag() {
        let err = CopyMaskError::DestinationExists(PathBuf::from("out/a.txt"));
        assert_eq!(
            err.to_string(),
            "File 'out/a.txt' exists. Use --overwrite to force copying"
        );
    }

    #[test]
    fn case_mode_native_follows_host() {
        assert_eq!(EnumCopyCaseMode::Native.is_case_insensitive(), cfg!(windows));
        assert!(EnumCopyCaseMode::Insensitive.is_case_insensitive());
        assert!(!EnumCopyCaseMode::Sensitive.is_case_insensitive());
    }
}
