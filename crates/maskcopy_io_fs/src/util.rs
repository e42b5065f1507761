use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use regex::{Regex, RegexBuilder};

use crate::spec::{CopyMaskError, EnumCopyCaseMode, EnumCopyPatternMode};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
pub(crate) enum TypeCopyMask {
    Literal {
        value: String,
        if_case_insensitive: bool,
    },
    Glob(GlobMatcher),
    Regex(Regex),
}

impl TypeCopyMask {
    /// Compile `file_mask` once; both traversal strategies share the result.
    pub(crate) fn from_raw(
        file_mask: &str,
        rule_pattern: EnumCopyPatternMode,
        rule_case: EnumCopyCaseMode,
    ) -> Result<Self, CopyMaskError> {
        let if_case_insensitive = rule_case.is_case_insensitive();
        match rule_pattern {
            EnumCopyPatternMode::Literal => Ok(Self::Literal {
                value: if if_case_insensitive {
                    file_mask.to_lowercase()
                } else {
                    file_mask.to_string()
                },
                if_case_insensitive,
            }),
            EnumCopyPatternMode::Glob => {
                // `*` may cross `/` so archive member names match like fnmatch.
                let matcher = GlobBuilder::new(&_to_shell_wildcard(file_mask))
                    .case_insensitive(if_case_insensitive)
                    .literal_separator(false)
                    .backslash_escape(false)
                    .allow_unclosed_class(true)
                    .build()
                    .map_err(|e| {
                        CopyMaskError::InvalidPattern(format!("Invalid file mask: {e}"))
                    })?
                    .compile_matcher();
                Ok(Self::Glob(matcher))
            }
            EnumCopyPatternMode::Regex => {
                let regex = RegexBuilder::new(file_mask)
                    .case_insensitive(if_case_insensitive)
                    .build()
                    .map_err(|e| {
                        CopyMaskError::InvalidPattern(format!("Invalid file mask: {e}"))
                    })?;
                Ok(Self::Regex(regex))
            }
        }
    }

    pub(crate) fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Literal {
                value: literal,
                if_case_insensitive,
            } => {
                if *if_case_insensitive {
                    value.to_lowercase() == *literal
                } else {
                    value == literal
                }
            }
            Self::Glob(matcher) => matcher.is_match(value),
            Self::Regex(regex) => regex.is_match(value),
        }
    }
}

/// Restrict a mask to `*`, `?` and `[seq]` before handing it to `globset`.
///
/// Braces become literal, runs of `*` collapse into one, and a `[` without a
/// closing `]` matches itself.
fn _to_shell_wildcard(file_mask: &str) -> String {
    let l_chars: Vec<char> = file_mask.chars().collect();
    let mut mask_glob = String::with_capacity(file_mask.len());
    let mut n_idx = 0;
    while n_idx < l_chars.len() {
        match l_chars[n_idx] {
            '*' => {
                mask_glob.push('*');
                while l_chars.get(n_idx + 1) == Some(&'*') {
                    n_idx += 1;
                }
            }
            '{' => mask_glob.push_str("[{]"),
            '}' => mask_glob.push_str("[}]"),
            '[' => {
                let mut n_end = n_idx + 1;
                if l_chars.get(n_end) == Some(&'!') {
                    n_end += 1;
                }
                if l_chars.get(n_end) == Some(&']') {
                    n_end += 1;
                }
                match l_chars[n_end.min(l_chars.len())..]
                    .iter()
                    .position(|c| *c == ']')
                {
                    Some(n_offset) => {
                        n_end += n_offset;
                        mask_glob.extend(&l_chars[n_idx..=n_end]);
                        n_idx = n_end;
                    }
                    None => mask_glob.push_str("[[]"),
                }
            }
            c => mask_glob.push(c),
        }
        n_idx += 1;
    }
    mask_glob
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CollisionGuard

/// Fail when `path_dst` already exists and overwriting is not allowed.
///
/// Read-only: never creates or removes anything. A dangling symlink counts
/// as existing.
pub(crate) fn check_existing_file(path_dst: &Path, if_overwrite: bool) -> Result<(), CopyMaskError> {
    if !if_overwrite && fs::symlink_metadata(path_dst).is_ok() {
        return Err(CopyMaskError::DestinationExists(path_dst.to_path_buf()));
    }
    Ok(())
}

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// Reject destinations that would write outside `path_dir_dst_root`, through a
/// symlinked component, or onto a symlink.
///
/// A file destination must not be an existing directory, and a directory
/// destination (`if_dir_item`) must not be an existing file.
pub(crate) fn validate_destination_path_safety(
    path_dst_item: &Path,
    path_dir_dst_root: &Path,
    if_dir_item: bool,
) -> Result<(), CopyMaskError> {
    let unsafe_dst = |message: String| CopyMaskError::UnsafeDestination {
        path: path_dst_item.to_path_buf(),
        message,
    };

    let path_dir_dst_root_abs = _absolutize_path(path_dir_dst_root);
    let path_dst_item_abs = _absolutize_path(path_dst_item);

    let path_parent_rel = path_dst_item_abs
        .parent()
        .and_then(|path_parent| path_parent.strip_prefix(&path_dir_dst_root_abs).ok())
        .ok_or_else(|| {
            unsafe_dst(format!(
                "escapes destination root {}",
                path_dir_dst_root.display()
            ))
        })?;

    let mut path_cursor = path_dir_dst_root_abs.clone();
    for part_rel in path_parent_rel.components() {
        path_cursor.push(part_rel.as_os_str());
        match fs::symlink_metadata(&path_cursor) {
            Ok(meta_cursor) if meta_cursor.file_type().is_symlink() => {
                return Err(unsafe_dst(format!(
                    "traverses symlink component {}",
                    path_cursor.display()
                )));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => break,
            Err(e) => {
                return Err(unsafe_dst(format!(
                    "failed to inspect {} ({e})",
                    path_cursor.display()
                )));
            }
        }
    }

    match fs::symlink_metadata(&path_dst_item_abs) {
        Ok(meta_dst_item) if meta_dst_item.file_type().is_symlink() => {
            Err(unsafe_dst("is an existing symlink".to_string()))
        }
        Ok(meta_dst_item) if meta_dst_item.is_dir() && !if_dir_item => {
            Err(unsafe_dst("is an existing directory".to_string()))
        }
        Ok(meta_dst_item) if !meta_dst_item.is_dir() && if_dir_item => {
            Err(unsafe_dst("is an existing file".to_string()))
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(unsafe_dst(format!("failed to inspect ({e})"))),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Create the destination root (and parents) unless it already exists.
pub(crate) fn init_destination_root(path_dir_dst: &Path) -> Result<(), CopyMaskError> {
    fs::create_dir_all(path_dir_dst).map_err(|e| CopyMaskError::DestinationInitFailed {
        path: path_dir_dst.to_path_buf(),
        message: e.to_string(),
    })
}

/// Make sure the parent chain of `path_file_dst` exists.
pub(crate) fn ensure_parent_dir(path_file_dst: &Path) -> Result<(), CopyMaskError> {
    let Some(path_parent_dst) = path_file_dst.parent() else {
        return Ok(());
    };
    fs::create_dir_all(path_parent_dst).map_err(|e| io_error(path_parent_dst, e))
}

/// Emit one matched path on its own line, flushed so it precedes any write.
pub(crate) fn print_match<W: Write>(out: &mut W, path_match: &str) -> Result<(), CopyMaskError> {
    writeln!(out, "{path_match}")
        .and_then(|_| out.flush())
        .map_err(|e| io_error(Path::new("<stdout>"), e))
}

pub(crate) fn io_error(path: &Path, e: io::Error) -> CopyMaskError {
    CopyMaskError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
