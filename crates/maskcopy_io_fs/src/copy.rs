//! Directory mode: recursive traversal and per-file copy.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{CopyMaskError, SpecCopyOptions};
use crate::util::{
    TypeCopyMask, check_existing_file, ensure_parent_dir, io_error, print_match,
    validate_destination_path_safety,
};

#[derive(Debug, Clone)]
struct SpecDirEntry {
    path_dir_src_sub: PathBuf,
    name_dir: String,
}

#[derive(Debug, Clone)]
struct SpecFileEntry {
    path_file_src: PathBuf,
    name_file: String,
}

struct SpecCopyContext<'a, W: Write> {
    path_dir_src: &'a Path,
    path_dir_dst: &'a Path,
    /// Destination root relative to the source root, when it lies inside it.
    path_dst_rel_in_src: Option<PathBuf>,
    spec_cp_options: &'a SpecCopyOptions,
    mask: &'a TypeCopyMask,
    builder_cp_report: ReportCopyBuilder,
    out: &'a mut W,
}

/// Copy every file under `path_dir_src` whose basename matches `mask` into
/// `path_dir_dst`, keeping the relative tree.
///
/// Each match is printed to `out` (relative path, one per line) before its
/// collision check and copy. The first failure aborts the walk; files copied
/// earlier stay in place.
pub(crate) fn copy_matching_tree<W: Write>(
    path_dir_src: &Path,
    path_dir_dst: &Path,
    mask: &TypeCopyMask,
    spec_cp_options: &SpecCopyOptions,
    out: &mut W,
) -> Result<ReportCopy, CopyMaskError> {
    let path_dst_rel_in_src = derive_nested_destination(path_dir_src, path_dir_dst);
    if path_dst_rel_in_src
        .as_deref()
        .is_some_and(|path_rel| path_rel.as_os_str().is_empty())
    {
        return Err(CopyMaskError::UnsafeDestination {
            path: path_dir_dst.to_path_buf(),
            message: "is the source directory".to_string(),
        });
    }

    let mut spec_cp_ctx = SpecCopyContext {
        path_dir_src,
        path_dir_dst,
        path_dst_rel_in_src,
        spec_cp_options,
        mask,
        builder_cp_report: ReportCopyBuilder::default(),
        out,
    };

    walk_directory(path_dir_src, &mut spec_cp_ctx)?;
    Ok(spec_cp_ctx.builder_cp_report.build())
}

/// Destination root expressed relative to the source root, if nested in it.
fn derive_nested_destination(path_dir_src: &Path, path_dir_dst: &Path) -> Option<PathBuf> {
    let path_src_resolved = fs::canonicalize(path_dir_src).ok()?;
    let path_dst_resolved = fs::canonicalize(path_dir_dst).ok()?;
    path_dst_resolved
        .strip_prefix(&path_src_resolved)
        .ok()
        .map(Path::to_path_buf)
}

fn walk_directory<W: Write>(
    path_root: &Path,
    spec_cp_ctx: &mut SpecCopyContext<'_, W>,
) -> Result<(), CopyMaskError> {
    let path_dir_src = spec_cp_ctx.path_dir_src;
    let read_failed = |e: std::io::Error| {
        if path_root == path_dir_src {
            CopyMaskError::SourceUnreadable {
                path: path_root.to_path_buf(),
                message: e.to_string(),
            }
        } else {
            io_error(path_root, e)
        }
    };

    let mut l_dirs: Vec<SpecDirEntry> = Vec::new();
    let mut l_files: Vec<SpecFileEntry> = Vec::new();

    for entry_res in fs::read_dir(path_root).map_err(read_failed)? {
        let entry = entry_res.map_err(read_failed)?;
        let path_entry = entry.path();
        let name_entry = entry.file_name().to_string_lossy().to_string();
        let cfg_file_type = entry
            .file_type()
            .map_err(|e| io_error(&path_entry, e))?;

        if cfg_file_type.is_dir() {
            l_dirs.push(SpecDirEntry {
                path_dir_src_sub: path_entry,
                name_dir: name_entry,
            });
        } else if cfg_file_type.is_symlink() && path_entry.is_dir() {
            tracing::debug!("Symlinked directory not descended: {}", path_entry.display());
        } else {
            l_files.push(SpecFileEntry {
                path_file_src: path_entry,
                name_file: name_entry,
            });
        }
    }

    l_dirs.sort_by(|a, b| a.name_dir.cmp(&b.name_dir));
    l_files.sort_by(|a, b| a.name_file.cmp(&b.name_file));

    for file_entry in l_files {
        handle_file_entry(file_entry, spec_cp_ctx)?;
    }

    for dir_entry in l_dirs {
        if is_destination_root(&dir_entry.path_dir_src_sub, spec_cp_ctx) {
            tracing::debug!(
                "Destination root not traversed: {}",
                dir_entry.path_dir_src_sub.display()
            );
            continue;
        }
        walk_directory(&dir_entry.path_dir_src_sub, spec_cp_ctx)?;
    }
    Ok(())
}

fn is_destination_root<W: Write>(path_dir: &Path, spec_cp_ctx: &SpecCopyContext<'_, W>) -> bool {
    let Some(path_dst_rel) = spec_cp_ctx.path_dst_rel_in_src.as_deref() else {
        return false;
    };
    path_dir
        .strip_prefix(spec_cp_ctx.path_dir_src)
        .is_ok_and(|path_rel| path_rel == path_dst_rel)
}

fn handle_file_entry<W: Write>(
    spec_file_entry: SpecFileEntry,
    spec_cp_ctx: &mut SpecCopyContext<'_, W>,
) -> Result<(), CopyMaskError> {
    spec_cp_ctx.builder_cp_report.add_scanned();
    if !spec_cp_ctx.mask.is_match(&spec_file_entry.name_file) {
        return Ok(());
    }

    // Sockets, fifos and devices are reported but never opened.
    if let Ok(meta_file_src) = fs::metadata(&spec_file_entry.path_file_src)
        && !meta_file_src.is_file()
    {
        spec_cp_ctx.builder_cp_report.add_warning(format!(
            "Special file skipped: {}",
            spec_file_entry.path_file_src.display()
        ));
        return Ok(());
    }
    spec_cp_ctx.builder_cp_report.add_matched();

    let path_rel = spec_file_entry
        .path_file_src
        .strip_prefix(spec_cp_ctx.path_dir_src)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| PathBuf::from(&spec_file_entry.name_file));
    print_match(spec_cp_ctx.out, &path_rel.display().to_string())?;

    let path_file_dst = spec_cp_ctx.path_dir_dst.join(&path_rel);
    check_existing_file(&path_file_dst, spec_cp_ctx.spec_cp_options.if_overwrite)?;
    validate_destination_path_safety(&path_file_dst, spec_cp_ctx.path_dir_dst, false)?;

    if spec_cp_ctx.spec_cp_options.if_dry_run {
        spec_cp_ctx.builder_cp_report.add_skipped();
        return Ok(());
    }

    ensure_parent_dir(&path_file_dst)?;
    fs::copy(&spec_file_entry.path_file_src, &path_file_dst)
        .map_err(|e| io_error(&spec_file_entry.path_file_src, e))?;
    tracing::info!(
        "Copied {} -> {}",
        spec_file_entry.path_file_src.display(),
        path_file_dst.display()
    );
    spec_cp_ctx.builder_cp_report.add_copied(1);
    Ok(())
}
