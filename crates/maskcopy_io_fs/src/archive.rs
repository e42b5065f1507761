//! Archive mode: zip member listing and batch extraction.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{CopyMaskError, SpecCopyOptions};
use crate::util::{
    TypeCopyMask, check_existing_file, ensure_parent_dir, io_error, print_match,
    validate_destination_path_safety,
};

#[derive(Debug, Clone)]
struct SpecArchiveMember {
    n_index: usize,
    name_member: String,
    path_file_dst: PathBuf,
    if_dir: bool,
}

/// Extract the members of the zip at `path_archive` whose names match `mask`.
///
/// Matching runs over the whole member list first: every match is printed and
/// passed through the collision guard in archive order. Extraction only starts
/// once all of them are cleared, so a collision leaves the destination as it was.
pub(crate) fn extract_matching_archive<W: Write>(
    path_archive: &Path,
    path_dir_dst: &Path,
    mask: &TypeCopyMask,
    spec_cp_options: &SpecCopyOptions,
    out: &mut W,
) -> Result<ReportCopy, CopyMaskError> {
    let source_unreadable = |message: String| CopyMaskError::SourceUnreadable {
        path: path_archive.to_path_buf(),
        message,
    };

    let file_archive = fs::File::open(path_archive).map_err(|e| source_unreadable(e.to_string()))?;
    let mut zip_archive =
        ZipArchive::new(file_archive).map_err(|e| source_unreadable(e.to_string()))?;

    let mut builder_cp_report = ReportCopyBuilder::default();
    let l_members = collect_matching_members(
        &mut zip_archive,
        path_archive,
        path_dir_dst,
        mask,
        spec_cp_options,
        &mut builder_cp_report,
        out,
    )?;

    if spec_cp_options.if_dry_run {
        for _ in &l_members {
            builder_cp_report.add_skipped();
        }
        return Ok(builder_cp_report.build());
    }

    for spec_member in &l_members {
        if spec_member.if_dir {
            fs::create_dir_all(&spec_member.path_file_dst)
                .map_err(|e| io_error(&spec_member.path_file_dst, e))?;
            tracing::debug!("Created directory member {}", spec_member.name_member);
            continue;
        }
        let mut zip_file = zip_archive
            .by_index(spec_member.n_index)
            .map_err(|e| source_unreadable(format!("{}: {e}", spec_member.name_member)))?;

        ensure_parent_dir(&spec_member.path_file_dst)?;
        let mut file_dst = fs::File::create(&spec_member.path_file_dst)
            .map_err(|e| io_error(&spec_member.path_file_dst, e))?;
        io::copy(&mut zip_file, &mut file_dst)
            .map_err(|e| io_error(&spec_member.path_file_dst, e))?;
        tracing::info!(
            "Extracted {} -> {}",
            spec_member.name_member,
            spec_member.path_file_dst.display()
        );
    }
    builder_cp_report.add_copied(l_members.len() as u64);
    Ok(builder_cp_report.build())
}

fn collect_matching_members<R, W>(
    zip_archive: &mut ZipArchive<R>,
    path_archive: &Path,
    path_dir_dst: &Path,
    mask: &TypeCopyMask,
    spec_cp_options: &SpecCopyOptions,
    builder_cp_report: &mut ReportCopyBuilder,
    out: &mut W,
) -> Result<Vec<SpecArchiveMember>, CopyMaskError>
where
    R: io::Read + io::Seek,
    W: Write,
{
    let mut l_members = Vec::new();
    for n_index in 0..zip_archive.len() {
        let zip_file = zip_archive
            .by_index_raw(n_index)
            .map_err(|e| CopyMaskError::SourceUnreadable {
                path: path_archive.to_path_buf(),
                message: e.to_string(),
            })?;
        let name_member = zip_file.name().to_string();
        let if_dir = zip_file.is_dir();

        builder_cp_report.add_scanned();
        if !mask.is_match(&name_member) {
            continue;
        }
        builder_cp_report.add_matched();
        print_match(out, &name_member)?;

        let path_rel = zip_file
            .enclosed_name()
            .ok_or_else(|| CopyMaskError::UnsafeArchiveMember(name_member.clone()))?;
        let path_file_dst = path_dir_dst.join(path_rel);
        check_existing_file(&path_file_dst, spec_cp_options.if_overwrite)?;
        validate_destination_path_safety(&path_file_dst, path_dir_dst, if_dir)?;

        if l_members
            .iter()
            .any(|m: &SpecArchiveMember| m.path_file_dst == path_file_dst)
        {
            builder_cp_report.add_warning(format!(
                "Duplicate archive member, last one wins: {name_member}"
            ));
            l_members.retain(|m: &SpecArchiveMember| m.path_file_dst != path_file_dst);
        }
        l_members.push(SpecArchiveMember {
            n_index,
            name_member,
            path_file_dst,
            if_dir,
        });
    }
    Ok(l_members)
}
