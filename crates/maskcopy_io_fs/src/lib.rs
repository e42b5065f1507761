//! `maskcopy_io_fs`:
//! copy files matching a mask out of a directory tree or a zip archive.
//!
//! Modules:
//! - `copy`    : directory mode (recursive walk, per-file copy)
//! - `archive` : archive mode (member listing, all-or-nothing extraction)
//! - `source`  : source dispatcher
//! - `spec`    : enums/options/errors
//! - `report`  : run-time report model
//! - `util`    : mask matching, collision guard, path helpers

mod archive;
mod copy;
pub mod report;
pub mod source;
pub mod spec;
#[cfg(test)]
mod test_support;
mod util;

use std::io::Write;

pub use report::{ReportCopy, ReportCopyBuilder};
pub use source::{EnumCopySourceKind, detect_source_kind};
pub use spec::{
    CopyMaskError, EnumCopyCaseMode, EnumCopyPatternMode, SpecCopyOptions, SpecCopyRequest,
};

use crate::util::{TypeCopyMask, init_destination_root};

/// Run one copy request end to end.
///
/// The mask is compiled first, then the destination root is created (skipped
/// on dry-run), then the source is dispatched to directory or archive mode.
/// Every matched relative path or member name is written to `out`, one per
/// line, as soon as it is identified.
pub fn copy_matching<W: Write>(
    spec_cp_request: &SpecCopyRequest,
    out: &mut W,
) -> Result<ReportCopy, CopyMaskError> {
    let spec_cp_options = &spec_cp_request.spec_cp_options;
    let mask = TypeCopyMask::from_raw(
        &spec_cp_request.file_mask,
        spec_cp_options.rule_pattern,
        spec_cp_options.rule_case,
    )?;

    if !spec_cp_options.if_dry_run {
        init_destination_root(&spec_cp_request.path_dir_dst)?;
    }

    let enum_source_kind = detect_source_kind(&spec_cp_request.path_source);
    tracing::debug!(
        "Source {} dispatched as {enum_source_kind:?}",
        spec_cp_request.path_source.display()
    );
    let report = match enum_source_kind {
        EnumCopySourceKind::Directory => copy::copy_matching_tree(
            &spec_cp_request.path_source,
            &spec_cp_request.path_dir_dst,
            &mask,
            spec_cp_options,
            out,
        )?,
        EnumCopySourceKind::Archive => archive::extract_matching_archive(
            &spec_cp_request.path_source,
            &spec_cp_request.path_dir_dst,
            &mask,
            spec_cp_options,
            out,
        )?,
    };
    tracing::info!("{report}");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{CopyMaskError, EnumCopyPatternMode, SpecCopyOptions, SpecCopyRequest, copy_matching};
    use crate::test_support::{TestDir, printed_lines, read_text, write_text, write_zip};

    #[test]
    fn copy_matching_creates_missing_destination_parents() {
        let tmp = TestDir::new();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("deep/nested/dst");
        write_text(&src.join("logs/app.log"), "app");
        write_text(&src.join("logs/debug.txt"), "debug");
        write_text(&src.join("readme.md"), "readme");

        let mut buf = Vec::new();
        let report = copy_matching(&SpecCopyRequest::new(&src, "*.log", &dst), &mut buf)
            .expect("copy matching");

        assert_eq!(report.cnt_copied, 1);
        assert_eq!(printed_lines(&buf).len(), 1);
        assert_eq!(read_text(&dst.join("logs/app.log")), "app");
    }

    #[test]
    fn copy_matching_dispatches_archives() {
        let tmp = TestDir::new();
        let path_zip = tmp.path().join("bundle.zip");
        let dst = tmp.path().join("dst");
        write_zip(&path_zip, &[("a.txt", "a"), ("b.md", "b")]);

        let mut buf = Vec::new();
        copy_matching(&SpecCopyRequest::new(&path_zip, "*.txt", &dst), &mut buf)
            .expect("copy matching");

        assert_eq!(printed_lines(&buf), vec!["a.txt".to_string()]);
        assert_eq!(read_text(&dst.join("a.txt")), "a");
        assert!(!dst.join("b.md").exists());
    }

    #[test]
    fn copy_matching_invalid_mask_touches_nothing() {
        let tmp = TestDir::new();
        let dst = tmp.path().join("dst");

        let request = SpecCopyRequest::new(tmp.path(), "(", &dst).with_options(SpecCopyOptions {
            rule_pattern: EnumCopyPatternMode::Regex,
            ..SpecCopyOptions::default()
        });
        let mut buf = Vec::new();
        let err = copy_matching(&request, &mut buf).expect_err("invalid mask");

        assert!(matches!(err, CopyMaskError::InvalidPattern(_)));
        assert!(!dst.exists());
    }

    #[test]
    fn copy_matching_treats_braces_and_unclosed_bracket_literally() {
        let tmp = TestDir::new();
        let src = tmp.path().join("src");
        write_text(&src.join("a.txt"), "a");
        write_text(&src.join("{a,b}.txt"), "braces");
        write_text(&src.join("[x"), "bracket");

        let dst = tmp.path().join("dst_braces");
        let mut buf = Vec::new();
        copy_matching(&SpecCopyRequest::new(&src, "{a,b}.txt", &dst), &mut buf)
            .expect("brace mask");
        assert_eq!(printed_lines(&buf), vec!["{a,b}.txt".to_string()]);
        assert_eq!(read_text(&dst.join("{a,b}.txt")), "braces");
        assert!(!dst.join("a.txt").exists());

        let dst = tmp.path().join("dst_bracket");
        let mut buf = Vec::new();
        copy_matching(&SpecCopyRequest::new(&src, "[x", &dst), &mut buf)
            .expect("unclosed bracket mask");
        assert_eq!(printed_lines(&buf), vec!["[x".to_string()]);
        assert_eq!(read_text(&dst.join("[x")), "bracket");
    }

    #[test]
    fn copy_matching_missing_source_still_creates_destination() {
        let tmp = TestDir::new();
        let dst = tmp.path().join("dst");

        let mut buf = Vec::new();
        let err = copy_matching(
            &SpecCopyRequest::new(tmp.path().join("missing"), "*", &dst),
            &mut buf,
        )
        .expect_err("missing source");

        assert!(matches!(err, CopyMaskError::SourceUnreadable { .. }));
        assert!(dst.is_dir());
    }

    #[test]
    fn copy_matching_dry_run_leaves_destination_absent() {
        let tmp = TestDir::new();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_text(&src.join("a.txt"), "a");

        let request = SpecCopyRequest::new(&src, "*.txt", &dst).with_options(SpecCopyOptions {
            if_dry_run: true,
            ..SpecCopyOptions::default()
        });
        let mut buf = Vec::new();
        let report = copy_matching(&request, &mut buf).expect("dry run");

        assert_eq!(printed_lines(&buf), vec!["a.txt".to_string()]);
        assert_eq!(report.cnt_skipped, 1);
        assert!(!dst.exists());
    }
}
