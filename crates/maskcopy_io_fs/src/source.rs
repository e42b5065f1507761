//! Source dispatcher: pick the traversal strategy for a source path.

use std::path::Path;

/// Traversal strategy selected for a source path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopySourceKind {
    /// Recursive filesystem walk.
    Directory,
    /// Zip archive member listing.
    Archive,
}

/// Directories are walked; everything else is treated as a zip archive.
///
/// A missing path resolves to [`EnumCopySourceKind::Archive`] so the failure
/// surfaces when the archive is first opened.
pub fn detect_source_kind(path_source: &Path) -> EnumCopySourceKind {
    if path_source.is_dir() {
        EnumCopySourceKind::Directory
    } else {
        EnumCopySourceKind::Archive
    }
}

#[cfg(test)]
mod tests {
    use super::{EnumCopySourceKind, detect_source_kind};
    use crate::test_support::{TestDir, write_text};

    #[test]
    fn directory_and_file_sources_dispatch() {
        let tmp = TestDir::new();
        let path_file = tmp.path().join("bundle.zip");
        write_text(&path_file, "not really a zip");

        assert_eq!(detect_source_kind(tmp.path()), EnumCopySourceKind::Directory);
        assert_eq!(detect_source_kind(&path_file), EnumCopySourceKind::Archive);
        assert_eq!(
            detect_source_kind(&tmp.path().join("missing")),
            EnumCopySourceKind::Archive
        );
    }
}
