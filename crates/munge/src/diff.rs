//! Unified diff of a module against its munged form

use std::path::{Path, PathBuf};

use similar::TextDiff;

/// Unified diff from `old` to `new` with three lines of context
///
/// Identical inputs produce an empty string, headers included.
pub fn unified_diff(old: &str, new: &str, from_file: &str, to_file: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(from_file, to_file)
        .to_string()
}

/// Name shown for the munged side of a diff: `foo.py` becomes `foo.munged.py`
pub fn munged_path(input: &Path) -> PathBuf {
    input.with_extension("munged.py")
}
