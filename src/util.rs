#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use crate::constants::PICOBOT_EXTENSIONS;

/// Returns the criteria file kind for a path, judged by its extension.
pub fn file_kind_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    PICOBOT_EXTENSIONS
        .contains(&ext.as_str())
        .then_some("picobot")
}

/// Finds the submission whose file name matches the file name of
/// `criteria_path`.
///
/// * `criteria_path`: path as written in the criteria file
/// * `submissions`: paths given on the command line
pub fn find_submission<'a>(criteria_path: &str, submissions: &'a [PathBuf]) -> Option<&'a Path> {
    let wanted = Path::new(criteria_path).file_name()?;
    submissions
        .iter()
        .find(|p| p.file_name() == Some(wanted))
        .map(PathBuf::as_path)
}
