//! Output stage: everything here only reads a finished `ScriptFile`.
pub mod json;
pub mod listing;

use std::path::{Path, PathBuf};

/// File `<stem>.<ext>` directly inside `out_dir`.
///
/// The script name comes from the document itself, so it is reduced to a
/// single plain file name: anything other than ASCII letters, digits, `-`
/// and `_` becomes `_`, and an empty name falls back to `script`.
pub fn output_path(out_dir: &Path, name: &str, ext: &str) -> PathBuf {
    let stem: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    let stem = if stem.is_empty() { "script" } else { stem.as_str() };
    out_dir.join(format!("{stem}.{ext}"))
}
