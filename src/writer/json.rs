//! Dump the decoded program model as pretty JSON.

use crate::model::ScriptFile;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub fn emit(script: &ScriptFile, out_dir: &Path) -> io::Result<PathBuf> {
    let path = super::output_path(out_dir, &script.name, "json");
    let mut out = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut out, script)?;
    writeln!(out)?;
    out.flush()?;
    Ok(path)
}
