//! The functional core: value tree in, `ScriptFile` out.
//!
//! Passes, in order:
//!   1. root header fields and the variable table
//!   2. both command streams, each fully decoded
//!   3. interlace into source order (hidden jumps dropped)
//!   4. goto targets → label names, variable slots → variables
pub mod decoder;
pub mod interlace;
pub mod labels;
pub mod params;
pub mod variables;

use log::debug;

use crate::error::{FormatError, Result};
use crate::model::ScriptFile;
use crate::parser::NodeCursor;
use crate::parser::value::ValueNode;
use crate::syntax::{GameVersion, SyntaxLookup};

use decoder::{CommandReader, Stream};

/// Number of fields in the root array.
pub const ROOT_FIELDS: usize = 10;

/// Runs every pass over one script's root node. Any failure aborts the
/// whole read.
pub fn run(root: &ValueNode, lookup: &dyn SyntaxLookup) -> Result<ScriptFile> {
    let mut cur = NodeCursor::over(root, "script root")?;
    if cur.remaining() != ROOT_FIELDS {
        return Err(FormatError::CountMismatch {
            expected: ROOT_FIELDS,
            actual: cur.remaining(),
            context: "script root".into(),
        });
    }

    let name = cur.take_string("script name")?;
    let engine_version = GameVersion(cur.take_int("engine version")?);
    let description = cur.take_string("script description")?;
    let format_version = cur.take_int("format version")?;
    let live_data = cur.take_int("live data flag")? != 0;
    let locals = cur.take("script variables")?;
    let standard = cur.take("standard commands")?;
    let arguments = cur.take("script arguments")?;
    let auxiliary = cur.take("auxiliary commands")?;
    let command_id = cur.take_value("script command id")?;
    cur.finish()?;

    debug!("reading script {name:?} (engine {engine_version}, format {format_version})");

    let variables = variables::build_variables(locals, arguments)?;

    let reader = CommandReader::new(lookup, engine_version);
    let standard = reader.read_all(Stream::Standard, standard)?;
    let auxiliary = reader.read_all(Stream::Auxiliary, auxiliary)?;
    debug!(
        "decoded {} standard and {} auxiliary commands",
        standard.len(),
        auxiliary.len()
    );

    let mut commands = interlace::interlace(&standard, auxiliary)?;
    labels::resolve_labels(&mut commands, &standard)?;
    labels::bind_variables(&mut commands, &variables)?;
    debug!("script {name:?}: {} commands after merge", commands.len());

    Ok(ScriptFile {
        name,
        engine_version,
        description,
        format_version,
        live_data,
        variables,
        commands,
        command_id,
    })
}
