//! Merges the standard and auxiliary command streams into source order.

use crate::error::{FormatError, Result};
use crate::model::ScriptCommand;
use crate::syntax::ids;

/// Single pass merge. Before standard command `i` is emitted, every
/// auxiliary command still queued whose `ref_index <= i` is emitted in
/// queue order. Hidden jumps are consumed but never emitted; anything
/// anchored past the last line follows it.
pub fn interlace(
    standard: &[ScriptCommand],
    auxiliary: Vec<ScriptCommand>,
) -> Result<Vec<ScriptCommand>> {
    let lines = standard.len();
    for aux in &auxiliary {
        let anchor = anchor(aux);
        if anchor > lines {
            return Err(FormatError::OutOfRange {
                what: "auxiliary reference",
                index: anchor as i64,
                len: lines,
            });
        }
    }

    let mut out = Vec::with_capacity(lines + auxiliary.len());
    let mut queued = auxiliary.into_iter().peekable();
    for (i, cmd) in standard.iter().enumerate() {
        while let Some(aux) = queued.next_if(|a| anchor(a) <= i) {
            out.push(aux);
        }
        if cmd.id() != ids::HIDDEN_JUMP {
            out.push(cmd.clone());
        }
    }
    out.extend(queued);
    Ok(out)
}

fn anchor(cmd: &ScriptCommand) -> usize {
    cmd.ref_index.unwrap_or(0)
}
