//! Post-merge symbol passes: goto targets and variable references.

use log::trace;

use crate::error::{FormatError, Result};
use crate::model::{
    DataType, ParamValue, ScriptCommand, ScriptParameter, ScriptVariable, VariableRef,
};
use crate::syntax::ids;

/// Replace the line number of every goto/gosub with the label it points at.
///
/// Line numbers index `standard`, the command array as it was before hidden
/// jumps were filtered out.
pub fn resolve_labels(commands: &mut [ScriptCommand], standard: &[ScriptCommand]) -> Result<()> {
    for cmd in commands
        .iter_mut()
        .filter(|c| matches!(c.id(), ids::GOTO | ids::GOSUB))
    {
        let line = match cmd.parameters.as_slice() {
            [ScriptParameter {
                value: ParamValue::Int(line),
                ..
            }] => *line,
            other => {
                return Err(FormatError::CountMismatch {
                    expected: 1,
                    actual: other.len(),
                    context: format!("line number of {}", cmd.syntax.name),
                });
            }
        };

        let target = usize::try_from(line)
            .ok()
            .and_then(|i| standard.get(i))
            .ok_or(FormatError::OutOfRange {
                what: "label line",
                index: line,
                len: standard.len(),
            })?;

        let label = target.parameters.first().ok_or_else(|| FormatError::BadGoto {
            line,
            reason: format!("{} has no parameters", target.syntax.name),
        })?;
        let name = match &label.value {
            ParamValue::String(name) | ParamValue::Label(name) => name.clone(),
            other => {
                return Err(FormatError::BadGoto {
                    line,
                    reason: format!("first parameter is not a label name: {other:?}"),
                });
            }
        };

        trace!("line {line} resolved to label {name}");
        cmd.parameters = vec![ScriptParameter {
            syntax: label.syntax.clone(),
            data_type: DataType::Label,
            value: ParamValue::Label(name),
        }];
    }
    Ok(())
}

/// Bind variable references to the script's own variable table.
///
/// Slot numbers are 1-based and must exist; names that match a table
/// entry are bound, other names stay global.
pub fn bind_variables(commands: &mut [ScriptCommand], variables: &[ScriptVariable]) -> Result<()> {
    let params = commands.iter_mut().flat_map(|c| c.parameters.iter_mut());
    for param in params {
        let ParamValue::Variable(var) = &mut param.value else {
            continue;
        };
        let bound = match var {
            VariableRef::Slot(slot) => {
                let slot = *slot;
                let found = usize::try_from(slot)
                    .ok()
                    .and_then(|s| s.checked_sub(1))
                    .and_then(|i| variables.get(i))
                    .ok_or(FormatError::OutOfRange {
                        what: "variable",
                        index: slot,
                        len: variables.len(),
                    })?;
                Some(found)
            }
            VariableRef::Global(name) => variables.iter().find(|v| v.name == *name),
            VariableRef::Local { .. } => None,
        };
        if let Some(v) = bound {
            *var = VariableRef::Local {
                index: v.index,
                name: v.name.clone(),
            };
        }
    }
    Ok(())
}
