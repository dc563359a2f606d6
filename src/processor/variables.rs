//! Variable table builder.

use log::trace;

use crate::error::{FormatError, Result};
use crate::model::{ScriptVariable, VariableKind};
use crate::parser::NodeCursor;
use crate::parser::value::{ValueNode, read_array, read_string};

/// Build the variable table from the locals and arguments arrays.
///
/// Arguments share the locals' index space: argument `n` promotes local
/// `n` in place, so there can never be more arguments than locals.
pub fn build_variables(locals: &ValueNode, arguments: &ValueNode) -> Result<Vec<ScriptVariable>> {
    let locals = read_array(locals, "script variables")?;
    let arguments = read_array(arguments, "script arguments")?;

    let mut vars = locals
        .iter()
        .enumerate()
        .map(|(i, node)| {
            Ok(ScriptVariable {
                kind: VariableKind::Variable,
                name: read_string(node, "script variable name")?,
                index: i + 1,
                value_type: None,
                description: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if arguments.len() > vars.len() {
        return Err(FormatError::OutOfRange {
            what: "script argument",
            index: arguments.len() as i64,
            len: vars.len(),
        });
    }

    for (var, node) in vars.iter_mut().zip(arguments) {
        let mut cur = NodeCursor::over(node, "script argument")?;
        let value_type = cur.take_int("script argument type")?;
        let description = cur.take_string("script argument description")?;
        cur.finish()?;

        var.kind = VariableKind::Argument;
        var.value_type = Some(value_type);
        var.description = Some(description);
    }

    trace!(
        "variable table: {} locals, {} arguments",
        vars.len(),
        arguments.len()
    );
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> ValueNode {
        ValueNode::array(names.iter().map(|n| ValueNode::string(*n)).collect())
    }

    fn arg(ty: i64, desc: &str) -> ValueNode {
        ValueNode::array(vec![ValueNode::int(ty), ValueNode::string(desc)])
    }

    #[test]
    fn test_arguments_overlay_first_locals() {
        let locals = names(&["count", "target", "tmp"]);
        let args = ValueNode::array(vec![arg(1, "how many"), arg(4, "who")]);

        let vars = build_variables(&locals, &args).unwrap();

        assert_eq!(vars.len(), 3);
        for (i, v) in vars.iter().enumerate() {
            assert_eq!(v.index, i + 1);
        }
        assert_eq!(vars[0].kind, VariableKind::Argument);
        assert_eq!(vars[0].value_type, Some(1));
        assert_eq!(vars[0].description.as_deref(), Some("how many"));
        assert_eq!(vars[1].kind, VariableKind::Argument);
        assert_eq!(vars[1].name, "target");
        assert_eq!(vars[2].kind, VariableKind::Variable);
        assert_eq!(vars[2].value_type, None);
    }

    #[test]
    fn test_empty_tables_in_both_forms() {
        let test_cases = vec![
            (ValueNode::array(vec![]), ValueNode::array(vec![])),
            (ValueNode::int(0), ValueNode::int(0)),
        ];
        for (locals, args) in test_cases {
            assert!(build_variables(&locals, &args).unwrap().is_empty());
        }
    }

    #[test]
    fn test_more_arguments_than_locals_fails() {
        let locals = names(&["a"]);
        let args = ValueNode::array(vec![arg(1, "x"), arg(1, "y")]);
        assert!(matches!(
            build_variables(&locals, &args),
            Err(FormatError::OutOfRange {
                what: "script argument",
                ..
            })
        ));
    }

    #[test]
    fn test_non_string_name_fails() {
        let locals = ValueNode::array(vec![ValueNode::int(3)]);
        let err = build_variables(&locals, &ValueNode::int(0)).unwrap_err();
        assert!(err.to_string().contains("script variable name"));
    }
}
