//! Parameter decoder shared by every command decoder.
//!
//! The decoding rule is picked from the parameter's declared role, never
//! from the node that happens to be in the file.

use crate::error::Result;
use crate::model::{DataType, ParamValue, ScriptParameter, VariableRef};
use crate::parser::{NodeCursor, Scalar};
use crate::syntax::{ParamRole, ParameterSyntax};

fn role_label(role: ParamRole) -> &'static str {
    match role {
        ParamRole::ReturnValue
        | ParamRole::ReturnValueIf
        | ParamRole::ReturnValueIfStart
        | ParamRole::InterruptReturnValueIf => "return value",
        ParamRole::Variable | ParamRole::RefVar => "variable reference",
        ParamRole::ScriptName => "script name",
        ParamRole::LabelName => "label name",
        ParamRole::LabelNumber => "label number",
        ParamRole::Comment => "comment text",
        ParamRole::ScriptCallArgument => "script call argument",
        ParamRole::RefObject => "reference object",
        ParamRole::Operator => "operator",
        ParamRole::Generic => "parameter",
    }
}

pub fn decode_param(syntax: &ParameterSyntax, cur: &mut NodeCursor) -> Result<ScriptParameter> {
    let what = match syntax.name.as_str() {
        "" => role_label(syntax.role),
        name => name,
    };

    let (data_type, value) = match syntax.role {
        ParamRole::LabelNumber => (DataType::Integer, ParamValue::Int(cur.take_int(what)?)),
        role if role.is_variable() => {
            let var = match cur.take_value(what)? {
                Scalar::Int(slot) => VariableRef::Slot(slot),
                Scalar::String(name) => VariableRef::Global(name),
            };
            (DataType::Variable, ParamValue::Variable(var))
        }
        ParamRole::LabelName => (DataType::Label, ParamValue::String(cur.take_string(what)?)),
        ParamRole::Comment | ParamRole::ScriptName => {
            (DataType::Text, ParamValue::String(cur.take_string(what)?))
        }
        _ => {
            let tag = cur.take_int(&format!("{what} type"))?;
            let value = cur.take_value(what)?;
            (DataType::Tagged(tag), value.into())
        }
    };

    Ok(ScriptParameter {
        syntax: syntax.clone(),
        data_type,
        value,
    })
}

pub fn decode_params<'s>(
    params: impl IntoIterator<Item = &'s ParameterSyntax>,
    cur: &mut NodeCursor,
) -> Result<Vec<ScriptParameter>> {
    params.into_iter().map(|p| decode_param(p, cur)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::value::ValueNode;

    fn decode_one(role: ParamRole, nodes: Vec<ValueNode>) -> Result<ScriptParameter> {
        let node = ValueNode::array(nodes);
        let mut cur = NodeCursor::over(&node, "test command")?;
        let p = decode_param(&ParameterSyntax::new(role, 0), &mut cur)?;
        cur.finish()?;
        Ok(p)
    }

    #[test]
    fn test_decode_by_role() {
        let test_cases = vec![
            (
                ParamRole::LabelNumber,
                vec![ValueNode::int(12)],
                DataType::Integer,
                ParamValue::Int(12),
            ),
            (
                ParamRole::ReturnValue,
                vec![ValueNode::int(3)],
                DataType::Variable,
                ParamValue::Variable(VariableRef::Slot(3)),
            ),
            (
                ParamRole::InterruptReturnValueIf,
                vec![ValueNode::string("g_score")],
                DataType::Variable,
                ParamValue::Variable(VariableRef::Global("g_score".into())),
            ),
            (
                ParamRole::LabelName,
                vec![ValueNode::string("Start")],
                DataType::Label,
                ParamValue::String("Start".into()),
            ),
            (
                ParamRole::Comment,
                vec![ValueNode::string("hi")],
                DataType::Text,
                ParamValue::String("hi".into()),
            ),
            (
                ParamRole::Generic,
                vec![ValueNode::int(2), ValueNode::string("door")],
                DataType::Tagged(2),
                ParamValue::String("door".into()),
            ),
            (
                ParamRole::ScriptCallArgument,
                vec![ValueNode::int(1), ValueNode::int(-9)],
                DataType::Tagged(1),
                ParamValue::Int(-9),
            ),
        ];

        for (role, nodes, data_type, value) in test_cases {
            let p = decode_one(role, nodes).unwrap();
            assert_eq!(p.data_type, data_type, "{role:?}");
            assert_eq!(p.value, value, "{role:?}");
        }
    }

    #[test]
    fn test_fixed_roles_reject_wrong_node() {
        assert!(decode_one(ParamRole::LabelNumber, vec![ValueNode::string("5")]).is_err());
        assert!(decode_one(ParamRole::ScriptName, vec![ValueNode::int(5)]).is_err());
        // generic needs both the tag and the value
        assert!(decode_one(ParamRole::Generic, vec![ValueNode::int(1)]).is_err());
    }
}
