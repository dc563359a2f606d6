//! Command dispatcher and the five command decoding strategies.

use log::trace;

use crate::error::{FormatError, Result};
use crate::model::{DataType, ParamValue, ScriptCommand, ScriptParameter};
use crate::parser::NodeCursor;
use crate::parser::value::{ValueNode, read_array, read_int};
use crate::syntax::{CommandSyntax, CommandType, GameVersion, ParameterSyntax, SyntaxLookup, ids};

use super::params::{decode_param, decode_params};

/// Which of the two raw command arrays a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Standard,
    Auxiliary,
}

impl Stream {
    fn name(self) -> &'static str {
        match self {
            Stream::Standard => "standard",
            Stream::Auxiliary => "auxiliary",
        }
    }

    /// Child slot holding the command ID.
    fn id_slot(self) -> usize {
        match self {
            Stream::Standard => 0,
            Stream::Auxiliary => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandDecoder {
    Standard,
    AuxiliarySimple,
    Commented,
    ScriptCall,
    Expression,
}

impl CommandDecoder {
    pub fn select(stream: Stream, syntax: &CommandSyntax) -> Result<Self> {
        let decoder = match stream {
            Stream::Auxiliary => match syntax.id {
                ids::COMMENTED => Some(CommandDecoder::Commented),
                ids::ELSE | ids::BREAK | ids::CONTINUE | ids::END | ids::NOP | ids::COMMENT => {
                    Some(CommandDecoder::AuxiliarySimple)
                }
                _ => None,
            },
            Stream::Standard => match syntax.command_type {
                CommandType::Standard => Some(CommandDecoder::Standard),
                CommandType::ScriptCall => Some(CommandDecoder::ScriptCall),
                CommandType::Expression => Some(CommandDecoder::Expression),
                CommandType::Auxiliary | CommandType::CommentMarker => None,
            },
        };
        decoder.ok_or_else(|| FormatError::WrongStream {
            id: syntax.id,
            name: syntax.name.clone(),
            stream: stream.name(),
        })
    }

    pub fn decode(self, syntax: &CommandSyntax, cur: &mut NodeCursor) -> Result<ScriptCommand> {
        let (ref_index, parameters) = match self {
            CommandDecoder::Standard => {
                cur.take("command id")?;
                (None, decode_params(&syntax.params, cur)?)
            }
            CommandDecoder::AuxiliarySimple => {
                let ref_index = take_ref_index(cur)?;
                cur.take("command id")?;
                let parameters = match syntax.id {
                    ids::COMMENT => vec![decode_param(syntax.param(0)?, cur)?],
                    _ => Vec::new(),
                };
                (Some(ref_index), parameters)
            }
            CommandDecoder::Commented => {
                return Err(FormatError::Unsupported(format!(
                    "commented-out command at position {}",
                    cur.position()
                )));
            }
            CommandDecoder::ScriptCall => {
                cur.take("command id")?;
                (None, decode_script_call(syntax, cur)?)
            }
            CommandDecoder::Expression => {
                cur.take("command id")?;
                (None, decode_expression(syntax, cur)?)
            }
        };

        Ok(ScriptCommand {
            ref_index,
            syntax: syntax.clone(),
            parameters,
        })
    }
}

fn take_ref_index(cur: &mut NodeCursor) -> Result<usize> {
    let raw = cur.take_int("reference index")?;
    usize::try_from(raw).map_err(|_| FormatError::OutOfRange {
        what: "auxiliary reference",
        index: raw,
        len: 0,
    })
}

/// `target, return value, reference object, N, arg * N`
fn decode_script_call(syntax: &CommandSyntax, cur: &mut NodeCursor) -> Result<Vec<ScriptParameter>> {
    if syntax.params.len() < 4 {
        return Err(FormatError::CountMismatch {
            expected: 4,
            actual: syntax.params.len(),
            context: format!("script call syntax of {}", syntax.name),
        });
    }
    let mut params = decode_params(&syntax.params[..3], cur)?;

    let argc = cur.take_count("script call argument count")?;
    let arg = &syntax.params[3];
    for _ in 0..argc {
        params.push(decode_param(arg, cur)?);
    }
    Ok(params)
}

/// Return value, then the operand pool, then the infix token list. A
/// positive token is an operator; `-k` stands for operand `k` (1-based).
fn decode_expression(syntax: &CommandSyntax, cur: &mut NodeCursor) -> Result<Vec<ScriptParameter>> {
    let ret = decode_param(syntax.param(0)?, cur)?;
    let operator = syntax.param(1)?;

    let postfix_len = cur.take_count("postfix count")?;
    let postfix = (0..postfix_len)
        .map(|_| decode_param(operator, cur))
        .collect::<Result<Vec<_>>>()?;

    let infix_len = cur.take_count("infix count")?;
    let mut params = Vec::with_capacity(infix_len + 1);
    params.push(ret);
    for _ in 0..infix_len {
        let token = cur.take_int("infix token")?;
        params.push(expand_token(token, &postfix, operator)?);
    }
    Ok(params)
}

fn expand_token(
    token: i64,
    postfix: &[ScriptParameter],
    operator: &ParameterSyntax,
) -> Result<ScriptParameter> {
    if token > 0 {
        return Ok(ScriptParameter {
            syntax: operator.clone(),
            data_type: DataType::Operator,
            value: ParamValue::Int(token),
        });
    }

    let operand = usize::try_from(token.unsigned_abs())
        .ok()
        .and_then(|k| k.checked_sub(1))
        .and_then(|i| postfix.get(i));
    operand.cloned().ok_or(FormatError::OutOfRange {
        what: "postfix operand",
        index: token,
        len: postfix.len(),
    })
}

/// Looks up syntax for raw command nodes and runs the matching decoder.
pub struct CommandReader<'t> {
    lookup: &'t dyn SyntaxLookup,
    version: GameVersion,
}

impl<'t> CommandReader<'t> {
    pub fn new(lookup: &'t dyn SyntaxLookup, version: GameVersion) -> Self {
        CommandReader { lookup, version }
    }

    pub fn read(&self, stream: Stream, node: &ValueNode, index: usize) -> Result<ScriptCommand> {
        let context = format!("{} command {index}", stream.name());
        let children = read_array(node, &context)?;
        let id_node = children
            .get(stream.id_slot())
            .ok_or_else(|| FormatError::MissingNode {
                context: format!("command id ({context})"),
            })?;
        let id = read_int(id_node, &format!("command id ({context})"))?;

        let syntax = self.lookup.find(id, self.version)?;
        let decoder = CommandDecoder::select(stream, syntax)?;
        trace!("{context}: id {id} ({}) via {decoder:?}", syntax.name);

        let mut cur = NodeCursor::over(node, context)?;
        let cmd = decoder.decode(syntax, &mut cur)?;
        cur.finish()?;
        Ok(cmd)
    }

    pub fn read_all(&self, stream: Stream, array: &ValueNode) -> Result<Vec<ScriptCommand>> {
        read_array(array, &format!("{} commands", stream.name()))?
            .iter()
            .enumerate()
            .map(|(i, node)| self.read(stream, node, i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VariableRef;
    use crate::syntax::{ParamRole, SyntaxTable};

    fn cmd(id: i64, name: &str, ty: CommandType, roles: &[ParamRole]) -> CommandSyntax {
        CommandSyntax {
            id,
            name: name.into(),
            versions: vec![],
            command_type: ty,
            params: roles
                .iter()
                .enumerate()
                .map(|(i, r)| ParameterSyntax::new(*r, i))
                .collect(),
        }
    }

    fn table() -> SyntaxTable {
        use ParamRole::*;
        SyntaxTable::new(vec![
            cmd(ids::NOP, "NOP", CommandType::Standard, &[]),
            cmd(ids::ELSE, "ELSE", CommandType::Auxiliary, &[]),
            cmd(ids::COMMENT, "COMMENT", CommandType::Auxiliary, &[Comment]),
            cmd(ids::COMMENTED, "COMMENTED", CommandType::CommentMarker, &[]),
            cmd(40, "SET", CommandType::Standard, &[Variable, Generic]),
            cmd(
                50,
                "CALL",
                CommandType::ScriptCall,
                &[ScriptName, ReturnValue, RefObject, ScriptCallArgument],
            ),
            cmd(60, "EXPR", CommandType::Expression, &[ReturnValue, Operator]),
        ])
    }

    fn read(stream: Stream, nodes: Vec<ValueNode>) -> Result<ScriptCommand> {
        let table = table();
        let reader = CommandReader::new(&table, GameVersion(1));
        reader.read(stream, &ValueNode::array(nodes), 0)
    }

    fn int(v: i64) -> ValueNode {
        ValueNode::int(v)
    }

    #[test]
    fn test_standard_reads_declared_params() {
        let c = read(
            Stream::Standard,
            vec![int(40), int(2), int(1), ValueNode::string("x")],
        )
        .unwrap();
        assert_eq!(c.ref_index, None);
        assert_eq!(c.parameters.len(), 2);
        assert_eq!(
            c.parameters[0].value,
            ParamValue::Variable(VariableRef::Slot(2))
        );
        assert_eq!(c.parameters[1].data_type, DataType::Tagged(1));
    }

    #[test]
    fn test_standard_rejects_extra_nodes() {
        let err = read(Stream::Standard, vec![int(ids::NOP), int(1)]).unwrap_err();
        assert!(matches!(err, FormatError::TrailingNodes { count: 1, .. }));
    }

    #[test]
    fn test_auxiliary_id_is_second_child() {
        let c = read(Stream::Auxiliary, vec![int(3), int(ids::ELSE)]).unwrap();
        assert_eq!(c.ref_index, Some(3));
        assert_eq!(c.id(), ids::ELSE);
        assert!(c.parameters.is_empty());

        let c = read(
            Stream::Auxiliary,
            vec![int(0), int(ids::COMMENT), ValueNode::string("todo")],
        )
        .unwrap();
        assert_eq!(c.parameters[0].value, ParamValue::String("todo".into()));
    }

    #[test]
    fn test_commented_command_always_fails() {
        let err = read(Stream::Auxiliary, vec![int(0), int(ids::COMMENTED)]).unwrap_err();
        assert!(matches!(err, FormatError::Unsupported(_)));
    }

    #[test]
    fn test_stream_mismatch() {
        assert!(matches!(
            read(Stream::Auxiliary, vec![int(0), int(40)]),
            Err(FormatError::WrongStream { id: 40, .. })
        ));
        assert!(matches!(
            read(Stream::Standard, vec![int(ids::COMMENTED)]),
            Err(FormatError::WrongStream { .. })
        ));
        // auxiliary-only commands never appear in the standard array
        for id in [ids::ELSE, ids::COMMENT] {
            assert!(matches!(
                read(Stream::Standard, vec![int(id)]),
                Err(FormatError::WrongStream { stream: "standard", .. })
            ));
        }
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            read(Stream::Standard, vec![int(777)]),
            Err(FormatError::UnknownCommand { id: 777, .. })
        ));
    }

    #[test]
    fn test_negative_ref_index() {
        assert!(read(Stream::Auxiliary, vec![int(-1), int(ids::ELSE)]).is_err());
    }

    #[test]
    fn test_script_call_arguments() {
        let c = read(
            Stream::Standard,
            vec![
                int(50),
                ValueNode::string("OpenDoor"),
                int(1),
                int(0),
                int(0),
                int(2),
                int(1),
                int(10),
                int(2),
                ValueNode::string("north"),
            ],
        )
        .unwrap();
        assert_eq!(c.parameters.len(), 5);
        assert_eq!(c.parameters[0].value, ParamValue::String("OpenDoor".into()));
        assert_eq!(c.parameters[3].value, ParamValue::Int(10));
        assert_eq!(c.parameters[4].data_type, DataType::Tagged(2));
        assert_eq!(c.parameters[4].value, ParamValue::String("north".into()));
    }

    #[test]
    fn test_expression_rebuilds_infix_order() {
        // postfix pool [a, b], infix [-1, +7, -2] -> a OP b
        let c = read(
            Stream::Standard,
            vec![
                int(60),
                int(1),
                int(2),
                int(0),
                ValueNode::string("a"),
                int(0),
                ValueNode::string("b"),
                int(3),
                int(-1),
                int(7),
                int(-2),
            ],
        )
        .unwrap();

        let values: Vec<_> = c.parameters.iter().map(|p| p.value.clone()).collect();
        assert_eq!(
            values,
            vec![
                ParamValue::Variable(VariableRef::Slot(1)),
                ParamValue::String("a".into()),
                ParamValue::Int(7),
                ParamValue::String("b".into()),
            ]
        );
        assert_eq!(c.parameters[2].data_type, DataType::Operator);
    }

    #[test]
    fn test_huge_counts_are_format_errors() {
        let test_cases = vec![
            // expression: postfix count
            vec![int(60), int(1), int(i64::MAX)],
            // expression: infix count
            vec![int(60), int(1), int(0), int(i64::MAX)],
            // script call: argument count
            vec![
                int(50),
                ValueNode::string("S"),
                int(1),
                int(0),
                int(0),
                int(i64::MAX),
            ],
        ];

        for nodes in test_cases {
            let err = read(Stream::Standard, nodes).unwrap_err();
            assert!(
                matches!(err, FormatError::SizeMismatch { declared: i64::MAX, actual: 0, .. }),
                "{err}"
            );
        }
    }

    #[test]
    fn test_expression_bad_operand_index() {
        let test_cases = vec![-2, 0];
        for token in test_cases {
            let err = read(
                Stream::Standard,
                vec![int(60), int(1), int(1), int(0), int(5), int(1), int(token)],
            )
            .unwrap_err();
            assert!(
                matches!(err, FormatError::OutOfRange { what: "postfix operand", .. }),
                "token {token}: {err}"
            );
        }
    }
}
