//! In-memory program model produced by the reader.
//!
//! Everything here is owned and detached from the value tree it was
//! decoded from; the writer stage only ever sees these types.

use serde::{Serialize, Serializer};

use crate::parser::Scalar;
use crate::syntax::{CommandSyntax, GameVersion, ParameterSyntax};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Variable,
    Argument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptVariable {
    pub kind: VariableKind,
    pub name: String,
    /// 1-based; arguments always occupy the first slots.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Integer,
    Text,
    Variable,
    Label,
    Operator,
    /// Type tag stored in the file next to a generic value.
    Tagged(i64),
}

/// Variable operand of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableRef {
    /// Raw slot number as stored in the file.
    Slot(i64),
    /// Name not found in the script's own table (engine globals).
    Global(String),
    /// Bound to an entry of `ScriptFile::variables`.
    Local { index: usize, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    Int(i64),
    String(String),
    Variable(VariableRef),
    Label(String),
}

impl From<Scalar> for ParamValue {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Int(v) => ParamValue::Int(v),
            Scalar::String(s) => ParamValue::String(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptParameter {
    pub syntax: ParameterSyntax,
    pub data_type: DataType,
    pub value: ParamValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptCommand {
    /// Standard-stream slot an auxiliary command is anchored to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_index: Option<usize>,
    #[serde(rename = "command", serialize_with = "syntax_header")]
    pub syntax: CommandSyntax,
    pub parameters: Vec<ScriptParameter>,
}

impl ScriptCommand {
    pub fn id(&self) -> i64 {
        self.syntax.id
    }
}

fn syntax_header<S: Serializer>(syntax: &CommandSyntax, s: S) -> Result<S::Ok, S::Error> {
    if syntax.name.is_empty() {
        s.serialize_i64(syntax.id)
    } else {
        s.serialize_str(&syntax.name)
    }
}

/// One fully decoded script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptFile {
    pub name: String,
    pub engine_version: GameVersion,
    pub description: String,
    pub format_version: i64,
    pub live_data: bool,
    pub variables: Vec<ScriptVariable>,
    pub commands: Vec<ScriptCommand>,
    pub command_id: Scalar,
}

impl ScriptFile {
    pub fn variable(&self, index: usize) -> Option<&ScriptVariable> {
        index.checked_sub(1).and_then(|i| self.variables.get(i))
    }
}
