//! Command-syntax table: what parameters each command ID takes, per
//! engine version. The table is supplied by the caller and only read
//! during a parse.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Result};

/// Command IDs with fixed meaning to the reader.
pub mod ids {
    pub const NOP: i64 = 0;
    pub const LABEL: i64 = 1;
    pub const GOTO: i64 = 2;
    pub const GOSUB: i64 = 3;
    pub const ELSE: i64 = 10;
    pub const BREAK: i64 = 11;
    pub const CONTINUE: i64 = 12;
    pub const END: i64 = 13;
    pub const COMMENT: i64 = 14;
    pub const COMMENTED: i64 = 15;
    /// Jump emitted by the compiler; never part of the editable program.
    pub const HIDDEN_JUMP: i64 = 99;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameVersion(pub i64);

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRole {
    ReturnValue,
    ReturnValueIf,
    ReturnValueIfStart,
    InterruptReturnValueIf,
    Variable,
    RefVar,
    ScriptName,
    LabelName,
    LabelNumber,
    Comment,
    ScriptCallArgument,
    RefObject,
    Operator,
    Generic,
}

impl ParamRole {
    /// Roles whose node always holds a variable reference, whatever its tag.
    pub fn is_variable(self) -> bool {
        matches!(
            self,
            ParamRole::Variable
                | ParamRole::RefVar
                | ParamRole::ReturnValue
                | ParamRole::ReturnValueIf
                | ParamRole::ReturnValueIfStart
                | ParamRole::InterruptReturnValueIf
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSyntax {
    pub role: ParamRole,
    /// Physical slot of the parameter inside the command.
    pub position: usize,
    #[serde(default)]
    pub name: String,
}

impl ParameterSyntax {
    pub fn new(role: ParamRole, position: usize) -> Self {
        ParameterSyntax {
            role,
            position,
            name: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    Standard,
    Auxiliary,
    ScriptCall,
    Expression,
    CommentMarker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSyntax {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// Empty means the command exists in every version.
    #[serde(default)]
    pub versions: Vec<GameVersion>,
    pub command_type: CommandType,
    #[serde(default)]
    pub params: Vec<ParameterSyntax>,
}

impl CommandSyntax {
    pub fn supports(&self, version: GameVersion) -> bool {
        self.versions.is_empty() || self.versions.contains(&version)
    }

    pub fn param(&self, slot: usize) -> Result<&ParameterSyntax> {
        self.params.get(slot).ok_or(FormatError::OutOfRange {
            what: "parameter syntax",
            index: slot as i64,
            len: self.params.len(),
        })
    }
}

/// Read-only source of command syntax.
pub trait SyntaxLookup {
    fn find(&self, id: i64, version: GameVersion) -> Result<&CommandSyntax>;
}

/// In-memory syntax table, usually loaded from JSON.
#[derive(Debug, Default, Clone)]
pub struct SyntaxTable {
    by_id: HashMap<i64, Vec<CommandSyntax>>,
}

#[derive(Deserialize)]
struct TableFile {
    commands: Vec<CommandSyntax>,
}

impl SyntaxTable {
    pub fn new(commands: Vec<CommandSyntax>) -> Self {
        let mut by_id: HashMap<i64, Vec<CommandSyntax>> = HashMap::new();
        for cmd in commands {
            by_id.entry(cmd.id).or_default().push(cmd);
        }
        SyntaxTable { by_id }
    }

    /// `{"commands": [ {id, name, versions, command_type, params}, ... ]}`
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let file: TableFile = serde_json::from_str(json)?;
        Ok(Self::new(file.commands))
    }

    pub fn len(&self) -> usize {
        self.by_id.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl SyntaxLookup for SyntaxTable {
    fn find(&self, id: i64, version: GameVersion) -> Result<&CommandSyntax> {
        self.by_id
            .get(&id)
            .and_then(|variants| variants.iter().find(|c| c.supports(version)))
            .ok_or(FormatError::UnknownCommand { id, version })
    }
}
