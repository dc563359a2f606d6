//! Plain-text listing of a decoded script, one command per line.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::{DataType, ParamValue, ScriptCommand, ScriptFile, ScriptParameter, VariableKind, VariableRef};

pub fn emit(script: &ScriptFile, out_dir: &Path) -> io::Result<PathBuf> {
    let path = super::output_path(out_dir, &script.name, "txt");
    fs::write(&path, render(script))?;
    Ok(path)
}

pub fn render(script: &ScriptFile) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_script(&mut out, script);
    out
}

fn write_script(out: &mut String, script: &ScriptFile) -> std::fmt::Result {
    writeln!(
        out,
        "script {} (engine {}, format {}{})",
        script.name,
        script.engine_version,
        script.format_version,
        if script.live_data { ", live" } else { "" }
    )?;
    if !script.description.is_empty() {
        writeln!(out, "// {}", script.description)?;
    }

    writeln!(out, "variables:")?;
    for var in &script.variables {
        match var.kind {
            VariableKind::Argument => writeln!(
                out,
                "  {:>3} arg {} [type {}] {}",
                var.index,
                var.name,
                var.value_type.unwrap_or_default(),
                var.description.as_deref().unwrap_or("")
            )?,
            VariableKind::Variable => writeln!(out, "  {:>3} var {}", var.index, var.name)?,
        }
    }

    writeln!(out, "commands:")?;
    for (line, cmd) in script.commands.iter().enumerate() {
        writeln!(out, "  {line:04} {}", command_line(cmd))?;
    }
    Ok(())
}

pub fn command_line(cmd: &ScriptCommand) -> String {
    let name = match cmd.syntax.name.as_str() {
        "" => format!("cmd#{}", cmd.id()),
        name => name.to_string(),
    };
    if cmd.parameters.is_empty() {
        return name;
    }
    let params: Vec<String> = cmd.parameters.iter().map(param_text).collect();
    format!("{name} {}", params.join(", "))
}

fn param_text(p: &ScriptParameter) -> String {
    match (&p.data_type, &p.value) {
        (DataType::Operator, ParamValue::Int(op)) => format!("op#{op}"),
        (_, ParamValue::Int(v)) => v.to_string(),
        (_, ParamValue::String(s)) => format!("{s:?}"),
        (_, ParamValue::Label(l)) => format!("@{l}"),
        (_, ParamValue::Variable(VariableRef::Local { name, .. })) => format!("${name}"),
        (_, ParamValue::Variable(VariableRef::Global(name))) => format!("::{name}"),
        (_, ParamValue::Variable(VariableRef::Slot(slot))) => format!("$#{slot}"),
    }
}
