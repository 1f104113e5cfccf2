//! Views of a registry's bindings for `bparam list` and `bparam show`.

use serde::Serialize;

use bindparam_core::ops::ParamOp;
use bindparam_engine::{BindingManifest, Registry, RegistryError};

#[derive(Debug, Clone, Serialize)]
pub struct BindingSummary {
    pub name: String,
    pub description: String,
    pub params: usize,
    pub inputs: usize,
    pub outputs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamRow {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub flag: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub default: String,
    pub required: bool,
    pub input: bool,
    pub persistent: bool,
    pub serializable: bool,
    pub description: String,
}

/// One line per stored binding, in name order
pub fn summarize(manifest: &BindingManifest, registry: &Registry) -> Vec<BindingSummary> {
    registry
        .bindings()
        .into_iter()
        .filter_map(|name| {
            let snap = registry.snapshot(name)?;
            let inputs = snap.iter().filter(|p| p.input).count();
            Some(BindingSummary {
                name: name.to_string(),
                description: manifest
                    .binding(name)
                    .map(|b| b.description.clone())
                    .unwrap_or_default(),
                params: snap.len(),
                inputs,
                outputs: snap.len() - inputs,
            })
        })
        .collect()
}

/// Every parameter visible to `binding` (its own plus persistent ones)
pub fn param_rows(registry: &Registry, binding: &str) -> Result<Vec<ParamRow>, RegistryError> {
    if registry.snapshot(binding).is_none() {
        return Err(RegistryError::UnknownBinding(binding.to_string()));
    }
    let ctx = registry.execution(binding)?;
    let text = |id: &str, op: ParamOp| -> Result<String, RegistryError> {
        Ok(ctx.dispatch(id, op)?.as_text().unwrap_or_default().to_string())
    };

    ctx.active()
        .iter()
        .map(|p| -> Result<ParamRow, RegistryError> {
            Ok(ParamRow {
                name: p.name.clone(),
                alias: p.alias.map(|a| format!("-{}", a)),
                flag: text(&p.name, ParamOp::GetPrintableParamName)?,
                type_name: text(&p.name, ParamOp::GetPrintableType)?,
                default: text(&p.name, ParamOp::DefaultParam)?,
                required: p.required,
                input: p.input,
                persistent: p.persistent,
                serializable: ctx.dispatch(&p.name, ParamOp::IsSerializable)?.as_flag().unwrap_or(false),
                description: p.desc.clone(),
            })
        })
        .collect()
}

/// Plain-text table of parameter rows
pub fn render_rows(rows: &[ParamRow]) -> String {
    let headers = ["OPTION", "ALIAS", "TYPE", "DEFAULT", "NOTES"];
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|r| {
            let mut notes = Vec::new();
            if r.required {
                notes.push("required");
            }
            if !r.input {
                notes.push("output");
            }
            if r.persistent {
                notes.push("global");
            }
            [
                r.flag.clone(),
                r.alias.clone().unwrap_or_default(),
                r.type_name.clone(),
                r.default.clone(),
                notes.join(", "),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.len());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let mut push_line = |cols: [&str; 5]| {
        let line: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };
    push_line(headers);
    for row in &cells {
        push_line([row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str(), row[4].as_str()]);
    }
    out
}
