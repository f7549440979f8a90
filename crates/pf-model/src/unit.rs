//! Unit model trait and shared helpers.

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::port::Port;
use crate::state_block::StateBlock;
use pf_core::{ConfigBlock, ConfigValue, VarId};
use std::fmt::{self, Write as _};

/// A piece of equipment built on the flowsheet model.
pub trait UnitModel {
    /// Full unit name, e.g. `fs.heater`.
    fn name(&self) -> &str;

    fn ports(&self) -> Vec<&Port>;

    /// Look up a port by its short name (`inlet`, `outlet`).
    fn port(&self, name: &str) -> ModelResult<&Port> {
        let full = format!("{}.{name}", self.name());
        self.ports()
            .into_iter()
            .find(|p| p.name == full)
            .ok_or(ModelError::UnknownName { name: full })
    }

    /// Move free variables to a good starting point for the solver.
    fn initialize(&self, model: &mut Model) -> ModelResult<()>;

    /// Human-readable summary of unit performance and streams.
    fn report(&self, model: &Model) -> ModelResult<String>;
}

/// Resolve a tri-state option (`useDefault`, true, false) against its parent value.
pub fn resolve_flag(config: &ConfigBlock, key: &str, parent: bool) -> ModelResult<bool> {
    match config.get(key) {
        Some(v) if v.is_use_default() => Ok(parent),
        Some(ConfigValue::Bool(b)) => Ok(*b),
        Some(other) => Err(ModelError::configuration(format!(
            "Option '{key}' must be useDefault or a bool, found {other}"
        ))),
        None => Err(pf_core::PfError::UnknownOption {
            name: key.to_string(),
        }
        .into()),
    }
}

const RULE_WIDTH: usize = 78;

fn fmt_bound(b: Option<f64>) -> String {
    b.map_or_else(|| "None".to_string(), |v| format!("{v}"))
}

/// Render a unit report: performance variables followed by a stream table.
pub(crate) fn render_report(
    model: &Model,
    unit: &str,
    time: f64,
    performance: &[(&str, VarId)],
    streams: &[(&str, &StateBlock)],
) -> ModelResult<String> {
    let columns: Vec<Vec<(String, VarId)>> =
        streams.iter().map(|(_, sb)| sb.port_members()).collect();
    let rows = columns.first().map_or(0, Vec::len);
    if columns.iter().any(|c| c.len() != rows) {
        return Err(ModelError::Construction {
            what: "stream table columns have different members",
        });
    }
    write_report(model, unit, time, performance, streams, &columns).map_err(|_| {
        ModelError::Construction {
            what: "failed to format unit report",
        }
    })
}

fn write_report(
    model: &Model,
    unit: &str,
    time: f64,
    performance: &[(&str, VarId)],
    streams: &[(&str, &StateBlock)],
    columns: &[Vec<(String, VarId)>],
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let header = format!("Unit : {unit}");
    let stamp = format!("Time: {time:.1}");
    let pad = RULE_WIDTH.saturating_sub(header.len() + stamp.len());

    writeln!(out, "{heavy}")?;
    writeln!(out, "{header}{}{stamp}", " ".repeat(pad))?;
    writeln!(out, "{light}")?;
    writeln!(out, "    Unit Performance\n")?;
    writeln!(out, "    Variables:\n")?;
    let key_width = performance
        .iter()
        .map(|(k, _)| k.len())
        .max()
        .unwrap_or(3)
        .max(3);
    writeln!(
        out,
        "    {:<key_width$} : {:>12} : {:>5} : Bounds",
        "Key", "Value", "Fixed"
    )?;
    for (key, id) in performance {
        let (lb, ub) = model.bounds(*id);
        writeln!(
            out,
            "    {:<key_width$} : {:>12.4} : {:>5} : ({}, {})",
            key,
            model.value(*id),
            if model.is_fixed(*id) { "True" } else { "False" },
            fmt_bound(lb),
            fmt_bound(ub),
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{light}")?;
    writeln!(out, "    Stream Table")?;

    if let Some(first) = columns.first() {
        let row_width = first.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        write!(out, "    {:<row_width$}", "")?;
        for (label, _) in streams {
            write!(out, " {label:>12}")?;
        }
        writeln!(out)?;
        for (i, (row, _)) in first.iter().enumerate() {
            write!(out, "    {row:<row_width$}")?;
            for col in columns {
                write!(out, " {:>12.4}", model.value(col[i].1))?;
            }
            writeln!(out)?;
        }
    }
    writeln!(out, "{heavy}")?;
    Ok(out)
}
