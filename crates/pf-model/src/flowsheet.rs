//! Flowsheet: the model plus property package and unit registries.

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::port::Port;
use pf_core::{ConstraintId, UnitId};
use pf_props::PropertyPackage;
use std::sync::Arc;
use tracing::debug;

/// Flowsheet-level options inherited by units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlowsheetConfig {
    pub dynamic: bool,
}

/// Equality link from an outlet port to an inlet port.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub name: String,
    pub source: String,
    pub destination: String,
    pub constraints: Vec<ConstraintId>,
}

/// Top-level block (`fs`) owning the model.
#[derive(Debug)]
pub struct Flowsheet {
    pub name: String,
    config: FlowsheetConfig,
    time: Vec<f64>,
    model: Model,
    packages: Vec<(String, Arc<dyn PropertyPackage>)>,
    units: Vec<String>,
    connections: Vec<Connection>,
}

impl Flowsheet {
    /// Create a flowsheet named `fs` with the single time point `0.0`.
    pub fn new(config: FlowsheetConfig) -> Self {
        Self {
            name: "fs".to_string(),
            config,
            time: vec![0.0],
            model: Model::new(),
            packages: Vec::new(),
            units: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn config(&self) -> FlowsheetConfig {
        self.config
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Register a property package. The first one registered is the default.
    pub fn add_property_package(
        &mut self,
        name: impl Into<String>,
        package: Arc<dyn PropertyPackage>,
    ) -> ModelResult<()> {
        let name = name.into();
        if self.packages.iter().any(|(n, _)| *n == name) {
            return Err(ModelError::DuplicateName { name });
        }
        debug!(package = %name, backend = package.name(), "registered property package");
        self.packages.push((name, package));
        Ok(())
    }

    pub fn property_package(&self, name: &str) -> ModelResult<Arc<dyn PropertyPackage>> {
        self.packages
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.clone())
            .ok_or_else(|| ModelError::UnknownPackage {
                name: name.to_string(),
            })
    }

    pub fn default_property_package(&self) -> ModelResult<Arc<dyn PropertyPackage>> {
        self.packages
            .first()
            .map(|(_, p)| p.clone())
            .ok_or_else(|| ModelError::UnknownPackage {
                name: "default".to_string(),
            })
    }

    /// Reserve a unit name and return its full path.
    pub fn register_unit(&mut self, name: &str) -> ModelResult<(UnitId, String)> {
        if name.is_empty() || name.contains('.') {
            return Err(ModelError::Construction {
                what: "unit names must be non-empty and contain no '.'",
            });
        }
        if self.units.iter().any(|u| u == name) {
            return Err(ModelError::DuplicateName {
                name: name.to_string(),
            });
        }
        let id = UnitId::from_index(self.units.len() as u32);
        self.units.push(name.to_string());
        Ok((id, format!("{}.{name}", self.name)))
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// Connect `source` to `destination` with one equality per port member.
    pub fn connect(
        &mut self,
        name: &str,
        source: &Port,
        destination: &Port,
    ) -> ModelResult<()> {
        if !source.is_compatible(destination) {
            return Err(ModelError::PortMismatch {
                source_port: source.name.clone(),
                destination: destination.name.clone(),
                what: "ports carry different members",
            });
        }
        let full = format!("{}.{name}", self.name);
        if self.connections.iter().any(|c| c.name == full) {
            return Err(ModelError::DuplicateName { name: full });
        }

        let mut constraints = Vec::with_capacity(source.members().len());
        for ((member, src), (_, dst)) in source.members().iter().zip(destination.members()) {
            let (src, dst) = (*src, *dst);
            let id = self.model.add_constraint(
                format!("{full}_expanded.{member}_equality"),
                vec![src, dst],
                1.0,
                move |v| Ok(v[src] - v[dst]),
            )?;
            constraints.push(id);
        }
        debug!(arc = %full, source = %source.name, destination = %destination.name, "connected ports");
        self.connections.push(Connection {
            name: full,
            source: source.name.clone(),
            destination: destination.name.clone(),
            constraints,
        });
        Ok(())
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn degrees_of_freedom(&self) -> i64 {
        self.model.degrees_of_freedom()
    }
}
