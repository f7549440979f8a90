//! Ports: named groups of boundary variables.

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use pf_core::VarId;

/// A named set of state variables exposed at a unit boundary.
///
/// Members are the FTPx variables of a state block, addressed by short names
/// such as `flow_mol` or `mole_frac_comp[benzene]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub name: String,
    members: Vec<(String, VarId)>,
}

impl Port {
    pub fn new(name: impl Into<String>, members: Vec<(String, VarId)>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn members(&self) -> &[(String, VarId)] {
        &self.members
    }

    pub fn member(&self, name: &str) -> ModelResult<VarId> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
            .ok_or_else(|| ModelError::UnknownName {
                name: format!("{}.{name}", self.name),
            })
    }

    /// Fix one member to a value.
    pub fn fix(&self, model: &mut Model, member: &str, value: f64) -> ModelResult<()> {
        let id = self.member(member)?;
        model.fix(id, value);
        Ok(())
    }

    /// Fix every member.
    pub fn fix_all(&self, model: &mut Model) {
        for (_, id) in &self.members {
            let v = model.value(*id);
            model.fix(*id, v);
        }
    }

    pub fn unfix_all(&self, model: &mut Model) {
        for (_, id) in &self.members {
            model.unfix(*id);
        }
    }

    /// Check that another port carries the same member names in the same order.
    pub fn is_compatible(&self, other: &Port) -> bool {
        self.members.len() == other.members.len()
            && self
                .members
                .iter()
                .zip(&other.members)
                .all(|((a, _), (b, _))| a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_lookup_and_fix() {
        let mut m = Model::new();
        let f = m.add_var("s.flow_mol", 0.0).unwrap();
        let t = m.add_var("s.temperature", 0.0).unwrap();
        let port = Port::new(
            "fs.unit.inlet",
            vec![("flow_mol".into(), f), ("temperature".into(), t)],
        );
        port.fix(&mut m, "temperature", 3.0).unwrap();
        assert!(m.is_fixed(t));
        assert_eq!(m.value(t), 3.0);

        let err = port.member("pressure").unwrap_err();
        assert!(err.to_string().contains("fs.unit.inlet.pressure"));

        port.fix_all(&mut m);
        assert!(m.is_fixed(f));
        port.unfix_all(&mut m);
        assert!(!m.is_fixed(f) && !m.is_fixed(t));
    }

    #[test]
    fn compatibility_requires_same_members() {
        let mut m = Model::new();
        let a = m.add_var("a", 0.0).unwrap();
        let b = m.add_var("b", 0.0).unwrap();
        let p1 = Port::new("p1", vec![("flow_mol".into(), a)]);
        let p2 = Port::new("p2", vec![("flow_mol".into(), b)]);
        let p3 = Port::new("p3", vec![("pressure".into(), b)]);
        assert!(p1.is_compatible(&p2));
        assert!(!p1.is_compatible(&p3));
    }
}
