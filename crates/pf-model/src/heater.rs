//! Steady-state heater: one control volume with heat transfer.

use crate::control_volume::{
    ControlVolume0D, EnergyBalanceType, MaterialBalanceType, MomentumBalanceType,
};
use crate::error::{ModelError, ModelResult};
use crate::flowsheet::Flowsheet;
use crate::model::Model;
use crate::port::Port;
use crate::unit::{UnitModel, render_report, resolve_flag};
use pf_core::{ConfigBlock, ConfigValue, Domain, UnitId, VarId};
use std::collections::BTreeMap;
use tracing::debug;

pub const DYNAMIC_NOT_SUPPORTED: &str = "Heater unit model does not support dynamic behavior";
pub const HOLDUP_NOT_SUPPORTED: &str = "Heater unit model does not support holdup";

fn tri_state() -> Domain {
    Domain::In(vec![
        ConfigValue::use_default(),
        ConfigValue::Bool(true),
        ConfigValue::Bool(false),
    ])
}

/// Heater unit model.
///
/// Material, energy and momentum balances come from a [`ControlVolume0D`];
/// the heater adds ports and names the heat transfer term `heat_duty`.
#[derive(Debug)]
pub struct Heater {
    name: String,
    id: UnitId,
    config: ConfigBlock,
    control_volume: ControlVolume0D,
    inlet: Port,
    outlet: Port,
    heat_duty: VarId,
    pressure_change: Option<VarId>,
}

impl Heater {
    /// Declared configuration options and their defaults.
    pub fn config() -> ConfigBlock {
        ConfigBlock::new()
            .declare(
                "dynamic",
                ConfigValue::use_default(),
                tri_state(),
                "Dynamic model flag; useDefault takes the flowsheet setting",
            )
            .declare(
                "has_holdup",
                ConfigValue::use_default(),
                tri_state(),
                "Holdup construction flag; useDefault follows dynamic",
            )
            .declare(
                "material_balance_type",
                ConfigValue::use_default(),
                Domain::In(vec![ConfigValue::use_default()]),
                "Material balance construction",
            )
            .declare(
                "energy_balance_type",
                ConfigValue::use_default(),
                Domain::In(vec![ConfigValue::use_default()]),
                "Energy balance construction",
            )
            .declare(
                "momentum_balance_type",
                "pressureTotal".into(),
                Domain::In(vec!["pressureTotal".into()]),
                "Momentum balance construction",
            )
            .declare(
                "has_pressure_change",
                false.into(),
                Domain::Bool,
                "Add a pressure change term to the momentum balance",
            )
            .declare(
                "property_package",
                ConfigValue::use_default(),
                Domain::Any,
                "Name of a registered property package; useDefault takes the flowsheet default",
            )
            .declare(
                "property_package_args",
                ConfigValue::Block(BTreeMap::new()),
                Domain::Block,
                "Arguments passed to the property package when building state blocks",
            )
    }

    /// Build a heater with `overrides` applied to the default configuration.
    pub fn build_with(
        fs: &mut Flowsheet,
        name: &str,
        overrides: &BTreeMap<String, ConfigValue>,
    ) -> ModelResult<Self> {
        let mut config = Self::config();
        config.set_all(overrides)?;
        Self::build(fs, name, config)
    }

    /// Validate `config` and build the heater on `fs`.
    pub fn build(fs: &mut Flowsheet, name: &str, config: ConfigBlock) -> ModelResult<Self> {
        let dynamic = resolve_flag(&config, "dynamic", fs.config().dynamic)?;
        if dynamic {
            return Err(ModelError::configuration(DYNAMIC_NOT_SUPPORTED));
        }
        let has_holdup = resolve_flag(&config, "has_holdup", dynamic)?;
        if has_holdup {
            return Err(ModelError::configuration(HOLDUP_NOT_SUPPORTED));
        }

        let package = match config.get_str("property_package")? {
            ConfigValue::USE_DEFAULT => fs.default_property_package()?,
            other => fs.property_package(other)?,
        };
        let options = package.state_options(config.get_block("property_package_args")?)?;
        let material = MaterialBalanceType::from_config(config.get_str("material_balance_type")?)?;
        let energy = EnergyBalanceType::from_config(config.get_str("energy_balance_type")?)?;
        let momentum = MomentumBalanceType::from_config(config.get_str("momentum_balance_type")?)?;
        let has_pressure_change = config.get_bool("has_pressure_change")?;

        let (id, path) = fs.register_unit(name)?;
        let model = fs.model_mut();

        let mut control_volume =
            ControlVolume0D::new(format!("{path}.control_volume"), package.clone());
        control_volume.add_state_blocks(model, options.has_phase_equilibrium)?;
        control_volume.add_material_balances(model, material)?;
        control_volume.add_energy_balances(model, energy, true)?;
        control_volume.add_momentum_balances(model, momentum, has_pressure_change)?;

        let inlet = control_volume.add_inlet_port(format!("{path}.inlet"))?;
        let outlet = control_volume.add_outlet_port(format!("{path}.outlet"))?;

        let heat_duty = control_volume.heat().ok_or(ModelError::Construction {
            what: "control volume has no heat term",
        })?;
        model.add_alias(format!("{path}.heat_duty[0]"), heat_duty)?;

        let pressure_change = control_volume.delta_p();
        if let Some(dp) = pressure_change {
            model.add_alias(format!("{path}.pressure_change[0]"), dp)?;
        }

        debug!(
            unit = %path,
            package = package.name(),
            components = package.num_components(),
            has_pressure_change,
            "built heater"
        );

        Ok(Self {
            name: path,
            id,
            config,
            control_volume,
            inlet,
            outlet,
            heat_duty,
            pressure_change,
        })
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Configuration the heater was built with.
    pub fn configuration(&self) -> &ConfigBlock {
        &self.config
    }

    pub fn control_volume(&self) -> &ControlVolume0D {
        &self.control_volume
    }

    pub fn inlet(&self) -> &Port {
        &self.inlet
    }

    pub fn outlet(&self) -> &Port {
        &self.outlet
    }

    /// Heat duty [W]; the same variable as `control_volume.heat[0]`.
    pub fn heat_duty(&self) -> VarId {
        self.heat_duty
    }

    pub fn pressure_change(&self) -> Option<VarId> {
        self.pressure_change
    }
}

impl UnitModel for Heater {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<&Port> {
        vec![&self.inlet, &self.outlet]
    }

    fn initialize(&self, model: &mut Model) -> ModelResult<()> {
        let inlet = self.control_volume.properties_in()?;
        let outlet = self.control_volume.properties_out()?;
        let mut moved = 0;
        for (src, dst) in inlet.vars().into_iter().zip(outlet.vars()) {
            if !model.is_fixed(dst) {
                model.set_value(dst, model.value(src));
                moved += 1;
            }
        }
        if let Some(dp) = self.pressure_change {
            if !model.is_fixed(outlet.pressure) {
                model.set_value(outlet.pressure, model.value(inlet.pressure) + model.value(dp));
            }
        }
        debug!(unit = %self.name, moved, "initialized outlet from inlet");
        Ok(())
    }

    fn report(&self, model: &Model) -> ModelResult<String> {
        let mut performance = vec![("Heat Duty", self.heat_duty)];
        if let Some(dp) = self.pressure_change {
            performance.push(("Pressure Change", dp));
        }
        let inlet = self.control_volume.properties_in()?;
        let outlet = self.control_volume.properties_out()?;
        render_report(
            model,
            &self.name,
            0.0,
            &performance,
            &[("Inlet", inlet), ("Outlet", outlet)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowsheet::FlowsheetConfig;
    use pf_props::ConstantCpPackage;
    use std::sync::Arc;

    fn flowsheet(dynamic: bool) -> Flowsheet {
        let mut fs = Flowsheet::new(FlowsheetConfig { dynamic });
        fs.add_property_package("ideal", Arc::new(ConstantCpPackage::reference()))
            .unwrap();
        fs
    }

    #[test]
    fn schema_defaults() {
        let config = Heater::config();
        assert!(config.get("dynamic").unwrap().is_use_default());
        assert!(config.get("has_holdup").unwrap().is_use_default());
        assert_eq!(config.get_str("momentum_balance_type").unwrap(), "pressureTotal");
        assert!(!config.get_bool("has_pressure_change").unwrap());
        assert!(config.get_block("property_package_args").unwrap().is_empty());
    }

    #[test]
    fn single_value_domains_enforced() {
        let mut config = Heater::config();
        assert!(config.set("material_balance_type", "componentPhase").is_err());
        assert!(config.set("momentum_balance_type", "none").is_err());
        assert!(config.set("dynamic", "yes").is_err());
        assert!(config.set("unknown_option", true).is_err());
    }

    #[test]
    fn dynamic_flowsheet_rejected_with_fixed_message() {
        let mut fs = flowsheet(true);
        let err = Heater::build(&mut fs, "heater", Heater::config()).unwrap_err();
        assert_eq!(err.to_string(), DYNAMIC_NOT_SUPPORTED);
        // Failed construction does not reserve the name
        assert!(fs.units().is_empty());
    }

    #[test]
    fn holdup_rejected_with_fixed_message() {
        let mut fs = flowsheet(false);
        let mut config = Heater::config();
        config.set("has_holdup", true).unwrap();
        let err = Heater::build(&mut fs, "heater", config).unwrap_err();
        assert_eq!(err.to_string(), HOLDUP_NOT_SUPPORTED);
    }

    #[test]
    fn explicit_false_overrides_dynamic_flowsheet() {
        let mut fs = flowsheet(true);
        let mut config = Heater::config();
        config.set("dynamic", false).unwrap();
        config.set("has_holdup", false).unwrap();
        assert!(Heater::build(&mut fs, "heater", config).is_ok());
    }

    #[test]
    fn heat_duty_aliases_control_volume_heat() {
        let mut fs = flowsheet(false);
        let heater = Heater::build(&mut fs, "heater", Heater::config()).unwrap();
        let model = fs.model();
        let a = model.find("fs.heater.heat_duty[0]").unwrap();
        let b = model.find("fs.heater.control_volume.heat[0]").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, heater.heat_duty());
        assert!(model.find("fs.heater.pressure_change[0]").is_err());
    }

    #[test]
    fn unknown_package_rejected() {
        let mut fs = flowsheet(false);
        let mut config = Heater::config();
        config.set("property_package", "nrtl").unwrap();
        assert!(matches!(
            Heater::build(&mut fs, "heater", config),
            Err(ModelError::UnknownPackage { .. })
        ));
    }

    #[test]
    fn ports_are_named_under_unit() {
        let mut fs = flowsheet(false);
        let heater = Heater::build(&mut fs, "heater", Heater::config()).unwrap();
        assert_eq!(heater.port("inlet").unwrap().name, "fs.heater.inlet");
        assert_eq!(heater.port("outlet").unwrap().members().len(), 7);
        assert!(heater.port("vent").is_err());
    }
}
