//! SI quantities for state variables exposed through typed accessors.
//!
//! The equation model stores plain `f64` values in SI base units; these
//! types are used where a state is handed out to callers.

use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature};

pub type Pressure = UomPressure;
pub type Temperature = ThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

pub mod constants {
    /// Pa per bar
    pub const PA_PER_BAR: f64 = 1.0e5;
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::pressure::bar;
    use uom::si::thermodynamic_temperature::degree_celsius;

    #[test]
    fn constructors_store_si_values() {
        assert_eq!(k(300.0).value, 300.0);
        assert_eq!(pa(0.1).value, 0.1);
    }

    #[test]
    fn conversions() {
        assert!((pa(constants::PA_PER_BAR).get::<bar>() - 1.0).abs() < 1e-12);
        assert!((k(273.15).get::<degree_celsius>()).abs() < 1e-9);
    }
}
