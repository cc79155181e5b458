// cs-core/src/units.rs

use uom::si::f64::{
    ElectricCharge as UomElectricCharge, ElectricCurrent as UomElectricCurrent,
    Length as UomLength, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Charge = UomElectricCharge;
pub type Current = UomElectricCurrent;
pub type Length = UomLength;
pub type Time = UomTime;

#[inline]
pub fn amps(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Charge expressed in ampere-hours.
#[inline]
pub fn to_amp_hours(q: Charge) -> f64 {
    use uom::si::electric_charge::ampere_hour;
    q.get::<ampere_hour>()
}

/// Length expressed in micrometers.
#[inline]
pub fn to_micrometers(l: Length) -> f64 {
    use uom::si::length::micrometer;
    l.get::<micrometer>()
}

pub mod constants {
    /// Faraday constant, C/mol.
    pub const FARADAY: f64 = 96_485.332_12;

    /// Thermal voltage RT/F at 298.15 K, V.
    pub const THERMAL_VOLTAGE_298K: f64 = 0.025_693;

    pub const SECONDS_PER_HOUR: f64 = 3600.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _i = amps(2.0);
        let _l = m(1e-5);
        let _dt = s(0.1);
    }

    #[test]
    fn one_amp_for_one_hour_is_one_amp_hour() {
        let q: Charge = amps(1.0) * s(constants::SECONDS_PER_HOUR);
        assert!((to_amp_hours(q) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn meters_to_micrometers() {
        assert!((to_micrometers(m(40e-6)) - 40.0).abs() < 1e-9);
    }
}
