//! Temperature sensing: an analog front-end plus a replaceable calibration.

use crate::Error;

/// Raw analog sample source.
pub trait AnalogFrontEnd {
    type Error;

    fn sample_raw(&mut self) -> Result<u16, Self::Error>;
}

/// Raw sample to whole degrees Celsius. Must be monotonic.
pub trait Calibration {
    fn to_celsius(&self, raw: u16) -> i16;
}

/// `raw * numerator / denominator`, truncated toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearCalibration {
    pub numerator: i32,
    pub denominator: i32,
}

impl LinearCalibration {
    /// LM35 (10 mV/°C) on a 10-bit converter with a 1.1 V reference:
    /// `raw / 9.3`.
    pub const LM35_10BIT_1V1: Self = Self { numerator: 10, denominator: 93 };

    /// LM35 on the RP2040's 12-bit converter with a 3.3 V reference:
    /// `raw * 3300 / 4096` millivolts, 10 mV per degree.
    pub const LM35_12BIT_3V3: Self = Self { numerator: 3300, denominator: 40960 };
}

impl Default for LinearCalibration {
    fn default() -> Self {
        Self::LM35_10BIT_1V1
    }
}

impl Calibration for LinearCalibration {
    fn to_celsius(&self, raw: u16) -> i16 {
        let degrees = raw as i32 * self.numerator / self.denominator;
        degrees.clamp(i16::MIN as i32, i16::MAX as i32) as i16
    }
}

pub struct TemperatureSensor<A, C = LinearCalibration> {
    front_end: A,
    calibration: C,
}

impl<A, C> TemperatureSensor<A, C>
where
    A: AnalogFrontEnd,
    C: Calibration,
{
    pub fn new(front_end: A, calibration: C) -> Self {
        Self { front_end, calibration }
    }

    /// Take one sample and convert it.
    pub fn read_celsius(&mut self) -> Result<i16, Error> {
        let raw = self.front_end.sample_raw().map_err(|_| Error::Sensor)?;
        let degrees = self.calibration.to_celsius(raw);
        trace!("sensor raw={} -> {} C", raw, degrees);
        Ok(degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u16);

    impl AnalogFrontEnd for Fixed {
        type Error = ();

        fn sample_raw(&mut self) -> Result<u16, ()> {
            Ok(self.0)
        }
    }

    #[test]
    fn reference_curve_matches_divide_by_nine_point_three() {
        let cal = LinearCalibration::default();
        assert_eq!(cal.to_celsius(0), 0);
        assert_eq!(cal.to_celsius(186), 20);
        assert_eq!(cal.to_celsius(279), 30);
        // 200 / 9.3 = 21.5 -> 21
        assert_eq!(cal.to_celsius(200), 21);
    }

    #[test]
    fn reference_curve_is_monotonic() {
        let cal = LinearCalibration::default();
        let mut last = cal.to_celsius(0);
        for raw in 1..=1023 {
            let t = cal.to_celsius(raw);
            assert!(t >= last);
            last = t;
        }
    }

    #[test]
    fn rp2040_curve() {
        let cal = LinearCalibration::LM35_12BIT_3V3;
        // 310 mV -> 31 C; 310 mV is raw 384.7
        assert_eq!(cal.to_celsius(385), 31);
    }

    #[test]
    fn sensor_converts_samples() {
        let mut s = TemperatureSensor::new(Fixed(186), LinearCalibration::default());
        assert_eq!(s.read_celsius().unwrap(), 20);
    }
}
