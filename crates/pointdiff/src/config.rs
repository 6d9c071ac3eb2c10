use std::fmt;
use std::str::FromStr;

use uom::si::f64::Length;
use uom::si::length::{kilometer, meter};

use crate::spatial::DEFAULT_QUADRANT_SEGMENTS;
use crate::Error;

/// Buffer radius. Finite and not negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Radius(Length);

impl Radius {
    pub fn from_kilometers(km: f64) -> Result<Self, Error> {
        Self::try_from(km)
    }

    pub fn length(&self) -> Length {
        self.0
    }

    pub fn meters(&self) -> f64 {
        self.0.get::<meter>()
    }
}

impl TryFrom<f64> for Radius {
    type Error = Error;

    /// `value` is in kilometers
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            Err(Error::InvalidArgument(format!(
                "radius must be a non-negative number of kilometers, got {value}"
            )))
        } else {
            Ok(Self(Length::new::<kilometer>(value)))
        }
    }
}

impl FromStr for Radius {
    type Err = Error;

    /// parse a radius given in kilometers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let km: f64 = s.trim().parse().map_err(|_| {
            Error::InvalidArgument(format!("radius_km must be a number, got '{s}'"))
        })?;
        Self::try_from(km)
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", self.0.get::<kilometer>())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DiffOptions {
    pub radius: Radius,

    /// segments per quarter circle used to approximate the buffer disks
    pub quadrant_segments: i32,
}

impl DiffOptions {
    pub fn new(radius: Radius) -> Self {
        Self {
            radius,
            quadrant_segments: DEFAULT_QUADRANT_SEGMENTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::Radius;
    use crate::Error;

    #[test]
    fn radius_is_converted_to_meters() {
        let radius: Radius = "1.5".parse().unwrap();
        assert!(approx_eq!(f64, radius.meters(), 1500.0, ulps = 2));
        assert!(approx_eq!(
            f64,
            Radius::from_kilometers(0.0).unwrap().meters(),
            0.0
        ));
    }

    #[test]
    fn radius_rejects_garbage() {
        assert!(matches!(
            "ten".parse::<Radius>(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Radius::from_kilometers(-1.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Radius::from_kilometers(f64::NAN),
            Err(Error::InvalidArgument(_))
        ));
        assert!("inf".parse::<Radius>().is_err());
    }
}
