//! Polar tables and interpolation.

use crate::{PolarError, PolarResult};
use af_core::numeric::interp_clamped;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Section coefficients at one flow condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionCoefficients {
    pub cl: f64,
    pub cd: f64,
    pub cm: f64,
}

/// Coefficients versus angle of attack at one Reynolds and Mach number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polar {
    pub reynolds: f64,
    pub mach: f64,
    pub alpha_deg: Vec<f64>,
    pub cl: Vec<f64>,
    pub cd: Vec<f64>,
    pub cm: Vec<f64>,
}

impl Polar {
    pub fn validate(&self) -> PolarResult<()> {
        let n = self.alpha_deg.len();
        if n == 0 {
            return Err(PolarError::InvalidTable {
                what: format!("polar at Re={} has no points", self.reynolds),
            });
        }
        if self.cl.len() != n || self.cd.len() != n || self.cm.len() != n {
            return Err(PolarError::InvalidTable {
                what: format!("polar at Re={} has ragged columns", self.reynolds),
            });
        }
        if self.alpha_deg.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PolarError::InvalidTable {
                what: format!("polar at Re={} alpha is not strictly increasing", self.reynolds),
            });
        }
        if !(self.reynolds > 0.0) {
            return Err(PolarError::InvalidTable {
                what: format!("non-positive Reynolds number {}", self.reynolds),
            });
        }
        Ok(())
    }

    /// Linear in alpha, clamped at the table ends.
    pub fn at(&self, alpha_deg: f64) -> PolarResult<SectionCoefficients> {
        let map = |e: af_core::AfError| PolarError::InvalidTable { what: e.to_string() };
        Ok(SectionCoefficients {
            cl: interp_clamped(alpha_deg, &self.alpha_deg, &self.cl).map_err(map)?,
            cd: interp_clamped(alpha_deg, &self.alpha_deg, &self.cd).map_err(map)?,
            cm: interp_clamped(alpha_deg, &self.alpha_deg, &self.cm).map_err(map)?,
        })
    }
}

/// All polars computed for one airfoil, ordered by Reynolds number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarSet {
    pub airfoil: String,
    pub polars: Vec<Polar>,
}

impl PolarSet {
    pub fn new(airfoil: &str, mut polars: Vec<Polar>) -> PolarResult<Self> {
        if polars.is_empty() {
            return Err(PolarError::InvalidTable {
                what: format!("no polars for {airfoil}"),
            });
        }
        for p in &polars {
            p.validate()?;
        }
        polars.sort_by(|a, b| a.reynolds.total_cmp(&b.reynolds));
        Ok(Self {
            airfoil: airfoil.to_string(),
            polars,
        })
    }

    /// Interpolate linearly in alpha and in log-Reynolds, clamped at both table ends.
    pub fn coefficients(&self, alpha_deg: f64, reynolds: f64) -> PolarResult<SectionCoefficients> {
        let first = self.polars.first().ok_or_else(|| PolarError::InvalidTable {
            what: format!("no polars for {}", self.airfoil),
        })?;
        let last = &self.polars[self.polars.len() - 1];

        if self.polars.len() == 1 || reynolds <= first.reynolds {
            return first.at(alpha_deg);
        }
        if reynolds >= last.reynolds {
            return last.at(alpha_deg);
        }

        let hi = self.polars.partition_point(|p| p.reynolds <= reynolds);
        let (a, b) = (&self.polars[hi - 1], &self.polars[hi]);
        let t = (reynolds.ln() - a.reynolds.ln()) / (b.reynolds.ln() - a.reynolds.ln());
        let (ca, cb) = (a.at(alpha_deg)?, b.at(alpha_deg)?);
        Ok(SectionCoefficients {
            cl: ca.cl + t * (cb.cl - ca.cl),
            cd: ca.cd + t * (cb.cd - ca.cd),
            cm: ca.cm + t * (cb.cm - ca.cm),
        })
    }
}

/// Polar sets keyed by airfoil name.
#[derive(Debug, Clone, Default)]
pub struct PolarLibrary {
    sets: BTreeMap<String, PolarSet>,
}

impl PolarLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, set: PolarSet) {
        self.sets.insert(set.airfoil.clone(), set);
    }

    pub fn get(&self, airfoil: &str) -> Option<&PolarSet> {
        self.sets.get(airfoil)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polar(re: f64, cl_slope: f64) -> Polar {
        let alpha_deg = vec![-10.0, 0.0, 10.0];
        Polar {
            reynolds: re,
            mach: 0.0,
            cl: alpha_deg.iter().map(|a| cl_slope * a).collect(),
            cd: vec![0.02, 0.01, 0.02],
            cm: vec![0.0; 3],
            alpha_deg,
        }
    }

    #[test]
    fn single_polar_interpolates_in_alpha() {
        let set = PolarSet::new("a", vec![polar(1e5, 0.1)]).unwrap();
        let c = set.coefficients(5.0, 3e6).unwrap();
        assert!((c.cl - 0.5).abs() < 1e-12);
        assert!((c.cd - 0.015).abs() < 1e-12);
    }

    #[test]
    fn reynolds_blend_is_logarithmic() {
        let set = PolarSet::new("a", vec![polar(1e6, 0.2), polar(1e4, 0.1)]).unwrap();
        assert_eq!(set.polars[0].reynolds, 1e4);
        let c = set.coefficients(10.0, 1e5).unwrap();
        // Halfway in log space
        assert!((c.cl - 1.5).abs() < 1e-9);
        // Clamped outside the table
        assert!((set.coefficients(10.0, 1e3).unwrap().cl - 1.0).abs() < 1e-12);
        assert!((set.coefficients(10.0, 1e8).unwrap().cl - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ragged_table_is_rejected() {
        let mut p = polar(1e5, 0.1);
        p.cm.pop();
        assert!(PolarSet::new("a", vec![p]).is_err());
        assert!(PolarSet::new("a", vec![]).is_err());
    }

    #[test]
    fn library_lookup_by_name() {
        let mut lib = PolarLibrary::new();
        lib.insert(PolarSet::new("naca0010", vec![polar(1e5, 0.1)]).unwrap());
        assert!(lib.get("naca0010").is_some());
        assert!(lib.get("naca2412").is_none());
        assert_eq!(lib.names().collect::<Vec<_>>(), vec!["naca0010"]);
    }
}
