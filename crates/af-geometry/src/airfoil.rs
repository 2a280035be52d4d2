//! Airfoil shapes.

use crate::error::{GeometryError, GeometryResult};
use af_core::numeric::{cosspace, interp_clamped};
use std::path::Path;

/// NACA 4-digit section parameters, all as fractions of chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Naca4 {
    /// Maximum camber
    pub m: f64,
    /// Chordwise location of maximum camber
    pub p: f64,
    /// Maximum thickness
    pub t: f64,
}

impl Naca4 {
    /// Parse names such as `naca0010` or `NACA 2412`.
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let digits = lower.strip_prefix("naca")?.trim();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
        Some(Self {
            m: d[0] as f64 / 100.0,
            p: d[1] as f64 / 10.0,
            t: (d[2] * 10 + d[3]) as f64 / 100.0,
        })
    }

    /// The four digits, e.g. `"0010"`.
    pub fn digits(&self) -> String {
        format!(
            "{}{}{:02}",
            (self.m * 100.0).round() as u32,
            (self.p * 10.0).round() as u32,
            (self.t * 100.0).round() as u32
        )
    }

    /// Half-thickness at `x` (closed trailing edge form).
    pub fn half_thickness(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        5.0 * self.t
            * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
                - 0.1036 * x.powi(4))
    }

    pub fn camber(&self, x: f64) -> f64 {
        let (m, p) = (self.m, self.p);
        if m == 0.0 || p == 0.0 {
            return 0.0;
        }
        let x = x.clamp(0.0, 1.0);
        if x < p {
            m / (p * p) * (2.0 * p * x - x * x)
        } else {
            m / ((1.0 - p) * (1.0 - p)) * ((1.0 - 2.0 * p) + 2.0 * p * x - x * x)
        }
    }

    pub fn camber_slope(&self, x: f64) -> f64 {
        let (m, p) = (self.m, self.p);
        if m == 0.0 || p == 0.0 {
            return 0.0;
        }
        let x = x.clamp(0.0, 1.0);
        if x < p {
            2.0 * m / (p * p) * (p - x)
        } else {
            2.0 * m / ((1.0 - p) * (1.0 - p)) * (p - x)
        }
    }

    /// Selig-ordered coordinates: upper trailing edge, around the nose, lower trailing edge.
    pub fn coordinates(&self, points_per_side: usize) -> Vec<[f64; 2]> {
        let xs = cosspace(0.0, 1.0, points_per_side.max(3));
        let surface = |x: f64, sign: f64| {
            let yt = self.half_thickness(x);
            let theta = self.camber_slope(x).atan();
            [
                x - sign * yt * theta.sin(),
                self.camber(x) + sign * yt * theta.cos(),
            ]
        };
        let mut coords: Vec<[f64; 2]> = xs.iter().rev().map(|&x| surface(x, 1.0)).collect();
        // Leading edge point is shared by both surfaces
        coords.extend(xs.iter().skip(1).map(|&x| surface(x, -1.0)));
        coords
    }
}

/// A named 2D section shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Airfoil {
    name: String,
    naca: Option<Naca4>,
    coordinates: Vec<[f64; 2]>,
}

impl Airfoil {
    /// Build an airfoil from its name. Only NACA 4-digit names are generated
    /// analytically; other shapes come from [`Airfoil::from_coordinates`] or
    /// [`Airfoil::from_dat_file`].
    pub fn new(name: &str) -> GeometryResult<Self> {
        let naca = Naca4::parse(name).ok_or_else(|| GeometryError::UnknownAirfoil {
            name: name.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            naca: Some(naca),
            coordinates: naca.coordinates(81),
        })
    }

    pub fn from_coordinates(name: &str, coordinates: Vec<[f64; 2]>) -> GeometryResult<Self> {
        if coordinates.len() < 5 {
            return Err(GeometryError::InvalidCoordinates {
                name: name.to_string(),
                what: format!("need at least 5 points, got {}", coordinates.len()),
            });
        }
        if coordinates.iter().flatten().any(|v| !v.is_finite()) {
            return Err(GeometryError::InvalidCoordinates {
                name: name.to_string(),
                what: "non-finite coordinate".to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            naca: Naca4::parse(name),
            coordinates,
        })
    }

    /// Load a Selig-format `.dat` file: a title line followed by `x y` pairs.
    pub fn from_dat_file(path: &Path) -> GeometryResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GeometryError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "airfoil".to_string());
        Self::parse_dat(&stem, &content)
    }

    pub fn parse_dat(name: &str, content: &str) -> GeometryResult<Self> {
        let mut coords = Vec::new();
        for line in content.lines() {
            let mut parts = line.split_whitespace();
            let (Some(x), Some(y)) = (parts.next(), parts.next()) else {
                continue;
            };
            // Title and header lines do not parse as numbers
            if let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) {
                coords.push([x, y]);
            }
        }
        Self::from_coordinates(name, coords)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn naca(&self) -> Option<Naca4> {
        self.naca
    }

    pub fn coordinates(&self) -> &[[f64; 2]] {
        &self.coordinates
    }

    fn leading_edge_index(&self) -> usize {
        self.coordinates
            .iter()
            .enumerate()
            .min_by(|a, b| a.1[0].total_cmp(&b.1[0]))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Upper and lower surfaces, each sorted by ascending x.
    fn surfaces(&self) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
        let le = self.leading_edge_index();
        let mut upper: Vec<[f64; 2]> = self.coordinates[..=le].to_vec();
        upper.reverse();
        let lower: Vec<[f64; 2]> = self.coordinates[le..].to_vec();
        (upper, lower)
    }

    fn surface_y(surface: &[[f64; 2]], x: f64) -> f64 {
        let xs: Vec<f64> = surface.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = surface.iter().map(|p| p[1]).collect();
        // Surfaces always hold at least one point, so interpolation cannot fail
        interp_clamped(x, &xs, &ys).unwrap_or(0.0)
    }

    /// Full thickness at `x_over_c`, as a fraction of chord.
    pub fn local_thickness(&self, x_over_c: f64) -> f64 {
        if let Some(naca) = self.naca {
            return 2.0 * naca.half_thickness(x_over_c);
        }
        let (upper, lower) = self.surfaces();
        (Self::surface_y(&upper, x_over_c) - Self::surface_y(&lower, x_over_c)).max(0.0)
    }

    /// Mean camber line height at `x_over_c`, as a fraction of chord.
    pub fn local_camber(&self, x_over_c: f64) -> f64 {
        if let Some(naca) = self.naca {
            return naca.camber(x_over_c);
        }
        let (upper, lower) = self.surfaces();
        0.5 * (Self::surface_y(&upper, x_over_c) + Self::surface_y(&lower, x_over_c))
    }

    /// Slope of the mean camber line at `x_over_c`.
    pub fn camber_slope(&self, x_over_c: f64) -> f64 {
        if let Some(naca) = self.naca {
            return naca.camber_slope(x_over_c);
        }
        let h = 1e-4;
        let lo = (x_over_c - h).max(0.0);
        let hi = (x_over_c + h).min(1.0);
        (self.local_camber(hi) - self.local_camber(lo)) / (hi - lo)
    }

    pub fn max_thickness(&self) -> f64 {
        (0..=200)
            .map(|i| self.local_thickness(i as f64 / 200.0))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_naca_names() {
        let n = Naca4::parse("naca2412").unwrap();
        assert_eq!(n.m, 0.02);
        assert_eq!(n.p, 0.4);
        assert_eq!(n.t, 0.12);
        assert_eq!(n.digits(), "2412");
        assert!(Naca4::parse("NACA 0010").is_some());
        assert!(Naca4::parse("dae51").is_none());
        assert!(Naca4::parse("naca23012").is_none());
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(matches!(
            Airfoil::new("sd7037"),
            Err(GeometryError::UnknownAirfoil { .. })
        ));
    }

    #[test]
    fn naca_thickness_peaks_near_thirty_percent() {
        let af = Airfoil::new("naca0010").unwrap();
        let t = af.max_thickness();
        assert!((t - 0.10).abs() < 0.002, "max thickness {t}");
        assert!(af.local_thickness(1.0).abs() < 1e-9);
        assert!(af.local_camber(0.5).abs() < 1e-12);
    }

    #[test]
    fn dat_coordinates_match_analytic_shape() {
        let naca = Naca4::parse("naca2412").unwrap();
        let mut dat = String::from("MY SECTION\n");
        for [x, y] in naca.coordinates(121) {
            dat.push_str(&format!("{x:.6} {y:.6}\n"));
        }
        let af = Airfoil::parse_dat("custom", &dat).unwrap();
        assert!(af.naca().is_none());
        assert!((af.local_thickness(0.3) - 0.12).abs() < 0.01);
        assert!((af.local_camber(0.4) - 0.02).abs() < 0.003);
    }

    #[test]
    fn too_few_points_is_an_error() {
        let err = Airfoil::parse_dat("x", "title\n1 0\n0 0\n").unwrap_err();
        assert!(err.to_string().contains("at least 5"));
    }
}
