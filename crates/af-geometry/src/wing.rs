//! Lifting surfaces.

use crate::airfoil::Airfoil;
use crate::error::{GeometryError, GeometryResult};
use nalgebra::{Rotation3, Unit, Vector3};

/// One cross-section of a wing.
#[derive(Debug, Clone, PartialEq)]
pub struct WingXSec {
    /// Leading edge position
    pub xyz_le: Vector3<f64>,
    pub chord: f64,
    /// Incidence about the local spanwise axis, degrees, positive nose-up
    pub twist_deg: f64,
    pub airfoil: Airfoil,
}

impl WingXSec {
    pub fn new(xyz_le: [f64; 3], chord: f64, twist_deg: f64, airfoil: Airfoil) -> Self {
        Self {
            xyz_le: Vector3::from(xyz_le),
            chord,
            twist_deg,
            airfoil,
        }
    }
}

/// A flat quadrilateral lifting panel on the mean chord surface.
///
/// Corners are ordered front-inboard, front-outboard, back-inboard, back-outboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub front_left: Vector3<f64>,
    pub front_right: Vector3<f64>,
    pub back_left: Vector3<f64>,
    pub back_right: Vector3<f64>,
}

impl Panel {
    pub fn normal(&self) -> Vector3<f64> {
        let diag1 = self.back_right - self.front_left;
        let diag2 = self.front_right - self.back_left;
        diag1.cross(&diag2).normalize()
    }

    pub fn area(&self) -> f64 {
        let diag1 = self.back_right - self.front_left;
        let diag2 = self.front_right - self.back_left;
        0.5 * diag1.cross(&diag2).norm()
    }

    /// Mirror across the XZ plane, keeping the corner ordering convention.
    fn mirrored(&self) -> Panel {
        let flip = |v: &Vector3<f64>| Vector3::new(v.x, -v.y, v.z);
        Panel {
            front_left: flip(&self.front_right),
            front_right: flip(&self.front_left),
            back_left: flip(&self.back_right),
            back_right: flip(&self.back_left),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wing {
    pub name: String,
    pub xsecs: Vec<WingXSec>,
    /// Mirror across the XZ plane
    pub symmetric: bool,
}

impl Wing {
    pub fn new(name: &str, xsecs: Vec<WingXSec>, symmetric: bool) -> GeometryResult<Self> {
        if xsecs.len() < 2 {
            return Err(GeometryError::Invalid {
                what: format!("wing '{name}' needs at least 2 cross-sections"),
            });
        }
        if let Some(x) = xsecs.iter().find(|x| !(x.chord > 0.0)) {
            return Err(GeometryError::Invalid {
                what: format!("wing '{name}' has non-positive chord {}", x.chord),
            });
        }
        Ok(Self {
            name: name.to_string(),
            xsecs,
            symmetric,
        })
    }

    /// Rigidly move every cross-section.
    pub fn translate(mut self, offset: [f64; 3]) -> Self {
        let offset = Vector3::from(offset);
        for xsec in &mut self.xsecs {
            xsec.xyz_le += offset;
        }
        self
    }

    /// Number of spanwise sections between neighbouring cross-sections.
    pub fn section_count(&self) -> usize {
        self.xsecs.len().saturating_sub(1)
    }

    fn quarter_chord(xsec: &WingXSec) -> Vector3<f64> {
        xsec.xyz_le + Vector3::new(0.25 * xsec.chord, 0.0, 0.0)
    }

    /// Span of one section, measured in the YZ plane between quarter-chord points.
    pub fn section_span(&self, i: usize) -> f64 {
        let d = Self::quarter_chord(&self.xsecs[i + 1]) - Self::quarter_chord(&self.xsecs[i]);
        (d.y * d.y + d.z * d.z).sqrt()
    }

    fn mirror_factor(&self) -> f64 {
        if self.symmetric { 2.0 } else { 1.0 }
    }

    /// Tip-to-tip span, including the mirrored half.
    pub fn span(&self) -> f64 {
        let half: f64 = (0..self.section_count()).map(|i| self.section_span(i)).sum();
        half * self.mirror_factor()
    }

    /// Planform area, including the mirrored half.
    pub fn area(&self) -> f64 {
        let half: f64 = (0..self.section_count())
            .map(|i| 0.5 * (self.xsecs[i].chord + self.xsecs[i + 1].chord) * self.section_span(i))
            .sum();
        half * self.mirror_factor()
    }

    pub fn aspect_ratio(&self) -> f64 {
        let s = self.area();
        if s > 0.0 { self.span().powi(2) / s } else { 0.0 }
    }

    pub fn mean_geometric_chord(&self) -> f64 {
        let b = self.span();
        if b > 0.0 { self.area() / b } else { 0.0 }
    }

    /// Area-weighted mean aerodynamic chord of the trapezoidal sections.
    pub fn mean_aerodynamic_chord(&self) -> f64 {
        let mut weighted = 0.0;
        let mut area = 0.0;
        for i in 0..self.section_count() {
            let (c1, c2) = (self.xsecs[i].chord, self.xsecs[i + 1].chord);
            let s = 0.5 * (c1 + c2) * self.section_span(i);
            let mac = 2.0 / 3.0 * (c1 * c1 + c1 * c2 + c2 * c2) / (c1 + c2);
            weighted += mac * s;
            area += s;
        }
        if area > 0.0 { weighted / area } else { self.xsecs[0].chord }
    }

    /// Quarter-chord point of the mean aerodynamic chord, area-weighted over sections.
    ///
    /// Symmetric wings report `y = 0`.
    pub fn aerodynamic_center(&self) -> Vector3<f64> {
        let mut weighted = Vector3::zeros();
        let mut area = 0.0;
        for i in 0..self.section_count() {
            let (a, b) = (&self.xsecs[i], &self.xsecs[i + 1]);
            let (c1, c2) = (a.chord, b.chord);
            let s = 0.5 * (c1 + c2) * self.section_span(i);
            let eta = (c1 + 2.0 * c2) / (3.0 * (c1 + c2));
            let le = a.xyz_le.lerp(&b.xyz_le, eta);
            let mac = 2.0 / 3.0 * (c1 * c1 + c1 * c2 + c2 * c2) / (c1 + c2);
            weighted += (le + Vector3::new(0.25 * mac, 0.0, 0.0)) * s;
            area += s;
        }
        let mut ac = if area > 0.0 {
            weighted / area
        } else {
            Self::quarter_chord(&self.xsecs[0])
        };
        if self.symmetric {
            ac.y = 0.0;
        }
        ac
    }

    /// Unit spanwise direction at a cross-section, projected into the YZ plane.
    ///
    /// Interior sections use the bisector of the neighbouring section directions.
    pub fn xsec_span_direction(&self, i: usize) -> Vector3<f64> {
        let dir = |a: usize, b: usize| {
            let d = self.xsecs[b].xyz_le - self.xsecs[a].xyz_le;
            let v = Vector3::new(0.0, d.y, d.z);
            if v.norm() > 0.0 { v.normalize() } else { Vector3::y() }
        };
        let last = self.xsecs.len() - 1;
        if i == 0 {
            dir(0, 1)
        } else if i == last {
            dir(last - 1, last)
        } else {
            let v = dir(i - 1, i) + dir(i, i + 1);
            if v.norm() > 0.0 { v.normalize() } else { dir(i, i + 1) }
        }
    }

    /// Unit vector from leading edge to trailing edge after applying twist.
    pub fn xsec_chord_direction(&self, i: usize) -> Vector3<f64> {
        let axis = Unit::new_normalize(self.xsec_span_direction(i));
        let rot = Rotation3::from_axis_angle(&axis, self.xsecs[i].twist_deg.to_radians());
        rot * Vector3::x()
    }

    /// Unit normal of a cross-section's chord plane, pointing to the suction side.
    pub fn xsec_normal(&self, i: usize) -> Vector3<f64> {
        self.xsec_chord_direction(i)
            .cross(&self.xsec_span_direction(i))
            .normalize()
    }

    /// Panels on the twisted chord surface, `chordwise` deep and
    /// `spanwise_per_section` wide in every section. Symmetric wings include
    /// the mirrored panels after the original ones.
    pub fn mesh_panels(&self, chordwise: usize, spanwise_per_section: usize) -> Vec<Panel> {
        let chordwise = chordwise.max(1);
        let spanwise = spanwise_per_section.max(1);

        let chord_line = |i: usize, frac: f64| -> Vector3<f64> {
            let xsec = &self.xsecs[i];
            xsec.xyz_le + self.xsec_chord_direction(i) * (frac * xsec.chord)
        };

        let mut panels = Vec::with_capacity(self.section_count() * chordwise * spanwise);
        for s in 0..self.section_count() {
            for j in 0..spanwise {
                let eta0 = j as f64 / spanwise as f64;
                let eta1 = (j + 1) as f64 / spanwise as f64;
                for k in 0..chordwise {
                    let f0 = k as f64 / chordwise as f64;
                    let f1 = (k + 1) as f64 / chordwise as f64;
                    let at = |eta: f64, frac: f64| chord_line(s, frac).lerp(&chord_line(s + 1, frac), eta);
                    panels.push(Panel {
                        front_left: at(eta0, f0),
                        front_right: at(eta1, f0),
                        back_left: at(eta0, f1),
                        back_right: at(eta1, f1),
                    });
                }
            }
        }

        if self.symmetric {
            let mirrored: Vec<Panel> = panels.iter().map(Panel::mirrored).collect();
            panels.extend(mirrored);
        }
        panels
    }
}
