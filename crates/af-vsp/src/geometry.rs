//! Geometry to VSPScript statements.
//!
//! Each component is emitted as its own `{ ... }` block so local variable
//! names can repeat.

use af_geometry::{Airfoil, Airplane, Fuselage, Wing};
use std::fmt::Write as _;

/// Number of cross-sections on a freshly added OpenVSP fuselage.
const DEFAULT_FUSELAGE_XSECS: usize = 5;

fn set_parm(s: &mut String, geom: &str, parm: &str, group: &str, value: f64) {
    let _ = writeln!(s, "    SetParmVal( {geom}, \"{parm}\", \"{group}\", {value} );");
}

fn airfoil_shape(s: &mut String, geom: &str, index: usize, airfoil: &Airfoil) {
    let group = format!("XSecCurve_{index}");
    match airfoil.naca() {
        Some(naca) => {
            let _ = writeln!(s, "    ChangeXSecShape( xsec_surf, {index}, XS_FOUR_SERIES );");
            set_parm(s, geom, "Camber", &group, naca.m);
            set_parm(s, geom, "CamberLoc", &group, naca.p);
            set_parm(s, geom, "ThickChord", &group, naca.t);
        }
        None => {
            let _ = writeln!(s, "    ChangeXSecShape( xsec_surf, {index}, XS_FILE_AIRFOIL );");
            let _ = writeln!(s, "    {{");
            let _ = writeln!(s, "        string xsec = GetXSec( xsec_surf, {index} );");
            let coords = airfoil.coordinates();
            let le = coords
                .iter()
                .enumerate()
                .min_by(|a, b| a.1[0].total_cmp(&b.1[0]))
                .map(|(i, _)| i)
                .unwrap_or(0);
            // Selig order runs upper surface TE to LE, then lower surface LE to TE
            let upper: Vec<&[f64; 2]> = coords[..=le].iter().rev().collect();
            let lower: Vec<&[f64; 2]> = coords[le..].iter().collect();
            for (side, points) in [("upper", &upper), ("lower", &lower)] {
                let _ = writeln!(s, "        array<vec3d> {side};");
                for [x, y] in points.iter().copied() {
                    let _ = writeln!(s, "        {side}.push_back( vec3d( {x}, {y}, 0.0 ) );");
                }
            }
            let _ = writeln!(s, "        SetAirfoilPnts( xsec, upper, lower );");
            let _ = writeln!(s, "    }}");
        }
    }
}

/// Statements creating one wing: placement, symmetry, per-section planform and airfoils.
pub fn wing_to_vspscript(wing: &Wing) -> String {
    let mut s = String::new();
    let root = wing.xsecs[0].xyz_le;
    let _ = writeln!(s, "//==== Wing: {} ====//", wing.name);
    let _ = writeln!(s, "{{");
    let _ = writeln!(s, "    string wid = AddGeom( \"WING\", \"\" );");
    let _ = writeln!(s, "    SetGeomName( wid, \"{}\" );", wing.name);
    set_parm(&mut s, "wid", "X_Rel_Location", "XForm", root.x);
    set_parm(&mut s, "wid", "Y_Rel_Location", "XForm", root.y);
    set_parm(&mut s, "wid", "Z_Rel_Location", "XForm", root.z);
    let sym = if wing.symmetric { "SYM_XZ" } else { "0" };
    let _ = writeln!(s, "    SetParmVal( wid, \"Sym_Planar_Flag\", \"Sym\", {sym} );");
    // Single-sided surfaces spanning mostly in Z are built as a wing rolled 90 degrees
    let tip = wing.xsecs[wing.xsecs.len() - 1].xyz_le - root;
    let rolled = !wing.symmetric && tip.z.abs() > tip.y.abs();
    if rolled {
        set_parm(&mut s, "wid", "X_Rel_Rotation", "XForm", 90.0);
    }
    let _ = writeln!(s, "    string xsec_surf = GetXSecSurf( wid, 0 );");

    // A new wing carries one section; add the rest before setting parameters
    for i in 1..wing.section_count() {
        let _ = writeln!(s, "    InsertXSec( wid, {i}, XS_FOUR_SERIES );");
    }

    for i in 0..wing.section_count() {
        let (a, b) = (&wing.xsecs[i], &wing.xsecs[i + 1]);
        let d = b.xyz_le - a.xyz_le;
        let span = (d.y * d.y + d.z * d.z).sqrt();
        let sweep = if span > 0.0 { d.x.atan2(span).to_degrees() } else { 0.0 };
        let dihedral = if span == 0.0 {
            0.0
        } else if rolled {
            (-d.y).atan2(d.z).to_degrees()
        } else {
            d.z.atan2(d.y.abs()).to_degrees()
        };
        let group = format!("XSec_{}", i + 1);
        let _ = writeln!(
            s,
            "    SetDriverGroup( wid, {}, SPAN_WSECT_DRIVER, ROOTC_WSECT_DRIVER, TIPC_WSECT_DRIVER );",
            i + 1
        );
        set_parm(&mut s, "wid", "Span", &group, span);
        set_parm(&mut s, "wid", "Root_Chord", &group, a.chord);
        set_parm(&mut s, "wid", "Tip_Chord", &group, b.chord);
        set_parm(&mut s, "wid", "Sweep", &group, sweep);
        set_parm(&mut s, "wid", "Sweep_Location", &group, 0.0);
        set_parm(&mut s, "wid", "Dihedral", &group, dihedral);
        set_parm(&mut s, "wid", "Twist", &group, b.twist_deg);
        set_parm(&mut s, "wid", "Twist_Location", &group, 0.0);
    }
    set_parm(&mut s, "wid", "Twist", "XSec_0", wing.xsecs[0].twist_deg);
    set_parm(&mut s, "wid", "Twist_Location", "XSec_0", 0.0);

    for (i, xsec) in wing.xsecs.iter().enumerate() {
        airfoil_shape(&mut s, "wid", i, &xsec.airfoil);
    }
    let _ = writeln!(s, "    Update();");
    let _ = writeln!(s, "}}");
    s
}

/// Statements creating one fuselage of circular cross-sections.
pub fn fuselage_to_vspscript(fuselage: &Fuselage) -> String {
    let mut s = String::new();
    let nose = fuselage.xsecs[0].xyz_c;
    let length = fuselage.length();
    let n = fuselage.xsecs.len();
    let _ = writeln!(s, "//==== Fuselage: {} ====//", fuselage.name);
    let _ = writeln!(s, "{{");
    let _ = writeln!(s, "    string fid = AddGeom( \"FUSELAGE\", \"\" );");
    let _ = writeln!(s, "    SetGeomName( fid, \"{}\" );", fuselage.name);
    set_parm(&mut s, "fid", "X_Rel_Location", "XForm", nose.x);
    set_parm(&mut s, "fid", "Y_Rel_Location", "XForm", nose.y);
    set_parm(&mut s, "fid", "Z_Rel_Location", "XForm", nose.z);
    set_parm(&mut s, "fid", "Length", "Design", length);
    let _ = writeln!(s, "    string xsec_surf = GetXSecSurf( fid, 0 );");

    for i in n..DEFAULT_FUSELAGE_XSECS {
        let _ = writeln!(s, "    CutXSec( fid, {} );", DEFAULT_FUSELAGE_XSECS - 1 - (i - n));
    }
    for i in DEFAULT_FUSELAGE_XSECS..n {
        let _ = writeln!(s, "    InsertXSec( fid, {}, XS_CIRCLE );", i - 1);
    }

    for (i, xsec) in fuselage.xsecs.iter().enumerate() {
        let rel = xsec.xyz_c - nose;
        let (x_pct, z_pct) = if length > 0.0 {
            (rel.x / length, rel.z / length)
        } else {
            (0.0, 0.0)
        };
        let group = format!("XSec_{i}");
        let _ = writeln!(s, "    ChangeXSecShape( xsec_surf, {i}, XS_CIRCLE );");
        set_parm(&mut s, "fid", "XLocPercent", &group, x_pct);
        set_parm(&mut s, "fid", "ZLocPercent", &group, z_pct);
        set_parm(&mut s, "fid", "Circle_Diameter", &format!("XSecCurve_{i}"), 2.0 * xsec.radius);
    }
    let _ = writeln!(s, "    Update();");
    let _ = writeln!(s, "}}");
    s
}

/// Every wing, then every fuselage.
pub fn airplane_to_vspscript(airplane: &Airplane) -> String {
    let mut s = format!("//==== Airplane: {} ====//\n", airplane.name);
    for wing in &airplane.wings {
        s.push_str(&wing_to_vspscript(wing));
        s.push('\n');
    }
    for fuselage in &airplane.fuselages {
        s.push_str(&fuselage_to_vspscript(fuselage));
        s.push('\n');
    }
    s
}
