//! Adapter around the external AVL vortex-lattice program.
//!
//! Geometry is written as an `.avl` input file (plus one `BFIL` profile per
//! fuselage), the program is driven through stdin keystrokes, and the
//! stability-derivative file it saves is parsed back into named results.

use crate::axes::results_from_coefficients;
use crate::error::{AeroError, AeroResult};
use crate::operating_point::OperatingPoint;
use crate::results::AeroResults;
use crate::solver::AeroSolver;
use af_geometry::{Airfoil, Airplane, Fuselage, Wing};
use af_polars::{PolarLibrary, run_with_keystrokes};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

const GEOMETRY_FILE: &str = "airplane.avl";
const STABILITY_FILE: &str = "output.st";
const STANDARD_GRAVITY: f64 = 9.81;

/// AVL names and the keys they are reported under.
const KEY_MAP: [(&str, &str); 19] = [
    ("CLtot", "CL"),
    ("CDtot", "CD"),
    ("CYtot", "CY"),
    ("Cltot", "Cl"),
    ("Cmtot", "Cm"),
    ("Cntot", "Cn"),
    ("CDind", "CDi"),
    ("Xnp", "x_np"),
    ("CLa", "CLa"),
    ("CYa", "CYa"),
    ("Cla", "Cla"),
    ("Cma", "Cma"),
    ("Cna", "Cna"),
    ("CLb", "CLb"),
    ("CYb", "CYb"),
    ("Clb", "Clb"),
    ("Cmb", "Cmb"),
    ("Cnb", "Cnb"),
    ("e", "e"),
];

static RUN_COUNTER: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone)]
pub struct Avl {
    pub command: String,
    /// Source of `CDCL` profile-drag polars; airfoils without one get none
    pub polars: PolarLibrary,
    pub chordwise_panels: usize,
    pub spanwise_panels_per_section: usize,
    pub body_panels: usize,
    pub timeout: Duration,
    /// Parent directory for per-run scratch directories
    pub work_dir: PathBuf,
}

impl Default for Avl {
    fn default() -> Self {
        Self {
            command: "avl".to_string(),
            polars: PolarLibrary::new(),
            chordwise_panels: 12,
            spanwise_panels_per_section: 20,
            body_panels: 24,
            timeout: Duration::from_secs(60),
            work_dir: std::env::temp_dir(),
        }
    }
}

fn safe_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn bfil_name(fuselage: &Fuselage, index: usize) -> String {
    format!("body_{index}_{}.bfil", safe_name(&fuselage.name))
}

impl Avl {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn with_polars(mut self, polars: PolarLibrary) -> Self {
        self.polars = polars;
        self
    }

    /// Contents of the `.avl` geometry file.
    pub fn geometry_file(&self, airplane: &Airplane, op: &OperatingPoint) -> String {
        let mut f = String::new();
        let _ = writeln!(f, "{}", airplane.name);
        let _ = writeln!(f, "#Mach\n0");
        let _ = writeln!(f, "#IYsym IZsym Zsym\n0 0 0");
        let _ = writeln!(f, "#Sref Cref Bref\n{} {} {}", airplane.s_ref, airplane.c_ref, airplane.b_ref);
        let r = airplane.xyz_ref;
        let _ = writeln!(f, "#Xref Yref Zref\n{} {} {}", r.x, r.y, r.z);
        let _ = writeln!(f, "#CDp\n0");

        for wing in &airplane.wings {
            self.write_surface(&mut f, wing, op);
        }
        for (i, fuselage) in airplane.fuselages.iter().enumerate() {
            let _ = writeln!(f, "\n#{}", "=".repeat(50));
            let _ = writeln!(f, "BODY\n{}", fuselage.name);
            let _ = writeln!(f, "#Nbody Bspace\n{} 1.0", self.body_panels);
            let _ = writeln!(f, "BFIL\n{}", bfil_name(fuselage, i));
        }
        f
    }

    fn write_surface(&self, f: &mut String, wing: &Wing, op: &OperatingPoint) {
        let _ = writeln!(f, "\n#{}", "=".repeat(50));
        let _ = writeln!(f, "SURFACE\n{}", wing.name);
        let _ = writeln!(
            f,
            "#Nchordwise Cspace Nspan Sspace\n{} 1.0 {} 1.0",
            self.chordwise_panels,
            self.spanwise_panels_per_section * wing.section_count()
        );
        if wing.symmetric {
            let _ = writeln!(f, "YDUPLICATE\n0.0");
        }
        for xsec in &wing.xsecs {
            let p = xsec.xyz_le;
            let _ = writeln!(f, "#{}", "-".repeat(50));
            let _ = writeln!(f, "SECTION\n#Xle Yle Zle Chord Ainc");
            let _ = writeln!(f, "{} {} {} {} {}", p.x, p.y, p.z, xsec.chord, xsec.twist_deg);
            write_airfoil(f, &xsec.airfoil);
            if let Some([cl1, cd1, cl2, cd2, cl3, cd3]) = self.cdcl(&xsec.airfoil, op.reynolds(xsec.chord)) {
                let _ = writeln!(f, "CDCL\n{cl1} {cd1} {cl2} {cd2} {cl3} {cd3}");
            }
        }
    }

    /// Three-point drag polar (min-CL, min-CD, max-CL) from the nearest-Reynolds polar.
    fn cdcl(&self, airfoil: &Airfoil, reynolds: f64) -> Option<[f64; 6]> {
        let set = self.polars.get(airfoil.name())?;
        let polar = set.polars.iter().min_by(|a, b| {
            let da = (a.reynolds.ln() - reynolds.ln()).abs();
            let db = (b.reynolds.ln() - reynolds.ln()).abs();
            da.total_cmp(&db)
        })?;
        let argmin = |v: &[f64]| (0..v.len()).min_by(|&i, &j| v[i].total_cmp(&v[j]));
        let argmax = |v: &[f64]| (0..v.len()).max_by(|&i, &j| v[i].total_cmp(&v[j]));
        let lo = argmin(&polar.cl)?;
        let mid = argmin(&polar.cd)?;
        let hi = argmax(&polar.cl)?;
        let (cl1, cl2, cl3) = (polar.cl[lo], polar.cl[mid], polar.cl[hi]);
        if cl1 < cl2 && cl2 < cl3 {
            Some([cl1, polar.cd[lo], cl2, polar.cd[mid], cl3, polar.cd[hi]])
        } else {
            debug!(airfoil = airfoil.name(), "polar not monotone around min drag; CDCL omitted");
            None
        }
    }

    /// Side-profile file for a fuselage: top surface from tail to nose, then
    /// bottom surface back to the tail.
    pub fn body_file(fuselage: &Fuselage) -> String {
        let mut f = format!("{}\n", fuselage.name);
        for x in fuselage.xsecs.iter().rev() {
            let _ = writeln!(f, "{} {}", x.xyz_c.x, x.xyz_c.z + x.radius);
        }
        for x in fuselage.xsecs.iter().skip(1) {
            let _ = writeln!(f, "{} {}", x.xyz_c.x, x.xyz_c.z - x.radius);
        }
        f
    }

    /// Stdin script: set flight condition, trim-free run, save stability derivatives.
    pub fn keystrokes(&self, op: &OperatingPoint) -> String {
        let mut k = String::new();
        let _ = writeln!(k, "OPER");
        let _ = writeln!(k, "M");
        let _ = writeln!(k, "V {}", op.velocity_mps());
        let _ = writeln!(k, "D {}", op.density_kg_m3());
        let _ = writeln!(k, "G {STANDARD_GRAVITY}");
        let _ = writeln!(k);
        let _ = writeln!(k, "A A {}", op.alpha_deg());
        let _ = writeln!(k, "B B {}", op.beta_deg());
        let _ = writeln!(k, "R R 0");
        let _ = writeln!(k, "P P 0");
        let _ = writeln!(k, "Y Y 0");
        let _ = writeln!(k, "X");
        let _ = writeln!(k, "ST {STABILITY_FILE}");
        let _ = writeln!(k);
        let _ = writeln!(k, "QUIT");
        k
    }

    fn scratch_dir(&self) -> PathBuf {
        let n = RUN_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.work_dir
            .join(format!("airframe-avl-{}-{n}", std::process::id()))
    }

    fn external(&self, message: impl Into<String>) -> AeroError {
        AeroError::External {
            command: self.command.clone(),
            message: message.into(),
        }
    }

    fn write_inputs(&self, airplane: &Airplane, op: &OperatingPoint, dir: &Path) -> AeroResult<()> {
        std::fs::create_dir_all(dir).map_err(|e| AeroError::io(dir, e))?;
        let path = dir.join(GEOMETRY_FILE);
        std::fs::write(&path, self.geometry_file(airplane, op)).map_err(|e| AeroError::io(&path, e))?;
        for (i, fuselage) in airplane.fuselages.iter().enumerate() {
            let path = dir.join(bfil_name(fuselage, i));
            std::fs::write(&path, Self::body_file(fuselage)).map_err(|e| AeroError::io(&path, e))?;
        }
        Ok(())
    }

    fn execute(&self, op: &OperatingPoint, dir: &Path) -> AeroResult<String> {
        let status = run_with_keystrokes(&self.command, &[GEOMETRY_FILE], dir, &self.keystrokes(op), self.timeout)
            .map_err(|e| self.external(e.to_string()))?;
        if !status.success() {
            warn!(?status, "avl exited with failure status");
            return Err(self.external(format!("exited with {status}")));
        }

        let path = dir.join(STABILITY_FILE);
        std::fs::read_to_string(&path)
            .map_err(|e| self.external(format!("no stability output at {}: {e}", path.display())))
    }

    /// Map parsed AVL output onto the common result keys.
    pub fn map_results(raw: &BTreeMap<String, f64>, airplane: &Airplane, op: &OperatingPoint) -> AeroResult<AeroResults> {
        let get = |name: &str| {
            raw.get(name).copied().ok_or_else(|| AeroError::Parse {
                what: format!("'{name}' missing from AVL output"),
            })
        };
        let mut results = results_from_coefficients(
            [get("CLtot")?, get("CYtot")?, get("CDtot")?],
            [get("Cltot")?, get("Cmtot")?, get("Cntot")?],
            airplane,
            op,
        );
        for (avl_name, key) in KEY_MAP {
            if let Some(v) = raw.get(avl_name) {
                results.insert(key, *v);
            }
        }
        Ok(results)
    }
}

/// Airfoil block for a `SECTION`: NACA digits when possible, inline coordinates otherwise.
fn write_airfoil(f: &mut String, airfoil: &Airfoil) {
    match airfoil.naca() {
        Some(naca) => {
            let _ = writeln!(f, "NACA\n{}", naca.digits());
        }
        None => {
            let _ = writeln!(f, "AIRFOIL");
            for [x, y] in airfoil.coordinates() {
                let _ = writeln!(f, "{x:.8} {y:.8}");
            }
        }
    }
}

/// Parse `name = value` pairs from AVL's text output.
///
/// The name is the last whitespace-separated token before `=` (after any
/// `|` column separator); the value is the first token after it. Values that
/// do not parse as numbers are skipped.
pub fn parse_stability_output(text: &str) -> BTreeMap<String, f64> {
    const COMBINED: &str = "Clb Cnr / Clr Cnb";
    let mut values = BTreeMap::new();
    for line in text.lines() {
        let parts: Vec<&str> = line.split('=').collect();
        for pair in parts.windows(2) {
            let (lhs, rhs) = (pair[0], pair[1]);
            let lhs = lhs.rsplit('|').next().unwrap_or(lhs).trim_end();
            let name = if lhs.ends_with(COMBINED) {
                COMBINED
            } else {
                match lhs.split_whitespace().last() {
                    Some(n) => n,
                    None => continue,
                }
            };
            let Some(value) = rhs.split_whitespace().next().and_then(|v| v.parse::<f64>().ok()) else {
                continue;
            };
            values.insert(name.to_string(), value);
        }
    }
    values
}

impl AeroSolver for Avl {
    fn name(&self) -> &str {
        "AVL"
    }

    fn run(&self, airplane: &Airplane, op: &OperatingPoint) -> AeroResult<AeroResults> {
        op.validate()?;
        let dir = self.scratch_dir();
        let outcome = self
            .write_inputs(airplane, op, &dir)
            .and_then(|_| self.execute(op, &dir));
        let _ = std::fs::remove_dir_all(&dir);
        let raw = parse_stability_output(&outcome?);
        let results = Self::map_results(&raw, airplane, op)?;
        info!(airplane = %airplane.name, outputs = results.len(), "AVL complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
 ---------------------------------------------------------------
 Vortex Lattice Output -- Total Forces

 Configuration: glider
     # Surfaces =   4
     # Strips   =  80

  Sref =  0.26000       Cref =  0.14000       Bref =   2.0000
  Xref =   0.0000       Yref =   0.0000       Zref =   0.0000

  Alpha =   5.00000     pb/2V =  -0.00000     p'b/2V =  -0.00000
  Beta  =   0.00000     qc/(2V) =   0.00000
  CXtot =   0.01234     Cltot =   0.00000     Cl'tot =   0.00000
  CYtot =   0.00000     Cmtot =  -0.04567
  CZtot =  -0.54321     Cntot =   0.00000     Cn'tot =   0.00000

  CLtot =   0.54200
  CDtot =   0.01100
  CDvis =   0.00000     CDind = 0.0110000
  CLff  =   0.54000     CDff  = 0.0108000    | Trefftz
  CYff  =   0.00000         e =    0.9800    | Plane

                     alpha                beta
                  ----------------    ----------------
 z' force CL |    CLa =   5.123400    CLb =   0.000000
 y  force CY |    CYa =   0.000000    CYb =  -0.312000
 x' mom.  Cl'|    Cla =   0.000000    Clb =  -0.045000
 y  mom.  Cm |    Cma =  -1.234000    Cmb =   0.000000
 z' mom.  Cn'|    Cna =   0.000000    Cnb =   0.067000

  Clb Cnr / Clr Cnb  =   1.234500    (  > 1 if spirally stable )

 Neutral point  Xnp =   0.123400
";

    fn glider() -> Airplane {
        use af_geometry::{Fuselage, FuselageXSec, WingXSec};
        let af = Airfoil::new("naca0010").unwrap();
        let wing = Wing::new(
            "Main Wing",
            vec![
                WingXSec::new([0.0, 0.0, 0.0], 0.18, 0.0, af.clone()),
                WingXSec::new([0.01, 0.5, 0.0], 0.16, 0.0, af.clone()),
                WingXSec::new([0.08, 1.0, 0.1], 0.08, 0.0, af),
            ],
            true,
        )
        .unwrap();
        let fuse = Fuselage::new(
            "Fuse",
            vec![
                FuselageXSec::new([0.0, 0.0, 0.0], 0.0),
                FuselageXSec::new([0.5, 0.0, 0.0], 0.05),
                FuselageXSec::new([1.0, 0.0, 0.0], 0.0),
            ],
        )
        .unwrap();
        Airplane::new("glider", [0.0, 0.0, 0.0], vec![wing], vec![fuse]).unwrap()
    }

    #[test]
    fn parses_totals_and_derivatives() {
        let raw = parse_stability_output(SAMPLE);
        assert_eq!(raw["CLtot"], 0.542);
        assert_eq!(raw["Cmtot"], -0.04567);
        assert_eq!(raw["CDind"], 0.011);
        assert_eq!(raw["CLa"], 5.1234);
        assert_eq!(raw["Cnb"], 0.067);
        assert_eq!(raw["Cla"], 0.0);
        assert_eq!(raw["e"], 0.98);
        assert_eq!(raw["Xnp"], 0.1234);
        assert_eq!(raw["Clb Cnr / Clr Cnb"], 1.2345);
        assert_eq!(raw["pb/2V"], -0.0);
    }

    #[test]
    fn unparsable_values_are_skipped() {
        let raw = parse_stability_output("  CLtot = ********   CDtot = 0.5\n");
        assert!(!raw.contains_key("CLtot"));
        assert_eq!(raw["CDtot"], 0.5);
    }

    #[test]
    fn mapped_results_carry_common_keys() {
        let airplane = glider();
        let op = OperatingPoint::new(100.0, 5.0, 0.0);
        let r = Avl::map_results(&parse_stability_output(SAMPLE), &airplane, &op).unwrap();
        assert!((r.get("CL").unwrap() - 0.542).abs() < 1e-12);
        assert!((r.get("CD").unwrap() - 0.011).abs() < 1e-12);
        assert!((r.get("Cm").unwrap() + 0.04567).abs() < 1e-12);
        assert_eq!(r.get("x_np"), Some(0.1234));
        assert_eq!(r.get("CDi"), Some(0.011));
        let q = op.dynamic_pressure();
        assert!((r.get("L").unwrap() - 0.542 * q * airplane.s_ref).abs() < 1e-9);
        assert!(r.get("F_g_z").unwrap() > 0.0);
    }

    #[test]
    fn missing_totals_is_a_parse_error() {
        let airplane = glider();
        let op = OperatingPoint::new(100.0, 5.0, 0.0);
        let err = Avl::map_results(&BTreeMap::new(), &airplane, &op).unwrap_err();
        assert!(matches!(err, AeroError::Parse { .. }));
    }

    #[test]
    fn geometry_file_lists_surfaces_sections_and_bodies() {
        let airplane = glider();
        let avl = Avl::default();
        let text = avl.geometry_file(&airplane, &OperatingPoint::new(100.0, 5.0, 0.0));
        assert!(text.starts_with("glider\n"));
        assert!(text.contains("SURFACE\nMain Wing\n"));
        assert!(text.contains("YDUPLICATE\n0.0"));
        assert_eq!(text.matches("SECTION").count(), 3);
        assert!(text.contains("NACA\n0010"));
        assert!(text.contains("BODY\nFuse"));
        assert!(text.contains("BFIL\nbody_0_Fuse.bfil"));
        assert!(!text.contains("CDCL"));
    }

    #[test]
    fn body_profile_wraps_from_tail_over_nose() {
        let airplane = glider();
        let text = Avl::body_file(&airplane.fuselages[0]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Fuse");
        assert_eq!(lines.len(), 1 + 3 + 2);
        assert_eq!(lines[1], "1 0");
        assert_eq!(lines[2], "0.5 0.05");
        assert_eq!(lines[5], "1 0");
    }

    #[test]
    fn keystrokes_set_attitude_and_save_derivatives() {
        let k = Avl::default().keystrokes(&OperatingPoint::new(100.0, 5.0, -2.0));
        let order = ["OPER", "V 100", "A A ", "B B -", "X\n", "ST output.st", "QUIT"];
        let mut at = 0;
        for needle in order {
            let found = k[at..].find(needle).unwrap_or_else(|| panic!("{needle} missing"));
            at += found + needle.len();
        }
    }

    #[test]
    fn missing_binary_is_external_error() {
        let avl = Avl::new("definitely-not-an-avl-binary-4711");
        let err = avl
            .run(&glider(), &OperatingPoint::new(100.0, 5.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, AeroError::External { .. }), "{err}");
    }

    #[cfg(unix)]
    fn fake_avl(name: &str, body: &str) -> (PathBuf, Avl) {
        use std::os::unix::fs::PermissionsExt;
        let dir = std::env::temp_dir().join(format!("af-fake-avl-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("avl");
        std::fs::write(&script, format!("#!/bin/sh\ncat > /dev/null\n{body}\n")).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let mut avl = Avl::new(script.to_string_lossy());
        avl.work_dir = dir.clone();
        (dir, avl)
    }

    #[cfg(unix)]
    #[test]
    fn stability_file_written_by_solver_is_mapped() {
        let (dir, avl) = fake_avl("ok", "test -f airplane.avl || exit 9\ncat ../stability.fixture > output.st");
        std::fs::write(dir.join("stability.fixture"), SAMPLE).unwrap();
        let r = avl.run(&glider(), &OperatingPoint::new(100.0, 5.0, 0.0)).unwrap();
        assert!((r.get("CL").unwrap() - 0.542).abs() < 1e-12);
        assert!((r.get("Cm").unwrap() + 0.04567).abs() < 1e-12);
        assert_eq!(r.get("x_np"), Some(0.1234));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn hung_solver_times_out() {
        let (dir, mut avl) = fake_avl("hang", "sleep 30");
        avl.timeout = Duration::from_millis(200);
        let err = avl.run(&glider(), &OperatingPoint::new(100.0, 5.0, 0.0)).unwrap_err();
        match err {
            AeroError::External { message, .. } => assert!(message.contains("timed out"), "{message}"),
            other => panic!("unexpected error: {other}"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn failing_exit_status_is_external_error() {
        let (dir, avl) = fake_avl("fail", "cat ../stability.fixture > output.st\nexit 3");
        std::fs::write(dir.join("stability.fixture"), SAMPLE).unwrap();
        let err = avl.run(&glider(), &OperatingPoint::new(100.0, 5.0, 0.0)).unwrap_err();
        match err {
            AeroError::External { message, .. } => assert!(message.contains("exited with"), "{message}"),
            other => panic!("unexpected error: {other}"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
