//! Polar generation through an external XFoil process.

use crate::generator::{PolarGenerator, PolarRequest};
use crate::polar::{Polar, PolarSet};
use crate::{PolarError, PolarResult};
use af_geometry::Airfoil;
use crate::process::run_with_keystrokes;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const AIRFOIL_FILE: &str = "airfoil.dat";
const POLAR_FILE: &str = "polar.txt";

/// Drives the `xfoil` binary through a keystroke script.
#[derive(Debug, Clone)]
pub struct XfoilGenerator {
    pub command: String,
    pub max_iterations: usize,
    /// Wall-clock limit for one Reynolds number
    pub timeout: Duration,
    /// Parent directory for per-run scratch directories
    pub work_dir: PathBuf,
}

impl Default for XfoilGenerator {
    fn default() -> Self {
        Self {
            command: "xfoil".to_string(),
            max_iterations: 100,
            timeout: Duration::from_secs(120),
            work_dir: std::env::temp_dir(),
        }
    }
}

impl XfoilGenerator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Keystrokes for one Reynolds number.
    ///
    /// Positive angles are swept up from zero, then the boundary layer is
    /// reinitialised and negative angles are swept down, so each point starts
    /// from a converged neighbour.
    pub fn keystrokes(&self, airfoil: &Airfoil, request: &PolarRequest, reynolds: f64) -> String {
        let mut k = String::new();
        // Graphics off
        let _ = writeln!(k, "PLOP\nG F\n");
        match airfoil.naca() {
            Some(naca) => {
                let _ = writeln!(k, "NACA {}", naca.digits());
            }
            None => {
                let _ = writeln!(k, "LOAD {AIRFOIL_FILE}");
            }
        }
        if request.repanel {
            let _ = writeln!(k, "PANE");
        }
        let _ = writeln!(k, "OPER");
        let _ = writeln!(k, "ITER {}", self.max_iterations);
        let _ = writeln!(k, "VISC {reynolds:e}");
        let _ = writeln!(k, "M {}", request.mach);
        let _ = writeln!(k, "PACC\n{POLAR_FILE}\n");

        let mut up: Vec<f64> = request.alpha_deg.iter().copied().filter(|a| *a >= 0.0).collect();
        up.sort_by(f64::total_cmp);
        let mut down: Vec<f64> = request.alpha_deg.iter().copied().filter(|a| *a < 0.0).collect();
        down.sort_by(|a, b| b.total_cmp(a));

        for a in &up {
            let _ = writeln!(k, "A {a}");
        }
        if !down.is_empty() {
            let _ = writeln!(k, "INIT");
            for a in &down {
                let _ = writeln!(k, "A {a}");
            }
        }
        let _ = writeln!(k, "PACC\n\nQUIT");
        k
    }

    fn scratch_dir(&self, airfoil: &Airfoil, index: usize) -> PathBuf {
        let safe: String = airfoil
            .name()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.work_dir
            .join(format!("airframe-xfoil-{}-{safe}-{index}", std::process::id()))
    }

    fn run_one(&self, airfoil: &Airfoil, request: &PolarRequest, reynolds: f64, dir: &Path) -> PolarResult<Polar> {
        std::fs::create_dir_all(dir).map_err(|e| PolarError::io(dir, e))?;

        if airfoil.naca().is_none() {
            let mut dat = format!("{}\n", airfoil.name());
            for [x, y] in airfoil.coordinates() {
                let _ = writeln!(dat, "{x:.8} {y:.8}");
            }
            let path = dir.join(AIRFOIL_FILE);
            std::fs::write(&path, dat).map_err(|e| PolarError::io(&path, e))?;
        }

        let keystrokes = self.keystrokes(airfoil, request, reynolds);
        debug!(command = %self.command, airfoil = airfoil.name(), reynolds, "running xfoil");

        let status = run_with_keystrokes(&self.command, &[], dir, &keystrokes, self.timeout).map_err(|e| {
            PolarError::External {
                command: self.command.clone(),
                message: e.to_string(),
            }
        })?;
        if !status.success() {
            // XFoil often exits abnormally after the polar file is complete.
            warn!(?status, "xfoil exited with failure status");
        }

        let polar_path = dir.join(POLAR_FILE);
        let text = std::fs::read_to_string(&polar_path).map_err(|e| PolarError::io(&polar_path, e))?;
        let polar = parse_polar_file(&text, reynolds, request.mach)?;
        if polar.alpha_deg.is_empty() {
            return Err(PolarError::NoConvergence {
                airfoil: airfoil.name().to_string(),
                reynolds,
            });
        }
        Ok(polar)
    }
}

impl PolarGenerator for XfoilGenerator {
    fn name(&self) -> &str {
        "xfoil"
    }

    fn generate(&self, airfoil: &Airfoil, request: &PolarRequest) -> PolarResult<PolarSet> {
        let mut polars = Vec::with_capacity(request.reynolds.len());
        for (i, &re) in request.reynolds.iter().enumerate() {
            let dir = self.scratch_dir(airfoil, i);
            let result = self.run_one(airfoil, request, re, &dir);
            let _ = std::fs::remove_dir_all(&dir);
            polars.push(result?);
        }
        PolarSet::new(airfoil.name(), polars)
    }
}

/// Parse an XFoil polar accumulation file.
///
/// Data rows follow the dashed separator line; columns are
/// `alpha CL CD CDp CM Top_Xtr Bot_Xtr ...`. Rows are sorted by alpha and
/// duplicate angles keep the last converged value.
pub fn parse_polar_file(text: &str, reynolds: f64, mach: f64) -> PolarResult<Polar> {
    let mut rows: Vec<[f64; 4]> = Vec::new();
    let mut in_data = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("------") {
            in_data = true;
            continue;
        }
        if !in_data || trimmed.is_empty() {
            continue;
        }
        let cols: Vec<f64> = trimmed
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<_, _>>()
            .map_err(|e| PolarError::InvalidTable {
                what: format!("bad polar row '{trimmed}': {e}"),
            })?;
        if cols.len() < 5 {
            return Err(PolarError::InvalidTable {
                what: format!("polar row has {} columns, expected at least 5", cols.len()),
            });
        }
        rows.push([cols[0], cols[1], cols[2], cols[4]]);
    }

    rows.sort_by(|a, b| a[0].total_cmp(&b[0]));
    let mut polar = Polar {
        reynolds,
        mach,
        alpha_deg: Vec::new(),
        cl: Vec::new(),
        cd: Vec::new(),
        cm: Vec::new(),
    };
    for [a, cl, cd, cm] in rows {
        if polar.alpha_deg.last() == Some(&a) {
            polar.alpha_deg.pop();
            polar.cl.pop();
            polar.cd.pop();
            polar.cm.pop();
        }
        polar.alpha_deg.push(a);
        polar.cl.push(cl);
        polar.cd.push(cd);
        polar.cm.push(cm);
    }
    Ok(polar)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
       XFOIL         Version 6.99

 Calculated polar for: NACA 0010

 1 1 Reynolds number fixed          Mach number fixed

 xtrf =   1.000 (top)        1.000 (bottom)
 Mach =   0.000     Re =     0.100 e 6     Ncrit =   9.000

   alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr
  ------ -------- --------- --------- -------- -------- --------
   0.000   0.0000   0.01150   0.00420   0.0000   0.7000   0.7000
   1.000   0.1100   0.01160   0.00430  -0.0010   0.6500   0.7400
  -1.000  -0.1100   0.01160   0.00430   0.0010   0.7400   0.6500
   1.000   0.1120   0.01158   0.00429  -0.0011   0.6500   0.7400
";

    #[test]
    fn parses_sorted_and_deduplicated() {
        let p = parse_polar_file(SAMPLE, 1e5, 0.0).unwrap();
        assert_eq!(p.alpha_deg, vec![-1.0, 0.0, 1.0]);
        assert_eq!(p.cl[2], 0.1120);
        assert_eq!(p.cm[0], 0.0010);
        p.validate().unwrap();
    }

    #[test]
    fn empty_file_gives_empty_polar() {
        let p = parse_polar_file("header only\n", 1e5, 0.0).unwrap();
        assert!(p.alpha_deg.is_empty());
    }

    #[test]
    fn keystrokes_for_naca_with_repanel() {
        let generator = XfoilGenerator::default();
        let req = PolarRequest {
            reynolds: vec![1e5],
            mach: 0.0,
            alpha_deg: vec![-2.0, -1.0, 0.0, 1.0],
            repanel: true,
        };
        let k = generator.keystrokes(&Airfoil::new("naca0010").unwrap(), &req, 1e5);
        assert!(k.contains("NACA 0010\nPANE\nOPER\n"));
        assert!(k.contains("VISC 1e5"));
        let up = k.find("A 1").unwrap();
        let init = k.find("INIT").unwrap();
        let down = k.find("A -2").unwrap();
        assert!(up < init && init < down);
        assert!(k.find("A -1").unwrap() < down);
        assert!(k.trim_end().ends_with("QUIT"));
    }

    #[test]
    fn keystrokes_load_coordinate_airfoils() {
        let naca = af_geometry::Naca4::parse("naca4412").unwrap();
        let af = Airfoil::from_coordinates("custom", naca.coordinates(40)).unwrap();
        let k = XfoilGenerator::default().keystrokes(&af, &PolarRequest::default(), 3e5);
        assert!(k.contains("LOAD airfoil.dat"));
        assert!(!k.contains("PANE"));
    }

    #[test]
    fn missing_binary_is_external_error() {
        let generator = XfoilGenerator::new("definitely-not-an-xfoil-binary");
        let req = PolarRequest {
            reynolds: vec![1e5],
            ..PolarRequest::default()
        };
        let err = generator
            .generate(&Airfoil::new("naca0010").unwrap(), &req)
            .unwrap_err();
        assert!(matches!(err, PolarError::External { .. }));
    }

    #[cfg(unix)]
    fn fake_xfoil(name: &str, body: &str) -> (PathBuf, XfoilGenerator) {
        use std::os::unix::fs::PermissionsExt;
        let dir = std::env::temp_dir().join(format!("af-fake-xfoil-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("xfoil");
        std::fs::write(&script, format!("#!/bin/sh\ncat > /dev/null\n{body}\n")).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let mut generator = XfoilGenerator::new(script.to_string_lossy());
        generator.work_dir = dir.clone();
        (dir, generator)
    }

    #[cfg(unix)]
    #[test]
    fn polar_file_written_by_solver_is_collected() {
        let (dir, generator) = fake_xfoil("ok", "cat ../polar.fixture > polar.txt");
        std::fs::write(dir.join("polar.fixture"), SAMPLE).unwrap();
        let req = PolarRequest {
            reynolds: vec![1e5],
            ..PolarRequest::default()
        };
        let set = generator.generate(&Airfoil::new("naca0010").unwrap(), &req).unwrap();
        assert_eq!(set.polars.len(), 1);
        assert_eq!(set.polars[0].alpha_deg, vec![-1.0, 0.0, 1.0]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn hung_solver_times_out() {
        let (dir, mut generator) = fake_xfoil("hang", "sleep 30");
        generator.timeout = Duration::from_millis(200);
        let req = PolarRequest {
            reynolds: vec![1e5],
            ..PolarRequest::default()
        };
        let err = generator.generate(&Airfoil::new("naca0010").unwrap(), &req).unwrap_err();
        match err {
            PolarError::External { message, .. } => assert!(message.contains("timed out")),
            other => panic!("unexpected error: {other}"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
