//! Side-by-side comparison of AeroBuildup, AVL and the vortex lattice method.

use std::collections::BTreeSet;
use std::time::Instant;

use af_aero::{AeroBuildup, AeroResults, AeroSolver, Avl, OperatingPoint, VortexLatticeMethod};
use af_core::numeric::{Tolerances, approx_agrees};
use af_geometry::Airplane;
use af_polars::PolarLibrary;
use af_project::schema::SettingsDef;
use tracing::{debug, info};

use crate::error::AppResult;

const HEADER: [&str; 5] = ["Output", "AeroBuild", "AVL", "VLM", "AB & AVL Significantly Different?"];

/// Options for running the comparison.
#[derive(Debug, Clone)]
pub struct ComparisonOptions {
    /// AeroBuildup vs AVL agreement band
    pub tolerance: Tolerances,
    /// Skip the external AVL run entirely
    pub skip_avl: bool,
    pub avl_command: String,
    pub vlm_chordwise_panels: usize,
    pub vlm_spanwise_panels_per_section: usize,
    pub buildup_strips_per_section: usize,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self::from_settings(&SettingsDef::default())
    }
}

impl ComparisonOptions {
    pub fn from_settings(settings: &SettingsDef) -> Self {
        Self {
            tolerance: settings.tolerance,
            skip_avl: false,
            avl_command: settings.avl_command.clone(),
            vlm_chordwise_panels: settings.vlm.chordwise_panels,
            vlm_spanwise_panels_per_section: settings.vlm.spanwise_panels_per_section,
            buildup_strips_per_section: settings.buildup_strips_per_section,
        }
    }
}

/// One output compared across the three methods.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub name: String,
    pub aero_buildup: f64,
    /// `None` when AVL was skipped
    pub avl: Option<f64>,
    pub vlm: Option<f64>,
    pub significantly_different: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn row(&self, name: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn disagreements(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|r| r.significantly_different)
    }
}

/// Rows over the sorted union of AeroBuildup and AVL output names.
///
/// Names that either of the two lacks are skipped. Non-finite values keep
/// their row and are flagged, since they never agree. Without AVL results
/// every AeroBuildup output gets a row.
pub fn build_rows(
    aero_buildup: &AeroResults,
    avl: Option<&AeroResults>,
    vlm: &AeroResults,
    tolerance: Tolerances,
) -> ComparisonTable {
    let mut keys: BTreeSet<&str> = aero_buildup.keys().collect();
    if let Some(avl) = avl {
        keys.extend(avl.keys());
    }

    let mut rows = Vec::with_capacity(keys.len());
    for key in keys {
        let Some(ab) = aero_buildup.get(key) else {
            debug!(key, solver = "AeroBuildup", "row skipped, output missing");
            continue;
        };
        let av = match avl {
            Some(results) => match results.get(key) {
                Some(v) => Some(v),
                None => {
                    debug!(key, solver = "AVL", "row skipped, output missing");
                    continue;
                }
            },
            None => None,
        };
        rows.push(ComparisonRow {
            name: key.to_string(),
            aero_buildup: ab,
            avl: av,
            vlm: vlm.get(key),
            significantly_different: av.is_some_and(|av| !approx_agrees(ab, av, tolerance)),
        });
    }
    ComparisonTable { rows }
}

/// Run all three methods at one operating point, sequentially.
pub fn run_comparison(
    airplane: &Airplane,
    op: &OperatingPoint,
    polars: &PolarLibrary,
    options: &ComparisonOptions,
) -> AppResult<ComparisonTable> {
    let started = Instant::now();

    let buildup = AeroBuildup::new(polars.clone()).with_strips(options.buildup_strips_per_section);
    let ab = buildup.run_with_stability_derivatives(airplane, op)?;
    debug!(outputs = ab.len(), "AeroBuildup finished");

    let av = if options.skip_avl {
        None
    } else {
        let avl = Avl::new(options.avl_command.clone()).with_polars(polars.clone());
        Some(avl.run(airplane, op)?)
    };

    let vlm = VortexLatticeMethod::new(options.vlm_chordwise_panels, options.vlm_spanwise_panels_per_section)
        .run(airplane, op)?;

    let table = build_rows(&ab, av.as_ref(), &vlm, options.tolerance);
    info!(
        rows = table.rows.len(),
        flagged = table.disagreements().count(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "comparison complete"
    );
    Ok(table)
}

fn trim_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `printf`-style `%{width}.{precision}g`.
pub fn format_g(value: f64, width: usize, precision: usize) -> String {
    let p = precision.max(1);
    let body = if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        (if value > 0.0 { "inf" } else { "-inf" }).to_string()
    } else if value == 0.0 {
        (if value.is_sign_negative() { "-0" } else { "0" }).to_string()
    } else {
        let sci = format!("{:.*e}", p - 1, value);
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        if exponent < -4 || exponent >= p as i32 {
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{sign}{:02}", trim_fraction_zeros(mantissa), exponent.abs())
        } else {
            let decimals = (p as i32 - 1 - exponent).max(0) as usize;
            trim_fraction_zeros(&format!("{value:.decimals$}")).to_string()
        }
    };
    format!("{body:>width$}")
}

fn text_cell(s: &str) -> String {
    format!("{s:<10}")
}

fn number_cell(v: f64) -> String {
    format_g(v, 10, 4)
}

/// Console table: header, dashed rule, one line per row.
pub fn render_table(table: &ComparisonTable) -> String {
    let mut out = HEADER.map(text_cell).join(" | ");
    out.push('\n');
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for row in &table.rows {
        let cells = [
            text_cell(&row.name),
            number_cell(row.aero_buildup),
            row.avl.map_or_else(|| text_cell("-"), number_cell),
            row.vlm.map_or_else(|| text_cell("-"), number_cell),
            text_cell(if row.significantly_different { "*" } else { "" }),
        ];
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(pairs: &[(&str, f64)]) -> AeroResults {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn format_g_matches_printf() {
        assert_eq!(format_g(0.5, 10, 4), "       0.5");
        assert_eq!(format_g(1234.5678, 10, 4), "      1235");
        assert_eq!(format_g(12346.0, 10, 4), " 1.235e+04");
        assert_eq!(format_g(0.000123456, 10, 4), " 0.0001235");
        assert_eq!(format_g(0.0000123456, 10, 4), " 1.235e-05");
        assert_eq!(format_g(-4.2, 10, 4), "      -4.2");
        assert_eq!(format_g(9.99996, 10, 4), "        10");
        assert_eq!(format_g(0.0, 10, 4), "         0");
        assert_eq!(format_g(100.0, 10, 4), "       100");
    }

    #[test]
    fn rows_cover_union_and_skip_missing_names() {
        let ab = results(&[("CL", 0.5), ("CD", 0.02), ("Cm", f64::NAN), ("CLa", 5.0)]);
        let av = results(&[("CL", 0.52), ("CD", 0.05), ("Cm", -0.1), ("Xnp", 0.1)]);
        let vlm = results(&[("CL", 0.51)]);
        let table = build_rows(&ab, Some(&av), &vlm, Tolerances { rel: 0.5, abs: 0.01 });

        let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["CD", "CL", "Cm"]);
        let cl = table.row("CL").unwrap();
        assert_eq!(cl.vlm, Some(0.51));
        assert!(!cl.significantly_different);
        // |0.02 - 0.05| = 0.03 > max(0.025, 0.01)
        assert!(table.row("CD").unwrap().significantly_different);
        assert_eq!(table.row("CD").unwrap().vlm, None);
        let cm = table.row("Cm").unwrap();
        assert!(cm.aero_buildup.is_nan());
        assert!(cm.significantly_different);
    }

    #[test]
    fn nan_value_is_kept_and_flagged() {
        let ab = results(&[("CL", f64::NAN)]);
        let av = results(&[("CL", 0.5)]);
        let table = build_rows(&ab, Some(&av), &AeroResults::new(), Tolerances { rel: 0.5, abs: 0.01 });
        assert_eq!(table.rows.len(), 1);
        assert!(table.row("CL").unwrap().significantly_different);

        let line = render_table(&table).lines().nth(2).unwrap().to_string();
        assert_eq!(line, "CL         |        nan |        0.5 | -          | *         ");
    }

    #[test]
    fn without_avl_every_buildup_output_is_listed() {
        let ab = results(&[("CL", 0.5), ("CD", 0.02), ("Cm", f64::INFINITY)]);
        let table = build_rows(&ab, None, &AeroResults::new(), Tolerances { rel: 0.5, abs: 0.01 });
        assert_eq!(table.rows.len(), 3);
        assert!(table.rows.iter().all(|r| r.avl.is_none() && !r.significantly_different));
        assert_eq!(format_g(table.row("Cm").unwrap().aero_buildup, 10, 4), "       inf");
    }

    #[test]
    fn rendered_table_layout() {
        let table = ComparisonTable {
            rows: vec![ComparisonRow {
                name: "CL".to_string(),
                aero_buildup: 0.5,
                avl: Some(0.25),
                vlm: None,
                significantly_different: true,
            }],
        };
        let text = render_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Output     | AeroBuild  | AVL        | VLM        | AB & AVL Significantly Different?"
        );
        assert_eq!(lines[1], "-".repeat(80));
        assert_eq!(lines[2], "CL         |        0.5 |       0.25 | -          | *         ");
    }
}
