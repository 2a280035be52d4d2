//! Smoke tests for the af-app service layer.

use std::path::PathBuf;

use af_app::*;
use af_project::schema::AirfoilDef;

fn repo_root() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // crates
    path.pop(); // repo root
    path
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("af-app-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn bundled_glider_study_loads_and_builds() {
    let path = repo_root().join("projects").join("glider.yaml");
    if !path.exists() {
        eprintln!("Skipping test: project not found at {:?}", path);
        return;
    }
    let study = load_study(&path).expect("load glider.yaml");
    let base_dir = path.parent().unwrap();
    validate_study(&study, base_dir).expect("valid study");

    let airplane = build_airplane(&study, base_dir).unwrap();
    let summary = summarize(&study, &airplane);
    assert_eq!(summary.wing_count, 3);
    assert_eq!(summary.fuselage_count, 1);
    assert_eq!(summary.airfoils, vec!["naca0010".to_string()]);
    assert!(summary.s_ref > 0.0 && summary.c_ref > 0.0 && summary.b_ref > 0.0);
}

#[test]
fn demo_study_matches_demo_airplane() {
    let study = demo_study();
    let airplane = demo_airplane().unwrap();
    assert_eq!(airplane.name, study.airplane.name);
    assert_eq!(airplane.wings.len(), 3);
    assert_eq!(airplane.fuselages[0].xsecs.len(), 30);

    let op = build_operating_point(&study.operating_point);
    assert_eq!(op.velocity_mps(), 100.0);
    assert!((op.alpha_deg() - 5.0).abs() < 1e-12);
}

#[test]
fn study_save_then_load_preserves_geometry() {
    let dir = scratch_dir("save");
    let path = dir.join("study.yaml");
    let study = demo_study();
    save_study(&path, &study).unwrap();
    let back = load_study(&path).unwrap();
    assert_eq!(back, study);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_airfoil_file_is_reported_with_path() {
    let mut study = demo_study();
    study.airplane.wings[0].xsecs[0].airfoil = AirfoilDef::File {
        name: "custom".to_string(),
        dat_file: PathBuf::from("does_not_exist.dat"),
    };
    let err = build_airplane(&study, &std::env::temp_dir()).unwrap_err();
    match err {
        AppError::AirfoilFileRead { path, .. } => assert!(path.ends_with("does_not_exist.dat")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_study_fails_validation() {
    let mut study = demo_study();
    study.airplane.wings[1].xsecs[0].chord_m = -1.0;
    assert!(matches!(
        validate_study(&study, &std::env::temp_dir()),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn vspscript_export_writes_wrapped_script() {
    let dir = scratch_dir("vsp");
    let path = dir.join("nested").join("glider.vspscript");
    let airplane = demo_airplane().unwrap();
    export_vspscript(&airplane, &path, &af_vsp::VspScriptOptions::default()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("void main()"));
    assert_eq!(text.matches("AddGeom( \"WING\"").count(), 3);
    assert_eq!(text.matches("AddGeom( \"FUSELAGE\"").count(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}
