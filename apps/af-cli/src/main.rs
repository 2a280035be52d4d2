use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use af_app::{
    AppError, AppResult, ComparisonOptions, PolarOptions, attach_polars, build_airplane,
    build_operating_point, demo_study, export_vspscript, load_study, render_table, run_comparison,
    save_study, summarize, validate_study,
};
use af_project::schema::{PolarSourceDef, Study};
use af_vsp::{VspScriptOptions, wrap_script};

#[derive(Parser)]
#[command(name = "airframe")]
#[command(about = "airframe - aircraft aerodynamics toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where a command's airplane and settings come from.
#[derive(clap::Args)]
struct StudyArgs {
    /// Path to a study YAML file (built-in glider when omitted)
    study_path: Option<PathBuf>,
}

#[derive(clap::Args)]
struct PolarArgs {
    /// Polar cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Polar source
    #[arg(long, value_enum)]
    polars: Option<PolarSourceArg>,
    /// XFoil executable
    #[arg(long)]
    xfoil: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolarSourceArg {
    Xfoil,
    ThinAirfoil,
}

impl From<PolarSourceArg> for PolarSourceDef {
    fn from(arg: PolarSourceArg) -> Self {
        match arg {
            PolarSourceArg::Xfoil => PolarSourceDef::Xfoil,
            PolarSourceArg::ThinAirfoil => PolarSourceDef::ThinAirfoil,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compare AeroBuildup, AVL and the vortex lattice method on one airplane
    Compare {
        #[command(flatten)]
        study: StudyArgs,
        #[command(flatten)]
        polars: PolarArgs,
        /// AVL executable
        #[arg(long)]
        avl: Option<String>,
        /// Relative tolerance for AeroBuildup vs AVL agreement
        #[arg(long)]
        rel: Option<f64>,
        /// Absolute tolerance for AeroBuildup vs AVL agreement
        #[arg(long)]
        abs: Option<f64>,
        /// Skip the AVL run
        #[arg(long)]
        no_avl: bool,
    },
    /// Compute or load cached polars for every airfoil in a study
    Polars {
        #[command(flatten)]
        study: StudyArgs,
        #[command(flatten)]
        polars: PolarArgs,
    },
    /// Write an OpenVSP script for a study's airplane
    Vspscript {
        #[command(flatten)]
        study: StudyArgs,
        /// Output .vspscript path
        #[arg(short, long)]
        output: PathBuf,
        /// Leave the draw type of every geometry unchanged
        #[arg(long)]
        no_shade: bool,
    },
    /// Wrap a VSPScript snippet file in a runnable main()
    Wrap {
        /// Snippet file
        snippet: PathBuf,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Leave the draw type of every geometry unchanged
        #[arg(long)]
        no_shade: bool,
    },
    /// Validate study file syntax and geometry
    Validate {
        /// Path to the study YAML file
        study_path: PathBuf,
    },
    /// Write the built-in glider study to a YAML file
    DemoStudy {
        /// Output YAML path
        output: PathBuf,
    },
}

fn main() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            study,
            polars,
            avl,
            rel,
            abs,
            no_avl,
        } => cmd_compare(&study, &polars, avl, rel, abs, no_avl),
        Commands::Polars { study, polars } => cmd_polars(&study, &polars),
        Commands::Vspscript {
            study,
            output,
            no_shade,
        } => cmd_vspscript(&study, &output, no_shade),
        Commands::Wrap {
            snippet,
            output,
            no_shade,
        } => cmd_wrap(&snippet, output.as_deref(), no_shade),
        Commands::Validate { study_path } => cmd_validate(&study_path),
        Commands::DemoStudy { output } => cmd_demo_study(&output),
    }
}

/// Loaded study plus the directory its relative paths resolve against.
fn open_study(args: &StudyArgs) -> AppResult<(Study, PathBuf)> {
    match &args.study_path {
        Some(path) => {
            let study = load_study(path)?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((study, base_dir))
        }
        None => Ok((demo_study(), PathBuf::from("."))),
    }
}

fn apply_polar_args(study: &mut Study, args: &PolarArgs) {
    if let Some(dir) = &args.cache_dir {
        study.settings.polar_cache_dir = dir.clone();
    }
    if let Some(source) = args.polars {
        study.settings.polar_source = source.into();
    }
    if let Some(xfoil) = &args.xfoil {
        study.settings.xfoil_command = xfoil.clone();
    }
}

fn cmd_compare(
    study_args: &StudyArgs,
    polar_args: &PolarArgs,
    avl: Option<String>,
    rel: Option<f64>,
    abs: Option<f64>,
    no_avl: bool,
) -> AppResult<()> {
    let (mut study, base_dir) = open_study(study_args)?;
    apply_polar_args(&mut study, polar_args);
    if let Some(avl) = avl {
        study.settings.avl_command = avl;
    }
    if let Some(rel) = rel {
        study.settings.tolerance.rel = rel;
    }
    if let Some(abs) = abs {
        study.settings.tolerance.abs = abs;
    }
    if !(study.settings.tolerance.rel >= 0.0 && study.settings.tolerance.abs >= 0.0) {
        return Err(AppError::InvalidInput(
            "tolerances must be non-negative".to_string(),
        ));
    }

    let airplane = build_airplane(&study, &base_dir)?;
    let op = build_operating_point(&study.operating_point);
    let started = Instant::now();
    let polars = attach_polars(&airplane, &PolarOptions::from_settings(&study.settings, &base_dir))?;

    let options = ComparisonOptions {
        skip_avl: no_avl,
        ..ComparisonOptions::from_settings(&study.settings)
    };
    let table = run_comparison(&airplane, &op, &polars, &options)?;

    print!("{}", render_table(&table));
    eprintln!("Completed in {:.2} s", started.elapsed().as_secs_f64());
    Ok(())
}

fn cmd_polars(study_args: &StudyArgs, polar_args: &PolarArgs) -> AppResult<()> {
    let (mut study, base_dir) = open_study(study_args)?;
    apply_polar_args(&mut study, polar_args);
    let airplane = build_airplane(&study, &base_dir)?;
    let options = PolarOptions::from_settings(&study.settings, &base_dir);
    let library = attach_polars(&airplane, &options)?;

    println!("Polars in {}:", options.cache_dir.display());
    for name in library.names() {
        let count = library.get(name).map(|set| set.polars.len()).unwrap_or(0);
        println!("  {} ({} Reynolds numbers)", name, count);
    }
    Ok(())
}

fn script_options(no_shade: bool) -> VspScriptOptions {
    if no_shade {
        VspScriptOptions::default().without_shading()
    } else {
        VspScriptOptions::default()
    }
}

fn cmd_vspscript(study_args: &StudyArgs, output: &Path, no_shade: bool) -> AppResult<()> {
    let (study, base_dir) = open_study(study_args)?;
    let airplane = build_airplane(&study, &base_dir)?;
    export_vspscript(&airplane, output, &script_options(no_shade))?;
    println!("✓ Wrote {}", output.display());
    Ok(())
}

fn cmd_wrap(snippet: &Path, output: Option<&Path>, no_shade: bool) -> AppResult<()> {
    let body = std::fs::read_to_string(snippet)?;
    let text = wrap_script(&body, &script_options(no_shade));
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!("✓ Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn cmd_validate(study_path: &Path) -> AppResult<()> {
    println!("Validating study: {}", study_path.display());
    let study = load_study(study_path)?;
    let base_dir = study_path.parent().unwrap_or_else(|| Path::new("."));
    validate_study(&study, base_dir)?;
    let airplane = build_airplane(&study, base_dir)?;
    let summary = summarize(&study, &airplane);
    println!("✓ Study is valid");
    println!(
        "  {} - {} ({} wings, {} fuselages)",
        summary.name, summary.airplane, summary.wing_count, summary.fuselage_count
    );
    println!("  Airfoils: {}", summary.airfoils.join(", "));
    println!(
        "  S_ref = {:.4} m², c_ref = {:.4} m, b_ref = {:.4} m",
        summary.s_ref, summary.c_ref, summary.b_ref
    );
    Ok(())
}

fn cmd_demo_study(output: &Path) -> AppResult<()> {
    save_study(output, &demo_study())?;
    println!("✓ Wrote {}", output.display());
    Ok(())
}
