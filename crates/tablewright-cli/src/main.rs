//! tablewright CLI - build parametric tables from the command line
//!
//! Reads a TOML or JSON parameter file (or a style preset), builds the
//! table and reports cut sizes, joinery and anything that was clamped or
//! failed along the way.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tablewright::{
    build_table, init_kernel, write_stl, FurnitureParameters, JoineryWarning, PartDimensions,
    Style, TableJoinery, TableModel,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tablewright")]
#[command(about = "Parametric table geometry and joinery", long_about = None)]
struct Cli {
    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a table and print its cut list
    Build {
        /// Parameter file (.toml or .json)
        params: Option<PathBuf>,
        /// Start from a style preset instead of a file
        #[arg(short, long, conflicts_with = "params")]
        preset: Option<StyleArg>,
        /// Write every placed part to a binary STL file
        #[arg(long)]
        stl: Option<PathBuf>,
    },
    /// Print joint sizes and part dimensions as JSON
    Joinery {
        /// Parameter file (.toml or .json)
        params: Option<PathBuf>,
        /// Start from a style preset instead of a file
        #[arg(short, long, conflicts_with = "params")]
        preset: Option<StyleArg>,
    },
    /// Print the parameters of a style preset
    Preset {
        /// Style to print
        style: StyleArg,
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Shaker,
    Farmhouse,
    Mission,
    MidCentury,
}

impl From<StyleArg> for Style {
    fn from(s: StyleArg) -> Self {
        match s {
            StyleArg::Shaker => Style::Shaker,
            StyleArg::Farmhouse => Style::Farmhouse,
            StyleArg::Mission => Style::Mission,
            StyleArg::MidCentury => Style::MidCentury,
        }
    }
}

#[derive(Serialize)]
struct JoineryReport<'a> {
    joinery: &'a TableJoinery,
    dimensions: &'a [PartDimensions],
    warnings: &'a [JoineryWarning],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    init_kernel();

    match cli.command {
        Commands::Build {
            params,
            preset,
            stl,
        } => {
            let params = resolve_params(params.as_deref(), preset)?;
            let model = build_table(&params);
            print_cut_list(&model);
            if let Some(path) = stl {
                write_stl(&model, &path)?;
                println!("Exported STL to {}", path.display());
            }
            if !model.diagnostics.is_clean() {
                bail!(
                    "{} part(s) failed to build and {} joint(s) were not cut",
                    model.diagnostics.geometry.len(),
                    model.diagnostics.cuts.len()
                );
            }
        }
        Commands::Joinery { params, preset } => {
            let params = resolve_params(params.as_deref(), preset)?;
            let model = build_table(&params);
            let report = JoineryReport {
                joinery: &model.joinery,
                dimensions: &model.dimensions,
                warnings: &model.diagnostics.warnings,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Preset { style, json } => {
            let params = FurnitureParameters::preset(style.into());
            let text = if json {
                params.to_json_string()?
            } else {
                params.to_toml_string()?
            };
            println!("{text}");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "tablewright=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_params(path: Option<&Path>, preset: Option<StyleArg>) -> Result<FurnitureParameters> {
    match (path, preset) {
        (Some(path), _) => FurnitureParameters::load(path)
            .with_context(|| format!("reading {}", path.display())),
        (None, Some(style)) => Ok(FurnitureParameters::preset(style.into())),
        (None, None) => Ok(FurnitureParameters::default()),
    }
}

fn print_cut_list(model: &TableModel) {
    println!("{:<22} {:>9} {:>9} {:>9}", "part", "length", "width", "thick");
    for d in &model.dimensions {
        println!(
            "{:<22} {:>9.3} {:>9.3} {:>9.3}",
            d.id.to_string(),
            d.length,
            d.width,
            d.thickness
        );
    }

    let diag = &model.diagnostics;
    for v in &diag.violations {
        println!("clamped  {v}");
    }
    for w in &diag.warnings {
        println!("joinery  {w:?}");
    }
    for f in &diag.geometry {
        println!("failed   {}: {}", f.id, f.error);
    }
    for f in &diag.cuts {
        println!("uncut    {}: {}", f.id, f.error);
    }
}
