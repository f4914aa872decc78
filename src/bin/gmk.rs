//! Generate grid graphs and meshes

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use scotch::defs::Gnum;
use scotch::error::{Result, ScotchError};
use scotch::graph_build::{graph_build, Grid2Gen, Grid3Gen, Stencil};
use scotch::graph_io::graph_save;
use scotch::mesh::Mesh;
use scotch::mesh_io::mesh_save;

#[derive(Parser)]
#[command(name = "gmk", about = "Generate grid source graphs and meshes")]
struct Cli {
    #[command(subcommand)]
    kind: Kind,

    /// output file, standard output when absent or "-"
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// base value of the generated numbering
    #[arg(short, long, default_value_t = 0, global = true)]
    base: Gnum,

    /// write a mesh of square or cubic elements instead of a graph
    #[arg(long, global = true)]
    mesh: bool,

    /// connect diagonal neighbors too (graphs only)
    #[arg(short = 'e', long, global = true)]
    full: bool,

    /// wrap around the grid borders (graphs only)
    #[arg(short, long, global = true)]
    torus: bool,
}

#[derive(Subcommand)]
enum Kind {
    /// 2D grid
    Grid2 { dimx: Gnum, dimy: Gnum },
    /// 3D grid
    Grid3 { dimx: Gnum, dimy: Gnum, dimz: Gnum },
}

fn run(cli: &Cli) -> Result<()> {
    let dims: Vec<Gnum> = match cli.kind {
        Kind::Grid2 { dimx, dimy } => vec![dimx, dimy],
        Kind::Grid3 { dimx, dimy, dimz } => vec![dimx, dimy, dimz],
    };
    if let Some(d) = dims.iter().find(|&&d| d < 1) {
        return Err(ScotchError::InvalidInput(format!("invalid grid dimension {d}")));
    }
    let mut writer: Box<dyn Write> = match &cli.output {
        Some(p) if p.as_os_str() != "-" => Box::new(BufWriter::new(File::create(p)?)),
        _ => Box::new(BufWriter::new(io::stdout())),
    };

    let stencil = if cli.full { Stencil::Element } else { Stencil::Plain };
    match (&cli.kind, cli.mesh) {
        (&Kind::Grid2 { dimx, dimy }, true) => {
            mesh_save(&Mesh::grid2(cli.base, dimx, dimy)?, &mut writer)?;
        }
        (&Kind::Grid3 { dimx, dimy, dimz }, true) => {
            mesh_save(&Mesh::grid3(cli.base, dimx, dimy, dimz)?, &mut writer)?;
        }
        (&Kind::Grid2 { dimx, dimy }, false) => {
            let mut gen = Grid2Gen::new(dimx, dimy).stencil(stencil).torus(cli.torus);
            graph_save(&graph_build(cli.base, &mut gen)?, &mut writer)?;
        }
        (&Kind::Grid3 { dimx, dimy, dimz }, false) => {
            let mut gen = Grid3Gen::new(dimx, dimy, dimz).stencil(stencil).torus(cli.torus);
            graph_save(&graph_build(cli.base, &mut gen)?, &mut writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::init();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gmk: ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
