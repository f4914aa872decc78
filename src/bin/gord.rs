//! Order a graph or a mesh for sparse factorization

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::info;

use scotch::error::Result;
use scotch::graph_io::graph_load;
use scotch::library::{graph_order, mesh_order, STRAT_GRAPH_ORDER_DEFAULT, STRAT_MESH_ORDER_DEFAULT};
use scotch::mesh_io::mesh_load;
use scotch::strat::Strat;

#[derive(Parser)]
#[command(name = "gord", about = "Compute a fill-reducing ordering of a graph or a mesh")]
struct Cli {
    /// source graph or mesh file, standard input when absent or "-"
    input: Option<PathBuf>,

    /// ordering file, standard output when absent or "-"
    output: Option<PathBuf>,

    /// ordering strategy
    #[arg(short = 'o', long)]
    strat: Option<String>,

    /// write the column block of every vertex to this file
    #[arg(short = 'm', long)]
    map: Option<PathBuf>,

    /// write the separator tree to this file
    #[arg(short = 't', long)]
    tree: Option<PathBuf>,

    /// the input is a mesh; its nodes are ordered
    #[arg(long)]
    mesh: bool,

    /// raise the log level, once per occurrence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(p) if p.as_os_str() != "-" => Box::new(BufReader::new(File::open(p)?)),
        _ => Box::new(BufReader::new(io::stdin())),
    })
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) if p.as_os_str() != "-" => Box::new(BufWriter::new(File::create(p)?)),
        _ => Box::new(BufWriter::new(io::stdout())),
    })
}

fn run(cli: &Cli) -> Result<()> {
    let start = Instant::now();
    let reader = open_input(cli.input.as_ref())?;
    let (order, vlbltax) = if cli.mesh {
        let mesh = mesh_load(reader)?;
        let strat = Strat::parse(cli.strat.as_deref().unwrap_or(STRAT_MESH_ORDER_DEFAULT))?;
        info!("read mesh: {} elements, {} nodes", mesh.velmnbr, mesh.vnodnbr);
        let order = mesh_order(&mesh, &strat)?;
        let vlbltax = mesh.vlbltax.as_ref().map(|t| t.sub(mesh.node_range()).rebased(mesh.baseval));
        (order, vlbltax)
    } else {
        let graf = graph_load(reader)?;
        let strat = Strat::parse(cli.strat.as_deref().unwrap_or(STRAT_GRAPH_ORDER_DEFAULT))?;
        info!("read graph: {} vertices, {} arcs", graf.vertnbr, graf.edgenbr);
        (graph_order(&graf, &strat)?, graf.vlbltax)
    };
    info!("ordering computed in {:.3} s", start.elapsed().as_secs_f64());

    let mut writer = open_output(cli.output.as_ref())?;
    order.save(vlbltax.as_ref(), &mut writer)?;
    writer.flush()?;
    if let Some(path) = &cli.map {
        let mut writer = BufWriter::new(File::create(path)?);
        order.save_map(vlbltax.as_ref(), &mut writer)?;
        writer.flush()?;
    }
    if let Some(path) = &cli.tree {
        let mut writer = BufWriter::new(File::create(path)?);
        order.save_tree(vlbltax.as_ref(), &mut writer)?;
        writer.flush()?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gord: ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
