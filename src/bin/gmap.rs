//! Map a graph onto a complete graph target architecture

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use scotch::arch::ArchCmplt;
use scotch::defs::Gnum;
use scotch::error::{Result, ScotchError};
use scotch::graph_io::graph_load;
use scotch::graph_map::graph_map;
use scotch::strat::Strat;
use scotch::vgraph_separate_st::VgraphSeparate;

const STRAT_GRAPH_MAP_DEFAULT: &str = "/(vert>120)?m{vert=100,low=g,asc=f}:g f;";

#[derive(Parser)]
#[command(name = "gmap", about = "Map a source graph onto a target architecture")]
struct Cli {
    /// source graph file, standard input when absent or "-"
    input: Option<PathBuf>,

    /// mapping file, standard output when absent or "-"
    output: Option<PathBuf>,

    /// map onto a complete graph of this many terminals
    #[arg(short = 'c', long, conflicts_with = "arch")]
    cmplt: Option<Gnum>,

    /// target architecture file
    #[arg(short = 'a', long)]
    arch: Option<PathBuf>,

    /// separation strategy used for every bipartition
    #[arg(short = 'm', long)]
    strat: Option<String>,

    /// print mapping statistics on standard error
    #[arg(short = 's', long)]
    stats: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(cli: &Cli) -> Result<()> {
    let arch = match (&cli.arch, cli.cmplt) {
        (Some(path), _) => ArchCmplt::load(BufReader::new(File::open(path)?))?,
        (None, Some(numnbr)) => ArchCmplt::new(numnbr)?,
        (None, None) => {
            return Err(ScotchError::InvalidInput(
                "a target architecture is required (-c or -a)".into(),
            ))
        }
    };
    let reader: Box<dyn BufRead> = match &cli.input {
        Some(p) if p.as_os_str() != "-" => Box::new(BufReader::new(File::open(p)?)),
        _ => Box::new(BufReader::new(io::stdin())),
    };
    let graf = graph_load(reader)?;
    let strat: Strat<VgraphSeparate> =
        Strat::parse(cli.strat.as_deref().unwrap_or(STRAT_GRAPH_MAP_DEFAULT))?;
    info!("read graph: {} vertices, {} arcs", graf.vertnbr, graf.edgenbr);

    let mapping = graph_map(&graf, &arch, &strat)?;
    let mut writer: Box<dyn Write> = match &cli.output {
        Some(p) if p.as_os_str() != "-" => Box::new(BufWriter::new(File::create(p)?)),
        _ => Box::new(BufWriter::new(io::stdout())),
    };
    mapping.save(&graf, &mut writer)?;
    writer.flush()?;

    if cli.stats {
        let stats = mapping.stats(&graf, &arch)?;
        eprintln!("M\tTerminals={}", arch.numnbr);
        eprintln!(
            "M\tLoads: min={} max={} imbalance={:.4}",
            stats.loadtab.iter().min().copied().unwrap_or(0),
            stats.loadtab.iter().max().copied().unwrap_or(0),
            stats.imbalance
        );
        eprintln!("M\tCut edges={} communication load={}", stats.cutnbr, stats.commload);
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
            eprintln!("gmap: ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
