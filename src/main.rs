#![deny(clippy::all)]
#![forbid(unsafe_code)]

use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::PathBuf;

use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use foresite::store::Tables;
use foresite::{boundary, navdata, snapshot};

#[derive(StructOpt)]
#[structopt(about = "Filters a live traffic snapshot down to regionally relevant flights")]
struct Args {
    /// Live traffic snapshot (JSON)
    #[structopt(name = "snapshot", parse(from_os_str))]
    snapshot: PathBuf,
    /// Navigation data text file
    #[structopt(short = "n", long = "navdata", parse(from_os_str))]
    navdata: PathBuf,
    /// Monitored airspace boundaries (ArcGIS query JSON)
    #[structopt(short = "b", long = "boundaries", parse(from_os_str))]
    boundaries: Option<PathBuf>,
    #[structopt(
        short = "o",
        long = "output",
        parse(from_os_str),
        default_value = "./tracked.json"
    )]
    output: PathBuf,
    /// Worker threads for route resolution. Defaults to one per core.
    #[structopt(short = "t", long = "threads")]
    threads: Option<usize>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::from_args();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    info!(path = %args.navdata.display(), "Loading navigation data...");
    let nav = navdata::parse::load_file(&args.navdata)?;

    let boundaries = match &args.boundaries {
        Some(path) => {
            info!(path = %path.display(), "Loading airspace boundaries...");
            boundary::load_file(path)?
        }
        None => Vec::new(),
    };

    let tables = Tables::new(nav, boundaries);

    info!(path = %args.snapshot.display(), "Processing traffic snapshot...");
    let whazzup = snapshot::load_file(&args.snapshot)?;
    let digest = snapshot::digest(&whazzup, &tables);

    info!(path = %args.output.display(), flights = digest.flights.len(), "Writing tracked flights...");
    let mut output = BufWriter::new(File::create(&args.output)?);
    serde_json::to_writer_pretty(&mut output, &digest)?;
    output.write_all(b"\n")?;
    output.flush()?;
    Ok(())
}
