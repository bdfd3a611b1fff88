use chromatic::graph::{BaseGraph, HashMapGraph};
use chromatic::io::{DimacsRead, EdgeListRead, GexfWriter, ParsedGraph};
use chromatic::solver::Solver;
use chromatic::timeout::initialize_timeout;
use std::fs::File;
use std::io;
use std::io::{stdin, BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use structopt::StructOpt;

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, Clone, Copy)]
enum Format {
    EdgeList,
    Dimacs,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edge-list" => Ok(Format::EdgeList),
            "dimacs" => Ok(Format::Dimacs),
            _ => Err(format!("unknown format {}", s)),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "chromatic-cli",
    about = "Computes the chromatic number of a given input graph."
)]
struct Opt {
    /// Input file. `stdin` if not specified.
    #[structopt(parse(from_os_str))]
    input: Option<PathBuf>,

    /// Input format, `edge-list` or `dimacs`. Files ending in `.col` default to
    /// `dimacs`, everything else to `edge-list`.
    #[structopt(short, long)]
    format: Option<Format>,

    /// Only compute bounds, skip the exhaustive search.
    #[structopt(short, long)]
    heuristic: bool,

    /// Skip the reductions and search the whole graph.
    #[structopt(long)]
    no_cleaning: bool,

    /// Time budget in seconds. Bounds are reported if it runs out.
    #[structopt(short, long)]
    timeout: Option<u64>,

    /// Writes the graph with a heuristic coloring as GEXF.
    #[structopt(short, long, parse(from_os_str))]
    export: Option<PathBuf>,

    /// Log verbosity, repeat for more output. Without it `RUST_LOG` decides.
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn read<T: BufRead>(format: Format, reader: T) -> io::Result<ParsedGraph> {
    match format {
        Format::EdgeList => EdgeListRead(reader).parse(),
        Format::Dimacs => DimacsRead(reader).parse(),
    }
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    #[cfg(feature = "logging")]
    match opt.verbose {
        0 => chromatic::logging::build_logger(),
        1 => chromatic::logging::build_logger_for_level(log::LevelFilter::Info),
        _ => chromatic::logging::build_logger_for_level(log::LevelFilter::Debug),
    }
    #[cfg(feature = "handle-ctrlc")]
    chromatic::signals::initialize()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    if let Some(seconds) = opt.timeout {
        initialize_timeout(Duration::from_secs(seconds))?;
    }

    let format = opt.format.unwrap_or_else(|| match &opt.input {
        Some(path) if path.extension().map_or(false, |e| e == "col") => Format::Dimacs,
        _ => Format::EdgeList,
    });
    let parsed = match &opt.input {
        Some(path) => read(format, BufReader::new(File::open(path)?))?,
        None => {
            let stdin = stdin();
            let lock = stdin.lock();
            read(format, lock)?
        }
    };
    if !parsed.malformed_lines.is_empty() {
        eprintln!(
            "c skipped {} malformed lines: {:?}",
            parsed.malformed_lines.len(),
            parsed.malformed_lines
        );
    }
    let graph: HashMapGraph = parsed.graph;
    println!(
        "c graph with {} vertices and {} edges",
        graph.order(),
        graph.size()
    );

    let solver = if opt.heuristic {
        println!("c Running in heuristic mode.");
        Solver::default_heuristic()
    } else {
        println!("c Running in exact mode.");
        Solver::default_exact()
    }
    .use_cleaning(!opt.no_cleaning);

    let result = solver.solve(&graph);
    if let Some(lower) = result.lower() {
        println!("LOWER BOUND = {}", lower);
    }
    if let Some(upper) = result.upper() {
        println!("UPPER BOUND = {}", upper);
    }
    match result.exact_value() {
        Some(exact) => println!("CHROMATIC NUMBER = {}", exact),
        None if !result.is_ready() => println!("c interrupted before the search finished"),
        None => {}
    }

    if let Some(path) = opt.export {
        let mut colored = graph.clone();
        solver.upperbound(&mut colored);
        let writer = BufWriter::new(File::create(path)?);
        GexfWriter::new(&colored, writer).output()?;
    }
    Ok(())
}
