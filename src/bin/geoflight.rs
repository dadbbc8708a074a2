use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use geoflight::{Graph, GraphPipeline, PipelineOpts, build_geodata_cache, render_test_image};

#[derive(Parser, Debug)]
#[command(name = "geoflight", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// JSON file with run options; defaults apply to missing fields.
    #[arg(long, global = true)]
    opts: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the opening frame at one vertex as a PNG.
    Testimage(TestImageArgs),
    /// Run one stage of the graph generation.
    Graph(GraphArgs),
}

#[derive(Parser, Debug)]
struct TestImageArgs {
    /// Graph definition JSON.
    graph: PathBuf,
    /// Vertex id.
    vertex: String,
    /// Output PNG path.
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct GraphArgs {
    #[arg(value_enum)]
    stage: Stage,
    /// Graph definition JSON.
    graph: PathBuf,
    /// Graph name, letters, digits, `_` and `-` only.
    name: String,
    /// Edge index (render only).
    #[arg(default_value_t = 0)]
    index: usize,

    /// Render projection batches in parallel. Recorded at pregenerate and
    /// honoured again when passed to render.
    #[arg(long)]
    parallel: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Stage {
    Pregenerate,
    Preload,
    Render,
    Commit,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let opts = match &cli.opts {
        Some(path) => PipelineOpts::load(path)?.with_env_overrides(),
        None => PipelineOpts::from_env(),
    };
    match cli.cmd {
        Command::Testimage(args) => cmd_testimage(args, opts),
        Command::Graph(args) => cmd_graph(args, opts),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_testimage(args: TestImageArgs, opts: PipelineOpts) -> anyhow::Result<ExitCode> {
    let graph = Graph::load(&args.graph)?;
    let cache = build_geodata_cache(&opts)?;
    render_test_image(
        &graph,
        &args.vertex,
        &cache,
        opts.natural_earth_dir.as_deref(),
        &args.out,
    )
    .with_context(|| format!("render test image for vertex '{}'", args.vertex))?;
    eprintln!("wrote {}", args.out.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_graph(args: GraphArgs, mut opts: PipelineOpts) -> anyhow::Result<ExitCode> {
    opts.parallel_batches |= args.parallel;
    let pipeline = GraphPipeline::open(&args.graph, &args.name, opts.clone())?;
    match args.stage {
        Stage::Pregenerate => pipeline.pregenerate()?,
        Stage::Preload => pipeline.preload(&build_geodata_cache(&opts)?)?,
        Stage::Render => {
            if !pipeline.render(args.index)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Stage::Commit => {
            let target = pipeline.commit()?;
            eprintln!("published {}", target.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}
