use crate::bind::bind_positions;
use crate::config::load_config;
use crate::draw::{draw_network, label_nodes};
use crate::network::Network;
use crate::properties::NetworkProperties;
use crate::render::{render_svg, write_output_svg};
use crate::scene_dump::{SceneDump, write_scene_dump};
use anyhow::Result;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nwdraw", version, about = "Redraw netwulf network layouts as static images")]
pub struct Args {
    /// Log more (-v debug, -vv trace); RUST_LOG applies when not given
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw a network properties file as SVG or PNG
    Draw(DrawArgs),
    /// Copy node positions from a network properties file onto a node-link network
    Bind(BindArgs),
}

#[derive(ClapArgs, Debug)]
pub struct DrawArgs {
    /// Network properties JSON or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Side of the square figure in inches
    #[arg(short = 's', long = "figsize")]
    pub figsize: Option<f64>,

    /// Pixels per inch
    #[arg(short = 'd', long = "dpi")]
    pub dpi: Option<f64>,

    /// Write node ids next to the nodes
    #[arg(short = 'l', long = "labels")]
    pub labels: bool,

    /// Also write the drawn scene in device pixels as JSON
    #[arg(long = "dump-scene")]
    pub dump_scene: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct BindArgs {
    /// Node-link network JSON
    #[arg(short = 'n', long = "network")]
    pub network: PathBuf,

    /// Network properties JSON
    #[arg(short = 'p', long = "properties")]
    pub properties: PathBuf,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    match args.command {
        Command::Draw(draw) => run_draw(draw),
        Command::Bind(bind) => run_bind(bind),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_draw(args: DrawArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(size) = args.figsize {
        config.render.figure_size = (size, size);
    }
    if let Some(dpi) = args.dpi {
        config.render.dpi = dpi;
    }
    if !(config.render.square_side() > 0.0 && config.render.dpi > 0.0) {
        return Err(anyhow::anyhow!("Figure size and dpi must be positive"));
    }

    let input = read_input(args.input.as_deref())?;
    let props = NetworkProperties::from_json_str(&input)?;
    let (canvas, mut surface) = draw_network(&props, &config.render)?;
    if args.labels {
        label_nodes(&mut surface, &props);
    }

    if let Some(path) = args.dump_scene.as_deref() {
        write_scene_dump(path, &SceneDump::from_scene(&canvas, &surface))?;
    }

    let svg = render_svg(&canvas, &surface, &config.theme);
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref()),
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &canvas)
        }
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, canvas: &crate::canvas::Canvas) -> Result<()> {
    crate::render::write_output_png(svg, output, canvas)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _canvas: &crate::canvas::Canvas) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn run_bind(args: BindArgs) -> Result<()> {
    let mut network = Network::from_node_link_json(&std::fs::read_to_string(&args.network)?)?;
    let props = NetworkProperties::from_json_str(&std::fs::read_to_string(&args.properties)?)?;
    bind_positions(&mut network, &props)?;
    let json = network.to_node_link_json()?;
    match args.output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_draw_flags() {
        let args = Args::parse_from([
            "nwdraw", "-v", "draw", "-i", "props.json", "-o", "out.png", "-e", "png", "--labels", "--figsize", "3",
        ]);
        assert_eq!(args.verbose, 1);
        match args.command {
            Command::Draw(draw) => {
                assert_eq!(draw.input.as_deref(), Some(Path::new("props.json")));
                assert!(matches!(draw.output_format, OutputFormat::Png));
                assert!(draw.labels);
                assert_eq!(draw.figsize, Some(3.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        assert_eq!(
            ensure_output(&Some(PathBuf::from("a.png")), "png").unwrap(),
            PathBuf::from("a.png")
        );
    }
}
