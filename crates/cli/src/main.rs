use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use hexlight::{timed, Design, EdgeKey, Lattice, MirrorMode, Statistics};
use log::{info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// CLI for building hex light lattices and editing designs on them.
#[derive(Debug, StructOpt)]
#[structopt(name = "hexlight")]
struct Opt {
    /// Path to a design file that defines the grid, mirror mode, enabled
    /// edges and limits. Supported formats: JSON, TOML. If not given, the
    /// default design is used
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Edge key(s) to toggle, e.g. `0-1`. Each toggle is mirrored according
    /// to the design's mirror mode, and toggles are applied in order
    #[structopt(short, long)]
    toggle: Vec<EdgeKey>,

    /// Override the design's mirror mode. Supported modes: none, horizontal,
    /// vertical, both, radial
    #[structopt(short, long)]
    mirror: Option<MirrorMode>,

    /// If given, output will be saved to this directory. The exact files
    /// that appear in the directory are defined by the output formats. See
    /// `--output-formats` for more info
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format(s) to output in. Supported formats:
    ///
    /// design - The full design (including toggled edges), in TOML format.
    ///   This can be passed back in via `--config`
    ///
    /// lattice - The built lattice's vertices, edges and cells, as JSON
    ///
    /// stats - Statistics for the design's enabled edges, as JSON
    #[structopt(short = "f", long)]
    output_formats: Vec<OutputFormat>,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Export the design in a human-readable file, which can be loaded back
    /// as a config
    Design,
    /// Export the lattice geometry in a serialized JSON format
    Lattice,
    /// Export the design statistics in a serialized JSON format
    Stats,
    /* If you change this, make sure to update the help text for
     * `--output-formats`! */
}

impl OutputFormat {
    fn file_ext(self) -> &'static str {
        match self {
            Self::Design => "toml",
            Self::Lattice | Self::Stats => "json",
        }
    }
}

fn load_config(config_path: &Path) -> anyhow::Result<Design> {
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

/// Generate an output form of the design in the given format.
fn gen_output(
    output_dir: &Path,
    output_format: OutputFormat,
    design: &Design,
    lattice: &Lattice,
    stats: &Statistics,
) -> anyhow::Result<()> {
    fn generate_bytes(
        output_format: OutputFormat,
        design: &Design,
        lattice: &Lattice,
        stats: &Statistics,
    ) -> anyhow::Result<Vec<u8>> {
        let bytes = match output_format {
            OutputFormat::Design => toml::to_string_pretty(design)
                .context("error serializing design")?
                .into_bytes(),
            OutputFormat::Lattice => lattice.to_json()?.into_bytes(),
            OutputFormat::Stats => serde_json::to_vec_pretty(stats)
                .context("error serializing statistics")?,
        };
        Ok(bytes)
    }

    let output_file_path = output_dir
        .join(output_format.to_string())
        .with_extension(output_format.file_ext());

    timed!(
        format!(
            "Generating {} output and writing to {:?}",
            output_format, &output_file_path
        ),
        log::Level::Info,
        {
            let bytes = generate_bytes(output_format, design, lattice, stats)?;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&output_file_path)
                .with_context(|| {
                    format!("error opening output file {:?}", &output_file_path)
                })?;
            file.write_all(&bytes).with_context(|| {
                format!("error writing to file {:?}", &output_file_path)
            })?;
        }
    );

    Ok(())
}

/// Log a short, human-readable summary of the design's statistics
fn log_summary(design: &Design, stats: &Statistics) {
    info!(
        "{} segments, {} joints ({} dead ends, {} two-way, {} three-way)",
        stats.segments,
        stats.joints(),
        stats.joints1,
        stats.joints2,
        stats.joints3
    );
    match &stats.bounding_box {
        Some(bbox) => info!(
            "Footprint is {:.2}x{:.2} in lattice space",
            bbox.width(),
            bbox.height()
        ),
        None => info!("No edges enabled"),
    }
    for exceeded in stats.check_limits(&design.limits) {
        warn!("Over limit: {}", exceeded);
    }
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let mut design = match &opt.config {
        Some(config_path) => load_config(config_path)?,
        None => {
            info!("No config given, using the default design");
            Design::default()
        }
    };
    if let Some(mirror_mode) = opt.mirror {
        design.mirror_mode = mirror_mode;
    }

    let lattice = design.build_lattice()?;
    for key in opt.toggle {
        if !lattice.contains_edge(&key) {
            warn!("Edge {} isn't in the lattice, skipping", key);
            continue;
        }
        design.toggle(&lattice, key);
    }

    let stats = design.statistics(&lattice);
    log_summary(&design, &stats);

    // If an output dir was specified, write out output format(s) there
    if let Some(output_dir) = opt.output {
        if opt.output_formats.is_empty() {
            bail!("output dir was specified, but no output formats were given")
        }
        fs::create_dir_all(&output_dir)?;

        for output_format in opt.output_formats {
            gen_output(&output_dir, output_format, &design, &lattice, &stats)?;
        }
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
