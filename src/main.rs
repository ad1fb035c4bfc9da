use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use linphase::config::{DesignConfig, NormOrder};
use linphase::constants::DEFAULT_FFT_POINTS;
use linphase::filter_design::{FilterDesign, FilterDesigner};
use linphase::output::{DesignReport, OutputFormat, ResponseReport, create_formatter};
use linphase::signal_processing::ConvolutionMode;
use linphase::{read_wav, save_wav};

#[derive(Parser, Debug)]
#[command(name = "linphase")]
#[command(about = "Design linear-phase FIR filters by convex p-norm optimization", long_about = None)]
struct Cli {
    /// Increase log verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Design a filter and print its taps
    Design {
        #[command(flatten)]
        design: DesignArgs,

        /// Output format: text, json, csv
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the log-magnitude response of the designed filter
    Response {
        #[command(flatten)]
        design: DesignArgs,

        /// DFT length
        #[arg(long, default_value_t = DEFAULT_FFT_POINTS)]
        fft_points: usize,

        /// Output format: text, json, csv
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Filter every channel of a WAV file with the designed filter
    Apply {
        #[command(flatten)]
        design: DesignArgs,

        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Convolution output length: full, same, valid
        #[arg(short, long, value_enum, default_value = "same")]
        mode: ConvolutionMode,
    },

    /// Render the designed response to an SVG chart
    #[cfg(feature = "plot")]
    Plot {
        #[command(flatten)]
        design: DesignArgs,

        /// Output SVG file
        #[arg(short, long, default_value = "response.svg")]
        output: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value_t = 700)]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = 700)]
        height: u32,
    },
}

#[derive(Args, Debug)]
struct DesignArgs {
    /// TOML design file
    #[arg(short, long)]
    config: PathBuf,

    /// Tap order N, overriding the config (filter length 2N+1)
    #[arg(short = 'N', long)]
    order: Option<usize>,

    /// Error norm, overriding the config: 1, 2, inf
    #[arg(short = 'p', long)]
    norm: Option<NormOrder>,

    /// Weight errors by the reciprocal of the desired magnitude
    #[arg(short = 'w', long)]
    weighted: bool,
}

impl DesignArgs {
    fn load(&self) -> Result<DesignConfig> {
        let content = fs::read_to_string(&self.config)
            .with_context(|| format!("Failed to read {}", self.config.display()))?;
        let mut config: DesignConfig = content.parse().context("Failed to parse config file")?;

        if let Some(order) = self.order {
            config.filter.order = order;
        }
        if let Some(norm) = self.norm {
            config.filter.norm = norm;
        }
        if self.weighted {
            config.filter.weighted = true;
        }
        Ok(config)
    }

    fn run(&self) -> Result<FilterDesign> {
        let config = self.load()?;
        let (grid, desired) = config.sample().context("Invalid band configuration")?;

        log::info!(
            "Designing {}-tap filter, L{} norm{}, {} grid samples",
            config.filter.num_taps(),
            config.filter.norm,
            if config.filter.weighted { ", weighted" } else { "" },
            grid.len()
        );

        let mut designer = FilterDesigner::with_solver_config(config.filter, config.solver);
        designer.design(&grid, &desired).context("Filter design failed")?;
        designer
            .take_design()
            .context("Designer returned no design")
    }
}

fn write_or_print(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{}\n", text))
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

fn apply_to_wav(design: &FilterDesign, input: &Path, output: &Path, mode: ConvolutionMode) -> Result<()> {
    let data = read_wav(input).with_context(|| format!("Failed to read {}", input.display()))?;
    log::info!(
        "Filtering {} channel(s) of {} samples at {} Hz",
        data.channels.len(),
        data.channels.first().map_or(0, Vec::len),
        data.sample_rate
    );

    let filtered = data
        .channels
        .iter()
        .map(|channel| design.apply(channel, mode))
        .collect::<linphase::Result<Vec<_>>>()
        .context("Convolution failed")?;

    save_wav(output, &filtered, data.sample_rate)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    eprintln!("Wrote {}", output.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Command::Design {
            design,
            format,
            output,
        } => {
            let design = design.run()?;
            let formatter = create_formatter(format, cli.verbose > 0);
            let report = DesignReport::from_design(&design);
            write_or_print(&formatter.format_design(&report), output.as_deref())?;
        }
        Command::Response {
            design,
            fft_points,
            format,
        } => {
            let design = design.run()?;
            let magnitude_db = design.magnitude_response_db(Some(fft_points))?;
            let formatter = create_formatter(format, cli.verbose > 0);
            let report = ResponseReport::new(fft_points, magnitude_db);
            write_or_print(&formatter.format_response(&report), None)?;
        }
        Command::Apply {
            design,
            input,
            output,
            mode,
        } => {
            let design = design.run()?;
            apply_to_wav(&design, &input, &output, mode)?;
        }
        #[cfg(feature = "plot")]
        Command::Plot {
            design,
            output,
            width,
            height,
        } => {
            let design = design.run()?;
            linphase::plot::plot_response(&design, &output, (width, height))?;
            eprintln!("Wrote {}", output.display());
        }
    }

    Ok(())
}
