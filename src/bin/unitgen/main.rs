//! unitgen - offline renderer
//!
//! Renders a short demo patch to a WAV file or a text dump:
//!
//! ```text
//! saw (additive table) ──→ Butterworth LP ──→ (× amp envelope) ──→ reverb ──→ writer
//!                               ↑
//!                       cutoff envelope
//! ```
//!
//! Run with: cargo run --bin unitgen -- --seconds 4 --output pluck.wav
//! Logging follows RUST_LOG (default `info`).

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use unitgen::dsp::{Butterworth, Envelope, FuncTable, Oscillator, Reverb, Waveform};
use unitgen::graph::reverb::ReverbNode;
use unitgen::graph::{FilterNode, GraphNode, NodeExt};
use unitgen::io::{BlockWriter, TextWriter, WavWriter};
use unitgen::{AudioParams, Block, DEFAULT_BLOCK_SIZE, DEFAULT_SAMPLE_RATE, DEFAULT_TABLE_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Wav,
    Text,
}

/// Render a filtered, reverberated saw pluck.
#[derive(Parser, Debug)]
#[command(name = "unitgen")]
#[command(version)]
struct Cli {
    /// Destination file; `-` writes text to stdout
    #[arg(short, long, default_value = "unitgen.wav")]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "wav")]
    format: Format,

    /// Length of the render in seconds
    #[arg(short, long, default_value_t = 3.0)]
    seconds: f64,

    /// Oscillator frequency in Hz
    #[arg(short, long, default_value_t = 110.0)]
    frequency: f64,

    /// Reverb time in seconds (60 dB decay)
    #[arg(short, long, default_value_t = 2.0)]
    decay: f64,

    /// Harmonics summed into the saw table
    #[arg(long, default_value_t = 30)]
    harmonics: usize,

    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// 1 or 2; mono blocks are duplicated across channels
    #[arg(long, default_value_t = 1)]
    channels: u16,
}

fn patch(params: &AudioParams, cli: &Cli) -> color_eyre::Result<impl GraphNode> {
    let saw = Arc::new(FuncTable::waveform(
        cli.harmonics,
        Waveform::Sawtooth,
        0.0,
        DEFAULT_TABLE_SIZE,
    ));
    let osc = Oscillator::oscili(params, 0.3, cli.frequency, saw);

    let sweep_times = [0.05, cli.seconds * 0.4];
    let sweep = Envelope::linesegs(params, &[0.0, 1.0, 0.1], &sweep_times, true, false)?;
    let filter =
        FilterNode::new(Butterworth::butter_lp(params, 200.0)).modulate_cutoff(sweep, 4_000.0);

    // leave the last half of the render for the tail
    let amp_times = [0.01, cli.seconds * 0.5];
    let amp = Envelope::linesegs(params, &[0.0, 1.0, 0.0], &amp_times, true, false)?;

    Ok(osc
        .through(filter)
        .amplify(amp)
        .through(ReverbNode::new(Reverb::new(params, cli.decay))))
}

fn writer(params: &AudioParams, cli: &Cli) -> color_eyre::Result<Box<dyn BlockWriter>> {
    let writer: Box<dyn BlockWriter> = match cli.format {
        Format::Wav => Box::new(
            WavWriter::create(&cli.output, params)
                .wrap_err_with(|| format!("cannot write {}", cli.output.display()))?,
        ),
        Format::Text if cli.output.as_os_str() == "-" => {
            Box::new(TextWriter::new(io::stdout().lock(), params.channels()))
        }
        Format::Text => Box::new(
            TextWriter::create(&cli.output, params.channels())
                .wrap_err_with(|| format!("cannot write {}", cli.output.display()))?,
        ),
    };
    Ok(writer)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let params = AudioParams::new(cli.sample_rate, cli.channels, cli.block_size)
        .wrap_err("invalid audio settings")?;

    let mut patch = patch(&params, &cli)?;
    let mut out = writer(&params, &cli)?;

    let total = params.seconds_to_samples(cli.seconds.max(0.0)).ceil() as usize;
    let blocks = total.div_ceil(params.block_size());
    let mut block = Block::new(&params);
    let mut frames = 0;

    for _ in 0..blocks {
        patch.render_block(&mut block);
        frames = if params.channels() == 2 {
            out.write_stereo(&block, &block)?
        } else {
            out.write(&block)?
        };
    }
    out.finish()?;

    info!(frames, peak = block.peak(), output = %cli.output.display(), "render finished");
    Ok(())
}
