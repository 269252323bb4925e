use std::fs::File;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use keygrid_render::{
    flowing_noise, monochrome_noise, random_burst, scrolling_text, two_color_noise, wipe,
    BurstOptions, DeviceConfig, DeviceSink, Effect, FlowOptions, GlyphMap, PreviewSink, Repeat,
    Rgb, Scheduler, SchedulerOptions, ScrollOptions, SolidFill, SpeckleOptions, SysfsSink, Timing,
    WipeOptions, WriteErrorPolicy, DEFAULT_ROOT,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive animated patterns on a per-key RGB keyboard")]
struct Cli {
    #[command(flatten)]
    device: DeviceArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct DeviceArgs {
    /// Driver directory of the keyboard
    #[arg(long, env = "KEYGRID_ROOT", default_value = DEFAULT_ROOT)]
    root: PathBuf,
    /// Trailing-digit substitutions to try when the root is missing
    #[arg(long, default_value_t = 10)]
    probe_attempts: usize,
    /// Render frames as PNGs into this directory instead of the device
    #[arg(long)]
    preview_dir: Option<PathBuf>,
    /// Brightness (0-255) set once the device is found
    #[arg(long, default_value_t = 255)]
    brightness: u8,
    /// Keep running when the device rejects a frame
    #[arg(long, default_value_t = false)]
    skip_failed_frames: bool,
    /// Stop the running effect after this many seconds
    #[arg(long)]
    max_seconds: Option<u64>,
    /// Glyph table in JSON (`{"A": [[x, y], ...]}`); defaults to the built-in font
    #[arg(long)]
    glyphs: Option<PathBuf>,
    /// Seed for reproducible randomness
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill every key with one color
    Solid {
        #[arg(value_parser = parse_color)]
        color: Rgb,
    },
    /// Perturbed noise over one or two base colors
    Speckle(SpeckleArgs),
    /// Random colors scattered over the keys
    Burst(BurstArgs),
    /// Slowly flowing 3D noise
    Flow(FlowArgs),
    /// Sweep a color across the columns
    Wipe(WipeArgs),
    /// Scroll a message across the keys
    Scroll(ScrollArgs),
    /// Replay the scripted demo sequence
    Demo,
}

#[derive(Args, Debug, Clone)]
struct TimingArgs {
    #[arg(long, default_value_t = 10)]
    seconds: u32,
    #[arg(long, default_value_t = 10)]
    per_second: u32,
}

impl TimingArgs {
    fn to_timing(&self) -> Timing {
        Timing { seconds: self.seconds, ticks_per_second: self.per_second }
    }
}

#[derive(Args, Debug)]
struct SpeckleArgs {
    #[arg(value_parser = parse_color)]
    color: Rgb,
    /// Second base color for two-color noise
    #[arg(value_parser = parse_color)]
    second: Option<Rgb>,
    #[arg(long, default_value_t = 64)]
    variety: u16,
    /// Write a single frame instead of looping
    #[arg(long, default_value_t = false)]
    once: bool,
    #[command(flatten)]
    timing: TimingArgs,
}

#[derive(Args, Debug)]
struct BurstArgs {
    #[arg(long, default_value_t = false)]
    high_contrast: bool,
    #[arg(long, default_value_t = 0)]
    sparseness: u32,
    #[command(flatten)]
    timing: TimingArgs,
}

#[derive(Args, Debug)]
struct FlowArgs {
    #[arg(long, default_value_t = 20)]
    seconds: u32,
    #[arg(long, default_value_t = 15)]
    per_second: u32,
    /// Fixed noise origin for a repeatable pattern
    #[arg(long)]
    origin: Option<i32>,
}

#[derive(Args, Debug)]
struct WipeArgs {
    #[arg(long, default_value_t = 5)]
    count: u32,
    #[arg(long, value_parser = parse_color, default_value = "255,0,0")]
    color: Rgb,
    #[arg(long, value_parser = parse_color, default_value = "0,255,0")]
    background: Rgb,
    #[arg(long, default_value_t = false)]
    no_twinkle: bool,
    #[arg(long, default_value_t = false)]
    line: bool,
}

#[derive(Args, Debug)]
struct ScrollArgs {
    message: String,
    #[arg(long, value_parser = parse_color, default_value = "255,0,0")]
    text: Rgb,
    #[arg(long, value_parser = parse_color, default_value = "0,255,0")]
    background: Rgb,
    #[arg(long, default_value_t = false)]
    no_twinkle: bool,
    #[arg(long, default_value_t = 128)]
    variety: u16,
    #[arg(long, default_value_t = 10)]
    speed: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let sink = open_sink(&cli.device)?;
    let mut scheduler = Scheduler::new(sink).with_options(SchedulerOptions {
        on_write_error: if cli.device.skip_failed_frames {
            WriteErrorPolicy::SkipFrame
        } else {
            WriteErrorPolicy::Abort
        },
    });
    if let Some(seed) = cli.device.seed {
        scheduler = scheduler.with_rng(StdRng::seed_from_u64(seed));
    }

    if let Some(seconds) = cli.device.max_seconds {
        let token = scheduler.cancel_token();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(seconds));
            token.cancel();
        });
    }

    let glyphs = load_glyphs(cli.device.glyphs.as_ref())?;

    match cli.command {
        Commands::Demo => demo(&mut scheduler, &glyphs),
        command => {
            let mut effect = build_effect(command, &glyphs)?;
            let report = scheduler.run(effect.as_mut())?;
            info!(
                "{}: {} frames written, {} dropped{}",
                report.effect,
                report.frames_written,
                report.frames_dropped,
                if report.cancelled { " (cancelled)" } else { "" }
            );
            Ok(())
        },
    }
}

fn open_sink(args: &DeviceArgs) -> Result<Box<dyn DeviceSink>> {
    if let Some(dir) = &args.preview_dir {
        let mut sink = PreviewSink::create(dir, 16)
            .with_context(|| format!("failed to create preview directory {:?}", dir))?;
        sink.set_brightness(args.brightness).context("failed to set brightness")?;
        info!("rendering preview frames into {}", dir.display());
        return Ok(Box::new(sink));
    }

    let config =
        DeviceConfig { max_attempts: args.probe_attempts, ..DeviceConfig::with_root(&args.root) };
    let sink = SysfsSink::discover(&config, args.brightness)
        .with_context(|| format!("no keyboard found near {:?}", args.root))?;
    info!("using keyboard at {} at brightness {}", sink.root().display(), args.brightness);
    Ok(Box::new(sink))
}

fn load_glyphs(path: Option<&PathBuf>) -> Result<GlyphMap> {
    let Some(path) = path else {
        return Ok(GlyphMap::builtin());
    };
    let file = File::open(path).with_context(|| format!("failed to open glyph table {:?}", path))?;
    GlyphMap::from_json(file).with_context(|| format!("failed to load glyph table {:?}", path))
}

fn build_effect(command: Commands, glyphs: &GlyphMap) -> Result<Box<dyn Effect>> {
    let effect: Box<dyn Effect> = match command {
        Commands::Solid { color } => Box::new(SolidFill::new(color)),
        Commands::Speckle(args) => {
            let repeat =
                if args.once { Repeat::Once } else { Repeat::Burst(args.timing.to_timing()) };
            let options = SpeckleOptions { variety: args.variety, repeat };
            match args.second {
                Some(second) => Box::new(two_color_noise(args.color, second, options)?),
                None => Box::new(monochrome_noise(args.color, options)?),
            }
        },
        Commands::Burst(args) => Box::new(random_burst(BurstOptions {
            timing: args.timing.to_timing(),
            high_contrast: args.high_contrast,
            sparseness: args.sparseness,
        })?),
        Commands::Flow(args) => Box::new(flowing_noise(FlowOptions {
            timing: Timing { seconds: args.seconds, ticks_per_second: args.per_second },
            origin: args.origin,
        })?),
        Commands::Wipe(args) => Box::new(wipe(WipeOptions {
            count: args.count,
            color: args.color,
            background: args.background,
            twinkle: !args.no_twinkle,
            line: args.line,
        })?),
        Commands::Scroll(args) => {
            let options = ScrollOptions {
                text: args.text,
                background: args.background,
                twinkle: !args.no_twinkle,
                variety: args.variety,
                speed: args.speed,
            };
            Box::new(scrolling_text(&args.message, glyphs, options)?)
        },
        Commands::Demo => anyhow::bail!("demo is not a single effect"),
    };
    Ok(effect)
}

fn demo<S: DeviceSink>(scheduler: &mut Scheduler<S>, glyphs: &GlyphMap) -> Result<()> {
    scheduler.sink_mut().set_brightness(255)?;

    let greeting = ScrollOptions {
        text: Rgb::WHITE,
        background: Rgb::OFF,
        speed: 8,
        variety: 32,
        ..ScrollOptions::default()
    };
    if scheduler.run(&mut scrolling_text("hello world", glyphs, greeting)?)?.cancelled {
        return Ok(());
    }
    if scheduler.run(&mut flowing_noise(FlowOptions::default())?)?.cancelled {
        return Ok(());
    }

    for level in [128, 64, 32] {
        scheduler.sink_mut().set_brightness(level)?;
        if level != 32 {
            scheduler.pause(Duration::from_millis(200));
        }
    }
    Ok(())
}

/// Parse `r,g,b` or `#rrggbb`.
fn parse_color(value: &str) -> Result<Rgb, String> {
    if let Some(hex) = value.strip_prefix('#') {
        let channels = u32::from_str_radix(hex, 16)
            .ok()
            .filter(|_| hex.len() == 6)
            .ok_or_else(|| format!("invalid hex color {value:?}"))?;
        let [_, r, g, b] = channels.to_be_bytes();
        return Ok(Rgb::new(r, g, b));
    }

    let channels: Vec<u8> = value
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|err| format!("invalid color {value:?}: {err}"))?;
    match channels[..] {
        [r, g, b] => Ok(Rgb::new(r, g, b)),
        _ => Err(format!("expected three channels in {value:?}")),
    }
}
