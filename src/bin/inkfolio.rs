use std::{
    cell::RefCell,
    fs::File,
    io::{BufReader, BufWriter, Write},
    net::SocketAddr,
    path::{Path, PathBuf},
    rc::Rc,
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use inkfolio::effects::surface::DrawList;
use inkfolio::intro::orchestrator::IntroSurfaces;
use inkfolio::intro::session;
use inkfolio::relay::{AppState, MailConfig, SmtpMailer};
use inkfolio::theme::sink::CssVariables;
use inkfolio::{
    BlendModel, CinematicIntro, Clock, CycleConfig, DeviceProfile, IntroConfig, IntroFrame,
    JsonFileStore, KeyValueStore, ManualClock, MemoryStore, ThemeCycleController, ThemeProperty,
    Viewport, default_palette,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inkfolio", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the contact-mail relay (`POST /api/send-email`).
    Serve(ServeArgs),
    /// Simulate the cinematic intro headlessly and print one JSON line per frame.
    Intro(IntroArgs),
    /// Sample the theme cycle over time and print the blended colors.
    Theme(ThemeArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Listen address.
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
}

#[derive(Parser, Debug)]
struct IntroArgs {
    /// Frames per second of the synthetic clock.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device profile JSON; defaults to a desktop.
    #[arg(long)]
    device: Option<PathBuf>,

    /// Intro config JSON; defaults to the built-in timeline.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session state file. Without it every run starts fresh.
    #[arg(long)]
    state: Option<PathBuf>,

    /// Clear the played flag in `--state` before starting.
    #[arg(long)]
    replay: bool,

    /// Press "skip" at this many milliseconds.
    #[arg(long)]
    skip_at: Option<f64>,

    /// Print every Nth frame.
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Write frames here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also record draw calls per layer.
    #[arg(long)]
    draw: bool,
}

#[derive(Parser, Debug)]
struct ThemeArgs {
    /// Total simulated time.
    #[arg(long, default_value_t = 9000.0)]
    duration_ms: f64,

    /// Sampling interval.
    #[arg(long, default_value_t = 250.0)]
    step_ms: f64,

    #[arg(long, value_enum, default_value_t = BlendChoice::LinearRgb)]
    blend: BlendChoice,

    /// Starting palette index (negative wraps).
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    index: i64,

    /// Device profile JSON; defaults to a desktop.
    #[arg(long)]
    device: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BlendChoice {
    LinearRgb,
    Hsl,
}

impl From<BlendChoice> for BlendModel {
    fn from(choice: BlendChoice) -> Self {
        match choice {
            BlendChoice::LinearRgb => BlendModel::LinearRgb,
            BlendChoice::Hsl => BlendModel::Hsl,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameLine {
    frame: u64,
    time_ms: f64,
    #[serde(flatten)]
    intro: IntroFrame,
    #[serde(skip_serializing_if = "Option::is_none")]
    draw_commands: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Intro(args) => cmd_intro(args),
        Command::Theme(args) => cmd_theme(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn load_device(path: Option<&Path>) -> anyhow::Result<DeviceProfile> {
    match path {
        Some(p) => read_json(p, "device profile"),
        None => Ok(DeviceProfile::desktop()),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = MailConfig::from_env().context("read mail configuration")?;
    let mailer = SmtpMailer::new(&config).context("build smtp transport")?;
    let state = AppState::new(config, Arc::new(mailer));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start tokio runtime")?;
    runtime.block_on(async move {
        let shutdown = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(%err, "ctrl-c handler failed");
            }
            tracing::info!("shutting down");
        };
        inkfolio::relay::server::serve(args.addr, state, shutdown)
            .await
            .with_context(|| format!("serve on {}", args.addr))
    })
}

fn cmd_intro(args: IntroArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps > 0.0, "--fps must be positive");
    let device = load_device(args.device.as_deref())?;
    let config: IntroConfig = match &args.config {
        Some(p) => read_json(p, "intro config")?,
        None => IntroConfig::default(),
    };
    let viewport = Viewport::new(args.width, args.height)?;

    let mut store: Box<dyn KeyValueStore> = match &args.state {
        Some(p) => Box::new(
            JsonFileStore::open(p).with_context(|| format!("open state '{}'", p.display()))?,
        ),
        None => Box::new(MemoryStore::new()),
    };
    if args.replay {
        session::clear_played(store.as_mut());
    }

    let mut intro = CinematicIntro::new(config, viewport, &device, store)?;
    let limit_ms = intro.total_duration() + 5_000.0;

    let mut out: Box<dyn Write> = match &args.out {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("create '{}'", p.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    let clock = ManualClock::new(0.0);
    let frame_ms = 1000.0 / args.fps;
    let every = args.every.max(1);
    let mut layers = [
        DrawList::new(viewport),
        DrawList::new(viewport),
        DrawList::new(viewport),
    ];

    let playing = intro.mount(clock.now_ms());
    let mut frame = 0u64;
    loop {
        let now = clock.now_ms();
        if let Some(at) = args.skip_at
            && now >= at
        {
            intro.skip(now);
        }
        let snapshot = intro.tick(now);

        let draw_commands = args.draw.then(|| {
            let [rain, figure, smoke] = &mut layers;
            for l in [&mut *rain, &mut *figure, &mut *smoke] {
                l.take();
            }
            intro.render(
                IntroSurfaces {
                    rain: Some(&mut *rain),
                    figure: Some(&mut *figure),
                    smoke: Some(&mut *smoke),
                },
                now,
            );
            rain.len() + figure.len() + smoke.len()
        });

        let done = snapshot.completed;
        if frame % every == 0 || done {
            let line = FrameLine {
                frame,
                time_ms: now,
                intro: snapshot,
                draw_commands,
            };
            serde_json::to_writer(&mut out, &line).context("write frame")?;
            out.write_all(b"\n").context("write frame")?;
        }
        if done || !playing || now > limit_ms {
            break;
        }
        frame += 1;
        clock.advance(frame_ms);
    }
    out.flush().context("flush output")?;
    eprintln!("intro finished after {frame} frames");
    Ok(())
}

fn cmd_theme(args: ThemeArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.step_ms > 0.0, "--step-ms must be positive");
    let device = load_device(args.device.as_deref())?;
    let clock = Arc::new(ManualClock::new(0.0));
    let css = Rc::new(RefCell::new(CssVariables::new()));
    let config = CycleConfig {
        blend: args.blend.into(),
        ..CycleConfig::default()
    };
    let mut controller = ThemeCycleController::new(
        default_palette(),
        config,
        clock.clone(),
        Box::new(css.clone()),
        &device,
    )?;
    controller.set_color_index(args.index);
    controller.start();

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut t = 0.0;
    while t <= args.duration_ms {
        clock.set(t);
        controller.tick(t);
        let colors: serde_json::Map<String, serde_json::Value> = ThemeProperty::ALL
            .iter()
            .map(|&p| (p.key().to_string(), controller.interpolated_color(p).into()))
            .collect();
        let line = serde_json::json!({
            "timeMs": t,
            "state": controller.state(),
            "colors": colors,
            "primaryVar": css.borrow().get(ThemeProperty::Primary.css_var()),
        });
        writeln!(out, "{line}").context("write sample")?;
        t += args.step_ms;
    }
    out.flush().context("flush output")?;
    Ok(())
}
