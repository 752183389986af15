//! DotNote daemon: scrolls messages on the LED matrix and listens for
//! updates over HTTP.

use clap::{Parser, ValueEnum};
use crossbeam_channel::bounded;
use dotnote::actor::{FeedbackActor, GpioBuzzer, PulseOutput, TerminalBell};
use dotnote::server::{self, AppState, MessageHistory};
use dotnote::{
    DotNoteConfig, FrameSink, Max7219Sink, MessageStore, NullSink, RendererActor, ScrollRenderer,
    TerminalSink,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Queued beep bursts before further updates go silent.
const FEEDBACK_QUEUE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SinkKind {
    /// MAX7219 chain on an SPI device.
    Max7219,
    /// Virtual matrix in this terminal (redirect stderr to keep logs off it).
    Terminal,
    /// No display (server and feedback only).
    Null,
}

#[derive(Debug, Parser)]
#[command(name = "dotnote", version, about = "Scrolling LED matrix messages, updated over HTTP")]
struct Cli {
    /// TOML configuration file. Defaults apply to anything it leaves out.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where frames are drawn.
    #[arg(long, value_enum, default_value_t = SinkKind::Max7219)]
    sink: SinkKind,

    /// SPI device node for the MAX7219 sink.
    #[arg(long, default_value = "/dev/spidev0.0")]
    spi_device: PathBuf,

    /// Override the listen address.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Do not beep on updates.
    #[arg(long)]
    no_buzzer: bool,

    /// Ring the terminal bell instead of driving the GPIO buzzer.
    #[arg(long)]
    bell: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "dotnote failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}

fn load_config(cli: &Cli) -> Result<DotNoteConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => DotNoteConfig::load(path)?,
        None => DotNoteConfig::default(),
    };
    if let Some(host) = &cli.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.no_buzzer {
        config.buzzer.enabled = false;
    }
    config.validate()?;
    Ok(config)
}

fn open_sink(cli: &Cli, config: &DotNoteConfig) -> Result<Box<dyn FrameSink>, Box<dyn std::error::Error>> {
    let (width, height) = config.display.frame_size();
    let sink: Box<dyn FrameSink> = match cli.sink {
        SinkKind::Max7219 => Box::new(Max7219Sink::open(&cli.spi_device, &config.display)?),
        SinkKind::Terminal => Box::new(TerminalSink::stdout(width, height, config.display.brightness)?),
        SinkKind::Null => Box::new(NullSink),
    };
    Ok(sink)
}

fn open_pulse_output(cli: &Cli, config: &DotNoteConfig) -> Box<dyn PulseOutput> {
    if cli.bell {
        return Box::new(TerminalBell);
    }
    match GpioBuzzer::open(config.buzzer.pin) {
        Ok(buzzer) => Box::new(buzzer),
        Err(e) => {
            warn!(pin = config.buzzer.pin, error = %e, "buzzer unavailable, using terminal bell");
            Box::new(TerminalBell)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    let (width, height) = config.display.frame_size();

    // Everything that can fail is acquired before any thread starts.
    let sink = open_sink(&cli, &config)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("dotnote-http")
        .build()?;

    // Store, with the feedback actor listening for accepted updates.
    let mut store = MessageStore::new(&config.scroll.default_message)?;
    let feedback = if config.buzzer.enabled {
        let (tx, rx) = bounded(FEEDBACK_QUEUE);
        store = store.with_notifier(tx);
        Some(FeedbackActor::spawn(
            rx,
            open_pulse_output(&cli, &config),
            config.buzzer.beep_count,
            config.buzzer.beep_duration(),
        ))
    } else {
        None
    };
    let store = Arc::new(store);

    // Render thread owns the sink from here on.
    let renderer = ScrollRenderer::new(Arc::clone(&store), sink, width, height, &config.scroll);
    let render_actor = RendererActor::spawn(renderer, config.scroll.period());
    let render_exited = render_actor.exited();

    let history = config
        .history
        .enabled
        .then(|| Arc::new(MessageHistory::new(&config.history.file)));
    let state = AppState {
        store: Arc::clone(&store),
        history,
    };

    let served = runtime.block_on(async move {
        let listener = TcpListener::bind(config.server.bind_addr()).await?;
        let shutdown = async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
                _ = tokio::task::spawn_blocking(move || render_exited.recv()) => {
                    warn!("render thread exited, shutting down");
                }
            }
        };
        server::serve(listener, state, shutdown).await
    });

    // Stop rendering first so the sink restores the display.
    let rendered = render_actor.join();
    drop(runtime);

    // Dropping the last store handle closes the feedback channel.
    drop(store);
    if let Some(feedback) = feedback {
        feedback.join();
    }

    served?;
    match rendered {
        Ok(stats) => {
            info!(frames = stats.frames, loops = stats.loops, "dotnote stopped");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "display failed");
            Ok(ExitCode::FAILURE)
        }
    }
}
