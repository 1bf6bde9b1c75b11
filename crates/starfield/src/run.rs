//! Main entrypoint for running Starfield

use clap::Parser as _;
use color_eyre::eyre::{ContextCompat as _, Result};
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

use crate::cli_args::CliArgs;
use crate::config::main::{Config, LogLevel};
use crate::field::{Field, Settings};
use crate::output::{Format, Output};
use crate::particle::Viewport;

/// How many control messages can be queued for each listener.
const PROTOCOL_CHANNEL_SIZE: usize = 64;

/// How many rendered frames can be queued before the field has to wait for the output.
const FRAME_CHANNEL_SIZE: usize = 16;

/// Commands to control the various tasks
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum Protocol {
    /// The entire application is exiting.
    End,
    /// The viewport has changed size. Stars outside the new bounds are culled on the next frame.
    Resize {
        /// Width of the new viewport.
        width: u32,
        /// Height of the new viewport.
        height: u32,
    },
}

/// Main entrypoint
pub async fn run() -> Result<()> {
    let cli_args = CliArgs::parse();
    let config = setup(&cli_args)?;
    let frames = start(config, &cli_args).await?;
    tracing::info!("Starfield finished after writing {frames} frames");
    Ok(())
}

/// Prepare the application to start.
fn setup(cli_args: &CliArgs) -> Result<Config> {
    let config_result = Config::load(cli_args.config.as_deref());
    let mut config = match config_result {
        Ok(config) => config,
        Err(config_error) => color_eyre::eyre::bail!("{config_error}"),
    };
    cli_args.apply_overrides(&mut config);

    setup_logging(&config)?;

    tracing::info!("Starting Starfield");
    tracing::debug!("Loaded config: {config:?}");
    Ok(config)
}

/// Run the field and the output until the requested number of frames have been written, or until
/// `Protocol::End` is broadcast. Resolves to the number of frames written.
pub async fn start(config: Config, cli_args: &CliArgs) -> Result<u64> {
    let (protocol_tx, _) = broadcast::channel(PROTOCOL_CHANNEL_SIZE);
    start_with_protocol(config, cli_args, protocol_tx).await
}

/// Same as `start()`, but with a protocol channel that the caller can also send messages on, for
/// example to resize the viewport.
pub async fn start_with_protocol(
    config: Config,
    cli_args: &CliArgs,
    protocol_tx: broadcast::Sender<Protocol>,
) -> Result<u64> {
    let settings = Settings::new(
        config.simulator()?,
        Viewport::new(config.width.into(), config.height.into()),
        config.frame_rate(),
    );
    let (frames_tx, frames_rx) = mpsc::channel(FRAME_CHANNEL_SIZE);

    let output = match cli_args.format {
        Format::Svg => Output::svg(&cli_args.output, cli_args.frames)?,
        Format::Json => Output::json(Box::new(std::io::stdout()), cli_args.frames),
    };
    let output_handle = output.start(frames_rx, &protocol_tx);
    let field_handle = Field::start(
        settings,
        crate::random::seeded(cli_args.seed),
        crate::random::seeded(cli_args.seed.map(|seed| seed.wrapping_add(1))),
        &protocol_tx,
        frames_tx,
    );
    let interrupt_handle = listen_for_interrupt(&protocol_tx);

    let frames = output_handle.await??;
    tracing::debug!("🏁 left output loop, exiting Starfield...");

    field_handle.await??;
    interrupt_handle.await?;

    tracing::trace!("Leaving Starfield's `start()` function");
    Ok(frames)
}

/// Turn Ctrl-C into a clean shutdown.
fn listen_for_interrupt(protocol_tx: &broadcast::Sender<Protocol>) -> tokio::task::JoinHandle<()> {
    let mut protocol = protocol_tx.subscribe();
    let protocol_tx = protocol_tx.clone();

    tokio::spawn(async move {
        #[expect(
            clippy::integer_division_remainder_used,
            reason = "This is caused by the `tokio::select!`"
        )]
        {
            tokio::select! {
                result = tokio::signal::ctrl_c() => match result {
                    Ok(()) => {
                        tracing::info!("Interrupted, stopping Starfield");
                        broadcast_protocol_end(&protocol_tx);
                    }
                    Err(error) => tracing::error!("Couldn't listen for Ctrl-C: {error:?}"),
                },
                () = wait_for_end(&mut protocol) => (),
            }
        }
    })
}

/// Block until the protocol ends.
async fn wait_for_end(protocol: &mut broadcast::Receiver<Protocol>) {
    loop {
        match protocol.recv().await {
            Ok(Protocol::End) | Err(broadcast::error::RecvError::Closed) => break,
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => (),
        }
    }
}

/// Signal all task loops to exit.
///
/// We keep it in its own function because we need to handle the error separately. If the error
/// were to be bubbled with `?` as usual, there's a chance it would never be logged, because the
/// protocol end signal is itself what allows the central error handler to even be reached.
pub fn broadcast_protocol_end(protocol_tx: &broadcast::Sender<Protocol>) {
    tracing::debug!("Broadcasting the protocol `End` message to all listeners");
    let result = protocol_tx.send(Protocol::End);
    if let Err(error) = result {
        tracing::error!("{error:?}");
    }
}

/// Setup logging
fn setup_logging(config: &Config) -> Result<()> {
    let are_log_filters_manually_set = std::env::var("STARFIELD_LOG").is_ok();
    let level_as_string = format!("{:?}", config.log_level).to_lowercase();

    let is_loggable = !matches!(config.log_level, LogLevel::Off) || are_log_filters_manually_set;
    if !is_loggable {
        return Ok(());
    }

    let directory = config
        .log_path
        .parent()
        .context("Couldn't get log path's parent")?;
    std::fs::create_dir_all(directory)?;
    let file = std::fs::File::create(&config.log_path)?;

    let filters = if are_log_filters_manually_set {
        if let Ok(user_filters) = std::env::var("STARFIELD_LOG") {
            std::env::set_var("RUST_LOG", user_filters);
        }

        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .from_env_lossy()
    } else {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("off".parse()?)
            .from_env_lossy()
            .add_directive(format!("starfield={level_as_string}").parse()?)
            .add_directive(format!("tests={level_as_string}").parse()?)
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);

    tracing_subscriber::registry().with(logfile_layer).init();

    Ok(())
}
