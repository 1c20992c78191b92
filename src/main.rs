use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use volcorner::config::{self, log_level_for_verbosity, Overrides};
use volcorner::{Config, Corner, Result, Settings};

#[derive(Parser)]
#[command(name = "volcorner")]
#[command(about = "Change the volume by scrolling in a corner of the screen")]
struct Cli {
    #[arg(short, long, value_name = "FILE", help = "Configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, value_name = "N", help = "Hot corner activation size, in pixels")]
    activate_size: Option<u32>,

    #[arg(short, long, value_name = "N", help = "Hot corner deactivation size, in pixels")]
    deactivate_size: Option<u32>,

    #[arg(
        short = 'x',
        long,
        value_name = "ID",
        value_parser = clap::builder::PossibleValuesParser::new(Corner::ids()),
        help = "Corner to use"
    )]
    corner: Option<String>,

    #[arg(short, action = clap::ArgAction::Count, help = "Increase verbosity (up to -vvv)")]
    verbose: u8,

    #[arg(short, long, help = "Save this configuration as the new default")]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only the default user file is created when missing.
    let create_missing = cli.config.is_none();
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let (mut config, load_problem) = Config::load_or_create(&config_path, create_missing);
    config.apply_overrides(Overrides {
        corner: cli.corner.clone(),
        activate_size: cli.activate_size,
        deactivate_size: cli.deactivate_size,
        verbose: (cli.verbose > 0).then_some(cli.verbose),
    });

    env_logger::Builder::new()
        .filter_level(log_level_for_verbosity(config.verbose))
        .parse_default_env()
        .init();
    info!("Using config file {:?}", config_path);
    if let Some(e) = load_problem {
        warn!("{:#}. Using the default configuration.", e);
    }

    let settings = config.validate()?;

    if cli.save {
        config.save(&config_path)?;
        info!("Saved configuration to {:?}", config_path);
    }

    run(&config, settings).await
}

#[cfg(feature = "desktop")]
async fn run(config: &Config, settings: Settings) -> Result<()> {
    use tokio::signal;
    use volcorner::platform::rdev::{RdevPointerSource, RdevScreen};
    use volcorner::platform::{AmixerMixer, LogOverlay};
    use volcorner::App;

    let pointer = RdevPointerSource::new();
    let mixer = AmixerMixer::new(&config.mixer, config.volume_interval());
    let screen = RdevScreen::new(config.resolution_interval());
    let ui = LogOverlay::new();
    let mut app = App::new(settings, pointer, mixer, screen, ui);

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Received Ctrl+C, shutting down");
    };
    app.run(shutdown).await
}

#[cfg(not(feature = "desktop"))]
async fn run(_config: &Config, _settings: Settings) -> Result<()> {
    error!("volcorner was built without a pointer backend");
    Err(volcorner::Error::NoPointerBackend.into())
}
