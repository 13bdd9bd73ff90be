use bledom_bridge::*;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use tokio::time::Duration;
use tracing::{debug, error, info, instrument, trace};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// MAC address or platform id of the strip; scans by name when omitted
    #[arg(short, long)]
    address: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum, Debug)]
enum EffectType {
    /// Crossfade through red, green, blue, yellow, cyan, magenta, white
    Rainbow,
    /// Jump between red, green, blue
    Jump,
    /// Jump through red, green, blue, yellow, cyan, magenta, white
    JumpAll,
    /// Crossfade through red, green, blue
    CrossfadeRgb,
    /// Blink through red, green, blue, yellow, cyan, magenta, white
    Blink,
    /// Static color mode (disables the running effect)
    None,
}

impl From<EffectType> for Effect {
    fn from(value: EffectType) -> Self {
        match value {
            EffectType::Rainbow => Effect::CrossfadeRedGreenBlueYellowCyanMagentaWhite,
            EffectType::Jump => Effect::JumpRedGreenBlue,
            EffectType::JumpAll => Effect::JumpRedGreenBlueYellowCyanMagentaWhite,
            EffectType::CrossfadeRgb => Effect::CrossfadeRedGreenBlue,
            EffectType::Blink => Effect::BlinkRedGreenBlueYellowCyanMagentaWhite,
            EffectType::None => Effect::None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Demonstration of LED features
    Demo {
        /// Duration of each demo step in seconds
        #[arg(short, long, default_value_t = 5)]
        duration: u64,
    },
    /// Turn LED strip on
    On,
    /// Turn LED strip off
    Off,
    /// Set brightness
    Brightness {
        /// Brightness level (0-100)
        #[arg(short, long, default_value_t = 100)]
        level: u8,
    },
    /// Set hue, keeping the current saturation
    Hue {
        /// Hue in degrees (0-360 exclusive)
        #[arg(short, long)]
        degrees: f64,
    },
    /// Set saturation, keeping the current hue
    Saturation {
        /// Saturation (0-100)
        #[arg(short, long)]
        percent: u8,
    },
    /// Set custom RGB color
    Color {
        /// Red value (0-255)
        #[arg(short, long, default_value_t = 255)]
        red: u8,
        /// Green value (0-255)
        #[arg(short, long, default_value_t = 255)]
        green: u8,
        /// Blue value (0-255)
        #[arg(short, long, default_value_t = 255)]
        blue: u8,
    },
    /// Set effect
    Effect {
        /// Effect type (available options shown in description)
        #[arg(short, long, value_enum, default_value_t = EffectType::Rainbow)]
        effect_type: EffectType,
        /// Effect speed (0-100)
        #[arg(short, long, default_value_t = 50)]
        speed: u8,
    },
}

#[tokio::main]
#[instrument]
async fn main() -> Result<()> {
    // Initialize tracing with pretty colors
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| EnvFilter::new("bledom_bridge=info")),
        )
        .compact()
        .init();

    // Initialize color-eyre for pretty error reporting
    color_eyre::install()?;

    let cli = Cli::parse();
    debug!("Parsed command line arguments");

    let transport = match BleTransport::connect(cli.address.as_deref()).await {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to connect to device: {}", e);
            return Err(e.into());
        }
    };
    let mut light = LedStripModel::new(transport);

    match cli.command.unwrap_or(Commands::Demo { duration: 5 }) {
        Commands::Demo { duration } => {
            run_demo(&mut light, duration).await?;
        }
        Commands::On => {
            light.set_power(true).await?;
        }
        Commands::Off => {
            light.set_power(false).await?;
        }
        Commands::Brightness { level } => {
            // The device must be on for brightness changes to be visible
            light.set_power(true).await?;
            light.set_brightness(level).await?;
        }
        Commands::Hue { degrees } => {
            light.set_power(true).await?;
            light.set_hue(degrees).await?;
        }
        Commands::Saturation { percent } => {
            light.set_power(true).await?;
            light.set_saturation(percent).await?;
        }
        Commands::Color { red, green, blue } => {
            light.set_power(true).await?;
            light.set_rgb(red, green, blue).await?;
        }
        Commands::Effect { effect_type, speed } => {
            light.set_power(true).await?;

            let effect = Effect::from(effect_type);
            debug!("Using effect: {}", effect);
            light.set_effect(effect).await?;
            if effect != Effect::None {
                light.set_effect_speed(speed).await?;
            }
        }
    }

    Ok(())
}

/// Sleep for specified number of seconds
#[instrument]
async fn sleep(seconds: u64) {
    trace!("Sleeping for {}s", seconds);
    tokio::time::sleep(Duration::from_secs(seconds)).await;
    trace!("Sleep completed");
}

/// Run a demonstration of various LED strip features
#[instrument(skip(light))]
async fn run_demo<T: LedTransport>(light: &mut LedStripModel<T>, duration: u64) -> Result<()> {
    info!("Running LED strip demo with {}s intervals", duration);

    info!("Turning LEDs on");
    light.set_power(true).await?;
    sleep(duration).await;

    info!("Setting color to red");
    light.set_saturation(100).await?;
    light.set_hue(0.0).await?;
    sleep(duration).await;

    info!("Setting color to green");
    light.set_hue(120.0).await?;
    sleep(duration).await;

    info!("Setting color to blue");
    light.set_hue(240.0).await?;
    sleep(duration).await;

    info!("Setting brightness to 50%");
    light.set_brightness(50).await?;
    sleep(duration).await;

    info!("Setting brightness to 100%");
    light.set_brightness(100).await?;
    sleep(duration).await;

    info!("Setting rainbow crossfade effect");
    light
        .set_effect(Effect::CrossfadeRedGreenBlueYellowCyanMagentaWhite)
        .await?;
    sleep(duration).await;

    info!("Setting effect speed to slow (20)");
    light.set_effect_speed(20).await?;
    sleep(duration).await;

    info!("Setting effect speed to fast (80)");
    light.set_effect_speed(80).await?;
    sleep(duration).await;

    info!("Back to static white");
    light.set_effect(Effect::None).await?;
    light.set_saturation(0).await?;
    sleep(1).await;

    info!("Turning LEDs off to end demo");
    light.set_power(false).await?;

    info!("Demo completed!");
    Ok(())
}
