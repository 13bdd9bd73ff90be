/*!
 # BLEDOM Bluetooth LED Strip Bridge Library

 A Rust library for exposing BLEDOM and ELK-BLEDOM Bluetooth LED strips as
 smart-home lightbulbs. The library tracks the light's last-known state
 (power, brightness, hue, saturation, effect) and translates high-level
 lighting intents into the vendor's fixed-layout binary BLE frames.

 ## Features

 * Power on/off control
 * Hue/saturation color control with HSL to RGB derivation
 * Direct RGB color control
 * Brightness adjustment
 * Effect modes (jump, crossfade, blink) with speed control
 * Pluggable transport: btleplug-backed BLE writes, or your own sink

 ## Example

 ```rust,no_run
 use bledom_bridge::*;

 #[tokio::main]
 async fn main() -> Result<()> {
     // Initialize tracing for logs
     tracing_subscriber::fmt::init();

     // Scan for a BLEDOM strip and connect to its write characteristic
     let transport = BleTransport::connect(None).await?;
     let mut light = LedStripModel::new(transport);

     // Basic operations
     light.set_power(true).await?;
     light.set_hue(120.0).await?;       // Green
     light.set_saturation(100).await?;
     light.set_brightness(80).await?;   // 80% brightness

     Ok(())
 }
 ```
*/

use thiserror::Error;

/// Custom error types for the BLEDOM bridge library
#[derive(Error, Debug)]
pub enum Error {
    /// No Bluetooth adapters found
    #[error("No Bluetooth adapters found")]
    NoBluetoothAdapters,

    /// No compatible LED device found
    #[error("No compatible LED device found")]
    NoCompatibleDevice,

    /// Failed to find required BLE characteristic
    #[error("Could not find required BLE characteristic: {0}")]
    CharacteristicNotFound(String),

    /// Value out of range; the command was never issued
    #[error("Value {actual} out of range ({min}..={max})")]
    ValueOutOfRange { min: u32, max: u32, actual: u32 },

    /// Hue outside [0, 360); the command was never issued
    #[error("Invalid hue {0}, expected 0 <= hue < 360")]
    InvalidHue(f64),

    /// Transport failed to deliver a frame; state was left unchanged
    #[error("Transport error: {0}")]
    Transport(String),

    /// Command timeout
    #[error("Command timed out after {0} retries")]
    CommandTimeout(u8),

    /// Error from btleplug
    #[error(transparent)]
    BtlePlugError(#[from] btleplug::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// Re-export modules
pub mod color;
pub mod effects;
pub mod frame;
pub mod model;
pub mod transport;

// Re-export key types
pub use effects::Effect;
pub use model::{LedStripModel, LightState};
pub use transport::{BleTransport, LedTransport};
