/*!
 # Frame transport

 The command model only needs a way to hand a finished frame to the strip.
 [`LedTransport`] is that capability; [`BleTransport`] is the real
 implementation, a btleplug-backed write to the strip's control
 characteristic. Discovery, connection lifecycle, and write retries all live
 here, not in the model.
*/

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{
    Central, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tokio::time;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

use crate::{Error, Result};

/// Control characteristic the strip accepts command frames on.
const WRITE_CHARACTERISTIC_UUID: &str = "0000fff3-0000-1000-8000-00805f9b34fb";

/// Advertised name prefixes of compatible strips.
const DEVICE_NAME_PREFIXES: [&str; 2] = ["ELK-BLEDOM", "BLEDOM"];

/// Maximum time to wait for device discovery
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Abstract "send bytes to the strip" capability consumed by the command
/// model. Implementations own delivery policy (retries, pacing); a failed
/// send must leave the device in a state where a later send can succeed.
#[async_trait]
pub trait LedTransport: Send + Sync {
    /// Delivers one command frame to the device.
    async fn send(&self, frame: &[u8]) -> Result<()>;
}

/// Gets the default Bluetooth adapter
#[instrument(skip(manager))]
async fn get_central(manager: &Manager) -> Result<Adapter> {
    debug!("Getting default Bluetooth adapter");
    let mut adapters = manager.adapters().await?;
    if adapters.is_empty() {
        error!("No Bluetooth adapters found");
        return Err(Error::NoBluetoothAdapters);
    }

    Ok(adapters.remove(0))
}

/// Returns whether a peripheral matches the connect target: an explicit
/// address/id when one was given, a known name prefix otherwise.
fn matches_target(target: Option<&str>, address: &str, id: &str, name: &str) -> bool {
    match target {
        Some(addr) => {
            let addr = addr.to_lowercase();
            address.to_lowercase() == addr || id.to_lowercase() == addr
        }
        None => DEVICE_NAME_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix)),
    }
}

/// BLE transport for a BLEDOM strip's control characteristic.
pub struct BleTransport {
    /// The connected Bluetooth peripheral
    peripheral: Peripheral,
    /// Characteristic used for sending commands
    write_characteristic: Characteristic,
}

impl BleTransport {
    /// Scans for a compatible strip and connects to its control
    /// characteristic.
    ///
    /// # Arguments
    ///
    /// * `address` - MAC address or platform peripheral id to connect to.
    ///   When `None`, the first peripheral advertising a known BLEDOM name
    ///   prefix is used.
    #[instrument]
    pub async fn connect(address: Option<&str>) -> Result<BleTransport> {
        info!("Initializing BLE transport");
        let manager = Manager::new().await?;
        let central = get_central(&manager).await?;

        info!("Scanning for compatible BLE devices...");
        central.start_scan(ScanFilter::default()).await?;

        let start_time = std::time::Instant::now();
        let mut target: Option<Peripheral> = None;

        // Poll for devices until we find a compatible one or time out
        while start_time.elapsed() < DISCOVERY_TIMEOUT && target.is_none() {
            let peripherals = central.peripherals().await?;
            debug!("Found {} BLE peripherals so far", peripherals.len());

            for p in peripherals {
                if let Ok(Some(props)) = p.properties().await {
                    if let Some(name) = props.local_name {
                        debug!("Found device: {}", name);
                        if matches_target(
                            address,
                            &p.address().to_string(),
                            &p.id().to_string(),
                            &name,
                        ) {
                            info!("Found target device: {}", name);
                            target = Some(p);
                            break;
                        }
                    }
                }
            }

            if target.is_none() {
                let remaining = DISCOVERY_TIMEOUT
                    .as_secs()
                    .saturating_sub(start_time.elapsed().as_secs());
                info!(
                    "Still scanning for a device... ({} seconds remaining)",
                    remaining
                );
                time::sleep(Duration::from_millis(500)).await;
            }
        }

        let Some(peripheral) = target else {
            central.stop_scan().await?;
            error!(
                "No compatible LED device found within {} seconds",
                DISCOVERY_TIMEOUT.as_secs()
            );
            return Err(Error::NoCompatibleDevice);
        };

        info!("Connecting to device...");
        if !peripheral.is_connected().await? {
            peripheral.connect().await?;
        }

        central.stop_scan().await?;
        debug!("Discovering services...");
        peripheral.discover_services().await?;

        let write_uuid = Uuid::parse_str(WRITE_CHARACTERISTIC_UUID)
            .map_err(|e| Error::CharacteristicNotFound(e.to_string()))?;
        let write_characteristic = peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == write_uuid)
            .ok_or(Error::CharacteristicNotFound(write_uuid.to_string()))?;

        debug!(
            "Found write characteristic: {}",
            write_characteristic.uuid
        );
        info!("Successfully connected to device");

        Ok(BleTransport {
            peripheral,
            write_characteristic,
        })
    }

    /// Disconnects from the strip.
    #[instrument(skip(self))]
    pub async fn disconnect(&self) -> Result<()> {
        if self.peripheral.is_connected().await? {
            self.peripheral.disconnect().await?;
            info!("Disconnected from device");
        }
        Ok(())
    }
}

#[async_trait]
impl LedTransport for BleTransport {
    /// Writes a frame to the control characteristic with retries.
    #[instrument(skip(self, frame), fields(frame_length = frame.len()))]
    async fn send(&self, frame: &[u8]) -> Result<()> {
        // BLE can be unreliable, so we implement retries
        let max_retries = 3;
        let mut attempt = 0;

        // Prefer WriteWithResponse when the characteristic supports it
        let write_type = if self
            .write_characteristic
            .properties
            .contains(btleplug::api::CharPropFlags::WRITE)
        {
            WriteType::WithResponse
        } else {
            WriteType::WithoutResponse
        };

        while attempt < max_retries {
            trace!(
                "Sending BLE frame (attempt {}/{})",
                attempt + 1,
                max_retries
            );

            match self
                .peripheral
                .write(&self.write_characteristic, frame, write_type)
                .await
            {
                Ok(()) => {
                    trace!("Frame sent successfully");
                    return Ok(());
                }
                Err(e) => {
                    attempt += 1;
                    warn!("Write failed (attempt {}/{}): {}", attempt, max_retries, e);

                    if attempt < max_retries {
                        trace!("Waiting before retry...");
                        time::sleep(Duration::from_millis(300)).await;
                    } else {
                        error!("Write failed permanently: {}", e);
                        return Err(Error::Transport(e.to_string()));
                    }
                }
            }
        }

        error!("Write failed after {} attempts", max_retries);
        Err(Error::CommandTimeout(max_retries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_address_matches_case_insensitively() {
        assert!(matches_target(
            Some("AA:BB:CC:DD:EE:FF"),
            "aa:bb:cc:dd:ee:ff",
            "some-platform-id",
            "whatever",
        ));
        assert!(matches_target(
            Some("some-platform-id"),
            "aa:bb:cc:dd:ee:ff",
            "SOME-PLATFORM-ID",
            "whatever",
        ));
        assert!(!matches_target(
            Some("11:22:33:44:55:66"),
            "aa:bb:cc:dd:ee:ff",
            "some-platform-id",
            "ELK-BLEDOM",
        ));
    }

    #[test]
    fn name_prefix_matches_when_no_address_given() {
        assert!(matches_target(None, "", "", "ELK-BLEDOM 42"));
        assert!(matches_target(None, "", "", "BLEDOM-0001"));
        assert!(!matches_target(None, "", "", "LEDBLE-XYZ"));
    }
}
