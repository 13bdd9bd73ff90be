/*!
 # Light command model

 [`LedStripModel`] is the bridge's core: it owns the last-known
 [`LightState`], turns each high-level intent into a command frame, and
 hands the frame to its [`LedTransport`]. State is committed only after the
 transport reports a successful send, so a failed write never leaves the
 model claiming a state the strip never reached.

 The model does no queueing and no retries; callers invoke operations
 sequentially and the transport owns delivery policy.
*/

use tracing::{debug, info, instrument};

use crate::color::{hsl_to_rgb, LIGHTNESS};
use crate::effects::Effect;
use crate::frame;
use crate::transport::LedTransport;
use crate::{Error, Result};

/// Last-known state of the strip, owned exclusively by [`LedStripModel`]
/// and mutated only through its operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    power: bool,
    brightness: u8,
    hue: f64,
    saturation: u8,
    effect: Effect,
    effect_speed: u8,
}

impl LightState {
    /// Returns the power state.
    pub fn power(&self) -> bool {
        self.power
    }

    /// Returns the brightness percentage (0-100).
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Returns the hue in degrees (0-360 exclusive).
    pub fn hue(&self) -> f64 {
        self.hue
    }

    /// Returns the saturation percentage (0-100).
    pub fn saturation(&self) -> u8 {
        self.saturation
    }

    /// Returns the active effect (`Effect::None` in static color mode).
    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Returns the effect speed percentage (0-100).
    pub fn effect_speed(&self) -> u8 {
        self.effect_speed
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            power: false,
            brightness: 100,
            hue: 0.0,
            saturation: 0,
            effect: Effect::None,
            effect_speed: 50,
        }
    }
}

/// Command model for one BLEDOM strip over a frame transport.
pub struct LedStripModel<T: LedTransport> {
    transport: T,
    state: LightState,
}

impl<T: LedTransport> LedStripModel<T> {
    /// Creates a model with default state over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: LightState::default(),
        }
    }

    /// Returns the last-known light state.
    pub fn state(&self) -> &LightState {
        &self.state
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Turns the strip on or off.
    #[instrument(skip(self))]
    pub async fn set_power(&mut self, on: bool) -> Result<()> {
        debug!("Setting power to: {}", on);
        self.transport.send(&frame::power(on)).await?;
        self.state.power = on;

        info!("Power set to {}", on);
        Ok(())
    }

    /// Sets the brightness level.
    ///
    /// # Arguments
    ///
    /// * `level` - Brightness percentage (0-100)
    ///
    /// # Errors
    ///
    /// Returns `Error::ValueOutOfRange` for levels above 100; no frame is
    /// sent and state is unchanged.
    #[instrument(skip(self))]
    pub async fn set_brightness(&mut self, level: u8) -> Result<()> {
        if level > 100 {
            return Err(Error::ValueOutOfRange {
                min: 0,
                max: 100,
                actual: u32::from(level),
            });
        }

        debug!("Setting brightness to: {}", level);
        self.transport.send(&frame::brightness(level)).await?;
        self.state.brightness = level;

        info!("Brightness set to {}%", level);
        Ok(())
    }

    /// Sends a static RGB color to the strip.
    ///
    /// The channels are not range checked beyond their byte type and are
    /// never stored; color state lives in hue and saturation.
    #[instrument(skip(self))]
    pub async fn set_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<()> {
        debug!("Setting RGB to: {},{},{}", r, g, b);
        self.transport.send(&frame::rgb(r, g, b)).await?;

        info!("Color set to RGB({}, {}, {})", r, g, b);
        Ok(())
    }

    /// Sets the hue, deriving the RGB frame from the new hue and the
    /// currently stored saturation.
    ///
    /// # Arguments
    ///
    /// * `hue` - Hue in degrees, 0 inclusive to 360 exclusive
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHue` outside [0, 360); no frame is sent and
    /// state is unchanged.
    #[instrument(skip(self))]
    pub async fn set_hue(&mut self, hue: f64) -> Result<()> {
        if !(0.0..360.0).contains(&hue) {
            return Err(Error::InvalidHue(hue));
        }

        let (r, g, b) = hsl_to_rgb(
            hue / 360.0,
            f64::from(self.state.saturation) / 100.0,
            LIGHTNESS,
        );
        self.set_rgb(r, g, b).await?;
        self.state.hue = hue;

        info!("Hue set to {}", hue);
        Ok(())
    }

    /// Sets the saturation, deriving the RGB frame from the currently stored
    /// hue and the new saturation.
    ///
    /// # Arguments
    ///
    /// * `saturation` - Saturation percentage (0-100)
    ///
    /// # Errors
    ///
    /// Returns `Error::ValueOutOfRange` for values above 100; no frame is
    /// sent and state is unchanged.
    #[instrument(skip(self))]
    pub async fn set_saturation(&mut self, saturation: u8) -> Result<()> {
        if saturation > 100 {
            return Err(Error::ValueOutOfRange {
                min: 0,
                max: 100,
                actual: u32::from(saturation),
            });
        }

        let (r, g, b) = hsl_to_rgb(
            self.state.hue / 360.0,
            f64::from(saturation) / 100.0,
            LIGHTNESS,
        );
        self.set_rgb(r, g, b).await?;
        self.state.saturation = saturation;

        info!("Saturation set to {}%", saturation);
        Ok(())
    }

    /// Activates a preset effect, or restores static color mode.
    ///
    /// `Effect::None` re-derives the static color from the stored hue and
    /// saturation and sends it, leaving the strip showing what the state
    /// says it should.
    #[instrument(skip(self))]
    pub async fn set_effect(&mut self, effect: Effect) -> Result<()> {
        match effect.code() {
            Some(code) => {
                debug!("Setting effect to: {} ({:#04x})", effect, code);
                self.transport.send(&frame::effect(code)).await?;
            }
            None => {
                debug!("Disabling effect, restoring static color");
                let (r, g, b) = hsl_to_rgb(
                    self.state.hue / 360.0,
                    f64::from(self.state.saturation) / 100.0,
                    LIGHTNESS,
                );
                self.transport.send(&frame::rgb(r, g, b)).await?;
            }
        }
        self.state.effect = effect;

        info!("Effect set to {}", effect);
        Ok(())
    }

    /// Sets the speed of the active effect.
    ///
    /// # Arguments
    ///
    /// * `speed` - Effect speed percentage (0-100)
    ///
    /// # Errors
    ///
    /// Returns `Error::ValueOutOfRange` for values above 100; no frame is
    /// sent and state is unchanged.
    #[instrument(skip(self))]
    pub async fn set_effect_speed(&mut self, speed: u8) -> Result<()> {
        if speed > 100 {
            return Err(Error::ValueOutOfRange {
                min: 0,
                max: 100,
                actual: u32::from(speed),
            });
        }

        debug!("Setting effect speed to: {}", speed);
        self.transport.send(&frame::effect_speed(speed)).await?;
        self.state.effect_speed = speed;

        info!("Effect speed set to {}", speed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::frame;

    /// Records every frame it is handed; optionally refuses all of them.
    #[derive(Default)]
    struct MockTransport {
        frames: Mutex<Vec<Vec<u8>>>,
        fail: bool,
    }

    impl MockTransport {
        fn failing() -> Self {
            Self {
                frames: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn sent(&self) -> Vec<Vec<u8>> {
            self.frames.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LedTransport for MockTransport {
        async fn send(&self, frame: &[u8]) -> Result<()> {
            if self.fail {
                return Err(Error::Transport("write refused".into()));
            }
            self.frames.lock().unwrap().push(frame.to_vec());
            Ok(())
        }
    }

    fn model() -> LedStripModel<MockTransport> {
        LedStripModel::new(MockTransport::default())
    }

    #[test]
    fn default_state() {
        let state = LightState::default();
        assert!(!state.power());
        assert_eq!(state.brightness(), 100);
        assert_eq!(state.hue(), 0.0);
        assert_eq!(state.saturation(), 0);
        assert_eq!(state.effect(), Effect::None);
        assert_eq!(state.effect_speed(), 50);
    }

    #[tokio::test]
    async fn power_commits_state_and_sends_distinct_frames() {
        let mut light = model();
        light.set_power(true).await.unwrap();
        assert!(light.state().power());
        light.set_power(false).await.unwrap();
        assert!(!light.state().power());

        let sent = light.transport().sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], frame::power(true));
        assert_eq!(sent[1], frame::power(false));
        assert_ne!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn brightness_rejects_out_of_range_without_sending() {
        let mut light = model();
        for level in [101u8, 200, 255] {
            let err = light.set_brightness(level).await.unwrap_err();
            assert!(matches!(
                err,
                Error::ValueOutOfRange {
                    min: 0,
                    max: 100,
                    ..
                }
            ));
        }
        assert_eq!(light.state().brightness(), 100);
        assert!(light.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn brightness_in_range_is_committed() {
        let mut light = model();
        light.set_brightness(0).await.unwrap();
        assert_eq!(light.state().brightness(), 0);
        light.set_brightness(42).await.unwrap();
        assert_eq!(light.state().brightness(), 42);
        assert_eq!(
            light.transport().sent(),
            vec![frame::brightness(0), frame::brightness(42)]
        );
    }

    #[tokio::test]
    async fn effect_speed_rejects_out_of_range_without_sending() {
        let mut light = model();
        let err = light.set_effect_speed(101).await.unwrap_err();
        assert!(matches!(err, Error::ValueOutOfRange { actual: 101, .. }));
        assert_eq!(light.state().effect_speed(), 50);
        assert!(light.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn hue_rejects_outside_half_open_range() {
        let mut light = model();
        for hue in [360.0, 720.0, -1.0] {
            let err = light.set_hue(hue).await.unwrap_err();
            assert!(matches!(err, Error::InvalidHue(_)));
        }
        assert_eq!(light.state().hue(), 0.0);
        assert!(light.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn hue_derives_rgb_from_stored_saturation() {
        let mut light = model();
        light.set_saturation(100).await.unwrap();
        light.set_hue(120.0).await.unwrap();
        light.set_hue(240.0).await.unwrap();

        let sent = light.transport().sent();
        // Saturation change first derives red (hue still 0)
        assert_eq!(sent[0], frame::rgb(255, 0, 0));
        assert_eq!(sent[1], frame::rgb(0, 255, 0));
        assert_eq!(sent[2], frame::rgb(0, 0, 255));
        assert_eq!(light.state().hue(), 240.0);
        assert_eq!(light.state().saturation(), 100);
    }

    #[tokio::test]
    async fn saturation_derives_rgb_from_stored_hue() {
        let mut light = model();
        light.set_saturation(100).await.unwrap();
        light.set_hue(120.0).await.unwrap();
        // Dropping saturation to zero goes achromatic at the stored hue
        light.set_saturation(0).await.unwrap();

        let sent = light.transport().sent();
        assert_eq!(sent.last().unwrap(), &frame::rgb(128, 128, 128));
        assert_eq!(light.state().hue(), 120.0);
        assert_eq!(light.state().saturation(), 0);
    }

    #[tokio::test]
    async fn effect_sends_code_and_none_restores_color() {
        let mut light = model();
        light.set_saturation(100).await.unwrap();
        light.set_hue(240.0).await.unwrap();

        light.set_effect(Effect::JumpRedGreenBlue).await.unwrap();
        assert_eq!(light.state().effect(), Effect::JumpRedGreenBlue);
        assert_eq!(light.transport().sent().last().unwrap(), &frame::effect(0x87));

        light.set_effect(Effect::None).await.unwrap();
        assert_eq!(light.state().effect(), Effect::None);
        // Static color derived from stored hue/saturation again
        assert_eq!(
            light.transport().sent().last().unwrap(),
            &frame::rgb(0, 0, 255)
        );
    }

    #[tokio::test]
    async fn transport_failure_leaves_state_unchanged() {
        let mut light = LedStripModel::new(MockTransport::failing());

        assert!(matches!(
            light.set_power(true).await,
            Err(Error::Transport(_))
        ));
        assert!(!light.state().power());

        assert!(matches!(
            light.set_brightness(10).await,
            Err(Error::Transport(_))
        ));
        assert_eq!(light.state().brightness(), 100);

        assert!(matches!(
            light.set_hue(90.0).await,
            Err(Error::Transport(_))
        ));
        assert_eq!(light.state().hue(), 0.0);

        assert!(matches!(
            light.set_effect(Effect::CrossfadeRedGreenBlue).await,
            Err(Error::Transport(_))
        ));
        assert_eq!(light.state().effect(), Effect::None);
    }
}
