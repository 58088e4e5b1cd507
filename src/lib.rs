//! Layered pixel compositing and scene cycling for RGB LED matrix panels.
//!
//! A frame is a [`Matrix`] of colored cells. [`Imager`]s produce frames;
//! [`CompositeImager`] stacks them with black as the transparent color.
//! Scenes are imagers registered by name, and the [`ScenePlayer`] cycles
//! through them on the [`AnimationController`]'s clock.
//!
//! This module also holds the pieces the binary wires together:
//! - Panel configuration
//! - Matrix initialization with our hardware defaults
//! - Signal handling for clean shutdown

pub mod animation;
pub mod color;
pub mod converter;
pub mod error;
pub mod geometry;
pub mod imagers;
pub mod matrix;
pub mod platform;
pub mod player;
pub mod registry;
#[cfg(feature = "hardware")]
pub mod render;
pub mod scenes;
pub mod server;
pub mod snapshot;

pub use animation::AnimationController;
pub use color::{Color, rgb};
pub use converter::ImageToMatrixConverter;
pub use error::{ImagerError, Result};
pub use geometry::{Coordinates, Dimensions, Position};
pub use imagers::{CompositeImager, ImageFileImager, Imager, Layer, RandomImage, TextImager};
pub use matrix::{Cell, Matrix};
pub use platform::Platform;
pub use player::{FrameSink, PlayerCommand, ScenePlayer};
pub use registry::{Scene, SceneLoader, SceneRegistry, builtin_scenes};
pub use snapshot::{DisplayStatus, SharedSnapshot};

#[cfg(feature = "hardware")]
use rpi_led_matrix::{LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::Sender;

// ── Panel configuration ────────────────────────────────────────────

/// Configuration for the LED panel dimensions.
///
/// # Rust concept: derive macros
/// `Clone, Copy` make this cheaply copyable (it's just two u32s).
/// `Debug` gives us `{:?}` formatting. `PartialEq, Eq` let us compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub rows: u32,
    pub cols: u32,
}

impl PanelConfig {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Total number of pixels on the panel.
    pub fn pixel_count(&self) -> u32 {
        self.rows * self.cols
    }

    /// The panel as matrix dimensions (columns are the width).
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.cols, self.rows)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { rows: 64, cols: 64 }
    }
}

// ── Matrix initialization ──────────────────────────────────────────

/// Create a matrix configured for our hardware:
/// Pi Zero 2 W + Adafruit Bonnet + configurable panel size.
///
/// # Rust concept: Result and the ? operator
/// Initialization fails when not running as root or when GPIO is
/// unavailable; the caller decides what to do about it.
#[cfg(feature = "hardware")]
pub fn create_matrix(
    panel: PanelConfig,
) -> std::result::Result<LedMatrix, Box<dyn std::error::Error>> {
    let mut options = LedMatrixOptions::new();
    options.set_rows(panel.rows);
    options.set_cols(panel.cols);
    options.set_hardware_mapping("adafruit-hat");
    options.set_pwm_bits(8)?;
    // ~143Hz refresh
    options.set_pwm_lsb_nanoseconds(130);

    let mut rt_options = LedRuntimeOptions::new();
    // Pi Zero 2 W requires slowdown=2
    rt_options.set_gpio_slowdown(2);

    let matrix = LedMatrix::new(Some(options), Some(rt_options))?;
    Ok(matrix)
}

/// Install a Ctrl+C handler that asks the player to shut down.
///
/// The returned flag drops to `false` on the first signal. If the
/// handler cannot be installed the error is logged and the flag simply
/// never changes.
///
/// # Rust concept: Arc and AtomicBool
/// The flag is shared between the caller and the signal handler thread.
/// `AtomicBool` is a thread-safe boolean, so no mutex is needed for a single
/// bool.
pub fn setup_signal_handler(commands: Sender<PlayerCommand>) -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    let installed = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
        tracing::info!("Interrupt received, shutting down");
        if commands.try_send(PlayerCommand::Shutdown).is_err() {
            tracing::warn!("Could not deliver shutdown to the player");
        }
    });
    if let Err(e) = installed {
        tracing::error!("Error setting Ctrl-C handler: {}", e);
    }

    running
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn panel_config_default_is_64x64() {
        let panel = PanelConfig::default();
        assert_eq!(panel.rows, 64);
        assert_eq!(panel.cols, 64);
        assert_eq!(panel.dimensions(), Dimensions::square(64));
    }

    #[rstest]
    #[case(64, 64, 4096)]
    #[case(32, 32, 1024)]
    #[case(32, 64, 2048)]
    fn test_pixel_count(#[case] rows: u32, #[case] cols: u32, #[case] expected: u32) {
        assert_eq!(PanelConfig::new(rows, cols).pixel_count(), expected);
    }

    #[test]
    fn wide_panel_dimensions_put_columns_first() {
        assert_eq!(PanelConfig::new(32, 64).dimensions(), Dimensions::new(64, 32));
    }

    #[test]
    fn running_flag_reads_through() {
        let flag = AtomicBool::new(true);
        assert!(is_running(&flag));
        flag.store(false, Ordering::SeqCst);
        assert!(!is_running(&flag));
    }
}
