//! Render thread: owns the LED panel and draws each composited frame.
//!
//! The player runs on the tokio runtime; the panel wants a dedicated OS
//! thread (the C library drives the GPIO with its own refresh thread and
//! `LedMatrix` must stay where it was created). [`PanelSink`] bridges
//! the two with a small bounded channel.
//!
//! ## Rust concepts
//! - `std::sync::mpsc::sync_channel` between async and sync worlds
//! - `try_send` so a slow panel drops frames instead of stalling the player
//! - Ownership transfer: `matrix.swap(canvas)` takes and returns the canvas

use crate::matrix::Matrix;
use crate::player::FrameSink;
use crate::snapshot::DisplayStatus;
use crate::{PanelConfig, create_matrix};
use rpi_led_matrix::LedCanvas;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

/// Frames queued for the panel before new ones are dropped.
const PANEL_QUEUE: usize = 2;

/// Draw every cell of `frame` with its brightness folded into the color.
///
/// Cells outside the panel are clipped by the canvas.
pub fn draw_matrix(canvas: &mut LedCanvas, frame: &Matrix) {
    for (cell, x, y) in frame.iter() {
        canvas.set(x as i32, y as i32, &cell.display_color().into());
    }
}

/// Spawn the render thread and return the sink that feeds it.
///
/// The thread exits when the sink is dropped, clearing the panel on the
/// way out.
pub fn spawn_panel(panel: PanelConfig) -> (PanelSink, JoinHandle<()>) {
    let (tx, rx) = mpsc::sync_channel(PANEL_QUEUE);
    let handle = thread::spawn(move || render_loop(rx, panel));
    (PanelSink { tx }, handle)
}

/// Blocking loop: wait for a frame, draw it, swap it onto the panel.
pub fn render_loop(rx: Receiver<Matrix>, panel: PanelConfig) {
    // Nothing to draw on without the matrix
    let matrix = match create_matrix(panel) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("Failed to initialize LED matrix: {}", e);
            return;
        }
    };

    let mut canvas = matrix.offscreen_canvas();
    tracing::info!("Render thread started ({}x{})", panel.cols, panel.rows);

    let mut frames: u64 = 0;
    while let Ok(frame) = rx.recv() {
        canvas.clear();
        draw_matrix(&mut canvas, &frame);
        canvas = matrix.swap(canvas);
        frames += 1;
        if frames % 1000 == 0 {
            tracing::debug!("Rendered {} frames", frames);
        }
    }

    canvas.clear();
    let _ = matrix.swap(canvas);
    tracing::info!("Render thread: channel closed, shutting down.");
}

/// Forwards presented frames to the render thread.
#[derive(Clone, Debug)]
pub struct PanelSink {
    tx: SyncSender<Matrix>,
}

impl FrameSink for PanelSink {
    fn present(&mut self, matrix: &Matrix, _status: &DisplayStatus) {
        match self.tx.try_send(matrix.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => tracing::debug!("Panel busy, frame dropped"),
            Err(TrySendError::Disconnected(_)) => tracing::debug!("Render thread is gone"),
        }
    }
}
