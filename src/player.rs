//! Scene player: picks the scene for each frame and hands the result to
//! whatever is displaying it.
//!
//! [`ScenePlayer::run`] is the one task that owns every imager. It pulls
//! frames from the [`AnimationController`], takes [`PlayerCommand`]s from
//! a channel, and pushes each rendered [`Matrix`] into a [`FrameSink`].
//!
//! ## Rust concepts
//! - `tokio::select!` to wait on the clock and a command channel at once
//! - Trait objects vs generics: the sink is generic, scenes are boxed
//! - Returning `&Matrix` to lend out internal state without copying

use crate::animation::AnimationController;
use crate::error::{ImagerError, Result};
use crate::imagers::Imager;
use crate::matrix::Matrix;
use crate::registry::Scene;
use crate::snapshot::DisplayStatus;
use tokio::sync::mpsc;

/// Something that displays frames: a panel, a snapshot, a test probe.
pub trait FrameSink {
    fn present(&mut self, matrix: &Matrix, status: &DisplayStatus);
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn present(&mut self, matrix: &Matrix, status: &DisplayStatus) {
        (**self).present(matrix, status);
    }
}

/// Show every frame on two sinks.
impl<A: FrameSink, B: FrameSink> FrameSink for (A, B) {
    fn present(&mut self, matrix: &Matrix, status: &DisplayStatus) {
        self.0.present(matrix, status);
        self.1.present(matrix, status);
    }
}

/// Requests the running player accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    SelectScene(usize),
    Start,
    Stop,
    /// Back to frame 0 of the current scene.
    Reset,
    SetCycling(bool),
    Shutdown,
}

/// Cycles through a fixed, non-empty list of scenes.
///
/// Each scene plays for one full animation cycle. When the frame counter
/// wraps to 0 (and cycling is on with more than one scene) the player
/// moves to the next scene and starts it without a previous frame.
pub struct ScenePlayer {
    scenes: Vec<Scene>,
    current: usize,
    cycling: bool,
    frame: u32,
    matrix: Matrix,
}

impl ScenePlayer {
    /// Fails with [`ImagerError::EmptySceneSet`] when `scenes` is empty.
    pub fn new(mut scenes: Vec<Scene>, cycling: bool) -> Result<Self> {
        let first = scenes.first_mut().ok_or(ImagerError::EmptySceneSet)?;
        let matrix = first.get_matrix(0, None);
        tracing::info!(
            "Player ready with {} scene(s), showing {}",
            scenes.len(),
            scenes[0].name
        );
        Ok(Self {
            scenes,
            current: 0,
            cycling,
            frame: 0,
            matrix,
        })
    }

    /// Render `frame`, switching scene first if the cycle just wrapped.
    pub fn on_frame(&mut self, frame: u32) -> &Matrix {
        let switched = frame == 0 && self.cycling && self.scenes.len() > 1;
        if switched {
            self.current = (self.current + 1) % self.scenes.len();
            tracing::info!(
                "Switching to scene {}/{}: {}",
                self.current + 1,
                self.scenes.len(),
                self.scenes[self.current].name
            );
        }

        let previous = (!switched).then_some(&self.matrix);
        let next = self.scenes[self.current].get_matrix(frame, previous);
        self.matrix = next;
        self.frame = frame;
        &self.matrix
    }

    /// Jump to scene `index` and show its first frame. Out-of-range
    /// indices are ignored and return `false`.
    pub fn set_current_scene(&mut self, index: usize) -> bool {
        let Some(scene) = self.scenes.get_mut(index) else {
            let count = self.scenes.len();
            tracing::warn!("Scene index {} out of range ({} scenes)", index, count);
            return false;
        };
        self.matrix = scene.get_matrix(0, None);
        self.current = index;
        self.frame = 0;
        tracing::info!("Selected scene {}", scene.name);
        true
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_name(&self) -> &str {
        &self.scenes[self.current].name
    }

    pub fn scene_names(&self) -> Vec<&str> {
        self.scenes.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// The most recently rendered frame.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn is_cycling(&self) -> bool {
        self.cycling
    }

    pub fn set_cycling(&mut self, cycling: bool) {
        self.cycling = cycling;
    }

    pub fn status(&self, controller: &AnimationController) -> DisplayStatus {
        DisplayStatus {
            scene: self.current_name().to_string(),
            scene_index: self.current,
            scene_count: self.scenes.len(),
            frame: self.frame,
            max_frames: controller.max_frames(),
            running: controller.is_running(),
            cycling: self.cycling,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn present(&self, controller: &AnimationController, sink: &mut impl FrameSink) {
        sink.present(&self.matrix, &self.status(controller));
    }

    /// Apply one command. Returns `false` for [`PlayerCommand::Shutdown`].
    fn apply(&mut self, command: PlayerCommand, controller: &mut AnimationController) -> bool {
        tracing::debug!("Player command: {:?}", command);
        match command {
            PlayerCommand::SelectScene(index) => {
                if self.set_current_scene(index) {
                    controller.reset();
                }
            }
            PlayerCommand::Start => {
                controller.start(controller.interval(), controller.max_frames());
            }
            PlayerCommand::Stop => controller.stop(),
            PlayerCommand::Reset => {
                controller.reset();
                self.set_current_scene(self.current);
            }
            PlayerCommand::SetCycling(cycling) => self.set_cycling(cycling),
            PlayerCommand::Shutdown => return false,
        }
        true
    }

    /// Drive the player until it is told to shut down or every command
    /// sender is gone.
    ///
    /// The sink sees the current frame immediately, every frame the
    /// controller produces, and the result of every command.
    pub async fn run(
        &mut self,
        controller: &mut AnimationController,
        mut sink: impl FrameSink,
        mut commands: mpsc::Receiver<PlayerCommand>,
    ) {
        self.present(controller, &mut sink);

        loop {
            let running = controller.is_running();
            tokio::select! {
                Some(frame) = controller.next_frame(), if running => {
                    self.on_frame(frame);
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        tracing::info!("Command channel closed; player exiting");
                        break;
                    };
                    if !self.apply(command, controller) {
                        tracing::info!("Player shutting down");
                        break;
                    }
                }
            }
            self.present(controller, &mut sink);
        }
    }
}

impl std::fmt::Debug for ScenePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenePlayer")
            .field("scenes", &self.scene_names())
            .field("current", &self.current)
            .field("cycling", &self.cycling)
            .field("frame", &self.frame)
            .finish()
    }
}
