//! Whole-pipeline checks through the public API: composite a scene,
//! discover scenes from a registry, and drive the player into a snapshot.

use led_imager::platform::{MemoryImageLoader, MonoTextRenderer};
use led_imager::registry::factory;
use led_imager::{
    AnimationController, Cell, CompositeImager, Dimensions, Imager, ImagerError, Platform,
    PlayerCommand, Position, RandomImage, Scene, ScenePlayer, SceneRegistry, SharedSnapshot, rgb,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::mpsc;

fn platform() -> Platform {
    Platform::new(MemoryImageLoader::new(), MonoTextRenderer::new())
}

#[test]
fn centered_random_layer_leaves_the_border_untouched() {
    let background = Cell::opaque(rgb(45, 45, 45));
    let mut scene = CompositeImager::new(Dimensions::square(64), rgb(45, 45, 45))
        .add(RandomImage::new(Dimensions::square(15)), Position::center());

    for frame in 0..3 {
        let matrix = scene.get_matrix(frame, None);
        assert_eq!(matrix.dimensions(), Dimensions::square(64));

        // floor((64 - 15) / 2) = 24
        let inside = |v: u32| (24..24 + 15).contains(&v);
        for (cell, x, y) in matrix.iter() {
            if !(inside(x) && inside(y)) {
                assert_eq!(cell, background, "cell ({x}, {y}) on frame {frame}");
            }
        }
    }
}

#[test]
fn registry_keeps_the_scene_that_builds() {
    let mut registry = SceneRegistry::new();
    registry
        .register(
            "BrokenScene",
            Box::new(|_: &Platform| Err(ImagerError::scene("BrokenScene", "missing asset"))),
        )
        .register("NoiseScene", factory(|_| RandomImage::new(Dimensions::square(8))));

    let scenes = registry.discover(&platform()).unwrap();
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].name, "NoiseScene");
}

#[test]
fn builtin_scenes_play_on_a_64_grid() {
    let scenes = led_imager::builtin_scenes().discover(&platform()).unwrap();
    let mut player = ScenePlayer::new(scenes, true).unwrap();
    assert_eq!(player.current_name(), "DefaultScene");
    for frame in 0..5 {
        assert_eq!(player.on_frame(frame).dimensions(), Dimensions::square(64));
    }
}

#[tokio::test(start_paused = true)]
async fn player_publishes_frames_and_obeys_commands() {
    let solid = |r, g| CompositeImager::new(Dimensions::square(4), rgb(r, g, 0));
    let scenes = vec![
        Scene::new("RedScene", solid(200, 0)),
        Scene::new("GreenScene", solid(0, 200)),
    ];
    let mut player = ScenePlayer::new(scenes, true).unwrap();

    let mut controller = AnimationController::new();
    controller.start(Duration::from_millis(100), 100);

    let snapshot = SharedSnapshot::new(Dimensions::square(4));
    let reader = snapshot.clone();
    let (tx, rx) = mpsc::channel(4);

    let drive = async {
        tokio::time::sleep(Duration::from_millis(250)).await;
        let status = reader.status();
        assert_eq!((status.scene.as_str(), status.frame), ("RedScene", 2));
        assert!(status.running);
        assert_eq!(reader.matrix().get(0, 0), Some(Cell::opaque(rgb(200, 0, 0))));

        tx.send(PlayerCommand::Stop).await.unwrap();
        tx.send(PlayerCommand::SelectScene(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        let status = reader.status();
        assert_eq!(
            (status.scene.as_str(), status.scene_index, status.frame),
            ("GreenScene", 1, 0)
        );
        assert!(!status.running);
        assert_eq!(reader.matrix().get(3, 3), Some(Cell::opaque(rgb(0, 200, 0))));

        tx.send(PlayerCommand::Shutdown).await.unwrap();
    };

    tokio::join!(player.run(&mut controller, snapshot, rx), drive);
    assert_eq!(player.current_index(), 1);
}
