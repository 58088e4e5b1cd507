//! Scene discovery: turning a list of named factories into ready scenes.
//!
//! Two strategies feed the player:
//! - [`SceneRegistry`], an explicit ordered list assembled by startup code
//!   ([`builtin_scenes`] lists every scene this crate ships)
//! - [`SceneLoader`], which scans module listings for exports whose name
//!   looks like a scene
//!
//! Either way a factory that fails is logged and skipped; only an empty
//! result is an error.
//!
//! ## Rust concepts
//! - Boxed closures (`Box<dyn Fn>`) as stored constructors
//! - `Send + Sync` bounds so factories can be built on one thread and
//!   used on another

use crate::error::{ImagerError, Result};
use crate::imagers::Imager;
use crate::matrix::Matrix;
use crate::platform::Platform;
use crate::scenes::{
    BubblegumScene, ChristmasTreeScene, DefaultScene, PulsingScene, RandomScene,
    RotatingSquareScene, TetrisScene, TextScene,
};

/// Builds one scene from the platform.
pub type SceneFactory = Box<dyn Fn(&Platform) -> Result<Box<dyn Imager>> + Send + Sync>;

/// Wrap an infallible constructor as a [`SceneFactory`].
pub fn factory<I, F>(build: F) -> SceneFactory
where
    I: Imager + 'static,
    F: Fn(&Platform) -> I + Send + Sync + 'static,
{
    Box::new(move |platform: &Platform| Ok(Box::new(build(platform)) as Box<dyn Imager>))
}

// ── Scene ───────────────────────────────────────────────────────────

/// An instantiated scene together with the name it was registered under.
pub struct Scene {
    pub name: String,
    pub imager: Box<dyn Imager>,
}

impl Scene {
    pub fn new(name: impl Into<String>, imager: impl Imager + 'static) -> Self {
        Self {
            name: name.into(),
            imager: Box::new(imager),
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene").field("name", &self.name).finish()
    }
}

impl Imager for Scene {
    fn get_matrix(&mut self, frame: u32, previous: Option<&Matrix>) -> Matrix {
        self.imager.get_matrix(frame, previous)
    }
}

// ── Registry ────────────────────────────────────────────────────────

/// Append-only, ordered list of scene factories.
#[derive(Default)]
pub struct SceneRegistry {
    factories: Vec<(String, SceneFactory)>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, factory: SceneFactory) -> &mut Self {
        self.factories.push((name.into(), factory));
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Instantiate every scene in registration order. Failing factories
    /// are logged and left out.
    pub fn get_all(&self, platform: &Platform) -> Vec<Scene> {
        self.factories
            .iter()
            .filter_map(|(name, factory)| instantiate(name, factory, platform))
            .collect()
    }

    /// Like [`get_all`](Self::get_all), but an empty result is an error.
    pub fn discover(&self, platform: &Platform) -> Result<Vec<Scene>> {
        non_empty(self.get_all(platform))
    }
}

impl std::fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn instantiate(name: &str, factory: &SceneFactory, platform: &Platform) -> Option<Scene> {
    match factory(platform) {
        Ok(imager) => Some(Scene {
            name: name.to_string(),
            imager,
        }),
        Err(e) => {
            tracing::warn!("Skipping scene {}: {}", name, e);
            None
        }
    }
}

fn non_empty(scenes: Vec<Scene>) -> Result<Vec<Scene>> {
    if scenes.is_empty() {
        return Err(ImagerError::EmptySceneSet);
    }
    tracing::info!("Discovered {} scene(s)", scenes.len());
    Ok(scenes)
}

/// Every scene shipped with this crate, in display order.
pub fn builtin_scenes() -> SceneRegistry {
    let mut registry = SceneRegistry::new();
    registry
        .register("DefaultScene", factory(DefaultScene::new))
        .register("BubblegumScene", factory(BubblegumScene::new))
        .register("RandomScene", factory(RandomScene::new))
        .register("TextScene", factory(TextScene::new))
        .register("ChristmasTreeScene", factory(|_| ChristmasTreeScene::new()))
        .register("RotatingSquareScene", factory(|_| RotatingSquareScene::new()))
        .register("TetrisScene", factory(|_| TetrisScene::new()))
        .register("PulsingScene", factory(|_| PulsingScene::default()));
    registry
}

// ── Loader ──────────────────────────────────────────────────────────

/// One enumerated module and the constructors it exports.
pub struct SceneModule {
    pub path: String,
    pub exports: Vec<(String, SceneFactory)>,
}

/// Lists the modules a [`SceneLoader`] should inspect.
pub type ModuleSource = Box<dyn Fn() -> Vec<SceneModule> + Send + Sync>;

/// Finds scenes by export name across a set of modules.
///
/// By default an export is treated as a scene when its name ends in
/// `Scene`; [`with_filter`](Self::with_filter) swaps the rule.
pub struct SceneLoader {
    modules: ModuleSource,
    is_scene: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

impl SceneLoader {
    pub fn new(modules: impl Fn() -> Vec<SceneModule> + Send + Sync + 'static) -> Self {
        Self {
            modules: Box::new(modules),
            is_scene: Box::new(|name: &str| name.ends_with("Scene")),
        }
    }

    pub fn with_filter(
        mut self,
        is_scene: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_scene = Box::new(is_scene);
        self
    }

    /// Instantiate every matching export, module by module in listing
    /// order. Failures are logged and skipped.
    pub fn load(&self, platform: &Platform) -> Vec<Scene> {
        let mut scenes = Vec::new();
        for module in (self.modules)() {
            tracing::debug!("Scanning {} ({} exports)", module.path, module.exports.len());
            for (name, factory) in &module.exports {
                if !(self.is_scene)(name) {
                    continue;
                }
                scenes.extend(instantiate(name, factory, platform));
            }
        }
        scenes
    }

    /// Like [`load`](Self::load), but an empty result is an error.
    pub fn discover(&self, platform: &Platform) -> Result<Vec<Scene>> {
        non_empty(self.load(platform))
    }
}

/// The built-in scenes as a single module listing, for use with
/// [`SceneLoader`].
pub fn builtin_module() -> SceneModule {
    let registry = builtin_scenes();
    SceneModule {
        path: "scenes".to_string(),
        exports: registry.factories,
    }
}
