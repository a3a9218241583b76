use sceneport_convert::{ConversionError, ConversionOptions, Diagnostic};
use sceneport_foreign::ForeignScene;
use sceneport_model::NativeScene;
use sceneport_resource::ResourceCache;

static SCENEPORT_STATIC: std::sync::OnceLock<SceneportStatic> = std::sync::OnceLock::new();

struct SceneportStatic {}

impl SceneportStatic {
    fn init() -> &'static Self {
        SCENEPORT_STATIC.get_or_init(|| {
            env_logger::builder()
                .filter_level(log::LevelFilter::Info)
                .filter_module("zip", log::LevelFilter::Warn)
                .parse_default_env()
                .init();

            Self {}
        })
    }
}

/// Host-facing entry point. Owns the process-wide resource cache and wires
/// it into every conversion; construct one at startup and share it.
pub struct Sceneport {
    cache: ResourceCache,
}

impl Default for Sceneport {
    fn default() -> Self {
        Self::new()
    }
}

impl Sceneport {
    pub fn new() -> Self {
        SceneportStatic::init();

        Self {
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Clears the resource cache. Callers must ensure no conversion is in
    /// flight, e.g. between independent test loads.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    pub fn convert(
        &self,
        foreign: &ForeignScene,
        options: &ConversionOptions,
    ) -> Result<NativeScene, ConversionError> {
        sceneport_convert::convert(foreign, options, &self.cache)
    }

    pub fn convert_with_diagnostics(
        &self,
        foreign: &ForeignScene,
        options: &ConversionOptions,
    ) -> Result<(NativeScene, Vec<Diagnostic>), ConversionError> {
        sceneport_convert::convert_with_diagnostics(foreign, options, &self.cache)
    }
}
