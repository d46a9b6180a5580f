use engine::{load_scenario, resolve_app_paths, resolve_scenario_path, LoopConfig, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) session: Box<dyn Session>,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();
    info!("=== Casewalk Startup ===");

    let paths = resolve_app_paths().map_err(|error| error.to_string())?;
    let scenario_path = resolve_scenario_path(&paths).map_err(|error| error.to_string())?;
    let (scenario_info, map) =
        load_scenario(&scenario_path).map_err(|error| error.to_string())?;
    let settings = gameplay::load_settings(&paths.assets_dir.join(gameplay::SETTINGS_FILE))?;
    let session = gameplay::build_session(&scenario_info, map, settings)?;

    let config = LoopConfig {
        window_title: format!("Casewalk - {}", scenario_info.scenario_name),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        session: Box::new(session),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
