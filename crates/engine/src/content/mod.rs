mod hashing;
mod loader;
mod types;

pub use hashing::scenario_fingerprint_hex;
pub use loader::{
    load_scenario, resolve_scenario_path, ScenarioError, ScenarioInfo, DEFAULT_SCENARIO_FILE,
    SCENARIO_ENV_VAR,
};
