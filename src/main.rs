//! Table tennis scene
//!
//! Usage: `table-tennis [settings.ron | settings.json]`

use table_tennis::prelude::*;
use table_tennis::renderer::ShadowConfig;

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match DemoConfig::load(&path) {
            Ok(config) => {
                log::info!("Loaded settings from {path}");
                config
            }
            Err(e) => {
                eprintln!("Cannot load settings from {path}: {e}");
                std::process::exit(2);
            }
        },
        None => DemoConfig::default(),
    };

    let engine_config = EngineConfig::from(&config.window)
        .with_shadows(ShadowConfig::from_settings(&config.lighting));

    let game = TableTennis::new(config);
    let engine = Engine::new(engine_config, game);

    if let Err(e) = engine.run() {
        eprintln!("Engine error: {}", e);
        std::process::exit(1);
    }
}
