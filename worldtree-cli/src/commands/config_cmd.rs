use std::path::Path;

use worldtree_camera::CameraConfig;

use crate::project;

pub fn run(explicit: Option<&Path>, defaults: bool) -> anyhow::Result<()> {
    let config = if defaults {
        CameraConfig::default()
    } else {
        let loaded = project::load_config(explicit)?;
        log::info!("Config loaded from {}", loaded.source);
        loaded.config
    };
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
