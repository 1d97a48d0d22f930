use std::env;
use std::path::PathBuf;

use folio::config::{read_config, Config};

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    let cur_dir = env::current_dir().ok();

    [exe_dir, cur_dir, dirs::config_dir()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join("folio")
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let config_path = match cfg_path.or_else(get_config_path) {
        None => return Err(format!("Could not find {}", CFG_FILE_NAME)),
        Some(x) => x,
    };

    let mut config = read_config(&config_path).map_err(|e| e.to_string())?;

    if let Some(mut log) = config.log {
        let location = log.location.unwrap_or_else(|| {
            app_dir(dirs::cache_dir()).join("log").join("folio.log")
        });
        log.location = Some(location);
        config.log = Some(log);
    }

    if config.paths.storage_file.is_none() {
        config.paths.storage_file = Some(app_dir(dirs::data_dir()).join("storage.json"));
    }

    Ok(config)
}
