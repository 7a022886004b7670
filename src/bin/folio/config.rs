use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use folio::config::{read_config, Config};

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    let candidates = [
        exe_dir,
        env::current_dir().ok(),
        dirs::config_dir(),
    ];

    candidates.into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match cfg_path.or_else(get_config_path) {
        Some(path) => path,
        None => return Err(anyhow!("Could not find Folio configuration")),
    };

    if let Ok(cur_dir) = env::current_dir() {
        println!("Current dir: {}", cur_dir.display());
    }
    println!("Reading config from {}", config_path.display());
    let mut config = read_config(&config_path)
        .with_context(|| format!("Error reading {}", config_path.display()))?;

    match config.log {
        Some(ref mut log) => {
            if log.location.is_none() {
                log.location = dirs::cache_dir().map(|dir| dir.join("Folio").join("log").join("server.log"));
            }
            match log.location {
                Some(ref location) => println!("Log enabled. Files will be written in {}", location.display()),
                None => println!("Log enabled. No cache directory found, using stdout"),
            }
        }
        None => println!("Log disabled. Using stdout"),
    }

    match config.contact.endpoint {
        Some(ref endpoint) => println!("Contact messages are relayed to {}", endpoint),
        None => println!("No contact endpoint. Contact messages are only logged"),
    }

    Ok(config)
}
