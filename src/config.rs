use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::i18n::Lang;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

#[derive(Deserialize, Debug)]
pub struct Paths {
    pub posts_dir: PathBuf,
    pub storage_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug)]
pub struct Defaults {
    pub page_size: u32,
    pub words_per_minute: Option<u32>,
    pub author: Option<String>,
    pub lang: Option<Lang>,
}

impl Defaults {
    pub fn words_per_minute(&self) -> u32 {
        match self.words_per_minute {
            Some(wpm) if wpm > 0 => wpm,
            _ => DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Comments {
    pub api_base: String,
    pub max_reply_depth: Option<usize>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub paths: Paths,
    pub defaults: Defaults,
    pub comments: Comments,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent().unwrap_or(Path::new("."));
    let relative = path.strip_prefix("${exe_dir}")
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e.to_string()))?;
    Ok(exe_dir.join(relative))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    if cfg.defaults.page_size == 0 {
        return Err(io::Error::new(ErrorKind::InvalidData, "defaults.page_size has to be greater than 0"));
    }

    cfg.paths = Paths {
        posts_dir: parse_path(cfg.paths.posts_dir)?,
        storage_file: cfg.paths.storage_file.map(parse_path).transpose()?,
    };

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
