use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::contact::guard::DEFAULT_MIN_ELAPSED_SECS;

#[derive(Deserialize, Debug, Clone)]
pub struct Site {
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Paths {
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
    pub posts_dir: PathBuf,
    pub pages_dir: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Defaults {
    #[serde(default = "default_index_base_name")]
    pub index_base_name: String,
    #[serde(default = "default_recent_post_count")]
    pub recent_post_count: usize,
    #[serde(default = "default_allow_raw_html")]
    pub allow_raw_html: bool,
}

fn default_index_base_name() -> String {
    "index.md".to_string()
}

fn default_recent_post_count() -> usize {
    3
}

fn default_allow_raw_html() -> bool {
    true
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            index_base_name: default_index_base_name(),
            recent_post_count: default_recent_post_count(),
            allow_raw_html: default_allow_raw_html(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Where accepted contact messages go. Without an endpoint they are only logged.
#[derive(Deserialize, Debug, Clone)]
pub struct Contact {
    pub endpoint: Option<String>,
    #[serde(default = "default_min_elapsed_secs")]
    pub min_elapsed_secs: i64,
}

fn default_min_elapsed_secs() -> i64 {
    DEFAULT_MIN_ELAPSED_SECS
}

impl Default for Contact {
    fn default() -> Self {
        Contact {
            endpoint: None,
            min_elapsed_secs: DEFAULT_MIN_ELAPSED_SECS,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResumeCfg {
    #[serde(default = "default_resume_file_name")]
    pub file_name: String,
    /// TOML resume. The one built into the binary is used when absent.
    pub source: Option<PathBuf>,
}

fn default_resume_file_name() -> String {
    "resume.pdf".to_string()
}

impl Default for ResumeCfg {
    fn default() -> Self {
        ResumeCfg {
            file_name: default_resume_file_name(),
            source: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub server: Server,
    pub log: Option<Log>,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub resume: ResumeCfg,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    let Some(str_path) = path.to_str() else {
        return Ok(path);
    };
    if !str_path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = match cur_exe.parent().and_then(|p| p.to_str()) {
        Some(dir) => dir.to_string(),
        None => return Err(io::Error::new(
            ErrorKind::NotFound, format!("Executable directory not found - exe={}", cur_exe.display()))),
    };
    Ok(PathBuf::from(str_path.replace("${exe_dir}", &exe_dir)))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        template_dir: parse_path(cfg.paths.template_dir)?,
        public_dir: parse_path(cfg.paths.public_dir)?,
        posts_dir: parse_path(cfg.paths.posts_dir)?,
        pages_dir: parse_path(cfg.paths.pages_dir)?,
    };
    if let Some(source) = cfg.resume.source.take() {
        cfg.resume.source = Some(parse_path(source)?);
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_CFG: &str = r#"
[site]
title = "Folio"

[paths]
template_dir = "res/template"
public_dir = "res/public"
posts_dir = "res/posts"
pages_dir = "res/pages"

[server]
address = "127.0.0.1"
port = 8001
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let cfg = parse_config(MINIMAL_CFG).unwrap();
        assert_eq!(cfg.site.title, "Folio");
        assert_eq!(cfg.defaults.index_base_name, "index.md");
        assert_eq!(cfg.defaults.recent_post_count, 3);
        assert!(cfg.defaults.allow_raw_html);
        assert!(cfg.log.is_none());
        assert!(cfg.contact.endpoint.is_none());
        assert_eq!(cfg.contact.min_elapsed_secs, DEFAULT_MIN_ELAPSED_SECS);
        assert_eq!(cfg.resume.file_name, "resume.pdf");
        assert_eq!(cfg.paths.posts_dir, PathBuf::from("res/posts"));
    }

    #[test]
    fn test_full_config() {
        let src = format!("{}{}", MINIMAL_CFG, r#"
[defaults]
recent_post_count = 5
allow_raw_html = false

[log]
level = "Debug"
log_to_console = true

[contact]
endpoint = "https://forms.example.com/f/abc"
min_elapsed_secs = 5

[resume]
file_name = "jordan.pdf"
source = "${exe_dir}/resume.toml"
"#);
        let cfg = parse_config(&src).unwrap();
        assert_eq!(cfg.defaults.recent_post_count, 5);
        assert!(!cfg.defaults.allow_raw_html);
        assert_eq!(cfg.defaults.index_base_name, "index.md");

        let log = cfg.log.unwrap();
        assert_eq!(log.level, LogLevel::Debug);
        assert!(log.location.is_none());

        assert_eq!(cfg.contact.endpoint.as_deref(), Some("https://forms.example.com/f/abc"));
        assert_eq!(cfg.contact.min_elapsed_secs, 5);

        assert_eq!(cfg.resume.file_name, "jordan.pdf");
        let source = cfg.resume.source.unwrap();
        assert!(!source.to_string_lossy().contains("${exe_dir}"));
        assert!(source.ends_with("resume.toml"));
    }

    #[test]
    fn test_invalid_config() {
        let err = parse_config("[site]\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_sample_config_parses() {
        let cfg = read_config(Path::new("folio.toml")).unwrap();
        assert_eq!(cfg.paths.template_dir, PathBuf::from("res/template"));
    }
}
