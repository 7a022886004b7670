use std::{fs, io};
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

pub mod document;
pub mod export;
pub mod layout;
pub mod metrics;
pub mod renderer;

const BUILTIN_RESUME: &str = include_str!("../../res/resume.toml");

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SkillColumn {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Skills {
    pub left: SkillColumn,
    pub right: SkillColumn,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Project {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Role {
    pub role: String,
    pub organization: String,
    pub period: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Degree {
    pub degree: String,
    pub school: String,
}

/// Everything printed on the resume, in print order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Resume {
    pub name: String,
    pub headline: String,
    #[serde(default)]
    pub contacts: Vec<String>,
    #[serde(default)]
    pub summary: Vec<String>,
    pub skills: Skills,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub experience: Vec<Role>,
    #[serde(default)]
    pub education: Vec<Degree>,
}

impl Resume {
    pub fn from_toml(src: &str) -> io::Result<Resume> {
        match toml::from_str::<Resume>(src) {
            Ok(resume) => Ok(resume),
            Err(e) => Err(io::Error::new(ErrorKind::InvalidData, format!("Error parsing resume: {}", e))),
        }
    }

    /// The resume compiled into the binary.
    pub fn builtin() -> io::Result<Resume> {
        Self::from_toml(BUILTIN_RESUME)
    }

    pub fn load(path: &Path) -> io::Result<Resume> {
        let src = match fs::read_to_string(path) {
            Ok(src) => src,
            Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening resume {}: {}", path.display(), e))),
        };
        Self::from_toml(&src)
    }

    pub fn load_or_builtin(path: Option<&Path>) -> io::Result<Resume> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }
}
