use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

/// A post directory on disk and the content file inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDir {
    pub dir_name: String,
    pub slug: String,
    pub post_path: PathBuf,
}

pub struct PostList {
    pub root_dir: PathBuf,
    pub post_file: String,
}

/// `2024-03-15-my-post` -> `my-post`. Names without the date prefix are
/// their own slug.
pub fn slug_from_dir_name(dir_name: &str) -> &str {
    lazy_static! {
        static ref DATED_DIR_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}-(?P<slug>.+)$").unwrap();
    }

    match DATED_DIR_REGEX.captures(dir_name).and_then(|cap| cap.name("slug")) {
        Some(slug) => slug.as_str(),
        None => dir_name,
    }
}

impl PostList {
    pub fn new(root_dir: &Path, post_file: &str) -> Self {
        PostList {
            root_dir: root_dir.to_path_buf(),
            post_file: post_file.to_string(),
        }
    }

    /// Every visible directory under the root, sorted by name. A directory
    /// without its content file fails the whole listing.
    pub fn retrieve_dirs(&self) -> io::Result<Vec<PostDir>> {
        let mut post_dirs = vec![];
        for dir_name in Self::list_dirs(&self.root_dir)? {
            let post_path = self.root_dir.join(&dir_name).join(&self.post_file);
            if !post_path.is_file() {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Post directory is missing {} - dir={}", self.post_file, self.root_dir.join(&dir_name).display()),
                ));
            }

            let slug = slug_from_dir_name(&dir_name).to_string();
            post_dirs.push(PostDir {
                dir_name,
                slug,
                post_path,
            });
        }
        Ok(post_dirs)
    }

    /// Looks a slug up without reading any content file.
    pub fn find_dir(&self, slug: &str) -> io::Result<Option<PostDir>> {
        for dir_name in Self::list_dirs(&self.root_dir)? {
            if slug_from_dir_name(&dir_name) != slug {
                continue;
            }
            let post_path = self.root_dir.join(&dir_name).join(&self.post_file);
            return Ok(Some(PostDir {
                slug: slug.to_string(),
                dir_name,
                post_path,
            }));
        }
        Ok(None)
    }

    fn list_dirs(posts_dir: &Path) -> io::Result<Vec<String>> {
        let entries = match fs::read_dir(posts_dir) {
            Ok(entries) => entries,
            Err(e) => return Err(io::Error::new(e.kind(), format!("Error reading posts directory {}: {}", posts_dir.display(), e))),
        };

        let mut dirs: Vec<String> = vec![];
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            dirs.push(name);
        }
        dirs.sort();
        Ok(dirs)
    }
}

/// Markdown files directly under `root_dir`, keyed by file stem.
pub fn list_page_files(root_dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut pages = vec![];
    for entry in fs::read_dir(root_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|x| x.to_str()) != Some("md") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|x| x.to_str()) {
            pages.push((stem.to_string(), path.clone()));
        }
    }
    pages.sort();
    Ok(pages)
}
