use std::{fs, io};
use std::path::Path;

use crate::content::front_matter::parse_front_matter;
use crate::content::markdown_renderer::MarkdownRenderer;
use crate::content::post_list::list_page_files;

/// A standalone markdown page such as `about` or `projects`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub name: String,
    pub title: String,
    pub content: String,
}

pub fn load_page(pages_dir: &Path, name: &str, renderer: &MarkdownRenderer) -> io::Result<Option<Page>> {
    // Only names that exist in the directory listing are ever opened
    let Some((_, path)) = list_page_files(pages_dir)?.into_iter().find(|(stem, _)| stem == name) else {
        return Ok(None);
    };

    let raw = fs::read_to_string(&path)?;
    let (front_matter, body) = parse_front_matter(&path, &raw)?;
    let content = renderer.render(body)?;

    Ok(Some(Page {
        name: name.to_string(),
        title: front_matter.title.unwrap_or_else(|| name.to_string()),
        content,
    }))
}
