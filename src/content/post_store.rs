use std::collections::{BTreeSet, HashMap};
use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use spdlog::debug;

use crate::content::front_matter::parse_front_matter;
use crate::content::markdown_renderer::MarkdownRenderer;
use crate::content::post_list::{PostDir, PostList};
use crate::content::Post;
use crate::text_utils::reading_time;

/// Read-only view over a directory of `YYYY-MM-DD-<slug>/index.md` posts.
/// Nothing is cached: every call goes back to disk.
pub struct PostStore {
    post_list: PostList,
    renderer: MarkdownRenderer,
}

impl PostStore {
    pub fn new(root_dir: &Path, post_file: &str, renderer: MarkdownRenderer) -> Self {
        PostStore {
            post_list: PostList::new(root_dir, post_file),
            renderer,
        }
    }

    pub fn root_dir(&self) -> &PathBuf {
        &self.post_list.root_dir
    }

    /// All posts, newest first. One broken post fails the whole listing.
    pub fn list_posts(&self) -> io::Result<Vec<Post>> {
        let dirs = self.post_list.retrieve_dirs()?;

        let mut seen: HashMap<String, String> = HashMap::new();
        let mut posts = Vec::with_capacity(dirs.len());
        for dir in dirs {
            if let Some(other) = seen.insert(dir.slug.clone(), dir.dir_name.clone()) {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Duplicate slug {} in directories {} and {}", dir.slug, other, dir.dir_name),
                ));
            }
            debug!("Loading post {} from {}", dir.slug, dir.post_path.display());
            posts.push(self.load(&dir, false)?);
        }

        sort_by_date_desc(&mut posts);
        Ok(posts)
    }

    /// Distinct non-empty categories, ascending.
    pub fn list_categories(&self) -> io::Result<Vec<String>> {
        let posts = self.list_posts()?;
        Ok(categories_of(&posts))
    }

    pub fn list_posts_in_category(&self, category: &str) -> io::Result<Vec<Post>> {
        let posts = self.list_posts()?;
        Ok(posts.into_iter().filter(|post| post.category == category).collect())
    }

    /// `Ok(None)` when no directory resolves to `slug`.
    pub fn get_post_by_slug(&self, slug: &str) -> io::Result<Option<Post>> {
        match self.post_list.find_dir(slug)? {
            None => Ok(None),
            Some(dir) => Ok(Some(self.load(&dir, true)?)),
        }
    }

    /// Where `file` lives inside the directory of `slug`, if that slug exists.
    pub fn asset_path(&self, slug: &str, file: &str) -> io::Result<Option<PathBuf>> {
        let dir = self.post_list.find_dir(slug)?;
        Ok(dir.map(|dir| self.post_list.root_dir.join(dir.dir_name).join(file)))
    }

    fn load(&self, dir: &PostDir, with_content: bool) -> io::Result<Post> {
        let raw = match fs::read_to_string(&dir.post_path) {
            Ok(raw) => raw,
            Err(e) => return Err(io::Error::new(e.kind(), format!("Error reading post {}: {}", dir.post_path.display(), e))),
        };
        let (front_matter, body) = parse_front_matter(&dir.post_path, &raw)?;
        let date = front_matter.parsed_date(&dir.post_path)?;

        let content = if with_content {
            Some(self.renderer.render(body)?)
        } else {
            None
        };

        Ok(Post {
            slug: dir.slug.clone(),
            title: front_matter.title.unwrap_or_default(),
            date,
            excerpt: front_matter.excerpt.unwrap_or_default(),
            cover_image: front_matter.cover_image.unwrap_or_default(),
            category: front_matter.category.unwrap_or_default(),
            author: front_matter.author.unwrap_or_default(),
            featured: front_matter.featured.unwrap_or(false),
            tags: front_matter.tags.unwrap_or_default(),
            read_time: reading_time(body),
            content,
        })
    }
}

/// Newest first; undated posts go last, in their directory order.
pub fn sort_by_date_desc(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

pub fn categories_of(posts: &[Post]) -> Vec<String> {
    let categories: BTreeSet<&str> = posts.iter()
        .map(|post| post.category.as_str())
        .filter(|category| !category.is_empty())
        .collect();
    categories.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir, File};
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    fn sample_store() -> PostStore {
        PostStore::new(Path::new("res/posts"), "index.md", MarkdownRenderer::default())
    }

    fn write_post(root: &Path, dir_name: &str, content: &str) {
        let dir = root.join(dir_name);
        create_dir(&dir).unwrap();
        let mut file = File::create(dir.join("index.md")).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_list_posts_sorted_and_slugged() -> io::Result<()> {
        let store = sample_store();
        let posts = store.list_posts()?;
        assert!(posts.len() >= 3);

        for pair in posts.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }

        let dirs = PostList::new(Path::new("res/posts"), "index.md").retrieve_dirs()?;
        for dir in dirs {
            let expected = dir.dir_name[11..].to_string();
            assert!(posts.iter().any(|p| p.slug == expected), "missing slug {}", expected);
        }

        assert!(posts.iter().all(|p| p.content.is_none()));
        Ok(())
    }

    #[test]
    fn test_list_categories() -> io::Result<()> {
        let store = sample_store();
        let posts = store.list_posts()?;
        let categories = store.list_categories()?;

        let mut expected: Vec<String> = posts.iter()
            .map(|p| p.category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        expected.sort();
        expected.dedup();
        assert_eq!(categories, expected);
        Ok(())
    }

    #[test]
    fn test_categories_dedup_and_skip_empty() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "2024-01-01-a", "---\ncategory: Rust\ndate: 2024-01-01\n---\nA");
        write_post(dir.path(), "2024-01-02-b", "---\ncategory: Design\n---\nB");
        write_post(dir.path(), "2024-01-03-c", "---\ncategory: Rust\ndate: 2024-01-03\n---\nC");
        write_post(dir.path(), "2024-01-04-d", "No header at all");

        let store = PostStore::new(dir.path(), "index.md", MarkdownRenderer::default());
        assert_eq!(store.list_categories().unwrap(), ["Design", "Rust"]);

        let rust = store.list_posts_in_category("Rust").unwrap();
        let slugs: Vec<_> = rust.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["c", "a"]);
    }

    #[test]
    fn test_get_post_by_slug_not_found() {
        let store = sample_store();
        assert_eq!(store.get_post_by_slug("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_get_post_by_slug() -> io::Result<()> {
        let store = sample_store();
        let post = store.get_post_by_slug("hello-world")?.unwrap();
        assert_eq!(post.slug, "hello-world");
        assert!(!post.title.is_empty());

        let content = post.content.unwrap();
        assert!(content.contains("<table>"));
        assert!(content.contains("<del>"));
        assert!(!content.contains("title:"));
        assert!(!content.contains("coverImage"));
        Ok(())
    }

    #[test]
    fn test_asset_path() -> io::Result<()> {
        let store = sample_store();
        let path = store.asset_path("hello-world", "cover.png")?.unwrap();
        assert!(path.starts_with("res/posts"));
        assert!(path.ends_with("2024-01-10-hello-world/cover.png"));
        assert_eq!(store.asset_path("nonexistent", "cover.png")?, None);
        Ok(())
    }

    #[test]
    fn test_defaults_when_header_missing() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "2024-05-06-bare", "Four words of body");

        let store = PostStore::new(dir.path(), "index.md", MarkdownRenderer::default());
        let post = store.get_post_by_slug("bare").unwrap().unwrap();
        assert_eq!(post.title, "");
        assert_eq!(post.excerpt, "");
        assert_eq!(post.cover_image, "");
        assert_eq!(post.category, "");
        assert_eq!(post.author, "");
        assert!(!post.featured);
        assert!(post.tags.is_empty());
        assert_eq!(post.date, None);
        assert_eq!(post.read_time, "1 min read");
        assert_eq!(post.content.as_deref(), Some("<p>Four words of body</p>"));
    }

    #[test]
    fn test_undated_posts_sort_last() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "undated", "---\ntitle: Undated\n---\nx");
        write_post(dir.path(), "2023-01-01-old", "---\ndate: 2023-01-01\n---\nx");
        write_post(dir.path(), "2024-01-01-new", "---\ndate: 2024-01-01\n---\nx");

        let store = PostStore::new(dir.path(), "index.md", MarkdownRenderer::default());
        let slugs: Vec<_> = store.list_posts().unwrap().into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, ["new", "old", "undated"]);
    }

    #[test]
    fn test_missing_content_file_aborts_listing() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "2024-01-01-good", "---\ntitle: Good\n---\nx");
        create_dir(dir.path().join("2024-01-02-empty")).unwrap();

        let store = PostStore::new(dir.path(), "index.md", MarkdownRenderer::default());
        let err = store.list_posts().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("2024-01-02-empty"));
    }

    #[test]
    fn test_malformed_post_aborts_listing() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "2024-01-01-good", "---\ntitle: Good\n---\nx");
        write_post(dir.path(), "2024-01-02-bad", "---\ntitle: Bad\nno end");

        let store = PostStore::new(dir.path(), "index.md", MarkdownRenderer::default());
        assert!(store.list_posts().is_err());
    }

    #[test]
    fn test_duplicate_slug_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "2024-01-01-same", "x");
        write_post(dir.path(), "2024-02-01-same", "y");

        let store = PostStore::new(dir.path(), "index.md", MarkdownRenderer::default());
        let err = store.list_posts().unwrap_err();
        assert!(err.to_string().contains("Duplicate slug same"));
    }

    #[test]
    fn test_stray_files_and_hidden_dirs_ignored() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "2024-01-01-only", "x");
        File::create(dir.path().join(".DS_Store")).unwrap();
        create_dir(dir.path().join(".git")).unwrap();

        let store = PostStore::new(dir.path(), "index.md", MarkdownRenderer::default());
        assert_eq!(store.list_posts().unwrap().len(), 1);
    }
}
