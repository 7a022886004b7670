use chrono::NaiveDateTime;

pub mod front_matter;
pub mod markdown_renderer;
pub mod page;
pub mod post_list;
pub mod post_store;

const PLACEHOLDER_PALETTE: [&str; 6] = ["9333ea", "4f46e5", "0ea5e9", "22c55e", "f97316", "0284c7"];

/// One blog entry, derived fresh from its directory on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub date: Option<NaiveDateTime>,
    pub excerpt: String,
    pub cover_image: String,
    pub category: String,
    pub author: String,
    pub featured: bool,
    pub tags: Vec<String>,
    pub read_time: String,
    /// Rendered HTML. Only filled for the detail view.
    pub content: Option<String>,
}

impl Post {
    pub fn cover_image_or_placeholder(&self) -> String {
        if self.cover_image.is_empty() {
            placeholder_cover(&self.category)
        } else {
            self.cover_image.clone()
        }
    }
}

/// Placeholder cover keyed by category: same category, same color.
pub fn placeholder_cover(category: &str) -> String {
    let label = if category.is_empty() { "Blog" } else { category };
    let hash = label.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    let color = PLACEHOLDER_PALETTE[hash % PLACEHOLDER_PALETTE.len()];
    let text: Vec<(&str, &str)> = vec![("text", label)];
    let query = serde_urlencoded::to_string(text).unwrap_or_default();
    format!("https://placehold.co/800x450/{}/ffffff?{}", color, query)
}

pub fn partition_featured(posts: Vec<Post>) -> (Vec<Post>, Vec<Post>) {
    posts.into_iter().partition(|post| post.featured)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, category: &str, featured: bool) -> Post {
        Post {
            slug: slug.to_string(),
            title: slug.to_string(),
            date: None,
            excerpt: "".to_string(),
            cover_image: "".to_string(),
            category: category.to_string(),
            author: "".to_string(),
            featured,
            tags: vec![],
            read_time: "1 min read".to_string(),
            content: None,
        }
    }

    #[test]
    fn test_placeholder_cover() {
        let url = placeholder_cover("State Management");
        assert!(url.starts_with("https://placehold.co/800x450/"));
        assert!(url.ends_with("/ffffff?text=State+Management"));
        assert_eq!(url, placeholder_cover("State Management"));

        assert!(placeholder_cover("").ends_with("?text=Blog"));
    }

    #[test]
    fn test_cover_image_or_placeholder() {
        let mut p = post("a", "Rust", false);
        assert!(p.cover_image_or_placeholder().contains("text=Rust"));
        p.cover_image = "/images/cover.png".to_string();
        assert_eq!(p.cover_image_or_placeholder(), "/images/cover.png");
    }

    #[test]
    fn test_partition_featured_keeps_order() {
        let posts = vec![post("a", "", true), post("b", "", false), post("c", "", true)];
        let (featured, regular) = partition_featured(posts);
        let featured: Vec<_> = featured.iter().map(|p| p.slug.as_str()).collect();
        let regular: Vec<_> = regular.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(featured, ["a", "c"]);
        assert_eq!(regular, ["b"]);
    }
}
