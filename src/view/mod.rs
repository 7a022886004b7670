use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::content::Post;
use crate::text_utils::{format_date_time, format_long_date};

pub mod contact_renderer;
pub mod list_renderer;
pub mod page_renderer;
pub mod post_renderer;
pub mod resume_renderer;

pub(crate) fn parse_template<'a>(src: &'a str, what: &str) -> io::Result<Template<'a>> {
    match Template::new(src) {
        Ok(template) => Ok(template),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} template: {}", what, e))),
    }
}

/// The blog listing filtered to `category`.
pub(crate) fn category_link(category: &str) -> String {
    let query = serde_urlencoded::to_string([("category", category)]).unwrap_or_default();
    format!("/blog?{}", query)
}

/// Header values shared by every page.
#[derive(Debug, Clone, Copy)]
pub struct SiteInfo<'a> {
    pub title: &'a str,
    pub tagline: &'a str,
    pub author: &'a str,
}

/// A post as it appears in listings.
#[derive(ramhorns::Content)]
pub(crate) struct PostCard {
    link: String,
    title: String,
    excerpt: String,
    cover_image: String,
    category: String,
    date: String,
    datetime: String,
    read_time: String,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        PostCard {
            link: format!("/blog/{}/", post.slug),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            cover_image: post.cover_image_or_placeholder(),
            category: post.category.clone(),
            date: post.date.as_ref().map(format_long_date).unwrap_or_default(),
            datetime: post.date.as_ref().map(|d| format_date_time(d).0).unwrap_or_default(),
            read_time: post.read_time.clone(),
        }
    }
}
