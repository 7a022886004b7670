use std::io;

use ramhorns::Template;

use crate::content::Post;
use crate::text_utils::format_long_date;
use crate::view::{category_link, parse_template, SiteInfo};

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    site_title: &'a str,
    slug: &'a str,
    author: &'a str,
    category: &'a str,
    category_link: String,
    has_category: bool,
    tags: &'a Vec<ViewTag<'a>>,
    date: &'a str,
    read_time: &'a str,
    cover_image: &'a str,
    post_title: &'a str,
    post_content: &'a str,
}

#[derive(ramhorns::Content)]
struct NotFound<'a> {
    site_title: &'a str,
    message: &'a str,
    back_link: &'a str,
    back_label: &'a str,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        Ok(PostRenderer {
            template: parse_template(view_tpl_src, "post view")?,
        })
    }

    pub fn render(&self, site: &SiteInfo, post: &Post) -> String {
        let tags: &Vec<ViewTag> = &post.tags.iter().map(|t| ViewTag { tag: t.as_str() }).collect();
        let date = post.date.as_ref().map(format_long_date).unwrap_or_default();
        let author = if post.author.is_empty() { site.author } else { post.author.as_str() };
        let cover_image = post.cover_image_or_placeholder();

        self.template.render(&ViewItem {
            site_title: site.title,
            slug: post.slug.as_str(),
            author,
            category: post.category.as_str(),
            category_link: category_link(&post.category),
            has_category: !post.category.is_empty(),
            tags,
            date: date.as_str(),
            read_time: post.read_time.as_str(),
            cover_image: cover_image.as_str(),
            post_title: post.title.as_str(),
            post_content: post.content.as_deref().unwrap_or_default(),
        })
    }
}

/// The page shown for unknown slugs and routes.
pub struct NotFoundRenderer<'a> {
    pub template: Template<'a>,
}

impl NotFoundRenderer<'_> {
    pub fn new(tpl_src: &str) -> io::Result<NotFoundRenderer> {
        Ok(NotFoundRenderer {
            template: parse_template(tpl_src, "not found")?,
        })
    }

    pub fn render_post_not_found(&self, site: &SiteInfo) -> String {
        self.template.render(&NotFound {
            site_title: site.title,
            message: "Post not found",
            back_link: "/blog",
            back_label: "Back to the blog",
        })
    }

    pub fn render_page_not_found(&self, site: &SiteInfo) -> String {
        self.template.render(&NotFound {
            site_title: site.title,
            message: "Page not found",
            back_link: "/",
            back_label: "Back home",
        })
    }
}
