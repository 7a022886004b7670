use std::io;

use ramhorns::Template;

use crate::content::{partition_featured, Post};
use crate::view::{category_link, parse_template, PostCard, SiteInfo};

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    site_title: &'a str,
    site_tagline: &'a str,
    featured: Vec<PostCard>,
    posts: Vec<PostCard>,
    has_featured: bool,
    has_posts: bool,
    categories: Vec<ViewCategory<'a>>,
    selected_category: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewCategory<'a> {
    name: &'a str,
    link: String,
    selected: bool,
}

#[derive(ramhorns::Content)]
struct IndexPage<'a> {
    site_title: &'a str,
    site_tagline: &'a str,
    author: &'a str,
    recent: Vec<PostCard>,
}

/// The blog listing: featured posts first, then the rest, with a category
/// filter bar.
pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<ListRenderer> {
        Ok(ListRenderer {
            template: parse_template(list_tpl_src, "blog list")?,
        })
    }

    pub fn render(&self, site: &SiteInfo, posts: Vec<Post>, categories: &[String], selected: Option<&str>) -> String {
        let (featured, regular) = partition_featured(posts);
        let featured: Vec<PostCard> = featured.iter().map(PostCard::from).collect();
        let posts: Vec<PostCard> = regular.iter().map(PostCard::from).collect();

        let categories = categories.iter()
            .map(|c| ViewCategory {
                name: c.as_str(),
                link: category_link(c),
                selected: selected == Some(c.as_str()),
            })
            .collect();

        self.template.render(&ListPage {
            site_title: site.title,
            site_tagline: site.tagline,
            has_featured: !featured.is_empty(),
            has_posts: !posts.is_empty(),
            featured,
            posts,
            categories,
            selected_category: selected.unwrap_or(""),
        })
    }
}

/// The home page with the most recent posts.
pub struct IndexRenderer<'a> {
    pub template: Template<'a>,
}

impl IndexRenderer<'_> {
    pub fn new(index_tpl_src: &str) -> io::Result<IndexRenderer> {
        Ok(IndexRenderer {
            template: parse_template(index_tpl_src, "index")?,
        })
    }

    pub fn render(&self, site: &SiteInfo, recent: &[Post]) -> String {
        self.template.render(&IndexPage {
            site_title: site.title,
            site_tagline: site.tagline,
            author: site.author,
            recent: recent.iter().map(PostCard::from).collect(),
        })
    }
}
