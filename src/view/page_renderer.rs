use std::io;

use ramhorns::Template;

use crate::content::page::Page;
use crate::view::{parse_template, SiteInfo};

#[derive(ramhorns::Content)]
struct ViewPage<'a> {
    site_title: &'a str,
    name: &'a str,
    page_title: &'a str,
    page_content: &'a str,
}

pub struct PageRenderer<'a> {
    pub template: Template<'a>,
}

impl PageRenderer<'_> {
    pub fn new(page_tpl_src: &str) -> io::Result<PageRenderer> {
        Ok(PageRenderer {
            template: parse_template(page_tpl_src, "page")?,
        })
    }

    pub fn render(&self, site: &SiteInfo, page: &Page) -> String {
        self.template.render(&ViewPage {
            site_title: site.title,
            name: page.name.as_str(),
            page_title: page.title.as_str(),
            page_content: page.content.as_str(),
        })
    }
}
