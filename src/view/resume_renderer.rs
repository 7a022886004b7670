use std::io;

use ramhorns::Template;

use crate::resume::Resume;
use crate::view::{parse_template, SiteInfo};

#[derive(ramhorns::Content)]
struct ViewLine<'a> {
    text: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewRole<'a> {
    role: &'a str,
    organization: &'a str,
    period: &'a str,
    highlights: Vec<ViewLine<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewResume<'a> {
    site_title: &'a str,
    name: &'a str,
    headline: &'a str,
    contacts: Vec<ViewLine<'a>>,
    summary: Vec<ViewLine<'a>>,
    experience: Vec<ViewRole<'a>>,
    download_link: &'a str,
    file_name: &'a str,
}

fn lines(items: &[String]) -> Vec<ViewLine> {
    items.iter().map(|text| ViewLine { text: text.as_str() }).collect()
}

/// HTML summary of the resume with a link to the PDF download.
pub struct ResumeRenderer<'a> {
    pub template: Template<'a>,
}

impl ResumeRenderer<'_> {
    pub fn new(resume_tpl_src: &str) -> io::Result<ResumeRenderer> {
        Ok(ResumeRenderer {
            template: parse_template(resume_tpl_src, "resume")?,
        })
    }

    pub fn render(&self, site: &SiteInfo, resume: &Resume, file_name: &str) -> String {
        let experience = resume.experience.iter()
            .map(|r| ViewRole {
                role: r.role.as_str(),
                organization: r.organization.as_str(),
                period: r.period.as_str(),
                highlights: lines(&r.highlights),
            })
            .collect();

        self.template.render(&ViewResume {
            site_title: site.title,
            name: resume.name.as_str(),
            headline: resume.headline.as_str(),
            contacts: lines(&resume.contacts),
            summary: lines(&resume.summary),
            experience,
            download_link: "/resume/download",
            file_name,
        })
    }
}
