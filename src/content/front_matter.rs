use std::io;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::text_utils::parse_post_date;

const DELIMITER: &str = "---";

/// Metadata block at the top of a post. Every key is optional; a present but
/// empty key (`title:`) reads as absent.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub featured: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl FrontMatter {
    pub fn parsed_date(&self, file_name: &Path) -> io::Result<Option<NaiveDateTime>> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(date) => match parse_post_date(date) {
                Ok(d) => Ok(Some(d)),
                Err(e) => Err(io::Error::new(ErrorKind::InvalidData, format!("{} - file={}", e, file_name.display()))),
            },
        }
    }
}

/// Splits a content file into its raw YAML header and the markdown body.
/// Files that do not open with `---` have no header.
pub fn split_front_matter<'a>(file_name: &Path, raw: &'a str) -> io::Result<(Option<&'a str>, &'a str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = raw.split_inclusive('\n');

    match lines.next() {
        Some(first) if first.trim_end() == DELIMITER => {}
        _ => return Ok((None, raw)),
    }

    let header_start = raw.find('\n').map(|i| i + 1).unwrap_or(raw.len());
    let mut offset = header_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let header = &raw[header_start..offset];
            let body = &raw[offset + line.len()..];
            return Ok((Some(header), body));
        }
        offset += line.len();
    }

    Err(io::Error::new(
        ErrorKind::InvalidData,
        format!("End of front-matter block is missing - file={}", file_name.display()),
    ))
}

pub fn parse_front_matter<'a>(file_name: &Path, raw: &'a str) -> io::Result<(FrontMatter, &'a str)> {
    let (header, body) = split_front_matter(file_name, raw)?;
    let header = match header {
        None => return Ok((FrontMatter::default(), body)),
        Some(h) if h.trim().is_empty() => return Ok((FrontMatter::default(), body)),
        Some(h) => h,
    };

    match serde_yaml::from_str::<FrontMatter>(header) {
        Ok(front_matter) => Ok((front_matter, body)),
        Err(e) => Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("Invalid front-matter: {} - file={}", e, file_name.display()),
        )),
    }
}
