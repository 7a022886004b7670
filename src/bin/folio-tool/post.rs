use std::fmt::Write;
use std::fs::{create_dir, File};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use folio::util::os_helper::get_name;

use crate::{PostArgs, PostOutput};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostHeader<'a> {
    title: &'a str,
    date: String,
    excerpt: &'a str,
    cover_image: &'a str,
    category: &'a str,
    author: &'a str,
    featured: bool,
    tags: Vec<String>,
}

fn get_author(args: &PostArgs) -> String {
    if let Some(ref name) = args.name {
        return name.clone();
    }

    get_name()
}

fn render_header(header: &PostHeader) -> Result<String> {
    let yaml = serde_yaml::to_string(header).context("Error writing post header")?;
    Ok(format!("---\n{}---\n\n", yaml))
}

fn render_body() -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "This is a body example");
    let _ = writeln!(&mut buf, "Please remove it and replace with your content");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "## A section");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "And this is the rest of your post");

    buf
}

/// `Post title of mine` on 2024-02-29 -> `2024-02-29-post-title-of-mine`.
fn post_dir_from_title(title: &str, date: &NaiveDate) -> String {
    let ascii = unidecode::unidecode(title).to_lowercase();

    let mut slug = String::new();
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');

    format!("{}-{}", date.format("%Y-%m-%d"), slug)
}

pub fn post_cmd(args: PostArgs) -> Result<()> {
    let author = get_author(&args);
    let now = Utc::now();

    if matches!(args.output, PostOutput::Dir) && args.title.is_none() {
        bail!("For dir output, title is required");
    }

    let title = args.title.as_deref().unwrap_or("Replace with title");
    let header = PostHeader {
        title,
        date: now.format("%Y-%m-%d").to_string(),
        excerpt: "",
        cover_image: "",
        category: args.category.as_deref().unwrap_or(""),
        author: &author,
        featured: false,
        tags: vec![],
    };
    let header = render_header(&header)?;
    let body = render_body();

    match args.output {
        PostOutput::Stdout => {
            print!("{}", header);
            print!("{}", body);
        }
        PostOutput::Dir => {
            use std::io::Write;
            let dir_name = post_dir_from_title(title, &now.date_naive());
            let full_path: PathBuf = PathBuf::from(&dir_name).join("index.md");
            println!("Creating dir post {}", full_path.display());
            create_dir(&dir_name).with_context(|| format!("Error creating directory {}", dir_name))?;
            let mut file = File::create(&full_path)
                .with_context(|| format!("Error creating {}", full_path.display()))?;
            file.write_all(header.as_bytes())?;
            file.write_all(body.as_bytes())?;
        }
    };

    Ok(())
}
