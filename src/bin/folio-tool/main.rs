use std::fmt::{Display, Formatter};

use anyhow::Result;
use clap::{arg, Parser, ValueEnum};

use crate::bootstrap::bootstrap_cmd;
use crate::post::post_cmd;
use crate::resume::resume_cmd;

mod bootstrap;
mod decompress;
mod post;
mod resume;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Creating post
    Post(PostArgs),
    /// Write the resume PDF to disk
    Resume(ResumeArgs),
    /// Bootstrap a new site
    Bootstrap(BootstrapArgs),
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct PostArgs {
    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long)]
    name: Option<String>,

    /// Title of the post
    #[arg(short, long)]
    title: Option<String>,

    /// Category shown on the post card
    #[arg(short, long)]
    category: Option<String>,

    /// Post generation options
    #[arg(short, long, default_value_t = PostOutput::Stdout)]
    output: PostOutput,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ResumeArgs {
    /// Resume TOML file. The built-in resume is used if empty
    #[arg(short, long)]
    source: Option<String>,

    /// Output PDF file
    #[arg(short, long, default_value = "resume.pdf")]
    out: String,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct BootstrapArgs {
    /// Directory where the new site will be generated
    #[arg(short, long)]
    out_dir: String,
}

#[derive(Clone, Debug, ValueEnum)]
enum PostOutput {
    /// Writes the new post content to the stdout
    Stdout,
    /// Writes the new post to a dated directory, ready for images
    Dir,
}

impl Display for PostOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PostOutput::Stdout => write!(f, "stdout"),
            PostOutput::Dir => write!(f, "dir"),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args {
        Args::Post(args) => post_cmd(args),
        Args::Resume(args) => resume_cmd(args),
        Args::Bootstrap(args) => bootstrap_cmd(args),
    }
}
