use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use folio::resume::document::render_resume_pdf;
use folio::resume::Resume;

use crate::ResumeArgs;

pub fn resume_cmd(args: ResumeArgs) -> Result<()> {
    let source = args.source.map(PathBuf::from);
    let resume = Resume::load_or_builtin(source.as_deref())?;

    let pdf = render_resume_pdf(&resume).context("Error generating resume PDF")?;
    fs::write(&args.out, &pdf).with_context(|| format!("Error writing {}", args.out))?;

    println!("Resume for {} written to {} ({} bytes)", resume.name, args.out, pdf.len());
    Ok(())
}
