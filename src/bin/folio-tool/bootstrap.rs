use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use crate::decompress::decompress_files;
use crate::BootstrapArgs;

const SAMPLE_CFG: &str = include_str!("../../../folio.toml");

fn write_folio_cfg(out_dir: &Path) -> Result<()> {
    let cfg_path = out_dir.join("folio.toml");
    let file = File::create(&cfg_path).with_context(|| format!("Error creating {}", cfg_path.display()))?;
    let mut writer = BufWriter::new(file);

    let sample_cfg = replace_paths(out_dir, SAMPLE_CFG);
    writer.write_all(sample_cfg.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Points every `res/<dir>` path of the sample config at `prefix`.
fn replace_paths(prefix: &Path, config_data: &str) -> String {
    lazy_static! {
        static ref RES_REGEX: Regex = Regex::new(r#""res/(\w+(?:\.\w+)?)""#).unwrap();
    }

    let prefix = prefix.to_string_lossy();
    let prefix = prefix.trim_end_matches('/');
    RES_REGEX.replace_all(config_data, |captures: &regex::Captures| {
        format!("\"{}/{}\"", prefix, &captures[1])
    }).to_string()
}

pub fn bootstrap_cmd(args: BootstrapArgs) -> Result<()> {
    let out_path = fs::canonicalize(&args.out_dir)
        .with_context(|| format!("Error converting path to absolute: {}", args.out_dir))?;

    if !out_path.is_dir() {
        bail!("Output path must be a directory: {}", out_path.display());
    }

    decompress_files(&out_path).context("Error bootstrapping")?;
    write_folio_cfg(&out_path).context("Error writing Folio configuration")?;

    println!("Site created in {}", out_path.display());
    println!("Run: folio --config-path {}", out_path.join("folio.toml").display());
    Ok(())
}
