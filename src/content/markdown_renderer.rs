use std::io;
use std::io::ErrorKind;

use markdown::{CompileOptions, Options, ParseOptions};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawHtml {
    /// Embedded HTML is written verbatim. Content authors are trusted.
    PassThrough,
    Escape,
}

impl From<bool> for RawHtml {
    fn from(allow: bool) -> Self {
        if allow { RawHtml::PassThrough } else { RawHtml::Escape }
    }
}

pub struct MarkdownRenderer {
    raw_html: RawHtml,
}

impl MarkdownRenderer {
    pub fn new(raw_html: RawHtml) -> Self {
        MarkdownRenderer { raw_html }
    }

    fn options(&self) -> Options {
        let trusted = self.raw_html == RawHtml::PassThrough;
        Options {
            parse: ParseOptions::gfm(),
            compile: CompileOptions {
                allow_dangerous_html: trusted,
                allow_dangerous_protocol: trusted,
                ..CompileOptions::gfm()
            },
        }
    }

    /// GFM dialect: tables, strikethrough, task lists, autolinks and footnotes.
    pub fn render(&self, md_text: &str) -> io::Result<String> {
        match markdown::to_html_with_options(md_text, &self.options()) {
            Ok(x) => Ok(x),
            Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        MarkdownRenderer::new(RawHtml::PassThrough)
    }
}
