//! XMLTV output
//!
//! The guide is rendered in one pass into a string with every text and
//! attribute value escaped by quick-xml, then written to a temporary file
//! next to the destination and renamed over it. A failed run never leaves a
//! truncated guide behind.

use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::models::{Channel, GuideDocument, LocalizedText, Program};
use crate::utils::time::{format_xmltv_time, XMLTV_DATE_FORMAT};

/// Persists a finished guide
pub trait GuideWriter: Send + Sync {
    fn write(&self, document: &GuideDocument) -> AppResult<()>;

    /// Human-readable destination for logs and run summaries
    fn destination(&self) -> String;
}

/// Writes XMLTV to a file, replacing it atomically
#[derive(Debug, Clone)]
pub struct XmltvFileWriter {
    path: PathBuf,
}

impl XmltvFileWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn output_error<E: std::fmt::Display>(&self, error: E) -> AppError {
        AppError::output(self.path.display().to_string(), error.to_string())
    }
}

impl GuideWriter for XmltvFileWriter {
    fn write(&self, document: &GuideDocument) -> AppResult<()> {
        let content = render_xmltv(document);

        let directory = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = tempfile::NamedTempFile::new_in(directory).map_err(|e| self.output_error(e))?;
        temp.write_all(content.as_bytes())
            .and_then(|_| temp.flush())
            .map_err(|e| self.output_error(e))?;
        debug!(
            "Wrote {} bytes to temporary file {}",
            content.len(),
            temp.path().display()
        );

        temp.persist(&self.path).map_err(|e| self.output_error(e.error))?;
        info!("Saved XMLTV guide to {}", self.path.display());
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

/// Render a guide document as an XMLTV string
pub fn render_xmltv(document: &GuideDocument) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<!DOCTYPE tv SYSTEM \"xmltv.dtd\">\n");
    let _ = writeln!(
        out,
        "<tv date=\"{}\" generator-info-name=\"{}\">",
        document.generated_at.format(XMLTV_DATE_FORMAT),
        escape(document.generator_name.as_str())
    );

    for channel in &document.channels {
        write_channel(&mut out, channel);
    }
    for program in &document.programs {
        write_program(&mut out, program);
    }

    out.push_str("</tv>\n");
    out
}

fn write_channel(out: &mut String, channel: &Channel) {
    let _ = writeln!(out, "  <channel id=\"{}\">", escape(channel.id.as_str()));
    for name in &channel.display_names {
        write_text(out, "display-name", name);
    }
    if let Some(icon) = &channel.icon {
        let _ = writeln!(out, "    <icon src=\"{}\"/>", escape(icon.as_str()));
    }
    out.push_str("  </channel>\n");
}

fn write_program(out: &mut String, program: &Program) {
    let _ = write!(out, "  <programme start=\"{}\"", format_xmltv_time(&program.start));
    if let Some(stop) = &program.stop {
        let _ = write!(out, " stop=\"{}\"", format_xmltv_time(stop));
    }
    let _ = writeln!(out, " channel=\"{}\">", escape(program.channel.as_str()));

    for title in &program.titles {
        write_text(out, "title", title);
    }
    for sub_title in &program.sub_titles {
        write_text(out, "sub-title", sub_title);
    }
    for description in &program.descriptions {
        write_text(out, "desc", description);
    }
    if let Some(credits) = program.credits.as_ref().filter(|c| !c.is_empty()) {
        out.push_str("    <credits>\n");
        for director in &credits.directors {
            let _ = writeln!(out, "      <director>{}</director>", escape(director.as_str()));
        }
        for actor in &credits.actors {
            let _ = writeln!(out, "      <actor>{}</actor>", escape(actor.as_str()));
        }
        out.push_str("    </credits>\n");
    }
    if let Some(date) = &program.date {
        let _ = writeln!(out, "    <date>{}</date>", escape(date.as_str()));
    }
    for icon in &program.icons {
        let _ = writeln!(out, "    <icon src=\"{}\"/>", escape(icon.as_str()));
    }
    for episode in &program.episode_nums {
        let _ = writeln!(
            out,
            "    <episode-num system=\"{}\">{}</episode-num>",
            escape(episode.system.as_str()),
            escape(episode.value.as_str())
        );
    }

    out.push_str("  </programme>\n");
}

fn write_text(out: &mut String, element: &str, text: &LocalizedText) {
    let _ = match &text.lang {
        Some(lang) => writeln!(
            out,
            "    <{element} lang=\"{}\">{}</{element}>",
            escape(lang.as_str()),
            escape(text.value.as_str())
        ),
        None => writeln!(out, "    <{element}>{}</{element}>", escape(text.value.as_str())),
    };
}
