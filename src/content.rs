//! Headline copy supplied by the host.
//!
//! The copy comes from an external generator as JSON. The core only ever
//! sees a record or nothing; read and parse failures stop here.

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

pub const FALLBACK_TITLE: &str = "Precision in motion";
pub const DEFAULT_SUBHEADLINE: &str = "Every frame engineered, every tooth in mesh.";
pub const DEFAULT_CTA: &str = "Enter";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
}

/// Post-reveal caption block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub subheadline: String,
    pub cta_text: String,
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// The string the sequence lays out: the headline, or the fallback title,
/// always upper case.
pub fn display_title(content: Option<&HeroContent>) -> String {
    content
        .and_then(|c| non_blank(&c.headline))
        .unwrap_or(FALLBACK_TITLE)
        .to_uppercase()
}

pub fn caption(content: Option<&HeroContent>) -> Caption {
    let subheadline = content
        .and_then(|c| non_blank(&c.subheadline))
        .unwrap_or(DEFAULT_SUBHEADLINE);
    let cta_text = content
        .and_then(|c| non_blank(&c.cta_text))
        .unwrap_or(DEFAULT_CTA);
    Caption {
        subheadline: subheadline.to_string(),
        cta_text: cta_text.to_uppercase(),
    }
}

pub fn parse(json: &str) -> Option<HeroContent> {
    match serde_json::from_str(json.trim()) {
        Ok(content) => Some(content),
        Err(e) => {
            log::warn!("ignoring malformed content ({e})");
            None
        }
    }
}

pub fn read(path: &Path) -> Option<HeroContent> {
    match std::fs::read_to_string(path) {
        Ok(json) => parse(&json),
        Err(e) => {
            log::warn!("cannot read content {} ({e})", path.display());
            None
        }
    }
}

/// Run an external generator through the shell and take its stdout as
/// content JSON. Blocks; the host runs it off the frame loop.
pub fn generate(command: &str) -> Option<HeroContent> {
    let output = match Command::new("sh").arg("-c").arg(command).output() {
        Ok(output) => output,
        Err(e) => {
            log::warn!("content generator failed to start ({e})");
            return None;
        }
    };
    if !output.status.success() {
        log::warn!("content generator exited with {}", output.status);
        return None;
    }
    parse(&String::from_utf8_lossy(&output.stdout))
}
