use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use roster_extract::PageContent;
use serde_json::Value;
use tracing::debug;

/// Every `*.json` page document in `dir`, sorted by file name.
pub fn list_page_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Load one page document.
///
/// Bytes that are not valid UTF-8 are decoded as Latin-1. The URL comes from
/// the `url` field, else from the percent-encoded file name. The text comes
/// from the first non-empty of `body_text`, `markdown_content`, `content`,
/// then the joined values of `sections`.
pub fn read_page(path: &Path) -> Result<PageContent> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let raw = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            debug!(file = %path.display(), "not utf-8, decoding as latin-1");
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    };
    let doc: Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let source_file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let url = match str_field(&doc, "url") {
        Some(url) => url.to_string(),
        None => url_from_file_name(&source_file),
    };

    let body_text = ["body_text", "markdown_content", "content"]
        .iter()
        .find_map(|k| str_field(&doc, k))
        .map(str::to_string)
        .or_else(|| doc.get("sections").map(join_sections))
        .unwrap_or_default();

    Ok(PageContent {
        url,
        body_text,
        title: str_field(&doc, "title").map(str::to_string),
        source_file,
    })
}

fn str_field<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    doc.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn url_from_file_name(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".json").unwrap_or(file_name);
    urlencoding::decode(stem)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| stem.to_string())
}

fn join_sections(sections: &Value) -> String {
    match sections {
        Value::Object(map) => map.values().map(scalar_text).collect::<Vec<_>>().join(" "),
        Value::Array(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join(" "),
        other => scalar_text(other),
    }
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── Tests ──
