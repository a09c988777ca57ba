use crate::app::error::{DumpError, Result};
use crate::app::models::{Block, FileEntry};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const FENCE: &str = "```";

pub struct OutputGenerator;

impl OutputGenerator {
    /// Reads one file and builds its block.
    pub fn format_file(
        path: &Path,
        root: &Path,
        language_map: &BTreeMap<String, String>,
    ) -> Result<Block> {
        let entry = FileEntry::new(path.to_path_buf(), root);
        let language = language_map
            .get(&entry.extension())
            .cloned()
            .unwrap_or_default();

        let raw = fs::read_to_string(&entry.path).map_err(|source| DumpError::Read {
            path: entry.path.clone(),
            source,
        })?;

        Ok(Block {
            relative_path: entry.relative_path,
            language,
            content: normalize_content(&raw),
        })
    }

    /// Renders and joins blocks, one newline between each.
    pub fn generate_content(blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(Block::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Block {
    /// Header, opening fence, content, closing fence, then an empty line.
    pub fn render(&self) -> String {
        [
            format!("// File: {}", self.relative_path),
            format!("{FENCE}{}", self.language),
            self.content.clone(),
            FENCE.to_string(),
            String::new(),
        ]
        .join("\n")
    }
}

/// CRLF becomes LF, then a single trailing newline is dropped.
pub fn normalize_content(raw: &str) -> String {
    let mut body = raw.replace("\r\n", "\n");
    if body.ends_with('\n') {
        body.pop();
    }
    body
}
