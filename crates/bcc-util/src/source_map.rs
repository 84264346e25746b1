//! Loaded source files, indexed by [`FileId`].

use std::path::{Path, PathBuf};

use crate::{FileId, IndexVec};

pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    /// Byte offset of the start of each line, for O(log n) line lookup.
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(path: PathBuf, content: String) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        SourceFile {
            path,
            content,
            line_starts,
        }
    }

    /// 1-based line number containing byte offset `pos`.
    pub fn line_at(&self, pos: u32) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(i) => i as u32 + 1,
            Err(i) => i as u32,
        }
    }

    /// 1-based column at byte offset `pos`.
    pub fn column_at(&self, pos: u32) -> u32 {
        let line = self.line_at(pos);
        let line_start = self.line_starts[(line - 1) as usize];
        pos - line_start + 1
    }

    /// The text of 1-based line `line`, without its trailing newline.
    pub fn line_text(&self, line: u32) -> &str {
        let idx = (line - 1) as usize;
        let start = self.line_starts[idx] as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&e| e as usize)
            .unwrap_or(self.content.len());
        self.content[start..end].trim_end_matches(['\n', '\r'])
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}

#[derive(Default)]
pub struct SourceMap {
    files: IndexVec<FileId, SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        SourceMap {
            files: IndexVec::new(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: String) -> FileId {
        self.files.push(SourceFile::new(path.into(), content))
    }

    pub fn get(&self, id: FileId) -> &SourceFile {
        self.files.get(id).expect("FileId from a different SourceMap")
    }

    pub fn path(&self, id: FileId) -> &Path {
        &self.get(id).path
    }
}
