use std::{fs, io};
use std::path::{Path, PathBuf};

use spdlog::{debug, warn};

use crate::content::content_file::ContentFile;
use crate::content::ContentFormat;
use crate::post_index::SourceDocument;

pub struct PostList {
    pub root_dir: PathBuf,
}

impl PostList {
    pub fn new(root_dir: &Path) -> Self {
        PostList { root_dir: root_dir.to_path_buf() }
    }

    /// Every `.md`/`.mdx` below the root, keyed by its `/`-separated path
    /// relative to the root and returned in path order.
    pub fn retrieve_documents(&self) -> io::Result<Vec<SourceDocument>> {
        let mut files = vec![];
        Self::collect_files(&self.root_dir, &mut files)?;
        files.sort();

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            let Some(path) = self.relative_key(&file) else {
                continue;
            };
            match ContentFile::from_file(file) {
                Ok(content_file) => {
                    debug!("Loaded {} ({:?})", path, content_file.format);
                    documents.push(SourceDocument::new(path, content_file.raw_content));
                }
                Err(e) => warn!("Skipping unreadable post {}: {}", path, e),
            }
        }
        Ok(documents)
    }

    fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
        let entries = fs::read_dir(dir)?;
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            if file_type.is_dir() {
                Self::collect_files(&path, files)?;
            } else if file_type.is_file() && ContentFormat::guess(&path).is_some() {
                files.push(path);
            }
        }
        Ok(())
    }

    fn relative_key(&self, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(&self.root_dir).ok()?;
        let parts: Vec<&str> = relative.iter().filter_map(|part| part.to_str()).collect();
        if parts.is_empty() {
            return None;
        }
        Some(parts.join("/"))
    }
}
