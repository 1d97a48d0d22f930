use std::path::Path;

pub mod content_file;
pub mod front_matter;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ContentFormat {
    Markdown,
    Mdx,
}

impl ContentFormat {
    pub fn guess(file_name: &Path) -> Option<ContentFormat> {
        match file_name.extension().and_then(|ext| ext.to_str()) {
            Some("md") => Some(ContentFormat::Markdown),
            Some("mdx") => Some(ContentFormat::Mdx),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_guess_format() {
        assert_eq!(ContentFormat::guess(&PathBuf::from("posts/a/b.md")), Some(ContentFormat::Markdown));
        assert_eq!(ContentFormat::guess(&PathBuf::from("posts/a/2025-11-28-b.mdx")), Some(ContentFormat::Mdx));
        assert_eq!(ContentFormat::guess(&PathBuf::from("posts/a/b.html")), None);
        assert_eq!(ContentFormat::guess(&PathBuf::from("posts/a/README")), None);
    }
}
