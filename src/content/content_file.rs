use std::{fs, io};
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::content::ContentFormat;

pub struct ContentFile {
    pub file_path: PathBuf,
    pub format: ContentFormat,
    pub raw_content: String,
}

impl ContentFile {
    pub fn from_file(file_path: PathBuf) -> io::Result<ContentFile> {
        let format = match ContentFormat::guess(&file_path) {
            None => return Err(io::Error::new(ErrorKind::Unsupported, format!("Could not guess the type of the file {}", file_path.display()))),
            Some(format) => format,
        };

        let raw_content = fs::read_to_string(&file_path)?;

        Ok(ContentFile {
            file_path,
            format,
            raw_content,
        })
    }
}
