use std::io;
use std::io::ErrorKind;

use serde::Deserialize;
use serde_yaml::Value;

const FENCE: &str = "---";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    tags: Option<Value>,
    pub author: Option<String>,
}

impl FrontMatter {
    /// Only a YAML sequence counts as tags. Scalars inside it are stringified,
    /// anything else is dropped.
    pub fn tags(&self) -> Vec<String> {
        let Some(Value::Sequence(items)) = &self.tags else {
            return vec![];
        };

        items.iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, PartialEq)]
pub struct ParsedDocument {
    pub front_matter: Option<FrontMatter>,
    pub body: String,
}

fn parse_yaml(yaml: &str) -> io::Result<FrontMatter> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    serde_yaml::from_str::<FrontMatter>(yaml)
        .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("Invalid front-matter: {}", e)))
}

/// Front-matter only opens on the very first line. A document without it is
/// all body.
pub fn parse_document(raw: &str) -> io::Result<ParsedDocument> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = raw.lines();

    match lines.next() {
        Some(line) if line.trim_end() == FENCE => {}
        _ => {
            return Ok(ParsedDocument {
                front_matter: None,
                body: raw.to_string(),
            });
        }
    }

    let mut yaml = String::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim_end() == FENCE {
            closed = true;
            break;
        }
        yaml.push_str(line);
        yaml.push('\n');
    }

    if !closed {
        return Err(io::Error::new(ErrorKind::InvalidData, "End of front-matter is missing"));
    }

    let front_matter = parse_yaml(&yaml)?;

    let mut body = String::new();
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }

    Ok(ParsedDocument {
        front_matter: Some(front_matter),
        body,
    })
}
