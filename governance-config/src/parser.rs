//! Document parsers turning raw text into generic document trees.

use std::ffi::OsStr;
use std::path::Path;

use governance_primitives::{GovernanceError, GovernanceResult, SourceDocument};
use serde_json::Value;

/// Turns a raw document into a generic tree.
pub trait DocumentParser {
    /// Parses `document`.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::MalformedDocument`] when the syntax is
    /// invalid.
    fn parse(&self, document: &SourceDocument) -> GovernanceResult<Value>;
}

/// Syntax of a governance document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Plain JSON.
    Json,
    /// Plain YAML.
    Yaml,
    /// Markdown carrying YAML in front matter or a fenced `yaml` block.
    Markdown,
}

impl DocumentFormat {
    /// Picks a format from the extension of `origin`, defaulting to YAML.
    #[must_use]
    pub fn detect(origin: &str) -> Self {
        let extension = Path::new(origin)
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("md" | "markdown") => Self::Markdown,
            _ => Self::Yaml,
        }
    }
}

impl DocumentParser for DocumentFormat {
    fn parse(&self, document: &SourceDocument) -> GovernanceResult<Value> {
        let origin = document.origin();
        match self {
            Self::Json => serde_json::from_str(document.text())
                .map_err(|err| GovernanceError::malformed(origin, err)),
            Self::Yaml => parse_yaml(document.text(), origin),
            Self::Markdown => parse_yaml(embedded_yaml(document.text()), origin),
        }
    }
}

fn parse_yaml(text: &str, origin: &str) -> GovernanceResult<Value> {
    serde_yaml::from_str(text).map_err(|err| GovernanceError::malformed(origin, err))
}

/// Extracts the YAML payload of a Markdown document.
///
/// Front matter delimited by `---` lines wins, then the first fenced block
/// tagged `yaml` or `yml`; otherwise the whole text is treated as YAML.
fn embedded_yaml(text: &str) -> &str {
    front_matter(text)
        .or_else(|| fenced_block(text))
        .unwrap_or(text)
}

fn front_matter(text: &str) -> Option<&str> {
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if matches!(line.trim_end(), "---" | "...") {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    None
}

fn fenced_block(text: &str) -> Option<&str> {
    let mut start = None;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some(begin) = start {
            if trimmed == "```" {
                return Some(&text[begin..offset]);
            }
        } else if matches!(trimmed, "```yaml" | "```yml") {
            start = Some(offset + line.len());
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use governance_primitives::ErrorKind;
    use serde_json::json;

    use super::*;

    fn parse(origin: &str, text: &str) -> GovernanceResult<Value> {
        DocumentFormat::detect(origin).parse(&SourceDocument::new(origin, text))
    }

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(DocumentFormat::detect("a/b.json"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::detect("AGENTS.MD"), DocumentFormat::Markdown);
        assert_eq!(DocumentFormat::detect("sync/x.yaml"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::detect("no-extension"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::detect("hub.d/phases"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::detect("cfg.json/phases"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::detect("./records/a.JSON"), DocumentFormat::Json);
    }

    #[test]
    fn parses_yaml_into_json_tree() {
        let value = parse(
            "phases.yaml",
            "phases:\n  - name: execution\n    allowed_agents: [worker]\n",
        )
        .unwrap();
        assert_eq!(
            value,
            json!({"phases": [{"name": "execution", "allowed_agents": ["worker"]}]})
        );
    }

    #[test]
    fn markdown_front_matter() {
        let text = "---\npatterns: [batch]\nagents: []\n---\n# Agents\n\nProse.\n";
        assert_eq!(parse("AGENTS.md", text).unwrap(), json!({"patterns": ["batch"], "agents": []}));
    }

    #[test]
    fn markdown_fenced_block() {
        let text = "# Agents\n\nSome prose.\n\n```yaml\npatterns: [batch]\nagents: []\n```\n\n```yaml\nignored: true\n```\n";
        assert_eq!(parse("AGENTS.md", text).unwrap(), json!({"patterns": ["batch"], "agents": []}));
    }

    #[test]
    fn markdown_without_markers_is_plain_yaml() {
        assert_eq!(parse("AGENTS.md", "patterns: []\n").unwrap(), json!({"patterns": []}));
    }

    #[test]
    fn syntax_errors_are_malformed() {
        let err = parse("records/a.json", "{nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
        assert!(err.to_string().starts_with("records/a.json is malformed"));

        let err = parse("phases.yaml", "phases: [unclosed\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    }
}
