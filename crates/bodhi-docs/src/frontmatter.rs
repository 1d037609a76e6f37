use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_\s]+").expect("valid regex"));

/// Fields read from a document's YAML front-matter. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "front-matter error at line {}: {}", self.line, self.message)
    }
}

/// Splits a document into its front-matter block and markdown body.
///
/// The block must open on the first line with `---` and close with a line holding `---`
/// or `...`. Documents without an opening fence have no front-matter.
pub fn split(content: &str) -> Result<(Option<&str>, &str), ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(first_break) = content.find('\n') else {
        return Ok(if content.trim_end() == "---" {
            (Some(""), "")
        } else {
            (None, content)
        });
    };
    if content[..first_break].trim_end() != "---" {
        return Ok((None, content));
    }

    let yaml_start = first_break + 1;
    let mut offset = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err(ParseError {
        line: 1,
        message: "unterminated front-matter block".to_string(),
    })
}

/// Parses front-matter and returns it together with the markdown body.
///
/// A field of the wrong type is dropped rather than failing the whole block; only YAML that
/// cannot be read at all, or that is not a mapping, is an error.
pub fn parse(content: &str) -> Result<(FrontMatter, &str), ParseError> {
    let (yaml, body) = split(content)?;
    let Some(yaml) = yaml else {
        return Ok((FrontMatter::default(), body));
    };
    if yaml.trim().is_empty() {
        return Ok((FrontMatter::default(), body));
    }

    let value: Value = serde_yaml::from_str(yaml).map_err(|e| ParseError {
        // +1 for the opening fence
        line: e.location().map(|l| l.line() + 1).unwrap_or(1),
        message: e.to_string(),
    })?;

    let mapping = match value {
        Value::Mapping(m) => m,
        Value::Null => return Ok((FrontMatter::default(), body)),
        _ => {
            return Err(ParseError {
                line: 2,
                message: "front-matter is not a mapping".to_string(),
            })
        }
    };

    let field = |name: &str| mapping.get(name);
    let front = FrontMatter {
        title: field("title").and_then(as_text),
        description: field("description").and_then(as_text),
        order: field("order").and_then(as_order),
    };
    Ok((front, body))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_order(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Turns a slug segment into a display title: `getting-started` becomes `Getting Started`.
pub fn humanize(segment: &str) -> String {
    SEPARATOR_RE
        .split(segment.trim())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields() {
        let content = "---\ntitle: Quick Start\ndescription: First steps\norder: 10\n---\n# Body\n";
        let (front, body) = parse(content).unwrap();
        assert_eq!(front.title.as_deref(), Some("Quick Start"));
        assert_eq!(front.description.as_deref(), Some("First steps"));
        assert_eq!(front.order, Some(10));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn no_front_matter_returns_whole_body() {
        let content = "# Just markdown\n\n---\n\nA rule above.";
        let (front, body) = parse(content).unwrap();
        assert_eq!(front, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn string_order_is_accepted_and_bad_types_dropped() {
        let content = "---\norder: \"42\"\ntitle: [not, a, title]\n---\nbody";
        let (front, _) = parse(content).unwrap();
        assert_eq!(front.order, Some(42));
        assert_eq!(front.title, None);
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let err = parse("---\ntitle: oops\n# no closing fence\n").unwrap_err();
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(parse("---\ntitle: [unclosed\n---\nbody").is_err());
    }

    #[test]
    fn scalar_front_matter_is_an_error() {
        assert!(parse("---\njust a string\n---\nbody").is_err());
    }

    #[test]
    fn empty_block_is_default() {
        let (front, body) = parse("---\n---\nbody").unwrap();
        assert_eq!(front, FrontMatter::default());
        assert_eq!(body, "body");
    }

    #[test]
    fn crlf_fences_are_recognised() {
        let (front, body) = parse("---\r\norder: 3\r\n---\r\ntext").unwrap();
        assert_eq!(front.order, Some(3));
        assert_eq!(body, "text");
    }

    #[test]
    fn humanize_segments() {
        assert_eq!(humanize("getting-started"), "Getting Started");
        assert_eq!(humanize("api_tokens"), "Api Tokens");
        assert_eq!(humanize("faq"), "Faq");
        assert_eq!(humanize("--x--"), "X");
        assert_eq!(humanize("mixed - _sep  words"), "Mixed Sep Words");
    }
}
