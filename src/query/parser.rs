//! Command tokenizer and scope-flag extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Token that introduces a scope hint: `-onlyin <path>`.
pub const SCOPE_FLAG: &str = "-onlyin";

static SCOPE_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"-onlyin\s+"([^"]+)""#).expect("static regex"));

/// A backend command split into scope hint and predicate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    /// Path fragment following the scope flag, quotes removed.
    pub scope_hint: Option<String>,
    /// Everything else, single-space joined, in original order.
    pub predicate: String,
}

/// Parse a backend command.
///
/// A scope flag with no following token is kept in the predicate. When the
/// flag appears more than once, the last pair wins and every pair is removed.
pub fn parse(command: &str) -> ParsedCommand {
    let tokens = tokenize(command);

    let mut scope_hint = None;
    let mut predicate = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        if token == SCOPE_FLAG {
            if let Some(value) = iter.next() {
                let value = unquote(&value);
                scope_hint = (!value.is_empty()).then_some(value);
                continue;
            }
        }
        predicate.push(token);
    }

    ParsedCommand {
        scope_hint,
        predicate: predicate.join(" "),
    }
}

/// Pull the quoted path after the scope flag without tokenizing.
pub fn extract_scope_hint(command: &str) -> Option<String> {
    SCOPE_HINT_RE
        .captures(command)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Split on whitespace outside double quotes. Quote characters stay in the
/// token so the predicate reaches the index unchanged.
fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in command.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn unquote(token: &str) -> String {
    token.chars().filter(|&c| c != '"').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scope_pair() {
        let parsed = parse(r#"kind:pdf -onlyin "Downloads""#);
        assert_eq!(parsed.scope_hint.as_deref(), Some("Downloads"));
        assert_eq!(parsed.predicate, "kind:pdf");
    }

    #[test]
    fn test_parse_keeps_predicate_order() {
        let parsed = parse(r#"kind:image -onlyin "My Photos" date:today name:beach"#);
        assert_eq!(parsed.scope_hint.as_deref(), Some("My Photos"));
        assert_eq!(parsed.predicate, "kind:image date:today name:beach");
    }

    #[test]
    fn test_parse_without_flag() {
        let parsed = parse("kind:pdf   date:this_week");
        assert_eq!(parsed.scope_hint, None);
        assert_eq!(parsed.predicate, "kind:pdf date:this_week");
    }

    #[test]
    fn test_parse_trailing_flag_stays_in_predicate() {
        let parsed = parse("kind:pdf -onlyin");
        assert_eq!(parsed.scope_hint, None);
        assert_eq!(parsed.predicate, "kind:pdf -onlyin");
    }

    #[test]
    fn test_parse_multiple_quoted_segments() {
        let parsed = parse(r#"kMDItemDisplayName == "*annual report*" -onlyin "Work Docs""#);
        assert_eq!(parsed.scope_hint.as_deref(), Some("Work Docs"));
        assert_eq!(parsed.predicate, r#"kMDItemDisplayName == "*annual report*""#);
    }

    #[test]
    fn test_parse_unquoted_hint() {
        let parsed = parse("-onlyin Desktop kind:folder");
        assert_eq!(parsed.scope_hint.as_deref(), Some("Desktop"));
        assert_eq!(parsed.predicate, "kind:folder");
    }

    #[test]
    fn test_parse_last_flag_wins() {
        let parsed = parse(r#"-onlyin "A" kind:pdf -onlyin "B""#);
        assert_eq!(parsed.scope_hint.as_deref(), Some("B"));
        assert_eq!(parsed.predicate, "kind:pdf");
    }

    #[test]
    fn test_parse_empty_hint_is_none() {
        let parsed = parse(r#"kind:pdf -onlyin """#);
        assert_eq!(parsed.scope_hint, None);
        assert_eq!(parsed.predicate, "kind:pdf");
    }

    #[test]
    fn test_parse_empty_command() {
        assert_eq!(parse(""), ParsedCommand::default());
        assert_eq!(parse("   ").predicate, "");
    }

    #[test]
    fn test_extract_scope_hint() {
        assert_eq!(
            extract_scope_hint(r#"kind:pdf -onlyin  "Downloads/Invoices""#).as_deref(),
            Some("Downloads/Invoices")
        );
        assert_eq!(extract_scope_hint("kind:pdf -onlyin Downloads"), None);
        assert_eq!(extract_scope_hint("kind:pdf"), None);
    }
}
