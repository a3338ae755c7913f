//! Annotated column type strings
//!
//! Inline schema objects describe each column as a single string such as
//! `VARCHAR(50) COMMENT 'Customer legal name'`. The grammar is deliberately
//! small: a type expression, then optionally the case-sensitive `COMMENT`
//! token and a single-quoted literal that runs to the end of the string.
//! Inside the literal `''` stands for one quote. Anything else (lone quotes,
//! trailing text, line breaks inside the comment) is not an annotation, and
//! the whole string is taken as the type.

use regex::Regex;
use std::sync::OnceLock;

const ANNOTATION_PATTERN: &str = r"^(.+?)\s+COMMENT\s+'((?:[^'\n]|'')+)'$";

/// Result of parsing one annotated type string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnnotation {
    /// Trimmed type expression
    pub data_type: String,

    /// Comment text with `''` unescaped
    pub business_meaning: Option<String>,
}

/// Parser for `<type> COMMENT '<text>'` strings
#[derive(Debug, Clone)]
pub struct AnnotationParser {
    pattern: Regex,
}

impl AnnotationParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(ANNOTATION_PATTERN).expect("annotation pattern is a valid regex"),
        }
    }

    /// Split a raw type string into type and business meaning.
    ///
    /// Never fails: a string without a well-formed comment clause is returned
    /// as a bare (trimmed) type.
    pub fn parse(&self, raw: &str) -> ParsedAnnotation {
        match self.pattern.captures(raw) {
            Some(caps) => ParsedAnnotation {
                data_type: caps[1].trim().to_string(),
                business_meaning: Some(caps[2].replace("''", "'")),
            },
            None => ParsedAnnotation {
                data_type: raw.trim().to_string(),
                business_meaning: None,
            },
        }
    }
}

impl Default for AnnotationParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse with a shared parser instance
pub fn parse_annotation(raw: &str) -> ParsedAnnotation {
    static PARSER: OnceLock<AnnotationParser> = OnceLock::new();
    PARSER.get_or_init(AnnotationParser::new).parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(data_type: &str, meaning: Option<&str>) -> ParsedAnnotation {
        ParsedAnnotation {
            data_type: data_type.to_string(),
            business_meaning: meaning.map(str::to_string),
        }
    }

    #[test]
    fn type_with_comment() {
        assert_eq!(
            parse_annotation("VARCHAR(50) COMMENT 'Customer legal name'"),
            parsed("VARCHAR(50)", Some("Customer legal name"))
        );
    }

    #[test]
    fn doubled_quotes_are_unescaped() {
        assert_eq!(
            parse_annotation("STRING COMMENT 'Joe''s Diner'"),
            parsed("STRING", Some("Joe's Diner"))
        );
    }

    #[test]
    fn bare_type_is_trimmed() {
        assert_eq!(parse_annotation("  DECIMAL(18,2) "), parsed("DECIMAL(18,2)", None));
    }

    #[test]
    fn comment_token_is_case_sensitive() {
        assert_eq!(
            parse_annotation("STRING comment 'lower'"),
            parsed("STRING comment 'lower'", None)
        );
    }

    #[test]
    fn unclosed_comment_falls_back() {
        assert_eq!(
            parse_annotation("STRING COMMENT 'open"),
            parsed("STRING COMMENT 'open", None)
        );
    }

    #[test]
    fn lone_quote_inside_comment_falls_back() {
        assert_eq!(
            parse_annotation("STRING COMMENT 'Joe's'"),
            parsed("STRING COMMENT 'Joe's'", None)
        );
    }

    #[test]
    fn empty_comment_falls_back() {
        assert_eq!(parse_annotation("INT COMMENT ''"), parsed("INT COMMENT ''", None));
    }

    #[test]
    fn type_expression_may_contain_spaces() {
        assert_eq!(
            parse_annotation("TIMESTAMP WITH TIME ZONE COMMENT 'Load time'"),
            parsed("TIMESTAMP WITH TIME ZONE", Some("Load time"))
        );
    }

    #[test]
    fn only_the_last_clause_is_the_comment() {
        assert_eq!(
            parse_annotation("STRING COMMENT 'a' COMMENT 'b'"),
            parsed("STRING COMMENT 'a'", Some("b"))
        );
    }

    #[test]
    fn multi_line_comment_falls_back() {
        let raw = "STRING COMMENT 'line one\nline two'";
        assert_eq!(parse_annotation(raw), parsed(raw, None));
    }
}
