//! Lenient parser for structured header values.
//!
//! Grammar:
//!
//! ```text
//! header    = element *( "," element )
//! element   = pair *( ";" pair )
//! pair      = name [ "=" value ]
//! value     = token / quoted-string
//! ```
//!
//! Separators inside quoted strings do not split, and `\` escapes the next
//! character inside a quoted string. The parser never fails: an element with
//! an empty name, an unterminated quoted string, or text after a closing
//! quote is dropped and parsing continues with the next element.

/// One `name[=value]` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Pair name, trimmed.
    pub name: String,
    /// Unquoted value, if an `=` was present.
    pub value: Option<String>,
}

/// A comma-delimited header element with its `;` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderElement {
    /// Element name.
    pub name: String,
    /// Element value.
    pub value: Option<String>,
    /// Trailing parameters in header order.
    pub params: Vec<Parameter>,
}

impl HeaderElement {
    /// First parameter whose name equals `name`, ignoring ASCII case.
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Whether this element is `name=value` (name ignoring ASCII case).
    pub fn is(&self, name: &str, value: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) && self.value.as_deref() == Some(value)
    }
}

/// Parse a header value into its well-formed elements.
pub fn parse_elements(header: &str) -> Vec<HeaderElement> {
    split_unquoted(header, ',')
        .into_iter()
        .filter_map(parse_element)
        .collect()
}

fn parse_element(raw: &str) -> Option<HeaderElement> {
    if raw.trim().is_empty() {
        return None;
    }
    let mut pairs = split_unquoted(raw, ';').into_iter();
    let head = parse_pair(pairs.next()?)?;
    let mut params = Vec::new();
    for pair in pairs {
        if pair.trim().is_empty() {
            continue;
        }
        params.push(parse_pair(pair)?);
    }
    Some(HeaderElement {
        name: head.name,
        value: head.value,
        params,
    })
}

fn parse_pair(raw: &str) -> Option<Parameter> {
    let parts = split_unquoted(raw, '=');
    let (name, value) = match parts.as_slice() {
        [name] => (name.trim(), None),
        [name, ..] => {
            // Everything after the first '=' belongs to the value.
            let value = raw[name.len() + 1..].trim();
            (name.trim(), Some(unquote(value)?))
        }
        [] => return None,
    };
    if name.is_empty() || name.contains(char::is_whitespace) || name.contains('"') {
        return None;
    }
    Some(Parameter {
        name: name.to_string(),
        value,
    })
}

/// Strip surrounding quotes and resolve escapes. Bare tokens pass through.
fn unquote(value: &str) -> Option<String> {
    let Some(inner) = value.strip_prefix('"') else {
        return if value.contains('"') {
            None
        } else {
            Some(value.to_string())
        };
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"' => {
                // Closing quote must end the value.
                return chars.as_str().trim().is_empty().then_some(out);
            }
            c => out.push(c),
        }
    }
    None
}

/// Split on `sep` where it occurs outside a quoted string.
fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == sep && !in_quotes => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_element_with_params() {
        let elements = parse_elements(r#"return=representation; include="urn:a urn:b""#);
        assert_eq!(elements.len(), 1);
        let e = &elements[0];
        assert!(e.is("return", "representation"));
        assert_eq!(e.param("include").unwrap().value.as_deref(), Some("urn:a urn:b"));
        assert!(e.param("omit").is_none());
    }

    #[test]
    fn test_multiple_elements() {
        let elements = parse_elements("respond-async, wait=100, handling=lenient");
        let names: Vec<_> = elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["respond-async", "wait", "handling"]);
        assert_eq!(elements[0].value, None);
        assert_eq!(elements[1].value.as_deref(), Some("100"));
    }

    #[test]
    fn test_separators_inside_quotes() {
        let elements = parse_elements(r#"a; p="x, y; z", b"#);
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].param("p").unwrap().value.as_deref(), Some("x, y; z"));
        assert_eq!(elements[1].name, "b");
    }

    #[test]
    fn test_escapes() {
        let elements = parse_elements(r#"a="say \"hi\"""#);
        assert_eq!(elements[0].value.as_deref(), Some(r#"say "hi""#));
    }

    #[test]
    fn test_param_name_case_insensitive() {
        let elements = parse_elements("return=representation; INCLUDE=x");
        assert_eq!(elements[0].param("include").unwrap().value.as_deref(), Some("x"));
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        let elements = parse_elements(r#"=novalue, good=1, bad="unterminated"#);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name, "good");

        let elements = parse_elements(r#"x="a"junk, y"#);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name, "y");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_elements("").is_empty());
        assert!(parse_elements(" , ,").is_empty());
    }
}
