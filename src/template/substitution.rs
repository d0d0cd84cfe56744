//! Placeholder scanning and substitution for template strings.
//!
//! A placeholder token is `{name}` where `name` is one or more ASCII
//! alphanumeric or underscore characters. `{{` and `}}` are escapes for
//! literal braces. Any other brace sequence is treated as literal text.

use std::collections::HashMap;

use super::types::{TemplateError, TemplateResult};

/// Parse a placeholder token starting at byte offset `open` (which must
/// point at a `{`). Returns the token name and the offset just past the
/// closing `}`, or None when the sequence is not a valid token.
fn token_at(pattern: &str, open: usize) -> Option<(&str, usize)> {
    let rest = &pattern[open + 1..];
    let close = rest.find('}')?;
    let name = &rest[..close];
    if !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        Some((name, open + 1 + close + 1))
    } else {
        None
    }
}

/// Enumerate the placeholder tokens in a pattern, in order of first
/// appearance, without duplicates
pub fn scan_placeholders(pattern: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let bytes = pattern.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => i += 2,
            b'{' => match token_at(pattern, i) {
                Some((name, next)) => {
                    if !found.iter().any(|n| n == name) {
                        found.push(name.to_string());
                    }
                    i = next;
                }
                None => i += 1,
            },
            b'}' if bytes.get(i + 1) == Some(&b'}') => i += 2,
            _ => i += 1,
        }
    }

    found
}

/// Substitute every placeholder token in `pattern` with the matching value.
///
/// Values are inserted verbatim (no escaping, no coercion). Fails with
/// `MissingVariable` on the first token without a supplied value; extra
/// variables are silently ignored.
pub fn substitute(
    template_id: &str,
    pattern: &str,
    variables: &HashMap<String, String>,
) -> TemplateResult<String> {
    let mut out = String::with_capacity(pattern.len());
    let bytes = pattern.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        // Copy the literal run up to the next brace. Braces are ASCII, so a
        // byte scan never splits a multi-byte character.
        let next_brace = pattern[i..]
            .find(['{', '}'])
            .map(|offset| i + offset)
            .unwrap_or(bytes.len());
        out.push_str(&pattern[i..next_brace]);
        i = next_brace;

        if i >= bytes.len() {
            break;
        }

        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                out.push('{');
                i += 2;
            }
            b'{' => match token_at(pattern, i) {
                Some((name, next)) => {
                    match variables.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            return Err(TemplateError::MissingVariable {
                                template: template_id.to_string(),
                                variable: name.to_string(),
                            })
                        }
                    }
                    i = next;
                }
                None => {
                    out.push('{');
                    i += 1;
                }
            },
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                out.push('}');
                i += 2;
            }
            _ => {
                out.push('}');
                i += 1;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_simple() {
        let result = substitute("t", "Olá, {nome}!", &vars(&[("nome", "Ana")])).unwrap();
        assert_eq!(result, "Olá, Ana!");
    }

    #[test]
    fn test_substitute_repeated_token() {
        let result = substitute(
            "t",
            "{nome}, seu ensaio {nome}",
            &vars(&[("nome", "Ana")]),
        )
        .unwrap();
        assert_eq!(result, "Ana, seu ensaio Ana");
    }

    #[test]
    fn test_substitute_missing_variable() {
        let err = substitute("welcome", "Olá, {nome}!", &vars(&[])).unwrap_err();
        match err {
            TemplateError::MissingVariable { template, variable } => {
                assert_eq!(template, "welcome");
                assert_eq!(variable, "nome");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_substitute_extra_variables_ignored() {
        let result = substitute(
            "t",
            "Oi, {nome}",
            &vars(&[("nome", "Ana"), ("sobra", "x")]),
        )
        .unwrap();
        assert_eq!(result, "Oi, Ana");
    }

    #[test]
    fn test_substitute_verbatim_value() {
        // Values are opaque strings; no HTML escaping
        let result = substitute("t", "{v}", &vars(&[("v", "<b>&</b>")])).unwrap();
        assert_eq!(result, "<b>&</b>");
    }

    #[test]
    fn test_escaped_braces() {
        let result = substitute("t", "{{literal}} e {nome}", &vars(&[("nome", "Ana")])).unwrap();
        assert_eq!(result, "{literal} e Ana");
    }

    #[test]
    fn test_non_token_braces_are_literal() {
        let result = substitute("t", "css { color: red }", &vars(&[])).unwrap();
        assert_eq!(result, "css { color: red }");
    }

    #[test]
    fn test_scan_placeholders() {
        let tokens = scan_placeholders("Oi {nome}, {desconto}% até {data_limite} ({nome})");
        assert_eq!(tokens, vec!["nome", "desconto", "data_limite"]);
    }

    #[test]
    fn test_scan_skips_escapes_and_invalid() {
        let tokens = scan_placeholders("{{x}} {not a token} {ok_1}");
        assert_eq!(tokens, vec!["ok_1"]);
    }
}
