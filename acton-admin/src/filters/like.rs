//! Case-insensitive LIKE patterns built from user search terms
//!
//! User input is always treated as literal text: `%`, `_` and the escape
//! character itself are escaped before the term is wrapped in wildcards.
//! Two prefixes change how the term is anchored:
//!
//! | Term      | Pattern    | Meaning          |
//! |-----------|------------|------------------|
//! | `abc`     | `%abc%`    | contains         |
//! | `^abc`    | `abc%`     | starts with      |
//! | `=abc`    | `abc`      | equals, any case |

/// Escape character used in every generated pattern
pub const LIKE_ESCAPE: char = '\\';

/// Escape LIKE metacharacters so `term` matches only itself
#[must_use]
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Build the ILIKE pattern for a search term
///
/// ```rust
/// use acton_admin::filters::parse_like_term;
///
/// assert_eq!(parse_like_term("50%"), "%50\\%%");
/// assert_eq!(parse_like_term("^adm"), "adm%");
/// assert_eq!(parse_like_term("=root"), "root");
/// ```
#[must_use]
pub fn parse_like_term(term: &str) -> String {
    if let Some(prefix) = term.strip_prefix('^') {
        format!("{}%", escape_like(prefix))
    } else if let Some(exact) = term.strip_prefix('=') {
        escape_like(exact)
    } else {
        format!("%{}%", escape_like(term))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyMany,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            LIKE_ESCAPE => Token::Literal(chars.next().unwrap_or(LIKE_ESCAPE)),
            '%' => Token::AnyMany,
            '_' => Token::AnyOne,
            other => Token::Literal(other),
        };
        tokens.push(token);
    }
    tokens
}

/// Evaluate an escaped ILIKE pattern against `text`
///
/// Mirrors what the database does for `text ILIKE pattern ESCAPE '\'` so
/// filtered queries can be checked against in-memory records.
#[must_use]
pub fn like_matches(pattern: &str, text: &str) -> bool {
    let tokens = tokenize(&pattern.to_lowercase());
    let text: Vec<char> = text.to_lowercase().chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position after the last `%` and the text index it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(Token::AnyMany) => {
                backtrack = Some((p + 1, t));
                p += 1;
            }
            Some(Token::AnyOne) => {
                p += 1;
                t += 1;
            }
            Some(Token::Literal(c)) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((resume, absorbed)) => {
                    p = resume;
                    t = absorbed + 1;
                    backtrack = Some((resume, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    tokens[p.min(tokens.len())..]
        .iter()
        .all(|token| *token == Token::AnyMany)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_metacharacters() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let pattern = parse_like_term("ADMIN");
        assert!(like_matches(&pattern, "site administrator"));
        assert!(!like_matches(&pattern, "moderator"));
    }

    #[test]
    fn test_literal_wildcards_do_not_broaden_match() {
        let pattern = parse_like_term("50%");
        assert!(like_matches(&pattern, "save 50% today"));
        assert!(!like_matches(&pattern, "save 500 today"));

        let pattern = parse_like_term("a_c");
        assert!(like_matches(&pattern, "xa_cx"));
        assert!(!like_matches(&pattern, "abc"));
    }

    #[test]
    fn test_prefix_and_exact_terms() {
        assert!(like_matches(&parse_like_term("^adm"), "Admin"));
        assert!(!like_matches(&parse_like_term("^adm"), "sysadmin"));
        assert!(like_matches(&parse_like_term("=root"), "ROOT"));
        assert!(!like_matches(&parse_like_term("=root"), "rooted"));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        assert!(like_matches(&parse_like_term(""), ""));
        assert!(like_matches(&parse_like_term(""), "anything"));
    }

    #[test]
    fn test_raw_wildcards() {
        assert!(like_matches("a%c", "abbbc"));
        assert!(like_matches("a_c", "abc"));
        assert!(!like_matches("a_c", "abbc"));
        assert!(like_matches("%b%b%", "abcb"));
    }

    proptest! {
        #[test]
        fn prop_term_matches_text_containing_it(
            term in "[a-zA-Z0-9%_\\\\ ]{0,12}",
            before in "[a-z]{0,4}",
            after in "[a-z]{0,4}",
        ) {
            let text = format!("{before}{term}{after}");
            prop_assert!(like_matches(&parse_like_term(&term), &text));
        }

        #[test]
        fn prop_escaped_term_never_matches_shorter_text(
            term in "[a-z%_\\\\]{1,12}",
        ) {
            let shorter: String = term.chars().skip(1).collect();
            prop_assert!(!like_matches(&escape_like(&term), &shorter));
        }
    }
}
