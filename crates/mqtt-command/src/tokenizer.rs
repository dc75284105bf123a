//! Quote-aware whitespace tokenizer for `:`-command lines (spec §4.3):
//! whitespace-separated, double-quoted spans become a single token with
//! the quote characters stripped and no escape syntax.

/// Split a command's argument string into tokens.
pub(crate) fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_current = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_current = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_current {
                    tokens.push(std::mem::take(&mut current));
                    has_current = false;
                }
            }
            c => {
                current.push(c);
                has_current = true;
            }
        }
    }
    if has_current {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokenize("connect localhost:1883 alice"), vec!["connect", "localhost:1883", "alice"]);
    }

    #[test]
    fn quoted_span_is_one_token_and_quotes_are_stripped() {
        assert_eq!(tokenize(r#"setpass "hunter 2""#), vec!["setpass", "hunter 2"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn adjacent_quoted_and_bare_text_joins_into_one_token() {
        assert_eq!(tokenize(r#"foo"bar baz"qux"#), vec!["foobar bazqux"]);
    }
}
