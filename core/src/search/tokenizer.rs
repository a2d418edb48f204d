use std::fmt;

use tracing::debug;

const OPERATORS: [Operator; 2] = [Operator::And, Operator::Or];
const WHITESPACE: [char; 2] = [' ', '\t'];

/// Binary operator joining two sub-queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
        }
    }
}

/// Which store filter a search string is matched with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    #[default]
    Fulltext,
    Folder,
    Tag,
}

impl SearchType {
    const ALL: [SearchType; 3] = [SearchType::Fulltext, SearchType::Folder, SearchType::Tag];

    pub fn prefix(self) -> &'static str {
        match self {
            SearchType::Fulltext => "fulltext:",
            SearchType::Folder => "folder:",
            SearchType::Tag => "tag:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    SearchString(String),
    /// `(` or a quote character
    Opening(char),
    Closing(char),
    Operator(Operator),
    SearchType(SearchType),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::SearchString(s) => write!(f, "SEARCH_STRING {:?}", s),
            Token::Opening(c) => write!(f, "OPENING {}", c),
            Token::Closing(c) => write!(f, "CLOSING {}", c),
            Token::Operator(op) => write!(f, "OPERATOR {}", op.as_str()),
            Token::SearchType(t) => write!(f, "SEARCH_TYPE {}", t.prefix()),
        }
    }
}

/// Splits a query into tokens.
///
/// Never fails: unbalanced or oddly nested input produces whatever tokens a
/// left-to-right scan finds, and the AST builder decides validity.
///
/// Once a search string has started, everything up to the next awaited
/// closing character belongs to it, including spaces and the words `and`
/// and `or`. Operators are only recognised between groups, e.g.
/// `(a) and "b"`. They are matched as prefixes, so a leading bare word such
/// as `order` splits into `or` + `der`.
pub fn tokenize(query: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut awaiting: Vec<char> = Vec::new();
    let mut inside_string = false;
    let mut current = String::new();
    let mut rest = query;

    fn commit(tokens: &mut Vec<Token>, current: &mut String, inside_string: &mut bool) {
        if *inside_string {
            *inside_string = false;
            if !current.is_empty() {
                tokens.push(Token::SearchString(std::mem::take(current)));
            }
        }
    }

    while let Some(c) = rest.chars().next() {
        if awaiting.last() == Some(&c) {
            commit(&mut tokens, &mut current, &mut inside_string);
            awaiting.pop();
            tokens.push(Token::Closing(c));
            rest = &rest[c.len_utf8()..];
            continue;
        }

        if !inside_string {
            if WHITESPACE.contains(&c) {
                rest = &rest[c.len_utf8()..];
                continue;
            }

            if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(op.as_str())) {
                tokens.push(Token::Operator(*op));
                rest = &rest[op.as_str().len()..];
                continue;
            }

            match c {
                '(' => {
                    awaiting.push(')');
                    tokens.push(Token::Opening(c));
                    rest = &rest[1..];
                    continue;
                }
                '"' | '\'' => {
                    inside_string = true;
                    awaiting.push(c);
                    tokens.push(Token::Opening(c));
                    rest = &rest[1..];
                    continue;
                }
                _ => {}
            }

            if let Some(t) = SearchType::ALL.iter().find(|t| rest.starts_with(t.prefix())) {
                tokens.push(Token::SearchType(*t));
                rest = &rest[t.prefix().len()..];
                continue;
            }
        }

        current.push(c);
        rest = &rest[c.len_utf8()..];
        inside_string = true;
    }
    commit(&mut tokens, &mut current, &mut inside_string);

    debug!(
        query,
        tokens = %tokens.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
        "Tokenized search query"
    );
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn s(text: &str) -> Token {
        Token::SearchString(text.to_string())
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(tokenize("  hello world "), vec![s("hello world ")]);
    }

    #[test]
    fn test_operators_between_groups() {
        assert_eq!(
            tokenize(r#"(a) and "b c" or 'd'"#),
            vec![
                Token::Opening('('),
                s("a"),
                Token::Closing(')'),
                Token::Operator(Operator::And),
                Token::Opening('"'),
                s("b c"),
                Token::Closing('"'),
                Token::Operator(Operator::Or),
                Token::Opening('\''),
                s("d"),
                Token::Closing('\''),
            ]
        );
    }

    #[test]
    fn test_operator_words_inside_string() {
        assert_eq!(tokenize("cats and dogs"), vec![s("cats and dogs")]);
        assert_eq!(
            tokenize("\"x and y\""),
            vec![Token::Opening('"'), s("x and y"), Token::Closing('"')]
        );
    }

    #[test]
    fn test_leading_operator_prefix() {
        assert_eq!(
            tokenize("order"),
            vec![Token::Operator(Operator::Or), s("der")]
        );
    }

    #[test]
    fn test_search_types() {
        assert_eq!(
            tokenize("folder:(inbox) and tag:x"),
            vec![
                Token::SearchType(SearchType::Folder),
                Token::Opening('('),
                s("inbox"),
                Token::Closing(')'),
                Token::Operator(Operator::And),
                Token::SearchType(SearchType::Tag),
                s("x"),
            ]
        );
        assert_eq!(
            tokenize("fulltext:folder: x"),
            vec![
                Token::SearchType(SearchType::Fulltext),
                Token::SearchType(SearchType::Folder),
                s("x"),
            ]
        );
    }

    #[test]
    fn test_nesting_and_special_chars_in_quotes() {
        assert_eq!(
            tokenize(r#"(("a(b"))"#),
            vec![
                Token::Opening('('),
                Token::Opening('('),
                Token::Opening('"'),
                s("a(b"),
                Token::Closing('"'),
                Token::Closing(')'),
                Token::Closing(')'),
            ]
        );
    }

    #[test]
    fn test_unbalanced_input_is_best_effort() {
        assert_eq!(tokenize("(abc"), vec![Token::Opening('('), s("abc")]);
        assert_eq!(tokenize("abc)"), vec![s("abc)")]);
        assert!(tokenize("").is_empty());
    }
}
