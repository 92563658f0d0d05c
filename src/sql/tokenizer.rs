//! Quote- and parenthesis-aware scanner for WHERE bodies. Splits on top-level AND/OR only.

use crate::model::Connector;

/// Scanner position relative to quotes and parentheses. Quote states remember the
/// parenthesis depth to resume once the quote closes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Normal,
    InParens(usize),
    InSingleQuote { depth: usize },
    InDoubleQuote { depth: usize },
}

impl ScanState {
    fn at_depth(depth: usize) -> ScanState {
        if depth == 0 {
            ScanState::Normal
        } else {
            ScanState::InParens(depth)
        }
    }

    pub fn depth(&self) -> usize {
        match *self {
            ScanState::Normal => 0,
            ScanState::InParens(d) => d,
            ScanState::InSingleQuote { depth } | ScanState::InDoubleQuote { depth } => depth,
        }
    }

    /// Connectors are only recognized here.
    pub fn is_top_level(&self) -> bool {
        matches!(self, ScanState::Normal)
    }

    /// State after consuming `c`. `escaped` is true when the preceding character was a backslash;
    /// an escaped quote neither opens nor closes a string.
    pub fn advance(self, c: char, escaped: bool) -> ScanState {
        match self {
            ScanState::InSingleQuote { depth } if c == '\'' && !escaped => ScanState::at_depth(depth),
            ScanState::InDoubleQuote { depth } if c == '"' && !escaped => ScanState::at_depth(depth),
            ScanState::InSingleQuote { .. } | ScanState::InDoubleQuote { .. } => self,
            ScanState::Normal | ScanState::InParens(_) => {
                let depth = self.depth();
                match c {
                    '\'' if !escaped => ScanState::InSingleQuote { depth },
                    '"' if !escaped => ScanState::InDoubleQuote { depth },
                    '(' => ScanState::InParens(depth + 1),
                    ')' => ScanState::at_depth(depth.saturating_sub(1)),
                    _ => self,
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Condition text between connectors, trimmed, parentheses retained.
    Fragment(String),
    Connector(Connector),
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Connector keyword starting at byte `pos`, followed by one whitespace character.
/// Returns the connector and how many characters it spans, trailing whitespace included.
fn connector_at(body: &str, pos: usize, prev: Option<char>) -> Option<(Connector, usize)> {
    if prev.is_some_and(is_identifier_char) {
        return None;
    }
    let rest = &body[pos..];
    for (keyword, connector) in [("AND", Connector::And), ("OR", Connector::Or)] {
        let Some(head) = rest.get(..keyword.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(keyword) {
            continue;
        }
        // head is ASCII, so keyword.len() is a char boundary
        if rest[keyword.len()..].chars().next().is_some_and(char::is_whitespace) {
            return Some((connector, keyword.len() + 1));
        }
    }
    None
}

fn flush(current: &mut String, tokens: &mut Vec<Token>) {
    let fragment = current.trim();
    if !fragment.is_empty() {
        tokens.push(Token::Fragment(fragment.to_string()));
    }
    current.clear();
}

/// Left-to-right scan of a WHERE body into fragments and connectors.
pub fn tokenize(body: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = body.char_indices().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut state = ScanState::Normal;
    let mut prev: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if state.is_top_level() {
            if let Some((connector, span)) = connector_at(body, pos, prev) {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Connector(connector));
                i += span;
                prev = Some(' ');
                continue;
            }
        }
        state = state.advance(c, prev == Some('\\'));
        current.push(c);
        prev = Some(c);
        i += 1;
    }
    flush(&mut current, &mut tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(s: &str) -> Token {
        Token::Fragment(s.to_string())
    }

    #[test]
    fn state_machine_tracks_quotes_inside_parens() {
        let mut state = ScanState::Normal;
        for c in "(a = '(".chars() {
            state = state.advance(c, false);
        }
        assert_eq!(state, ScanState::InSingleQuote { depth: 1 });
        state = state.advance('\'', false);
        assert_eq!(state, ScanState::InParens(1));
        state = state.advance(')', false);
        assert_eq!(state, ScanState::Normal);
    }

    #[test]
    fn escaped_quote_does_not_close() {
        let state = ScanState::InSingleQuote { depth: 0 }.advance('\'', true);
        assert_eq!(state, ScanState::InSingleQuote { depth: 0 });
        let state = ScanState::InDoubleQuote { depth: 0 }.advance('\'', false);
        assert_eq!(state, ScanState::InDoubleQuote { depth: 0 });
    }

    #[test]
    fn stray_close_paren_stays_top_level() {
        assert_eq!(ScanState::Normal.advance(')', false), ScanState::Normal);
    }

    #[test]
    fn splits_on_top_level_connectors() {
        assert_eq!(
            tokenize("x = #{x} AND y = #{y} OR z = 1"),
            vec![
                frag("x = #{x}"),
                Token::Connector(Connector::And),
                frag("y = #{y}"),
                Token::Connector(Connector::Or),
                frag("z = 1"),
            ]
        );
    }

    #[test]
    fn nested_and_quoted_connectors_are_not_split() {
        assert_eq!(
            tokenize("(a = 1 OR b = 2) and name = 'x AND y'"),
            vec![
                frag("(a = 1 OR b = 2)"),
                Token::Connector(Connector::And),
                frag("name = 'x AND y'"),
            ]
        );
    }

    #[test]
    fn keywords_inside_identifiers_are_not_connectors() {
        assert_eq!(
            tokenize("brand = 1 AND color = 2"),
            vec![frag("brand = 1"), Token::Connector(Connector::And), frag("color = 2")]
        );
    }

    #[test]
    fn newline_after_connector_counts_as_whitespace() {
        assert_eq!(
            tokenize("a = 1 AND\nb = 2"),
            vec![frag("a = 1"), Token::Connector(Connector::And), frag("b = 2")]
        );
    }
}
