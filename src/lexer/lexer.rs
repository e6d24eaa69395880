use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Characters that separate words but carry no meaning of their own.
static WHITESPACE: Lazy<HashSet<char>> = Lazy::new(|| [' ', '\n', '\t'].into_iter().collect());

/// Characters that are always their own one-character token.
static SYMBOLS: Lazy<HashSet<char>> = Lazy::new(|| ['(', ')', '='].into_iter().collect());

fn is_non_word(c: char) -> bool {
    WHITESPACE.contains(&c) || SYMBOLS.contains(&c) || c == '#'
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Atom,
    Variable,
    Symbol(char),
    EndOfLine,
}

/// A single lexical unit, tagged with where in the source it came from so
/// parse errors can point back at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub file: Rc<str>,
    /// 1-based.
    pub line: usize,
    /// 1-based.
    pub column: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: String, file: Rc<str>, line0: usize, column0: usize) -> Self {
        Token {
            kind,
            lexeme,
            file,
            line: line0 + 1,
            column: column0 + 1,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

/// Tokenizes an entire source text, attributing every token to `file` for
/// diagnostics. Always ends with a final `EndOfLine`, even for empty input.
///
/// This cannot fail: a malformed term is a parser-level concern, not a
/// tokenizer-level one (`spec.md` §4.1).
pub fn tokenize(source: &str, file: &str) -> Vec<Token> {
    let file: Rc<str> = Rc::from(file);
    let mut tokens = Vec::new();
    let mut line_no = 0usize;

    for line in source.lines() {
        let chars: Vec<char> = line.chars().collect();
        let mut col = 0usize;

        loop {
            while col < chars.len() && WHITESPACE.contains(&chars[col]) {
                col += 1;
            }

            if col < chars.len() && chars[col] == '#' {
                col = chars.len();
            }

            if col == chars.len() {
                tokens.push(Token::new(
                    TokenKind::EndOfLine,
                    "\n".to_string(),
                    file.clone(),
                    line_no,
                    col,
                ));
                break;
            }

            if SYMBOLS.contains(&chars[col]) {
                let ch = chars[col];
                tokens.push(Token::new(
                    TokenKind::Symbol(ch),
                    ch.to_string(),
                    file.clone(),
                    line_no,
                    col,
                ));
                col += 1;
                continue;
            }

            let start = col;
            while col < chars.len() && !is_non_word(chars[col]) {
                col += 1;
            }
            let word: String = chars[start..col].iter().collect();
            let kind = match word.chars().next() {
                Some(c) if c.is_uppercase() => TokenKind::Variable,
                _ => TokenKind::Atom,
            };
            log::trace!(
                "token {:?} '{}' at {}:{}",
                kind,
                word,
                line_no + 1,
                start + 1
            );
            tokens.push(Token::new(kind, word, file.clone(), line_no, start));
        }

        line_no += 1;
    }

    tokens.push(Token::new(
        TokenKind::EndOfLine,
        "\n".to_string(),
        file,
        line_no,
        0,
    ));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn comment_and_blank_line_produce_only_end_of_line() {
        let tokens = tokenize("# just a comment\n\n", "t.coral");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::EndOfLine,
                TokenKind::EndOfLine,
                TokenKind::EndOfLine
            ]
        );
    }

    #[test]
    fn rule_line_tokenizes_atoms_symbols_and_variables() {
        let tokens = tokenize("+ A 0 = A\n", "math.coral");
        let kinds = kinds(&tokens);
        assert_eq!(
            kinds,
            vec![
                TokenKind::Atom,
                TokenKind::Variable,
                TokenKind::Atom,
                TokenKind::Symbol('='),
                TokenKind::Variable,
                TokenKind::EndOfLine,
                TokenKind::EndOfLine,
            ]
        );
        assert_eq!(tokens[0].lexeme, "+");
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[1].column, 3);
    }

    #[test]
    fn parens_are_symbols() {
        let tokens = tokenize("(s (s 0))\n", "t.coral");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Symbol('('),
                TokenKind::Atom,
                TokenKind::Symbol('('),
                TokenKind::Atom,
                TokenKind::Atom,
                TokenKind::Symbol(')'),
                TokenKind::Symbol(')'),
                TokenKind::EndOfLine,
                TokenKind::EndOfLine,
            ]
        );
    }
}
