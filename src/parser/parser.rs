use crate::error::CoralError;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::term::{simplify, Term};

/*
The parser shares a single state machine across three entry points. Which
terms are legal, and where the term ends, depends only on which mode we're
parsing in:

  Left  - a rule's left-hand side. Must begin with an atom. Terminates at a
          top-level `=`, which is left unconsumed for the caller to skip.
  Right - a rule's right-hand side. Terminates at a top-level end of line,
          left unconsumed.
  Input - a query term typed at the prompt. Variables are not allowed here
          at all; a query is always ground. Terminates at a top-level end
          of line, left unconsumed.

A `(` pushes the current group of children onto a stack and starts a fresh
one; `)` pops back. Closing a group immediately simplifies it (collapsing a
single child, flattening an application-headed application) so that every
`Term` this parser hands back - nested or not - already satisfies both
structural invariants.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Left,
    Right,
    Input,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// True once only the guaranteed trailing `EndOfLine` remains.
    pub fn at_end(&self) -> bool {
        self.pos + 1 >= self.tokens.len()
    }

    /// Skips any run of top-level `EndOfLine` tokens (blank lines between
    /// rules in a library), stopping before the final guaranteed one.
    pub fn skip_blank_lines(&mut self) {
        while !self.at_end() && matches!(self.peek().kind, TokenKind::EndOfLine) {
            self.advance();
        }
    }

    fn unexpected(&self, tok: &Token) -> CoralError {
        let message = match tok.kind {
            TokenKind::EndOfLine => "unexpected end of line".to_string(),
            _ => format!("unexpected token '{}'", tok.lexeme),
        };
        CoralError::Syntax {
            message,
            file: tok.file.clone(),
            line: tok.line,
            column: tok.column,
        }
    }

    /// Parses one term in the given mode, leaving whatever token ended it
    /// (a top-level `=` or `EndOfLine`) unconsumed.
    pub fn parse_term(&mut self, mode: ParseMode) -> Result<Term, CoralError> {
        let mut stack: Vec<Vec<Term>> = Vec::new();
        let mut group: Vec<Term> = Vec::new();

        loop {
            let tok = self.peek().clone();
            match &tok.kind {
                TokenKind::Atom => {
                    group.push(Term::atom(tok.lexeme));
                    self.advance();
                }
                TokenKind::Variable => {
                    if mode == ParseMode::Input {
                        return Err(self.unexpected(&tok));
                    }
                    if mode == ParseMode::Left && group.is_empty() && stack.is_empty() {
                        return Err(self.unexpected(&tok));
                    }
                    group.push(Term::variable(tok.lexeme));
                    self.advance();
                }
                TokenKind::Symbol('(') => {
                    stack.push(group);
                    group = Vec::new();
                    self.advance();
                }
                TokenKind::Symbol(')') => {
                    if stack.is_empty() || group.is_empty() {
                        return Err(self.unexpected(&tok));
                    }
                    let closed = simplify(Term::Application(group));
                    group = stack.pop().expect("checked non-empty above");
                    group.push(closed);
                    self.advance();
                }
                TokenKind::Symbol('=') => {
                    if stack.is_empty() && mode == ParseMode::Left {
                        break; // leave '=' for the caller to consume
                    }
                    return Err(self.unexpected(&tok));
                }
                TokenKind::Symbol(_) => unreachable!("tokenizer never emits other symbols"),
                TokenKind::EndOfLine => {
                    if !stack.is_empty() {
                        return Err(self.unexpected(&tok));
                    }
                    if mode != ParseMode::Left {
                        break; // leave EndOfLine for the caller to consume
                    }
                    if group.is_empty() {
                        if self.at_end() {
                            // nothing left to parse; stop instead of spinning
                            // on the guaranteed trailing EndOfLine forever
                            return Err(self.unexpected(&tok));
                        }
                        self.advance(); // blank line inside a rule's lhs scan
                        continue;
                    }
                    return Err(self.unexpected(&tok));
                }
            }
        }

        if group.is_empty() {
            return Err(self.unexpected(self.peek()));
        }
        Ok(simplify(Term::Application(group)))
    }

    /// Parses one `LHS = RHS` rule, validating that the lhs has an atom
    /// head (`spec.md` §3's constraint on a Rule's left-hand side).
    pub fn parse_rule(&mut self) -> Result<(Term, Term), CoralError> {
        let head_tok = self.peek().clone();
        let lhs = self.parse_term(ParseMode::Left)?;
        if lhs.head_key().is_none() {
            return Err(CoralError::Syntax {
                message: "rule left-hand side must have an atom head".to_string(),
                file: head_tok.file,
                line: head_tok.line,
                column: head_tok.column,
            });
        }
        self.advance(); // consume '='
        let rhs = self.parse_term(ParseMode::Right)?;
        self.advance(); // consume trailing EndOfLine
        Ok((lhs, rhs))
    }
}

/// Parses a single query term from source text. Used by the REPL and tests;
/// variables are rejected anywhere in the term.
pub fn parse_input(source: &str, file: &str) -> Result<Term, CoralError> {
    let tokens = tokenize(source, file);
    let mut parser = Parser::new(tokens);
    parser.parse_term(ParseMode::Input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_mode_rejects_variables() {
        let err = parse_input("+ A 0", "<stdin>").unwrap_err();
        match err {
            CoralError::Syntax { column, .. } => assert_eq!(column, 3),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn input_mode_parses_nested_application() {
        let term = parse_input("+ (s 0) (s (s 0))", "<stdin>").unwrap();
        assert_eq!(term.to_string(), "+ (s 0) (s (s 0))");
    }

    #[test]
    fn paren_wrapped_lhs_is_equivalent_to_bare_lhs() {
        let tokens = tokenize("(+ A 0) = A\n", "math.coral");
        let mut parser = Parser::new(tokens);
        let (lhs, rhs) = parser.parse_rule().unwrap();
        assert_eq!(lhs.head_key(), Some("+"));
        assert_eq!(rhs, Term::variable("A"));
    }

    #[test]
    fn bare_variable_as_lhs_head_is_rejected() {
        let tokens = tokenize("X = a\n", "bad.coral");
        let mut parser = Parser::new(tokens);
        assert!(parser.parse_rule().is_err());
    }

    #[test]
    fn rule_with_application_lhs() {
        let tokens = tokenize("+ A 0 = A\n", "math.coral");
        let mut parser = Parser::new(tokens);
        let (lhs, rhs) = parser.parse_rule().unwrap();
        assert_eq!(
            lhs,
            Term::Application(vec![Term::atom("+"), Term::variable("A"), Term::atom("0")])
        );
        assert_eq!(rhs, Term::variable("A"));
    }
}
