use std::fmt;
use std::rc::Rc;

/// Everything that can go wrong between loading a library and printing a
/// query's normal form.
#[derive(Debug)]
pub enum CoralError {
    /// Raised by the parser on an unexpected token or an unexpected end of
    /// line; carries the offending position so the REPL can report it.
    Syntax {
        message: String,
        file: Rc<str>,
        line: usize,
        column: usize,
    },
    /// A library file could not be opened or read.
    Io(std::io::Error),
    /// A rule's right-hand side mentions a variable that the left-hand side
    /// never bound. Source ambiguity resolved per the rewriter's design
    /// notes: this is a hard runtime failure, not a silently-preserved
    /// variable.
    UnboundVariable { name: String },
}

impl fmt::Display for CoralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoralError::Syntax {
                message,
                file,
                line,
                column,
            } => write!(f, "{} at {}:{} in '{}'", message, line, column, file),
            CoralError::Io(err) => write!(f, "{}", err),
            CoralError::UnboundVariable { name } => {
                write!(f, "unbound variable '{}' in rule right-hand side", name)
            }
        }
    }
}

impl std::error::Error for CoralError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoralError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CoralError {
    fn from(err: std::io::Error) -> Self {
        CoralError::Io(err)
    }
}
