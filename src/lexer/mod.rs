mod lexer;

pub use lexer::*;
