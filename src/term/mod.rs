mod term;

pub use term::*;
