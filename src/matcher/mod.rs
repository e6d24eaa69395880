mod matcher;

pub use matcher::*;
