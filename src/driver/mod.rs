mod driver;

pub use driver::*;
