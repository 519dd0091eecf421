pub mod enums;
pub mod report;

pub use report::*;
