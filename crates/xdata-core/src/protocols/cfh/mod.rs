//! CFH cryogenic frost-point hygrometer decoding.

pub mod layout;
pub mod parser;

pub use parser::{CfhRecord, parse_cfh};
