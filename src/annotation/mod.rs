//! PUT annotation recognition: multi-line joining, tokenizing, and
//! advisory validation.

mod joiner;
mod parser;
mod validator;

pub use joiner::{collect_annotations, RawAnnotation};
pub use parser::parse_annotation;
pub use validator::validate_annotation;
