pub mod annotation;
pub mod detect;
pub mod diagram;
pub mod errors;
pub mod extract;
pub mod language;
pub mod mcp;
pub mod merge;
pub mod options;
pub mod patterns;
pub mod scanner;
pub mod workflow;

pub use detect::auto_detect;
pub use extract::extract;
pub use merge::merge;
