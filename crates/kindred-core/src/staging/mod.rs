pub mod convert;
pub mod prepare;

pub use convert::{convert_corpus, ConvertStats};
pub use prepare::{stage_corpus, StageStats};
