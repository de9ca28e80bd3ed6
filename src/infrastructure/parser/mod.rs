pub mod parser;

pub use parser::MintDetailExtractor;
