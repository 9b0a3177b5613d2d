//! Dataset domain classification from headers and a row sample.

mod classifier;
mod vocabulary;

pub use classifier::{Classification, DatasetClassifier, DomainScore};
pub use vocabulary::{DOMAINS, DatasetCategory, DomainVocabulary};
