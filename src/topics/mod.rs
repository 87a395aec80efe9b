// Topic modeling: tokenization, lexical features, vectors, and clustering.

pub mod features;
pub mod kmeans;
pub mod similarity;
pub mod summary;
pub mod tokenize;
pub mod traits;
pub mod vocabulary;
