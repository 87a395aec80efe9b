// Lightopic: lightweight lexical topic clustering for short posts.
//
// This is the library root. Each module corresponds to a stage or concern
// of the labeling pipeline.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod topics;
