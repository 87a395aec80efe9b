// Labeling pipeline: records in, topic-labeled records out.

pub mod label;
