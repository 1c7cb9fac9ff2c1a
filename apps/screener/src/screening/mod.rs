// Resume screening: extract text → embed and score → match keywords → rank.
// `pipeline::analyze` is the shared entry point; `handlers` adapts it to the form
// page and to the JSON API behind the live page.

pub mod document;
pub mod embedder;
pub mod error;
pub mod export;
pub mod extractor;
pub mod handlers;
pub mod keywords;
pub mod pages;
pub mod pipeline;
pub mod ranker;
pub mod scorer;
pub mod similarity;
