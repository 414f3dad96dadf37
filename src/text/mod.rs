mod cooccurrence;
mod frequency;
mod graph;
mod load;
mod tokenize;

pub use cooccurrence::AdjacencyMap;
pub use graph::{GraphParams, WordGraph, WordNode};
pub use load::{DEFAULT_TEXT, DEFAULT_TEXT_LABEL, read_text_file};
