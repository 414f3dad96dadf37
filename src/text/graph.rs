use serde::Deserialize;

use super::cooccurrence::{AdjacencyMap, extract_adjacency};
use super::frequency::{TopWordSet, count_words, top_n};
use super::tokenize::tokenize;

/// The three user-tunable inputs of a rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphParams {
    pub word_limit: usize,
    pub related_words_limit: usize,
    pub scale: f32,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            word_limit: 120,
            related_words_limit: 3,
            scale: 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WordNode {
    pub word: String,
    pub count: usize,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WordEdge {
    pub source: String,
    pub target: String,
    pub count: usize,
    pub strength: f32,
}

/// One node per top word, sized `scale * ln(count)`. A word seen once gets radius 0.
pub fn build_nodes(top: &TopWordSet, scale: f32) -> Vec<WordNode> {
    top.iter()
        .map(|(word, count)| WordNode {
            word: word.to_owned(),
            count,
            radius: scale * (count as f32).ln(),
        })
        .collect()
}

pub fn build_edges(adjacency: &AdjacencyMap) -> Vec<WordEdge> {
    adjacency
        .iter()
        .flat_map(|(source, followers)| {
            followers.iter().map(move |(target, count)| WordEdge {
                source: source.clone(),
                target: target.to_owned(),
                count,
                strength: count as f32 / 1000.0,
            })
        })
        .collect()
}

/// Immutable snapshot of everything derived from one (text, params) pair.
#[derive(Clone, Debug, Default)]
pub struct WordGraph {
    pub token_count: usize,
    pub distinct_words: usize,
    pub nodes: Vec<WordNode>,
    pub edges: Vec<WordEdge>,
    pub adjacency: AdjacencyMap,
}

impl WordGraph {
    pub fn build(text: &str, params: GraphParams) -> Self {
        let words = tokenize(text);
        let frequencies = count_words(&words);
        let top = top_n(&frequencies, params.word_limit);
        let adjacency = extract_adjacency(&words, &top, params.related_words_limit);

        Self {
            token_count: words.len(),
            distinct_words: frequencies.len(),
            nodes: build_nodes(&top, params.scale),
            edges: build_edges(&adjacency),
            adjacency,
        }
    }

    pub fn node_index(&self, word: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.word == word)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "It is a truth universally acknowledged, that a single man in \
        possession of a good fortune, must be in want of a wife. However little known the \
        feelings or views of such a man may be on his first entering a neighbourhood, this \
        truth is so well fixed in the minds of the surrounding families.";

    fn params(word_limit: usize, related_words_limit: usize, scale: f32) -> GraphParams {
        GraphParams {
            word_limit,
            related_words_limit,
            scale,
        }
    }

    #[test]
    fn small_scenario_builds_expected_graph() {
        let graph = WordGraph::build("a b a b a c", params(3, 1, 10.0));

        let words = graph
            .nodes
            .iter()
            .map(|node| (node.word.as_str(), node.count))
            .collect::<Vec<_>>();
        assert_eq!(words, vec![("a", 3), ("b", 2), ("c", 1)]);

        let edges = graph
            .edges
            .iter()
            .map(|edge| (edge.source.as_str(), edge.target.as_str(), edge.count))
            .collect::<Vec<_>>();
        assert_eq!(edges, vec![("a", "b", 2), ("b", "a", 2)]);
        assert!((graph.edges[0].strength - 0.002).abs() < 1e-9);
    }

    #[test]
    fn radius_is_scaled_natural_log() {
        let graph = WordGraph::build("a b a b a c", params(3, 1, 10.0));
        let radius_of = |word: &str| graph.nodes[graph.node_index(word).expect("node")].radius;

        assert!((radius_of("a") - 10.0 * 3.0_f32.ln()).abs() < 1e-5);
        assert!((radius_of("b") - 10.0 * 2.0_f32.ln()).abs() < 1e-5);
        assert_eq!(radius_of("c"), 0.0);
    }

    #[test]
    fn edges_only_reference_nodes() {
        let graph = WordGraph::build(SAMPLE, params(8, 4, 5.0));
        for edge in &graph.edges {
            assert!(graph.node_index(&edge.source).is_some());
            assert!(graph.node_index(&edge.target).is_some());
        }
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let first = WordGraph::build(SAMPLE, params(10, 3, 6.0));
        let second = WordGraph::build(SAMPLE, params(10, 3, 6.0));
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.edges, second.edges);
    }

    #[test]
    fn zero_word_limit_yields_empty_graph() {
        let graph = WordGraph::build(SAMPLE, params(0, 3, 6.0));
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn zero_related_limit_yields_no_edges() {
        let graph = WordGraph::build(SAMPLE, params(10, 0, 6.0));
        assert_eq!(graph.nodes.len(), 10);
        assert!(graph.edges.is_empty());
        assert!(graph.adjacency.is_empty());
    }

    #[test]
    fn short_text_keeps_everything_available() {
        let graph = WordGraph::build("one two two", params(50, 3, 1.0));
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.token_count, 3);
        assert_eq!(graph.distinct_words, 2);
    }

    #[test]
    fn empty_text_is_not_an_error() {
        let graph = WordGraph::build("", GraphParams::default());
        assert!(graph.is_empty());
        assert_eq!(graph.token_count, 0);
    }
}
