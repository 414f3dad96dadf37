use std::sync::Arc;

use eframe::egui::Vec2;
use tracing::{debug, info};

use crate::layout::{LayoutConfig, Simulation};
use crate::text::{GraphParams, WordGraph};

use super::highlight::{HoverState, classify};

#[derive(Clone, Debug, PartialEq)]
pub(super) struct TextSource {
    pub(super) label: String,
    pub(super) text: Arc<str>,
}

impl TextSource {
    pub(super) fn new(label: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Owns the one live (text, params) -> graph -> simulation chain.
///
/// A rebuild always halts the running simulation before the replacement is published, so a
/// stale layout can never step against a newer graph.
pub(super) struct PipelineState {
    source: TextSource,
    params: GraphParams,
    graph: Arc<WordGraph>,
    simulation: Simulation,
    generation: u64,
}

impl PipelineState {
    pub(super) fn new(source: TextSource, params: GraphParams) -> Self {
        let graph = Arc::new(WordGraph::build(&source.text, params));
        let simulation = Simulation::from_graph(&graph, LayoutConfig::default());
        let state = Self {
            source,
            params,
            graph,
            simulation,
            generation: 1,
        };
        state.log_published();
        state
    }

    pub(super) fn source(&self) -> &TextSource {
        &self.source
    }

    pub(super) fn params(&self) -> GraphParams {
        self.params
    }

    pub(super) fn graph(&self) -> &Arc<WordGraph> {
        &self.graph
    }

    pub(super) fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub(super) fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the document. Returns whether a rebuild happened.
    ///
    /// Reloading the same label and text keeps the current graph and layout, since a rebuild
    /// would produce the same graph and only restart the layout.
    pub(super) fn set_source(&mut self, source: TextSource) -> bool {
        if self.source == source {
            return false;
        }
        self.source = source;
        self.rebuild();
        true
    }

    /// Applies new parameters. Returns whether a rebuild happened.
    pub(super) fn set_params(&mut self, params: GraphParams) -> bool {
        if self.params == params {
            return false;
        }
        self.params = params;
        self.rebuild();
        true
    }

    pub(super) fn rebuild(&mut self) {
        self.simulation.stop();

        let graph = Arc::new(WordGraph::build(&self.source.text, self.params));
        self.simulation = Simulation::from_graph(&graph, LayoutConfig::default());
        self.graph = graph;
        self.generation = self.generation.wrapping_add(1);
        self.log_published();
    }

    /// Steps the live simulation once. Returns whether it is still running.
    pub(super) fn tick(&mut self) -> bool {
        self.simulation.step()
    }

    pub(super) fn reheat(&mut self) {
        debug!(generation = self.generation, "reheating layout");
        self.simulation.restart();
    }

    pub(super) fn classify(&self, pointer: Option<Vec2>, hit_radius: f32) -> HoverState {
        classify(
            pointer,
            &self.graph.nodes,
            self.simulation.nodes(),
            &self.graph.adjacency,
            hit_radius,
        )
    }

    fn log_published(&self) {
        let linked_pairs = self.graph.edges.iter().map(|edge| edge.count).sum::<usize>();
        info!(
            generation = self.generation,
            source = %self.source.label,
            tokens = self.graph.token_count,
            distinct = self.graph.distinct_words,
            nodes = self.graph.nodes.len(),
            edges = self.graph.edges.len(),
            linked_pairs,
            word_limit = self.params.word_limit,
            related_words_limit = self.params.related_words_limit,
            scale = self.params.scale,
            "published word graph"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::highlight::VisualState;

    const TEXT: &str = "the cat sat on the mat and the cat ran to the hat";

    fn params(word_limit: usize) -> GraphParams {
        GraphParams {
            word_limit,
            related_words_limit: 2,
            scale: 8.0,
        }
    }

    #[test]
    fn new_state_publishes_first_generation() {
        let state = PipelineState::new(TextSource::new("test", TEXT), params(4));
        assert_eq!(state.generation(), 1);
        assert_eq!(state.graph().nodes.len(), 4);
        assert_eq!(state.simulation().nodes().len(), 4);
        assert!(state.simulation().is_running());
    }

    #[test]
    fn parameter_change_rebuilds_with_fresh_simulation() {
        let mut state = PipelineState::new(TextSource::new("test", TEXT), params(4));
        for _ in 0..25 {
            state.tick();
        }
        assert_eq!(state.simulation().ticks(), 25);

        assert!(state.set_params(params(6)));
        assert_eq!(state.generation(), 2);
        assert_eq!(state.graph().nodes.len(), 6);
        assert_eq!(state.simulation().nodes().len(), 6);
        assert_eq!(state.simulation().ticks(), 0);
        assert_eq!(state.simulation().alpha(), 1.0);

        assert!(state.tick());
        assert_eq!(state.simulation().ticks(), 1);
    }

    #[test]
    fn unchanged_parameters_do_not_rebuild() {
        let mut state = PipelineState::new(TextSource::new("test", TEXT), params(4));
        let before = Arc::clone(state.graph());
        assert!(!state.set_params(params(4)));
        assert_eq!(state.generation(), 1);
        assert!(Arc::ptr_eq(&before, state.graph()));
    }

    #[test]
    fn rebuild_replaces_graph_instead_of_mutating_it() {
        let mut state = PipelineState::new(TextSource::new("test", TEXT), params(4));
        let old_graph = Arc::clone(state.graph());

        assert!(state.set_source(TextSource::new("other", "alpha beta alpha")));
        assert_eq!(old_graph.nodes.len(), 4);
        assert_eq!(state.graph().nodes.len(), 2);
        assert_eq!(state.source().label, "other");
        assert_eq!(state.generation(), 2);
    }

    #[test]
    fn reloading_same_document_keeps_layout() {
        let mut state = PipelineState::new(TextSource::new("test", TEXT), params(4));
        for _ in 0..10 {
            state.tick();
        }

        assert!(!state.set_source(TextSource::new("test", TEXT)));
        assert_eq!(state.generation(), 1);
        assert_eq!(state.simulation().ticks(), 10);

        assert!(state.set_source(TextSource::new("renamed", TEXT)));
        assert_eq!(state.generation(), 2);
    }

    #[test]
    fn identical_inputs_give_identical_graph_inputs() {
        let first = PipelineState::new(TextSource::new("test", TEXT), params(5));
        let second = PipelineState::new(TextSource::new("test", TEXT), params(5));
        assert_eq!(first.graph().nodes, second.graph().nodes);
        assert_eq!(first.graph().edges, second.graph().edges);
    }

    #[test]
    fn zero_word_limit_clears_scene() {
        let mut state = PipelineState::new(TextSource::new("test", TEXT), params(4));
        state.set_params(params(0));
        assert!(state.graph().is_empty());
        assert!(state.graph().edges.is_empty());
        assert!(state.simulation().nodes().is_empty());
        assert_eq!(state.classify(Some(Vec2::ZERO), 40.0), HoverState::default());
    }

    #[test]
    fn classify_uses_live_positions() {
        let mut state = PipelineState::new(TextSource::new("test", TEXT), params(4));
        for _ in 0..50 {
            state.tick();
        }

        let the = state.graph().node_index("the").expect("the is a top word");
        let position = state.simulation().nodes()[the].position;
        let hover = state.classify(Some(position), 1.0);
        assert_eq!(hover.hovered, Some(the));
        assert_eq!(hover.state(the), VisualState::Selected);
    }

    #[test]
    fn reheat_restarts_cooled_layout() {
        let mut state = PipelineState::new(TextSource::new("test", TEXT), params(3));
        while state.tick() {}
        assert!(!state.simulation().is_running());

        state.reheat();
        assert!(state.simulation().is_running());
        assert_eq!(state.generation(), 1);
    }
}
