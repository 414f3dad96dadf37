use eframe::egui::Vec2;

use crate::layout::{LayoutNode, nearest_within};
use crate::text::{AdjacencyMap, WordNode};

pub(super) const MAX_RELATED_TIER: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum VisualState {
    Plain,
    Selected,
    Related(u8),
}

impl VisualState {
    pub(super) fn class_name(self) -> String {
        match self {
            Self::Plain => "plain".to_owned(),
            Self::Selected => "selected".to_owned(),
            Self::Related(tier) => format!("related{tier}"),
        }
    }
}

/// Styling tier for a relation seen `count` times.
pub(super) fn related_tier(count: usize) -> u8 {
    ((count as f64).sqrt().round() as u8).min(MAX_RELATED_TIER)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(super) struct HoverState {
    pub(super) hovered: Option<usize>,
    /// One entry per node, in node order.
    pub(super) states: Vec<VisualState>,
}

impl HoverState {
    pub(super) fn state(&self, index: usize) -> VisualState {
        self.states.get(index).copied().unwrap_or(VisualState::Plain)
    }

    pub(super) fn has_highlight(&self) -> bool {
        self.hovered.is_some()
    }
}

/// Classifies every node against the bubble nearest to `pointer` within `hit_radius`.
///
/// Only the hovered word's outgoing relations count: a word that merely precedes the
/// hovered word stays plain.
pub(super) fn classify(
    pointer: Option<Vec2>,
    words: &[WordNode],
    layout: &[LayoutNode],
    adjacency: &AdjacencyMap,
    hit_radius: f32,
) -> HoverState {
    let hovered = pointer
        .and_then(|point| nearest_within(layout, point, hit_radius))
        .filter(|&index| index < words.len());

    let followers = hovered.and_then(|index| adjacency.get(&words[index].word));
    let states = words
        .iter()
        .enumerate()
        .map(|(index, node)| {
            if hovered == Some(index) {
                return VisualState::Selected;
            }
            followers
                .and_then(|followers| followers.count(&node.word))
                .map(|count| VisualState::Related(related_tier(count)))
                .unwrap_or(VisualState::Plain)
        })
        .collect();

    HoverState { hovered, states }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::text::{GraphParams, WordGraph};

    fn graph() -> WordGraph {
        WordGraph::build(
            "a b a b a c",
            GraphParams {
                word_limit: 3,
                related_words_limit: 5,
                scale: 10.0,
            },
        )
    }

    fn spread_layout(count: usize) -> Vec<LayoutNode> {
        (0..count)
            .map(|index| LayoutNode {
                position: vec2(index as f32 * 100.0, 0.0),
                velocity: Vec2::ZERO,
            })
            .collect()
    }

    #[test]
    fn tiers_follow_rounded_square_root() {
        assert_eq!(related_tier(1), 1);
        assert_eq!(related_tier(2), 1);
        assert_eq!(related_tier(3), 2);
        assert_eq!(related_tier(9), 3);
        assert_eq!(related_tier(64), 8);
        assert_eq!(related_tier(10_000), 8);
    }

    #[test]
    fn class_names_match_styles() {
        assert_eq!(VisualState::Plain.class_name(), "plain");
        assert_eq!(VisualState::Selected.class_name(), "selected");
        assert_eq!(VisualState::Related(3).class_name(), "related3");
    }

    #[test]
    fn hovering_marks_selected_and_outgoing_relations() {
        let graph = graph();
        let layout = spread_layout(graph.nodes.len());
        let a = graph.node_index("a").expect("a");
        let b = graph.node_index("b").expect("b");
        let c = graph.node_index("c").expect("c");

        let hover = classify(
            Some(layout[a].position + vec2(3.0, 4.0)),
            &graph.nodes,
            &layout,
            &graph.adjacency,
            40.0,
        );

        assert_eq!(hover.hovered, Some(a));
        assert_eq!(hover.state(a), VisualState::Selected);
        assert_eq!(hover.state(b), VisualState::Related(1));
        assert_eq!(hover.state(c), VisualState::Related(1));
    }

    #[test]
    fn incoming_only_relations_stay_plain() {
        let graph = graph();
        let layout = spread_layout(graph.nodes.len());
        let b = graph.node_index("b").expect("b");
        let c = graph.node_index("c").expect("c");

        let hover = classify(
            Some(layout[b].position),
            &graph.nodes,
            &layout,
            &graph.adjacency,
            40.0,
        );

        assert_eq!(hover.state(b), VisualState::Selected);
        assert_eq!(hover.state(c), VisualState::Plain);
    }

    #[test]
    fn word_without_followers_leaves_others_plain() {
        let graph = graph();
        let layout = spread_layout(graph.nodes.len());
        let c = graph.node_index("c").expect("c");

        let hover = classify(
            Some(layout[c].position),
            &graph.nodes,
            &layout,
            &graph.adjacency,
            40.0,
        );

        assert_eq!(hover.hovered, Some(c));
        for (index, state) in hover.states.iter().enumerate() {
            if index == c {
                assert_eq!(*state, VisualState::Selected);
            } else {
                assert_eq!(*state, VisualState::Plain);
            }
        }
    }

    #[test]
    fn pointer_outside_hit_radius_hovers_nothing() {
        let graph = graph();
        let layout = spread_layout(graph.nodes.len());

        let hover = classify(
            Some(vec2(50.0, 500.0)),
            &graph.nodes,
            &layout,
            &graph.adjacency,
            40.0,
        );
        assert!(!hover.has_highlight());
        assert!(hover.states.iter().all(|state| *state == VisualState::Plain));

        let away = classify(None, &graph.nodes, &layout, &graph.adjacency, 40.0);
        assert_eq!(away.hovered, None);
    }
}
