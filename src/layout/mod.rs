//! Incremental force layout for word bubbles.
//!
//! The model follows the usual velocity-Verlet style simulation with a cooling `alpha`:
//! each [`Simulation::step`] lowers alpha, applies the centering, collision and link forces
//! to node velocities, damps the velocities and moves the nodes. Once alpha drops below
//! its floor the simulation stops by itself.

mod forces;
mod quadtree;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::text::WordGraph;
use forces::{CollisionScratch, apply_centering, apply_collision, apply_links, link_bias};
pub use quadtree::QuadtreeCell;
use quadtree::{QuadNode, collect_quadtree_cells};

const INITIAL_RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutNode {
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutLink {
    pub source: usize,
    pub target: usize,
    pub strength: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    pub center_strength: f32,
    pub collision_margin: f32,
    pub collision_iterations: usize,
    pub link_distance: f32,
    /// Fraction of velocity kept after each step.
    pub velocity_retention: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            center_strength: 0.002,
            collision_margin: 0.5,
            collision_iterations: 2,
            link_distance: 30.0,
            velocity_retention: 0.6,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
        }
    }
}

pub struct Simulation {
    nodes: Vec<LayoutNode>,
    collision_radii: Vec<f32>,
    links: Vec<LayoutLink>,
    link_bias: Vec<f32>,
    config: LayoutConfig,
    alpha: f32,
    ticks: u64,
    stopped: bool,
    collision_scratch: CollisionScratch,
}

impl Simulation {
    /// Places `radii.len()` nodes on a phyllotaxis spiral around the origin.
    pub fn new(radii: &[f32], links: Vec<LayoutLink>, config: LayoutConfig) -> Self {
        let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
        let nodes = (0..radii.len())
            .map(|index| {
                let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
                let angle = index as f32 * golden_angle;
                LayoutNode {
                    position: vec2(radius * angle.cos(), radius * angle.sin()),
                    velocity: Vec2::ZERO,
                }
            })
            .collect::<Vec<_>>();

        let links = links
            .into_iter()
            .filter(|link| link.source < nodes.len() && link.target < nodes.len())
            .collect::<Vec<_>>();
        let link_bias = link_bias(nodes.len(), &links);
        let collision_radii = radii
            .iter()
            .map(|radius| radius.max(0.0) + config.collision_margin)
            .collect();

        Self {
            nodes,
            collision_radii,
            links,
            link_bias,
            config,
            alpha: 1.0,
            ticks: 0,
            stopped: false,
            collision_scratch: CollisionScratch::default(),
        }
    }

    pub fn from_graph(graph: &WordGraph, config: LayoutConfig) -> Self {
        let index_by_word = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.word.as_str(), index))
            .collect::<HashMap<_, _>>();

        let links = graph
            .edges
            .iter()
            .filter_map(|edge| {
                let source = *index_by_word.get(edge.source.as_str())?;
                let target = *index_by_word.get(edge.target.as_str())?;
                Some(LayoutLink {
                    source,
                    target,
                    strength: edge.strength,
                })
            })
            .collect();

        let radii = graph.nodes.iter().map(|node| node.radius).collect::<Vec<_>>();
        Self::new(&radii, links, config)
    }

    pub fn is_running(&self) -> bool {
        !self.stopped && self.alpha >= self.config.alpha_min
    }

    /// Advances one step. Returns whether the simulation is still running afterwards.
    pub fn step(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        self.alpha -= self.alpha * self.config.alpha_decay;

        apply_centering(&mut self.nodes, self.config.center_strength, self.alpha);
        apply_collision(
            &mut self.nodes,
            &self.collision_radii,
            self.config.collision_iterations,
            &mut self.collision_scratch,
        );
        apply_links(
            &mut self.nodes,
            &self.links,
            &self.link_bias,
            self.config.link_distance,
            self.alpha,
        );

        for node in &mut self.nodes {
            node.velocity *= self.config.velocity_retention;
            node.position += node.velocity;
        }
        self.ticks += 1;

        if self.alpha < self.config.alpha_min {
            debug!(ticks = self.ticks, nodes = self.nodes.len(), "layout cooled down");
        }
        self.is_running()
    }

    /// Freezes the layout; later steps do nothing.
    pub fn stop(&mut self) {
        if !self.stopped {
            debug!(ticks = self.ticks, alpha = self.alpha, "layout stopped");
        }
        self.stopped = true;
    }

    /// Reheats the layout from the current positions.
    pub fn restart(&mut self) {
        self.stopped = false;
        self.alpha = 1.0;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn quadtree_cells(&self, positions: &mut Vec<Vec2>, cells: &mut Vec<QuadtreeCell>) {
        positions.clear();
        positions.extend(self.nodes.iter().map(|node| node.position));

        cells.clear();
        let Some(quadtree) = QuadNode::build(positions, &self.collision_radii) else {
            return;
        };

        collect_quadtree_cells(&quadtree, 0, cells);
    }
}

/// Index of the node whose centre is nearest to `point`, if it lies within `radius`.
pub fn nearest_within(nodes: &[LayoutNode], point: Vec2, radius: f32) -> Option<usize> {
    let radius_sq = radius * radius;
    nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (index, (node.position - point).length_sq()))
        .filter(|(_, distance_sq)| *distance_sq < radius_sq)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
