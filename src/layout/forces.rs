use eframe::egui::Vec2;

use super::quadtree::QuadNode;
use super::{LayoutLink, LayoutNode};

#[derive(Default)]
pub(super) struct CollisionScratch {
    predicted: Vec<Vec2>,
    deltas: Vec<Vec2>,
}

/// Tiny deterministic offset used when two points share a coordinate.
fn jiggle(first: usize, second: usize) -> f32 {
    let phase = ((first as f32) * 0.618_034 + (second as f32) * 0.414_214 + 0.25).fract();
    (phase - 0.5) * 1e-6
}

/// Pulls every node toward the origin, independently per axis.
pub(super) fn apply_centering(nodes: &mut [LayoutNode], strength: f32, alpha: f32) {
    let factor = strength * alpha;
    for node in nodes {
        node.velocity -= node.position * factor;
    }
}

/// Pushes overlapping nodes apart so their centres end up at least `radii[i] + radii[j]` apart.
///
/// Works on the positions the nodes will reach after this step and splits each push by
/// squared radius, so small bubbles move more than large ones.
pub(super) fn apply_collision(
    nodes: &mut [LayoutNode],
    radii: &[f32],
    iterations: usize,
    scratch: &mut CollisionScratch,
) {
    if nodes.len() < 2 {
        return;
    }

    for _ in 0..iterations {
        scratch.predicted.clear();
        scratch
            .predicted
            .extend(nodes.iter().map(|node| node.position + node.velocity));
        scratch.deltas.clear();
        scratch.deltas.resize(nodes.len(), Vec2::ZERO);

        let Some(quadtree) = QuadNode::build(&scratch.predicted, radii) else {
            return;
        };

        accumulate_collision_pairs(
            &quadtree,
            &quadtree,
            true,
            &scratch.predicted,
            radii,
            &mut scratch.deltas,
        );

        for (node, delta) in nodes.iter_mut().zip(&scratch.deltas) {
            node.velocity += *delta;
        }
    }
}

fn resolve_pair(from: usize, to: usize, positions: &[Vec2], radii: &[f32], deltas: &mut [Vec2]) {
    let min_distance = radii[from] + radii[to];
    let mut delta = positions[from] - positions[to];
    if delta.length_sq() >= min_distance * min_distance {
        return;
    }

    if delta.x == 0.0 {
        delta.x = jiggle(from, to);
    }
    if delta.y == 0.0 {
        delta.y = jiggle(to, from);
    }
    let distance = delta.length();
    if distance <= 0.0 {
        return;
    }

    let push = delta * ((min_distance - distance) / distance);
    let from_weight = radii[from] * radii[from];
    let to_weight = radii[to] * radii[to];
    let total_weight = from_weight + to_weight;
    let from_share = if total_weight > 0.0 {
        to_weight / total_weight
    } else {
        0.5
    };

    deltas[from] += push * from_share;
    deltas[to] -= push * (1.0 - from_share);
}

fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    deltas: &mut [Vec2],
) {
    if node_a.bounds.distance_to(node_b.bounds) > node_a.max_radius + node_b.max_radius {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    resolve_pair(from, to, positions, radii, deltas);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_pair(from, to, positions, radii, deltas);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, positions, radii, deltas);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(child_a, child_b, false, positions, radii, deltas);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(child, node_b, false, positions, radii, deltas);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(node_a, child, false, positions, radii, deltas);
        }
    }
}

/// Spring toward `distance` along every link, weighted by the link strength.
///
/// `bias[k]` is the share of the correction taken by the target of link `k`; links are
/// applied one after another so later links see earlier velocity changes.
pub(super) fn apply_links(
    nodes: &mut [LayoutNode],
    links: &[LayoutLink],
    bias: &[f32],
    distance: f32,
    alpha: f32,
) {
    for (index, (link, &target_share)) in links.iter().zip(bias).enumerate() {
        let (source, target) = (link.source, link.target);
        if source == target || source >= nodes.len() || target >= nodes.len() {
            continue;
        }

        let mut delta = (nodes[target].position + nodes[target].velocity)
            - (nodes[source].position + nodes[source].velocity);
        if delta.x == 0.0 {
            delta.x = jiggle(index, source);
        }
        if delta.y == 0.0 {
            delta.y = jiggle(index, target);
        }
        let length = delta.length();
        if length <= 0.0 {
            continue;
        }

        let correction = delta * ((length - distance) / length * alpha * link.strength);
        nodes[target].velocity -= correction * target_share;
        nodes[source].velocity += correction * (1.0 - target_share);
    }
}

/// Degree-based split of each link correction: the busier endpoint moves less.
pub(super) fn link_bias(node_count: usize, links: &[LayoutLink]) -> Vec<f32> {
    let mut degree = vec![0usize; node_count];
    for link in links {
        if link.source < node_count && link.target < node_count {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }
    }

    links
        .iter()
        .map(|link| {
            let source = degree.get(link.source).copied().unwrap_or(0) as f32;
            let target = degree.get(link.target).copied().unwrap_or(0) as f32;
            if source + target > 0.0 {
                source / (source + target)
            } else {
                0.5
            }
        })
        .collect()
}
