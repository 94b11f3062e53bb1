//! Force-directed layout with simulated-annealing cooling
//!
//! One synchronous pass per snapshot load:
//! - Repulsion between every pair of nodes (inverse square of the gap
//!   between glyph borders), with an extra push inside the overlap margin
//! - Spring attraction along edges towards an ideal edge length
//! - Weak gravity towards the centroid so components may drift apart
//! - Per-iteration displacement capped by a temperature that decays
//!   geometrically until it reaches the floor or the iteration cap
//!
//! A final separation pass enforces the minimum centre distance between
//! glyphs, so the result never overlaps regardless of density.

use crate::geometry::Point;
use crate::graph::GraphStore;
use crate::style::NODE_DIAMETER;
use petgraph::stable_graph::NodeIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// CONFIG
// =============================================================================

/// Tunable physics for [`ForceLayout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Repulsion strength between every pair of nodes
    pub node_repulsion: f64,

    /// Minimum free space kept between two glyph borders
    pub overlap_margin: f64,

    /// Rest length of an edge spring
    pub ideal_edge_length: f64,

    /// Spring softness (higher = weaker springs)
    pub edge_elasticity: f64,

    /// Pull towards the centroid
    pub gravity: f64,

    /// Hard cap on simulation steps
    pub max_iterations: usize,

    /// Starting cap on per-step displacement
    pub initial_temp: f64,

    /// Temperature multiplier applied after every step
    pub cooling_factor: f64,

    /// Simulation stops once temperature falls below this
    pub min_temp: f64,

    /// Screen padding used when fitting the viewport after layout
    pub fit_padding: f64,

    /// Seed for the initial placement. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_repulsion: 100_000.0,
            overlap_margin: 150.0,
            ideal_edge_length: 400.0,
            edge_elasticity: 30.0,
            gravity: 1.0,
            max_iterations: 3000,
            initial_temp: 500.0,
            cooling_factor: 0.95,
            min_temp: 1.0,
            fit_padding: 150.0,
            seed: None,
        }
    }
}

impl LayoutConfig {
    /// Builder: fix the random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Smallest allowed distance between two node centres.
    pub fn min_separation(&self) -> f64 {
        NODE_DIAMETER + self.overlap_margin
    }
}

// =============================================================================
// RESULT
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    pub positions: HashMap<NodeIndex, Point>,
    /// Simulation steps actually taken before cooling stopped it.
    pub iterations: usize,
}

// =============================================================================
// LAYOUT
// =============================================================================

const MAX_SEPARATION_PASSES: usize = 200;
const SEPARATION_SLACK: f64 = 0.5;
const EPSILON: f64 = 1e-6;

pub struct ForceLayout<'a> {
    config: &'a LayoutConfig,
    rng: StdRng,
}

impl<'a> ForceLayout<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Lay out every node of `store`.
    pub fn run(mut self, store: &GraphStore) -> LayoutResult {
        let order: Vec<NodeIndex> = store.all_nodes().map(|(idx, _)| idx).collect();
        let n = order.len();
        if n == 0 {
            return LayoutResult::default();
        }

        let slot: HashMap<NodeIndex, usize> =
            order.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();
        let springs: Vec<(usize, usize)> = store
            .all_edges()
            .filter_map(|(idx, _)| store.endpoints(idx))
            .filter(|(a, b)| a != b)
            .filter_map(|(a, b)| Some((*slot.get(&a)?, *slot.get(&b)?)))
            .collect();

        let mut positions = self.random_placement(n);
        let iterations = self.simulate(&mut positions, &springs);

        if !separate(&mut positions, self.config.min_separation()) {
            tracing::warn!(
                "Separation did not converge for {} nodes, falling back to grid placement",
                n
            );
            grid_placement(&mut positions, self.config.min_separation());
        }

        tracing::debug!("Layout settled after {} iterations for {} nodes", iterations, n);

        LayoutResult {
            positions: order.into_iter().zip(positions).collect(),
            iterations,
        }
    }

    fn random_placement(&mut self, n: usize) -> Vec<Point> {
        let side = ((n as f64).sqrt() * self.config.ideal_edge_length).max(1.0);
        (0..n)
            .map(|_| Point::new(self.rng.gen_range(0.0..side), self.rng.gen_range(0.0..side)))
            .collect()
    }

    fn simulate(&mut self, positions: &mut [Point], springs: &[(usize, usize)]) -> usize {
        let cfg = self.config;
        let n = positions.len();
        let mut temp = cfg.initial_temp;
        let mut iterations = 0;

        while iterations < cfg.max_iterations && temp >= cfg.min_temp {
            let mut disp = vec![(0.0_f64, 0.0_f64); n];

            // Repulsion
            for i in 0..n {
                for j in (i + 1)..n {
                    let (mut dx, mut dy) = (positions[i].x - positions[j].x, positions[i].y - positions[j].y);
                    let mut dist = dx.hypot(dy);
                    if dist < EPSILON {
                        dx = self.rng.gen_range(-1.0..1.0);
                        dy = self.rng.gen_range(-1.0..1.0);
                        dist = dx.hypot(dy).max(EPSILON);
                    }
                    let gap = (dist - NODE_DIAMETER).max(1.0);
                    let mut force = cfg.node_repulsion / (gap * gap);
                    let min_sep = cfg.min_separation();
                    if dist < min_sep {
                        force += min_sep - dist;
                    }
                    let (fx, fy) = (dx / dist * force, dy / dist * force);
                    disp[i].0 += fx;
                    disp[i].1 += fy;
                    disp[j].0 -= fx;
                    disp[j].1 -= fy;
                }
            }

            // Springs
            let elasticity = cfg.edge_elasticity.max(EPSILON);
            for &(a, b) in springs {
                let (dx, dy) = (positions[b].x - positions[a].x, positions[b].y - positions[a].y);
                let dist = dx.hypot(dy);
                if dist < EPSILON {
                    continue;
                }
                let force = (dist - cfg.ideal_edge_length) / elasticity;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[a].0 += fx;
                disp[a].1 += fy;
                disp[b].0 -= fx;
                disp[b].1 -= fy;
            }

            // Gravity
            let centroid = centroid(positions);
            for (i, p) in positions.iter().enumerate() {
                let pull = cfg.gravity / cfg.ideal_edge_length.max(1.0);
                disp[i].0 += (centroid.x - p.x) * pull;
                disp[i].1 += (centroid.y - p.y) * pull;
            }

            for (p, (dx, dy)) in positions.iter_mut().zip(disp) {
                let len = dx.hypot(dy);
                if len < EPSILON {
                    continue;
                }
                let step = len.min(temp);
                p.x += dx / len * step;
                p.y += dy / len * step;
            }

            temp *= cfg.cooling_factor;
            iterations += 1;
        }

        iterations
    }
}

fn centroid(positions: &[Point]) -> Point {
    let n = positions.len().max(1) as f64;
    let (sx, sy) = positions
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Push overlapping pairs apart until every centre is at least `min_sep`
/// from every other. Returns `false` if it gave up.
fn separate(positions: &mut [Point], min_sep: f64) -> bool {
    let n = positions.len();
    for _ in 0..MAX_SEPARATION_PASSES {
        let mut moved = false;
        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (positions[i].x - positions[j].x, positions[i].y - positions[j].y);
                let dist = dx.hypot(dy);
                if dist >= min_sep {
                    continue;
                }
                let (ux, uy) = if dist > EPSILON {
                    (dx / dist, dy / dist)
                } else {
                    // coincident: pick a stable direction from the pair's indices
                    let angle = (i * 31 + j * 17) as f64;
                    (angle.cos(), angle.sin())
                };
                let push = (min_sep - dist) / 2.0 + SEPARATION_SLACK;
                positions[i].x += ux * push;
                positions[i].y += uy * push;
                positions[j].x -= ux * push;
                positions[j].y -= uy * push;
                moved = true;
            }
        }
        if !moved {
            return true;
        }
    }
    false
}

/// Row-major grid with `min_sep` spacing, ordered by current x then y.
fn grid_placement(positions: &mut [Point], min_sep: f64) {
    let n = positions.len();
    let cols = (n as f64).sqrt().ceil().max(1.0) as usize;
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        positions[a]
            .y
            .total_cmp(&positions[b].y)
            .then(positions[a].x.total_cmp(&positions[b].x))
    });
    for (rank, i) in order.into_iter().enumerate() {
        positions[i] = Point::new(
            (rank % cols) as f64 * min_sep,
            (rank / cols) as f64 * min_sep,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separate_pulls_coincident_points_apart() {
        let mut positions = vec![Point::ORIGIN; 4];
        assert!(separate(&mut positions, 100.0));
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert!(positions[i].distance(positions[j]) >= 100.0);
            }
        }
    }

    #[test]
    fn test_grid_placement_spacing() {
        let mut positions = vec![Point::ORIGIN; 5];
        grid_placement(&mut positions, 210.0);
        for i in 0..5 {
            for j in (i + 1)..5 {
                assert!(positions[i].distance(positions[j]) >= 210.0 - EPSILON);
            }
        }
    }

    #[test]
    fn test_cooling_bounds_iterations() {
        let config = LayoutConfig::default();
        // 500 * 0.95^k < 1 after 122 steps, well under the 3000 cap
        let expected = (config.min_temp / config.initial_temp).ln() / config.cooling_factor.ln();
        let mut store = GraphStore::new();
        store
            .replace(
                crate::model::GraphSnapshot::new(
                    vec![crate::model::GraphNode::new("a", "a", "File")],
                    vec![],
                ),
                crate::graph::EdgePolicy::Reject,
            )
            .unwrap();
        let result = ForceLayout::new(&config).run(&store);
        assert_eq!(result.iterations, expected.ceil() as usize);
        assert!(result.iterations < config.max_iterations);
    }
}
