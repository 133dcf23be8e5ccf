//! Radial layout of the agent's infrastructure.
//!
//! One anchor sits at the canvas center. Each category owns a fixed 90°
//! sector in declared order (skills, channels, providers, tools) whether or
//! not it has nodes, so an empty category leaves its quarter blank rather
//! than widening its neighbours. Nodes share their sector evenly and sit on
//! a single ring around the anchor, each joined to it by exactly one edge.

use crate::core::models::{TopologyCategory, TopologySnapshot};

pub const SECTOR_DEGREES: f64 = 90.0;
/// Ring radius as a fraction of the shorter canvas side.
pub const RING_FACTOR: f64 = 0.38;
pub const ANCHOR_LABEL: &str = "nanobot";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub category: TopologyCategory,
    pub name: String,
    pub detail: String,
    pub angle_deg: f64,
    pub position: Point,
}

/// Anchor-to-node link; `node` indexes [`TopologyLayout::nodes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub node: usize,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopologyLayout {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub anchor: Point,
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<Edge>,
}

impl TopologyLayout {
    pub fn nodes_in(&self, category: TopologyCategory) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.iter().filter(move |n| n.category == category)
    }
}

pub fn sector_start(category: TopologyCategory) -> f64 {
    let index = TopologyCategory::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or(0);
    index as f64 * SECTOR_DEGREES
}

pub fn compute_layout(snapshot: &TopologySnapshot, width: f64, height: f64) -> TopologyLayout {
    let anchor = Point {
        x: width / 2.0,
        y: height / 2.0,
    };
    let radius = width.min(height) * RING_FACTOR;

    let mut nodes = Vec::with_capacity(snapshot.node_count());
    for category in TopologyCategory::ALL {
        let members = snapshot.category(category);
        let step = SECTOR_DEGREES / members.len().max(1) as f64;
        let start = sector_start(category);
        for (i, node) in members.iter().enumerate() {
            // Centre of the i-th equal slice of the sector.
            let angle_deg = start + (i as f64 + 0.5) * step;
            let rad = angle_deg.to_radians();
            nodes.push(PlacedNode {
                category,
                name: node.name.clone(),
                detail: node.detail().to_string(),
                angle_deg,
                position: Point {
                    x: anchor.x + radius * rad.cos(),
                    y: anchor.y + radius * rad.sin(),
                },
            });
        }
    }

    let edges = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| Edge {
            node: i,
            from: anchor,
            to: n.position,
        })
        .collect();

    TopologyLayout {
        width,
        height,
        radius,
        anchor,
        nodes,
        edges,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub node: usize,
    pub text: String,
}

/// Transient tooltips attached to the hover path.
///
/// `hover` clears whatever is showing before adding its own tooltip, so
/// rapid hover/hover/leave sequences never accumulate. `leave` removes every
/// visible tooltip and reports how many; calling it again removes nothing.
#[derive(Debug, Default)]
pub struct TooltipLayer {
    visible: Vec<Tooltip>,
}

impl TooltipLayer {
    pub fn hover(&mut self, node: usize, text: impl Into<String>) {
        self.visible.clear();
        self.visible.push(Tooltip {
            node,
            text: text.into(),
        });
    }

    pub fn leave(&mut self) -> usize {
        let removed = self.visible.len();
        self.visible.clear();
        removed
    }

    pub fn visible(&self) -> &[Tooltip] {
        &self.visible
    }
}

pub struct TopologyEngine {
    snapshot: Option<TopologySnapshot>,
    layout: Option<TopologyLayout>,
    tooltips: TooltipLayer,
    selected: Option<usize>,
    width: f64,
    height: f64,
}

impl TopologyEngine {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            snapshot: None,
            layout: None,
            tooltips: TooltipLayer::default(),
            selected: None,
            width,
            height,
        }
    }

    /// Replace the snapshot wholesale and recompute the layout.
    pub fn apply_snapshot(&mut self, snapshot: TopologySnapshot) {
        self.tooltips.leave();
        self.selected = None;
        self.layout = Some(compute_layout(&snapshot, self.width, self.height));
        self.snapshot = Some(snapshot);
    }

    pub fn snapshot(&self) -> Option<&TopologySnapshot> {
        self.snapshot.as_ref()
    }

    pub fn layout(&self) -> Option<&TopologyLayout> {
        self.layout.as_ref()
    }

    pub fn edge_count(&self) -> usize {
        self.layout.as_ref().map(|l| l.edges.len()).unwrap_or(0)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn tooltips(&self) -> &[Tooltip] {
        self.tooltips.visible()
    }

    pub fn hover(&mut self, node: usize) {
        let Some(layout) = &self.layout else {
            return;
        };
        let Some(placed) = layout.nodes.get(node) else {
            return;
        };
        let text = if placed.detail.is_empty() {
            format!("{} ({})", placed.name, placed.category.label())
        } else {
            format!("{}: {}", placed.name, placed.detail)
        };
        self.tooltips.hover(node, text);
        self.selected = Some(node);
    }

    pub fn leave(&mut self) -> usize {
        self.selected = None;
        self.tooltips.leave()
    }

    /// Keyboard stand-in for moving the pointer onto the next node.
    pub fn hover_next(&mut self) {
        let count = self.layout.as_ref().map(|l| l.nodes.len()).unwrap_or(0);
        if count == 0 {
            return;
        }
        let next = match self.selected {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.leave();
        self.hover(next);
    }

    pub fn hover_previous(&mut self) {
        let count = self.layout.as_ref().map(|l| l.nodes.len()).unwrap_or(0);
        if count == 0 {
            return;
        }
        let prev = match self.selected {
            Some(i) => (i + count - 1) % count,
            None => count - 1,
        };
        self.leave();
        self.hover(prev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::TopologyNode;

    fn node(name: &str) -> TopologyNode {
        TopologyNode {
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            status: None,
        }
    }

    fn scenario_c() -> TopologySnapshot {
        TopologySnapshot {
            skills: vec![node("A"), node("B"), node("C")],
            channels: vec![],
            providers: vec![node("D")],
            tools: vec![],
            timestamp: None,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn one_edge_per_node_all_to_anchor() {
        let layout = compute_layout(&scenario_c(), 200.0, 100.0);
        assert_eq!(layout.edges.len(), 4);
        assert_eq!(layout.nodes.len(), 4);
        for (i, edge) in layout.edges.iter().enumerate() {
            assert_eq!(edge.node, i);
            assert_eq!(edge.from, layout.anchor);
            assert_eq!(edge.to, layout.nodes[i].position);
        }
        assert_eq!(layout.anchor, Point { x: 100.0, y: 50.0 });
    }

    #[test]
    fn empty_category_keeps_its_sector() {
        let layout = compute_layout(&scenario_c(), 100.0, 100.0);
        assert_eq!(layout.nodes_in(TopologyCategory::Channels).count(), 0);

        let skill_angles: Vec<f64> = layout
            .nodes_in(TopologyCategory::Skills)
            .map(|n| n.angle_deg)
            .collect();
        assert!(approx(skill_angles[0], 15.0));
        assert!(approx(skill_angles[1], 45.0));
        assert!(approx(skill_angles[2], 75.0));

        // Providers stay in the third quarter although channels is empty.
        let provider = layout.nodes_in(TopologyCategory::Providers).next().unwrap();
        assert!(approx(provider.angle_deg, 225.0));
    }

    #[test]
    fn sector_placement_is_independent_of_other_categories() {
        let mut with_channels = scenario_c();
        with_channels.channels = vec![node("telegram"), node("discord")];
        let a = compute_layout(&scenario_c(), 100.0, 100.0);
        let b = compute_layout(&with_channels, 100.0, 100.0);
        let pa = a.nodes_in(TopologyCategory::Providers).next().unwrap();
        let pb = b.nodes_in(TopologyCategory::Providers).next().unwrap();
        assert_eq!(pa.position, pb.position);
    }

    #[test]
    fn nodes_sit_on_a_fixed_ring() {
        let layout = compute_layout(&scenario_c(), 300.0, 120.0);
        assert!(approx(layout.radius, 120.0 * RING_FACTOR));
        for n in &layout.nodes {
            let dx = n.position.x - layout.anchor.x;
            let dy = n.position.y - layout.anchor.y;
            assert!(approx((dx * dx + dy * dy).sqrt(), layout.radius));
        }
    }

    #[test]
    fn empty_snapshot_has_only_the_anchor() {
        let layout = compute_layout(&TopologySnapshot::default(), 100.0, 100.0);
        assert!(layout.nodes.is_empty());
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn tooltips_never_accumulate() {
        let mut layer = TooltipLayer::default();
        layer.hover(0, "a");
        layer.hover(1, "b");
        layer.hover(2, "c");
        assert_eq!(layer.visible().len(), 1);
        assert_eq!(layer.visible()[0].text, "c");
        assert_eq!(layer.leave(), 1);
        assert_eq!(layer.leave(), 0);
        assert!(layer.visible().is_empty());
    }

    #[test]
    fn engine_hover_cycle_shows_node_detail() {
        let mut engine = TopologyEngine::new(100.0, 100.0);
        engine.apply_snapshot(scenario_c());
        assert_eq!(engine.edge_count(), 4);
        engine.hover_next();
        assert_eq!(engine.selected(), Some(0));
        assert_eq!(engine.tooltips()[0].text, "A: A description");
        engine.hover_previous();
        assert_eq!(engine.selected(), Some(3));
        assert_eq!(engine.tooltips().len(), 1);
        assert_eq!(engine.leave(), 1);
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn new_snapshot_clears_tooltips() {
        let mut engine = TopologyEngine::new(100.0, 100.0);
        engine.apply_snapshot(scenario_c());
        engine.hover(2);
        engine.apply_snapshot(TopologySnapshot::default());
        assert!(engine.tooltips().is_empty());
        assert_eq!(engine.edge_count(), 0);
    }
}
