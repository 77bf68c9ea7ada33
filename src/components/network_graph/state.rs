use std::collections::HashMap;

use super::simulation::{SimLink, Simulation};
use super::types::Dataset;

// Tableau's ten-color categorical scheme, repeated and keyed on
// person id so a node keeps its color across reloads.
const COLORS: &[&str] = &[
	"#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
	"#9c755f", "#bab0ab",
];

pub const NODE_RADIUS: f64 = 20.0;
pub const STROKE_WIDTH: f64 = 3.0;
// How close to a link line counts as touching it.
const LINK_HIT_DIST: f64 = 6.0;
// A gesture that stays inside this radius is a click, not a drag.
const CLICK_SLOP: f64 = 3.0;

/// Fill color for a node, stable per person id.
pub fn palette_color(id: u32) -> &'static str {
	COLORS[id as usize % COLORS.len()]
}

/// Per-node visual data, parallel to the simulation's node arena.
#[derive(Clone, Debug)]
pub struct NodeVisual {
	pub person_id: u32,
	pub label: String,
	pub color: &'static str,
}

/// Per-link visual data, parallel to the simulation's link arena.
#[derive(Clone, Copy, Debug)]
pub struct LinkVisual {
	pub relationship_id: u32,
}

/// What the pointer is currently over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverTarget {
	pub node: Option<usize>,
	pub link: Option<usize>,
}

/// An in-flight drag on a node. Tracks where the pointer and the node
/// started so the pin follows the pointer without jumping, and whether
/// the pointer ever left the click slop.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragGesture {
	pub active: bool,
	pub node: Option<usize>,
	pub moved: bool,
	start: (f64, f64),
	node_start: (f64, f64),
}

/// Everything the rendered graph needs at runtime: the simulation and
/// the visual arenas beside it, plus interaction state. Handlers get a
/// handle to this struct; nothing lives in ambient captures.
pub struct GraphState {
	pub sim: Simulation,
	pub nodes: Vec<NodeVisual>,
	pub links: Vec<LinkVisual>,
	pub drag: DragGesture,
	pub hover: HoverTarget,
	pub width: f64,
	pub height: f64,
	// Link press armed by mousedown, resolved to a click on mouseup.
	pub pressed_link: Option<usize>,
}

impl GraphState {
	/// Build the arenas from a validated dataset. Relationships whose
	/// endpoints don't resolve are skipped rather than trusted.
	pub fn new(data: &Dataset, width: f64, height: f64) -> Self {
		let mut id_to_idx = HashMap::new();
		let nodes: Vec<NodeVisual> = data
			.people
			.iter()
			.enumerate()
			.map(|(i, person)| {
				id_to_idx.insert(person.id, i);
				NodeVisual {
					person_id: person.id,
					label: person.name.clone(),
					color: palette_color(person.id),
				}
			})
			.collect();

		let mut links = Vec::new();
		let mut sim_links = Vec::new();
		for rel in &data.relationships {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&rel.source), id_to_idx.get(&rel.target))
			{
				links.push(LinkVisual {
					relationship_id: rel.id,
				});
				sim_links.push(SimLink {
					source: src,
					target: tgt,
				});
			}
		}

		Self {
			sim: Simulation::new(nodes.len(), sim_links, width, height),
			nodes,
			links,
			drag: DragGesture::default(),
			hover: HoverTarget::default(),
			width,
			height,
			pressed_link: None,
		}
	}

	/// Topmost node under the given canvas position, if any.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		let mut found = None;
		for (i, node) in self.sim.nodes.iter().enumerate() {
			let (dx, dy) = (node.x - x, node.y - y);
			if (dx * dx + dy * dy).sqrt() <= NODE_RADIUS {
				found = Some(i);
			}
		}
		found
	}

	/// Link whose line passes under the given canvas position, if any.
	pub fn link_at(&self, x: f64, y: f64) -> Option<usize> {
		let mut found = None;
		for (i, link) in self.sim.links.iter().enumerate() {
			let a = &self.sim.nodes[link.source];
			let b = &self.sim.nodes[link.target];
			if dist_to_segment(x, y, a.x, a.y, b.x, b.y) <= LINK_HIT_DIST {
				found = Some(i);
			}
		}
		found
	}

	/// Start dragging `node` from pointer position (`x`, `y`): pin it
	/// where it stands and reheat a settled simulation so the layout
	/// responds.
	pub fn begin_drag(&mut self, node: usize, x: f64, y: f64) {
		let (nx, ny) = (self.sim.nodes[node].x, self.sim.nodes[node].y);
		self.drag = DragGesture {
			active: true,
			node: Some(node),
			moved: false,
			start: (x, y),
			node_start: (nx, ny),
		};
		// Restarts a settled layout; a hot one just stays hot for the
		// duration of the gesture.
		self.sim.reheat();
		self.sim.pin(node, nx, ny);
	}

	/// Move the pin to follow the pointer.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		let Some(node) = self.drag.node else {
			return;
		};
		let (dx, dy) = (x - self.drag.start.0, y - self.drag.start.1);
		if dx.abs().max(dy.abs()) > CLICK_SLOP {
			self.drag.moved = true;
		}
		self.sim
			.pin(node, self.drag.node_start.0 + dx, self.drag.node_start.1 + dy);
	}

	/// Release the pin and let the layout cool again. Returns the
	/// dragged node index when the gesture never left the click slop,
	/// i.e. it should be treated as a click.
	pub fn end_drag(&mut self) -> Option<usize> {
		let node = self.drag.node;
		if let Some(idx) = node {
			self.sim.unpin(idx);
		}
		self.sim.cool();
		let clicked = if self.drag.moved { None } else { node };
		self.drag = DragGesture::default();
		clicked
	}

	/// Refresh the hover target for the pointer position. Nodes sit on
	/// top of links, so a node hit wins.
	pub fn hover_at(&mut self, x: f64, y: f64) {
		if let Some(node) = self.node_at(x, y) {
			self.hover = HoverTarget {
				node: Some(node),
				link: None,
			};
		} else {
			self.hover = HoverTarget {
				node: None,
				link: self.link_at(x, y),
			};
		}
	}

	/// Drop all transient pointer state (pointer left the canvas).
	pub fn clear_pointer(&mut self) {
		if self.drag.active {
			self.end_drag();
		}
		self.hover = HoverTarget::default();
		self.pressed_link = None;
	}
}

/// Distance from point (`px`, `py`) to the segment (`x1`, `y1`)–(`x2`, `y2`).
fn dist_to_segment(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len2 = dx * dx + dy * dy;
	let t = if len2 == 0.0 {
		0.0
	} else {
		(((px - x1) * dx + (py - y1) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::types::Dataset;

	fn two_person_dataset() -> Dataset {
		serde_json::from_str(
			r#"{
				"people": [
					{"id": 1, "name": "A", "bio": {"born": "1900"}},
					{"id": 2, "name": "B", "bio": {"born": "1910"}}
				],
				"relationships": [
					{"id": 1, "source": 1, "target": 2,
					 "letters": [{"title": "L1", "from": 0, "to": 1, "content": "x.html"}]}
				]
			}"#,
		)
		.unwrap()
	}

	#[test]
	fn arenas_mirror_the_dataset() {
		let state = GraphState::new(&two_person_dataset(), 1000.0, 500.0);
		assert_eq!(state.nodes.len(), 2);
		assert_eq!(state.links.len(), 1);
		assert_eq!(state.sim.nodes.len(), 2);
		assert_eq!(state.sim.links.len(), 1);
		assert_eq!(state.links[0].relationship_id, 1);
		assert_eq!(state.sim.links[0].source, 0);
		assert_eq!(state.sim.links[0].target, 1);
	}

	#[test]
	fn dangling_relationship_is_skipped() {
		let mut data = two_person_dataset();
		data.relationships[0].source = 99;
		let state = GraphState::new(&data, 1000.0, 500.0);
		assert_eq!(state.nodes.len(), 2);
		assert!(state.links.is_empty());
		assert!(state.sim.links.is_empty());
	}

	#[test]
	fn node_hit_test_respects_radius() {
		let state = GraphState::new(&two_person_dataset(), 1000.0, 500.0);
		let (x, y) = (state.sim.nodes[0].x, state.sim.nodes[0].y);
		assert_eq!(state.node_at(x + NODE_RADIUS - 1.0, y), Some(0));
		assert_eq!(state.node_at(x + NODE_RADIUS + 5.0, y + NODE_RADIUS + 5.0), None);
	}

	#[test]
	fn link_hit_test_uses_segment_distance() {
		let state = GraphState::new(&two_person_dataset(), 1000.0, 500.0);
		let a = &state.sim.nodes[0];
		let b = &state.sim.nodes[1];
		let (mx, my) = ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
		assert_eq!(state.link_at(mx, my), Some(0));
		assert_eq!(state.link_at(mx, my + 50.0), None);
	}

	#[test]
	fn short_gesture_is_a_click_long_gesture_is_not() {
		let mut state = GraphState::new(&two_person_dataset(), 1000.0, 500.0);
		let (x, y) = (state.sim.nodes[0].x, state.sim.nodes[0].y);

		state.begin_drag(0, x, y);
		state.drag_to(x + 1.0, y);
		assert_eq!(state.end_drag(), Some(0));

		state.begin_drag(0, x, y);
		state.drag_to(x + 40.0, y + 10.0);
		assert_eq!(state.end_drag(), None);
	}

	#[test]
	fn drag_pins_and_release_frees() {
		let mut state = GraphState::new(&two_person_dataset(), 1000.0, 500.0);
		let (x, y) = (state.sim.nodes[0].x, state.sim.nodes[0].y);
		state.begin_drag(0, x, y);
		state.drag_to(x + 100.0, y);
		for _ in 0..10 {
			state.sim.tick();
		}
		assert_eq!(state.sim.nodes[0].x, x + 100.0);

		state.end_drag();
		assert!(state.sim.nodes[0].fx.is_none());
		let pinned_x = state.sim.nodes[0].x;
		for _ in 0..20 {
			state.sim.tick();
		}
		assert!((state.sim.nodes[0].x - pinned_x).abs() > f64::EPSILON);
	}

	#[test]
	fn hover_prefers_nodes_over_links() {
		let mut state = GraphState::new(&two_person_dataset(), 1000.0, 500.0);
		let (x, y) = (state.sim.nodes[0].x, state.sim.nodes[0].y);
		// Node centers sit on the link line between them here.
		state.hover_at(x, y);
		assert_eq!(state.hover.node, Some(0));
		assert_eq!(state.hover.link, None);

		let a = &state.sim.nodes[0];
		let b = &state.sim.nodes[1];
		state.hover_at((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
		assert_eq!(state.hover.node, None);
		assert_eq!(state.hover.link, Some(0));

		state.clear_pointer();
		assert_eq!(state.hover, HoverTarget::default());
	}

	#[test]
	fn palette_repeats_and_stays_keyed_on_id() {
		assert_eq!(palette_color(0), palette_color(10));
		assert_ne!(palette_color(0), palette_color(1));
		let state = GraphState::new(&two_person_dataset(), 1000.0, 500.0);
		assert_eq!(state.nodes[0].color, palette_color(1));
	}
}
