//! Iterative force-directed placement over flat node/link arenas.
//!
//! Three forces act on every step: a spring on each link pulling its
//! endpoints toward a target separation, a pairwise charge pushing all
//! nodes apart, and a centering translation keeping the layout's mean
//! on the canvas midpoint. The simulation cools toward `alpha_target`
//! and is settled once `alpha` drops below `ALPHA_MIN`.

use std::f64::consts::PI;

/// Rest length of the spring on every link, in canvas units.
pub const LINK_DISTANCE: f64 = 200.0;
/// Uniform many-body strength. Negative repels.
pub const CHARGE_STRENGTH: f64 = -100.0;
/// Alpha value a drag gesture reheats the simulation to.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.6;
// Squared distance floor for the charge force.
const CHARGE_MIN_DIST2: f64 = 1.0;

/// A simulated node: live position, velocity, and an optional pin.
/// While `fx`/`fy` are set the node snaps to them and carries no
/// velocity of its own.
#[derive(Clone, Debug, Default)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

/// A simulated link, storing arena indices rather than node references.
#[derive(Clone, Copy, Debug)]
pub struct SimLink {
	pub source: usize,
	pub target: usize,
}

/// The running relaxation. Owns the node and link arenas; the view
/// reads positions out of `nodes` after every [`Simulation::tick`].
pub struct Simulation {
	pub nodes: Vec<SimNode>,
	pub links: Vec<SimLink>,
	alpha: f64,
	alpha_decay: f64,
	alpha_target: f64,
	center: (f64, f64),
	// Per-link spring strength and source-side bias, derived from
	// endpoint degrees so well-connected nodes move less.
	strengths: Vec<f64>,
	biases: Vec<f64>,
}

impl Simulation {
	/// Seed `node_count` nodes on a circle around the canvas midpoint
	/// and wire up `links` between them. Links must carry in-bounds
	/// indices.
	pub fn new(node_count: usize, links: Vec<SimLink>, width: f64, height: f64) -> Self {
		let center = (width / 2.0, height / 2.0);
		let nodes = (0..node_count)
			.map(|i| {
				let angle = (i as f64) * 2.0 * PI / node_count.max(1) as f64;
				SimNode {
					x: center.0 + 100.0 * angle.cos(),
					y: center.1 + 100.0 * angle.sin(),
					..SimNode::default()
				}
			})
			.collect();

		let mut degrees = vec![0usize; node_count];
		for link in &links {
			degrees[link.source] += 1;
			degrees[link.target] += 1;
		}
		let strengths = links
			.iter()
			.map(|l| 1.0 / degrees[l.source].min(degrees[l.target]).max(1) as f64)
			.collect();
		let biases = links
			.iter()
			.map(|l| degrees[l.source] as f64 / (degrees[l.source] + degrees[l.target]) as f64)
			.collect();

		Self {
			nodes,
			links,
			alpha: 1.0,
			// Reaches ALPHA_MIN in ~300 steps from a cold start.
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
			alpha_target: 0.0,
			center,
			strengths,
			biases,
		}
	}

	/// Whether the relaxation has reached low energy.
	pub fn is_settled(&self) -> bool {
		self.alpha < ALPHA_MIN
	}

	/// Whether stepping still changes anything: either the simulation
	/// is hot, or a target (drag reheat) is keeping it hot.
	pub fn is_running(&self) -> bool {
		self.alpha >= ALPHA_MIN || self.alpha_target >= ALPHA_MIN
	}

	/// Raise the cooling target so a settled layout starts moving again.
	pub fn reheat(&mut self) {
		self.alpha_target = DRAG_ALPHA_TARGET;
	}

	/// Let the simulation cool back down to rest.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Pin a node to a fixed position. The forces keep acting on the
	/// rest of the layout around it.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
		}
	}

	/// Release a pinned node back to force control.
	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
	}

	/// One discrete relaxation step.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		self.apply_links();
		self.apply_charge();

		for node in &mut self.nodes {
			match (node.fx, node.fy) {
				(Some(fx), Some(fy)) => {
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				_ => {
					node.vx *= VELOCITY_DECAY;
					node.vy *= VELOCITY_DECAY;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}

		self.apply_center();
	}

	fn apply_links(&mut self) {
		for (i, link) in self.links.iter().enumerate() {
			let (s, t) = (link.source, link.target);
			let mut dx =
				self.nodes[t].x + self.nodes[t].vx - self.nodes[s].x - self.nodes[s].vx;
			let dy = self.nodes[t].y + self.nodes[t].vy - self.nodes[s].y - self.nodes[s].vy;
			if dx == 0.0 && dy == 0.0 {
				// Coincident endpoints: nudge apart deterministically.
				dx = 1e-6 * (i + 1) as f64;
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - LINK_DISTANCE) / len * self.alpha * self.strengths[i];
			let (fx, fy) = (dx * k, dy * k);
			let bias = self.biases[i];
			self.nodes[t].vx -= fx * bias;
			self.nodes[t].vy -= fy * bias;
			self.nodes[s].vx += fx * (1.0 - bias);
			self.nodes[s].vy += fy * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self) {
		for i in 0..self.nodes.len() {
			for j in (i + 1)..self.nodes.len() {
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let dy = self.nodes[j].y - self.nodes[i].y;
				if dx == 0.0 && dy == 0.0 {
					dx = 1e-6 * (j - i) as f64;
				}
				let dist2 = (dx * dx + dy * dy).max(CHARGE_MIN_DIST2);
				let w = CHARGE_STRENGTH * self.alpha / dist2;
				self.nodes[i].vx += dx * w;
				self.nodes[i].vy += dy * w;
				self.nodes[j].vx -= dx * w;
				self.nodes[j].vy -= dy * w;
			}
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let count = self.nodes.len() as f64;
		let sx = self.nodes.iter().map(|n| n.x).sum::<f64>() / count - self.center.0;
		let sy = self.nodes.iter().map(|n| n.y).sum::<f64>() / count - self.center.1;
		for node in &mut self.nodes {
			// Pinned nodes stay put; the midpoint shift skips them.
			if node.fx.is_none() {
				node.x -= sx;
			}
			if node.fy.is_none() {
				node.y -= sy;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pair() -> Simulation {
		Simulation::new(
			2,
			vec![SimLink {
				source: 0,
				target: 1,
			}],
			1000.0,
			500.0,
		)
	}

	fn separation(sim: &Simulation) -> f64 {
		let dx = sim.nodes[1].x - sim.nodes[0].x;
		let dy = sim.nodes[1].y - sim.nodes[0].y;
		(dx * dx + dy * dy).sqrt()
	}

	#[test]
	fn linked_pair_settles_near_link_distance() {
		let mut sim = pair();
		while sim.is_running() {
			sim.tick();
		}
		// The charge force stretches the spring slightly past its
		// rest length, so allow a loose band around it.
		let sep = separation(&sim);
		assert!(
			(sep - LINK_DISTANCE).abs() < 20.0,
			"separation {sep} not near {LINK_DISTANCE}"
		);
	}

	#[test]
	fn layout_mean_sits_on_canvas_midpoint() {
		let mut sim = Simulation::new(
			5,
			vec![
				SimLink {
					source: 0,
					target: 1,
				},
				SimLink {
					source: 1,
					target: 2,
				},
				SimLink {
					source: 2,
					target: 3,
				},
				SimLink {
					source: 3,
					target: 4,
				},
			],
			800.0,
			600.0,
		);
		for _ in 0..100 {
			sim.tick();
		}
		let n = sim.nodes.len() as f64;
		let mx = sim.nodes.iter().map(|nd| nd.x).sum::<f64>() / n;
		let my = sim.nodes.iter().map(|nd| nd.y).sum::<f64>() / n;
		assert!((mx - 400.0).abs() < 1e-6);
		assert!((my - 300.0).abs() < 1e-6);
	}

	#[test]
	fn unlinked_nodes_repel() {
		let mut sim = Simulation::new(2, Vec::new(), 1000.0, 500.0);
		let before = separation(&sim);
		for _ in 0..50 {
			sim.tick();
		}
		assert!(separation(&sim) > before);
	}

	#[test]
	fn pinned_node_holds_its_position() {
		let mut sim = pair();
		sim.pin(0, 50.0, 60.0);
		for _ in 0..50 {
			sim.tick();
		}
		assert_eq!(sim.nodes[0].x, 50.0);
		assert_eq!(sim.nodes[0].y, 60.0);
	}

	#[test]
	fn released_node_returns_to_force_control() {
		let mut sim = pair();
		sim.pin(0, 10.0, 10.0);
		for _ in 0..30 {
			sim.tick();
		}
		sim.unpin(0);
		sim.reheat();
		for _ in 0..10 {
			sim.tick();
		}
		// Off the pin and moving again under the spring.
		assert!((sim.nodes[0].x - 10.0).abs() > 1.0 || (sim.nodes[0].y - 10.0).abs() > 1.0);
	}

	#[test]
	fn reheat_restarts_a_settled_simulation() {
		let mut sim = pair();
		while sim.is_running() {
			sim.tick();
		}
		assert!(sim.is_settled());

		sim.reheat();
		assert!(sim.is_running());
		sim.tick();
		sim.tick();
		assert!(!sim.is_settled());

		sim.cool();
		while sim.is_running() {
			sim.tick();
		}
		assert!(sim.is_settled());
	}
}
