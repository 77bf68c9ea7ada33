use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{GraphState, NODE_RADIUS, STROKE_WIDTH};

const STROKE_DEFAULT: &str = "#999";
const STROKE_HOVER: &str = "#000";
const LABEL_COLOR: &str = "#333";

/// Repaint the whole graph from the current arena positions. Called
/// once per animation frame, after the simulation step.
pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#fff");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
}

fn draw_links(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(STROKE_WIDTH);
	for (i, link) in state.sim.links.iter().enumerate() {
		let a = &state.sim.nodes[link.source];
		let b = &state.sim.nodes[link.target];
		let stroke = if state.hover.link == Some(i) {
			STROKE_HOVER
		} else {
			STROKE_DEFAULT
		};
		ctx.set_stroke_style_str(stroke);
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(STROKE_WIDTH);
	for (i, visual) in state.nodes.iter().enumerate() {
		let node = &state.sim.nodes[i];
		let stroke = if state.hover.node == Some(i) {
			STROKE_HOVER
		} else {
			STROKE_DEFAULT
		};

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(visual.color);
		ctx.fill();
		ctx.set_stroke_style_str(stroke);
		ctx.stroke();

		ctx.set_fill_style_str(LABEL_COLOR);
		ctx.set_font("12px sans-serif");
		let _ = ctx.fill_text(&visual.label, node.x + NODE_RADIUS + 4.0, node.y + 4.0);
	}
}
