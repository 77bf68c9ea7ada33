use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::dialogs::{BioDialog, DialogId, DialogRegistry, RelationshipDialog};
use super::render;
use super::state::GraphState;
use super::types::{DataError, Dataset};
use super::units::Dimension;

/// Where the dataset is served from, relative to the app root.
pub const DATA_URL: &str = "data/data.json";

/// Fetch and validate the dataset. One shot, no retry.
async fn load_dataset(url: &str) -> Result<Dataset, DataError> {
	let text = gloo_net::http::Request::get(url).send().await?.text().await?;
	let dataset: Dataset = serde_json::from_str(&text)?;
	dataset.validate()?;
	Ok(dataset)
}

/// Interactive diagram of people and their correspondence.
///
/// Fetches the dataset once on mount, lays it out with the force
/// simulation, and repaints on every animation frame. Clicking a node
/// or a link opens the matching detail dialog; all interaction is
/// user-driven through the rendered surface.
#[component]
pub fn NetworkGraph(
	#[prop(default = Dimension::Px(1000.0))] width: Dimension,
	#[prop(default = Dimension::Px(500.0))] height: Dimension,
	#[prop(into, default = DATA_URL.to_string())] src: String,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let dataset: RwSignal<Option<Dataset>> = RwSignal::new(None);
	let registry: RwSignal<DialogRegistry> = RwSignal::new(DialogRegistry::default());

	let state: Rc<RefCell<Option<GraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());

	// One-shot dataset load. Failures degrade to the empty graph.
	spawn_local(async move {
		match load_dataset(&src).await {
			Ok(data) => {
				info!(
					"Loaded {} people, {} relationships",
					data.people.len(),
					data.relationships.len()
				);
				dataset.set(Some(data));
			}
			Err(err) => {
				warn!("Dataset load failed, rendering empty graph: {err}");
				dataset.set(Some(Dataset::default()));
			}
		}
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(data) = dataset.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (vw, vh) = (
			window.inner_width().unwrap().as_f64().unwrap(),
			window.inner_height().unwrap().as_f64().unwrap(),
		);
		let (w, h) = (width.resolve(vw, vh), height.resolve(vw, vh));
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*state_init.borrow_mut() = Some(GraphState::new(&data, w, h));

		// The frame loop is registered once; later effect runs only
		// swap the state it draws.
		if animate_init.borrow().is_some() {
			return;
		}
		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.sim.is_running() {
					s.sim.tick();
				}
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at(x, y) {
				s.begin_drag(idx, x, y);
			} else {
				s.pressed_link = s.link_at(x, y);
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
			} else {
				s.hover_at(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				if let Some(idx) = s.end_drag() {
					let person = s.nodes[idx].person_id;
					registry.update(|r| r.open(DialogId::Bio(person)));
				}
			} else if let Some(pressed) = s.pressed_link.take() {
				// A link press counts as a click only if the pointer
				// is still on the same line.
				if s.link_at(x, y) == Some(pressed) {
					let relationship = s.links[pressed].relationship_id;
					registry.update(|r| r.open(DialogId::Relationship(relationship)));
				}
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.clear_pointer();
		}
	};

	view! {
		<div class="network-graph">
			<canvas
				node_ref=canvas_ref
				class="network-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style="display: block; cursor: grab;"
			/>

			// Accessible per-node titles for the canvas surface.
			<ul class="visually-hidden">
				{move || {
					dataset
						.get()
						.map(|data| {
							data.people
								.iter()
								.map(|p| view! { <li>{p.name.clone()}</li> })
								.collect_view()
						})
				}}
			</ul>

			<Show when=move || {
				dataset.get().map(|d| d.people.is_empty()).unwrap_or(false)
			}>
				<div class="empty-state">
					<p>"No people to show"</p>
					<p class="empty-state-hint">"The dataset is empty or could not be loaded."</p>
				</div>
			</Show>

			{move || {
				dataset
					.get()
					.map(|data| {
						let bios = data
							.people
							.iter()
							.cloned()
							.map(|person| view! { <BioDialog person=person registry=registry /> })
							.collect_view();
						let relationships = data
							.relationships
							.iter()
							.cloned()
							.map(|relationship| {
								view! {
									<RelationshipDialog
										relationship=relationship
										people=data.people.clone()
										registry=registry
									/>
								}
							})
							.collect_view();
						(bios, relationships)
					})
			}}
		</div>
	}
}
