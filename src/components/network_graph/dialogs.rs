//! Detail dialogs for people and relationships, plus the registry that
//! owns their visibility. Dialog state lives in the view, not in the
//! document: opening and closing go through [`DialogRegistry`], and the
//! DOM ids exist only so the dialogs stay addressable from outside.

use std::collections::HashSet;

use leptos::prelude::*;

use super::types::{FULLBIO_KEY, Person, Relationship};

/// Address of a single dialog, derived from the entity it describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogId {
	Bio(u32),
	Relationship(u32),
}

impl DialogId {
	/// The DOM id the dialog element carries.
	pub fn element_id(&self) -> String {
		match self {
			DialogId::Bio(id) => format!("bio-{id}"),
			DialogId::Relationship(id) => format!("relationship-{id}"),
		}
	}
}

/// Which dialogs are currently open. Opening one does not close any
/// other; each close targets a single id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogRegistry {
	open: HashSet<DialogId>,
}

impl DialogRegistry {
	pub fn open(&mut self, id: DialogId) {
		self.open.insert(id);
	}

	pub fn close(&mut self, id: DialogId) {
		self.open.remove(&id);
	}

	pub fn is_open(&self, id: DialogId) -> bool {
		self.open.contains(&id)
	}
}

/// Uppercase the first character, for bio field labels.
fn capitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
		None => String::new(),
	}
}

/// Modal dialog listing one person's biography fields. The person's
/// name, and the `fullbio` field itself, link out when a full
/// biography URL is present.
#[component]
pub fn BioDialog(person: Person, registry: RwSignal<DialogRegistry>) -> impl IntoView {
	let id = DialogId::Bio(person.id);
	let is_open = move || registry.get().is_open(id);
	let close = move |_| registry.update(|r| r.close(id));
	let close_backdrop = move |_| registry.update(|r| r.close(id));

	let heading = match person.fullbio() {
		Some(url) => view! {
			<a href=url.to_string() target="_blank">{person.name.clone()}</a>
		}
		.into_any(),
		None => view! { <span>{person.name.clone()}</span> }.into_any(),
	};

	let fields = person
		.bio
		.iter()
		.map(|(key, value)| {
			let label = capitalize(key);
			if key == FULLBIO_KEY {
				view! {
					<li>
						<strong>{label}": "</strong>
						<a href=value.clone() target="_blank">{value.clone()}</a>
					</li>
				}
				.into_any()
			} else {
				view! {
					<li>
						<strong>{label}": "</strong>
						{value.clone()}
					</li>
				}
				.into_any()
			}
		})
		.collect_view();

	view! {
		<dialog id=id.element_id() class="modal" open=is_open>
			<div class="modal-box">
				<h3>{heading}</h3>
				<ul class="bio-fields">{fields}</ul>
				<div class="modal-action">
					<button on:click=close>"Close"</button>
				</div>
			</div>
			<div class="modal-backdrop" on:click=close_backdrop></div>
		</dialog>
	}
}

/// Modal dialog for one relationship: the two endpoint names and an
/// accordion over its letters, first entry expanded.
#[component]
pub fn RelationshipDialog(
	relationship: Relationship,
	people: Vec<Person>,
	registry: RwSignal<DialogRegistry>,
) -> impl IntoView {
	let id = DialogId::Relationship(relationship.id);
	let is_open = move || registry.get().is_open(id);
	let close = move |_| registry.update(|r| r.close(id));
	let close_backdrop = move |_| registry.update(|r| r.close(id));

	let name_of = |person_id: u32| {
		people
			.iter()
			.find(|p| p.id == person_id)
			.map(|p| p.name.clone())
			.unwrap_or_default()
	};
	let heading = format!("{} & {}", name_of(relationship.source), name_of(relationship.target));

	let expanded = RwSignal::new(Some(0usize));
	let letters = relationship
		.letters
		.iter()
		.enumerate()
		.map(|(i, letter)| {
			let sender = people
				.get(letter.from)
				.map(|p| p.name.clone())
				.unwrap_or_default();
			let recipient = people
				.get(letter.to)
				.map(|p| p.name.clone())
				.unwrap_or_default();
			let content = letter.content.clone();
			let toggle = move |_| {
				expanded.update(|e| *e = if *e == Some(i) { None } else { Some(i) })
			};

			view! {
				<li class="letter-entry">
					<button class="letter-header" on:click=toggle>
						<span class="letter-title">{letter.title.clone()}</span>
						<span class="letter-parties">{format!("{sender} → {recipient}")}</span>
					</button>
					<Show when=move || expanded.get() == Some(i)>
						<iframe class="letter-content" src=content.clone()></iframe>
					</Show>
				</li>
			}
		})
		.collect_view();

	view! {
		<dialog id=id.element_id() class="modal" open=is_open>
			<div class="modal-box">
				<h3>{heading}</h3>
				<ul class="letters">{letters}</ul>
				<div class="modal-action">
					<button on:click=close>"Close"</button>
				</div>
			</div>
			<div class="modal-backdrop" on:click=close_backdrop></div>
		</dialog>
	}
}
