use leptos::prelude::*;

use crate::components::header_bar::HeaderBar;
use crate::components::network_graph::{Dimension, NetworkGraph};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<HeaderBar />
			<main class="graph-page">
				<NetworkGraph width=Dimension::Vw(96.0) height=Dimension::Vh(84.0) />
			</main>
		</ErrorBoundary>
	}
}
