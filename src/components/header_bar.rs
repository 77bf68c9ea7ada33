use leptos::prelude::*;

/// Static branding strip shown above the graph. No state, no data.
#[component]
pub fn HeaderBar() -> impl IntoView {
	view! {
		<header class="header-bar">
			<h1>"EnglishNetwork"</h1>
		</header>
	}
}
