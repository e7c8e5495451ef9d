use leptos::prelude::*;

use crate::components::network::NetworkBackground;

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

			<NetworkBackground node_count=80 max_connections=4 line_opacity=0.15 />
			<div class="network-overlay">
				<h1>"Nearest-Neighbor Network"</h1>
				<p class="subtitle">"Nodes drift and reconnect to their closest peers. Hover a node to highlight it."</p>
			</div>
		</ErrorBoundary>
	}
}
