//! Browser entry point: mounts the [`App`] to the document body.

use network_background::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
