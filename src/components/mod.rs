/// Animated node network drawn behind the page.
pub mod network;
