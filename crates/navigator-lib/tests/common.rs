use std::path::PathBuf;

use navigator_lib::{load_network, Navigator, NavigatorOptions, RoadNetwork};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn fixture_network() -> RoadNetwork {
    load_network(&fixtures_dir().join("minimal_road_network.json")).expect("fixture loads")
}

pub fn fixture_navigator(options: NavigatorOptions) -> Navigator {
    Navigator::new(fixture_network(), options)
}
