pub mod algo;
pub mod error;
pub mod global_router;
pub mod graph;
pub mod grid;
pub mod path;
pub mod utils;

use error::Result;
use global_router::RoutingOutcome;
use grid::DenseGrid;
use groute_common::db::benchmark::Benchmark;
use groute_common::util::config::Config;

/// Builds the grid described by `bench` and routes its nets.
pub fn route(bench: &Benchmark, config: &Config) -> Result<RoutingOutcome> {
    let mut grid = DenseGrid::new(&bench.grid)?;
    let nets = bench.nets();
    global_router::run(&mut grid, &nets, &config.global_routing)
}
