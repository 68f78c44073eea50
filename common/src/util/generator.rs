use crate::db::benchmark::{Benchmark, GridSpec, LayerSpec, NetSpec};
use crate::db::core::LayerDirection;
use crate::geom::coord::Coord3D;
use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct GeneratorParams {
    pub layers: u8,
    pub columns: u32,
    pub rows: u32,
    pub nets: usize,
    pub capacity: u32,
    pub seed: u64,
}

/// Builds a random benchmark. Layers alternate H/V starting with H, pitches
/// vary per column and row, and pins are drawn uniformly over the grid.
pub fn random_benchmark(params: &GeneratorParams) -> Benchmark {
    let mut rng = StdRng::seed_from_u64(params.seed);

    let layers = (0..params.layers.max(1))
        .map(|l| LayerSpec {
            direction: if l % 2 == 0 {
                LayerDirection::Horizontal
            } else {
                LayerDirection::Vertical
            },
            capacity: params.capacity,
        })
        .collect();

    let columns = params.columns.max(1);
    let rows = params.rows.max(1);
    let horizontal_dist = (0..columns).map(|_| rng.gen_range(4000..6000)).collect();
    let vertical_dist = (0..rows).map(|_| rng.gen_range(4000..6000)).collect();

    let mut nets = Vec::with_capacity(params.nets);
    for i in 0..params.nets {
        let pin1 = Coord3D::new(
            rng.gen_range(0..params.layers.max(1)),
            rng.gen_range(0..columns),
            rng.gen_range(0..rows),
        );
        let pin2 = Coord3D::new(
            rng.gen_range(0..params.layers.max(1)),
            rng.gen_range(0..columns),
            rng.gen_range(0..rows),
        );
        nets.push(NetSpec {
            name: format!("net{}", i),
            pin1,
            pin2,
        });
    }

    Benchmark {
        grid: GridSpec {
            layers,
            columns,
            rows,
            horizontal_dist,
            vertical_dist,
            via_cost: rng.gen_range(2000..4000),
            capacity_overrides: Vec::new(),
        },
        nets,
    }
}

pub fn generate_random_benchmark(path: &Path, params: &GeneratorParams) -> anyhow::Result<()> {
    log::info!(
        "Generating Benchmark: {} layers, {}x{} GCells, {} nets, capacity {} (seed {})",
        params.layers,
        params.columns,
        params.rows,
        params.nets,
        params.capacity,
        params.seed
    );
    let text = random_benchmark(params).to_toml_string()?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
