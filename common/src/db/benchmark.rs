//! On-disk benchmark description: routing grid geometry plus two-pin nets.

use crate::db::core::{LayerDirection, Net};
use crate::geom::coord::Coord3D;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    #[error("failed to parse benchmark: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize benchmark: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("duplicate net name '{0}'")]
    DuplicateNet(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub direction: LayerDirection,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityOverride {
    pub cell: Coord3D,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub layers: Vec<LayerSpec>,
    pub columns: u32,
    pub rows: u32,
    /// `horizontal_dist[c]` is the pitch between column `c` and `c + 1`.
    pub horizontal_dist: Vec<u64>,
    /// `vertical_dist[r]` is the pitch between row `r` and `r + 1`.
    pub vertical_dist: Vec<u64>,
    pub via_cost: u64,
    #[serde(default)]
    pub capacity_overrides: Vec<CapacityOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetSpec {
    pub name: String,
    pub pin1: Coord3D,
    pub pin2: Coord3D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub grid: GridSpec,
    #[serde(default)]
    pub nets: Vec<NetSpec>,
}

impl Benchmark {
    pub fn from_toml_str(s: &str) -> Result<Self, BenchmarkError> {
        let bench: Benchmark = toml::from_str(s)?;
        let mut seen = HashSet::new();
        for net in &bench.nets {
            if !seen.insert(net.name.as_str()) {
                return Err(BenchmarkError::DuplicateNet(net.name.clone()));
            }
        }
        Ok(bench)
    }

    pub fn to_toml_string(&self) -> Result<String, BenchmarkError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read benchmark {:?}", path))?;
        let bench = Self::from_toml_str(&text)
            .with_context(|| format!("Invalid benchmark {:?}", path))?;
        log::info!(
            "Loaded benchmark {:?}: {} layers, {}x{} GCells, {} nets",
            path,
            bench.grid.layers.len(),
            bench.grid.columns,
            bench.grid.rows,
            bench.nets.len()
        );
        Ok(bench)
    }

    pub fn nets(&self) -> Vec<Net> {
        self.nets
            .iter()
            .map(|n| Net::new(n.name.clone(), n.pin1, n.pin2))
            .collect()
    }
}
