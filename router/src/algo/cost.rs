use crate::grid::RoutingGrid;
use groute_common::util::config::GlobalRoutingConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostParams {
    /// Flat penalty once a GCell is at or over capacity.
    pub overflow_weight: u64,
    /// Multiplier on `2^overflow`.
    pub congestion_scale: u64,
    pub overflow_exponent_cap: u32,
    pub history_scale: u64,
}

impl Default for CostParams {
    fn default() -> Self {
        Self::from_config(&GlobalRoutingConfig::default())
    }
}

impl CostParams {
    pub fn from_config(config: &GlobalRoutingConfig) -> Self {
        Self {
            overflow_weight: config.overflow_weight,
            congestion_scale: config.congestion_scale,
            // Keep the shift inside u64.
            overflow_exponent_cap: config.overflow_exponent_cap.min(62),
            history_scale: config.history_scale,
        }
    }
}

/// Congestion cost charged for entering a GCell.
///
/// Free while `demand < capacity`. Entering a full GCell costs
/// `overflow_weight + 2^min(demand - capacity, cap) * congestion_scale`, so
/// any path with spare capacity is strongly preferred. History adds
/// `history * history_scale` regardless of current demand.
pub fn vertex_cost(demand: u32, capacity: u32, history: u64, params: &CostParams) -> u64 {
    let history_term = history.saturating_mul(params.history_scale);
    if demand < capacity {
        return history_term;
    }
    let exponent = (demand - capacity).min(params.overflow_exponent_cap);
    let congestion = (1u64 << exponent)
        .saturating_mul(params.congestion_scale)
        .saturating_add(params.overflow_weight);
    congestion.saturating_add(history_term)
}

/// Snapshot of [`vertex_cost`] for every GCell. Valid for one search only.
pub fn compute_vertex_costs<G: RoutingGrid + ?Sized>(
    grid: &G,
    history: &[u64],
    params: &CostParams,
) -> Vec<u64> {
    (0..grid.num_gcells())
        .map(|i| {
            vertex_cost(
                grid.demand_by_index(i),
                grid.capacity_by_index(i),
                history[i],
                params,
            )
        })
        .collect()
}
