//! Negotiated-congestion rip-up and reroute.
//!
//! Nets are routed one at a time against the live demand left by every net
//! before them. After each sweep the overflow is scored, history is charged
//! on overfull GCells, and the best solution seen so far is kept. The loop
//! ends on zero overflow (after a few wirelength refinement sweeps), on the
//! iteration cap, or on the wall-clock budget. When progress stalls, every
//! net is rerouted once.

use crate::algo::cost::{CostParams, compute_vertex_costs};
use crate::algo::heuristic::PitchHeuristic;
use crate::algo::search;
use crate::error::{Result, RouterError};
use crate::graph::{Graph, build_graph_from_grid};
use crate::grid::RoutingGrid;
use crate::path::{extract_path, fallback_path};
use crate::utils::wirelength::total_cost;
use groute_common::db::core::{Net, RoutedNet, RoutingResult};
use groute_common::db::indices::NetId;
use groute_common::geom::coord::Coord3D;
use groute_common::util::config::GlobalRoutingConfig;
use groute_common::util::profiler::ScopedTimer;
use std::time::{Duration, Instant};

/// Solution quality, compared lexicographically: overflow, then wirelength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    pub overflow: u64,
    pub cost: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Converged,
    IterationLimit,
    TimeLimit,
}

#[derive(Clone, Debug)]
pub struct IterationStats {
    pub iteration: usize,
    pub score: Score,
    pub best: Score,
    pub rerouted: usize,
    /// Every net was rerouted to escape stagnation.
    pub forced: bool,
    pub fallbacks: usize,
}

#[derive(Clone, Debug)]
pub struct RoutingStats {
    pub iterations: Vec<IterationStats>,
    pub stop_reason: StopReason,
    pub best: Score,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct RoutingOutcome {
    pub result: RoutingResult,
    /// GCell walk of each net, parallel to `result.nets`.
    pub paths: Vec<Vec<Coord3D>>,
    pub stats: RoutingStats,
}

#[derive(Clone)]
struct Snapshot {
    score: Score,
    result: RoutingResult,
    paths: Vec<Vec<Coord3D>>,
}

enum Verdict {
    Continue,
    Stop(StopReason),
}

/// Owns the grid, graph and history for one routing run.
pub struct RipUpRerouter<'a, G: RoutingGrid + ?Sized> {
    grid: &'a mut G,
    nets: &'a [Net],
    config: &'a GlobalRoutingConfig,
    params: CostParams,
    graph: Graph,
    heuristic: PitchHeuristic,
    history: Vec<u64>,
    paths: Vec<Vec<Coord3D>>,
    current: RoutingResult,
    static_order: Vec<usize>,
    best: Option<Snapshot>,
    // Stagnation is measured against this; an escape clears it, `best` stays.
    reference: Option<Score>,
    stagnation: usize,
    grace: usize,
    force_reroute_all: bool,
    refinement_left: usize,
    fallbacks: usize,
    // Started in `new`, so graph construction counts against the budget.
    timer: ScopedTimer,
}

impl<'a, G: RoutingGrid + ?Sized> RipUpRerouter<'a, G> {
    pub fn new(
        grid: &'a mut G,
        nets: &'a [Net],
        config: &'a GlobalRoutingConfig,
    ) -> Result<Self> {
        let timer = ScopedTimer::new("Global routing");
        let num_gcells = grid.num_gcells();
        if num_gcells == 0 {
            return Err(RouterError::EmptyGrid);
        }
        for net in nets {
            for pin in [net.pin1, net.pin2] {
                if !grid.contains(pin) {
                    return Err(RouterError::PinOutOfBounds {
                        net: net.name.clone(),
                        pin,
                        layers: grid.num_layers(),
                        columns: grid.x_size(),
                        rows: grid.y_size(),
                    });
                }
            }
        }

        grid.reset_demand();
        let graph = {
            let _timer = ScopedTimer::with_level("GR graph construction", log::Level::Debug);
            build_graph_from_grid(&*grid)
        };
        let heuristic = PitchHeuristic::new(&*grid);

        // Short nets first: they have the fewest alternatives.
        let mut static_order: Vec<usize> = (0..nets.len()).collect();
        static_order.sort_by_key(|&i| (nets[i].span(), i));

        Ok(Self {
            grid,
            nets,
            config,
            params: CostParams::from_config(config),
            graph,
            heuristic,
            history: vec![0; num_gcells],
            paths: vec![Vec::new(); nets.len()],
            current: RoutingResult::with_nets(nets.len()),
            static_order,
            best: None,
            reference: None,
            stagnation: 0,
            grace: 0,
            force_reroute_all: false,
            refinement_left: config.refinement_iterations,
            fallbacks: 0,
            timer,
        })
    }

    pub fn run(mut self) -> Result<RoutingOutcome> {
        let time_limit = Duration::from_secs(self.config.time_limit_secs);
        let max_iterations = self.config.max_iterations.max(1);
        let mut iterations = Vec::new();
        let mut stop_reason = StopReason::IterationLimit;
        let mut last_overflow = u64::MAX;

        log::info!(
            "GR: Routing {} nets on {} GCells ({:?})...",
            self.nets.len(),
            self.grid.num_gcells(),
            self.config.algorithm
        );

        for iteration in 1..=max_iterations {
            let start = Instant::now();
            let forced = self.force_reroute_all;
            let order = self.net_order(iteration, last_overflow);
            self.force_reroute_all = false;

            let fallbacks_before = self.fallbacks;
            for &net_idx in &order {
                self.reroute_net(net_idx)?;
            }

            let score = self.evaluate(iteration);
            last_overflow = score.overflow;
            let best = self.best_score();

            log::info!(
                "GR Iter {}: Overflow: {}, Cost: {}, Best: {}/{}, Rerouted: {}{}, Time: {}ms",
                iteration,
                score.overflow,
                score.cost,
                best.overflow,
                best.cost,
                order.len(),
                if forced { " (forced)" } else { "" },
                start.elapsed().as_millis()
            );

            iterations.push(IterationStats {
                iteration,
                score,
                best,
                rerouted: order.len(),
                forced,
                fallbacks: self.fallbacks - fallbacks_before,
            });

            if let Verdict::Stop(reason) =
                self.check_stop(iteration, max_iterations, self.timer.elapsed(), time_limit)
            {
                stop_reason = reason;
                break;
            }
        }

        let best = match self.best.take() {
            Some(snapshot) => snapshot,
            None => Snapshot {
                score: Score {
                    overflow: self.grid.total_overflow(),
                    cost: total_cost(&*self.grid, &self.current),
                },
                result: self.current.clone(),
                paths: self.paths.clone(),
            },
        };
        self.restore(&best)?;

        match stop_reason {
            StopReason::Converged => log::info!(
                "Global Routing Converged after {} iterations (cost {}).",
                iterations.len(),
                best.score.cost
            ),
            reason => {
                if best.score.overflow > 0 {
                    log::warn!(
                        "GR: Stopped on {:?} with overflow {}. Returning best solution (cost {}).",
                        reason,
                        best.score.overflow,
                        best.score.cost
                    );
                } else {
                    log::info!(
                        "GR: Stopped on {:?} with a legal solution (cost {}).",
                        reason,
                        best.score.cost
                    );
                }
            }
        }

        Ok(RoutingOutcome {
            result: best.result,
            paths: best.paths,
            stats: RoutingStats {
                iterations,
                stop_reason,
                best: best.score,
                elapsed: self.timer.elapsed(),
            },
        })
    }

    fn best_score(&self) -> Score {
        self.best.as_ref().map_or(
            Score {
                overflow: u64::MAX,
                cost: u64::MAX,
            },
            |b| b.score,
        )
    }

    /// Iteration 1 and legal states sweep all nets in static order. Otherwise
    /// only nets touching an overfull GCell are rerouted, most hits first,
    /// unless a stagnation escape asks for every net.
    fn net_order(&self, iteration: usize, last_overflow: u64) -> Vec<usize> {
        if iteration == 1 || (last_overflow == 0 && !self.force_reroute_all) {
            return self.static_order.clone();
        }

        let hits: Vec<usize> = self
            .paths
            .iter()
            .map(|path| path.iter().filter(|&&c| self.grid.is_overfull(c)).count())
            .collect();

        let mut order: Vec<usize> = self
            .static_order
            .iter()
            .copied()
            .filter(|&i| self.force_reroute_all || hits[i] > 0)
            .collect();
        // Stable, so equal scores keep the static order.
        order.sort_by(|&a, &b| hits[b].cmp(&hits[a]));
        order
    }

    fn reroute_net(&mut self, net_idx: usize) -> Result<()> {
        let nets = self.nets;
        let net = &nets[net_idx];
        let id = NetId::new(net_idx);

        let old = std::mem::take(&mut self.paths[net_idx]);
        for &c in &old {
            self.grid.remove_demand_for_net_gcell(id, c)?;
        }

        let costs = compute_vertex_costs(&*self.grid, &self.history, &self.params);
        let source = self.grid.gcell_index(net.pin1);
        let target = self.grid.gcell_index(net.pin2);
        let found = search(
            self.config.algorithm,
            &self.graph,
            &self.heuristic,
            source,
            target,
            &costs,
        );

        let path = match extract_path(&*self.grid, &found, source, target) {
            Ok(path) => path,
            Err(e) => {
                if e.is_malformed_chain() {
                    log::error!("GR: Malformed search result for net '{}': {}", net.name, e);
                } else {
                    log::warn!("GR: Using fallback route for net '{}': {}", net.name, e);
                }
                self.fallbacks += 1;
                fallback_path(&*self.grid, net)
            }
        };

        log::debug!(
            "GR: net '{}' routed through {} GCells (search cost {})",
            net.name,
            path.len(),
            found.dist[target]
        );

        for &c in &path {
            self.grid.add_demand_for_net_gcell(id, c);
        }
        self.current.set(id, RoutedNet::from_path(net.name.clone(), &path));
        self.paths[net_idx] = path;
        Ok(())
    }

    fn evaluate(&mut self, iteration: usize) -> Score {
        let escalate = self.best_score().overflow != 0;
        let increment = if escalate {
            self.config
                .history_increment
                .saturating_mul(iteration as u64)
        } else {
            0
        };

        let mut overflow = 0u64;
        for i in 0..self.grid.num_gcells() {
            let over = self.grid.overflow_by_index(i);
            if over > 0 {
                overflow += over as u64;
                self.history[i] = self.history[i].saturating_add(increment);
            }
        }

        let score = Score {
            overflow,
            cost: total_cost(&*self.grid, &self.current),
        };

        let won = self.best.as_ref().is_none_or(|b| score < b.score);
        if won {
            self.best = Some(Snapshot {
                score,
                result: self.current.clone(),
                paths: self.paths.clone(),
            });
            if score.overflow == 0 {
                for h in &mut self.history {
                    *h >>= 1;
                }
            }
        } else if self.best_score().overflow == 0 {
            let decay = self.config.history_decay;
            for h in &mut self.history {
                *h = (*h as f64 * decay) as u64;
            }
        }

        let in_grace = self.grace > 0;
        self.grace = self.grace.saturating_sub(1);
        if self.reference.is_none_or(|r| score < r) {
            self.reference = Some(score);
            self.stagnation = 0;
        } else if !in_grace {
            self.stagnation += 1;
        }

        score
    }

    fn check_stop(
        &mut self,
        iteration: usize,
        max_iterations: usize,
        elapsed: Duration,
        time_limit: Duration,
    ) -> Verdict {
        if self.best_score().overflow == 0 {
            if self.refinement_left == 0 {
                return Verdict::Stop(StopReason::Converged);
            }
            self.refinement_left -= 1;
        }
        if iteration >= max_iterations {
            return Verdict::Stop(StopReason::IterationLimit);
        }
        if elapsed >= time_limit {
            log::warn!(
                "GR: Time limit reached ({:.1}s) after iter {}",
                elapsed.as_secs_f32(),
                iteration
            );
            return Verdict::Stop(StopReason::TimeLimit);
        }
        let threshold = self.config.stagnation_threshold;
        if threshold > 0 && self.stagnation >= threshold {
            log::warn!(
                "GR: Stagnation detected ({} iterations without progress), rerouting all nets",
                self.stagnation
            );
            self.force_reroute_all = true;
            self.stagnation = 0;
            self.reference = None;
            self.grace = self.config.escape_grace_iterations;
        }
        Verdict::Continue
    }

    /// Puts the grid demand back to the snapshot's paths.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.paths == self.paths {
            return Ok(());
        }
        for (idx, path) in self.paths.iter().enumerate() {
            for &c in path {
                self.grid.remove_demand_for_net_gcell(NetId::new(idx), c)?;
            }
        }
        for (idx, path) in snapshot.paths.iter().enumerate() {
            for &c in path {
                self.grid.add_demand_for_net_gcell(NetId::new(idx), c);
            }
        }
        self.paths = snapshot.paths.clone();
        self.current = snapshot.result.clone();
        Ok(())
    }
}

/// Routes `nets` on `grid`. Demand left on the grid matches the returned
/// solution.
pub fn run<G: RoutingGrid + ?Sized>(
    grid: &mut G,
    nets: &[Net],
    config: &GlobalRoutingConfig,
) -> Result<RoutingOutcome> {
    RipUpRerouter::new(grid, nets, config)?.run()
}
