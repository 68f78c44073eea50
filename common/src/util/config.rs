use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global_routing: GlobalRoutingConfig,
    #[serde(default)]
    pub input: InputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global_routing: GlobalRoutingConfig::default(),
            input: InputConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchAlgorithm {
    Astar,
    Dijkstra,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalRoutingConfig {
    #[serde(default = "default_gr_max_iterations")]
    pub max_iterations: usize,
    /// Wall-clock budget, measured from router setup (graph construction
    /// included). Checked between iterations.
    #[serde(default = "default_gr_time_limit")]
    pub time_limit_secs: u64,
    #[serde(default = "default_stagnation_threshold")]
    pub stagnation_threshold: usize,
    #[serde(default = "default_escape_grace")]
    pub escape_grace_iterations: usize,
    #[serde(default = "default_refinement_iterations")]
    pub refinement_iterations: usize,
    #[serde(default = "default_gr_history_increment")]
    pub history_increment: u64,
    #[serde(default = "default_gr_history_scale")]
    pub history_scale: u64,
    #[serde(default = "default_overflow_weight")]
    pub overflow_weight: u64,
    #[serde(default = "default_congestion_scale")]
    pub congestion_scale: u64,
    #[serde(default = "default_overflow_exponent_cap")]
    pub overflow_exponent_cap: u32,
    #[serde(default = "default_history_decay")]
    pub history_decay: f64,
    #[serde(default = "default_algorithm")]
    pub algorithm: SearchAlgorithm,
}

impl Default for GlobalRoutingConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_gr_max_iterations(),
            time_limit_secs: default_gr_time_limit(),
            stagnation_threshold: default_stagnation_threshold(),
            escape_grace_iterations: default_escape_grace(),
            refinement_iterations: default_refinement_iterations(),
            history_increment: default_gr_history_increment(),
            history_scale: default_gr_history_scale(),
            overflow_weight: default_overflow_weight(),
            congestion_scale: default_congestion_scale(),
            overflow_exponent_cap: default_overflow_exponent_cap(),
            history_decay: default_history_decay(),
            algorithm: default_algorithm(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_benchmark_file")]
    pub benchmark_file: String,
    #[serde(default = "default_output_route")]
    pub output_route: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            benchmark_file: default_benchmark_file(),
            output_route: default_output_route(),
        }
    }
}

fn default_gr_max_iterations() -> usize {
    100
}

fn default_gr_time_limit() -> u64 {
    580
}

fn default_stagnation_threshold() -> usize {
    20
}

fn default_escape_grace() -> usize {
    3
}

fn default_refinement_iterations() -> usize {
    5
}

fn default_gr_history_increment() -> u64 {
    1
}

fn default_gr_history_scale() -> u64 {
    500
}

fn default_overflow_weight() -> u64 {
    100_000
}

fn default_congestion_scale() -> u64 {
    50
}

fn default_overflow_exponent_cap() -> u32 {
    20
}

fn default_history_decay() -> f64 {
    0.9
}

fn default_algorithm() -> SearchAlgorithm {
    SearchAlgorithm::Astar
}

fn default_benchmark_file() -> String {
    "inputs/benchmark.toml".to_string()
}

fn default_output_route() -> String {
    "output/benchmark.route".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[global_routing]
max_iterations = 7
algorithm = "dijkstra"
"#,
        )
        .unwrap();
        assert_eq!(cfg.global_routing.max_iterations, 7);
        assert_eq!(cfg.global_routing.algorithm, SearchAlgorithm::Dijkstra);
        assert_eq!(cfg.global_routing.overflow_exponent_cap, 20);
        assert_eq!(cfg.input.output_route, "output/benchmark.route");
    }
}
