use crate::db::core::{Net, RoutedNet, RoutingResult};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

fn check_net(net: &Net, routed: &RoutedNet) -> Result<(), String> {
    if routed.name != net.name {
        return Err(format!(
            "routed name '{}' does not match net '{}'",
            routed.name, net.name
        ));
    }

    if routed.segments.is_empty() {
        if net.pin1 == net.pin2 {
            return Ok(());
        }
        return Err(format!("net '{}' has no segments", net.name));
    }

    let first = routed.segments[0].from;
    let last = routed.segments[routed.segments.len() - 1].to;
    if first != net.pin1 || last != net.pin2 {
        return Err(format!(
            "net '{}' runs {} -> {} but pins are {} -> {}",
            net.name, first, last, net.pin1, net.pin2
        ));
    }

    for (i, seg) in routed.segments.iter().enumerate() {
        if !seg.is_well_formed() {
            return Err(format!(
                "net '{}' segment {} ({} -> {}) is not axis-aligned",
                net.name, i, seg.from, seg.to
            ));
        }
        if i > 0 && routed.segments[i - 1].to != seg.from {
            return Err(format!(
                "net '{}' is disconnected between segments {} and {}",
                net.name,
                i - 1,
                i
            ));
        }
    }
    Ok(())
}

/// Verifies that every routed net connects its pins with a chain of
/// axis-aligned segments.
pub fn run_route_check(nets: &[Net], result: &RoutingResult) -> Result<(), String> {
    log::info!("Starting Route Verification...");

    if nets.len() != result.nets.len() {
        return Err(format!(
            "{} nets but {} routed entries",
            nets.len(),
            result.nets.len()
        ));
    }

    let valid = AtomicBool::new(true);
    nets.par_iter()
        .zip(result.nets.par_iter())
        .for_each(|(net, routed)| {
            if let Err(msg) = check_net(net, routed) {
                log::error!("FAIL: {}", msg);
                valid.store(false, Ordering::Relaxed);
            }
        });

    if valid.load(Ordering::Relaxed) {
        log::info!("Route verification passed ({} nets).", nets.len());
        Ok(())
    } else {
        Err("Route verification failed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::core::Segment;
    use crate::geom::coord::Coord3D;

    fn c(layer: u8, col: u32, row: u32) -> Coord3D {
        Coord3D::new(layer, col, row)
    }

    #[test]
    fn accepts_connected_route() {
        let net = Net::new("a", c(0, 0, 0), c(1, 2, 1));
        let routed =
            RoutedNet::from_path("a", &[c(0, 0, 0), c(0, 1, 0), c(0, 2, 0), c(1, 2, 0), c(1, 2, 1)]);
        let result = RoutingResult { nets: vec![routed] };
        assert!(run_route_check(&[net], &result).is_ok());
    }

    #[test]
    fn rejects_wrong_endpoint() {
        let net = Net::new("a", c(0, 0, 0), c(0, 3, 0));
        let routed = RoutedNet::from_path("a", &[c(0, 0, 0), c(0, 1, 0)]);
        assert!(check_net(&net, &routed).is_err());
    }

    #[test]
    fn rejects_diagonal_and_gaps() {
        let net = Net::new("a", c(0, 0, 0), c(0, 2, 2));
        let diagonal = RoutedNet {
            name: "a".into(),
            segments: vec![Segment::new(c(0, 0, 0), c(0, 2, 2))],
        };
        assert!(check_net(&net, &diagonal).is_err());

        let gap = RoutedNet {
            name: "a".into(),
            segments: vec![
                Segment::new(c(0, 0, 0), c(0, 2, 0)),
                Segment::new(c(0, 2, 1), c(0, 2, 2)),
            ],
        };
        assert!(check_net(&net, &gap).is_err());
    }

    #[test]
    fn degenerate_net_needs_no_segments() {
        let net = Net::new("dot", c(1, 4, 4), c(1, 4, 4));
        let result = RoutingResult {
            nets: vec![RoutedNet::from_path("dot", &[c(1, 4, 4)])],
        };
        assert!(run_route_check(&[net], &result).is_ok());
    }
}
