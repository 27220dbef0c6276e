//! Primary-Axis Flex Distribution
//!
//! Distributes remaining space across flexed items proportionally to their
//! weights, clamping each share to the item's min/max and reflowing the
//! freed space over the items that are still unclamped.

pub(crate) const EPSILON: f32 = 0.001;

/// One flexed item's inputs, in declared order
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexEntry {
    pub weight: f32,
    pub min: Option<f32>,
    pub max: Option<f32>,
}

/// Clamp `value` to optional bounds. Max is applied last, so it wins when
/// the bounds are contradictory.
pub(crate) fn clamp_opt(value: f32, min: Option<f32>, max: Option<f32>) -> f32 {
    let mut out = value;
    if let Some(min) = min {
        out = out.max(min);
    }
    if let Some(max) = max {
        out = out.min(max);
    }
    out
}

/// Distribute `space` across `entries` proportionally to weight.
///
/// Redistribution scans in declared order: the first entry whose share
/// violates a bound is frozen at the clamped value, then the remainder
/// reflows over the entries still unfrozen, until stable or none remain.
/// When every weight is zero the space is split evenly.
///
/// Shares are snapped to whole pixels by cumulative rounding, so they sum
/// to the rounded free space and each stays within 1px of its exact share,
/// residual pixels going to earlier entries.
pub fn distribute(space: f32, entries: &[FlexEntry]) -> Vec<f32> {
    let n = entries.len();
    if n == 0 {
        return Vec::new();
    }
    let space = space.max(0.0);

    let total_weight: f32 = entries.iter().map(|e| e.weight.max(0.0)).sum();
    let weights: Vec<f32> = if total_weight <= 0.0 {
        vec![1.0; n]
    } else {
        entries.iter().map(|e| e.weight.max(0.0)).collect()
    };

    let mut shares = vec![0.0f32; n];
    let mut frozen = vec![false; n];
    let mut frozen_total = 0.0f32;

    loop {
        let live_weight: f32 = (0..n).filter(|&i| !frozen[i]).map(|i| weights[i]).sum();
        if live_weight <= 0.0 {
            break;
        }
        let free = (space - frozen_total).max(0.0);

        let mut clamped = false;
        for i in 0..n {
            if frozen[i] {
                continue;
            }
            let share = free * weights[i] / live_weight;
            let bounded = clamp_opt(share, entries[i].min, entries[i].max);
            if (bounded - share).abs() > EPSILON {
                shares[i] = bounded;
                frozen[i] = true;
                frozen_total += bounded;
                clamped = true;
                break;
            }
            shares[i] = share;
        }
        if !clamped {
            break;
        }
    }

    snap(&mut shares, &frozen, entries);
    shares
}

/// Pixel-snap the unfrozen shares by cumulative rounding. Each item gets
/// `round(prefix) - assigned_so_far`, so drift from an earlier rounding (or
/// a bound hit during snapping) flows forward instead of accumulating.
fn snap(shares: &mut [f32], frozen: &[bool], entries: &[FlexEntry]) {
    let mut exact_prefix = 0.0f32;
    let mut assigned = 0.0f32;
    for i in 0..shares.len() {
        if frozen[i] {
            continue;
        }
        exact_prefix += shares[i];
        let give = (exact_prefix.round() - assigned).max(0.0);
        shares[i] = clamp_opt(give, entries[i].min, entries[i].max);
        assigned += shares[i];
    }
}
