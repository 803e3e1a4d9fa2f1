//! Greedy vertical-lane packing for overlapping spans.

/// Result of packing a list of spans into lanes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Levels {
    /// Lane per input span, in input order.
    pub per_item: Vec<usize>,
    /// Total number of lanes used; drives the track height.
    pub lanes: usize,
}

/// Assigns a lane to every `(start, end)` span so that no two spans with
/// overlapping inclusive ranges share one. A lane is free for a span only
/// when the lane's previous occupant ends strictly before the span starts,
/// so a zero-length span (start == end) still occupies its lane.
///
/// Greedy, not minimal: spans are taken in input order and the lowest
/// qualifying lane wins. Candidate lanes are scanned newest-first.
pub fn assign_levels(spans: &[(i64, i64)]) -> Levels {
    let mut lane_ends: Vec<i64> = Vec::new();
    let mut per_item = Vec::with_capacity(spans.len());
    for &(start, end) in spans {
        let mut chosen = None;
        for lane in (0..lane_ends.len()).rev() {
            if start > lane_ends[lane] {
                chosen = Some(lane);
            }
        }
        match chosen {
            Some(lane) => {
                lane_ends[lane] = end;
                per_item.push(lane);
            }
            None => {
                lane_ends.push(end);
                per_item.push(lane_ends.len() - 1);
            }
        }
    }
    Levels {
        per_item,
        lanes: lane_ends.len(),
    }
}

/// Bond-path variant: lanes are reported 1-based because lane `k` places the
/// path's peak `k` rows above the baseline. Candidate lanes are scanned
/// oldest-first; the reuse rule is the same as [`assign_levels`].
pub fn assign_bond_levels(spans: &[(i64, i64)]) -> Levels {
    let mut lane_ends: Vec<i64> = Vec::new();
    let mut per_item = Vec::with_capacity(spans.len());
    for &(start, end) in spans {
        let mut chosen = None;
        for lane in 0..lane_ends.len() {
            if start > lane_ends[lane] {
                chosen = Some(lane);
                break;
            }
        }
        match chosen {
            Some(lane) => {
                lane_ends[lane] = end;
                per_item.push(lane + 1);
            }
            None => {
                lane_ends.push(end);
                per_item.push(lane_ends.len());
            }
        }
    }
    Levels {
        per_item,
        lanes: lane_ends.len(),
    }
}

/// Sorts spans (and anything riding along with them) by ascending start.
/// Tracks apply this before leveling unless the host opted out.
pub fn sort_by_start<T>(items: &mut [T], start: impl Fn(&T) -> i64) {
    items.sort_by_key(start);
}
