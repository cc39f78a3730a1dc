/// Largest number of nodes a single size mesh may hold.
///
/// Meshes are materialized in memory; beyond this the mesh size has to grow.
pub const MAX_NODES: usize = 10_000_000;

/// Number of evenly spaced nodes covering `width` with steps of roughly `step`.
///
/// The count is `floor(width / step) + 1`, so both endpoints are always included
/// and a span narrower than one step collapses to a single node. Negative or
/// non-finite spans also collapse to a single node.
#[inline]
pub fn node_count(width: f64, step: f64) -> usize {
    let steps = (width / step).floor();
    if steps.is_finite() && steps > 0.0 {
        (steps as usize).saturating_add(1)
    } else {
        1
    }
}

/// `node_count`, or `None` when it exceeds [`MAX_NODES`].
pub fn bounded_node_count(width: f64, step: f64) -> Option<usize> {
    let count = node_count(width, step);
    (count <= MAX_NODES).then_some(count)
}

/// Evenly spaced values over `[start, end]`, including both endpoints.
///
/// A count of one yields only `start`; a count of zero yields nothing.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
