use glam::Vec3;

/// A faint line between two particles closer than the link distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: u32,
    pub b: u32,
    /// 1 when the particles coincide, approaching 0 at the threshold.
    pub strength: f32,
}

/// Emit a link for every pair `i < j` strictly closer than `threshold`.
///
/// `out` is cleared and reused so the per-frame rebuild does not allocate
/// once it has grown to the working size. O(n²) in `positions.len()`.
pub fn build_links(positions: &[Vec3], threshold: f32, out: &mut Vec<Link>) {
    out.clear();
    if threshold <= 0.0 || !threshold.is_finite() {
        return;
    }
    let threshold_sq = threshold * threshold;
    for (i, pi) in positions.iter().enumerate() {
        for (j, pj) in positions.iter().enumerate().skip(i + 1) {
            let d2 = pi.distance_squared(*pj);
            if d2 < threshold_sq {
                out.push(Link {
                    a: i as u32,
                    b: j as u32,
                    strength: 1.0 - d2.sqrt() / threshold,
                });
            }
        }
    }
}
