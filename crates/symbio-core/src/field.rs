//! Scalar field Φ - the 2-D activation grid pulses perturb and agents explore.
//!
//! Each cell holds an activation value and a decomposition of that value by
//! contributing tag. Tags ride along with diffusion and decay so hotspots can
//! report which concepts (or which agent roles) built them up.
//!
//! Diffusion is deliberately asymmetric at the border: a cell averages only
//! the cardinal neighbours that exist. The field is not mass-conserving.

use crate::error::{Result, SymbioError};
use crate::types::*;

/// Tag contributions at or below this magnitude are dropped.
pub const TAG_EPSILON: f64 = 1e-6;

/// Dense row-major activation grid with per-cell tag imprints.
#[derive(Debug, Clone)]
pub struct ScalarField {
    shape: FieldShape,
    phi: Vec<f64>,
    imprint: Vec<TagMap>,
}

impl ScalarField {
    /// Create a zeroed field. Both dimensions must be positive.
    pub fn new(shape: FieldShape) -> Result<Self> {
        if shape.height == 0 || shape.width == 0 {
            return Err(SymbioError::invalid_config(
                "field.shape",
                shape,
                "dimensions must be positive",
            ));
        }
        Ok(Self {
            shape,
            phi: vec![0.0; shape.cells()],
            imprint: vec![TagMap::new(); shape.cells()],
        })
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    #[inline]
    fn idx(&self, y: usize, x: usize) -> usize {
        let FieldShape { height, width } = self.shape;
        assert!(y < height && x < width, "cell ({y}, {x}) outside {height}x{width} field");
        y * width + x
    }

    /// Activation at a cell.
    ///
    /// # Panics
    ///
    /// Panics if `(y, x)` lies outside the field.
    pub fn value(&self, y: usize, x: usize) -> f64 {
        self.phi[self.idx(y, x)]
    }

    /// Tag decomposition at a cell.
    ///
    /// # Panics
    ///
    /// Panics if `(y, x)` lies outside the field.
    pub fn tags(&self, y: usize, x: usize) -> &TagMap {
        &self.imprint[self.idx(y, x)]
    }

    /// Row-major activations.
    pub fn values(&self) -> &[f64] {
        &self.phi
    }

    /// Sum of all activations.
    pub fn total_energy(&self) -> f64 {
        self.phi.iter().sum()
    }

    /// First cell (row-major) holding the maximum activation.
    pub fn max_cell(&self) -> Option<(Coord, f64)> {
        let mut best: Option<(Coord, f64)> = None;
        for y in 0..self.shape.height {
            for x in 0..self.shape.width {
                let v = self.value(y, x);
                if best.map_or(true, |(_, b)| v > b) {
                    best = Some(((y as i64, x as i64), v));
                }
            }
        }
        best
    }

    /// Add to a single cell's activation without touching its tags.
    ///
    /// # Panics
    ///
    /// Panics if `(y, x)` lies outside the field.
    pub fn add(&mut self, y: usize, x: usize, delta: f64) {
        let i = self.idx(y, x);
        self.phi[i] += delta;
    }

    /// Add a gaussian bump centred on the pulse to every cell.
    ///
    /// Dense full-grid addition, no wraparound. Cells receiving a positive
    /// amount also accumulate it under the pulse tag.
    pub fn inject_gaussian(&mut self, pulse: &Pulse) {
        let (cy, cx) = (pulse.position.0 as f64, pulse.position.1 as f64);
        let sigma2 = pulse.spread.max(1e-3).powi(2);
        for y in 0..self.shape.height {
            for x in 0..self.shape.width {
                let dy = y as f64 - cy;
                let dx = x as f64 - cx;
                let g = pulse.amplitude * (-(dy * dy + dx * dx) / (2.0 * sigma2)).exp();
                let i = self.idx(y, x);
                self.phi[i] += g;
                if g > 0.0 {
                    *self.imprint[i].entry(pulse.tag.clone()).or_insert(0.0) += g;
                }
            }
        }
    }

    /// One diffusion step toward the mean of the existing cardinal neighbours.
    ///
    /// The pull is summed as neighbour differences, so a uniform field is
    /// left bit-for-bit unchanged.
    pub fn relax(&mut self, alpha: f64) {
        let FieldShape { height: h, width: w } = self.shape;
        let mut new_phi = vec![0.0; self.phi.len()];
        let mut new_imprint = Vec::with_capacity(self.imprint.len());

        for y in 0..h {
            for x in 0..w {
                let mut neighbours = Vec::with_capacity(4);
                if y > 0 {
                    neighbours.push(self.idx(y - 1, x));
                }
                if y < h - 1 {
                    neighbours.push(self.idx(y + 1, x));
                }
                if x > 0 {
                    neighbours.push(self.idx(y, x - 1));
                }
                if x < w - 1 {
                    neighbours.push(self.idx(y, x + 1));
                }

                let i = self.idx(y, x);
                new_phi[i] = if neighbours.is_empty() {
                    self.phi[i]
                } else {
                    let pull = neighbours.iter().map(|&n| self.phi[n] - self.phi[i]).sum::<f64>()
                        / neighbours.len() as f64;
                    self.phi[i] + alpha * pull
                };

                let neighbour_tags: Vec<&TagMap> =
                    neighbours.iter().map(|&n| &self.imprint[n]).collect();
                new_imprint.push(diffuse_tags(&self.imprint[i], &neighbour_tags, alpha));
            }
        }

        self.phi = new_phi;
        self.imprint = new_imprint;
    }

    /// Scale every activation and tag contribution by `max(0, 1 - rate)`.
    pub fn evaporate(&mut self, rate: f64) {
        let factor = (1.0 - rate).max(0.0);
        for v in &mut self.phi {
            *v *= factor;
        }
        for cell in &mut self.imprint {
            cell.retain(|_, c| {
                *c *= factor;
                *c >= TAG_EPSILON
            });
        }
    }

    /// Every cell with activation at or above `threshold`, row-major.
    pub fn hotspots(&self, threshold: f64) -> Vec<Hotspot> {
        let mut spots = Vec::new();
        for y in 0..self.shape.height {
            for x in 0..self.shape.width {
                let i = self.idx(y, x);
                if self.phi[i] >= threshold {
                    spots.push(Hotspot {
                        position: (y as i64, x as i64),
                        value: self.phi[i],
                        tags: self.imprint[i].clone(),
                    });
                }
            }
        }
        spots
    }
}

/// Diffuse a cell's tag map with the same rule as its activation.
fn diffuse_tags(center: &TagMap, neighbours: &[&TagMap], alpha: f64) -> TagMap {
    if neighbours.is_empty() {
        return center.clone();
    }

    let mut keys: Vec<&String> = center.keys().collect();
    for n in neighbours {
        keys.extend(n.keys());
    }
    keys.sort();
    keys.dedup();

    let mut updated = TagMap::new();
    for tag in keys {
        let base = center.get(tag).copied().unwrap_or(0.0);
        let pull = neighbours
            .iter()
            .map(|n| n.get(tag).copied().unwrap_or(0.0) - base)
            .sum::<f64>()
            / neighbours.len() as f64;
        let value = base + alpha * pull;
        if value > TAG_EPSILON {
            updated.insert(tag.clone(), value);
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field(h: usize, w: usize) -> ScalarField {
        ScalarField::new(FieldShape::new(h, w)).unwrap()
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(ScalarField::new(FieldShape::new(0, 4)).is_err());
        assert!(ScalarField::new(FieldShape::new(4, 0)).is_err());
    }

    #[test]
    fn injection_tags_every_touched_cell() {
        let mut f = field(16, 16);
        f.inject_gaussian(&Pulse::new((8, 8), 1.0, 2.0, "test"));
        assert!((f.value(8, 8) - 1.0).abs() < 1e-12);
        assert!((f.tags(8, 8)["test"] - 1.0).abs() < 1e-12);
        assert!(f.tags(0, 0).contains_key("test"));
    }

    #[test]
    fn injection_then_relax_and_evaporate_stays_bounded() {
        let mut f = field(16, 16);
        let before = f.total_energy();
        f.inject_gaussian(&Pulse::new((8, 8), 1.0, 2.0, "test"));
        assert!(f.total_energy() > before);
        f.relax(0.2);
        f.evaporate(0.1);
        let peak = f.values().iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(peak < 1.5);
    }

    #[test]
    fn full_evaporation_clears_everything() {
        let mut f = field(6, 5);
        f.inject_gaussian(&Pulse::new((2, 2), 3.0, 1.0, "a"));
        f.inject_gaussian(&Pulse::new((4, 1), 1.0, 2.0, "b"));
        f.evaporate(1.0);
        assert!(f.values().iter().all(|&v| v == 0.0));
        for y in 0..6 {
            for x in 0..5 {
                assert!(f.tags(y, x).is_empty());
            }
        }
    }

    #[test]
    fn relax_spreads_toward_neighbours() {
        let mut f = field(3, 3);
        f.add(1, 1, 4.0);
        f.relax(0.5);
        // Centre moves halfway toward the mean of four zero neighbours.
        assert!((f.value(1, 1) - 2.0).abs() < 1e-12);
        // Edge cell (0,1) has three neighbours, one of which held 4.0.
        assert!((f.value(0, 1) - 0.5 * 4.0 / 3.0).abs() < 1e-12);
        // Corner sees no mass.
        assert_eq!(f.value(0, 0), 0.0);
    }

    #[test]
    fn relax_diffuses_tags_and_drops_tiny_entries() {
        let mut f = field(1, 3);
        f.inject_gaussian(&Pulse::new((0, 0), 1.0, 0.01, "spark"));
        assert!(!f.tags(0, 2).contains_key("spark"));
        f.relax(0.5);
        assert!(f.tags(0, 1).contains_key("spark"));
        assert!(!f.tags(0, 2).contains_key("spark"));
    }

    #[test]
    fn single_cell_field_is_unchanged_by_relax() {
        let mut f = field(1, 1);
        f.inject_gaussian(&Pulse::new((0, 0), 2.0, 1.0, "solo"));
        f.relax(0.9);
        assert!((f.value(0, 0) - 2.0).abs() < 1e-12);
        assert!((f.tags(0, 0)["solo"] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn hotspots_are_row_major_and_carry_tags() {
        let mut f = field(4, 4);
        f.add(3, 0, 1.0);
        f.add(0, 3, 2.0);
        let spots = f.hotspots(0.5);
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].position, (0, 3));
        assert_eq!(spots[1].position, (3, 0));
        assert!(spots[0].tags.is_empty());
    }

    #[test]
    #[should_panic]
    fn value_outside_the_field_panics() {
        field(3, 4).value(3, 0);
    }

    #[test]
    #[should_panic]
    fn add_outside_the_field_panics() {
        field(3, 4).add(0, 4, 1.0);
    }

    #[test]
    fn max_cell_prefers_first_in_row_major_order() {
        let mut f = field(3, 3);
        f.add(2, 2, 1.0);
        f.add(1, 0, 1.0);
        assert_eq!(f.max_cell(), Some(((1, 0), 1.0)));
    }

    proptest! {
        #[test]
        fn injection_raises_the_pulse_centre(
            h in 1usize..24,
            w in 1usize..24,
            amp in 0.01f64..10.0,
            spread in 0.01f64..8.0,
            fy in 0.0f64..1.0,
            fx in 0.0f64..1.0,
        ) {
            let mut f = field(h, w);
            let y = ((h - 1) as f64 * fy) as usize;
            let x = ((w - 1) as f64 * fx) as usize;
            let before = f.value(y, x);
            f.inject_gaussian(&Pulse::new((y as i64, x as i64), amp, spread, "p"));
            prop_assert!(f.value(y, x) > before);
        }

        #[test]
        fn relax_is_a_no_op_on_uniform_fields(
            h in 1usize..16,
            w in 1usize..16,
            level in -5.0f64..5.0,
            alpha in 0.0f64..1.0,
        ) {
            let mut f = field(h, w);
            for y in 0..h {
                for x in 0..w {
                    f.add(y, x, level);
                }
            }
            let before = f.values().to_vec();
            f.relax(alpha);
            prop_assert_eq!(f.values(), before.as_slice());
        }
    }
}
