use serde::Serialize;

/// Affine map from a domain interval onto a range interval.
///
/// A zero-width domain maps every value to the start of the range, so a
/// one-day chart puts its only point at `range[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Range value back to the domain
    pub fn invert(&self, position: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return d0;
        }
        d0 + (position - r0) / span * (d1 - d0)
    }

    /// `count` evenly spaced domain values, both ends included.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [d0, d1] = self.domain;
        match count {
            0 => Vec::new(),
            1 => vec![d0],
            _ => {
                let step = (d1 - d0) / (count - 1) as f64;
                let mut values: Vec<f64> = (0..count - 1).map(|i| d0 + step * i as f64).collect();
                values.push(d1);
                values
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_maps_ends() {
        let scale = LinearScale::new([0.0, 4.0], [0.0, 400.0]);
        assert_eq!(scale.apply(0.0), 0.0);
        assert_eq!(scale.apply(4.0), 400.0);
        assert_eq!(scale.apply(1.0), 100.0);
    }

    #[test]
    fn test_inverted_range() {
        let scale = LinearScale::new([-5.0, 25.0], [140.0, 0.0]);
        assert_eq!(scale.apply(-5.0), 140.0);
        assert_eq!(scale.apply(25.0), 0.0);
        assert!(scale.apply(20.0) < scale.apply(10.0));
    }

    #[test]
    fn test_zero_width_domain() {
        let scale = LinearScale::new([0.0, 0.0], [0.0, 320.0]);
        assert_eq!(scale.apply(0.0), 0.0);
        assert!(scale.apply(3.0).is_finite());
    }

    #[test]
    fn test_invert() {
        let scale = LinearScale::new([-5.0, 25.0], [140.0, 0.0]);
        assert!((scale.invert(scale.apply(12.0)) - 12.0).abs() < 1e-9);
        let flat = LinearScale::new([3.0, 9.0], [10.0, 10.0]);
        assert_eq!(flat.invert(10.0), 3.0);
    }

    #[test]
    fn test_ticks() {
        let scale = LinearScale::new([-5.0, 5.0], [100.0, 0.0]);
        assert_eq!(scale.ticks(5), vec![-5.0, -2.5, 0.0, 2.5, 5.0]);
        assert_eq!(scale.ticks(1), vec![-5.0]);
        assert!(scale.ticks(0).is_empty());
    }
}
