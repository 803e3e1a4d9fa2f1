//! Invertible linear map between sequence positions and pixel coordinates.

/// Continuous linear scale. The domain is in sequence units, the range in
/// pixels. Fractional outputs are intentional; rounding belongs to the
/// rendering surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, x: f64) -> f32 {
        let (d0, d1) = self.domain;
        if d1 == d0 {
            return self.range.0;
        }
        let frac = (x - d0) / (d1 - d0);
        let (r0, r1) = self.range;
        r0 + (r1 - r0) * frac as f32
    }

    pub fn invert(&self, px: f32) -> f64 {
        let (r0, r1) = self.range;
        if r1 == r0 {
            return self.domain.0;
        }
        let frac = ((px - r0) / (r1 - r0)) as f64;
        let (d0, d1) = self.domain;
        d0 + (d1 - d0) * frac
    }

    /// Rescales to a new visible extent; pixel range is untouched.
    pub fn set_domain(&mut self, domain: (f64, f64)) {
        self.domain = domain;
    }

    /// Applied on resize; the visible extent is untouched.
    pub fn set_range(&mut self, range: (f32, f32)) {
        self.range = range;
    }

    #[inline(always)]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[inline(always)]
    pub fn range(&self) -> (f32, f32) {
        self.range
    }
}
