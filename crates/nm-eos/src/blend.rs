//! Smooth interpolation weights that stitch the sub-models together.

/// Blend-function parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlendParameters {
    /// Quadratic fugacity coefficient of the degeneracy blend.
    pub a_virial: f64,
    /// Cross-term fugacity coefficient of the degeneracy blend.
    pub b_virial: f64,
    /// Logistic steepness of the density blend, fm³.
    pub gamma: f64,
    /// Saturation density the density blend is centered on (at 1.5·n0).
    pub n0: f64,
}

impl Default for BlendParameters {
    fn default() -> Self {
        Self {
            a_virial: 3.0,
            b_virial: 0.0,
            gamma: 20.0,
            n0: 0.16,
        }
    }
}

impl BlendParameters {
    /// Density blend h(nb): 1 in the QMC regime, 0 in the neutron-star
    /// regime, centered at 1.5·n0.
    pub fn h(&self, nb: f64) -> f64 {
        1.0 / (1.0 + (self.gamma * (nb - 1.5 * self.n0)).exp())
    }

    /// dh/dnb.
    pub fn dh_dnb(&self, nb: f64) -> f64 {
        let ex = (self.gamma * (nb - 1.5 * self.n0)).exp();
        -self.gamma * ex / ((1.0 + ex) * (1.0 + ex))
    }

    /// Degeneracy blend g(zn, zp): 1 in the virial regime (vanishing
    /// fugacities), decaying toward 0 as matter becomes degenerate.
    pub fn g(&self, zn: f64, zp: f64) -> f64 {
        1.0 / (self.a_virial * (zn * zn + zp * zp) + self.b_virial * zn * zp + 1.0)
    }
}
