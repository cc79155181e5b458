//! Finite-difference spherical diffusion in one electrode particle.

use serde::{Deserialize, Serialize};

/// Solid diffusion in a sphere on a uniform radial grid.
///
/// Grid nodes sit at `r_j = j * dr`, `j = 0..=radial_nodes + 1`, with
/// `dr = radius / (radial_nodes + 1)`. Only the interior nodes carry state;
/// the centre node mirrors its neighbour (zero gradient) and the surface
/// node is set by the molar flux leaving the particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalParticle {
    pub radial_nodes: usize,
    pub radius_m: f64,
    pub diffusivity_m2_s: f64,
}

impl SphericalParticle {
    pub fn dr(&self) -> f64 {
        self.radius_m / (self.radial_nodes + 1) as f64
    }

    /// Largest eigenvalue magnitude of the interior diffusion operator (bound).
    pub fn stiffness(&self) -> f64 {
        4.0 * self.diffusivity_m2_s / (self.dr() * self.dr())
    }

    /// Full radial profile (centre and surface included) from interior state.
    ///
    /// `outward_flux` is mol m^-2 s^-1 leaving through the surface.
    pub fn profile(&self, interior: &[f64], outward_flux: f64) -> Vec<f64> {
        let n = self.radial_nodes;
        let mut c = Vec::with_capacity(n + 2);
        c.push(interior.first().copied().unwrap_or(0.0));
        c.extend_from_slice(interior);
        let surface_inner = interior.last().copied().unwrap_or(0.0);
        c.push(surface_inner - outward_flux * self.dr() / self.diffusivity_m2_s);
        c
    }

    /// Surface concentration for the given interior state and flux.
    pub fn surface(&self, interior: &[f64], outward_flux: f64) -> f64 {
        let surface_inner = interior.last().copied().unwrap_or(0.0);
        surface_inner - outward_flux * self.dr() / self.diffusivity_m2_s
    }

    /// Time derivative of the interior nodes, written to `out`.
    pub fn derivative(&self, interior: &[f64], outward_flux: f64, out: &mut [f64]) {
        let c = self.profile(interior, outward_flux);
        let k = self.diffusivity_m2_s / (self.dr() * self.dr());
        for (slot, j) in out.iter_mut().zip(1..=self.radial_nodes) {
            let jf = j as f64;
            *slot = k * ((1.0 + 1.0 / jf) * c[j + 1] - 2.0 * c[j] + (1.0 - 1.0 / jf) * c[j - 1]);
        }
    }
}
