//! Particle species table.

use indexmap::IndexMap;

use cascade_core::{ItemMap, ParticleId};

/// One particle species.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleDef {
    /// Canonical name, e.g. `"e-"` or `"gamma"`.
    pub label: String,
    /// Rest mass [MeV].
    pub mass: f64,
    /// Charge in units of the elementary charge.
    pub charge: f64,
}

/// The particle table with label lookup.
#[derive(Clone, Debug, Default)]
pub struct ParticleParams {
    /// Species by id.
    pub particles: ItemMap<ParticleId, ParticleDef>,
    labels: IndexMap<String, ParticleId>,
}

impl ParticleParams {
    /// Build from species definitions; ids follow input order.
    pub fn new(defs: impl IntoIterator<Item = ParticleDef>) -> Self {
        let particles: ItemMap<ParticleId, ParticleDef> = defs.into_iter().collect();
        let labels = particles
            .iter()
            .map(|(id, def)| (def.label.clone(), id))
            .collect();
        Self { particles, labels }
    }

    /// Look up a species by label.
    pub fn find(&self, label: &str) -> Option<ParticleId> {
        self.labels.get(label).copied()
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Rest mass [MeV].
    pub fn mass(&self, id: ParticleId) -> f64 {
        self.particles[id].mass
    }

    /// Charge in elementary-charge units.
    pub fn charge(&self, id: ParticleId) -> f64 {
        self.particles[id].charge
    }

    /// Whether the species carries no charge.
    pub fn is_neutral(&self, id: ParticleId) -> bool {
        self.particles[id].charge == 0.0
    }

    /// Momentum [MeV/c] of a species with kinetic energy `energy`.
    pub fn momentum(&self, id: ParticleId, energy: f64) -> f64 {
        let m = self.mass(id);
        (energy * (energy + 2.0 * m)).sqrt()
    }

    /// Speed as a fraction of c for kinetic energy `energy`.
    pub fn beta(&self, id: ParticleId, energy: f64) -> f64 {
        let m = self.mass(id);
        if m == 0.0 {
            return 1.0;
        }
        let total = energy + m;
        self.momentum(id, energy) / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_particles() -> ParticleParams {
        ParticleParams::new([
            ParticleDef {
                label: "gamma".into(),
                mass: 0.0,
                charge: 0.0,
            },
            ParticleDef {
                label: "e-".into(),
                mass: 0.511,
                charge: -1.0,
            },
        ])
    }

    #[test]
    fn find_by_label() {
        let p = test_particles();
        assert_eq!(p.find("e-"), Some(ParticleId(1)));
        assert_eq!(p.find("mu-"), None);
    }

    #[test]
    fn massless_speed_is_c() {
        let p = test_particles();
        assert_eq!(p.beta(ParticleId(0), 1.0), 1.0);
    }

    #[test]
    fn electron_momentum_and_beta() {
        let p = test_particles();
        let e = ParticleId(1);
        // 1 MeV kinetic: p = sqrt(1 * (1 + 2*0.511)) ≈ 1.422 MeV/c
        let mom = p.momentum(e, 1.0);
        assert!((mom - 1.422f64).abs() < 1e-2);
        let beta = p.beta(e, 1.0);
        assert!(beta > 0.9 && beta < 1.0);
    }
}
