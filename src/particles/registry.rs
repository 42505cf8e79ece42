use crate::particles::group::ParticleGroup;

/// The sole arena for particle groups. Groups (and through them every
/// renderable in the scene) are exclusively owned here; handles returned
/// by [`ParticleRegistry::add`] are indices into the arena. Effect
/// switches go through [`ParticleRegistry::clear`], which disposes every
/// renderable before emptying the arena, so no group of a stale effect is
/// ever observable alongside a new one.
#[derive(Debug, Default)]
pub struct ParticleRegistry {
    groups: Vec<ParticleGroup>,
}

impl ParticleRegistry {
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    pub fn add(&mut self, group: ParticleGroup) -> usize {
        self.groups.push(group);
        self.groups.len() - 1
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[ParticleGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [ParticleGroup] {
        &mut self.groups
    }

    /// Dispose every renderable, then empty the arena. This is the atomic
    /// clear half of an effect switch and of engine teardown.
    pub fn clear(&mut self) {
        for group in &mut self.groups {
            group.renderable.dispose();
        }
        self.groups.clear();
    }

    /// Live particle total: point-cloud groups contribute their buffer
    /// length / 3, mesh-backed groups contribute 1 each.
    pub fn particle_count(&self) -> usize {
        self.groups
            .iter()
            .map(|group| group.renderable.particle_contribution())
            .sum()
    }
}
