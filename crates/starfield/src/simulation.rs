//! All the maths to move shooting stars across the viewport

use crate::config::stars::SimulatorConfig;
use crate::particle::{Edge, Particle, Viewport};
use crate::random::RandomSource;

/// The live set of shooting stars.
///
/// The live set is only ever changed as a whole, by a spawn or by a full tick, so anything that
/// reads `particles()` sees either the state before a tick or the state after it.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// The settings the simulation was started with
    config: SimulatorConfig,
    /// All the live particles, oldest first
    particles: Vec<Particle>,
    /// The ID that the next spawned particle gets
    next_id: u64,
}

impl Simulation {
    /// Initialise a new, empty simulation
    #[must_use]
    pub const fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            particles: Vec::new(),
            next_id: 0,
        }
    }

    /// The settings the simulation was started with.
    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// The current live set.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Add a new particle at a random point on a random edge of the viewport.
    pub fn spawn(&mut self, viewport: Viewport, random: &mut impl RandomSource) -> Particle {
        let edge = Edge::random(random);
        let origin = edge.origin(viewport, random.unit());
        let speed = random.between(self.config.min_speed(), self.config.max_speed());

        let particle = Particle::new(self.next_id, edge, origin, speed);
        self.next_id += 1;
        tracing::trace!("Spawned {particle:?}");

        self.particles.push(particle);
        particle
    }

    /// Move every particle one step, then remove all the ones that have left the viewport.
    /// Returns how many particles were removed.
    pub fn tick(&mut self, viewport: Viewport) -> usize {
        for particle in &mut self.particles {
            particle.advance();
        }

        let before = self.particles.len();
        self.particles
            .retain(|particle| viewport.contains_with_margin(particle.position()));
        before - self.particles.len()
    }

    /// Remove every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
