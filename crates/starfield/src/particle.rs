//! A single shooting star, and the viewport it travels across

use crate::random::RandomSource;

/// How far outside the viewport a particle can be before it's culled, in pixels.
pub const CULL_MARGIN: f64 = 20.0;

/// Every 100 pixels travelled makes a particle's length grow by its original length.
const GROWTH_DISTANCE: f64 = 100.0;

/// The visible area that particles travel across. [0, 0] is in the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[expect(
    clippy::exhaustive_structs,
    reason = "A viewport is only ever going to be a width and a height"
)]
pub struct Viewport {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Viewport {
    /// Instantiate
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Is the point inside the viewport, or at least within `CULL_MARGIN` of it? The boundary
    /// itself counts as inside.
    pub fn contains_with_margin(&self, (x, y): (f64, f64)) -> bool {
        (-CULL_MARGIN..=self.width + CULL_MARGIN).contains(&x)
            && (-CULL_MARGIN..=self.height + CULL_MARGIN).contains(&y)
    }
}

/// The edge of the viewport that a particle enters from. The edge decides the particle's
/// direction of travel, which is always diagonal, never along the edge itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Travels at 45°, down and to the right
    Top,
    /// Travels at 135°, down and to the left
    Right,
    /// Travels at 225°, up and to the left
    Bottom,
    /// Travels at 315°, up and to the right
    Left,
}

impl Edge {
    /// All the edges, in the order that random picks map onto.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Pick an edge uniformly at random.
    pub fn random(random: &mut impl RandomSource) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::as_conversions,
            reason = "The value is always in 0..4"
        )]
        let index = ((random.unit() * 4.0).floor() as usize).min(3);
        #[expect(clippy::indexing_slicing, reason = "The index is clamped to 0..=3")]
        Self::ALL[index]
    }

    /// The direction of travel in degrees.
    pub const fn angle(self) -> f64 {
        match self {
            Self::Top => 45.0,
            Self::Right => 135.0,
            Self::Bottom => 225.0,
            Self::Left => 315.0,
        }
    }

    /// The point on this edge that is `offset` of the way along it, where `offset` is in
    /// `[0, 1)`.
    pub fn origin(self, viewport: Viewport, offset: f64) -> (f64, f64) {
        match self {
            Self::Top => (offset * viewport.width, 0.0),
            Self::Right => (viewport.width, offset * viewport.height),
            Self::Bottom => (offset * viewport.width, viewport.height),
            Self::Left => (0.0, offset * viewport.height),
        }
    }
}

/// A shooting star. Its direction and speed are fixed the moment it's spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Unique for the lifetime of the simulation that spawned it
    id: u64,
    /// Current position
    position: (f64, f64),
    /// Where it came from, which also sets its direction
    edge: Edge,
    /// Pixels per tick
    speed: f64,
    /// The total distance travelled since spawning
    distance_traveled: f64,
}

impl Particle {
    /// Instantiate a particle that hasn't travelled anywhere yet.
    pub const fn new(id: u64, edge: Edge, position: (f64, f64), speed: f64) -> Self {
        Self {
            id,
            position,
            edge,
            speed,
            distance_traveled: 0.0,
        }
    }

    /// The particle's unique ID.
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Current position.
    pub const fn position(&self) -> (f64, f64) {
        self.position
    }

    /// The edge the particle entered from.
    pub const fn edge(&self) -> Edge {
        self.edge
    }

    /// Direction of travel in degrees.
    pub const fn angle(&self) -> f64 {
        self.edge.angle()
    }

    /// Distance travelled per tick.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Total distance travelled since spawning.
    pub const fn distance_traveled(&self) -> f64 {
        self.distance_traveled
    }

    /// How much longer the particle is than when it spawned.
    pub fn scale(&self) -> f64 {
        1.0 + self.distance_traveled / GROWTH_DISTANCE
    }

    /// Move one tick along the direction of travel.
    pub fn advance(&mut self) {
        let (sin, cos) = self.angle().to_radians().sin_cos();
        self.position.0 += self.speed * cos;
        self.position.1 += self.speed * sin;
        self.distance_traveled += self.speed;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::random::Scripted;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-2 && (actual.1 - expected.1).abs() < 1e-2,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn edges_map_to_angles() {
        let angles: Vec<f64> = Edge::ALL.iter().map(|edge| edge.angle()).collect();
        assert_eq!(angles, vec![45.0, 135.0, 225.0, 315.0]);
    }

    #[test]
    fn random_edges_cover_all_four() {
        let mut random = Scripted::new(&[0.0, 0.3, 0.5, 0.99]);
        let edges: Vec<Edge> = (0..4).map(|_| Edge::random(&mut random)).collect();
        assert_eq!(edges, Edge::ALL.to_vec());
    }

    #[test]
    fn origins_lie_on_their_edge() {
        let viewport = Viewport::new(200.0, 100.0);
        assert_close(Edge::Top.origin(viewport, 0.5), (100.0, 0.0));
        assert_close(Edge::Right.origin(viewport, 0.5), (200.0, 50.0));
        assert_close(Edge::Bottom.origin(viewport, 0.25), (50.0, 100.0));
        assert_close(Edge::Left.origin(viewport, 0.25), (0.0, 25.0));
    }

    #[test]
    fn advance_from_the_left_edge() {
        let mut particle = Particle::new(1, Edge::Left, (0.0, 50.0), 10.0);
        particle.advance();

        assert_close(particle.position(), (7.07, 42.93));
        assert!((particle.distance_traveled() - 10.0).abs() < TOLERANCE);
        assert!((particle.scale() - 1.1).abs() < TOLERANCE);
    }

    #[test]
    fn every_edge_moves_inwards() {
        let viewport = Viewport::new(100.0, 100.0);
        for edge in Edge::ALL {
            let mut particle = Particle::new(0, edge, edge.origin(viewport, 0.5), 5.0);
            particle.advance();
            let (x, y) = particle.position();
            let is_inside = (0.0..=100.0).contains(&x) && (0.0..=100.0).contains(&y);
            assert!(is_inside, "{edge:?} moved outside to {:?}", particle.position());
        }
    }

    #[test]
    fn margin_boundary_is_inclusive() {
        let viewport = Viewport::new(100.0, 100.0);
        assert!(viewport.contains_with_margin((-20.0, 120.0)));
        assert!(!viewport.contains_with_margin((-20.1, 50.0)));
        assert!(!viewport.contains_with_margin((50.0, 120.1)));
    }
}
