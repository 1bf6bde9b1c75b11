//! Turn the live set into a scene that can be drawn. This never changes the simulation.

use starfield_protocol::{Gradient, GradientStop, Scene, StarShape};

use crate::config::stars::SimulatorConfig;
use crate::particle::{Particle, Viewport};
use crate::simulation::Simulation;

/// The ID that every star references its fill by.
pub const GRADIENT_ID: &str = "gradient";

/// Build the scene for the current state of the simulation.
pub fn render(simulation: &Simulation, viewport: Viewport) -> Scene {
    let config = simulation.config();
    let stars = simulation
        .particles()
        .iter()
        .map(|particle| star_shape(config, particle))
        .collect();

    Scene::builder()
        .width(viewport.width)
        .height(viewport.height)
        .maybe_class_name(config.class_name().map(ToOwned::to_owned))
        .gradient(gradient(config))
        .stars(stars)
        .build()
}

/// A star's rectangle grows longer as it travels, but never thicker. It's rotated around its own
/// centre.
pub fn star_shape(config: &SimulatorConfig, particle: &Particle) -> StarShape {
    let (x, y) = particle.position();
    let width = config.star_width() * particle.scale();
    let height = config.star_height();

    StarShape::builder()
        .id(particle.id())
        .x(x)
        .y(y)
        .width(width)
        .height(height)
        .rotation(particle.angle())
        .origin((x + width / 2.0, y + height / 2.0))
        .build()
}

/// Fade from a transparent trail to a solid head.
fn gradient(config: &SimulatorConfig) -> Gradient {
    Gradient::builder()
        .id(GRADIENT_ID.to_owned())
        .start(
            GradientStop::builder()
                .offset(0.0)
                .colour(config.trail_color())
                .opacity(0.0)
                .build(),
        )
        .end(
            GradientStop::builder()
                .offset(1.0)
                .colour(config.star_color())
                .opacity(1.0)
                .build(),
        )
        .build()
}

#[cfg(test)]
#[expect(clippy::float_cmp, reason = "Tests aren't so strict")]
mod test {
    use super::*;
    use crate::config::stars::StarsConfig;
    use crate::particle::Edge;
    use crate::random::Scripted;

    #[test]
    fn star_grows_longer_but_not_thicker() {
        let config = SimulatorConfig::default();
        let mut particle = Particle::new(3, Edge::Top, (10.0, 0.0), 50.0);
        particle.advance();

        let shape = star_shape(&config, &particle);

        assert_eq!(shape.id, 3);
        assert_eq!(shape.width, 20.0 * 1.5);
        assert_eq!(shape.height, 1.0);
        assert_eq!(shape.rotation, 45.0);
        assert_eq!(shape.origin, (shape.x + 15.0, shape.y + 0.5));
    }

    #[test]
    fn scene_has_every_live_star_in_order() {
        let config = SimulatorConfig::new(&StarsConfig {
            class_name: Some("sky".to_owned()),
            ..StarsConfig::default()
        })
        .unwrap();
        let viewport = Viewport::new(400.0, 300.0);
        let mut simulation = Simulation::new(config);
        let mut random = Scripted::new(&[0.0, 0.5, 0.5, 0.5, 0.5, 0.5]);
        simulation.spawn(viewport, &mut random);
        simulation.spawn(viewport, &mut random);

        let scene = render(&simulation, viewport);

        assert_eq!((scene.width, scene.height), (400.0, 300.0));
        assert_eq!(scene.class_name.as_deref(), Some("sky"));
        let ids: Vec<u64> = scene.stars.iter().map(|star| star.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn gradient_fades_from_trail_to_star() {
        let scene = render(
            &Simulation::new(SimulatorConfig::default()),
            Viewport::new(1.0, 1.0),
        );

        assert_eq!(scene.gradient.id, GRADIENT_ID);
        assert_eq!(scene.gradient.start.colour, (0x2E, 0xB9, 0xDF));
        assert_eq!(scene.gradient.start.opacity, 0.0);
        assert_eq!(scene.gradient.end.colour, (0x9E, 0x00, 0xFF));
        assert_eq!(scene.gradient.end.opacity, 1.0);
        assert!(scene.stars.is_empty());
    }
}
