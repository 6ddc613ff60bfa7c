//! Axis-aligned rigid box physics

use glam::{UVec2, Vec2};

/// A textured fill for a body, scaled from texture texels to body pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub texture: &'static str,
    pub texture_size: UVec2,
    pub x_scale: f32,
    pub y_scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyRender {
    pub fill: [f32; 4],
    pub sprite: Option<Sprite>,
}

impl Default for BodyRender {
    fn default() -> Self {
        Self {
            fill: [0.6, 0.6, 0.65, 1.0],
            sprite: None,
        }
    }
}

/// Construction options for [`Bodies::rectangle`]
#[derive(Debug, Clone, Copy)]
pub struct BodyOptions {
    pub restitution: f32,
    pub friction: f32,
    pub is_static: bool,
    pub render: BodyRender,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.1,
            is_static: false,
            render: BodyRender::default(),
        }
    }
}

/// A rigid box. `position` is its center.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub half_extents: Vec2,
    pub restitution: f32,
    pub friction: f32,
    pub is_static: bool,
    pub render: BodyRender,
}

impl Body {
    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    /// Mass is proportional to area; static bodies are immovable.
    pub fn inverse_mass(&self) -> f32 {
        let area = self.size().x * self.size().y;
        if self.is_static || area <= 0.0 {
            0.0
        } else {
            1.0 / area
        }
    }
}

/// Body factories
pub struct Bodies;

impl Bodies {
    pub fn rectangle(x: f32, y: f32, width: f32, height: f32, options: BodyOptions) -> Body {
        Body {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            half_extents: Vec2::new(width, height) * 0.5,
            restitution: options.restitution,
            friction: options.friction,
            is_static: options.is_static,
            render: options.render,
        }
    }
}

/// The physics world
pub struct Engine {
    pub bodies: Vec<Body>,
    pub gravity: Vec2,
    /// Fraction of the remaining overlap corrected per step
    pub correction: f32,
}

impl Engine {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            bodies: Vec::new(),
            gravity,
            correction: 0.8,
        }
    }

    pub fn add(&mut self, bodies: impl IntoIterator<Item = Body>) {
        self.bodies.extend(bodies);
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Step the simulation forward by dt seconds
    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.iter_mut().filter(|b| !b.is_static) {
            body.velocity += self.gravity * dt;
            body.position += body.velocity * dt;
        }

        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.bodies[i].is_static && self.bodies[j].is_static {
                    continue;
                }
                let (mut a, mut b) = (self.bodies[i], self.bodies[j]);
                if resolve_contact(&mut a, &mut b, self.correction) {
                    self.bodies[i] = a;
                    self.bodies[j] = b;
                }
            }
        }
    }
}

/// Separate two overlapping boxes and exchange impulses. Returns whether they touched.
fn resolve_contact(a: &mut Body, b: &mut Body, correction: f32) -> bool {
    let delta = b.position - a.position;
    let overlap = a.half_extents + b.half_extents - delta.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return false;
    }

    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum == 0.0 {
        return false;
    }

    // Normal points from a to b along the axis of least penetration.
    let (normal, depth) = if overlap.x < overlap.y {
        (Vec2::new(delta.x.signum(), 0.0), overlap.x)
    } else {
        (Vec2::new(0.0, delta.y.signum()), overlap.y)
    };

    let push = normal * depth * correction / inv_sum;
    a.position -= push * inv_a;
    b.position += push * inv_b;

    let relative = b.velocity - a.velocity;
    let normal_speed = relative.dot(normal);
    if normal_speed >= 0.0 {
        return true;
    }

    let restitution = a.restitution.max(b.restitution);
    let normal_impulse = -(1.0 + restitution) * normal_speed / inv_sum;
    a.velocity -= normal * normal_impulse * inv_a;
    b.velocity += normal * normal_impulse * inv_b;

    let tangent = normal.perp();
    let tangent_speed = (b.velocity - a.velocity).dot(tangent);
    let friction = a.friction.min(b.friction);
    let max_friction = friction * normal_impulse;
    let tangent_impulse = (-tangent_speed / inv_sum).clamp(-max_friction, max_friction);
    a.velocity -= tangent * tangent_impulse * inv_a;
    b.velocity += tangent * tangent_impulse * inv_b;

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> Body {
        Bodies::rectangle(
            400.0,
            550.0,
            800.0,
            20.0,
            BodyOptions {
                is_static: true,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_rectangle_is_centered() {
        let body = Bodies::rectangle(10.0, 20.0, 30.0, 40.0, BodyOptions::default());
        assert_eq!(body.position, Vec2::new(10.0, 20.0));
        assert_eq!(body.size(), Vec2::new(30.0, 40.0));
        assert_eq!(body.restitution, 0.0);
        assert_eq!(body.friction, 0.1);
    }

    #[test]
    fn test_static_bodies_do_not_move() {
        let mut engine = Engine::new(Vec2::new(0.0, 980.0));
        engine.add([floor()]);
        for _ in 0..120 {
            engine.step(DT);
        }
        assert_eq!(engine.bodies[0].position, Vec2::new(400.0, 550.0));
        assert_eq!(engine.bodies[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_box_comes_to_rest_on_floor() {
        let mut engine = Engine::new(Vec2::new(0.0, 980.0));
        engine.add([
            Bodies::rectangle(400.0, 100.0, 50.0, 50.0, BodyOptions::default()),
            floor(),
        ]);
        for _ in 0..600 {
            engine.step(DT);
        }

        let body = engine.bodies[0];
        // Floor top is at 540, box half height is 25.
        assert!((body.position.y - 515.0).abs() < 2.0, "box at {}", body.position.y);
        assert!(body.velocity.y.abs() < 20.0, "box still moving: {}", body.velocity.y);
        assert_eq!(body.position.x, 400.0);
    }

    #[test]
    fn test_restitution_bounces() {
        let mut engine = Engine::new(Vec2::ZERO);
        let mut ball = Bodies::rectangle(
            400.0,
            525.0,
            20.0,
            20.0,
            BodyOptions {
                restitution: 0.8,
                ..Default::default()
            },
        );
        ball.velocity = Vec2::new(0.0, 600.0);
        engine.add([ball, floor()]);

        engine.step(DT);

        let velocity = engine.bodies[0].velocity;
        assert!(velocity.y < 0.0, "expected a bounce, got {}", velocity.y);
        assert!((velocity.y + 480.0).abs() < 1.0);
    }

    #[test]
    fn test_separated_bodies_ignore_each_other() {
        let mut a = Bodies::rectangle(0.0, 0.0, 10.0, 10.0, BodyOptions::default());
        let mut b = Bodies::rectangle(20.0, 0.0, 10.0, 10.0, BodyOptions::default());
        assert!(!resolve_contact(&mut a, &mut b, 0.8));
    }
}
