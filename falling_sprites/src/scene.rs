//! Scene construction in logical units, scaled into backing-store pixels

use glam::{UVec2, Vec2};
use hidpi::ScaleContext;
use rand::Rng;

use crate::physics::{Bodies, Body, BodyOptions, BodyRender, Sprite};

/// Downward gravity in logical pixels per second squared
pub const GRAVITY: f32 = 980.0;

/// Logical size of the sprite boxes, equal to the 1x texture
pub const IMAGE_SIZE: Vec2 = Vec2::new(216.0, 270.0);

pub const IMAGE_1X: (&str, UVec2) = ("image.png", UVec2::new(216, 270));
pub const IMAGE_2X: (&str, UVec2) = ("image@2x.png", UVec2::new(432, 540));

/// Scale a logical scalar into the f32 world units used by the engine.
fn d(scale: &ScaleContext, value: f32) -> f32 {
    scale.scale(value as f64) as f32
}

/// A sprite stretched over a body of `size` backing pixels.
pub fn sprite_for(texture: (&'static str, UVec2), size: Vec2) -> Sprite {
    let (name, texture_size) = texture;
    Sprite {
        texture: name,
        texture_size,
        x_scale: size.x / texture_size.x as f32,
        y_scale: size.y / texture_size.y as f32,
    }
}

fn sprite_box(scale: &ScaleContext, x: f32, texture: (&'static str, UVec2), tint: [f32; 4]) -> Body {
    let size = scale.scale_vec2(IMAGE_SIZE);
    Bodies::rectangle(
        d(scale, x),
        d(scale, 150.0),
        size.x,
        size.y,
        BodyOptions {
            restitution: 0.8,
            friction: 0.005,
            render: BodyRender {
                fill: tint,
                sprite: Some(sprite_for(texture, size)),
            },
            ..Default::default()
        },
    )
}

/// Two sprite boxes above a static floor.
pub fn build_scene(scale: &ScaleContext) -> Vec<Body> {
    let image = sprite_box(scale, 320.0, IMAGE_1X, [1.0, 0.62, 0.3, 1.0]);
    let image_2x = sprite_box(scale, 480.0, IMAGE_2X, [0.3, 0.85, 0.8, 1.0]);

    let floor = Bodies::rectangle(
        d(scale, 400.0),
        d(scale, 550.0),
        d(scale, 800.0),
        d(scale, 20.0),
        BodyOptions {
            is_static: true,
            render: BodyRender {
                fill: [1.0, 1.0, 1.0, 1.0],
                sprite: None,
            },
            ..Default::default()
        },
    );

    vec![image, image_2x, floor]
}

pub fn gravity(scale: &ScaleContext) -> Vec2 {
    scale.scale_vec2(Vec2::new(0.0, GRAVITY))
}

/// A plain box of random size dropped from the top of a `width` logical pixel wide view.
pub fn random_box(scale: &ScaleContext, width: f32, rng: &mut impl Rng) -> Body {
    let size = 20.0 + rng.gen::<f32>() * 60.0;
    let x = size + rng.gen::<f32>() * (width - 2.0 * size).max(0.0);
    let color = [
        0.4 + 0.6 * rng.gen::<f32>(),
        0.4 + 0.6 * rng.gen::<f32>(),
        0.4 + 0.6 * rng.gen::<f32>(),
        1.0,
    ];

    Bodies::rectangle(
        d(scale, x),
        d(scale, -size),
        d(scale, size),
        d(scale, size),
        BodyOptions {
            restitution: 0.3,
            render: BodyRender {
                fill: color,
                sprite: None,
            },
            ..Default::default()
        },
    )
}
