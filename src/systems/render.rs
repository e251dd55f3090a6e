//! Raylib drawing of the scene.
//!
//! World units are metres with y pointing up; the screen has y pointing down,
//! so every world point is drawn at `(x, -y)` and angles are negated. The
//! camera transform comes from [`Camera2DRes`], refreshed each frame from the
//! scene's [`Camera`] entity.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::camera::Camera;
use crate::components::circlecollider::CircleCollider;
use crate::components::light::Light;
use crate::components::node::Node;
use crate::components::transform::Transform;
use crate::resources::camera2d::Camera2DRes;
use crate::resources::debugmode::DebugMode;
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::racestate::RaceState;
use crate::resources::screensize::ScreenSize;

fn to_screen(v: glam::Vec2) -> Vector2 {
    Vector2 { x: v.x, y: -v.y }
}

fn rgba(c: [u8; 4]) -> Color {
    Color::new(c[0], c[1], c[2], c[3])
}

/// Update the shared camera from the first [`Camera`] entity.
fn refresh_camera(world: &mut World) {
    let screen = *world.resource::<ScreenSize>();
    let view = {
        let mut q = world.query::<(&Camera, &Transform)>();
        q.iter(world).next().map(|(c, t)| (c.zoom, t.planar()))
    };
    let Some((zoom, target)) = view else {
        return;
    };
    let mut cam = world.resource_mut::<Camera2DRes>();
    cam.0.target = to_screen(target);
    cam.0.offset = Vector2 {
        x: screen.w as f32 * 0.5,
        y: screen.h as f32 * 0.5,
    };
    cam.0.zoom = zoom;
}

/// Exclusive system drawing one frame.
pub fn render_system(world: &mut World) {
    let Some(mut rl) = world.remove_non_send_resource::<RaylibHandle>() else {
        return;
    };
    let Some(thread) = world.remove_non_send_resource::<RaylibThread>() else {
        world.insert_non_send_resource(rl);
        return;
    };

    {
        let mut screen = world.resource_mut::<ScreenSize>();
        screen.w = rl.get_screen_width();
        screen.h = rl.get_screen_height();
    }
    refresh_camera(world);

    let background = {
        let mut q = world.query::<&Light>();
        q.iter(world)
            .next()
            .map(|l| rgba(l.rgba8()))
            .unwrap_or(Color::RAYWHITE)
    };
    let cam = world.resource::<Camera2DRes>().0;

    {
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(background);
        {
            let mut d2 = d.begin_mode2D(cam);
            render_pass(world, &mut d2);
        }
        render_hud(world, &mut d);
        render_debug_ui(world, &mut d);
    }

    world.insert_non_send_resource(thread);
    world.insert_non_send_resource(rl);
}

/// Draw every collider outline in camera space.
pub fn render_pass(world: &mut World, d2: &mut RaylibMode2D<RaylibDrawHandle>) {
    let boxes: Vec<(Transform, BoxCollider, Color)> = {
        let mut q = world.query::<(&Transform, &BoxCollider, Option<&Node>)>();
        q.iter(world)
            .map(|(t, b, n)| (*t, *b, n.map(|n| rgba(n.color)).unwrap_or(Color::GRAY)))
            .collect()
    };
    for (transform, collider, color) in boxes {
        let center = to_screen(transform.planar());
        let rect = Rectangle {
            x: center.x,
            y: center.y,
            width: collider.half_width * 2.0,
            height: (collider.half_height * 2.0).max(0.1),
        };
        let origin = Vector2 {
            x: collider.half_width,
            y: collider.half_height,
        };
        let color = if collider.sensor {
            Color::new(color.r, color.g, color.b, 100)
        } else {
            color
        };
        d2.draw_rectangle_pro(rect, origin, -transform.angle().to_degrees(), color);
    }

    let circles: Vec<(Transform, CircleCollider, Color)> = {
        let mut q = world.query::<(&Transform, &CircleCollider, Option<&Node>)>();
        q.iter(world)
            .map(|(t, c, n)| (*t, *c, n.map(|n| rgba(n.color)).unwrap_or(Color::GRAY)))
            .collect()
    };
    for (transform, collider, color) in circles {
        let center = to_screen(transform.planar());
        d2.draw_circle_v(center, collider.radius, color);
        // Spoke, so wheel rotation is visible.
        let (s, c) = transform.angle().sin_cos();
        let rim = to_screen(transform.planar() + glam::Vec2::new(c, s) * collider.radius);
        d2.draw_line_ex(center, rim, 0.1, Color::BLACK);
    }

    if world.contains_resource::<DebugMode>() {
        let mut positions = world.query::<(&Transform, &Node)>();
        for (transform, _) in positions.iter(world) {
            let p = to_screen(transform.planar());
            d2.draw_line_ex(
                Vector2 { x: p.x - 0.5, y: p.y },
                Vector2 { x: p.x + 0.5, y: p.y },
                0.05,
                Color::GREEN,
            );
            d2.draw_line_ex(
                Vector2 { x: p.x, y: p.y - 0.5 },
                Vector2 { x: p.x, y: p.y + 0.5 },
                0.05,
                Color::GREEN,
            );
        }
    }
}

fn render_hud(world: &mut World, d: &mut RaylibDrawHandle) {
    let screen = *world.resource::<ScreenSize>();
    d.draw_text("A/D drive, S reverse, ESC quit", 10, screen.h - 20, 10, Color::BLACK);
    if let Some(race) = world.get_resource::<RaceState>()
        && race.finished
    {
        let text = match race.finish_time {
            Some(t) => format!("FINISHED in {:.2}s", t),
            None => "FINISHED".to_string(),
        };
        d.draw_text(&text, screen.w / 2 - 80, 40, 30, Color::DARKGREEN);
    }
}

pub fn render_debug_ui(world: &mut World, d: &mut RaylibDrawHandle) {
    if !world.contains_resource::<DebugMode>() {
        return;
    }
    let screen = *world.resource::<ScreenSize>();

    let fps = d.get_fps();
    let text = format!("DEBUG MODE (press F11 to toggle) | FPS: {}", fps);
    d.draw_text(&text, 10, 10, 10, Color::BLACK);

    let entity_count = world.query::<Entity>().iter(world).count();
    let physics = world.resource::<PhysicsWorld>();
    let text = format!(
        "Entities: {} | Bodies: {} | Joints: {} | Steps: {}",
        entity_count,
        physics.body_count(),
        physics.joint_count(),
        physics.steps()
    );
    d.draw_text(&text, 10, 30, 10, Color::BLACK);

    let cam = world.resource::<Camera2DRes>().0;
    let cam_text = format!(
        "Camera pos: ({:.1}, {:.1}) Zoom: {:.2}",
        cam.target.x, -cam.target.y, cam.zoom
    );
    d.draw_text(&cam_text, 10, screen.h - 40, 10, Color::BLACK);
}
