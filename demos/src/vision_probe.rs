//! Prints an ASCII map of what a single agent can see.
//!
//! `@` is the agent, `#` a wall, `o` a visible spot, `x` an occluded one and `.` a spot outside
//! the vision cone or range.

use anyhow::Context;
use cgmath::{Deg, Vector3};
use log::LevelFilter;
use warden_app::prelude::*;

const HALF_SIZE: i32 = 22;

fn main() -> anyhow::Result<()> {
    init_logger(LevelFilter::Info);

    let mut world = CollisionWorld::new();
    let wall = Collider::new(
        Vector3::new(4.0, 0.0, 9.0),
        Vector3::new(3.0, 1.0, 0.5),
        OBSTACLE_TAG,
    );
    world.add(wall.clone()).context("adding the wall")?;
    let probe = world
        .add(Collider::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.4, 0.4, 0.4),
            TARGET_TAG,
        ))
        .context("adding the probe")?;

    let agent = Pose::with_yaw(Vector3::new(0.0, 0.0, 0.0), Deg(20.0));
    let config = PerceptionConfig::default();
    log::info!(
        "Probing range {} with a {} degree cone",
        config.vision_range,
        config.vision_half_angle * 2.0
    );

    let mut visible = 0;
    for z in (-HALF_SIZE..=HALF_SIZE).rev() {
        let mut row = String::with_capacity((HALF_SIZE * 2 + 1) as usize);
        for x in -HALF_SIZE..=HALF_SIZE {
            let point = Vector3::new(x as f32, 0.0, z as f32);

            if x == 0 && z == 0 {
                row.push('@');
                continue;
            }
            if wall.contains(point) {
                row.push('#');
                continue;
            }

            world
                .move_collider(probe, point)
                .context("moving the probe")?;
            let cell = match is_target_visible(&agent, &Pose::at(point), &config, &world, None) {
                Visibility::Visible(_) => {
                    visible += 1;
                    'o'
                }
                Visibility::NotVisible(Reason::Occluded { .. }) => 'x',
                Visibility::NotVisible(_) => '.',
            };
            row.push(cell);
        }
        println!("{}", row);
    }

    log::info!("{} spots visible", visible);
    Ok(())
}
