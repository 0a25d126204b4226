use cgmath::{Deg, Vector3};
use log::LevelFilter;
use warden_app::prelude::*;

#[tokio::main]
async fn main() -> EngineResult<()> {
    init_logger(LevelFilter::Info);

    let config = Config {
        name: "Patrol and chase",
        tick_rate: 30,
        seed: Some(42),
        max_ticks: Some(30 * 60),
    };

    // A 60 x 60 courtyard
    let mut navmesh = NavMesh::new(0.5)?;
    navmesh.add_floor(Vector3::new(0.0, 0.0, 0.0), 60.0, 60.0);
    let mut app = WardenApp::new(config, navmesh);

    // A few walls to hide behind
    app.add_obstacle(Vector3::new(0.0, 1.0, 10.0), Vector3::new(6.0, 1.0, 0.5))?;
    app.add_obstacle(Vector3::new(-12.0, 1.0, -4.0), Vector3::new(0.5, 1.0, 5.0))?;
    app.add_obstacle(Vector3::new(14.0, 1.0, -8.0), Vector3::new(3.0, 1.0, 3.0))?;

    // The target walks a loop around the courtyard
    app.set_target(
        Pose::at(Vector3::new(-20.0, 0.0, 20.0)),
        2.5,
        vec![
            Vector3::new(20.0, 0.0, 20.0),
            Vector3::new(20.0, 0.0, -20.0),
            Vector3::new(-20.0, 0.0, -20.0),
            Vector3::new(-20.0, 0.0, 20.0),
        ],
    )?;

    // Guards patrolling their own corners
    let guards = [
        (Vector3::new(-15.0, 0.0, -15.0), Deg(45.0)),
        (Vector3::new(15.0, 0.0, 15.0), Deg(225.0)),
        (Vector3::new(0.0, 0.0, 0.0), Deg(0.0)),
    ];
    for (position, yaw) in guards {
        let agent = AgentConfig {
            patrol: PatrolConfig::Area(PatrolArea::new(position, 10.0, 10.0)),
            ..AgentConfig::default()
        };
        app.add_agent(agent, Pose::with_yaw(position, yaw), 3.5)?;
    }

    app.run().await?;

    for overlay in app.overlays() {
        log::info!(
            "{} ended {} at {:?}, last saw the target at {:?}",
            overlay.id,
            overlay.overlay.state,
            overlay.pose.position,
            overlay.overlay.last_known
        );
    }

    Ok(())
}
