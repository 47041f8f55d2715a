use bevy::prelude::*;
use bevy::window::WindowResolution;

use cannonade::cannon::CannonPlugin;
use cannonade::cannonball::CannonballPlugin;
use cannonade::config::{self, SimConfig};
use cannonade::graphics;
use cannonade::particles::ParticlesPlugin;
use cannonade::rendering::RenderingPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Cannonade".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.07, 0.08, 0.12)))
        // Insert SimConfig with compiled defaults; load_sim_config will
        // overwrite it from assets/ballistics.toml (if present) in the
        // Startup schedule.
        .insert_resource(SimConfig::default())
        .add_plugins((
            ParticlesPlugin,
            CannonballPlugin,
            CannonPlugin,
            RenderingPlugin,
        ))
        // PreStartup so every plugin's Startup system sees the final values.
        .add_systems(PreStartup, config::load_sim_config)
        .add_systems(Startup, graphics::setup_camera)
        .run();
}
