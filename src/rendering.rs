//! Rendering systems: gizmo overlays, per-ball air-time labels, and the HUD.
//!
//! ## Layer Model
//!
//! | Layer               | Technology | Default | Controlled by          |
//! |---------------------|------------|---------|------------------------|
//! | Cannonball fill     | `Mesh2d`   | always  | destroy fade alpha     |
//! | Cannonball rim      | Gizmos     | always  | destroy fade alpha     |
//! | Trajectory curve    | Gizmos     | ON      | `TrajectoryDisplay`    |
//! | Trajectory marker   | Gizmos     | ON      | `TrajectoryDisplay`    |
//! | Air-time label      | `Text2d`   | always  | trajectory/fade alpha  |
//! | Ground & cannon     | Gizmos     | always  | —                      |
//! | Aim/power readout   | Bevy UI    | always  | —                      |
//!
//! The trajectory overlay does not pop in and out: each ball eases its own
//! `trajectory_alpha` toward the [`TrajectoryDisplay`] target (see
//! [`crate::cannonball::Cannonball::tick`]), and the curve colour here uses
//! that eased value capped by the destroy fade.

use bevy::prelude::*;

use crate::cannon::Cannon;
use crate::cannonball::Cannonball;
use crate::config::SimConfig;
use crate::trajectory::direction_angle;

// ── Resources ────────────────────────────────────────────────────────────────

/// Whether trajectory curves should be shown.  Toggled with `T`.
#[derive(Resource, Debug, Clone, Copy)]
pub struct TrajectoryDisplay {
    pub show: bool,
}

impl Default for TrajectoryDisplay {
    fn default() -> Self {
        Self { show: true }
    }
}

// ── Component markers ─────────────────────────────────────────────────────────

/// Floating flight-time label; follows the ball it points at.
#[derive(Component)]
pub struct AirTimeLabel {
    pub ball: Entity,
}

/// Marker for the HUD aim/power text node.
#[derive(Component)]
pub struct HudReadoutText;

// ── Colour helpers ────────────────────────────────────────────────────────────

/// Rim, trajectory, and label colour at the given opacity.
fn overlay_color(alpha: f32) -> Color {
    Color::srgba(0.93, 0.90, 0.82, alpha)
}

/// Alphas below this are invisible; skip the draw calls entirely.
const MIN_VISIBLE_ALPHA: f32 = 0.004;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrajectoryDisplay>()
            .add_systems(Startup, setup_hud)
            .add_systems(
                Update,
                (
                    attach_air_time_label_system,
                    air_time_label_system,
                    cannonball_rim_system,
                    trajectory_gizmo_system,
                    scene_gizmo_system,
                    hud_readout_system,
                ),
            );
    }
}

// ── Startup: HUD ──────────────────────────────────────────────────────────────

/// Spawn the top-left aim/power readout and the static controls hint.
pub fn setup_hud(mut commands: Commands, config: Res<SimConfig>) {
    commands
        .spawn((Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        },))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Angle: 45.0°  Power: 600"),
                TextFont {
                    font_size: config.hud_font_size,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.88, 0.45)),
                HudReadoutText,
            ));
            parent.spawn((
                Text::new("↑/↓ aim   ←/→ power   Space fire   T trajectory   R clear"),
                TextFont {
                    font_size: config.hud_font_size * 0.75,
                    ..default()
                },
                TextColor(Color::srgb(0.55, 0.55, 0.60)),
            ));
        });
}

/// Refresh the aim/power readout from the current cannon state.
pub fn hud_readout_system(
    cannon: Res<Cannon>,
    mut query: Query<&mut Text, With<HudReadoutText>>,
) {
    if !cannon.is_changed() {
        return;
    }
    for mut text in query.iter_mut() {
        text.0 = format!(
            "Angle: {:.1}°  Power: {:.0}",
            cannon.angle.to_degrees(),
            cannon.power
        );
    }
}

// ── Air-time labels ───────────────────────────────────────────────────────────

/// Spawn a `Text2d` flight-time label for every newly-fired cannonball.
pub fn attach_air_time_label_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    query: Query<(Entity, &Cannonball), Added<Cannonball>>,
) {
    for (entity, ball) in query.iter() {
        let pos = ball.kinematics.position;
        commands.spawn((
            Text2d::new("0.00s"),
            TextFont {
                font_size: config.hud_font_size,
                ..default()
            },
            TextColor(overlay_color(0.0)),
            Transform::from_translation(Vec3::new(pos.x, pos.y, 1.5)),
            AirTimeLabel { ball: entity },
        ));
    }
}

/// Keep each label above its ball, showing the tracked air time, and remove
/// labels whose ball has been despawned.
pub fn air_time_label_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    balls: Query<&Cannonball>,
    mut labels: Query<(Entity, &AirTimeLabel, &mut Text2d, &mut Transform, &mut TextColor)>,
) {
    for (entity, label, mut text, mut transform, mut color) in labels.iter_mut() {
        let Ok(ball) = balls.get(label.ball) else {
            commands.entity(entity).despawn();
            continue;
        };

        let pos = ball.kinematics.position;
        let offset = ball.radius_world(&config) + config.hud_font_size;
        transform.translation.x = pos.x;
        transform.translation.y = pos.y + offset;

        text.0 = format!("{:.2}s", ball.tracker.air_time());
        *color = TextColor(overlay_color(ball.trajectory_display_alpha()));
    }
}

// ── Gizmo overlays ────────────────────────────────────────────────────────────

/// Draw the rim outline around each cannonball, dimmed by the destroy fade.
pub fn cannonball_rim_system(
    mut gizmos: Gizmos,
    config: Res<SimConfig>,
    balls: Query<&Cannonball>,
) {
    for ball in balls.iter() {
        let alpha = ball.fade_alpha();
        if alpha < MIN_VISIBLE_ALPHA {
            continue;
        }
        gizmos.circle_2d(
            ball.kinematics.position,
            ball.radius_world(&config),
            overlay_color(alpha),
        );
    }
}

/// Draw each ball's fitted trajectory curve and its end-direction marker.
///
/// Skipped entirely while the eased alpha is invisible, and skipped for the
/// rare degenerate fit (parallel velocity rays on a vertical shot).
pub fn trajectory_gizmo_system(
    mut gizmos: Gizmos,
    config: Res<SimConfig>,
    balls: Query<&Cannonball>,
) {
    for ball in balls.iter() {
        let alpha = ball.trajectory_display_alpha();
        if alpha < MIN_VISIBLE_ALPHA {
            continue;
        }
        let color = overlay_color(alpha);

        let Ok(curve) = ball.tracker.bezier() else {
            continue;
        };
        gizmos.linestrip_2d(curve.sample(config.trajectory_segments), color);

        // Triangle marker at the end point, one vertex along the final
        // velocity direction.
        if let Ok(angle) = direction_angle(ball.tracker.end_velocity()) {
            let center = ball.tracker.end_position();
            let r = config.trajectory_marker_size;
            let verts: Vec<Vec2> = (0..4)
                .map(|i| {
                    let a = angle + std::f32::consts::TAU * (i % 3) as f32 / 3.0;
                    center + Vec2::new(a.cos(), a.sin()) * r
                })
                .collect();
            gizmos.linestrip_2d(verts, color);
        }
    }
}

/// Draw the ground line and the cannon (pivot disc plus barrel).
pub fn scene_gizmo_system(mut gizmos: Gizmos, config: Res<SimConfig>, cannon: Res<Cannon>) {
    let ground = Color::srgb(0.35, 0.55, 0.30);
    gizmos.line_2d(
        Vec2::new(-5000.0, config.ground_height),
        Vec2::new(5000.0, config.ground_height),
        ground,
    );

    let steel = Color::srgb(0.45, 0.45, 0.50);
    gizmos.circle_2d(cannon.position, 14.0, steel);
    gizmos.line_2d(cannon.position, cannon.muzzle(&config), steel);
}
