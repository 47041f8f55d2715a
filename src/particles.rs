//! Particle effects: muzzle smoke on launch and dust bursts on landing.
//!
//! ## Design
//!
//! Particles are lightweight ECS entities with a [`Particle`] component that
//! stores physics state (velocity, age, colour).  A two-system pipeline
//! handles them:
//!
//! | System                        | Schedule | Purpose                                      |
//! |-------------------------------|----------|----------------------------------------------|
//! | `attach_particle_mesh_system` | Update   | Attach `Mesh2d` to freshly-spawned particles |
//! | `particle_update_system`      | Update   | Move, fade, and despawn expired particles    |
//!
//! Particle entities are spawned by free functions ([`spawn_launch_smoke`],
//! [`spawn_landing_dust`]) that take only `&mut Commands` — no `Assets`
//! access needed at spawn time.  The `attach_particle_mesh_system` supplies
//! the `Mesh2d` one frame later, which is imperceptible at 60 Hz.  Because the
//! spawn helpers need nothing but `Commands`, gameplay logic that requests a
//! burst stays trivially testable headless.
//!
//! A single shared circle-mesh [`ParticleMesh`] resource is created at plugin
//! startup to avoid per-particle mesh allocation.  Each particle receives its
//! own unique [`ColorMaterial`] so its alpha can be faded individually.

use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use rand::Rng;

use crate::config::SimConfig;

// ── Resources ────────────────────────────────────────────────────────────────

/// Shared circle mesh used by all particle entities (created once at startup).
#[derive(Resource)]
pub struct ParticleMesh(pub Handle<Mesh>);

// ── Component ────────────────────────────────────────────────────────────────

/// Short-lived visual particle entity.
///
/// After spawning, `attach_particle_mesh_system` inserts the `Mesh2d` /
/// `MeshMaterial2d` pair and writes the material handle into `material`.
/// `particle_update_system` then moves, fades, and eventually despawns it.
#[derive(Component)]
pub struct Particle {
    /// World-space velocity (units/s).
    pub velocity: Vec2,
    /// Time alive so far (s).
    pub age: f32,
    /// Total lifetime (s); entity is despawned when `age >= lifetime`.
    pub lifetime: f32,
    /// Base colour red channel (sRGB, 0–1).
    pub r: f32,
    /// Base colour green channel.
    pub g: f32,
    /// Base colour blue channel.
    pub b: f32,
    /// Handle to this particle's unique `ColorMaterial` so `particle_update_system`
    /// can update the alpha.  `None` until `attach_particle_mesh_system` runs.
    pub material: Option<Handle<ColorMaterial>>,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_particle_mesh).add_systems(
            Update,
            (attach_particle_mesh_system, particle_update_system).chain(),
        );
    }
}

// ── Startup system ────────────────────────────────────────────────────────────

/// Create the shared circle mesh and store it as a [`ParticleMesh`] resource.
fn init_particle_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(circle_mesh(2.5, 6));
    commands.insert_resource(ParticleMesh(handle));
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Attach `Mesh2d` + `MeshMaterial2d` to every newly-spawned [`Particle`].
///
/// Uses [`Added<Particle>`] so it only runs for particles that appeared since
/// the last frame — zero overhead for the steady-state particle population.
pub fn attach_particle_mesh_system(
    mut commands: Commands,
    particle_mesh: Res<ParticleMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Particle), Added<Particle>>,
) {
    for (entity, mut particle) in query.iter_mut() {
        let mat_handle = materials.add(ColorMaterial::from_color(Color::srgba(
            particle.r, particle.g, particle.b, 1.0,
        )));
        particle.material = Some(mat_handle.clone());
        commands
            .entity(entity)
            .insert((Mesh2d(particle_mesh.0.clone()), MeshMaterial2d(mat_handle)));
    }
}

/// Advance all particles: translate by velocity, pull downward, fade alpha
/// quadratically, and despawn any whose age has exceeded their lifetime.
pub fn particle_update_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<SimConfig>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Transform, &mut Particle)>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut particle) in query.iter_mut() {
        particle.age += dt;

        if particle.age >= particle.lifetime {
            commands.entity(entity).despawn();
            continue;
        }

        // Smoke and dust sink back toward the ground.
        particle.velocity.y += config.particle_gravity * dt;
        transform.translation.x += particle.velocity.x * dt;
        transform.translation.y += particle.velocity.y * dt;

        // Quadratic ease-out alpha: bright at birth, rapid fade at end.
        let t = particle.age / particle.lifetime; // 0 → 1
        let alpha = (1.0 - t).powi(2);

        if let Some(ref handle) = particle.material {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color = Color::srgba(particle.r, particle.g, particle.b, alpha);
            }
        }
    }
}

// ── Public spawn helpers ──────────────────────────────────────────────────────

/// Spawn the muzzle plume when a cannonball is fired.
///
/// `dir` is the normalised firing direction; the plume fans ±25° around it.
/// `predicted_air_time` scales the particle count so long shots get a denser,
/// longer-lived plume — the burst stands in for the whole flight's smoke.
pub fn spawn_launch_smoke(
    commands: &mut Commands,
    config: &SimConfig,
    pos: Vec2,
    dir: Vec2,
    predicted_air_time: f32,
) {
    let mut rng = rand::thread_rng();
    let count = ((predicted_air_time * config.launch_smoke_per_airtime_sec) as u32)
        .clamp(config.launch_smoke_min, config.launch_smoke_max);

    let base = if dir.length_squared() > 1e-6 {
        dir.normalize()
    } else {
        Vec2::X
    };
    let base_angle = base.y.atan2(base.x);

    for _ in 0..count {
        let angle = base_angle + rng.gen_range(-0.44_f32..0.44_f32);
        let speed = rng.gen_range(40.0_f32..140.0_f32);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;

        // Orange muzzle flame cooling into grey smoke.
        let heat = rng.gen_range(0.0_f32..1.0_f32);
        let r = 0.55 + 0.45 * heat;
        let g = 0.40 + 0.25 * heat;
        let b = rng.gen_range(0.05_f32..0.25_f32) + 0.3 * (1.0 - heat);

        let lifetime = rng.gen_range(0.25_f32..0.70_f32);
        let back_offset = base * rng.gen_range(0.0_f32..6.0_f32);
        let lateral = Vec2::new(-base.y, base.x) * rng.gen_range(-3.0_f32..3.0_f32);

        commands.spawn((
            Particle {
                velocity,
                age: 0.0,
                lifetime,
                r,
                g,
                b,
                material: None,
            },
            Transform::from_translation((pos + back_offset + lateral).extend(0.9)),
            Visibility::default(),
        ));
    }
}

/// Spawn a dust burst where a cannonball strikes the ground.
///
/// `impact_speed` scales the count, so the first hard impact kicks up far more
/// dust than the last feeble bounce.  The fan covers the upper half plane with
/// a little spill past horizontal on both sides.
pub fn spawn_landing_dust(
    commands: &mut Commands,
    config: &SimConfig,
    pos: Vec2,
    impact_speed: f32,
) {
    let mut rng = rand::thread_rng();
    let count = ((impact_speed * config.landing_dust_per_speed) as u32)
        .clamp(config.landing_dust_min, config.landing_dust_max);

    for _ in 0..count {
        // -45° through 225°: upward fan with spill past horizontal.
        let angle = rng.gen_range(
            -std::f32::consts::FRAC_PI_4..std::f32::consts::PI + std::f32::consts::FRAC_PI_4,
        );
        let speed = rng.gen_range(150.0_f32..400.0_f32);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;

        // Pale warm-grey dust.
        let lum = rng.gen_range(0.70_f32..0.95_f32);
        let warm = rng.gen_range(0.0_f32..0.08_f32);
        let r = (lum + warm).min(1.0);
        let g = lum;
        let b = (lum - warm).max(0.0);

        let lifetime = rng.gen_range(0.05_f32..0.20_f32);
        let offset = Vec2::new(rng.gen_range(-4.0..4.0), rng.gen_range(0.0..3.0));

        commands.spawn((
            Particle {
                velocity,
                age: 0.0,
                lifetime,
                r,
                g,
                b,
                material: None,
            },
            Transform::from_translation((pos + offset).extend(0.9)),
            Visibility::default(),
        ));
    }
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Build a filled circle mesh approximated by an `n`-sided regular polygon.
///
/// Uses a triangle fan from the centre: `(0, i, i+1 mod n)`.
pub fn circle_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    // Centre vertex.
    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        let x = radius * angle.cos();
        let y = radius * angle.sin();
        positions.push([x, y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        // v1 = rim vertex i+1, v2 = next rim vertex wrapping back to 1
        let v1 = i + 1;
        let v2 = (i + 1) % n as u32 + 1;
        indices.extend_from_slice(&[0, v1, v2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
