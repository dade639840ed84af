//! Reference grid on the ground plane.
//!
//! Cell and section lines are baked into one line-list mesh with per-vertex
//! colour. The mesh stays put; only its alpha is rewritten, falling off with
//! distance from the point on the ground below the camera. Every line is split
//! at each cell crossing to give the fade enough vertices.

use bevy::asset::RenderAssetUsages;
use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;
use constants::camera_settings::CAMERA_INITIAL_POSITION;
use constants::scene_settings::{
    GRID_CELL_COLOR, GRID_CELL_SIZE, GRID_EXTENT, GRID_FADE_DISTANCE, GRID_FADE_STRENGTH,
    GRID_HEIGHT, GRID_SECTION_COLOR, GRID_SECTION_SIZE,
};

/// The grid entity, remembering the ground point its colours were faded around.
#[derive(Component)]
pub struct GroundGrid {
    fade_centre: Vec2,
}

/// Alpha multiplier for a point `distance` units from the viewer's ground point.
pub fn grid_fade(distance: f32) -> f32 {
    let t = (distance / GRID_FADE_DISTANCE).clamp(0.0, 1.0);
    (1.0 - t).powf(GRID_FADE_STRENGTH)
}

pub fn is_section_line(coord: f32) -> bool {
    let steps = coord / GRID_SECTION_SIZE;
    (steps - steps.round()).abs() < 1e-4
}

/// Line coordinates along one axis, from `-GRID_EXTENT` to `GRID_EXTENT`.
pub fn grid_coordinates() -> Vec<f32> {
    let half_cells = (GRID_EXTENT / GRID_CELL_SIZE).round() as i32;
    (-half_cells..=half_cells)
        .map(|i| i as f32 * GRID_CELL_SIZE)
        .collect()
}

/// Visit every vertex in mesh order as (ground position, line colour).
fn for_each_grid_vertex(mut visit: impl FnMut(Vec2, LinearRgba)) {
    let coords = grid_coordinates();
    for &fixed in &coords {
        let base = if is_section_line(fixed) {
            GRID_SECTION_COLOR
        } else {
            GRID_CELL_COLOR
        }
        .to_linear();

        // x = fixed running along z, then z = fixed running along x
        for along_z in [true, false] {
            for &varying in &coords {
                let ground = if along_z {
                    Vec2::new(fixed, varying)
                } else {
                    Vec2::new(varying, fixed)
                };
                visit(ground, base);
            }
        }
    }
}

/// Vertex colours faded around `centre`, in the same order as the mesh positions.
pub fn grid_vertex_colors(centre: Vec2) -> Vec<[f32; 4]> {
    let mut colors = Vec::new();
    for_each_grid_vertex(|ground, base| {
        let alpha = base.alpha * grid_fade(ground.distance(centre));
        colors.push([base.red, base.green, base.blue, alpha]);
    });
    colors
}

pub fn build_grid_mesh(fade_centre: Vec2) -> Mesh {
    let line_len = grid_coordinates().len() as u32;
    let mut positions: Vec<[f32; 3]> = Vec::new();
    for_each_grid_vertex(|ground, _| positions.push([ground.x, 0.0, ground.y]));

    let mut indices: Vec<u32> = Vec::new();
    for start in (0..positions.len() as u32).step_by(line_len as usize) {
        for i in 0..line_len - 1 {
            indices.extend_from_slice(&[start + i, start + i + 1]);
        }
    }

    // Kept in the main world so the fade can be rewritten as the camera moves.
    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, grid_vertex_colors(fade_centre));
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

pub fn spawn_ground_grid(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let grid_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let fade_centre = CAMERA_INITIAL_POSITION.xz();

    commands.spawn((
        GroundGrid { fade_centre },
        Name::new("GroundGrid"),
        Mesh3d(meshes.add(build_grid_mesh(fade_centre))),
        MeshMaterial3d(grid_material),
        Transform::from_xyz(0.0, GRID_HEIGHT, 0.0),
        Visibility::Visible,
        NoFrustumCulling,
        NotShadowCaster,
        NotShadowReceiver,
        Pickable::IGNORE,
    ));
}

/// Re-fade the grid once the camera's ground point has moved by half a cell.
pub fn fade_grid_around_camera(
    cameras: Query<&Transform, (With<Camera3d>, Changed<Transform>)>,
    mut grids: Query<(&mut GroundGrid, &Mesh3d)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    let centre = camera.translation.xz();

    for (mut grid, mesh) in &mut grids {
        if grid.fade_centre.distance(centre) < GRID_CELL_SIZE * 0.5 {
            continue;
        }
        let Some(mesh) = meshes.get_mut(&mesh.0) else {
            continue;
        };
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, grid_vertex_colors(centre));
        grid.fade_centre = centre;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    #[test]
    fn fade_falls_off_with_distance() {
        assert_eq!(grid_fade(0.0), 1.0);
        assert!(grid_fade(5.0) > grid_fade(10.0));
        assert_eq!(grid_fade(GRID_FADE_DISTANCE), 0.0);
        assert_eq!(grid_fade(GRID_FADE_DISTANCE * 3.0), 0.0);
    }

    #[test]
    fn section_lines_every_section_size() {
        assert!(is_section_line(0.0));
        assert!(is_section_line(GRID_SECTION_SIZE));
        assert!(is_section_line(-2.0 * GRID_SECTION_SIZE));
        assert!(!is_section_line(GRID_CELL_SIZE));
    }

    #[test]
    fn mesh_covers_the_extent() {
        let coords = grid_coordinates();
        assert_eq!(coords.first(), Some(&-GRID_EXTENT));
        assert_eq!(coords.last(), Some(&GRID_EXTENT));

        let mesh = build_grid_mesh(Vec2::ZERO);
        let n = coords.len();
        assert_eq!(mesh.count_vertices(), 2 * n * n);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(2 * n * (n - 1) * 2));

        let Some(VertexAttributeValues::Float32x4(colors)) = mesh.attribute(Mesh::ATTRIBUTE_COLOR)
        else {
            panic!("grid mesh has no vertex colours");
        };
        // Corners are far outside the fade radius.
        assert!(colors.iter().any(|c| c[3] == 0.0));
        assert!(colors.iter().any(|c| c[3] > 0.9));
    }

    fn alpha_at(colors: &[[f32; 4]], ground: Vec2) -> f32 {
        let mut index = 0;
        let mut found = None;
        for_each_grid_vertex(|position, _| {
            if found.is_none() && position == ground {
                found = Some(index);
            }
            index += 1;
        });
        colors[found.expect("point lies on the grid")][3]
    }

    #[test]
    fn fade_follows_the_viewer_not_the_origin() {
        let viewer = Vec2::new(40.0, 0.0);
        let colors = grid_vertex_colors(viewer);
        assert!(alpha_at(&colors, viewer) > 0.9);
        assert!(alpha_at(&colors, viewer) > alpha_at(&colors, Vec2::ZERO));
        assert!(alpha_at(&colors, Vec2::ZERO) > alpha_at(&colors, Vec2::new(-40.0, 0.0)));
    }

    #[test]
    fn camera_move_refades_the_grid() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(Assets::<Mesh>::default())
            .insert_resource(Assets::<StandardMaterial>::default())
            .add_systems(Startup, spawn_ground_grid)
            .add_systems(Update, fade_grid_around_camera);
        let camera = app
            .world_mut()
            .spawn((Camera3d::default(), Transform::from_xyz(-45.0, 20.0, 0.0)))
            .id();
        app.update();

        let read_alphas = |app: &mut App| {
            let world = app.world_mut();
            let handle = world
                .query_filtered::<&Mesh3d, With<GroundGrid>>()
                .single(world)
                .expect("one grid")
                .0
                .clone();
            let meshes = world.resource::<Assets<Mesh>>();
            let Some(VertexAttributeValues::Float32x4(colors)) =
                meshes.get(&handle).and_then(|m| m.attribute(Mesh::ATTRIBUTE_COLOR))
            else {
                panic!("grid mesh has no vertex colours");
            };
            (
                alpha_at(colors, Vec2::new(-45.0, 0.0)),
                alpha_at(colors, Vec2::new(45.0, 0.0)),
            )
        };

        let (west, east) = read_alphas(&mut app);
        assert!(west > east);

        app.world_mut()
            .entity_mut(camera)
            .insert(Transform::from_xyz(45.0, 20.0, 0.0));
        app.update();
        let (west, east) = read_alphas(&mut app);
        assert!(east > west);
    }
}
