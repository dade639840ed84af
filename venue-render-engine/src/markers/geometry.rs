//! Geometry resolver: `(type tag, colour) -> MarkerModel`.
//!
//! Models are plain data built fresh on every call, so each marker instance
//! owns its own hierarchy and the GPU assets spawned from it. Adding a new
//! marker type means adding a builder here and a variant in `MarkerKind`.

use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;

use super::kind::MarkerKind;

const DARK: Color = Color::srgb(0.18, 0.19, 0.22);
const LIGHT: Color = Color::srgb(0.85, 0.86, 0.88);
const STEEL: Color = Color::srgb(0.60, 0.62, 0.66);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Cuboid(Vec3),
    Cylinder { radius: f32, height: f32 },
    Cone { radius: f32, height: f32 },
    Sphere(f32),
    Torus { minor: f32, major: f32 },
}

impl Primitive {
    pub fn mesh(&self) -> Mesh {
        match *self {
            Self::Cuboid(size) => Cuboid::from_size(size).into(),
            Self::Cylinder { radius, height } => Cylinder::new(radius, height).into(),
            Self::Cone { radius, height } => Cone { radius, height }.into(),
            Self::Sphere(radius) => Sphere::new(radius).into(),
            Self::Torus { minor, major } => Torus::new(major - minor, major + minor).into(),
        }
    }

    /// Local axis-aligned half extents around the primitive centre.
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Self::Cuboid(size) => size * 0.5,
            Self::Cylinder { radius, height } | Self::Cone { radius, height } => {
                Vec3::new(radius, height * 0.5, radius)
            }
            Self::Sphere(radius) => Vec3::splat(radius),
            Self::Torus { minor, major } => Vec3::new(major + minor, minor, major + minor),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub base_color: Color,
    pub emissive: LinearRgba,
    pub metallic: f32,
    pub roughness: f32,
}

impl Surface {
    pub fn matte(color: Color) -> Self {
        Self {
            base_color: color,
            emissive: LinearRgba::BLACK,
            metallic: 0.0,
            roughness: 0.8,
        }
    }

    pub fn metal(color: Color) -> Self {
        Self {
            base_color: color,
            emissive: LinearRgba::BLACK,
            metallic: 0.8,
            roughness: 0.3,
        }
    }

    pub fn glowing(color: Color, strength: f32) -> Self {
        Self {
            base_color: color,
            emissive: color.to_linear() * strength,
            metallic: 0.1,
            roughness: 0.5,
        }
    }

    pub fn material(&self) -> StandardMaterial {
        StandardMaterial {
            base_color: self.base_color,
            emissive: self.emissive,
            metallic: self.metallic,
            perceptual_roughness: self.roughness,
            ..default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub primitive: Primitive,
    pub surface: Surface,
}

/// One node of a marker model. Nodes without a mesh act as groups.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub name: &'static str,
    pub transform: Transform,
    pub mesh: Option<MeshPart>,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn group(name: &'static str) -> Self {
        Self {
            name,
            transform: Transform::IDENTITY,
            mesh: None,
            cast_shadows: false,
            receive_shadows: false,
            children: Vec::new(),
        }
    }

    pub fn part(name: &'static str, primitive: Primitive, surface: Surface) -> Self {
        Self {
            mesh: Some(MeshPart { primitive, surface }),
            ..Self::group(name)
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.translation = Vec3::new(x, y, z);
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ModelNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn visit(&self, f: &mut impl FnMut(&ModelNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut ModelNode)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    fn accumulate_bounds(&self, parent: &Transform, min: &mut Vec3, max: &mut Vec3) {
        let world = parent.mul_transform(self.transform);
        if let Some(part) = &self.mesh {
            let he = part.primitive.half_extents();
            for corner in [
                Vec3::new(-he.x, -he.y, -he.z),
                Vec3::new(he.x, -he.y, -he.z),
                Vec3::new(-he.x, he.y, -he.z),
                Vec3::new(he.x, he.y, -he.z),
                Vec3::new(-he.x, -he.y, he.z),
                Vec3::new(he.x, -he.y, he.z),
                Vec3::new(-he.x, he.y, he.z),
                Vec3::new(he.x, he.y, he.z),
            ] {
                let p = world.transform_point(corner);
                *min = min.min(p);
                *max = max.max(p);
            }
        }
        for child in &self.children {
            child.accumulate_bounds(&world, min, max);
        }
    }
}

/// A resolved, independently owned marker model.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerModel {
    pub kind: MarkerKind,
    pub root: ModelNode,
}

impl MarkerModel {
    /// Local axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        self.root
            .accumulate_bounds(&Transform::IDENTITY, &mut min, &mut max);
        if min.cmpgt(max).any() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        (min, max)
    }

    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.root.visit(&mut |node| {
            if node.mesh.is_some() {
                count += 1;
            }
        });
        count
    }
}

/// Build a fresh model for a marker type tag. Unknown tags get the default pin.
pub fn resolve(tag: &str, color: Color) -> MarkerModel {
    let kind = MarkerKind::from_tag(tag);
    let mut root = builder_for(&kind)(color);
    enable_shadows(&mut root);
    MarkerModel { kind, root }
}

/// Every mesh in the subtree casts and receives shadows.
pub fn enable_shadows(root: &mut ModelNode) {
    root.visit_mut(&mut |node| {
        if node.mesh.is_some() {
            node.cast_shadows = true;
            node.receive_shadows = true;
        }
    });
}

type ModelBuilder = fn(Color) -> ModelNode;

fn builder_for(kind: &MarkerKind) -> ModelBuilder {
    match kind {
        MarkerKind::Entrance => entrance,
        MarkerKind::Exit => exit,
        MarkerKind::Stage => stage,
        MarkerKind::Booth => booth,
        MarkerKind::SponsorBooth => sponsor_booth,
        MarkerKind::InfoBooth => info_booth,
        MarkerKind::Food => food,
        MarkerKind::Bathroom => bathroom,
        MarkerKind::Info => info_sign,
        MarkerKind::Unrecognized(_) => default_pin,
    }
}

fn entrance(color: Color) -> ModelNode {
    ModelNode::group("entrance").with_children([
        ModelNode::part(
            "pillar_left",
            Primitive::Cuboid(Vec3::new(0.4, 3.0, 0.4)),
            Surface::matte(color),
        )
        .at(-1.2, 1.5, 0.0),
        ModelNode::part(
            "pillar_right",
            Primitive::Cuboid(Vec3::new(0.4, 3.0, 0.4)),
            Surface::matte(color),
        )
        .at(1.2, 1.5, 0.0),
        ModelNode::part(
            "lintel",
            Primitive::Cuboid(Vec3::new(2.8, 0.4, 0.5)),
            Surface::glowing(color, 0.6),
        )
        .at(0.0, 3.2, 0.0),
        ModelNode::part("mat", Primitive::Cuboid(Vec3::new(2.0, 0.05, 1.2)), Surface::matte(DARK))
            .at(0.0, 0.025, 0.0),
    ])
}

fn exit(color: Color) -> ModelNode {
    ModelNode::group("exit").with_children([
        ModelNode::part(
            "post_left",
            Primitive::Cuboid(Vec3::new(0.3, 2.6, 0.3)),
            Surface::matte(LIGHT),
        )
        .at(-1.0, 1.3, 0.0),
        ModelNode::part(
            "post_right",
            Primitive::Cuboid(Vec3::new(0.3, 2.6, 0.3)),
            Surface::matte(LIGHT),
        )
        .at(1.0, 1.3, 0.0),
        ModelNode::part(
            "header",
            Primitive::Cuboid(Vec3::new(2.3, 0.3, 0.3)),
            Surface::matte(LIGHT),
        )
        .at(0.0, 2.75, 0.0),
        ModelNode::part(
            "sign",
            Primitive::Cuboid(Vec3::new(1.2, 0.4, 0.1)),
            Surface::glowing(color, 1.0),
        )
        .at(0.0, 3.2, 0.0),
        ModelNode::part(
            "arrow",
            Primitive::Cone { radius: 0.18, height: 0.4 },
            Surface::glowing(color, 1.0),
        )
        .at(0.85, 3.2, 0.0)
        .rotated(Quat::from_rotation_z(-std::f32::consts::FRAC_PI_2)),
    ])
}

fn stage(color: Color) -> ModelNode {
    ModelNode::group("stage").with_children([
        ModelNode::part(
            "platform",
            Primitive::Cuboid(Vec3::new(6.0, 0.6, 4.0)),
            Surface::matte(DARK),
        )
        .at(0.0, 0.3, 0.0),
        ModelNode::part(
            "trim",
            Primitive::Cuboid(Vec3::new(6.0, 0.1, 0.1)),
            Surface::glowing(color, 1.2),
        )
        .at(0.0, 0.6, 2.0),
        ModelNode::part(
            "backdrop",
            Primitive::Cuboid(Vec3::new(6.0, 3.0, 0.2)),
            Surface::matte(color),
        )
        .at(0.0, 2.1, -1.9),
        ModelNode::part(
            "speaker_left",
            Primitive::Cuboid(Vec3::new(0.6, 1.6, 0.6)),
            Surface::matte(DARK),
        )
        .at(-2.6, 1.4, 1.2),
        ModelNode::part(
            "speaker_right",
            Primitive::Cuboid(Vec3::new(0.6, 1.6, 0.6)),
            Surface::matte(DARK),
        )
        .at(2.6, 1.4, 1.2),
        ModelNode::part(
            "truss_left",
            Primitive::Cylinder { radius: 0.08, height: 3.6 },
            Surface::metal(STEEL),
        )
        .at(-2.9, 2.4, -1.6),
        ModelNode::part(
            "truss_right",
            Primitive::Cylinder { radius: 0.08, height: 3.6 },
            Surface::metal(STEEL),
        )
        .at(2.9, 2.4, -1.6),
    ])
}

fn booth(color: Color) -> ModelNode {
    ModelNode::group("booth").with_children([
        ModelNode::part(
            "counter",
            Primitive::Cuboid(Vec3::new(2.4, 1.0, 0.8)),
            Surface::matte(color),
        )
        .at(0.0, 0.5, 0.6),
        ModelNode::part(
            "back_wall",
            Primitive::Cuboid(Vec3::new(2.4, 2.4, 0.1)),
            Surface::matte(LIGHT),
        )
        .at(0.0, 1.2, -0.6),
        ModelNode::part(
            "canopy",
            Primitive::Cuboid(Vec3::new(2.6, 0.15, 1.6)),
            Surface::matte(color),
        )
        .at(0.0, 2.5, 0.0),
    ])
}

fn sponsor_booth(color: Color) -> ModelNode {
    ModelNode::group("sponsor_booth").with_children([
        ModelNode::part(
            "platform",
            Primitive::Cuboid(Vec3::new(3.6, 0.2, 3.0)),
            Surface::matte(DARK),
        )
        .at(0.0, 0.1, 0.0),
        ModelNode::part(
            "counter",
            Primitive::Cuboid(Vec3::new(3.0, 1.0, 0.8)),
            Surface::metal(color),
        )
        .at(0.0, 0.7, 0.9),
        ModelNode::part(
            "back_wall",
            Primitive::Cuboid(Vec3::new(3.6, 3.0, 0.15)),
            Surface::matte(color),
        )
        .at(0.0, 1.7, -1.4),
        ModelNode::part(
            "banner",
            Primitive::Cuboid(Vec3::new(2.4, 0.6, 0.05)),
            Surface::glowing(color, 1.0),
        )
        .at(0.0, 2.8, -1.3),
        ModelNode::part(
            "pillar_left",
            Primitive::Cylinder { radius: 0.1, height: 3.2 },
            Surface::metal(STEEL),
        )
        .at(-1.7, 1.8, 1.3),
        ModelNode::part(
            "pillar_right",
            Primitive::Cylinder { radius: 0.1, height: 3.2 },
            Surface::metal(STEEL),
        )
        .at(1.7, 1.8, 1.3),
        ModelNode::part("star", Primitive::Sphere(0.25), Surface::glowing(color, 2.0))
            .at(0.0, 3.6, -1.4),
    ])
}

fn info_booth(color: Color) -> ModelNode {
    ModelNode::group("info_booth").with_children([
        ModelNode::part(
            "kiosk",
            Primitive::Cylinder { radius: 0.9, height: 1.1 },
            Surface::matte(color),
        )
        .at(0.0, 0.55, 0.0),
        ModelNode::part(
            "rim",
            Primitive::Torus { minor: 0.08, major: 0.9 },
            Surface::glowing(color, 0.8),
        )
        .at(0.0, 1.1, 0.0),
        ModelNode::part(
            "pole",
            Primitive::Cylinder { radius: 0.06, height: 1.4 },
            Surface::metal(STEEL),
        )
        .at(0.0, 1.8, 0.0),
        ModelNode::part("beacon", Primitive::Sphere(0.35), Surface::glowing(color, 1.5))
            .at(0.0, 2.7, 0.0),
    ])
}

fn food(color: Color) -> ModelNode {
    ModelNode::group("food").with_children([
        ModelNode::part(
            "counter",
            Primitive::Cuboid(Vec3::new(2.6, 1.0, 1.0)),
            Surface::matte(color),
        )
        .at(0.0, 0.5, 0.0),
        ModelNode::part(
            "awning",
            Primitive::Cuboid(Vec3::new(3.0, 0.1, 1.6)),
            Surface::glowing(color, 0.4),
        )
        .at(0.0, 2.4, 0.2)
        .rotated(Quat::from_rotation_x(0.2)),
        ModelNode::part(
            "post_left",
            Primitive::Cylinder { radius: 0.06, height: 2.4 },
            Surface::metal(STEEL),
        )
        .at(-1.4, 1.2, 0.9),
        ModelNode::part(
            "post_right",
            Primitive::Cylinder { radius: 0.06, height: 2.4 },
            Surface::metal(STEEL),
        )
        .at(1.4, 1.2, 0.9),
        ModelNode::part(
            "stool_left",
            Primitive::Cylinder { radius: 0.25, height: 0.7 },
            Surface::matte(DARK),
        )
        .at(-0.8, 0.35, 1.2),
        ModelNode::part(
            "stool_right",
            Primitive::Cylinder { radius: 0.25, height: 0.7 },
            Surface::matte(DARK),
        )
        .at(0.8, 0.35, 1.2),
    ])
}

fn bathroom(color: Color) -> ModelNode {
    ModelNode::group("bathroom").with_children([
        ModelNode::part("block", Primitive::Cuboid(Vec3::new(2.0, 2.4, 1.6)), Surface::matte(LIGHT))
            .at(0.0, 1.2, 0.0),
        ModelNode::part("roof", Primitive::Cuboid(Vec3::new(2.2, 0.15, 1.8)), Surface::matte(color))
            .at(0.0, 2.475, 0.0),
        ModelNode::part("door", Primitive::Cuboid(Vec3::new(0.7, 1.6, 0.05)), Surface::matte(color))
            .at(0.0, 0.8, 0.825),
        ModelNode::part(
            "badge",
            Primitive::Cylinder { radius: 0.25, height: 0.05 },
            Surface::glowing(color, 1.0),
        )
        .at(0.0, 2.0, 0.83)
        .rotated(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
    ])
}

fn info_sign(color: Color) -> ModelNode {
    ModelNode::group("info").with_children([
        ModelNode::part(
            "base",
            Primitive::Cylinder { radius: 0.4, height: 0.1 },
            Surface::matte(DARK),
        )
        .at(0.0, 0.05, 0.0),
        ModelNode::part(
            "pole",
            Primitive::Cylinder { radius: 0.08, height: 2.4 },
            Surface::metal(STEEL),
        )
        .at(0.0, 1.2, 0.0),
        ModelNode::part(
            "panel",
            Primitive::Cuboid(Vec3::new(1.4, 0.8, 0.1)),
            Surface::glowing(color, 0.5),
        )
        .at(0.0, 2.6, 0.0),
    ])
}

fn default_pin(color: Color) -> ModelNode {
    ModelNode::group("default_pin").with_children([
        ModelNode::part(
            "ring",
            Primitive::Torus { minor: 0.05, major: 0.5 },
            Surface::glowing(color, 0.6),
        )
        .at(0.0, 0.05, 0.0),
        ModelNode::part(
            "spike",
            Primitive::Cone { radius: 0.45, height: 1.4 },
            Surface::matte(color),
        )
        .at(0.0, 1.0, 0.0)
        .rotated(Quat::from_rotation_x(std::f32::consts::PI)),
        ModelNode::part("head", Primitive::Sphere(0.5), Surface::glowing(color, 0.8))
            .at(0.0, 2.0, 0.0),
    ])
}

/// Spawn a model subtree under `parent`. Every mesh node gets its own mesh and
/// material handles so the instance exclusively owns what it renders.
pub fn spawn_model(
    parent: &mut ChildSpawnerCommands,
    node: &ModelNode,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let mut entity = parent.spawn((Name::new(node.name), node.transform, Visibility::Inherited));

    if let Some(part) = &node.mesh {
        entity.insert((
            Mesh3d(meshes.add(part.primitive.mesh())),
            MeshMaterial3d(materials.add(part.surface.material())),
        ));
        if !node.cast_shadows {
            entity.insert(NotShadowCaster);
        }
        if !node.receive_shadows {
            entity.insert(NotShadowReceiver);
        }
    }

    if !node.children.is_empty() {
        entity.with_children(|children| {
            for child in &node.children {
                spawn_model(children, child, meshes, materials);
            }
        });
    }
}
