/*
 * Shape Module
 *
 * This module defines what a body renders as: a triangle mesh, the tinted
 * semi-transparent material it is drawn with, and a hierarchy of nodes for
 * loaded templates. A Shape is either the default box or a loaded template
 * copy, and both support the same tint and glow operations.
 */

use std::sync::Arc;

use nalgebra::{Point3, Vector3};

// Material styling shared by every body
pub const ROUGHNESS: f32 = 0.25;
pub const METALNESS: f32 = 0.8;
pub const OPACITY: f32 = 0.9;
pub const REST_EMISSIVE: f32 = 0.15;

// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    pub fn hex(self) -> u32 {
        self.0
    }

    // Channels in 0.0..=1.0
    pub fn components(self) -> (f32, f32, f32) {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        (r, g, b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub transparent: bool,
    pub opacity: f32,
}

impl Material {
    // Uniform tinted, semi-transparent, reflective material
    pub fn tinted(color: Color) -> Self {
        Self {
            color,
            emissive: color,
            emissive_intensity: REST_EMISSIVE,
            roughness: ROUGHNESS,
            metalness: METALNESS,
            transparent: true,
            opacity: OPACITY,
        }
    }
}

// Indexed triangle mesh, shared between copies of the same shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub triangles: Vec<[usize; 3]>,
}

impl Mesh {
    // Axis-aligned box centered on the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
        let vertices = vec![
            Point3::new(-hx, -hy, -hz),
            Point3::new(hx, -hy, -hz),
            Point3::new(hx, hy, -hz),
            Point3::new(-hx, hy, -hz),
            Point3::new(-hx, -hy, hz),
            Point3::new(hx, -hy, hz),
            Point3::new(hx, hy, hz),
            Point3::new(-hx, hy, hz),
        ];
        let triangles = vec![
            // back
            [0, 2, 1], [0, 3, 2],
            // front
            [4, 5, 6], [4, 6, 7],
            // left
            [0, 4, 7], [0, 7, 3],
            // right
            [1, 2, 6], [1, 6, 5],
            // bottom
            [0, 1, 5], [0, 5, 4],
            // top
            [3, 7, 6], [3, 6, 2],
        ];
        Self { vertices, triangles }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }
}

// Axis-aligned bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    fn include(&mut self, p: &Point3<f32>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }
}

// One node of a shape hierarchy; any node may carry a renderable mesh
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    pub name: String,
    pub mesh: Option<Arc<Mesh>>,
    pub material: Option<Material>,
    pub children: Vec<ShapeNode>,
}

impl ShapeNode {
    pub fn group(name: impl Into<String>) -> Self {
        Self { name: name.into(), mesh: None, material: None, children: Vec::new() }
    }

    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self { name: name.into(), mesh: Some(Arc::new(mesh)), material: None, children: Vec::new() }
    }

    // Depth-first visit of every node
    pub fn traverse<F: FnMut(&ShapeNode)>(&self, f: &mut F) {
        f(self);
        for child in &self.children {
            child.traverse(f);
        }
    }

    pub fn traverse_mut<F: FnMut(&mut ShapeNode)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            child.traverse_mut(f);
        }
    }

    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| {
            if node.mesh.is_some() {
                count += 1;
            }
        });
        count
    }

    // Bounds of every vertex in the hierarchy, None when there are none
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        self.traverse(&mut |node| {
            if let Some(mesh) = &node.mesh {
                for v in &mesh.vertices {
                    match bounds.as_mut() {
                        Some(b) => b.include(v),
                        None => bounds = Some(Bounds { min: *v, max: *v }),
                    }
                }
            }
        });
        bounds
    }
}

// A renderable part: geometry plus the material it is drawn with
pub struct Part<'a> {
    pub mesh: &'a Mesh,
    pub material: &'a Material,
}

// What a body renders as
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    DefaultBox { mesh: Arc<Mesh>, material: Material },
    Loaded { root: ShapeNode, scale: f32 },
}

impl Shape {
    pub fn default_box(mesh: Arc<Mesh>, color: Color) -> Self {
        Shape::DefaultBox { mesh, material: Material::tinted(color) }
    }

    pub fn is_default_box(&self) -> bool {
        matches!(self, Shape::DefaultBox { .. })
    }

    // Uniform scale applied on top of the body transform
    pub fn scale(&self) -> f32 {
        match self {
            Shape::DefaultBox { .. } => 1.0,
            Shape::Loaded { scale, .. } => *scale,
        }
    }

    // Replace the material of every renderable part
    pub fn tint_all(&mut self, color: Color) {
        match self {
            Shape::DefaultBox { material, .. } => *material = Material::tinted(color),
            Shape::Loaded { root, .. } => root.traverse_mut(&mut |node| {
                if node.mesh.is_some() {
                    node.material = Some(Material::tinted(color));
                }
            }),
        }
    }

    pub fn set_emissive_intensity(&mut self, intensity: f32) {
        match self {
            Shape::DefaultBox { material, .. } => material.emissive_intensity = intensity,
            Shape::Loaded { root, .. } => root.traverse_mut(&mut |node| {
                if let Some(material) = node.material.as_mut() {
                    material.emissive_intensity = intensity;
                }
            }),
        }
    }

    // Intensity of the first material found
    pub fn emissive_intensity(&self) -> f32 {
        match self {
            Shape::DefaultBox { material, .. } => material.emissive_intensity,
            Shape::Loaded { root, .. } => {
                let mut found = None;
                root.traverse(&mut |node| {
                    if found.is_none() {
                        found = node.material.as_ref().map(|m| m.emissive_intensity);
                    }
                });
                found.unwrap_or(REST_EMISSIVE)
            }
        }
    }

    // Every mesh that has a material, in traversal order
    pub fn parts(&self) -> Vec<Part<'_>> {
        match self {
            Shape::DefaultBox { mesh, material } => vec![Part { mesh: &**mesh, material }],
            Shape::Loaded { root, .. } => {
                let mut parts = Vec::new();
                collect_parts(root, &mut parts);
                parts
            }
        }
    }
}

fn collect_parts<'a>(node: &'a ShapeNode, parts: &mut Vec<Part<'a>>) {
    if let (Some(mesh), Some(material)) = (node.mesh.as_deref(), node.material.as_ref()) {
        parts.push(Part { mesh, material });
    }
    for child in &node.children {
        collect_parts(child, parts);
    }
}
