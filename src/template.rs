/*
 * Template Module
 *
 * This module decouples what a body renders as from the physics. It holds at
 * most one active object template and produces independently owned, tinted
 * shape instances from it (or default boxes when no template is active).
 *
 * Templates come from files. glTF (.gltf/.glb) scenes are read through the
 * gltf crate with node transforms baked into the vertices, and Wavefront OBJ
 * is parsed here. Other model formats are reported as unsupported so the
 * caller can keep whatever template was active before.
 */

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nalgebra::{Matrix4, Point3};
use thiserror::Error;

use crate::shape::{Color, Mesh, Shape, ShapeNode};

// Largest bounding-box dimension of an instantiated template
pub const TEMPLATE_TARGET_SIZE: f32 = 1.2;

// Default box dimensions
pub const BOX_WIDTH: f32 = 1.5;
pub const BOX_HEIGHT: f32 = 1.5;
pub const BOX_DEPTH: f32 = 0.5;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported template format {extension:?} (supported: gltf, glb, obj)")]
    UnsupportedFormat { extension: String },

    #[error("failed to import glTF {path:?}: {source}")]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("template contains no renderable geometry")]
    Empty,
}

// An externally supplied shape hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTemplate {
    pub name: String,
    pub root: ShapeNode,
}

impl ObjectTemplate {
    pub fn new(name: impl Into<String>, root: ShapeNode) -> Result<Self, TemplateError> {
        if root.mesh_count() == 0 || root.bounds().is_none() {
            return Err(TemplateError::Empty);
        }
        Ok(Self { name: name.into(), root })
    }

    // Parse Wavefront OBJ text; `o`/`g` statements start new child nodes
    pub fn from_obj_str(name: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        let root = parse_obj(source)?;
        Self::new(name, root)
    }

    // Uniform scale that maps the largest dimension to `target`
    pub fn fit_scale(&self, target: f32) -> f32 {
        match self.root.bounds() {
            Some(bounds) if bounds.max_dimension() > f32::EPSILON => target / bounds.max_dimension(),
            _ => 1.0,
        }
    }
}

// Load a template from disk, dispatching on the file extension
pub fn load_template(path: &Path) -> Result<ObjectTemplate, TemplateError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("template")
        .to_string();

    match extension.as_str() {
        "gltf" | "glb" => {
            let root = import_gltf(path)?;
            ObjectTemplate::new(name, root)
        }
        "obj" => {
            let source = fs::read_to_string(path).map_err(|source| TemplateError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            ObjectTemplate::from_obj_str(name, &source)
        }
        _ => Err(TemplateError::UnsupportedFormat { extension }),
    }
}

// Holds the active template and instantiates body shapes from it
#[derive(Debug, Clone)]
pub struct TemplateSlot {
    active: Option<Arc<ObjectTemplate>>,
    box_mesh: Arc<Mesh>,
    target_size: f32,
}

impl Default for TemplateSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateSlot {
    pub fn new() -> Self {
        Self {
            active: None,
            box_mesh: Arc::new(Mesh::cuboid(BOX_WIDTH, BOX_HEIGHT, BOX_DEPTH)),
            target_size: TEMPLATE_TARGET_SIZE,
        }
    }

    pub fn active(&self) -> Option<&ObjectTemplate> {
        self.active.as_deref()
    }

    pub fn is_custom(&self) -> bool {
        self.active.is_some()
    }

    pub fn set_template(&mut self, template: ObjectTemplate) {
        tracing::info!(name = %template.name, meshes = template.root.mesh_count(), "template activated");
        self.active = Some(Arc::new(template));
    }

    // Back to default boxes
    pub fn clear(&mut self) {
        if self.active.take().is_some() {
            tracing::info!("template cleared, using default boxes");
        }
    }

    // Load and activate; on failure the current template stays active
    pub fn load(&mut self, path: &Path) -> Result<(), TemplateError> {
        match load_template(path) {
            Ok(template) => {
                self.set_template(template);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "template load failed");
                Err(err)
            }
        }
    }

    // Produce an independently owned shape tinted with `color`
    pub fn instantiate(&self, color: Color) -> Shape {
        match &self.active {
            Some(template) => {
                let mut shape = Shape::Loaded {
                    root: template.root.clone(),
                    scale: template.fit_scale(self.target_size),
                };
                shape.tint_all(color);
                shape
            }
            None => Shape::default_box(Arc::clone(&self.box_mesh), color),
        }
    }
}

// Default scene (or the first one) as a node tree; each glTF node keeps its
// name and carries the triangles of all its primitives in scene space
fn import_gltf(path: &Path) -> Result<ShapeNode, TemplateError> {
    let (document, buffers, _images) = gltf::import(path).map_err(|source| TemplateError::Gltf {
        path: path.to_path_buf(),
        source,
    })?;

    let mut root = ShapeNode::group("root");
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                root.children.push(gltf_node(&node, &buffers, &Matrix4::identity()));
            }
        }
        // No scene graph: take the meshes as they are
        None => {
            for mesh in document.meshes() {
                let geometry = gltf_mesh(&mesh, &buffers, &Matrix4::identity());
                if !geometry.is_empty() {
                    root.children.push(ShapeNode::with_mesh(mesh.name().unwrap_or("mesh"), geometry));
                }
            }
        }
    }
    Ok(root)
}

fn gltf_node(node: &gltf::Node, buffers: &[gltf::buffer::Data], parent: &Matrix4<f32>) -> ShapeNode {
    // glTF matrices are column-major, as are nalgebra's array conversions
    let world = parent * Matrix4::from(node.transform().matrix());
    let name = node.name().unwrap_or("node");

    let mut shape = match node.mesh().map(|mesh| gltf_mesh(&mesh, buffers, &world)) {
        Some(geometry) if !geometry.is_empty() => ShapeNode::with_mesh(name, geometry),
        _ => ShapeNode::group(name),
    };
    for child in node.children() {
        shape.children.push(gltf_node(&child, buffers, &world));
    }
    shape
}

fn gltf_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data], transform: &Matrix4<f32>) -> Mesh {
    let mut geometry = Mesh::default();

    for primitive in mesh.primitives() {
        // Points and lines have no surface to draw
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            continue;
        }
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));
        let positions: Vec<Point3<f32>> = match reader.read_positions() {
            Some(positions) => positions
                .map(|[x, y, z]| transform.transform_point(&Point3::new(x, y, z)))
                .collect(),
            None => continue,
        };
        let indices: Vec<usize> = match reader.read_indices() {
            Some(indices) => indices.into_u32().map(|i| i as usize).collect(),
            None => (0..positions.len()).collect(),
        };

        let offset = geometry.vertices.len();
        for triangle in indices.chunks_exact(3) {
            if triangle.iter().all(|&i| i < positions.len()) {
                geometry.triangles.push([offset + triangle[0], offset + triangle[1], offset + triangle[2]]);
            }
        }
        geometry.vertices.extend(positions);
    }
    geometry
}

fn parse_obj(source: &str) -> Result<ShapeNode, TemplateError> {
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut root = ShapeNode::group("root");
    let mut current = ObjGroup::new("default");

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or("");
        match keyword {
            "v" => {
                let coords: Vec<f32> = tokens
                    .take(3)
                    .map(|t| t.parse::<f32>())
                    .collect::<Result<_, _>>()
                    .map_err(|e| parse_error(line_no, format!("bad vertex coordinate: {e}")))?;
                if coords.len() != 3 || coords.iter().any(|c| !c.is_finite()) {
                    return Err(parse_error(line_no, "vertex needs three finite coordinates"));
                }
                positions.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            "f" => {
                let indices = tokens
                    .map(|t| resolve_index(t, positions.len(), line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                if indices.len() < 3 {
                    return Err(parse_error(line_no, "face needs at least three vertices"));
                }
                current.push_polygon(&indices, &positions);
            }
            "o" | "g" => {
                let name = tokens.collect::<Vec<_>>().join(" ");
                let finished = std::mem::replace(&mut current, ObjGroup::new(&name));
                if let Some(node) = finished.into_node() {
                    root.children.push(node);
                }
            }
            // Normals, texture coordinates, materials and smoothing are not needed
            _ => {}
        }
    }

    if let Some(node) = current.into_node() {
        root.children.push(node);
    }
    Ok(root)
}

fn parse_error(line: usize, reason: impl Into<String>) -> TemplateError {
    TemplateError::Parse { line, reason: reason.into() }
}

// `7`, `7/1`, `7//3`, `-1/2/3` -> zero-based index into the vertex list
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> Result<usize, TemplateError> {
    let first = token.split('/').next().unwrap_or("");
    let value: i64 = first
        .parse()
        .map_err(|_| parse_error(line, format!("bad face index {token:?}")))?;

    let resolved = if value > 0 {
        value - 1
    } else if value < 0 {
        vertex_count as i64 + value
    } else {
        -1
    };

    if resolved < 0 || resolved as usize >= vertex_count {
        return Err(parse_error(line, format!("face index {value} out of range")));
    }
    Ok(resolved as usize)
}

// Faces collected for one object/group, with vertices remapped locally
struct ObjGroup {
    name: String,
    mesh: Mesh,
    remap: HashMap<usize, usize>,
}

impl ObjGroup {
    fn new(name: &str) -> Self {
        Self { name: name.to_string(), mesh: Mesh::default(), remap: HashMap::new() }
    }

    fn local(&mut self, global: usize, positions: &[Point3<f32>]) -> usize {
        let mesh = &mut self.mesh;
        *self.remap.entry(global).or_insert_with(|| {
            mesh.vertices.push(positions[global]);
            mesh.vertices.len() - 1
        })
    }

    // Fan triangulation
    fn push_polygon(&mut self, indices: &[usize], positions: &[Point3<f32>]) {
        let anchor = self.local(indices[0], positions);
        for pair in indices[1..].windows(2) {
            let b = self.local(pair[0], positions);
            let c = self.local(pair[1], positions);
            self.mesh.triangles.push([anchor, b, c]);
        }
    }

    fn into_node(self) -> Option<ShapeNode> {
        if self.mesh.is_empty() {
            return None;
        }
        Some(ShapeNode::with_mesh(self.name, self.mesh))
    }
}
