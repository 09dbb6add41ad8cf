use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

use crate::scene::Shape;

/// Triangle mesh ready for upload: per-vertex positions and normals plus
/// indexed triangles, wound counter-clockwise facing out.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Flip winding and normals so the interior faces the camera. Used for
    /// the glow shell, which is seen from inside-out.
    pub fn inverted(mut self) -> Self {
        for triangle in self.indices.chunks_exact_mut(3) {
            triangle.swap(1, 2);
        }
        for normal in &mut self.normals {
            for component in normal.iter_mut() {
                *component = -*component;
            }
        }
        self
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
    }

    /// One flat-shaded triangle with its corners projected onto the sphere
    /// of the given radius.
    fn push_facet(&mut self, a: Vec3, b: Vec3, c: Vec3, radius: f32) {
        let a = a.normalize() * radius;
        let b = b.normalize() * radius;
        let c = c.normalize() * radius;
        let normal = (b - a).cross(c - a).normalize();
        let base = self.positions.len() as u32;
        self.push_vertex(a, normal);
        self.push_vertex(b, normal);
        self.push_vertex(c, normal);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Quad grid over rows of `segments + 1` vertices, rows ordered top to
    /// bottom along the surface.
    fn push_grid(&mut self, rows: u32, segments: u32) {
        for row in 0..rows {
            for seg in 0..segments {
                let a = row * (segments + 1) + seg;
                let b = a + segments + 1;
                self.indices
                    .extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }
    }
}

/// Build the mesh for one randomized shape.
pub fn generate(shape: &Shape) -> MeshData {
    match *shape {
        Shape::Icosahedron { radius } => icosahedron(radius, 1),
        Shape::TorusKnot { radius, tube, p, q } => torus_knot(radius, tube, p, q),
        Shape::Capsule { radius, length } => capsule(radius, length),
        Shape::Dodecahedron { radius } => dodecahedron(radius),
        Shape::Cone { radius, height } => cone(radius, height),
    }
}

/// Subdivided icosahedron projected onto a sphere, flat-shaded so the
/// facets read as cut gem faces.
pub fn icosahedron(radius: f32, detail: u32) -> MeshData {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let corners = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    let faces = 20 * 4usize.pow(detail);
    let mut mesh = MeshData::with_capacity(faces * 3, faces * 3);
    for face in FACES {
        subdivide(
            &mut mesh,
            corners[face[0]],
            corners[face[1]],
            corners[face[2]],
            detail,
            radius,
        );
    }
    mesh
}

fn subdivide(mesh: &mut MeshData, a: Vec3, b: Vec3, c: Vec3, detail: u32, radius: f32) {
    if detail == 0 {
        mesh.push_facet(a, b, c, radius);
        return;
    }
    let ab = (a + b) * 0.5;
    let bc = (b + c) * 0.5;
    let ca = (c + a) * 0.5;
    subdivide(mesh, a, ab, ca, detail - 1, radius);
    subdivide(mesh, ab, b, bc, detail - 1, radius);
    subdivide(mesh, ca, bc, c, detail - 1, radius);
    subdivide(mesh, ab, bc, ca, detail - 1, radius);
}

/// Regular dodecahedron projected onto a sphere, flat-shaded.
pub fn dodecahedron(radius: f32) -> MeshData {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let r = 1.0 / t;
    let corners = [
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(0.0, -r, -t),
        Vec3::new(0.0, -r, t),
        Vec3::new(0.0, r, -t),
        Vec3::new(0.0, r, t),
        Vec3::new(-r, -t, 0.0),
        Vec3::new(-r, t, 0.0),
        Vec3::new(r, -t, 0.0),
        Vec3::new(r, t, 0.0),
        Vec3::new(-t, 0.0, -r),
        Vec3::new(t, 0.0, -r),
        Vec3::new(-t, 0.0, r),
        Vec3::new(t, 0.0, r),
    ];
    // Twelve pentagons, each fanned into three triangles.
    const FACES: [[usize; 3]; 36] = [
        [3, 11, 7],
        [3, 7, 15],
        [3, 15, 13],
        [7, 19, 17],
        [7, 17, 6],
        [7, 6, 15],
        [17, 4, 8],
        [17, 8, 10],
        [17, 10, 6],
        [8, 0, 16],
        [8, 16, 2],
        [8, 2, 10],
        [0, 12, 1],
        [0, 1, 18],
        [0, 18, 16],
        [6, 10, 2],
        [6, 2, 13],
        [6, 13, 15],
        [2, 16, 18],
        [2, 18, 3],
        [2, 3, 13],
        [18, 1, 9],
        [18, 9, 11],
        [18, 11, 3],
        [4, 14, 12],
        [4, 12, 0],
        [4, 0, 8],
        [11, 9, 5],
        [11, 5, 19],
        [11, 19, 7],
        [19, 5, 14],
        [19, 14, 4],
        [19, 4, 17],
        [1, 12, 14],
        [1, 14, 5],
        [1, 5, 9],
    ];

    let mut mesh = MeshData::with_capacity(FACES.len() * 3, FACES.len() * 3);
    for face in FACES {
        mesh.push_facet(corners[face[0]], corners[face[1]], corners[face[2]], radius);
    }
    mesh
}

const KNOT_TUBULAR_SEGMENTS: u32 = 140;
const KNOT_RADIAL_SEGMENTS: u32 = 18;

/// Tube swept along a (p, q) torus knot, smooth-shaded.
pub fn torus_knot(radius: f32, tube: f32, p: u32, q: u32) -> MeshData {
    let tubular = KNOT_TUBULAR_SEGMENTS;
    let radial = KNOT_RADIAL_SEGMENTS;
    let mut mesh = MeshData::with_capacity(
        ((tubular + 1) * (radial + 1)) as usize,
        (tubular * radial * 6) as usize,
    );

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p as f32 * TAU;
        let here = knot_point(u, p, q, radius);
        let ahead = knot_point(u + 0.01, p, q, radius);
        let tangent = ahead - here;
        let binormal = tangent.cross(ahead + here);
        let normal = binormal.cross(tangent).normalize();
        let binormal = binormal.normalize();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let offset = normal * (-tube * v.cos()) + binormal * (tube * v.sin());
            mesh.push_vertex(here + offset, offset.normalize());
        }
    }

    // Rings advance along the curve, which runs opposite to the grid helper's
    // top-down assumption, so the quads are emitted mirrored.
    for i in 0..tubular {
        for j in 0..radial {
            let a = i * (radial + 1) + j;
            let b = a + radial + 1;
            mesh.indices
                .extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}

fn knot_point(u: f32, p: u32, q: u32, radius: f32) -> Vec3 {
    let qu = q as f32 / p as f32 * u;
    let ring = 2.0 + qu.cos();
    Vec3::new(
        radius * ring * 0.5 * u.cos(),
        radius * ring * 0.5 * u.sin(),
        radius * qu.sin() * 0.5,
    )
}

const CAPSULE_CAP_RINGS: u32 = 12;
const CAPSULE_SEGMENTS: u32 = 32;

/// Cylinder of the given length between two hemispherical caps, aligned
/// with the Y axis and smooth-shaded.
pub fn capsule(radius: f32, length: f32) -> MeshData {
    let rings = CAPSULE_CAP_RINGS;
    let segments = CAPSULE_SEGMENTS;
    let half = length / 2.0;
    let rows = 2 * rings + 2;
    let mut mesh = MeshData::with_capacity(
        (rows * (segments + 1)) as usize,
        ((rows - 1) * segments * 6) as usize,
    );

    let push_ring = |mesh: &mut MeshData, polar: f32, center_y: f32| {
        let ring_radius = polar.sin() * radius;
        let y = center_y + polar.cos() * radius;
        for seg in 0..=segments {
            let theta = seg as f32 / segments as f32 * TAU;
            let normal = Vec3::new(
                polar.sin() * theta.cos(),
                polar.cos(),
                polar.sin() * theta.sin(),
            );
            let position = Vec3::new(
                ring_radius * theta.cos(),
                y,
                ring_radius * theta.sin(),
            );
            mesh.push_vertex(position, normal);
        }
    };

    for ring in 0..=rings {
        let polar = ring as f32 / rings as f32 * FRAC_PI_2;
        push_ring(&mut mesh, polar, half);
    }
    for ring in 0..=rings {
        let polar = FRAC_PI_2 + ring as f32 / rings as f32 * FRAC_PI_2;
        push_ring(&mut mesh, polar, -half);
    }

    mesh.push_grid(rows - 1, segments);
    mesh
}

const CONE_SEGMENTS: u32 = 32;

/// Cone along the Y axis, apex up, with a base cap.
pub fn cone(radius: f32, height: f32) -> MeshData {
    let segments = CONE_SEGMENTS;
    let half = height / 2.0;
    let slope = radius / height;
    let mut mesh = MeshData::with_capacity(
        (2 * (segments + 1) + segments + 2) as usize,
        (segments * 3 * 2) as usize,
    );

    // Apex ring carries one vertex per segment so each slant normal stays
    // sharp at the tip.
    for row in 0..2u32 {
        let ring_radius = if row == 0 { 0.0 } else { radius };
        let y = if row == 0 { half } else { -half };
        for seg in 0..=segments {
            let theta = seg as f32 / segments as f32 * TAU;
            let normal = Vec3::new(theta.cos(), slope, theta.sin()).normalize();
            mesh.push_vertex(
                Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin()),
                normal,
            );
        }
    }
    for seg in 0..segments {
        let apex = seg;
        let b = segments + 1 + seg;
        mesh.indices.extend_from_slice(&[apex, b + 1, b]);
    }

    // Base cap.
    let center = mesh.positions.len() as u32;
    mesh.push_vertex(Vec3::new(0.0, -half, 0.0), Vec3::NEG_Y);
    for seg in 0..=segments {
        let theta = seg as f32 / segments as f32 * TAU;
        mesh.push_vertex(
            Vec3::new(radius * theta.cos(), -half, radius * theta.sin()),
            Vec3::NEG_Y,
        );
    }
    for seg in 0..segments {
        mesh.indices
            .extend_from_slice(&[center, center + 1 + seg, center + 2 + seg]);
    }
    mesh
}

/// UV sphere centered at the origin, smooth-shaded.
pub fn uv_sphere(radius: f32, rings: u32, segments: u32) -> MeshData {
    let rings = rings.max(2);
    let segments = segments.max(3);
    let mut mesh = MeshData::with_capacity(
        ((rings + 1) * (segments + 1)) as usize,
        (rings * segments * 6) as usize,
    );

    for ring in 0..=rings {
        let polar = ring as f32 / rings as f32 * PI;
        let y = polar.cos() * radius;
        let ring_radius = polar.sin() * radius;
        for seg in 0..=segments {
            let theta = seg as f32 / segments as f32 * TAU;
            let position = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
            mesh.push_vertex(position, position.normalize());
        }
    }

    mesh.push_grid(rings, segments);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometric_normal(mesh: &MeshData, triangle: &[u32]) -> Vec3 {
        let a = Vec3::from_array(mesh.positions[triangle[0] as usize]);
        let b = Vec3::from_array(mesh.positions[triangle[1] as usize]);
        let c = Vec3::from_array(mesh.positions[triangle[2] as usize]);
        (b - a).cross(c - a)
    }

    fn assert_winding_matches_normals(mesh: &MeshData) {
        assert!(!mesh.is_empty());
        for triangle in mesh.indices.chunks_exact(3) {
            let averaged = triangle
                .iter()
                .map(|&i| Vec3::from_array(mesh.normals[i as usize]))
                .fold(Vec3::ZERO, |acc, n| acc + n);
            let geometric = geometric_normal(mesh, triangle);
            if geometric.length() > 1e-8 {
                assert!(geometric.dot(averaged) > 0.0);
            }
        }
    }

    fn assert_faces_point_away_from_origin(mesh: &MeshData) {
        for triangle in mesh.indices.chunks_exact(3) {
            let normal = geometric_normal(mesh, triangle);
            // Pole rows collapse to zero-area quads; skip those.
            if normal.length() < 1e-8 {
                continue;
            }
            let centroid = triangle
                .iter()
                .map(|&i| Vec3::from_array(mesh.positions[i as usize]))
                .fold(Vec3::ZERO, |acc, p| acc + p)
                / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn icosahedron_counts() {
        let base = icosahedron(1.0, 0);
        assert_eq!(base.triangle_count(), 20);
        assert_eq!(base.vertex_count(), 60);
        let refined = icosahedron(1.0, 1);
        assert_eq!(refined.triangle_count(), 80);
        assert_eq!(refined.vertex_count(), 240);
    }

    #[test]
    fn polyhedra_sit_on_their_sphere() {
        for mesh in [icosahedron(2.0, 1), dodecahedron(2.0)] {
            for position in &mesh.positions {
                assert!((Vec3::from_array(*position).length() - 2.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn dodecahedron_counts() {
        let mesh = dodecahedron(1.5);
        assert_eq!(mesh.triangle_count(), 36);
        assert_eq!(mesh.vertex_count(), 108);
    }

    #[test]
    fn convex_solids_face_outward() {
        assert_faces_point_away_from_origin(&icosahedron(1.3, 1));
        assert_faces_point_away_from_origin(&dodecahedron(1.3));
        assert_faces_point_away_from_origin(&uv_sphere(5.0, 16, 24));
    }

    #[test]
    fn torus_knot_counts() {
        let mesh = torus_knot(1.2, 0.3, 2, 3);
        let rows = KNOT_TUBULAR_SEGMENTS + 1;
        let cols = KNOT_RADIAL_SEGMENTS + 1;
        assert_eq!(mesh.vertex_count(), (rows * cols) as usize);
        assert_eq!(
            mesh.triangle_count(),
            (KNOT_TUBULAR_SEGMENTS * KNOT_RADIAL_SEGMENTS * 2) as usize
        );
        let max = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn smooth_meshes_wind_with_their_normals() {
        assert_winding_matches_normals(&torus_knot(1.2, 0.3, 2, 3));
        assert_winding_matches_normals(&torus_knot(0.9, 0.4, 3, 5));
        assert_winding_matches_normals(&capsule(1.0, 0.8));
        assert_winding_matches_normals(&cone(1.5, 3.0));
        assert_winding_matches_normals(&uv_sphere(5.0, 24, 32));
    }

    #[test]
    fn normals_are_unit_length() {
        for mesh in [
            icosahedron(1.8, 1),
            torus_knot(1.0, 0.25, 2, 5),
            capsule(0.9, 1.1),
            cone(1.2, 2.8),
        ] {
            for normal in &mesh.normals {
                assert!((Vec3::from_array(*normal).length() - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn capsule_bounds() {
        let radius = 1.0;
        let length = 0.8;
        let mesh = capsule(radius, length);
        let mut max_y = f32::MIN;
        let mut max_radial = f32::MIN;
        for position in &mesh.positions {
            let p = Vec3::from_array(*position);
            max_y = max_y.max(p.y.abs());
            max_radial = max_radial.max((p.x * p.x + p.z * p.z).sqrt());
        }
        assert!((max_y - (length / 2.0 + radius)).abs() < 1e-3);
        assert!((max_radial - radius).abs() < 1e-3);
    }

    #[test]
    fn cone_spans_its_height() {
        let mesh = cone(1.1, 3.0);
        let ys: Vec<f32> = mesh.positions.iter().map(|p| p[1]).collect();
        assert!(ys.iter().any(|&y| (y - 1.5).abs() < 1e-5));
        assert!(ys.iter().any(|&y| (y + 1.5).abs() < 1e-5));
        assert!(mesh.normals.iter().any(|n| n[1] < -0.99));
    }

    #[test]
    fn inversion_flips_winding() {
        let mesh = uv_sphere(5.0, 8, 12);
        let inverted = mesh.clone().inverted();
        for (a, b) in mesh.indices.chunks_exact(3).zip(inverted.indices.chunks_exact(3)) {
            assert_eq!(a[0], b[0]);
            assert_eq!(a[1], b[2]);
            assert_eq!(a[2], b[1]);
        }
        for (a, b) in mesh.normals.iter().zip(&inverted.normals) {
            assert_eq!(a[0], -b[0]);
        }
    }

    #[test]
    fn generate_covers_every_shape() {
        let shapes = [
            Shape::Icosahedron { radius: 1.8 },
            Shape::TorusKnot {
                radius: 1.2,
                tube: 0.3,
                p: 2,
                q: 3,
            },
            Shape::Capsule {
                radius: 1.0,
                length: 0.8,
            },
            Shape::Dodecahedron { radius: 1.6 },
            Shape::Cone {
                radius: 1.4,
                height: 3.2,
            },
        ];
        for shape in &shapes {
            let mesh = generate(shape);
            assert!(!mesh.is_empty());
            assert_eq!(mesh.positions.len(), mesh.normals.len());
        }
    }
}
