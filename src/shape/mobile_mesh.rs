use crate::bounding_volume::{details, Aabb};
use crate::math::{Matrix, Point, Real, RigidTransform, Vector};
use crate::partitioning::{Bvh, BvhNode};
use crate::query::{self, Ray, RayHit, TriangleSidedness};
use crate::shape::{Shape, ShapeDistributionInformation, ShapeError, ShapeType, SupportMap, Triangle};
use crate::utils::outer_product;

/// The faces of a [`MobileMeshShape`] that collide, and whether its interior is solid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum MobileMeshSolidity {
    /// Only the faces seeing their vertices in clockwise order collide.
    Clockwise,
    /// Only the faces seeing their vertices in counterclockwise order collide.
    Counterclockwise,
    /// Both faces of every triangle collide.
    #[default]
    DoubleSided,
    /// The mesh is a closed surface enclosing a solid volume.
    ///
    /// Triangles are reoriented at construction so their counterclockwise faces point outward.
    /// A ray starting inside of the mesh hits it at `t = 0`.
    Solid,
}

/// A triangle mesh attached to a moving body.
///
/// Triangles are indexed by a bounding volume hierarchy built once at construction: the mesh
/// geometry never changes, only the transform of the collidable using it.
#[derive(Clone, Debug)]
pub struct MobileMeshShape {
    vertices: Vec<Point>,
    indices: Vec<[u32; 3]>,
    bvh: Bvh,
    solidity: MobileMeshSolidity,
}

impl MobileMeshShape {
    /// Builds a mobile mesh from its vertex buffer and index buffer.
    pub fn new(
        vertices: Vec<Point>,
        mut indices: Vec<[u32; 3]>,
        solidity: MobileMeshSolidity,
    ) -> Result<Self, ShapeError> {
        if indices.is_empty() {
            return Err(ShapeError::EmptyMesh);
        }

        for (triangle, idx) in indices.iter().enumerate() {
            if let Some(index) = idx.iter().find(|i| **i as usize >= vertices.len()) {
                return Err(ShapeError::InvalidTriangleIndex {
                    triangle,
                    index: *index,
                    vertex_count: vertices.len(),
                });
            }
        }

        if solidity == MobileMeshSolidity::Solid && signed_volume(&vertices, &indices) < 0.0 {
            log::debug!("Flipping the winding of a solid mobile mesh so its faces point outward.");
            for idx in &mut indices {
                idx.swap(1, 2);
            }
        }

        let bvh = Bvh::from_iter(indices.iter().enumerate().map(|(i, idx)| {
            (i, Aabb::from_points(idx.iter().map(|v| vertices[*v as usize])))
        }));

        Ok(Self {
            vertices,
            indices,
            bvh,
            solidity,
        })
    }

    /// The vertex buffer of this mesh.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// The index buffer of this mesh.
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// The hierarchy over the triangles of this mesh.
    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// The solidity of this mesh.
    pub fn solidity(&self) -> MobileMeshSolidity {
        self.solidity
    }

    /// The number of triangles of this mesh.
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// The sidedness used for ray casts on the triangles of this mesh.
    pub fn sidedness(&self) -> TriangleSidedness {
        match self.solidity {
            MobileMeshSolidity::Clockwise => TriangleSidedness::Clockwise,
            MobileMeshSolidity::Counterclockwise | MobileMeshSolidity::Solid => {
                TriangleSidedness::Counterclockwise
            }
            MobileMeshSolidity::DoubleSided => TriangleSidedness::DoubleSided,
        }
    }

    /// The `i`-th triangle of this mesh, with the sidedness of the mesh.
    pub fn triangle(&self, i: u32) -> Triangle {
        let idx = self.indices[i as usize];
        Triangle {
            a: self.vertices[idx[0] as usize],
            b: self.vertices[idx[1] as usize],
            c: self.vertices[idx[2] as usize],
            sidedness: self.sidedness(),
        }
    }

    /// Is the given point inside of the volume enclosed by this mesh?
    ///
    /// A ray is cast from `point` toward `+Y`: the point is inside if the closest triangle hit
    /// is seen from its back face. Only meaningful for closed meshes.
    pub fn is_local_point_inside(&self, point: &Point) -> bool {
        let ray = Ray::new(*point, Vector::y());
        let hit = self.bvh.cast_ray(&ray, Real::MAX, |i, best| {
            let mut tri = self.triangle(i);
            tri.sidedness = TriangleSidedness::DoubleSided;
            tri.cast_local_ray(&ray, best).map(|hit| (hit.t, i))
        });

        match hit {
            Some((_, (_, i))) => self.triangle(i).scaled_normal().dot(&ray.dir) > 0.0,
            None => false,
        }
    }

    fn compute_shell_distribution(&self) -> ShapeDistributionInformation {
        let mut area = 0.0;
        let mut weighted_center = Vector::zeros();
        let mut covariance = Matrix::zeros();

        for i in 0..self.indices.len() as u32 {
            let tri = self.triangle(i);
            let tri_area = tri.area();
            area += tri_area;
            weighted_center += tri.center().coords * tri_area;
            covariance += tri.covariance();
        }

        if area == 0.0 {
            let center = Aabb::from_points(self.vertices.iter().copied()).center();
            return ShapeDistributionInformation {
                center,
                ..Default::default()
            };
        }

        let center = Point::from(weighted_center / area);
        ShapeDistributionInformation::from_covariance(0.0, area, center, &covariance)
    }
}

/// The signed volume enclosed by a triangle mesh.
///
/// Positive if the counterclockwise faces of its triangles point outward.
fn signed_volume(vertices: &[Point], indices: &[[u32; 3]]) -> Real {
    indices
        .iter()
        .map(|idx| {
            let [a, b, c] = idx.map(|i| vertices[i as usize].coords);
            a.dot(&b.cross(&c))
        })
        .sum::<Real>()
        / 6.0
}

impl Shape for MobileMeshShape {
    fn shape_type(&self) -> ShapeType {
        ShapeType::MobileMesh
    }

    fn compute_local_aabb(&self) -> Aabb {
        self.bvh.root_aabb()
    }

    fn compute_aabb(&self, transform: &RigidTransform) -> Aabb {
        details::point_cloud_aabb(transform, &self.vertices)
    }

    fn compute_distribution_information(&self) -> ShapeDistributionInformation {
        if self.solidity != MobileMeshSolidity::Solid {
            return self.compute_shell_distribution();
        }

        let mut det_sum = 0.0;
        let mut weighted_center = Vector::zeros();
        let mut covariance = Matrix::zeros();

        // Sum of the tetrahedra formed by each triangle and the origin.
        for idx in &self.indices {
            let [a, b, c] = idx.map(|i| self.vertices[i as usize].coords);
            let det = a.dot(&b.cross(&c));
            let sum = a + b + c;
            det_sum += det;
            weighted_center += sum * (det / 24.0);
            covariance += (outer_product(&a, &a)
                + outer_product(&b, &b)
                + outer_product(&c, &c)
                + outer_product(&sum, &sum))
                * (det / 120.0);
        }

        let volume = det_sum / 6.0;
        let extents = self.compute_local_aabb().extents();
        let bound_volume = extents.x * extents.y * extents.z;

        if volume.abs() <= Real::EPSILON * bound_volume {
            log::debug!("Solid mobile mesh with no volume, using its surface distribution.");
            return self.compute_shell_distribution();
        }

        let center = Point::from(weighted_center / volume);
        ShapeDistributionInformation::from_covariance(volume, volume, center, &covariance)
    }

    fn cast_local_ray(&self, ray: &Ray, max_t: Real) -> Option<RayHit> {
        if self.solidity == MobileMeshSolidity::Solid && self.is_local_point_inside(&ray.origin) {
            return Some(RayHit::inside(ray));
        }

        self.bvh
            .cast_ray(ray, max_t, |i, best| {
                self.triangle(i)
                    .cast_local_ray(ray, best)
                    .map(|hit| (hit.t, hit))
            })
            .map(|(_, (_, hit))| hit)
    }

    fn cast_local_shape(
        &self,
        cast_shape: &dyn SupportMap,
        start: &RigidTransform,
        sweep: &Vector,
        max_t: Real,
    ) -> Option<RayHit> {
        let cast_aabb = details::support_map_aabb(start, cast_shape);
        let half_extents = cast_aabb.half_extents();
        let center_ray = Ray::new(cast_aabb.center(), *sweep);

        // A node is reached by the moving shape when the ray followed by the center of its AABB
        // hits the node AABB dilated by the half-extents of the moving AABB.
        let node_cost = |node: &BvhNode, best: Real| {
            let aabb = node.aabb();
            Aabb::new(aabb.mins - half_extents, aabb.maxs + half_extents)
                .cast_local_ray(&center_ray, best, true)
                .unwrap_or(Real::MAX)
        };

        let identity = RigidTransform::identity();
        self.bvh
            .find_best(max_t, node_cost, |i, best| {
                let tri = self.triangle(i);
                query::cast_support_maps(cast_shape, start, sweep, &tri, &identity, best)
                    .map(|hit| (hit.t, hit))
            })
            .map(|(_, (_, hit))| hit)
    }
}
