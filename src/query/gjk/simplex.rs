use super::CsoPoint;
use crate::math::{Matrix, Matrix2, Point, Real, Vector, Vector2};
use arrayvec::ArrayVec;

/// Relative tolerance under which the vertices of a simplex are considered affinely dependent.
const DEGENERACY_EPSILON: Real = 1.0e-6;

/// A simplex of up to four points, with the barycentric coordinates of its last projection.
///
/// Projections are computed by enumerating every face of the simplex (Johnson's distance
/// sub-algorithm) and keeping the closest one whose barycentric coordinates are all positive.
#[derive(Clone, Debug, Default)]
pub struct Simplex {
    vertices: ArrayVec<CsoPoint, 4>,
    barycentric: ArrayVec<Real, 4>,
}

impl Simplex {
    /// An empty simplex.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every vertex of this simplex.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.barycentric.clear();
    }

    /// The vertices of this simplex.
    pub fn vertices(&self) -> &[CsoPoint] {
        &self.vertices
    }

    /// The number of vertices of this simplex.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Is this simplex empty?
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex to this simplex.
    ///
    /// Returns `false` (and leaves the simplex unchanged) if the simplex is full or already
    /// contains this point.
    pub fn add_vertex(&mut self, pt: CsoPoint) -> bool {
        if self.vertices.is_full() || self.vertices.iter().any(|v| v.point == pt.point) {
            return false;
        }

        self.vertices.push(pt);
        true
    }

    /// The largest squared distance between `x` and a vertex of this simplex.
    pub fn max_sq_distance_to(&self, x: &Point) -> Real {
        self.vertices
            .iter()
            .map(|v| (v.point - x).norm_squared())
            .fold(0.0, Real::max)
    }

    /// Projects `x` on the convex hull of this simplex.
    ///
    /// The simplex is reduced to the vertices of the smallest face containing the projection.
    /// Returns `x` itself if the simplex is empty.
    pub fn project(&mut self, x: &Point) -> Point {
        let n = self.vertices.len();
        let mut best: Option<(Real, u32, ArrayVec<Real, 4>)> = None;

        // Smaller faces are enumerated first so they win ties.
        for size in 1..=n as u32 {
            for mask in 1u32..(1 << n) {
                if mask.count_ones() != size {
                    continue;
                }

                let Some(weights) = self.face_barycentric_coordinates(mask, x) else {
                    continue;
                };

                if weights.iter().any(|w| *w < 0.0) {
                    continue;
                }

                let proj = self.face_point(mask, &weights, |v| v.point);
                let dist = (x - proj).norm_squared();

                if best.as_ref().map_or(true, |(best_dist, _, _)| dist < *best_dist) {
                    best = Some((dist, mask, weights));
                }
            }
        }

        let Some((_, mask, weights)) = best else {
            return *x;
        };

        let mut i = 0;
        self.vertices.retain(|_| {
            let keep = mask & (1 << i) != 0;
            i += 1;
            keep
        });
        self.barycentric = weights;

        self.combination(|v| v.point)
    }

    /// The point of the first shape matching the last projection computed by [`Self::project`].
    pub fn witness1(&self) -> Point {
        self.combination(|v| v.orig1)
    }

    /// The point of the second shape matching the last projection computed by [`Self::project`].
    pub fn witness2(&self) -> Point {
        self.combination(|v| v.orig2)
    }

    fn combination(&self, select: impl Fn(&CsoPoint) -> Point) -> Point {
        let mut result = Vector::zeros();
        for (v, w) in self.vertices.iter().zip(self.barycentric.iter()) {
            result += select(v).coords * *w;
        }
        Point::from(result)
    }

    fn face_point(
        &self,
        mask: u32,
        weights: &[Real],
        select: impl Fn(&CsoPoint) -> Point,
    ) -> Point {
        let mut result = Vector::zeros();
        let face = (0..self.vertices.len()).filter(|i| mask & (1 << i) != 0);
        for (i, w) in face.zip(weights.iter()) {
            result += select(&self.vertices[i]).coords * *w;
        }
        Point::from(result)
    }

    /// Barycentric coordinates of the projection of `x` on the affine hull of a face.
    ///
    /// Returns `None` if the face is degenerate.
    fn face_barycentric_coordinates(&self, mask: u32, x: &Point) -> Option<ArrayVec<Real, 4>> {
        let face: ArrayVec<&Point, 4> = self
            .vertices
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, v)| &v.point)
            .collect();
        let origin = face[0];
        let rel = x - origin;
        let mut result = ArrayVec::new();

        match face.len() {
            1 => result.push(1.0),
            2 => {
                let e = face[1] - origin;
                let e_sq = e.norm_squared();
                if e_sq <= 0.0 {
                    return None;
                }
                let mu = rel.dot(&e) / e_sq;
                result.extend([1.0 - mu, mu]);
            }
            3 => {
                let e1 = face[1] - origin;
                let e2 = face[2] - origin;
                let gram = Matrix2::new(e1.dot(&e1), e1.dot(&e2), e1.dot(&e2), e2.dot(&e2));
                if gram.determinant() <= DEGENERACY_EPSILON * gram.m11 * gram.m22 {
                    return None;
                }
                let mu = gram.try_inverse()? * Vector2::new(rel.dot(&e1), rel.dot(&e2));
                result.extend([1.0 - mu.x - mu.y, mu.x, mu.y]);
            }
            _ => {
                let edges = Matrix::from_columns(&[
                    face[1] - origin,
                    face[2] - origin,
                    face[3] - origin,
                ]);
                let scale = edges.column(0).norm() * edges.column(1).norm() * edges.column(2).norm();
                if edges.determinant().abs() <= DEGENERACY_EPSILON * scale {
                    return None;
                }
                let mu = edges.try_inverse()? * rel;
                result.extend([1.0 - mu.x - mu.y - mu.z, mu.x, mu.y, mu.z]);
            }
        }

        Some(result)
    }
}
