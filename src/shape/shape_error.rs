/// Errors raised while building a shape.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// A compound shape needs at least one child.
    #[error("a compound shape needs at least one child")]
    EmptyCompound,
    /// The weights of the children of a compound shape add up to zero.
    #[error("the children weights of the compound shape add up to zero")]
    ZeroTotalWeight,
    /// A triangle mesh needs at least one triangle.
    #[error("a mobile mesh needs at least one triangle")]
    EmptyMesh,
    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references the vertex {index} out of {vertex_count} vertices")]
    InvalidTriangleIndex {
        /// The index of the faulty triangle.
        triangle: usize,
        /// The out-of-bounds vertex index.
        index: u32,
        /// The number of vertices of the mesh.
        vertex_count: usize,
    },
}
