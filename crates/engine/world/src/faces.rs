//! Exposed-face extraction
//!
//! A face needs geometry when the block owning it is solid on that side and
//! whatever lies across it is not. These functions only report such faces;
//! turning them into vertices is left to the mesh builder.

use glam::IVec3;
use octree::{Face, NodeRef};
use serde::{Deserialize, Serialize};

/// One visible face of a uniform leaf region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposedFace<T> {
    /// Global origin of the leaf
    pub position: IVec3,
    /// Edge length of the leaf
    pub size: i32,
    /// Single side of the leaf that is visible
    pub face: Face,
    pub value: T,
}

/// Every exposed face of every leaf below `node`
///
/// Leaves come in enumeration order, faces of one leaf in side order.
pub fn exposed_faces<T, F>(node: NodeRef<'_, T>, solidity: F) -> Vec<ExposedFace<T>>
where
    T: Clone,
    F: Fn(&T) -> Face,
{
    let mut faces = Vec::new();
    let mut leaves = 0usize;
    for leaf in node.leaves() {
        leaves += 1;
        collect_leaf(leaf, Face::ALL, &solidity, &mut faces);
    }
    tracing::debug!(
        origin = ?node.origin(),
        size = node.size(),
        leaves,
        faces = faces.len(),
        "Extracted exposed faces"
    );
    faces
}

/// Exposed faces on the `face` side of `node` only
///
/// Used to refresh a seam after the space across it changed, for example
/// when a neighbouring chunk is loaded.
pub fn boundary_faces<T, F>(node: NodeRef<'_, T>, face: Face, solidity: F) -> Vec<ExposedFace<T>>
where
    T: Clone,
    F: Fn(&T) -> Face,
{
    let mut faces = Vec::new();
    if face.is_empty() {
        return faces;
    }
    for leaf in node.leaves_facing(face) {
        collect_leaf(leaf, face, &solidity, &mut faces);
    }
    tracing::trace!(
        origin = ?node.origin(),
        ?face,
        faces = faces.len(),
        "Extracted boundary faces"
    );
    faces
}

fn collect_leaf<T, F>(leaf: NodeRef<'_, T>, sides: Face, solidity: &F, out: &mut Vec<ExposedFace<T>>)
where
    T: Clone,
    F: Fn(&T) -> Face,
{
    let Some(value) = leaf.leaf_value() else {
        return;
    };
    let solid = solidity(value) & sides;
    for side in solid.iter() {
        if leaf.is_face_exposed(side, solidity) {
            out.push(ExposedFace {
                position: leaf.origin(),
                size: leaf.size(),
                face: side,
                value: value.clone(),
            });
        }
    }
}
