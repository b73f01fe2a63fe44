//! Binary STL export.

use crate::SolidMesh;

/// Encode meshes as one binary STL document.
///
/// `header` is truncated or space-padded to the fixed 80 bytes.
pub fn stl_bytes<'a, I>(meshes: I, header: &str) -> Vec<u8>
where
    I: IntoIterator<Item = &'a SolidMesh>,
    I::IntoIter: Clone,
{
    let meshes = meshes.into_iter();
    let num_triangles: usize = meshes.clone().map(|m| m.num_triangles()).sum();
    let mut data = Vec::with_capacity(84 + num_triangles * 50);

    let mut head = [b' '; 80];
    let n = header.len().min(80);
    head[..n].copy_from_slice(&header.as_bytes()[..n]);
    data.extend_from_slice(&head);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for mesh in meshes {
        for i in 0..mesh.num_triangles() {
            let n = mesh
                .triangle_cross(i)
                .try_normalize(1e-20)
                .unwrap_or_else(tablewright_math::Vec3::z);
            for c in [n.x, n.y, n.z] {
                data.extend_from_slice(&(c as f32).to_le_bytes());
            }
            for p in mesh.triangle_points(i) {
                for c in [p.x, p.y, p.z] {
                    data.extend_from_slice(&(c as f32).to_le_bytes());
                }
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
    }
    data
}
