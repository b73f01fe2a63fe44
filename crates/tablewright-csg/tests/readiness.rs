//! Cutting before the kernel is initialised.
//!
//! Kept in its own test binary so no other test has initialised the
//! process-wide kernel first.

use tablewright_csg::{cut, init_kernel, is_ready, kernel, CsgError, MortiseSpec};
use tablewright_math::{Point3, Vec3};
use tablewright_mesh::SolidMesh;

#[test]
fn cut_waits_for_kernel() {
    let block = SolidMesh::cuboid(2.0, 2.0, 2.0);
    let pocket = MortiseSpec::into_face(Point3::new(1.0, 0.0, 0.0), Vec3::x(), 0.5, 0.5, 0.5);

    assert!(!is_ready());
    assert_eq!(kernel().unwrap_err(), CsgError::NotReady);
    assert_eq!(cut(&block, &[pocket.clone()]).unwrap_err(), CsgError::NotReady);

    init_kernel();
    init_kernel();
    assert!(is_ready());
    let outcome = cut(&block, &[pocket]).unwrap();
    assert!((outcome.mesh.volume() - (8.0 - 0.125)).abs() < 1e-6);
}
