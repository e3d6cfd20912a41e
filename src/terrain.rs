/// Ground height at `(x, z)`.
///
/// Physics and mesh placement must both sample this same function.
pub fn ground_height(x: f32, z: f32) -> f32 {
    let ripple = (x * 0.2).sin() * (z * 0.2).cos() * 0.1;
    0.25 + ripple
}
