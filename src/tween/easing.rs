/// Quadratic ease-out: fast start, gentle landing. `t` is clamped to 0..=1.
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}
