//! Surface estimates for the foam and cardboard liner.

/// Inputs for a liner estimate, all in inches as `(face_a, face_b, depth)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinerInput {
    /// Padded interior of the crate.
    pub internal_in: (f64, f64, f64),
    /// Contents before perimeter padding (between-item padding included).
    pub content_in: (f64, f64, f64),
}

/// Strategy for the liner surface that foam and cardboard sheets must cover.
pub trait LinerSurface: Send + Sync {
    fn inner_surface_in2(&self, input: &LinerInput) -> f64;
}

/// Surface of a rectangular box.
pub fn box_surface_in2((w, h, d): (f64, f64, f64)) -> f64 {
    2.0 * (w * h + w * d + h * d)
}

/// Liner equal to the padded interior's outer surface, the same area the
/// plywood estimate uses. Overestimates foam and cardboard for thick padding;
/// kept as the default so existing quotes do not move.
#[derive(Debug, Default, Clone, Copy)]
pub struct OuterSurface;

impl LinerSurface for OuterSurface {
    fn inner_surface_in2(&self, input: &LinerInput) -> f64 {
        box_surface_in2(input.internal_in)
    }
}

/// Liner measured on the contents, i.e. the inner face of the perimeter padding.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentSurface;

impl LinerSurface for ContentSurface {
    fn inner_surface_in2(&self, input: &LinerInput) -> f64 {
        box_surface_in2(input.content_in)
    }
}
