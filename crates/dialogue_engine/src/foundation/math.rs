//! Math utilities and types
//!
//! Thin aliases over `nalgebra` used for colours and camera placement.

pub use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// 3D vector type (positions and RGB colours)
pub type Vec3 = Vector3<f32>;

/// 4D vector type (RGBA colours)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Utility functions for common math operations
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Aspect ratio of a pixel extent, guarding against a zero height
    pub fn aspect_ratio(size: (u32, u32)) -> f32 {
        let height = size.1.max(1);
        size.0 as f32 / height as f32
    }
}
