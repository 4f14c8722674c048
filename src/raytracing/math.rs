pub mod color;
pub mod mat4;
pub mod vec3;

pub use color::*;
pub use mat4::*;
pub use vec3::*;
