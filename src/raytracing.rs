pub mod camera;
pub mod cook_torrance;
pub mod demo;
pub mod error;
pub mod material;
pub mod math;
pub mod parser;
pub mod primitive;
pub mod ray;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod transform;

pub use math::*;
