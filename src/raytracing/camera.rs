use image::RgbaImage;
use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::error::ConfigError;
use super::math::{Rgba, Vec3};
use super::ray::Ray;
use super::scene::SceneQuery;
use super::shader::{Shader, ShaderConfig};

pub const DEFAULT_WORKERS: usize = 6;

/// Plain camera description, validated by [`Camera::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f64,
    pub width: u32,
    pub height: u32,
    pub workers: usize,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            position: Vec3::new(0.0, 0.0, 10.0),
            look_at: Vec3::zero(),
            fov: 60.0,
            width: 640,
            height: 480,
            workers: DEFAULT_WORKERS,
        }
    }
}

// orthonormal base and view plane extent, everything a primary ray needs
#[derive(Debug, Clone, Copy)]
struct View {
    position: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    half_width: f64,
    half_height: f64,
    width: u32,
    height: u32,
}

impl View {
    fn new(position: Vec3, look_at: Vec3, fov: f64, width: u32, height: u32) -> Result<View, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::Camera(format!(
                "image size {}x{} has no pixels",
                width, height
            )));
        }
        if !(fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::out_of_range(
                "field of view",
                fov,
                "a value in (0, 180) degrees",
            ));
        }
        let to_target = look_at - position;
        if to_target.len() < 1e-9 || !to_target.is_finite() {
            return Err(ConfigError::Camera(
                "the camera is looking at its own position".to_string(),
            ));
        }
        let forward = to_target.normalize();
        // looking straight up or down, any horizontal axis works as right
        let mut right = forward.cross(Vec3::y_axis());
        if right.len() < 1e-9 {
            right = forward.cross(Vec3::z_axis());
        }
        let right = right.normalize();
        let up = right.cross(forward).normalize();

        let half_height = (fov.to_radians() * 0.5).tan();
        let half_width = half_height * width as f64 / height as f64;
        Ok(View {
            position,
            forward,
            right,
            up,
            half_width,
            half_height,
            width,
            height,
        })
    }

    /// Ray through the center of pixel (x, y), row 0 being the top of the image.
    fn primary_ray<'a>(&self, x: u32, y: u32) -> Ray<'a> {
        let u = ((x as f64 + 0.5) / self.width as f64 * 2.0 - 1.0) * self.half_width;
        let v = (1.0 - (y as f64 + 0.5) / self.height as f64 * 2.0) * self.half_height;
        let direction = self.forward + self.right * u + self.up * v;
        Ray::new(self.position, direction.normalize())
    }
}

/// Renders a scene into an internal pixel buffer on a bounded pool of workers.
pub struct Camera {
    config: CameraConfig,
    view: View,
    shader_config: ShaderConfig,
    pool: ThreadPool,
    pixels: Vec<Rgba>,
}

fn build_pool(workers: usize) -> Result<ThreadPool, ConfigError> {
    if workers == 0 {
        return Err(ConfigError::out_of_range(
            "workers",
            0.0,
            "at least one worker",
        ));
    }
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|error| ConfigError::WorkerPool(error.to_string()))
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

impl Camera {
    pub fn new(config: CameraConfig) -> Result<Camera, ConfigError> {
        let view = View::new(
            config.position,
            config.look_at,
            config.fov,
            config.width,
            config.height,
        )?;
        let pool = build_pool(config.workers)?;
        Ok(Camera {
            config,
            view,
            shader_config: ShaderConfig::default(),
            pool,
            pixels: vec![Rgba::transparent_black(); pixel_count(config.width, config.height)],
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn shader_config(&self) -> &ShaderConfig {
        &self.shader_config
    }

    pub fn set_shader_config(&mut self, shader_config: ShaderConfig) {
        self.shader_config = shader_config;
    }

    pub fn set_view(&mut self, position: Vec3, look_at: Vec3, fov: f64) -> Result<(), ConfigError> {
        self.view = View::new(position, look_at, fov, self.config.width, self.config.height)?;
        self.config.position = position;
        self.config.look_at = look_at;
        self.config.fov = fov;
        Ok(())
    }

    /// Changes the image size, clearing the pixel buffer.
    pub fn set_resolution(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        self.view = View::new(
            self.config.position,
            self.config.look_at,
            self.config.fov,
            width,
            height,
        )?;
        self.config.width = width;
        self.config.height = height;
        self.pixels = vec![Rgba::transparent_black(); pixel_count(width, height)];
        Ok(())
    }

    pub fn set_workers(&mut self, workers: usize) -> Result<(), ConfigError> {
        self.pool = build_pool(workers)?;
        self.config.workers = workers;
        Ok(())
    }

    pub fn primary_ray<'a>(&self, x: u32, y: u32) -> Ray<'a> {
        self.view.primary_ray(x, y)
    }

    /// Traces every pixel of the image, one row per task.
    pub fn render<S: SceneQuery + Sync>(&mut self, scene: &S) {
        info!(
            "rendering {}x{} on {} workers",
            self.config.width, self.config.height, self.config.workers
        );
        let view = &self.view;
        let shader_config = self.shader_config;
        let pixels = &mut self.pixels;
        self.pool.install(|| {
            pixels
                .par_chunks_mut(view.width as usize)
                .enumerate()
                .for_each(|(y, row)| {
                    let shader = Shader::new(scene, shader_config);
                    for (x, pixel) in row.iter_mut().enumerate() {
                        let ray = view.primary_ray(x as u32, y as u32);
                        *pixel = shader.shade(&ray, 0);
                    }
                })
        });
        debug!("frame done");
    }

    /// Row major linear colors of the last render.
    pub fn image_buffer(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn to_image(&self, gamma_correction: bool) -> RgbaImage {
        let width = self.config.width;
        RgbaImage::from_fn(width, self.config.height, |x, y| {
            let index = y as usize * width as usize + x as usize;
            image::Rgba(self.pixels[index].to_rgba8(gamma_correction))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::material::StandardMaterial;
    use crate::raytracing::primitive::{Primitive, Shape};
    use crate::raytracing::scene::{Light, Scene};
    use float_cmp::approx_eq;
    use std::sync::Arc;

    fn small_config() -> CameraConfig {
        CameraConfig {
            width: 24,
            height: 16,
            ..Default::default()
        }
    }

    fn test_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(
            Primitive::new(Shape::Plane, Vec3::new(0.0, -2.0, 0.0), Vec3::zero(), Vec3::new(10.0, 10.0, 10.0)),
        );
        scene.add_object(Primitive::unit(Shape::Sphere).with_material(Arc::new(StandardMaterial::glass())));
        scene.add_object(
            Primitive::new(Shape::Cube, Vec3::new(2.0, 0.0, -2.0), Vec3::zero(), Vec3::one())
                .with_material(Arc::new(StandardMaterial::metal())),
        );
        scene.add_light(Light::new(Vec3::new(0.0, 3.0, 1.0), Vec3::one(), 0.9));
        scene
    }

    #[test]
    fn center_ray_points_at_the_target() {
        let camera = Camera::new(CameraConfig {
            width: 3,
            height: 3,
            ..Default::default()
        })
        .unwrap();
        let ray = camera.primary_ray(1, 1);
        assert!(ray.direction.distance(-Vec3::z_axis()) < 1e-12);
        assert!(ray.inside.is_empty());
    }

    #[test]
    fn top_left_pixel_looks_up_and_left() {
        let camera = Camera::new(small_config()).unwrap();
        let ray = camera.primary_ray(0, 0);
        assert!(ray.direction.x < 0.0 && ray.direction.y > 0.0);
        assert!(approx_eq!(f64, ray.direction.len(), 1.0, epsilon = 1e-12));
    }

    #[test]
    fn field_of_view_spans_the_image_height() {
        let camera = Camera::new(CameraConfig {
            fov: 90.0,
            width: 1,
            height: 1000,
            ..Default::default()
        })
        .unwrap();
        // the top row is almost 45 degrees above the forward axis
        let top = camera.primary_ray(0, 0).direction;
        assert!(approx_eq!(f64, top.y, -top.z, epsilon = 1e-3));
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let base = CameraConfig::default();
        let invalid = [
            CameraConfig { width: 0, ..base },
            CameraConfig { fov: 0.0, ..base },
            CameraConfig { fov: 180.0, ..base },
            CameraConfig {
                look_at: base.position,
                ..base
            },
            CameraConfig { workers: 0, ..base },
        ];
        for config in invalid {
            assert!(Camera::new(config).is_err(), "{:?}", config);
        }
    }

    #[test]
    fn looking_straight_down_is_valid() {
        let camera = Camera::new(CameraConfig {
            position: Vec3::new(0.0, 10.0, 0.0),
            ..small_config()
        })
        .unwrap();
        let ray = camera.primary_ray(12, 8);
        assert!(ray.direction.y < -0.99);
    }

    #[test]
    fn output_does_not_depend_on_the_worker_count() {
        let scene = test_scene();
        let mut single = Camera::new(CameraConfig {
            workers: 1,
            ..small_config()
        })
        .unwrap();
        let mut many = Camera::new(CameraConfig {
            workers: 4,
            ..small_config()
        })
        .unwrap();
        single.render(&scene);
        many.render(&scene);
        assert_eq!(single.image_buffer(), many.image_buffer());

        many.render(&scene);
        assert_eq!(single.image_buffer(), many.image_buffer());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn pixel_count_does_not_wrap_around() {
        assert_eq!(pixel_count(70_000, 70_000), 4_900_000_000);
    }

    #[test]
    fn resolution_change_resizes_the_buffer() {
        let scene = test_scene();
        let mut camera = Camera::new(small_config()).unwrap();
        camera.set_resolution(8, 4).unwrap();
        camera.render(&scene);
        assert_eq!(camera.image_buffer().len(), 32);
        let image = camera.to_image(false);
        assert_eq!(image.dimensions(), (8, 4));
        assert!(camera.set_resolution(0, 4).is_err());
        assert_eq!(camera.width(), 8);
    }
}
