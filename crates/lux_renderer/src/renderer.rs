//! Progressive frame loop.
//!
//! [`ProgressiveRenderer`] owns everything that persists between frames: the
//! accumulation buffer, the frame counter and the per-pixel index scramble.
//! Each call to `render_frame` traces `samples_per_frame` paths per pixel,
//! one rayon task per image row, and folds the frame into the history.

use std::time::Instant;

use lux_core::{AreaLight, Camera, Color, Scene, Uniforms};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::accumulation::{blend, AccumulationBuffer};
use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::integrator::Integrator;
use crate::oracle::IntersectionOracle;
use crate::sequence::SequenceGenerator;

/// Per-pixel starting indices into the sample sequence.
///
/// Without a scramble every pixel would walk the same sequence points and the
/// image would show structured aliasing instead of noise.
pub fn pixel_offsets(width: u32, height: u32, seed: u64) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width as usize * height as usize).map(|_| rng.gen()).collect()
}

/// Drives frame-by-frame rendering into an accumulation buffer.
pub struct ProgressiveRenderer {
    config: RenderConfig,
    accumulation: AccumulationBuffer,
    pixel_offsets: Vec<u32>,
    frame_index: u32,
    last_view: Option<(Camera, AreaLight)>,
}

impl ProgressiveRenderer {
    pub fn new(width: u32, height: u32, config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        check_resolution(width, height)?;

        Ok(Self {
            accumulation: AccumulationBuffer::new(width, height),
            pixel_offsets: pixel_offsets(width, height, config.seed),
            config,
            frame_index: 0,
            last_view: None,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Frames accumulated since the last reset.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn accumulation(&self) -> &AccumulationBuffer {
        &self.accumulation
    }

    /// Render one frame and fold it into the history.
    ///
    /// Resets the history first when the camera or light differs from the
    /// previous frame's. Returns the number of frames accumulated so far.
    pub fn render_frame<O: IntersectionOracle + ?Sized>(
        &mut self,
        scene: &Scene,
        oracle: &O,
        camera: Camera,
        light: AreaLight,
    ) -> RenderResult<u32> {
        scene.validate()?;
        self.update_view(camera, light);

        let uniforms = Uniforms {
            width: self.accumulation.width(),
            height: self.accumulation.height(),
            frame_index: self.frame_index,
            camera,
            light,
        };

        let start = Instant::now();
        let integrator = Integrator::new(scene, oracle, &self.config);
        let samples = self.config.samples_per_frame;
        let offsets = &self.pixel_offsets;
        let width = uniforms.width as usize;
        let frame_index = self.frame_index;
        let first_sample = frame_index.wrapping_mul(samples);

        self.accumulation.rows_mut().for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let base = offsets[y * width + x].wrapping_add(first_sample);
                let mut sum = Color::ZERO;
                for s in 0..samples {
                    let mut rng = SequenceGenerator::new(base.wrapping_add(s), 0);
                    sum += integrator.sample(&uniforms, x as u32, y as u32, &mut rng);
                }
                *pixel = blend(*pixel, frame_index, sum / samples as f32);
            }
        });

        self.frame_index += 1;
        log::debug!(
            "Frame {} rendered in {:?} ({}x{}, {} spp)",
            self.frame_index,
            start.elapsed(),
            uniforms.width,
            uniforms.height,
            samples
        );

        Ok(self.frame_index)
    }

    /// Restart accumulation from frame zero.
    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.accumulation.reset();
        log::debug!("Accumulation reset");
    }

    /// Change the output resolution. Discards the history.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        check_resolution(width, height)?;
        self.accumulation = AccumulationBuffer::new(width, height);
        self.pixel_offsets = pixel_offsets(width, height, self.config.seed);
        self.frame_index = 0;
        log::info!("Resized to {}x{}", width, height);
        Ok(())
    }

    /// Record the view for the next frame, resetting accumulation if it
    /// changed. Returns whether a reset happened.
    pub fn update_view(&mut self, camera: Camera, light: AreaLight) -> bool {
        let view = Some((camera, light));
        if self.last_view == view {
            return false;
        }
        let changed = self.last_view.is_some();
        self.last_view = view;
        if changed {
            self.reset();
        }
        changed
    }
}

fn check_resolution(width: u32, height: u32) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidResolution { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bvh::TriangleBvh;
    use lux_core::presets::cornell_box;
    use lux_math::Vec3;

    #[test]
    fn test_pixel_offsets_deterministic() {
        let a = pixel_offsets(4, 3, 11);
        assert_eq!(a.len(), 12);
        assert_eq!(a, pixel_offsets(4, 3, 11));
        assert_ne!(a, pixel_offsets(4, 3, 12));
    }

    #[test]
    fn test_rejects_zero_resolution() {
        assert!(matches!(
            ProgressiveRenderer::new(0, 4, RenderConfig::default()),
            Err(RenderError::InvalidResolution { width: 0, height: 4 })
        ));
        let mut renderer = ProgressiveRenderer::new(2, 2, RenderConfig::default()).unwrap();
        assert!(renderer.resize(2, 0).is_err());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = RenderConfig {
            samples_per_frame: 0,
            ..Default::default()
        };
        assert!(ProgressiveRenderer::new(2, 2, config).is_err());
    }

    #[test]
    fn test_update_view_resets_on_change() {
        let setup = cornell_box(1.0).unwrap();
        let bvh = TriangleBvh::build(&setup.scene);
        let mut renderer = ProgressiveRenderer::new(4, 4, RenderConfig::default()).unwrap();

        assert_eq!(renderer.render_frame(&setup.scene, &bvh, setup.camera, setup.light).unwrap(), 1);
        assert_eq!(renderer.render_frame(&setup.scene, &bvh, setup.camera, setup.light).unwrap(), 2);
        assert!(!renderer.update_view(setup.camera, setup.light));

        let mut moved = setup.camera;
        moved.position += Vec3::new(0.1, 0.0, 0.0);
        assert_eq!(renderer.render_frame(&setup.scene, &bvh, moved, setup.light).unwrap(), 1);

        let mut dimmer = setup.light;
        dimmer.color *= 0.5;
        assert!(renderer.update_view(moved, dimmer));
        assert_eq!(renderer.frame_index(), 0);
        assert!(renderer.accumulation().pixels().iter().all(|p| *p == Vec3::ZERO));
    }

    #[test]
    fn test_resize_discards_history() {
        let setup = cornell_box(1.0).unwrap();
        let bvh = TriangleBvh::build(&setup.scene);
        let mut renderer = ProgressiveRenderer::new(4, 4, RenderConfig::default()).unwrap();
        renderer.render_frame(&setup.scene, &bvh, setup.camera, setup.light).unwrap();

        renderer.resize(8, 2).unwrap();
        assert_eq!(renderer.frame_index(), 0);
        assert_eq!(renderer.accumulation().width(), 8);
        assert_eq!(renderer.accumulation().pixels().len(), 16);
    }

    #[test]
    fn test_frames_are_reproducible() {
        let setup = cornell_box(1.0).unwrap();
        let bvh = TriangleBvh::build(&setup.scene);
        let config = RenderConfig {
            samples_per_frame: 2,
            seed: 5,
            ..Default::default()
        };

        let mut a = ProgressiveRenderer::new(8, 8, config.clone()).unwrap();
        let mut b = ProgressiveRenderer::new(8, 8, config).unwrap();
        for _ in 0..3 {
            a.render_frame(&setup.scene, &bvh, setup.camera, setup.light).unwrap();
            b.render_frame(&setup.scene, &bvh, setup.camera, setup.light).unwrap();
        }
        assert_eq!(a.accumulation().pixels(), b.accumulation().pixels());
    }

    #[test]
    fn test_cornell_box_smoke() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (width, height) = (32, 32);
        let setup = cornell_box(width as f32 / height as f32).unwrap();
        let bvh = TriangleBvh::build(&setup.scene);
        let config = RenderConfig {
            samples_per_frame: 4,
            ..Default::default()
        };
        let mut renderer = ProgressiveRenderer::new(width, height, config).unwrap();

        for _ in 0..4 {
            renderer.render_frame(&setup.scene, &bvh, setup.camera, setup.light).unwrap();
        }
        assert_eq!(renderer.frame_index(), 4);

        let pixels = renderer.accumulation().pixels();
        assert!(pixels.iter().all(|p| p.is_finite() && p.min_element() >= 0.0));

        // Ceiling light seen directly, near the top center
        let light = renderer.accumulation().get(16, 4);
        assert!((light - setup.light.color).length() < 1e-4, "{light:?}");

        // Red left wall, directly lit by the ceiling light
        let wall = renderer.accumulation().get(1, 16);
        assert!(wall.x > 0.0 && wall.x > wall.z, "{wall:?}");

        let mean = pixels.iter().copied().sum::<Vec3>() / pixels.len() as f32;
        assert!(mean.max_element() > 0.01 && mean.max_element() < 4.0, "mean {mean:?}");
    }
}
