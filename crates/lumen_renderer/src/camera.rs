//! Camera and frame scheduling.

use crate::{detect_thread_count, partition_rows, render_band, Color, ImageBuffer, RowBand, Scene};
use lumen_math::{Ray, Vec3};
use std::time::Instant;

/// Per-render settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Render row bands in parallel; otherwise one band on the caller's thread
    pub use_multithreading: bool,
    /// Maximum number of mirror bounces per camera ray
    pub max_reflections: u32,
    /// Worker count override; `None` uses every hardware thread
    pub thread_count: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            use_multithreading: true,
            max_reflections: 5,
            thread_count: None,
        }
    }
}

/// Mapping from pixel coordinates to the view plane one unit in front of
/// the camera.
///
/// The plane spans x in [-0.5, 0.5) left to right and is scaled vertically
/// by the image aspect ratio, top row first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPlane {
    pub interval_x: f64,
    pub interval_y: f64,
    pub half_height: f64,
}

impl ViewPlane {
    pub fn new(width: u32, height: u32) -> Self {
        let ratio = f64::from(width) / f64::from(height);
        let plane_height = 1.0 / ratio;
        Self {
            interval_x: 1.0 / f64::from(width),
            interval_y: plane_height / f64::from(height),
            half_height: plane_height * 0.5,
        }
    }

    /// Camera ray from `origin` through pixel (x, y).
    #[inline]
    pub fn primary_ray(&self, origin: Vec3, x: u32, y: u32) -> Ray {
        let y_coord = self.half_height - f64::from(y) * self.interval_y;
        let x_coord = -0.5 + f64::from(x) * self.interval_x;
        Ray::towards(origin, origin + Vec3::new(x_coord, y_coord, 1.0))
    }
}

/// Pinhole camera looking down +z.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    pub settings: RenderSettings,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -1.0))
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            settings: RenderSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_multithreading(mut self, enabled: bool) -> Self {
        self.settings.use_multithreading = enabled;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Prepare `scene` and render it into `image`.
    pub fn render(&self, image: &mut ImageBuffer, scene: &mut Scene) {
        scene.prepare();
        self.render_prepared(image, scene);
    }

    /// Render an already prepared scene into `image`.
    ///
    /// Returns once every row is written. Output is identical for any
    /// number of workers.
    pub fn render_prepared(&self, image: &mut ImageBuffer, scene: &Scene) {
        let (width, height) = (image.width, image.height);
        if width == 0 || height == 0 {
            log::debug!("Nothing to render for a {}x{} image", width, height);
            return;
        }

        let expected = width as usize * height as usize;
        if image.pixels.len() != expected {
            image.pixels.resize(expected, Color::ZERO);
        }

        let view = ViewPlane::new(width, height);
        let start = Instant::now();

        let threads = if self.settings.use_multithreading {
            self.settings.thread_count.unwrap_or_else(detect_thread_count).max(1)
        } else {
            1
        };

        if threads == 1 {
            let band = RowBand::new(0, height, 0);
            render_band(&band, &mut image.pixels, width, self, scene, &view);
        } else {
            self.render_parallel(image, scene, &view, threads);
        }

        log::debug!(
            "Rendered {}x{} in {:.2?} ({} thread{})",
            width,
            height,
            start.elapsed(),
            threads,
            if threads == 1 { "" } else { "s" }
        );
    }

    fn render_parallel(&self, image: &mut ImageBuffer, scene: &Scene, view: &ViewPlane, threads: usize) {
        let width = image.width;
        let bands = partition_rows(image.height, threads);

        let pool = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool,
            Err(err) => {
                log::warn!("Failed to start {threads} render threads ({err}), rendering on one");
                let band = RowBand::new(0, image.height, 0);
                render_band(&band, &mut image.pixels, width, self, scene, view);
                return;
            }
        };

        let mut remaining: &mut [Color] = &mut image.pixels;
        pool.scope(|s| {
            for band in &bands {
                let (rows, rest) = std::mem::take(&mut remaining).split_at_mut(band.pixel_count(width));
                remaining = rest;
                s.spawn(move |_| render_band(band, rows, width, self, scene, view));
            }
        });
    }
}
