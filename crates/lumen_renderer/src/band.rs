//! Row-band partitioning for parallel rendering.
//!
//! The frame is cut into horizontal bands of contiguous rows, one per
//! worker. Bands never overlap, so workers write disjoint pixels and the
//! result does not depend on how many there are.

use crate::{Camera, Color, Scene, ViewPlane};

/// A contiguous range of image rows, `row_min..row_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    /// First row of the band
    pub row_min: u32,
    /// One past the last row of the band
    pub row_max: u32,
    /// Position of this band, top to bottom
    pub index: usize,
}

impl RowBand {
    pub fn new(row_min: u32, row_max: u32, index: usize) -> Self {
        Self {
            row_min,
            row_max,
            index,
        }
    }

    pub fn row_count(&self) -> u32 {
        self.row_max - self.row_min
    }

    /// Get the total number of pixels in this band.
    pub fn pixel_count(&self, width: u32) -> usize {
        self.row_count() as usize * width as usize
    }
}

/// Split `height` rows into `band_count` contiguous bands.
///
/// Every band gets `height / band_count` rows and the first
/// `height % band_count` bands get one more, so sizes differ by at most
/// one. A zero `band_count` is treated as one. Bands may be empty when
/// there are more bands than rows.
pub fn partition_rows(height: u32, band_count: usize) -> Vec<RowBand> {
    let band_count = band_count.max(1);
    let count = band_count as u64;
    let base = u64::from(height) / count;
    let remainder = u64::from(height) % count;

    let mut bands = Vec::with_capacity(band_count);
    let mut row = 0u64;
    for index in 0..band_count {
        let rows = base + u64::from((index as u64) < remainder);
        bands.push(RowBand::new(row as u32, (row + rows) as u32, index));
        row += rows;
    }
    bands
}

/// Number of hardware threads, or 1 when it cannot be determined.
pub fn detect_thread_count() -> usize {
    match std::thread::available_parallelism() {
        Ok(n) => n.get(),
        Err(err) => {
            log::warn!("Could not detect hardware threads ({err}), using 1");
            1
        }
    }
}

/// Render every pixel of `band` into `rows`, the band's slice of the frame.
pub fn render_band(
    band: &RowBand,
    rows: &mut [Color],
    width: u32,
    camera: &Camera,
    scene: &Scene,
    view: &ViewPlane,
) {
    debug_assert_eq!(rows.len(), band.pixel_count(width));
    if width == 0 {
        return;
    }
    let max_reflections = camera.settings.max_reflections;

    for (row, y) in rows.chunks_exact_mut(width as usize).zip(band.row_min..band.row_max) {
        for (x, pixel) in (0..width).zip(row.iter_mut()) {
            let ray = view.primary_ray(camera.position(), x, y);
            *pixel = scene.raycast(&ray, &ray, 0, max_reflections);
        }
    }
}
