//! Mapping between image (pixel) space and the real-valued plane in which the
//! pendulum swings.

use serde::{Deserialize, Serialize};

/// Fully specifies an image resolution and how it is anchored into "real"
/// space. The height in real space is derived from the aspect ratio of the
/// image and the specified width.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImageSpecification {
    pub resolution: nalgebra::Vector2<u32>,
    pub center: nalgebra::Vector2<f64>,
    pub width: f64,
}

impl ImageSpecification {
    pub fn height(&self) -> f64 {
        self.width * (self.resolution[1] as f64) / (self.resolution[0] as f64)
    }
}

/// Affine map from a pixel index to a real coordinate along one axis.
#[derive(Clone, Debug)]
pub struct LinearPixelMap {
    offset: f64,
    slope: f64,
}

impl LinearPixelMap {
    /// `n`: number of pixels spanned by `[x0, x1]`; the map sends pixel 0 to
    /// `x0` and pixel `n - 1` to `x1`.
    pub fn new(n: u32, x0: f64, x1: f64) -> LinearPixelMap {
        assert!(n > 0);
        LinearPixelMap {
            offset: x0,
            slope: (x1 - x0) / ((n - 1) as f64),
        }
    }

    pub fn new_from_center_and_width(n: u32, center: f64, width: f64) -> LinearPixelMap {
        LinearPixelMap::new(n, center - 0.5 * width, center + 0.5 * width)
    }

    /// Pixel index to real coordinate.
    pub fn map(&self, index: u32) -> f64 {
        self.offset + self.slope * (index as f64)
    }

    /// Real coordinate to pixel index. May land outside the image bounds;
    /// the caller is responsible for clipping.
    pub fn inverse_map(&self, point: f64) -> i32 {
        ((point - self.offset) / self.slope).round() as i32
    }
}

/// Maps 2D points to pixel coordinates and back. The vertical axis is
/// flipped so that +y in real space points up in the rendered image.
#[derive(Clone, Debug)]
pub struct PixelMapper {
    width: LinearPixelMap,
    height: LinearPixelMap,
}

impl PixelMapper {
    pub fn new(image_specification: &ImageSpecification) -> PixelMapper {
        PixelMapper {
            width: LinearPixelMap::new_from_center_and_width(
                image_specification.resolution[0],
                image_specification.center[0],
                image_specification.width,
            ),
            height: LinearPixelMap::new_from_center_and_width(
                image_specification.resolution[1],
                image_specification.center[1],
                -image_specification.height(),
            ),
        }
    }

    pub fn inverse_map(&self, point: &nalgebra::Vector2<f64>) -> (i32, i32) {
        (
            self.width.inverse_map(point[0]),
            self.height.inverse_map(point[1]),
        )
    }

    pub fn map(&self, pixel: &(u32, u32)) -> (f64, f64) {
        let (x, y) = pixel;
        (self.width.map(*x), self.height.map(*y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_spec() -> ImageSpecification {
        ImageSpecification {
            resolution: nalgebra::Vector2::new(101, 101),
            center: nalgebra::Vector2::new(0.0, 0.0),
            width: 4.0,
        }
    }

    #[test]
    fn height_follows_aspect_ratio() {
        let mut spec = square_spec();
        assert_relative_eq!(spec.height(), 4.0);
        spec.resolution = nalgebra::Vector2::new(200, 100);
        assert_relative_eq!(spec.height(), 2.0);
    }

    #[test]
    fn pixel_map_round_trip() {
        let mapper = PixelMapper::new(&square_spec());
        let center = nalgebra::Vector2::new(0.0, 0.0);
        assert_eq!(mapper.inverse_map(&center), (50, 50));

        let (x, y) = mapper.map(&(50, 50));
        assert_relative_eq!(x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn vertical_axis_points_up() {
        let mapper = PixelMapper::new(&square_spec());
        let above_center = nalgebra::Vector2::new(0.0, 1.0);
        let (_, row) = mapper.inverse_map(&above_center);
        // Up in real space is a smaller row index in the image.
        more_asserts::assert_lt!(row, 50);
    }
}
