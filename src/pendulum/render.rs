//! Rasterizes the two projected trajectories into a PNG frame sequence.
//!
//! This is presentation glue: it consumes the Cartesian output of the core
//! and knows nothing about the integrator beyond its error type. Any other
//! backend could consume the same data via the `export` path.

use crate::core::{
    file_io::{serialize_to_json_or_panic, FilePrefix},
    image_utils::{ImageSpecification, PixelMapper},
    ode_solvers::StepSizeControl,
    stopwatch::Stopwatch,
};
use crate::pendulum::{
    dynamics::PhysicalParams,
    projection::{project, BobPositions, CartesianTrajectory},
    simulation::{simulate_pair, TimeGridParams},
};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

/// Complete parameter file for one chaos-demo run: physics, horizon, the two
/// initial conditions, and how to frame and color the output.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DoublePendulumParams {
    pub image_specification: ImageSpecification,
    pub physics: PhysicalParams,
    pub time_grid: TimeGridParams,
    /// (th1, w1, th2, w2) in radians and rad/s.
    pub baseline_state: [f64; 4],
    /// Nearly identical to `baseline_state`; the visual point of the demo.
    pub perturbed_state: [f64; 4],
    #[serde(default)]
    pub solver: StepSizeControl,
    pub background_color: [u8; 3],
    pub baseline_color: [u8; 3],
    pub perturbed_color: [u8; 3],
    pub bob_radius_pixels: i32,
}

/// Simulates both initial conditions, then writes one PNG per sample into
/// `<prefix>_frames/`, plus a copy of the params and timing diagnostics.
pub fn render_double_pendulum(
    params: &DoublePendulumParams,
    file_prefix: FilePrefix,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stopwatch = Stopwatch::new("Double Pendulum".to_owned());

    serialize_to_json_or_panic(file_prefix.full_path_with_suffix(".json"), &params);

    let (baseline, perturbed) = simulate_pair(
        &params.physics,
        &params.time_grid,
        params.baseline_state.into(),
        params.perturbed_state.into(),
        &params.solver,
    );
    let baseline = project(&params.physics, &baseline?);
    let perturbed = project(&params.physics, &perturbed?);
    stopwatch.record_split("simulate".to_owned());

    let frame_directory = file_prefix.full_path_with_suffix("_frames");
    std::fs::create_dir_all(&frame_directory)?;
    write_frames(params, &baseline, &perturbed, |idx| {
        frame_directory.join(format!("frame_{:05}.png", idx))
    })?;
    stopwatch.record_split("render_frames".to_owned());

    stopwatch.display(&mut file_prefix.create_file_with_suffix("_diagnostics.txt"))?;
    Ok(())
}

fn write_frames<F>(
    params: &DoublePendulumParams,
    baseline: &CartesianTrajectory,
    perturbed: &CartesianTrajectory,
    frame_path: F,
) -> Result<(), image::ImageError>
where
    F: Fn(usize) -> std::path::PathBuf + Sync,
{
    let mapper = PixelMapper::new(&params.image_specification);
    let resolution = &params.image_specification.resolution;

    // Frames are independent; rasterize them in parallel.
    (0..baseline.len()).into_par_iter().try_for_each(|idx| {
        let mut imgbuf = image::RgbImage::from_pixel(
            resolution[0],
            resolution[1],
            image::Rgb(params.background_color),
        );
        draw_pendulum(
            &mut imgbuf,
            &mapper,
            &perturbed.positions[idx],
            image::Rgb(params.perturbed_color),
            params.bob_radius_pixels,
        );
        draw_pendulum(
            &mut imgbuf,
            &mapper,
            &baseline.positions[idx],
            image::Rgb(params.baseline_color),
            params.bob_radius_pixels,
        );
        imgbuf.save(frame_path(idx))
    })
}

fn draw_pendulum(
    image: &mut image::RgbImage,
    mapper: &PixelMapper,
    positions: &BobPositions,
    color: image::Rgb<u8>,
    bob_radius: i32,
) {
    let pivot = nalgebra::Vector2::new(0.0, 0.0);
    draw_segment(image, mapper, &pivot, &positions.bob_1(), color);
    draw_segment(image, mapper, &positions.bob_1(), &positions.bob_2(), color);
    draw_disk(image, mapper.inverse_map(&positions.bob_1()), bob_radius, color);
    draw_disk(image, mapper.inverse_map(&positions.bob_2()), bob_radius, color);
}

/// Draws a line segment by sampling it at (at least) pixel density. Avoids a
/// full Bresenham implementation for rods a few hundred pixels long.
fn draw_segment(
    image: &mut image::RgbImage,
    mapper: &PixelMapper,
    begin: &nalgebra::Vector2<f64>,
    end: &nalgebra::Vector2<f64>,
    color: image::Rgb<u8>,
) {
    let (x0, y0) = mapper.inverse_map(begin);
    let (x1, y1) = mapper.inverse_map(end);
    // Endpoints can map to saturated pixel coordinates far off screen, so the
    // span is computed in i64 and capped at the image diagonal to keep the
    // sample count bounded.
    let diagonal = (image.width() + image.height()) as i64;
    let span = ((x1 as i64) - (x0 as i64))
        .abs()
        .max(((y1 as i64) - (y0 as i64)).abs());
    let n_samples = 2 * span.clamp(1, diagonal);
    for k in 0..=n_samples {
        let alpha = (k as f64) / (n_samples as f64);
        let point = begin + alpha * (end - begin);
        let (x, y) = mapper.inverse_map(&point);
        put_pixel_clipped(image, x, y, color);
    }
}

fn draw_disk(image: &mut image::RgbImage, center: (i32, i32), radius: i32, color: image::Rgb<u8>) {
    let (cx, cy) = center;
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel_clipped(image, cx + dx, cy + dy, color);
            }
        }
    }
}

fn put_pixel_clipped(image: &mut image::RgbImage, x: i32, y: i32, color: image::Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}
