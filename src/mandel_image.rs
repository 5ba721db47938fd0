use log::{debug, trace};
use num::Complex;
use scoped_threadpool::Pool;

use crate::colorings::{Color, ColorInfo, Coloring};
use crate::errors::*;
use crate::image::PixelGrid;
use crate::{ESCAPE_RADIUS, MAX_ITERATIONS};

#[derive(Clone, Copy, Debug, PartialEq)]
/// The rectangle of the complex plane that is rendered
pub struct Frame {
    pub real_min: f64,
    pub real_max: f64,
    pub imag_min: f64,
    pub imag_max: f64,
}

impl Frame {
    pub fn new(real_min: f64, real_max: f64, imag_min: f64, imag_max: f64) -> Frame {
        Frame {
            real_min,
            real_max,
            imag_min,
            imag_max,
        }
    }
    pub fn real_span(&self) -> f64 {
        self.real_max - self.real_min
    }
    pub fn imag_span(&self) -> f64 {
        self.imag_max - self.imag_min
    }
    /// Check that all bounds are finite and that both spans are positive
    pub fn validate(&self) -> Result<()> {
        let bounds = [self.real_min, self.real_max, self.imag_min, self.imag_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            bail!(ErrorKind::InvalidFrame(format!("bounds must be finite: {:?}", self)));
        }
        if self.real_max <= self.real_min {
            bail!(ErrorKind::InvalidFrame(format!(
                "real_max ({}) must be greater than real_min ({})",
                self.real_max, self.real_min
            )));
        }
        if self.imag_max <= self.imag_min {
            bail!(ErrorKind::InvalidFrame(format!(
                "imag_max ({}) must be greater than imag_min ({})",
                self.imag_max, self.imag_min
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A validated frame together with the pixel size of the image it is rendered into
pub struct Mapping {
    frame: Frame,
    width: usize,
    height: usize,
}

impl Mapping {
    /// Derive the image height from the aspect ratio of `frame`. The height
    /// is truncated toward zero.
    pub fn for_width(frame: Frame, width: i64) -> Result<Mapping> {
        if width <= 0 {
            bail!(ErrorKind::InvalidFrame(format!(
                "width must be positive, got {}",
                width
            )));
        }
        frame.validate()?;
        let height = (width as f64 * frame.imag_span() / frame.real_span()) as usize;
        if height == 0 {
            bail!(ErrorKind::InvalidFrame(format!(
                "a width of {} gives an image height of zero for {:?}",
                width, frame
            )));
        }
        let width = width as usize;
        if width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .is_none()
        {
            bail!(ErrorKind::InvalidFrame(format!(
                "an image of {}x{} pixels is too large",
                width, height
            )));
        }
        Ok(Mapping {
            frame,
            width,
            height,
        })
    }
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
}

/*
Pixel (x, y) is mapped to the plane point (real(x), imag(y)) with
real(x) = real_min + x * real_step
imag(y) = imag_min + y * imag_step
so column W and row H are never reached: the last pixel stops one step short of
real_max and imag_max. A row whose imaginary part lies within half a step of zero
is put exactly on the real axis. Columns get no such snap.
 */
pub struct PlaneMapper {
    real_min: f64,
    imag_min: f64,
    real_step: f64,
    imag_step: f64,
}

impl PlaneMapper {
    pub fn from_mapping(mapping: &Mapping) -> PlaneMapper {
        let frame = &mapping.frame;
        PlaneMapper {
            real_min: frame.real_min,
            imag_min: frame.imag_min,
            real_step: frame.real_span() / mapping.width as f64,
            imag_step: frame.imag_span() / mapping.height as f64,
        }
    }
    pub fn real_step(&self) -> f64 {
        self.real_step
    }
    pub fn imag_step(&self) -> f64 {
        self.imag_step
    }
    pub fn cvt_x(&self, x: usize) -> f64 {
        self.real_min + x as f64 * self.real_step
    }
    pub fn cvt_y(&self, y: usize) -> f64 {
        let imag = self.imag_min + y as f64 * self.imag_step;
        if imag.abs() < self.imag_step / 2.0 {
            0.0
        } else {
            imag
        }
    }
}

/// Return the number of iterations of `z = z*z + z0` before `|z|` exceeds the
/// escape radius, or `MAX_ITERATIONS` if it never does.
pub fn iterate(z0: Complex<f64>) -> u32 {
    let mut z = z0;
    for i in 0..MAX_ITERATIONS {
        if z.norm() > ESCAPE_RADIUS {
            return i;
        }
        z = z * z + z0;
    }
    MAX_ITERATIONS
}

// Fill consecutive rows of an image, starting at row `first_row`.
// `rows` holds whole rows of `width` pixels each.
fn fill_rows(
    rows: &mut [Color],
    first_row: usize,
    width: usize,
    mapper: &PlaneMapper,
    coloring: &dyn Coloring,
) {
    for (dy, line) in rows.chunks_mut(width).enumerate() {
        let y = first_row + dy;
        let imag = mapper.cvt_y(y);
        for (x, pixel) in line.iter_mut().enumerate() {
            let point = Complex::new(mapper.cvt_x(x), imag);
            *pixel = coloring.get(iterate(point), MAX_ITERATIONS);
        }
        trace!("rendered row {}", y);
    }
}

/// Render `frame` at `width` pixels wide with the classic palette
pub fn render(frame: &Frame, width: i64) -> Result<PixelGrid> {
    let mapping = Mapping::for_width(*frame, width)?;
    let coloring = ColorInfo::new().by_name("classic")?;
    Ok(render_rows(&mapping, coloring.as_ref(), 1))
}

/// Render a validated mapping, splitting the rows into `threads` disjoint
/// bands. Every band count produces the same grid.
pub fn render_rows(mapping: &Mapping, coloring: &dyn Coloring, threads: usize) -> PixelGrid {
    let mapper = PlaneMapper::from_mapping(mapping);
    let (w, h) = (mapping.width(), mapping.height());
    debug!(
        "rendering {}x{} pixels, real_step {} imag_step {}",
        w,
        h,
        mapper.real_step(),
        mapper.imag_step()
    );
    let mut grid = PixelGrid::new(w, h);
    let threads = threads.clamp(1, h);
    if threads == 1 {
        fill_rows(grid.pixels_mut(), 0, w, &mapper, coloring);
        return grid;
    }

    let rows_per_band = (h + threads - 1) / threads;
    debug!("{} threads, {} rows per band", threads, rows_per_band);
    let mut pool = Pool::new(threads as u32);
    pool.scoped(|scope| {
        for (band, rows) in grid.pixels_mut().chunks_mut(rows_per_band * w).enumerate() {
            let mapper = &mapper;
            scope.execute(move || {
                fill_rows(rows, band * rows_per_band, w, mapper, coloring);
            });
        }
    });
    grid
}
