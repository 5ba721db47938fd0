use colorings::{ColorInfo, Coloring};
use errors::*;
use image::PixelGrid;
use log::info;
use mandel_image::{render_rows, Frame, Mapping};

pub mod colorings;
pub mod errors;
pub mod image;
pub mod mandel_image;
pub mod presets;

/// The most iterations a point is given before it is taken to be in the set
pub const MAX_ITERATIONS: u32 = 200;
/// A point escapes once its magnitude exceeds this
pub const ESCAPE_RADIUS: f64 = 2.0;
/// Where the binary writes its image unless told otherwise
pub const DEFAULT_OUTPUT: &str = "mandelbrot.ppm";

const BOUND_NAMES: [&str; 4] = ["real_min", "real_max", "imag_min", "imag_max"];

/// A render job: the validated mapping and the coloring to paint it with
pub struct MandelReq {
    mapping: Mapping,
    coloring: Box<dyn Coloring>,
}

impl MandelReq {
    pub fn new(frame: Frame, width: i64, coloring: Box<dyn Coloring>) -> Result<MandelReq> {
        let mapping = Mapping::for_width(frame, width)?;
        Ok(MandelReq { mapping, coloring })
    }

    /// Build a request from the positional arguments
    /// `real_min real_max imag_min imag_max width` and a coloring name.
    /// Arguments after the fifth are ignored.
    pub fn parse<S: AsRef<str>>(positionals: &[S], coloring: &str) -> Result<MandelReq> {
        if positionals.len() < 5 {
            bail!(ErrorKind::Usage);
        }
        let mut bounds = [0.0; 4];
        for (i, name) in BOUND_NAMES.iter().enumerate() {
            bounds[i] = parse_number(name, positionals[i].as_ref())?;
        }
        let width = parse_number::<i64>("width", positionals[4].as_ref())?;
        let frame = Frame::new(bounds[0], bounds[1], bounds[2], bounds[3]);
        let coloring = ColorInfo::new().by_name(coloring)?;
        MandelReq::new(frame, width, coloring)
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn render(&self, threads: usize) -> PixelGrid {
        info!(
            "rendering {:?} into {}x{} pixels",
            self.mapping.frame(),
            self.mapping.width(),
            self.mapping.height()
        );
        render_rows(&self.mapping, self.coloring.as_ref(), threads)
    }
}

fn parse_number<T>(name: &str, text: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| ErrorKind::Parse(format!("{} '{}': {}", name, text, e)).into())
}
