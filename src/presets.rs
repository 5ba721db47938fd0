use crate::mandel_image::Frame;

/// The image width used in the example invocations
pub const EXAMPLE_WIDTH: i64 = 11500;

pub struct Preset {
    name: &'static str,
    frame: Frame,
}

impl Preset {
    fn new(name: &'static str, real_min: f64, real_max: f64, imag_min: f64, imag_max: f64) -> Preset {
        Preset {
            name,
            frame: Frame::new(real_min, real_max, imag_min, imag_max),
        }
    }
    pub fn name(&self) -> &str {
        self.name
    }
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
    /// The command line that renders this preset at `EXAMPLE_WIDTH`.
    /// Bounds keep their decimal point, so `-2.0` is not shortened to `-2`.
    pub fn invocation(&self, program: &str) -> String {
        let f = &self.frame;
        format!(
            "{} {:?} {:?} {:?} {:?} {}",
            program, f.real_min, f.real_max, f.imag_min, f.imag_max, EXAMPLE_WIDTH
        )
    }
}

pub struct Presets {
    values: Vec<Preset>,
}

impl Presets {
    pub fn new() -> Presets {
        let values = vec![
            Preset::new("Full Picture", -2.5, 1.5, -2.0, 2.0),
            Preset::new("Seahorse Valley", -0.75, -0.737, -0.132, -0.121),
            Preset::new("Elephant Valley", 0.175, 0.375, -0.1, 0.1),
            Preset::new("Triple Spiral Valley", -0.188, -0.012, 0.554, 0.754),
        ];
        Presets { values }
    }
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.values.iter()
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for Presets {
    fn default() -> Self {
        Self::new()
    }
}

/// The usage message printed when too few arguments are given
pub fn usage(program: &str) -> String {
    let presets = Presets::new();
    let mut text = format!(
        "usage: {} real_min real_max imag_min imag_max image_width\n",
        program
    );
    text.push_str(&format!("examples with image_width = {}:\n", EXAMPLE_WIDTH));
    for preset in presets.iter() {
        let label = format!("{}:", preset.name());
        text.push_str(&format!("    {:<22}{}\n", label, preset.invocation(program)));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mandel_image::Mapping;

    #[test]
    fn presets_are_valid_frames() {
        let presets = Presets::new();
        assert_eq!(presets.len(), 4);
        for preset in presets.iter() {
            assert!(preset.frame().validate().is_ok(), "{}", preset.name());
            assert!(Mapping::for_width(*preset.frame(), 100).is_ok());
        }
    }

    #[test]
    fn invocation_round_trips_bounds() {
        let presets = Presets::new();
        let seahorse = presets.iter().nth(1).unwrap();
        assert_eq!(
            seahorse.invocation("./mandelbrot"),
            "./mandelbrot -0.75 -0.737 -0.132 -0.121 11500"
        );
    }

    #[test]
    fn usage_lists_four_examples() {
        let text = usage("./mandelbrot");
        assert!(text.starts_with("usage: ./mandelbrot real_min"));
        assert_eq!(text.lines().filter(|l| l.ends_with(" 11500")).count(), 4);
        assert!(text.contains("    Full Picture:         ./mandelbrot -2.5 1.5 -2.0 2.0 11500\n"));
    }
}
