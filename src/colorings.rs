use dyn_clone::DynClone;

use crate::errors::*;
use crate::MAX_ITERATIONS;

/// An RGB triple, one byte per channel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Color {
        Color { red, green, blue }
    }

    /// The channels in the order they are written to a pixel map
    pub fn to_bytes(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

pub const PALETTE_SIZE: usize = 17;

/// The escape bands, cycled through by iteration count. The last entry is
/// reserved for points that never escaped.
pub static PALETTE: [Color; PALETTE_SIZE] = [
    Color::new(66, 30, 15),
    Color::new(25, 7, 26),
    Color::new(9, 1, 47),
    Color::new(4, 4, 73),
    Color::new(0, 7, 100),
    Color::new(12, 44, 138),
    Color::new(24, 82, 177),
    Color::new(57, 125, 209),
    Color::new(134, 181, 229),
    Color::new(211, 236, 248),
    Color::new(241, 233, 191),
    Color::new(248, 201, 95),
    Color::new(255, 170, 0),
    Color::new(204, 128, 0),
    Color::new(153, 87, 0),
    Color::new(106, 52, 3),
    Color::new(16, 16, 16),
];

/// Map an iteration count produced with `MAX_ITERATIONS` to its palette color
pub fn color_for(iteration: u32) -> Color {
    Classic {}.get(iteration, MAX_ITERATIONS)
}

pub trait Coloring: DynClone + Sync + Send {
    /// Get a color, given the mandelbrot value and the maximum mandelbrot value
    fn get(&self, v: u32, max: u32) -> Color;
}

dyn_clone::clone_trait_object!(Coloring);

#[derive(Clone)]
struct Classic {}

impl Coloring for Classic {
    fn get(&self, v: u32, max: u32) -> Color {
        if max <= v {
            return PALETTE[PALETTE_SIZE - 1];
        }
        PALETTE[v as usize % PALETTE_SIZE]
    }
}

#[derive(Clone)]
struct Gray {}

impl Coloring for Gray {
    fn get(&self, v: u32, max: u32) -> Color {
        if max <= v {
            return Color::BLACK;
        }
        let level = 255 - (u64::from(v) * 255 / u64::from(max)) as u8;
        Color::new(level, level, level)
    }
}

fn all_colorings() -> Vec<Box<dyn Coloring>> {
    vec![Box::new(Classic {}), Box::new(Gray {})]
}

/// The colorings that can be selected by name
pub struct ColorInfo {
    names: [&'static str; 2],
    producers: Vec<Box<dyn Coloring>>,
}

impl ColorInfo {
    pub fn new() -> ColorInfo {
        let names = ["classic", "gray"];
        let producers = all_colorings();
        assert_eq!(names.len(), producers.len());
        ColorInfo { names, producers }
    }
    pub fn names(&self) -> &[&str] {
        self.names.as_slice()
    }
    pub fn by_name(&self, name: &str) -> Result<Box<dyn Coloring>> {
        self.names
            .iter()
            .position(|n| *n == name)
            .map(|i| self.producers[i].clone())
            .ok_or_else(|| ErrorKind::UnknownColoring(name.to_string()).into())
    }
}

impl Default for ColorInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_literals() {
        assert_eq!(PALETTE[0], Color::new(66, 30, 15));
        assert_eq!(PALETTE[8], Color::new(134, 181, 229));
        assert_eq!(PALETTE[PALETTE_SIZE - 1], Color::new(16, 16, 16));
    }

    #[test]
    fn escaped_counts_cycle_through_palette() {
        for i in 0..MAX_ITERATIONS {
            assert_eq!(color_for(i), PALETTE[i as usize % PALETTE_SIZE]);
        }
    }

    #[test]
    fn in_set_uses_last_entry() {
        let in_set = color_for(MAX_ITERATIONS);
        assert_eq!(in_set, PALETTE[PALETTE_SIZE - 1]);
        for k in 1..5 {
            assert_eq!(color_for(MAX_ITERATIONS + k * PALETTE_SIZE as u32), in_set);
        }
    }

    #[test]
    fn gray_ramp() {
        let gray = ColorInfo::new().by_name("gray").unwrap();
        assert_eq!(gray.get(0, 200), Color::new(255, 255, 255));
        assert_eq!(gray.get(200, 200), Color::BLACK);
        assert!(gray.get(100, 200).red < 255);
    }

    #[test]
    fn unknown_coloring() {
        match ColorInfo::new().by_name("sepia") {
            Err(Error(ErrorKind::UnknownColoring(name), _)) => assert_eq!(name, "sepia"),
            _ => panic!("expected UnknownColoring"),
        }
    }

    #[test]
    fn classic_by_name_matches_color_for() {
        let classic = ColorInfo::new().by_name("classic").unwrap();
        assert_eq!(classic.get(42, MAX_ITERATIONS), color_for(42));
    }
}
