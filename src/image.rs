use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::colorings::Color;
use crate::errors::*;

/// A row-major grid of colors with its origin at the top left
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    pixels: Vec<Color>,
    width: usize,
    height: usize,
}

impl PixelGrid {
    /// A grid of `width` by `height` black pixels
    pub fn new(width: usize, height: usize) -> PixelGrid {
        PixelGrid {
            pixels: vec![Color::BLACK; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[x + y * self.width]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// The ASCII header of the binary pixel map, each number preceded by a space
    pub fn header(&self) -> String {
        format!("P6\n {}\n {}\n {}\n", self.width, self.height, 255)
    }

    /// Write the header followed by the raw RGB bytes of every pixel
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(self.header().as_bytes())?;
        for line in self.pixels.chunks(self.width.max(1)) {
            let bytes: Vec<u8> = line.iter().flat_map(|c| c.to_bytes()).collect();
            out.write_all(&bytes)?;
        }
        Ok(())
    }

    /// Write the grid to the file at `path`, replacing any existing file.
    /// A failed write may leave a truncated file behind. The cause of any
    /// error is an `ErrorKind::Io`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(Error::from)
            .chain_err(|| format!("could not create '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_ppm(&mut writer)
            .chain_err(|| format!("could not write '{}'", path.display()))?;
        writer
            .flush()
            .map_err(Error::from)
            .chain_err(|| format!("could not write '{}'", path.display()))?;
        info!(
            "wrote {}x{} image to '{}'",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_black() {
        let grid = PixelGrid::new(3, 2);
        assert_eq!(grid.pixels().len(), 6);
        assert!(grid.pixels().iter().all(|c| *c == Color::BLACK));
    }

    #[test]
    fn header_has_leading_spaces() {
        assert_eq!(PixelGrid::new(100, 100).header(), "P6\n 100\n 100\n 255\n");
        assert_eq!(PixelGrid::new(7, 3).header().len(), 14);
    }

    #[test]
    fn payload_is_row_major_rgb() {
        let mut grid = PixelGrid::new(2, 2);
        grid.pixels_mut()[1] = Color::new(1, 2, 3);
        grid.pixels_mut()[2] = Color::new(4, 5, 6);
        let mut out = Vec::new();
        grid.write_ppm(&mut out).unwrap();

        let header_len = grid.header().len();
        assert_eq!(out.len(), header_len + 2 * 2 * 3);
        assert_eq!(
            &out[header_len..],
            &[0, 0, 0, 1, 2, 3, 4, 5, 6, 0, 0, 0]
        );
        assert_eq!(grid.get(1, 0), Color::new(1, 2, 3));
        assert_eq!(grid.get(0, 1), Color::new(4, 5, 6));
    }

    #[test]
    fn save_into_missing_directory() {
        let tmp_dir = tempdir::TempDir::new("image_tests").expect("create temp dir failed");
        let path = tmp_dir.path().join("missing").join("x.ppm");

        let err = PixelGrid::new(4, 4).save(&path).err().expect("save should fail");
        assert!(err.to_string().contains("could not create"));
        let cause = std::error::Error::source(&err)
            .and_then(|e| e.downcast_ref::<Error>())
            .expect("no cause");
        match cause.kind() {
            ErrorKind::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io, got {}", other),
        }
        assert!(!path.exists());
    }
}
