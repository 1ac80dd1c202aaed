//! The monochrome framebuffer of the machine.

use crate::definitions::display;

/// The fixed 64x32 pixel grid, stored row major. Only the draw
/// instruction ever writes to it, presentation layers read it through
/// [`Screen::rows`] or [`Screen::as_slice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pixels: Box<[bool]>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            pixels: vec![false; display::RESOLUTION].into_boxed_slice(),
        }
    }
}

impl Screen {
    /// Turns every pixel off.
    pub(crate) fn clear(&mut self) {
        self.pixels.fill(false);
    }

    /// XORs an 8 bit wide sprite onto the grid at the given origin.
    ///
    /// Coordinates wrap around both edges per pixel, sprites are never
    /// clipped. Returns true exactly when a lit pixel was turned off,
    /// the collision condition of the draw instruction.
    pub(crate) fn blit(&mut self, origin_x: u8, origin_y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, &bits) in sprite.iter().enumerate() {
            let y = (origin_y as usize + row) % display::HEIGHT;
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let x = (origin_x as usize + col) % display::WIDTH;
                let pixel = &mut self.pixels[y * display::WIDTH + x];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
        collision
    }

    /// The state of a single pixel.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y * display::WIDTH + x]
    }

    /// The pixel rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks_exact(display::WIDTH)
    }

    /// The whole grid as one row major slice.
    pub fn as_slice(&self) -> &[bool] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_turns_sprite_bits_on() {
        let mut screen = Screen::default();
        let collision = screen.blit(4, 2, &[0b1010_0001]);
        assert!(!collision);
        assert!(screen.pixel(4, 2));
        assert!(!screen.pixel(5, 2));
        assert!(screen.pixel(6, 2));
        assert!(screen.pixel(11, 2));
        assert_eq!(screen.as_slice().iter().filter(|&&p| p).count(), 3);
    }

    #[test]
    fn blit_is_involutive() {
        let mut screen = Screen::default();
        let sprite = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        screen.blit(10, 5, &sprite);
        let lit = screen.clone();
        screen.blit(3, 20, &sprite);
        // The second pass turns every sprite pixel back off.
        let collision = screen.blit(3, 20, &sprite);
        assert!(collision);
        assert_eq!(screen, lit);
    }

    #[test]
    fn blit_reports_collisions() {
        let mut screen = Screen::default();
        assert!(!screen.blit(0, 0, &[0x80]));
        // Same pixel again, on goes off.
        assert!(screen.blit(0, 0, &[0x80]));
        // Off pixels never collide.
        assert!(!screen.blit(1, 0, &[0x80]));
    }

    #[test]
    fn blit_wraps_across_the_right_edge() {
        let mut screen = Screen::default();
        let last = display::WIDTH - 1;
        screen.blit(last as u8, 0, &[0b1100_0000]);
        assert!(screen.pixel(last, 0));
        assert!(screen.pixel(0, 0));
    }

    #[test]
    fn blit_wraps_across_the_bottom_edge() {
        let mut screen = Screen::default();
        let last = display::HEIGHT - 1;
        screen.blit(0, last as u8, &[0x80, 0x80]);
        assert!(screen.pixel(0, last));
        assert!(screen.pixel(0, 0));
    }

    #[test]
    fn blit_wraps_large_origins() {
        let mut screen = Screen::default();
        screen.blit(200, 100, &[0x80]);
        assert!(screen.pixel(200 % display::WIDTH, 100 % display::HEIGHT));
    }

    #[test]
    fn rows_iterate_top_to_bottom() {
        let mut screen = Screen::default();
        screen.blit(0, 1, &[0x80]);
        let rows: Vec<&[bool]> = screen.rows().collect();
        assert_eq!(rows.len(), display::HEIGHT);
        assert!(rows.iter().all(|row| row.len() == display::WIDTH));
        assert!(!rows[0][0]);
        assert!(rows[1][0]);
    }

    #[test]
    fn clear_turns_everything_off() {
        let mut screen = Screen::default();
        screen.blit(0, 0, &[0xFF, 0xFF]);
        screen.clear();
        assert!(screen.as_slice().iter().all(|&p| !p));
    }
}
