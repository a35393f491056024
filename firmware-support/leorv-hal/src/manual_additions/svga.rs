// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use crate::hals::leorv::addresses::FRAMEBUFFER_SIZE;
use crate::hals::leorv::Framebuffer;
use crate::mmio::{Mmio, OutOfWindow, Volatile};

pub const WIDTH: usize = 100;
pub const HEIGHT: usize = 75;
/// The display scans half a line past the last row, so one extra row is
/// stored after the picture.
pub const OVERSCAN_ROWS: usize = 1;

const _: () = assert!(FRAMEBUFFER_SIZE == WIDTH * (HEIGHT + OVERSCAN_ROWS));

/// Red, green and blue packed as `rrrgggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb332(pub u8);

impl Rgb332 {
    pub const BLACK: Rgb332 = Rgb332(0x00);
    pub const WHITE: Rgb332 = Rgb332(0xFF);

    /// Pack the low 3, 3 and 2 bits of the channels.
    pub const fn pack(red: u8, green: u8, blue: u8) -> Rgb332 {
        Rgb332(((red & 0b111) << 5) | ((green & 0b111) << 2) | (blue & 0b11))
    }
}

/// The byte addressable SVGA framebuffer, stored in raster order.
pub struct Svga<M: Mmio = Volatile> {
    window: Framebuffer<M>,
}

impl<M: Mmio> Svga<M> {
    /// # Safety
    ///
    /// Must only be called on a LeoRV hart, and only one `Svga` may be in use.
    pub const unsafe fn new() -> Self {
        Svga {
            window: Framebuffer::<M>::new(),
        }
    }

    /// Byte offset of pixel `(x, y)`. Row `HEIGHT` is the overscan row.
    pub const fn offset(x: usize, y: usize) -> usize {
        y * WIDTH + x
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb332) -> Result<(), OutOfWindow> {
        if x >= WIDTH {
            return Err(OutOfWindow {
                offset: Self::offset(x, y),
            });
        }
        self.window.write_byte(Self::offset(x, y), color.0)
    }

    /// Fill one whole row, including the overscan row.
    pub fn fill_row(&mut self, y: usize, color: Rgb332) -> Result<(), OutOfWindow> {
        for x in 0..WIDTH {
            self.set_pixel(x, y, color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_pack_red_high() {
        assert_eq!(Rgb332::pack(0b111, 0, 0), Rgb332(0b1110_0000));
        assert_eq!(Rgb332::pack(0, 0b111, 0), Rgb332(0b0001_1100));
        assert_eq!(Rgb332::pack(0, 0, 0b11), Rgb332(0b0000_0011));
        assert_eq!(Rgb332::pack(3, 4, 2), Rgb332(0x72));
    }

    #[test]
    fn channels_are_truncated() {
        assert_eq!(Rgb332::pack(8, 9, 4), Rgb332::pack(0, 1, 0));
    }

    #[test]
    fn overscan_row_follows_the_picture() {
        assert_eq!(Svga::<Volatile>::offset(0, HEIGHT), 7500);
        assert_eq!(Svga::<Volatile>::offset(WIDTH - 1, HEIGHT), 7599);
    }
}
