// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use leorv_hal::manual_additions::svga::{Rgb332, Svga, HEIGHT, WIDTH};
use leorv_hal::mmio::{Mmio, OutOfWindow};

/// Colour of pixel `(x, y)` of the test picture.
///
/// The border alternates between white on even and black on odd rows. The
/// interior fades from green to red top to bottom, with blue rising left to
/// right.
pub fn pixel(x: usize, y: usize) -> Rgb332 {
    if x == 0 || x == WIDTH - 1 || y == 0 || y == HEIGHT - 1 {
        if y % 2 == 0 {
            Rgb332::WHITE
        } else {
            Rgb332::BLACK
        }
    } else {
        let red = y * 8 / HEIGHT;
        let green = (HEIGHT - y) * 8 / HEIGHT;
        let blue = x * 4 / WIDTH;
        Rgb332::pack(red as u8, green as u8, blue as u8)
    }
}

/// Draw the test picture in raster order, then fill the overscan row white.
pub fn render<M: Mmio>(svga: &mut Svga<M>) -> Result<(), OutOfWindow> {
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            svga.set_pixel(x, y, pixel(x, y))?;
        }
    }
    svga.fill_row(HEIGHT, Rgb332::WHITE)
}
