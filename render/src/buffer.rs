//! The renderer's pixel buffer: a dense RGBA8 grid with associated-alpha
//! `src_over` compositing on every write, matching `cPngExporter::DrawPixel`.

use markers::{PixelSink, Rgba};

pub struct PixelBuffer {
    width: i32,
    height: i32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let count = (width as usize) * (height as usize);
        PixelBuffer {
            width,
            height,
            pixels: vec![Rgba::new(0, 0, 0, 0); count],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Rgba {
        self.pixels[(x + y * self.width) as usize]
    }

    /// Flattens the buffer into an RGBA8 row-major byte vector, the shape
    /// the `image` crate's PNG encoder expects.
    pub fn into_rgba8(self) -> (u32, u32, Vec<u8>) {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            out.push(pixel.r);
            out.push(pixel.g);
            out.push(pixel.b);
            out.push(pixel.a);
        }
        (self.width as u32, self.height as u32, out)
    }
}

impl PixelSink for PixelBuffer {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    /// Associated-alpha `src_over` compositing.
    /// https://en.wikipedia.org/wiki/Alpha_compositing#Alpha_blending
    fn put_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        let idx = (x + y * self.width) as usize;
        let current = self.pixels[idx];
        let src_alpha = color.a as u32;
        let dst_alpha = current.a as u32;
        let out_alpha = src_alpha + dst_alpha * (255 - src_alpha) / 255;
        self.pixels[idx] = if out_alpha == 0 {
            Rgba::new(0, 0, 0, 0)
        } else {
            let mix = |src: u8, dst: u8| -> u8 {
                ((src as u32 * src_alpha + dst as u32 * dst_alpha * (255 - src_alpha) / 255)
                    / out_alpha) as u8
            };
            Rgba::new(
                mix(color.r, current.r),
                mix(color.g, current.g),
                mix(color.b, current.b),
                out_alpha as u8,
            )
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_over_transparent_yields_source() {
        let mut buf = PixelBuffer::new(2, 2);
        let color = Rgba::new(10, 20, 30, 0xff);
        buf.put_pixel(0, 0, color);
        assert_eq!(buf.get(0, 0), color);
    }

    #[test]
    fn opaque_over_anything_yields_source() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.put_pixel(0, 0, Rgba::new(1, 2, 3, 0xff));
        let color = Rgba::new(200, 150, 100, 0xff);
        buf.put_pixel(0, 0, color);
        assert_eq!(buf.get(0, 0), color);
    }

    #[test]
    fn transparent_over_anything_leaves_destination() {
        let mut buf = PixelBuffer::new(2, 2);
        let dest = Rgba::new(9, 8, 7, 0xff);
        buf.put_pixel(0, 0, dest);
        buf.put_pixel(0, 0, Rgba::new(255, 255, 255, 0));
        assert_eq!(buf.get(0, 0), dest);
    }

    #[test]
    fn out_of_bounds_clipped_write_is_ignored() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.set_pixel_clipped(5, 5, Rgba::new(1, 2, 3, 0xff));
        assert_eq!(buf.get(0, 0), Rgba::new(0, 0, 0, 0));
    }
}
