use crate::foundation::math::unpremultiply_rgba8_in_place;

/// A composed card as RGBA8 pixels.
///
/// Pixels are **premultiplied** alpha, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterSurface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl RasterSurface {
    /// Premultiplied pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data
            .get(i..i + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Copy of the pixels converted to straight alpha, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        straight
    }
}
