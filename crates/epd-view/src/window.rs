//! Partial window addressing
//!
//! Panel controllers address display RAM a byte (8 pixels) at a time along
//! the x axis, so a partial window's left and right edges must sit on
//! multiples of 8. Windows are also clipped to the surface.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Horizontal addressing granularity in pixels
pub const ALIGNMENT: u32 = 8;

/// Align a coordinate down to the nearest multiple of [`ALIGNMENT`]
///
/// ```
/// # use epd_view::window::align_down;
/// assert_eq!(align_down(5), 0);
/// assert_eq!(align_down(13), 8);
/// ```
pub fn align_down(value: u32) -> u32 {
    (value / ALIGNMENT) * ALIGNMENT
}

/// Align a coordinate up to the nearest multiple of [`ALIGNMENT`]
///
/// ```
/// # use epd_view::window::align_up;
/// assert_eq!(align_up(5), 8);
/// assert_eq!(align_up(16), 16);
/// ```
pub fn align_up(value: u32) -> u32 {
    value.div_ceil(ALIGNMENT).saturating_mul(ALIGNMENT)
}

/// Clip `rect` to `bounds` and widen it to byte boundaries.
///
/// Returns `None` when nothing of `rect` is on the surface.
pub fn panel_window(rect: &Rectangle, bounds: &Rectangle) -> Option<Rectangle> {
    let clipped = rect.intersection(bounds);
    if clipped.is_zero_sized() {
        return None;
    }

    let left = u32::try_from(clipped.top_left.x).ok()?;
    let right = left.checked_add(clipped.size.width)?;
    let aligned_left = align_down(left);
    let aligned_right = align_up(right).min(bounds.size.width);

    Some(Rectangle::new(
        Point::new(i32::try_from(aligned_left).ok()?, clipped.top_left.y),
        Size::new(aligned_right.saturating_sub(aligned_left), clipped.size.height),
    ))
}
