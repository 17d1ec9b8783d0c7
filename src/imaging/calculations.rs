//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate output dimensions for a capture bounded to `max_width`.
///
/// Captures no wider than `max_width` keep their size. Wider ones get
/// `width = max_width` and `height = round(height * max_width / width)`,
/// never less than 1.
///
/// # Examples
/// ```
/// # use snapcourier::imaging::calculate_bounded_dimensions;
/// assert_eq!(calculate_bounded_dimensions((4000, 3000), 1280), (1280, 960));
/// assert_eq!(calculate_bounded_dimensions((800, 600), 1280), (800, 600));
/// ```
pub fn calculate_bounded_dimensions(original: (u32, u32), max_width: u32) -> (u32, u32) {
    let (width, height) = original;
    if width <= max_width {
        return (width, height);
    }
    let scaled = (height as f64 * max_width as f64 / width as f64).round() as u32;
    (max_width, scaled.max(1))
}
