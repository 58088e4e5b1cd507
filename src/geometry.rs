//! Sizes, coordinates and the layout rules that place a layer inside a container.
//!
//! ## Rust concepts
//! - `enum` with data variants instead of a class hierarchy
//! - `i32::div_euclid` for floor division on signed values

use serde::Serialize;

/// Width and height of a matrix or layer, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when `(x, y)` lies inside `0..width` × `0..height`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as i64) < self.width as i64 && (y as i64) < self.height as i64
    }

    /// Offset that centers `element` inside `self`. The remainder is
    /// floor-divided, so odd differences bias the element toward the
    /// top/left and oversized elements get a negative offset.
    pub fn center_offset(&self, element: Dimensions) -> Coordinates {
        Coordinates::new(
            centered(self.width, element.width),
            centered(self.height, element.height),
        )
    }
}

fn centered(container: u32, element: u32) -> i32 {
    (container as i64 - element as i64).div_euclid(2) as i32
}

/// A signed pixel position. Layers may be placed partially off-grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Layout rule computing a layer's origin from container and layer sizes.
///
/// # Rust concept: exhaustive matching
/// Adding a variant is a compile error in [`Position::calculate`] until
/// it is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// Fixed origin.
    Static { x: i32, y: i32 },
    /// Centered on the x axis, fixed y.
    CenterHorizontal { y: i32 },
    /// Centered on the y axis, fixed x.
    CenterVertical { x: i32 },
    /// Centered on both axes.
    Center,
}

impl Position {
    pub const fn fixed(x: i32, y: i32) -> Self {
        Self::Static { x, y }
    }

    pub const fn center_horizontal(y: i32) -> Self {
        Self::CenterHorizontal { y }
    }

    pub const fn center_vertical(x: i32) -> Self {
        Self::CenterVertical { x }
    }

    pub const fn center() -> Self {
        Self::Center
    }

    pub fn calculate(&self, container: Dimensions, element: Dimensions) -> Coordinates {
        match *self {
            Position::Static { x, y } => Coordinates::new(x, y),
            Position::CenterHorizontal { y } => {
                Coordinates::new(centered(container.width, element.width), y)
            }
            Position::CenterVertical { x } => {
                Coordinates::new(x, centered(container.height, element.height))
            }
            Position::Center => container.center_offset(element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn square_has_equal_sides() {
        assert_eq!(Dimensions::square(64), Dimensions::new(64, 64));
    }

    #[rstest]
    #[case(64, 64, 0, 0)]
    #[case(64, 15, 24, 24)]
    #[case(64, 45, 9, 9)]
    #[case(10, 3, 3, 3)]
    #[case(10, 13, -2, -2)]
    fn center_floor_divides(#[case] container: u32, #[case] element: u32, #[case] x: i32, #[case] y: i32) {
        let offset = Position::center()
            .calculate(Dimensions::square(container), Dimensions::square(element));
        assert_eq!(offset, Coordinates::new(x, y));
    }

    #[test]
    fn static_ignores_sizes() {
        let p = Position::fixed(-3, 7);
        assert_eq!(
            p.calculate(Dimensions::square(64), Dimensions::new(100, 2)),
            Coordinates::new(-3, 7)
        );
    }

    #[test]
    fn center_horizontal_keeps_y() {
        let p = Position::center_horizontal(55);
        assert_eq!(
            p.calculate(Dimensions::square(64), Dimensions::new(41, 7)),
            Coordinates::new(11, 55)
        );
    }

    #[test]
    fn center_vertical_keeps_x() {
        let p = Position::center_vertical(4);
        assert_eq!(
            p.calculate(Dimensions::new(64, 32), Dimensions::new(10, 9)),
            Coordinates::new(4, 11)
        );
    }

    #[rstest]
    #[case(0, 0, true)]
    #[case(3, 1, true)]
    #[case(4, 0, false)]
    #[case(0, 2, false)]
    #[case(-1, 0, false)]
    fn contains_checks_bounds(#[case] x: i32, #[case] y: i32, #[case] expected: bool) {
        assert_eq!(Dimensions::new(4, 2).contains(x, y), expected);
    }
}
