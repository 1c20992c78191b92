use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(dimension: u32) -> Self {
        Self::new(dimension, dimension)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// Bounds are inclusive: x2/y2 are the last pixel inside the rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn make(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    pub fn x1(&self) -> i64 {
        self.origin.x as i64
    }

    pub fn y1(&self) -> i64 {
        self.origin.y as i64
    }

    pub fn x2(&self) -> i64 {
        self.x1() + self.size.width as i64 - 1
    }

    pub fn y2(&self) -> i64 {
        self.y1() + self.size.height as i64 - 1
    }

    pub fn contains(&self, point: Point) -> bool {
        let (px, py) = (point.x as i64, point.y as i64);
        (self.x1() <= px && px <= self.x2()) && (self.y1() <= py && py <= self.y2())
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.origin, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_bounds() {
        let rect = Rect::make(0, 0, 1, 1);
        assert_eq!(rect.x2(), 0);
        assert_eq!(rect.y2(), 0);

        let rect = Rect::make(10, 20, 30, 40);
        assert_eq!((rect.x1(), rect.y1()), (10, 20));
        assert_eq!((rect.x2(), rect.y2()), (39, 59));
    }

    #[test]
    fn test_contains_origin_but_not_left_neighbour() {
        let rects = [
            Rect::make(0, 0, 1, 1),
            Rect::make(0, 0, 10, 10),
            Rect::make(-5, -5, 3, 7),
            Rect::make(1919, 1079, 1, 1),
            Rect::make(i32::MAX - 1, 0, 1, 1),
        ];

        for rect in rects {
            assert!(rect.contains(rect.origin), "{} should contain its origin", rect);
            let left = Point::new(rect.origin.x - 1, rect.origin.y);
            assert!(!rect.contains(left), "{} should not contain {}", rect, left);
        }
    }

    #[test]
    fn test_contains_edges() {
        let rect = Rect::make(0, 0, 10, 10);
        assert!(rect.contains(Point::new(9, 9)));
        assert!(rect.contains(Point::new(0, 9)));
        assert!(!rect.contains(Point::new(10, 10)));
        assert!(!rect.contains(Point::new(9, 10)));
        assert!(!rect.contains(Point::new(0, -1)));
    }

    #[test]
    fn test_empty_rect_contains_nothing() {
        let rect = Rect::make(5, 5, 0, 0);
        assert!(!rect.contains(Point::new(5, 5)));
        assert!(!rect.contains(Point::new(4, 4)));
    }
}
