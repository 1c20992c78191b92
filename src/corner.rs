use crate::error::Error;
use crate::geometry::{Rect, Size};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

impl Edge {
    fn direction(self) -> i64 {
        match self {
            Self::Start => 1,
            Self::End => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    pub fn ids() -> [&'static str; 4] {
        Self::ALL.map(|corner| corner.id())
    }

    pub fn from_id(id: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|corner| corner.id() == id)
            .ok_or_else(|| Error::InvalidCornerId(id.to_string()))
    }

    fn edges(&self) -> (Edge, Edge) {
        match self {
            Self::TopLeft => (Edge::Start, Edge::Start),
            Self::TopRight => (Edge::End, Edge::Start),
            Self::BottomLeft => (Edge::Start, Edge::End),
            Self::BottomRight => (Edge::End, Edge::End),
        }
    }

    pub fn rect(&self, screen_size: Size, region_size: Size) -> Rect {
        // Measure from a screen one pixel larger, so that stepping back from its inclusive
        // bottom/right edge lands on the last pixel of the real screen.
        let screen = Rect::make(0, 0, screen_size.width + 1, screen_size.height + 1);
        let (x_edge, y_edge) = self.edges();

        let x_origin = Self::origin_along(
            x_edge,
            screen.x1(),
            screen.x2(),
            region_size.width,
        );
        let y_origin = Self::origin_along(
            y_edge,
            screen.y1(),
            screen.y2(),
            region_size.height,
        );

        Rect::make(
            x_origin as i32,
            y_origin as i32,
            region_size.width,
            region_size.height,
        )
    }

    fn origin_along(edge: Edge, start: i64, end: i64, length: u32) -> i64 {
        let root = match edge {
            Edge::Start => start,
            Edge::End => end,
        };
        let far = root + length as i64 * edge.direction();
        root.min(far)
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Corner {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SCREEN: Size = Size {
        width: 100,
        height: 100,
    };
    const PIXEL: Size = Size {
        width: 1,
        height: 1,
    };

    #[test]
    fn test_top_left() {
        assert_eq!(Corner::TopLeft.rect(SCREEN, PIXEL), Rect::make(0, 0, 1, 1));
    }

    #[test]
    fn test_top_right() {
        assert_eq!(Corner::TopRight.rect(SCREEN, PIXEL), Rect::make(99, 0, 1, 1));
    }

    #[test]
    fn test_bottom_left() {
        assert_eq!(Corner::BottomLeft.rect(SCREEN, PIXEL), Rect::make(0, 99, 1, 1));
    }

    #[test]
    fn test_bottom_right() {
        assert_eq!(
            Corner::BottomRight.rect(SCREEN, PIXEL),
            Rect::make(99, 99, 1, 1)
        );
    }

    #[test]
    fn test_larger_regions_stay_on_screen() {
        let screen = Size::new(1920, 1080);
        let region = Size::square(100);

        assert_eq!(Corner::TopLeft.rect(screen, region), Rect::make(0, 0, 100, 100));
        assert_eq!(
            Corner::TopRight.rect(screen, region),
            Rect::make(1820, 0, 100, 100)
        );
        assert_eq!(
            Corner::BottomLeft.rect(screen, region),
            Rect::make(0, 980, 100, 100)
        );

        let bottom_right = Corner::BottomRight.rect(screen, region);
        assert_eq!(bottom_right, Rect::make(1820, 980, 100, 100));
        assert_eq!((bottom_right.x2(), bottom_right.y2()), (1919, 1079));
    }

    #[test]
    fn test_from_id() {
        assert_eq!(Corner::from_id("top-left").unwrap(), Corner::TopLeft);
        assert_eq!(Corner::from_id("top-right").unwrap(), Corner::TopRight);
        assert_eq!(Corner::from_id("bottom-left").unwrap(), Corner::BottomLeft);
        assert_eq!(Corner::from_id("bottom-right").unwrap(), Corner::BottomRight);
    }

    #[test]
    fn test_from_invalid_id() {
        assert_matches!(Corner::from_id("bogus"), Err(Error::InvalidCornerId(id)) if id == "bogus");
        assert_matches!("".parse::<Corner>(), Err(Error::InvalidCornerId(_)));
    }

    #[test]
    fn test_ids_round_trip_through_display() {
        for corner in Corner::ALL {
            assert_eq!(corner.to_string().parse::<Corner>().unwrap(), corner);
        }
        assert_eq!(
            Corner::ids(),
            ["top-left", "top-right", "bottom-left", "bottom-right"]
        );
    }
}
