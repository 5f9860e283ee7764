use serde::{Deserialize, Serialize};

/// Piece colors: three hues in three shades, plus the `Empty` sentinel used
/// to draw a cell that holds nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorId {
    Red,
    RedTwo,
    RedThree,
    Yellow,
    YellowTwo,
    YellowThree,
    Blue,
    BlueTwo,
    BlueThree,
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hue {
    Red,
    Yellow,
    Blue,
}

impl ColorId {
    pub const ALL: [ColorId; 10] = [
        ColorId::Red,
        ColorId::RedTwo,
        ColorId::RedThree,
        ColorId::Yellow,
        ColorId::YellowTwo,
        ColorId::YellowThree,
        ColorId::Blue,
        ColorId::BlueTwo,
        ColorId::BlueThree,
        ColorId::Empty,
    ];

    /// Every color a piece can carry (`ALL` without `Empty`).
    pub const PIECES: [ColorId; 9] = [
        ColorId::Red,
        ColorId::RedTwo,
        ColorId::RedThree,
        ColorId::Yellow,
        ColorId::YellowTwo,
        ColorId::YellowThree,
        ColorId::Blue,
        ColorId::BlueTwo,
        ColorId::BlueThree,
    ];

    pub fn hue(self) -> Option<Hue> {
        match self {
            ColorId::Red | ColorId::RedTwo | ColorId::RedThree => Some(Hue::Red),
            ColorId::Yellow | ColorId::YellowTwo | ColorId::YellowThree => Some(Hue::Yellow),
            ColorId::Blue | ColorId::BlueTwo | ColorId::BlueThree => Some(Hue::Blue),
            ColorId::Empty => None,
        }
    }

    /// Shade within the hue, 1 (lightest asset) to 3.
    pub fn shade(self) -> Option<u8> {
        match self {
            ColorId::Red | ColorId::Yellow | ColorId::Blue => Some(1),
            ColorId::RedTwo | ColorId::YellowTwo | ColorId::BlueTwo => Some(2),
            ColorId::RedThree | ColorId::YellowThree | ColorId::BlueThree => Some(3),
            ColorId::Empty => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == ColorId::Empty
    }
}

/// Opaque reference to a loaded block texture. The host resolves the path
/// to an image once and keys its texture cache on the handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    path: &'static str,
}

impl ResourceHandle {
    const fn new(path: &'static str) -> Self {
        ResourceHandle { path }
    }

    /// Asset path relative to the site root.
    pub fn path(&self) -> &'static str {
        self.path
    }
}

const RED_ONE: ResourceHandle = ResourceHandle::new("assets/sprites/blocks/red_one.png");
const RED_TWO: ResourceHandle = ResourceHandle::new("assets/sprites/blocks/red_two.png");
const RED_THREE: ResourceHandle = ResourceHandle::new("assets/sprites/blocks/red_three.png");
const YELLOW_ONE: ResourceHandle = ResourceHandle::new("assets/sprites/blocks/yellow_one.png");
const YELLOW_TWO: ResourceHandle = ResourceHandle::new("assets/sprites/blocks/yellow_two.png");
const YELLOW_THREE: ResourceHandle =
    ResourceHandle::new("assets/sprites/blocks/yellow_three.png");
const BLUE_ONE: ResourceHandle = ResourceHandle::new("assets/sprites/blocks/blue_one.png");
const BLUE_TWO: ResourceHandle = ResourceHandle::new("assets/sprites/blocks/blue_two.png");
const BLUE_THREE: ResourceHandle = ResourceHandle::new("assets/sprites/blocks/blue_three.png");
const EMPTY: ResourceHandle = ResourceHandle::new("assets/sprites/blocks/empty.png");

/// Texture for a color. Total over `ColorId`; adding a variant without an
/// arm here fails to compile.
pub fn resource_for(color: ColorId) -> ResourceHandle {
    match color {
        ColorId::Red => RED_ONE,
        ColorId::RedTwo => RED_TWO,
        ColorId::RedThree => RED_THREE,
        ColorId::Yellow => YELLOW_ONE,
        ColorId::YellowTwo => YELLOW_TWO,
        ColorId::YellowThree => YELLOW_THREE,
        ColorId::Blue => BLUE_ONE,
        ColorId::BlueTwo => BLUE_TWO,
        ColorId::BlueThree => BLUE_THREE,
        ColorId::Empty => EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_color_resolves_to_an_asset() {
        for c in ColorId::ALL {
            let h = resource_for(c);
            assert!(!h.path().is_empty(), "{c:?} has no asset");
            assert!(h.path().ends_with(".png"));
        }
    }

    #[test]
    fn lookup_is_idempotent() {
        for c in ColorId::ALL {
            assert_eq!(resource_for(c), resource_for(c));
        }
    }

    #[test]
    fn handles_are_distinct() {
        for (i, a) in ColorId::ALL.iter().enumerate() {
            for (j, b) in ColorId::ALL.iter().enumerate() {
                if i != j {
                    assert_ne!(resource_for(*a), resource_for(*b), "{a:?} and {b:?} share a texture");
                }
            }
        }
    }

    #[test]
    fn hue_and_shade_cover_pieces_only() {
        assert_eq!(ColorId::YellowThree.hue(), Some(Hue::Yellow));
        assert_eq!(ColorId::YellowThree.shade(), Some(3));
        assert_eq!(ColorId::Blue.shade(), Some(1));
        assert_eq!(ColorId::Empty.hue(), None);
        assert_eq!(ColorId::Empty.shade(), None);
        assert!(ColorId::PIECES.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn serializes_as_snake_case() {
        let s = serde_json::to_string(&ColorId::RedTwo).unwrap();
        assert_eq!(s, "\"red_two\"");
        let c: ColorId = serde_json::from_str("\"blue_three\"").unwrap();
        assert_eq!(c, ColorId::BlueThree);
    }
}
