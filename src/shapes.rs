// ============================================================================
// Colors
// ============================================================================

/// Color code stored in every field cell. `Default` is the background.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    #[default]
    Default,
    Red,
    Green,
    Yellow,
    Cyan,
    Magenta,
    Blue,
    White,
}

// ============================================================================
// Shape Catalog
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShapeKind {
    Z,
    S,
    O,
    I,
    T,
    J,
    L,
}

/// Immutable piece geometry: a rectangular 0/1 mask plus a color.
#[derive(PartialEq, Eq, Debug)]
pub struct Shape {
    pub kind: ShapeKind,
    pub mask: &'static [&'static [u8]],
    pub color: Color,
}

impl Shape {
    pub fn width(&self) -> usize {
        self.mask[0].len()
    }

    pub fn height(&self) -> usize {
        self.mask.len()
    }

    pub fn get(kind: ShapeKind) -> &'static Shape {
        SHAPES
            .iter()
            .find(|shape| shape.kind == kind)
            .unwrap_or(&SHAPES[0])
    }
}

pub static SHAPES: [Shape; 7] = [
    Shape {
        kind: ShapeKind::Z,
        mask: &[&[1, 1, 0], &[0, 1, 1]],
        color: Color::Red,
    },
    Shape {
        kind: ShapeKind::S,
        mask: &[&[0, 1, 1], &[1, 1, 0]],
        color: Color::Green,
    },
    Shape {
        kind: ShapeKind::O,
        mask: &[&[1, 1], &[1, 1]],
        color: Color::Yellow,
    },
    Shape {
        kind: ShapeKind::I,
        mask: &[&[1, 1, 1, 1]],
        color: Color::Cyan,
    },
    Shape {
        kind: ShapeKind::T,
        mask: &[&[0, 1, 0], &[1, 1, 1]],
        color: Color::Magenta,
    },
    Shape {
        kind: ShapeKind::J,
        mask: &[&[1, 0, 0], &[1, 1, 1]],
        color: Color::Blue,
    },
    Shape {
        kind: ShapeKind::L,
        mask: &[&[1, 1, 1], &[1, 0, 0]],
        color: Color::White,
    },
];

/// Bounding box (width, height) that fits every catalog shape in spawn
/// orientation. The preview field is sized from it.
pub fn preview_size() -> (usize, usize) {
    SHAPES.iter().fold((0, 0), |(w, h), shape| {
        (w.max(shape.width()), h.max(shape.height()))
    })
}
