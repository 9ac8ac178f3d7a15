use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::field::{Field, FieldError, Occupancy};
use crate::shapes::{Shape, SHAPES};

// ============================================================================
// Block
// ============================================================================

/// A falling piece: a mask copied from its shape, anchored at `(x, y)`.
///
/// The mask is centered on the anchor. For an `n`-wide mask the center column
/// is `n / 2`, moved one to the left when `n` is even; rows follow the same
/// rule. Rotation changes the mask dimensions, so the offset is recomputed on
/// every use.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Block {
    x: i16,
    y: i16,
    mask: Vec<Vec<u8>>,
    shape: &'static Shape,
}

impl Block {
    pub fn new(x: i16, y: i16, shape: &'static Shape) -> Self {
        Self {
            x,
            y,
            mask: shape.mask.iter().map(|row| row.to_vec()).collect(),
            shape,
        }
    }

    pub fn x(&self) -> i16 {
        self.x
    }

    pub fn y(&self) -> i16 {
        self.y
    }

    pub fn mask(&self) -> &[Vec<u8>] {
        &self.mask
    }

    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    fn center(&self) -> (i16, i16) {
        fn middle(len: usize) -> i16 {
            let mid = (len / 2) as i16;
            if len % 2 == 0 {
                mid - 1
            } else {
                mid
            }
        }
        (middle(self.mask[0].len()), middle(self.mask.len()))
    }

    /// Field coordinates of every occupied mask cell.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        let (cx, cy) = self.center();
        self.mask.iter().enumerate().flat_map(move |(row, values)| {
            values
                .iter()
                .enumerate()
                .filter(|(_, value)| **value > 0)
                .map(move |(col, _)| (self.x + col as i16 - cx, self.y + row as i16 - cy))
        })
    }

    /// True when any occupied cell is outside the field or on a fixed cell.
    pub fn overlaps(&self, field: &Field) -> bool {
        self.cells().any(|(x, y)| match field.get(x, y) {
            Ok(cell) => cell.occupancy == Occupancy::Fixed,
            Err(_) => true,
        })
    }

    pub fn draw(&self, field: &mut Field, fixed: bool) -> Result<(), FieldError> {
        let occupancy = if fixed {
            Occupancy::Fixed
        } else {
            Occupancy::Moving
        };
        for (x, y) in self.cells() {
            field.set(x, y, occupancy, self.shape.color)?;
        }
        Ok(())
    }

    pub fn try_move(&mut self, dx: i16, dy: i16, field: &Field) -> bool {
        self.x += dx;
        self.y += dy;
        if self.overlaps(field) {
            self.x -= dx;
            self.y -= dy;
            return false;
        }
        true
    }

    /// Rotates the mask a quarter turn clockwise. No wall kicks: a rotation
    /// that collides is rejected and the mask is restored.
    pub fn try_rotate(&mut self, field: &Field) -> bool {
        let rotated = rotate(&self.mask);
        let original = std::mem::replace(&mut self.mask, rotated);
        if self.overlaps(field) {
            self.mask = original;
            return false;
        }
        true
    }

    /// Same shape in spawn orientation at a new anchor.
    pub fn copy_at(&self, x: i16, y: i16) -> Self {
        Self::new(x, y, self.shape)
    }
}

fn rotate(mask: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let n = mask.len();
    let m = mask[0].len();
    let mut rotated = vec![vec![0; n]; m];
    for (y, row) in mask.iter().enumerate() {
        for (x, value) in row.iter().enumerate() {
            rotated[x][n - y - 1] = *value;
        }
    }
    rotated
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider: Send {
    fn next_shape(&mut self) -> &'static Shape;
}

/// Uniform pick from the catalog.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_shape(&mut self) -> &'static Shape {
        SHAPES.choose(&mut self.rng).unwrap_or(&SHAPES[0])
    }
}

pub struct SequencePieceProvider {
    shapes: Vec<&'static Shape>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(shapes: Vec<&'static Shape>) -> Self {
        Self { shapes, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    /// An empty sequence falls back to the first catalog shape.
    fn next_shape(&mut self) -> &'static Shape {
        if self.shapes.is_empty() {
            return &SHAPES[0];
        }
        let shape = self.shapes[self.index % self.shapes.len()];
        self.index += 1;
        shape
    }
}
