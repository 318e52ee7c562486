//! Pieces module - tetromino catalog
//!
//! Every kind owns an ordered list of rotation states. Each state is a 5x5
//! occupancy mask stored as five row bitmasks; bit 4 is column 0, so a row
//! literal like `0b01110` reads left to right the way it is drawn.
//!
//! The catalog is static data. [`validate_catalog`] checks it once at startup
//! and the engine refuses to run on a broken table.

use std::sync::OnceLock;

use thiserror::Error;

use crate::types::{PieceKind, Rgb, MINOS_PER_PIECE, SHAPE_SIZE};

/// A 5x5 occupancy mask, one bitmask per row (top row first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: [u8; SHAPE_SIZE],
}

impl Shape {
    pub const fn new(rows: [u8; SHAPE_SIZE]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[u8; SHAPE_SIZE] {
        &self.rows
    }

    /// Whether the mask cell at column `px`, row `py` is set
    #[inline]
    pub fn is_set(&self, px: usize, py: usize) -> bool {
        px < SHAPE_SIZE && py < SHAPE_SIZE && self.rows[py] & (1 << (SHAPE_SIZE - 1 - px)) != 0
    }

    /// Number of set cells inside the 5x5 area
    pub fn count(&self) -> usize {
        (0..SHAPE_SIZE)
            .flat_map(|py| (0..SHAPE_SIZE).map(move |px| (px, py)))
            .filter(|&(px, py)| self.is_set(px, py))
            .count()
    }

    /// Offsets `(px, py)` of the set cells, row-major
    pub fn minos(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..SHAPE_SIZE).flat_map(move |py| {
            (0..SHAPE_SIZE)
                .filter(move |&px| self.is_set(px, py))
                .map(move |px| (px as i8, py as i8))
        })
    }

    /// First row with bits outside the 5 mask columns, if any
    fn overflows(&self) -> Option<usize> {
        self.rows.iter().position(|&row| row >> SHAPE_SIZE != 0)
    }
}

const T_SHAPES: [Shape; 4] = [
    Shape::new([0b00000, 0b00100, 0b01110, 0b00000, 0b00000]),
    Shape::new([0b00000, 0b00100, 0b00110, 0b00100, 0b00000]),
    Shape::new([0b00000, 0b00000, 0b01110, 0b00100, 0b00000]),
    Shape::new([0b00000, 0b00100, 0b01100, 0b00100, 0b00000]),
];

const O_SHAPES: [Shape; 1] = [Shape::new([0b00000, 0b00000, 0b01100, 0b01100, 0b00000])];

const L_SHAPES: [Shape; 4] = [
    Shape::new([0b00000, 0b00100, 0b00100, 0b00110, 0b00000]),
    Shape::new([0b00000, 0b00000, 0b01110, 0b01000, 0b00000]),
    Shape::new([0b00000, 0b01100, 0b00100, 0b00100, 0b00000]),
    Shape::new([0b00000, 0b00000, 0b00010, 0b01110, 0b00000]),
];

const I_SHAPES: [Shape; 2] = [
    Shape::new([0b00000, 0b00000, 0b11110, 0b00000, 0b00000]),
    Shape::new([0b00000, 0b00100, 0b00100, 0b00100, 0b00100]),
];

const S_SHAPES: [Shape; 2] = [
    Shape::new([0b00000, 0b00000, 0b01100, 0b11000, 0b00000]),
    Shape::new([0b00000, 0b01000, 0b01100, 0b00100, 0b00000]),
];

const Z_SHAPES: [Shape; 2] = [
    Shape::new([0b00000, 0b00000, 0b11000, 0b01100, 0b00000]),
    Shape::new([0b00000, 0b00100, 0b01100, 0b01000, 0b00000]),
];

/// Each rotation is the left-right mirror of the matching `L_SHAPES` entry.
///
/// This deliberately differs from the common table where J rotation 0 is
/// `.#. / .#. / .##`: that mask is an L rotation, so J and L would share a
/// shape.
const J_SHAPES: [Shape; 4] = [
    Shape::new([0b00000, 0b00100, 0b00100, 0b01100, 0b00000]),
    Shape::new([0b00000, 0b01000, 0b01110, 0b00000, 0b00000]),
    Shape::new([0b00000, 0b01100, 0b01000, 0b01000, 0b00000]),
    Shape::new([0b00000, 0b00000, 0b01110, 0b00010, 0b00000]),
];

/// Rotation tables indexed by [`PieceKind::index`]
static CATALOG: [&[Shape]; PieceKind::COUNT] = [
    &T_SHAPES, &O_SHAPES, &L_SHAPES, &I_SHAPES, &S_SHAPES, &Z_SHAPES, &J_SHAPES,
];

/// Fill and border colors used to draw a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceColors {
    pub fill: Rgb,
    pub border: Rgb,
}

/// Catalog integrity and lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("expected {expected} piece kinds, found {found}")]
    KindCount { expected: usize, found: usize },
    #[error("piece kind {kind} has no rotations")]
    NoRotations { kind: usize },
    #[error("piece kind {kind} rotation {rotation} row {row} is wider than {} columns", SHAPE_SIZE)]
    ShapeTooWide {
        kind: usize,
        rotation: usize,
        row: usize,
    },
    #[error("piece kind {kind} rotation {rotation} has {found} cells, expected {}", MINOS_PER_PIECE)]
    CellCount {
        kind: usize,
        rotation: usize,
        found: usize,
    },
    #[error("rotation {rotation} out of range for {kind:?} ({count} rotations)")]
    RotationOutOfRange {
        kind: PieceKind,
        rotation: usize,
        count: usize,
    },
}

/// Check an arbitrary rotation table against the catalog rules.
///
/// Reports the first violation found, scanning kinds then rotations in order.
pub fn validate_table(table: &[&[Shape]]) -> Result<(), CatalogError> {
    if table.len() != PieceKind::COUNT {
        return Err(CatalogError::KindCount {
            expected: PieceKind::COUNT,
            found: table.len(),
        });
    }

    for (kind, rotations) in table.iter().enumerate() {
        if rotations.is_empty() {
            return Err(CatalogError::NoRotations { kind });
        }
        for (rotation, shape) in rotations.iter().enumerate() {
            if let Some(row) = shape.overflows() {
                return Err(CatalogError::ShapeTooWide {
                    kind,
                    rotation,
                    row,
                });
            }
            let found = shape.count();
            if found != MINOS_PER_PIECE {
                return Err(CatalogError::CellCount {
                    kind,
                    rotation,
                    found,
                });
            }
        }
    }

    Ok(())
}

/// Validate the built-in catalog
pub fn validate_catalog() -> Result<(), CatalogError> {
    validate_table(&CATALOG)
}

/// Panic with a descriptive message if the built-in catalog is broken.
///
/// The check runs once per process.
pub fn assert_catalog_valid() {
    static CHECKED: OnceLock<Result<(), CatalogError>> = OnceLock::new();
    if let Err(err) = CHECKED.get_or_init(validate_catalog) {
        panic!("piece catalog is invalid: {err}");
    }
}

/// Number of rotation states for a kind
pub fn rotation_count(kind: PieceKind) -> usize {
    CATALOG[kind.index()].len()
}

/// Shape of `kind` in rotation state `rotation`
pub fn shape_of(kind: PieceKind, rotation: usize) -> Result<Shape, CatalogError> {
    let rotations = CATALOG[kind.index()];
    rotations
        .get(rotation)
        .copied()
        .ok_or(CatalogError::RotationOutOfRange {
            kind,
            rotation,
            count: rotations.len(),
        })
}

/// Shape lookup for engine-held rotation indices.
///
/// The engine only ever stores indices below [`rotation_count`], so a miss is
/// a broken invariant and panics.
pub fn get_shape(kind: PieceKind, rotation: usize) -> Shape {
    match shape_of(kind, rotation) {
        Ok(shape) => shape,
        Err(err) => panic!("{err}"),
    }
}

/// Display colors for a kind
pub fn color_of(kind: PieceKind) -> PieceColors {
    let (fill, border) = match kind {
        PieceKind::T => (Rgb::new(160, 60, 200), Rgb::new(100, 30, 130)),
        PieceKind::O => (Rgb::new(240, 220, 60), Rgb::new(170, 150, 20)),
        PieceKind::L => (Rgb::new(255, 165, 0), Rgb::new(180, 100, 0)),
        PieceKind::I => (Rgb::new(60, 220, 230), Rgb::new(20, 140, 150)),
        PieceKind::S => (Rgb::new(80, 220, 90), Rgb::new(30, 140, 40)),
        PieceKind::Z => (Rgb::new(230, 60, 60), Rgb::new(150, 25, 25)),
        PieceKind::J => (Rgb::new(70, 110, 240), Rgb::new(30, 60, 160)),
    };
    PieceColors { fill, border }
}

/// Initial shape for a freshly spawned piece
pub fn get_spawn_shape(kind: PieceKind) -> Shape {
    get_shape(kind, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        assert_eq!(validate_catalog(), Ok(()));
        assert_catalog_valid();
    }

    #[test]
    fn rotation_counts_match_kinds() {
        assert_eq!(rotation_count(PieceKind::O), 1);
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            assert_eq!(rotation_count(kind), 2);
        }
        for kind in [PieceKind::T, PieceKind::L, PieceKind::J] {
            assert_eq!(rotation_count(kind), 4);
        }
    }

    #[test]
    fn is_set_reads_left_to_right() {
        let shape = Shape::new([0b10000, 0, 0, 0, 0b00001]);
        assert!(shape.is_set(0, 0));
        assert!(!shape.is_set(4, 0));
        assert!(shape.is_set(4, 4));
        assert!(!shape.is_set(5, 0));
        assert_eq!(shape.count(), 2);
    }

    #[test]
    fn minos_of_i_piece() {
        let minos: Vec<_> = get_shape(PieceKind::I, 0).minos().collect();
        assert_eq!(minos, vec![(0, 2), (1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn shape_of_rejects_out_of_range_rotation() {
        assert_eq!(
            shape_of(PieceKind::O, 1),
            Err(CatalogError::RotationOutOfRange {
                kind: PieceKind::O,
                rotation: 1,
                count: 1
            })
        );
        assert!(shape_of(PieceKind::T, 3).is_ok());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn get_shape_panics_on_bad_rotation() {
        get_shape(PieceKind::I, 2);
    }

    #[test]
    fn validate_table_reports_wrong_cell_count() {
        let three = [Shape::new([0, 0b01110, 0, 0, 0])];
        let table: [&[Shape]; 7] = [
            &T_SHAPES, &O_SHAPES, &L_SHAPES, &I_SHAPES, &S_SHAPES, &Z_SHAPES, &three,
        ];
        assert_eq!(
            validate_table(&table),
            Err(CatalogError::CellCount {
                kind: 6,
                rotation: 0,
                found: 3
            })
        );
    }

    #[test]
    fn validate_table_reports_wide_rows_and_missing_rotations() {
        let wide = [Shape::new([0b100000, 0b00111, 0, 0, 0])];
        let table: [&[Shape]; 7] = [
            &T_SHAPES, &wide, &L_SHAPES, &I_SHAPES, &S_SHAPES, &Z_SHAPES, &J_SHAPES,
        ];
        assert!(matches!(
            validate_table(&table),
            Err(CatalogError::ShapeTooWide { kind: 1, row: 0, .. })
        ));

        let table: [&[Shape]; 7] = [
            &T_SHAPES, &O_SHAPES, &[], &I_SHAPES, &S_SHAPES, &Z_SHAPES, &J_SHAPES,
        ];
        assert_eq!(
            validate_table(&table),
            Err(CatalogError::NoRotations { kind: 2 })
        );

        assert_eq!(
            validate_table(&CATALOG[..6]),
            Err(CatalogError::KindCount {
                expected: 7,
                found: 6
            })
        );
    }

    #[test]
    fn colors_are_distinct_per_kind() {
        for a in PieceKind::ALL {
            for b in PieceKind::ALL {
                if a != b {
                    assert_ne!(color_of(a).fill, color_of(b).fill);
                }
            }
            assert_ne!(color_of(a).fill, color_of(a).border);
        }
    }
}
