//! Every shape is described by the offsets of its four cells from a reference
//! cell at spawn time. Rotation does not spin the offsets around a pivot:
//! each (shape, angle, direction) entry carries one delta per cell, applied to
//! the cells in their stored order.

use std::sync::OnceLock;

use rand::Rng;

/// Offset in block units, `(dx, dy)`, y growing downward.
pub type Delta = (i16, i16);

/// One delta per cell of a piece, in cell order.
pub type CellDeltas = [Delta; 4];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Shape {
    G,
    I,
    L,
    O,
    S,
    T,
    Z,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::G,
        Shape::I,
        Shape::L,
        Shape::O,
        Shape::S,
        Shape::T,
        Shape::Z,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Cell offsets from the reference cell at angle 0.
    pub fn spawn_offsets(self) -> CellDeltas {
        match self {
            Shape::G => [(0, 0), (1, 0), (0, 1), (0, 2)],
            Shape::I => [(0, 0), (0, 1), (0, 2), (0, 3)],
            Shape::L => [(0, 0), (0, 1), (0, 2), (1, 2)],
            Shape::O => [(0, 0), (1, 0), (1, 1), (0, 1)],
            Shape::S => [(0, 0), (1, 0), (0, 1), (-1, 1)],
            Shape::T => [(0, 0), (1, 0), (2, 0), (1, 1)],
            Shape::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
        }
    }

    /// Number of distinct rotation states.
    pub fn orientations(self) -> u8 {
        match self {
            Shape::O => 1,
            Shape::I | Shape::S | Shape::Z => 2,
            Shape::G | Shape::L | Shape::T => 4,
        }
    }

    /// Angle reached by one rotation step from `angle`.
    ///
    /// Two-state shapes flip parity whatever the direction.
    pub fn next_angle(self, angle: u8, clockwise: bool) -> u8 {
        match self.orientations() {
            1 => 0,
            2 => angle ^ 1,
            n if clockwise => (angle + 1) % n,
            n => (angle + n - 1) % n,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// ============================================================================
// Clockwise deltas, indexed by the angle the rotation starts from
// ============================================================================

const NONE: Delta = (0, 0);

const CLOCKWISE_G: [CellDeltas; 4] = [
    [NONE, NONE, (2, -1), (2, -1)],
    [(1, 2), (1, 2), NONE, NONE],
    [NONE, NONE, (-2, 1), (-2, 1)],
    [(-1, -2), (-1, -2), NONE, NONE],
];

const CLOCKWISE_I: [CellDeltas; 2] = [
    [(-1, 1), NONE, (1, -1), (2, -2)],
    [(1, -1), NONE, (-1, 1), (-2, 2)],
];

const CLOCKWISE_L: [CellDeltas; 4] = [
    [NONE, NONE, (1, -2), (1, -2)],
    [(2, 1), (2, 1), NONE, NONE],
    [NONE, NONE, (-1, 2), (-1, 2)],
    [(-2, -1), (-2, -1), NONE, NONE],
];

const CLOCKWISE_O: [CellDeltas; 1] = [[NONE; 4]];

const CLOCKWISE_S: [CellDeltas; 2] = [
    [NONE, NONE, (0, -2), (2, 0)],
    [NONE, NONE, (0, 2), (-2, 0)],
];

const CLOCKWISE_T: [CellDeltas; 4] = [
    [NONE, NONE, (-1, -1), NONE],
    [NONE, NONE, NONE, (1, -1)],
    [(1, -1), NONE, (1, 1), (-1, 1)],
    [(-1, 1), NONE, NONE, NONE],
];

const CLOCKWISE_Z: [CellDeltas; 2] = [
    [NONE, NONE, (-1, 0), (-1, -2)],
    [NONE, NONE, (1, 0), (1, 2)],
];

fn clockwise_deltas(shape: Shape) -> &'static [CellDeltas] {
    match shape {
        Shape::G => &CLOCKWISE_G,
        Shape::I => &CLOCKWISE_I,
        Shape::L => &CLOCKWISE_L,
        Shape::O => &CLOCKWISE_O,
        Shape::S => &CLOCKWISE_S,
        Shape::T => &CLOCKWISE_T,
        Shape::Z => &CLOCKWISE_Z,
    }
}

fn negate(deltas: CellDeltas) -> CellDeltas {
    deltas.map(|(dx, dy)| (-dx, -dy))
}

// ============================================================================
// Rotation Table
// ============================================================================

const CW: usize = 0;
const CCW: usize = 1;

/// Cell deltas keyed by (shape, direction, angle).
///
/// Counter-clockwise from `a` undoes clockwise from `a - 1`, so only the
/// clockwise half is written out and the rest is derived on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationTable {
    entries: [[[CellDeltas; 4]; 2]; 7],
}

impl RotationTable {
    /// The shared table, built on first access.
    pub fn get() -> &'static RotationTable {
        static TABLE: OnceLock<RotationTable> = OnceLock::new();
        TABLE.get_or_init(RotationTable::build)
    }

    fn build() -> Self {
        let mut entries = [[[[NONE; 4]; 4]; 2]; 7];

        for shape in Shape::ALL {
            let clockwise = clockwise_deltas(shape);
            let n = clockwise.len();
            for angle in 0..n {
                let previous = (angle + n - 1) % n;
                entries[shape.index()][CW][angle] = clockwise[angle];
                entries[shape.index()][CCW][angle] = negate(clockwise[previous]);
            }
        }

        Self { entries }
    }

    /// Deltas to apply when rotating `shape` out of `angle`.
    pub fn deltas(&self, shape: Shape, angle: u8, clockwise: bool) -> CellDeltas {
        let direction = if clockwise { CW } else { CCW };
        let angle = angle % shape.orientations();
        self.entries[shape.index()][direction][angle as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_clockwise_entries_match_classic_table() {
        let table = RotationTable::get();

        // G from angle 0 counter-clockwise lifts the two top cells.
        assert_eq!(
            table.deltas(Shape::G, 0, false),
            [(1, 2), (1, 2), NONE, NONE]
        );
        // T from angle 3 counter-clockwise moves three cells.
        assert_eq!(
            table.deltas(Shape::T, 3, false),
            [(-1, 1), NONE, (-1, -1), (1, -1)]
        );
        // L from angle 1 counter-clockwise.
        assert_eq!(
            table.deltas(Shape::L, 1, false),
            [NONE, NONE, (-1, 2), (-1, 2)]
        );
    }

    #[test]
    fn two_state_shapes_ignore_direction() {
        let table = RotationTable::get();
        for shape in [Shape::I, Shape::S, Shape::Z] {
            for angle in 0..2 {
                assert_eq!(
                    table.deltas(shape, angle, true),
                    table.deltas(shape, angle, false),
                    "{shape:?} at angle {angle}"
                );
            }
        }
    }

    #[test]
    fn square_never_moves() {
        let table = RotationTable::get();
        assert_eq!(table.deltas(Shape::O, 0, true), [NONE; 4]);
        assert_eq!(table.deltas(Shape::O, 0, false), [NONE; 4]);
        assert_eq!(Shape::O.next_angle(0, true), 0);
    }

    #[test]
    fn next_angle_wraps() {
        assert_eq!(Shape::T.next_angle(3, true), 0);
        assert_eq!(Shape::T.next_angle(0, false), 3);
        assert_eq!(Shape::I.next_angle(0, false), 1);
        assert_eq!(Shape::S.next_angle(1, true), 0);
    }
}
