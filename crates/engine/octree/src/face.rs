use bitflags::bitflags;
use glam::IVec3;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of cube sides.
    ///
    /// Bit order is Left, Bottom, Front, Right, Top, Back: the low side of
    /// each axis first, then the high side, so rotating the index by three
    /// gives the opposite side.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Face: u8 {
        /// -X
        const LEFT = 1 << 0;
        /// -Y
        const BOTTOM = 1 << 1;
        /// -Z
        const FRONT = 1 << 2;
        /// +X
        const RIGHT = 1 << 3;
        /// +Y
        const TOP = 1 << 4;
        /// +Z
        const BACK = 1 << 5;
    }
}

impl Face {
    pub const NONE: Face = Face::empty();
    pub const ALL: Face = Face::all();

    /// The six single sides in index order
    pub const SIDES: [Face; 6] = [
        Face::LEFT,
        Face::BOTTOM,
        Face::FRONT,
        Face::RIGHT,
        Face::TOP,
        Face::BACK,
    ];

    /// Single side with the given index, `None` past 5
    #[inline]
    pub fn from_index(index: usize) -> Option<Face> {
        Self::SIDES.get(index).copied()
    }

    /// Index of the lowest set side
    ///
    /// Composite values report their lowest side; the empty set has no index.
    #[inline]
    pub fn index(self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.bits().trailing_zeros() as usize)
        }
    }

    /// True if exactly one side is set
    #[inline]
    pub fn is_single(self) -> bool {
        self.bits().count_ones() == 1
    }

    /// Mirror every set side through the cube centre
    #[inline]
    pub fn opposite(self) -> Face {
        let bits = self.bits();
        Face::from_bits_truncate((bits << 3) | (bits >> 3))
    }

    /// Unit step towards the set sides
    ///
    /// Composite values sum their sides, so `LEFT | TOP` points at the edge
    /// neighbour and a side combined with its opposite cancels out.
    pub fn direction(self) -> IVec3 {
        let axis = |low: Face, high: Face| self.contains(high) as i32 - self.contains(low) as i32;
        IVec3::new(
            axis(Face::LEFT, Face::RIGHT),
            axis(Face::BOTTOM, Face::TOP),
            axis(Face::FRONT, Face::BACK),
        )
    }

    /// Iterator over the six single sides
    #[inline]
    pub fn sides() -> impl Iterator<Item = Face> {
        Self::SIDES.iter().copied()
    }
}
