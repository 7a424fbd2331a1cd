use crate::Face;
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Child position inside a parent node
///
/// Index layout is `x << 2 | y << 1 | z`:
/// A=000 (x-,y-,z-)  E=100 (x+,y-,z-)
/// B=001 (x-,y-,z+)  F=101 (x+,y-,z+)
/// C=010 (x-,y+,z-)  G=110 (x+,y+,z-)
/// D=011 (x-,y+,z+)  H=111 (x+,y+,z+)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Octant {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl Octant {
    /// All octants in traversal order
    pub const ALL: [Octant; 8] = [
        Octant::A,
        Octant::B,
        Octant::C,
        Octant::D,
        Octant::E,
        Octant::F,
        Octant::G,
        Octant::H,
    ];

    /// Boundary faces touched by each octant, by index
    const FACES: [Face; 8] = [
        Face::LEFT.union(Face::BOTTOM).union(Face::FRONT),
        Face::LEFT.union(Face::BOTTOM).union(Face::BACK),
        Face::LEFT.union(Face::TOP).union(Face::FRONT),
        Face::LEFT.union(Face::TOP).union(Face::BACK),
        Face::RIGHT.union(Face::BOTTOM).union(Face::FRONT),
        Face::RIGHT.union(Face::BOTTOM).union(Face::BACK),
        Face::RIGHT.union(Face::TOP).union(Face::FRONT),
        Face::RIGHT.union(Face::TOP).union(Face::BACK),
    ];

    #[inline]
    pub fn from_index(index: usize) -> Option<Octant> {
        Self::ALL.get(index).copied()
    }

    /// Octant on the high (`true`) or low (`false`) side of each axis
    #[inline]
    pub fn from_xyz(x: bool, y: bool, z: bool) -> Octant {
        Self::ALL[((x as usize) << 2) | ((y as usize) << 1) | z as usize]
    }

    /// Corner octant selected by one X side, one Y side and one Z side
    ///
    /// Returns `None` unless exactly one side of each axis is present.
    pub fn from_faces(faces: Face) -> Option<Octant> {
        let pick = |low: Face, high: Face| match (faces.contains(low), faces.contains(high)) {
            (true, false) => Some(false),
            (false, true) => Some(true),
            _ => None,
        };
        Some(Self::from_xyz(
            pick(Face::LEFT, Face::RIGHT)?,
            pick(Face::BOTTOM, Face::TOP)?,
            pick(Face::FRONT, Face::BACK)?,
        ))
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn x(self) -> i32 {
        ((self as u8 >> 2) & 1) as i32
    }

    #[inline]
    pub fn y(self) -> i32 {
        ((self as u8 >> 1) & 1) as i32
    }

    #[inline]
    pub fn z(self) -> i32 {
        (self as u8 & 1) as i32
    }

    /// Position of this octant in half-size units, each component 0 or 1
    #[inline]
    pub fn offset(self) -> IVec3 {
        IVec3::new(self.x(), self.y(), self.z())
    }

    /// Next octant in traversal order, wrapping from H back to A
    #[inline]
    pub fn next(self) -> Octant {
        Self::ALL[(self.index() + 1) % 8]
    }

    /// The three outer faces of the parent this octant touches
    #[inline]
    pub fn faces(self) -> Face {
        Self::FACES[self.index()]
    }

    /// Octants touching `face`, in traversal order
    pub fn touching(face: Face) -> impl Iterator<Item = Octant> {
        Self::ALL
            .into_iter()
            .filter(move |octant| octant.faces().contains(face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octant_index_layout() {
        assert_eq!(Octant::from_xyz(false, false, false), Octant::A);
        assert_eq!(Octant::from_xyz(false, false, true), Octant::B);
        assert_eq!(Octant::from_xyz(false, true, false), Octant::C);
        assert_eq!(Octant::from_xyz(true, false, false), Octant::E);
        assert_eq!(Octant::from_xyz(true, true, true), Octant::H);

        for (i, octant) in Octant::ALL.iter().enumerate() {
            assert_eq!(octant.index(), i);
            assert_eq!(Octant::from_index(i), Some(*octant));
            assert_eq!(
                (octant.x() << 2 | octant.y() << 1 | octant.z()) as usize,
                i
            );
        }
        assert_eq!(Octant::from_index(8), None);
    }

    #[test]
    fn test_octant_offset() {
        assert_eq!(Octant::A.offset(), IVec3::ZERO);
        assert_eq!(Octant::E.offset(), IVec3::new(1, 0, 0));
        assert_eq!(Octant::C.offset(), IVec3::new(0, 1, 0));
        assert_eq!(Octant::B.offset(), IVec3::new(0, 0, 1));
        assert_eq!(Octant::H.offset(), IVec3::ONE);
    }

    #[test]
    fn test_next_wraps() {
        let mut octant = Octant::A;
        for expected in Octant::ALL.iter().skip(1) {
            octant = octant.next();
            assert_eq!(octant, *expected);
        }
        assert_eq!(Octant::H.next(), Octant::A);
    }

    #[test]
    fn test_octant_faces() {
        assert_eq!(Octant::A.faces(), Face::LEFT | Face::BOTTOM | Face::FRONT);
        assert_eq!(Octant::H.faces(), Face::RIGHT | Face::TOP | Face::BACK);
        assert_eq!(Octant::E.faces(), Face::RIGHT | Face::BOTTOM | Face::FRONT);

        for octant in Octant::ALL {
            assert_eq!(octant.faces().iter().count(), 3);
            assert_eq!(Octant::from_faces(octant.faces()), Some(octant));
        }
    }

    #[test]
    fn test_from_faces_needs_one_side_per_axis() {
        assert_eq!(Octant::from_faces(Face::LEFT | Face::TOP), None);
        assert_eq!(
            Octant::from_faces(Face::LEFT | Face::RIGHT | Face::TOP | Face::BACK),
            None
        );
        assert_eq!(Octant::from_faces(Face::NONE), None);
    }

    #[test]
    fn test_touching_faces() {
        for side in Face::sides() {
            let octants: Vec<Octant> = Octant::touching(side).collect();
            assert_eq!(octants.len(), 4, "{:?} should touch 4 octants", side);
        }
        let right: Vec<Octant> = Octant::touching(Face::RIGHT).collect();
        assert_eq!(right, vec![Octant::E, Octant::F, Octant::G, Octant::H]);
        let back: Vec<Octant> = Octant::touching(Face::BACK).collect();
        assert_eq!(back, vec![Octant::B, Octant::D, Octant::F, Octant::H]);
    }
}
