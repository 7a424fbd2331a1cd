use glam::{IVec2, IVec3};
use octree::Cuboid;
use proptest::prelude::*;
use world::{World, WorldConfig, AIR};

const SIZE: i32 = 4;
const SLICES: u32 = 2;

fn cuboid() -> impl Strategy<Value = Cuboid> {
    (-2i32..9, -2i32..9, -2i32..9, 0i32..7, 0i32..7, 0i32..7)
        .prop_map(|(x, y, z, w, h, d)| Cuboid::new(x, y, z, w, h, d))
}

fn loaded_world() -> World {
    let mut w = World::new(WorldConfig {
        chunk_size: SIZE,
        slices_per_chunk: SLICES,
        default_block: AIR,
    })
    .unwrap();
    for cx in 0..2 {
        for cz in 0..2 {
            w.insert_chunk(IVec2::new(cx, cz)).unwrap();
        }
    }
    w
}

proptest! {
    // Writes split across chunks and slices read back like one dense grid
    #[test]
    fn world_matches_dense_grid(ws in prop::collection::vec((cuboid(), 0u16..3), 0..8)) {
        let mut w = loaded_world();
        let (span, height) = (SIZE * 2, SIZE * SLICES as i32);
        let mut grid = vec![AIR; (span * height * span) as usize];
        let index = |p: IVec3| ((p.x * height + p.y) * span + p.z) as usize;

        for (region, v) in &ws {
            w.set_cuboid(*region, *v);
            for x in 0..span { for y in 0..height { for z in 0..span {
                let p = IVec3::new(x, y, z);
                if region.contains_point(p) {
                    grid[index(p)] = *v;
                }
            }}}
        }

        for x in 0..span { for y in 0..height { for z in 0..span {
            let p = IVec3::new(x, y, z);
            prop_assert_eq!(w.get(p), Some(&grid[index(p)]));
        }}}
        prop_assert!(w.chunks().all(|c| c.slices().iter().all(|s| s.is_canonical())));
    }

    // Every exposed face really borders a non-solid cell or unloaded space
    #[test]
    fn exposed_faces_border_open_space(ws in prop::collection::vec((cuboid(), 0u16..3), 0..6)) {
        let mut w = loaded_world();
        for (region, v) in &ws {
            w.set_cuboid(*region, *v);
        }
        for cx in 0..2 {
            for cz in 0..2 {
                for face in w.exposed_faces(IVec2::new(cx, cz)).unwrap() {
                    prop_assert!(face.value != AIR);
                    let d = face.face.direction();
                    // First layer of cells across the face
                    let base = if d.x > 0 || d.y > 0 || d.z > 0 {
                        face.position + d * face.size
                    } else {
                        face.position + d
                    };
                    let open = (0..face.size).any(|i| (0..face.size).any(|j| {
                        let offset = if d.x != 0 {
                            IVec3::new(0, i, j)
                        } else if d.y != 0 {
                            IVec3::new(i, 0, j)
                        } else {
                            IVec3::new(i, j, 0)
                        };
                        w.get(base + offset).map_or(true, |b| *b == AIR)
                    }));
                    prop_assert!(open);
                }
            }
        }
    }
}
