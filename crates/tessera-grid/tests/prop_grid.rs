use proptest::prelude::*;
use tessera_codec::DecodedPatch;
use tessera_grid::{GridDims, PatchCoord, TerrainGrid};
use tessera_wire::PatchHeader;

const PS: usize = 4;
const EDGE: usize = 3;

fn heights() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-500.0f32..500.0, PS * PS)
}

proptest! {
    #[test]
    fn last_writer_wins(x in 0..EDGE, y in 0..EDGE, a in heights(), b in heights()) {
        let mut grid = TerrainGrid::new(GridDims::new(EDGE, PS));
        let h = |v: Vec<f32>| DecodedPatch::new(PatchHeader::new(0, 0.0, 0, x as u8, y as u8), v);
        grid.apply_patch(&h(a)).unwrap();
        grid.apply_patch(&h(b.clone())).unwrap();
        prop_assert_eq!(grid.patch(PatchCoord::new(x, y)).heights(), b.as_slice());
    }

    #[test]
    fn normals_are_unit_and_face_up(
        hs in prop::collection::vec(heights(), EDGE * EDGE),
        px in 0..EDGE, py in 0..EDGE, xi in 0..PS, yi in 0..PS,
    ) {
        let mut grid = TerrainGrid::new(GridDims::new(EDGE, PS));
        for (i, v) in hs.into_iter().enumerate() {
            let hdr = PatchHeader::new(0, 0.0, 0, (i % EDGE) as u8, (i / EDGE) as u8);
            grid.apply_patch(&DecodedPatch::new(hdr, v)).unwrap();
        }
        let n = grid.calculate_normal(px, py, xi, yi);
        prop_assert!((n.length() - 1.0).abs() < 1e-4);
        prop_assert!(n.z > 0.0);
    }

    #[test]
    fn interpolation_stays_within_sample_bounds(
        v in heights(), x in -2.0f32..6.0, y in -2.0f32..6.0,
    ) {
        let mut grid = TerrainGrid::new(GridDims::new(1, PS));
        let lo = v.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        grid.apply_patch(&DecodedPatch::new(PatchHeader::new(0, 0.0, 0, 0, 0), v)).unwrap();
        let h = grid.interpolated_height_at(x, y);
        prop_assert!(h >= lo - 1e-3 && h <= hi + 1e-3);
    }
}
