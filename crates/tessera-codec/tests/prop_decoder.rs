use proptest::prelude::*;
use tessera_codec::{DctPatchDecoder, patches};
use tessera_wire::{BitReader, LayerType, PatchGroupHeader};

proptest! {
    // Arbitrary bytes never panic, never overrun, and every patch is full size
    #[test]
    fn garbage_input_is_total(data in proptest::collection::vec(any::<u8>(), 0..512), size in prop_oneof![Just(16u8), Just(32u8), Just(4u8)]) {
        let group = PatchGroupHeader::new(0, size, LayerType::Land);
        let mut dec = DctPatchDecoder::new();
        let mut bits = BitReader::new(&data);
        let mut n = 0usize;
        for res in patches(&mut dec, &mut bits, group) {
            if let Ok(p) = res {
                prop_assert_eq!(p.height_data.len(), size as usize * size as usize);
                prop_assert!(p.height_data.iter().all(|h| h.is_finite()));
            }
            n += 1;
            prop_assert!(n <= data.len() * 8 / 66 + 1);
        }
        prop_assert!(bits.bit_position() <= data.len() * 8);
    }
}
