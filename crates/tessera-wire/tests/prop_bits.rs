use proptest::prelude::*;
use tessera_wire::{BitReader, BitWriter};

proptest! {
    // readBits(n) on a single byte returns its top n bits
    #[test]
    fn top_bits_of_byte(b in any::<u8>(), n in 1u32..=8) {
        let data = [b];
        let mut r = BitReader::new(&data);
        prop_assert_eq!(r.read_bits(n), (b as u32) >> (8 - n));
    }

    // Never panics, never advances past the end, zero-fills beyond it
    #[test]
    fn overlong_reads_are_total(data in proptest::collection::vec(any::<u8>(), 0..6), counts in proptest::collection::vec(0u32..=32, 1..8)) {
        let mut r = BitReader::new(&data);
        let total = data.len() * 8;
        for c in counts {
            let before = r.bits_remaining();
            let v = r.read_bits(c);
            let consumed = before - r.bits_remaining();
            prop_assert_eq!(consumed, (c as usize).min(before));
            // bits that came from beyond the end are zero
            let missing = c as usize - consumed;
            if missing > 0 && missing < 32 {
                prop_assert_eq!(v & ((1u32 << missing) - 1), 0);
            }
            prop_assert!(r.bit_position() <= total);
        }
    }

    // A writer sequence of (value, width) fields reads back field by field
    #[test]
    fn writer_fields_read_back(fields in proptest::collection::vec((any::<u32>(), 1u32..=32), 1..16)) {
        let mut w = BitWriter::new();
        for (v, n) in &fields {
            w.write_bits(*v, *n);
        }
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        for (v, n) in fields {
            let mask = if n == 32 { u32::MAX } else { (1u32 << n) - 1 };
            prop_assert_eq!(r.read_bits(n), v & mask);
        }
    }
}
