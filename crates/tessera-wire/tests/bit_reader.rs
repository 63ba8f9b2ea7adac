use tessera_wire::{BitReader, BitWriter, LayerType, PatchGroupHeader, PatchHeader, PatchHeaderRead, WireError};

#[test]
fn reads_msb_first() {
    let data = [0b1010_0000];
    let mut r = BitReader::with_len(&data, 1);
    assert_eq!(r.read_bits(4), 0b1010);
    assert_eq!(r.bit_position(), 4);
    assert_eq!(r.bits_remaining(), 4);
}

#[test]
fn first_bit_read_is_most_significant_across_bytes() {
    // 0x12 0x34 read as one 16-bit word is big-endian in reading order
    let data = [0x12, 0x34];
    let mut r = BitReader::new(&data);
    assert_eq!(r.read_bits(16), 0x1234);

    let data = [0b1100_0011, 0b1010_0000];
    let mut r = BitReader::new(&data);
    assert_eq!(r.read_bits(3), 0b110);
    assert_eq!(r.read_bits(7), 0b0001_110);
    assert_eq!(r.read_bits(3), 0b100);
}

#[test]
fn read_bits_32() {
    let data = [0xDE, 0xAD, 0xBE, 0xEF];
    let mut r = BitReader::new(&data);
    assert_eq!(r.read_bits(32), 0xDEAD_BEEF);
    assert!(r.is_at_end());
}

#[test]
fn read_bit_at_end_is_false_and_does_not_advance() {
    let data = [0xFF];
    let mut r = BitReader::new(&data);
    assert_eq!(r.read_bits(8), 0xFF);
    assert!(!r.read_bit());
    assert!(!r.read_bit());
    assert_eq!(r.bit_position(), 8);
    assert_eq!(r.bits_remaining(), 0);
}

// Legacy behavior kept on purpose: over-long reads zero-fill instead of failing.
#[test]
fn read_past_end_zero_fills_low_bits() {
    let data = [0xAB];
    let mut r = BitReader::new(&data);
    assert_eq!(r.read_bits(16), 0xAB00);
    assert_eq!(r.bit_position(), 8);

    let mut empty = BitReader::new(&[]);
    assert_eq!(empty.read_bits(32), 0);
    assert_eq!(empty.bits_remaining(), 0);
}

#[test]
fn with_len_clamps_to_buffer() {
    let data = [0xFF, 0xFF];
    assert_eq!(BitReader::with_len(&data, 1).bits_remaining(), 8);
    assert_eq!(BitReader::with_len(&data, 10).bits_remaining(), 16);
}

#[test]
fn reset_rewinds() {
    let data = [0x80, 0x01];
    let mut r = BitReader::new(&data);
    assert!(r.read_bit());
    r.read_bits(10);
    r.reset();
    assert_eq!(r.bit_position(), 0);
    assert!(r.read_bit());
}

#[test]
fn try_read_bits_refuses_to_overrun() {
    let data = [0xF0];
    let mut r = BitReader::new(&data);
    r.read_bits(5);
    assert_eq!(
        r.try_read_bits(4),
        Err(WireError::Truncated {
            needed: 4,
            remaining: 3
        })
    );
    assert_eq!(r.bit_position(), 5);
    assert_eq!(r.try_read_bits(3), Ok(0));
}

#[test]
fn float_is_little_endian_bytes() {
    let v = 21.5f32;
    let bytes = v.to_le_bytes();
    let mut r = BitReader::new(&bytes);
    assert_eq!(r.read_f32_le(), v);
}

#[test]
fn group_header_layout() {
    let data = [0x01, 0x08, 0x10, b'L'];
    let mut r = BitReader::new(&data);
    let h = PatchGroupHeader::read(&mut r).unwrap();
    assert_eq!(h.stride, 0x0108);
    assert_eq!(h.patch_size, 16);
    assert_eq!(h.layer(), Some(LayerType::Land));
    assert!(r.is_at_end());
}

#[test]
fn group_header_too_short() {
    let data = [0x00, 0x00, 0x10];
    let mut r = BitReader::new(&data);
    assert_eq!(
        PatchGroupHeader::read(&mut r),
        Err(WireError::Truncated {
            needed: 32,
            remaining: 24
        })
    );
}

#[test]
fn layer_type_codes() {
    assert_eq!(LayerType::from_u8(0x4C), Some(LayerType::Land));
    assert_eq!(LayerType::from_u8(0x57), Some(LayerType::Water));
    assert_eq!(LayerType::from_u8(0x37), Some(LayerType::Wind));
    assert_eq!(LayerType::from_u8(0x38), Some(LayerType::Cloud));
    assert_eq!(LayerType::from_u8(0x00), None);
    assert_eq!(LayerType::Cloud.to_u8(), 0x38);
}

#[test]
fn patch_header_fields() {
    let mut w = BitWriter::new();
    PatchHeader::new(0x3A, -4.25, 300, 7, 19).write(&mut w);
    assert_eq!(w.bit_len(), PatchHeader::BITS);
    let bytes = w.into_bytes();

    let mut r = BitReader::new(&bytes);
    let PatchHeaderRead::Header(h) = PatchHeader::read(&mut r).unwrap() else {
        panic!("expected header");
    };
    assert_eq!(h.quant_wbits, 0x3A);
    assert_eq!(h.dc_offset, -4.25);
    assert_eq!(h.range, 300);
    assert_eq!((h.x, h.y), (7, 19));
    assert_eq!(h.word_bits, 0x0A + 2);
}

#[test]
fn patch_header_end_marker_and_truncation() {
    let mut w = BitWriter::new();
    PatchHeader::write_end(&mut w);
    w.write_bits(0, 64);
    let bytes = w.into_bytes();
    let mut r = BitReader::new(&bytes);
    assert_eq!(PatchHeader::read(&mut r), Ok(PatchHeaderRead::EndOfPatches));

    let short = [0u8; 8];
    let mut r = BitReader::new(&short);
    assert!(matches!(
        PatchHeader::read(&mut r),
        Err(WireError::Truncated { needed: 66, remaining: 64 })
    ));
    assert_eq!(r.bit_position(), 0);
}
