use tagbuf::{BaseType, TagBuf, TagBufError};

#[test]
fn test_round_trip_signed_widths() {
    let mut region = [0u8; 256];
    let mut buf = TagBuf::new(&mut region).unwrap();

    buf.set(0, -12_i8).unwrap();
    buf.set(1, -30_000_i16).unwrap();
    buf.set(2, -2_000_000_000_i32).unwrap();
    buf.set(3, i64::MIN).unwrap();

    assert_eq!(buf.get_scalar::<i8>(0).unwrap(), -12);
    assert_eq!(buf.get_scalar::<i16>(1).unwrap(), -30_000);
    assert_eq!(buf.get_scalar::<i32>(2).unwrap(), -2_000_000_000);
    assert_eq!(buf.get_scalar::<i64>(3).unwrap(), i64::MIN);

    assert_eq!(buf.get_signed(0).unwrap(), -12);
    assert_eq!(buf.get_signed(1).unwrap(), -30_000);
    assert_eq!(buf.get_signed(2).unwrap(), -2_000_000_000);
    assert_eq!(buf.get_signed(3).unwrap(), i64::MIN);
}

#[test]
fn test_round_trip_unsigned_widths() {
    let mut region = [0u8; 256];
    let mut buf = TagBuf::new(&mut region).unwrap();

    buf.set(0, 0xab_u8).unwrap();
    buf.set(1, 0xabcd_u16).unwrap();
    buf.set(2, 0xdead_beef_u32).unwrap();
    buf.set(3, u64::MAX).unwrap();

    assert_eq!(buf.get_scalar::<u8>(0).unwrap(), 0xab);
    assert_eq!(buf.get_scalar::<u16>(1).unwrap(), 0xabcd);
    assert_eq!(buf.get_scalar::<u32>(2).unwrap(), 0xdead_beef);
    assert_eq!(buf.get_scalar::<u64>(3).unwrap(), u64::MAX);

    assert_eq!(buf.get_unsigned(0).unwrap(), 0xab);
    assert_eq!(buf.get_unsigned(3).unwrap(), u64::MAX);
}

#[test]
fn test_round_trip_floats() {
    let mut region = [0u8; 128];
    let mut buf = TagBuf::new(&mut region).unwrap();

    buf.set(1, 1.5_f32).unwrap();
    buf.set(2, -2.25e10_f64).unwrap();

    assert_eq!(buf.find(1).unwrap().base_type(), BaseType::Float);
    assert_eq!(buf.find(2).unwrap().base_type(), BaseType::Double);
    assert_eq!(buf.get_scalar::<f32>(1).unwrap(), 1.5);
    assert_eq!(buf.get_scalar::<f64>(2).unwrap(), -2.25e10);
}

#[test]
fn test_get_copies_raw_payload_bytes() {
    let mut region = [0u8; 128];
    let mut buf = TagBuf::new(&mut region).unwrap();
    buf.set(1, 0x0102_0304_u32).unwrap();

    let member = buf.find(1).unwrap();
    let mut out = [0u8; 8];
    let n = buf.get(&member, &mut out).unwrap();
    assert_eq!(n, 4);
    assert_eq!(&out[..n], &[0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn test_set_unsigned_picks_smallest_width() {
    let mut region = [0u8; 256];
    let mut buf = TagBuf::new(&mut region).unwrap();

    let cases: [(u64, BaseType); 7] = [
        (0, BaseType::U8),
        (255, BaseType::U8),
        (256, BaseType::U16),
        (65_535, BaseType::U16),
        (65_536, BaseType::U32),
        (0xffff_ffff, BaseType::U32),
        (0x1_0000_0000, BaseType::U64),
    ];
    for (i, (value, expected)) in cases.iter().enumerate() {
        let id = i as u16;
        buf.set_unsigned(id, *value).unwrap();
        let member = buf.find(id).unwrap();
        assert_eq!(member.base_type(), *expected);
        assert!(member.base_type().is_unsigned());
        assert_eq!(buf.get_unsigned(id).unwrap(), *value);
    }
}

#[test]
fn test_set_signed_picks_smallest_width() {
    let mut region = [0u8; 256];
    let mut buf = TagBuf::new(&mut region).unwrap();

    let cases: [(i64, BaseType); 9] = [
        (0, BaseType::S8),
        (127, BaseType::S8),
        (-128, BaseType::S8),
        (128, BaseType::S16),
        (-129, BaseType::S16),
        (32_768, BaseType::S32),
        (-32_769, BaseType::S32),
        (2_147_483_648, BaseType::S64),
        (-2_147_483_649, BaseType::S64),
    ];
    for (i, (value, expected)) in cases.iter().enumerate() {
        let id = i as u16;
        buf.set_signed(id, *value).unwrap();
        let member = buf.find(id).unwrap();
        assert_eq!(member.base_type(), *expected);
        assert!(member.base_type().is_signed());
        assert_eq!(buf.get_signed(id).unwrap(), *value);
    }
}

#[test]
fn test_widening_getters_reject_wrong_family() {
    let mut region = [0u8; 128];
    let mut buf = TagBuf::new(&mut region).unwrap();

    buf.set(1, -5_i16).unwrap();
    buf.set(2, 5_u16).unwrap();
    buf.set(3, 1.0_f32).unwrap();

    assert_eq!(
        buf.get_unsigned(1).unwrap_err(),
        TagBufError::DifferentType {
            stored: BaseType::S16
        }
    );
    assert_eq!(
        buf.get_signed(2).unwrap_err(),
        TagBufError::DifferentType {
            stored: BaseType::U16
        }
    );
    assert_eq!(
        buf.get_unsigned(3).unwrap_err(),
        TagBufError::DifferentType {
            stored: BaseType::Float
        }
    );
}

#[test]
fn test_typed_getter_requires_exact_type() {
    let mut region = [0u8; 128];
    let mut buf = TagBuf::new(&mut region).unwrap();
    buf.set(1, 5_u32).unwrap();

    assert_eq!(
        buf.get_scalar::<f32>(1).unwrap_err(),
        TagBufError::DifferentType {
            stored: BaseType::U32
        }
    );
    assert_eq!(
        buf.get_scalar::<u16>(1).unwrap_err(),
        TagBufError::DifferentType {
            stored: BaseType::U32
        }
    );
}

#[test]
fn test_widening_getters_reject_arrays() {
    let mut region = [0u8; 128];
    let mut buf = TagBuf::new(&mut region).unwrap();
    buf.set_array(1, &[1_i16, 2, 3]).unwrap();

    assert_eq!(
        buf.get_signed(1).unwrap_err(),
        TagBufError::DifferentCount {
            stored: 3,
            expected: 1
        }
    );
}

#[test]
fn test_getters_report_missing_ids() {
    let mut region = [0u8; 64];
    let buf = TagBuf::new(&mut region).unwrap();

    assert_eq!(
        buf.get_unsigned(9).unwrap_err(),
        TagBufError::NotFound { id: 9 }
    );
    assert_eq!(
        buf.get_signed(9).unwrap_err(),
        TagBufError::NotFound { id: 9 }
    );
    assert_eq!(
        buf.get_scalar::<u8>(9).unwrap_err(),
        TagBufError::NotFound { id: 9 }
    );
}
