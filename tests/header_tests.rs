use tagbuf::{TagBuf, TagBufError};

#[test]
fn test_init_rejects_region_below_header_size() {
    let mut region = [0u8; 0];
    assert_eq!(
        TagBuf::new(&mut region).unwrap_err(),
        TagBufError::BufferTooSmall {
            required: 5,
            available: 0
        }
    );

    let mut region = [0u8; 4];
    assert_eq!(
        TagBuf::new(&mut region).unwrap_err(),
        TagBufError::BufferTooSmall {
            required: 5,
            available: 4
        }
    );

    // the header alone fits
    let mut region = [0u8; 5];
    assert!(TagBuf::new(&mut region).is_ok());
}

#[test]
fn test_open_rejects_region_below_header_size() {
    let mut region = [0u8; 3];
    assert_eq!(
        TagBuf::open(&mut region).unwrap_err(),
        TagBufError::BufferTooSmall {
            required: 5,
            available: 3
        }
    );
}

#[test]
fn test_open_preserves_existing_records() {
    let mut region = [0u8; 128];
    {
        let mut buf = TagBuf::new(&mut region).unwrap();
        buf.set(1, 0xbeef_u16).unwrap();
        buf.add_blob(2, b"still here").unwrap();
    }

    let buf = TagBuf::open(&mut region).unwrap();
    assert_eq!(buf.get_unsigned(1).unwrap(), 0xbeef);
    let member = buf.find(2).unwrap();
    assert_eq!(member.min_size(), 10);
}

#[test]
fn test_open_tolerates_minor_version_difference() {
    let mut region = [0u8; 128];
    {
        let mut buf = TagBuf::new(&mut region).unwrap();
        buf.set(1, 77_u8).unwrap();
    }

    // flip the minor bits only
    region[0] |= 0x03;
    let buf = TagBuf::open(&mut region).unwrap();
    assert_eq!(buf.version(), (2, 3));
    assert_eq!(buf.get_unsigned(1).unwrap(), 77);
}

#[test]
fn test_open_rejects_major_version_mismatch() {
    let mut region = [0u8; 128];
    {
        TagBuf::new(&mut region).unwrap();
    }

    let tampered = (3_u8 & 0x7) << 3;
    region[0] = tampered;
    assert_eq!(
        TagBuf::open(&mut region).unwrap_err(),
        TagBufError::WrongVersion {
            found: tampered,
            expected: 0x10
        }
    );
}

#[test]
fn test_open_rejects_foreign_endianness() {
    let mut region = [0u8; 128];
    {
        TagBuf::new(&mut region).unwrap();
    }

    region[0] |= 0x80;
    assert_eq!(
        TagBuf::open(&mut region).unwrap_err(),
        TagBufError::WrongVersion {
            found: 0x90,
            expected: 0x10
        }
    );
}

#[test]
fn test_open_rejects_size_field_past_region_end() {
    let mut region = [0u8; 32];
    {
        TagBuf::new(&mut region).unwrap();
    }

    // claim more value bytes than the region holds
    region[1..5].copy_from_slice(&100_u32.to_le_bytes());
    assert_eq!(
        TagBuf::open(&mut region).unwrap_err(),
        TagBufError::BufferTooSmall {
            required: 105,
            available: 32
        }
    );
}
