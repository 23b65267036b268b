use crate::bin_error::BinaryError;

/// A fixed-width integer that can be serialized to and from little-endian
/// bytes. Implemented for the integer types that appear in page headers:
/// `i32` (header fields, which may hold sentinel values such as `-1`) and
/// `u32` (identifiers).
pub trait LittleEndianInteger: Sized + Copy {
    /// The size of the type in bytes.
    const SIZE: usize;

    /// Deserializes the integer from a slice of exactly `Self::SIZE` bytes.
    fn from_le(source_bytes: &[u8]) -> Result<Self, BinaryError>;

    /// Serializes the integer into a slice of exactly `Self::SIZE` bytes.
    fn to_le(self, target_buffer: &mut [u8]) -> Result<(), BinaryError>;
}

macro_rules! impl_little_endian_integer {
    ($t:ty) => {
        impl LittleEndianInteger for $t {
            const SIZE: usize = std::mem::size_of::<$t>();

            fn from_le(source_bytes: &[u8]) -> Result<Self, BinaryError> {
                if source_bytes.len() != Self::SIZE {
                    return Err(BinaryError::BytesSliceSizeMismatch {
                        // No information about where the slice sits in the
                        // containing buffer, so report offset 0.
                        from_offset: 0usize,
                        expected: Self::SIZE,
                    });
                }

                Ok(<$t>::from_le_bytes(source_bytes.try_into()?))
            }

            fn to_le(self, target_buffer: &mut [u8]) -> Result<(), BinaryError> {
                let self_bytes = &self.to_le_bytes();

                if self_bytes.len() != target_buffer.len() {
                    return Err(BinaryError::BytesSliceSizeMismatch {
                        from_offset: 0usize,
                        expected: Self::SIZE,
                    });
                }

                target_buffer.copy_from_slice(self_bytes);
                Ok(())
            }
        }
    };
}

impl_little_endian_integer!(i32);
impl_little_endian_integer!(u32);

/// Reads a value of type `T` from `bytes` starting at `start_offset`,
/// interpreting the bytes as little-endian.
///
/// Returns `BinaryError::BytesSliceSizeMismatch` if the slice does not
/// contain `T::SIZE` bytes from `start_offset`.
pub fn read_le<T: LittleEndianInteger>(
    bytes: &[u8],
    start_offset: usize,
) -> Result<T, BinaryError> {
    let Some(slice) = bytes.get(start_offset..start_offset + T::SIZE) else {
        return Err(BinaryError::BytesSliceSizeMismatch {
            expected: T::SIZE,
            from_offset: start_offset,
        });
    };

    T::from_le(slice)
}

/// Writes a value of type `T` into `bytes` starting at `start_offset`, in
/// little-endian byte order.
///
/// Returns `BinaryError::BytesSliceSizeMismatch` if the slice does not
/// contain `T::SIZE` bytes from `start_offset`.
pub fn write_le<T: LittleEndianInteger>(
    bytes: &mut [u8],
    start_offset: usize,
    value: T,
) -> Result<(), BinaryError> {
    let Some(slice) = bytes.get_mut(start_offset..start_offset + T::SIZE) else {
        return Err(BinaryError::BytesSliceSizeMismatch {
            expected: T::SIZE,
            from_offset: start_offset,
        });
    };

    value.to_le(slice)
}

#[cfg(test)]
mod write_le_tests {
    use crate::bin_error::BinaryError;
    use crate::le::write_le;

    #[test]
    fn write_le_i32_at_offset() {
        let mut buf = [0u8; 8];
        write_le::<i32>(&mut buf, 2, 23).unwrap();
        assert_eq!(&buf[2..6], &[23u8, 0, 0, 0]);
    }

    #[test]
    fn write_le_negative_i32_sign_extends() {
        let mut buf = [0u8; 4];
        write_le::<i32>(&mut buf, 0, -1).unwrap();
        assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn write_le_u32() {
        let mut buf = [0u8; 8];
        write_le::<u32>(&mut buf, 4, 0x11223344).unwrap();
        assert_eq!(&buf[4..8], &0x11223344u32.to_le_bytes());
    }

    #[test]
    fn write_le_out_of_bounds() {
        let mut buf = [0u8; 3];
        let err = write_le::<i32>(&mut buf, 0, 1).unwrap_err();
        match err {
            BinaryError::BytesSliceSizeMismatch {
                expected,
                from_offset,
            } => {
                assert_eq!(expected, 4);
                assert_eq!(from_offset, 0);
            }
            _ => panic!("unexpected error variant: {:?}", err),
        }
    }
}

#[cfg(test)]
mod read_le_tests {
    use super::*;
    use crate::bin_error::BinaryError;

    #[test]
    fn read_le_i32() {
        let bytes = [0x17, 0x00, 0x00, 0x00];
        assert_eq!(read_le::<i32>(&bytes, 0).unwrap(), 23);
    }

    #[test]
    fn read_le_i32_negative_one() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(read_le::<i32>(&bytes, 0).unwrap(), -1);
    }

    #[test]
    fn read_le_i32_larger_array() {
        let bytes = [0x00, 0x00, 0x00, 0x00, 0x17, 0x00, 0x00, 0x00];
        assert_eq!(read_le::<i32>(&bytes, 4).unwrap(), 23);
    }

    #[test]
    fn read_le_u32() {
        let bytes = 0xDEADBEEFu32.to_le_bytes();
        assert_eq!(read_le::<u32>(&bytes, 0).unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn read_le_out_of_bounds() {
        let bytes = [0u8; 3];
        let err = read_le::<i32>(&bytes, 0).unwrap_err();
        match err {
            BinaryError::BytesSliceSizeMismatch {
                expected,
                from_offset,
            } => {
                assert_eq!(expected, 4);
                assert_eq!(from_offset, 0);
            }
            _ => panic!("unexpected error variant: {:?}", err),
        }
    }

    #[test]
    fn read_le_start_offset_out_of_bounds() {
        // 5 bytes total, reading i32 at offset 3 requires bytes 3..7.
        let bytes = [0u8; 5];
        let err = read_le::<i32>(&bytes, 3).unwrap_err();
        match err {
            BinaryError::BytesSliceSizeMismatch {
                expected,
                from_offset,
            } => {
                assert_eq!(expected, 4);
                assert_eq!(from_offset, 3);
            }
            _ => panic!("unexpected error variant: {:?}", err),
        }
    }

    #[test]
    fn round_trip_i32_extremes() {
        let mut buf = [0u8; 8];
        for value in [i32::MIN, -1, 0, 1, i32::MAX] {
            write_le::<i32>(&mut buf, 4, value).unwrap();
            assert_eq!(read_le::<i32>(&buf, 4).unwrap(), value);
        }
    }
}
