use binary_helpers::bin_error::BinaryError;
use binary_helpers::le::{read_le, write_le};
use paste::paste;

/// Size in bytes of the fixed page header: seven little-endian `i32`s.
pub const HEADER_SIZE: usize = 28;

/// Immutable view into the header of a record page.
#[derive(Debug)]
pub(crate) struct HeaderRef<'a> {
    bytes: &'a [u8; HEADER_SIZE],
}

impl<'a> HeaderRef<'a> {
    /// Creates a `HeaderRef` over the first `HEADER_SIZE` bytes of `bytes`,
    /// or `None` if the slice is shorter than a header.
    pub(crate) fn new(bytes: &'a [u8]) -> Option<Self> {
        let prefix = bytes.get(..HEADER_SIZE)?;
        Some(Self {
            bytes: prefix.try_into().ok()?,
        })
    }
}

/// Mutable view into the header of a record page.
#[derive(Debug)]
pub(crate) struct HeaderMut<'a> {
    bytes: &'a mut [u8; HEADER_SIZE],
}

impl<'a> HeaderMut<'a> {
    /// Creates a `HeaderMut` over the first `HEADER_SIZE` bytes of `bytes`,
    /// or `None` if the slice is shorter than a header.
    pub(crate) fn new(bytes: &'a mut [u8]) -> Option<Self> {
        let prefix = bytes.get_mut(..HEADER_SIZE)?;
        Some(Self {
            bytes: prefix.try_into().ok()?,
        })
    }
}

/// Defines header field constants and getter/setter methods.
///
/// Pattern: `field_id(identifier) : field_type(type) = field_offset(usize)`
macro_rules! impl_header_accessors {
    ( $( $field_name:ident : $field_type:ty = $field_offset:expr ; )* ) => {
        paste! {
            $(
                #[doc = concat!("Byte offset of the `", stringify!($field_name), "` header field.")]
                pub const [<$field_name:upper>] : usize = $field_offset;

                impl<'a> HeaderRef<'a> {
                    #[doc = concat!(
                        "Getter for field `", stringify!($field_name), "`.\n",
                        "Type: `", stringify!($field_type), "`.\n",
                        "Offset: ", stringify!($field_offset), "."
                    )]
                    pub(crate) fn [<get_ $field_name>](&self)
                        -> Result<$field_type, BinaryError>
                    {
                        read_le::<$field_type>(self.bytes, $field_offset)
                    }
                }

                impl<'a> HeaderMut<'a> {
                    #[doc = concat!(
                        "Setter for field `", stringify!($field_name), "`.\n",
                        "Type: `", stringify!($field_type), "`.\n",
                        "Offset: ", stringify!($field_offset), "."
                    )]
                    pub(crate) fn [<set_ $field_name>](&mut self, val: $field_type)
                        -> Result<(), BinaryError>
                    {
                        write_le::<$field_type>(self.bytes, $field_offset, val)
                    }
                }
            )*
        }
    };
}

impl_header_accessors! {
    record_num          : i32 = 0;
    record_capacity     : i32 = 4;
    record_real_size    : i32 = 8;
    record_size         : i32 = 12;
    first_record_offset : i32 = 16;
    has_next            : i32 = 20;
    next_page_num       : i32 = 24;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_ref_requires_enough_bytes() {
        let short = [0u8; HEADER_SIZE - 1];
        assert!(HeaderRef::new(&short).is_none());

        let exact = [0u8; HEADER_SIZE];
        assert!(HeaderRef::new(&exact).is_some());

        // A full page works too; the view covers only the header prefix.
        let page = [0u8; 256];
        assert!(HeaderRef::new(&page).is_some());
    }

    #[test]
    fn fields_round_trip_at_their_offsets() {
        let mut bytes = [0u8; HEADER_SIZE];
        {
            let mut header = HeaderMut::new(&mut bytes).unwrap();
            header.set_record_num(3).unwrap();
            header.set_record_capacity(16).unwrap();
            header.set_record_real_size(500).unwrap();
            header.set_record_size(504).unwrap();
            header.set_first_record_offset(32).unwrap();
            header.set_has_next(1).unwrap();
            header.set_next_page_num(-1).unwrap();
        }

        let header = HeaderRef::new(&bytes).unwrap();
        assert_eq!(header.get_record_num().unwrap(), 3);
        assert_eq!(header.get_record_capacity().unwrap(), 16);
        assert_eq!(header.get_record_real_size().unwrap(), 500);
        assert_eq!(header.get_record_size().unwrap(), 504);
        assert_eq!(header.get_first_record_offset().unwrap(), 32);
        assert_eq!(header.get_has_next().unwrap(), 1);
        assert_eq!(header.get_next_page_num().unwrap(), -1);
    }

    #[test]
    fn fields_are_little_endian_on_the_wire() {
        let mut bytes = [0u8; HEADER_SIZE];
        {
            let mut header = HeaderMut::new(&mut bytes).unwrap();
            header.set_record_capacity(0x01020304).unwrap();
        }
        assert_eq!(
            &bytes[RECORD_CAPACITY..RECORD_CAPACITY + 4],
            &[0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn field_offsets_pack_the_header_without_gaps() {
        assert_eq!(RECORD_NUM, 0);
        assert_eq!(RECORD_CAPACITY, 4);
        assert_eq!(RECORD_REAL_SIZE, 8);
        assert_eq!(RECORD_SIZE, 12);
        assert_eq!(FIRST_RECORD_OFFSET, 16);
        assert_eq!(HAS_NEXT, 20);
        assert_eq!(NEXT_PAGE_NUM, 24);
        assert_eq!(HEADER_SIZE, 28);
    }
}
