//! Conversion between host and little-endian byte order.

/// In-place byte order conversion for fixed-width unsigned integers.
///
/// Both methods are no-ops on little-endian hosts.
pub trait ByteOrder: Copy {
    /// Converts a value in host order to little-endian order.
    fn host_to_little(&mut self);

    /// Converts a value in little-endian order to host order.
    fn little_to_host(&mut self);
}

macro_rules! impl_byte_order {
    ($($Ty:ty)*) => { $(
        impl ByteOrder for $Ty {
            #[inline]
            fn host_to_little(&mut self) {
                *self = self.to_le();
            }

            #[inline]
            fn little_to_host(&mut self) {
                *self = <$Ty>::from_le(*self);
            }
        }
    )* };
}

impl_byte_order!(u16 u32 u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_memory_layout() {
        let mut x = 0x0102_0304u32;
        x.host_to_little();
        assert_eq!(x.to_ne_bytes(), [4, 3, 2, 1], "must be little-endian in memory");

        x.little_to_host();
        assert_eq!(x, 0x0102_0304, "must restore host order");
    }
}
