//! Row geometry and sample extraction for packed pixel planes.

use crate::archive::RawRecord;
use crate::error::DecodeError;
use crate::types::MaskFormat;

/// How one plane (image or mask) is laid out in memory.
///
/// Rows are `stride` bytes apart; pixel `x` of a row begins at bit
/// `first_bit + x * bpp`, counted from the least significant bit of the
/// first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlaneLayout {
    pub width: u32,
    pub height: u32,
    pub bpp: u32,
    pub first_bit: u32,
    pub stride: usize,
}

impl PlaneLayout {
    /// Work out the image plane geometry from a record's header.
    pub fn image(record: &RawRecord<'_>, bpp: u32) -> Result<Self, DecodeError> {
        if record.first_bit > 31 || record.last_bit > 31 {
            return Err(DecodeError::layout(format!(
                "row wastage bits out of range (first {}, last {})",
                record.first_bit, record.last_bit
            )));
        }
        if record.first_bit % bpp != 0 || (record.last_bit + 1) % bpp != 0 {
            return Err(DecodeError::layout(format!(
                "row wastage (first {}, last {}) does not align to {}bpp pixels",
                record.first_bit, record.last_bit, bpp
            )));
        }

        let words = record.declared_width();
        let used_bits =
            (words * 32) as i64 - record.first_bit as i64 - (31 - record.last_bit) as i64;
        if used_bits <= 0 {
            return Err(DecodeError::layout("rows contain no pixels"));
        }

        let width = u32::try_from(used_bits as u64 / bpp as u64)
            .map_err(|_| DecodeError::layout("sprite is too wide"))?;
        let height = u32::try_from(record.declared_height())
            .map_err(|_| DecodeError::layout("sprite is too tall"))?;
        let stride = usize::try_from(words * 4)
            .map_err(|_| DecodeError::layout("sprite is too wide"))?;

        Ok(Self {
            width,
            height,
            bpp,
            first_bit: record.first_bit,
            stride,
        })
    }

    /// Geometry of the mask plane that goes with this image.
    pub fn mask(&self, format: MaskFormat) -> Self {
        let padded = |bpp: u32| {
            let bits = self.width as usize * bpp as usize;
            bits.div_ceil(32) * 4
        };

        match format {
            MaskFormat::Matching => *self,
            MaskFormat::Bit => Self {
                bpp: 1,
                first_bit: 0,
                stride: padded(1),
                ..*self
            },
            MaskFormat::Alpha8 => Self {
                bpp: 8,
                first_bit: 0,
                stride: padded(8),
                ..*self
            },
        }
    }

    /// Bytes spanned by the plane, or `None` on overflow.
    pub fn byte_len(&self) -> Option<usize> {
        self.stride.checked_mul(self.height as usize)
    }

    /// Read the sample for pixel (x, y) from a plane at least
    /// [`byte_len`](Self::byte_len) bytes long.
    pub fn sample(&self, plane: &[u8], x: u32, y: u32) -> u32 {
        let bit = self.first_bit as usize + x as usize * self.bpp as usize;
        let at = y as usize * self.stride + bit / 8;

        match self.bpp {
            8 => plane[at] as u32,
            16 => u16::from_le_bytes([plane[at], plane[at + 1]]) as u32,
            32 => u32::from_le_bytes([plane[at], plane[at + 1], plane[at + 2], plane[at + 3]]),
            bpp => (plane[at] as u32 >> (bit % 8)) & ((1 << bpp) - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pack_rows, RecordBuilder, MODE_12};

    fn layout(width: u32, height: u32, bpp: u32, first_bit: u32) -> PlaneLayout {
        let bytes = RecordBuilder::new(
            "t",
            MODE_12,
            bpp,
            width,
            height,
            &vec![0; (width * height) as usize],
        )
        .first_bit(first_bit)
        .build();
        let record = RawRecord::parse(&bytes).unwrap();
        PlaneLayout::image(&record, bpp).unwrap()
    }

    #[test]
    fn test_image_geometry() {
        let l = layout(3, 2, 4, 0);
        assert_eq!((l.width, l.height, l.stride), (3, 2, 4));

        let l = layout(9, 1, 4, 0);
        assert_eq!((l.width, l.stride), (9, 8));

        let l = layout(5, 1, 4, 8);
        assert_eq!((l.width, l.first_bit, l.stride), (5, 8, 4));
    }

    #[test]
    fn test_sample_nibbles_low_first() {
        let l = layout(3, 1, 4, 0);
        let plane = pack_rows(&[0x1, 0xA, 0xF], 3, 1, 4, 0);
        assert_eq!(plane[0], 0xA1);
        assert_eq!(l.sample(&plane, 0, 0), 0x1);
        assert_eq!(l.sample(&plane, 1, 0), 0xA);
        assert_eq!(l.sample(&plane, 2, 0), 0xF);
    }

    #[test]
    fn test_sample_respects_first_bit() {
        let l = layout(2, 2, 4, 8);
        let plane = pack_rows(&[1, 2, 3, 4], 2, 2, 4, 8);
        assert_eq!(l.sample(&plane, 0, 0), 1);
        assert_eq!(l.sample(&plane, 1, 1), 4);
    }

    #[test]
    fn test_mask_layouts() {
        let image = layout(40, 2, 8, 0);
        assert_eq!(image.stride, 40);

        let bit = image.mask(MaskFormat::Bit);
        assert_eq!((bit.bpp, bit.stride), (1, 8));

        let alpha = image.mask(MaskFormat::Alpha8);
        assert_eq!((alpha.bpp, alpha.stride), (8, 40));

        assert_eq!(image.mask(MaskFormat::Matching), image);
    }

    #[test]
    fn test_misaligned_wastage_rejected() {
        let mut bytes = RecordBuilder::new("t", MODE_12, 4, 2, 1, &[0, 0]).build();
        // first bit 2 is not a 4bpp boundary
        bytes[24..28].copy_from_slice(&2u32.to_le_bytes());
        let record = RawRecord::parse(&bytes).unwrap();
        assert!(matches!(
            PlaneLayout::image(&record, 4),
            Err(DecodeError::BadLayout { .. })
        ));
    }

    #[test]
    fn test_empty_rows_rejected() {
        let mut bytes = RecordBuilder::new("t", MODE_12, 4, 2, 1, &[0, 0]).build();
        bytes[24..28].copy_from_slice(&16u32.to_le_bytes());
        bytes[28..32].copy_from_slice(&7u32.to_le_bytes());
        let record = RawRecord::parse(&bytes).unwrap();
        assert!(PlaneLayout::image(&record, 4).is_err());
    }
}
