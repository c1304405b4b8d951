//! Builders for synthetic sprite files.
//!
//! Self-contained so it can be shared by unit tests, integration tests and
//! benches.

#![allow(dead_code)]

pub const AREA_HEADER_LEN: usize = 12;
pub const RECORD_HEADER_LEN: usize = 44;

/// New-format 8bpp mode word at 90 dpi.
pub const MODE_8BPP_NEW: u32 = 4 << 27 | 90 << 14 | 90 << 1 | 1;
/// New-format 32bpp mode word at 90 dpi.
pub const MODE_32BPP_NEW: u32 = 6 << 27 | 90 << 14 | 90 << 1 | 1;
/// New-format 16bpp 1:5:5:5 mode word at 90 dpi.
pub const MODE_15BPP_NEW: u32 = 5 << 27 | 90 << 14 | 90 << 1 | 1;
/// New-format 16bpp 5:6:5 mode word at 90 dpi.
pub const MODE_16BPP_565: u32 = 10 << 27 | 90 << 14 | 90 << 1 | 1;
/// New-format 4bpp mode word at 90 dpi.
pub const MODE_4BPP_NEW: u32 = 3 << 27 | 90 << 14 | 90 << 1 | 1;
/// New-format 1bpp mode word at 90 dpi.
pub const MODE_1BPP_NEW: u32 = 1 << 27 | 90 << 14 | 90 << 1 | 1;
/// Old screen mode 28: 8bpp.
pub const MODE_28: u32 = 28;
/// Old screen mode 12: 4bpp.
pub const MODE_12: u32 = 12;
/// Old screen mode 8: 2bpp.
pub const MODE_8: u32 = 8;

/// Pack per-pixel values into word-aligned rows, leftmost pixel in the
/// least significant bits.
pub fn pack_rows(values: &[u32], width: u32, height: u32, bpp: u32, first_bit: u32) -> Vec<u8> {
    assert_eq!(values.len(), (width * height) as usize, "pixel count");
    let words = (first_bit + width * bpp).div_ceil(32);
    let stride = (words * 4) as usize;
    let mut out = vec![0u8; stride * height as usize];

    for y in 0..height {
        let row = &mut out[y as usize * stride..(y as usize + 1) * stride];
        for x in 0..width {
            let v = values[(y * width + x) as usize] as u64;
            let bit = (first_bit + x * bpp) as usize;
            // Write up to 32 bits, byte by byte
            let mut shifted = v << (bit % 8);
            let mut byte = bit / 8;
            let mut remaining = bpp as usize + bit % 8;
            while remaining > 0 {
                row[byte] |= (shifted & 0xFF) as u8;
                shifted >>= 8;
                byte += 1;
                remaining = remaining.saturating_sub(8);
            }
        }
    }
    out
}

/// One sprite record under construction.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    name: String,
    mode: u32,
    bpp: u32,
    width: u32,
    height: u32,
    first_bit: u32,
    values: Vec<u32>,
    palette: Vec<[u8; 3]>,
    mask: Option<(Vec<u32>, u32, u32)>,
    trim: usize,
}

impl RecordBuilder {
    pub fn new(name: &str, mode: u32, bpp: u32, width: u32, height: u32, values: &[u32]) -> Self {
        Self {
            name: name.to_string(),
            mode,
            bpp,
            width,
            height,
            first_bit: 0,
            values: values.to_vec(),
            palette: Vec::new(),
            mask: None,
            trim: 0,
        }
    }

    /// Old-format 8bpp sprite (screen mode 28).
    pub fn indexed8(name: &str, width: u32, height: u32, indices: &[u8]) -> Self {
        let values: Vec<u32> = indices.iter().map(|&i| i as u32).collect();
        Self::new(name, MODE_28, 8, width, height, &values)
    }

    pub fn palette(mut self, colours: &[[u8; 3]]) -> Self {
        self.palette = colours.to_vec();
        self
    }

    pub fn first_bit(mut self, first_bit: u32) -> Self {
        self.first_bit = first_bit;
        self
    }

    /// New-format 1bpp mask.
    pub fn mask_bits(mut self, bits: &[u32]) -> Self {
        self.mask = Some((bits.to_vec(), 1, 0));
        self
    }

    /// Old-format mask using the image depth and wastage.
    pub fn mask_matching(mut self, values: &[u32]) -> Self {
        self.mask = Some((values.to_vec(), self.bpp, self.first_bit));
        self
    }

    /// 8-bit alpha mask.
    pub fn mask_alpha(mut self, alpha: &[u32]) -> Self {
        self.mask = Some((alpha.to_vec(), 8, 0));
        self
    }

    /// Drop bytes from the end of the finished record.
    pub fn trim(mut self, bytes: usize) -> Self {
        self.trim = bytes;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let image = pack_rows(
            &self.values,
            self.width,
            self.height,
            self.bpp,
            self.first_bit,
        );
        let mask = self.mask.as_ref().map(|(values, bpp, first_bit)| {
            pack_rows(values, self.width, self.height, *bpp, *first_bit)
        });

        let used_bits = self.first_bit + self.width * self.bpp;
        let width_words = used_bits.div_ceil(32) - 1;
        let last_bit = (used_bits - 1) % 32;

        let image_offset = (RECORD_HEADER_LEN + self.palette.len() * 8) as u32;
        let mask_offset = match &mask {
            Some(_) => image_offset + image.len() as u32,
            None => image_offset,
        };
        let total = image_offset as usize + image.len() + mask.as_ref().map_or(0, |m| m.len());

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&(total as i32).to_le_bytes());

        let mut name = [0u8; 12];
        for (slot, b) in name.iter_mut().zip(self.name.bytes()) {
            *slot = b;
        }
        out.extend_from_slice(&name);

        for word in [
            width_words,
            self.height - 1,
            self.first_bit,
            last_bit,
            image_offset,
            mask_offset,
            self.mode,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }

        for [r, g, b] in &self.palette {
            let word = (*r as u32) << 8 | (*g as u32) << 16 | (*b as u32) << 24;
            out.extend_from_slice(&word.to_le_bytes());
            out.extend_from_slice(&word.to_le_bytes());
        }

        out.extend_from_slice(&image);
        if let Some(mask) = mask {
            out.extend_from_slice(&mask);
        }

        out.truncate(out.len() - self.trim);
        out
    }
}

/// A whole sprite file under construction.
#[derive(Debug, Clone, Default)]
pub struct AreaBuilder {
    records: Vec<Vec<u8>>,
}

impl AreaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mut self, record: RecordBuilder) -> Self {
        self.records.push(record.build());
        self
    }

    pub fn raw_record(mut self, bytes: Vec<u8>) -> Self {
        self.records.push(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let body: usize = self.records.iter().map(Vec::len).sum();
        let first = (AREA_HEADER_LEN + 4) as u32;
        let free = first + body as u32;

        let mut out = Vec::with_capacity(AREA_HEADER_LEN + body);
        out.extend_from_slice(&(self.records.len() as u32).to_le_bytes());
        out.extend_from_slice(&first.to_le_bytes());
        out.extend_from_slice(&free.to_le_bytes());
        for record in &self.records {
            out.extend_from_slice(record);
        }
        out
    }
}

/// The four-colour palette used across tests: black, white, red, green.
pub const BWRG: [[u8; 3]; 4] = [[0, 0, 0], [255, 255, 255], [255, 0, 0], [0, 255, 0]];
