//! Sprite area walker.
//!
//! Validates the area header and follows the chain of next-sprite offsets,
//! slicing out one [`RawRecord`] per sprite. Pixel data is not interpreted
//! here.

use log::{debug, trace};
use nom::{
    bytes::complete::take,
    combinator::map,
    number::complete::{le_i32, le_u32},
    IResult as _IResult, Parser,
};

use crate::error::ArchiveError;

use super::{AREA_BIAS, AREA_HEADER_LEN, RECORD_HEADER_LEN};

type IResult<'a, T> = _IResult<&'a [u8], T>;

/// Length of the NUL-padded name field.
const NAME_LEN: usize = 12;

/// The three header words stored at the start of a sprite file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaHeader {
    pub sprite_count: u32,
    /// Area-relative offset of the first sprite.
    pub first_offset: u32,
    /// Area-relative offset of the first free word.
    pub free_offset: u32,
}

/// One sprite's bytes and sub-header, before pixel interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub name: String,
    /// File offset of the record start.
    pub offset: usize,
    /// Signed offset from this record to the next.
    pub next: i32,
    /// Row width in words, minus one.
    pub width_words: u32,
    /// Height in rows, minus one.
    pub height_rows: u32,
    /// Unused bits at the left of each row.
    pub first_bit: u32,
    /// Last used bit in the final word of each row.
    pub last_bit: u32,
    /// Offset of the image from the record start.
    pub image_offset: u32,
    /// Offset of the mask from the record start; equal to the image offset
    /// when there is no mask.
    pub mask_offset: u32,
    pub mode: u32,
    /// The whole record, header included.
    pub data: &'a [u8],
}

impl<'a> RawRecord<'a> {
    /// Parse a standalone record whose header starts at `data[0]`.
    ///
    /// Returns `None` if `data` is shorter than a record header.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        parse_record(data, 0)
    }

    /// Declared row width in words.
    pub fn declared_width(&self) -> u64 {
        self.width_words as u64 + 1
    }

    /// Declared height in rows.
    pub fn declared_height(&self) -> u64 {
        self.height_rows as u64 + 1
    }

    pub fn mode_code(&self) -> u32 {
        self.mode
    }

    pub fn has_mask(&self) -> bool {
        self.mask_offset != self.image_offset
    }
}

/// Result of following the record chain.
///
/// `stop` is set when the walk ended before the declared count; `records`
/// still holds everything recovered up to that point.
#[derive(Debug)]
pub struct RecordWalk<'a> {
    pub declared: usize,
    pub records: Vec<RawRecord<'a>>,
    pub stop: Option<ArchiveError>,
}

impl<'a> RecordWalk<'a> {
    /// Whether every declared record was recovered.
    pub fn is_complete(&self) -> bool {
        self.stop.is_none()
    }

    /// Reject incomplete walks.
    pub fn into_result(self) -> Result<Vec<RawRecord<'a>>, ArchiveError> {
        match self.stop {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }
}

fn parse_area_header(i: &[u8]) -> IResult<'_, AreaHeader> {
    map(
        (le_u32, le_u32, le_u32),
        |(sprite_count, first_offset, free_offset)| AreaHeader {
            sprite_count,
            first_offset,
            free_offset,
        },
    )
    .parse(i)
}

/// Peek the signed next-sprite offset at the start of a record.
fn parse_next(i: &[u8]) -> IResult<'_, i32> {
    le_i32(i)
}

fn parse_name(i: &[u8]) -> IResult<'_, String> {
    map(take(NAME_LEN), |raw: &[u8]| {
        // Names are Latin-1, NUL terminated unless all twelve bytes are used
        raw.iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect()
    })
    .parse(i)
}

#[allow(clippy::type_complexity)]
fn parse_record_header(i: &[u8]) -> IResult<'_, (i32, String, [u32; 7])> {
    map(
        (
            le_i32,
            parse_name,
            (le_u32, le_u32, le_u32, le_u32, le_u32, le_u32, le_u32),
        ),
        |(next, name, (a, b, c, d, e, f, g))| (next, name, [a, b, c, d, e, f, g]),
    )
    .parse(i)
}

fn parse_record(data: &[u8], offset: usize) -> Option<RawRecord<'_>> {
    let (_, (next, name, words)) = parse_record_header(data).ok()?;
    let [width_words, height_rows, first_bit, last_bit, image_offset, mask_offset, mode] = words;

    Some(RawRecord {
        name,
        offset,
        next,
        width_words,
        height_rows,
        first_bit,
        last_bit,
        image_offset,
        mask_offset,
        mode,
        data,
    })
}

/// Read just the area header.
pub fn read_area_header(bytes: &[u8]) -> Result<AreaHeader, ArchiveError> {
    if bytes.len() < AREA_HEADER_LEN {
        return Err(ArchiveError::TruncatedHeader { len: bytes.len() });
    }
    parse_area_header(bytes)
        .map(|(_, header)| header)
        .map_err(|_| ArchiveError::TruncatedHeader { len: bytes.len() })
}

/// Validate the area header and walk the record chain.
///
/// Header problems are returned as `Err`; problems found part-way through
/// the chain end the walk and are reported in [`RecordWalk::stop`].
pub fn walk_records(bytes: &[u8]) -> Result<RecordWalk<'_>, ArchiveError> {
    let header = read_area_header(bytes)?;
    let declared = header.sprite_count as usize;

    let room = (bytes.len() - AREA_HEADER_LEN) / RECORD_HEADER_LEN;
    if declared > room {
        return Err(ArchiveError::CorruptHeader {
            message: format!(
                "{} sprites declared but only {} bytes follow the header",
                declared,
                bytes.len() - AREA_HEADER_LEN
            ),
        });
    }

    let first = (header.first_offset as usize)
        .checked_sub(AREA_BIAS)
        .filter(|&first| first >= AREA_HEADER_LEN)
        .ok_or_else(|| ArchiveError::CorruptHeader {
            message: format!(
                "first sprite offset {:#x} points into the header",
                header.first_offset
            ),
        })?;

    if header.free_offset < header.first_offset {
        return Err(ArchiveError::CorruptHeader {
            message: format!(
                "free space offset {:#x} is before the first sprite at {:#x}",
                header.free_offset, header.first_offset
            ),
        });
    }

    let end = header.free_offset as usize - AREA_BIAS;
    if end > bytes.len() {
        return Err(ArchiveError::TruncatedBody {
            end,
            len: bytes.len(),
        });
    }

    debug!(
        "sprite area: {} sprites, records at {:#x}..{:#x}",
        declared, first, end
    );

    let mut records = Vec::with_capacity(declared);
    let mut cursor = first;
    let incomplete = |recovered| ArchiveError::IncompleteArchive {
        declared,
        recovered,
    };

    for index in 0..declared {
        if cursor + RECORD_HEADER_LEN > end {
            trace!("no room for sprite {} header at {:#x}", index, cursor);
            return Ok(RecordWalk {
                declared,
                stop: Some(incomplete(records.len())),
                records,
            });
        }

        let (_, next) = parse_next(&bytes[cursor..end]).map_err(|_| {
            ArchiveError::CorruptHeader {
                message: format!(
                    "unreadable next offset for sprite {} at {:#x}",
                    index, cursor
                ),
            }
        })?;

        if next <= 0 {
            return Ok(RecordWalk {
                declared,
                stop: Some(ArchiveError::CircularOrNonMonotonicOffsets {
                    index,
                    offset: cursor,
                    next,
                }),
                records,
            });
        }

        let len = next as usize;
        if len < RECORD_HEADER_LEN {
            return Ok(RecordWalk {
                declared,
                stop: Some(ArchiveError::CorruptHeader {
                    message: format!(
                        "sprite {} at {:#x} is {} bytes, shorter than its header",
                        index, cursor, len
                    ),
                }),
                records,
            });
        }

        if cursor.saturating_add(len) > end {
            trace!(
                "sprite {} at {:#x} runs {} bytes past the area end",
                index,
                cursor,
                cursor.saturating_add(len) - end
            );
            return Ok(RecordWalk {
                declared,
                stop: Some(incomplete(records.len())),
                records,
            });
        }

        let record = parse_record(&bytes[cursor..cursor + len], cursor).ok_or_else(|| {
            ArchiveError::CorruptHeader {
                message: format!("unreadable header for sprite {} at {:#x}", index, cursor),
            }
        })?;

        debug!(
            "sprite {} {:?} at {:#x}: {} bytes, mode {:#x}",
            index, record.name, cursor, len, record.mode
        );

        records.push(record);
        cursor += len;
    }

    Ok(RecordWalk {
        declared,
        records,
        stop: None,
    })
}

/// Walk the record chain, rejecting anything short of the declared count.
pub fn read_records(bytes: &[u8]) -> Result<Vec<RawRecord<'_>>, ArchiveError> {
    walk_records(bytes)?.into_result()
}
