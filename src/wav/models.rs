use binrw::{BinRead, BinWrite};

pub const RIFF_HEADER_SIZE: u64 = 12;
pub const CHUNK_HEADER_SIZE: u64 = 8;
pub const FMT_CHUNK_SIZE: u32 = 16;
pub const WAVE_FORM: [u8; 4] = *b"WAVE";
pub const FMT_CHUNK_ID: [u8; 4] = *b"fmt ";
pub const DATA_CHUNK_ID: [u8; 4] = *b"data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little, magic = b"RIFF")]
pub struct RiffHeader {
    pub size: u32,
    pub form: [u8; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ChunkHeader {
    pub id: [u8; 4],
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct FmtChunk {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FmtChunk {
    /// 16 bit stereo PCM at 44.1 kHz
    pub fn cd_audio() -> Self {
        Self {
            format_tag: 1,
            channels: 2,
            sample_rate: 44_100,
            byte_rate: 44_100 * 4,
            block_align: 4,
            bits_per_sample: 16,
        }
    }
}

/// 44 byte header of a canonical PCM WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct WavHeader {
    pub riff: RiffHeader,
    pub fmt_header: ChunkHeader,
    pub fmt: FmtChunk,
    pub data_header: ChunkHeader,
}

impl WavHeader {
    pub fn new(fmt: FmtChunk, data_len: u32) -> Self {
        Self {
            riff: RiffHeader {
                size: 4 + (CHUNK_HEADER_SIZE as u32 + FMT_CHUNK_SIZE)
                    + (CHUNK_HEADER_SIZE as u32 + data_len),
                form: WAVE_FORM,
            },
            fmt_header: ChunkHeader {
                id: FMT_CHUNK_ID,
                size: FMT_CHUNK_SIZE,
            },
            fmt,
            data_header: ChunkHeader {
                id: DATA_CHUNK_ID,
                size: data_len,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn canonical_header_is_44_bytes() {
        let header = WavHeader::new(FmtChunk::cd_audio(), 400);
        let mut buf = Cursor::new(Vec::new());
        header.write(&mut buf).unwrap();

        let bytes = buf.into_inner();
        assert_eq!(bytes.len(), 44);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 436);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 400);
    }

    #[test]
    fn header_reads_back() {
        let header = WavHeader::new(FmtChunk::cd_audio(), 8);
        let mut buf = Cursor::new(Vec::new());
        header.write(&mut buf).unwrap();
        buf.set_position(0);

        assert_eq!(WavHeader::read(&mut buf).unwrap(), header);
    }
}
