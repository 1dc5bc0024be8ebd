use crate::disc::AudioFile;
use crate::wav::error::{WavError, WavResult};
use crate::wav::models::{
    CHUNK_HEADER_SIZE, ChunkHeader, DATA_CHUNK_ID, FMT_CHUNK_ID, FmtChunk, RIFF_HEADER_SIZE,
    RiffHeader, WAVE_FORM, WavHeader,
};
use binrw::{BinRead, BinWrite};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info};
use std::collections::HashMap;
use std::future::Future;
use std::io::{Cursor, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufWriter};

const ZERO_BUFFER: [u8; 64 * 1024] = [0; 64 * 1024];

/// Shifts the audio of a set of files by a number of samples.
///
/// Returns a map from each file's as-written name to the corrected file.
pub trait OffsetCorrector {
    fn correct(
        &self,
        files: &[AudioFile],
        samples: i64,
        use_temp: bool,
    ) -> impl Future<Output = WavResult<HashMap<String, PathBuf>>>;
}

#[derive(Debug, Clone)]
struct WavInfo {
    path: PathBuf,
    fmt: FmtChunk,
    data_offset: u64,
    frames: u64,
}

async fn read_wav_info(path: &Path) -> WavResult<WavInfo> {
    let mut file = File::open(path).await?;

    let mut buf = [0u8; RIFF_HEADER_SIZE as usize];
    file.read_exact(&mut buf).await?;
    let riff = RiffHeader::read(&mut Cursor::new(&buf))
        .map_err(|_| WavError::NotAWaveFile(path.to_path_buf()))?;
    if riff.form != WAVE_FORM {
        return Err(WavError::NotAWaveFile(path.to_path_buf()));
    }

    let mut position = RIFF_HEADER_SIZE;
    let mut fmt = None;

    loop {
        let mut buf = [0u8; CHUNK_HEADER_SIZE as usize];
        if file.read_exact(&mut buf).await.is_err() {
            return Err(WavError::MissingChunk(path.to_path_buf()));
        }
        let chunk = ChunkHeader::read(&mut Cursor::new(&buf))?;
        position += CHUNK_HEADER_SIZE;

        // chunks are word aligned
        let padded_size = chunk.size as u64 + (chunk.size as u64 & 1);

        if chunk.id == DATA_CHUNK_ID {
            let fmt = fmt.ok_or_else(|| WavError::MissingChunk(path.to_path_buf()))?;
            return Ok(WavInfo {
                path: path.to_path_buf(),
                fmt,
                data_offset: position,
                frames: chunk.size as u64 / fmt.block_align.max(1) as u64,
            });
        }

        if chunk.id == FMT_CHUNK_ID {
            let mut body = vec![0u8; padded_size as usize];
            file.read_exact(&mut body).await?;
            fmt = Some(FmtChunk::read(&mut Cursor::new(&body))?);
        } else {
            file.seek(SeekFrom::Current(padded_size as i64)).await?;
        }

        position += padded_size;
    }
}

/// All input files laid end to end as one sample stream.
#[derive(Debug)]
struct StreamLayout {
    files: Vec<WavInfo>,
    starts: Vec<u64>,
    total_frames: u64,
    block_align: u64,
}

impl StreamLayout {
    fn new(files: Vec<WavInfo>) -> WavResult<Self> {
        let mut starts = Vec::with_capacity(files.len());
        let mut total_frames = 0;

        for info in &files {
            if info.fmt != files[0].fmt {
                return Err(WavError::MismatchedFormat(info.path.clone()));
            }
            starts.push(total_frames);
            total_frames += info.frames;
        }

        let block_align = files.first().map(|f| f.fmt.block_align as u64).unwrap_or(4);

        Ok(Self {
            files,
            starts,
            total_frames,
            block_align,
        })
    }

    /// Index of the file holding stream frame `frame`.
    fn file_at(&self, frame: u64) -> usize {
        self.starts.partition_point(|&start| start <= frame) - 1
    }
}

async fn write_shifted(
    layout: Arc<StreamLayout>,
    file_index: usize,
    shift: i64,
    output: PathBuf,
    progress: ProgressBar,
) -> WavResult<()> {
    let info = &layout.files[file_index];
    let align = layout.block_align;

    let file = File::create(&output).await?;
    let mut writer = BufWriter::with_capacity(8 * 1024 * 1024, file);

    let mut header = Cursor::new(Vec::new());
    WavHeader::new(info.fmt, (info.frames * align) as u32).write(&mut header)?;
    writer.write_all(header.get_ref()).await?;

    let mut frame = layout.starts[file_index] as i64 + shift;
    let mut remaining = info.frames;

    while remaining > 0 {
        let count = if frame < 0 || frame as u64 >= layout.total_frames {
            let count = if frame < 0 {
                remaining.min(frame.unsigned_abs())
            } else {
                remaining
            };

            let mut zeros = count * align;
            while zeros > 0 {
                let n = zeros.min(ZERO_BUFFER.len() as u64) as usize;
                writer.write_all(&ZERO_BUFFER[..n]).await?;
                zeros -= n as u64;
            }

            count
        } else {
            let source_index = layout.file_at(frame as u64);
            let source = &layout.files[source_index];
            let offset = frame as u64 - layout.starts[source_index];
            let count = remaining.min(source.frames - offset);

            let mut input = File::open(&source.path).await?;
            input
                .seek(SeekFrom::Start(source.data_offset + offset * align))
                .await?;
            let copied = tokio::io::copy(&mut input.take(count * align), &mut writer).await?;
            if copied != count * align {
                return Err(WavError::IoError(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("{:?} is shorter than its data chunk", source.path),
                )));
            }

            count
        };

        progress.inc(count * align);
        frame += count as i64;
        remaining -= count;
    }

    writer.flush().await?;

    debug!("Wrote shifted audio to {output:?}");

    Ok(())
}

/// Rewrites WAV files so their audio is shifted by a sample offset, treating
/// the files as one continuous stream.
pub struct WavOffsetWriter {
    progress: MultiProgress,
}

impl WavOffsetWriter {
    pub fn new(progress: MultiProgress) -> Self {
        Self { progress }
    }

    /// Names in the temp dir are prefixed with the file's position in the stream.
    fn output_path(input: &Path, file_index: usize, samples: i64, use_temp: bool) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        if use_temp {
            std::env::temp_dir().join(format!("{file_index:02}-{stem}.offset{samples}.wav"))
        } else {
            input
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("{stem}.offset{samples}.wav"))
        }
    }

    fn progress_bar(&self, total_bytes: u64) -> ProgressBar {
        let style = ProgressStyle::with_template(
            "processing WAV files: [{bar:40}] {bytes}/{total_bytes} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");

        self.progress
            .add(ProgressBar::new(total_bytes).with_style(style))
    }
}

impl OffsetCorrector for WavOffsetWriter {
    async fn correct(
        &self,
        files: &[AudioFile],
        samples: i64,
        use_temp: bool,
    ) -> WavResult<HashMap<String, PathBuf>> {
        if samples == 0 || files.is_empty() {
            return Ok(files
                .iter()
                .map(|file| (file.name.clone(), file.path.clone()))
                .collect());
        }

        let infos =
            futures::future::try_join_all(files.iter().map(|file| read_wav_info(&file.path)))
                .await?;
        let layout = Arc::new(StreamLayout::new(infos)?);

        info!(
            "Shifting {} WAV files by {samples} samples ({} frames total)",
            files.len(),
            layout.total_frames
        );

        let progress = self.progress_bar(layout.total_frames * layout.block_align);

        let mut file_map = HashMap::new();
        let mut handles = Vec::with_capacity(files.len());

        for (file_index, file) in files.iter().enumerate() {
            let output = Self::output_path(&file.path, file_index, samples, use_temp);
            file_map.insert(file.name.clone(), output.clone());

            handles.push(tokio::spawn(write_shifted(
                layout.clone(),
                file_index,
                samples,
                output,
                progress.clone(),
            )));
        }

        for result in futures::future::try_join_all(handles).await? {
            result?;
        }

        progress.finish_and_clear();

        Ok(file_map)
    }
}
