use crate::capture::decode::{DetectingDecoder, TextDecoder};
use crate::commands::{CueCommand, OutputOptions, WavCommand};
use crate::cue::{CueParser, ParseData, WavParser};
use crate::error::{Cue2TocError, Cue2TocResult};
use crate::wav::lookup::{FileLookup, WavFileCache};
use crate::wav::offset::WavOffsetWriter;
use indicatif::MultiProgress;
use log::{debug, info};
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::fs;

fn working_dir(options: &OutputOptions, input: Option<&Path>) -> PathBuf {
    if let Some(dir) = &options.dir {
        return dir.clone();
    }

    input
        .and_then(|path| path.parent())
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn read_cue(input: Option<&Path>) -> Cue2TocResult<String> {
    let bytes = match input {
        Some(path) => {
            debug!("Reading CUE file: {path:?}");
            fs::read(path).await?
        }
        None => {
            debug!("Reading CUE data from stdin");
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            bytes
        }
    };

    Ok(DetectingDecoder.decode(&bytes))
}

async fn write_toc(lines: &[String], output: Option<&Path>, force: bool) -> Cue2TocResult<()> {
    let mut text = lines.join("\n");
    text.push('\n');

    match output {
        Some(path) => {
            if fs::try_exists(path).await? && !force {
                return Err(Cue2TocError::OutputFileAlreadyExists(path.to_path_buf()));
            }
            fs::write(path, text).await?;
            info!("Wrote TOC file: {path:?}");
        }
        None => print!("{text}"),
    }

    Ok(())
}

async fn finish(parsed: ParseData, options: &OutputOptions, pb: MultiProgress) -> anyhow::Result<()> {
    let parsed = match options.offset {
        Some(samples) => {
            let writer = WavOffsetWriter::new(pb);
            parsed
                .with_wav_offset(&writer, samples, options.use_temp)
                .await?
        }
        None => parsed,
    };

    write_toc(&parsed.to_toc(), options.output.as_deref(), options.force).await?;

    Ok(())
}

pub async fn convert_cue(cmd: CueCommand, pb: MultiProgress) -> anyhow::Result<()> {
    let input = cmd.input.as_deref().filter(|path| *path != Path::new("-"));
    let dir = working_dir(&cmd.options, input);

    debug!("Using working directory: {dir:?}");

    let cue = read_cue(input).await?;
    let parsed = CueParser::new(&dir, !cmd.options.allow_missing_wav).parse(cue.lines())?;

    info!(
        "Parsed {} tracks from {} files",
        parsed.tracks().len(),
        parsed.files().len()
    );
    if parsed.disc().is_multisession {
        info!("Disc has a data track, writing a multisession TOC");
    }

    finish(parsed, &cmd.options, pb).await
}

pub async fn convert_wav(cmd: WavCommand, pb: MultiProgress) -> anyhow::Result<()> {
    let dir = working_dir(&cmd.options, None);
    let lookup = FileLookup::new(WavFileCache::new(&dir), !cmd.options.allow_missing_wav);
    let parsed = WavParser::new(lookup).parse(&cmd.files)?;

    finish(parsed, &cmd.options, pb).await
}
