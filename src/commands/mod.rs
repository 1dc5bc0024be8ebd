use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI for converting CUE sheets and WAV files into cdrdao TOC files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print debug output
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Cue(CueCommand),
    Wav(WavCommand),
}

/// Converts a CUE sheet to a TOC file.
#[derive(Parser, Debug, Clone)]
pub struct CueCommand {
    /// CUE file to convert, reads stdin when omitted or "-"
    #[arg(value_name = "INPUT_CUE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub options: OutputOptions,
}

/// Builds a TOC file with one track per WAV file.
#[derive(Parser, Debug, Clone)]
pub struct WavCommand {
    /// WAV files in track order
    #[arg(value_name = "WAV", required = true)]
    pub files: Vec<String>,

    #[command(flatten)]
    pub options: OutputOptions,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputOptions {
    /// Directory used to find WAV files and EAC logs, defaults to the CUE file's directory
    #[arg(long, short = 'd', value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Use file names as written when a WAV file can not be found
    #[arg(long, short = 'a', default_value_t = false)]
    pub allow_missing_wav: bool,

    /// Output TOC file path, prints to stdout when omitted
    #[arg(long, short = 'o', value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Force overwrite of the output file if it already exists
    #[arg(long, short = 'f', default_value_t = false)]
    pub force: bool,

    /// Shift the WAV audio by this many samples to correct a write offset
    #[arg(long, short = 's', value_name = "SAMPLES", allow_hyphen_values = true)]
    pub offset: Option<i64>,

    /// Write offset corrected WAV files to the temp directory
    #[arg(long, short = 't', default_value_t = false)]
    pub use_temp: bool,
}
