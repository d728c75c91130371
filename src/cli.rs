use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "unarc")]
#[command(version)]
#[command(about = "Extract ZIP, TAR and gzip-compressed TAR archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  unarc release.tar.gz           extract into the current directory\n  \
  unarc -d staging bundle.zip    extract bundle.zip into staging/\n  \
  unarc data.bin                 no archive suffix; reported as a plain file")]
pub struct Cli {
    /// Archive file path
    #[arg(value_name = "ARCHIVE")]
    pub file: PathBuf,

    /// Extract into DIR
    #[arg(short = 'd', value_name = "DIR", default_value = ".")]
    pub dest: PathBuf,

    /// Quiet mode; suppress the kind report
    #[arg(short = 'q')]
    pub quiet: bool,
}
