// Command line definitions via clap derive: global upload flags and the
// single `upload` subcommand.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::request::UploadOptions;

#[derive(Debug, Parser)]
#[command(name = "rbcli", version, about = "the rubberband command line client")]
pub struct Cli {
    /// Run this command asynchronously. Receive the results in an email.
    #[arg(long = "async", global = true)]
    pub asynchronous: bool,

    /// A comma-separated list of tags to associate with the uploaded run.
    #[arg(long, global = true, default_value = "")]
    pub tags: String,

    /// The expirationdate, should be provided in form "2017-Aug-24".
    #[arg(short = 'e', value_name = "EXPIRATIONDATE", global = true)]
    pub expiration: Option<String>,

    /// Increase log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload a list of related output files for parsing and processing.
    #[command(visible_alias = "up")]
    Upload {
        /// Output files (.set, .out, .err, .meta, .solu)
        files: Vec<PathBuf>,
    },
}

impl Cli {
    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions {
            tags: self.tags.clone(),
            expiration: self.expiration.clone(),
            asynchronous: self.asynchronous,
        }
    }
}
