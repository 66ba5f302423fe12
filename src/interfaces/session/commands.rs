//! Session command grammar
//!
//! Each input line is tokenized and parsed with clap, so `help` and
//! `<command> --help` come for free.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "snaplink", no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Shorten a URL
    ///
    /// Usage: create <LONG_URL> [--code CODE] [--expires DATE|MINUTES|RELATIVE]
    Create {
        /// Destination URL
        long_url: String,

        /// Custom short code (generated when omitted)
        #[arg(long, short)]
        code: Option<String>,

        /// Expiry: 2026-10-20, minutes like 45, or relative like 1h30m
        #[arg(long, short)]
        expires: Option<String>,
    },

    /// Click a short URL
    #[command(alias = "click")]
    Open {
        code: String,

        /// Referrer recorded for this click
        #[arg(long, short)]
        referrer: Option<String>,
    },

    /// Show click statistics
    Stats {
        /// Only this code
        code: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List short URLs with remaining lifetime
    #[command(alias = "ls")]
    List,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// Split a line into arguments, honouring single and double quotes
pub fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("Unterminated {} quote", q));
    }
    if in_token {
        args.push(current);
    }
    Ok(args)
}
