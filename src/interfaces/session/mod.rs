//! Interactive terminal session
//!
//! Line-oriented front end over [`LinkService`]: every line is one user
//! intent (create, open, stats, list). Domain errors are printed inline and
//! never end the session.

pub mod commands;
pub mod render;

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::errors::SnaplinkError;
use crate::registry::CreateLinkRequest;
use crate::services::LinkService;
use crate::system::StaticReferrer;
use crate::utils::TimeParser;
use commands::{SessionCommand, SessionLine, split_args};

/// What the caller should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W: Write> {
    service: LinkService,
    referrer: Arc<StaticReferrer>,
    out: W,
}

impl<W: Write> Session<W> {
    /// `referrer` must be the same source the service was built with
    pub fn new(service: LinkService, referrer: Arc<StaticReferrer>, out: W) -> Self {
        Self {
            service,
            referrer,
            out,
        }
    }

    pub fn service(&self) -> &LinkService {
        &self.service
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Read commands until `quit` or end of input, then cancel all timers
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(self.out, "{} ", ">".bold())?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                break;
            };
            if self.execute_line(&line).await? == Flow::Quit {
                break;
            }
        }

        self.service.shutdown();
        Ok(())
    }

    pub async fn execute_line(&mut self, line: &str) -> io::Result<Flow> {
        let args = match split_args(line) {
            Ok(args) => args,
            Err(e) => {
                writeln!(self.out, "{} {}", "Parse error:".yellow().bold(), e)?;
                return Ok(Flow::Continue);
            }
        };
        if args.is_empty() {
            return Ok(Flow::Continue);
        }

        let parsed = match SessionLine::try_parse_from(args) {
            Ok(parsed) => parsed,
            Err(e) => {
                // help 输出同样走这里
                write!(self.out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };

        match parsed.command {
            SessionCommand::Create {
                long_url,
                code,
                expires,
            } => self.create(long_url, code, expires)?,
            SessionCommand::Open { code, referrer } => self.open(&code, referrer).await?,
            SessionCommand::Stats { code, json } => self.stats(code.as_deref(), json)?,
            SessionCommand::List => {
                let stats = self.service.all_stats();
                writeln!(self.out, "{}", render::list(&stats))?;
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn create(
        &mut self,
        long_url: String,
        code: Option<String>,
        expires: Option<String>,
    ) -> io::Result<()> {
        let expiry = match expires.as_deref().map(TimeParser::parse_expiry).transpose() {
            Ok(expiry) => expiry.flatten(),
            Err(e) => return self.report(&e),
        };

        let req = CreateLinkRequest {
            long_url,
            code,
            expiry,
        };
        match self.service.create_link(req) {
            Ok(entry) => {
                let short_url = self.service.short_url(&entry.code);
                writeln!(self.out, "{}", render::created(&entry, &short_url))
            }
            Err(e) => self.report(&e),
        }
    }

    async fn open(&mut self, code: &str, referrer: Option<String>) -> io::Result<()> {
        self.referrer.set(referrer);
        let result = self.service.open_link(code).await;
        self.referrer.set(None);

        match result {
            Ok(Some(opened)) => writeln!(
                self.out,
                "{}",
                render::opened(&opened.long_url, &opened.record)
            ),
            Ok(None) => writeln!(
                self.out,
                "{} Link '{}' expired before the click was recorded",
                "⚠".bold().yellow(),
                code
            ),
            Err(e) => self.report(&e),
        }
    }

    fn stats(&mut self, code: Option<&str>, json: bool) -> io::Result<()> {
        match code {
            Some(code) => match self.service.get_stats(code) {
                Ok(stats) if json => {
                    let body = serde_json::to_string_pretty(&stats).map_err(io::Error::other)?;
                    writeln!(self.out, "{}", body)
                }
                Ok(stats) => writeln!(self.out, "{}", render::link_stats(&stats)),
                Err(e) => self.report(&e),
            },
            None => {
                let stats = self.service.all_stats();
                let summary = self.service.summary();
                if json {
                    let body = serde_json::to_string_pretty(&serde_json::json!({
                        "summary": summary,
                        "links": stats,
                    }))
                    .map_err(io::Error::other)?;
                    writeln!(self.out, "{}", body)
                } else {
                    writeln!(self.out, "{}", render::stats(&stats, &summary))
                }
            }
        }
    }

    fn report(&mut self, error: &SnaplinkError) -> io::Result<()> {
        debug!("Session: {}", error);
        writeln!(self.out, "{}", error.format_colored())
    }
}
