//! Cache invalidation run after a new WSDL was written.
//!
//! The refresher only depends on the [`CacheClearer`] trait; which cache gets
//! cleared (and how) is up to the caller.

use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheClearError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: ExitStatus },
    #[error("failed to forward cache clear output: {0}")]
    Output(#[source] io::Error),
}

/// Clears whatever cache depends on the WSDL. Output goes to `out`.
pub trait CacheClearer {
    fn clear(&self, out: &mut dyn Write) -> Result<(), CacheClearError>;
}

/// Used when no cache clear command is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCacheClear;

impl CacheClearer for NoCacheClear {
    fn clear(&self, _out: &mut dyn Write) -> Result<(), CacheClearError> {
        tracing::debug!("no cache clear command configured; nothing to clear");
        Ok(())
    }
}

/// Runs an external command, e.g. `php bin/console cache:clear`.
#[derive(Debug, Clone)]
pub struct CommandCacheClearer {
    program: String,
    args: Vec<String>,
}

impl CommandCacheClearer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// First element is the program, the rest its arguments. `None` if empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl CacheClearer for CommandCacheClearer {
    /// Stdout and stderr are forwarded to `out` chunk by chunk while the
    /// command runs, interleaved in arrival order.
    fn clear(&self, out: &mut dyn Write) -> Result<(), CacheClearError> {
        tracing::info!(program = %self.program, args = ?self.args, "running cache clear");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CacheClearError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        let mut pipes: Vec<Box<dyn Read + Send>> = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            pipes.push(Box::new(stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            pipes.push(Box::new(stderr));
        }
        let readers: Vec<_> = pipes
            .into_iter()
            .map(|pipe| {
                let tx = tx.clone();
                thread::spawn(move || pump(pipe, tx))
            })
            .collect();
        drop(tx);

        // Keep draining after a write failure so the child never blocks on a full pipe.
        let mut write_err = None;
        for chunk in rx {
            if write_err.is_none() {
                if let Err(e) = out.write_all(&chunk).and_then(|()| out.flush()) {
                    write_err = Some(e);
                }
            }
        }
        for reader in readers {
            let _ = reader.join();
        }

        let status = child.wait().map_err(|source| CacheClearError::Wait {
            program: self.program.clone(),
            source,
        })?;
        if let Some(e) = write_err {
            return Err(CacheClearError::Output(e));
        }
        if !status.success() {
            return Err(CacheClearError::Failed {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Send everything read from `pipe` to `tx` until EOF or a read error.
fn pump(mut pipe: Box<dyn Read + Send>, tx: mpsc::Sender<Vec<u8>>) {
    let mut buf = [0u8; 8192];
    loop {
        match pipe.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!("reading cache clear output failed: {}", e);
                break;
            }
        }
    }
}
