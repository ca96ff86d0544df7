use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use analyzer_core::{update, AppState, AppViewModel, DownloadStatus, Msg, SelectedFile};
use analyzer_logging::analyzer_debug;
use anyhow::{Context, Result};

use crate::cli::AnalyzeArgs;
use crate::effects::EffectRunner;
use crate::render;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Drives `AppState` through `update`, runs the resulting effects and prints changes.
pub struct Session<W: Write> {
    state: AppState,
    shown: AppViewModel,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(state: AppState, runner: EffectRunner, out: W) -> Self {
        let shown = state.view();
        Self {
            state,
            shown,
            runner,
            out,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.run(effects);

        if state.consume_dirty() {
            let view = state.view();
            for line in render::render(&self.shown, &view) {
                writeln!(self.out, "{line}")?;
            }
            self.shown = view;
        }
        self.state = state;
        Ok(())
    }

    /// Pumps engine events until no analysis or download is outstanding.
    pub fn wait_until_idle(&mut self) -> Result<()> {
        while self.is_busy() {
            let next = self
                .runner
                .next_msg(POLL_INTERVAL)
                .context("lost the analysis engine while waiting for a result")?;
            if let Some(msg) = next {
                self.dispatch(msg)?;
            }
        }
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.state.in_flight().is_some()
            || matches!(self.state.download_status(), DownloadStatus::InFlight)
    }

    /// No error is showing for the analysis or the last download.
    pub fn succeeded(&self) -> bool {
        self.state.errors().current().is_none()
            && !matches!(self.state.download_status(), DownloadStatus::Failed(_))
    }

    pub fn select_resume(&mut self, path: &Path) -> Result<()> {
        let file = read_resume(path)?;
        self.dispatch(Msg::FileSelected(file))?;
        Ok(())
    }

    /// One-shot analysis; returns whether it (and the optional download) succeeded.
    pub fn analyze(&mut self, args: &AnalyzeArgs) -> Result<bool> {
        let job_description = read_job_description(args)?;
        self.select_resume(&args.resume)?;
        self.dispatch(Msg::JobDescriptionChanged(job_description))?;
        self.dispatch(Msg::AnalyzeClicked)?;
        self.wait_until_idle()?;

        if !self.succeeded() {
            return Ok(false);
        }
        if args.json {
            if let Some(raw) = self.state.raw_response() {
                writeln!(self.out, "{}", raw.to_pretty_string())?;
            }
        }
        if args.download {
            self.dispatch(Msg::DownloadClicked)?;
            self.wait_until_idle()?;
        }
        Ok(self.succeeded())
    }

    /// Prompt loop over `input`; the job description is read as a single line.
    pub fn interactive<R: BufRead>(&mut self, mut input: R) -> Result<bool> {
        loop {
            if self.state.raw_response().is_none() {
                let Some(path) = self.prompt(&mut input, "Resume path: ")? else {
                    return Ok(self.succeeded());
                };
                if path.is_empty() {
                    self.dispatch(Msg::FileCleared)?;
                } else if let Err(err) = self.select_resume(Path::new(&path)) {
                    writeln!(self.out, "Error: {err:#}")?;
                    continue;
                }

                let Some(text) = self.prompt(&mut input, "Job description: ")? else {
                    return Ok(self.succeeded());
                };
                self.dispatch(Msg::JobDescriptionChanged(text))?;
                self.dispatch(Msg::AnalyzeClicked)?;
                self.wait_until_idle()?;
                continue;
            }

            let Some(choice) = self.prompt(
                &mut input,
                "[d] download report  [a] analyze another  [q] quit: ",
            )?
            else {
                return Ok(self.succeeded());
            };
            match choice.as_str() {
                "d" => {
                    self.dispatch(Msg::DownloadClicked)?;
                    self.wait_until_idle()?;
                }
                "a" => self.dispatch(Msg::AnalyzeAnotherClicked)?,
                "q" => return Ok(self.succeeded()),
                other => writeln!(self.out, "Unknown choice {other:?}")?,
            }
        }
    }

    fn prompt<R: BufRead>(&mut self, input: &mut R, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            analyzer_debug!("input closed");
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Stops the engine and hands back the output sink.
    pub fn finish(self) -> W {
        self.runner.shutdown();
        self.out
    }
}

fn read_resume(path: &Path) -> Result<SelectedFile> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read resume {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    Ok(SelectedFile::new(name, bytes))
}

fn read_job_description(args: &AnalyzeArgs) -> Result<String> {
    match (&args.job_description, &args.job_description_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read job description {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}
