//! Engine backed by an external typesetting command
//!
//! The command receives the LaTeX source as its last argument and writes SVG markup to
//! stdout, e.g. `tex2svg [--inline] '<latex>'`. A non-zero exit status is a per-equation
//! failure carrying the command's stderr.

use std::future::Future;
use tokio::process::Command;

use super::engine::{RenderRequest, RenderResponse, TypesetEngine};
use crate::eqsvg::document::DisplayMode;
use eqsvg_config::EngineConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    inline_flag: Option<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>) -> Self {
        CommandEngine {
            program: program.into(),
            args: Vec::new(),
            inline_flag: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        CommandEngine {
            program: config.command.clone(),
            args: config.args.clone(),
            inline_flag: Some(config.inline_flag.clone()).filter(|flag| !flag.is_empty()),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_inline_flag(mut self, flag: impl Into<String>) -> Self {
        self.inline_flag = Some(flag.into());
        self
    }

    /// Full argument list for one request.
    pub fn arguments(&self, request: &RenderRequest) -> Vec<String> {
        let mut args = self.args.clone();
        if request.display_mode == DisplayMode::Inline {
            args.extend(self.inline_flag.iter().cloned());
        }
        args.push(request.latex.clone());
        args
    }
}

impl TypesetEngine for CommandEngine {
    fn render(&self, request: RenderRequest) -> impl Future<Output = RenderResponse> + Send {
        let program = self.program.clone();
        let args = self.arguments(&request);
        let id = request.id;

        async move {
            match Command::new(&program).args(&args).output().await {
                Ok(output) if output.status.success() => RenderResponse::Success {
                    id,
                    svg: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                },
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                    let error = if stderr.is_empty() {
                        format!("{program} exited with {}", output.status)
                    } else {
                        stderr
                    };
                    RenderResponse::Failure { id, error }
                }
                Err(err) => RenderResponse::Failure {
                    id,
                    error: format!("failed to run {program}: {err}"),
                },
            }
        }
    }
}
