use std::path::PathBuf;

/// One subprocess invocation: program, arguments, environment, working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_owned(),
            args: args.iter().map(|s| (*s).to_owned()).collect(),
            envs: Vec::new(),
            cwd: None,
        }
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_owned(), value.to_owned()));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Interleaved stdout and stderr, lossily decoded.
    pub combined: String,
}

/// Abstraction over subprocess execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion and capture its combined output.
    async fn exec(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError>;
}

/// Real subprocess executor over `tokio::process`.
pub struct RealExecutor;

impl CommandExecutor for RealExecutor {
    async fn exec(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        use std::process::Stdio;

        let mut cmd = tokio::process::Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|e| ExecError::Launch {
            program: spec.program.clone(),
            source: e,
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(CommandOutput { combined })
        } else {
            Err(ExecError::CommandFailed {
                program: spec.program.clone(),
                args: spec.args.clone(),
                exit_code: output.status.code(),
                output: combined,
            })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to launch '{program}' — is it installed and on PATH?")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    #[error("'{program}' failed with exit code {exit_code:?}: {args:?}\n{output}")]
    CommandFailed {
        program: String,
        args: Vec<String>,
        exit_code: Option<i32>,
        output: String,
    },
}
