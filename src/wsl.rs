//! Plumbing for talking to `wsl.exe`: explicit argument-list command
//! building, console-output decoding, and path translation.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// An external command held as an explicit program plus argument list.
///
/// Every subprocess this tool runs goes through `CommandSpec`, so distro
/// names and paths stay discrete arguments and never pass through a shell's
/// string parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to invoke.
    pub program: String,
    /// Arguments, one element per argument.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a spec with no arguments yet.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Run to completion and return the raw output.
    pub fn output(&self) -> Result<Output> {
        self.to_command()
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {self}"))
    }

    /// Run to completion, require a zero exit status, and return the
    /// decoded stdout.
    pub fn run_capture(&self) -> Result<String> {
        let output = self.output()?;
        if !output.status.success() {
            bail!("{self} exited with {}", output.status);
        }
        Ok(decode_console(&output.stdout))
    }

    /// Spawn without waiting, with all stdio detached.
    pub fn spawn_detached(&self) -> Result<()> {
        self.to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn {self}"))?;
        Ok(())
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        write!(f, "`")
    }
}

/// Locate `wsl.exe` on the host.
pub fn wsl_exe() -> Result<PathBuf> {
    which::which("wsl").context("Could not find wsl.exe in PATH; is WSL installed?")
}

/// Start building a `wsl.exe` invocation.
pub fn wsl_command() -> Result<CommandSpec> {
    Ok(CommandSpec::new(wsl_exe()?.to_string_lossy()))
}

/// Build `wsl -d <distro> -- <argv>`, running `argv` inside one distro.
pub fn distro_command<I, S>(distro: &str, argv: I) -> Result<CommandSpec>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(wsl_command()?.args(["-d", distro, "--"]).args(argv))
}

/// Translate a native distro path to its Windows form via `wslpath -w`.
pub fn windows_path(distro: &str, path: &str) -> Result<String> {
    let raw = distro_command(distro, ["wslpath", "-w", path])?
        .run_capture()
        .with_context(|| format!("Failed to translate {path} in {distro}"))?;
    translated_path(&raw).with_context(|| format!("wslpath returned no output for {path}"))
}

/// Resolve `$HOME` inside a distro.
pub fn distro_home(distro: &str) -> Result<String> {
    let raw = distro_command(distro, ["sh", "-c", r#"printf %s "$HOME""#])?
        .run_capture()
        .with_context(|| format!("Failed to resolve the home directory of {distro}"))?;
    let home = raw.trim();
    if home.is_empty() {
        bail!("{distro} reported an empty home directory");
    }
    Ok(home.to_string())
}

/// Decode console output captured from `wsl.exe`.
///
/// `wsl.exe`'s own output (`--list` and friends) is UTF-16LE; output from
/// programs run inside a distro is plain UTF-8. ASCII text encoded as
/// UTF-16LE has a NUL in every second byte, which UTF-8 text never has.
pub fn decode_console(bytes: &[u8]) -> String {
    if looks_utf16le(bytes) {
        decode_utf16le(bytes)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

fn looks_utf16le(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0xFF, 0xFE]) || (bytes.len() >= 2 && bytes[1] == 0)
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .filter(|c| *c != '\u{feff}')
        .collect()
}

/// `wslpath` prints the translated path followed by a newline; anything
/// beyond trimming that off would corrupt paths with interior spaces.
fn translated_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
