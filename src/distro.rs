//! Enumeration of the WSL distributions registered on this host.

use anyhow::{Context, Result};

use crate::wsl;

/// Run state of a distribution as reported by `wsl --list --verbose`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistroState {
    /// The distribution is running and can execute commands.
    Running,
    /// Registered but not currently running.
    Stopped,
    /// Any other state (`Installing`, `Converting`, …) the tool does not
    /// act on.
    Other(String),
}

impl DistroState {
    fn parse(field: &str) -> Self {
        match field {
            "Running" => Self::Running,
            "Stopped" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for DistroState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Stopped => write!(f, "Stopped"),
            Self::Other(state) => write!(f, "{state}"),
        }
    }
}

/// A WSL distribution registered on this host. Records are re-fetched on
/// every invocation; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distro {
    /// Distribution name, e.g. `Ubuntu-22.04`.
    pub name: String,
    /// Parsed STATE column.
    pub state: DistroState,
    /// Whether `wsl --list` marked this distribution with `*` as the
    /// default.
    pub is_default: bool,
}

impl Distro {
    /// True when the distribution can run commands right now.
    pub fn is_running(&self) -> bool {
        self.state == DistroState::Running
    }
}

/// List every registered distribution.
pub fn list() -> Result<Vec<Distro>> {
    let output = wsl::wsl_command()?
        .args(["--list", "--verbose"])
        .run_capture()
        .context("Failed to list WSL distributions")?;
    Ok(parse_table(&output))
}

/// List only the distributions that are currently running.
pub fn list_running() -> Result<Vec<Distro>> {
    Ok(list()?.into_iter().filter(Distro::is_running).collect())
}

/// Parse the tabular `wsl --list --verbose` output:
///
/// ```text
///   NAME            STATE           VERSION
/// * Ubuntu-22.04    Running         2
///   Debian          Stopped         2
/// ```
fn parse_table(text: &str) -> Vec<Distro> {
    let mut distros = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (is_default, rest) = match line.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let mut fields = rest.split_whitespace();
        let (Some(name), Some(state)) = (fields.next(), fields.next()) else {
            continue;
        };
        if name == "NAME" && state == "STATE" {
            continue;
        }
        distros.push(Distro {
            name: name.to_string(),
            state: DistroState::parse(state),
            is_default,
        });
    }
    distros
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "  NAME              STATE           VERSION\n\
                         * Ubuntu-22.04      Running         2\n\
                           Debian            Stopped         2\n\
                           docker-desktop    Running         2\n";

    #[test]
    fn test_parse_table() {
        let distros = parse_table(TABLE);
        assert_eq!(
            distros,
            vec![
                Distro {
                    name: "Ubuntu-22.04".into(),
                    state: DistroState::Running,
                    is_default: true,
                },
                Distro {
                    name: "Debian".into(),
                    state: DistroState::Stopped,
                    is_default: false,
                },
                Distro {
                    name: "docker-desktop".into(),
                    state: DistroState::Running,
                    is_default: false,
                },
            ]
        );
    }

    #[test]
    fn test_parse_table_unusual_state() {
        let distros = parse_table("  NAME    STATE        VERSION\n  Fedora  Installing   2\n");
        assert_eq!(distros.len(), 1);
        assert_eq!(distros[0].state, DistroState::Other("Installing".into()));
        assert!(!distros[0].is_running());
    }

    #[test]
    fn test_parse_table_empty_output() {
        assert!(parse_table("").is_empty());
        assert!(parse_table("\r\n\r\n").is_empty());
    }

    #[test]
    fn test_parse_table_skips_incomplete_lines() {
        let distros = parse_table("  NAME  STATE  VERSION\n  Ubuntu\n  Debian  Running  2\n");
        assert_eq!(distros.len(), 1);
        assert_eq!(distros[0].name, "Debian");
    }

    #[test]
    fn test_running_filter() {
        let running: Vec<Distro> = parse_table(TABLE)
            .into_iter()
            .filter(Distro::is_running)
            .collect();
        let names: Vec<&str> = running.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Ubuntu-22.04", "docker-desktop"]);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(DistroState::Running.to_string(), "Running");
        assert_eq!(DistroState::Other("Converting".into()).to_string(), "Converting");
    }
}
