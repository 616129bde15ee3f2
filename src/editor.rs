//! The static editor catalog and the probes that narrow it down to what is
//! actually installed.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::wsl::{self, CommandSpec};

/// Fixed install location probed for Notepad++ on the Windows side.
const NOTEPADPP_EXE: &str = r"C:\Program Files\Notepad++\notepad++.exe";

/// Windows-side probe set, checked with one `where.exe` call:
/// binary name → catalog id.
const WINDOWS_PROBES: &[(&str, &str)] = &[
    ("code", "vscode"),
    ("cursor", "cursor"),
    ("antigravity", "antigravity"),
    ("notepad", "notepad"),
];

/// Terminal editors probed inside the distro with `type`. Probe names double
/// as catalog ids.
const TERMINAL_PROBES: &[&str] = &["vim", "nano", "micro"];

/// How an editor is launched, and which path flavor it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchKind {
    /// Windows GUI program that addresses a distro filesystem through a
    /// `wsl+<distro>` remote and takes the native path unchanged.
    RemoteGui {
        /// Program invoked on the Windows side. The VS Code-family CLI
        /// shims are batch files, hence the `.cmd` names.
        program: &'static str,
    },
    /// Windows GUI program that needs the path translated by `wslpath -w`.
    WindowsGui {
        /// Program invoked on the Windows side.
        program: &'static str,
    },
    /// Editor that runs inside the distro, in a freshly spawned console
    /// window.
    Terminal {
        /// Program run inside the distro.
        program: &'static str,
    },
}

/// One entry of the static editor catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Editor {
    /// Stable identifier, stored in the config as `editor.selected`.
    pub id: &'static str,
    /// Human-readable name shown in listings.
    pub name: &'static str,
    /// Launch rule.
    pub kind: LaunchKind,
}

/// The static editor catalog. Ids are unique, and the order here is the
/// presentation order everywhere.
pub const CATALOG: &[Editor] = &[
    Editor {
        id: "vscode",
        name: "Visual Studio Code",
        kind: LaunchKind::RemoteGui { program: "code.cmd" },
    },
    Editor {
        id: "cursor",
        name: "Cursor",
        kind: LaunchKind::RemoteGui { program: "cursor.cmd" },
    },
    Editor {
        id: "antigravity",
        name: "Antigravity",
        kind: LaunchKind::RemoteGui { program: "antigravity.cmd" },
    },
    Editor {
        id: "notepad",
        name: "Notepad",
        kind: LaunchKind::WindowsGui { program: "notepad.exe" },
    },
    Editor {
        id: "notepadpp",
        name: "Notepad++",
        kind: LaunchKind::WindowsGui { program: NOTEPADPP_EXE },
    },
    Editor {
        id: "explorer",
        name: "File Explorer",
        kind: LaunchKind::WindowsGui { program: "explorer.exe" },
    },
    Editor {
        id: "vim",
        name: "Vim",
        kind: LaunchKind::Terminal { program: "vim" },
    },
    Editor {
        id: "nano",
        name: "Nano",
        kind: LaunchKind::Terminal { program: "nano" },
    },
    Editor {
        id: "micro",
        name: "Micro",
        kind: LaunchKind::Terminal { program: "micro" },
    },
];

impl Editor {
    /// Look an editor up by its catalog id.
    pub fn find(id: &str) -> Option<&'static Self> {
        CATALOG.iter().find(|editor| editor.id == id)
    }

    /// True for editors that run inside a console window.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, LaunchKind::Terminal { .. })
    }

    /// True when the launch command wants a `wslpath -w` translated path.
    pub fn needs_windows_path(&self) -> bool {
        matches!(self.kind, LaunchKind::WindowsGui { .. })
    }

    /// Build the launch invocation for `path` inside `distro`.
    ///
    /// `path` must already be in the flavor this editor needs; the launcher
    /// translates first when `needs_windows_path` says so. Terminal editors
    /// come back wrapped in a console-spawning `cmd.exe /c start`, with the
    /// distro and path kept as discrete arguments.
    pub fn command(&self, distro: &str, path: &str) -> CommandSpec {
        match self.kind {
            LaunchKind::RemoteGui { program } => CommandSpec::new(program)
                .arg("--remote")
                .arg(format!("wsl+{distro}"))
                .arg(path),
            LaunchKind::WindowsGui { program } => CommandSpec::new(program).arg(path),
            LaunchKind::Terminal { program } => CommandSpec::new("cmd.exe")
                .args(["/c", "start", ""])
                .args(["wsl", "-d", distro, "--", program])
                .arg(path),
        }
    }
}

/// Detect the installed subset of the catalog.
///
/// One `where.exe` call probes every Windows-side candidate and one `type`
/// call inside `distro` probes the terminal candidates (skipped when no
/// distro is available to probe). Either probe failing is logged and
/// treated as "found nothing on that side"; both failing falls back to a
/// fixed safe pair.
pub fn detect(distro: Option<&str>) -> Vec<&'static Editor> {
    let windows = match probe_windows() {
        Ok(output) => Some(output),
        Err(e) => {
            log::warn!("Windows editor probe failed: {e:#}");
            None
        }
    };
    let terminal = distro.and_then(|distro| match probe_terminal(distro) {
        Ok(output) => Some(output),
        Err(e) => {
            log::warn!("Editor probe in {distro} failed: {e:#}");
            None
        }
    });
    from_probe_output(
        windows.as_deref(),
        terminal.as_deref(),
        Path::new(NOTEPADPP_EXE).exists(),
    )
}

/// Map raw probe output (`None` = that probe failed) to catalog entries,
/// preserving catalog order.
fn from_probe_output(
    where_output: Option<&str>,
    type_output: Option<&str>,
    notepadpp_installed: bool,
) -> Vec<&'static Editor> {
    if where_output.is_none() && type_output.is_none() {
        return fallback_editors();
    }

    let mut found: HashSet<&str> = HashSet::new();
    if let Some(output) = where_output {
        found.extend(windows_ids_from(output));
        // Ships with Windows itself, so no probe can miss it.
        found.insert("explorer");
        if notepadpp_installed {
            found.insert("notepadpp");
        }
    }
    if let Some(output) = type_output {
        found.extend(terminal_ids_from(output));
    }
    CATALOG
        .iter()
        .filter(|editor| found.contains(editor.id))
        .collect()
}

/// The pair returned when no probe can run at all: one GUI editor and one
/// notepad-class editor, in fixed order.
fn fallback_editors() -> Vec<&'static Editor> {
    ["vscode", "notepad"]
        .iter()
        .filter_map(|id| Editor::find(id))
        .collect()
}

/// One `where.exe` call across every Windows-side candidate.
///
/// `where.exe` exits non-zero when any name is missing but still prints the
/// paths it did resolve, so the exit status is ignored; only failing to run
/// it at all counts as a probe failure.
fn probe_windows() -> Result<String> {
    let names = WINDOWS_PROBES.iter().map(|(binary, _)| *binary);
    let output = CommandSpec::new("where.exe")
        .args(names)
        .output()
        .context("Failed to run where.exe")?;
    Ok(wsl::decode_console(&output.stdout))
}

/// One `type` call inside the distro across every terminal candidate. As
/// with `where.exe`, a missing editor makes `type` exit non-zero while the
/// found ones are still reported on stdout.
fn probe_terminal(distro: &str) -> Result<String> {
    let script = format!("type {}", TERMINAL_PROBES.join(" "));
    let output = wsl::distro_command(distro, ["bash", "-c", script.as_str()])?
        .output()
        .with_context(|| format!("Failed to probe editors in {distro}"))?;
    Ok(wsl::decode_console(&output.stdout))
}

/// Catalog ids found in `where.exe` output. Each line is a resolved path;
/// the match is on the basename without extension, case-insensitive.
fn windows_ids_from(output: &str) -> Vec<&'static str> {
    let mut ids = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let base = line.rsplit(['\\', '/']).next().unwrap_or(line);
        let stem = base.split('.').next().unwrap_or(base);
        for &(binary, id) in WINDOWS_PROBES {
            if stem.eq_ignore_ascii_case(binary) && !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Catalog ids found in `type` output: lines shaped `vim is /usr/bin/vim`.
fn terminal_ids_from(output: &str) -> Vec<&'static str> {
    let mut ids = Vec::new();
    for line in output.lines() {
        let Some((name, _)) = line.trim().split_once(" is ") else {
            continue;
        };
        for &probe in TERMINAL_PROBES {
            if name == probe && !ids.contains(&probe) {
                ids.push(probe);
            }
        }
    }
    ids
}
