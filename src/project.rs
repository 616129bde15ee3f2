//! Scanning distributions for candidate project directories.

use anyhow::{Context, Result};

use crate::distro::Distro;
use crate::wsl;

/// A candidate project directory found inside a distribution.
///
/// Identity is `(distro, path)`; nothing about a project is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Final path component of the directory.
    pub name: String,
    /// Native (in-distro) absolute path.
    pub path: String,
    /// Name of the distribution the directory lives in.
    pub distro: String,
}

/// Scan every running distribution in `distros` for projects under `root`.
///
/// Scans fan out across distributions and are joined before returning; the
/// merged list carries no ordering guarantee between distributions. A
/// distribution that fails to scan is logged and excluded rather than
/// failing the whole listing.
pub fn scan_all(distros: &[Distro], root: &str) -> Vec<Project> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = distros
            .iter()
            .filter(|distro| distro.is_running())
            .map(|distro| (distro, scope.spawn(move || scan_distro(&distro.name, root))))
            .collect();

        let mut projects = Vec::new();
        for (distro, handle) in handles {
            match handle.join() {
                Ok(Ok(mut found)) => projects.append(&mut found),
                Ok(Err(e)) => log::warn!("Skipping {}: {e:#}", distro.name),
                Err(_) => log::warn!("Skipping {}: scan panicked", distro.name),
            }
        }
        projects
    })
}

/// List the immediate subdirectories of `root` inside one distribution,
/// excluding hidden entries and the root itself.
pub fn scan_distro(distro: &str, root: &str) -> Result<Vec<Project>> {
    let root = resolve_root(distro, root)?;
    let output = wsl::distro_command(
        distro,
        [
            "find",
            root.as_str(),
            "-maxdepth",
            "1",
            "-type",
            "d",
            "-not",
            "-path",
            "*/.*",
        ],
    )?
    .run_capture()
    .with_context(|| format!("Failed to list {root} in {distro}"))?;
    Ok(parse_listing(distro, &root, &output))
}

/// Render projects as an aligned table for terminal output.
pub fn render_table(projects: &[Project]) -> String {
    let name_width = column_width(projects.iter().map(|p| p.name.len()));
    let distro_width = column_width(projects.iter().map(|p| p.distro.len()));
    projects
        .iter()
        .map(|p| {
            format!(
                "{:<name_width$}  {:<distro_width$}  {}",
                p.name, p.distro, p.path
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn column_width(lengths: impl Iterator<Item = usize>) -> usize {
    lengths.max().unwrap_or(0)
}

/// `find` does not expand `~`, so a tilde root is resolved against the
/// distribution's own `$HOME` before scanning.
fn resolve_root(distro: &str, root: &str) -> Result<String> {
    if root == "~" || root.starts_with("~/") {
        let home = wsl::distro_home(distro)?;
        Ok(expand_tilde(root, &home))
    } else {
        Ok(root.to_string())
    }
}

fn expand_tilde(root: &str, home: &str) -> String {
    match root.strip_prefix('~') {
        Some("") => home.to_string(),
        Some(rest) => format!("{home}{rest}"),
        None => root.to_string(),
    }
}

/// Map `find` output lines to projects, dropping the root itself and any
/// hidden entry that slipped past the `-not -path` filter.
fn parse_listing(distro: &str, root: &str, text: &str) -> Vec<Project> {
    let root = root.trim_end_matches('/');
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.trim_end_matches('/') != root)
        .filter_map(|line| {
            let name = line.trim_end_matches('/').rsplit('/').next()?;
            if name.is_empty() || name.starts_with('.') {
                return None;
            }
            Some(Project {
                name: name.to_string(),
                path: line.to_string(),
                distro: distro.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_excludes_root_and_hidden_entries() {
        let output = "/home/dev\n/home/dev/proj1\n/home/dev/.hidden\n/home/dev/proj2\n";
        let projects = parse_listing("Ubuntu", "/home/dev", output);
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["proj1", "proj2"]);
    }

    #[test]
    fn test_listing_keeps_full_paths_and_distro() {
        let projects = parse_listing("Debian", "/home/dev", "/home/dev/api\n");
        assert_eq!(
            projects,
            vec![Project {
                name: "api".into(),
                path: "/home/dev/api".into(),
                distro: "Debian".into(),
            }]
        );
    }

    #[test]
    fn test_listing_handles_trailing_slash_root() {
        let output = "/home/dev/\n/home/dev/proj1\n";
        let projects = parse_listing("Ubuntu", "/home/dev/", output);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "proj1");
    }

    #[test]
    fn test_listing_empty_output() {
        assert!(parse_listing("Ubuntu", "/home/dev", "").is_empty());
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("~", "/home/dev"), "/home/dev");
        assert_eq!(expand_tilde("~/code", "/home/dev"), "/home/dev/code");
        assert_eq!(expand_tilde("/srv/projects", "/home/dev"), "/srv/projects");
    }

    #[test]
    fn test_render_table() {
        let projects = vec![
            Project {
                name: "api".into(),
                path: "/home/dev/api".into(),
                distro: "Ubuntu".into(),
            },
            Project {
                name: "blog".into(),
                path: "/home/dev/blog".into(),
                distro: "Debian".into(),
            },
        ];
        insta::assert_snapshot!(render_table(&projects), @r"
        api   Ubuntu  /home/dev/api
        blog  Debian  /home/dev/blog
        ");
    }
}
