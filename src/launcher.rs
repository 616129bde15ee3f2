//! Launching a chosen editor on a chosen project.

use anyhow::{Context, Result};

use crate::editor::Editor;
use crate::project::Project;
use crate::wsl::{self, CommandSpec};

/// Launch `editor` on `project`.
///
/// Editors that want the Windows path flavor get the project path
/// translated through `wslpath -w` first; everything else receives the
/// native path unchanged. One attempt, no retry; the error chain carries
/// the failing command.
pub fn launch(project: &Project, editor: &Editor) -> Result<()> {
    let command = build(project, editor, wsl::windows_path)?;
    command
        .spawn_detached()
        .with_context(|| format!("Failed to open {} in {}", project.name, editor.name))
}

/// Resolve the path flavor, then construct the launch invocation.
///
/// `translate` is [`wsl::windows_path`] in production; it runs before
/// command construction so the constructed arguments always carry the
/// final path.
fn build(
    project: &Project,
    editor: &Editor,
    translate: impl FnOnce(&str, &str) -> Result<String>,
) -> Result<CommandSpec> {
    let path = if editor.needs_windows_path() {
        translate(&project.distro, &project.path)
            .with_context(|| format!("Failed to translate {} for {}", project.path, editor.name))?
    } else {
        project.path.clone()
    };
    Ok(editor.command(&project.distro, &path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    fn project() -> Project {
        Project {
            name: "api".into(),
            path: "/home/dev/api".into(),
            distro: "Ubuntu-22.04".into(),
        }
    }

    #[test]
    fn test_build_translates_for_windows_path_editors() {
        let editor = Editor::find("notepad").unwrap();
        let spec = build(&project(), editor, |distro, path| {
            assert_eq!(distro, "Ubuntu-22.04");
            assert_eq!(path, "/home/dev/api");
            Ok(r"\\wsl.localhost\Ubuntu-22.04\home\dev\api".to_string())
        })
        .unwrap();
        assert_eq!(spec.args, [r"\\wsl.localhost\Ubuntu-22.04\home\dev\api"]);
    }

    #[test]
    fn test_build_skips_translation_for_native_path_editors() {
        let editor = Editor::find("vim").unwrap();
        let spec = build(&project(), editor, |_, _| {
            panic!("native-path editors must not trigger translation")
        })
        .unwrap();
        assert!(spec.args.contains(&"/home/dev/api".to_string()));
    }

    #[test]
    fn test_build_surfaces_translation_failure() {
        let editor = Editor::find("explorer").unwrap();
        let err = build(&project(), editor, |_, _| bail!("wslpath blew up")).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("Failed to translate /home/dev/api"));
        assert!(chain.contains("wslpath blew up"));
    }
}
