//! The fake "code generation" workspace shown while generating.
//!
//! Everything here is derived from how long generation has been running,
//! so the workspace needs no timers of its own and clears itself the moment
//! generation stops.

/// A floating code panel with the snippet it types out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePanel {
    /// File path shown in the panel header.
    pub title: String,
    /// Full snippet text.
    pub code: String,
}

impl CodePanel {
    /// Create a panel.
    pub fn new(title: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            code: code.into(),
        }
    }
}

/// A panel as it should be drawn right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    /// File path shown in the panel header.
    pub title: String,
    /// The typed-out part of the snippet.
    pub visible_code: String,
    /// Whether the whole snippet is visible.
    pub done: bool,
}

/// Snapshot of the workspace for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceView {
    /// Panels that have appeared so far, in appearance order.
    pub panels: Vec<PanelView>,
    /// File badges that have appeared so far.
    pub files: Vec<String>,
}

impl WorkspaceView {
    /// Whether nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty() && self.files.is_empty()
    }
}

/// Panels and file badges with their staggered appearance timings.
#[derive(Debug, Clone)]
pub struct CodeWorkspace {
    panels: Vec<CodePanel>,
    files: Vec<String>,
    /// Delay between two panels appearing.
    pub panel_stagger_ms: u64,
    /// Milliseconds per typed snippet character.
    pub type_interval_ms: u64,
    /// Delay before the first file badge.
    pub file_delay_ms: u64,
    /// Delay between two file badges.
    pub file_stagger_ms: u64,
}

impl Default for CodeWorkspace {
    fn default() -> Self {
        Self::demo()
    }
}

impl CodeWorkspace {
    /// Create a workspace with the default timings.
    pub fn new(panels: Vec<CodePanel>, files: Vec<String>) -> Self {
        Self {
            panels,
            files,
            panel_stagger_ms: 400,
            type_interval_ms: 15,
            file_delay_ms: 200,
            file_stagger_ms: 300,
        }
    }

    /// The assistant demo workspace: five snippets and eight generated files.
    pub fn demo() -> Self {
        let panels = vec![
            CodePanel::new("api/openai.ts", include_str!("snippets/openai.ts.txt")),
            CodePanel::new("hooks/useJarvis.ts", include_str!("snippets/useJarvis.ts.txt")),
            CodePanel::new(
                "components/VoiceInput.tsx",
                include_str!("snippets/VoiceInput.tsx.txt"),
            ),
            CodePanel::new(
                "utils/textToSpeech.ts",
                include_str!("snippets/textToSpeech.ts.txt"),
            ),
            CodePanel::new(
                "config/jarvis.config.json",
                include_str!("snippets/jarvis.config.json.txt"),
            ),
        ];
        let files = [
            "openai.ts",
            "useJarvis.ts",
            "VoiceInput.tsx",
            "textToSpeech.ts",
            "jarvis.config.json",
            "types.d.ts",
            "constants.ts",
            "utils.ts",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        Self::new(panels, files)
    }

    /// All panels.
    pub fn panels(&self) -> &[CodePanel] {
        &self.panels
    }

    /// All file names.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// What is visible `since_start_ms` after generation began.
    ///
    /// `None` means generation is off and the workspace is empty.
    pub fn view_at(&self, since_start_ms: Option<u64>) -> WorkspaceView {
        let Some(elapsed) = since_start_ms else {
            return WorkspaceView::default();
        };

        let panels = self
            .panels
            .iter()
            .enumerate()
            .filter_map(|(i, panel)| {
                let appears_at = i as u64 * self.panel_stagger_ms;
                let shown_for = elapsed.checked_sub(appears_at)?;
                let typed = (shown_for / self.type_interval_ms.max(1)) as usize;
                let total = panel.code.chars().count();
                Some(PanelView {
                    title: panel.title.clone(),
                    visible_code: panel.code.chars().take(typed).collect(),
                    done: typed >= total,
                })
            })
            .collect();

        let files = self
            .files
            .iter()
            .enumerate()
            .filter(|(i, _)| elapsed >= self.file_delay_ms + *i as u64 * self.file_stagger_ms)
            .map(|(_, name)| name.clone())
            .collect();

        WorkspaceView { panels, files }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_visible_when_not_generating() {
        let ws = CodeWorkspace::demo();
        assert!(ws.view_at(None).is_empty());
    }

    #[test]
    fn first_panel_appears_immediately_but_empty() {
        let ws = CodeWorkspace::demo();
        let view = ws.view_at(Some(0));
        assert_eq!(view.panels.len(), 1);
        assert_eq!(view.panels[0].title, "api/openai.ts");
        assert_eq!(view.panels[0].visible_code, "");
        assert!(view.files.is_empty());
    }

    #[test]
    fn panels_stagger_and_type() {
        let ws = CodeWorkspace::demo();
        let view = ws.view_at(Some(430));
        assert_eq!(view.panels.len(), 2);
        assert_eq!(view.panels[0].visible_code.chars().count(), 430 / 15);
        assert_eq!(view.panels[1].visible_code, "//");
        assert_eq!(view.files, vec!["openai.ts".to_string()]);

        let view = ws.view_at(Some(500));
        assert_eq!(view.files.len(), 2);
    }

    #[test]
    fn snippets_open_with_their_path_header() {
        let ws = CodeWorkspace::demo();
        for panel in ws.panels() {
            let header = panel.code.lines().next().unwrap();
            assert_eq!(header, format!("// {}", panel.title));
        }
        assert!(ws.panels()[0].code.contains(r#"model: "gpt-4""#));
        assert!(ws.panels()[0].code.contains("apiKey: process.env.OPENAI_KEY"));
        assert!(ws.panels()[1].code.contains("setLoading(true)"));
        assert!(ws.panels()[4].code.contains(r#""model": "gpt-4-turbo""#));
    }

    #[test]
    fn everything_visible_eventually() {
        let ws = CodeWorkspace::demo();
        let view = ws.view_at(Some(60_000));
        assert_eq!(view.panels.len(), 5);
        assert!(view.panels.iter().all(|p| p.done));
        assert_eq!(view.files.len(), 8);
        assert_eq!(view.panels[4].visible_code, ws.panels()[4].code);
    }
}
