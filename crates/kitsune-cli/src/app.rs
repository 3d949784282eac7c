//! The console application: main menu, chat loop, status, and settings.
//!
//! [`App`] is generic over its input, output, and chat backend so the whole
//! menu flow can be driven from a script in tests. End of input behaves
//! like choosing Exit.

use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use kitsune_core::{ProgressionEngine, Settings, SettingsStore, SnapshotStore};
use kitsune_progression::{celebrate, random_events};
use kitsune_types::{InteractionOutcome, ProgressEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info, warn};

use crate::chat::ChatBackend;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::render::{self, FoxVisual};

/// Interactive console session.
pub struct App<B, R, W> {
    engine: ProgressionEngine,
    settings: Settings,
    settings_store: SettingsStore,
    snapshots: SnapshotStore,
    backend: B,
    fox: FoxVisual,
    config: CliConfig,
    input: R,
    output: W,
}

impl<B, R, W> App<B, R, W>
where
    B: ChatBackend,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Assemble a session. The snapshot store follows
    /// `settings.save_location`.
    pub fn new(
        engine: ProgressionEngine,
        settings: Settings,
        settings_store: SettingsStore,
        backend: B,
        config: CliConfig,
        input: R,
        output: W,
    ) -> Self {
        let snapshots = SnapshotStore::new(&settings.save_location);
        let mut fox = FoxVisual::new(settings.fox_color);
        fox.update(engine.state().mood(), engine.tails());
        Self {
            engine,
            settings,
            settings_store,
            snapshots,
            backend,
            fox,
            config,
            input,
            output,
        }
    }

    /// Restore saved progress, if any. A missing or unreadable save starts
    /// fresh.
    pub fn load_progress(&mut self) -> Result<(), CliError> {
        match self.snapshots.load() {
            Ok(Some(snapshot)) => {
                self.engine.restore(&snapshot);
                self.fox.update(self.engine.state().mood(), self.engine.tails());
                info!(
                    path = %self.snapshots.path().display(),
                    interactions = snapshot.total_interactions,
                    "progress loaded"
                );
                writeln!(self.output, "📂 Progress loaded!")?;
                writeln!(
                    self.output,
                    "🦊 Welcome back! {} interactions completed",
                    self.engine.state().interactions()
                )?;
            }
            Ok(None) => {
                writeln!(self.output, "📝 New save file - starting fresh!")?;
            }
            Err(e) => {
                warn!(error = %e, "saved progress unreadable, starting fresh");
                writeln!(self.output, "❌ Load error: {e}")?;
            }
        }
        Ok(())
    }

    /// Write a snapshot of the current progress. Failures are reported on
    /// the console and logged.
    pub fn save(&mut self) -> Result<(), CliError> {
        match self.snapshots.save(&self.engine.snapshot(Utc::now())) {
            Ok(path) => {
                debug!(path = %path.display(), "progress saved");
                writeln!(self.output, "💾 Progress saved!")?;
            }
            Err(e) => {
                error!(error = %e, "failed to save progress");
                writeln!(self.output, "❌ Save error: {e}")?;
            }
        }
        Ok(())
    }

    /// Run the main menu until Exit or end of input.
    pub async fn run(&mut self) -> Result<(), CliError> {
        loop {
            writeln!(self.output, "{}", render::main_menu(&self.fox))?;
            let Some(choice) = self.read_line("\nChoose (1-5): ").await? else {
                return self.exit();
            };
            match choice.as_str() {
                "1" => self.chat_loop().await?,
                "2" => self.show_status()?,
                "3" => self.settings_menu().await?,
                "4" => self.save()?,
                "5" => return self.exit(),
                _ => writeln!(self.output, "❌ Invalid choice")?,
            }
        }
    }

    fn exit(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "💾 Saving progress...")?;
        self.save()?;
        writeln!(self.output, "👋 Goodbye! Your progress has been saved.")?;
        Ok(())
    }

    /// Prompt and read one trimmed line; `None` at end of input.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    async fn chat_loop(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "\n💬 CHAT WITH KITSUNE")?;
        writeln!(self.output, "Type your message (or 'back' to return)")?;
        writeln!(self.output, "{}", "-".repeat(40))?;

        loop {
            let prompt = format!("\n{} You: ", self.fox);
            let Some(text) = self.read_line(&prompt).await? else {
                return Ok(());
            };
            if text.eq_ignore_ascii_case("back") {
                return Ok(());
            }
            if text.is_empty() {
                continue;
            }

            let kind = self.engine.classify(&text);
            let outcome = self.engine.process_interaction(kind, &text);
            self.fox.update(outcome.mood, outcome.current_tails);
            self.report(&outcome)?;

            writeln!(self.output, "{} Kitsune: Thinking...", self.fox)?;
            let reply = self.backend.chat(&text).await;
            writeln!(self.output, "{} Kitsune: {reply}", self.fox)?;

            if outcome.interaction.checked_rem(self.config.autosave_interval) == Some(0) {
                self.save()?;
            }
        }
    }

    fn report(&mut self, outcome: &InteractionOutcome) -> Result<(), CliError> {
        for event in outcome.events() {
            match event {
                ProgressEvent::XpDrop(xp_drop) => {
                    writeln!(self.output, "✨ {}", render::xp_drop_line(&xp_drop))?;
                }
                ProgressEvent::LevelUp(level_up) => {
                    let celebration = celebrate(&level_up);
                    if self.settings.sound_enabled {
                        debug!(effect = celebration.sound_effect, "sound effect");
                    }
                    writeln!(self.output, "{}", celebration.animation)?;
                    writeln!(self.output, "🎉 {}", celebration.message)?;
                }
                ProgressEvent::TailUnlocked { tails } => writeln!(
                    self.output,
                    "🌟 NEW TAIL UNLOCKED! You now have {tails} tails! 🌟"
                )?,
                ProgressEvent::AchievementUnlocked { id } => writeln!(
                    self.output,
                    "🏆 Achievement Unlocked: {}",
                    render::achievement_name(id)
                )?,
                ProgressEvent::RandomEvent { event } => {
                    writeln!(self.output, "🎲 {}", random_events::message(event))?;
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    fn show_status(&mut self) -> Result<(), CliError> {
        let display = self.engine.display(Utc::now());
        writeln!(self.output, "{}", render::status_panel(&display, &self.fox))?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    async fn settings_menu(&mut self) -> Result<(), CliError> {
        loop {
            writeln!(self.output, "{}", render::settings_menu(&self.settings))?;
            let Some(choice) = self.read_line("\nSelect setting to change (1-7): ").await?
            else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => self.change_endpoint().await?,
                "2" => self.change_color().await?,
                "3" => {
                    let enabled = self.settings.toggle_sound();
                    let state = if enabled { "enabled" } else { "disabled" };
                    writeln!(self.output, "🔊 Sound {state}")?;
                    self.persist_settings()?;
                }
                "4" => self.change_save_location().await?,
                "5" => {
                    writeln!(self.output, "🔍 Testing LLM connection...")?;
                    if self.backend.health().await {
                        writeln!(self.output, "✅ LLM connection successful!")?;
                    } else {
                        writeln!(
                            self.output,
                            "❌ LLM connection failed ({})",
                            self.backend.endpoint()
                        )?;
                    }
                }
                "6" => self.reset_settings().await?,
                "7" => return Ok(()),
                _ => writeln!(self.output, "❌ Invalid choice")?,
            }
        }
    }

    async fn change_endpoint(&mut self) -> Result<(), CliError> {
        let prompt = format!("New LLM endpoint [{}]: ", self.settings.llm_endpoint);
        let Some(endpoint) = self.read_line(&prompt).await?.filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        self.backend.set_endpoint(&endpoint);
        self.settings.llm_endpoint = self.backend.endpoint().to_owned();
        writeln!(
            self.output,
            "🔗 LLM endpoint updated to: {}",
            self.settings.llm_endpoint
        )?;
        self.persist_settings()
    }

    async fn change_color(&mut self) -> Result<(), CliError> {
        writeln!(
            self.output,
            "Available colors: orange, white, black, golden, silver"
        )?;
        let prompt = format!("New fox color [{}]: ", self.settings.fox_color);
        let Some(label) = self.read_line(&prompt).await?.filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        match self.settings.set_fox_color(&label.to_lowercase()) {
            Ok(color) => {
                self.fox.set_color(color);
                writeln!(self.output, "🎨 Fox color changed to: {color}")?;
                self.persist_settings()
            }
            Err(e) => {
                debug!(error = %e, "rejected fox colour");
                writeln!(self.output, "❌ Invalid color")?;
                Ok(())
            }
        }
    }

    async fn change_save_location(&mut self) -> Result<(), CliError> {
        let prompt = format!(
            "New save location [{}]: ",
            self.settings.save_location.display()
        );
        let Some(location) = self.read_line(&prompt).await?.filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        self.settings.save_location = PathBuf::from(location);
        self.snapshots = SnapshotStore::new(&self.settings.save_location);
        writeln!(
            self.output,
            "📁 Save location updated to: {}",
            self.settings.save_location.display()
        )?;
        self.persist_settings()
    }

    async fn reset_settings(&mut self) -> Result<(), CliError> {
        let confirm = self
            .read_line("Reset all settings to defaults? (y/N): ")
            .await?
            .unwrap_or_default();
        if !confirm.eq_ignore_ascii_case("y") {
            return Ok(());
        }
        self.settings.reset_to_defaults();
        self.backend.set_endpoint(&self.settings.llm_endpoint);
        self.fox.set_color(self.settings.fox_color);
        self.snapshots = SnapshotStore::new(&self.settings.save_location);
        writeln!(self.output, "🔄 Settings reset to defaults")?;
        self.persist_settings()
    }

    fn persist_settings(&mut self) -> Result<(), CliError> {
        match self.settings_store.save(&self.settings) {
            Ok(()) => writeln!(self.output, "✅ Settings saved!")?,
            Err(e) => {
                warn!(error = %e, "failed to save settings");
                writeln!(self.output, "❌ Settings save error: {e}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;

    use kitsune_core::settings::SETTINGS_FILE;
    use kitsune_core::snapshot::SNAPSHOT_FILE;
    use kitsune_types::{FoxColor, SkillName};
    use rust_decimal::Decimal;

    use super::*;

    struct Scripted {
        endpoint: String,
        healthy: bool,
        heard: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(healthy: bool) -> Self {
            Self {
                endpoint: "http://localhost:8000".to_owned(),
                healthy,
                heard: RefCell::default(),
            }
        }
    }

    impl ChatBackend for Scripted {
        fn endpoint(&self) -> &str {
            &self.endpoint
        }

        fn set_endpoint(&mut self, endpoint: &str) {
            endpoint.trim_end_matches('/').clone_into(&mut self.endpoint);
        }

        async fn health(&self) -> bool {
            self.healthy
        }

        async fn chat(&self, message: &str) -> String {
            self.heard.borrow_mut().push(message.to_owned());
            format!("echo: {message}")
        }
    }

    fn settings_in(dir: &Path) -> Settings {
        Settings {
            save_location: dir.join("saves"),
            ..Settings::default()
        }
    }

    fn app_with<'a>(
        dir: &Path,
        backend: Scripted,
        script: &'a str,
        out: &'a mut Vec<u8>,
        config: CliConfig,
    ) -> App<Scripted, &'a [u8], &'a mut Vec<u8>> {
        App::new(
            ProgressionEngine::with_seed(11),
            settings_in(dir),
            SettingsStore::new(dir.join(SETTINGS_FILE)),
            backend,
            config,
            script.as_bytes(),
            out,
        )
    }

    fn app<'a>(
        dir: &Path,
        script: &'a str,
        out: &'a mut Vec<u8>,
        config: CliConfig,
    ) -> App<Scripted, &'a [u8], &'a mut Vec<u8>> {
        app_with(dir, Scripted::new(true), script, out, config)
    }

    fn text(out: &[u8]) -> String {
        String::from_utf8(out.to_vec()).unwrap()
    }

    // -----------------------------------------------------------------------
    // Main menu and chat
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn chat_awards_xp_and_shows_reply() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        {
            let mut app = app(
                dir.path(),
                "1\ndebug my code\n\nback\n5\n",
                &mut out,
                CliConfig::default(),
            );
            app.run().await.unwrap();
            assert_eq!(app.engine.state().interactions(), 1);
            assert_eq!(
                app.engine.state().skills().xp(SkillName::ProblemSolving),
                Decimal::from(25)
            );
            assert_eq!(*app.backend.heard.borrow(), vec!["debug my code".to_owned()]);
        }
        let out = text(&out);
        assert!(out.contains("✨ 🟨 +25.0 Problem-Solving XP"));
        assert!(out.contains("🏆 Achievement Unlocked: First Steps"));
        assert!(out.contains("Kitsune: echo: debug my code"));
        let drop_at = out.find("+25.0 Problem-Solving XP").unwrap();
        let achievement_at = out.find("Achievement Unlocked").unwrap();
        let reply_at = out.find("Kitsune: echo").unwrap();
        assert!(drop_at < achievement_at && achievement_at < reply_at);
        assert!(out.contains("👋 Goodbye! Your progress has been saved."));
        assert!(dir.path().join("saves").join(SNAPSHOT_FILE).exists());
    }

    #[tokio::test]
    async fn autosave_follows_interval() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let config = CliConfig {
            autosave_interval: 2,
            ..CliConfig::default()
        };
        app(dir.path(), "1\nhi\nhi\nhi\nback\n5\n", &mut out, config)
            .run()
            .await
            .unwrap();
        // One autosave after the second message, one on exit.
        assert_eq!(text(&out).matches("💾 Progress saved!").count(), 2);
    }

    #[tokio::test]
    async fn end_of_input_exits_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        app(dir.path(), "1\nhello\n", &mut out, CliConfig::default())
            .run()
            .await
            .unwrap();
        assert!(text(&out).contains("👋 Goodbye!"));
        assert!(dir.path().join("saves").join(SNAPSHOT_FILE).exists());
    }

    #[tokio::test]
    async fn invalid_choice_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        app(dir.path(), "9\n5\n", &mut out, CliConfig::default())
            .run()
            .await
            .unwrap();
        assert!(text(&out).contains("❌ Invalid choice"));
    }

    #[tokio::test]
    async fn status_panel_is_shown() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        app(dir.path(), "2\n5\n", &mut out, CliConfig::default())
            .run()
            .await
            .unwrap();
        let out = text(&out);
        assert!(out.contains("🦊 KITSUNE STATUS"));
        assert!(out.contains("Total Level: 9"));
        assert!(out.contains("Next tail at level: 50"));
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn saved_progress_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let mut earlier = ProgressionEngine::with_seed(3);
        for _ in 0..7 {
            earlier.process_message("tell me a story");
        }
        SnapshotStore::new(dir.path().join("saves"))
            .save(&earlier.snapshot(Utc::now()))
            .unwrap();

        let mut out = Vec::new();
        {
            let mut app = app(dir.path(), "", &mut out, CliConfig::default());
            app.load_progress().unwrap();
            assert_eq!(app.engine.state().interactions(), 7);
        }
        let out = text(&out);
        assert!(out.contains("📂 Progress loaded!"));
        assert!(out.contains("🦊 Welcome back! 7 interactions completed"));
    }

    #[tokio::test]
    async fn missing_save_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        app(dir.path(), "", &mut out, CliConfig::default())
            .load_progress()
            .unwrap();
        assert!(text(&out).contains("📝 New save file - starting fresh!"));
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn colour_and_endpoint_changes_persist() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        {
            let mut app = app(
                dir.path(),
                "3\n2\npurple\n2\nGolden\n1\nhttp://gpu:9000/\n7\n5\n",
                &mut out,
                CliConfig::default(),
            );
            app.run().await.unwrap();
            assert_eq!(app.settings.fox_color, FoxColor::Golden);
            assert_eq!(app.backend.endpoint(), "http://gpu:9000");
        }
        let out = text(&out);
        assert!(out.contains("❌ Invalid color"));
        assert!(out.contains("🎨 Fox color changed to: golden"));
        assert!(out.contains("🔗 LLM endpoint updated to: http://gpu:9000"));

        let stored = SettingsStore::new(dir.path().join(SETTINGS_FILE))
            .try_load()
            .unwrap()
            .unwrap();
        assert_eq!(stored.fox_color, FoxColor::Golden);
        assert_eq!(stored.llm_endpoint, "http://gpu:9000");
    }

    #[tokio::test]
    async fn save_location_rebinds_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = dir.path().join("elsewhere");
        let script = format!("3\n4\n{}\n7\n4\n5\n", elsewhere.display());
        let mut out = Vec::new();
        app(dir.path(), &script, &mut out, CliConfig::default())
            .run()
            .await
            .unwrap();
        assert!(elsewhere.join(SNAPSHOT_FILE).exists());
        assert!(!dir.path().join("saves").join(SNAPSHOT_FILE).exists());
    }

    #[tokio::test]
    async fn reset_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("saves");
        let script = format!("3\n3\n6\nn\n6\ny\n4\n{}\n7\n5\n", keep.display());
        let mut out = Vec::new();
        {
            let mut app = app(dir.path(), &script, &mut out, CliConfig::default());
            app.run().await.unwrap();
            assert!(app.settings.sound_enabled);
            assert_eq!(app.settings.fox_color, FoxColor::Orange);
        }
        let out = text(&out);
        assert!(out.contains("🔊 Sound disabled"));
        assert_eq!(out.matches("🔄 Settings reset to defaults").count(), 1);
    }

    #[tokio::test]
    async fn connection_test_reports_health() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        app(dir.path(), "3\n5\n7\n5\n", &mut out, CliConfig::default())
            .run()
            .await
            .unwrap();
        assert!(text(&out).contains("✅ LLM connection successful!"));
    }

    #[tokio::test]
    async fn connection_test_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        app_with(
            dir.path(),
            Scripted::new(false),
            "3\n5\n7\n5\n",
            &mut out,
            CliConfig::default(),
        )
        .run()
        .await
        .unwrap();
        assert!(text(&out).contains("❌ LLM connection failed (http://localhost:8000)"));
    }
}
