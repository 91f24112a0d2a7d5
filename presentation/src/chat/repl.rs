//! REPL (Read-Eval-Print Loop) — the coordinating context
//!
//! The REPL owns the sole [`UiEvent`] receiver. Background workers (the
//! stream session, the animation timer, the catalog fetch) never touch
//! display state; everything they produce is applied here, in arrival
//! order, which is what keeps deltas ordered and the displayed shadow
//! color consistent without locks.

use crate::output::console::ConsoleArt;
use colored::Colorize;
use glyphcast_application::ports::frame_exporter::FrameExporter;
use glyphcast_application::ports::generation_gateway::GenerationGateway;
use glyphcast_application::ports::text_renderer::TextRenderer;
use glyphcast_application::ports::ui_event::UiEvent;
use glyphcast_application::use_cases::animate::ArtworkAnimator;
use glyphcast_application::use_cases::chat::{SendError, SessionManager};
use glyphcast_application::use_cases::generate_art::GenerateArt;
use glyphcast_application::use_cases::models::refresh_models;
use glyphcast_domain::{ArtworkDocument, FontId, Model, Rgb};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Static wiring options for the REPL.
#[derive(Debug, Clone)]
pub struct ReplOptions {
    pub font: FontId,
    pub foreground: Rgb,
    pub shadow: Rgb,
    pub animation_enabled: bool,
    pub frame_delay: Duration,
    pub default_model: Option<Model>,
    pub show_status: bool,
    pub history_file: Option<PathBuf>,
}

/// Interactive chat and art REPL
pub struct ChatRepl<G, R, E>
where
    G: GenerationGateway + 'static,
    R: TextRenderer,
    E: FrameExporter,
{
    gateway: Arc<G>,
    art: GenerateArt<R>,
    exporter: Arc<E>,
    sessions: SessionManager<G>,
    animator: ArtworkAnimator,
    events: mpsc::UnboundedReceiver<UiEvent>,
    events_tx: mpsc::UnboundedSender<UiEvent>,
    options: ReplOptions,

    // Display state, mutated only from this coordinating context.
    document: Option<ArtworkDocument>,
    displayed_shadow: Rgb,
    font: FontId,
    foreground: Rgb,
    shadow: Rgb,
    models: Vec<Model>,
    current_model: Option<Model>,
}

impl<G, R, E> ChatRepl<G, R, E>
where
    G: GenerationGateway + 'static,
    R: TextRenderer,
    E: FrameExporter,
{
    pub fn new(gateway: Arc<G>, renderer: Arc<R>, exporter: Arc<E>, options: ReplOptions) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        let sessions = SessionManager::new(Arc::clone(&gateway), events_tx.clone());
        let animator = ArtworkAnimator::new(events_tx.clone(), options.frame_delay);

        Self {
            gateway,
            art: GenerateArt::new(renderer),
            exporter,
            sessions,
            animator,
            events,
            events_tx,
            displayed_shadow: options.shadow,
            font: options.font.clone(),
            foreground: options.foreground,
            shadow: options.shadow,
            current_model: options.default_model.clone(),
            options,
            document: None,
            models: Vec::new(),
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.options.history_file.clone().or_else(|| {
            dirs::data_dir().map(|p| p.join("glyphcast").join("history.txt"))
        });
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();
        refresh_models(Arc::clone(&self.gateway), self.events_tx.clone());

        loop {
            // Apply anything the workers queued while we were blocked.
            self.drain_pending();

            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Some(command) = line.strip_prefix('/') {
                        if self.handle_command(command) {
                            break;
                        }
                        continue;
                    }
                    let _ = rl.add_history_entry(line);
                    self.send_chat(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err:?}");
                    break;
                }
            }
        }

        self.animator.stop();
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│           Glyphcast - Art & Chat            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Type a message to chat, or /art <text> to render.");
        println!("Commands: /art /preview /font /color /copy /export /animate /models /model /cancel /help /quit");
        println!();
    }

    async fn send_chat(&mut self, message: &str) {
        let Some(model) = self
            .current_model
            .clone()
            .or_else(|| self.models.first().cloned())
        else {
            self.error("No model available. /models to refresh the catalog.");
            return;
        };

        match self.sessions.try_send(model, message) {
            Ok(()) => self.stream_to_console().await,
            Err(SendError::SessionBusy) => {
                self.status("A response is already streaming. /cancel to stop it.");
            }
            Err(SendError::EmptyInput) => self.error("Please enter some text first."),
        }
    }

    /// Drain events until the in-flight stream reaches a terminal event.
    /// Ctrl-C cancels the stream; draining continues until the terminal
    /// event arrives so it is applied exactly once.
    async fn stream_to_console(&mut self) {
        print!("{} ", "ai>".bold());
        let _ = std::io::stdout().flush();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    self.sessions.cancel_active();
                }
                event = self.events.recv() => match event {
                    Some(event) => {
                        if self.apply(event) {
                            return;
                        }
                    }
                    None => return,
                }
            }
        }
    }

    /// Apply one event to the display. Returns true when the event was the
    /// in-flight stream's terminal signal.
    fn apply(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::ChatDelta(text) => {
                print!("{text}");
                let _ = std::io::stdout().flush();
                false
            }
            UiEvent::ChatDone => {
                println!();
                println!();
                true
            }
            UiEvent::ChatCancelled => {
                println!();
                self.status("Response cancelled.");
                true
            }
            UiEvent::ChatError { message } => {
                println!();
                self.error(&message);
                true
            }
            UiEvent::ChunkSkipped { reason } => {
                self.status(&format!("Skipped one malformed chunk ({reason})"));
                false
            }
            UiEvent::ModelsLoaded(models) => {
                if self.current_model.is_none() {
                    self.current_model = models.first().cloned();
                }
                self.status(&format!(
                    "{} model(s) available{}",
                    models.len(),
                    self.current_model
                        .as_ref()
                        .map(|m| format!(", using {m}"))
                        .unwrap_or_default()
                ));
                self.models = models;
                false
            }
            UiEvent::ModelsError { message } => {
                self.status(&message);
                false
            }
            UiEvent::ShadowTick(color) => {
                // Only the displayed shade changes; the document keeps its
                // base shadow color.
                self.displayed_shadow = color;
                false
            }
            UiEvent::Status(message) => {
                self.status(&message);
                false
            }
        }
    }

    fn drain_pending(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
        }
    }

    /// Handle a slash command (leading slash stripped). Returns true to
    /// exit.
    fn handle_command(&mut self, command: &str) -> bool {
        let (name, rest) = match command.split_once(' ') {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        match name {
            "quit" | "exit" | "q" => {
                println!("Bye!");
                return true;
            }
            "help" | "h" | "?" => self.print_help(),
            "art" => self.command_art(rest),
            "preview" => self.command_preview(),
            "font" => self.command_font(rest),
            "color" => self.command_color(rest),
            "copy" => self.command_copy(),
            "export" => self.command_export(rest),
            "animate" => self.command_animate(rest),
            "models" => {
                self.status("Refreshing model catalog...");
                refresh_models(Arc::clone(&self.gateway), self.events_tx.clone());
            }
            "model" => self.command_model(rest),
            "cancel" => {
                // A no-op when nothing is streaming, by contract.
                self.sessions.cancel_active();
                self.status("Cancel requested.");
            }
            _ => {
                println!("Unknown command: /{name}");
                println!("Type /help for available commands");
            }
        }
        false
    }

    fn print_help(&self) {
        println!();
        println!("Commands:");
        println!("  /art <text>          - Render text as block art");
        println!("  /preview             - Preview the current font");
        println!("  /font <name>         - Select a font face");
        println!("  /color <fg> <shadow> - Recolor, e.g. /color #3B82F6 #1E40AF");
        println!("  /copy                - Print the art as plain text");
        println!("  /export <path>       - Save an animated GIF");
        println!("  /animate on|off      - Toggle the live shadow pulse");
        println!("  /models              - Refresh the model catalog");
        println!("  /model <name>        - Select the chat model");
        println!("  /cancel              - Cancel the streaming response");
        println!("  /quit                - Exit");
        println!();
    }

    fn command_art(&mut self, text: &str) {
        match self.art.generate(text, &self.font, self.foreground, self.shadow) {
            Ok(document) => {
                // A new document restarts the animation cycle.
                self.animator.stop();
                self.animator.reset();
                self.displayed_shadow = document.shadow();
                if self.options.animation_enabled {
                    self.animator.start(document.shadow());
                }
                self.print_art(&document);
                self.document = Some(document);
                self.status(&format!("Generated with the {} font", self.font));
            }
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn command_preview(&mut self) {
        // Shown, but not kept as the current document.
        let preview = self.art.preview(&self.font, self.foreground, self.shadow);
        self.print_art(&preview);
        self.status(&format!("Font preview: {}", self.font));
    }

    fn command_font(&mut self, name: &str) {
        if name.is_empty() {
            self.error("Usage: /font <name>");
            return;
        }
        self.font = FontId::new(name);
        self.status(&format!("Font set to {}", self.font));
    }

    fn command_color(&mut self, args: &str) {
        let mut parts = args.split_whitespace();
        let (Some(fg), Some(sh)) = (parts.next(), parts.next()) else {
            self.error("Usage: /color <fg> <shadow>, e.g. /color #3B82F6 #1E40AF");
            return;
        };
        match (Rgb::from_hex(fg), Rgb::from_hex(sh)) {
            (Ok(foreground), Ok(shadow)) => {
                self.foreground = foreground;
                self.shadow = shadow;
                self.displayed_shadow = shadow;
                if let Some(document) = self.document.as_mut() {
                    document.recolor(foreground, shadow);
                }
                // Restart the pulse against the new base shade.
                if self.animator.is_live() {
                    self.animator.stop();
                    self.animator.start(shadow);
                }
                if let Some(document) = self.document.clone() {
                    self.print_art(&document);
                }
                self.status("Colors updated.");
            }
            _ => self.error("Colors must be #RRGGBB."),
        }
    }

    fn command_copy(&mut self) {
        match &self.document {
            Some(document) => {
                print!("{}", document.plain_text());
                self.status("Plain text printed above.");
            }
            None => self.status("No art to copy."),
        }
    }

    fn command_export(&mut self, path: &str) {
        if path.is_empty() {
            self.error("Usage: /export <path>");
            return;
        }
        let Some(document) = self.document.clone() else {
            self.error("Nothing to export. /art <text> first.");
            return;
        };
        let frames = self.animator.export_frames(&document);
        match self.exporter.export(
            &document,
            &frames,
            self.options.frame_delay,
            std::path::Path::new(path),
        ) {
            Ok(()) => self.status(&format!("Saved {path}")),
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn command_animate(&mut self, arg: &str) {
        match arg {
            "on" => {
                self.options.animation_enabled = true;
                if let Some(document) = &self.document {
                    self.animator.start(document.shadow());
                }
                self.status("Animation on");
            }
            "off" => {
                self.options.animation_enabled = false;
                self.animator.stop();
                self.status("Animation off");
            }
            _ => self.error("Usage: /animate on|off"),
        }
    }

    fn command_model(&mut self, name: &str) {
        if name.is_empty() {
            match &self.current_model {
                Some(model) => self.status(&format!("Current model: {model}")),
                None => self.status("No model selected."),
            }
            return;
        }
        self.current_model = Some(Model::new(name));
        self.status(&format!("Model set to {name}"));
    }

    fn print_art(&self, document: &ArtworkDocument) {
        println!();
        print!("{}", ConsoleArt::render(document, self.displayed_shadow));
        println!();
    }

    fn status(&self, message: &str) {
        if self.options.show_status {
            println!("{}", message.dimmed());
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }
}
