//! CLI module for the diaglab application
//!
//! This module handles terminal interaction: dispatching commands to the
//! session and collection stores, rendering output, confirmation prompts,
//! and the editor round-trip for diagram source.
use std::{
    fs::{self, read_to_string},
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::Command,
    str::FromStr,
    sync::Arc,
};

use chrono::{DateTime, Utc};
use console::{style, Term};
use log::{debug, info};
use shell_words::split;
use tempfile::Builder;

use crate::{
    collection_stats, most_recent, starter_code, type_description, Commands, Config, DiaglabError,
    Diagram, DiagramApi, DiagramCreateRequest, DiagramPatch, DiagramStore, DiagramType,
    ExportFormat, ExportOptions, GenerateRequest, ListFilter, NotificationCenter,
    NotificationKind, Result, SessionStore, SortKey,
};

/// Largest diagram source file accepted from disk, matching the service's
/// request size cap.
const MAX_SOURCE_BYTES: u64 = 1024 * 1024;

/// CLI application handler - processes commands and interfaces with the
/// session and collection stores
pub struct App {
    /// Client-side collection state and remote operations
    store: DiagramStore,

    /// The persisted session: token and user record
    session: SessionStore,

    /// Notifications produced while handling a command
    notifier: NotificationCenter,

    /// Application configuration
    config: Config,

    /// Where the configuration was loaded from
    config_path: PathBuf,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Builds the application: restores any stored session and wires the
    /// collection store to the HTTP backend using that session's token.
    pub fn new(config: Config, config_path: PathBuf, verbose: bool) -> Self {
        let notifier = NotificationCenter::new();

        let mut session = SessionStore::new(&config);
        session.restore();

        let token = session.token().unwrap_or("").to_string();
        let backend = Arc::new(DiagramApi::new(config.api_url.clone(), token));
        let store = DiagramStore::new(backend, notifier.clone());

        Self {
            store,
            session,
            notifier,
            config,
            config_path,
            verbose,
        }
    }

    /// Runs a single command and then flushes whatever notifications it
    /// produced, whether it succeeded or not.
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        let outcome = self.dispatch(command).await;
        self.render_notifications();
        outcome
    }

    async fn dispatch(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login { email, password } => self.handle_login(email, password).await,

            Commands::Register {
                name,
                email,
                password,
            } => self.handle_register(name, email, password).await,

            Commands::Logout => self.handle_logout(),

            Commands::Whoami { json } => self.handle_whoami(json),

            Commands::Demo => self.handle_demo().await,

            Commands::Dashboard { json } => self.handle_dashboard(json).await,

            Commands::List {
                search,
                diagram_type,
                sort,
                page,
                limit,
                json,
            } => {
                self.handle_list(search, diagram_type, sort, page, limit, json)
                    .await
            }

            Commands::Show { id, json, code } => self.handle_show(id, json, code).await,

            Commands::Generate {
                diagram_type,
                code,
                file,
            } => self.handle_generate(diagram_type, code, file).await,

            Commands::Create {
                title,
                description,
                diagram_type,
                code,
                file,
                edit,
            } => {
                self.handle_create(title, description, diagram_type, code, file, edit)
                    .await
            }

            Commands::Edit {
                id,
                title,
                description,
                code,
                file,
                edit,
            } => {
                self.handle_edit(id, title, description, code, file, edit)
                    .await
            }

            Commands::Delete { id, force } => self.handle_delete(id, force).await,

            Commands::Export {
                id,
                format,
                output,
                width,
                height,
                quality,
            } => {
                self.handle_export(id, format, output, width, height, quality)
                    .await
            }

            Commands::Validate {
                diagram_type,
                code,
                file,
            } => self.handle_validate(diagram_type, code, file).await,

            Commands::Import { url, output } => self.handle_import(url, output).await,

            Commands::Template { diagram_type } => self.handle_template(diagram_type),

            Commands::Config { show, set, reset } => self.handle_config(show, set, reset),
        }
    }

    async fn handle_login(&mut self, email: String, password: Option<String>) -> Result<()> {
        let password = match password {
            Some(password) => password,
            None => self.prompt_password("Password: ")?,
        };

        match self.session.login(&email, &password).await {
            Ok(auth) => {
                println!(
                    "Signed in as {} <{}>",
                    style(&auth.user.name).bold(),
                    auth.user.email
                );
                Ok(())
            }
            Err(e) => {
                self.notify_auth_failure("Sign-in failed", &e);
                Err(e)
            }
        }
    }

    async fn handle_register(
        &mut self,
        name: String,
        email: String,
        password: Option<String>,
    ) -> Result<()> {
        let password = match password {
            Some(password) => password,
            None => self.prompt_password("Choose a password: ")?,
        };

        match self.session.register(&name, &email, &password).await {
            Ok(response) => {
                self.notifier.success("Account created", response.message);
                println!("Run `diaglab login {}` to sign in.", email);
                Ok(())
            }
            Err(e) => {
                self.notify_auth_failure("Registration failed", &e);
                Err(e)
            }
        }
    }

    fn handle_logout(&mut self) -> Result<()> {
        if !self.session.is_authenticated() {
            println!("No session to discard.");
            return Ok(());
        }

        self.session.logout();
        println!("Signed out.");
        Ok(())
    }

    fn handle_whoami(&self, json: bool) -> Result<()> {
        let user = self.session.user().ok_or(DiaglabError::NoSession)?;

        if json {
            println!("{}", serde_json::to_string_pretty(user)?);
            return Ok(());
        }

        println!("Name:  {}", style(&user.name).bold());
        println!("Email: {}", user.email);
        println!("ID:    {}", user.user_id);
        if self.session.is_demo() {
            println!("\n{}", style("This is the offline demo identity.").yellow());
        }
        Ok(())
    }

    async fn handle_demo(&mut self) -> Result<()> {
        let auth = self.session.login_as_demo()?;
        self.populate_collection(1, self.config.page_size).await?;

        println!(
            "Demo session started for {} with {} sample diagrams.",
            style(&auth.user.name).bold(),
            self.store.diagrams().len()
        );
        println!("Run `diaglab list` to browse them; sign in with a real account to save changes.");
        Ok(())
    }

    async fn handle_dashboard(&mut self, json: bool) -> Result<()> {
        self.populate_collection(1, self.config.page_size).await?;

        let now = Utc::now();
        let stats = collection_stats(self.store.diagrams(), now);
        let recent = most_recent(self.store.diagrams(), 6);

        if json {
            let payload = serde_json::json!({
                "total": stats.total,
                "created_this_week": stats.created_this_week,
                "most_used_type": stats.most_used_type,
                "recent": recent,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(());
        }

        println!("{}", style("Collection overview").bold());
        println!("Total diagrams:    {}", stats.total);
        println!("Created this week: {}", stats.created_this_week);
        match stats.most_used_type {
            Some(most_used) => println!("Most used type:    {}", most_used.label()),
            None => println!("Most used type:    -"),
        }

        if !recent.is_empty() {
            println!("\n{}", style("Recent activity").bold());
            for diagram in &recent {
                println!(
                    "  {} ({}, updated {})",
                    style(&diagram.title).bold(),
                    diagram.diagram_type.label(),
                    relative_time(diagram.updated_at, now)
                );
            }
        }
        Ok(())
    }

    async fn handle_list(
        &mut self,
        search: Option<String>,
        diagram_type: Option<String>,
        sort: String,
        page: u32,
        limit: Option<u32>,
        json: bool,
    ) -> Result<()> {
        let limit = limit.unwrap_or(self.config.page_size);
        self.populate_collection(page, limit).await?;

        let filter = ListFilter {
            search,
            diagram_type: diagram_type.as_deref().map(parse_type).transpose()?,
            sort: parse_sort(&sort)?,
        };
        let visible = filter.apply(self.store.diagrams());

        if json {
            println!("{}", serde_json::to_string_pretty(&visible)?);
            return Ok(());
        }

        if visible.is_empty() {
            println!("No diagrams found matching the criteria.");
            return Ok(());
        }

        self.display_diagrams_text(&visible);

        // Print count at the end
        println!(
            "\nFound {} diagram{}",
            visible.len(),
            if visible.len() == 1 { "" } else { "s" }
        );
        Ok(())
    }

    async fn handle_show(&mut self, id: String, json: bool, code: bool) -> Result<()> {
        let diagram = self.lookup(&id).await?;

        if code {
            println!("{}", diagram.code);
            return Ok(());
        }
        if json {
            println!("{}", serde_json::to_string_pretty(&diagram)?);
            return Ok(());
        }

        self.display_diagram_detail(&diagram);
        Ok(())
    }

    async fn handle_generate(
        &mut self,
        diagram_type: String,
        code: Option<String>,
        file: Option<PathBuf>,
    ) -> Result<()> {
        self.session.require_token()?;
        let diagram_type = parse_type(&diagram_type)?;

        let source = match self.gather_source(code, file)? {
            Some(source) => source,
            None => self.open_editor_with_source(starter_code(diagram_type), diagram_type)?,
        };

        let request = GenerateRequest {
            code: source,
            diagram_type,
        };
        match self.store.generate(request).await? {
            Some(preview) => println!("Preview ready: {}", style(&preview.image_url).cyan()),
            None => self.explain_discarded_preview(),
        }
        Ok(())
    }

    async fn handle_create(
        &mut self,
        title: String,
        description: Option<String>,
        diagram_type: String,
        code: Option<String>,
        file: Option<PathBuf>,
        edit: bool,
    ) -> Result<()> {
        self.session.require_token()?;
        let diagram_type = parse_type(&diagram_type)?;

        let gathered = self.gather_source(code, file)?;
        let source = match (gathered, edit) {
            (Some(source), false) => source,
            (Some(source), true) => self.open_editor_with_source(&source, diagram_type)?,
            (None, _) => self.open_editor_with_source(starter_code(diagram_type), diagram_type)?,
        };

        // A save needs a rendered preview first
        let request = GenerateRequest {
            code: source.clone(),
            diagram_type,
        };
        let preview = match self.store.generate(request).await? {
            Some(preview) => preview,
            None => {
                self.explain_discarded_preview();
                return Ok(());
            }
        };

        if preview.image_url.trim().is_empty() {
            self.notifier.warning(
                "Nothing to save",
                "the service did not return a rendered image for this source",
            );
            return Err(DiaglabError::Validation {
                message: "generation produced no image".to_string(),
            });
        }

        println!("Preview ready: {}", style(&preview.image_url).cyan());

        let created = self
            .store
            .create(DiagramCreateRequest {
                title,
                description,
                diagram_type,
                code: source,
            })
            .await?;

        println!(
            "Diagram '{}' created with ID: {}",
            style(&created.title).bold(),
            created.id
        );
        Ok(())
    }

    async fn handle_edit(
        &mut self,
        id: String,
        title: Option<String>,
        description: Option<String>,
        code: Option<String>,
        file: Option<PathBuf>,
        edit: bool,
    ) -> Result<()> {
        self.session.require_token()?;

        let gathered = self.gather_source(code, file)?;

        // With no field changes at all, fall back to editing the source
        let open_editor = edit || (gathered.is_none() && title.is_none() && description.is_none());

        let new_code = if open_editor {
            let current = self.lookup(&id).await?;
            let initial = gathered.unwrap_or_else(|| current.code.clone());
            Some(self.open_editor_with_source(&initial, current.diagram_type)?)
        } else {
            gathered
        };

        let patch = DiagramPatch {
            title,
            description,
            code: new_code,
            ..Default::default()
        };

        if patch.is_empty() {
            println!("Nothing to change.");
            return Ok(());
        }

        let updated = self.store.update(&id, patch).await?;
        println!(
            "Diagram '{}' updated successfully",
            style(&updated.title).bold()
        );
        Ok(())
    }

    async fn handle_delete(&mut self, id: String, force: bool) -> Result<()> {
        self.session.require_token()?;

        if !force {
            // Fetch first so the prompt can show what is about to go
            let diagram = self.lookup(&id).await?;

            println!("You are about to delete the following diagram:");
            println!("ID:      {}", diagram.id);
            println!("Title:   {}", diagram.title);
            println!("Type:    {}", diagram.diagram_type.label());
            println!("Updated: {}", diagram.updated_at.format("%Y-%m-%d %H:%M"));

            println!("\nThis action cannot be undone!");
            print!("Are you sure you want to delete this diagram? [y/N]: ");
            stdout().flush()?;

            let mut input = String::new();
            stdin().read_line(&mut input)?;

            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        self.store.remove(&id).await?;
        println!("Diagram {} has been permanently deleted.", id);
        Ok(())
    }

    async fn handle_export(
        &mut self,
        id: String,
        format: String,
        output: Option<PathBuf>,
        width: Option<u32>,
        height: Option<u32>,
        quality: Option<u8>,
    ) -> Result<()> {
        self.session.require_token()?;
        let format = parse_format(&format)?;

        let output = match output {
            Some(path) => path,
            None => {
                let diagram = self.lookup(&id).await?;
                PathBuf::from(default_export_name(&diagram.title, format))
            }
        };

        let options = ExportOptions {
            format,
            quality,
            width,
            height,
        };
        let bytes = self.store.export(&id, &options).await?;

        fs::write(&output, &bytes)?;
        println!("Exported {} bytes to {}", bytes.len(), output.display());
        Ok(())
    }

    async fn handle_validate(
        &mut self,
        diagram_type: String,
        code: Option<String>,
        file: Option<PathBuf>,
    ) -> Result<()> {
        self.session.require_token()?;
        let diagram_type = parse_type(&diagram_type)?;

        let source = match self.gather_source(code, file)? {
            Some(source) => source,
            None => self.open_editor_with_source(starter_code(diagram_type), diagram_type)?,
        };

        let report = self
            .store
            .validate(GenerateRequest {
                code: source,
                diagram_type,
            })
            .await?;

        if report.valid {
            println!("{} The source is valid.", style("✓").green());
            Ok(())
        } else {
            println!("{} The source has problems:", style("✗").red());
            for problem in report.errors.unwrap_or_default() {
                println!("  - {}", problem);
            }
            Err(DiaglabError::Validation {
                message: "the source failed validation".to_string(),
            })
        }
    }

    async fn handle_import(&mut self, url: String, output: Option<PathBuf>) -> Result<()> {
        self.session.require_token()?;

        let source = self.store.fetch_source(&url).await?;
        info!("Fetched {} ({} bytes)", source.filename, source.code.len());

        match output {
            Some(path) => {
                fs::write(&path, &source.code)?;
                println!("Wrote {} to {}", source.filename, path.display());
            }
            None => println!("{}", source.code),
        }
        Ok(())
    }

    fn handle_template(&self, diagram_type: Option<String>) -> Result<()> {
        match diagram_type {
            Some(raw) => {
                let diagram_type = parse_type(&raw)?;
                println!("{}", starter_code(diagram_type));
            }
            None => {
                for diagram_type in DiagramType::ALL {
                    println!(
                        "{}  {}",
                        style(format!("{:<8}", diagram_type.as_str())).bold(),
                        diagram_type.label()
                    );
                    println!("          {}", type_description(diagram_type));
                    println!();
                }
            }
        }
        Ok(())
    }

    fn handle_config(&mut self, show: bool, set: Option<String>, reset: bool) -> Result<()> {
        let no_action = !show && !reset && set.is_none();

        if reset {
            self.config = Config::default();
            self.config.save(&self.config_path)?;
            println!("Configuration reset to defaults.");
        }

        if let Some(assignment) = set {
            self.config.set(&assignment)?;
            self.config.save(&self.config_path)?;
            println!("Configuration updated: {}", assignment);
        }

        if show || no_action {
            println!("Configuration file: {}", self.config_path.display());
            println!("{}", serde_json::to_string_pretty(&self.config)?);
        }
        Ok(())
    }

    /// Fills the collection for the active session: the demo identity gets
    /// the canned set, everyone else a page from the service.
    async fn populate_collection(&mut self, page: u32, limit: u32) -> Result<()> {
        if self.store.load_demo_fallback(self.session.user()) {
            return Ok(());
        }

        self.session.require_token()?;
        debug!("Requesting collection page {} (limit {})", page, limit);
        self.store.load(page, limit).await?;
        Ok(())
    }

    /// Resolves a diagram id: remote fetch normally, the canned set for
    /// the demo identity.
    async fn lookup(&mut self, id: &str) -> Result<Diagram> {
        if self.session.is_demo() {
            self.populate_collection(1, self.config.page_size).await?;
            return self
                .store
                .diagrams()
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .ok_or_else(|| DiaglabError::ApplicationError {
                    message: format!("No diagram {} in the demo collection", id),
                });
        }

        self.session.require_token()?;
        self.store.fetch(id).await
    }

    /// Resolves diagram source from the command line: inline code wins,
    /// then a file. `None` means the caller should fall back to the editor.
    fn gather_source(&self, code: Option<String>, file: Option<PathBuf>) -> Result<Option<String>> {
        match (code, file) {
            (Some(_), Some(_)) => Err(DiaglabError::ApplicationError {
                message: "Cannot specify both --code and --file options".to_string(),
            }),
            (Some(code), None) => Ok(Some(code)),
            (None, Some(path)) => self.read_source_file(&path).map(Some),
            (None, None) => Ok(None),
        }
    }

    fn read_source_file(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(DiaglabError::FileNotFound {
                file_path: path.display().to_string(),
            });
        }

        if !path.is_file() {
            return Err(DiaglabError::ApplicationError {
                message: format!("Not a file: {}", path.display()),
            });
        }

        if path.metadata()?.len() > MAX_SOURCE_BYTES {
            let message = format!("{} exceeds the 1 MB source limit", path.display());
            self.notifier.warning("File too large", message.clone());
            return Err(DiaglabError::Validation { message });
        }

        Ok(read_to_string(path)?)
    }

    fn open_editor_with_source(&self, initial: &str, diagram_type: DiagramType) -> Result<String> {
        // Pick an extension the editor can map to syntax highlighting
        let temp_file = Builder::new()
            .suffix(source_suffix(diagram_type))
            .tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        fs::write(&temp_path, initial)?;

        let editor_cmd = self.config.get_editor_command();

        info!("Opening editor to write diagram source. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        Ok(read_to_string(&temp_path)?)
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        // Handle shell-like command parsing
        let args = split(editor_cmd).map_err(|e| DiaglabError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(DiaglabError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program).args(rest).arg(file_path).status()?;
        if !status.success() {
            return Err(DiaglabError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }
        Ok(())
    }

    fn prompt_password(&self, label: &str) -> Result<String> {
        let term = Term::stderr();
        term.write_str(label)?;

        let password = term.read_secure_line()?;
        if password.is_empty() {
            return Err(DiaglabError::Validation {
                message: "password must not be empty".to_string(),
            });
        }
        Ok(password)
    }

    fn notify_auth_failure(&self, title: &str, error: &DiaglabError) {
        let message = match error {
            DiaglabError::Transport(_) => "could not reach the authentication service".to_string(),
            DiaglabError::Api { message } => message.clone(),
            other => other.to_string(),
        };
        self.notifier.error(title, message);
    }

    /// Makes a withheld preview visible; the store itself stays silent when
    /// a newer request supersedes an older one.
    fn explain_discarded_preview(&self) {
        self.notifier.info(
            "Preview discarded",
            "a newer generation request superseded this one",
        );
    }

    /// Display diagrams in text format
    fn display_diagrams_text(&self, diagrams: &[Diagram]) {
        // Use terminal width for formatting if available
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);
        let now = Utc::now();

        for (i, diagram) in diagrams.iter().enumerate() {
            // Add separator between diagrams (except before the first)
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            println!(
                "ID: {} | Updated: {}",
                diagram.id,
                relative_time(diagram.updated_at, now)
            );
            println!("Title: {}", style(&diagram.title).bold());
            println!("Type: {}", style(diagram.diagram_type.label()).cyan());

            if self.verbose && !diagram.image_url.is_empty() {
                println!("Image: {}", diagram.image_url);
            }

            if let Some(description) = &diagram.description {
                let preview = preview_line(description, 100);
                if !preview.is_empty() {
                    println!("\n{}", preview);
                }
            }
        }
    }

    fn display_diagram_detail(&self, diagram: &Diagram) {
        let now = Utc::now();

        println!("ID:      {}", diagram.id);
        println!("Title:   {}", style(&diagram.title).bold());
        println!("Type:    {}", style(diagram.diagram_type.label()).cyan());
        if let Some(description) = &diagram.description {
            println!("About:   {}", description);
        }
        println!(
            "Created: {} ({})",
            diagram.created_at.format("%Y-%m-%d %H:%M"),
            relative_time(diagram.created_at, now)
        );
        println!(
            "Updated: {} ({})",
            diagram.updated_at.format("%Y-%m-%d %H:%M"),
            relative_time(diagram.updated_at, now)
        );
        if !diagram.image_url.is_empty() {
            println!("Image:   {}", style(&diagram.image_url).cyan());
        }

        println!("\n{}", diagram.code);
    }

    /// Prints every queued notification to stderr, oldest first. Status
    /// lines go to stderr so stdout stays clean for data output.
    fn render_notifications(&self) {
        for notification in self.notifier.drain() {
            let glyph = match notification.kind {
                NotificationKind::Success => style("✓").green(),
                NotificationKind::Error => style("✗").red(),
                NotificationKind::Warning => style("!").yellow(),
                NotificationKind::Info => style("i").blue(),
            };
            eprintln!(
                "{} {}: {}",
                glyph,
                style(&notification.title).bold(),
                notification.message
            );
        }
    }
}

fn parse_type(raw: &str) -> Result<DiagramType> {
    DiagramType::from_str(raw).map_err(|message| DiaglabError::ApplicationError { message })
}

fn parse_sort(raw: &str) -> Result<SortKey> {
    SortKey::from_str(raw).map_err(|message| DiaglabError::ApplicationError { message })
}

fn parse_format(raw: &str) -> Result<ExportFormat> {
    ExportFormat::from_str(raw).map_err(|message| DiaglabError::ApplicationError { message })
}

/// Temp-file extension per source language, so editors pick up the right
/// syntax mode.
fn source_suffix(diagram_type: DiagramType) -> &'static str {
    match diagram_type {
        DiagramType::Aws => ".py",
        DiagramType::Er => ".er",
        DiagramType::Json => ".json",
        DiagramType::Mermaid => ".mmd",
        DiagramType::Sql => ".sql",
    }
}

/// Derives a file name from the diagram title, like "my-diagram.png".
fn default_export_name(title: &str, format: ExportFormat) -> String {
    let mut stem = String::new();
    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() {
            stem.push(c);
        } else if !stem.ends_with('-') {
            stem.push('-');
        }
    }

    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        format!("diagram.{}", format.extension())
    } else {
        format!("{}.{}", stem, format.extension())
    }
}

/// First non-empty line of a text, truncated to `max_chars` characters.
fn preview_line(text: &str, max_chars: usize) -> String {
    let first_line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

/// Formats a timestamp as a coarse age relative to `now`, bucketed at day
/// resolution.
fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - timestamp).num_days();

    if days <= 0 {
        "today".to_string()
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        format!("{} days ago", days)
    } else if days < 30 {
        let weeks = days / 7;
        if weeks == 1 {
            "1 week ago".to_string()
        } else {
            format!("{} weeks ago", weeks)
        }
    } else {
        let months = days / 30;
        if months == 1 {
            "1 month ago".to_string()
        } else {
            format!("{} months ago", months)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rstest::rstest;
    use tempfile::tempdir;

    use super::*;

    fn app_in(dir: &Path) -> App {
        // nothing listens on port 9, so a stray remote call fails fast
        let config = Config {
            state_dir: dir.to_path_buf(),
            api_url: "http://127.0.0.1:9".to_string(),
            auth_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        App::new(config, dir.join("config.json"), false)
    }

    #[rstest]
    #[case(0, "today")]
    #[case(1, "yesterday")]
    #[case(3, "3 days ago")]
    #[case(7, "1 week ago")]
    #[case(13, "1 week ago")]
    #[case(21, "3 weeks ago")]
    #[case(30, "1 month ago")]
    #[case(75, "2 months ago")]
    fn relative_time_buckets(#[case] days: i64, #[case] expected: &str) {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::days(days), now), expected);
    }

    #[test]
    fn relative_time_ignores_sub_day_precision() {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::hours(5), now), "today");
    }

    #[test]
    fn preview_line_skips_blank_lines_and_truncates() {
        let text = "\n\n  \nfirst real line of the description\nsecond";
        assert_eq!(preview_line(text, 100), "first real line of the description");
        assert_eq!(preview_line(text, 10), "first real...");
    }

    #[test]
    fn preview_line_is_character_boundary_safe() {
        let text = "héllö wörld with ümläuts everywhere";
        assert_eq!(preview_line(text, 7), "héllö w...");
    }

    #[test]
    fn export_names_derive_from_titles() {
        assert_eq!(
            default_export_name("AWS Web Architecture", ExportFormat::Png),
            "aws-web-architecture.png"
        );
        assert_eq!(
            default_export_name("weird  --  title!", ExportFormat::Svg),
            "weird-title.svg"
        );
        assert_eq!(default_export_name("???", ExportFormat::Pdf), "diagram.pdf");
    }

    #[test]
    fn source_suffix_matches_language() {
        assert_eq!(source_suffix(DiagramType::Aws), ".py");
        assert_eq!(source_suffix(DiagramType::Mermaid), ".mmd");
        assert_eq!(source_suffix(DiagramType::Sql), ".sql");
    }

    #[test]
    fn source_files_are_read_back_verbatim() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path());
        let path = dir.path().join("flow.mmd");
        fs::write(&path, "graph TD;\n  A-->B;").unwrap();

        let source = app.gather_source(None, Some(path)).unwrap();
        assert_eq!(source.as_deref(), Some("graph TD;\n  A-->B;"));
    }

    #[test]
    fn inline_code_and_a_file_cannot_be_combined() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path());
        let path = dir.path().join("flow.mmd");
        fs::write(&path, "graph TD;").unwrap();

        let err = app
            .gather_source(Some("graph TD;".to_string()), Some(path))
            .unwrap_err();
        assert!(matches!(err, DiaglabError::ApplicationError { .. }));
    }

    #[test]
    fn oversized_source_files_are_rejected_with_a_warning() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path());
        let path = dir.path().join("huge.mmd");
        // a sparse file is enough; only the reported length matters
        let file = fs::File::create(&path).unwrap();
        file.set_len(MAX_SOURCE_BYTES + 1).unwrap();

        let err = app.gather_source(None, Some(path)).unwrap_err();
        assert!(matches!(err, DiaglabError::Validation { .. }));

        let active = app.notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, NotificationKind::Warning);
        assert!(active[0].message.contains("1 MB"));
    }

    #[test]
    fn missing_source_files_are_reported_by_path() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path());

        let err = app
            .gather_source(None, Some(dir.path().join("absent.mmd")))
            .unwrap_err();
        match err {
            DiaglabError::FileNotFound { file_path } => assert!(file_path.contains("absent.mmd")),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn a_directory_is_not_a_source_file() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path());

        let err = app
            .gather_source(None, Some(dir.path().to_path_buf()))
            .unwrap_err();
        assert!(matches!(err, DiaglabError::ApplicationError { .. }));
    }

    #[tokio::test]
    async fn demo_ids_resolve_from_the_canned_set() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.session.login_as_demo().unwrap();

        let diagram = app.lookup("demo-1").await.unwrap();
        assert_eq!(diagram.id, "demo-1");
        assert_eq!(diagram.diagram_type, DiagramType::Aws);
    }

    #[tokio::test]
    async fn demo_edit_misses_are_answered_locally() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.session.login_as_demo().unwrap();

        // resolving the current source must not go to the network
        let err = app
            .handle_edit("demo-99".to_string(), None, None, None, None, true)
            .await
            .unwrap_err();
        match err {
            DiaglabError::ApplicationError { message } => {
                assert!(message.contains("demo collection"))
            }
            other => panic!("expected a demo-collection miss, got {other:?}"),
        }
    }

    #[test]
    fn discarded_previews_leave_a_visible_notice() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path());

        app.explain_discarded_preview();

        let active = app.notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, NotificationKind::Info);
        assert!(active[0].message.contains("superseded"));
    }
}
