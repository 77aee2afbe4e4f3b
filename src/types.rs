//! Core shared types for the diaglab application.
//!
//! This module contains the crate-wide `Result` alias and the subcommand
//! surface exposed by the binary.
use std::path::PathBuf;

use clap::Subcommand;

use crate::DiaglabError;

/// A specialized Result type for diaglab operations.
pub type Result<T> = std::result::Result<T, DiaglabError>;

/// Available subcommands for the diaglab application
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in against the diagram service and store the session locally
    Login {
        /// Email address of the account
        email: String,

        /// Password; prompted for interactively when omitted
        #[clap(short, long)]
        password: Option<String>,
    },

    /// Create a new account
    Register {
        /// Display name for the new account
        #[clap(short, long)]
        name: String,

        /// Email address for the new account
        email: String,

        /// Password; prompted for interactively when omitted
        #[clap(short, long)]
        password: Option<String>,
    },

    /// Discard the stored session
    Logout,

    /// Show the currently signed-in user
    Whoami {
        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Start an offline demo session with canned diagrams
    Demo,

    /// Show collection statistics and the most recent diagrams
    Dashboard {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// List diagrams with optional filtering
    List {
        /// Filter by a case-insensitive substring of title or description
        #[clap(short, long)]
        search: Option<String>,

        /// Filter by diagram type
        #[clap(short = 't', long = "type", value_parser = ["aws", "er", "json", "mermaid", "sql"])]
        diagram_type: Option<String>,

        /// Sort order for the listing
        #[clap(long, value_parser = ["updated", "created", "title"], default_value = "updated")]
        sort: String,

        /// Page of the collection to request
        #[clap(short, long, default_value_t = 1)]
        page: u32,

        /// Page size; defaults to the configured value
        #[clap(short = 'n', long)]
        limit: Option<u32>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// View a single diagram by ID
    Show {
        /// ID of the diagram to view
        id: String,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,

        /// Print only the diagram source code
        #[clap(short, long)]
        code: bool,
    },

    /// Render diagram source into an image without saving anything
    Generate {
        /// Diagram type of the source
        #[clap(short = 't', long = "type", value_parser = ["aws", "er", "json", "mermaid", "sql"])]
        diagram_type: String,

        /// Diagram source code
        #[clap(short, long)]
        code: Option<String>,

        /// Path to a file containing the diagram source
        #[clap(short, long)]
        file: Option<PathBuf>,
    },

    /// Generate a diagram and save it to the collection
    Create {
        /// Title of the diagram
        #[clap(short = 'T', long)]
        title: String,

        /// Optional description
        #[clap(short, long)]
        description: Option<String>,

        /// Diagram type of the source
        #[clap(short = 't', long = "type", value_parser = ["aws", "er", "json", "mermaid", "sql"])]
        diagram_type: String,

        /// Diagram source code
        #[clap(short, long)]
        code: Option<String>,

        /// Path to a file containing the diagram source
        #[clap(short, long)]
        file: Option<PathBuf>,

        /// Open the source in editor before saving
        #[clap(short, long)]
        edit: bool,
    },

    /// Edit an existing diagram
    Edit {
        /// ID of the diagram to edit
        id: String,

        /// New title for the diagram
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New description for the diagram
        #[clap(short, long)]
        description: Option<String>,

        /// New diagram source code
        #[clap(short, long)]
        code: Option<String>,

        /// Path to a file containing the new source
        #[clap(short, long)]
        file: Option<PathBuf>,

        /// Open the current source in editor before saving
        #[clap(short, long)]
        edit: bool,
    },

    /// Delete a diagram by ID
    Delete {
        /// ID of the diagram to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Download a rendered diagram to a local file
    Export {
        /// ID of the diagram to export
        id: String,

        /// Image format to request
        #[clap(short = 'F', long, value_parser = ["png", "svg", "pdf"], default_value = "png")]
        format: String,

        /// Path for the downloaded file (default derives from the title)
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Requested image width in pixels
        #[clap(long)]
        width: Option<u32>,

        /// Requested image height in pixels
        #[clap(long)]
        height: Option<u32>,

        /// Requested quality from 1 to 100
        #[clap(long)]
        quality: Option<u8>,
    },

    /// Check diagram source against the service without rendering
    Validate {
        /// Diagram type of the source
        #[clap(short = 't', long = "type", value_parser = ["aws", "er", "json", "mermaid", "sql"])]
        diagram_type: String,

        /// Diagram source code
        #[clap(short, long)]
        code: Option<String>,

        /// Path to a file containing the diagram source
        #[clap(short, long)]
        file: Option<PathBuf>,
    },

    /// Fetch diagram source from a public repository URL
    Import {
        /// Raw file URL to fetch, e.g. a github.com blob link
        url: String,

        /// Write the fetched source to this path instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Print starter source for a diagram type
    Template {
        /// Diagram type; lists all types when omitted
        #[clap(value_parser = ["aws", "er", "json", "mermaid", "sql"])]
        diagram_type: Option<String>,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Update a configuration setting
        #[clap(short, long)]
        set: Option<String>,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}
