//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the Insight CLI, including
//! rendering of a workflow's event stream.

use crate::types::Source;
use crate::workflows::{Event, EventKind};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the Insight banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}\n",
                "Insight".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!("\n   Insight v{}\n", env!("CARGO_PKG_VERSION"));
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print one workflow event as it arrives
    pub fn event(&self, event: &Event) {
        match event.kind {
            EventKind::Trace => {
                if self.colored {
                    println!("  {} {}", "…".dimmed(), event.payload.dimmed());
                } else {
                    println!("  [TRACE] {}", event.payload);
                }
            }
            EventKind::Sources => self.sources(&event.payload),
            EventKind::Chunk => {
                print!("{}", event.payload);
                io::stdout().flush().ok();
            }
            EventKind::Error => {
                println!();
                self.error(&event.payload);
            }
            EventKind::Done => {
                println!();
                if self.colored {
                    println!("\n  {} {}", "■".dimmed(), event.payload.dimmed());
                } else {
                    println!("\n  [DONE] {}", event.payload);
                }
            }
        }
    }

    fn sources(&self, payload: &str) {
        let sources: Vec<Source> = match serde_json::from_str(payload) {
            Ok(sources) => sources,
            Err(_) => {
                self.error("Received an unreadable source list");
                return;
            }
        };

        self.header("Sources");
        if sources.is_empty() {
            self.info("No sources found");
        }
        for source in &sources {
            if self.colored {
                println!(
                    "    {} {} {}",
                    format!("[{}]", source.id).bright_cyan(),
                    source.title.bright_white(),
                    source.url.dimmed()
                );
            } else {
                println!("    [{}] {} {}", source.id, source.title, source.url);
            }
        }
        println!();
    }
}
