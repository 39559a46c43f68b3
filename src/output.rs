//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::Colorize;
use serde::Serialize;

use crate::core::models::{Modification, ModifiedAction};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of a poll operation
#[derive(Debug, Serialize)]
pub struct PollResult {
    /// Material name
    pub material: String,
    /// Plugin that served the poll
    pub plugin_id: String,
    /// Modifications found, in plugin order
    pub modifications: Vec<Modification>,
}

/// Result of listing plugins
#[derive(Debug, Serialize)]
pub struct PluginListResult {
    /// Registered plugin ids
    pub plugins: Vec<String>,
}

fn action_tag(action: ModifiedAction) -> String {
    let tag = format!("{:>8}", action.to_string());
    match action {
        ModifiedAction::Added => tag.green().to_string(),
        ModifiedAction::Modified => tag.yellow().to_string(),
        ModifiedAction::Deleted => tag.red().to_string(),
        ModifiedAction::Unknown => tag.dimmed().to_string(),
    }
}

impl PollResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        if self.modifications.is_empty() {
            println!("No new revisions for {} ({}).", self.material, self.plugin_id);
            return;
        }

        println!(
            "{} revision(s) for {} ({}):\n",
            self.modifications.len(),
            self.material,
            self.plugin_id
        );
        for m in &self.modifications {
            println!("{} {}", "revision".bold(), m.revision);
            println!("  Author: {}", m.user_name.as_deref().unwrap_or("(unknown)"));
            println!("  Date:   {}", m.modified_time.to_rfc3339());
            if let Some(comment) = m.comment.as_deref() {
                for line in comment.lines() {
                    println!("    {line}");
                }
            }
            for file in &m.modified_files {
                println!("  {} {}", action_tag(file.action), file.file_name);
            }
            println!();
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

impl PluginListResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                if self.plugins.is_empty() {
                    println!("No plugins registered.");
                }
                for id in &self.plugins {
                    println!("{id}");
                }
            },
            OutputMode::Json => {
                println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
            },
        }
    }
}
