//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling
//!
//! Every prompt has a stable key (`proceed`, `releaseTypeChoice`,
//! `selectedVersionBump`, `customVersion`, `confirm`) so answers can be
//! supplied up front through [ScriptedPrompt].

use std::io::{self, BufRead, Write};

use console::style;
use serde_json::{Map, Value};

use crate::error::{BumpError, Result};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_dry_run, display_error, display_info, display_manual_push_instruction,
    display_release_plan, display_status, display_success, display_warning, format_release_plan,
    ReleasePlan,
};

/// One option of a selection prompt
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// Value returned when selected
    pub value: String,
    pub title: String,
    pub description: Option<String>,
}

impl Choice {
    pub fn new(value: impl Into<String>, title: impl Into<String>) -> Self {
        Choice {
            value: value.into(),
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Source of answers to the release questions
pub trait Prompt {
    /// Pick one of `choices`, returning its value
    fn select(&mut self, key: &str, message: &str, choices: &[Choice], default: usize)
        -> Result<String>;

    fn confirm(&mut self, key: &str, message: &str, default: bool) -> Result<bool>;

    /// Free-form text; never empty
    fn input(&mut self, key: &str, message: &str) -> Result<String>;
}

/// Line-based prompts over any reader and writer
///
/// End of input counts as the user cancelling.
pub struct TerminalPrompt<R, W> {
    reader: R,
    writer: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin and stdout
    pub fn stdio() -> Self {
        TerminalPrompt::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        TerminalPrompt { reader, writer }
    }

    /// Consume the prompt, returning the writer
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.writer, "{}", question)?;
        self.writer.flush()?;

        let mut input = String::new();
        if self.reader.read_line(&mut input)? == 0 {
            writeln!(self.writer)?;
            return Err(BumpError::UserCancelled);
        }
        Ok(input.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn select(
        &mut self,
        _key: &str,
        message: &str,
        choices: &[Choice],
        default: usize,
    ) -> Result<String> {
        if choices.is_empty() {
            return Err(BumpError::config(format!("No choices for '{}'", message)));
        }
        let default = default.min(choices.len() - 1);

        writeln!(self.writer, "\n{}", style(message).bold())?;
        for (i, choice) in choices.iter().enumerate() {
            match &choice.description {
                Some(description) => writeln!(
                    self.writer,
                    "  {}. {} {}",
                    i + 1,
                    choice.title,
                    style(format!("- {}", description)).dim()
                )?,
                None => writeln!(self.writer, "  {}. {}", i + 1, choice.title)?,
            }
        }

        loop {
            let selection = self.ask(&format!(
                "\nSelect (1-{}) [default: {}]: ",
                choices.len(),
                default + 1
            ))?;

            if selection.is_empty() {
                return Ok(choices[default].value.clone());
            }

            // Accept either the 1-based index or the value itself
            let by_index = selection
                .parse::<usize>()
                .ok()
                .filter(|index| *index > 0 && *index <= choices.len())
                .map(|index| &choices[index - 1]);
            let by_value = choices.iter().find(|c| c.value == selection);

            if let Some(choice) = by_index.or(by_value) {
                return Ok(choice.value.clone());
            }
            writeln!(self.writer, "{}", style("Invalid selection").red())?;
        }
    }

    fn confirm(&mut self, _key: &str, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };

        loop {
            let response = self
                .ask(&format!("\n{} ({}): ", message, hint))?
                .to_lowercase();

            match response.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.writer, "{}", style("Please answer y or n").red())?,
            }
        }
    }

    fn input(&mut self, _key: &str, message: &str) -> Result<String> {
        loop {
            let response = self.ask(&format!("\n{}: ", message))?;
            if !response.is_empty() {
                return Ok(response);
            }
        }
    }
}

/// Prompt answered from a JSON object keyed by prompt name
///
/// Unanswered prompts go to the fallback when there is one. Without a
/// fallback, selections and confirmations take their default and text input
/// cancels the release.
pub struct ScriptedPrompt {
    answers: Map<String, Value>,
    fallback: Option<Box<dyn Prompt>>,
}

impl ScriptedPrompt {
    pub fn new(answers: Map<String, Value>) -> Self {
        ScriptedPrompt {
            answers,
            fallback: None,
        }
    }

    /// Parse answers such as `{"releaseTypeChoice": "beta", "confirm": true}`
    pub fn from_json(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(answers) => Ok(ScriptedPrompt::new(answers)),
            _ => Err(BumpError::config("Prompt defaults must be a JSON object")),
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn Prompt>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn answer_text(&self, key: &str) -> Result<Option<String>> {
        match self.answers.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(BumpError::config(format!(
                "Answer for '{}' must be a string, got {}",
                key, other
            ))),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn select(
        &mut self,
        key: &str,
        message: &str,
        choices: &[Choice],
        default: usize,
    ) -> Result<String> {
        if let Some(answer) = self.answer_text(key)? {
            tracing::debug!(key, answer = %answer, "using scripted answer");
            return choices
                .iter()
                .find(|c| c.value == answer)
                .map(|c| c.value.clone())
                .ok_or_else(|| {
                    let valid: Vec<&str> = choices.iter().map(|c| c.value.as_str()).collect();
                    BumpError::config(format!(
                        "Invalid answer '{}' for '{}', expected one of: {}",
                        answer,
                        key,
                        valid.join(", ")
                    ))
                });
        }

        match self.fallback.as_mut() {
            Some(fallback) => fallback.select(key, message, choices, default),
            None => choices
                .get(default)
                .or_else(|| choices.first())
                .map(|c| c.value.clone())
                .ok_or_else(|| BumpError::config(format!("No choices for '{}'", key))),
        }
    }

    fn confirm(&mut self, key: &str, message: &str, default: bool) -> Result<bool> {
        match self.answers.get(key) {
            Some(Value::Bool(answer)) => return Ok(*answer),
            Some(Value::String(s)) => {
                return match s.to_lowercase().as_str() {
                    "y" | "yes" | "true" => Ok(true),
                    "n" | "no" | "false" => Ok(false),
                    _ => Err(BumpError::config(format!(
                        "Answer for '{}' must be a boolean, got '{}'",
                        key, s
                    ))),
                };
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                return Err(BumpError::config(format!(
                    "Answer for '{}' must be a boolean, got {}",
                    key, other
                )))
            }
        }

        match self.fallback.as_mut() {
            Some(fallback) => fallback.confirm(key, message, default),
            None => Ok(default),
        }
    }

    fn input(&mut self, key: &str, message: &str) -> Result<String> {
        if let Some(answer) = self.answer_text(key)? {
            return Ok(answer);
        }

        match self.fallback.as_mut() {
            Some(fallback) => fallback.input(key, message),
            None => Err(BumpError::UserCancelled),
        }
    }
}
