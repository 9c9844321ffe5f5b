//! User input sources
//!
//! The interactive menu never reads the terminal directly. It asks a
//! [`Prompt`], which is backed by `dialoguer` in the binary
//! ([`TerminalPrompt`]) and by a queue of canned answers in tests
//! ([`ScriptedPrompt`]).

use crate::core::error::{OrganizerError, Result};
use dialoguer::{Confirm, Input, Select};
use std::collections::VecDeque;

/// A source of user answers
pub trait Prompt {
    /// Choose one of `items`, returning its index
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize>;

    /// Read a line of text; an empty answer yields `default` when given
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Ask a yes/no question
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

fn input_error(e: dialoguer::Error) -> OrganizerError {
    OrganizerError::Prompt(format!("Failed to read input: {}", e))
}

/// Interactive terminal prompts
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(input_error)
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .map(|s| s.trim().to_string())
            .map_err(input_error)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(input_error)
    }
}

/// Canned answers, consumed in order
///
/// `select` answers are 0-based indexes or the exact item text; `confirm`
/// answers are `y`/`yes`/`n`/`no`. Running out of answers is an error, so a
/// test can't hang waiting for input.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    /// Every prompt shown, in order
    pub transcript: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<String> {
        self.transcript.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| OrganizerError::Prompt(format!("No scripted answer for '{}'", prompt)))
    }
}

impl Prompt for ScriptedPrompt {
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize> {
        let answer = self.next(prompt)?;
        if let Some(idx) = items.iter().position(|item| *item == answer) {
            return Ok(idx);
        }
        match answer.parse::<usize>() {
            Ok(idx) if idx < items.len() => Ok(idx),
            _ => Err(OrganizerError::Prompt(format!(
                "'{}' is not a choice for '{}'",
                answer, prompt
            ))),
        }
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let answer = self.next(prompt)?.trim().to_string();
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let answer = self.next(prompt)?.trim().to_lowercase();
        match answer.as_str() {
            "" => Ok(default),
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            other => Err(OrganizerError::Prompt(format!(
                "'{}' is not a yes/no answer for '{}'",
                other, prompt
            ))),
        }
    }
}
