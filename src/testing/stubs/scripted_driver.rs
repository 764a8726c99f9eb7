use anyhow::{Context, Result, bail};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use crate::ui::cli::drivers::PromptDriver;

const MAX_PROMPTS: usize = 200;

/// Answers prompts from a script keyed by prompt title.
///
/// Titles with nothing queued get the prompt's default. Repeated answers
/// for the same title are consumed in order.
#[derive(Default)]
pub struct ScriptedDriver {
    answers: RefCell<HashMap<String, VecDeque<String>>>,
    picks: RefCell<HashMap<String, VecDeque<usize>>>,
    asked: Cell<usize>,
}

impl ScriptedDriver {
    pub fn accept_defaults() -> Self {
        Self::default()
    }

    pub fn answer(self, title: &str, text: &str) -> Self {
        self.answers
            .borrow_mut()
            .entry(title.to_string())
            .or_default()
            .push_back(text.to_string());
        self
    }

    pub fn pick(self, title: &str, index: usize) -> Self {
        self.picks
            .borrow_mut()
            .entry(title.to_string())
            .or_default()
            .push_back(index);
        self
    }

    /// Number of prompts answered so far.
    pub fn asked(&self) -> usize {
        self.asked.get()
    }

    fn next_answer(&self, title: &str) -> Result<Option<String>> {
        self.count()?;
        Ok(self
            .answers
            .borrow_mut()
            .get_mut(title)
            .and_then(VecDeque::pop_front))
    }

    fn count(&self) -> Result<()> {
        let n = self.asked.get() + 1;
        if n > MAX_PROMPTS {
            bail!("script exhausted after {MAX_PROMPTS} prompts");
        }
        self.asked.set(n);
        Ok(())
    }
}

impl PromptDriver for ScriptedDriver {
    fn ask_bool(&self, title: &str, _help: &str, default: bool) -> Result<bool> {
        match self.next_answer(title)? {
            Some(a) => a.parse().with_context(|| format!("bad bool for {title}")),
            None => Ok(default),
        }
    }

    fn ask_string(&self, title: &str, _help: &str, default: &str) -> Result<String> {
        Ok(self
            .next_answer(title)?
            .unwrap_or_else(|| default.to_string()))
    }

    fn ask_u64(
        &self,
        title: &str,
        _help: &str,
        default: u64,
        _min: Option<u64>,
        _max: Option<u64>,
    ) -> Result<u64> {
        match self.next_answer(title)? {
            Some(a) => a.parse().with_context(|| format!("bad integer for {title}")),
            None => Ok(default),
        }
    }

    fn ask_f64(
        &self,
        title: &str,
        _help: &str,
        default: f64,
        _min: Option<f64>,
        _max: Option<f64>,
    ) -> Result<f64> {
        match self.next_answer(title)? {
            Some(a) => a.parse().with_context(|| format!("bad number for {title}")),
            None => Ok(default),
        }
    }

    fn ask_choice(
        &self,
        title: &str,
        _help: Option<&str>,
        options: &[String],
        default: usize,
    ) -> Result<usize> {
        self.count()?;
        let picked = self
            .picks
            .borrow_mut()
            .get_mut(title)
            .and_then(VecDeque::pop_front)
            .unwrap_or(default);
        if picked >= options.len() {
            bail!("{title}: index {picked} out of {} options", options.len());
        }
        Ok(picked)
    }
}
