use crate::ui::cli::drivers::PromptDriver;
use anyhow::Result;
use inquire::{Confirm, CustomType, Select, Text, validator::Validation};
use std::fmt::Display;
use std::str::FromStr;

/// Interactive terminal driver.
pub struct InquireDriver;

fn range_message<T: Display>(min: Option<T>, max: Option<T>) -> Option<String> {
    match (min, max) {
        (Some(lo), Some(hi)) => Some(format!("Must be between {lo} and {hi}")),
        (Some(lo), None) => Some(format!("Must be ≥ {lo}")),
        (None, Some(hi)) => Some(format!("Must be ≤ {hi}")),
        (None, None) => None,
    }
}

fn ask_in_range<T>(title: &str, help: &str, default: T, min: Option<T>, max: Option<T>) -> Result<T>
where
    T: Copy + Clone + Display + FromStr + PartialOrd + 'static,
{
    let mut q = CustomType::<T>::new(title)
        .with_default(default)
        .with_help_message(help);

    if let Some(msg) = range_message(min, max) {
        q = q.with_validator(move |x: &T| {
            let above = min.is_none_or(|lo| *x >= lo);
            let below = max.is_none_or(|hi| *x <= hi);
            if above && below {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(msg.clone().into()))
            }
        });
    }

    Ok(q.prompt()?)
}

impl PromptDriver for InquireDriver {
    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new(title)
            .with_default(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String> {
        Ok(Text::new(title)
            .with_initial_value(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64> {
        ask_in_range(title, help, default, min, max)
    }

    fn ask_f64(
        &self,
        title: &str,
        help: &str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64> {
        ask_in_range(title, help, default, min, max)
    }

    fn ask_choice(
        &self,
        title: &str,
        help: Option<&str>,
        options: &[String],
        default: usize,
    ) -> Result<usize> {
        let mut select = Select::new(title, options.to_vec()).with_starting_cursor(default);
        if let Some(help) = help {
            select = select.with_help_message(help);
        }
        Ok(select.raw_prompt()?.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_message_covers_each_bound_combination() {
        assert_eq!(
            range_message(Some(1), Some(3)).as_deref(),
            Some("Must be between 1 and 3")
        );
        assert_eq!(range_message(Some(0.5), None).as_deref(), Some("Must be ≥ 0.5"));
        assert_eq!(range_message(None, Some(9)).as_deref(), Some("Must be ≤ 9"));
        assert_eq!(range_message::<u64>(None, None), None);
    }
}
