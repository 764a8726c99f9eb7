use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use strum::{EnumMessage, IntoEnumIterator};

use crate::ui::cli::drivers::PromptDriver;
use crate::ui::types::choices::{FieldKind, FieldSpec, UIChoice, schema_for, specs_for_kind};

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

fn kind_labels<K>() -> (Vec<K>, Vec<String>)
where
    K: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator,
{
    K::iter()
        .map(|k| {
            let label = k.get_message().unwrap_or_else(|| k.into());
            let text = match k.get_detailed_message() {
                Some(desc) if !desc.is_empty() => format!("{label}  {DIM_ITALIC}{desc}{RESET}"),
                _ => label.to_string(),
            };
            (k, text)
        })
        .unzip()
}

/// Walks the user through picking a variant of `C` and filling in its
/// parameters, then any nested choices it declares.
pub fn prompt_choice<C: UIChoice, D: PromptDriver>(driver: &D) -> Result<C> {
    let (kinds, labels) = kind_labels::<C::Kind>();
    let picked = driver.ask_choice(C::prompt_label(), C::prompt_help(), &labels, 0)?;
    let Some(&choice_kind) = kinds.get(picked) else {
        bail!("no option at index {picked}");
    };

    let key: &'static str = choice_kind.into();
    let schema = schema_for::<C>();
    let specs = specs_for_kind(&schema, key)?;
    let defaults = C::default_params(choice_kind);

    let mut params = Map::new();
    for s in specs {
        let init = s.default.clone().or_else(|| defaults.get(&s.name).cloned());
        if let Some(val) = prompt_field(driver, &s, init)? {
            params.insert(s.name.clone(), val);
        }
    }

    if let Some(extra) = C::subprompts(driver, choice_kind)? {
        params.extend(extra);
    }
    C::from_parts(choice_kind, Value::Object(params))
}

fn prompt_field<D: PromptDriver>(
    driver: &D,
    s: &FieldSpec,
    init: Option<Value>,
) -> Result<Option<Value>> {
    let help = s.description.as_deref().unwrap_or("");

    let is_optional_numeric = !s.required
        && matches!(s.kind, FieldKind::Integer | FieldKind::Number)
        && matches!(init, None | Some(Value::Null));
    if is_optional_numeric {
        return prompt_optional_number(driver, s, help);
    }

    let val = match &s.kind {
        FieldKind::Boolean => {
            let def = init.and_then(|v| v.as_bool()).unwrap_or(false);
            Value::Bool(driver.ask_bool(&s.title, help, def)?)
        }
        FieldKind::String => {
            let def = init
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            let answer = driver.ask_string(&s.title, help, &def)?;
            if !s.required && answer.trim().is_empty() {
                return Ok(None);
            }
            Value::String(answer)
        }
        FieldKind::Path { extensions } => {
            let def = init
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            let exts: Vec<&str> = extensions.iter().map(String::as_str).collect();
            let pb = prompt_path_until_ok(driver, &s.title, help, &def, &exts)?;
            Value::String(pb.to_string_lossy().into_owned())
        }
        FieldKind::Choice(options) => {
            let def = init
                .as_ref()
                .and_then(|v| v.as_str())
                .and_then(|d| options.iter().position(|o| o == d))
                .unwrap_or(0);
            let picked = driver.ask_choice(&s.title, Some(help), options, def)?;
            let Some(option) = options.get(picked) else {
                bail!("no option at index {picked} for {}", s.title);
            };
            Value::String(option.clone())
        }
        FieldKind::Integer => {
            let def = init.and_then(|v| v.as_u64()).unwrap_or(0);
            let min = s
                .min
                .map(|x| x as u64 + u64::from(s.exclusive_min));
            let max = s
                .max
                .map(|x| (x as u64).saturating_sub(u64::from(s.exclusive_max)));
            Value::from(driver.ask_u64(&s.title, help, def, min, max)?)
        }
        FieldKind::Number => {
            let def = init.and_then(|v| v.as_f64()).unwrap_or(0.0);
            Value::from(prompt_number_until_ok(driver, s, help, def)?)
        }
    };
    Ok(Some(val))
}

fn prompt_optional_number<D: PromptDriver>(
    driver: &D,
    s: &FieldSpec,
    help: &str,
) -> Result<Option<Value>> {
    let answer = driver.ask_string(&s.title, &format!("{help}\n(leave blank for none)"), "")?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    let val = match s.kind {
        FieldKind::Integer => {
            let n: u64 = answer
                .parse()
                .with_context(|| format!("invalid integer for {}", s.title))?;
            Value::from(n)
        }
        _ => {
            let x: f64 = answer
                .parse()
                .with_context(|| format!("invalid number for {}", s.title))?;
            Value::from(x)
        }
    };
    Ok(Some(val))
}

fn check_open_bounds(s: &FieldSpec, x: f64) -> Result<(), String> {
    if let Some(lo) = s.min.filter(|_| s.exclusive_min) {
        if x <= lo {
            return Err(format!("{} must be greater than {lo}", s.title));
        }
    }
    if let Some(hi) = s.max.filter(|_| s.exclusive_max) {
        if x >= hi {
            return Err(format!("{} must be less than {hi}", s.title));
        }
    }
    Ok(())
}

fn prompt_number_until_ok<D: PromptDriver>(
    driver: &D,
    s: &FieldSpec,
    help: &str,
    default: f64,
) -> Result<f64> {
    loop {
        let x = driver.ask_f64(&s.title, help, default, s.min, s.max)?;
        match check_open_bounds(s, x) {
            Ok(()) => return Ok(x),
            Err(msg) => eprintln!("✗ {msg}"),
        }
    }
}

fn validate_path_str(input: &str, allowed_exts: &[&str]) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Path cannot be empty".into());
    }
    let p = Path::new(trimmed);

    if !p.exists() {
        return Err(format!("Path does not exist: {}", p.display()));
    }
    if !p.is_file() {
        return Err("Expected a file path, not a directory".into());
    }
    if !allowed_exts.is_empty() {
        match p.extension().and_then(|e| e.to_str()) {
            Some(ext) if allowed_exts.iter().any(|e| e.eq_ignore_ascii_case(ext)) => {}
            _ => return Err(format!("Expected a .{} file", allowed_exts.join(" / ."))),
        }
    }
    Ok(())
}

fn prompt_path_until_ok<D: PromptDriver>(
    driver: &D,
    title: &str,
    help: &str,
    default: &str,
    allowed_exts: &[&str],
) -> Result<PathBuf> {
    loop {
        let answer = driver.ask_string(title, help, default)?;
        match validate_path_str(&answer, allowed_exts) {
            Ok(()) => return Ok(PathBuf::from(answer.trim())),
            Err(msg) => eprintln!("✗ {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DispersionBasis;
    use crate::testing::stubs::ScriptedDriver;
    use crate::ui::types::choices::{DetectorChoice, StreamChoice, TaskChoice};

    #[test]
    fn accepting_every_default_yields_default_detector() {
        let driver = ScriptedDriver::accept_defaults();
        let DetectorChoice::EmaBand(p) = prompt_choice::<DetectorChoice, _>(&driver).unwrap();
        assert_eq!(p.ema_alpha, 0.2);
        assert_eq!(p.window_size, 10);
        assert_eq!(p.dispersion_basis, DispersionBasis::Inclusive);
        assert_eq!(driver.asked(), 5);
    }

    #[test]
    fn choice_field_maps_index_back_to_option() {
        let driver = ScriptedDriver::accept_defaults().pick("Dispersion Basis", 1);
        let DetectorChoice::EmaBand(p) = prompt_choice::<DetectorChoice, _>(&driver).unwrap();
        assert_eq!(p.dispersion_basis, DispersionBasis::Trailing);
    }

    #[test]
    fn open_bounds_reprompt_on_the_boundary() {
        let driver = ScriptedDriver::accept_defaults()
            .answer("EMA Alpha", "0")
            .answer("EMA Alpha", "1")
            .answer("EMA Alpha", "0.35")
            .answer("Threshold Multiplier", "0")
            .answer("Threshold Multiplier", "3");
        let DetectorChoice::EmaBand(p) = prompt_choice::<DetectorChoice, _>(&driver).unwrap();
        assert_eq!(p.ema_alpha, 0.35);
        assert_eq!(p.threshold_multiplier, 3.0);
    }

    #[test]
    fn blank_optional_number_is_left_out() {
        let driver = ScriptedDriver::accept_defaults();
        let StreamChoice::SeasonalGenerator(p) = prompt_choice::<StreamChoice, _>(&driver).unwrap()
        else {
            panic!("first kind should be the seasonal generator");
        };
        assert_eq!(p.max_observations, None);
        assert_eq!(p.seed, 42);
    }

    #[test]
    fn typed_optional_number_is_parsed() {
        let driver = ScriptedDriver::accept_defaults().answer("Max Observations", "250");
        let StreamChoice::SeasonalGenerator(p) = prompt_choice::<StreamChoice, _>(&driver).unwrap()
        else {
            panic!("first kind should be the seasonal generator");
        };
        assert_eq!(p.max_observations, Some(250));
    }

    #[test]
    fn garbage_optional_number_is_an_error() {
        let driver = ScriptedDriver::accept_defaults().answer("Max Observations", "lots");
        let err = prompt_choice::<StreamChoice, _>(&driver).unwrap_err();
        assert!(err.to_string().contains("Max Observations"), "{err}");
    }

    #[test]
    fn task_prompts_nested_detector_and_stream() {
        let driver = ScriptedDriver::accept_defaults();
        let TaskChoice::DetectAnomalies(p) = prompt_choice::<TaskChoice, _>(&driver).unwrap();
        assert!(matches!(p.stream, StreamChoice::SeasonalGenerator(_)));
        assert_eq!(p.tick_delay_ms, 50);
        assert_eq!(p.max_seconds, None);
    }

    #[test]
    fn path_validation() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("series.csv");
        std::fs::write(&file, "1\n").unwrap();
        let file = file.to_string_lossy().into_owned();

        assert!(validate_path_str(&file, &["csv", "txt"]).is_ok());
        assert!(validate_path_str(&file, &["txt"]).is_err());
        assert!(validate_path_str("", &[]).is_err());
        assert!(
            validate_path_str(&dir.path().to_string_lossy(), &[])
                .unwrap_err()
                .contains("directory")
        );
    }

    #[test]
    fn text_file_path_is_reprompted_until_valid() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("values.txt");
        std::fs::write(&file, "1\n").unwrap();

        let driver = ScriptedDriver::accept_defaults()
            .pick("Choose a stream:", 1)
            .answer("File Path", "/nope/missing.txt")
            .answer("File Path", &file.to_string_lossy());
        let StreamChoice::TextFile(p) = prompt_choice::<StreamChoice, _>(&driver).unwrap() else {
            panic!("picked the text file stream");
        };
        assert_eq!(p.path, file);
    }
}
