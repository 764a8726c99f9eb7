use anyhow::{Context, Result, anyhow, bail};
use schemars::{Schema, schema_for};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// A filesystem path, optionally restricted to some extensions.
    Path { extensions: Vec<String> },
    /// One of a fixed set of string values.
    Choice(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub kind: FieldKind,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// `min` itself is not an accepted value.
    pub exclusive_min: bool,
    pub exclusive_max: bool,
}

// Return the whole tagged-enum schema for T
pub fn schema_for<T: schemars::JsonSchema>() -> Schema {
    schema_for!(T)
}

/// Field specs of the `params` object of the `kind_key` branch of a tagged
/// enum schema, in declaration order.
pub fn specs_for_kind(root: &Schema, kind_key: &str) -> Result<Vec<FieldSpec>> {
    let root_obj = root.as_object().context("root schema is not an object")?;

    let alts = root_obj
        .get("oneOf")
        .or_else(|| root_obj.get("anyOf"))
        .and_then(|v| v.as_array())
        .context("missing oneOf/anyOf")?;

    let branch = alts
        .iter()
        .filter_map(|b| b.as_object())
        .filter_map(|b| b.get("properties").and_then(|v| v.as_object()))
        .find(|props| discriminant_matches(props, kind_key));

    let Some(props) = branch else {
        bail!("no branch found for type={kind_key}");
    };

    let Some(params_obj) = props
        .get("params")
        .and_then(|v| v.as_object())
        .and_then(|o| resolve_ref_obj(root_obj, o))
    else {
        return Ok(vec![]);
    };

    let Some(params_props) = params_obj.get("properties").and_then(|v| v.as_object()) else {
        return Ok(vec![]);
    };

    let required: Vec<&str> = params_obj
        .get("required")
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let mut out = Vec::new();
    for (name, field_schema) in params_props {
        let field_obj = field_schema
            .as_object()
            .context("field schema not object")?;
        let target = resolve_ref_obj(root_obj, field_obj)
            .ok_or_else(|| anyhow!("failed to resolve field $ref for '{name}'"))?;

        // Annotations on the field win over those on the referenced type.
        let lookup = |key: &str| field_obj.get(key).or_else(|| target.get(key));
        let bound = |exclusive: &str, inclusive: &str| match lookup(exclusive) {
            Some(v) => (v.as_f64(), true),
            None => (lookup(inclusive).and_then(|v| v.as_f64()), false),
        };
        let (min, exclusive_min) = bound("exclusiveMinimum", "minimum");
        let (max, exclusive_max) = bound("exclusiveMaximum", "maximum");

        let Some(kind) = detect_field_kind(target) else {
            continue;
        };

        out.push(FieldSpec {
            name: name.clone(),
            title: lookup("title")
                .and_then(|v| v.as_str())
                .unwrap_or(name)
                .to_string(),
            description: lookup("description")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            required: required.contains(&name.as_str()),
            kind,
            default: lookup("default").cloned(),
            min,
            max,
            exclusive_min,
            exclusive_max,
        });
    }

    Ok(out)
}

fn discriminant_matches(props: &Map<String, Value>, kind_key: &str) -> bool {
    let Some(tobj) = props.get("type").and_then(|v| v.as_object()) else {
        return false;
    };

    if tobj.get("const").and_then(|v| v.as_str()) == Some(kind_key) {
        return true;
    }
    matches!(
        tobj.get("enum").and_then(|v| v.as_array()).map(Vec::as_slice),
        Some([only]) if only.as_str() == Some(kind_key)
    )
}

/// Resolve a local $ref like "#/$defs/SeasonalParameters" against the root object.
/// Returns the referenced object map, or None if it can't be resolved.
fn resolve_ref_obj<'a>(
    root_obj: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    match obj.get("$ref") {
        Some(Value::String(r)) => {
            let path = r.strip_prefix("#/")?;
            let mut cur: &Map<String, Value> = root_obj;
            for raw_seg in path.split('/') {
                // JSON Pointer unescape (~1 => /, ~0 => ~)
                let seg = raw_seg.replace("~1", "/").replace("~0", "~");
                cur = cur.get(&seg)?.as_object()?;
            }
            Some(cur)
        }
        _ => Some(obj),
    }
}

fn string_options(obj: &Map<String, Value>) -> Option<Vec<String>> {
    if let Some(values) = obj.get("enum").and_then(|v| v.as_array()) {
        let opts: Vec<String> = values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        return (!opts.is_empty()).then_some(opts);
    }
    // Documented unit variants come out as oneOf [{const: ..}, ..]
    let alts = obj.get("oneOf").and_then(|v| v.as_array())?;
    alts.iter()
        .map(|alt| alt.get("const").and_then(|v| v.as_str()).map(str::to_string))
        .collect()
}

fn detect_field_kind(obj: &Map<String, Value>) -> Option<FieldKind> {
    if let Some(opts) = string_options(obj) {
        return Some(FieldKind::Choice(opts));
    }
    if obj.get("format").and_then(|v| v.as_str()) == Some("path") {
        let extensions = obj
            .get("x-extensions")
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        return Some(FieldKind::Path { extensions });
    }

    let scalar = |s: &str| match s {
        "string" => Some(FieldKind::String),
        "integer" => Some(FieldKind::Integer),
        "number" => Some(FieldKind::Number),
        "boolean" => Some(FieldKind::Boolean),
        _ => None,
    };
    match obj.get("type") {
        Some(Value::String(s)) => scalar(s),
        // unions like ["integer","null"] for Option<T>
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str()).find_map(scalar),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::types::choices::{DetectorChoice, StreamChoice, TaskChoice, UIChoice};

    fn spec<'a>(specs: &'a [FieldSpec], name: &str) -> &'a FieldSpec {
        specs
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("no field {name}"))
    }

    #[test]
    fn detector_fields_carry_ranges_and_choices() {
        let specs = specs_for_kind(&DetectorChoice::schema(), "ema-band").unwrap();

        let alpha = spec(&specs, "ema_alpha");
        assert_eq!(alpha.kind, FieldKind::Number);
        assert_eq!(alpha.title, "EMA Alpha");
        assert_eq!(alpha.min, Some(0.0));
        assert_eq!(alpha.max, Some(1.0));
        assert!(alpha.exclusive_min && alpha.exclusive_max);

        let k = spec(&specs, "threshold_multiplier");
        assert_eq!(k.min, Some(0.0));
        assert!(k.exclusive_min);
        assert!(!k.exclusive_max);

        let window = spec(&specs, "window_size");
        assert_eq!(window.kind, FieldKind::Integer);
        assert_eq!(window.min, Some(1.0));
        assert!(!window.exclusive_min);

        let basis = spec(&specs, "dispersion_basis");
        assert_eq!(
            basis.kind,
            FieldKind::Choice(vec!["inclusive".into(), "trailing".into()])
        );
    }

    #[test]
    fn stream_fields_detect_paths_and_optionals() {
        let specs = specs_for_kind(&StreamChoice::schema(), "text-file").unwrap();
        let path = spec(&specs, "path");
        match &path.kind {
            FieldKind::Path { extensions } => {
                assert!(extensions.iter().any(|e| e == "csv"));
            }
            other => panic!("expected a path field, got {other:?}"),
        }

        let specs = specs_for_kind(&StreamChoice::schema(), "seasonal-generator").unwrap();
        let max = spec(&specs, "max_observations");
        assert_eq!(max.kind, FieldKind::Integer);
        assert!(!max.required);
    }

    #[test]
    fn skipped_fields_are_not_prompted() {
        let specs = specs_for_kind(&TaskChoice::schema(), "detect-anomalies").unwrap();
        assert!(specs.iter().all(|s| s.name != "detector" && s.name != "stream"));
        assert!(specs.iter().any(|s| s.name == "tick_delay_ms"));
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = specs_for_kind(&StreamChoice::schema(), "nope").unwrap_err();
        assert!(err.to_string().contains("no branch found for type=nope"));
    }
}
