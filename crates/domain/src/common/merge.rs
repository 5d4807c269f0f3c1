//! Recursive merge of structured records.
//!
//! Precedence rules:
//! - [`merge_values`]: the patch wins on key conflicts.
//! - [`fill_defaults`]: the target wins; defaults only fill keys the target lacks.
//!
//! In both cases nested objects merge key by key, while arrays and scalars
//! replace wholesale (or are kept wholesale, for `fill_defaults`).

use serde_json::Value;

/// Merge `patch` into `dst`. Values from `patch` win on key conflicts.
pub fn merge_values(dst: &mut Value, patch: &Value) {
    match (dst, patch) {
        (Value::Object(d), Value::Object(p)) => {
            for (k, v) in p.iter() {
                match d.get_mut(k) {
                    Some(dv) => merge_values(dv, v),
                    None => {
                        d.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, v) => {
            *d = v.clone();
        }
    }
}

/// Merge `defaults` into `dst` without overwriting anything `dst` already holds.
///
/// A `null` in `dst` counts as absent.
pub fn fill_defaults(dst: &mut Value, defaults: &Value) {
    match (dst, defaults) {
        (Value::Object(d), Value::Object(defs)) => {
            for (k, v) in defs.iter() {
                if d.get(k).map_or(true, Value::is_null) {
                    d.insert(k.clone(), v.clone());
                } else if let Some(dv) = d.get_mut(k) {
                    fill_defaults(dv, v);
                }
            }
        }
        (d @ Value::Null, v) => {
            *d = v.clone();
        }
        // Target already holds a non-object value here: it wins.
        _ => {}
    }
}
