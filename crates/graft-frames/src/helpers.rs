//! Column helpers, packaged as an injectable bundle.
//!
//! The classic interactive-analysis conveniences: terse column renames,
//! forgiving drops, prefixing, and a `head` that reports the *actual*
//! shape of the frame rather than the shape of the preview. Each helper is
//! a [`Definition`] over [`Frame`]; [`install`] injects the whole bundle
//! through the registry, so helpers obey the same conflict and idempotence
//! contract as any other injected attribute.

use graft_core::{
    Bundle, BundleOptions, CallError, Definition, InjectError, Registry, TypeProxy, Value,
    inject_bundle,
};
use serde_json::json;

use crate::frame::Frame;

fn str_arg(args: &[Value], index: usize) -> Result<String, CallError> {
    let value = args
        .get(index)
        .ok_or(CallError::MissingArgument { index })?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CallError::InvalidArgument(format!("argument {index} must be a string")))
}

/// Accept either one array of strings or a run of string arguments,
/// mirroring the loose calling conventions these helpers grew up with.
fn str_list(args: &[Value], index: usize) -> Result<Vec<String>, CallError> {
    let value = args
        .get(index)
        .ok_or(CallError::MissingArgument { index })?;
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    CallError::InvalidArgument("column lists must contain strings".to_string())
                })
            })
            .collect(),
        _ => Err(CallError::InvalidArgument(format!(
            "argument {index} must be a string or an array of strings"
        ))),
    }
}

fn set_columns(frame: &Frame, args: &[Value]) -> Result<Value, CallError> {
    let new = str_list(args, 0)?;
    if new.len() != frame.columns.len() {
        return Err(CallError::InvalidArgument(format!(
            "expected {} column names, got {}",
            frame.columns.len(),
            new.len()
        )));
    }
    let mut out = frame.clone();
    out.columns = new;
    Ok(out.to_value())
}

fn rename_col(frame: &Frame, args: &[Value]) -> Result<Value, CallError> {
    let old = str_arg(args, 0)?;
    let new = str_arg(args, 1)?;
    let mut out = frame.clone();
    if let Some(index) = out.column_index(&old) {
        out.columns[index] = new;
    }
    Ok(out.to_value())
}

fn drop_cols(frame: &Frame, args: &[Value]) -> Result<Value, CallError> {
    // Varargs of strings, or a single array argument. No arguments
    // drops nothing.
    let names = if args.is_empty() {
        Vec::new()
    } else if args.len() > 1 {
        args.iter()
            .enumerate()
            .map(|(i, _)| str_arg(args, i))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        str_list(args, 0)?
    };

    let mut out = frame.clone();
    // Absent columns are skipped silently.
    for name in names {
        if let Some(index) = out.column_index(&name) {
            out.columns.remove(index);
            for row in &mut out.rows {
                if index < row.len() {
                    row.remove(index);
                }
            }
        }
    }
    Ok(out.to_value())
}

fn prefix_cols(frame: &Frame, args: &[Value]) -> Result<Value, CallError> {
    let cols = str_list(args, 0)?;
    let prefix = str_arg(args, 1)?;
    let mut out = frame.clone();
    for col in cols {
        if let Some(index) = out.column_index(&col) {
            out.columns[index] = format!("{prefix}{col}");
        }
    }
    Ok(out.to_value())
}

fn head(frame: &Frame, args: &[Value]) -> Result<Value, CallError> {
    let n = match args.first() {
        None | Some(Value::Null) => 3,
        Some(value) => value.as_u64().ok_or_else(|| {
            CallError::InvalidArgument("preview length must be a non-negative integer".to_string())
        })? as usize,
    };
    let (rows, cols) = frame.shape();
    let preview: Vec<&Vec<Value>> = frame.rows.iter().take(n).collect();
    Ok(json!({
        "shape": [rows, cols],
        "preview": preview,
    }))
}

/// The column-helper bundle, in declaration order.
pub fn column_helpers() -> Bundle<Frame> {
    Bundle::new()
        .with("set_columns", Definition::method(2, set_columns))
        .with("rename_col", Definition::method(3, rename_col))
        .with("drop_cols", Definition::method(2, drop_cols))
        .with("prefix_cols", Definition::method(3, prefix_cols))
        .with("head", Definition::method(2, head))
        .with("nrows", Definition::property(|f: &Frame| json!(f.rows.len())))
        .with(
            "ncols",
            Definition::property(|f: &Frame| json!(f.columns.len())),
        )
}

/// Inject the column helpers into a frame type proxy.
///
/// Drains the bundle on success; re-running against the same registry is
/// idempotent.
pub fn install(registry: &mut Registry, proxy: &mut TypeProxy<Frame>) -> Result<(), InjectError> {
    let mut bundle = column_helpers();
    tracing::debug!(helpers = bundle.len(), "installing column helpers");
    inject_bundle(
        registry,
        &mut bundle,
        &mut [proxy],
        BundleOptions::default().delete_source(),
    )
}
