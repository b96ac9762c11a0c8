//! A minimal column-oriented table and its type proxy.
//!
//! [`Frame`] is deliberately small — enough surface for the injected
//! helpers to be worth using, nothing resembling a full dataframe engine.
//! Injected methods receive a `&Frame` and return the transformed frame as
//! a [`Value`], so callers chain them through [`Frame::from_value`].

use graft_core::{CallError, TypeProxy, Value};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Stable identity of the frame type in the registry.
pub const FRAME_TYPE: &str = "graft.frames.Frame";

/// A column-oriented table: named columns over row-major cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Row-major cells. Short rows are padded with null on push.
    pub rows: Vec<Vec<Value>>,
}

impl Frame {
    /// A frame with the given columns and no rows.
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Value>) -> &mut Self {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
        self
    }

    /// `(rows, cols)` — the actual shape, not the shape of any preview.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The frame as a dynamic value, for returning from injected methods.
    pub fn to_value(&self) -> Value {
        json!({
            "columns": self.columns,
            "rows": self.rows,
        })
    }

    /// Recover a frame from a method result.
    pub fn from_value(value: &Value) -> Result<Self, CallError> {
        serde_json::from_value(value.clone())
            .map_err(|e| CallError::InvalidArgument(format!("not a frame value: {e}")))
    }
}

/// The proxy standing in for the frame type.
///
/// `shape` and `columns` are native members of [`Frame`] itself, so they
/// participate in conflict detection without ever living in the registry.
pub fn frame_type() -> TypeProxy<Frame> {
    TypeProxy::new(FRAME_TYPE).with_native(&["shape", "columns"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_reports_rows_then_cols() {
        let mut frame = Frame::new(&["county", "dist"]);
        frame.push_row(vec![json!("Adams"), json!(14)]);
        frame.push_row(vec![json!("Weld")]);
        assert_eq!(frame.shape(), (2, 2));
        // Short row padded with null.
        assert_eq!(frame.rows[1][1], Value::Null);
    }

    #[test]
    fn value_round_trip() {
        let mut frame = Frame::new(&["a"]);
        frame.push_row(vec![json!(1)]);
        let back = Frame::from_value(&frame.to_value()).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn proxy_knows_native_members() {
        use graft_core::Target;
        let proxy = frame_type();
        assert!(proxy.has_attribute("shape"));
        assert!(proxy.has_attribute("columns"));
        assert!(!proxy.has_attribute("rename_col"));
    }
}
