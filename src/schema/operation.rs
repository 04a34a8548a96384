//! Operation types recorded in a replay trace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single recorded mutation of the visualized sequence.
///
/// The JSON form is tagged by `"type"` and matches the traces emitted by the
/// browser visualizer:
///
/// ```json
/// [
///   {"type": "init", "data": [1, 3, 4, 0, 2, 5]},
///   {"type": "focus", "first_index": 2, "second_index": 5},
///   {"type": "swap", "first_index": 2, "second_index": 5},
///   {"type": "change-active-length", "step": -1}
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Operation {
    /// Replace the whole sequence, deriving fresh element keys.
    Init {
        #[serde(rename = "data")]
        values: Vec<i64>,
    },
    /// Highlight two positions without touching the data.
    Focus {
        #[serde(rename = "first_index")]
        first: usize,
        #[serde(rename = "second_index")]
        second: usize,
    },
    /// Exchange the elements at two positions.
    Swap {
        #[serde(rename = "first_index")]
        first: usize,
        #[serde(rename = "second_index")]
        second: usize,
    },
    /// Grow or shrink the active (unsorted) prefix.
    ChangeActiveLength { step: i64 },
}

impl Operation {
    /// Short kind name, matching the JSON tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Init { .. } => "init",
            Operation::Focus { .. } => "focus",
            Operation::Swap { .. } => "swap",
            Operation::ChangeActiveLength { .. } => "change-active-length",
        }
    }

    #[inline]
    pub fn is_swap(&self) -> bool {
        matches!(self, Operation::Swap { .. })
    }

    #[inline]
    pub fn is_focus(&self) -> bool {
        matches!(self, Operation::Focus { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Init { values } => {
                write!(f, "init [")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Operation::Focus { first, second } => write!(f, "select nodes {first}, {second}"),
            Operation::Swap { first, second } => write!(f, "swap nodes {first} <-> {second}"),
            Operation::ChangeActiveLength { .. } => write!(f, "mark sorted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_browser_trace() {
        let json = r#"[
            {"type": "init", "data": [1, 3, 4]},
            {"type": "focus", "first_index": 5, "second_index": 6},
            {"type": "swap", "first_index": 0, "second_index": 2},
            {"type": "change-active-length", "step": -2}
        ]"#;

        let ops: Vec<Operation> = serde_json::from_str(json).unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::Init {
                    values: vec![1, 3, 4]
                },
                Operation::Focus {
                    first: 5,
                    second: 6
                },
                Operation::Swap {
                    first: 0,
                    second: 2
                },
                Operation::ChangeActiveLength { step: -2 },
            ]
        );
    }

    #[test]
    fn test_serialize_uses_browser_field_names() {
        let op = Operation::Swap {
            first: 2,
            second: 5,
        };
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["type"], "swap");
        assert_eq!(value["first_index"], 2);
        assert_eq!(value["second_index"], 5);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<Operation, _> = serde_json::from_str(r#"{"type": "rotate", "step": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            Operation::Init {
                values: vec![1, 3, 4]
            }
            .to_string(),
            "init [1, 3, 4]"
        );
        assert_eq!(
            Operation::Focus {
                first: 5,
                second: 6
            }
            .to_string(),
            "select nodes 5, 6"
        );
        assert_eq!(
            Operation::Swap {
                first: 2,
                second: 5
            }
            .to_string(),
            "swap nodes 2 <-> 5"
        );
        assert_eq!(
            Operation::ChangeActiveLength { step: -1 }.to_string(),
            "mark sorted"
        );
    }
}
