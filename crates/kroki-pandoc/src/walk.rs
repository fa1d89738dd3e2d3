//! Depth-first traversal of a pandoc JSON document.

use serde_json::Value;

/// Offer every node found in a JSON array to `visit`, in document order.
///
/// When `visit` returns a replacement, the node is swapped out and the
/// replacement is walked in turn. Otherwise the walk descends into the node.
/// Objects are descended into without being offered, since pandoc nodes
/// (blocks and inlines) always live in lists.
pub fn walk<F, E>(value: &mut Value, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&Value) -> Result<Option<Value>, E>,
{
    match value {
        Value::Array(items) => {
            for item in items {
                if item.get("t").is_some()
                    && let Some(replacement) = visit(item)?
                {
                    *item = replacement;
                }
                walk(item, visit)?;
            }
        }
        Value::Object(map) => {
            for child in map.values_mut() {
                walk(child, visit)?;
            }
        }
        _ => {}
    }
    Ok(())
}
