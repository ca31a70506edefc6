use serde_json::Value;

use crate::ir::BaseType;

/// Element type assumed for `[]`, since there is nothing to look at.
pub const EMPTY_ARRAY_ELEMENT: BaseType = BaseType::String;

/// The element an array's type is inferred from.
///
/// Only the first element is consulted; later elements are not unified with
/// it, so `[1, "a"]` is an array of integers.
pub fn representative(xs: &[Value]) -> Option<&Value> {
    xs.first()
}
