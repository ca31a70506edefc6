use serde_json::Number;

use crate::ir::BaseType;

/// Integer when the token decoded as a whole number (`1`, `-7`,
/// `18446744073709551615`), double otherwise (`1.0`, `2.5e3`).
///
/// Booleans never reach this point; they are their own `Value` variant.
pub fn classify_number(n: &Number) -> BaseType {
    if n.is_i64() || n.is_u64() {
        BaseType::Integer
    } else {
        BaseType::Double
    }
}
