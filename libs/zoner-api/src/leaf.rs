use crate::schema::{DeclaredType, Shape};

/// Terminal value types: never decomposed by the crawler.
const LEAF_TYPES: &[&str] = &[
    // primitives
    "bool", "char", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
    "f32", "f64",
    // arbitrary precision
    "i128", "u128", "Decimal", "BigInt", "BigDecimal",
    // text
    "String", "str",
    // time
    "Timestamp", "SystemTime", "DateTime", "NaiveDateTime",
];

/// Whether a field of this declared type is terminal.
///
/// Pure function of the declared type. `Option<T>` of a terminal `T` is
/// terminal; collections are never terminal, whatever their element type.
pub fn is_leaf(declared: &DeclaredType) -> bool {
    match declared.shape() {
        Shape::Plain | Shape::Optional => LEAF_TYPES.contains(&declared.name()),
        Shape::Sequence | Shape::Mapping => false,
    }
}
