use std::fmt;
use num_enum::TryFromPrimitive;

/// Variant name of a registry id, or its hex form when the id is unknown.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:04x}", raw),
    }
}

/// Milliseconds with microsecond resolution, as reported in logs.
pub fn duration_ms(d: std::time::Duration) -> f64 {
    d.as_micros() as f64 / 1000.0
}
