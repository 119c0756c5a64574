use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::models::RawConfiguration;

/// Turns a resolved raw configuration into an application type.
///
/// Mappers are expected to be total: default missing or mistyped fields
/// rather than fail. Any `Fn(&RawConfiguration) -> T` is a mapper.
pub trait Mapper<T> {
    fn map(&self, raw: &RawConfiguration) -> T;
}

impl<T, F> Mapper<T> for F
where
    F: Fn(&RawConfiguration) -> T,
{
    fn map(&self, raw: &RawConfiguration) -> T {
        self(raw)
    }
}

/// Serde-backed mapper.
///
/// Deserializes the whole map into `T`; a shape mismatch yields
/// `T::default()` and a warning. Combine with `#[serde(default)]` on `T` to
/// keep the well-formed fields of a partially valid payload.
pub struct JsonMapper<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> JsonMapper<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for JsonMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mapper<T> for JsonMapper<T>
where
    T: DeserializeOwned + Default,
{
    fn map(&self, raw: &RawConfiguration) -> T {
        let object = Value::Object(raw.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
        match serde_json::from_value(object) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "配置映射失败，使用默认值: {} ({})",
                    e,
                    std::any::type_name::<T>()
                );
                T::default()
            }
        }
    }
}
