pub mod market;
pub mod search;
pub mod chat;
pub mod user;
pub mod response;

pub use market::*;
pub use search::*;
pub use chat::*;
pub use user::*;
pub use response::*;

use serde::{Deserialize, Deserializer};

/// 字段为 `null` 时按类型默认值处理，与缺失字段一致
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
