//! Field names of a `Deserialize` type, read from what its derived impl passes
//! to `Deserializer::deserialize_struct`.

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};

/// Names `T` deserializes its fields from, after `rename` attributes.
/// `None` when `T` does not deserialize as a plain struct.
pub fn struct_fields<T: DeserializeOwned>() -> Option<&'static [&'static str]> {
    let mut fields = None;
    let _ = T::deserialize(FieldCollector {
        fields: &mut fields,
    });
    fields
}

struct FieldCollector<'a> {
    fields: &'a mut Option<&'static [&'static str]>,
}

impl<'de> Deserializer<'de> for FieldCollector<'_> {
    type Error = de::value::Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
        Err(de::Error::custom("not a struct"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error> {
        *self.fields = Some(fields);
        Err(de::Error::custom("fields collected"))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::struct_fields;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Renamed {
        #[serde(rename = "userName")]
        user_name: String,
        #[serde(default)]
        note: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct Empty {}

    #[test]
    fn lists_serialized_field_names() {
        assert_eq!(struct_fields::<Renamed>(), Some(&["userName", "note"][..]));
    }

    #[test]
    fn empty_struct_has_no_fields() {
        assert_eq!(struct_fields::<Empty>(), Some(&[] as &[&str]));
    }

    #[test]
    fn non_struct_types_have_no_field_list() {
        assert_eq!(struct_fields::<String>(), None);
        assert_eq!(struct_fields::<HashMap<String, String>>(), None);
    }
}
