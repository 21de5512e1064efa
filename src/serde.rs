use std::fmt;

use serde::{
    de::{self, Deserializer, Visitor},
    Deserialize, Serialize, Serializer,
};

use crate::{base32, Ulid, ULID_STR_LEN};

impl Serialize for Ulid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            let mut buffer = [0; ULID_STR_LEN];
            serializer.serialize_str(base32::encode_to_buffer(self.as_bytes(), &mut buffer))
        } else {
            serializer.serialize_bytes(self.as_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Ulid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct UlidVisitor;

        impl Visitor<'_> for UlidVisitor {
            type Value = Ulid;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a ULID string or 16 bytes")
            }
            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(de::Error::custom)
            }
            fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
                Ulid::try_from(value).map_err(de::Error::custom)
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(UlidVisitor)
        } else {
            deserializer.deserialize_bytes(UlidVisitor)
        }
    }
}
