use core::fmt;
use core::marker::PhantomData;

use serde_core::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde_core::ser::{Serialize, Serializer};

use crate::Vector;
use crate::relocate::Relocate;

/// Upper bound of the up-front reservation taken from an untrusted size hint.
const MAX_PREALLOC: usize = 4096;

// -----------------------------------------------------------------------------
// Serialize

impl<T: Serialize, R> Serialize for Vector<T, R> {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

// -----------------------------------------------------------------------------
// Deserialize

struct VectorVisitor<T, R>(PhantomData<(T, fn() -> R)>);

impl<'de, T, R> Visitor<'de> for VectorVisitor<T, R>
where
    T: Deserialize<'de>,
    R: Relocate<T>,
{
    type Value = Vector<T, R>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut vector = Vector::empty();
        if let Some(hint) = seq.size_hint() {
            vector.reserve(hint.min(MAX_PREALLOC));
        }
        while let Some(value) = seq.next_element()? {
            vector.push(value);
        }
        Ok(vector)
    }
}

impl<'de, T, R> Deserialize<'de> for Vector<T, R>
where
    T: Deserialize<'de>,
    R: Relocate<T>,
{
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(VectorVisitor(PhantomData))
    }
}

// -----------------------------------------------------------------------------
// Tests
