//! The unit of inter-actor communication.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::EnvelopeError;

/// An immutable, ordered sequence of numeric fields.
///
/// The engine never looks inside an envelope; what each field means is a
/// convention between sender and receiver (see [`crate::protocol`]).
///
/// Cloning is cheap: the payload is shared immutably, so a broadcast to many
/// recipients does not copy the fields and no clone can observe a mutation.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope {
    fields: Arc<[f64]>,
}

impl Envelope {
    /// Create an envelope from an ordered list of fields.
    pub fn new(fields: impl Into<Vec<f64>>) -> Self {
        Self {
            fields: fields.into().into(),
        }
    }

    /// Read-only view of all fields in sender order.
    pub fn fields(&self) -> &[f64] {
        &self.fields
    }

    /// Checked access to a single field.
    pub fn field(&self, index: usize) -> Result<f64, EnvelopeError> {
        self.fields
            .get(index)
            .copied()
            .ok_or(EnvelopeError::MissingField {
                index,
                len: self.fields.len(),
            })
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the envelope carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<f64>> for Envelope {
    fn from(fields: Vec<f64>) -> Self {
        Self::new(fields)
    }
}

impl From<&[f64]> for Envelope {
    fn from(fields: &[f64]) -> Self {
        Self {
            fields: fields.into(),
        }
    }
}

impl<const N: usize> From<[f64; N]> for Envelope {
    fn from(fields: [f64; N]) -> Self {
        Self::new(fields.to_vec())
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Envelope").field(&&*self.fields).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_content() {
        let fields = vec![1.0, 2.0, 3.0, 4.0];
        let envelope = Envelope::new(fields.clone());
        assert_eq!(envelope.fields(), fields.as_slice());
        assert_eq!(envelope.len(), 4);
        assert_eq!(Envelope::from([1.0, 2.0, 3.0, 4.0]), envelope);
    }

    #[test]
    fn test_field_out_of_range_is_attributable() {
        let envelope = Envelope::from([7.5]);
        assert_eq!(envelope.field(0), Ok(7.5));
        assert_eq!(
            envelope.field(3),
            Err(EnvelopeError::MissingField { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_clone_outlives_original() {
        let original = Envelope::from(vec![1.0, 2.0]);
        let copy = original.clone();
        drop(original);
        assert_eq!(copy.fields(), &[1.0, 2.0]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let envelope = Envelope::from([100.0, 0.5]);
        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(json, "[100.0,0.5]");
        let back: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, envelope);
    }
}
