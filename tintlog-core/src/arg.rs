//! Arguments of a logging call: named fields plus bare values.
//!
//! Bare values have no identifier. They are rendered after the fields, each
//! on its own (after a space on a terminal, as a raw item inside the group
//! on a browser console).

use crate::error::CoreError;
use crate::field::{Field, FieldValue, IntoFieldValue};

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Field(Field),
    /// A value passed without a name.
    Value(FieldValue),
}

/// A bare value to show after the fields.
pub fn arg(value: impl IntoFieldValue) -> Arg {
    Arg::Value(value.into_field_value())
}

impl From<Field> for Arg {
    fn from(field: Field) -> Self {
        Arg::Field(field)
    }
}

/// Anything accepted in the argument list of a logging call. `None` entries
/// are dropped, so `cond.then(|| field(..))` can omit an argument.
pub trait IntoArg {
    fn into_arg(self) -> Option<Arg>;
}

impl IntoArg for Arg {
    fn into_arg(self) -> Option<Arg> {
        Some(self)
    }
}

impl IntoArg for Field {
    fn into_arg(self) -> Option<Arg> {
        Some(Arg::Field(self))
    }
}

impl<T: IntoArg> IntoArg for Option<T> {
    fn into_arg(self) -> Option<Arg> {
        self.and_then(IntoArg::into_arg)
    }
}

/// The arguments of one call, split by kind. Each list keeps call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub fields: Vec<Field>,
    pub values: Vec<FieldValue>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoArg,
    {
        args.into_iter().filter_map(IntoArg::into_arg).collect()
    }

    pub fn push(&mut self, arg: Arg) {
        match arg {
            Arg::Field(field) => self.fields.push(field),
            Arg::Value(value) => self.values.push(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.values.is_empty()
    }

    /// Appends `other` after the arguments already held.
    pub fn append(&mut self, other: &Args) {
        self.fields.extend(other.fields.iter().cloned());
        self.values.extend(other.values.iter().cloned());
    }

    /// Fails on the first argument whose value could not be serialized.
    pub fn check_serializable(&self) -> Result<(), CoreError> {
        for field in &self.fields {
            if let FieldValue::Opaque(reason) = field.value() {
                return Err(CoreError::Unserializable {
                    identifier: field.identifier().to_string(),
                    reason: reason.clone(),
                });
            }
        }
        for (position, value) in self.values.iter().enumerate() {
            if let FieldValue::Opaque(reason) = value {
                return Err(CoreError::Unserializable {
                    identifier: format!("argument {}", position + 1),
                    reason: reason.clone(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        let mut args = Args::new();
        for arg in iter {
            args.push(arg);
        }
        args
    }
}

impl From<Vec<Field>> for Args {
    fn from(fields: Vec<Field>) -> Self {
        Self {
            fields,
            values: Vec::new(),
        }
    }
}
