//! Parameter flattening for multipart forms.
//!
//! [`flatten`] turns a structure into `(field name, text)` pairs in field
//! declaration order:
//!
//! - scalars keep their canonical text form (`10`, `true`, strings verbatim)
//! - arrays, maps and nested structures become compact JSON (`[1,2,3]`)
//! - `None` and unit fields are left out
//!
//! String-keyed maps count as structures, since serde emits structs with
//! `#[serde(flatten)]` fields through `serialize_map`.
//!
//! [`attachments`] reports the files a value wants to upload.

use std::fmt::Display;

use serde::ser::{self, Impossible, Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::error::{BotError, ShapeError};
use crate::params::{Files, MethodParams};

/// Flattened form fields in declaration order.
pub type StringFields = Vec<(String, String)>;

/// Flattening errors.
#[derive(Debug, thiserror::Error)]
pub enum ReflectError {
    /// The value is not a structure.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// A field value could not be encoded.
    #[error("field {field:?}: {message}")]
    Field { field: String, message: String },

    /// The value's `Serialize` implementation failed.
    #[error("{0}")]
    Custom(String),
}

impl ser::Error for ReflectError {
    fn custom<T: Display>(msg: T) -> Self {
        ReflectError::Custom(msg.to_string())
    }
}

impl From<ReflectError> for BotError {
    fn from(err: ReflectError) -> Self {
        match err {
            ReflectError::Shape(shape) => BotError::Shape(shape),
            other => BotError::Encode(format!("flatten parameters: {}", other)),
        }
    }
}

/// Flatten a structure into string form fields.
///
/// Fails with [`ShapeError`] when `value` is not a structure (or an
/// `Option`/newtype wrapping one). Never panics.
pub fn flatten<T: Serialize + ?Sized>(value: &T) -> Result<StringFields, ReflectError> {
    value.serialize(StructReflector)
}

/// Files attached to `value`, or `None` when it has none.
///
/// Only reads the value.
pub fn attachments<P: MethodParams + ?Sized>(value: &P) -> Option<Files> {
    let files = value.file_parameters();
    (!files.is_empty()).then_some(files)
}

// ============================================================================
// Top level: accepts structures only
// ============================================================================

struct StructReflector;

fn not_struct(kind: &'static str) -> ReflectError {
    ShapeError::NotStruct { kind }.into()
}

macro_rules! reject_scalar {
    ($($method:ident($ty:ty) => $kind:literal;)*) => {
        $(
            fn $method(self, _v: $ty) -> Result<Self::Ok, Self::Error> {
                Err(not_struct($kind))
            }
        )*
    };
}

impl Serializer for StructReflector {
    type Ok = StringFields;
    type Error = ReflectError;
    type SerializeSeq = Impossible<StringFields, ReflectError>;
    type SerializeTuple = Impossible<StringFields, ReflectError>;
    type SerializeTupleStruct = Impossible<StringFields, ReflectError>;
    type SerializeTupleVariant = Impossible<StringFields, ReflectError>;
    type SerializeMap = FieldCollector;
    type SerializeStruct = FieldCollector;
    type SerializeStructVariant = Impossible<StringFields, ReflectError>;

    reject_scalar! {
        serialize_bool(bool) => "boolean";
        serialize_i8(i8) => "integer";
        serialize_i16(i16) => "integer";
        serialize_i32(i32) => "integer";
        serialize_i64(i64) => "integer";
        serialize_i128(i128) => "integer";
        serialize_u8(u8) => "integer";
        serialize_u16(u16) => "integer";
        serialize_u32(u32) => "integer";
        serialize_u64(u64) => "integer";
        serialize_u128(u128) => "integer";
        serialize_f32(f32) => "float";
        serialize_f64(f64) => "float";
        serialize_char(char) => "char";
        serialize_str(&str) => "string";
        serialize_bytes(&[u8]) => "bytes";
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Err(ShapeError::Nil.into())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Err(ShapeError::Nil.into())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Err(ShapeError::Nil.into())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Err(not_struct("enum"))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Err(not_struct("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(not_struct("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(not_struct("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(not_struct("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(not_struct("enum"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(FieldCollector::new(len.unwrap_or_default()))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(FieldCollector::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(not_struct("enum"))
    }
}

/// Collects struct fields or map entries; skipped fields never reach it.
struct FieldCollector {
    fields: StringFields,
    pending_key: Option<String>,
}

impl FieldCollector {
    fn new(len: usize) -> Self {
        Self {
            fields: Vec::with_capacity(len),
            pending_key: None,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, key: &str, value: &T) -> Result<(), ReflectError> {
        let text = match value.serialize(ScalarText) {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(()),
            Err(ScalarError::Compound) => {
                serde_json::to_string(value).map_err(|e| ReflectError::Field {
                    field: key.to_string(),
                    message: e.to_string(),
                })?
            }
            Err(ScalarError::Custom(message)) => {
                return Err(ReflectError::Field {
                    field: key.to_string(),
                    message,
                });
            }
        };

        self.fields.push((key.to_string(), text));
        Ok(())
    }
}

impl SerializeStruct for FieldCollector {
    type Ok = StringFields;
    type Error = ReflectError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.push(key, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.fields)
    }
}

impl SerializeMap for FieldCollector {
    type Ok = StringFields;
    type Error = ReflectError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        match serde_json::to_value(key) {
            Ok(serde_json::Value::String(key)) => {
                self.pending_key = Some(key);
                Ok(())
            }
            _ => Err(not_struct("map with non-string keys")),
        }
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| ReflectError::Custom("map value without a key".into()))?;
        self.push(&key, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.fields)
    }
}

// ============================================================================
// Field values: canonical text for scalars
// ============================================================================

/// Renders a scalar as text; `None` means the field carries no value.
struct ScalarText;

#[derive(Debug, thiserror::Error)]
enum ScalarError {
    /// Not a scalar; encode as JSON instead.
    #[error("compound value")]
    Compound,
    #[error("{0}")]
    Custom(String),
}

impl ser::Error for ScalarError {
    fn custom<T: Display>(msg: T) -> Self {
        ScalarError::Custom(msg.to_string())
    }
}

macro_rules! scalar_to_string {
    ($($method:ident($ty:ty);)*) => {
        $(
            fn $method(self, v: $ty) -> Result<Self::Ok, Self::Error> {
                Ok(Some(v.to_string()))
            }
        )*
    };
}

impl Serializer for ScalarText {
    type Ok = Option<String>;
    type Error = ScalarError;
    type SerializeSeq = Impossible<Option<String>, ScalarError>;
    type SerializeTuple = Impossible<Option<String>, ScalarError>;
    type SerializeTupleStruct = Impossible<Option<String>, ScalarError>;
    type SerializeTupleVariant = Impossible<Option<String>, ScalarError>;
    type SerializeMap = Impossible<Option<String>, ScalarError>;
    type SerializeStruct = Impossible<Option<String>, ScalarError>;
    type SerializeStructVariant = Impossible<Option<String>, ScalarError>;

    scalar_to_string! {
        serialize_bool(bool);
        serialize_i8(i8);
        serialize_i16(i16);
        serialize_i32(i32);
        serialize_i64(i64);
        serialize_i128(i128);
        serialize_u8(u8);
        serialize_u16(u16);
        serialize_u32(u32);
        serialize_u64(u64);
        serialize_u128(u128);
        serialize_char(char);
        serialize_str(&str);
    }

    // Same text as in a JSON body.
    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        serde_json::to_string(&v)
            .map(Some)
            .map_err(|e| ScalarError::Custom(e.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        serde_json::to_string(&v)
            .map(Some)
            .map_err(|e| ScalarError::Custom(e.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Err(ScalarError::Compound)
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(None)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(Some(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Err(ScalarError::Compound)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(ScalarError::Compound)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(ScalarError::Compound)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(ScalarError::Compound)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(ScalarError::Compound)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(ScalarError::Compound)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Err(ScalarError::Compound)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(ScalarError::Compound)
    }
}
