//! Conversion between document values and the native tree
//!
//! | DocumentValue | Native |
//! |---------------|--------|
//! | Null / Bool / String | Null / Bool / String |
//! | Number::I32 | Int32 |
//! | Number::I64 | Int64 |
//! | Number::F32, Number::F64 | Double |
//! | Array / Object | Array / Document |
//!
//! Going back, Int32 → I32, Int64 → I64, Double → F64. The only width
//! change is F32 widening to F64. Native types without a document
//! counterpart (object ids, binary, datetimes, driver extras) are a
//! `Data` error, never skipped.
//!
//! Key encoding writes typed key values in schema order: integer → Int64,
//! float → Double, string → String.

use docvault_core::{
    DocumentValue, EntityKey, EntityTypeDescriptor, Error, Number, Object, Result, TypedValue,
};

use crate::native::{NativeDocument, NativeValue};

/// Convert a document value to its native form
pub fn to_native(value: &DocumentValue) -> NativeValue {
    match value {
        DocumentValue::Null => NativeValue::Null,
        DocumentValue::Bool(b) => NativeValue::Bool(*b),
        DocumentValue::Number(Number::I32(i)) => NativeValue::Int32(*i),
        DocumentValue::Number(Number::I64(i)) => NativeValue::Int64(*i),
        DocumentValue::Number(Number::F32(f)) => NativeValue::Double(f64::from(*f)),
        DocumentValue::Number(Number::F64(f)) => NativeValue::Double(*f),
        DocumentValue::String(s) => NativeValue::String(s.clone()),
        DocumentValue::Array(items) => NativeValue::Array(items.iter().map(to_native).collect()),
        DocumentValue::Object(members) => NativeValue::Document(object_to_native(members)),
    }
}

/// Convert object members to a native document
pub fn object_to_native(members: &Object) -> NativeDocument {
    members
        .iter()
        .map(|(k, v)| (k.as_str(), to_native(v)))
        .collect()
}

/// Convert a native value back to a document value
///
/// # Errors
///
/// `Data` if the tree holds a native type with no document counterpart.
pub fn from_native(value: &NativeValue) -> Result<DocumentValue> {
    Ok(match value {
        NativeValue::Null => DocumentValue::Null,
        NativeValue::Bool(b) => DocumentValue::Bool(*b),
        NativeValue::Int32(i) => DocumentValue::Number(Number::I32(*i)),
        NativeValue::Int64(i) => DocumentValue::Number(Number::I64(*i)),
        NativeValue::Double(f) => DocumentValue::Number(Number::F64(*f)),
        NativeValue::String(s) => DocumentValue::String(s.clone()),
        NativeValue::Array(items) => DocumentValue::Array(
            items
                .iter()
                .map(from_native)
                .collect::<Result<Vec<_>>>()?,
        ),
        NativeValue::Document(doc) => document_from_native(doc)?,
        other @ (NativeValue::ObjectId(_)
        | NativeValue::Binary(_)
        | NativeValue::DateTime(_)
        | NativeValue::Unsupported { .. }) => {
            return Err(Error::data(format!(
                "unsupported native type '{}' in stored document",
                other.type_name()
            )))
        }
    })
}

/// Convert a native document back to an object value
pub fn document_from_native(doc: &NativeDocument) -> Result<DocumentValue> {
    let mut members = Object::new();
    for (name, value) in doc.iter() {
        members.insert(name.to_string(), from_native(value)?);
    }
    Ok(DocumentValue::Object(members))
}

/// Native form of a typed key value
pub fn typed_to_native(value: &TypedValue) -> NativeValue {
    match value {
        TypedValue::Integer(i) => NativeValue::Int64(*i),
        TypedValue::Float(f) => NativeValue::Double(f64::from(*f)),
        TypedValue::String(s) => NativeValue::String(s.clone()),
    }
}

/// Encode a complete key as a native sub-document in schema order
///
/// # Errors
///
/// `InvalidArgument` if an attribute is missing or carries a value of the
/// wrong type. Callers are expected to pass keys produced by
/// [`parse_key_path`](docvault_core::parse_key_path).
pub fn encode_key(key: &EntityKey, descriptor: &EntityTypeDescriptor) -> Result<NativeDocument> {
    let mut doc = NativeDocument::new();
    for attribute in descriptor.key() {
        let value = key.get(&attribute.name).ok_or_else(|| {
            Error::invalid_argument(format!("entity key is missing attribute '{}'", attribute.name))
        })?;
        if value.attribute_type() != attribute.attribute_type {
            return Err(Error::invalid_argument(format!(
                "key attribute '{}' is declared {} but holds {}",
                attribute.name,
                attribute.attribute_type,
                value.attribute_type()
            )));
        }
        doc.insert(attribute.name.clone(), typed_to_native(value));
    }
    Ok(doc)
}
