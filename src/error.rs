// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

use thiserror::Error;

/// An error encoding or writing a system register value.
///
/// Every variant is detected before anything is written to the register.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SysregError {
    /// A field value doesn't fit in the field's width.
    #[error("{register}.{field}: value {value:#x} does not fit in {width} bits")]
    FieldOverflow {
        /// Name of the system register.
        register: &'static str,
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// Width of the field in bits.
        width: u8,
    },
    /// A field value fits but is a reserved encoding for the field.
    #[error("{register}.{field}: value {value:#x} is reserved")]
    ReservedValue {
        /// Name of the system register.
        register: &'static str,
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },
    /// A field was named which the register doesn't have.
    #[error("{register} has no field named {name}")]
    UnknownField {
        /// Name of the system register.
        register: &'static str,
        /// The unrecognised field name.
        name: &'static str,
    },
    /// Attempted to write a read-only register.
    #[error("{register} is read-only")]
    NotWritable {
        /// Name of the system register.
        register: &'static str,
    },
}
