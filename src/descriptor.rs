// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Static descriptions of system register layouts.

use crate::SysregError;
use bitflags::bitflags;

/// The maximum number of fields a single register descriptor may have.
pub const MAX_FIELDS: usize = 16;

/// An AArch64 exception level.
#[derive(Copy, Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ExceptionLevel {
    /// Exception level 0.
    El0 = 0,
    /// Exception level 1.
    El1 = 1,
    /// Exception level 2.
    El2 = 2,
    /// Exception level 3.
    El3 = 3,
}

bitflags! {
    /// Which accesses a system register allows.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Access: u8 {
        /// The register can be read with MRS.
        const READ = 1 << 0;
        /// The register can be written with MSR.
        const WRITE = 1 << 1;
    }
}

/// One half of a 128-bit register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Half {
    /// Bits [63:0].
    Low,
    /// Bits [127:64].
    High,
}

/// The architectural width of a system register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegisterWidth {
    /// A 32-bit register. MRS and MSR still transfer a 64-bit X register, of which the top half is
    /// RES0.
    Bits32,
    /// A 64-bit register.
    Bits64,
    /// One 64-bit half of a 128-bit register which is accessed as two separate registers, such as
    /// the pointer authentication keys.
    Bits128(Half),
}

impl RegisterWidth {
    /// Returns the architectural width of the register in bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
            Self::Bits128(_) => 128,
        }
    }

    /// Returns the number of bits transferred by a single access to the register.
    pub const fn access_bits(self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 | Self::Bits128(_) => 64,
        }
    }

    /// Returns a mask of the bits transferred by a single access to the register.
    pub const fn access_mask(self) -> u64 {
        match self {
            Self::Bits32 => 0xffff_ffff,
            Self::Bits64 | Self::Bits128(_) => u64::MAX,
        }
    }
}

/// A named, fixed-position bitfield within a system register.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    /// The name of the field, in lower case.
    pub name: &'static str,
    /// Position of the lowest bit of the field.
    pub offset: u8,
    /// Size of the field in bits.
    pub width: u8,
    /// Optional check of which values are architecturally valid for the field, beyond fitting in
    /// its width.
    pub validator: Option<fn(u64) -> bool>,
}

impl Field {
    /// Creates a new field with the given name, offset and width, and no validator.
    pub const fn new(name: &'static str, offset: u8, width: u8) -> Self {
        Self {
            name,
            offset,
            width,
            validator: None,
        }
    }

    /// Returns the field with the given validator added.
    pub const fn with_validator(mut self, validator: fn(u64) -> bool) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Returns a mask of the field's width, not shifted into position.
    pub const fn mask(&self) -> u64 {
        if self.width >= 64 {
            u64::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Returns the largest value the field can hold.
    pub const fn max_value(&self) -> u64 {
        self.mask()
    }

    /// Returns a mask of the bits the field occupies within the register.
    pub const fn shifted_mask(&self) -> u64 {
        self.mask() << self.offset
    }

    /// Extracts the value of the field from the given raw register value.
    pub const fn extract(&self, raw: u64) -> u64 {
        (raw >> self.offset) & self.mask()
    }

    /// Checks that `value` is valid for the field, and if so returns it shifted into position.
    pub fn insert(&self, register: &'static str, value: u64) -> Result<u64, SysregError> {
        if value > self.max_value() {
            return Err(SysregError::FieldOverflow {
                register,
                field: self.name,
                value,
                width: self.width,
            });
        }
        if let Some(validator) = self.validator
            && !validator(value)
        {
            return Err(SysregError::ReservedValue {
                register,
                field: self.name,
                value,
            });
        }
        Ok(value << self.offset)
    }
}

/// The layout and access restrictions of one system register.
///
/// Descriptors are static data shared by every access to the register. Their invariants are checked
/// by [`Descriptor::validate`], which the [`sysreg!`](crate::sysreg) macro calls at compile time.
#[derive(Clone, Copy, Debug)]
pub struct Descriptor {
    /// The name of the register, in lower case, e.g. `mpam0_el1`.
    pub name: &'static str,
    /// The width of the register.
    pub width: RegisterWidth,
    /// The lowest exception level from which the register may be accessed.
    pub min_el: ExceptionLevel,
    /// Which accesses the register allows.
    pub access: Access,
    /// The fields of the register, in order. Bits not covered by any field are RES0 or otherwise
    /// not modelled.
    pub fields: &'static [Field],
}

impl Descriptor {
    /// Panics if the descriptor is malformed.
    ///
    /// A descriptor is well-formed if it has at most [`MAX_FIELDS`] fields, every field is at least
    /// one bit wide and fits within the bits transferred by a single access, no two fields overlap,
    /// and no two fields share a name.
    pub const fn validate(&self) {
        assert!(self.fields.len() <= MAX_FIELDS, "too many fields in system register");
        let access_bits = self.width.access_bits();
        let mut occupied = 0;
        let mut i = 0;
        while i < self.fields.len() {
            let field = &self.fields[i];
            assert!(field.width > 0, "system register field has zero width");
            assert!(
                (field.offset as u32 + field.width as u32) <= access_bits,
                "system register field extends past the end of the register"
            );
            assert!(
                occupied & field.shifted_mask() == 0,
                "system register fields overlap"
            );
            occupied |= field.shifted_mask();
            let mut j = 0;
            while j < i {
                assert!(
                    !str_eq(self.fields[j].name, field.name),
                    "duplicate system register field name"
                );
                j += 1;
            }
            i += 1;
        }
    }

    /// Returns the index of the field with the given name, if there is one.
    pub const fn field_index(&self, name: &str) -> Option<usize> {
        let mut i = 0;
        while i < self.fields.len() {
            if str_eq(self.fields[i].name, name) {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    /// Returns the field with the given name, if there is one.
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns a mask of all bits covered by some field.
    pub const fn modeled_mask(&self) -> u64 {
        let mut mask = 0;
        let mut i = 0;
        while i < self.fields.len() {
            mask |= self.fields[i].shifted_mask();
            i += 1;
        }
        mask
    }

    /// Returns whether the register can be written.
    pub const fn is_writable(&self) -> bool {
        self.access.contains(Access::WRITE)
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}
