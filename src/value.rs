// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Decoded register values and partial field assignments.

use crate::{Field, MAX_FIELDS, SystemRegister, SysregError};
use arrayvec::ArrayVec;
use core::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
};

/// A handle to one field of the system register `R`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldRef<R> {
    index: usize,
    register: PhantomData<R>,
}

impl<R: SystemRegister> FieldRef<R> {
    /// Returns a handle to the field of `R` with the given name.
    ///
    /// # Panics
    ///
    /// Panics if `R` has no such field. When used to initialise a constant this is a compile-time
    /// error.
    pub const fn named(name: &str) -> Self {
        match R::DESCRIPTOR.field_index(name) {
            Some(index) => Self {
                index,
                register: PhantomData,
            },
            None => panic!("no such field in system register"),
        }
    }

    /// Returns the description of the field.
    pub fn field(self) -> &'static Field {
        &R::DESCRIPTOR.fields[self.index]
    }
}

/// A set of assignments to some of the fields of the system register `R`.
///
/// Fields which are not assigned either keep their current value or are cleared, depending on how
/// the update is applied. See [`Sysreg::safe_write`](crate::Sysreg::safe_write) and
/// [`Sysreg::unsafe_write`](crate::Sysreg::unsafe_write).
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct FieldUpdate<R> {
    values: [Option<u64>; MAX_FIELDS],
    register: PhantomData<R>,
}

impl<R: SystemRegister> FieldUpdate<R> {
    /// Creates an update which doesn't assign any fields.
    pub const fn new() -> Self {
        Self {
            values: [None; MAX_FIELDS],
            register: PhantomData,
        }
    }

    /// Assigns `value` to the given field, replacing any previous assignment.
    ///
    /// The value is checked against the field when the update is applied.
    #[must_use]
    pub fn set(mut self, field: FieldRef<R>, value: u64) -> Self {
        self.values[field.index] = Some(value);
        self
    }

    /// Assigns `value` to the field with the given name.
    pub fn set_named(mut self, name: &'static str, value: u64) -> Result<Self, SysregError> {
        let index = R::DESCRIPTOR
            .field_index(name)
            .ok_or(SysregError::UnknownField {
                register: R::DESCRIPTOR.name,
                name,
            })?;
        self.values[index] = Some(value);
        Ok(self)
    }

    /// Returns the value assigned to the given field, if any.
    pub fn get(&self, field: FieldRef<R>) -> Option<u64> {
        self.values[field.index]
    }

    /// Returns whether no fields are assigned.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Checks every assigned value against its field's width and validator.
    pub fn validate(&self) -> Result<(), SysregError> {
        for (field, value) in self.assignments() {
            field.insert(R::DESCRIPTOR.name, value)?;
        }
        Ok(())
    }

    /// Returns the assigned fields and their values, in field order.
    pub fn assignments(&self) -> impl Iterator<Item = (&'static Field, u64)> + '_ {
        R::DESCRIPTOR
            .fields
            .iter()
            .zip(self.values)
            .filter_map(|(field, value)| Some((field, value?)))
    }
}

impl<R: SystemRegister> Default for FieldUpdate<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SystemRegister> Debug for FieldUpdate<R> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut map = f.debug_struct(R::DESCRIPTOR.name);
        for (field, value) in self.assignments() {
            map.field(field.name, &format_args!("{value:#x}"));
        }
        map.finish_non_exhaustive()
    }
}

/// The contents of the system register `R` as a value for each of its fields.
///
/// Values produced by [`DecodedValue::decode`] always fit their fields. Values assigned with
/// [`DecodedValue::set`] are only checked when the value is encoded.
#[derive(Clone, Eq, PartialEq)]
pub struct DecodedValue<R> {
    values: ArrayVec<u64, MAX_FIELDS>,
    register: PhantomData<R>,
}

impl<R: SystemRegister> DecodedValue<R> {
    /// Unpacks a raw register value into its fields. Bits not covered by any field are dropped.
    pub fn decode(raw: u64) -> Self {
        Self {
            values: R::DESCRIPTOR
                .fields
                .iter()
                .map(|field| field.extract(raw))
                .collect(),
            register: PhantomData,
        }
    }

    /// Returns a value with every field zero.
    pub fn zeroed() -> Self {
        Self::decode(0)
    }

    /// Packs the field values into a raw register value.
    ///
    /// Fails if any field value doesn't fit in its field or is rejected by the field's validator.
    pub fn encode(&self) -> Result<u64, SysregError> {
        self.fields().try_fold(0, |raw, (field, value)| {
            Ok(raw | field.insert(R::DESCRIPTOR.name, value)?)
        })
    }

    /// Returns the value of the given field.
    pub fn get(&self, field: FieldRef<R>) -> u64 {
        self.values[field.index]
    }

    /// Returns the value of the field with the given name, if the register has such a field.
    pub fn field(&self, name: &str) -> Option<u64> {
        R::DESCRIPTOR
            .field_index(name)
            .map(|index| self.values[index])
    }

    /// Sets the given field to `value`.
    pub fn set(&mut self, field: FieldRef<R>, value: u64) {
        self.values[field.index] = value;
    }

    /// Returns the value with the given field set to `value`.
    #[must_use]
    pub fn with(mut self, field: FieldRef<R>, value: u64) -> Self {
        self.set(field, value);
        self
    }

    /// Overwrites the fields assigned by `update`, leaving all others unchanged.
    pub fn apply(&mut self, update: &FieldUpdate<R>) {
        for (value, assigned) in self.values.iter_mut().zip(update.values) {
            if let Some(assigned) = assigned {
                *value = assigned;
            }
        }
    }

    /// Returns each field of the register along with its value.
    pub fn fields(&self) -> impl Iterator<Item = (&'static Field, u64)> + '_ {
        R::DESCRIPTOR.fields.iter().zip(self.values.iter().copied())
    }
}

/// Converts a partial update into a full value, with all unassigned fields zero.
impl<R: SystemRegister> From<FieldUpdate<R>> for DecodedValue<R> {
    fn from(update: FieldUpdate<R>) -> Self {
        let mut value = Self::zeroed();
        value.apply(&update);
        value
    }
}

impl<R: SystemRegister> From<&FieldUpdate<R>> for DecodedValue<R> {
    fn from(update: &FieldUpdate<R>) -> Self {
        Self::from(*update)
    }
}

impl<R: SystemRegister> Debug for DecodedValue<R> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut map = f.debug_struct(R::DESCRIPTOR.name);
        for (field, value) in self.fields() {
            map.field(field.name, &format_args!("{value:#x}"));
        }
        map.finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        ApdakeyhiEl1, ApdakeyloEl1, ApgakeyhiEl1, ApgakeyloEl1, CnthpsCvalEl2, CnthvTvalEl2,
        Descriptor, Mpam0El1, MpidrEl1, PmscrEl2, ScxtnumEl1, mpam0_el1, mpidr_el1, pmscr_el2,
        registers::REGISTERS,
    };

    #[test]
    fn decode_mpam0_el1() {
        let value = DecodedValue::<Mpam0El1>::decode(0x0000_0a05_0002_0001);
        assert_eq!(value.get(mpam0_el1::PARTID_I), 1);
        assert_eq!(value.get(mpam0_el1::PARTID_D), 2);
        assert_eq!(value.get(mpam0_el1::PMG_I), 5);
        assert_eq!(value.get(mpam0_el1::PMG_D), 0xa);
        assert_eq!(value.field("pmg_d"), Some(0xa));
        assert_eq!(value.field("mpamen"), None);
    }

    #[test]
    fn decode_drops_unmodeled_bits() {
        let value = DecodedValue::<Mpam0El1>::decode(0xffff_0000_0000_0000);
        assert_eq!(value, DecodedValue::zeroed());
        assert_eq!(value.encode(), Ok(0));
    }

    const SAMPLES: [u64; 7] = [
        0,
        1,
        0x8000_0000_0000_0000,
        0x5555_5555_5555_5555,
        0xaaaa_aaaa_aaaa_aaaa,
        0x0123_4567_89ab_cdef,
        u64::MAX,
    ];

    /// Checks that decoding and re-encoding any value of `R` gives back its modelled bits, or a
    /// `ReservedValue` error if one of the fields holds a reserved encoding.
    pub(crate) fn assert_round_trips<R: SystemRegister>() {
        for sample in SAMPLES {
            let raw = sample & R::DESCRIPTOR.modeled_mask();
            let encoded = DecodedValue::<R>::decode(raw).encode();
            let reserved = R::DESCRIPTOR.fields.iter().any(|field| {
                field
                    .validator
                    .is_some_and(|is_valid| !is_valid(field.extract(raw)))
            });
            if reserved {
                assert!(
                    matches!(encoded, Err(SysregError::ReservedValue { .. })),
                    "{} {raw:#x}: {encoded:?}",
                    R::DESCRIPTOR.name
                );
            } else {
                assert_eq!(encoded, Ok(raw), "{} {raw:#x}", R::DESCRIPTOR.name);
            }
        }
    }

    #[test]
    fn round_trip_all_registers() {
        let checks: [(&Descriptor, fn()); 10] = [
            (ApdakeyloEl1::DESCRIPTOR, assert_round_trips::<ApdakeyloEl1>),
            (ApdakeyhiEl1::DESCRIPTOR, assert_round_trips::<ApdakeyhiEl1>),
            (ApgakeyloEl1::DESCRIPTOR, assert_round_trips::<ApgakeyloEl1>),
            (ApgakeyhiEl1::DESCRIPTOR, assert_round_trips::<ApgakeyhiEl1>),
            (CnthpsCvalEl2::DESCRIPTOR, assert_round_trips::<CnthpsCvalEl2>),
            (CnthvTvalEl2::DESCRIPTOR, assert_round_trips::<CnthvTvalEl2>),
            (Mpam0El1::DESCRIPTOR, assert_round_trips::<Mpam0El1>),
            (PmscrEl2::DESCRIPTOR, assert_round_trips::<PmscrEl2>),
            (ScxtnumEl1::DESCRIPTOR, assert_round_trips::<ScxtnumEl1>),
            (MpidrEl1::DESCRIPTOR, assert_round_trips::<MpidrEl1>),
        ];
        for descriptor in REGISTERS {
            assert!(
                checks.iter().any(|(checked, _)| checked.name == descriptor.name),
                "{} not checked",
                descriptor.name
            );
        }
        for (_, check) in checks {
            check();
        }
    }

    #[test]
    fn round_trip_reserved_pct() {
        // 0xaaaa... puts the reserved encoding 0b10 in PMSCR_EL2.PCT.
        assert_eq!(
            DecodedValue::<PmscrEl2>::decode(0xaaaa_aaaa_aaaa_aaaa).encode(),
            Err(SysregError::ReservedValue {
                register: "pmscr_el2",
                field: "pct",
                value: 0b10,
            })
        );
        assert_eq!(
            DecodedValue::<PmscrEl2>::decode(0x5555_5555_5555_5555).encode(),
            Ok(0x51)
        );
    }

    #[test]
    fn round_trip_typed() {
        let raw = 0x0000_2233_4455_6677;
        assert_eq!(DecodedValue::<Mpam0El1>::decode(raw).encode(), Ok(raw));
        let raw = 0x0000_00ff_4100_0201;
        assert_eq!(DecodedValue::<MpidrEl1>::decode(raw).encode(), Ok(raw));
    }

    #[test]
    fn encode_overflow() {
        let value = DecodedValue::<Mpam0El1>::zeroed().with(mpam0_el1::PMG_I, 0x100);
        assert_eq!(
            value.encode(),
            Err(SysregError::FieldOverflow {
                register: "mpam0_el1",
                field: "pmg_i",
                value: 0x100,
                width: 8,
            })
        );
    }

    #[test]
    fn encode_reserved() {
        let value = DecodedValue::<PmscrEl2>::zeroed().with(pmscr_el2::PCT, 0b10);
        assert_eq!(
            value.encode(),
            Err(SysregError::ReservedValue {
                register: "pmscr_el2",
                field: "pct",
                value: 0b10,
            })
        );
        assert_eq!(value.with(pmscr_el2::PCT, 0b11).encode(), Ok(0b1100_0000));
    }

    #[test]
    fn update_defaults_to_zero() {
        let update = mpam0_el1::update().set(mpam0_el1::PMG_D, 3);
        let value = DecodedValue::from(update);
        assert_eq!(value.encode(), Ok(0x0000_0300_0000_0000));
    }

    #[test]
    fn apply_keeps_unassigned_fields() {
        let mut value = DecodedValue::<Mpam0El1>::decode(0x0000_0a05_0002_0001);
        value.apply(&mpam0_el1::update().set(mpam0_el1::PARTID_D, 7));
        assert_eq!(value.encode(), Ok(0x0000_0a05_0007_0001));
    }

    #[test]
    fn update_set_twice() {
        let update = mpam0_el1::update()
            .set(mpam0_el1::PARTID_I, 1)
            .set(mpam0_el1::PARTID_I, 2);
        assert_eq!(update.get(mpam0_el1::PARTID_I), Some(2));
        assert_eq!(update.get(mpam0_el1::PARTID_D), None);
        assert_eq!(update.assignments().count(), 1);
    }

    #[test]
    fn update_by_name() {
        let update = FieldUpdate::<Mpam0El1>::new().set_named("pmg_i", 4).unwrap();
        assert_eq!(update.get(mpam0_el1::PMG_I), Some(4));
        assert_eq!(
            FieldUpdate::<Mpam0El1>::new().set_named("partid", 4),
            Err(SysregError::UnknownField {
                register: "mpam0_el1",
                name: "partid",
            })
        );
    }

    #[test]
    fn validate_update() {
        assert!(FieldUpdate::<Mpam0El1>::new().is_empty());
        assert_eq!(mpam0_el1::update().set(mpam0_el1::PARTID_I, 0xffff).validate(), Ok(()));
        assert!(
            mpam0_el1::update()
                .set(mpam0_el1::PARTID_I, 0x1_0000)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn field_handles() {
        assert_eq!(mpidr_el1::AFF3.field().offset, 32);
        assert_eq!(mpidr_el1::MT.field().width, 1);
        assert_eq!(mpam0_el1::PARTID_D.field().name, "partid_d");
    }

    #[test]
    fn debug_decoded_value() {
        assert_eq!(
            format!("{:?}", DecodedValue::<Mpam0El1>::decode(0x0000_0a05_0002_0001)),
            "mpam0_el1 { partid_i: 0x1, partid_d: 0x2, pmg_i: 0x5, pmg_d: 0xa }"
        );
        assert_eq!(
            format!("{:?}", mpam0_el1::update().set(mpam0_el1::PMG_I, 5)),
            "mpam0_el1 { pmg_i: 0x5, .. }"
        );
    }
}
