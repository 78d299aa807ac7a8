// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! The generic accessor implementing decoded reads and the three kinds of write for any system
//! register.

use crate::{DecodedValue, Descriptor, FieldUpdate, SysregError};
use core::{fmt::Debug, marker::PhantomData};
use log::{trace, warn};

/// A system register, identified by a zero-sized marker type.
///
/// Implementations are generated by the [`sysreg!`](crate::sysreg) macro.
pub trait SystemRegister: Copy + Debug + Eq + 'static {
    /// The layout and access restrictions of the register.
    const DESCRIPTOR: &'static Descriptor;

    /// Reads the raw value of the register with MRS.
    #[cfg(target_arch = "aarch64")]
    fn read_hw() -> u64;

    /// Writes a raw value to the register with MSR.
    ///
    /// # Safety
    ///
    /// The caller must ensure that writing `value` to the register doesn't violate any
    /// architectural constraints or break any invariants that other code relies on.
    #[cfg(target_arch = "aarch64")]
    unsafe fn write_hw(value: u64);
}

/// The primitive which reads and writes raw system register values.
///
/// Accessing a register from an exception level lower than its
/// [`min_el`](crate::Descriptor::min_el) is a fault outside this model: on hardware it traps, and
/// the fake implementation panics.
pub trait RawAccess {
    /// Returns the raw value of the register `R`.
    fn read_raw<R: SystemRegister>(&self) -> u64;

    /// Writes a raw value to the register `R`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that writing `value` to the register doesn't violate any
    /// architectural constraints or break any invariants that other code relies on.
    unsafe fn write_raw<R: SystemRegister>(&self, value: u64);
}

/// Accessor for the system register `R` through the raw access primitive `A`.
///
/// None of the read-modify-write style operations are atomic. If the register may also be written
/// concurrently, e.g. by an exception handler on the same core, the caller must prevent that (for
/// example by masking interrupts) for the duration of the call or updates may be lost.
#[derive(Debug)]
pub struct Sysreg<'a, R, A> {
    access: &'a A,
    register: PhantomData<R>,
}

impl<'a, R: SystemRegister, A: RawAccess> Sysreg<'a, R, A> {
    /// Creates a new accessor for `R` which uses the given raw access primitive.
    pub const fn new(access: &'a A) -> Self {
        Self {
            access,
            register: PhantomData,
        }
    }

    /// Reads the register and decodes it into its fields.
    pub fn read(&self) -> DecodedValue<R> {
        DecodedValue::decode(self.access.read_raw::<R>())
    }

    /// Encodes `value` and writes it to the register.
    ///
    /// Every field takes the value given; when `value` is converted from a [`FieldUpdate`], any
    /// fields it doesn't assign are written as zero. Nothing is written if any field value is
    /// invalid.
    ///
    /// # Safety
    ///
    /// Only field widths and validators are checked. The caller must ensure that the value is
    /// otherwise legal for the register and that writing it doesn't break any invariants that other
    /// code relies on.
    pub unsafe fn unsafe_write(&self, value: impl Into<DecodedValue<R>>) -> Result<(), SysregError> {
        check_writable(R::DESCRIPTOR)?;
        let value: DecodedValue<R> = value.into();
        let raw = encode(&value)?;
        // SAFETY: The caller promises that the value is legal for the register.
        unsafe { self.write_encoded(raw) };
        Ok(())
    }

    /// Writes the fields assigned by `update` to the register, leaving all other fields at their
    /// current value.
    ///
    /// Bits not covered by any field of the register's [`Descriptor`] are written as zero, whatever
    /// their current value. RES1 bits and any other bits which must be preserved need to be
    /// described as fields.
    pub fn safe_write(&self, update: &FieldUpdate<R>) -> Result<(), SysregError> {
        self.read_modify_write(update)?;
        Ok(())
    }

    /// Reads the register, overwrites the fields assigned by `delta`, and writes the result back.
    ///
    /// Returns the value written. If any assigned value is invalid then the register is neither read
    /// nor written. As with [`safe_write`](Self::safe_write), bits not covered by any field are
    /// written as zero.
    pub fn read_modify_write(&self, delta: &FieldUpdate<R>) -> Result<DecodedValue<R>, SysregError> {
        check_writable(R::DESCRIPTOR)?;
        delta.validate().inspect_err(log_rejected::<R>)?;
        let mut value = self.read();
        value.apply(delta);
        self.write_merged(&value)?;
        Ok(value)
    }

    /// Reads the register, lets `f` modify the decoded value, and writes the result back.
    ///
    /// Returns the value written. If `f` leaves any field with an invalid value then nothing is
    /// written.
    pub fn modify(
        &self,
        f: impl FnOnce(&mut DecodedValue<R>),
    ) -> Result<DecodedValue<R>, SysregError> {
        check_writable(R::DESCRIPTOR)?;
        let mut value = self.read();
        f(&mut value);
        self.write_merged(&value)?;
        Ok(value)
    }

    fn write_merged(&self, value: &DecodedValue<R>) -> Result<(), SysregError> {
        let raw = encode(value)?;
        // SAFETY: Every field either has the value just read from the register or a value supplied
        // by the caller which has been checked against the field's width and validator.
        unsafe { self.write_encoded(raw) };
        Ok(())
    }

    /// # Safety
    ///
    /// Same as `RawAccess::write_raw`.
    unsafe fn write_encoded(&self, raw: u64) {
        trace!("{}: writing {:#x}", R::DESCRIPTOR.name, raw);
        // SAFETY: Our caller promises that the value is safe to write.
        unsafe { self.access.write_raw::<R>(raw) }
    }
}

fn check_writable(descriptor: &Descriptor) -> Result<(), SysregError> {
    if descriptor.is_writable() {
        Ok(())
    } else {
        Err(SysregError::NotWritable {
            register: descriptor.name,
        })
    }
}

fn encode<R: SystemRegister>(value: &DecodedValue<R>) -> Result<u64, SysregError> {
    value.encode().inspect_err(log_rejected::<R>)
}

fn log_rejected<R: SystemRegister>(error: &SysregError) {
    warn!("{}: rejected write: {}", R::DESCRIPTOR.name, error);
}
