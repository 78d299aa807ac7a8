// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Fake system registers for unit tests.

use crate::{ExceptionLevel, RawAccess, SystemRegister};
use std::{collections::BTreeMap, sync::Mutex};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct FakeRegister {
    value: u64,
    reads: usize,
    writes: usize,
}

/// A set of fake system registers, for testing code which accesses system registers without running
/// on real hardware.
///
/// Registers which haven't been written have the value 0. Each read and write through
/// [`RawAccess`] is counted. Accessing a register from an exception level lower than the register
/// allows panics, standing in for the trap that real hardware would take.
#[derive(Debug)]
pub struct FakeSysregs {
    current_el: ExceptionLevel,
    registers: Mutex<BTreeMap<&'static str, FakeRegister>>,
}

impl FakeSysregs {
    /// Creates a new set of fake system registers, all zero, accessed from the given exception
    /// level.
    pub const fn new(current_el: ExceptionLevel) -> Self {
        Self {
            current_el,
            registers: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the exception level the fake registers are accessed from.
    pub fn current_el(&self) -> ExceptionLevel {
        self.current_el
    }

    /// Sets the value of the fake register `R`, without counting it as a write.
    pub fn set<R: SystemRegister>(&self, value: u64) {
        self.with_register::<R, _>(|register| {
            register.value = value & R::DESCRIPTOR.width.access_mask();
        });
    }

    /// Returns the current value of the fake register `R`, without counting it as a read.
    pub fn get<R: SystemRegister>(&self) -> u64 {
        self.with_register::<R, _>(|register| register.value)
    }

    /// Returns the number of times `R` has been read through [`RawAccess`].
    pub fn reads<R: SystemRegister>(&self) -> usize {
        self.with_register::<R, _>(|register| register.reads)
    }

    /// Returns the number of times `R` has been written through [`RawAccess`].
    pub fn writes<R: SystemRegister>(&self) -> usize {
        self.with_register::<R, _>(|register| register.writes)
    }

    /// Resets all fake registers to zero, and clears the access counts.
    pub fn reset(&self) {
        self.registers.lock().unwrap().clear();
    }

    fn with_register<R: SystemRegister, T>(&self, f: impl FnOnce(&mut FakeRegister) -> T) -> T {
        f(self
            .registers
            .lock()
            .unwrap()
            .entry(R::DESCRIPTOR.name)
            .or_default())
    }

    fn check_privilege<R: SystemRegister>(&self) {
        let descriptor = R::DESCRIPTOR;
        if self.current_el < descriptor.min_el {
            panic!(
                "Privilege fault: {} requires {:?} but running at {:?}",
                descriptor.name, descriptor.min_el, self.current_el
            );
        }
    }
}

impl Default for FakeSysregs {
    fn default() -> Self {
        Self::new(ExceptionLevel::El3)
    }
}

impl RawAccess for FakeSysregs {
    fn read_raw<R: SystemRegister>(&self) -> u64 {
        self.check_privilege::<R>();
        self.with_register::<R, _>(|register| {
            register.reads += 1;
            register.value
        })
    }

    unsafe fn write_raw<R: SystemRegister>(&self, value: u64) {
        self.check_privilege::<R>();
        assert!(
            R::DESCRIPTOR.is_writable(),
            "{} is read-only",
            R::DESCRIPTOR.name
        );
        self.with_register::<R, _>(|register| {
            register.value = value & R::DESCRIPTOR.width.access_mask();
            register.writes += 1;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CnthvTvalEl2, Mpam0El1, MpidrEl1, PmscrEl2, ScxtnumEl1};

    #[test]
    fn unwritten_registers_are_zero() {
        let sysregs = FakeSysregs::default();
        assert_eq!(sysregs.read_raw::<ScxtnumEl1>(), 0);
        assert_eq!(sysregs.reads::<ScxtnumEl1>(), 1);
        assert_eq!(sysregs.reads::<Mpam0El1>(), 0);
    }

    #[test]
    fn counts_accesses() {
        let sysregs = FakeSysregs::new(ExceptionLevel::El1);
        sysregs.set::<ScxtnumEl1>(42);
        assert_eq!(sysregs.get::<ScxtnumEl1>(), 42);
        assert_eq!(sysregs.reads::<ScxtnumEl1>(), 0);

        // SAFETY: The register is fake.
        unsafe {
            sysregs.write_raw::<ScxtnumEl1>(43);
            sysregs.write_raw::<ScxtnumEl1>(44);
        }
        assert_eq!(sysregs.read_raw::<ScxtnumEl1>(), 44);
        assert_eq!(sysregs.reads::<ScxtnumEl1>(), 1);
        assert_eq!(sysregs.writes::<ScxtnumEl1>(), 2);
    }

    #[test]
    fn writes_truncated_to_register_width() {
        let sysregs = FakeSysregs::new(ExceptionLevel::El2);
        // SAFETY: The register is fake.
        unsafe {
            sysregs.write_raw::<CnthvTvalEl2>(0x1234_5678_9abc_def0);
        }
        assert_eq!(sysregs.get::<CnthvTvalEl2>(), 0x9abc_def0);
    }

    #[test]
    fn reset() {
        let sysregs = FakeSysregs::new(ExceptionLevel::El2);
        sysregs.set::<PmscrEl2>(0x3);
        sysregs.read_raw::<PmscrEl2>();
        sysregs.reset();
        assert_eq!(sysregs.get::<PmscrEl2>(), 0);
        assert_eq!(sysregs.reads::<PmscrEl2>(), 0);
    }

    #[test]
    #[should_panic(expected = "Privilege fault: pmscr_el2 requires El2 but running at El1")]
    fn read_from_lower_el() {
        let sysregs = FakeSysregs::new(ExceptionLevel::El1);
        sysregs.read_raw::<PmscrEl2>();
    }

    #[test]
    #[should_panic(expected = "Privilege fault")]
    fn write_from_lower_el() {
        let sysregs = FakeSysregs::new(ExceptionLevel::El0);
        // SAFETY: The register is fake.
        unsafe {
            sysregs.write_raw::<Mpam0El1>(1);
        }
    }

    #[test]
    #[should_panic(expected = "mpidr_el1 is read-only")]
    fn write_read_only() {
        let sysregs = FakeSysregs::new(ExceptionLevel::El1);
        // SAFETY: The register is fake.
        unsafe {
            sysregs.write_raw::<MpidrEl1>(1);
        }
    }
}
