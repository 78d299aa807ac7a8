// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Raw system register access on real hardware.

use crate::{RawAccess, SystemRegister};

/// Accesses the system registers of the current CPU with the MRS and MSR instructions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Aarch64Sysregs;

impl RawAccess for Aarch64Sysregs {
    #[inline(always)]
    fn read_raw<R: SystemRegister>(&self) -> u64 {
        R::read_hw()
    }

    #[inline(always)]
    unsafe fn write_raw<R: SystemRegister>(&self, value: u64) {
        // SAFETY: Our caller promises that it is safe to write `value` to `R`, which is the same
        // requirement as `write_hw` has.
        unsafe { R::write_hw(value) }
    }
}
