// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Typed access to Arm CPU system registers.
//!
//! Each system register is described by a static [`Descriptor`] listing its named bitfields. Every
//! register is then accessed through the same four operations, implemented once by [`Sysreg`]:
//!
//! - [`read`](Sysreg::read) reads the register and decodes it into a [`DecodedValue`].
//! - [`unsafe_write`](Sysreg::unsafe_write) encodes and writes a complete value. Fields not set
//!   by a partial [`FieldUpdate`] are written as zero.
//! - [`safe_write`](Sysreg::safe_write) writes only the fields set by a [`FieldUpdate`], keeping
//!   the current value of all others.
//! - [`read_modify_write`](Sysreg::read_modify_write) does the same and returns the value written.
//!
//! The hardware itself is reached through a [`RawAccess`] implementation which is passed in to each
//! operation: `Aarch64Sysregs` on AArch64, or [`FakeSysregs`] in tests.
//!
//! The [`sysreg!`] macro defines a register along with named functions for each operation, e.g.
//! [`read_mpam0_el1`] and [`safe_write_mpam0_el1`].

#![cfg_attr(not(any(test, feature = "fakes")), no_std)]

#[macro_use]
mod macros;

mod accessor;
#[cfg(target_arch = "aarch64")]
mod aarch64;
mod descriptor;
mod error;
#[cfg(any(test, feature = "fakes"))]
pub mod fake;
mod manual;
mod registers;
mod value;

#[cfg(target_arch = "aarch64")]
pub use aarch64::Aarch64Sysregs;
pub use accessor::{RawAccess, SystemRegister, Sysreg};
pub use descriptor::{Access, Descriptor, ExceptionLevel, Field, Half, MAX_FIELDS, RegisterWidth};
pub use error::SysregError;
#[cfg(any(test, feature = "fakes"))]
pub use fake::FakeSysregs;
pub use manual::{PhysicalTimestamp, read_apdakey, read_apgakey, write_apdakey, write_apgakey};
pub use registers::*;
pub use value::{DecodedValue, FieldRef, FieldUpdate};

#[doc(hidden)]
pub use paste as _paste;
