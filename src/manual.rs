// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Manually implemented helpers for particular system registers.

use crate::{
    ApdakeyhiEl1, ApdakeyloEl1, ApgakeyhiEl1, ApgakeyloEl1, DecodedValue, FieldUpdate, Half,
    PmscrEl2, RawAccess, RegisterWidth, SystemRegister, pmscr_el2,
};
use log::trace;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Values for the PCT field of PMSCR_EL2, selecting which counter is used for profiling
/// timestamps.
#[derive(Clone, Copy, Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum PhysicalTimestamp {
    /// Virtual counter.
    Virtual = 0b00,
    /// Physical counter.
    Physical = 0b01,
    /// Guest physical counter, if FEAT_ECV is implemented.
    GuestPhysical = 0b11,
}

/// Returns whether `value` is a defined encoding of PMSCR_EL2.PCT.
pub(crate) fn is_valid_pct(value: u64) -> bool {
    u8::try_from(value).is_ok_and(|value| PhysicalTimestamp::try_from(value).is_ok())
}

impl DecodedValue<PmscrEl2> {
    /// Returns the value of the PCT field, or `None` if it holds a reserved encoding or a value too
    /// large for the field.
    pub fn pct(&self) -> Option<PhysicalTimestamp> {
        u8::try_from(self.get(pmscr_el2::PCT))
            .ok()
            .and_then(|pct| PhysicalTimestamp::try_from(pct).ok())
    }
}

impl FieldUpdate<PmscrEl2> {
    /// Assigns the PCT field.
    #[must_use]
    pub fn pct(self, pct: PhysicalTimestamp) -> Self {
        self.set(pmscr_el2::PCT, u8::from(pct).into())
    }
}

/// Reads a 128-bit value from a register accessed as a low and a high half.
fn read_pair<Lo: SystemRegister, Hi: SystemRegister>(access: &impl RawAccess) -> u128 {
    debug_assert_eq!(Lo::DESCRIPTOR.width, RegisterWidth::Bits128(Half::Low));
    debug_assert_eq!(Hi::DESCRIPTOR.width, RegisterWidth::Bits128(Half::High));
    let lo = access.read_raw::<Lo>();
    let hi = access.read_raw::<Hi>();
    (u128::from(hi) << 64) | u128::from(lo)
}

/// Writes a 128-bit value to a register accessed as a low and a high half, low half first.
///
/// # Safety
///
/// Same as `RawAccess::write_raw`, for both halves.
unsafe fn write_pair<Lo: SystemRegister, Hi: SystemRegister>(access: &impl RawAccess, value: u128) {
    debug_assert_eq!(Lo::DESCRIPTOR.width, RegisterWidth::Bits128(Half::Low));
    debug_assert_eq!(Hi::DESCRIPTOR.width, RegisterWidth::Bits128(Half::High));
    trace!(
        "{}/{}: writing 128-bit value",
        Lo::DESCRIPTOR.name,
        Hi::DESCRIPTOR.name
    );
    // SAFETY: Our caller promises that the value is safe to write to both halves.
    unsafe {
        access.write_raw::<Lo>(value as u64);
        access.write_raw::<Hi>((value >> 64) as u64);
    }
}

/// Returns the 128-bit pointer authentication key A for data, from APDAKeyLo_EL1 and
/// APDAKeyHi_EL1.
pub fn read_apdakey(access: &impl RawAccess) -> u128 {
    read_pair::<ApdakeyloEl1, ApdakeyhiEl1>(access)
}

/// Sets the 128-bit pointer authentication key A for data, in APDAKeyLo_EL1 and APDAKeyHi_EL1.
///
/// # Safety
///
/// Pointer authentication must not be enabled with this key while any pointer signed with the old
/// key is still to be authenticated.
pub unsafe fn write_apdakey(access: &impl RawAccess, key: u128) {
    // SAFETY: Our caller promises that it is safe to change the key.
    unsafe { write_pair::<ApdakeyloEl1, ApdakeyhiEl1>(access, key) }
}

/// Returns the 128-bit generic pointer authentication key, from APGAKeyLo_EL1 and APGAKeyHi_EL1.
pub fn read_apgakey(access: &impl RawAccess) -> u128 {
    read_pair::<ApgakeyloEl1, ApgakeyhiEl1>(access)
}

/// Sets the 128-bit generic pointer authentication key, in APGAKeyLo_EL1 and APGAKeyHi_EL1.
///
/// # Safety
///
/// No code may depend on PACGA results computed with the old key once the key is changed.
pub unsafe fn write_apgakey(access: &impl RawAccess, key: u128) {
    // SAFETY: Our caller promises that it is safe to change the key.
    unsafe { write_pair::<ApgakeyloEl1, ApgakeyhiEl1>(access, key) }
}
