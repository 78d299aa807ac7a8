// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Definitions of the system registers supported by this crate.

use crate::{Descriptor, Half, RegisterWidth, SystemRegister, manual::is_valid_pct};

sysreg! {
    /// Pointer Authentication Key A for Data, bits [63:0].
    apdakeylo_el1 : S3_0_C2_C2_0, ApdakeyloEl1, RegisterWidth::Bits128(Half::Low), El1, read_write {
        /// Bits [63:0] of the 128-bit key.
        apdakeylo: 0, 64;
    }
}

sysreg! {
    /// Pointer Authentication Key A for Data, bits [127:64].
    apdakeyhi_el1 : S3_0_C2_C2_1, ApdakeyhiEl1, RegisterWidth::Bits128(Half::High), El1, read_write {
        /// Bits [127:64] of the 128-bit key.
        apdakeyhi: 0, 64;
    }
}

sysreg! {
    /// Pointer Authentication Generic Key, bits [63:0].
    apgakeylo_el1 : S3_0_C2_C3_0, ApgakeyloEl1, RegisterWidth::Bits128(Half::Low), El1, read_write {
        /// Bits [63:0] of the 128-bit key.
        apgakeylo: 0, 64;
    }
}

sysreg! {
    /// Pointer Authentication Generic Key, bits [127:64].
    apgakeyhi_el1 : S3_0_C2_C3_1, ApgakeyhiEl1, RegisterWidth::Bits128(Half::High), El1, read_write {
        /// Bits [127:64] of the 128-bit key.
        apgakeyhi: 0, 64;
    }
}

sysreg! {
    /// Counter-timer Secure Physical Timer CompareValue Register (EL2).
    cnthps_cval_el2 : S3_4_C14_C5_2, CnthpsCvalEl2, RegisterWidth::Bits64, El2, read_write {
        /// The compare value of the timer.
        compare_value: 0, 64;
    }
}

sysreg! {
    /// Counter-timer Virtual Timer TimerValue Register (EL2).
    cnthv_tval_el2 : S3_4_C14_C3_0, CnthvTvalEl2, RegisterWidth::Bits32, El2, read_write {
        /// The timer value, as a signed 32-bit count of ticks until the timer condition is met.
        timer_value: 0, 32;
    }
}

sysreg! {
    /// MPAM0 Register (EL1), holding the partition IDs and performance monitoring groups for EL0.
    mpam0_el1 : S3_0_C10_C5_1, Mpam0El1, RegisterWidth::Bits64, El1, read_write {
        /// Partition ID for instruction accesses.
        partid_i: 0, 16;
        /// Partition ID for data accesses.
        partid_d: 16, 16;
        /// Performance monitoring group for instruction accesses.
        pmg_i: 32, 8;
        /// Performance monitoring group for data accesses.
        pmg_d: 40, 8;
    }
}

sysreg! {
    /// Statistical Profiling Control Register (EL2).
    pmscr_el2 : S3_4_C9_C9_0, PmscrEl2, RegisterWidth::Bits64, El2, read_write {
        /// EL0 sampling enable.
        e0hspe: 0, 1;
        /// EL2 sampling enable.
        e2spe: 1, 1;
        /// CONTEXTIDR_EL2 sampling enable.
        cx: 3, 1;
        /// Physical address sample enable.
        pa: 4, 1;
        /// Timestamp enable.
        ts: 5, 1;
        /// Physical timestamp select. See [`PhysicalTimestamp`](crate::PhysicalTimestamp).
        pct: 6, 2 => is_valid_pct;
    }
}

sysreg! {
    /// Software Context Number (EL1).
    scxtnum_el1 : S3_0_C13_C0_7, ScxtnumEl1, RegisterWidth::Bits64, El1, read_write {
        /// Software context number, used to separate execution contexts for speculation.
        software_context_number: 0, 64;
    }
}

sysreg! {
    /// Multiprocessor Affinity Register.
    mpidr_el1, MpidrEl1, RegisterWidth::Bits64, El1, read_only {
        /// Affinity level 0.
        aff0: 0, 8;
        /// Affinity level 1.
        aff1: 8, 8;
        /// Affinity level 2.
        aff2: 16, 8;
        /// Multithreading: the lowest affinity level consists of logical PEs.
        mt: 24, 1;
        /// Uniprocessor system.
        u: 30, 1;
        /// Affinity level 3.
        aff3: 32, 8;
    }
}

/// Descriptors of all the system registers defined by this crate.
pub static REGISTERS: &[&Descriptor] = &[
    ApdakeyloEl1::DESCRIPTOR,
    ApdakeyhiEl1::DESCRIPTOR,
    ApgakeyloEl1::DESCRIPTOR,
    ApgakeyhiEl1::DESCRIPTOR,
    CnthpsCvalEl2::DESCRIPTOR,
    CnthvTvalEl2::DESCRIPTOR,
    Mpam0El1::DESCRIPTOR,
    PmscrEl2::DESCRIPTOR,
    ScxtnumEl1::DESCRIPTOR,
    MpidrEl1::DESCRIPTOR,
];

/// Returns the descriptor of the system register with the given name, if this crate defines it.
pub fn descriptor(name: &str) -> Option<&'static Descriptor> {
    REGISTERS
        .iter()
        .copied()
        .find(|descriptor| descriptor.name == name)
}
