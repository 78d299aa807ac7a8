// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

/// Defines a system register: a marker type implementing [`SystemRegister`](crate::SystemRegister)
/// with the given layout, a module of handles for its fields, and public functions to access it.
///
/// ```ignore
/// sysreg! {
///     /// Doc comment for the marker type.
///     $sysreg : $asm_sysreg, $type, $width, $min_el, read_write | read_only {
///         /// Doc comment for the field handle.
///         $field: $offset, $width $(=> $validator)?;
///         ...
///     }
/// }
/// ```
///
/// `$asm_sysreg` is the name used in the MRS and MSR instructions, which may be a generic
/// `S<op0>_<op1>_<Cn>_<Cm>_<op2>` encoding. If it is omitted then `$sysreg` is used.
///
/// For a register `$sysreg` this generates:
///
/// - `pub struct $type`, the marker type.
/// - `pub mod $sysreg`, with a `FieldRef` constant for each field named after it in upper case, and
///   `update()` to start a [`FieldUpdate`](crate::FieldUpdate).
/// - `read_$sysreg`, which reads and decodes the register.
/// - For `read_write` registers, `unsafe_write_$sysreg`, `safe_write_$sysreg` and
///   `read_modify_write_$sysreg`, which behave like the [`Sysreg`](crate::Sysreg) methods of the
///   same names.
///
/// The layout is checked at compile time.
#[macro_export]
macro_rules! sysreg {
    (@access read_write) => {
        $crate::Access::READ.union($crate::Access::WRITE)
    };
    (@access read_only) => {
        $crate::Access::READ
    };
    (@mrs $asm_sysreg:ident) => {{
        let value;
        // SAFETY: Reading a system register has no side effects on memory. Reading it from too low
        // an exception level traps rather than returning.
        unsafe {
            core::arch::asm!(
                concat!("mrs {value}, ", stringify!($asm_sysreg)),
                options(nostack),
                value = out(reg) value,
            );
        }
        value
    }};
    (@msr read_write, $sysreg:ident : $asm_sysreg:ident, $value:ident) => {
        // SAFETY: The caller promises that it is safe to write `value` to the given `$sysreg`.
        unsafe {
            core::arch::asm!(
                concat!("msr ", stringify!($asm_sysreg), ", {value}"),
                options(nostack),
                value = in(reg) $value,
            );
        }
    };
    (@msr read_only, $sysreg:ident : $asm_sysreg:ident, $value:ident) => {
        let _ = $value;
        panic!(concat!(stringify!($sysreg), " is read-only"));
    };
    (@writers read_only, $sysreg:ident, $type:ident) => {};
    (@writers read_write, $sysreg:ident, $type:ident) => {
        $crate::_paste::paste! {
            #[doc = "Encodes `value` and writes it to the `"]
            #[doc = stringify!($sysreg)]
            #[doc = "` system register. Fields which `value` doesn't set are written as zero."]
            ///
            /// # Safety
            ///
            /// Only field widths and validators are checked. The caller must ensure that the value
            /// is otherwise legal for the register and that writing it doesn't break any invariants
            /// that other code relies on.
            pub unsafe fn [< unsafe_write_ $sysreg >]<A: $crate::RawAccess>(
                access: &A,
                value: impl Into<$crate::DecodedValue<$type>>,
            ) -> Result<(), $crate::SysregError> {
                // SAFETY: Our caller promises that the value is legal for the register.
                unsafe { $crate::Sysreg::<$type, A>::new(access).unsafe_write(value) }
            }

            #[doc = "Writes the fields assigned by `update` to the `"]
            #[doc = stringify!($sysreg)]
            #[doc = "` system register, leaving all other fields at their current value."]
            pub fn [< safe_write_ $sysreg >]<A: $crate::RawAccess>(
                access: &A,
                update: &$crate::FieldUpdate<$type>,
            ) -> Result<(), $crate::SysregError> {
                $crate::Sysreg::<$type, A>::new(access).safe_write(update)
            }

            #[doc = "Reads the `"]
            #[doc = stringify!($sysreg)]
            #[doc = "` system register, overwrites the fields assigned by `delta` and writes the"]
            #[doc = "result back. Returns the value written."]
            pub fn [< read_modify_write_ $sysreg >]<A: $crate::RawAccess>(
                access: &A,
                delta: &$crate::FieldUpdate<$type>,
            ) -> Result<$crate::DecodedValue<$type>, $crate::SysregError> {
                $crate::Sysreg::<$type, A>::new(access).read_modify_write(delta)
            }
        }
    };
    (
        $(#[$attributes:meta])*
        $sysreg:ident : $asm_sysreg:ident, $type:ident, $width:expr, $min_el:ident, $access:ident {
            $(
                $(#[$field_attributes:meta])*
                $field:ident : $offset:literal, $bits:literal $(=> $validator:path)?;
            )*
        }
    ) => {
        $(#[$attributes])*
        #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
        pub struct $type;

        impl $crate::SystemRegister for $type {
            const DESCRIPTOR: &'static $crate::Descriptor = &$crate::Descriptor {
                name: stringify!($sysreg),
                width: $width,
                min_el: $crate::ExceptionLevel::$min_el,
                access: $crate::sysreg!(@access $access),
                fields: &[
                    $(
                        $crate::Field::new(stringify!($field), $offset, $bits)
                            $(.with_validator($validator))?,
                    )*
                ],
            };

            #[cfg(target_arch = "aarch64")]
            #[inline(always)]
            fn read_hw() -> u64 {
                $crate::sysreg!(@mrs $asm_sysreg)
            }

            #[cfg(target_arch = "aarch64")]
            #[inline(always)]
            unsafe fn write_hw(value: u64) {
                $crate::sysreg!(@msr $access, $sysreg : $asm_sysreg, value);
            }
        }

        const _: () = <$type as $crate::SystemRegister>::DESCRIPTOR.validate();

        $crate::_paste::paste! {
            #[doc = "Handles for the fields of the `"]
            #[doc = stringify!($sysreg)]
            #[doc = "` system register."]
            pub mod $sysreg {
                $(
                    $(#[$field_attributes])*
                    pub const [< $field:upper >]: $crate::FieldRef<super::$type> =
                        $crate::FieldRef::named(stringify!($field));
                )*

                /// Starts a set of field assignments for the register, with no fields assigned.
                pub fn update() -> $crate::FieldUpdate<super::$type> {
                    $crate::FieldUpdate::new()
                }
            }

            #[doc = "Reads the `"]
            #[doc = stringify!($sysreg)]
            #[doc = "` system register and decodes it into its fields."]
            pub fn [< read_ $sysreg >]<A: $crate::RawAccess>(
                access: &A,
            ) -> $crate::DecodedValue<$type> {
                $crate::Sysreg::<$type, A>::new(access).read()
            }
        }

        $crate::sysreg!(@writers $access, $sysreg, $type);
    };
    (
        $(#[$attributes:meta])*
        $sysreg:ident, $type:ident, $width:expr, $min_el:ident, $access:ident { $($fields:tt)* }
    ) => {
        $crate::sysreg! {
            $(#[$attributes])*
            $sysreg : $sysreg, $type, $width, $min_el, $access { $($fields)* }
        }
    };
}
