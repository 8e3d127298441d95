//! Newtype ids for backend-owned records.
//!
//! Every record the dashboard manages carries a stable numeric id assigned by
//! the backend. Wrapping them keeps a company id from being passed where a job
//! id is expected.

/// Define a type-safe id wrapper around `i64`.
///
/// ```rust
/// # use jatim_bissa_core::define_id;
/// define_id!(ShiftId);
///
/// let id = ShiftId::new(7);
/// assert_eq!(id.as_i64(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Default,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw backend id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw backend id.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(AdminId);
define_id!(CompanyId);
define_id!(JobSeekerId);
define_id!(JobId);
define_id!(ApplicationId);
define_id!(ProvinceId);
define_id!(RegencyId);
