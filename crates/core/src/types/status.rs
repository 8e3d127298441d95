//! Status enums for backend records.
//!
//! Each status maps to the lowercase string the backend sends and accepts.
//! Parsing is case-insensitive so `"Active"` and `"ACTIVE"` both work.

use serde::{Deserialize, Serialize};

macro_rules! define_status {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal, $label:literal;)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Value sent to and received from the backend.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Human-readable label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Lenient parse; `None` for values the dashboard does not know.
            #[must_use]
            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|s| s.as_str().eq_ignore_ascii_case(value))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_status! {
    /// Verification state of a registered company.
    CompanyStatus {
        Active => "active", "Active";
        Pending => "pending", "Pending verification";
        Inactive => "inactive", "Inactive";
    }
}

define_status! {
    /// Whether a job seeker account can sign in.
    AccountStatus {
        Active => "active", "Active";
        Inactive => "inactive", "Inactive";
    }
}

define_status! {
    /// Publication state of a job vacancy.
    JobStatus {
        Open => "open", "Open";
        Closed => "closed", "Closed";
        Draft => "draft", "Draft";
    }
}

define_status! {
    /// Review state of a job application.
    ApplicationStatus {
        Pending => "pending", "Pending";
        Reviewed => "reviewed", "Reviewed";
        Accepted => "accepted", "Accepted";
        Rejected => "rejected", "Rejected";
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(JobStatus::parse("OPEN"), Some(JobStatus::Open));
        assert_eq!(CompanyStatus::parse(" pending "), Some(CompanyStatus::Pending));
        assert_eq!(ApplicationStatus::parse("archived"), None);
    }

    #[test]
    fn test_serde_uses_wire_values() {
        let json = serde_json::to_string(&ApplicationStatus::Accepted).unwrap();
        assert_eq!(json, "\"accepted\"");
        let back: AccountStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(back, AccountStatus::Inactive);
    }

    #[test]
    fn test_all_lists_every_variant() {
        assert_eq!(ApplicationStatus::ALL.len(), 4);
        assert_eq!(JobStatus::ALL[0].label(), "Open");
    }
}
