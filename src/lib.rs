//! CPE Name - Common Platform Enumeration 2.3 naming and matching
//!
//! This library provides the Well-Formed Name (WFN) model of CPE 2.3, the
//! two textual bindings of a WFN (the legacy CPE 2.2 URI and the CPE 2.3
//! formatted string), and attribute-wise name matching.
//!
//! ```
//! use cpe_name::{is_superset, WellFormedName};
//!
//! let installed: WellFormedName = "cpe:/a:microsoft:internet_explorer:8.0.6001:beta".parse().unwrap();
//! let rule: WellFormedName = "cpe:2.3:a:microsoft:internet_explorer:8.*:*:*:*:*:*:*:*".parse().unwrap();
//! assert!(is_superset(&rule, &installed));
//! ```

pub mod binder;
pub mod error;
pub mod escape;
pub mod logical_value;
pub mod matcher;
pub mod unbinder;
pub mod well_formed_name;

pub use binder::{bind_to_fs, bind_to_uri, pct_encode};
pub use error::{CpeError, ErrorKind, Result};
pub use logical_value::LogicalValue;
pub use matcher::{
    compare, compare_strings, compare_wfns, is_disjoint, is_equal, is_subset, is_superset,
    Comparison, Relation,
};
pub use unbinder::{add_quoting, decode, unbind_fs, unbind_uri, unpack};
pub use well_formed_name::{validate_string_value, Attribute, Value, WellFormedName};
