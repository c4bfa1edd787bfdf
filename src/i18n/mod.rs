// SPDX-License-Identifier: PMPL-1.0-or-later

//! Internationalisation for the portal.
//!
//! | Code | Language | Direction |
//! |------|----------|-----------|
//! | en   | English  | ltr       |
//! | ar   | Arabic   | rtl       |
//!
//! The language is the only stored piece of locale state; text direction is
//! always derived from it. Chrome strings fall back to English when a key is
//! missing in the requested language (fail-open, never panics).

mod catalog;

pub use catalog::{t, t_or_key, Direction, Lang};
