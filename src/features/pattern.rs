//! Pattern section - flags passwords containing a denylisted substring.

use crate::denylist::Denylist;

/// Returns `true` if any denylist token occurs in the password,
/// ignoring case.
pub fn common_pattern_section(password: &str, denylist: &Denylist) -> bool {
    denylist.matches(password)
}
