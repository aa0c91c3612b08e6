//! Per-property masking for values the caller may read only partially.
//!
//! A granted row read does not imply every column is readable: a social
//! security number, for example, is shown in full only to principals holding
//! [`Permission::ViewSsn`].

use crate::access::{Permission, Principal};

/// Characters left visible at the end of a masked value.
pub const VISIBLE_SUFFIX: usize = 4;

/// Return `value` unchanged if `principal` holds `permission`, else [`mask`] it.
pub fn mask_unless(principal: &Principal, permission: Permission, value: &str) -> String {
    if principal.has_permission(permission) {
        value.to_owned()
    } else {
        mask(value)
    }
}

/// Replace all but the last [`VISIBLE_SUFFIX`] characters with `*`.
///
/// Values of [`VISIBLE_SUFFIX`] characters or fewer are masked entirely.
pub fn mask(value: &str) -> String {
    let len = value.chars().count();
    if len <= VISIBLE_SUFFIX {
        return "*".repeat(len);
    }
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < len - VISIBLE_SUFFIX { '*' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::PrincipalId;

    #[test]
    fn mask_keeps_last_four() {
        assert_eq!(mask("123-45-6789"), "*******6789");
    }

    #[test]
    fn short_values_fully_masked() {
        assert_eq!(mask("1234"), "****");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn mask_counts_characters_not_bytes() {
        assert_eq!(mask("ééééé"), "*éééé");
    }

    #[test]
    fn permission_unmasks() {
        let hr = Principal::new(PrincipalId::new_v4(), "hr", [Permission::ViewSsn]);
        let clerk = Principal::new(PrincipalId::new_v4(), "clerk", [Permission::BasicPrivileges]);
        assert_eq!(mask_unless(&hr, Permission::ViewSsn, "123-45-6789"), "123-45-6789");
        assert_eq!(mask_unless(&clerk, Permission::ViewSsn, "123-45-6789"), "*******6789");
    }
}
