//! Event names and the `before:`/`after:` meta names derived from them.

pub const BEFORE_PREFIX: &str = "before:";
pub const AFTER_PREFIX: &str = "after:";

pub fn before(event: &str) -> String {
    format!("{BEFORE_PREFIX}{event}")
}

pub fn after(event: &str) -> String {
    format!("{AFTER_PREFIX}{event}")
}

/// Whether `event` is itself a meta name. Emitting one directly is allowed
/// but almost always a mistake.
pub fn is_meta(event: &str) -> bool {
    event.starts_with(BEFORE_PREFIX) || event.starts_with(AFTER_PREFIX)
}

/// The three registry keys dispatched for `event`, in dispatch order.
pub(crate) fn phases(event: &str) -> [String; 3] {
    [before(event), event.to_owned(), after(event)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_wrap_the_main_name() {
        assert_eq!(phases("login"), ["before:login", "login", "after:login"]);
    }

    #[test]
    fn meta_names_nest() {
        assert!(is_meta("before:x"));
        assert!(is_meta("after:x"));
        assert!(!is_meta("x:before"));
        assert_eq!(before("before:x"), "before:before:x");
    }
}
