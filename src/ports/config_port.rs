//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Semicolon-separated list value, trimmed, empty entries dropped.
    /// Missing keys yield an empty list.
    fn get_list(&self, section: &str, key: &str) -> Vec<String>;
}
