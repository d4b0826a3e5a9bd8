//! Configuration access port trait.

/// Lookups of `[section] key` values. Numbers are parsed from the raw string
/// by `config_validation::{read_int, read_double}` so bad values surface as
/// errors instead of defaults.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
