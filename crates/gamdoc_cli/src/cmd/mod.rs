/// Dialect conversion command.
pub mod convert;
/// Container-level information command.
pub mod info;
/// Generic section record decode command.
pub mod records;
/// Model overview command.
pub mod show;
/// Round-trip stability command.
pub mod verify;

pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;
