pub(crate) mod matcher;
pub(crate) mod session;
pub(crate) mod validate;
pub(crate) mod wiring;
