pub(crate) mod cache;
pub(crate) mod fingerprint;
pub(crate) mod payload;
pub(crate) mod resolve;
pub(crate) mod transform;
