pub(crate) mod document;
pub(crate) mod element;
pub(crate) mod template;
