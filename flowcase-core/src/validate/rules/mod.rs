pub(crate) mod assertions;
pub(crate) mod case;
pub(crate) mod component;
pub(crate) mod document;
pub(crate) mod script;
