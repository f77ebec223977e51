pub(crate) mod encode;
pub(crate) mod signing;
pub(crate) mod text;
pub(crate) mod xml;
