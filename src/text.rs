pub(crate) mod date;
pub(crate) mod fonts;
pub(crate) mod runs;
