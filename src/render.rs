pub(crate) mod certificate;
pub(crate) mod cpu;
pub(crate) mod encode;
pub(crate) mod surface;
