pub(crate) mod gemini;
pub(crate) mod session;
