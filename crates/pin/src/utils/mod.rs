/// Request building and response validation shared by the backends
pub(crate) mod request;
