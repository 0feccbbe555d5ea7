pub mod diff;
pub mod document_io;
pub mod init;
pub mod log;
pub mod record;
