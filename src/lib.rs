pub mod archive;
pub mod dostime;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod fingerprint;
pub mod list;
pub mod resolve;
