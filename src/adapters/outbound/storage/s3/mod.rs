mod client;
mod signer;
mod xml;

pub use client::S3VersionStore;
pub use signer::{AnonymousSigner, CredentialSigner, RequestSigner};
