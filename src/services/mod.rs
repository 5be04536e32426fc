pub mod credential_service;
pub mod note_service;

pub use credential_service::CredentialService;
pub use note_service::NoteService;
