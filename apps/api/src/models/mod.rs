pub mod applicant;
pub mod chat;
pub mod score;
